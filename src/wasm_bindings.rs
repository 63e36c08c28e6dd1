//! WASM bindings for beatcode.
//!
//! Browser-facing API used by the sequencer page: encode on every edit,
//! decode once from `location.hash` at load.

use wasm_bindgen::prelude::*;

use crate::presets::{self, PRESETS};
use crate::state::{BeatState, Grid, Kit, Track, TRACK_COUNT};
use crate::{decode_state, encode_state};

/// Encode a pattern into a URL fragment (without `#`).
///
/// `grid` is row-major, `8 * step_count` bytes, non-zero meaning a hit.
/// Tempo, swing and volumes are clamped; only a badly shaped grid or an
/// unknown kit name is rejected.
#[wasm_bindgen(js_name = encodeState)]
pub fn encode_state_js(
    grid: &[u8],
    step_count: usize,
    bpm: i32,
    swing: i32,
    kit: &str,
    volumes: &[f32],
) -> Result<String, JsError> {
    if grid.len() != TRACK_COUNT * step_count {
        return Err(JsError::new(&format!(
            "Grid has {} cells, expected {} for {} steps",
            grid.len(),
            TRACK_COUNT * step_count,
            step_count
        )));
    }
    let rows = grid
        .chunks(step_count.max(1))
        .map(|row| row.iter().map(|&cell| cell != 0).collect())
        .collect();
    let grid = Grid::from_rows(rows).map_err(|e| JsError::new(&e.to_string()))?;
    let kit: Kit = kit.parse().map_err(|e: crate::StateError| JsError::new(&e.to_string()))?;

    let mut vols = [crate::state::DEFAULT_VOLUME; TRACK_COUNT];
    for (slot, &v) in vols.iter_mut().zip(volumes) {
        *slot = v;
    }

    let state = BeatState {
        grid,
        bpm: bpm.clamp(0, i32::from(u16::MAX)) as u16,
        swing: swing.clamp(0, i32::from(u8::MAX)) as u8,
        kit,
        volumes: vols,
    };
    Ok(encode_state(&state))
}

/// Decode a fragment (with or without `#`). Returns `null` when the
/// fragment is not a pattern.
#[wasm_bindgen(js_name = decodeState)]
pub fn decode_state_js(fragment: &str) -> JsValue {
    match decode_state(fragment) {
        Some(state) => state_to_js(&state).into(),
        None => JsValue::NULL,
    }
}

/// Kit names in header index order.
#[wasm_bindgen(js_name = kitNames)]
pub fn kit_names() -> js_sys::Array {
    Kit::ALL.iter().map(|k| JsValue::from_str(k.name())).collect()
}

/// Track keys in grid row order.
#[wasm_bindgen(js_name = trackKeys)]
pub fn track_keys() -> js_sys::Array {
    Track::ALL.iter().map(|t| JsValue::from_str(t.key())).collect()
}

/// Names of the built-in presets.
#[wasm_bindgen(js_name = presetNames)]
pub fn preset_names() -> js_sys::Array {
    PRESETS.iter().map(|p| JsValue::from_str(p.name)).collect()
}

/// Fragment for a built-in preset, or `undefined` for an unknown name.
#[wasm_bindgen(js_name = presetFragment)]
pub fn preset_fragment(name: &str) -> Option<String> {
    presets::find(name).map(|p| encode_state(&p.to_state()))
}

fn state_to_js(state: &BeatState) -> js_sys::Object {
    let grid: js_sys::Array = state
        .grid
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|&hit| JsValue::from_bool(hit))
                .collect::<js_sys::Array>()
        })
        .collect();
    let volumes: js_sys::Array = state
        .volumes
        .iter()
        .map(|&v| JsValue::from_f64(f64::from(v)))
        .collect();

    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &"grid".into(), &grid);
    let _ = js_sys::Reflect::set(&obj, &"bpm".into(), &JsValue::from_f64(f64::from(state.bpm)));
    let _ = js_sys::Reflect::set(&obj, &"swing".into(), &JsValue::from_f64(f64::from(state.swing)));
    let _ = js_sys::Reflect::set(&obj, &"kit".into(), &JsValue::from_str(state.kit.name()));
    let _ = js_sys::Reflect::set(&obj, &"volumes".into(), &volumes);
    let _ = js_sys::Reflect::set(
        &obj,
        &"stepCount".into(),
        &JsValue::from_f64(state.step_count() as f64),
    );
    obj
}
