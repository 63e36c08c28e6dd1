//! Fragment parsers: the binary header of the current format and the two
//! dot-delimited legacy formats.

pub mod header;
pub mod legacy;

pub use header::{Header, HeaderParser};
pub use legacy::{BitmaskParser, HexRowsParser};
