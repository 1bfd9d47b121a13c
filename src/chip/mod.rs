//! Per-chip register maps and pin tables.
//!
//! One module per MD variant, selected at build time. Everything the
//! rest of the crate knows about a specific die lives here: register
//! addresses, comparator connect bits, calibration words, the analog
//! pin numbering offset and the pin lookup tables. The tables are
//! configuration, not logic; their accuracy is owned by the board
//! definition they were transcribed from.

#[cfg(feature = "md328d")]
mod md328d;
#[cfg(feature = "md328d")]
pub use md328d::*;

#[cfg(feature = "md328p")]
mod md328p;
#[cfg(feature = "md328p")]
pub use md328p::*;

#[cfg(feature = "md8f")]
mod md8f;
#[cfg(feature = "md8f")]
pub use md8f::*;
