//! Byte-level helpers shared by the metadata code.

pub mod io;
