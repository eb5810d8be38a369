//! Byte- and bit-level coders shared by the tile sub-encodings.

pub mod packed_index;
pub mod run_length;
