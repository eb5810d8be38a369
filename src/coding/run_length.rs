use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// The amount a single `0xFF` length byte adds to a run.
const CHUNK: usize = u8::MAX as usize;

/// Writes the length field of a run of `run_length` identical values.
///
/// The field stores `run_length - 1` as one `0xFF` byte for every full
/// chunk of 255, followed by a final byte holding the remainder. A run of
/// 255 is therefore `[254]` and a run of 256 is `[255, 0]`.
///
/// # Panics
///
/// Panics if `run_length` is 0.
pub fn encode_run_length<W>(to: &mut W, run_length: usize) -> io::Result<()>
where
    W: Write,
{
    assert!(run_length > 0, "A run holds at least one value!");

    let mut remaining = run_length - 1;
    while remaining >= CHUNK {
        to.write_u8(u8::MAX)?;
        remaining -= CHUNK;
    }
    to.write_u8(remaining as u8)
}

/// Reads a length field written by `encode_run_length` and returns the run length.
pub fn decode_run_length<R>(from: &mut R) -> io::Result<usize>
where
    R: Read,
{
    let mut run_length = 1;
    loop {
        let byte = from.read_u8()?;
        run_length += byte as usize;
        if byte != u8::MAX {
            return Ok(run_length);
        }
    }
}

/// Returns the number of bytes `encode_run_length` writes for a run of the given length.
/// The method doesn't actually encode the run, so it's fast.
pub fn code_length(run_length: usize) -> usize {
    debug_assert!(run_length > 0);
    (run_length - 1) / CHUNK + 1
}
