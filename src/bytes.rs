use std::convert::TryInto;
use std::io;
use std::mem;

/// The width of a length prefix in the serialized format.
pub const USIZE_BYTES: usize = mem::size_of::<usize>();

/// Read a u16 in native endian format from the beginning of the given
/// slice. This panics if the slice has length less than 2.
pub fn read_u16_ne(slice: &[u8]) -> u16 {
    u16::from_ne_bytes(slice[..2].try_into().unwrap())
}

/// Read an i16 in native endian format from the beginning of the given
/// slice. This panics if the slice has length less than 2.
pub fn read_i16_ne(slice: &[u8]) -> i16 {
    i16::from_ne_bytes(slice[..2].try_into().unwrap())
}

/// Read an i32 in native endian format from the beginning of the given
/// slice. This panics if the slice has length less than 4.
pub fn read_i32_ne(slice: &[u8]) -> i32 {
    i32::from_ne_bytes(slice[..4].try_into().unwrap())
}

/// Read a usize in native endian format and native width from the
/// beginning of the given slice. This panics if the slice is shorter than
/// [`USIZE_BYTES`].
pub fn read_usize_ne(slice: &[u8]) -> usize {
    usize::from_ne_bytes(slice[..USIZE_BYTES].try_into().unwrap())
}

/// Write a usize length prefix in native byte order and native width.
pub fn io_write_usize_ne<W: io::Write>(mut wtr: W, n: usize) -> io::Result<()> {
    wtr.write_all(&n.to_ne_bytes())
}
