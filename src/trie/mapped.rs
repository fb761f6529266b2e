use std::fs::File;
use std::mem;
use std::path::Path;

use memmap::Mmap;

use crate::bytes;
use crate::error::{Error, Result};
use crate::trie::anchored::AnchoredTrie;
use crate::trie::iter::MappedAnchoredMatches;
use crate::trie::{ANCHOR_BYTE, MAGIC, NO_PAYLOAD};

/// One serialized array inside the mapping: byte offset plus element count.
#[derive(Clone, Copy, Debug)]
struct Section {
    offset: usize,
    len: usize,
}

/// A read-only trie backed by a memory-mapped file written with
/// [`Trie::write_to_path`](crate::Trie::write_to_path).
///
/// Opening a mapped trie validates the file's magic number and geometry but
/// copies none of the arrays; element reads decode directly out of the
/// mapping. Only anchored matching is served from the mapped form — the
/// short/longest operations stay with the in-memory trie.
///
/// The mapping is released when the `MappedTrie` is dropped; the file
/// handle used to create it is closed as soon as `open` returns, which a
/// live mapping does not require. An element index past a recorded array
/// size can
/// only mean the file lied about its own geometry; such reads panic rather
/// than return an error.
///
/// ```no_run
/// use keytrie::MappedTrie;
///
/// let trie = MappedTrie::open("keywords.trie")?;
/// for m in trie.findall_anchored("\u{1f}rust\u{1f}") {
///     println!("{}..{} -> {}", m.start(), m.end(), m.payload());
/// }
/// # Ok::<(), keytrie::Error>(())
/// ```
pub struct MappedTrie {
    map: Mmap,
    nodes_chars_offset: Section,
    nodes_chars_count: Section,
    nodes_length: Section,
    chars: Section,
    indices: Section,
    payload_keys: Section,
    payload_values: Section,
}

impl MappedTrie {
    /// Opens a serialized trie by mapping the file at `path` read-only.
    ///
    /// Fails with [`Error::Io`] when the file cannot be opened or mapped,
    /// with [`Error::Magic`] when it does not start with the trie magic
    /// number, and with [`Error::Format`] when its arrays do not line up
    /// with its size.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<MappedTrie> {
        let file = File::open(path)?;
        // Checked before mapping: zero-length files cannot be mapped at
        // all, and a file this short cannot carry the magic number.
        if file.metadata()?.len() < 2 {
            return Err(Error::format("file too short for a magic number"));
        }
        // The mapping is read only, but as with any file-backed map the
        // caller must keep the underlying file from being mutated while
        // the trie is open.
        let map = unsafe { Mmap::map(&file)? };
        MappedTrie::from_map(map)
    }

    fn from_map(map: Mmap) -> Result<MappedTrie> {
        let data = &map[..];
        if data.len() < 2 {
            return Err(Error::format("file too short for a magic number"));
        }
        let magic = bytes::read_u16_ne(data);
        if magic != MAGIC {
            return Err(Error::Magic { expected: MAGIC, got: magic });
        }
        let mut pos = 2;
        let nodes_chars_offset = take(data, &mut pos, mem::size_of::<i32>())?;
        let nodes_failure_state = take(data, &mut pos, mem::size_of::<i32>())?;
        let nodes_chars_count = take(data, &mut pos, mem::size_of::<i16>())?;
        let nodes_length = take(data, &mut pos, mem::size_of::<u16>())?;
        let chars = take(data, &mut pos, 1)?;
        let indices = take(data, &mut pos, mem::size_of::<i32>())?;
        let payload_keys = take(data, &mut pos, mem::size_of::<i32>())?;
        let payload_values = take(data, &mut pos, mem::size_of::<i32>())?;
        if pos != data.len() {
            return Err(Error::format("trailing bytes after the last array"));
        }
        if nodes_failure_state.len != nodes_chars_offset.len
            || nodes_chars_count.len != nodes_chars_offset.len
            || nodes_length.len != nodes_chars_offset.len
        {
            return Err(Error::format("node arrays disagree on length"));
        }
        if indices.len != chars.len {
            return Err(Error::format("child arrays disagree on length"));
        }
        if payload_values.len != payload_keys.len {
            return Err(Error::format("payload arrays disagree on length"));
        }
        Ok(MappedTrie {
            map,
            nodes_chars_offset,
            nodes_chars_count,
            nodes_length,
            chars,
            indices,
            payload_keys,
            payload_values,
        })
    }

    /// The number of nodes in the mapped automaton.
    pub fn node_count(&self) -> usize {
        self.nodes_length.len
    }

    /// An iterator over non-overlapping anchored matches in `text`, using
    /// [`ANCHOR_BYTE`] as the boundary marker. Positions are code points.
    pub fn findall_anchored<'t, 'a>(
        &'t self,
        text: &'a str,
    ) -> MappedAnchoredMatches<'t, 'a> {
        MappedAnchoredMatches::new(self, text, ANCHOR_BYTE)
    }

    fn i32_at(&self, section: Section, index: usize) -> i32 {
        assert!(index < section.len, "mapped array index out of range");
        let at = section.offset + index * mem::size_of::<i32>();
        bytes::read_i32_ne(&self.map[at..])
    }

    fn i16_at(&self, section: Section, index: usize) -> i16 {
        assert!(index < section.len, "mapped array index out of range");
        let at = section.offset + index * mem::size_of::<i16>();
        bytes::read_i16_ne(&self.map[at..])
    }

    fn u16_at(&self, section: Section, index: usize) -> u16 {
        assert!(index < section.len, "mapped array index out of range");
        let at = section.offset + index * mem::size_of::<u16>();
        bytes::read_u16_ne(&self.map[at..])
    }

    fn chars_slice(&self, offset: usize, count: usize) -> &[u8] {
        assert!(
            offset + count <= self.chars.len,
            "mapped array index out of range"
        );
        let at = self.chars.offset + offset;
        &self.map[at..at + count]
    }
}

impl AnchoredTrie for MappedTrie {
    fn child_at(&self, state: u32, byte: u8) -> Option<u32> {
        let node = state as usize;
        let offset = self.i32_at(self.nodes_chars_offset, node) as usize;
        let count = self.i16_at(self.nodes_chars_count, node) as usize;
        let slot = self.chars_slice(offset, count).binary_search(&byte).ok()?;
        Some(self.i32_at(self.indices, offset + slot) as u32)
    }

    fn key_length(&self, state: u32) -> u16 {
        self.u16_at(self.nodes_length, state as usize)
    }

    fn payload_at(&self, state: u32) -> i32 {
        // Lower bound over the mapped payload table, decoding per probe.
        let key = state as i32;
        let (mut lo, mut hi) = (0, self.payload_keys.len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.i32_at(self.payload_keys, mid) < key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo < self.payload_keys.len && self.i32_at(self.payload_keys, lo) == key {
            self.i32_at(self.payload_values, lo)
        } else {
            NO_PAYLOAD
        }
    }
}

/// Carves the next length-prefixed array out of `data`, advancing `pos`.
fn take(data: &[u8], pos: &mut usize, elem_size: usize) -> Result<Section> {
    if data.len() - *pos < bytes::USIZE_BYTES {
        return Err(Error::format("truncated array length prefix"));
    }
    let len = bytes::read_usize_ne(&data[*pos..]);
    *pos += bytes::USIZE_BYTES;
    let nbytes = len
        .checked_mul(elem_size)
        .ok_or(Error::Format { msg: "array length overflows the mapping" })?;
    if data.len() - *pos < nbytes {
        return Err(Error::format("truncated array body"));
    }
    let section = Section { offset: *pos, len };
    *pos += nbytes;
    Ok(section)
}
