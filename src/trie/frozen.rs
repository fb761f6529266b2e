use std::io;

use byteorder::{NativeEndian, WriteBytesExt};

use crate::bytes;
use crate::error::Result;
use crate::trie::anchored::AnchoredTrie;
use crate::trie::node::BuilderNode;
use crate::trie::{MAGIC, NO_PAYLOAD};

/// The packed, immutable form of a compiled trie.
///
/// Nodes keep their arena order. Each node owns the slice
/// `chars[chars_offset..chars_offset + chars_count]` of child bytes (sorted,
/// so child lookup bisects) and the parallel slice of `indices` naming the
/// child reached by each byte. Payloads are denormalized into a sparse table
/// sorted by node index; most nodes carry none.
pub(crate) struct Frozen {
    nodes_chars_offset: Vec<i32>,
    nodes_failure_state: Vec<i32>,
    nodes_chars_count: Vec<i16>,
    nodes_length: Vec<u16>,
    chars: Vec<u8>,
    indices: Vec<i32>,
    payload_keys: Vec<i32>,
    payload_values: Vec<i32>,
}

/// A single match expressed in byte offsets, before code point translation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub payload: i32,
}

impl Frozen {
    /// Consumes a builder arena whose failure links are already in place.
    pub fn from_nodes(nodes: Vec<BuilderNode>) -> Frozen {
        let count = nodes.len();
        let mut frozen = Frozen {
            nodes_chars_offset: Vec::with_capacity(count),
            nodes_failure_state: Vec::with_capacity(count),
            nodes_chars_count: Vec::with_capacity(count),
            nodes_length: Vec::with_capacity(count),
            chars: Vec::new(),
            indices: Vec::new(),
            payload_keys: Vec::new(),
            payload_values: Vec::new(),
        };
        for (index, node) in nodes.into_iter().enumerate() {
            let children = node.children();
            debug_assert!(children.len() <= i16::MAX as usize);
            frozen.nodes_chars_offset.push(frozen.chars.len() as i32);
            frozen.nodes_failure_state.push(node.failure as i32);
            frozen.nodes_chars_count.push(children.len() as i16);
            frozen.nodes_length.push(node.key_length);
            if node.payload != NO_PAYLOAD {
                frozen.payload_keys.push(index as i32);
                frozen.payload_values.push(node.payload);
            }
            for &(byte, child) in children {
                frozen.chars.push(byte);
                frozen.indices.push(child as i32);
            }
        }
        frozen
    }

    pub fn node_count(&self) -> usize {
        self.nodes_length.len()
    }

    pub fn key_count(&self) -> usize {
        self.nodes_length.iter().filter(|&&len| len > 0).count()
    }

    pub fn total_children(&self) -> usize {
        self.chars.len()
    }

    fn length(&self, state: u32) -> u16 {
        self.nodes_length[state as usize]
    }

    fn failure(&self, state: u32) -> u32 {
        self.nodes_failure_state[state as usize] as u32
    }

    /// Child lookup without any root special case.
    fn child(&self, state: u32, byte: u8) -> Option<u32> {
        let node = state as usize;
        let offset = self.nodes_chars_offset[node] as usize;
        let count = self.nodes_chars_count[node] as usize;
        let slot = self.chars[offset..offset + count].binary_search(&byte).ok()?;
        Some(self.indices[offset + slot] as u32)
    }

    /// One automaton step: take the goto edge if present, otherwise chase
    /// failure links until one appears. At the root a missing edge consumes
    /// the byte in place.
    fn step(&self, mut state: u32, byte: u8) -> u32 {
        loop {
            if let Some(child) = self.child(state, byte) {
                return child;
            }
            if state == 0 {
                return 0;
            }
            state = self.failure(state);
        }
    }

    /// The first match at or after byte offset `start`.
    pub fn find_short(&self, text: &[u8], start: usize) -> Option<RawMatch> {
        let mut state = 0;
        for (i, &byte) in text.iter().enumerate().skip(start) {
            state = self.step(state, byte);
            let length = self.length(state) as usize;
            if length > 0 && length <= i + 1 - start {
                let end = i + 1;
                return Some(RawMatch {
                    start: end - length,
                    end,
                    payload: self.payload_or_sentinel(state),
                });
            }
        }
        None
    }

    /// The longest match in the first contiguous run of terminals at or
    /// after byte offset `start`.
    ///
    /// The candidate is committed as soon as the scan falls off the
    /// automaton, so with several terminals ending in one stretch this
    /// looks through all of them before returning anything.
    pub fn find_longest(&self, text: &[u8], start: usize) -> Option<RawMatch> {
        // (length, end, state) of the best terminal in the current run.
        let mut best: Option<(usize, usize, u32)> = None;
        let mut state = 0;
        for (i, &byte) in text.iter().enumerate().skip(start) {
            state = loop {
                if let Some(child) = self.child(state, byte) {
                    break child;
                }
                if let Some(found) = best {
                    // Fell off the automaton while holding a candidate.
                    return Some(self.commit(found));
                }
                if state == 0 {
                    break 0;
                }
                state = self.failure(state);
            };
            let length = self.length(state) as usize;
            if length > 0
                // A candidate may never extend left of the scan start.
                && length <= i + 1 - start
                && best.map_or(true, |(longest, _, _)| longest < length)
            {
                best = Some((length, i + 1, state));
            }
        }
        best.map(|found| self.commit(found))
    }

    fn commit(&self, (length, end, state): (usize, usize, u32)) -> RawMatch {
        RawMatch {
            start: end - length,
            end,
            payload: self.payload_or_sentinel(state),
        }
    }

    /// Whether `key` was stored in the trie. Exact walk; a node reached by
    /// a strict prefix of some key does not count.
    pub fn contains(&self, key: &[u8]) -> bool {
        match self.walk(key) {
            Some(state) => self.length(state) > 0,
            None => false,
        }
    }

    /// The payload stored with `key`, if `key` is in the trie and was given
    /// one.
    pub fn get_payload(&self, key: &[u8]) -> Option<i32> {
        let state = self.walk(key)?;
        if self.length(state) == 0 {
            return None;
        }
        self.payload(state)
    }

    /// Exact walk from the root; no failure links, no root fallback.
    fn walk(&self, key: &[u8]) -> Option<u32> {
        let mut state = 0;
        for &byte in key {
            state = self.child(state, byte)?;
        }
        Some(state)
    }

    fn payload(&self, state: u32) -> Option<i32> {
        let slot = self.payload_keys.binary_search(&(state as i32)).ok()?;
        Some(self.payload_values[slot])
    }

    fn payload_or_sentinel(&self, state: u32) -> i32 {
        self.payload(state).unwrap_or(NO_PAYLOAD)
    }

    /// Dumps the parallel arrays in native byte order, each preceded by its
    /// native-width length. See the crate docs for the exact layout.
    pub fn write_to<W: io::Write>(&self, mut wtr: W) -> Result<()> {
        wtr.write_u16::<NativeEndian>(MAGIC)?;
        write_i32s(&mut wtr, &self.nodes_chars_offset)?;
        write_i32s(&mut wtr, &self.nodes_failure_state)?;
        write_i16s(&mut wtr, &self.nodes_chars_count)?;
        write_u16s(&mut wtr, &self.nodes_length)?;
        bytes::io_write_usize_ne(&mut wtr, self.chars.len())?;
        wtr.write_all(&self.chars)?;
        write_i32s(&mut wtr, &self.indices)?;
        write_i32s(&mut wtr, &self.payload_keys)?;
        write_i32s(&mut wtr, &self.payload_values)?;
        Ok(())
    }
}

impl AnchoredTrie for Frozen {
    fn child_at(&self, state: u32, byte: u8) -> Option<u32> {
        self.child(state, byte)
    }

    fn key_length(&self, state: u32) -> u16 {
        self.length(state)
    }

    fn payload_at(&self, state: u32) -> i32 {
        self.payload_or_sentinel(state)
    }
}

fn write_i32s<W: io::Write>(wtr: &mut W, values: &[i32]) -> io::Result<()> {
    bytes::io_write_usize_ne(&mut *wtr, values.len())?;
    for &value in values {
        wtr.write_i32::<NativeEndian>(value)?;
    }
    Ok(())
}

fn write_i16s<W: io::Write>(wtr: &mut W, values: &[i16]) -> io::Result<()> {
    bytes::io_write_usize_ne(&mut *wtr, values.len())?;
    for &value in values {
        wtr.write_i16::<NativeEndian>(value)?;
    }
    Ok(())
}

fn write_u16s<W: io::Write>(wtr: &mut W, values: &[u16]) -> io::Result<()> {
    bytes::io_write_usize_ne(&mut *wtr, values.len())?;
    for &value in values {
        wtr.write_u16::<NativeEndian>(value)?;
    }
    Ok(())
}
