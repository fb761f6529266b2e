/*!
The keyword trie, its packed compiled form, and the mapped reader.

`Trie` is the mutable entry point: keys go in, `compile` freezes them into
an Aho-Corasick automaton, and the search operations run against the frozen
form. `MappedTrie` serves the anchored subset of those operations straight
out of a serialized file.
*/

use std::collections::VecDeque;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::Path;

use crate::error::{Error, Result};
use crate::trie::frozen::Frozen;
use crate::trie::iter::Scan;
use crate::trie::node::BuilderNode;

pub use self::iter::{
    AnchoredMatches, LongMatches, MappedAnchoredMatches, ShortMatches,
};
pub use self::mapped::MappedTrie;

mod anchored;
mod frozen;
mod iter;
mod mapped;
mod node;

/// The first two bytes of every serialized trie, in native byte order.
pub(crate) const MAGIC: u16 = 0xBABB;

/// Sentinel payload meaning "nothing stored at this node".
pub(crate) const NO_PAYLOAD: i32 = -1;

/// The byte the anchored search operations treat as a word boundary
/// (the ASCII unit separator).
///
/// Anchored matching only starts a walk at an occurrence of this byte, and
/// keys may embed it to require boundaries of their own.
pub const ANCHOR_BYTE: u8 = 0x1F;

/// A single non-overlapping match.
///
/// Positions are code point offsets into the query text, so the matched key
/// equals `text[start..end]` counted in characters, not bytes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Match {
    start: usize,
    end: usize,
    payload: i32,
}

impl Match {
    /// The code point offset of the first matched character.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The code point offset one past the last matched character.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The payload stored with the matched key, or `-1` if the key was
    /// added without one.
    pub fn payload(&self) -> i32 {
        self.payload
    }
}

/// An Aho-Corasick keyword matcher.
///
/// A `Trie` starts out as a mutable dictionary: add keys (arbitrary byte
/// strings) with optional `i32` payloads, then [`compile`](Trie::compile)
/// once to freeze them into a packed automaton. After compilation the trie
/// is immutable and answers first-match, longest-match, and anchored
/// queries, reporting positions in code points.
///
/// ```
/// use keytrie::Trie;
///
/// let mut trie = Trie::new();
/// trie.insert("foo", 1).unwrap();
/// trie.insert("foobar", 2).unwrap();
/// trie.compile();
///
/// let m = trie.find_long("something foobar").unwrap().unwrap();
/// assert_eq!((m.start(), m.end(), m.payload()), (10, 16, 2));
/// ```
pub struct Trie {
    /// The builder arena; drained into the frozen form by `compile`.
    nodes: Vec<BuilderNode>,
    frozen: Option<Frozen>,
}

impl Default for Trie {
    fn default() -> Trie {
        Trie::new()
    }
}

impl Trie {
    /// Creates an empty trie holding only the root node.
    pub fn new() -> Trie {
        Trie { nodes: vec![BuilderNode::new()], frozen: None }
    }

    /// Adds `key` with no payload. Equivalent to `insert(key, -1)`.
    pub fn add<K: AsRef<[u8]>>(&mut self, key: K) -> Result<()> {
        self.insert(key, NO_PAYLOAD)
    }

    /// Adds `key` with `payload`, creating any missing nodes along its
    /// path. Adding a key twice replaces its payload.
    ///
    /// Fails with [`Error::State`] once the trie is compiled and with
    /// [`Error::Input`] when the key is empty or longer than 65,535 bytes.
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, payload: i32) -> Result<()> {
        let key = key.as_ref();
        if self.frozen.is_some() {
            return Err(Error::state("cannot add keys to a compiled trie"));
        }
        if key.is_empty() {
            return Err(Error::input("keys must not be empty"));
        }
        let length = u16::try_from(key.len())
            .map_err(|_| Error::input("keys are limited to 65535 bytes"))?;
        let mut state = 0u32;
        for &byte in key {
            state = match self.nodes[state as usize].child(byte) {
                Some(child) => child,
                None => {
                    let child = self.push_node();
                    self.nodes[state as usize].set_child(byte, child);
                    child
                }
            };
        }
        let node = &mut self.nodes[state as usize];
        node.payload = payload;
        node.key_length = length;
        Ok(())
    }

    /// Builds the failure links and freezes the dictionary into its packed
    /// form. Idempotent; after the first call the trie rejects further
    /// keys.
    pub fn compile(&mut self) {
        if self.frozen.is_some() {
            return;
        }
        self.link_failures();
        let nodes = mem::replace(&mut self.nodes, Vec::new());
        self.frozen = Some(Frozen::from_nodes(nodes));
    }

    /// The Aho-Corasick goto/failure pre-pass, breadth first from the root
    /// in sorted byte order, so the automaton is deterministic for a given
    /// key set.
    ///
    /// A node reached via byte `a` fails to the state its parent's failure
    /// chain reaches along `a`. At the root, a byte with no real child
    /// resolves to the root itself, which bounds every chain walk.
    fn link_failures(&mut self) {
        let mut queue = VecDeque::new();
        for slot in 0..self.nodes[0].children().len() {
            let (_, child) = self.nodes[0].children()[slot];
            self.nodes[child as usize].failure = 0;
            queue.push_back(child);
        }
        while let Some(parent) = queue.pop_front() {
            for slot in 0..self.nodes[parent as usize].children().len() {
                let (byte, child) = self.nodes[parent as usize].children()[slot];
                queue.push_back(child);
                let mut state = self.nodes[parent as usize].failure;
                let target = loop {
                    match self.nodes[state as usize].child(byte) {
                        Some(next) => break next,
                        None if state == 0 => break 0,
                        None => state = self.nodes[state as usize].failure,
                    }
                };
                self.nodes[child as usize].failure = target;
            }
        }
    }

    fn push_node(&mut self) -> u32 {
        self.nodes.push(BuilderNode::new());
        (self.nodes.len() - 1) as u32
    }

    fn frozen(&self) -> Result<&Frozen> {
        self.frozen
            .as_ref()
            .ok_or_else(|| Error::state("the trie must be compiled before it is searched"))
    }

    /// The first match in `text`: the earliest position where any key ends.
    /// With a key and its extension both present, the shorter one wins.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn find_short(&self, text: &str) -> Result<Option<Match>> {
        let frozen = self.frozen()?;
        let mut scan = Scan::new(text);
        Ok(scan.step(|bytes, at| frozen.find_short(bytes, at)))
    }

    /// The longest match in the first contiguous stretch of matches in
    /// `text`. With a key and its extension both present, the extension
    /// wins.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn find_long(&self, text: &str) -> Result<Option<Match>> {
        let frozen = self.frozen()?;
        let mut scan = Scan::new(text);
        Ok(scan.step(|bytes, at| frozen.find_longest(bytes, at)))
    }

    /// An iterator over non-overlapping first matches in `text`.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn findall_short<'t, 'a>(
        &'t self,
        text: &'a str,
    ) -> Result<ShortMatches<'t, 'a>> {
        Ok(ShortMatches::new(self.frozen()?, text))
    }

    /// An iterator over non-overlapping longest matches in `text`.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn findall_long<'t, 'a>(
        &'t self,
        text: &'a str,
    ) -> Result<LongMatches<'t, 'a>> {
        Ok(LongMatches::new(self.frozen()?, text))
    }

    /// An iterator over non-overlapping anchored matches in `text`, using
    /// [`ANCHOR_BYTE`] as the boundary marker.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn findall_anchored<'t, 'a>(
        &'t self,
        text: &'a str,
    ) -> Result<AnchoredMatches<'t, 'a>> {
        Ok(AnchoredMatches::new(self.frozen()?, text, ANCHOR_BYTE))
    }

    /// Whether `key` was added to the trie. Prefixes of keys do not count.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> Result<bool> {
        Ok(self.frozen()?.contains(key.as_ref()))
    }

    /// The payload stored with `key`, or `None` when `key` is not in the
    /// trie or was added without a payload.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn get_payload<K: AsRef<[u8]>>(&self, key: K) -> Result<Option<i32>> {
        Ok(self.frozen()?.get_payload(key.as_ref()))
    }

    /// The number of keys in the trie.
    pub fn key_count(&self) -> usize {
        match self.frozen {
            Some(ref frozen) => frozen.key_count(),
            None => self.nodes.iter().filter(|node| node.key_length > 0).count(),
        }
    }

    /// The number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        match self.frozen {
            Some(ref frozen) => frozen.node_count(),
            None => self.nodes.len(),
        }
    }

    /// The total number of child edges across all nodes.
    pub fn total_children(&self) -> usize {
        match self.frozen {
            Some(ref frozen) => frozen.total_children(),
            None => self.nodes.iter().map(|node| node.children().len()).sum(),
        }
    }

    /// Serializes the compiled trie to `wtr` in the native-endian packed
    /// format understood by [`MappedTrie::open`].
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn write_to<W: io::Write>(&self, wtr: W) -> Result<()> {
        self.frozen()?.write_to(wtr)
    }

    /// Serializes the compiled trie to a new file at `path`.
    ///
    /// Fails with [`Error::State`] before [`compile`](Trie::compile).
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let frozen = self.frozen()?;
        let mut wtr = BufWriter::new(File::create(path)?);
        frozen.write_to(&mut wtr)?;
        wtr.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn take_frozen(mut self) -> Frozen {
        self.frozen.take().expect("trie is not compiled")
    }
}
