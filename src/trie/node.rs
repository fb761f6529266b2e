use crate::trie::NO_PAYLOAD;

/// A single node in the builder trie.
///
/// Children are a `(byte, child index)` list kept sorted by byte at all
/// times, so lookups bisect and the frozen form can concatenate the lists
/// without re-sorting. Node identity is always an arena index, never a
/// pointer.
#[derive(Debug)]
pub(crate) struct BuilderNode {
    children: Vec<(u8, u32)>,
    /// Failure state index; 0 (the root) until compilation fills it in.
    pub failure: u32,
    /// Payload stored at this node, or [`NO_PAYLOAD`].
    pub payload: i32,
    /// Byte length of the key terminating here; 0 for non-terminal nodes.
    pub key_length: u16,
}

impl BuilderNode {
    pub fn new() -> BuilderNode {
        BuilderNode {
            children: Vec::new(),
            failure: 0,
            payload: NO_PAYLOAD,
            key_length: 0,
        }
    }

    /// The child reached from this node along `byte`, if any.
    pub fn child(&self, byte: u8) -> Option<u32> {
        self.children
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|slot| self.children[slot].1)
    }

    /// Point `byte` at `child`, inserting or replacing its edge.
    pub fn set_child(&mut self, byte: u8, child: u32) {
        match self.children.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(slot) => self.children[slot].1 = child,
            Err(slot) => self.children.insert(slot, (byte, child)),
        }
    }

    pub fn children(&self) -> &[(u8, u32)] {
        &self.children
    }
}
