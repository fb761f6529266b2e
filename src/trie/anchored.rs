use crate::trie::frozen::RawMatch;

/// The capabilities an anchored scan needs from a trie.
///
/// Both the in-memory frozen form and the file-mapped form implement this,
/// so one routine drives anchored matching for either deployment mode.
pub(crate) trait AnchoredTrie {
    /// Direct child of `state` along `byte`, without any root special case.
    fn child_at(&self, state: u32, byte: u8) -> Option<u32>;

    /// Byte length of the key terminating at `state`, or 0.
    fn key_length(&self, state: u32) -> u16;

    /// Payload stored at `state`, or the no-payload sentinel.
    fn payload_at(&self, state: u32) -> i32;
}

/// Finds the next anchored match at or after byte offset `start`.
///
/// Anchored matching never follows failure links: a match may only grow out
/// of a walk that began at an anchor byte. The walk uses the root-augmented
/// transition — at the root, a byte with no real child is consumed in place
/// — so it slides over the anchor itself and any bytes no key starts with,
/// and a key that embeds a leading anchor can match starting at the anchor
/// position. Once the walk leaves the root, the first missing transition
/// ends it. The longest terminal seen in a walk wins; a walk that saw none
/// is retried from just past its anchor.
pub(crate) fn next_anchored<T: AnchoredTrie>(
    trie: &T,
    text: &[u8],
    start: usize,
    anchor: u8,
) -> Option<RawMatch> {
    let mut cursor = start;
    loop {
        let at = cursor + text[cursor..].iter().position(|&byte| byte == anchor)?;
        // (length, end, state) of the deepest terminal on this walk. The
        // walk never returns to the root after leaving it, so a later
        // terminal is always a longer one.
        let mut best: Option<(usize, usize, u32)> = None;
        let mut state = 0;
        for (i, &byte) in text.iter().enumerate().skip(at) {
            state = match trie.child_at(state, byte) {
                Some(child) => child,
                None if state == 0 => 0,
                None => break,
            };
            let length = trie.key_length(state) as usize;
            if length > 0 && best.map_or(true, |(longest, _, _)| longest < length) {
                best = Some((length, i + 1, state));
            }
        }
        if let Some((length, end, state)) = best {
            return Some(RawMatch {
                start: end - length,
                end,
                payload: trie.payload_at(state),
            });
        }
        cursor = at + 1;
    }
}
