use crate::trie::anchored;
use crate::trie::frozen::{Frozen, RawMatch};
use crate::trie::mapped::MappedTrie;
use crate::trie::Match;
use crate::utf8::CodePointMap;

/// Scan state shared by every match iterator: the text under inspection,
/// its code point map (built once per scan), and the byte cursor.
pub(crate) struct Scan<'a> {
    text: &'a [u8],
    map: CodePointMap,
    at: usize,
}

impl<'a> Scan<'a> {
    pub fn new(text: &'a str) -> Scan<'a> {
        let text = text.as_bytes();
        Scan { text, map: CodePointMap::new(text), at: 0 }
    }

    /// Runs `find` from the cursor; on a match, advances the cursor to the
    /// byte-level match end and translates the positions for the caller.
    pub fn step<F>(&mut self, find: F) -> Option<Match>
    where
        F: FnOnce(&[u8], usize) -> Option<RawMatch>,
    {
        let raw = find(self.text, self.at)?;
        self.at = raw.end;
        Some(Match {
            start: self.map.code_point(raw.start),
            end: self.map.code_point(raw.end),
            payload: raw.payload,
        })
    }
}

/// Iterator over non-overlapping first matches, created by
/// [`Trie::findall_short`](crate::Trie::findall_short).
pub struct ShortMatches<'t, 'a> {
    trie: &'t Frozen,
    scan: Scan<'a>,
}

impl<'t, 'a> ShortMatches<'t, 'a> {
    pub(crate) fn new(trie: &'t Frozen, text: &'a str) -> ShortMatches<'t, 'a> {
        ShortMatches { trie, scan: Scan::new(text) }
    }
}

impl Iterator for ShortMatches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let trie = self.trie;
        self.scan.step(|text, at| trie.find_short(text, at))
    }
}

/// Iterator over non-overlapping longest matches, created by
/// [`Trie::findall_long`](crate::Trie::findall_long).
pub struct LongMatches<'t, 'a> {
    trie: &'t Frozen,
    scan: Scan<'a>,
}

impl<'t, 'a> LongMatches<'t, 'a> {
    pub(crate) fn new(trie: &'t Frozen, text: &'a str) -> LongMatches<'t, 'a> {
        LongMatches { trie, scan: Scan::new(text) }
    }
}

impl Iterator for LongMatches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let trie = self.trie;
        self.scan.step(|text, at| trie.find_longest(text, at))
    }
}

/// Iterator over non-overlapping anchored matches on an in-memory trie,
/// created by [`Trie::findall_anchored`](crate::Trie::findall_anchored).
pub struct AnchoredMatches<'t, 'a> {
    trie: &'t Frozen,
    scan: Scan<'a>,
    anchor: u8,
}

impl<'t, 'a> AnchoredMatches<'t, 'a> {
    pub(crate) fn new(
        trie: &'t Frozen,
        text: &'a str,
        anchor: u8,
    ) -> AnchoredMatches<'t, 'a> {
        AnchoredMatches { trie, scan: Scan::new(text), anchor }
    }
}

impl Iterator for AnchoredMatches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let (trie, anchor) = (self.trie, self.anchor);
        self.scan.step(|text, at| anchored::next_anchored(trie, text, at, anchor))
    }
}

/// Iterator over non-overlapping anchored matches on a mapped trie,
/// created by [`MappedTrie::findall_anchored`].
pub struct MappedAnchoredMatches<'t, 'a> {
    trie: &'t MappedTrie,
    scan: Scan<'a>,
    anchor: u8,
}

impl<'t, 'a> MappedAnchoredMatches<'t, 'a> {
    pub(crate) fn new(
        trie: &'t MappedTrie,
        text: &'a str,
        anchor: u8,
    ) -> MappedAnchoredMatches<'t, 'a> {
        MappedAnchoredMatches { trie, scan: Scan::new(text), anchor }
    }
}

impl Iterator for MappedAnchoredMatches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let (trie, anchor) = (self.trie, self.anchor);
        self.scan.step(|text, at| anchored::next_anchored(trie, text, at, anchor))
    }
}
