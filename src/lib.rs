/*!
Multi-pattern keyword matching with memory-mappable Aho-Corasick tries.

A [`Trie`] is built from a dictionary of byte-string keys, each with an
optional `i32` payload, and compiled once into a packed automaton. A single
left-to-right pass then answers first-match ([`Trie::find_short`]), longest
match ([`Trie::find_long`]), and all-non-overlapping-matches queries
([`Trie::findall_short`], [`Trie::findall_long`]). Reported positions are
code point offsets into the query text, so callers never see byte offsets.

```
use keytrie::Trie;

let mut trie = Trie::new();
trie.insert("foo", 1).unwrap();
trie.insert("foobar", 2).unwrap();
trie.insert("bar", 3).unwrap();
trie.compile();

let matches: Vec<_> = trie
    .findall_long("something foo bar foobar")
    .unwrap()
    .map(|m| (m.start(), m.end(), m.payload()))
    .collect();
assert_eq!(matches, vec![(10, 13, 1), (14, 17, 3), (18, 24, 2)]);
```

# Anchored matching

Some dictionaries want token-like boundaries instead of free substring
matches. The anchored operations treat [`ANCHOR_BYTE`] (the ASCII unit
separator) as a synthetic word break: a match may only grow out of a walk
that starts at an anchor, and no failure links are consulted, so a key can
never begin in the middle of another word.

```
use keytrie::Trie;

let mut trie = Trie::new();
trie.insert("foo", 0).unwrap();
trie.insert("bar", 1).unwrap();
trie.compile();

let text = "\u{1f}bar\u{1f}\u{1f}foo\u{1f}\u{1f}foobar\u{1f}";
let matches: Vec<_> = trie
    .findall_anchored(text)
    .unwrap()
    .map(|m| (m.start(), m.end(), m.payload()))
    .collect();
// "bar" inside "foobar" is not reported: no anchor precedes it.
assert_eq!(matches, vec![(1, 4, 1), (6, 9, 0), (11, 14, 0)]);
```

# Serialization

A compiled trie can be written to disk ([`Trie::write_to_path`]) and later
served directly out of a read-only memory mapping ([`MappedTrie::open`])
with no per-array copies. The mapped form answers anchored queries only.
The format is a native-endian, native-word-size dump of the packed arrays
behind a `0xBABB` magic number; files are not portable across machines of
different endianness or word size.
*/

pub use crate::error::{Error, Result};
pub use crate::trie::{
    AnchoredMatches, LongMatches, MappedAnchoredMatches, MappedTrie, Match,
    ShortMatches, Trie, ANCHOR_BYTE,
};

mod bytes;
mod error;
mod trie;
mod utf8;
