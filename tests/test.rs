use std::collections::HashMap;
use std::fs;

use quickcheck::{quickcheck, TestResult};

use keytrie::{Error, MappedTrie, Match, Trie};

const ANCHOR: char = '\u{1f}';

fn compiled(keys: &[(&str, i32)]) -> Trie {
    let mut trie = Trie::new();
    for &(key, payload) in keys {
        trie.insert(key, payload).unwrap();
    }
    trie.compile();
    trie
}

fn spans<I: Iterator<Item = Match>>(iter: I) -> Vec<(usize, usize, i32)> {
    iter.map(|m| (m.start(), m.end(), m.payload())).collect()
}

/// Builds the five-key anchored dictionary from the mapped-trie scenarios.
/// `.` stands for the anchor byte.
fn anchored_dictionary() -> Trie {
    compiled(&[
        (&anchored(".a..b..c."), 0),
        (&anchored(".b."), 1),
        (&anchored(".a..c."), 2),
        (&anchored(".a..b."), 3),
        (&anchored(".é."), 4),
    ])
}

fn anchored(s: &str) -> String {
    s.replace('.', "\u{1f}")
}

#[test]
fn mapped_trie_round_trip() {
    let trie = anchored_dictionary();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keywords.trie");
    trie.write_to_path(&path).unwrap();

    let mapped = MappedTrie::open(&path).unwrap();
    assert_eq!(mapped.node_count(), trie.node_count());

    for (text, expected) in vec![
        (anchored(".a..b..c."), vec![(0, 9, 0)]),
        (anchored(".b."), vec![(0, 3, 1)]),
        (anchored(".a..c."), vec![(0, 6, 2)]),
        (anchored(".z."), vec![]),
        (anchored(".z..a..b..z."), vec![(3, 9, 3)]),
        (anchored(".é."), vec![(0, 3, 4)]),
    ] {
        assert_eq!(spans(mapped.findall_anchored(&text)), expected, "text {:?}", text);
        assert_eq!(
            spans(trie.findall_anchored(&text).unwrap()),
            expected,
            "in-memory disagreement on {:?}",
            text
        );
    }
}

#[test]
fn write_to_writer_matches_write_to_path() {
    let trie = compiled(&[("foo", 1), ("bar", 2)]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keywords.trie");
    trie.write_to_path(&path).unwrap();

    let mut buf = Vec::new();
    trie.write_to(&mut buf).unwrap();
    assert_eq!(buf, fs::read(&path).unwrap());
}

#[test]
fn empty_trie_round_trip() {
    let mut trie = Trie::new();
    trie.compile();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.trie");
    trie.write_to_path(&path).unwrap();

    let mapped = MappedTrie::open(&path).unwrap();
    assert_eq!(mapped.node_count(), 1);
    assert_eq!(mapped.node_count(), trie.node_count());
    assert_eq!(spans(mapped.findall_anchored(&anchored(".a..b..c."))), vec![]);
}

#[test]
fn write_requires_compilation() {
    let mut trie = Trie::new();
    trie.add("foo").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uncompiled.trie");
    assert!(matches!(trie.write_to_path(&path), Err(Error::State { .. })));
    assert!(!path.exists());
}

#[test]
fn open_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-file");
    assert!(matches!(MappedTrie::open(&path), Err(Error::Io(_))));
}

#[test]
fn open_rejects_short_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short");
    fs::write(&path, b"").unwrap();
    assert!(matches!(MappedTrie::open(&path), Err(Error::Format { .. })));
    fs::write(&path, b"1").unwrap();
    assert!(matches!(MappedTrie::open(&path), Err(Error::Format { .. })));
}

#[test]
fn open_rejects_bad_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage");
    fs::write(&path, b"1234").unwrap();
    assert!(matches!(MappedTrie::open(&path), Err(Error::Magic { .. })));
}

#[test]
fn open_rejects_trailing_bytes() {
    let trie = compiled(&[("foo", 1)]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trailing");
    let mut bytes = Vec::new();
    trie.write_to(&mut bytes).unwrap();
    bytes.push(0);
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(MappedTrie::open(&path), Err(Error::Format { .. })));
}

#[test]
fn open_rejects_truncated_arrays() {
    let trie = compiled(&[("foo", 1), ("bar", 2)]);
    let mut bytes = Vec::new();
    trie.write_to(&mut bytes).unwrap();

    let dir = tempfile::tempdir().unwrap();
    // Chop the file at several depths: inside the last array, inside a
    // length prefix, and right after the magic.
    for keep in &[bytes.len() - 1, bytes.len() / 2, 10, 2] {
        let path = dir.path().join(format!("truncated-{}", keep));
        fs::write(&path, &bytes[..*keep]).unwrap();
        assert!(
            matches!(MappedTrie::open(&path), Err(Error::Format { .. })),
            "file truncated to {} bytes was accepted",
            keep
        );
    }
}

#[test]
fn prop_anchored_round_trip() {
    fn p(keys: Vec<(String, i32)>) -> TestResult {
        let keys: Vec<(String, i32)> = keys
            .into_iter()
            .filter(|(key, _)| !key.is_empty())
            .collect();
        if keys.is_empty() {
            return TestResult::discard();
        }
        let mut trie = Trie::new();
        let mut text = String::new();
        for (key, payload) in &keys {
            trie.insert(key, *payload).unwrap();
            text.push(ANCHOR);
            text.push_str(key);
        }
        text.push(ANCHOR);
        trie.compile();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop.trie");
        trie.write_to_path(&path).unwrap();
        let mapped = MappedTrie::open(&path).unwrap();

        let in_memory: Vec<Match> = trie.findall_anchored(&text).unwrap().collect();
        let on_disk: Vec<Match> = mapped.findall_anchored(&text).collect();
        TestResult::from_bool(
            in_memory == on_disk && mapped.node_count() == trie.node_count(),
        )
    }
    quickcheck(p as fn(Vec<(String, i32)>) -> TestResult);
}

#[test]
fn prop_findall_matches_do_not_overlap() {
    fn p(keys: Vec<String>, text: String) -> TestResult {
        let keys: Vec<String> = keys.into_iter().filter(|k| !k.is_empty()).collect();
        if keys.is_empty() {
            return TestResult::discard();
        }
        let mut trie = Trie::new();
        for key in &keys {
            trie.add(key).unwrap();
        }
        trie.compile();

        let short: Vec<Match> = trie.findall_short(&text).unwrap().collect();
        let long: Vec<Match> = trie.findall_long(&text).unwrap().collect();
        let anchored: Vec<Match> = trie.findall_anchored(&text).unwrap().collect();
        for matches in &[short, long, anchored] {
            for pair in matches.windows(2) {
                if pair[1].start() < pair[0].end() {
                    return TestResult::failed();
                }
            }
        }
        TestResult::passed()
    }
    quickcheck(p as fn(Vec<String>, String) -> TestResult);
}

#[test]
fn prop_short_matches_are_contained_keys() {
    fn p(keys: Vec<String>, text: String) -> TestResult {
        let keys: Vec<String> = keys.into_iter().filter(|k| !k.is_empty()).collect();
        if keys.is_empty() {
            return TestResult::discard();
        }
        let mut trie = Trie::new();
        for key in &keys {
            trie.add(key).unwrap();
        }
        trie.compile();

        let chars: Vec<char> = text.chars().collect();
        for m in trie.findall_short(&text).unwrap() {
            let matched: String = chars[m.start()..m.end()].iter().collect();
            if !trie.contains(&matched).unwrap() {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
    quickcheck(p as fn(Vec<String>, String) -> TestResult);
}

#[test]
fn prop_contains_agrees_with_insertion() {
    fn p(keys: Vec<(String, i32)>) -> TestResult {
        let keys: Vec<(String, i32)> = keys
            .into_iter()
            .filter(|(key, _)| !key.is_empty())
            .collect();
        if keys.is_empty() {
            return TestResult::discard();
        }
        let mut trie = Trie::new();
        let mut expected: HashMap<String, i32> = HashMap::new();
        for (key, payload) in &keys {
            trie.insert(key, *payload).unwrap();
            expected.insert(key.clone(), *payload);
        }
        trie.compile();

        for (key, payload) in &expected {
            if !trie.contains(key).unwrap() {
                return TestResult::failed();
            }
            let want = if *payload == -1 { None } else { Some(*payload) };
            if trie.get_payload(key).unwrap() != want {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
    quickcheck(p as fn(Vec<(String, i32)>) -> TestResult);
}
