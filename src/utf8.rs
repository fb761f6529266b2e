/// A byte-offset to code-point-offset translation for one UTF-8 buffer.
///
/// Matching runs over raw bytes, but callers address their text in code
/// points. The map records the position of every code point's leading byte
/// (continuation bytes are exactly those shaped `10xxxxxx`), so translating
/// an offset is a lower-bound search.
pub struct CodePointMap {
    leads: Vec<usize>,
}

impl CodePointMap {
    pub fn new(text: &[u8]) -> CodePointMap {
        let leads = text
            .iter()
            .enumerate()
            .filter(|&(_, &byte)| byte & 0xC0 != 0x80)
            .map(|(i, _)| i)
            .collect();
        CodePointMap { leads }
    }

    /// Translate a byte offset into the number of code points before it.
    ///
    /// An offset pointing into the middle of a multi-byte sequence resolves
    /// to the index of the next leading byte, never to a continuation byte.
    pub fn code_point(&self, byte_offset: usize) -> usize {
        self.leads.partition_point(|&lead| lead < byte_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::CodePointMap;

    #[test]
    fn ascii_is_identity() {
        let map = CodePointMap::new(b"plain ascii");
        for i in 0..=11 {
            assert_eq!(map.code_point(i), i);
        }
    }

    #[test]
    fn multi_byte_offsets_compress() {
        // "étable" is one 2-byte sequence followed by five ASCII bytes.
        let text = "étable";
        let map = CodePointMap::new(text.as_bytes());
        assert_eq!(map.code_point(0), 0);
        assert_eq!(map.code_point(2), 1);
        assert_eq!(map.code_point(text.len()), 6);
    }

    #[test]
    fn mid_sequence_offset_rounds_up() {
        let map = CodePointMap::new("é".as_bytes());
        assert_eq!(map.code_point(1), 1);
    }

    #[test]
    fn empty_text() {
        let map = CodePointMap::new(b"");
        assert_eq!(map.code_point(0), 0);
    }
}
