// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    pub fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Line-start table for turning byte offsets into 1-based line/column pairs.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset where each line begins. Always starts with 0.
    starts: Vec<usize>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineMap { starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        self.starts.partition_point(|&start| start <= offset).max(1) as u32
    }

    /// 1-based `(line, column)` of `offset`.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let line = self.line_of(offset);
        let start = self.starts[line as usize - 1];
        (line, (offset - start) as u32 + 1)
    }

    /// Text of a 1-based line, without its newline.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.starts.get(idx)?;
        let end = match self.starts.get(idx + 1) {
            Some(next) => next - 1,
            None => source.len(),
        };
        source.get(start..end).map(|text| text.trim_end_matches('\r'))
    }

    pub fn line_count(&self) -> u32 {
        self.starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_has_one_line() {
        let lm = LineMap::new("");
        assert_eq!(lm.line_count(), 1);
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
    }

    #[test]
    fn offsets_map_across_lines() {
        let src = "globals\n  x = 1\nend";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 3);
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.offset_to_line_col(7), (1, 8)); // the '\n'
        assert_eq!(lm.offset_to_line_col(10), (2, 3)); // 'x'
        assert_eq!(lm.line_of(16), 3);
        assert_eq!(lm.line_text(src, 2), Some("  x = 1"));
        assert_eq!(lm.line_text(src, 3), Some("end"));
        assert_eq!(lm.line_text(src, 4), None);
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let src = "a\r\nb";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_text(src, 1), Some("a"));
        assert_eq!(lm.line_text(src, 2), Some("b"));
    }
}
