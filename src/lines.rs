//! Line iteration over joined message text.

/// An iterator over the lines of a block of text, yielding each line's start
/// offset within the block together with the line itself, terminator
/// included.
///
/// Keeping the terminator attached means a line's end offset is always
/// `start + line.len()`, so the footer scanner can slice value spans straight
/// out of the block without re-counting.
pub(crate) struct LinesWithTerminator<'a> {
    block: &'a str,
    offset: usize,
}

impl<'a> LinesWithTerminator<'a> {
    pub(crate) fn new(block: &'a str) -> Self {
        Self { block, offset: 0 }
    }
}

impl<'a> Iterator for LinesWithTerminator<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.block[self.offset..];
        if rest.is_empty() {
            return None;
        }
        let start = self.offset;
        let line = match rest.find('\n') {
            Some(end) => &rest[..=end],
            None => rest,
        };
        self.offset += line.len();
        Some((start, line))
    }
}
