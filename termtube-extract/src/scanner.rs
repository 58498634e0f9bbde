/// Forward-only cursor over an immutable page.
///
/// Every slice goes through `str::get`, so a marker that lands past the end
/// or inside a multibyte character yields `None` instead of panicking.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, cursor: 0 }
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Absolute offset of the next `needle` at or after the cursor.
    pub(crate) fn find(&self, needle: &str) -> Option<usize> {
        self.text
            .get(self.cursor..)?
            .find(needle)
            .map(|i| self.cursor + i)
    }

    /// Move the cursor to `pos`, clamped to the end and rounded up to a
    /// char boundary.
    pub(crate) fn seek(&mut self, pos: usize) {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos += 1;
        }
        self.cursor = pos;
    }

    /// Find `needle` and park the cursor right after it.
    pub(crate) fn skip_past(&mut self, needle: &str) -> Option<()> {
        let at = self.find(needle)?;
        self.seek(at + needle.len());
        Some(())
    }

    /// Take exactly `len` bytes and advance past them.
    pub(crate) fn take(&mut self, len: usize) -> Option<&'a str> {
        let end = self.cursor.checked_add(len)?;
        let out = self.text.get(self.cursor..end)?;
        self.cursor = end;
        Some(out)
    }

    /// Text from the cursor up to (not including) the next `delim`.
    /// The cursor does not move.
    pub(crate) fn until(&self, delim: char) -> Option<&'a str> {
        let rest = self.text.get(self.cursor..)?;
        rest.find(delim).map(|end| &rest[..end])
    }
}
