//! A single line of text and its display form.

/// One line of the buffer.
///
/// `chars` holds the bytes exactly as they are stored on disk (without the
/// line terminator). `render` is what gets drawn; it is rebuilt after every
/// change to `chars`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    pub fn new(content: &[u8]) -> Self {
        let mut row = Self {
            chars: content.to_vec(),
            render: Vec::new(),
        };
        row.update();
        row
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn size(&self) -> usize {
        self.chars.len()
    }

    pub fn rsize(&self) -> usize {
        self.render.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Insert `c` at `at`, appending when `at` is past the end.
    pub fn insert_char(&mut self, at: usize, c: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update();
    }

    /// Remove the byte at `at`. Returns `false` when `at` is out of range.
    pub fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update();
        true
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.chars.extend_from_slice(bytes);
        self.update();
    }

    /// Cut the row at `at` and return everything after it as a new row.
    pub fn split_off(&mut self, at: usize) -> Row {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update();
        Row::new(&tail)
    }

    // Identity for now; tab expansion would go here.
    fn update(&mut self) {
        self.render.clear();
        self.render.extend_from_slice(&self.chars);
    }
}
