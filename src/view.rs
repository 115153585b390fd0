//! Cursor and viewport coordinates.

/// Cursor position. `cx` is a screen column and includes the gutter;
/// `cy` is a buffer row and may equal the row count (the row past the end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub cx: usize,
    pub cy: usize,
}

impl Cursor {
    pub const fn new(gutter: usize) -> Self {
        Self { cx: gutter, cy: 0 }
    }

    /// Byte offset inside the current row.
    pub const fn col(&self, gutter: usize) -> usize {
        self.cx.saturating_sub(gutter)
    }

    pub const fn at_line_start(&self, gutter: usize) -> bool {
        self.cx <= gutter
    }
}

/// The window of buffer rows currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rowoff: usize,
    pub screenrows: usize,
    pub screencols: usize,
    pub reserved_y: usize,
}

impl Viewport {
    pub const fn new(screenrows: usize, screencols: usize, reserved_y: usize) -> Self {
        Self {
            rowoff: 0,
            screenrows,
            screencols,
            reserved_y,
        }
    }

    /// Number of rows available for text.
    pub const fn text_rows(&self) -> usize {
        let rows = self.screenrows.saturating_sub(self.reserved_y);
        if rows == 0 {
            1
        } else {
            rows
        }
    }

    /// Adjust `rowoff` so `cursor_row` is visible.
    pub fn scroll(&mut self, cursor_row: usize) {
        if cursor_row < self.rowoff {
            self.rowoff = cursor_row;
        } else if cursor_row >= self.rowoff + self.text_rows() {
            self.rowoff = cursor_row + 1 - self.text_rows();
        }
    }

    pub const fn is_visible(&self, row: usize) -> bool {
        row >= self.rowoff && row < self.rowoff + self.text_rows()
    }
}
