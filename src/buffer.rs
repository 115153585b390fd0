use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, ErrorKind, Write},
    path::Path,
};

use crate::{
    error::{EditorError, Result},
    row::Row,
};

/// Ordered rows of the file being edited.
///
/// Index arguments are never fatal: a column past the end of a row clamps or
/// is ignored and a row index out of range is a no-op. Every mutation
/// reports whether it changed anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    rows: Vec<Row>,
}

impl Buffer {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        Self {
            rows: lines.into_iter().map(|l| Row::new(l.as_ref())).collect(),
        }
    }

    /// Read rows from `reader`, one per line, dropping trailing `\r`/`\n`.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut buffer = Self::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            buffer.rows.push(Row::new(&line));
        }

        Ok(buffer)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => EditorError::FileNotFound(path.to_path_buf()),
            _ => EditorError::Io(e),
        })?;

        let buffer = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(target: "io", file = %path.display(), rows = buffer.len(), "file_read_ok");
        Ok(buffer)
    }

    /// Overwrite `path` with the serialized buffer. Returns the byte count.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let bytes = self.serialize();

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(path)?;
        file.write_all(&bytes)?;
        file.flush()?;

        tracing::info!(target: "io", file = %path.display(), size_bytes = bytes.len(), "file_saved");
        Ok(bytes.len())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_size(&self, at: usize) -> usize {
        self.rows.get(at).map(Row::size).unwrap_or(0)
    }

    /// Insert a new row at `at`, shifting the rows after it down.
    pub fn insert_row(&mut self, at: usize, content: &[u8]) -> bool {
        if at > self.rows.len() {
            tracing::trace!(target: "buffer", at, rows = self.rows.len(), "insert_row_ignored");
            return false;
        }
        self.rows.insert(at, Row::new(content));
        true
    }

    /// Break row `at` at column `col`; the tail becomes the next row.
    pub fn split_row_at(&mut self, at: usize, col: usize) -> bool {
        let Some(row) = self.rows.get_mut(at) else {
            tracing::trace!(target: "buffer", at, "split_row_ignored");
            return false;
        };
        let tail = row.split_off(col);
        self.rows.insert(at + 1, tail);
        true
    }

    /// Append row `at` to the row above it and remove it.
    pub fn join_with_previous(&mut self, at: usize) -> bool {
        if at == 0 || at >= self.rows.len() {
            tracing::trace!(target: "buffer", at, "join_ignored");
            return false;
        }
        let row = self.rows.remove(at);
        self.rows[at - 1].append(row.chars());
        true
    }

    pub fn insert_char(&mut self, at: usize, col: usize, c: u8) -> bool {
        match self.rows.get_mut(at) {
            Some(row) => {
                row.insert_char(col, c);
                true
            }
            None => {
                tracing::trace!(target: "buffer", at, "insert_char_ignored");
                false
            }
        }
    }

    pub fn delete_char(&mut self, at: usize, col: usize) -> bool {
        self.rows
            .get_mut(at)
            .map(|row| row.delete_char(col))
            .unwrap_or(false)
    }

    /// Every row followed by exactly one `\n`, the last one included.
    pub fn serialize(&self) -> Vec<u8> {
        let total = self.rows.iter().map(|r| r.size() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }
}
