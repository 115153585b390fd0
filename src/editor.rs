use crate::{
    buffer::Buffer,
    command::{Command, Motion},
    config::EditorConfig,
    error::{EditorError, Result as EditorResult},
    event::{Key, KeyDecoder},
    render,
    view::{Cursor, Viewport},
};

use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};

/// How long a status message stays on screen.
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything a session mutates: buffer, cursor, viewport and status line.
///
/// One instance is built at startup and owned by the [`Editor`] loop; the
/// render step only ever borrows it.
#[derive(Debug)]
pub struct EditorState {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub viewport: Viewport,
    pub config: EditorConfig,
    pub filename: Option<PathBuf>,
    /// Number of edits since the last save.
    pub dirty: usize,
    status: String,
    status_time: Instant,
}

impl EditorState {
    pub fn new(config: EditorConfig, screenrows: usize, screencols: usize) -> Self {
        Self {
            buffer: Buffer::new(),
            cursor: Cursor::new(config.gutter()),
            viewport: Viewport::new(screenrows, screencols, config.reserved_y),
            config,
            filename: None,
            dirty: 0,
            status: String::new(),
            status_time: Instant::now(),
        }
    }

    /// Replace the buffer and reset cursor and scroll position.
    pub fn load(&mut self, buffer: Buffer, filename: Option<PathBuf>) {
        self.buffer = buffer;
        self.filename = filename;
        self.cursor = Cursor::new(self.gutter());
        self.viewport.rowoff = 0;
        self.dirty = 0;
    }

    pub fn gutter(&self) -> usize {
        self.config.gutter()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_time = Instant::now();
    }

    /// The status message, or `""` once it has expired.
    pub fn status(&self) -> &str {
        if self.status_time.elapsed() < STATUS_TIMEOUT {
            &self.status
        } else {
            ""
        }
    }

    fn col(&self) -> usize {
        self.cursor.col(self.gutter())
    }

    fn at_line_start(&self) -> bool {
        self.cursor.at_line_start(self.gutter())
    }

    pub fn scroll(&mut self) {
        self.viewport.scroll(self.cursor.cy);
    }

    pub fn insert_char(&mut self, c: u8) {
        if self.cursor.cy == self.buffer.len() {
            self.buffer.insert_row(self.cursor.cy, b"");
        }
        let col = self.col();
        if self.buffer.insert_char(self.cursor.cy, col, c) {
            self.cursor.cx += 1;
            self.dirty += 1;
        }
    }

    pub fn backspace(&mut self) {
        let cy = self.cursor.cy;

        if cy == self.buffer.len() {
            // Nothing to delete on the row past the end; just step back.
            if cy > 0 {
                self.cursor.cy -= 1;
                self.cursor.cx = self.gutter() + self.buffer.row_size(self.cursor.cy);
            }
            return;
        }

        if !self.at_line_start() {
            if self.buffer.delete_char(cy, self.col() - 1) {
                self.cursor.cx -= 1;
                self.dirty += 1;
            }
            return;
        }

        if cy > 0 {
            let join_at = self.buffer.row_size(cy - 1);
            if self.buffer.join_with_previous(cy) {
                self.cursor.cy -= 1;
                self.cursor.cx = self.gutter() + join_at;
                self.dirty += 1;
            }
        }
    }

    pub fn enter(&mut self) {
        let cy = self.cursor.cy;
        let changed = if self.at_line_start() || cy == self.buffer.len() {
            self.buffer.insert_row(cy, b"")
        } else {
            self.buffer.split_row_at(cy, self.col())
        };

        if changed {
            self.cursor.cy += 1;
            self.cursor.cx = self.gutter();
            self.dirty += 1;
        }
    }

    pub fn move_cursor(&mut self, motion: Motion) {
        let gutter = self.gutter();
        let rows = self.buffer.len();

        match motion {
            Motion::Left => {
                if !self.at_line_start() {
                    self.cursor.cx -= 1;
                } else if self.cursor.cy > 0 {
                    self.cursor.cy -= 1;
                    self.cursor.cx = gutter + self.buffer.row_size(self.cursor.cy);
                }
            }
            Motion::Right => {
                if self.cursor.cy < rows {
                    if self.col() < self.buffer.row_size(self.cursor.cy) {
                        self.cursor.cx += 1;
                    } else {
                        self.cursor.cy += 1;
                        self.cursor.cx = gutter;
                    }
                }
            }
            Motion::Up => {
                self.cursor.cy = self.cursor.cy.saturating_sub(1);
            }
            Motion::Down => {
                if self.cursor.cy < rows {
                    self.cursor.cy += 1;
                }
            }
        }

        // Don't leave the cursor past the end of a shorter row.
        let end = gutter + self.buffer.row_size(self.cursor.cy);
        self.cursor.cx = self.cursor.cx.clamp(gutter, end);
    }

    /// Jump to the 1-based line number in `input`.
    ///
    /// Returns `false` and leaves everything but the status message alone
    /// when the input does not name an existing row.
    pub fn goto_line(&mut self, input: &str) -> bool {
        let target = input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&row| row < self.buffer.len());

        match target {
            Some(row) => {
                self.cursor.cy = row;
                self.cursor.cx = self.gutter();
                self.viewport.rowoff = row;
                true
            }
            None => {
                self.set_status(format!("Invalid line number: {}", input.trim()));
                false
            }
        }
    }

    /// Write the buffer to the bound filename.
    pub fn save(&mut self) -> EditorResult<usize> {
        let path = self.filename.as_deref().ok_or(EditorError::NoFilename)?;
        let written = self.buffer.save(path)?;
        self.dirty = 0;
        Ok(written)
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Quit,
}

/// The read → dispatch → render loop over a key source and a terminal sink.
pub struct Editor<R, W> {
    state: EditorState,
    keys: KeyDecoder<R>,
    out: W,
}

impl<R: Read, W: Write> Editor<R, W> {
    pub fn new(state: EditorState, input: R, output: W) -> Self {
        Self {
            state,
            keys: KeyDecoder::new(input),
            out: output,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.refresh()?;
            if self.step()? == Flow::Quit {
                break;
            }
        }

        queue!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        self.out.flush()?;
        Ok(())
    }

    /// Read one key and apply it.
    pub fn step(&mut self) -> anyhow::Result<Flow> {
        let key = self.keys.read_key()?;
        self.handle_key(key)
    }

    pub fn handle_key(&mut self, key: Key) -> anyhow::Result<Flow> {
        let Some(command) = Command::parse(key, &self.state.config.bindings) else {
            return Ok(Flow::Continue);
        };
        tracing::trace!(target: "editor", ?command, "dispatch");

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Insert(c) => self.state.insert_char(c),
            Command::BackSpace => self.state.backspace(),
            Command::Enter => self.state.enter(),
            Command::Move(motion) => self.state.move_cursor(motion),
            Command::Save => self.handle_save()?,
            Command::GotoLine => self.handle_goto_line()?,
        }

        Ok(Flow::Continue)
    }

    /// Scroll and draw one frame with a single write.
    pub fn refresh(&mut self) -> anyhow::Result<()> {
        self.state.scroll();
        let frame = render::draw(&self.state)?;
        self.out.write_all(&frame)?;
        self.out.flush()?;
        Ok(())
    }

    /// Read a line of input in the message bar.
    ///
    /// Returns `None` when the user cancels with Escape.
    pub fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        let mut input = String::new();

        loop {
            self.state.set_status(format!("{label}{input}"));
            self.refresh()?;

            match self.keys.read_key()? {
                Key::Escape => {
                    self.state.set_status("");
                    return Ok(None);
                }
                Key::Enter if !input.is_empty() => {
                    self.state.set_status("");
                    return Ok(Some(input));
                }
                Key::Backspace => {
                    input.pop();
                }
                Key::Char(c) if c.is_ascii() => input.push(char::from(c)),
                _ => {}
            }
        }
    }

    fn handle_save(&mut self) -> anyhow::Result<()> {
        if self.state.filename.is_none() {
            match self.prompt("Save as: ")? {
                Some(name) => self.state.filename = Some(PathBuf::from(name)),
                None => {
                    self.state.set_status("Save aborted");
                    return Ok(());
                }
            }
        }

        match self.state.save() {
            Ok(written) => self
                .state
                .set_status(format!("{written} bytes written to disk")),
            Err(e) => {
                tracing::warn!(target: "io", error = %e, "save_failed");
                self.state.set_status(format!("Can't save! {e}"));
            }
        }

        Ok(())
    }

    fn handle_goto_line(&mut self) -> anyhow::Result<()> {
        if let Some(input) = self.prompt("Go to line: ")? {
            self.state.goto_line(&input);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ctrl;
    use std::io::Cursor as Input;

    fn state_with(lines: &[&str]) -> EditorState {
        let mut state = EditorState::new(EditorConfig::default(), 12, 40);
        state.load(Buffer::from_lines(lines), None);
        state
    }

    fn text(state: &EditorState) -> String {
        String::from_utf8(state.buffer.serialize()).unwrap()
    }

    fn col(state: &EditorState) -> usize {
        state.cursor.col(state.gutter())
    }

    #[test]
    fn test_insert_on_virtual_row_creates_row() {
        let mut state = state_with(&[]);
        assert_eq!(state.buffer.len(), 0);
        state.insert_char(b'x');
        assert_eq!(state.buffer.len(), 1);
        assert_eq!(text(&state), "x\n");
        assert_eq!(col(&state), 1);
    }

    #[test]
    fn test_insert_past_last_row() {
        let mut state = state_with(&["a", "b"]);
        state.cursor.cy = 2;
        state.insert_char(b'x');
        assert_eq!(state.buffer.len(), 3);
        assert_eq!(text(&state), "a\nb\nx\n");
    }

    #[test]
    fn test_backspace_deletes_previous_char() {
        let mut state = state_with(&["abc"]);
        state.cursor.cx = state.gutter() + 2;
        state.backspace();
        assert_eq!(text(&state), "ac\n");
        assert_eq!(col(&state), 1);
        assert_eq!(state.dirty, 1);
    }

    #[test]
    fn test_backspace_at_line_start_joins() {
        let mut state = state_with(&["foo", "bar"]);
        state.cursor.cy = 1;
        state.backspace();
        assert_eq!(text(&state), "foobar\n");
        assert_eq!(state.cursor.cy, 0);
        assert_eq!(col(&state), 3);
    }

    #[test]
    fn test_backspace_at_top_left_is_noop() {
        let mut state = state_with(&["foo"]);
        state.backspace();
        assert_eq!(text(&state), "foo\n");
        assert_eq!(state.dirty, 0);
    }

    #[test]
    fn test_enter_splits_row() {
        let mut state = state_with(&["hello"]);
        state.cursor.cx = state.gutter() + 2;
        state.enter();
        assert_eq!(text(&state), "he\nllo\n");
        assert_eq!(state.cursor.cy, 1);
        assert_eq!(col(&state), 0);
    }

    #[test]
    fn test_enter_at_line_start_opens_row_above() {
        let mut state = state_with(&["hello"]);
        state.enter();
        assert_eq!(text(&state), "\nhello\n");
        assert_eq!(state.cursor.cy, 1);
    }

    #[test]
    fn test_left_wraps_to_previous_row() {
        let mut state = state_with(&["abc", "de"]);
        state.cursor.cy = 1;
        state.move_cursor(Motion::Left);
        assert_eq!(state.cursor.cy, 0);
        assert_eq!(col(&state), 3);
    }

    #[test]
    fn test_right_wraps_to_next_row() {
        let mut state = state_with(&["ab", "cd"]);
        state.cursor.cx = state.gutter() + 2;
        state.move_cursor(Motion::Right);
        assert_eq!(state.cursor.cy, 1);
        assert_eq!(col(&state), 0);
    }

    #[test]
    fn test_vertical_motion_clamps_to_buffer() {
        let mut state = state_with(&["long line", "x"]);
        state.move_cursor(Motion::Up);
        assert_eq!(state.cursor.cy, 0);
        for _ in 0..5 {
            state.move_cursor(Motion::Down);
        }
        assert_eq!(state.cursor.cy, 2);

        state.cursor.cy = 0;
        state.cursor.cx = state.gutter() + 9;
        state.move_cursor(Motion::Down);
        assert_eq!(col(&state), 1);
    }

    #[test]
    fn test_goto_line() {
        let lines: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut state = state_with(&refs);
        assert!(state.goto_line("20"));
        assert_eq!(state.cursor.cy, 19);
        assert_eq!(state.viewport.rowoff, 19);
    }

    #[test]
    fn test_goto_line_out_of_range() {
        let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut state = state_with(&refs);
        state.cursor.cy = 3;
        let before = state.buffer.clone();

        for bad in ["50", "0", "11", "abc"] {
            assert!(!state.goto_line(bad));
            assert_eq!(state.cursor.cy, 3);
            assert_eq!(state.viewport.rowoff, 0);
        }
        assert_eq!(state.buffer, before);
        assert_eq!(state.status(), "Invalid line number: abc");
    }

    #[test]
    fn test_save_without_filename() {
        let mut state = state_with(&["a"]);
        assert!(matches!(state.save(), Err(EditorError::NoFilename)));
    }

    #[test]
    fn test_typing_through_editor() {
        let state = state_with(&[]);
        let input = Input::new(b"hi\rthere\x1b[A\x1b[D\x7f".to_vec());
        let mut editor = Editor::new(state, input, Vec::new());
        while editor.step().is_ok() {}
        assert_eq!(text(editor.state()), "i\nthere\n");
    }

    #[test]
    fn test_quit_stops_run() {
        let state = state_with(&["a"]);
        let input = Input::new(vec![b'z', ctrl(b'e'), b'q']);
        let mut editor = Editor::new(state, input, Vec::new());
        editor.run().unwrap();
        assert_eq!(text(editor.state()), "za\n");

        let out = editor.into_output();
        assert!(out.ends_with(b"\x1b[2J\x1b[1;1H"));
    }

    #[test]
    fn test_goto_prompt_out_of_range() {
        let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let state = state_with(&refs);
        let mut input = vec![ctrl(b'l')];
        input.extend_from_slice(b"50\r");
        let mut editor = Editor::new(state, Input::new(input), Vec::new());
        editor.step().unwrap();
        assert_eq!(editor.state().cursor.cy, 0);
        assert_eq!(editor.state().viewport.rowoff, 0);
        assert_eq!(editor.state().status(), "Invalid line number: 50");
    }

    #[test]
    fn test_goto_prompt_escape_cancels() {
        let state = state_with(&["a", "b"]);
        let input = vec![ctrl(b'l'), b'2', 0x1b];
        let mut editor = Editor::new(state, Input::new(input), Vec::new());
        editor.step().unwrap();
        assert_eq!(editor.state().cursor.cy, 0);
        assert_eq!(editor.state().status(), "");
    }
}
