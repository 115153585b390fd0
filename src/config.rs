use crate::event::ctrl;

/// Which control-masked bytes trigger the editor commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub save: u8,
    pub quit: u8,
    pub goto_line: u8,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            save: ctrl(b's'),
            quit: ctrl(b'e'),
            goto_line: ctrl(b'l'),
        }
    }
}

/// Layout and binding settings fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Width of the line number field on the left.
    pub reserved_x: usize,
    /// Separator columns between the line number and the text.
    pub indent_x: usize,
    /// Rows at the bottom of the screen kept for the status and message bars.
    pub reserved_y: usize,
    pub bindings: KeyBindings,
    pub help_message: String,
}

impl EditorConfig {
    /// Screen column of the first byte of a row.
    pub const fn gutter(&self) -> usize {
        self.reserved_x + self.indent_x
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            reserved_x: 4,
            indent_x: 1,
            reserved_y: 2,
            bindings: KeyBindings::default(),
            help_message: "HELP: Ctrl-S = save | Ctrl-E = quit | Ctrl-L = goto line".into(),
        }
    }
}
