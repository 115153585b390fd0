use crate::{config::KeyBindings, event::Key};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    Insert(u8),
    BackSpace,
    Enter,
    Move(Motion),
    Save,
    GotoLine,
    Quit,
}

impl Command {
    /// Map a key to the command it triggers, if any.
    pub fn parse(key: Key, bindings: &KeyBindings) -> Option<Command> {
        match key {
            Key::Char(c) => Some(Command::Insert(c)),
            Key::Ctrl(b'\t') => Some(Command::Insert(b'\t')),
            Key::Ctrl(c) if c == bindings.save => Some(Command::Save),
            Key::Ctrl(c) if c == bindings.quit => Some(Command::Quit),
            Key::Ctrl(c) if c == bindings.goto_line => Some(Command::GotoLine),
            Key::Ctrl(_) | Key::Escape => None,
            Key::Backspace => Some(Command::BackSpace),
            Key::Enter => Some(Command::Enter),
            Key::Up => Some(Command::Move(Motion::Up)),
            Key::Down => Some(Command::Move(Motion::Down)),
            Key::Left => Some(Command::Move(Motion::Left)),
            Key::Right => Some(Command::Move(Motion::Right)),
        }
    }
}
