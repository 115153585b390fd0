//! A small terminal line editor.
//!
//! The file is held as a list of byte rows ([`Buffer`]). Each keystroke is
//! decoded ([`KeyDecoder`]), turned into a [`Command`], applied to the
//! [`EditorState`], and the screen is redrawn as a single frame.

pub mod buffer;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod render;
pub mod row;
pub mod terminal;
pub mod view;

pub use buffer::Buffer;
pub use command::{Command, Motion};
pub use config::{EditorConfig, KeyBindings};
pub use editor::{Editor, EditorState, Flow};
pub use error::EditorError;
pub use event::{Key, KeyDecoder};
pub use row::Row;
pub use view::{Cursor, Viewport};
