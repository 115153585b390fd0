//! Builds a whole screen update in memory so it reaches the terminal in one
//! write.

use std::io;

use crossterm::{
    cursor, queue,
    style::{Attribute, SetAttribute},
    terminal::{Clear, ClearType},
};

use crate::editor::EditorState;

const WELCOME: &str = concat!("rowedit -- version ", env!("CARGO_PKG_VERSION"));

/// Render the complete frame for `state`.
pub fn draw(state: &EditorState) -> io::Result<Vec<u8>> {
    let mut frame = Vec::with_capacity(state.viewport.screencols * state.viewport.screenrows * 2);

    queue!(frame, cursor::Hide, cursor::MoveTo(0, 0))?;
    draw_rows(&mut frame, state)?;
    draw_status_bar(&mut frame, state)?;
    draw_message_bar(&mut frame, state)?;

    let view = &state.viewport;
    let x = to_u16(state.cursor.cx);
    let y = to_u16(state.cursor.cy.saturating_sub(view.rowoff));
    queue!(frame, cursor::MoveTo(x, y), cursor::Show)?;

    Ok(frame)
}

fn draw_rows(frame: &mut Vec<u8>, state: &EditorState) -> io::Result<()> {
    let view = &state.viewport;
    let config = &state.config;
    let text_cols = view.screencols.saturating_sub(config.gutter());

    for y in 0..view.text_rows() {
        let filerow = view.rowoff + y;

        match state.buffer.row(filerow) {
            Some(row) => {
                let number = format!(
                    "{:>width$}{:indent$}",
                    filerow + 1,
                    "",
                    width = config.reserved_x,
                    indent = config.indent_x
                );
                frame.extend_from_slice(number.as_bytes());
                let render = row.render();
                frame.extend_from_slice(&render[..render.len().min(text_cols)]);
            }
            None if state.buffer.is_empty() && y == view.text_rows() / 3 => {
                let len = WELCOME.len().min(view.screencols);
                let padding = (view.screencols - len) / 2;
                if padding > 0 {
                    frame.push(b'~');
                    frame.resize(frame.len() + padding - 1, b' ');
                }
                frame.extend_from_slice(&WELCOME.as_bytes()[..len]);
            }
            None => frame.push(b'~'),
        }

        queue!(frame, Clear(ClearType::UntilNewLine))?;
        frame.extend_from_slice(b"\r\n");
    }

    Ok(())
}

fn draw_status_bar(frame: &mut Vec<u8>, state: &EditorState) -> io::Result<()> {
    let cols = state.viewport.screencols;
    let name = state
        .filename()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "[No Name]".into());
    let name: String = name.chars().take(20).collect();
    let modified = if state.dirty > 0 { " (modified)" } else { "" };

    let mut status = format!(
        "{name}{modified} - {} lines. Cy: {}, Cx: {}",
        state.buffer.len(),
        state.cursor.cy,
        state.cursor.cx
    )
    .into_bytes();
    let rstatus = format!("{}/{}", state.cursor.cy + 1, state.buffer.len());

    status.truncate(cols);
    queue!(frame, SetAttribute(Attribute::Reverse))?;
    frame.extend_from_slice(&status);

    let mut len = status.len();
    while len < cols {
        if cols - len == rstatus.len() {
            frame.extend_from_slice(rstatus.as_bytes());
            break;
        }
        frame.push(b' ');
        len += 1;
    }

    queue!(frame, SetAttribute(Attribute::Reset))?;
    frame.extend_from_slice(b"\r\n");
    Ok(())
}

fn draw_message_bar(frame: &mut Vec<u8>, state: &EditorState) -> io::Result<()> {
    let cols = state.viewport.screencols;
    let msg = state.status().as_bytes();
    let msg = &msg[..msg.len().min(cols)];

    queue!(
        frame,
        SetAttribute(Attribute::Reverse),
        Clear(ClearType::UntilNewLine)
    )?;
    frame.extend_from_slice(msg);
    frame.resize(frame.len() + (cols - msg.len()), b' ');
    queue!(frame, SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
