use std::{fs, io::Cursor};

use rowedit::{event::ctrl, Buffer, Editor, EditorConfig, EditorState};

fn editor_state(buffer: Buffer, path: Option<std::path::PathBuf>) -> EditorState {
    let mut state = EditorState::new(EditorConfig::default(), 10, 40);
    state.load(buffer, path);
    state
}

#[test]
fn save_then_reopen_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");

    let buffer = Buffer::from_lines(["first", "", "  third line", "last"]);
    let written = buffer.save(&path).unwrap();
    assert_eq!(written, 25);
    assert_eq!(fs::read(&path).unwrap(), b"first\n\n  third line\nlast\n");

    let reopened = Buffer::open(&path).unwrap();
    assert_eq!(reopened.len(), 4);
    assert_eq!(reopened, buffer);
}

#[test]
fn save_truncates_longer_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.txt");
    fs::write(&path, "a much longer previous content\nwith two lines\n").unwrap();

    Buffer::from_lines(["hi"]).save(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"hi\n");
}

#[cfg(unix)]
#[test]
fn save_creates_file_with_0644() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");
    Buffer::from_lines(["x"]).save(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    // The process umask may clear bits but never add them.
    assert_eq!(mode & !0o644, 0);
    assert_ne!(mode & 0o600, 0);
}

#[test]
fn reopen_strips_crlf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dos.txt");
    fs::write(&path, b"one\r\ntwo\r\n").unwrap();

    let buffer = Buffer::open(&path).unwrap();
    assert_eq!(buffer.row(0).unwrap().chars(), b"one");
    assert_eq!(buffer.row(1).unwrap().chars(), b"two");
    assert_eq!(buffer.serialize(), b"one\ntwo\n");
}

#[test]
fn ctrl_s_writes_bound_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    fs::write(&path, "world\n").unwrap();

    let state = editor_state(Buffer::open(&path).unwrap(), Some(path.clone()));
    let mut input = b"hello ".to_vec();
    input.push(ctrl(b's'));
    let mut editor = Editor::new(state, Cursor::new(input), Vec::new());
    for _ in 0..7 {
        editor.step().unwrap();
    }

    assert_eq!(fs::read(&path).unwrap(), b"hello world\n");
    assert_eq!(editor.state().dirty, 0);
    assert_eq!(editor.state().status(), "12 bytes written to disk");
}

#[test]
fn ctrl_s_prompts_for_missing_filename() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prompted.txt");

    let state = editor_state(Buffer::new(), None);
    let mut input = b"x".to_vec();
    input.push(ctrl(b's'));
    input.extend_from_slice(path.to_str().unwrap().as_bytes());
    input.push(b'\r');
    let mut editor = Editor::new(state, Cursor::new(input), Vec::new());
    editor.step().unwrap();
    editor.step().unwrap();

    assert_eq!(editor.state().filename(), Some(path.as_path()));
    assert_eq!(fs::read(&path).unwrap(), b"x\n");
}

#[test]
fn save_prompt_escape_aborts() {
    let state = editor_state(Buffer::from_lines(["a"]), None);
    let input = vec![ctrl(b's'), b'f', 0x1b];
    let mut editor = Editor::new(state, Cursor::new(input), Vec::new());
    editor.step().unwrap();

    assert!(editor.state().filename().is_none());
    assert_eq!(editor.state().status(), "Save aborted");
}
