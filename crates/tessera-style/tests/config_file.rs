//! Loading configuration from disk.

use std::io::Write;

use tessera_style::{ColorRole, Error, StyleConfig};

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[general]\nmouse = false\n\n[colors]\nurgent = red; black\n\n[WM::binding]\nwindow-next = a-j\n\n[Workspace-1]\nname = chat\nwindow-titles = Chat; IRC"
    )
    .unwrap();

    let config = StyleConfig::from_file(file.path()).unwrap();
    assert!(!config.general().mouse);
    assert_eq!(config.style(ColorRole::Urgent).fg, tessera_render::Color::Red);
    assert_eq!(config.actions_for("WM").bindings[0].trigger, "a-j");
    assert_eq!(config.workspaces()[0].window_titles, vec!["Chat", "IRC"]);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.ini");
    match StyleConfig::from_file(&path) {
        Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
