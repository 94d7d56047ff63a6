//! The terminal backend boundary.
//!
//! The window manager composes a full-screen [`Surface`] and hands it to a
//! [`Backend`]. Two implementations ship with the crate: [`AnsiBackend`],
//! which writes SGR escape sequences to any `Write`, and [`MemoryBackend`],
//! which records frames for tests and headless runs.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cell::{CellStyle, Color};
use crate::error::RenderResult;
use crate::surface::Surface;
use crate::types::Size;

/// Something that can show a screen surface.
pub trait Backend {
    /// Current terminal size in cells.
    fn size(&self) -> Size;

    /// Push a complete frame to the terminal.
    fn present(&mut self, screen: &Surface) -> RenderResult<()>;
}

/// Writes frames as ANSI escape sequences.
pub struct AnsiBackend<W: Write> {
    out: W,
    size: Size,
}

impl<W: Write> AnsiBackend<W> {
    /// Create a backend for a terminal of `size` writing to `out`.
    pub fn new(out: W, size: Size) -> Self {
        Self { out, size }
    }

    /// Record a new terminal size (after `SIGWINCH`).
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Consume the backend and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn sgr(style: CellStyle) -> String {
        let mut codes = vec!["0".to_string()];
        if style.bold {
            codes.push("1".into());
        }
        if style.underline {
            codes.push("4".into());
        }
        if style.reverse {
            codes.push("7".into());
        }
        if let Some(i) = style.fg.ansi_index() {
            codes.push((30 + i).to_string());
        }
        if let Some(i) = style.bg.ansi_index() {
            codes.push((40 + i).to_string());
        }
        format!("\x1b[{}m", codes.join(";"))
    }
}

impl<W: Write> Backend for AnsiBackend<W> {
    fn size(&self) -> Size {
        self.size
    }

    fn present(&mut self, screen: &Surface) -> RenderResult<()> {
        let mut frame = String::from("\x1b[H");
        let mut current = None;
        for y in 0..screen.height() {
            frame.push_str(&format!("\x1b[{};1H", y + 1));
            for x in 0..screen.width() {
                let Some(cell) = screen.cell(x, y) else {
                    continue;
                };
                if current != Some(cell.style) {
                    frame.push_str(&Self::sgr(cell.style));
                    current = Some(cell.style);
                }
                frame.push_str(&cell.symbol);
            }
        }
        frame.push_str(&Self::sgr(CellStyle::new(Color::Default, Color::Default)));
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        tracing::trace!(target: "tessera::render", bytes = frame.len(), "frame written");
        Ok(())
    }
}

/// Records presented frames in memory.
///
/// Clones share the same frame log, so a test can keep one clone while the
/// runtime owns another.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    size: Size,
    frames: Arc<Mutex<Vec<Surface>>>,
}

impl MemoryBackend {
    /// Create a backend reporting `size`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            frames: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of frames presented so far.
    pub fn frame_count(&self) -> usize {
        self.frames.lock().len()
    }

    /// The most recent frame.
    pub fn last_frame(&self) -> Option<Surface> {
        self.frames.lock().last().cloned()
    }
}

impl Backend for MemoryBackend {
    fn size(&self) -> Size {
        self.size
    }

    fn present(&mut self, screen: &Surface) -> RenderResult<()> {
        self.frames.lock().push(screen.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_shares_frames() {
        let backend = MemoryBackend::new(Size::new(4, 1));
        let mut presenter = backend.clone();
        let mut screen = Surface::new(4, 1);
        screen.put_str(0, 0, "ok", CellStyle::default());
        presenter.present(&screen).unwrap();

        assert_eq!(backend.frame_count(), 1);
        assert_eq!(backend.last_frame().map(|f| f.row_text(0)), Some("ok  ".to_string()));
    }

    #[test]
    fn test_ansi_backend_emits_colors() {
        let mut backend = AnsiBackend::new(Vec::new(), Size::new(2, 1));
        let mut screen = Surface::new(2, 1);
        screen.put_str(0, 0, "hi", CellStyle::new(Color::Red, Color::Blue).bold());
        backend.present(&screen).unwrap();

        let text = String::from_utf8(backend.into_inner()).unwrap();
        assert!(text.contains("\x1b[0;1;31;44mhi"));
        assert!(text.ends_with("\x1b[0m"));
    }
}
