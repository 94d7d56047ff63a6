//! Off-screen cell surfaces.
//!
//! Every mapped widget owns a [`Surface`]. Containers composite their
//! children's surfaces into their own, and the window manager composites
//! window surfaces into the screen surface that a
//! [`Backend`](crate::Backend) finally pushes to the terminal.
//!
//! # Example
//!
//! ```
//! use tessera_render::{CellStyle, Point, Rect, Surface};
//!
//! let mut label = Surface::new(5, 1);
//! label.put_str(0, 0, "hello", CellStyle::default());
//!
//! let mut screen = Surface::new(10, 3);
//! screen.copy_from(&label, Rect::new(0, 0, 5, 1), Point::new(2, 1));
//! assert_eq!(screen.row_text(1), "  hello   ");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::cell::{Cell, CellStyle};
use crate::types::{Point, Rect, Size};

/// Box-drawing characters used by [`Surface::draw_border`].
const BORDER: [&str; 6] = ["\u{250c}", "\u{2510}", "\u{2514}", "\u{2518}", "\u{2500}", "\u{2502}"];

/// A rectangular grid of styled cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Surface {
    /// Create a blank surface. Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The surface's own bounds, at the origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && y >= 0 && x < self.width && y < self.height)
            .then(|| (y * self.width + x) as usize)
    }

    /// Get the cell at `(x, y)`.
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Resize, keeping the overlapping region.
    pub fn resize(&mut self, width: i32, height: i32) {
        if width == self.width && height == self.height {
            return;
        }
        let mut resized = Surface::new(width, height);
        resized.copy_from(self, self.bounds(), Point::ZERO);
        *self = resized;
    }

    /// Reset every cell to a blank with `style`.
    pub fn clear(&mut self, style: CellStyle) {
        self.cells.fill(Cell::blank(style));
    }

    /// Fill `rect` (clipped) with `symbol`.
    pub fn fill(&mut self, rect: Rect, symbol: &str, style: CellStyle) {
        let Some(area) = rect.intersect(&self.bounds()) else {
            return;
        };
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                self.put_char(x, y, symbol, style);
            }
        }
    }

    /// Write one grapheme at `(x, y)`. Returns `false` when clipped.
    pub fn put_char(&mut self, x: i32, y: i32, symbol: &str, style: CellStyle) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = Cell {
                    symbol: symbol.to_string(),
                    style,
                };
                true
            }
            None => false,
        }
    }

    /// Write a string starting at `(x, y)`, one grapheme per cell, clipped
    /// at the right edge. Returns the number of cells written.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: CellStyle) -> i32 {
        let mut written = 0;
        for (column, grapheme) in (x..).zip(text.graphemes(true)) {
            if column >= self.width {
                break;
            }
            if self.put_char(column, y, grapheme, style) {
                written += 1;
            }
        }
        written
    }

    /// Copy `source_rect` of `source` so that its top-left lands at `dest`.
    ///
    /// Both the source and destination sides are clipped.
    pub fn copy_from(&mut self, source: &Surface, source_rect: Rect, dest: Point) {
        let Some(src) = source_rect.intersect(&source.bounds()) else {
            return;
        };
        let dx = dest.x - source_rect.left();
        let dy = dest.y - source_rect.top();
        for y in src.top()..src.bottom() {
            for x in src.left()..src.right() {
                if let (Some(from), Some(to)) = (source.index(x, y), self.index(x + dx, y + dy)) {
                    self.cells[to] = source.cells[from].clone();
                }
            }
        }
    }

    /// Draw a single-line border around the whole surface.
    pub fn draw_border(&mut self, style: CellStyle) {
        if self.width < 2 || self.height < 2 {
            return;
        }
        let (right, bottom) = (self.width - 1, self.height - 1);
        for x in 1..right {
            self.put_char(x, 0, BORDER[4], style);
            self.put_char(x, bottom, BORDER[4], style);
        }
        for y in 1..bottom {
            self.put_char(0, y, BORDER[5], style);
            self.put_char(right, y, BORDER[5], style);
        }
        self.put_char(0, 0, BORDER[0], style);
        self.put_char(right, 0, BORDER[1], style);
        self.put_char(0, bottom, BORDER[2], style);
        self.put_char(right, bottom, BORDER[3], style);
    }

    /// The symbols of row `y` concatenated, or an empty string.
    pub fn row_text(&self, y: i32) -> String {
        if y < 0 || y >= self.height {
            return String::new();
        }
        (0..self.width)
            .filter_map(|x| self.cell(x, y))
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    /// Every row as text, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Color;

    #[test]
    fn test_negative_dimensions_are_empty() {
        let surface = Surface::new(-3, 4);
        assert_eq!(surface.size(), Size::new(0, 4));
        assert_eq!(surface.row_text(0), "");
    }

    #[test]
    fn test_put_str_clips_at_edge() {
        let mut surface = Surface::new(4, 1);
        assert_eq!(surface.put_str(2, 0, "abc", CellStyle::default()), 2);
        assert_eq!(surface.row_text(0), "  ab");
    }

    #[test]
    fn test_put_str_counts_graphemes() {
        let mut surface = Surface::new(4, 1);
        assert_eq!(surface.put_str(0, 0, "e\u{301}x", CellStyle::default()), 2);
        assert_eq!(surface.cell(0, 0).map(|c| c.symbol.as_str()), Some("e\u{301}"));
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut surface = Surface::new(3, 2);
        surface.put_str(0, 0, "xyz", CellStyle::default());
        surface.resize(2, 3);
        assert_eq!(surface.lines(), vec!["xy", "  ", "  "]);
    }

    #[test]
    fn test_copy_from_clips_negative_destination() {
        let mut source = Surface::new(3, 1);
        source.put_str(0, 0, "abc", CellStyle::default());
        let mut dest = Surface::new(3, 1);
        dest.copy_from(&source, source.bounds(), Point::new(-1, 0));
        assert_eq!(dest.row_text(0), "bc ");
    }

    #[test]
    fn test_draw_border() {
        let mut surface = Surface::new(3, 3);
        let style = CellStyle::new(Color::White, Color::Blue);
        surface.draw_border(style);
        assert_eq!(surface.lines(), vec!["\u{250c}\u{2500}\u{2510}", "\u{2502} \u{2502}", "\u{2514}\u{2500}\u{2518}"]);
        assert_eq!(surface.cell(0, 0).map(|c| c.style), Some(style));
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut surface = Surface::new(2, 2);
        surface.fill(Rect::new(1, 1, 5, 5), "#", CellStyle::default());
        assert_eq!(surface.lines(), vec!["  ", " #"]);
    }
}
