//! Static text.

use tessera_style::ColorRole;
use unicode_segmentation::UnicodeSegmentation;

use super::flags::WidgetFlags;
use super::traits::Widget;
use super::tree::WidgetTree;
use super::WidgetId;

/// A text leaf. Its natural size is the longest line by the line count.
#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
}

impl Label {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Call [`WidgetTree::readjust`] to re-layout.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn natural_size(&self) -> (i32, i32) {
        let width = self
            .text
            .lines()
            .map(|line| line.graphemes(true).count())
            .max()
            .unwrap_or(0);
        let height = self.text.lines().count();
        (width.max(1) as i32, height.max(1) as i32)
    }
}

impl Widget for Label {
    fn default_flags(&self) -> WidgetFlags {
        WidgetFlags::GROW_X | WidgetFlags::NO_BORDER
    }

    fn measure(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let (width, height) = self.natural_size();
        tree.force_size(id, width, height);
    }

    fn draw(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let style = tree.style(ColorRole::Text);
        if let Some(surface) = tree.surface_mut(id) {
            surface.clear(style);
            for (row, line) in self.text.lines().enumerate() {
                surface.put_str(0, row as i32, line, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_size_uses_longest_line() {
        assert_eq!(Label::new("ab\nabcd\nx").natural_size(), (4, 3));
        assert_eq!(Label::new("").natural_size(), (1, 1));
        assert_eq!(Label::new("héllo").natural_size(), (5, 1));
    }
}
