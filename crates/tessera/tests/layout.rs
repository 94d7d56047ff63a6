//! Box layout and focus-chain properties.

use proptest::prelude::*;
use tessera::Toolkit;
use tessera::widget::{FocusDirection, Widget, WidgetFlags, WidgetId, WidgetTree};

/// A leaf with a fixed natural size that accepts any size.
struct Block {
    width: i32,
    height: i32,
    focusable: bool,
}

impl Widget for Block {
    fn default_flags(&self) -> WidgetFlags {
        let mut flags = WidgetFlags::GROW_X | WidgetFlags::GROW_Y | WidgetFlags::NO_BORDER;
        if self.focusable {
            flags.insert(WidgetFlags::CAN_TAKE_FOCUS);
        }
        flags
    }

    fn measure(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        tree.force_size(id, self.width, self.height);
    }
}

fn block(tree: &mut WidgetTree, width: i32, height: i32, focusable: bool) -> WidgetId {
    let kind = match tree.kinds().kind_id("Block") {
        Some(kind) => kind,
        None => {
            let parent = tree.builtin_kinds().widget;
            tree.register_kind("Block", Some(parent), |_| {}).unwrap()
        }
    };
    tree.insert(
        kind,
        Block {
            width,
            height,
            focusable,
        },
    )
    .unwrap()
}

#[test]
fn test_vertical_box_stacks_children_with_padding() {
    let mut tree = WidgetTree::new(Toolkit::default());
    let vbox = tree.new_box(true, false);
    tree.box_mut(vbox).unwrap().set_pad(1);
    for text in ["a\nb\nc", "abcd\ne\nf\ng", "a\nb\nc\nd\ne"] {
        let label = tree.new_label(text);
        tree.add_widget(vbox, label).unwrap();
    }
    tree.measure(vbox);

    let size = tree.base(vbox).unwrap().size();
    assert_eq!(size.height, 14);
    assert_eq!(size.width, 4);

    let tops: Vec<i32> = tree
        .children(vbox)
        .iter()
        .map(|&child| tree.base(child).unwrap().position().y)
        .collect();
    assert_eq!(tops, [0, 4, 9]);
}

#[test]
fn test_horizontal_box_with_border_and_title() {
    let mut tree = WidgetTree::new(Toolkit::default());
    let hbox = tree.new_box(false, false);
    tree.set_flag(hbox, WidgetFlags::NO_BORDER, false);
    tree.box_mut(hbox).unwrap().set_title(Some("A rather long title"));
    let left = block(&mut tree, 2, 1, false);
    let right = block(&mut tree, 3, 2, false);
    tree.add_widget(hbox, left).unwrap();
    tree.add_widget(hbox, right).unwrap();
    tree.measure(hbox);

    let size = tree.base(hbox).unwrap().size();
    assert_eq!(size.width, "A rather long title".len() as i32 + 4);
    assert_eq!(size.height, 2 + 2);
}

#[test]
fn test_readjust_after_removal_shrinks_box() {
    let mut tree = WidgetTree::new(Toolkit::default());
    let vbox = tree.new_box(true, false);
    let first = block(&mut tree, 4, 2, false);
    let second = block(&mut tree, 6, 3, false);
    tree.add_widget(vbox, first).unwrap();
    tree.add_widget(vbox, second).unwrap();
    tree.map(vbox);
    assert_eq!(tree.base(vbox).unwrap().size().height, 5);

    assert!(tree.remove_widget(vbox, second));
    assert_eq!(tree.base(vbox).unwrap().size().height, 2);
    assert_eq!(tree.base(vbox).unwrap().size().width, 4);
    assert!(tree.contains(second));
}

proptest! {
    #[test]
    fn confirming_the_current_size_always_succeeds(
        vertical in any::<bool>(),
        homogeneous in any::<bool>(),
        bordered in any::<bool>(),
        pad in 0i32..3,
        sizes in prop::collection::vec((1i32..8, 1i32..6), 1..6),
    ) {
        let mut tree = WidgetTree::new(Toolkit::default());
        let root = tree.new_box(vertical, homogeneous);
        tree.set_flag(root, WidgetFlags::NO_BORDER, !bordered);
        tree.box_mut(root).unwrap().set_pad(pad);
        for (width, height) in sizes {
            let child = block(&mut tree, width, height, false);
            tree.add_widget(root, child).unwrap();
        }
        tree.map(root);

        let size = tree.base(root).unwrap().size();
        prop_assert!(tree.confirm_size(root, size.width, size.height));
        prop_assert_eq!(tree.base(root).unwrap().size(), size);
    }

    #[test]
    fn cycling_focus_returns_to_start(
        layout in prop::collection::vec(any::<bool>(), 1..8),
        start in 0usize..8,
    ) {
        let mut tree = WidgetTree::new(Toolkit::default());
        let root = tree.new_box(true, false);
        let nested = tree.new_box(false, false);
        tree.add_widget(root, nested).unwrap();
        for in_nested in layout {
            let leaf = block(&mut tree, 1, 1, true);
            let parent = if in_nested { nested } else { root };
            tree.add_widget(parent, leaf).unwrap();
        }
        tree.map(root);

        let list = tree.focus_list(root);
        let initial = list[start % list.len()];
        prop_assert!(tree.give_focus_to_child(root, initial));
        for _ in 0..list.len() {
            tree.move_focus(root, FocusDirection::Forward);
        }
        prop_assert_eq!(tree.active(root), Some(initial));
        for _ in 0..list.len() {
            tree.move_focus(root, FocusDirection::Backward);
        }
        prop_assert_eq!(tree.active(root), Some(initial));
    }
}
