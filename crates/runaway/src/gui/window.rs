use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use sidestep::{ClickTarget, Rect, Viewport};

pub const CARD_CLASS: &str = "runaway-card";

/// Covers the focused monitor as an overlay surface. Returns false when the
/// compositor has no layer-shell support.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) -> bool {
    if !gtk4_layer_shell::is_supported() {
        return false;
    }
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("runaway"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
    true
}

pub fn viewport(widget: &impl IsA<gtk::Widget>) -> Viewport {
    Viewport::new(widget.width() as f64, widget.height() as f64)
}

/// Bounds of `widget` in the coordinate space of `target`, or an empty
/// rectangle while it is not laid out.
pub fn bounds_in(widget: &impl IsA<gtk::Widget>, target: &impl IsA<gtk::Widget>) -> Rect {
    widget
        .compute_bounds(target)
        .map(|b| {
            Rect::new(
                b.x() as f64,
                b.y() as f64,
                b.width() as f64,
                b.height() as f64,
            )
        })
        .unwrap_or_default()
}

/// Swaps `control` in `row` for `placeholder`, sized to the control's natural
/// size so the rest of the row keeps its place.
pub fn vacate_slot(
    row: &gtk::Box,
    control: &impl IsA<gtk::Widget>,
    placeholder: &impl IsA<gtk::Widget>,
) {
    let (_, width, _, _) = control.measure(gtk::Orientation::Horizontal, -1);
    let (_, height, _, _) = control.measure(gtk::Orientation::Vertical, -1);
    placeholder.set_size_request(width, height);
    row.insert_child_after(placeholder, Some(control));
    row.remove(control);
}

/// Puts `control` back where [`vacate_slot`] left `placeholder`.
pub fn restore_slot(
    row: &gtk::Box,
    control: &impl IsA<gtk::Widget>,
    placeholder: &impl IsA<gtk::Widget>,
) {
    row.insert_child_after(control, Some(placeholder));
    row.remove(placeholder);
}

/// Classifies a click at (`x`, `y`) in `root` coordinates. Anything inside a
/// widget carrying [`CARD_CLASS`] is content.
pub fn click_target(root: &impl IsA<gtk::Widget>, x: f64, y: f64) -> ClickTarget {
    let root = root.upcast_ref::<gtk::Widget>();
    let Some(picked) = root.pick(x, y, gtk::PickFlags::DEFAULT) else {
        return ClickTarget::Root;
    };
    if &picked == root {
        return ClickTarget::Root;
    }

    let in_card = std::iter::successors(Some(picked), |w| w.parent())
        .take_while(|w| w != root)
        .any(|w| w.has_css_class(CARD_CLASS));

    if in_card {
        ClickTarget::Content
    } else {
        ClickTarget::Backdrop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(width: i32, height: i32) -> gtk::Box {
        let widget = gtk::Box::default();
        widget.set_size_request(width, height);
        widget
    }

    fn natural(widget: &impl IsA<gtk::Widget>) -> (i32, i32) {
        let (_, width, _, _) = widget.measure(gtk::Orientation::Horizontal, -1);
        let (_, height, _, _) = widget.measure(gtk::Orientation::Vertical, -1);
        (width, height)
    }

    #[test]
    fn test_vacated_slot_keeps_row_size() {
        // needs a display
        if gtk::init().is_err() {
            return;
        }

        let row = gtk::Box::new(gtk::Orientation::Horizontal, 24);
        let yes = sized(96, 40);
        let no = sized(120, 48);
        let placeholder = gtk::Box::default();
        row.append(&yes);
        row.append(&no);
        let docked = natural(&row);

        vacate_slot(&row, &no, &placeholder);
        assert!(no.parent().is_none());
        assert_eq!(natural(&placeholder), (120, 48));
        assert_eq!(natural(&row), docked);
        assert_eq!(yes.next_sibling(), Some(placeholder.clone().upcast()));

        restore_slot(&row, &no, &placeholder);
        assert!(placeholder.parent().is_none());
        assert_eq!(yes.next_sibling(), Some(no.clone().upcast()));
        assert_eq!(natural(&row), docked);
    }
}
