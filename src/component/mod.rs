pub(crate) mod button;
pub(crate) mod glyph;
pub(crate) mod search_field;

use ratatui::{Frame, layout::Rect};

use crate::{app::layer_manager::EventHandlingStatus, tui::Event};

/// Observer without payload (click, clear, focus, blur)
pub type Callback = Box<dyn Fn() + Send + Sync>;
/// Observer receiving the new text of a field
pub type ValueCallback = Box<dyn Fn(&str) + Send + Sync>;

/// An interactive widget hosted by a page.
///
/// The host owns focus traversal: it only routes key events to the widget it
/// considers focused, and tells the widget when that changes through
/// [`Component::focus_changed`]. Mouse events are routed to every widget,
/// which decide themselves whether the event hit them.
pub(crate) trait Component {
    #[must_use]
    fn handle_events(&mut self, event: &Event) -> EventHandlingStatus;

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool);

    /// Rows the widget occupies when drawn
    fn height(&self) -> u16;

    /// Whether the widget is part of the keyboard tab order
    fn accepts_focus(&self) -> bool;

    fn focus_changed(&mut self, _focused: bool) {}

    /// Whether the widget wants every key while focused (text entry)
    fn captures_keys(&self) -> bool {
        false
    }
}
