use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, trace};
use tui_input::{Input, InputRequest, StateChanged, backend::crossterm::EventHandler};

use super::{Callback, Component, ValueCallback, glyph::Glyph};
use crate::{app::layer_manager::EventHandlingStatus, theme, tui::Event};

pub const DEFAULT_PLACEHOLDER: &str = "Search by name, NRIC, test name";
/// Pixels per terminal column when a width is given in pixels
pub const CELL_WIDTH_PX: f64 = 8.0;

/// The look of a search field, derived from whether it holds text and
/// whether it is focused. Exactly one applies at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SearchVisualState {
    Idle,
    Focused,
    Active,
    Typing,
}

impl SearchVisualState {
    pub fn derive(has_value: bool, focused: bool) -> Self {
        match (has_value, focused) {
            (false, false) => SearchVisualState::Idle,
            (false, true) => SearchVisualState::Focused,
            (true, false) => SearchVisualState::Active,
            (true, true) => SearchVisualState::Typing,
        }
    }
}

/// Width of a search field: either pixels or a CSS-like sizing string
/// (`"240px"`, `"30ch"`, `"100%"`).
///
/// Any number is accepted as pixels, negative and fractional ones included;
/// they only get clamped when resolved to columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldWidth {
    Pixels(f64),
    Css(String),
}

impl Default for FieldWidth {
    fn default() -> Self {
        FieldWidth::Pixels(320.0)
    }
}

impl From<f64> for FieldWidth {
    fn from(px: f64) -> Self {
        FieldWidth::Pixels(px)
    }
}

impl From<i32> for FieldWidth {
    fn from(px: i32) -> Self {
        FieldWidth::Pixels(px.into())
    }
}

impl From<&str> for FieldWidth {
    fn from(value: &str) -> Self {
        FieldWidth::Css(value.to_string())
    }
}

impl From<String> for FieldWidth {
    fn from(value: String) -> Self {
        FieldWidth::Css(value)
    }
}

impl FieldWidth {
    pub fn css(&self) -> String {
        match self {
            FieldWidth::Pixels(px) => format!("{px}px"),
            FieldWidth::Css(value) => value.clone(),
        }
    }

    /// Columns to draw in, never more than `available`.
    ///
    /// Strings that are not `px`, `ch` or `%` measurements fill the available
    /// width.
    pub fn resolve(&self, available: u16) -> u16 {
        let cells = match self {
            FieldWidth::Pixels(px) => px / CELL_WIDTH_PX,
            FieldWidth::Css(value) => css_cells(value.trim(), available),
        };
        // NaN and negative widths collapse to zero
        cells.clamp(0.0, f64::from(available)) as u16
    }
}

fn css_cells(value: &str, available: u16) -> f64 {
    let number = |s: &str| s.trim().parse::<f64>().ok();
    let cells = if let Some(px) = value.strip_suffix("px") {
        number(px).map(|px| px / CELL_WIDTH_PX)
    } else if let Some(ch) = value.strip_suffix("ch") {
        number(ch)
    } else if let Some(pct) = value.strip_suffix('%') {
        number(pct).map(|pct| f64::from(available) * pct / 100.0)
    } else {
        None
    };
    cells.unwrap_or(f64::from(available))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartRole {
    Icon,
    Input,
    Clear,
}

/// One structural element of a search field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchPart {
    pub role: PartRole,
    pub tab_stop: bool,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug)]
struct SearchLayout {
    field: Rect,
    clear: Rect,
}

/// A text field with a search glyph and a clear affordance.
///
/// The value is either owned by the caller ([`SearchField::controlled`]) or
/// by the field itself ([`SearchField::new`]); the choice is made at
/// construction and holds for the life of the field. A controlled field
/// always displays the caller's value and only reports edits through
/// `on_change`; the caller pushes the new value back with
/// [`SearchField::set_value`].
pub struct SearchField {
    placeholder: String,
    width: FieldWidth,
    disabled: bool,

    /// Caller-owned value, `None` for an uncontrolled field
    controlled: Option<String>,
    /// Field-owned value and cursor; only the source of truth when uncontrolled
    input: Input,
    /// Cursor position inside a controlled value
    controlled_cursor: usize,
    focused: bool,

    on_change: Option<ValueCallback>,
    on_clear: Option<Callback>,
    on_focus: Option<Callback>,
    on_blur: Option<Callback>,

    layout: Option<SearchLayout>,
}

impl std::fmt::Debug for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchField")
            .field("placeholder", &self.placeholder)
            .field("width", &self.width.css())
            .field("disabled", &self.disabled)
            .field("controlled", &self.controlled)
            .field("value", &self.value())
            .field("focused", &self.focused)
            .finish()
    }
}

impl Default for SearchField {
    fn default() -> Self {
        Self::with_source(None)
    }
}

impl SearchField {
    /// A field that stores its own value
    pub fn new() -> Self {
        Self::default()
    }

    /// A field that always displays `value` until the caller replaces it
    pub fn controlled<T: Into<String>>(value: T) -> Self {
        let value = value.into();
        let mut field = Self::with_source(Some(value));
        field.controlled_cursor = field.value().chars().count();
        field
    }

    fn with_source(controlled: Option<String>) -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            width: FieldWidth::default(),
            disabled: false,
            controlled,
            input: Input::default(),
            controlled_cursor: 0,
            focused: false,
            on_change: None,
            on_clear: None,
            on_focus: None,
            on_blur: None,
            layout: None,
        }
    }

    pub fn placeholder<T: Into<String>>(mut self, placeholder: T) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn width<W: Into<FieldWidth>>(mut self, width: W) -> Self {
        self.width = width.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn on_clear(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_clear = Some(Box::new(handler));
        self
    }

    pub fn on_focus(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_focus = Some(Box::new(handler));
        self
    }

    pub fn on_blur(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_blur = Some(Box::new(handler));
        self
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    /// The displayed value
    pub fn value(&self) -> &str {
        match &self.controlled {
            Some(value) => value,
            None => self.input.value(),
        }
    }

    pub fn has_value(&self) -> bool {
        !self.value().is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn visual_state(&self) -> SearchVisualState {
        SearchVisualState::derive(self.has_value(), self.focused)
    }

    /// Icon, input and clear affordance, in drawing order.
    ///
    /// The clear affordance stays in the structure when the value is empty
    /// (it is only hidden) and is never part of the tab order.
    pub fn structure(&self) -> [SearchPart; 3] {
        [
            SearchPart {
                role: PartRole::Icon,
                tab_stop: false,
                visible: true,
            },
            SearchPart {
                role: PartRole::Input,
                tab_stop: !self.disabled,
                visible: true,
            },
            SearchPart {
                role: PartRole::Clear,
                tab_stop: false,
                visible: self.has_value(),
            },
        ]
    }

    fn part(&self, role: PartRole) -> SearchPart {
        let [icon, input, clear] = self.structure();
        match role {
            PartRole::Icon => icon,
            PartRole::Input => input,
            PartRole::Clear => clear,
        }
    }

    /// Replace the caller-owned value. Has no effect on an uncontrolled field.
    pub fn set_value<T: Into<String>>(&mut self, value: T) {
        match &mut self.controlled {
            Some(current) => {
                *current = value.into();
                self.controlled_cursor = self.controlled_cursor.min(current.chars().count());
            }
            None => debug!("Ignoring external value for an uncontrolled search field"),
        }
    }

    /// The text changed to `value`; the cursor moves to its end
    pub fn change<T: Into<String>>(&mut self, value: T) {
        let value = value.into();
        match self.controlled {
            None => self.input = Input::new(value.clone()),
            Some(_) => self.controlled_cursor = value.chars().count(),
        }
        self.notify_change(&value);
    }

    fn move_cursor(&mut self, cursor: usize) {
        match self.controlled {
            None => self.input = std::mem::take(&mut self.input).with_cursor(cursor),
            Some(_) => self.controlled_cursor = cursor,
        }
    }

    /// Empty the field, tell both observers, and take focus back.
    pub fn clear(&mut self) {
        debug!(controlled = self.is_controlled(), "Clearing search field");
        if self.controlled.is_none() {
            self.input.reset();
        }
        if let Some(handler) = &self.on_clear {
            handler();
        }
        self.notify_change("");
        self.focus();
    }

    pub fn focus(&mut self) {
        if self.disabled || self.focused {
            return;
        }
        self.focused = true;
        trace!("Search field focused");
        if let Some(handler) = &self.on_focus {
            handler();
        }
    }

    pub fn blur(&mut self) {
        if !self.focused {
            return;
        }
        self.focused = false;
        trace!("Search field blurred");
        if let Some(handler) = &self.on_blur {
            handler();
        }
    }

    fn notify_change(&self, value: &str) {
        if let Some(handler) = &self.on_change {
            handler(value);
        }
    }

    fn cursor(&self) -> usize {
        match &self.controlled {
            Some(value) => self.controlled_cursor.min(value.chars().count()),
            None => self.input.cursor(),
        }
    }

    /// Apply an edit to a draft of the displayed value. A text change goes
    /// through [`SearchField::change`], then the draft's cursor is kept.
    fn edit(&mut self, apply: impl FnOnce(&mut Input) -> Option<StateChanged>) {
        let mut draft = Input::new(self.value().to_string()).with_cursor(self.cursor());
        let changed = apply(&mut draft);
        if changed.is_some_and(|c| c.value) {
            self.change(draft.value());
        }
        self.move_cursor(draft.cursor());
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EventHandlingStatus {
        match (key.modifiers, key.code) {
            (_, KeyCode::Tab | KeyCode::BackTab) => return EventHandlingStatus::Ignored,
            (_, KeyCode::Esc) => self.blur(),
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => {
                if self.has_value() {
                    self.clear();
                }
            }
            _ => {
                let key = CrosstermEvent::Key(*key);
                self.edit(|draft| draft.handle_event(&key));
            }
        }
        EventHandlingStatus::Consumed
    }

    fn paste(&mut self, text: &str) {
        self.edit(|draft| {
            let mut changed = None;
            for c in text.chars() {
                changed = draft.handle(InputRequest::InsertChar(c)).or(changed);
            }
            changed
        });
    }
}

impl Component for SearchField {
    fn handle_events(&mut self, event: &Event) -> EventHandlingStatus {
        match event {
            Event::Key(key) if self.captures_keys() => self.handle_key(key),
            Event::Paste(text) if self.captures_keys() => {
                self.paste(text);
                EventHandlingStatus::Consumed
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let Some(layout) = self.layout else {
                    return EventHandlingStatus::Ignored;
                };
                let position = Position::new(mouse.column, mouse.row);
                if self.disabled || !layout.field.contains(position) {
                    self.blur();
                    return EventHandlingStatus::Ignored;
                }
                if layout.clear.contains(position) && self.part(PartRole::Clear).visible {
                    self.clear();
                } else {
                    self.focus();
                }
                EventHandlingStatus::Consumed
            }
            _ => EventHandlingStatus::Ignored,
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let field = Rect {
            width: self.width.resolve(area.width),
            height: area.height.min(self.height()),
            ..area
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::search_border(self.visual_state(), self.disabled));
        let inner = block.inner(field);
        frame.render_widget(block, field);

        let [icon, _, input, _, clear] = Layout::horizontal([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Span::styled(
                Glyph::Search.symbol(),
                theme::search_icon(self.has_value() || self.focused, self.disabled),
            ),
            icon,
        );

        let mut cursor_x = 0;
        if self.has_value() {
            let shown = Input::new(self.value().to_string()).with_cursor(self.cursor());
            let scroll = shown.visual_scroll(input.width as usize);
            frame.render_widget(
                Paragraph::new(self.value())
                    .style(theme::search_text(self.disabled))
                    .scroll((0, scroll as u16)),
                input,
            );
            cursor_x = shown.visual_cursor().saturating_sub(scroll) as u16;
        } else {
            frame.render_widget(
                Paragraph::new(self.placeholder.as_str()).style(theme::search_placeholder()),
                input,
            );
        }
        if self.focused && !input.is_empty() {
            frame.set_cursor_position(Position::new(input.x + cursor_x, input.y));
        }

        // hidden, not removed, while there is nothing to clear
        let clear_symbol = if self.part(PartRole::Clear).visible {
            Glyph::Clear.symbol()
        } else {
            " "
        };
        frame.render_widget(Span::styled(clear_symbol, theme::search_clear()), clear);

        self.layout = Some(SearchLayout { field, clear });
    }

    fn height(&self) -> u16 {
        3
    }

    fn accepts_focus(&self) -> bool {
        self.part(PartRole::Input).tab_stop
    }

    fn focus_changed(&mut self, focused: bool) {
        if focused {
            self.focus();
        } else {
            self.blur();
        }
    }

    fn captures_keys(&self) -> bool {
        self.focused && !self.disabled
    }
}
