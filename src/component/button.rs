use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
};
use strum::{Display, EnumIter, EnumString};
use tracing::trace;
use unicode_width::UnicodeWidthStr;

use super::{Callback, Component, glyph::Glyph};
use crate::{app::layer_manager::EventHandlingStatus, theme, tui::Event};

static DEFAULT_ICON: Glyph = Glyph::CirclePlus;

/// Visual style of an [`ActionButton`]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ButtonVariant {
    #[default]
    Primary,
    SecondaryOutline,
    Secondary,
    Tertiary,
    Text,
}

impl ButtonVariant {
    pub fn title(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "Primary",
            ButtonVariant::SecondaryOutline => "Secondary Outline",
            ButtonVariant::Secondary => "Secondary",
            ButtonVariant::Tertiary => "Tertiary",
            ButtonVariant::Text => "Text",
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ButtonTheme {
    #[default]
    Brand,
    Ai,
}

impl ButtonTheme {
    pub fn title(&self) -> &'static str {
        match self {
            ButtonTheme::Brand => "Brand",
            ButtonTheme::Ai => "AI",
        }
    }
}

/// Everything that decides how a button looks.
///
/// Rebuilt by the caller whenever it wants a different button; the button
/// keeps no state of its own beyond it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonConfig {
    pub variant: ButtonVariant,
    pub theme: ButtonTheme,
    pub destructive: bool,
    pub disabled: bool,
    pub leading_icon: bool,
    pub trailing_icon: bool,
    pub custom_leading_icon: Option<Glyph>,
    pub custom_trailing_icon: Option<Glyph>,
    pub label: String,
}

impl ButtonConfig {
    pub fn new<T: Into<String>>(label: T) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn theme(mut self, theme: ButtonTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn destructive(mut self, destructive: bool) -> Self {
        self.destructive = destructive;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn icons(mut self, leading: bool, trailing: bool) -> Self {
        self.leading_icon = leading;
        self.trailing_icon = trailing;
        self
    }

    pub fn custom_leading_icon(mut self, glyph: Glyph) -> Self {
        self.custom_leading_icon = Some(glyph);
        self
    }

    pub fn custom_trailing_icon(mut self, glyph: Glyph) -> Self {
        self.custom_trailing_icon = Some(glyph);
        self
    }

    pub fn style_key(&self) -> ButtonStyleKey {
        ButtonStyleKey {
            variant: self.variant,
            theme: self.theme,
            destructive: self.destructive,
            disabled: self.disabled,
        }
    }

    /// Glyph drawn before the label, if the leading icon is enabled.
    /// A custom glyph replaces the default one.
    pub fn leading_glyph(&self) -> Option<&Glyph> {
        self.leading_icon
            .then(|| self.custom_leading_icon.as_ref().unwrap_or(&DEFAULT_ICON))
    }

    pub fn trailing_glyph(&self) -> Option<&Glyph> {
        self.trailing_icon
            .then(|| self.custom_trailing_icon.as_ref().unwrap_or(&DEFAULT_ICON))
    }
}

/// Tag selecting a button style in [`theme::button_style`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ButtonStyleKey {
    pub variant: ButtonVariant,
    pub theme: ButtonTheme,
    pub destructive: bool,
    pub disabled: bool,
}

impl std::fmt::Display for ButtonStyleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.variant, self.theme)?;
        if self.destructive {
            write!(f, " destructive")?;
        }
        if self.disabled {
            write!(f, " disabled")?;
        }
        Ok(())
    }
}

/// A clickable label with optional glyphs on either side.
///
/// Activated by Enter/Space while the host has it focused, or by a left click
/// inside the area it was last drawn at. Disabled buttons never call their
/// click observer.
pub struct ActionButton {
    config: ButtonConfig,
    on_click: Option<Callback>,

    area: Option<Rect>,
}

impl std::fmt::Debug for ActionButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionButton")
            .field("config", &self.config)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl ActionButton {
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            on_click: None,
            area: None,
        }
    }

    pub fn on_click(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    #[cfg(test)]
    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Run one activation. Returns `false` if the button is disabled.
    pub fn activate(&self) -> bool {
        if self.config.disabled {
            trace!(label = %self.config.label, "Ignoring activation of disabled button");
            return false;
        }
        if let Some(handler) = &self.on_click {
            handler();
        }
        true
    }

    pub fn line(&self, focused: bool) -> Line<'_> {
        let mut style = theme::button_style(self.config.style_key());
        if focused {
            style = theme::button_focus(style);
        }

        let mut spans = vec![Span::raw(" ")];
        if let Some(glyph) = self.config.leading_glyph() {
            spans.push(Span::raw(glyph.symbol()));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw(self.config.label.as_str()));
        spans.push(Span::raw(" "));
        if let Some(glyph) = self.config.trailing_glyph() {
            spans.push(Span::raw(glyph.symbol()));
            spans.push(Span::raw(" "));
        }
        Line::from(spans).style(style)
    }

    /// Columns taken by [`ActionButton::line`]
    pub fn width(&self) -> u16 {
        let glyphs: usize = [self.config.leading_glyph(), self.config.trailing_glyph()]
            .into_iter()
            .flatten()
            .map(|glyph| glyph.width() + 1)
            .sum();
        let width = self.config.label.width() + glyphs + 2;
        u16::try_from(width).unwrap_or(u16::MAX)
    }
}

impl Component for ActionButton {
    fn handle_events(&mut self, event: &Event) -> EventHandlingStatus {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') if self.activate() => {
                    EventHandlingStatus::Consumed
                }
                _ => EventHandlingStatus::Ignored,
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .area
                    .is_some_and(|area| area.contains(Position::new(mouse.column, mouse.row)));
                if hit && self.activate() {
                    EventHandlingStatus::Consumed
                } else {
                    EventHandlingStatus::Ignored
                }
            }
            _ => EventHandlingStatus::Ignored,
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let area = Rect {
            width: area.width.min(self.width()),
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(self.line(focused), area);
        self.area = Some(area);
    }

    fn height(&self) -> u16 {
        1
    }

    fn accepts_focus(&self) -> bool {
        !self.config.disabled
    }
}
