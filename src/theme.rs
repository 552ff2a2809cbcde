//! Fixed lookups from component style tags to terminal styles.
//!
//! Components never build colours themselves: they derive a tag
//! ([`ButtonStyleKey`], [`SearchVisualState`]) and ask this module for the
//! matching [`Style`].

use ratatui::style::{
    Color, Modifier, Style,
    palette::tailwind::{self, Palette},
};

use crate::component::{
    button::{ButtonStyleKey, ButtonTheme, ButtonVariant},
    search_field::SearchVisualState,
};

pub(crate) const BRAND: Palette = tailwind::BLUE;
pub(crate) const AI: Palette = tailwind::VIOLET;
pub(crate) const DANGER: Palette = tailwind::RED;
pub(crate) const NEUTRAL: Palette = tailwind::SLATE;

/// Border colour of a focused search field
pub(crate) const FOCUS_RING: Color = BRAND.c500;
/// Foreground of the selected row in lists
pub(crate) const SELECTED_ROW: Color = tailwind::INDIGO.c400;

fn accent(theme: ButtonTheme, destructive: bool) -> Palette {
    if destructive {
        return DANGER;
    }
    match theme {
        ButtonTheme::Brand => BRAND,
        ButtonTheme::Ai => AI,
    }
}

pub(crate) fn button_style(key: ButtonStyleKey) -> Style {
    if key.disabled {
        let muted = Style::new().fg(NEUTRAL.c400).add_modifier(Modifier::DIM);
        return match key.variant {
            ButtonVariant::Primary | ButtonVariant::Secondary | ButtonVariant::Tertiary => {
                muted.bg(NEUTRAL.c100)
            }
            ButtonVariant::SecondaryOutline | ButtonVariant::Text => muted,
        };
    }

    let accent = accent(key.theme, key.destructive);
    let style = match key.variant {
        ButtonVariant::Primary => Style::new().fg(Color::White).bg(accent.c600),
        ButtonVariant::SecondaryOutline => Style::new().fg(accent.c600),
        ButtonVariant::Secondary => Style::new().fg(accent.c700).bg(accent.c100),
        ButtonVariant::Tertiary if key.destructive => {
            Style::new().fg(accent.c700).bg(accent.c50)
        }
        ButtonVariant::Tertiary => Style::new().fg(NEUTRAL.c800).bg(NEUTRAL.c100),
        ButtonVariant::Text => Style::new().fg(accent.c600),
    };
    style.add_modifier(Modifier::BOLD)
}

/// Focus ring drawn on top of a button style
pub(crate) fn button_focus(style: Style) -> Style {
    style.add_modifier(Modifier::UNDERLINED)
}

pub(crate) fn search_border(state: SearchVisualState, disabled: bool) -> Style {
    if disabled {
        return Style::new().fg(NEUTRAL.c300);
    }
    match state {
        SearchVisualState::Idle => Style::new().fg(NEUTRAL.c400),
        SearchVisualState::Focused => Style::new().fg(FOCUS_RING),
        SearchVisualState::Active => Style::new().fg(NEUTRAL.c600),
        SearchVisualState::Typing => Style::new().fg(FOCUS_RING).add_modifier(Modifier::BOLD),
    }
}

pub(crate) fn search_icon(active: bool, disabled: bool) -> Style {
    if disabled || !active {
        Style::new().fg(NEUTRAL.c400)
    } else {
        Style::new().fg(NEUTRAL.c800)
    }
}

pub(crate) fn search_text(disabled: bool) -> Style {
    if disabled {
        Style::new().fg(NEUTRAL.c400)
    } else {
        Style::new().fg(NEUTRAL.c900)
    }
}

pub(crate) fn search_placeholder() -> Style {
    Style::new().fg(NEUTRAL.c400).add_modifier(Modifier::ITALIC)
}

pub(crate) fn search_clear() -> Style {
    Style::new().fg(NEUTRAL.c500)
}

/// Secondary text such as story notes and log entries
pub(crate) fn muted() -> Style {
    Style::new().fg(NEUTRAL.c500)
}
