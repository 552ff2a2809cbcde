use std::ops::{Deref, DerefMut};

use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::key_events::KeyEvent;

#[derive(Debug, Clone)]
enum HelpKey {
    Key(KeyEvent),
    /// Free text for key groups such as `j/k`
    Plain(String),
}

/// One key binding hint
#[derive(Debug, Clone)]
pub(crate) struct HelpEntry {
    key: HelpKey,
    desc: String,
}

impl HelpEntry {
    pub(crate) fn new<T: Into<String>, K: Into<KeyEvent>>(event: K, desc: T) -> Self {
        Self {
            key: HelpKey::Key(event.into()),
            desc: desc.into(),
        }
    }

    pub(crate) fn new_plain<T: Into<String>>(keys: T, desc: T) -> Self {
        Self {
            key: HelpKey::Plain(keys.into()),
            desc: desc.into(),
        }
    }

    pub(crate) fn key(&self) -> String {
        match &self.key {
            HelpKey::Key(key) => key.to_string(),
            HelpKey::Plain(key) => key.clone(),
        }
    }

    pub(crate) fn desc(&self) -> &str {
        &self.desc
    }
}

impl std::fmt::Display for HelpEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.desc(), self.key())
    }
}

/// The key hints of a layer, in display order
#[derive(Default, Clone, Debug)]
pub(crate) struct HelpMsg {
    entries: Vec<HelpEntry>,
}

impl From<Vec<HelpEntry>> for HelpMsg {
    fn from(entries: Vec<HelpEntry>) -> Self {
        Self { entries }
    }
}

impl HelpMsg {
    /// Render as a one-line bar inside a rounded border
    pub(crate) fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(paragraph, area);
    }
}

impl Deref for HelpMsg {
    type Target = Vec<HelpEntry>;

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl DerefMut for HelpMsg {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entries
    }
}

impl std::fmt::Display for HelpMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
