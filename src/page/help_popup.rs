use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, BorderType, Borders, Clear, HighlightSpacing, List, ListItem, Padding},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    actions::{Action, ActionSender, LayerManageAction},
    app::layer_manager::EventHandlingStatus,
    theme,
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
};

use super::{EventLoopParticipant, Layer, WidgetExt};

/// Popup listing the key bindings of the layer below it
pub(crate) struct HelpPopup {
    help_msg: HelpMsg,

    longest_entry_size: u16,
    list_state: ratatui::widgets::ListState,

    tx: ActionSender,
}

impl HelpPopup {
    /// `None` when there is nothing to show
    pub fn new(tx: ActionSender, msg: HelpMsg) -> Option<Self> {
        let longest = msg
            .iter()
            .map(|entry| UnicodeWidthStr::width(entry.to_string().as_str()))
            .max()?;

        Some(Self {
            help_msg: msg,
            longest_entry_size: longest as u16,
            list_state: ratatui::widgets::ListState::default(),
            tx,
        })
    }
}

#[derive(Clone, Debug)]
pub enum HelpPopupAction {
    Up,
    Down,
    Start,
    End,
}
impl From<HelpPopupAction> for Action {
    fn from(value: HelpPopupAction) -> Self {
        Action::HelpPopup(value)
    }
}

impl EventLoopParticipant for HelpPopup {
    fn handle_events(&mut self, event: &Event) -> EventHandlingStatus {
        let Event::Key(key) = event else {
            return EventHandlingStatus::Ignored;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => self.tx.send(LayerManageAction::Pop),
            KeyCode::Char('j') | KeyCode::Down => self.tx.send(HelpPopupAction::Down),
            KeyCode::Char('k') | KeyCode::Up => self.tx.send(HelpPopupAction::Up),
            KeyCode::Char('g') => self.tx.send(HelpPopupAction::Start),
            KeyCode::Char('G') => self.tx.send(HelpPopupAction::End),
            _ => return EventHandlingStatus::Ignored,
        }
        EventHandlingStatus::Consumed
    }

    fn update(&mut self, action: &Action) {
        let Action::HelpPopup(action) = action else {
            return;
        };
        match action {
            HelpPopupAction::Up => self.list_state.select_previous(),
            HelpPopupAction::Down => self.list_state.select_next(),
            HelpPopupAction::Start => self.list_state.select_first(),
            HelpPopupAction::End => self.list_state.select_last(),
        }
    }
}

impl Layer for HelpPopup {}

impl WidgetExt for HelpPopup {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = (self.longest_entry_size + 8)
            .max(area.width.saturating_sub(4).min(50))
            .min(area.width);
        let show_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height / 6,
            width,
            height: area.height * 2 / 3,
        };
        let bottom_help_area = Rect {
            y: area.bottom().saturating_sub(3),
            height: area.height.min(3),
            ..area
        };

        frame.render_widget(Clear, bottom_help_area);
        HelpPopup::get_self_help_msg().render(frame, bottom_help_area);

        frame.render_widget(Clear, show_area);
        self.render_list(frame, show_area);
    }
}

impl HelpPopup {
    pub fn get_self_help_msg() -> HelpMsg {
        vec![
            HelpEntry::new('j', "Go down"),
            HelpEntry::new('k', "Go up"),
            HelpEntry::new('g', "Go to top"),
            HelpEntry::new('G', "Go to bottom"),
            HelpEntry::new(KeyCode::Esc, "Close help"),
        ]
        .into()
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let selected_row_style = Style::default()
            .add_modifier(Modifier::REVERSED)
            .fg(theme::SELECTED_ROW);

        let block = Block::new()
            .title(Line::raw("Help").centered())
            .border_type(BorderType::Rounded)
            .borders(Borders::ALL)
            .padding(Padding::uniform(1));

        let items: Vec<ListItem> = self
            .help_msg
            .iter()
            .map(|entry| ListItem::from(Text::raw(format!("  {}  ", entry))))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(selected_row_style)
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::snapshot::buffer_lines;

    fn popup(tx: tokio::sync::mpsc::UnboundedSender<Action>) -> HelpPopup {
        HelpPopup::new(
            tx.into(),
            vec![
                HelpEntry::new('a', "test"),
                HelpEntry::new('b', "test2"),
                HelpEntry::new('c', "test3"),
            ]
            .into(),
        )
        .unwrap()
    }

    #[test]
    fn empty_message_has_no_popup() {
        let (tx, _) = tokio::sync::mpsc::unbounded_channel();
        assert!(HelpPopup::new(tx.into(), HelpMsg::default()).is_none());
    }

    #[test]
    fn test_help_popup_new() {
        let (tx, _) = tokio::sync::mpsc::unbounded_channel();
        let help_popup =
            HelpPopup::new(tx.into(), vec![HelpEntry::new('a', "test")].into()).unwrap();
        assert_eq!(help_popup.help_msg.len(), 1);
        assert_eq!(help_popup.longest_entry_size, 7);
        assert_eq!(help_popup.list_state.selected(), None);
    }

    #[test]
    fn test_navigation() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut help_popup = popup(tx);
        let mut terminal = Terminal::new(TestBackend::new(80, 25)).unwrap();

        let mut test_loop = |key: char, expected: Option<usize>| {
            let _ = help_popup.event_loop_once(&mut rx, key.into());
            terminal
                .draw(|f| {
                    let area = f.area();
                    help_popup.render(f, area);
                })
                .unwrap();
            assert_eq!(help_popup.list_state.selected(), expected);
        };

        test_loop('j', Some(0));
        test_loop('k', Some(0));
        test_loop('G', Some(2));
        test_loop('k', Some(1));
        test_loop('j', Some(2));
        test_loop('g', Some(0));
    }

    #[test]
    fn escape_pops_layer() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut help_popup = popup(tx);
        assert!(matches!(
            help_popup.handle_events(&KeyCode::Esc.into()),
            EventHandlingStatus::Consumed
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(Action::Layer(LayerManageAction::Pop))
        ));
        assert!(matches!(
            help_popup.handle_events(&'x'.into()),
            EventHandlingStatus::Ignored
        ));
    }

    #[test]
    fn test_help_popup_render() {
        let (tx, _) = tokio::sync::mpsc::unbounded_channel();
        let mut help_popup = popup(tx);
        let mut terminal = Terminal::new(TestBackend::new(80, 25)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                help_popup.render(f, area);
            })
            .unwrap();

        let lines = buffer_lines(terminal.backend().buffer());
        assert!(lines[4].contains("Help"));
        assert!(lines.iter().any(|l| l.contains("test2: b")));
        assert!(lines[23].contains("Close help: esc"));
    }

    #[test]
    fn render_in_tiny_area() {
        let (tx, _) = tokio::sync::mpsc::unbounded_channel();
        let mut help_popup = popup(tx);
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                help_popup.render(f, area);
            })
            .unwrap();
    }
}
