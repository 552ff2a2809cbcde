use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, HighlightSpacing, List, ListItem, ListState, Padding,
        Paragraph,
    },
};
use tracing::{debug, warn};

use crate::{
    actions::{Action, ActionSender, LayerManageAction, LayerPushTarget, Layers},
    app::layer_manager::EventHandlingStatus,
    stories::{self, Story, canvas::StoryCanvas},
    theme,
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
};

use super::{EventLoopParticipant, Layer, WidgetExt};

const SIDEBAR_WIDTH: u16 = 40;

#[derive(Clone, Debug)]
pub enum GalleryAction {
    Select(usize),
    FocusCanvas,
    FocusSidebar,
    /// Append an entry to the event log
    Log(String),
    /// A stateful story stores a new value for its controlled field
    SyncValue(String),
}
impl From<GalleryAction> for Action {
    fn from(value: GalleryAction) -> Self {
        Action::Gallery(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GalleryFocus {
    Sidebar,
    Canvas,
}

/// Story browser: a list of stories, the live canvas of the selected one and
/// the most recent observer events.
pub(crate) struct Gallery {
    stories: Vec<Story>,
    list_state: ListState,
    focus: GalleryFocus,
    canvas: StoryCanvas,

    log: VecDeque<String>,
    log_len: usize,

    tx: ActionSender,
}

impl Gallery {
    pub fn new(tx: ActionSender, start_story: Option<&str>, log_len: usize) -> Self {
        let stories = stories::catalog();
        let index = match start_story {
            Some(id) => stories.iter().position(|s| s.id == id).unwrap_or_else(|| {
                warn!(story = id, "Unknown start story, showing the first one");
                0
            }),
            None => 0,
        };
        let canvas = StoryCanvas::new(stories[index].clone(), tx.clone());

        Self {
            stories,
            list_state: ListState::default().with_selected(Some(index)),
            focus: GalleryFocus::Sidebar,
            canvas,
            log: VecDeque::new(),
            log_len,
            tx,
        }
    }

    #[cfg(test)]
    pub fn selected_story(&self) -> &Story {
        self.canvas.story()
    }

    fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    #[cfg(test)]
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    /// Whether keys go to the canvas instead of the story list
    pub fn canvas_focused(&self) -> bool {
        self.focus == GalleryFocus::Canvas
    }

    fn push_log(&mut self, entry: String) {
        debug!(story = %self.canvas.story().id, entry, "Story event");
        if self.log_len == 0 {
            return;
        }
        while self.log.len() >= self.log_len {
            self.log.pop_front();
        }
        self.log.push_back(entry);
    }

    fn show_help(&self) {
        self.tx.send(LayerManageAction::Push(LayerPushTarget {
            layer: Layers::Help(self.get_help_msg()),
            render_self: true,
        }));
    }

    fn handle_sidebar_key(&self, key: &KeyEvent) -> EventHandlingStatus {
        let last = self.stories.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.tx.send(GalleryAction::Select((self.selected() + 1).min(last)))
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.tx.send(GalleryAction::Select(self.selected().saturating_sub(1)))
            }
            KeyCode::Char('g') | KeyCode::Home => self.tx.send(GalleryAction::Select(0)),
            KeyCode::Char('G') | KeyCode::End => self.tx.send(GalleryAction::Select(last)),
            KeyCode::Enter | KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
                self.tx.send(GalleryAction::FocusCanvas)
            }
            KeyCode::Char('?') => self.show_help(),
            _ => return EventHandlingStatus::Ignored,
        }
        EventHandlingStatus::Consumed
    }

    fn handle_canvas_event(&mut self, event: &Event) -> EventHandlingStatus {
        if let EventHandlingStatus::Consumed = self.canvas.handle_events(event) {
            return EventHandlingStatus::Consumed;
        }
        let Event::Key(key) = event else {
            return EventHandlingStatus::Ignored;
        };
        match key.code {
            KeyCode::Esc => self.tx.send(GalleryAction::FocusSidebar),
            KeyCode::Char('?') => self.show_help(),
            _ => return EventHandlingStatus::Ignored,
        }
        EventHandlingStatus::Consumed
    }

    pub fn get_help_msg(&self) -> HelpMsg {
        let mut msg: HelpMsg = match self.focus {
            GalleryFocus::Sidebar => vec![
                HelpEntry::new_plain("j/k", "Select story"),
                HelpEntry::new_plain("g/G", "First/last story"),
                HelpEntry::new(KeyCode::Enter, "Open story"),
            ]
            .into(),
            GalleryFocus::Canvas => vec![
                HelpEntry::new(KeyCode::Tab, "Next control"),
                HelpEntry::new(KeyCode::Esc, "Back to stories"),
            ]
            .into(),
        };
        if self.canvas_focused() && self.canvas.captures_keys() {
            msg.push(HelpEntry::new(
                KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
                "Clear search",
            ));
        } else {
            msg.push(HelpEntry::new('?', "Help"));
            msg.push(HelpEntry::new('q', "Quit"));
        }
        msg
    }

    fn render_sidebar(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.canvas_focused() {
            Style::default()
        } else {
            Style::default().fg(theme::SELECTED_ROW)
        };
        let block = Block::default()
            .title(Line::raw("Stories").centered())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let items: Vec<ListItem> = self
            .stories
            .iter()
            .map(|story| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} · ", story.group), theme::muted()),
                    Span::raw(story.title.as_str()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .fg(theme::SELECTED_ROW),
            )
            .highlight_spacing(HighlightSpacing::Always);
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_canvas(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.canvas_focused() {
            Style::default().fg(theme::SELECTED_ROW)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title(Line::raw(self.canvas.story().path()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::uniform(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.canvas.draw(frame, inner, self.canvas_focused());
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .log
            .iter()
            .map(|entry| Line::styled(entry.as_str(), theme::muted()))
            .collect();
        let block = Block::default()
            .title(Line::raw("Event log"))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl EventLoopParticipant for Gallery {
    fn handle_events(&mut self, event: &Event) -> EventHandlingStatus {
        match event {
            Event::Mouse(mouse) => {
                let status = self.canvas.handle_events(event);
                let click = mouse.kind == MouseEventKind::Down(MouseButton::Left);
                match status {
                    EventHandlingStatus::Consumed if !self.canvas_focused() => {
                        self.tx.send(GalleryAction::FocusCanvas)
                    }
                    // a click outside every widget took the focus away
                    EventHandlingStatus::Ignored
                        if click && self.canvas_focused() && !self.canvas.has_focus() =>
                    {
                        self.tx.send(GalleryAction::FocusSidebar)
                    }
                    _ => {}
                }
                status
            }
            _ if self.canvas_focused() => self.handle_canvas_event(event),
            Event::Key(key) => self.handle_sidebar_key(key),
            _ => EventHandlingStatus::Ignored,
        }
    }

    fn update(&mut self, action: &Action) {
        let Action::Gallery(action) = action else {
            return;
        };
        match action {
            GalleryAction::Select(index) => {
                let Some(story) = self.stories.get(*index) else {
                    warn!(index, "Story index out of range");
                    return;
                };
                if self.list_state.selected() == Some(*index) {
                    return;
                }
                debug!(story = %story.id, "Selecting story");
                self.list_state.select(Some(*index));
                self.log.clear();
                self.canvas = StoryCanvas::new(story.clone(), self.tx.clone());
            }
            GalleryAction::FocusCanvas => {
                self.focus = GalleryFocus::Canvas;
                if !self.canvas.has_focus() {
                    self.canvas.focus_first();
                }
            }
            GalleryAction::FocusSidebar => {
                self.canvas.release_focus();
                self.focus = GalleryFocus::Sidebar;
            }
            GalleryAction::Log(entry) => self.push_log(entry.clone()),
            GalleryAction::SyncValue(value) => self.canvas.sync_value(value),
        }
    }
}

impl WidgetExt for Gallery {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let log_height = u16::try_from(self.log_len)
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let [main, log_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(log_height),
            Constraint::Length(3),
        ])
        .areas(area);
        let [sidebar, canvas] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(main);

        self.render_sidebar(frame, sidebar);
        self.render_canvas(frame, canvas);
        self.render_log(frame, log_area);
        self.get_help_msg().render(frame, help_area);
    }
}

impl Layer for Gallery {}

#[cfg(test)]
mod tests {
    use crossterm::event::MouseEvent;
    use ratatui::{Terminal, backend::TestBackend, layout::Position};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::snapshot::buffer_lines;

    fn mount(start: Option<&str>) -> (Gallery, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Gallery::new(tx.into(), start, 5), rx)
    }

    fn draw(gallery: &mut Gallery) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                gallery.render(f, area);
            })
            .unwrap();
        terminal
    }

    fn click_at(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn run(gallery: &mut Gallery, rx: &mut UnboundedReceiver<Action>, events: Vec<Event>) {
        for event in events {
            let _ = gallery.event_loop_once(rx, event);
        }
    }

    #[test]
    fn sidebar_navigation() {
        let (mut gallery, mut rx) = mount(None);
        assert_eq!(gallery.selected_story().id, "button-primary-brand");

        run(&mut gallery, &mut rx, vec!['j'.into(), 'j'.into()]);
        assert_eq!(gallery.selected_story().id, "button-primary-brand-destructive");
        run(&mut gallery, &mut rx, vec!['k'.into()]);
        assert_eq!(gallery.selected_story().id, "button-primary-brand-no-icons");
        run(&mut gallery, &mut rx, vec!['G'.into()]);
        assert_eq!(gallery.selected_story().id, "search-interactive");
        run(&mut gallery, &mut rx, vec!['j'.into()]);
        assert_eq!(gallery.selected_story().id, "search-interactive");
        run(&mut gallery, &mut rx, vec!['g'.into(), 'k'.into()]);
        assert_eq!(gallery.selected_story().id, "button-primary-brand");
    }

    #[test]
    fn unknown_start_story_falls_back() {
        let (gallery, _rx) = mount(Some("does-not-exist"));
        assert_eq!(gallery.selected_story().id, "button-primary-brand");
        let (gallery, _rx) = mount(Some("search-disabled"));
        assert_eq!(gallery.selected_story().id, "search-disabled");
    }

    #[test]
    fn clicking_a_button_story() {
        let (mut gallery, mut rx) = mount(Some("button-secondary-ai"));
        run(
            &mut gallery,
            &mut rx,
            vec![KeyCode::Enter.into(), KeyCode::Enter.into(), ' '.into()],
        );
        assert!(gallery.canvas_focused());
        assert_eq!(gallery.log().collect::<Vec<_>>(), vec!["onClick", "onClick"]);

        run(&mut gallery, &mut rx, vec![KeyCode::Esc.into()]);
        assert!(!gallery.canvas_focused());
    }

    #[test]
    fn interactive_search_logs_and_keeps_value() {
        let (mut gallery, mut rx) = mount(Some("search-interactive"));
        run(
            &mut gallery,
            &mut rx,
            vec![KeyCode::Enter.into(), 'h'.into(), 'i'.into()],
        );
        assert_eq!(
            gallery.log().collect::<Vec<_>>(),
            vec!["onFocus", "onChange: \"h\"", "onChange: \"hi\""]
        );
        assert_eq!(gallery.canvas.search_field().unwrap().value(), "hi");

        // q is text while the field has focus
        let status = gallery.event_loop_once(&mut rx, 'q'.into());
        assert!(matches!(status, EventHandlingStatus::Consumed));

        let ctrl_l = Event::Key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        run(&mut gallery, &mut rx, vec![ctrl_l]);
        assert_eq!(gallery.canvas.search_field().unwrap().value(), "");
        assert_eq!(
            gallery.log().collect::<Vec<_>>(),
            vec![
                "onChange: \"h\"",
                "onChange: \"hi\"",
                "onChange: \"hiq\"",
                "onClear",
                "onChange: \"\"",
            ]
        );

        // first Esc leaves the field, the second one the canvas
        run(&mut gallery, &mut rx, vec![KeyCode::Esc.into()]);
        assert!(gallery.canvas_focused());
        run(&mut gallery, &mut rx, vec![KeyCode::Esc.into()]);
        assert!(!gallery.canvas_focused());
        assert_eq!(gallery.log().last(), Some("onBlur"));
    }

    #[test]
    fn fixed_search_story_never_changes() {
        let (mut gallery, mut rx) = mount(Some("search-typing"));
        run(
            &mut gallery,
            &mut rx,
            vec![KeyCode::Enter.into(), KeyCode::Backspace.into()],
        );
        assert_eq!(gallery.canvas.search_field().unwrap().value(), "Search text");
        assert_eq!(gallery.log().last(), Some("onChange: \"Search tex\""));
    }

    #[test]
    fn selecting_another_story_clears_log() {
        let (mut gallery, mut rx) = mount(Some("button-primary-brand"));
        run(
            &mut gallery,
            &mut rx,
            vec![KeyCode::Enter.into(), KeyCode::Enter.into()],
        );
        assert_eq!(gallery.log().count(), 1);
        run(&mut gallery, &mut rx, vec![KeyCode::Esc.into(), 'j'.into()]);
        assert_eq!(gallery.log().count(), 0);
    }

    #[test]
    fn help_is_pushed_as_layer() {
        let (mut gallery, mut rx) = mount(None);
        let _ = gallery.handle_events(&'?'.into());
        let Ok(Action::Layer(LayerManageAction::Push(target))) = rx.try_recv() else {
            panic!("expected a push");
        };
        assert!(target.render_self);
        let Layers::Help(msg) = target.layer else {
            panic!("expected help");
        };
        assert!(msg.iter().any(|entry| entry.desc() == "Open story"));
    }

    #[test]
    fn quit_key_is_left_to_app() {
        let (mut gallery, mut rx) = mount(None);
        let status = gallery.event_loop_once(&mut rx, 'q'.into());
        assert!(matches!(status, EventHandlingStatus::Ignored));
    }

    #[test]
    fn render_layout() {
        let (mut gallery, mut rx) = mount(Some("search-default"));
        run(&mut gallery, &mut rx, vec![KeyCode::Enter.into()]);

        let mut terminal = draw(&mut gallery);

        let lines = buffer_lines(terminal.backend().buffer());
        assert!(lines[0].contains("Stories"));
        assert!(lines[0].contains("Search field / Default"));
        assert!(lines.iter().any(|l| l.contains("Search by name, NRIC, test name")));
        assert!(lines.iter().any(|l| l.contains("onFocus")));
        assert!(lines[28].contains("Clear search: ctrl-l"));
        // the focused field shows the terminal cursor
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(45, 3));
    }

    #[test]
    fn clicking_outside_the_field_returns_to_sidebar() {
        let (mut gallery, mut rx) = mount(Some("search-interactive"));
        run(&mut gallery, &mut rx, vec![KeyCode::Enter.into()]);
        let _ = draw(&mut gallery);
        assert!(gallery.canvas_focused());

        // inside the field keeps the canvas
        run(&mut gallery, &mut rx, vec![click_at(50, 5)]);
        assert!(gallery.canvas_focused());

        // the sidebar is outside every widget of the story
        run(&mut gallery, &mut rx, vec![click_at(5, 5)]);
        assert!(!gallery.canvas_focused());
        assert_eq!(gallery.log().last(), Some("onBlur"));
        assert!(
            gallery
                .get_help_msg()
                .iter()
                .any(|entry| entry.desc() == "Open story")
        );
    }

    #[test]
    fn huge_event_log_len_still_renders() {
        for log_len in [65534, usize::MAX] {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut gallery = Gallery::new(tx.into(), Some("button-playground"), log_len);
            run(
                &mut gallery,
                &mut rx,
                vec![KeyCode::Enter.into(), KeyCode::Enter.into()],
            );
            assert_eq!(gallery.log().collect::<Vec<_>>(), vec!["onClick"]);

            let terminal = draw(&mut gallery);
            let lines = buffer_lines(terminal.backend().buffer());
            assert_eq!(lines.len(), 30);
            assert!(lines.iter().any(|line| line.contains("Event log")));
        }
    }
}
