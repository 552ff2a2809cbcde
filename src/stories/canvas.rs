use crossterm::event::KeyCode;
use ratatui::{Frame, layout::Rect, text::Line};
use tracing::debug;

use super::{SearchStory, Story, StoryKind, ValueBinding};
use crate::{
    actions::ActionSender,
    app::layer_manager::EventHandlingStatus,
    component::{
        Component,
        button::{ActionButton, ButtonConfig},
        search_field::SearchField,
    },
    page::gallery::GalleryAction,
    theme,
    tui::Event,
};

/// A widget placed on the canvas
pub(crate) enum StoryElement {
    Button(ActionButton),
    Search(SearchField),
}

impl Component for StoryElement {
    fn handle_events(&mut self, event: &Event) -> EventHandlingStatus {
        match self {
            StoryElement::Button(button) => button.handle_events(event),
            StoryElement::Search(field) => field.handle_events(event),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        match self {
            StoryElement::Button(button) => button.draw(frame, area, focused),
            StoryElement::Search(field) => field.draw(frame, area, focused),
        }
    }

    fn height(&self) -> u16 {
        match self {
            StoryElement::Button(button) => button.height(),
            StoryElement::Search(field) => field.height(),
        }
    }

    fn accepts_focus(&self) -> bool {
        match self {
            StoryElement::Button(button) => button.accepts_focus(),
            StoryElement::Search(field) => field.accepts_focus(),
        }
    }

    fn focus_changed(&mut self, focused: bool) {
        match self {
            StoryElement::Button(button) => button.focus_changed(focused),
            StoryElement::Search(field) => field.focus_changed(focused),
        }
    }

    fn captures_keys(&self) -> bool {
        match self {
            StoryElement::Button(button) => button.captures_keys(),
            StoryElement::Search(field) => field.captures_keys(),
        }
    }
}

fn build_button(config: ButtonConfig, tx: ActionSender) -> ActionButton {
    ActionButton::new(config).on_click(move || tx.send(GalleryAction::Log("onClick".into())))
}

fn build_search(story: &SearchStory, tx: ActionSender) -> SearchField {
    let field = match &story.binding {
        ValueBinding::Uncontrolled => SearchField::new(),
        ValueBinding::Fixed(value) | ValueBinding::Stateful(value) => {
            SearchField::controlled(value.clone())
        }
    };
    let stateful = matches!(story.binding, ValueBinding::Stateful(_));

    let (change_tx, clear_tx, focus_tx) = (tx.clone(), tx.clone(), tx.clone());
    field
        .placeholder(story.placeholder.clone())
        .width(story.width.clone())
        .disabled(story.disabled)
        .on_change(move |value| {
            if stateful {
                change_tx.send(GalleryAction::SyncValue(value.to_string()));
            }
            change_tx.send(GalleryAction::Log(format!("onChange: \"{value}\"")));
        })
        .on_clear(move || {
            if stateful {
                clear_tx.send(GalleryAction::SyncValue(String::new()));
            }
            clear_tx.send(GalleryAction::Log("onClear".into()));
        })
        .on_focus(move || focus_tx.send(GalleryAction::Log("onFocus".into())))
        .on_blur(move || tx.send(GalleryAction::Log("onBlur".into())))
}

/// Live widgets of one story, stacked top to bottom.
///
/// Observers report back through [`GalleryAction`]s, so a canvas can only be
/// driven from within the event loop (or a test holding the receiver).
pub(crate) struct StoryCanvas {
    story: Story,
    elements: Vec<StoryElement>,
    focused: Option<usize>,
}

impl StoryCanvas {
    pub fn new(story: Story, tx: ActionSender) -> Self {
        let (element, start_focused) = match &story.kind {
            StoryKind::Button(config) => {
                (StoryElement::Button(build_button(config.clone(), tx)), false)
            }
            StoryKind::Search(search) => (
                StoryElement::Search(build_search(search, tx)),
                search.start_focused,
            ),
        };
        debug!(story = %story.id, "Mounting story");

        let mut canvas = Self {
            story,
            elements: vec![element],
            focused: None,
        };
        if start_focused {
            canvas.focus_first();
        }
        canvas
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn has_focus(&self) -> bool {
        self.focused.is_some()
    }

    /// Whether the focused element wants raw keys, e.g. a search field
    pub fn captures_keys(&self) -> bool {
        self.focused
            .and_then(|index| self.elements.get(index))
            .is_some_and(|element| element.captures_keys())
    }

    fn tab_stops(&self) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.accepts_focus())
            .map(|(index, _)| index)
            .collect()
    }

    fn focus_at(&mut self, target: Option<usize>) {
        if let Some(previous) = self.focused {
            if Some(previous) != target {
                self.elements[previous].focus_changed(false);
            }
        }
        if let Some(index) = target {
            self.elements[index].focus_changed(true);
        }
        self.focused = target;
    }

    /// Focus the first element in tab order, if there is one
    pub fn focus_first(&mut self) {
        let first = self.tab_stops().first().copied();
        self.focus_at(first);
    }

    pub fn release_focus(&mut self) {
        self.focus_at(None);
    }

    fn cycle(&mut self, forward: bool) -> EventHandlingStatus {
        let stops = self.tab_stops();
        if stops.is_empty() {
            return EventHandlingStatus::Ignored;
        }
        let position = self
            .focused
            .and_then(|current| stops.iter().position(|&index| index == current));
        let next = match (position, forward) {
            (None, true) => 0,
            (None, false) => stops.len() - 1,
            (Some(pos), true) => (pos + 1) % stops.len(),
            (Some(pos), false) => (pos + stops.len() - 1) % stops.len(),
        };
        self.focus_at(Some(stops[next]));
        EventHandlingStatus::Consumed
    }

    /// Write a value owned by the story back into its controlled fields
    pub fn sync_value(&mut self, value: &str) {
        for element in &mut self.elements {
            if let StoryElement::Search(field) = element {
                if field.is_controlled() {
                    field.set_value(value);
                }
            }
        }
    }

    pub fn handle_events(&mut self, event: &Event) -> EventHandlingStatus {
        match event {
            Event::Mouse(_) => {
                let mut status = EventHandlingStatus::Ignored;
                for index in 0..self.elements.len() {
                    if let EventHandlingStatus::Consumed = self.elements[index].handle_events(event)
                    {
                        if self.elements[index].accepts_focus() {
                            self.focused = Some(index);
                        }
                        status = EventHandlingStatus::Consumed;
                    } else if self.focused == Some(index)
                        && matches!(&self.elements[index], StoryElement::Search(f) if !f.is_focused())
                    {
                        // the field blurred itself on an outside click
                        self.focused = None;
                    }
                }
                status
            }
            Event::Key(key) => {
                if let Some(index) = self.focused {
                    if let EventHandlingStatus::Consumed = self.elements[index].handle_events(event)
                    {
                        return EventHandlingStatus::Consumed;
                    }
                }
                match key.code {
                    KeyCode::Tab => self.cycle(true),
                    KeyCode::BackTab => self.cycle(false),
                    _ => EventHandlingStatus::Ignored,
                }
            }
            Event::Paste(_) => match self.focused {
                Some(index) => self.elements[index].handle_events(event),
                None => EventHandlingStatus::Ignored,
            },
            _ => EventHandlingStatus::Ignored,
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, active: bool) {
        if area.is_empty() {
            return;
        }
        let mut y = area.y;
        if let Some(note) = &self.story.note {
            frame.render_widget(
                Line::styled(note.as_str(), theme::muted()),
                Rect { y, height: 1, ..area },
            );
            y = y.saturating_add(2);
        }

        for (index, element) in self.elements.iter_mut().enumerate() {
            if y >= area.bottom() {
                break;
            }
            let height = element.height().min(area.bottom() - y);
            let rect = Rect { y, height, ..area };
            element.draw(frame, rect, active && self.focused == Some(index));
            y = y.saturating_add(element.height() + 1);
        }
    }

    #[cfg(test)]
    pub fn search_field(&self) -> Option<&SearchField> {
        self.elements.iter().find_map(|element| match element {
            StoryElement::Search(field) => Some(field),
            StoryElement::Button(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::{actions::Action, stories::find};

    fn mount(id: &str) -> (StoryCanvas, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let story = find(id).unwrap();
        (StoryCanvas::new(story, tx.into()), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Action>) -> Vec<String> {
        let mut log = Vec::new();
        while let Ok(action) = rx.try_recv() {
            match action {
                Action::Gallery(GalleryAction::Log(entry)) => log.push(entry),
                Action::Gallery(GalleryAction::SyncValue(value)) => {
                    log.push(format!("sync:{value}"))
                }
                _ => {}
            }
        }
        log
    }

    #[test]
    fn button_click_is_logged() {
        let (mut canvas, mut rx) = mount("button-primary-brand");
        assert!(!canvas.has_focus());

        assert!(matches!(
            canvas.handle_events(&KeyCode::Tab.into()),
            EventHandlingStatus::Consumed
        ));
        assert!(matches!(
            canvas.handle_events(&KeyCode::Enter.into()),
            EventHandlingStatus::Consumed
        ));
        assert_eq!(drain(&mut rx), vec!["onClick"]);
    }

    #[test]
    fn disabled_button_has_no_tab_stop() {
        let (mut canvas, mut rx) = mount("button-text-brand-disabled");
        canvas.focus_first();
        assert!(!canvas.has_focus());
        assert!(matches!(
            canvas.handle_events(&KeyCode::Tab.into()),
            EventHandlingStatus::Ignored
        ));
        let _ = canvas.handle_events(&KeyCode::Enter.into());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn focused_story_starts_focused() {
        let (canvas, mut rx) = mount("search-focused");
        assert!(canvas.has_focus());
        assert!(canvas.captures_keys());
        assert_eq!(drain(&mut rx), vec!["onFocus"]);
    }

    #[test]
    fn stateful_story_writes_back() {
        let (mut canvas, mut rx) = mount("search-interactive");
        canvas.focus_first();
        let _ = canvas.handle_events(&'a'.into());
        assert_eq!(drain(&mut rx), vec!["onFocus", "sync:a", "onChange: \"a\""]);

        // nothing changes until the owner syncs the value back
        assert_eq!(canvas.search_field().unwrap().value(), "");
        canvas.sync_value("a");
        assert_eq!(canvas.search_field().unwrap().value(), "a");
    }

    #[test]
    fn fixed_story_keeps_value() {
        let (mut canvas, mut rx) = mount("search-typing");
        canvas.focus_first();
        let _ = canvas.handle_events(&'x'.into());
        assert_eq!(
            drain(&mut rx),
            vec!["onFocus", "onChange: \"Search textx\""]
        );
        assert_eq!(canvas.search_field().unwrap().value(), "Search text");
    }

    #[test]
    fn tab_leaves_search_field_to_canvas() {
        let (mut canvas, mut rx) = mount("search-default");
        canvas.focus_first();
        // a single tab stop cycles onto itself
        assert!(matches!(
            canvas.handle_events(&KeyCode::Tab.into()),
            EventHandlingStatus::Consumed
        ));
        assert!(canvas.captures_keys());

        canvas.release_focus();
        assert!(!canvas.has_focus());
        assert_eq!(drain(&mut rx), vec!["onFocus", "onBlur"]);
    }
}
