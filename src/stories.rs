//! The story catalog: every example configuration the gallery and the
//! snapshot command can show.

pub(crate) mod canvas;

use serde::Serialize;
use strum::{Display, IntoEnumIterator};

use crate::component::{
    button::{ButtonConfig, ButtonTheme, ButtonVariant},
    glyph::Glyph,
    search_field::{DEFAULT_PLACEHOLDER, FieldWidth},
};

const BUTTON_LABEL: &str = "Button Label";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize)]
pub enum StoryGroup {
    #[strum(to_string = "Button")]
    Button,
    #[strum(to_string = "Search field")]
    SearchField,
}

/// Who owns the value of a search field in a story
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueBinding {
    /// The field keeps its own value
    Uncontrolled,
    /// The story passes a value and never changes it
    Fixed(String),
    /// The story keeps the value and writes back every change
    Stateful(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchStory {
    pub placeholder: String,
    pub width: FieldWidth,
    pub disabled: bool,
    pub binding: ValueBinding,
    pub start_focused: bool,
}

impl Default for SearchStory {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            width: FieldWidth::default(),
            disabled: false,
            binding: ValueBinding::Uncontrolled,
            start_focused: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoryKind {
    Button(ButtonConfig),
    Search(SearchStory),
}

#[derive(Clone, Debug)]
pub struct Story {
    pub id: String,
    pub group: StoryGroup,
    pub title: String,
    pub note: Option<String>,
    pub kind: StoryKind,
}

/// Machine readable entry of `list --json`
#[derive(Debug, Serialize)]
pub struct StoryListing<'a> {
    pub id: &'a str,
    pub group: StoryGroup,
    pub title: &'a str,
}

impl Story {
    pub fn path(&self) -> String {
        format!("{} / {}", self.group, self.title)
    }

    pub fn listing(&self) -> StoryListing<'_> {
        StoryListing {
            id: &self.id,
            group: self.group,
            title: &self.title,
        }
    }
}

pub fn catalog() -> Vec<Story> {
    let mut stories = button_stories();
    stories.extend(search_stories());
    stories
}

pub fn find(id: &str) -> Option<Story> {
    catalog().into_iter().find(|story| story.id == id)
}

/// One line per story, id first
pub fn format_listing(stories: &[Story]) -> String {
    let width = stories.iter().map(|s| s.id.len()).max().unwrap_or(0);
    stories
        .iter()
        .map(|s| format!("{:<width$}  {}", s.id, s.path()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn button_story(
    variant: ButtonVariant,
    suffix: &str,
    title: String,
    config: ButtonConfig,
) -> Story {
    Story {
        id: format!("button-{variant}-{suffix}"),
        group: StoryGroup::Button,
        title,
        note: None,
        kind: StoryKind::Button(config),
    }
}

fn button_stories() -> Vec<Story> {
    let mut stories = Vec::new();
    for variant in ButtonVariant::iter() {
        let name = variant.title();
        let brand = ButtonConfig::new(BUTTON_LABEL)
            .variant(variant)
            .theme(ButtonTheme::Brand)
            .icons(true, true);

        stories.push(button_story(
            variant,
            "brand",
            format!("{name} Brand"),
            brand.clone(),
        ));
        stories.push(button_story(
            variant,
            "brand-no-icons",
            format!("{name} Brand No Icons"),
            brand.clone().icons(false, false),
        ));
        stories.push(button_story(
            variant,
            "brand-destructive",
            format!("{name} Brand Destructive"),
            brand.clone().destructive(true),
        ));
        stories.push(button_story(
            variant,
            "brand-disabled",
            format!("{name} Brand Disabled"),
            brand.clone().disabled(true),
        ));
        stories.push(button_story(
            variant,
            "ai",
            format!("{name} {}", ButtonTheme::Ai.title()),
            brand.theme(ButtonTheme::Ai),
        ));
    }
    stories.push(Story {
        id: "button-playground".into(),
        group: StoryGroup::Button,
        title: "Playground".into(),
        note: None,
        kind: StoryKind::Button(ButtonConfig::new(BUTTON_LABEL).icons(true, true)),
    });
    stories.push(Story {
        id: "button-custom-icons".into(),
        group: StoryGroup::Button,
        title: "Custom Icons".into(),
        note: Some("Custom glyphs replace the default icons".into()),
        kind: StoryKind::Button(
            ButtonConfig::new(BUTTON_LABEL)
                .icons(true, true)
                .custom_leading_icon(Glyph::custom("★"))
                .custom_trailing_icon(Glyph::custom("→")),
        ),
    });
    stories
}

fn search_story(id: &str, title: &str, note: Option<&str>, search: SearchStory) -> Story {
    Story {
        id: format!("search-{id}"),
        group: StoryGroup::SearchField,
        title: title.into(),
        note: note.map(Into::into),
        kind: StoryKind::Search(search),
    }
}

fn search_stories() -> Vec<Story> {
    vec![
        search_story("default", "Default", None, SearchStory::default()),
        search_story(
            "focused",
            "Focused",
            Some("The field starts focused"),
            SearchStory {
                start_focused: true,
                ..Default::default()
            },
        ),
        search_story(
            "typing",
            "Typing",
            Some("Focus the field to see the typing state"),
            SearchStory {
                binding: ValueBinding::Fixed("Search text".into()),
                ..Default::default()
            },
        ),
        search_story(
            "active",
            "Active",
            Some("A value without focus; Esc leaves the field"),
            SearchStory {
                binding: ValueBinding::Stateful("Search text".into()),
                ..Default::default()
            },
        ),
        search_story(
            "custom-width",
            "Custom Width",
            None,
            SearchStory {
                placeholder: "Search...".into(),
                width: FieldWidth::Pixels(400.0),
                ..Default::default()
            },
        ),
        search_story(
            "disabled",
            "Disabled",
            None,
            SearchStory {
                placeholder: "Search is disabled".into(),
                disabled: true,
                ..Default::default()
            },
        ),
        search_story(
            "interactive",
            "Interactive",
            Some("Every event lands in the event log"),
            SearchStory {
                placeholder: "Type to search...".into(),
                binding: ValueBinding::Stateful(String::new()),
                ..Default::default()
            },
        ),
    ]
}
