//! Headless rendering of a single story, used by the `snapshot` command and
//! by widget tests.

use color_eyre::{Result, eyre::Context};
use ratatui::buffer::Buffer;
use tokio::sync::mpsc;

use crate::{
    stories::{Story, canvas::StoryCanvas},
    tui::TestTui,
};

/// Rows of `buffer` as plain text, trailing blanks removed
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

/// Draw `story` on an off-screen terminal of the given size.
///
/// With `focus`, the first focusable element is focused before drawing, as if
/// the user had tabbed into the canvas.
pub fn render_story(story: &Story, width: u16, height: u16, focus: bool) -> Result<Vec<String>> {
    // observers may fire while mounting, keep the receiver alive until done
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut canvas = StoryCanvas::new(story.clone(), tx.into());
    if focus {
        canvas.focus_first();
    }

    let mut tui = TestTui::new(width, height)?;
    tui.draw(|f| {
        let area = f.area();
        canvas.draw(f, area, focus);
    })
    .with_context(|| format!("Failed to draw story {}", story.id))?;

    Ok(buffer_lines(tui.backend().buffer()))
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::stories::find;

    fn snapshot(id: &str, focus: bool) -> String {
        let story = find(id).unwrap();
        render_story(&story, 44, 5, focus)
            .unwrap()
            .join("\n")
            .trim_end()
            .to_string()
    }

    #[test]
    fn buttons() {
        assert_eq!(snapshot("button-primary-brand", false), " ⊕ Button Label ⊕");
        assert_eq!(snapshot("button-text-brand-no-icons", false), " Button Label");
        assert_eq!(
            snapshot("button-custom-icons", false),
            "Custom glyphs replace the default icons\n\n ★ Button Label →"
        );
    }

    #[test]
    fn search_default() {
        assert_snapshot!(snapshot("search-default", false), @r"
        ╭──────────────────────────────────────╮
        │⌕ Search by name, NRIC, test name     │
        ╰──────────────────────────────────────╯
        ");
    }

    #[test]
    fn search_with_note_and_value() {
        assert_snapshot!(snapshot("search-active", false), @r"
        A value without focus; Esc leaves the field

        ╭──────────────────────────────────────╮
        │⌕ Search text                        ✕│
        ╰──────────────────────────────────────╯
        ");
    }

    #[test]
    fn trailing_blank_rows_are_kept() {
        let lines = render_story(&find("button-primary-ai").unwrap(), 20, 3, false).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "");
    }
}
