use unicode_width::UnicodeWidthStr;

/// A small decorative icon drawn next to text content.
///
/// The built-in glyphs cover what the components draw by default; anything a
/// caller wants to show instead goes through [`Glyph::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Default leading/trailing icon of an action button
    CirclePlus,
    /// Magnifier shown at the start of a search field
    Search,
    /// Clear affordance of a search field
    Clear,
    Custom(String),
}

impl Glyph {
    pub fn custom<T: Into<String>>(symbol: T) -> Self {
        Glyph::Custom(symbol.into())
    }

    pub fn symbol(&self) -> &str {
        match self {
            Glyph::CirclePlus => "⊕",
            Glyph::Search => "⌕",
            Glyph::Clear => "✕",
            Glyph::Custom(s) => s,
        }
    }

    /// Display width in terminal cells
    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.symbol())
    }
}

impl std::fmt::Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
