/// Default limit for nested lists, continuations and conditionals.
pub const DEFAULT_MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Options {
    /// Tokenize paragraph, list item and title text with the inline grammar.
    ///
    /// When disabled every inline run is a single `text` leaf, which is enough for
    /// outlining and block-level highlighting.
    pub inline: bool,
    /// Maximum depth of nested lists, continuations and conditionals.
    ///
    /// A construct that would nest deeper is parsed as a paragraph and a
    /// `Warning::NestingTooDeep` is recorded.
    pub max_nesting: usize,
    /// Encoding label used by `parse_file` instead of BOM sniffing.
    pub encoding: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            inline: true,
            max_nesting: DEFAULT_MAX_NESTING,
            encoding: None,
        }
    }
}

impl Options {
    /// Create a new `OptionsBuilder` for fluent configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use adoc_tree::Options;
    ///
    /// let options = Options::builder()
    ///     .without_inline()
    ///     .with_max_nesting(16)
    ///     .build();
    /// assert!(!options.inline);
    /// ```
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Create a new `Options` with default settings.
    ///
    /// Equivalent to `Options::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builder for `Options`.
///
/// Create an `OptionsBuilder` using `Options::builder()`.
///
/// # Example
///
/// ```
/// use adoc_tree::Options;
///
/// let options = Options::builder()
///     .with_encoding("utf-16le")
///     .build();
/// assert_eq!(options.encoding.as_deref(), Some("utf-16le"));
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OptionsBuilder {
    inline: bool,
    max_nesting: usize,
    encoding: Option<String>,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        let Options {
            inline,
            max_nesting,
            encoding,
        } = Options::default();
        Self {
            inline,
            max_nesting,
            encoding,
        }
    }
}

impl OptionsBuilder {
    /// Leave inline content untokenized.
    #[must_use]
    pub fn without_inline(mut self) -> Self {
        self.inline = false;
        self
    }

    #[must_use]
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Set the nesting limit. A limit of zero is raised to one so that the top level
    /// always parses.
    #[must_use]
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting.max(1);
        self
    }

    /// Force the encoding used by `parse_file`.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Options {
        Options {
            inline: self.inline,
            max_nesting: self.max_nesting,
            encoding: self.encoding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_options_defaults() {
        assert_eq!(Options::builder().build(), Options::default());
    }

    #[test]
    fn builder_overrides() {
        let options = Options::builder()
            .without_inline()
            .with_max_nesting(0)
            .with_encoding("windows-1252")
            .build();
        assert!(!options.inline);
        assert_eq!(options.max_nesting, 1);
        assert_eq!(options.encoding.as_deref(), Some("windows-1252"));
    }
}
