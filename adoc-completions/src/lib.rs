//! Value completions for `AsciiDoc` options such as `doctype`, `backend` or a source
//! block's `language`.
//!
//! ```
//! use adoc_completions::Completions;
//!
//! let completions = Completions::default();
//! assert_eq!(completions.get_completions("doctype", "b"), vec!["book"]);
//! assert_eq!(completions.get_similar_options("doctyp"), vec!["doctype"]);
//! ```
mod table;

use rustc_hash::FxHashSet;

use crate::table::{LANGUAGE_BY_EXTENSION, OPTIONS, WEB_BACKENDS};

/// Suggestions further away than this are not offered as "did you mean".
const MAX_DISTANCE: usize = 2;

/// A table from option name to the values it accepts, in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completions {
    options: Vec<(String, Vec<String>)>,
}

impl Default for Completions {
    fn default() -> Self {
        Self {
            options: OPTIONS
                .iter()
                .map(|(name, values)| {
                    (
                        (*name).to_string(),
                        values.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl Completions {
    fn values(&self, option: &str) -> &[String] {
        self.options
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// Values of `option` starting with `prefix`, ignoring case. An unknown option has
    /// no values.
    #[must_use]
    pub fn get_completions(&self, option: &str, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        self.values(option)
            .iter()
            .filter(|value| value.to_lowercase().starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    /// Whether `value` is exactly one of the values of `option`.
    #[must_use]
    pub fn is_valid_value(&self, option: &str, value: &str) -> bool {
        self.values(option).iter().any(|known| known == value)
    }

    pub fn available_options(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|(name, _)| name.as_str())
    }

    /// Known options that contain `option`, are contained in it, or are within a
    /// small edit distance of it.
    #[must_use]
    pub fn get_similar_options(&self, option: &str) -> Vec<&str> {
        let option = option.to_lowercase();
        self.available_options()
            .filter(|name| {
                let name = name.to_lowercase();
                name.contains(&option)
                    || option.contains(&name)
                    || levenshtein(&option, &name) <= MAX_DISTANCE
            })
            .collect()
    }

    /// Add `values` to `option`, creating it if needed. Values already present are
    /// skipped and the existing order is kept.
    pub fn add_completions<I, S>(&mut self, option: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = match self.options.iter().position(|(name, _)| name == option) {
            Some(index) => index,
            None => {
                tracing::debug!(option, "adding new completion option");
                self.options.push((option.to_string(), Vec::new()));
                self.options.len() - 1
            }
        };
        let Some((_, existing)) = self.options.get_mut(index) else {
            return;
        };
        let mut seen: FxHashSet<String> = existing.iter().cloned().collect();
        for value in values {
            let value = value.into();
            if seen.insert(value.clone()) {
                existing.push(value);
            }
        }
    }

    /// Like [`Completions::get_completions`], but ranks the values that fit `context`
    /// first. For `language` the context is a file extension such as `.rs`; for
    /// `backend` the context `web` prefers HTML based backends.
    #[must_use]
    pub fn get_smart_completions(&self, option: &str, prefix: &str, context: &str) -> Vec<&str> {
        let base = self.get_completions(option, prefix);
        let preferred: &[&str] = match (option, context) {
            ("language", extension) => LANGUAGE_BY_EXTENSION
                .iter()
                .find(|(known, _)| *known == extension)
                .map(|&(_, languages)| languages)
                .unwrap_or_default(),
            ("backend", "web") => WEB_BACKENDS,
            _ => &[],
        };
        let mut ranked: Vec<&str> = preferred
            .iter()
            .filter(|value| base.contains(*value))
            .copied()
            .collect();
        ranked.extend(base.iter().filter(|value| !preferred.contains(*value)));
        ranked
    }
}

/// Edit distance between `a` and `b`, counted in chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, left) in a.chars().enumerate() {
        let mut current = Vec::with_capacity(b.len() + 1);
        current.push(i + 1);
        for ((diagonal, above), right) in previous.iter().zip(previous.iter().skip(1)).zip(&b) {
            let substitution = diagonal + usize::from(left != *right);
            let insertion = current.last().map_or(usize::MAX, |last| last + 1);
            current.push(substitution.min(insertion).min(above + 1));
        }
        previous = current;
    }
    previous.last().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("doctype", "", vec!["article", "book", "manpage", "inline"])]
    #[case("doctype", "MAN", vec!["manpage"])]
    #[case("toc", "ma", vec!["macro"])]
    #[case("float", "x", vec![])]
    #[case("unknown", "", vec![])]
    fn completions_by_prefix(
        #[case] option: &str,
        #[case] prefix: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(Completions::default().get_completions(option, prefix), expected);
    }

    #[test]
    fn validates_exact_values() {
        let completions = Completions::default();
        assert!(completions.is_valid_value("backend", "html5"));
        assert!(!completions.is_valid_value("backend", "HTML5"));
        assert!(!completions.is_valid_value("nope", "html5"));
    }

    #[rstest]
    #[case("doctyp", vec!["doctype"])]
    #[case("toc", vec!["toc", "toclevels"])]
    #[case("flaot", vec!["float"])]
    #[case("zzzzzzzz", vec![])]
    fn similar_options(#[case] option: &str, #[case] expected: Vec<&str>) {
        assert_eq!(Completions::default().get_similar_options(option), expected);
    }

    #[test]
    fn options_keep_table_order() {
        let completions = Completions::default();
        let options: Vec<_> = completions.available_options().collect();
        assert_eq!(options.first(), Some(&"doctype"));
        assert_eq!(options.last(), Some(&"role"));
        assert_eq!(options.len(), 17);
    }

    #[test]
    fn add_completions_dedups_and_creates() {
        let mut completions = Completions::default();
        completions.add_completions("icons", ["font", "svg"]);
        assert_eq!(
            completions.get_completions("icons", ""),
            vec!["font", "image", "emoji", "none", "svg"]
        );
        completions.add_completions("stem", vec!["latexmath".to_string(), "asciimath".to_string()]);
        assert_eq!(completions.get_completions("stem", "a"), vec!["asciimath"]);
        assert!(completions.available_options().any(|option| option == "stem"));
    }

    #[rstest]
    #[case("language", "", ".rs", "rust")]
    #[case("language", "", ".sh", "bash")]
    #[case("backend", "", "web", "html5")]
    #[case("backend", "", "print", "html5")]
    fn smart_completions_rank_context_first(
        #[case] option: &str,
        #[case] prefix: &str,
        #[case] context: &str,
        #[case] first: &str,
    ) {
        let completions = Completions::default();
        let ranked = completions.get_smart_completions(option, prefix, context);
        assert_eq!(ranked.first(), Some(&first));
        assert_eq!(ranked.len(), completions.get_completions(option, prefix).len());
    }

    #[test]
    fn smart_completions_respect_prefix() {
        let completions = Completions::default();
        assert_eq!(
            completions.get_smart_completions("backend", "s", "web"),
            vec!["slidy"]
        );
        assert_eq!(
            completions.get_smart_completions("language", "sh", ".sh"),
            vec!["shell"]
        );
        assert_eq!(
            completions.get_smart_completions("backend", "", "web").get(..4),
            Some(["html5", "xhtml11", "slidy", "revealjs"].as_slice())
        );
    }

    #[rstest]
    #[case("", "", 0)]
    #[case("abc", "", 3)]
    #[case("flaot", "float", 2)]
    #[case("kitten", "sitting", 3)]
    fn edit_distance(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
        assert_eq!(levenshtein(b, a), expected);
    }
}
