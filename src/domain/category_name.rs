use unicode_segmentation::UnicodeSegmentation;

/// The name of a broadcast topic, as it is stored in the `categories` table.
///
/// Names are trimmed but otherwise kept verbatim: lookups against the seeded set are
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn parse(s: String) -> Result<CategoryName, String> {
        let trimmed = s.trim();

        // A grapheme is a "user-perceived" character: `a°` is a single grapheme made of two chars.
        let is_too_long = trimmed.graphemes(true).count() > 256;

        if trimmed.is_empty() || is_too_long {
            Err(format!("{s:?} is not a valid category name."))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
