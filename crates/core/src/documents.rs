//! Free-form documents and folders.

/// Title given to documents created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Icon given to documents created without one.
pub const DEFAULT_EMOJI: &str = "📄";

/// A document to insert, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Display title.
    pub title: String,
    /// Display icon.
    pub emoji: String,
    /// Containing folder, `None` at the root.
    pub parent_id: Option<i32>,
    /// Whether this entry is a folder.
    pub is_folder: bool,
}

impl NewDocument {
    /// Normalises raw create input.
    ///
    /// Blank title or emoji fall back to the defaults; a parent id of zero
    /// means the root.
    #[must_use]
    pub fn new(
        title: Option<String>,
        emoji: Option<String>,
        parent_id: Option<i32>,
        is_folder: bool,
    ) -> Self {
        Self {
            title: or_default(title, DEFAULT_TITLE),
            emoji: or_default(emoji, DEFAULT_EMOJI),
            parent_id: parent_id.filter(|id| *id != 0),
            is_folder,
        }
    }
}

/// Replacement title, body and icon for an existing document.
///
/// All three are written as given; an empty string clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpdate {
    /// New title.
    pub title: String,
    /// New body.
    pub content: String,
    /// New icon.
    pub emoji: String,
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let doc = NewDocument::new(None, Some(String::new()), Some(0), false);
        assert_eq!(doc.title, DEFAULT_TITLE);
        assert_eq!(doc.emoji, DEFAULT_EMOJI);
        assert_eq!(doc.parent_id, None);
        assert!(!doc.is_folder);
    }

    #[test]
    fn test_explicit_values_kept() {
        let doc = NewDocument::new(Some("Taxes".into()), Some("🗂".into()), Some(4), true);
        assert_eq!(doc.title, "Taxes");
        assert_eq!(doc.emoji, "🗂");
        assert_eq!(doc.parent_id, Some(4));
        assert!(doc.is_folder);
    }
}
