//! Word limits for bounded profile fields.
//!
//! A word is a non-empty run of non-whitespace characters. Over-long values
//! are truncated, never rejected.

use super::model::{ProfileDraft, ProfileField};
use serde::{Deserialize, Serialize};

/// Counts whitespace-delimited words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncates `text` to its first `limit` words.
///
/// Text already within the limit is returned unchanged (including its
/// original spacing). Truncated text is re-joined with single spaces.
pub fn clamp_words(text: &str, limit: usize) -> String {
    if word_count(text) <= limit {
        return text.to_string();
    }
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-field word limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordLimits {
    pub full_name: usize,
    pub username: usize,
    pub bio: usize,
}

impl Default for WordLimits {
    fn default() -> Self {
        Self {
            full_name: 5,
            username: 3,
            bio: 40,
        }
    }
}

impl WordLimits {
    pub fn limit_for(&self, field: ProfileField) -> usize {
        match field {
            ProfileField::FullName => self.full_name,
            ProfileField::Username => self.username,
            ProfileField::Bio => self.bio,
        }
    }

    /// Clamps every edited bounded field of a draft in place.
    pub fn clamp_draft(&self, draft: &mut ProfileDraft) {
        for field in ProfileField::ALL {
            let limit = self.limit_for(field);
            if let Some(value) = draft.text_mut(field) {
                if word_count(value) > limit {
                    tracing::debug!("[WordLimits] Clamping {} to {} words", field, limit);
                    *value = clamp_words(value, limit);
                }
            }
        }
    }

    /// Current usage of a field, for "3/5 words" counters.
    pub fn usage(&self, field: ProfileField, text: &str) -> FieldUsage {
        FieldUsage {
            field,
            words: word_count(text),
            limit: self.limit_for(field),
        }
    }
}

/// Word usage of one bounded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUsage {
    pub field: ProfileField,
    pub words: usize,
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "one",
        "  leading and trailing  ",
        "tabs\tand\nnewlines\r\nmixed   spacing here",
        "Jean Paul Martin Dupont Bernard Lefevre",
        "é à ü · unicode words · ok",
    ];

    #[test]
    fn test_clamp_never_exceeds_limit() {
        for text in SAMPLES {
            for limit in 0..8 {
                let clamped = clamp_words(text, limit);
                assert!(
                    word_count(&clamped) <= limit,
                    "{text:?} clamped to {limit} gave {clamped:?}"
                );
            }
        }
    }

    #[test]
    fn test_clamp_is_idempotent() {
        for text in SAMPLES {
            for limit in 0..8 {
                let once = clamp_words(text, limit);
                assert_eq!(clamp_words(&once, limit), once);
            }
        }
    }

    #[test]
    fn test_six_word_name_keeps_first_five() {
        let clamped = clamp_words("Jean Paul Martin Dupont Bernard Lefevre", 5);
        assert_eq!(clamped, "Jean Paul Martin Dupont Bernard");
    }

    #[test]
    fn test_within_limit_keeps_original_spacing() {
        assert_eq!(clamp_words("  two   words ", 3), "  two   words ");
    }

    #[test]
    fn test_clamp_draft_only_touches_edited_fields() {
        let limits = WordLimits::default();
        let mut draft = ProfileDraft::new()
            .with_username("a b c d")
            .with_location("a very long location with many many words");
        limits.clamp_draft(&mut draft);

        assert_eq!(draft.username.as_deref(), Some("a b c"));
        assert_eq!(draft.full_name, None);
        assert_eq!(
            draft.location.as_deref(),
            Some("a very long location with many many words")
        );
    }

    #[test]
    fn test_usage_reports_limit() {
        let usage = WordLimits::default().usage(ProfileField::Bio, "hello there");
        assert_eq!(usage.words, 2);
        assert_eq!(usage.limit, 40);
    }
}
