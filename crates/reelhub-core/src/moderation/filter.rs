//! Content policy filter.
//!
//! Matching is case-insensitive substring search, not word-boundary aware:
//! a banned term embedded inside a longer token still matches.

use super::repository::BannedWordRepository;
use crate::error::{FieldViolation, ReelhubError, Result};
use crate::profile::ProfileField;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A normalized snapshot of the banned-word list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannedWordList {
    terms: BTreeSet<String>,
}

impl BannedWordList {
    /// Builds a list from raw terms.
    ///
    /// Terms are trimmed and lower-cased. Blank entries are dropped since an
    /// empty term would match every text.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns every banned term that occurs anywhere in `text`.
    pub fn matches(&self, text: &str) -> BTreeSet<String> {
        if text.is_empty() {
            return BTreeSet::new();
        }
        let lower = text.to_lowercase();
        self.terms
            .iter()
            .filter(|term| lower.contains(term.as_str()))
            .cloned()
            .collect()
    }
}

/// Checks user text against the current banned-word list.
///
/// The filter fails closed: if the list cannot be fetched, the check returns
/// `PolicyUnavailable` instead of letting the text through.
#[derive(Clone)]
pub struct ContentPolicyFilter {
    repository: Arc<dyn BannedWordRepository>,
}

impl ContentPolicyFilter {
    pub fn new(repository: Arc<dyn BannedWordRepository>) -> Self {
        Self { repository }
    }

    /// Fetches a fresh snapshot of the banned-word list.
    pub async fn load_list(&self) -> Result<BannedWordList> {
        match self.repository.list_banned_words().await {
            Ok(words) => {
                let list = BannedWordList::new(words);
                tracing::debug!("[ContentPolicy] Loaded {} banned terms", list.len());
                Ok(list)
            }
            Err(e) => {
                tracing::error!("[ContentPolicy] Failed to load banned words: {}", e);
                Err(ReelhubError::policy_unavailable(e.to_string()))
            }
        }
    }

    /// Returns the banned terms found in `text`.
    pub async fn check_text(&self, text: &str) -> Result<BTreeSet<String>> {
        let list = self.load_list().await?;
        Ok(list.matches(text))
    }

    /// Checks several fields against one snapshot of the list.
    ///
    /// Returns one violation per offending field, in input order. An empty
    /// vector means every field passed.
    pub async fn check_fields(
        &self,
        fields: &[(ProfileField, &str)],
    ) -> Result<Vec<FieldViolation>> {
        let list = self.load_list().await?;
        let violations = fields
            .iter()
            .filter_map(|(field, text)| {
                let terms = list.matches(text);
                if terms.is_empty() {
                    None
                } else {
                    Some(FieldViolation {
                        field: *field,
                        terms: terms.into_iter().collect(),
                    })
                }
            })
            .collect();
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticWords {
        words: Vec<String>,
        calls: AtomicUsize,
    }

    impl StaticWords {
        fn new(words: &[&str]) -> Self {
            Self {
                words: words.iter().map(|w| w.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BannedWordRepository for StaticWords {
        async fn list_banned_words(&self) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.words.clone())
        }
    }

    struct BrokenWords;

    #[async_trait]
    impl BannedWordRepository for BrokenWords {
        async fn list_banned_words(&self) -> Result<Vec<String>> {
            Err(ReelhubError::io("connection refused"))
        }
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        let list = BannedWordList::new(["BadWord", "ugly"]);
        let found = list.matches("This has SUPERBADWORDS inside");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["badword"]);
    }

    #[test]
    fn test_blank_terms_are_ignored() {
        let list = BannedWordList::new(["", "   ", "x"]);
        assert_eq!(list.len(), 1);
        assert!(list.matches("nothing here").is_empty());
    }

    #[test]
    fn test_empty_text_never_matches() {
        let list = BannedWordList::new(["a"]);
        assert!(list.matches("").is_empty());
    }

    #[tokio::test]
    async fn test_check_text_fetches_each_time() {
        let repo = Arc::new(StaticWords::new(&["badword1"]));
        let filter = ContentPolicyFilter::new(repo.clone());

        let first = filter.check_text("this contains badword1 here").await.unwrap();
        let second = filter.check_text("clean").await.unwrap();

        assert!(first.contains("badword1"));
        assert!(second.is_empty());
        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unavailable_list_fails_closed() {
        let filter = ContentPolicyFilter::new(Arc::new(BrokenWords));
        let err = filter.check_text("anything").await.unwrap_err();
        assert!(matches!(err, ReelhubError::PolicyUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_check_fields_reports_every_offending_field() {
        let filter = ContentPolicyFilter::new(Arc::new(StaticWords::new(&["foo", "bar"])));
        let violations = filter
            .check_fields(&[
                (ProfileField::FullName, "Foo Fighter"),
                (ProfileField::Username, "clean"),
                (ProfileField::Bio, "barfoo"),
            ])
            .await
            .unwrap();

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, ProfileField::FullName);
        assert_eq!(violations[0].terms, vec!["foo"]);
        assert_eq!(violations[1].field, ProfileField::Bio);
        assert_eq!(violations[1].terms, vec!["bar", "foo"]);
    }
}
