//! Profile domain model.
//!
//! A profile belongs to exactly one owner and is only ever changed through
//! a merge-style upsert: columns absent from a change set keep their stored
//! value.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Free-text profile fields subject to word limits and moderation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProfileField {
    FullName,
    Username,
    Bio,
}

impl ProfileField {
    /// All bounded fields, in the order they are checked.
    pub const ALL: [ProfileField; 3] = [Self::FullName, Self::Username, Self::Bio];
}

/// Stored profile of a single owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Owner id (immutable, also the row key)
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Handle shown on the channel page
    pub username: String,
    /// Biography
    pub bio: String,
    pub location: String,
    pub birthdate: Option<NaiveDate>,
    /// Public URL of the current avatar asset
    pub avatar_url: Option<String>,
    /// Public URL of the current banner asset
    pub banner_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// An empty profile for an owner who has never saved one.
    pub fn empty(owner_id: impl Into<String>) -> Self {
        Self {
            id: owner_id.into(),
            full_name: String::new(),
            username: String::new(),
            bio: String::new(),
            location: String::new(),
            birthdate: None,
            avatar_url: None,
            banner_url: None,
            updated_at: None,
        }
    }

    /// Returns the value of a bounded text field.
    pub fn text(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FullName => &self.full_name,
            ProfileField::Username => &self.username,
            ProfileField::Bio => &self.bio,
        }
    }
}

/// Edits submitted from the profile form.
///
/// `None` means "not edited": the stored value is kept. For `birthdate`,
/// `Some(None)` clears the stored date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub birthdate: Option<Option<NaiveDate>>,
}

impl ProfileDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_full_name(mut self, value: impl Into<String>) -> Self {
        self.full_name = Some(value.into());
        self
    }

    pub fn with_username(mut self, value: impl Into<String>) -> Self {
        self.username = Some(value.into());
        self
    }

    pub fn with_bio(mut self, value: impl Into<String>) -> Self {
        self.bio = Some(value.into());
        self
    }

    pub fn with_location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    pub fn with_birthdate(mut self, value: Option<NaiveDate>) -> Self {
        self.birthdate = Some(value);
        self
    }

    /// Returns the submitted value of a bounded text field, if edited.
    pub fn text(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::FullName => self.full_name.as_deref(),
            ProfileField::Username => self.username.as_deref(),
            ProfileField::Bio => self.bio.as_deref(),
        }
    }

    /// Mutable access to a bounded text field.
    pub fn text_mut(&mut self, field: ProfileField) -> Option<&mut String> {
        match field {
            ProfileField::FullName => self.full_name.as_mut(),
            ProfileField::Username => self.username.as_mut(),
            ProfileField::Bio => self.bio.as_mut(),
        }
    }
}

/// Column set written by a single upsert.
///
/// Built by the upsert coordinator from a validated draft plus any newly
/// uploaded asset URLs. Only `Some` columns are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileChanges {
    /// Starts a change set from a draft, stamped with `updated_at`.
    pub fn from_draft(draft: ProfileDraft, updated_at: DateTime<Utc>) -> Self {
        Self {
            full_name: draft.full_name,
            username: draft.username,
            bio: draft.bio,
            location: draft.location,
            birthdate: draft.birthdate,
            avatar_url: None,
            banner_url: None,
            updated_at,
        }
    }

    /// A change set that only touches asset references.
    pub fn assets_only(updated_at: DateTime<Utc>) -> Self {
        Self::from_draft(ProfileDraft::default(), updated_at)
    }

    /// Merges these changes into a stored profile.
    ///
    /// Used by stores that hold whole rows. Omitted columns are left as-is.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(ref value) = self.full_name {
            profile.full_name = value.clone();
        }
        if let Some(ref value) = self.username {
            profile.username = value.clone();
        }
        if let Some(ref value) = self.bio {
            profile.bio = value.clone();
        }
        if let Some(ref value) = self.location {
            profile.location = value.clone();
        }
        if let Some(value) = self.birthdate {
            profile.birthdate = value;
        }
        if let Some(ref value) = self.avatar_url {
            profile.avatar_url = Some(value.clone());
        }
        if let Some(ref value) = self.banner_url {
            profile.banner_url = Some(value.clone());
        }
        profile.updated_at = Some(self.updated_at);
    }
}
