//! `profiles` table over PostgREST.

use super::client::RestClient;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::profile::{Profile, ProfileChanges, ProfileRepository};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const TABLE: &str = "profiles";

/// Row as returned by the table. Every column but `id` may be null.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileRow {
    id: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, rename = "birthday")]
    birthdate: Option<NaiveDate>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    banner_url: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            full_name: row.full_name.unwrap_or_default(),
            username: row.username.unwrap_or_default(),
            bio: row.bio.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            birthdate: row.birthdate,
            avatar_url: row.avatar_url.filter(|url| !url.is_empty()),
            banner_url: row.banner_url.filter(|url| !url.is_empty()),
            updated_at: row.updated_at,
        }
    }
}

/// Upsert body. Absent columns are left untouched by a merge upsert, so only
/// changed columns are serialized.
#[derive(Debug, Serialize)]
pub(crate) struct ProfileUpsertRow<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "birthday")]
    birthdate: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    banner_url: Option<&'a str>,
    updated_at: DateTime<Utc>,
}

impl<'a> ProfileUpsertRow<'a> {
    pub(crate) fn new(owner_id: &'a str, changes: &'a ProfileChanges) -> Self {
        Self {
            id: owner_id,
            full_name: changes.full_name.as_deref(),
            username: changes.username.as_deref(),
            bio: changes.bio.as_deref(),
            location: changes.location.as_deref(),
            birthdate: changes.birthdate,
            avatar_url: changes.avatar_url.as_deref(),
            banner_url: changes.banner_url.as_deref(),
            updated_at: changes.updated_at,
        }
    }
}

pub struct RestProfileRepository {
    client: RestClient,
}

impl RestProfileRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    async fn get_profile(&self, owner_id: &str) -> Result<Option<Profile>> {
        let mut url = self.client.endpoint(&["rest", "v1", TABLE])?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", owner_id))
            .append_pair("select", "*");

        let rows: Vec<ProfileRow> = self
            .client
            .send(self.client.service_request(Method::GET, url))
            .await?
            .json()
            .await
            .map_err(|e| ReelhubError::io(format!("invalid profiles response: {e}")))?;

        Ok(rows.into_iter().next().map(Profile::from))
    }

    async fn upsert_profile(&self, owner_id: &str, changes: &ProfileChanges) -> Result<Profile> {
        let mut url = self.client.endpoint(&["rest", "v1", TABLE])?;
        url.query_pairs_mut().append_pair("on_conflict", "id");

        let body = [ProfileUpsertRow::new(owner_id, changes)];
        let request = self
            .client
            .service_request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&body);

        let rows: Vec<ProfileRow> = self
            .client
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| ReelhubError::io(format!("invalid upsert response: {e}")))?;

        tracing::debug!("[RestProfiles] Upserted profile {}", owner_id);
        rows.into_iter()
            .next()
            .map(Profile::from)
            .ok_or_else(|| ReelhubError::persistence("upsert returned no row"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelhub_core::profile::ProfileDraft;
    use serde_json::json;

    #[test]
    fn test_row_with_nulls_maps_to_profile() {
        let row: ProfileRow = serde_json::from_value(json!({
            "id": "owner-1",
            "full_name": "Ada",
            "username": null,
            "birthday": "1990-04-02",
            "avatar_url": "",
            "updated_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();

        let profile = Profile::from(row);
        assert_eq!(profile.full_name, "Ada");
        assert_eq!(profile.username, "");
        assert_eq!(profile.birthdate, NaiveDate::from_ymd_opt(1990, 4, 2));
        assert_eq!(profile.avatar_url, None);
        assert!(profile.updated_at.is_some());
    }

    #[test]
    fn test_upsert_body_only_carries_changed_columns() {
        let changes = ProfileChanges::from_draft(ProfileDraft::new().with_bio("hello"), Utc::now());
        let body = serde_json::to_value(ProfileUpsertRow::new("owner-1", &changes)).unwrap();

        let object = body.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["bio", "id", "updated_at"]);
    }

    #[test]
    fn test_cleared_birthdate_is_sent_as_null() {
        let mut changes =
            ProfileChanges::from_draft(ProfileDraft::new().with_birthdate(None), Utc::now());
        changes.avatar_url = Some("https://project.example.co/a.png".to_string());
        let body = serde_json::to_value(ProfileUpsertRow::new("owner-1", &changes)).unwrap();

        assert_eq!(body["birthday"], serde_json::Value::Null);
        assert!(body.as_object().unwrap().contains_key("birthday"));
        assert_eq!(body["avatar_url"], "https://project.example.co/a.png");
    }
}
