//! `banned_words` table over PostgREST.

use super::client::RestClient;
use async_trait::async_trait;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::moderation::BannedWordRepository;
use reqwest::Method;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BannedWordRow {
    #[serde(default)]
    word: Option<String>,
}

pub struct RestBannedWordRepository {
    client: RestClient,
}

impl RestBannedWordRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BannedWordRepository for RestBannedWordRepository {
    async fn list_banned_words(&self) -> Result<Vec<String>> {
        let mut url = self.client.endpoint(&["rest", "v1", "banned_words"])?;
        url.query_pairs_mut().append_pair("select", "word");

        let rows: Vec<BannedWordRow> = self
            .client
            .send(self.client.service_request(Method::GET, url))
            .await?
            .json()
            .await
            .map_err(|e| ReelhubError::io(format!("invalid banned_words response: {e}")))?;

        Ok(words_from_rows(rows))
    }
}

fn words_from_rows(rows: Vec<BannedWordRow>) -> Vec<String> {
    rows.into_iter().filter_map(|row| row.word).collect()
}
