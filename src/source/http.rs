//! HTTP data source backed by a blocking ureq agent

use crate::cache::kind::RecordKind;
use crate::config::schema::SourceConfig;
use crate::error::{BacklogError, BacklogResult};
use crate::source::{object_path, DataSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

const USER_AGENT: &str = concat!("backlog/", env!("CARGO_PKG_VERSION"));

/// One element of the GitHub commits listing
#[derive(Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    committer: CommitSignature,
}

#[derive(Deserialize)]
struct CommitSignature {
    date: DateTime<Utc>,
}

/// Fetches backlog data over HTTPS
pub struct HttpSource {
    agent: Agent,
    base_url: String,
    commits_url: String,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Self {
            agent: Agent::new_with_config(agent_config),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            commits_url: format!(
                "{}/repos/{}/commits?page=1&per_page=1&path=index.json",
                config.api_url.trim_end_matches('/'),
                config.repository
            ),
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}/index.json", self.base_url)
    }

    pub fn object_url(&self, kind: RecordKind, id: &str) -> String {
        format!("{}/{}", self.base_url, object_path(kind, id))
    }

    pub fn commits_url(&self) -> &str {
        &self.commits_url
    }

    /// GET `url` and return the body, mapping 404 to `SourceNotFound`
    async fn get_text(&self, url: String) -> BacklogResult<String> {
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || {
            debug!("GET {}", url);
            let response = agent
                .get(url.as_str())
                .header("User-Agent", USER_AGENT)
                .call();

            match response {
                Ok(mut response) => response.body_mut().read_to_string().map_err(|e| {
                    BacklogError::SourceTransport {
                        url: url.clone(),
                        reason: e.to_string(),
                    }
                }),
                Err(ureq::Error::StatusCode(404)) => Err(BacklogError::SourceNotFound { url }),
                Err(ureq::Error::StatusCode(status)) => {
                    Err(BacklogError::SourceStatus { url, status })
                }
                Err(e) => Err(BacklogError::SourceTransport {
                    reason: e.to_string(),
                    url,
                }),
            }
        })
        .await
        .map_err(|e| BacklogError::Internal(format!("HTTP task failed: {}", e)))?
    }

    async fn get_json(&self, url: String) -> BacklogResult<Value> {
        let body = self.get_text(url.clone()).await?;
        serde_json::from_str(&body).map_err(|e| BacklogError::decode(url, e.to_string()))
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_index(&self) -> BacklogResult<Value> {
        let url = self.index_url();
        let value = self.get_json(url.clone()).await?;
        if !value.is_object() {
            return Err(BacklogError::decode(url, "index is not a JSON object"));
        }
        Ok(value)
    }

    async fn fetch_object(&self, kind: RecordKind, id: &str) -> BacklogResult<Map<String, Value>> {
        let url = self.object_url(kind, id);
        match self.get_json(url.clone()).await? {
            Value::Object(fields) => Ok(fields),
            _ => Err(BacklogError::decode(url, "record payload is not a JSON object")),
        }
    }

    async fn index_last_modified(&self) -> BacklogResult<DateTime<Utc>> {
        let url = self.commits_url.clone();
        let value = self.get_json(url.clone()).await?;
        parse_last_commit_date(value).map_err(|reason| BacklogError::decode(url, reason))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Extract `[0].commit.committer.date` from a commits listing
fn parse_last_commit_date(value: Value) -> Result<DateTime<Utc>, String> {
    let commits: Vec<CommitEntry> = serde_json::from_value(value).map_err(|e| e.to_string())?;
    commits
        .into_iter()
        .next()
        .map(|entry| entry.commit.committer.date)
        .ok_or_else(|| "no commits touch index.json".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> HttpSource {
        HttpSource::new(&SourceConfig {
            base_url: "https://data.example.test/backlog/".to_string(),
            api_url: "https://api.example.test".to_string(),
            repository: "owner/repo".to_string(),
            timeout_secs: 5,
        })
    }

    #[test]
    fn urls_follow_data_layout() {
        let source = source();
        assert_eq!(source.index_url(), "https://data.example.test/backlog/index.json");
        assert_eq!(
            source.object_url(RecordKind::Scene, "0a1b2c"),
            "https://data.example.test/backlog/scenes/0a/0a1b2c.json"
        );
        assert_eq!(
            source.commits_url(),
            "https://api.example.test/repos/owner/repo/commits?page=1&per_page=1&path=index.json"
        );
    }

    #[test]
    fn parses_commit_date() {
        let value = json!([
            { "sha": "abc", "commit": { "committer": { "name": "x", "date": "2024-05-01T10:20:30Z" } } }
        ]);
        let date = parse_last_commit_date(value).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-01T10:20:30+00:00");
    }

    #[test]
    fn empty_commit_listing_is_an_error() {
        assert!(parse_last_commit_date(json!([])).is_err());
        assert!(parse_last_commit_date(json!({ "message": "rate limited" })).is_err());
    }
}
