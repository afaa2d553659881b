//! Helix REST client.
//!
//! One authenticated GET against `<api_root>/streams` per batch chunk,
//! `user_login` repeated once per name. Chunk size comes from the
//! `api_batch_size` preference (1 = one request per name, capped at the
//! Helix maximum of 100), so either upstream batching granularity works.
//!
//! A name with no matching record is offline, not an error. A chunk whose
//! request fails (network, timeout, non-2xx, unparsable body) is reported
//! as failed wholesale; the caller decides what "unknown" means.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Error;
use crate::prefs::Preferences;
use crate::twitch::{ChannelStatus, StatusFetch, StatusReport};

const HELIX_MAX_BATCH: usize = 100;

/// Response from the "Get Streams" endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    #[serde(default)]
    pub data: Vec<StreamRecord>,
}

/// Single live-stream record. Every field defaulted: Helix omissions must
/// not fail the whole batch.
#[derive(Debug, Deserialize)]
pub struct StreamRecord {
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
}

impl From<StreamRecord> for ChannelStatus {
    fn from(rec: StreamRecord) -> Self {
        let login = rec.user_login.to_lowercase();
        let display_name = if rec.user_name.is_empty() {
            login.clone()
        } else {
            rec.user_name
        };
        Self {
            login,
            is_live: true,
            display_name,
            category: rec.game_name,
            title: rec.title,
        }
    }
}

pub struct HelixClient {
    http: reqwest::Client,
    prefs: Preferences,
}

impl HelixClient {
    /// Build the client and validate the credentials it will send. An
    /// empty token or client id is a configuration error, surfaced here so
    /// startup fails loudly instead of every refresh failing quietly.
    pub fn new(prefs: Preferences) -> Result<Self, Error> {
        if prefs.get_str("api_token", "").trim().is_empty() {
            return Err(Error::Config(
                "cw_api_token is empty; provision a Helix bearer token with /set api_token"
                    .to_string(),
            ));
        }
        if prefs.get_str("api_client_id", "").trim().is_empty() {
            return Err(Error::Config("cw_api_client_id is empty".to_string()));
        }

        let timeout = prefs.get_u64("api_timeout_secs", 10);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout.max(1)))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, prefs })
    }

    fn batch_size(&self) -> usize {
        (self.prefs.get_u64("api_batch_size", HELIX_MAX_BATCH as u64) as usize)
            .clamp(1, HELIX_MAX_BATCH)
    }

    /// One GET for one chunk of logins. Preferences are read per request
    /// so `/set api_token` or a changed api root applies without restart.
    async fn fetch_chunk(&self, logins: &[String]) -> Result<Vec<StreamRecord>, Error> {
        let scope = logins.join(",");
        let token = self.prefs.get_str("api_token", "");
        if token.trim().is_empty() {
            return Err(Error::Config("cw_api_token is empty".to_string()));
        }
        let client_id = self.prefs.get_str("api_client_id", "");
        let root = self
            .prefs
            .get_str("twitch_api_root", "https://api.twitch.tv/helix");
        let url = format!("{}/streams", root.trim_end_matches('/'));

        let query: Vec<(&str, &str)> = logins.iter().map(|l| ("user_login", l.as_str())).collect();

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .header("Client-Id", client_id)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| Error::FetchFailed {
                scope: scope.clone(),
                cause: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::FetchFailed {
                scope,
                cause: format!("HTTP {} => {}", status, body),
            });
        }

        let parsed: StreamsResponse = resp.json().await.map_err(|e| Error::FetchFailed {
            scope,
            cause: format!("parse error: {}", e),
        })?;

        Ok(parsed.data)
    }
}

#[async_trait::async_trait]
impl StatusFetch for HelixClient {
    async fn fetch_status(&self, logins: &[String]) -> StatusReport {
        let mut report = StatusReport::default();

        for chunk in logins.chunks(self.batch_size()) {
            match self.fetch_chunk(chunk).await {
                Ok(records) => absorb_chunk(&mut report, chunk, records),
                Err(e) => {
                    // Unknown, not offline: the engine must not flip a
                    // displayed online label on a transient failure.
                    warn!("{}", e);
                    report.failed.extend(chunk.iter().cloned());
                }
            }
        }

        debug!(
            known = report.statuses.len(),
            unknown = report.failed.len(),
            "status fetch complete"
        );
        report
    }
}

/// Fold one successful chunk response into the report. Every queried name
/// gets an entry: a live record if the API returned one, offline
/// otherwise.
fn absorb_chunk(report: &mut StatusReport, chunk: &[String], records: Vec<StreamRecord>) {
    let mut live: HashMap<String, ChannelStatus> = records
        .into_iter()
        .map(|rec| {
            let status = ChannelStatus::from(rec);
            (status.login.clone(), status)
        })
        .collect();
    for login in chunk {
        let status = live
            .remove(login)
            .unwrap_or_else(|| ChannelStatus::offline(login));
        report.statuses.insert(login.clone(), status);
    }
}
