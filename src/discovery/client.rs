//! Web API client for the catalog listing and per-entry detail lookups.
//!
//! The client is created once per run and shared by every lookup task through
//! the engine's context, taking advantage of connection pooling. Request URLs
//! carry the API key, so neither URLs nor URL-bearing reqwest errors are logged.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::config::DiscoveryConfig;
use super::constants::{CONNECT_TIMEOUT, OWNED_GAMES_PATH, PLAYER_ACHIEVEMENTS_PATH};
use super::error::{DiscoveryError, FetchError};
use super::fetcher::{DetailRecord, FetchOutcome, ItemFetcher};
use crate::user_agent;

#[derive(Debug, Deserialize)]
struct OwnedGamesResponse {
    #[serde(default)]
    response: OwnedGames,
}

#[derive(Debug, Default, Deserialize)]
struct OwnedGames {
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u64,
}

/// HTTP client bound to one API key and account.
#[derive(Debug, Clone)]
pub struct StatsApiClient {
    client: Client,
    catalog_url: Url,
    detail_url: Url,
}

impl StatsApiClient {
    /// Builds the client and pre-computes both endpoint URLs.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidBaseUrl`] for an unparsable base URL and
    /// [`DiscoveryError::Client`] if reqwest cannot build the client.
    #[instrument(level = "debug", skip(config), fields(api_base = %config.api_base))]
    pub fn new(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .user_agent(user_agent::default_api_user_agent())
            .gzip(true)
            .build()
            .map_err(DiscoveryError::Client)?;

        let mut catalog_url = endpoint(&config.api_base, OWNED_GAMES_PATH)?;
        catalog_url
            .query_pairs_mut()
            .append_pair("key", &config.api_key)
            .append_pair("steamid", &config.steam_id)
            .append_pair("include_played_free_games", "true")
            .append_pair("include_free_sub", "true")
            .append_pair("skip_unvetted_apps", "false");

        let mut detail_url = endpoint(&config.api_base, PLAYER_ACHIEVEMENTS_PATH)?;
        detail_url
            .query_pairs_mut()
            .append_pair("key", &config.api_key)
            .append_pair("steamid", &config.steam_id);

        Ok(Self {
            client,
            catalog_url,
            detail_url,
        })
    }

    /// Fetches the account's catalog in API order.
    ///
    /// Any failure here is fatal to the run; the catalog is never retried.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::CatalogRequest`], [`DiscoveryError::CatalogStatus`]
    /// or [`DiscoveryError::CatalogDecode`].
    #[instrument(skip(self))]
    pub async fn owned_games(&self) -> Result<Vec<u64>, DiscoveryError> {
        let response = self
            .client
            .get(self.catalog_url.clone())
            .send()
            .await
            .map_err(|e| DiscoveryError::CatalogRequest(e.without_url()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DiscoveryError::CatalogRequest(e.without_url()))?;

        if !status.is_success() {
            return Err(DiscoveryError::CatalogStatus {
                status: status.as_u16(),
            });
        }

        let owned: OwnedGamesResponse =
            serde_json::from_slice(&body).map_err(DiscoveryError::CatalogDecode)?;
        let games: Vec<u64> = owned.response.games.into_iter().map(|g| g.appid).collect();

        debug!(count = games.len(), "catalog listed");
        Ok(games)
    }

    /// Performs one detail lookup for `app_id`.
    ///
    /// The body is always read to completion so the pooled connection is
    /// released on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`]/[`FetchError::Timeout`] for transport
    /// failures, [`FetchError::Decode`] for a body that is not a detail record
    /// and [`FetchError::HttpStatus`] for a non-2xx status with an empty body.
    #[instrument(level = "debug", skip(self))]
    pub async fn player_achievements(&self, app_id: u64) -> Result<FetchOutcome, FetchError> {
        let mut url = self.detail_url.clone();
        url.query_pairs_mut()
            .append_pair("appid", &app_id.to_string());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(app_id, e.without_url()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(app_id, e.without_url()))?;

        decode_detail(app_id, status, &body)
    }
}

#[async_trait::async_trait]
impl ItemFetcher for StatsApiClient {
    async fn fetch(&self, app_id: u64) -> Result<FetchOutcome, FetchError> {
        self.player_achievements(app_id).await
    }
}

fn endpoint(base: &str, path: &str) -> Result<Url, DiscoveryError> {
    let raw = format!("{}{path}", base.trim_end_matches('/'));
    Url::parse(&raw).map_err(|source| DiscoveryError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })
}

/// Maps a drained response to an outcome.
///
/// A non-2xx status that still carries a detail record is how the API reports
/// entries without stats, so it counts as success. Any other non-empty body is
/// a decode failure regardless of status.
fn decode_detail(app_id: u64, status: StatusCode, body: &[u8]) -> Result<FetchOutcome, FetchError> {
    match serde_json::from_slice::<DetailRecord>(body) {
        Ok(record) => {
            if !status.is_success() || record.player_stats.success == Some(false) {
                debug!(
                    app_id,
                    status = status.as_u16(),
                    api_error = record.player_stats.error.as_deref().unwrap_or(""),
                    "API reported no stats"
                );
            }
            Ok(FetchOutcome::from_record(app_id, &record))
        }
        Err(_) if !status.is_success() && body.trim_ascii().is_empty() => {
            Err(FetchError::http_status(app_id, status.as_u16()))
        }
        Err(source) => Err(FetchError::decode(app_id, status.as_u16(), source)),
    }
}
