//! Constants for the discovery module (timeouts, backoff, API paths).

use std::time::Duration;

/// Default Web API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.steampowered.com";

/// Overall timeout for a single API request (1 minute).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connect timeout for API requests (10 seconds).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backoff after a response that could not be decoded (likely upstream throttling).
pub const THROTTLED_BACKOFF: Duration = Duration::from_secs(60);

/// Backoff after any other failure (network, status, timeout).
pub const TRANSIENT_BACKOFF: Duration = Duration::from_secs(10);

/// Catalog listing endpoint, relative to the API base.
pub(crate) const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v1";

/// Per-entry detail endpoint, relative to the API base.
pub(crate) const PLAYER_ACHIEVEMENTS_PATH: &str = "/ISteamUserStats/GetPlayerAchievements/v1";
