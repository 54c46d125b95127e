//! Mock Web API shared by the wiremock-based tests.
//!
//! Sandboxed runners often forbid binding a localhost socket. Tests then skip
//! with a note on stderr unless `CAM_REQUIRE_SOCKET_TESTS` asks for a hard
//! failure.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CATALOG_PATH: &str = "/IPlayerService/GetOwnedGames/v1";
pub const DETAIL_PATH: &str = "/ISteamUserStats/GetPlayerAchievements/v1";
pub const API_KEY: &str = "SECRET-KEY";
pub const STEAM_ID: &str = "76561198000000000";

const REQUIRE_ENV: &str = "CAM_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .is_ok_and(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "yes"))
}

/// Starts a mock API server, or returns `None` when localhost sockets are
/// unavailable and skipping is allowed.
#[track_caller]
pub fn start_mock_api() -> impl Future<Output = Option<MockServer>> {
    let caller = Location::caller();
    let bindable = TcpListener::bind("127.0.0.1:0").is_ok();

    async move {
        if bindable {
            return Some(MockServer::start().await);
        }

        let note = format!(
            "mock API unavailable for {}:{}: localhost sockets cannot be bound",
            caller.file(),
            caller.line()
        );
        assert!(!sockets_required(), "{note} ({REQUIRE_ENV} is set)");
        eprintln!("{note}; skipping (set {REQUIRE_ENV}=1 to fail instead)");
        None
    }
}

pub fn catalog_body(ids: &[u64]) -> serde_json::Value {
    let games: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({ "appid": id, "playtime_forever": 0 }))
        .collect();
    serde_json::json!({ "response": { "game_count": ids.len(), "games": games } })
}

/// Detail record with one achievement per entry of `achieved` (0 = locked).
pub fn detail_body(achieved: &[u8]) -> serde_json::Value {
    let achievements: Vec<_> = achieved
        .iter()
        .enumerate()
        .map(|(i, a)| serde_json::json!({ "apiname": format!("ACH_{i}"), "achieved": a, "unlocktime": 0 }))
        .collect();
    serde_json::json!({ "playerstats": { "steamID": STEAM_ID, "achievements": achievements, "success": true } })
}

/// Serves `ids` as the owned-games list for [`API_KEY`]/[`STEAM_ID`].
pub async fn mount_catalog(server: &MockServer, ids: &[u64]) {
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("key", API_KEY))
        .and(query_param("steamid", STEAM_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(ids)))
        .mount(server)
        .await;
}

pub async fn mount_detail(server: &MockServer, app_id: u64, achieved: &[u8]) {
    Mock::given(method("GET"))
        .and(path(DETAIL_PATH))
        .and(query_param("appid", app_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(achieved)))
        .mount(server)
        .await;
}
