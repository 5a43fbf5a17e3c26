use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use rand::seq::SliceRandom;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::envelope::ApiResponse;
use crate::filter::{contains_ci, normalize_query};
use crate::transport::{HttpTransport, StubTransport, Transport};
use crate::types::{Achievement, GameStats, XboxGame, XboxProfile};

pub const API_NOT_CONFIGURED: &str = "API not configured";
pub const DEFAULT_RECENT_LIMIT: usize = 20;
pub const DEFAULT_RANDOM_LIMIT: usize = 10;

/// Client for the profile/achievement/stats REST API and the public games
/// catalog. Every call folds transport, status and decoding failures into
/// the returned [`ApiResponse`].
#[derive(Clone)]
pub struct XboxApi {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl XboxApi {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn from_config(config: Config) -> Self {
        let transport: Arc<dyn Transport> = if config.offline {
            Arc::new(StubTransport::new())
        } else {
            Arc::new(HttpTransport::new(config.request_timeout))
        };
        Self::new(config, transport)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_profile(&self, gamertag: &str) -> ApiResponse<XboxProfile> {
        ApiResponse::from_result(self.fetch_json(&["profile", gamertag], None, "profile"))
    }

    pub fn get_profile_by_xuid(&self, xuid: &str) -> ApiResponse<XboxProfile> {
        ApiResponse::from_result(self.fetch_json(&["profile", "xuid", xuid], None, "profile"))
    }

    pub fn search_profiles(&self, query: &str) -> ApiResponse<Vec<XboxProfile>> {
        ApiResponse::from_result(self.fetch_json(
            &["profile", "search"],
            Some(("q", query)),
            "profile search",
        ))
    }

    pub fn get_all_games(&self) -> ApiResponse<Vec<XboxGame>> {
        ApiResponse::from_result(self.fetch_games_catalog())
    }

    pub fn get_game_by_id(&self, id: u64) -> ApiResponse<Option<XboxGame>> {
        ApiResponse::from_result(
            self.fetch_games_catalog()
                .map(|games| games.into_iter().find(|g| g.id == id)),
        )
    }

    /// Catalog search over name, developers, publishers and genres.
    pub fn search_games(&self, query: &str) -> ApiResponse<Vec<XboxGame>> {
        let query = normalize_query(query);
        self.filtered_catalog(|game| {
            contains_ci(&game.name, &query)
                || game.developers.iter().any(|d| contains_ci(d, &query))
                || game.publishers.iter().any(|p| contains_ci(p, &query))
                || game.genre.iter().any(|g| contains_ci(g, &query))
        })
    }

    pub fn get_games_by_genre(&self, genre: &str) -> ApiResponse<Vec<XboxGame>> {
        let genre = normalize_query(genre);
        self.filtered_catalog(|game| game.genre.iter().any(|g| contains_ci(g, &genre)))
    }

    pub fn get_games_by_developer(&self, developer: &str) -> ApiResponse<Vec<XboxGame>> {
        let developer = normalize_query(developer);
        self.filtered_catalog(|game| game.developers.iter().any(|d| contains_ci(d, &developer)))
    }

    /// Highest ids first; the catalog assigns ids in publication order.
    pub fn get_recent_games(&self, limit: usize) -> ApiResponse<Vec<XboxGame>> {
        ApiResponse::from_result(self.fetch_games_catalog().map(|mut games| {
            games.sort_by(|a, b| b.id.cmp(&a.id));
            games.truncate(limit);
            games
        }))
    }

    pub fn get_random_games(&self, limit: usize) -> ApiResponse<Vec<XboxGame>> {
        ApiResponse::from_result(self.fetch_games_catalog().map(|mut games| {
            games.shuffle(&mut rand::thread_rng());
            games.truncate(limit);
            games
        }))
    }

    pub fn get_achievements(
        &self,
        xuid: &str,
        title_id: Option<&str>,
    ) -> ApiResponse<Vec<Achievement>> {
        let result = match title_id.filter(|t| !t.trim().is_empty()) {
            Some(title_id) => self.fetch_json(&["achievements", xuid, title_id], None, "achievements"),
            None => self.fetch_json(&["achievements", xuid], None, "achievements"),
        };
        ApiResponse::from_result(result)
    }

    pub fn get_achievement_details(
        &self,
        xuid: &str,
        achievement_id: &str,
    ) -> ApiResponse<Achievement> {
        ApiResponse::from_result(self.fetch_json(
            &["achievements", xuid, "details", achievement_id],
            None,
            "achievement",
        ))
    }

    pub fn get_recent_achievements(&self, xuid: &str) -> ApiResponse<Vec<Achievement>> {
        ApiResponse::from_result(self.fetch_json(
            &["achievements", xuid, "recent"],
            None,
            "achievements",
        ))
    }

    pub fn get_game_stats(&self, xuid: &str, title_id: &str) -> ApiResponse<Vec<GameStats>> {
        ApiResponse::from_result(self.fetch_json(&["stats", xuid, title_id], None, "stats"))
    }

    pub fn get_overall_stats(&self, xuid: &str) -> ApiResponse<Vec<GameStats>> {
        ApiResponse::from_result(self.fetch_json(&["stats", xuid], None, "stats"))
    }

    fn filtered_catalog(&self, keep: impl Fn(&XboxGame) -> bool) -> ApiResponse<Vec<XboxGame>> {
        ApiResponse::from_result(
            self.fetch_games_catalog()
                .map(|games| games.into_iter().filter(|g| keep(g)).collect()),
        )
    }

    fn fetch_games_catalog(&self) -> Result<Vec<XboxGame>> {
        let body = self.transport.get(&self.config.games_url, &[])?;
        parse_games_json(&body)
    }

    fn fetch_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: Option<(&str, &str)>,
        what: &str,
    ) -> Result<T> {
        let url = self.endpoint_url(segments, query)?;
        let bearer = self.config.api_key.as_ref().map(|key| format!("Bearer {key}"));
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(bearer) = bearer.as_deref() {
            headers.push(("Authorization", bearer));
        }

        let body = self.transport.get(&url, &headers)?;
        parse_json(&body, what)
    }

    fn endpoint_url(&self, segments: &[&str], query: Option<(&str, &str)>) -> Result<String> {
        let base = self
            .config
            .api_base_url
            .as_deref()
            .ok_or_else(|| anyhow!(API_NOT_CONFIGURED))?;
        let mut url = Url::parse(base).context(API_NOT_CONFIGURED)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!(API_NOT_CONFIGURED))?
            .pop_if_empty()
            .extend(segments);
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url.to_string())
    }
}

pub fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    serde_json::from_str(raw.trim()).with_context(|| format!("invalid {what} json"))
}

/// The catalog answers with a flat array; an empty or `null` body is an empty catalog.
pub fn parse_games_json(raw: &str) -> Result<Vec<XboxGame>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    parse_json(trimmed, "games")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_with(transport: StubTransport, base: Option<&str>) -> XboxApi {
        let config = Config {
            api_base_url: base.map(str::to_string),
            api_key: Some("secret".to_string()),
            games_url: "https://games.test/xbox/games".to_string(),
            ..Config::default()
        };
        XboxApi::new(config, Arc::new(transport))
    }

    #[test]
    fn endpoint_url_encodes_segments_and_query() {
        let api = api_with(StubTransport::new(), Some("https://xbl.test/v2"));
        let url = api
            .endpoint_url(&["profile", "Major Nelson"], None)
            .expect("url");
        assert_eq!(url, "https://xbl.test/v2/profile/Major%20Nelson");
        let url = api
            .endpoint_url(&["profile", "search"], Some(("q", "a&b")))
            .expect("url");
        assert_eq!(url, "https://xbl.test/v2/profile/search?q=a%26b");
    }

    #[test]
    fn missing_base_url_fails_without_touching_transport() {
        let api = api_with(StubTransport::new(), None);
        let resp = api.get_profile("anyone");
        assert_eq!(resp.error(), Some(API_NOT_CONFIGURED));
    }

    #[test]
    fn recent_games_sort_by_id_descending() {
        let body = r#"[{"id":1,"name":"A"},{"id":3,"name":"C"},{"id":2,"name":"B"}]"#;
        let api = api_with(
            StubTransport::new().with_body("https://games.test/xbox/games", body),
            None,
        );
        let names: Vec<String> = api
            .get_recent_games(2)
            .into_data()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["C".to_string(), "B".to_string()]);
        assert_eq!(api.get_random_games(5).data().len(), 3);
    }
}
