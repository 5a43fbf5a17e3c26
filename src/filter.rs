use std::collections::BTreeSet;

use crate::types::{Achievement, AchievementState, XboxGame, XboxProfile};

pub const DEVELOPER_PICKER_LIMIT: usize = 50;

/// Lowercased query; whitespace-only input becomes the empty (identity) query.
/// Non-blank input keeps its surrounding whitespace.
pub fn normalize_query(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    raw.to_lowercase()
}

/// `needle_lower` must already be lowercased; an empty needle matches everything.
pub fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(needle_lower)
}

pub trait Searchable {
    /// True when any search field contains the lowercased query.
    fn matches_query(&self, query_lower: &str) -> bool;
}

impl Searchable for XboxProfile {
    fn matches_query(&self, query_lower: &str) -> bool {
        contains_ci(&self.gamertag, query_lower)
            || self
                .real_name
                .as_deref()
                .is_some_and(|name| contains_ci(name, query_lower))
            || self
                .location
                .as_deref()
                .is_some_and(|loc| contains_ci(loc, query_lower))
    }
}

impl Searchable for XboxGame {
    fn matches_query(&self, query_lower: &str) -> bool {
        contains_ci(&self.name, query_lower)
            || self.developers.iter().any(|d| contains_ci(d, query_lower))
            || self.publishers.iter().any(|p| contains_ci(p, query_lower))
    }
}

impl Searchable for Achievement {
    fn matches_query(&self, query_lower: &str) -> bool {
        contains_ci(&self.name, query_lower)
            || contains_ci(&self.description, query_lower)
            || self.title_names().any(|t| contains_ci(t, query_lower))
    }
}

pub fn filter_by_query<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let query = normalize_query(query);
    items
        .iter()
        .filter(|item| query.is_empty() || item.matches_query(&query))
        .collect()
}

pub fn filter_profiles<'a>(profiles: &'a [XboxProfile], query: &str) -> Vec<&'a XboxProfile> {
    filter_by_query(profiles, query)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GameFilter {
    pub query: String,
    pub genre: Option<String>,
    pub developer: Option<String>,
}

impl GameFilter {
    pub fn is_identity(&self) -> bool {
        normalize_query(&self.query).is_empty()
            && selection(self.genre.as_deref()).is_none()
            && selection(self.developer.as_deref()).is_none()
    }
}

fn selection(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_query).filter(|s| !s.is_empty())
}

/// Indices into `games` of the entries passing every active dimension, in source order.
pub fn filter_game_indices(games: &[XboxGame], filter: &GameFilter) -> Vec<usize> {
    let query = normalize_query(&filter.query);
    let genre = selection(filter.genre.as_deref());
    let developer = selection(filter.developer.as_deref());

    games
        .iter()
        .enumerate()
        .filter(|(_, game)| query.is_empty() || game.matches_query(&query))
        .filter(|(_, game)| match &genre {
            Some(genre) => game.genre.iter().any(|g| contains_ci(g, genre)),
            None => true,
        })
        .filter(|(_, game)| match &developer {
            Some(dev) => game.developers.iter().any(|d| contains_ci(d, dev)),
            None => true,
        })
        .map(|(idx, _)| idx)
        .collect()
}

pub fn filter_games<'a>(games: &'a [XboxGame], filter: &GameFilter) -> Vec<&'a XboxGame> {
    filter_game_indices(games, filter)
        .into_iter()
        .filter_map(|idx| games.get(idx))
        .collect()
}

pub fn genre_list(games: &[XboxGame]) -> Vec<String> {
    distinct_sorted(games.iter().flat_map(|g| g.genre.iter()))
}

/// First `limit` games that carry at least one genre, in catalog order.
pub fn genre_examples(games: &[XboxGame], limit: usize) -> Vec<&XboxGame> {
    games.iter().filter(|g| !g.genre.is_empty()).take(limit).collect()
}

pub fn developer_list(games: &[XboxGame]) -> Vec<String> {
    distinct_sorted(games.iter().flat_map(|g| g.developers.iter()))
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AchievementStatusFilter {
    #[default]
    All,
    Achieved,
    InProgress,
    NotStarted,
    Secret,
}

impl AchievementStatusFilter {
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Achieved,
        Self::InProgress,
        Self::NotStarted,
        Self::Secret,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "" | "all" => Some(Self::All),
            "achieved" => Some(Self::Achieved),
            "inprogress" => Some(Self::InProgress),
            "notstarted" => Some(Self::NotStarted),
            "secret" => Some(Self::Secret),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Achieved => "achieved",
            Self::InProgress => "inprogress",
            Self::NotStarted => "notstarted",
            Self::Secret => "secret",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Achieved,
            Self::Achieved => Self::InProgress,
            Self::InProgress => Self::NotStarted,
            Self::NotStarted => Self::Secret,
            Self::Secret => Self::All,
        }
    }

    pub fn accepts(self, achievement: &Achievement) -> bool {
        match self {
            Self::All => true,
            Self::Achieved => achievement.state() == AchievementState::Achieved,
            Self::InProgress => achievement.state() == AchievementState::InProgress,
            Self::NotStarted => achievement.state() == AchievementState::NotStarted,
            Self::Secret => achievement.is_secret,
        }
    }
}

pub fn status_filter_label(filter: AchievementStatusFilter) -> &'static str {
    match filter {
        AchievementStatusFilter::All => "All",
        AchievementStatusFilter::Achieved => "Unlocked",
        AchievementStatusFilter::InProgress => "In progress",
        AchievementStatusFilter::NotStarted => "Not started",
        AchievementStatusFilter::Secret => "Secret",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AchievementFilter {
    pub query: String,
    pub status: AchievementStatusFilter,
}

pub fn filter_achievement_indices(
    achievements: &[Achievement],
    filter: &AchievementFilter,
) -> Vec<usize> {
    let query = normalize_query(&filter.query);
    achievements
        .iter()
        .enumerate()
        .filter(|(_, a)| query.is_empty() || a.matches_query(&query))
        .filter(|(_, a)| filter.status.accepts(a))
        .map(|(idx, _)| idx)
        .collect()
}

pub fn filter_achievements<'a>(
    achievements: &'a [Achievement],
    filter: &AchievementFilter,
) -> Vec<&'a Achievement> {
    filter_achievement_indices(achievements, filter)
        .into_iter()
        .filter_map(|idx| achievements.get(idx))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AchievementSummary {
    pub displayed: usize,
    pub unlocked: usize,
    pub total_gamerscore: u64,
}

pub fn summarize<'a>(achievements: impl IntoIterator<Item = &'a Achievement>) -> AchievementSummary {
    achievements
        .into_iter()
        .fold(AchievementSummary::default(), |mut acc, a| {
            acc.displayed += 1;
            if a.is_unlocked() {
                acc.unlocked += 1;
            }
            acc.total_gamerscore = acc.total_gamerscore.saturating_add(a.gamerscore());
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_ci_handles_non_ascii() {
        assert!(contains_ci("São Paulo, Brasil", &normalize_query("SÃO")));
        assert!(!contains_ci("Rio", "são"));
    }

    #[test]
    fn status_filter_keys_round_trip() {
        for filter in AchievementStatusFilter::ALL {
            assert_eq!(AchievementStatusFilter::from_key(filter.key()), Some(filter));
        }
        assert_eq!(AchievementStatusFilter::from_key("bogus"), None);
    }

    #[test]
    fn game_filter_identity_ignores_blank_selections() {
        let filter = GameFilter {
            query: "  ".to_string(),
            genre: Some(String::new()),
            developer: None,
        };
        assert!(filter.is_identity());
    }
}
