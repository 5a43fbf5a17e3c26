use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PreferredColor {
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub tertiary_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct XboxProfile {
    pub xuid: String,
    pub gamertag: String,
    #[serde(default)]
    pub gamer_score: u64,
    #[serde(default)]
    pub account_tier: String,
    #[serde(default)]
    pub xbox_one_rep: String,
    #[serde(default)]
    pub preferred_color: Option<PreferredColor>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tenure: Option<u32>,
    #[serde(default)]
    pub watermarks: Vec<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub game_display_pic_raw: Option<String>,
}

impl XboxProfile {
    /// Gamertag plus real name when the profile shares one.
    pub fn display_name(&self) -> String {
        match self.real_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("{} ({name})", self.gamertag),
            _ => self.gamertag.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NorthAmerica,
    Europe,
    Japan,
    Australia,
}

pub fn region_label(region: Region) -> &'static str {
    match region {
        Region::NorthAmerica => "North America",
        Region::Europe => "Europe",
        Region::Japan => "Japan",
        Region::Australia => "Australia",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReleaseDates {
    #[serde(rename = "Japan", default)]
    pub japan: Option<String>,
    #[serde(rename = "NorthAmerica", default)]
    pub north_america: Option<String>,
    #[serde(rename = "Europe", default)]
    pub europe: Option<String>,
    #[serde(rename = "Australia", default)]
    pub australia: Option<String>,
}

impl ReleaseDates {
    pub fn entries(&self) -> [(Region, Option<&str>); 4] {
        [
            (Region::NorthAmerica, self.north_america.as_deref()),
            (Region::Europe, self.europe.as_deref()),
            (Region::Japan, self.japan.as_deref()),
            (Region::Australia, self.australia.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct XboxGame {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_list")]
    pub genre: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub developers: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub release_dates: Option<ReleaseDates>,
}

impl XboxGame {
    pub fn available_regions(&self) -> Vec<Region> {
        let Some(dates) = &self.release_dates else {
            return Vec::new();
        };
        dates
            .entries()
            .into_iter()
            .filter_map(|(region, date)| match date {
                Some(d) if !d.trim().is_empty() && d != "Unreleased" => Some(region),
                _ => None,
            })
            .collect()
    }

    /// Earliest known release across regions, skipping placeholders like `TBA`.
    pub fn earliest_release(&self) -> Option<(Region, String)> {
        let dates = self.release_dates.as_ref()?;
        let mut candidates: Vec<(Region, &str)> = dates
            .entries()
            .into_iter()
            .filter_map(|(region, date)| {
                let date = date?.trim();
                if date.is_empty() || date == "Unreleased" || date == "TBA" {
                    None
                } else {
                    Some((region, date))
                }
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }

        candidates.sort_by(|(_, a), (_, b)| match (parse_release_date(a), parse_release_date(b)) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        });
        candidates
            .first()
            .map(|(region, date)| (*region, (*date).to_string()))
    }
}

pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%d/%m/%Y"];

    let cleaned = raw.trim();
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(date);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AchievementState {
    #[default]
    NotStarted,
    InProgress,
    Achieved,
    #[serde(other)]
    Unknown,
}

pub fn achievement_state_label(state: AchievementState) -> &'static str {
    match state {
        AchievementState::NotStarted => "Not started",
        AchievementState::InProgress => "In progress",
        AchievementState::Achieved => "Unlocked",
        AchievementState::Unknown => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TitleAssociation {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Requirement {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    #[serde(default)]
    pub achievement_state: AchievementState,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub time_unlocked: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MediaAsset {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

pub const GAMERSCORE_REWARD: &str = "Gamerscore";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default)]
    pub service_config_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub title_associations: Vec<TitleAssociation>,
    #[serde(default)]
    pub progress_state: String,
    #[serde(default)]
    pub progression: Progression,
    #[serde(default)]
    pub media_assets: Vec<MediaAsset>,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub is_secret: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locked_description: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub achievement_type: String,
    #[serde(default)]
    pub participation_type: String,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub deeplink: String,
    #[serde(default)]
    pub is_revoked: bool,
}

impl Achievement {
    pub fn state(&self) -> AchievementState {
        self.progression.achievement_state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == AchievementState::Achieved
    }

    /// Points carried by the first `Gamerscore` reward; unparseable values count as zero.
    pub fn gamerscore(&self) -> u64 {
        self.rewards
            .iter()
            .find(|reward| reward.kind == GAMERSCORE_REWARD)
            .and_then(|reward| reward.value.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }

    pub fn requirements_met(&self) -> bool {
        self.progression.requirements.iter().all(|req| {
            let current = req.current.as_deref().map(str::trim).unwrap_or("");
            current == req.target.trim()
        })
    }

    pub fn progress_percent(&self) -> u8 {
        if self.is_unlocked() {
            return 100;
        }
        let mut current_total = 0.0_f64;
        let mut target_total = 0.0_f64;
        for req in &self.progression.requirements {
            let Ok(target) = req.target.trim().parse::<f64>() else {
                continue;
            };
            if target <= 0.0 {
                continue;
            }
            let current = req
                .current
                .as_deref()
                .and_then(|c| c.trim().parse::<f64>().ok())
                .unwrap_or(0.0);
            current_total += current.clamp(0.0, target);
            target_total += target;
        }
        if target_total <= 0.0 {
            return 0;
        }
        ((current_total / target_total) * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn display_description(&self) -> &str {
        if self.is_unlocked() || self.locked_description.trim().is_empty() {
            &self.description
        } else {
            &self.locked_description
        }
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.media_assets
            .iter()
            .find(|asset| asset.name == "Icon" || asset.kind == "Icon")
            .map(|asset| asset.url.as_str())
    }

    pub fn title_names(&self) -> impl Iterator<Item = &str> {
        self.title_associations.iter().map(|t| t.name.as_str())
    }

    /// Unlock timestamp as `dd/mm/yyyy`, when the upstream value is RFC 3339.
    pub fn unlocked_on(&self) -> Option<String> {
        if !self.is_unlocked() {
            return None;
        }
        let raw = self.progression.time_unlocked.trim();
        if raw.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.format("%d/%m/%Y").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    #[serde(default)]
    pub xuid: String,
    #[serde(default)]
    pub scid: String,
    #[serde(default)]
    pub title_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub scidname: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub title_name: String,
    #[serde(default)]
    pub title_type: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub uri: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// The catalog mixes list and scalar shapes (and nulls) for these fields.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<Option<String>>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => {
            if value.trim().is_empty() {
                Vec::new()
            } else {
                vec![value]
            }
        }
        OneOrMany::Many(values) => values
            .into_iter()
            .flatten()
            .filter(|v| !v.trim().is_empty())
            .collect(),
        OneOrMany::Null(()) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achievement_with(state: AchievementState, current: &str, target: &str) -> Achievement {
        Achievement {
            id: "a".to_string(),
            name: "A".to_string(),
            progression: Progression {
                achievement_state: state,
                requirements: vec![Requirement {
                    id: "1".to_string(),
                    current: Some(current.to_string()),
                    target: target.to_string(),
                }],
                time_unlocked: String::new(),
            },
            ..Achievement::default()
        }
    }

    #[test]
    fn unknown_state_string_maps_to_unknown() {
        let raw = r#"{"achievementState":"Revoked","requirements":[],"timeUnlocked":""}"#;
        let progression: Progression = serde_json::from_str(raw).expect("valid");
        assert_eq!(progression.achievement_state, AchievementState::Unknown);
    }

    #[test]
    fn progress_percent_uses_requirements_until_unlocked() {
        assert_eq!(achievement_with(AchievementState::InProgress, "7", "15").progress_percent(), 47);
        assert_eq!(achievement_with(AchievementState::Achieved, "0", "15").progress_percent(), 100);
        assert_eq!(achievement_with(AchievementState::NotStarted, "x", "0").progress_percent(), 0);
    }

    #[test]
    fn requirements_met_compares_current_to_target() {
        assert!(achievement_with(AchievementState::Achieved, "100", "100").requirements_met());
        assert!(!achievement_with(AchievementState::Achieved, "99", "100").requirements_met());
    }

    #[test]
    fn earliest_release_parses_dates_instead_of_comparing_text() {
        let game = XboxGame {
            id: 1,
            name: "G".to_string(),
            release_dates: Some(ReleaseDates {
                japan: Some("Nov 9, 2021".to_string()),
                north_america: Some("Dec 1, 2020".to_string()),
                europe: Some("TBA".to_string()),
                australia: Some("Unreleased".to_string()),
            }),
            ..XboxGame::default()
        };
        let (region, date) = game.earliest_release().expect("has dates");
        assert_eq!(region, Region::NorthAmerica);
        assert_eq!(date, "Dec 1, 2020");
        assert_eq!(
            game.available_regions(),
            vec![Region::NorthAmerica, Region::Europe, Region::Japan]
        );
    }

    #[test]
    fn genre_accepts_scalar_and_null() {
        let scalar: XboxGame =
            serde_json::from_str(r#"{"id":1,"name":"A","genre":"Racing"}"#).expect("valid");
        assert_eq!(scalar.genre, vec!["Racing".to_string()]);
        let null: XboxGame =
            serde_json::from_str(r#"{"id":2,"name":"B","genre":null,"developers":["", "X"]}"#)
                .expect("valid");
        assert!(null.genre.is_empty());
        assert_eq!(null.developers, vec!["X".to_string()]);
    }

    #[test]
    fn unlocked_on_formats_day_first() {
        let mut achievement = achievement_with(AchievementState::Achieved, "1", "1");
        achievement.progression.time_unlocked = "2024-01-15T10:30:00Z".to_string();
        assert_eq!(achievement.unlocked_on().as_deref(), Some("15/01/2024"));
    }
}
