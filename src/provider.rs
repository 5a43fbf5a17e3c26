use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::backup_data::{
    self, BACKUP_GAMES_ADVISORY, DEMO_DATA_ADVISORY, HOME_DEMO_ADVISORY,
};
use crate::filter::filter_profiles;
use crate::state::{Delta, ProfileDetail, ProviderCommand};
use crate::xbox_api::XboxApi;

/// Runs every command on its own thread so a slow lookup never blocks the
/// next one; responses may arrive out of order and carry their sequence
/// number back to the state.
pub fn spawn_provider(api: XboxApi, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let api = api.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                for delta in handle_command(&api, cmd) {
                    if tx.send(delta).is_err() {
                        break;
                    }
                }
            });
        }
    });
}

/// Resolves one command into the deltas it produces, substituting
/// demonstration data wherever the API call fails.
pub fn handle_command(api: &XboxApi, cmd: ProviderCommand) -> Vec<Delta> {
    let mut out = Vec::new();
    match cmd {
        ProviderCommand::SearchHomeProfiles { seq, query } => {
            let (profiles, advisory) = match api.search_profiles(&query).into_result() {
                Ok(profiles) => (profiles, None),
                Err(err) => {
                    out.push(Delta::Log(format!("[WARN] Profile search error: {err}")));
                    (
                        vec![backup_data::featured_profile()],
                        Some(HOME_DEMO_ADVISORY.to_string()),
                    )
                }
            };
            out.push(Delta::HomeProfiles {
                seq,
                profiles,
                advisory,
            });
        }
        ProviderCommand::SearchProfiles { seq, query } => {
            let (profiles, advisory) = match api.search_profiles(&query).into_result() {
                Ok(profiles) => (profiles, None),
                Err(err) => {
                    out.push(Delta::Log(format!("[WARN] Profile search error: {err}")));
                    let mock = backup_data::mock_profiles();
                    let filtered = filter_profiles(&mock, &query)
                        .into_iter()
                        .cloned()
                        .collect();
                    (filtered, Some(DEMO_DATA_ADVISORY.to_string()))
                }
            };
            out.push(Delta::Profiles {
                seq,
                profiles,
                advisory,
            });
        }
        ProviderCommand::FetchProfileDetail { seq, profile } => {
            let profile = match api.get_profile_by_xuid(&profile.xuid).into_result() {
                Ok(fresh) => fresh,
                Err(err) => {
                    out.push(Delta::Log(format!("[WARN] Profile lookup error: {err}")));
                    profile
                }
            };
            let stats = match api.get_overall_stats(&profile.xuid).into_result() {
                Ok(stats) => stats,
                Err(err) => {
                    out.push(Delta::Log(format!("[WARN] Stats lookup error: {err}")));
                    Vec::new()
                }
            };
            out.push(Delta::ProfileDetail {
                seq,
                detail: ProfileDetail { profile, stats },
            });
        }
        ProviderCommand::FetchGames { seq } => {
            let (games, advisory) = match api.get_all_games().into_result() {
                Ok(games) if !games.is_empty() => (games, None),
                Ok(_) => {
                    out.push(Delta::Log("[WARN] Games catalog returned no items".to_string()));
                    (
                        backup_data::backup_games(),
                        Some(BACKUP_GAMES_ADVISORY.to_string()),
                    )
                }
                Err(err) => {
                    out.push(Delta::Log(format!("[WARN] Games catalog error: {err}")));
                    (
                        backup_data::backup_games(),
                        Some(BACKUP_GAMES_ADVISORY.to_string()),
                    )
                }
            };
            out.push(Delta::Games {
                seq,
                games,
                advisory,
            });
        }
        ProviderCommand::SearchAchievements { seq, xuid, query } => {
            let (achievements, advisory) = match api.get_achievements(&xuid, None).into_result() {
                Ok(achievements) => (achievements, None),
                Err(err) => {
                    out.push(Delta::Log(format!(
                        "[WARN] Achievements error for '{query}': {err}"
                    )));
                    (
                        backup_data::mock_achievements(),
                        Some(DEMO_DATA_ADVISORY.to_string()),
                    )
                }
            };
            out.push(Delta::Achievements {
                seq,
                achievements,
                advisory,
            });
        }
    }
    out
}
