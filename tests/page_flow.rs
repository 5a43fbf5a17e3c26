use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use xbox_terminal::backup_data::{
    BACKUP_GAMES_ADVISORY, DEMO_DATA_ADVISORY, HOME_DEMO_ADVISORY, backup_games, mock_achievements,
};
use xbox_terminal::config::Config;
use xbox_terminal::filter::AchievementStatusFilter;
use xbox_terminal::provider::{handle_command, spawn_provider};
use xbox_terminal::state::{AppState, Delta, ProviderCommand, Screen, apply_delta};
use xbox_terminal::transport::StubTransport;
use xbox_terminal::types::XboxGame;
use xbox_terminal::xbox_api::XboxApi;

const GAMES: &str = "https://games.test/xbox/games";

fn failing_api() -> XboxApi {
    let config = Config {
        api_base_url: Some("https://xbl.test".to_string()),
        games_url: GAMES.to_string(),
        ..Config::default()
    };
    XboxApi::new(config, Arc::new(StubTransport::new()))
}

fn api_with_games(body: &str) -> XboxApi {
    let config = Config {
        games_url: GAMES.to_string(),
        ..Config::default()
    };
    XboxApi::new(config, Arc::new(StubTransport::new().with_body(GAMES, body)))
}

fn run(state: &mut AppState, api: &XboxApi, cmd: ProviderCommand) {
    for delta in handle_command(api, cmd) {
        apply_delta(state, delta);
    }
}

fn search(state: &mut AppState, screen: Screen, query: &str) -> Option<ProviderCommand> {
    state.set_screen(screen);
    assert!(state.open_search());
    state.search_input = Some(query.to_string());
    state.submit_search()
}

#[test]
fn network_failure_settles_profiles_on_mock_data() {
    let mut state = AppState::new();
    let cmd = search(&mut state, Screen::Profiles, "gamer").expect("profiles search is remote");
    assert!(state.profiles.status.loading);

    run(&mut state, &failing_api(), cmd);
    assert!(!state.profiles.status.loading);
    assert_eq!(state.profiles.status.advisory.as_deref(), Some(DEMO_DATA_ADVISORY));
    let tags: Vec<&str> = state.profiles.results.iter().map(|p| p.gamertag.as_str()).collect();
    assert_eq!(tags, vec!["ExampleGamer", "ProGamer2024", "RetroGamerBR"]);
    assert!(state.logs.iter().any(|l| l.starts_with("[WARN]")));
}

#[test]
fn network_failure_on_home_shows_featured_profile() {
    let mut state = AppState::new();
    let cmd = search(&mut state, Screen::Home, "anyone").expect("home search is remote");
    run(&mut state, &failing_api(), cmd);
    assert!(!state.home.status.loading);
    assert_eq!(state.home.status.advisory.as_deref(), Some(HOME_DEMO_ADVISORY));
    assert_eq!(state.home.profiles.len(), 1);
    assert_eq!(state.home.profiles[0].gamertag, "ExampleGamer");
}

#[test]
fn search_is_refused_while_loading() {
    let mut state = AppState::new();
    let _pending = search(&mut state, Screen::Profiles, "first");
    assert!(!state.open_search());
    assert!(state.search_input.is_none());
}

#[test]
fn stale_response_is_dropped() {
    let mut state = AppState::new();
    let slow = search(&mut state, Screen::Profiles, "slow").expect("remote");
    let ProviderCommand::SearchProfiles { seq: slow_seq, .. } = slow else {
        panic!("unexpected command {slow:?}");
    };
    state.profiles.status.loading = false;
    let fast = search(&mut state, Screen::Profiles, "fast").expect("remote");
    let ProviderCommand::SearchProfiles { seq: fast_seq, .. } = fast else {
        panic!("unexpected command {fast:?}");
    };
    assert!(fast_seq > slow_seq);

    let fresh = vec![xbox_terminal::backup_data::featured_profile()];
    apply_delta(
        &mut state,
        Delta::Profiles {
            seq: fast_seq,
            profiles: fresh.clone(),
            advisory: None,
        },
    );
    apply_delta(
        &mut state,
        Delta::Profiles {
            seq: slow_seq,
            profiles: Vec::new(),
            advisory: Some("late".to_string()),
        },
    );

    assert_eq!(state.profiles.results, fresh);
    assert!(state.profiles.status.advisory.is_none());
    assert!(
        state
            .logs
            .back()
            .is_some_and(|l| l.contains(&format!("#{slow_seq}")))
    );
}

#[test]
fn first_games_visit_fetches_and_falls_back_on_empty_catalog() {
    let mut state = AppState::new();
    let cmd = state.set_screen(Screen::Games).expect("first visit loads the catalog");
    assert!(state.games.status.loading);
    assert!(state.set_screen(Screen::Games).is_none());

    run(&mut state, &api_with_games("[]"), cmd);
    assert!(!state.games.status.loading);
    assert!(state.games.loaded);
    assert_eq!(state.games.status.advisory.as_deref(), Some(BACKUP_GAMES_ADVISORY));
    assert_eq!(state.games.catalog.len(), backup_games().len());
    assert_eq!(state.games.visible.len(), backup_games().len());

    state.set_screen(Screen::Home);
    assert!(state.set_screen(Screen::Games).is_none());
}

#[test]
fn games_filters_recompute_from_full_catalog() {
    let mut state = AppState::new();
    let cmd = state.set_screen(Screen::Games).expect("load");
    run(&mut state, &failing_api(), cmd);

    state.games.set_query("halo");
    assert_eq!(state.games.visible.len(), 2);
    state.games.set_query("");
    assert_eq!(state.games.visible.len(), state.games.catalog.len());

    state.games.cycle_genre();
    let genre = state.games.filter.genre.clone().expect("first genre selected");
    assert!(
        state
            .games
            .visible_games()
            .iter()
            .all(|g: &&XboxGame| g.genre.contains(&genre))
    );

    state.clear_filters();
    assert!(state.games.filter.genre.is_none());
    assert_eq!(state.games.visible.len(), state.games.catalog.len());
}

#[test]
fn reload_replaces_catalog_and_clears_advisory() {
    let mut state = AppState::new();
    let cmd = state.set_screen(Screen::Games).expect("load");
    run(&mut state, &failing_api(), cmd);
    assert!(state.games.status.advisory.is_some());

    let body = r#"[{"id":7,"name":"Hi-Fi Rush","genre":["Action"],"developers":["Tango Gameworks"]}]"#;
    let reload = state.request_games();
    run(&mut state, &api_with_games(body), reload);
    assert!(state.games.status.advisory.is_none());
    assert_eq!(state.games.catalog.len(), 1);
    assert_eq!(state.games.visible_games()[0].name, "Hi-Fi Rush");
}

#[test]
fn achievements_fall_back_and_keep_filters() {
    let mut state = AppState::new();
    assert_eq!(state.achievements.source, mock_achievements());

    state.set_screen(Screen::Achievements);
    state.achievements.cycle_status();
    assert_eq!(state.achievements.filter.status, AchievementStatusFilter::Achieved);
    let summary = state.achievements.summary();
    assert_eq!((summary.displayed, summary.unlocked, summary.total_gamerscore), (2, 2, 65));

    let cmd = search(&mut state, Screen::Achievements, "speed").expect("remote");
    let ProviderCommand::SearchAchievements { ref xuid, .. } = cmd else {
        panic!("unexpected command {cmd:?}");
    };
    assert_eq!(xuid, &state.xuid);

    run(&mut state, &failing_api(), cmd);
    assert!(!state.achievements.status.loading);
    assert_eq!(state.achievements.status.advisory.as_deref(), Some(DEMO_DATA_ADVISORY));
    let names: Vec<&str> = state
        .achievements
        .visible_achievements()
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["Speed Master"]);
}

#[test]
fn provider_thread_answers_commands() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(failing_api(), tx, cmd_rx);

    let mut state = AppState::new();
    let cmd = state.set_screen(Screen::Games).expect("load");
    cmd_tx.send(cmd).expect("provider alive");

    while state.games.status.loading {
        let delta = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("provider should answer");
        apply_delta(&mut state, delta);
    }
    assert_eq!(state.games.catalog.len(), backup_games().len());
}

#[test]
fn new_profile_search_drops_pending_detail() {
    let mut state = AppState::new();
    let cmd = search(&mut state, Screen::Profiles, "gamer").expect("remote");
    run(&mut state, &failing_api(), cmd);
    assert!(!state.profiles.results.is_empty());

    let detail_cmd = state.request_profile_detail().expect("a profile is selected");
    assert!(state.profiles.detail_status.loading);

    let _next = search(&mut state, Screen::Profiles, "retro").expect("remote");
    assert!(!state.profiles.detail_status.loading);

    run(&mut state, &failing_api(), detail_cmd);
    assert!(state.profiles.detail.is_none());
    assert!(state.logs.iter().any(|l| l.contains("Dropped stale profile detail")));
}
