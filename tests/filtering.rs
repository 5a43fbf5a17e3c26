use xbox_terminal::backup_data::{backup_games, mock_achievements, mock_profiles};
use xbox_terminal::filter::{
    AchievementFilter, AchievementStatusFilter, GameFilter, developer_list, filter_achievements,
    filter_by_query, filter_games, filter_profiles, genre_examples, genre_list, summarize,
};
use xbox_terminal::memo::FilterMemo;
use xbox_terminal::types::{
    Achievement, AchievementState, GAMERSCORE_REWARD, Progression, Reward, XboxGame,
};

fn game(name: &str, genre: &[&str], developer: &str) -> XboxGame {
    XboxGame {
        id: 0,
        name: name.to_string(),
        genre: genre.iter().map(|g| (*g).to_string()).collect(),
        developers: vec![developer.to_string()],
        ..XboxGame::default()
    }
}

fn achievement(name: &str, state: AchievementState, gamerscore: &str) -> Achievement {
    Achievement {
        id: name.to_lowercase(),
        name: name.to_string(),
        progression: Progression {
            achievement_state: state,
            ..Progression::default()
        },
        rewards: vec![Reward {
            value: gamerscore.to_string(),
            kind: GAMERSCORE_REWARD.to_string(),
            ..Reward::default()
        }],
        ..Achievement::default()
    }
}

fn names<'a>(games: impl IntoIterator<Item = &'a XboxGame>) -> Vec<&'a str> {
    games.into_iter().map(|g| g.name.as_str()).collect()
}

#[test]
fn empty_filters_return_every_entity_in_order() {
    let games = backup_games();
    assert_eq!(filter_games(&games, &GameFilter::default()).len(), games.len());
    let blank = GameFilter {
        query: "   ".to_string(),
        ..GameFilter::default()
    };
    assert_eq!(names(filter_games(&games, &blank)), names(&games));

    let profiles = mock_profiles();
    assert_eq!(filter_profiles(&profiles, "").len(), profiles.len());

    let achievements = mock_achievements();
    assert_eq!(
        filter_achievements(&achievements, &AchievementFilter::default()).len(),
        achievements.len()
    );
}

#[test]
fn query_matching_nothing_yields_empty() {
    let filter = GameFilter {
        query: "zzz-no-such-title".to_string(),
        ..GameFilter::default()
    };
    assert!(filter_games(&backup_games(), &filter).is_empty());
    assert!(filter_profiles(&mock_profiles(), "zzz-no-such-player").is_empty());
    assert!(filter_by_query(&mock_achievements(), "zzz-no-such-achievement").is_empty());
}

#[test]
fn query_is_case_insensitive() {
    let games = vec![game("Halo Infinite", &["Shooter"], "343 Industries")];
    let upper = GameFilter {
        query: "HALO".to_string(),
        ..GameFilter::default()
    };
    let lower = GameFilter {
        query: "halo".to_string(),
        ..GameFilter::default()
    };
    assert_eq!(filter_games(&games, &upper), filter_games(&games, &lower));
    assert_eq!(filter_games(&games, &upper).len(), 1);
}

#[test]
fn horizon_query_keeps_only_forza() {
    let games = vec![
        game("Halo Infinite", &["Shooter"], "343 Industries"),
        game("Forza Horizon 5", &["Racing"], "Playground Games"),
    ];
    let filter = GameFilter {
        query: "horizon".to_string(),
        ..GameFilter::default()
    };
    assert_eq!(names(filter_games(&games, &filter)), vec!["Forza Horizon 5"]);
}

#[test]
fn game_dimensions_are_combined() {
    let games = backup_games();
    let filter = GameFilter {
        query: "halo".to_string(),
        genre: Some("shooter".to_string()),
        developer: Some("Bungie".to_string()),
    };
    assert_eq!(
        names(filter_games(&games, &filter)),
        vec!["Halo: The Master Chief Collection"]
    );

    let publisher_hit = GameFilter {
        query: "bethesda".to_string(),
        ..GameFilter::default()
    };
    assert_eq!(names(filter_games(&games, &publisher_hit)), vec!["Starfield"]);
}

#[test]
fn facets_are_distinct_and_sorted() {
    let games = backup_games();
    let genres = genre_list(&games);
    let mut sorted = genres.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(genres, sorted);
    assert!(genres.contains(&"Racing".to_string()));

    let developers = developer_list(&games);
    assert_eq!(developers.iter().filter(|d| *d == "343 Industries").count(), 1);
}

#[test]
fn achieved_filter_counts_only_unlocked_gamerscore() {
    let achievements = vec![
        achievement("Opening Move", AchievementState::Achieved, "15"),
        achievement("Long Haul", AchievementState::InProgress, "50"),
    ];
    let filter = AchievementFilter {
        query: String::new(),
        status: AchievementStatusFilter::from_key("achieved").expect("known key"),
    };
    let shown = filter_achievements(&achievements, &filter);
    let summary = summarize(shown);
    assert_eq!(summary.displayed, 1);
    assert_eq!(summary.unlocked, 1);
    assert_eq!(summary.total_gamerscore, 15);
}

#[test]
fn achievement_query_and_status_are_anded() {
    let achievements = mock_achievements();
    let filter = AchievementFilter {
        query: "sea of thieves".to_string(),
        status: AchievementStatusFilter::Secret,
    };
    let shown = filter_achievements(&achievements, &filter);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].name, "Pirate Legend");

    let none = AchievementFilter {
        query: "sea of thieves".to_string(),
        status: AchievementStatusFilter::Achieved,
    };
    assert!(filter_achievements(&achievements, &none).is_empty());
}

#[test]
fn profiles_match_real_name_and_location() {
    let profiles = mock_profiles();
    let by_name = filter_profiles(&profiles, "joão");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].gamertag, "ExampleGamer");

    let by_location = filter_profiles(&profiles, "BRASIL");
    assert_eq!(by_location.len(), 3);
}

#[test]
fn memo_recomputes_after_clear() {
    let games = backup_games();
    let filter = GameFilter {
        query: "halo".to_string(),
        ..GameFilter::default()
    };
    let mut memo: FilterMemo<GameFilter, usize> = FilterMemo::default();
    let first = memo.get_or_compute(&filter, || filter_games(&games, &filter).len());
    let cached = memo.get_or_compute(&filter, || 0);
    assert_eq!(first, 2);
    assert_eq!(cached, 2);

    memo.clear();
    let fresh = memo.get_or_compute(&filter, || filter_games(&games[..1], &filter).len());
    assert_eq!(fresh, 1);
}

#[test]
fn summary_gamerscore_saturates_instead_of_overflowing() {
    let list = vec![
        achievement("Max", AchievementState::Achieved, "18446744073709551615"),
        achievement("One", AchievementState::Achieved, "1"),
    ];
    let summary = summarize(&list);
    assert_eq!(summary.unlocked, 2);
    assert_eq!(summary.total_gamerscore, u64::MAX);
}

#[test]
fn genre_examples_skip_games_without_genres() {
    let catalog = vec![
        game("Untagged", &[], "Nobody"),
        game("Halo Infinite", &["Shooter"], "343 Industries"),
        game("Also Untagged", &[], "Nobody"),
        game("Forza Horizon 5", &["Racing"], "Playground Games"),
        game("Starfield", &["RPG"], "Bethesda Game Studios"),
    ];
    assert_eq!(
        names(genre_examples(&catalog, 2)),
        vec!["Halo Infinite", "Forza Horizon 5"]
    );
    assert_eq!(genre_examples(&catalog, 5).len(), 3);
}

#[test]
fn padded_query_keeps_its_spaces() {
    let catalog = vec![
        game("Halo", &["Shooter"], "Bungie"),
        game("Halo Infinite", &["Shooter"], "343 Industries"),
    ];
    let filter = GameFilter {
        query: "halo ".to_string(),
        ..GameFilter::default()
    };
    assert_eq!(names(filter_games(&catalog, &filter)), vec!["Halo Infinite"]);

    let blank = GameFilter {
        query: "   ".to_string(),
        ..GameFilter::default()
    };
    assert_eq!(filter_games(&catalog, &blank).len(), 2);
}
