use crate::types::{
    Achievement, AchievementState, MediaAsset, PreferredColor, Progression, ReleaseDates,
    Requirement, Reward, TimeWindow, TitleAssociation, XboxGame, XboxProfile,
    GAMERSCORE_REWARD,
};

pub const DEMO_DATA_ADVISORY: &str = "API not configured - using demonstration data";
pub const HOME_DEMO_ADVISORY: &str = "Using demonstration data";
pub const BACKUP_GAMES_ADVISORY: &str = "Games catalog unavailable - using backup data";

pub fn mock_profiles() -> Vec<XboxProfile> {
    vec![
        profile(
            "2533274792093064",
            "ExampleGamer",
            125_450,
            "Gold",
            ("#107c10", "#0e6e0e", "#005a00"),
            Some("João Silva"),
            "Passionate about RPGs and strategy games",
            "São Paulo, Brasil",
            8,
        ),
        profile(
            "2533274792093065",
            "ProGamer2024",
            89_750,
            "Gold",
            ("#ff6b35", "#f7931e", "#ffdc00"),
            Some("Maria Santos"),
            "Competitive FPS player and indie enthusiast",
            "Rio de Janeiro, Brasil",
            5,
        ),
        profile(
            "2533274792093066",
            "RetroGamerBR",
            67_890,
            "Silver",
            ("#9b59b6", "#8e44ad", "#6c3483"),
            None,
            "Retro collector and platformer fan",
            "Belo Horizonte, Brasil",
            12,
        ),
    ]
}

/// The single profile the home screen falls back to.
pub fn featured_profile() -> XboxProfile {
    let mut profile = profile(
        "2533274792093064",
        "ExampleGamer",
        125_450,
        "Gold",
        ("#107c10", "#0e6e0e", "#005a00"),
        Some("João Silva"),
        "Passionate gamer",
        "São Paulo, Brasil",
        8,
    );
    profile.watermarks = vec!["LaunchTeam".to_string()];
    profile
}

#[allow(clippy::too_many_arguments)]
fn profile(
    xuid: &str,
    gamertag: &str,
    gamer_score: u64,
    tier: &str,
    colors: (&str, &str, &str),
    real_name: Option<&str>,
    bio: &str,
    location: &str,
    tenure: u32,
) -> XboxProfile {
    XboxProfile {
        xuid: xuid.to_string(),
        gamertag: gamertag.to_string(),
        gamer_score,
        account_tier: tier.to_string(),
        xbox_one_rep: "GoodPlayer".to_string(),
        preferred_color: Some(PreferredColor {
            primary_color: colors.0.to_string(),
            secondary_color: colors.1.to_string(),
            tertiary_color: colors.2.to_string(),
        }),
        real_name: real_name.map(str::to_string),
        bio: Some(bio.to_string()),
        location: Some(location.to_string()),
        tenure: Some(tenure),
        watermarks: Vec::new(),
        avatar: Some("/api/placeholder/100/100".to_string()),
        game_display_pic_raw: None,
    }
}

pub fn backup_games() -> Vec<XboxGame> {
    vec![
        game(1001, "Halo Infinite", &["First-Person Shooter", "Action", "Sci-Fi"], &["343 Industries"], &["Microsoft Studios", "Xbox Game Studios"], "Dec 8, 2021"),
        game(1002, "Forza Horizon 5", &["Racing", "Sports", "Open World"], &["Playground Games"], &["Microsoft Studios", "Xbox Game Studios"], "Nov 9, 2021"),
        game(1003, "Microsoft Flight Simulator", &["Simulation", "Aviation"], &["Asobo Studio"], &["Microsoft Studios"], "Aug 18, 2020"),
        game(1004, "Sea of Thieves", &["Action", "Adventure", "Multiplayer", "Pirate"], &["Rare"], &["Microsoft Studios"], "Mar 20, 2018"),
        game(1005, "Gears 5", &["Third-Person Shooter", "Action"], &["The Coalition"], &["Microsoft Studios"], "Sep 10, 2019"),
        game(1006, "Age of Empires IV", &["Real-Time Strategy", "Historical"], &["Relic Entertainment"], &["Microsoft Studios"], "Oct 28, 2021"),
        game(1007, "Ori and the Will of the Wisps", &["Platform", "Adventure", "Metroidvania"], &["Moon Studios"], &["Microsoft Studios"], "Mar 11, 2020"),
        game(1008, "Psychonauts 2", &["Platform", "Adventure", "Puzzle"], &["Double Fine Productions"], &["Microsoft Studios"], "Aug 25, 2021"),
        game(1009, "Grounded", &["Survival", "Adventure", "Multiplayer"], &["Obsidian Entertainment"], &["Microsoft Studios"], "Sep 27, 2022"),
        game(1010, "Starfield", &["RPG", "Space", "Adventure", "Sci-Fi"], &["Bethesda Game Studios"], &["Bethesda Softworks", "Microsoft Studios"], "Sep 6, 2023"),
        game(1011, "Halo: The Master Chief Collection", &["First-Person Shooter", "Action", "Collection"], &["343 Industries", "Bungie"], &["Microsoft Studios"], "Nov 11, 2014"),
        game(1012, "Minecraft", &["Sandbox", "Survival", "Creative"], &["Mojang Studios"], &["Microsoft Studios"], "Nov 18, 2011"),
    ]
}

pub fn featured_games() -> Vec<XboxGame> {
    backup_games().into_iter().take(2).collect()
}

fn game(
    id: u64,
    name: &str,
    genre: &[&str],
    developers: &[&str],
    publishers: &[&str],
    released: &str,
) -> XboxGame {
    let owned = |values: &[&str]| values.iter().map(|v| (*v).to_string()).collect::<Vec<_>>();
    XboxGame {
        id,
        name: name.to_string(),
        genre: owned(genre),
        developers: owned(developers),
        publishers: owned(publishers),
        release_dates: Some(ReleaseDates {
            japan: Some(released.to_string()),
            north_america: Some(released.to_string()),
            europe: Some(released.to_string()),
            australia: Some(released.to_string()),
        }),
    }
}

pub fn mock_achievements() -> Vec<Achievement> {
    vec![
        achievement(
            "achievement1",
            "First Victory",
            ("Halo Infinite", 219_630_713),
            AchievementState::Achieved,
            ("1", "1"),
            "2024-01-15T10:30:00Z",
            false,
            "Win your first online Arena match",
            "Secret achievement tied to Arena mode",
            "Standard",
            15,
            "30 minutes",
        ),
        achievement(
            "achievement2",
            "Speed Master",
            ("Forza Horizon 5", 1_738_253_896),
            AchievementState::Achieved,
            ("100", "100"),
            "2024-01-10T14:20:00Z",
            false,
            "Reach 100 online race wins",
            "Achievement tied to online racing",
            "Standard",
            50,
            "20 hours",
        ),
        achievement(
            "achievement3",
            "Sky Explorer",
            ("Microsoft Flight Simulator", 1_234_567_890),
            AchievementState::InProgress,
            ("7", "15"),
            "",
            false,
            "Visit 15 different airports around the world",
            "Visit several airports",
            "Standard",
            30,
            "5 hours",
        ),
        achievement(
            "achievement4",
            "Pirate Legend",
            ("Sea of Thieves", 987_654_321),
            AchievementState::NotStarted,
            ("0", "50"),
            "",
            true,
            "Become a true legend of the seas",
            "Secret achievement tied to pirate progression",
            "Rare",
            100,
            "50 hours",
        ),
        achievement(
            "achievement5",
            "Supreme Strategist",
            ("Age of Empires IV", 111_222_333),
            AchievementState::InProgress,
            ("3", "8"),
            "",
            false,
            "Finish 8 different campaigns on hard",
            "Finish several campaigns",
            "Challenge",
            75,
            "30 hours",
        ),
    ]
}

pub fn highlight_achievements() -> Vec<Achievement> {
    mock_achievements()
        .into_iter()
        .filter(Achievement::is_unlocked)
        .take(1)
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn achievement(
    id: &str,
    name: &str,
    title: (&str, u64),
    state: AchievementState,
    progress: (&str, &str),
    unlocked_at: &str,
    is_secret: bool,
    description: &str,
    locked_description: &str,
    achievement_type: &str,
    gamerscore: u64,
    estimated_time: &str,
) -> Achievement {
    let progress_state = match state {
        AchievementState::Achieved => "Achieved",
        AchievementState::InProgress => "InProgress",
        AchievementState::NotStarted | AchievementState::Unknown => "NotStarted",
    };
    Achievement {
        id: id.to_string(),
        service_config_id: format!("service-{id}"),
        name: name.to_string(),
        title_associations: vec![TitleAssociation {
            name: title.0.to_string(),
            id: title.1,
        }],
        progress_state: progress_state.to_string(),
        progression: Progression {
            achievement_state: state,
            requirements: vec![Requirement {
                id: "1".to_string(),
                current: Some(progress.0.to_string()),
                target: progress.1.to_string(),
            }],
            time_unlocked: unlocked_at.to_string(),
        },
        media_assets: vec![MediaAsset {
            name: "Icon".to_string(),
            kind: "Icon".to_string(),
            url: "/api/placeholder/60/60".to_string(),
        }],
        platform: "Xbox".to_string(),
        is_secret,
        description: description.to_string(),
        locked_description: locked_description.to_string(),
        product_id: format!("product-{id}"),
        achievement_type: achievement_type.to_string(),
        participation_type: "Individual".to_string(),
        time_window: Some(TimeWindow::default()),
        rewards: vec![Reward {
            name: GAMERSCORE_REWARD.to_string(),
            description: "Points".to_string(),
            value: gamerscore.to_string(),
            kind: GAMERSCORE_REWARD.to_string(),
            value_type: "Int".to_string(),
        }],
        estimated_time: estimated_time.to_string(),
        deeplink: String::new(),
        is_revoked: false,
    }
}
