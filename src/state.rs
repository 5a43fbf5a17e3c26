use std::collections::VecDeque;

use crate::backup_data;
use crate::config::DEFAULT_XUID;
use crate::filter::{
    AchievementFilter, AchievementSummary, DEVELOPER_PICKER_LIMIT, GameFilter, developer_list,
    filter_achievement_indices, filter_game_indices, genre_list, summarize,
};
use crate::memo::FilterMemo;
use crate::types::{Achievement, GameStats, XboxGame, XboxProfile};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Profiles,
    Games,
    Achievements,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Home,
        Screen::Profiles,
        Screen::Games,
        Screen::Achievements,
    ];

    pub fn next(self) -> Self {
        match self {
            Screen::Home => Screen::Profiles,
            Screen::Profiles => Screen::Games,
            Screen::Games => Screen::Achievements,
            Screen::Achievements => Screen::Home,
        }
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Home => "Home",
        Screen::Profiles => "Profiles",
        Screen::Games => "Games",
        Screen::Achievements => "Achievements",
    }
}

/// Hands out increasing sequence numbers so that only the newest request
/// issued by a page may land in that page's state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStatus {
    pub loading: bool,
    pub advisory: Option<String>,
    pub requests: RequestTracker,
}

impl PageStatus {
    pub fn begin(&mut self) -> u64 {
        self.loading = true;
        self.advisory = None;
        self.requests.issue()
    }

    /// Supersedes any request in flight without starting a new one.
    pub fn retire(&mut self) {
        self.requests.issue();
        self.loading = false;
    }

    /// Marks the request finished when `seq` is still the newest one.
    pub fn accept(&mut self, seq: u64, advisory: Option<String>) -> bool {
        if !self.requests.is_current(seq) {
            return false;
        }
        self.loading = false;
        self.advisory = advisory;
        true
    }
}

#[derive(Debug, Clone)]
pub struct HomePage {
    pub query: String,
    pub profiles: Vec<XboxProfile>,
    pub selected: usize,
    pub status: PageStatus,
    pub featured_games: Vec<XboxGame>,
    pub highlights: Vec<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetail {
    pub profile: XboxProfile,
    pub stats: Vec<GameStats>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfilesPage {
    pub query: String,
    pub results: Vec<XboxProfile>,
    pub selected: usize,
    pub status: PageStatus,
    pub detail: Option<ProfileDetail>,
    pub detail_status: PageStatus,
}

impl ProfilesPage {
    pub fn selected_profile(&self) -> Option<&XboxProfile> {
        self.results.get(self.selected)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GamesPage {
    pub catalog: Vec<XboxGame>,
    pub filter: GameFilter,
    pub visible: Vec<usize>,
    pub selected: usize,
    pub status: PageStatus,
    pub loaded: bool,
    memo: FilterMemo<GameFilter, Vec<usize>>,
}

impl GamesPage {
    pub fn set_catalog(&mut self, games: Vec<XboxGame>) {
        self.catalog = games;
        self.loaded = true;
        self.memo.clear();
        self.refresh_view();
    }

    /// Recomputes the visible list from the full catalog for the current filter.
    pub fn refresh_view(&mut self) {
        let catalog = &self.catalog;
        let filter = &self.filter;
        self.visible = self
            .memo
            .get_or_compute(filter, || filter_game_indices(catalog, filter));
        clamp(&mut self.selected, self.visible.len());
    }

    pub fn visible_games(&self) -> Vec<&XboxGame> {
        self.visible
            .iter()
            .filter_map(|idx| self.catalog.get(*idx))
            .collect()
    }

    pub fn selected_game(&self) -> Option<&XboxGame> {
        self.visible
            .get(self.selected)
            .and_then(|idx| self.catalog.get(*idx))
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.refresh_view();
    }

    pub fn genres(&self) -> Vec<String> {
        genre_list(&self.catalog)
    }

    pub fn developers(&self) -> Vec<String> {
        let mut developers = developer_list(&self.catalog);
        developers.truncate(DEVELOPER_PICKER_LIMIT);
        developers
    }

    pub fn cycle_genre(&mut self) {
        let genres = self.genres();
        self.filter.genre = cycle_option(&genres, self.filter.genre.as_deref());
        self.refresh_view();
    }

    pub fn cycle_developer(&mut self) {
        let developers = self.developers();
        self.filter.developer = cycle_option(&developers, self.filter.developer.as_deref());
        self.refresh_view();
    }

    pub fn clear_filters(&mut self) {
        self.filter = GameFilter::default();
        self.refresh_view();
    }
}

#[derive(Debug, Clone)]
pub struct AchievementsPage {
    pub source: Vec<Achievement>,
    pub filter: AchievementFilter,
    pub visible: Vec<usize>,
    pub selected: usize,
    pub status: PageStatus,
    memo: FilterMemo<AchievementFilter, Vec<usize>>,
}

impl AchievementsPage {
    fn new(source: Vec<Achievement>) -> Self {
        let mut page = Self {
            source: Vec::new(),
            filter: AchievementFilter::default(),
            visible: Vec::new(),
            selected: 0,
            status: PageStatus::default(),
            memo: FilterMemo::default(),
        };
        page.set_source(source);
        page
    }

    pub fn set_source(&mut self, achievements: Vec<Achievement>) {
        self.source = achievements;
        self.memo.clear();
        self.refresh_view();
    }

    pub fn refresh_view(&mut self) {
        let source = &self.source;
        let filter = &self.filter;
        self.visible = self
            .memo
            .get_or_compute(filter, || filter_achievement_indices(source, filter));
        clamp(&mut self.selected, self.visible.len());
    }

    pub fn visible_achievements(&self) -> Vec<&Achievement> {
        self.visible
            .iter()
            .filter_map(|idx| self.source.get(*idx))
            .collect()
    }

    pub fn summary(&self) -> AchievementSummary {
        summarize(self.visible_achievements())
    }

    pub fn cycle_status(&mut self) {
        self.filter.status = self.filter.status.next();
        self.refresh_view();
    }

    pub fn clear_filters(&mut self) {
        self.filter = AchievementFilter::default();
        self.refresh_view();
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub home: HomePage,
    pub profiles: ProfilesPage,
    pub games: GamesPage,
    pub achievements: AchievementsPage,
    pub xuid: String,
    pub search_input: Option<String>,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            home: HomePage {
                query: String::new(),
                profiles: Vec::new(),
                selected: 0,
                status: PageStatus::default(),
                featured_games: backup_data::featured_games(),
                highlights: backup_data::highlight_achievements(),
            },
            profiles: ProfilesPage::default(),
            games: GamesPage::default(),
            achievements: AchievementsPage::new(backup_data::mock_achievements()),
            xuid: DEFAULT_XUID.to_string(),
            search_input: None,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn current_status(&self) -> &PageStatus {
        match self.screen {
            Screen::Home => &self.home.status,
            Screen::Profiles => &self.profiles.status,
            Screen::Games => &self.games.status,
            Screen::Achievements => &self.achievements.status,
        }
    }

    /// Switches screens; the games catalog is fetched on the first visit.
    pub fn set_screen(&mut self, screen: Screen) -> Option<ProviderCommand> {
        self.screen = screen;
        self.search_input = None;
        if screen == Screen::Games && !self.games.loaded && !self.games.status.loading {
            return Some(self.request_games());
        }
        None
    }

    pub fn request_games(&mut self) -> ProviderCommand {
        let seq = self.games.status.begin();
        ProviderCommand::FetchGames { seq }
    }

    /// Search input is refused while the current page waits on a request.
    pub fn open_search(&mut self) -> bool {
        if self.current_status().loading {
            return false;
        }
        let current = match self.screen {
            Screen::Home => self.home.query.clone(),
            Screen::Profiles => self.profiles.query.clone(),
            Screen::Games => self.games.filter.query.clone(),
            Screen::Achievements => self.achievements.filter.query.clone(),
        };
        self.search_input = Some(current);
        true
    }

    /// Commits the search box for the current screen. Games filter locally;
    /// the other screens go through the provider.
    pub fn submit_search(&mut self) -> Option<ProviderCommand> {
        let query = self.search_input.take()?;
        match self.screen {
            Screen::Home => {
                self.home.query = query.clone();
                let seq = self.home.status.begin();
                Some(ProviderCommand::SearchHomeProfiles { seq, query })
            }
            Screen::Profiles => {
                self.profiles.query = query.clone();
                self.profiles.detail = None;
                self.profiles.detail_status.retire();
                let seq = self.profiles.status.begin();
                Some(ProviderCommand::SearchProfiles { seq, query })
            }
            Screen::Games => {
                self.games.set_query(&query);
                None
            }
            Screen::Achievements => {
                self.achievements.filter.query = query.clone();
                self.achievements.refresh_view();
                let seq = self.achievements.status.begin();
                Some(ProviderCommand::SearchAchievements {
                    seq,
                    xuid: self.xuid.clone(),
                    query,
                })
            }
        }
    }

    pub fn request_profile_detail(&mut self) -> Option<ProviderCommand> {
        let profile = self.profiles.selected_profile()?.clone();
        let seq = self.profiles.detail_status.begin();
        Some(ProviderCommand::FetchProfileDetail { seq, profile })
    }

    pub fn clear_filters(&mut self) {
        match self.screen {
            Screen::Games => self.games.clear_filters(),
            Screen::Achievements => self.achievements.clear_filters(),
            Screen::Home | Screen::Profiles => {}
        }
    }

    pub fn select_next(&mut self) {
        let (selected, total) = self.selection_mut();
        if total == 0 {
            *selected = 0;
            return;
        }
        *selected = (*selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let (selected, total) = self.selection_mut();
        if total == 0 {
            *selected = 0;
            return;
        }
        if *selected == 0 {
            *selected = total - 1;
        } else {
            *selected -= 1;
        }
    }

    fn selection_mut(&mut self) -> (&mut usize, usize) {
        match self.screen {
            Screen::Home => (&mut self.home.selected, self.home.profiles.len()),
            Screen::Profiles => (&mut self.profiles.selected, self.profiles.results.len()),
            Screen::Games => (&mut self.games.selected, self.games.visible.len()),
            Screen::Achievements => (&mut self.achievements.selected, self.achievements.visible.len()),
        }
    }
}

fn clamp(selected: &mut usize, total: usize) {
    if total == 0 {
        *selected = 0;
    } else if *selected >= total {
        *selected = total - 1;
    }
}

/// None -> first -> ... -> last -> None.
fn cycle_option(options: &[String], current: Option<&str>) -> Option<String> {
    match current {
        None => options.first().cloned(),
        Some(current) => {
            let pos = options.iter().position(|o| o == current)?;
            options.get(pos + 1).cloned()
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    SearchHomeProfiles { seq: u64, query: String },
    SearchProfiles { seq: u64, query: String },
    FetchProfileDetail { seq: u64, profile: XboxProfile },
    FetchGames { seq: u64 },
    SearchAchievements { seq: u64, xuid: String, query: String },
}

#[derive(Debug, Clone)]
pub enum Delta {
    HomeProfiles {
        seq: u64,
        profiles: Vec<XboxProfile>,
        advisory: Option<String>,
    },
    Profiles {
        seq: u64,
        profiles: Vec<XboxProfile>,
        advisory: Option<String>,
    },
    ProfileDetail {
        seq: u64,
        detail: ProfileDetail,
    },
    Games {
        seq: u64,
        games: Vec<XboxGame>,
        advisory: Option<String>,
    },
    Achievements {
        seq: u64,
        achievements: Vec<Achievement>,
        advisory: Option<String>,
    },
    Log(String),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::HomeProfiles {
            seq,
            profiles,
            advisory,
        } => {
            if !state.home.status.accept(seq, advisory) {
                state.push_log(format!("[INFO] Dropped stale home search #{seq}"));
                return;
            }
            state.home.profiles = profiles;
            clamp(&mut state.home.selected, state.home.profiles.len());
        }
        Delta::Profiles {
            seq,
            profiles,
            advisory,
        } => {
            if !state.profiles.status.accept(seq, advisory) {
                state.push_log(format!("[INFO] Dropped stale profile search #{seq}"));
                return;
            }
            state.profiles.results = profiles;
            state.profiles.selected = 0;
        }
        Delta::ProfileDetail { seq, detail } => {
            if !state.profiles.detail_status.accept(seq, None) {
                state.push_log(format!("[INFO] Dropped stale profile detail #{seq}"));
                return;
            }
            state.profiles.detail = Some(detail);
        }
        Delta::Games {
            seq,
            games,
            advisory,
        } => {
            if !state.games.status.accept(seq, advisory) {
                state.push_log(format!("[INFO] Dropped stale games catalog #{seq}"));
                return;
            }
            let total = games.len();
            state.games.set_catalog(games);
            state.push_log(format!("[INFO] Games catalog loaded ({total})"));
        }
        Delta::Achievements {
            seq,
            achievements,
            advisory,
        } => {
            if !state.achievements.status.accept(seq, advisory) {
                state.push_log(format!("[INFO] Dropped stale achievements #{seq}"));
                return;
            }
            state.achievements.set_source(achievements);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
