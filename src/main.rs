use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use xbox_terminal::config::Config;
use xbox_terminal::filter::status_filter_label;
use xbox_terminal::provider;
use xbox_terminal::state::{
    AppState, Delta, PageStatus, ProviderCommand, Screen, apply_delta, screen_label,
};
use xbox_terminal::types::{Achievement, XboxGame, XboxProfile, achievement_state_label, region_label};
use xbox_terminal::xbox_api::XboxApi;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>, xuid: String) -> Self {
        let mut state = AppState::new();
        state.xuid = xuid;
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_input.is_some() {
            self.on_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.switch_screen(Screen::Home),
            KeyCode::Char('2') => self.switch_screen(Screen::Profiles),
            KeyCode::Char('3') => self.switch_screen(Screen::Games),
            KeyCode::Char('4') => self.switch_screen(Screen::Achievements),
            KeyCode::Tab => self.switch_screen(self.state.screen.next()),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('/') => {
                if !self.state.open_search() {
                    self.state.push_log("[INFO] Search disabled while loading");
                }
            }
            KeyCode::Enter if self.state.screen == Screen::Profiles => {
                let cmd = self.state.request_profile_detail();
                self.dispatch(cmd);
            }
            KeyCode::Char('g') if self.state.screen == Screen::Games => {
                self.state.games.cycle_genre()
            }
            KeyCode::Char('v') if self.state.screen == Screen::Games => {
                self.state.games.cycle_developer()
            }
            KeyCode::Char('f') if self.state.screen == Screen::Achievements => {
                self.state.achievements.cycle_status()
            }
            KeyCode::Char('c') => self.state.clear_filters(),
            KeyCode::Char('r') if self.state.screen == Screen::Games => {
                if self.state.games.status.loading {
                    self.state.push_log("[INFO] Games catalog already loading");
                } else {
                    let cmd = self.state.request_games();
                    self.dispatch(Some(cmd));
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.search_input = None,
            KeyCode::Enter => {
                let cmd = self.state.submit_search();
                self.dispatch(cmd);
            }
            KeyCode::Backspace => {
                if let Some(input) = self.state.search_input.as_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(input) = self.state.search_input.as_mut() {
                    input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn switch_screen(&mut self, screen: Screen) {
        let cmd = self.state.set_screen(screen);
        self.dispatch(cmd);
    }

    fn dispatch(&mut self, cmd: Option<ProviderCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Provider unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider request failed");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env();
    let xuid = config.xuid.clone();
    let api = XboxApi::from_config(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(api, tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx), xuid);
    if app.state.xuid.is_empty() {
        app.state.push_log("[WARN] XBOX_XUID is empty");
    }
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_status_line(frame, chunks[1], &app.state);

    match app.state.screen {
        Screen::Home => render_home(frame, chunks[2], &app.state),
        Screen::Profiles => render_profiles(frame, chunks[2], &app.state),
        Screen::Games => render_games(frame, chunks[2], &app.state),
        Screen::Achievements => render_achievements(frame, chunks[2], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let tabs = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            if *screen == state.screen {
                format!("[{} {}]", i + 1, screen_label(*screen))
            } else {
                format!(" {} {} ", i + 1, screen_label(*screen))
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let title = match state.screen {
        Screen::Home => "XBOX TERMINAL".to_string(),
        Screen::Profiles => format!("XBOX PROFILES | {} results", state.profiles.results.len()),
        Screen::Games => format!(
            "XBOX GAMES | {} of {} | Genre: {} | Developer: {}",
            state.games.visible.len(),
            state.games.catalog.len(),
            state.games.filter.genre.as_deref().unwrap_or("All"),
            state.games.filter.developer.as_deref().unwrap_or("All"),
        ),
        Screen::Achievements => {
            let summary = state.achievements.summary();
            format!(
                "XBOX ACHIEVEMENTS | {} shown | {} unlocked | {} G | Filter: {}",
                summary.displayed,
                summary.unlocked,
                summary.total_gamerscore,
                status_filter_label(state.achievements.filter.status),
            )
        }
    };
    format!("  (X)  {title}\n {tabs}")
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(input) = &state.search_input {
        let search = Paragraph::new(format!("Search: {input}_"))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(search, area);
        return;
    }

    let status = state.current_status();
    let (text, style) = status_text(status, current_query(state));
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn current_query(state: &AppState) -> &str {
    match state.screen {
        Screen::Home => &state.home.query,
        Screen::Profiles => &state.profiles.query,
        Screen::Games => &state.games.filter.query,
        Screen::Achievements => &state.achievements.filter.query,
    }
}

fn status_text(status: &PageStatus, query: &str) -> (String, Style) {
    if status.loading {
        return (
            "Loading...".to_string(),
            Style::default().fg(Color::Cyan),
        );
    }
    if let Some(advisory) = &status.advisory {
        return (
            format!("! {advisory}"),
            Style::default().fg(Color::Yellow),
        );
    }
    if query.trim().is_empty() {
        ("/ to search".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (
            format!("Results for \"{}\"", query.trim()),
            Style::default().fg(Color::DarkGray),
        )
    }
}

fn footer_text(state: &AppState) -> String {
    let screen_keys = match state.screen {
        Screen::Home => "/ Search profiles",
        Screen::Profiles => "/ Search | Enter Details",
        Screen::Games => "/ Search | g Genre | v Developer | c Clear | r Reload",
        Screen::Achievements => "/ Search | f Status | c Clear",
    };
    format!("1-4/Tab Screens | j/k/↑/↓ Move | {screen_keys} | ? Help | q Quit")
}

fn render_home(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let profiles_block = Block::default().title("Profiles").borders(Borders::ALL);
    let inner = profiles_block.inner(columns[0]);
    frame.render_widget(profiles_block, columns[0]);
    if state.home.profiles.is_empty() {
        let empty = Paragraph::new("Search for a gamertag to get started")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    } else {
        let rows: Vec<&XboxProfile> = state.home.profiles.iter().collect();
        render_rows(frame, inner, rows.len(), state.home.selected, |idx| {
            profile_row(rows[idx])
        });
    }

    let games = state
        .home
        .featured_games
        .iter()
        .map(|game| format!("{}\n  {}", game.name, game.genre.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    let games = Paragraph::new(games)
        .block(Block::default().title("Featured Games").borders(Borders::ALL));
    frame.render_widget(games, right[0]);

    let highlights = state
        .home
        .highlights
        .iter()
        .map(|a| {
            format!(
                "{} ({} G)\n  {}",
                a.name,
                a.gamerscore(),
                a.title_names().next().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let highlights = Paragraph::new(highlights)
        .block(Block::default().title("Recent Achievements").borders(Borders::ALL));
    frame.render_widget(highlights, right[1]);
}

fn render_profiles(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let list_block = Block::default().title("Results").borders(Borders::ALL);
    let inner = list_block.inner(columns[0]);
    frame.render_widget(list_block, columns[0]);

    let page = &state.profiles;
    if page.results.is_empty() {
        let msg = if page.query.trim().is_empty() {
            "Press / to search profiles".to_string()
        } else {
            format!("No profiles found for \"{}\"", page.query.trim())
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
    } else {
        render_rows(frame, inner, page.results.len(), page.selected, |idx| {
            profile_row(&page.results[idx])
        });
    }

    let detail = Paragraph::new(profile_detail_text(state))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Profile").borders(Borders::ALL));
    frame.render_widget(detail, columns[1]);
}

fn profile_row(profile: &XboxProfile) -> [String; 3] {
    [
        profile.display_name(),
        format!("{} G | {}", profile.gamer_score, profile.account_tier),
        profile.location.clone().unwrap_or_else(|| "-".to_string()),
    ]
}

fn profile_detail_text(state: &AppState) -> String {
    let page = &state.profiles;
    if page.detail_status.loading {
        return "Loading profile...".to_string();
    }
    let Some(detail) = &page.detail else {
        return "Enter on a result to load details".to_string();
    };

    let profile = &detail.profile;
    let mut lines = vec![
        profile.display_name(),
        format!("XUID: {}", profile.xuid),
        format!("Gamerscore: {}", profile.gamer_score),
        format!("Tier: {} | Rep: {}", profile.account_tier, profile.xbox_one_rep),
    ];
    if let Some(tenure) = profile.tenure {
        lines.push(format!("Tenure: {tenure} years"));
    }
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        lines.push(String::new());
        lines.push(bio.to_string());
    }
    lines.push(String::new());
    if detail.stats.is_empty() {
        lines.push("No stats available".to_string());
    } else {
        for stat in &detail.stats {
            let label = if stat.display_name.is_empty() {
                &stat.name
            } else {
                &stat.display_name
            };
            lines.push(format!("{label}: {}", stat.title_name));
        }
    }
    lines.join("\n")
}

fn render_games(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let list_block = Block::default().title("Catalog").borders(Borders::ALL);
    let inner = list_block.inner(columns[0]);
    frame.render_widget(list_block, columns[0]);

    let page = &state.games;
    let games = page.visible_games();
    if games.is_empty() {
        let msg = if page.status.loading {
            "Loading games catalog..."
        } else if page.catalog.is_empty() {
            "No games loaded (r to reload)"
        } else {
            "No games match the current filters"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
    } else {
        render_rows(frame, inner, games.len(), page.selected, |idx| game_row(games[idx]));
    }

    let detail = Paragraph::new(game_detail_text(page.selected_game()))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Game").borders(Borders::ALL));
    frame.render_widget(detail, columns[1]);
}

fn game_row(game: &XboxGame) -> [String; 3] {
    let release = game
        .earliest_release()
        .map(|(_, date)| date)
        .unwrap_or_else(|| "TBA".to_string());
    [
        game.name.clone(),
        game.genre.join(", "),
        format!("{} | {release}", game.developers.join(", ")),
    ]
}

fn game_detail_text(game: Option<&XboxGame>) -> String {
    let Some(game) = game else {
        return "No game selected".to_string();
    };
    let mut lines = vec![
        game.name.clone(),
        format!("Genre: {}", join_or_dash(&game.genre)),
        format!("Developers: {}", join_or_dash(&game.developers)),
        format!("Publishers: {}", join_or_dash(&game.publishers)),
        String::new(),
        "Release dates:".to_string(),
    ];
    match &game.release_dates {
        Some(dates) => {
            for (region, date) in dates.entries() {
                lines.push(format!("  {}: {}", region_label(region), date.unwrap_or("-")));
            }
        }
        None => lines.push("  -".to_string()),
    }
    lines.join("\n")
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

fn render_achievements(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!("Achievements | XUID {}", state.xuid))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let page = &state.achievements;
    let items = page.visible_achievements();
    if items.is_empty() {
        frame.render_widget(
            Paragraph::new("No achievements match the current filters")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }
    render_rows(frame, inner, items.len(), page.selected, |idx| {
        achievement_row(items[idx])
    });
}

fn achievement_row(achievement: &Achievement) -> [String; 3] {
    let secret = if achievement.is_secret { " [secret]" } else { "" };
    let when = achievement
        .unlocked_on()
        .map(|d| format!(" on {d}"))
        .unwrap_or_default();
    [
        format!("{}{secret}", achievement.name),
        format!(
            "{} | {}",
            achievement.title_names().next().unwrap_or("-"),
            achievement.display_description()
        ),
        format!(
            "{} {}%{when} | {} G",
            achievement_state_label(achievement.state()),
            achievement.progress_percent(),
            achievement.gamerscore()
        ),
    ]
}

/// Draws `total` two-line cards, keeping the selected one in view.
fn render_rows<F>(frame: &mut Frame, area: Rect, total: usize, selected: usize, row: F)
where
    F: Fn(usize) -> [String; 3],
{
    const ROW_HEIGHT: u16 = 2;
    if area.height < ROW_HEIGHT {
        return;
    }

    let visible = (area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(selected, total, visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT,
        };
        let is_selected = idx == selected;
        let style = if is_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if is_selected {
            frame.render_widget(Block::default().style(style), row_area);
        }

        let [title, middle, right] = row(idx);
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(row_area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(28)])
            .split(lines[0]);

        render_cell_text(frame, top[0], &title, style.add_modifier(Modifier::BOLD));
        render_cell_text(frame, top[1], &right, style);
        render_cell_text(frame, lines[1], &format!("  {middle}"), style.fg(Color::Gray));
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(1)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Xbox Terminal - Help",
        "",
        "Global:",
        "  1-4 / Tab    Switch screen",
        "  /            Search (Enter submit, Esc cancel)",
        "  j/k or ↑/↓   Move",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Profiles:",
        "  Enter        Load profile details",
        "",
        "Games:",
        "  g            Cycle genre",
        "  v            Cycle developer",
        "  c            Clear filters",
        "  r            Reload catalog",
        "",
        "Achievements:",
        "  f            Cycle status filter",
        "  c            Clear filters",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
