// Renderers take `&Vec<_>` so they can be passed straight to `report`.
#![allow(clippy::ptr_arg)]

use anyhow::{Result, anyhow};
use serde::Serialize;

use xbox_terminal::config::Config;
use xbox_terminal::envelope::ApiResponse;
use xbox_terminal::filter::{genre_examples, genre_list};
use xbox_terminal::types::{Achievement, GameStats, XboxGame, XboxProfile};
use xbox_terminal::xbox_api::{DEFAULT_RANDOM_LIMIT, DEFAULT_RECENT_LIMIT, XboxApi};

const USAGE: &str = "usage: xbox_probe [--json] <command> [args]

commands:
  games                       catalog statistics
  search <query>              search the games catalog
  genre <genre>               games by genre
  developer <developer>       games by developer
  recent [n]                  most recently added games
  random [n]                  random games
  game <id>                   one game by id
  profile <gamertag>          profile by gamertag
  xuid <xuid>                 profile by xuid
  profiles <query>            profile search
  achievements <xuid> [title] achievements for a player
  achievement <xuid> <id>     one achievement
  recent-achievements <xuid>  recently unlocked achievements
  stats <xuid> [title]        overall or per-title stats";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut args = std::env::args().skip(1).collect::<Vec<_>>();
    let json = take_flag(&mut args, "--json");
    let Some(command) = args.first().cloned() else {
        println!("{USAGE}");
        return Ok(());
    };
    let rest = &args[1..];

    let api = XboxApi::from_config(Config::from_env());
    let ok = match command.as_str() {
        "games" => report(api.get_all_games(), json, print_catalog_summary),
        "search" => report(api.search_games(&arg(rest, 0, "query")?), json, print_games),
        "genre" => report(api.get_games_by_genre(&arg(rest, 0, "genre")?), json, print_games),
        "developer" => report(
            api.get_games_by_developer(&arg(rest, 0, "developer")?),
            json,
            print_games,
        ),
        "recent" => report(
            api.get_recent_games(limit_arg(rest, DEFAULT_RECENT_LIMIT)?),
            json,
            print_games,
        ),
        "random" => report(
            api.get_random_games(limit_arg(rest, DEFAULT_RANDOM_LIMIT)?),
            json,
            print_games,
        ),
        "game" => {
            let id = arg(rest, 0, "id")?
                .parse::<u64>()
                .map_err(|_| anyhow!("game id must be numeric"))?;
            report(api.get_game_by_id(id), json, |game: &Option<XboxGame>| match game {
                Some(game) => print_games(&vec![game.clone()]),
                None => println!("No game with id {id}"),
            })
        }
        "profile" => report(api.get_profile(&arg(rest, 0, "gamertag")?), json, print_profile),
        "xuid" => report(api.get_profile_by_xuid(&arg(rest, 0, "xuid")?), json, print_profile),
        "profiles" => report(
            api.search_profiles(&arg(rest, 0, "query")?),
            json,
            |profiles: &Vec<XboxProfile>| {
                println!("Profiles: {}", profiles.len());
                for profile in profiles {
                    print_profile(profile);
                }
            },
        ),
        "achievements" => {
            let xuid = arg(rest, 0, "xuid")?;
            let title = rest.get(1).map(String::as_str);
            report(api.get_achievements(&xuid, title), json, print_achievements)
        }
        "achievement" => {
            let xuid = arg(rest, 0, "xuid")?;
            let id = arg(rest, 1, "achievement id")?;
            report(
                api.get_achievement_details(&xuid, &id),
                json,
                |achievement: &Achievement| print_achievements(&vec![achievement.clone()]),
            )
        }
        "recent-achievements" => report(
            api.get_recent_achievements(&arg(rest, 0, "xuid")?),
            json,
            print_achievements,
        ),
        "stats" => {
            let xuid = arg(rest, 0, "xuid")?;
            let resp = match rest.get(1) {
                Some(title) => api.get_game_stats(&xuid, title),
                None => api.get_overall_stats(&xuid),
            };
            report(resp, json, print_stats)
        }
        other => {
            println!("unknown command: {other}\n\n{USAGE}");
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn arg(rest: &[String], idx: usize, name: &str) -> Result<String> {
    rest.get(idx)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("missing <{name}>\n\n{USAGE}"))
}

fn limit_arg(rest: &[String], default: usize) -> Result<usize> {
    match rest.first() {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow!("limit must be a positive number")),
        None => Ok(default),
    }
}

/// Prints the envelope as JSON or through `render`; false on a failed call.
fn report<T, F>(resp: ApiResponse<T>, json: bool, render: F) -> bool
where
    T: Serialize,
    F: FnOnce(&T),
{
    if json {
        match serde_json::to_string_pretty(&resp) {
            Ok(text) => println!("{text}"),
            Err(err) => println!("{{\"success\":false,\"error\":\"{err}\"}}"),
        }
        return resp.is_success();
    }

    match resp.error() {
        Some(err) if !resp.is_success() => {
            println!("error: {err}");
            false
        }
        _ => {
            render(resp.data());
            true
        }
    }
}

fn print_catalog_summary(games: &Vec<XboxGame>) {
    let with_genres = games.iter().filter(|g| !g.genre.is_empty()).count();
    let genres = genre_list(games);

    println!("Games: {}", games.len());
    println!("With genres: {with_genres}");
    println!("Without genres: {}", games.len() - with_genres);

    println!("Examples:");
    for game in genre_examples(games, 5) {
        println!(
            "  {:>6}  {}  [{}]  {}",
            game.id,
            game.name,
            game.genre.join(", "),
            game.developers.first().map(String::as_str).unwrap_or("n/a")
        );
    }

    println!("Unique genres: {}", genres.len());
    for genre in genres.iter().take(10) {
        println!("  {genre}");
    }
}

fn print_games(games: &Vec<XboxGame>) {
    println!("Games: {}", games.len());
    for game in games {
        let release = game
            .earliest_release()
            .map(|(_, date)| date)
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:>6}  {}  [{}]  {}  {}",
            game.id,
            game.name,
            game.genre.join(", "),
            game.developers.join(", "),
            release
        );
    }
}

fn print_profile(profile: &XboxProfile) {
    println!(
        "{}  xuid={}  gamerscore={}  tier={}  location={}",
        profile.display_name(),
        profile.xuid,
        profile.gamer_score,
        if profile.account_tier.is_empty() {
            "n/a"
        } else {
            profile.account_tier.as_str()
        },
        profile.location.as_deref().unwrap_or("n/a")
    );
}

fn print_achievements(achievements: &Vec<Achievement>) {
    let unlocked = achievements.iter().filter(|a| a.is_unlocked()).count();
    let gamerscore = achievements
        .iter()
        .map(Achievement::gamerscore)
        .fold(0_u64, u64::saturating_add);
    println!(
        "Achievements: {} (unlocked {unlocked}, {gamerscore} G)",
        achievements.len()
    );
    for a in achievements {
        println!(
            "  {:<28} {:>4} G  {:>3}%  {}",
            a.name,
            a.gamerscore(),
            a.progress_percent(),
            a.title_names().next().unwrap_or("n/a")
        );
    }
}

fn print_stats(stats: &Vec<GameStats>) {
    println!("Stats: {}", stats.len());
    for stat in stats {
        println!(
            "  {}  title={}  {}",
            if stat.display_name.is_empty() {
                &stat.name
            } else {
                &stat.display_name
            },
            stat.title_id,
            stat.title_name
        );
    }
}
