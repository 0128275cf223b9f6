use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use crate::config::{Config, GameSettings};
use crate::game::catalog::{StaticCatalog, TrackCatalog};
use crate::game::{GameMode, Session};
use crate::storage::db::i64_seconds_to_local_time;
use crate::storage::leaderboard::{Filter, Leaderboard, LeaderboardRow};

pub mod play;

#[derive(Parser)]
#[command(name = "blindtest")]
#[command(version = "0.1")]
#[command(about = "Guess the song: a terminal music quiz")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a game in the terminal
    Play {
        /// Player names; one for solo, two or more with --duel
        #[arg(required = true)]
        players: Vec<String>,
        /// Players take turns, each gets the configured number of rounds
        #[arg(long)]
        duel: bool,
        /// Genre to draw tracks from (defaults to the configured genre)
        #[arg(short, long)]
        genre: Option<String>,
        /// Number of rounds
        #[arg(short, long)]
        rounds: Option<u32>,
        /// Seed for a reproducible game
        #[arg(long)]
        seed: Option<u64>,
        /// Disable hints
        #[arg(long)]
        no_hints: bool,
        /// Disable the speed bonus
        #[arg(long)]
        no_speed_bonus: bool,
    },
    /// Show best scores
    Leaderboard {
        #[arg(short, long)]
        genre: Option<String>,
        /// solo or duel
        #[arg(short, long)]
        mode: Option<GameMode>,
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// List genres of the track catalog
    Genres,
    /// Run http server exposing the leaderboard
    Serve,
}

/// Applies command line overrides on top of the configured game settings
fn game_settings(
    base: &GameSettings,
    rounds: Option<u32>,
    seed: Option<u64>,
    no_hints: bool,
    no_speed_bonus: bool,
) -> anyhow::Result<GameSettings> {
    let settings = GameSettings {
        rounds: rounds.unwrap_or(base.rounds),
        seed: seed.or(base.seed),
        hints_enabled: base.hints_enabled && !no_hints,
        speed_bonus_enabled: base.speed_bonus_enabled && !no_speed_bonus,
        ..base.clone()
    };
    settings.validate()?;
    Ok(settings)
}

fn print_leaderboard(rows: &[LeaderboardRow]) -> anyhow::Result<()> {
    if rows.is_empty() {
        println!("No scores yet");
        return Ok(());
    }

    println!(
        "{:>4}  {:<16} {:>6}  {:<5} {:<12} {:>6} {:>7} {:>5}  {}",
        "#", "player", "points", "mode", "genre", "titles", "artists", "hints", "played"
    );
    for row in rows {
        let entry = &row.entry;
        let played = i64_seconds_to_local_time(row.played_at)?;
        println!(
            "{:>4}  {:<16} {:>6}  {:<5} {:<12} {:>6} {:>7} {:>5}  {}",
            row.rank,
            entry.player,
            entry.points,
            entry.mode.label(),
            entry.genre,
            entry.correct_titles,
            entry.correct_artists,
            entry.hints_used,
            played.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    match cli.command {
        Commands::Play {
            players,
            duel,
            genre,
            rounds,
            seed,
            no_hints,
            no_speed_bonus,
        } => {
            let mode = if duel { GameMode::Duel } else { GameMode::Solo };
            if mode == GameMode::Solo && players.len() > 1 {
                bail!("solo mode takes exactly one player, use --duel for more");
            }

            let settings = game_settings(&cfg.game, rounds, seed, no_hints, no_speed_bonus)?;
            let catalog = StaticCatalog::load(&cfg.catalog, &settings.default_genre);
            let leaderboard =
                Leaderboard::new(&cfg.database).with_context(|| "Failed to open leaderboard")?;

            let mut session = Session::new(
                players,
                mode,
                genre.as_deref().unwrap_or_default(),
                settings,
                &catalog,
                Box::new(leaderboard),
            )?;

            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            play::play(&mut session, &mut input, &mut out)?;
        }

        Commands::Leaderboard {
            genre,
            mode,
            limit,
            json,
        } => {
            let leaderboard =
                Leaderboard::new(&cfg.database).with_context(|| "Failed to open leaderboard")?;
            let rows = leaderboard.top(&Filter { genre, mode, limit })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_leaderboard(&rows)?;
            }
        }

        Commands::Genres => {
            let catalog = StaticCatalog::load(&cfg.catalog, &cfg.game.default_genre);
            for genre in catalog.genres() {
                if genre == cfg.game.default_genre.to_lowercase() {
                    println!("{genre} (default)");
                } else {
                    println!("{genre}");
                }
            }
        }

        Commands::Serve => {
            let catalog = StaticCatalog::load(&cfg.catalog, &cfg.game.default_genre);
            let leaderboard =
                Leaderboard::new(&cfg.database).with_context(|| "Failed to open leaderboard")?;
            let http_server =
                crate::http::server::HttpServer::new(leaderboard, catalog.genres(), cfg.http);

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }
    }

    Ok(())
}
