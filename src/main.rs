use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frag_board::api::state::AppState;
use frag_board::calculate::{
    category_leaders, default_categories, equipment_masters, podium, rank_players, summarize,
    CategoryFilter, RankingQuery, SortConfig, SortDirection, SortKey,
};
use frag_board::config::AppConfig;
use frag_board::season::run_season_build;
use frag_board::storage::{load_snapshot, SnapshotStore};
use frag_board::versus::VersusSession;

#[derive(Parser)]
#[command(name = "frag-board")]
#[command(about = "Season leaderboard for a community game server")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the leaderboard views for the current snapshot
    Report {
        /// Sort key (name, score, kills, deaths, damage, hs_rate, wins, mvps, rounds, kda)
        #[arg(long, default_value = "score")]
        sort: String,

        /// Sort direction: asc or desc
        #[arg(long, default_value = "desc")]
        direction: String,

        /// Case-insensitive name filter
        #[arg(long, default_value = "")]
        search: String,

        /// Favourite weapon filter ("All" for every player)
        #[arg(long, default_value = "All")]
        category: String,

        /// Entries per category board
        #[arg(long)]
        top: Option<usize>,
    },

    /// Compare two players head to head
    Compare {
        first: String,
        second: String,
    },

    /// Build the season snapshot from lifetime counters
    BuildSeason {
        /// JSON file with the lifetime counters of every player
        #[arg(long)]
        input: PathBuf,

        /// Start a new season: discard every baseline
        #[arg(long)]
        reset: bool,

        /// Build but don't write anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = PathBuf::from(&cli.config);
    let loaded = AppConfig::load_optional(&config_path)
        .with_context(|| format!("loading config {:?}", config_path))?;
    let config_found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&level, cli.json_logs);

    tracing::info!("Starting frag-board v{}", env!("CARGO_PKG_VERSION"));
    if !config_found {
        tracing::warn!("Config file {:?} not found, using defaults", config_path);
    }

    let storage = config.storage();

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let store = SnapshotStore::open(storage.snapshot_path())
                .with_context(|| format!("opening snapshot {:?}", storage.snapshot_path()))?;
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::new(config, store);
            let app = frag_board::api::build_router(state);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Leaderboard API: http://{}/api", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Report {
            sort,
            direction,
            search,
            category,
            top,
        } => {
            let snapshot = load_snapshot(&storage.snapshot_path())?;
            let players = &snapshot.players;
            let query = RankingQuery {
                search,
                category: CategoryFilter::from(category.as_str()),
                sort: SortConfig::new(SortKey::from_str(&sort)?, SortDirection::from_str(&direction)?),
            };
            let k = top.unwrap_or(config.leaderboard.top_k);

            println!("=== Leaderboard ({}) ===", snapshot.meta.last_updated);
            println!(
                "{:>3}  {:<20} {:>8} {:>6} {:>6} {:>6} {:>8}  {}",
                "#", "Name", "Score", "Kills", "Deaths", "K/D", "HS %", "Weapon"
            );
            for (i, p) in rank_players(players, &query).iter().enumerate() {
                println!(
                    "{:>3}  {:<20} {:>8.1} {:>6} {:>6} {:>6.2} {:>8.1}  {}",
                    i + 1,
                    p.name,
                    p.score,
                    p.kills,
                    p.deaths,
                    p.kda,
                    p.hs_rate,
                    p.fav_weapon
                );
            }

            match podium(players) {
                Some([first, second, third]) => {
                    println!("\n=== Podium ===");
                    println!("1. {}  2. {}  3. {}", first.name, second.name, third.name);
                }
                None => println!("\n(not enough players for a podium)"),
            }

            for board in category_leaders(players, k) {
                println!("\n=== {} ===", board.title);
                for entry in &board.entries {
                    println!(
                        "{}. {:<20} {:.1}",
                        entry.rank,
                        entry.player.name,
                        entry.value.unwrap_or_default()
                    );
                }
            }

            let categories = default_categories();
            let masters = equipment_masters(players, &categories);
            println!("\n=== Equipment Masters ===");
            for cat in &categories {
                match masters.get(cat.id.as_str()) {
                    Some(m) => println!(
                        "{:<8} {:<20} {} ({} kills)",
                        cat.label,
                        m.player.name,
                        m.weapon.to_uppercase(),
                        m.kills
                    ),
                    None => println!("{:<8} -", cat.label),
                }
            }

            let summary = summarize(players);
            println!("\n=== Server Totals ===");
            println!("Kills:  {}", summary.total_kills);
            println!("Deaths: {}", summary.total_deaths);
            println!("Wins:   {}", summary.total_wins);
            println!("MVPs:   {}", summary.total_mvps);
            println!("Damage: {:.0}", summary.total_damage);
        }
        Commands::Compare { first, second } => {
            let snapshot = load_snapshot(&storage.snapshot_path())?;

            let mut session = VersusSession::new(1);
            session.toggle_mode();
            session.select(&first);
            session.select(&second);

            let Some(comparison) = session.comparison(&snapshot.players) else {
                if first == second {
                    bail!("pick two different players");
                }
                let missing = [&first, &second]
                    .into_iter()
                    .find(|n| snapshot.player(n).is_none())
                    .cloned()
                    .unwrap_or_default();
                bail!("player not found: {}", missing);
            };

            println!(
                "{:<16} {:>12} {:>12}",
                "", comparison.first.name, comparison.second.name
            );
            for row in &comparison.rows {
                let marker = match row.winner {
                    Some(frag_board::calculate::Side::First) => "<",
                    Some(frag_board::calculate::Side::Second) => ">",
                    None => "=",
                };
                println!(
                    "{:<16} {:>12} {:>12}  {}",
                    row.label, row.first, row.second, marker
                );
            }
            let (a, b) = comparison.tally();
            println!("\nRows won: {} {} - {} {}", comparison.first.name, a, b, comparison.second.name);
        }
        Commands::BuildSeason {
            input,
            reset,
            dry_run,
        } => {
            let reset = reset || config.leaderboard.reset_season;
            let build = run_season_build(&storage, &input, reset, dry_run)?;

            println!("\n=== Season Build ===");
            println!("Players:          {}", build.snapshot.players.len());
            println!("Baselines:        {}", build.baselines.len());
            println!("Baseline updated: {}", build.baseline_updated);
            println!("Last updated:     {}", build.snapshot.meta.last_updated);
            if dry_run {
                println!("\n(dry run - no data written to disk)");
            }
        }
    }

    Ok(())
}
