use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use lcu_bravery::bravery::{generate, CatalogStore};
use lcu_bravery::lcu::{GameflowPhase, LcuClient};
use lcu_bravery::live_client::LiveClient;
use lcu_bravery::logging::init_logging;
use lcu_bravery::{Config, Error, Result};

#[derive(Parser)]
#[command(name = "lcu-bravery", version, about = "League client companion")]
struct Cli {
  /// Path to config.json (defaults to the platform config directory)
  #[arg(long, env = "LCU_BRAVERY_CONFIG")]
  config: Option<PathBuf>,

  /// Debug logging
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Check that the League client answers
  Status,
  /// List rune pages
  Pages,
  /// Show the active rune page
  CurrentPage,
  /// Set both summoner spells in champ select
  Spells { spell1: i64, spell2: i64 },
  /// Show the gameflow phase
  Phase,
  /// Hover and lock in a champion
  Pick { champion_id: i64 },
  /// Follow gameflow phase and live game events until interrupted
  Watch {
    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,
  },
  /// Download and cache a Data Dragon catalog
  Catalog {
    #[arg(long, conflicts_with = "refresh")]
    version: Option<String>,
    /// Look up the latest release even when a catalog is cached
    #[arg(long)]
    refresh: bool,
  },
  /// Roll an Ultimate Bravery build
  Bravery {
    #[arg(long)]
    seed: Option<u64>,
    /// Apply the rune page and lock in the champion in the running champ select
    #[arg(long)]
    apply: bool,
  },
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{}", e);
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<()> {
  let config = Config::load(cli.config.as_deref())?;

  match cli.command {
    Command::Status => {
      let client = LcuClient::connect(&config)?;
      if !client.check_connection().await {
        return Err(Error::Connection("League client did not answer".to_string()));
      }
      let summoner = client.current_summoner().await?;
      println!("Connected as {} ({})", summoner.display_name, summoner.summoner_id);
    }
    Command::Pages => {
      let client = LcuClient::connect(&config)?;
      for page in client.get_all_pages().await? {
        let marker = if page.current { "*" } else { " " };
        println!("{} {:>10}  {}  {:?}", marker, page.id, page.name, page.selected_perk_ids);
      }
    }
    Command::CurrentPage => {
      let client = LcuClient::connect(&config)?;
      let page = client.get_active_page().await?;
      println!("{}", serde_json::to_string_pretty(&page)?);
    }
    Command::Spells { spell1, spell2 } => {
      let client = LcuClient::connect(&config)?;
      client.set_summoner_spells(spell1, spell2).await?;
      println!("Summoner spells set to {} / {}", spell1, spell2);
    }
    Command::Phase => {
      let client = LcuClient::connect(&config)?;
      println!("{}", client.get_phase().await?);
    }
    Command::Pick { champion_id } => {
      let client = LcuClient::connect(&config)?;
      let action = client.commit(champion_id).await?;
      println!("Locked in champion {} on action {}", champion_id, action.id);
    }
    Command::Watch { interval_ms } => watch(&config, Duration::from_millis(interval_ms)).await?,
    Command::Catalog { version, refresh } => {
      let store = CatalogStore::from_config(&config)?;
      let catalog = if refresh {
        store.refresh_catalog().await?
      } else {
        store.ensure_catalog(version.as_deref()).await?
      };
      println!(
        "Catalog {} in {}: {} champions, {} boots, {} mythic, {} legendary, {} rune trees",
        catalog.version,
        store.version_dir(&catalog.version).display(),
        catalog.champions.len(),
        catalog.items.boots.len(),
        catalog.items.mythic.len(),
        catalog.items.legendary.len(),
        catalog.runes.len()
      );
    }
    Command::Bravery { seed, apply } => bravery(&config, seed, apply).await?,
  }
  Ok(())
}

async fn bravery(config: &Config, seed: Option<u64>, apply: bool) -> Result<()> {
  let catalog = CatalogStore::from_config(config)?.ensure_catalog(None).await?;
  let mut rng = match seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };

  if !apply {
    let build = generate(&catalog.champion_ids(), &catalog, &mut rng)?;
    println!("{}", build);
    return Ok(());
  }

  let client = LcuClient::connect(config)?;
  let pickable = client.pickable_champion_ids().await?;
  let build = generate(&pickable, &catalog, &mut rng)?;
  println!("{}", build);

  client
    .set_active_page(
      &build.page_name(),
      build.primary_style_id(),
      &build.perk_ids(),
      build.sub_style_id(),
    )
    .await?;
  client.commit(build.champion.id).await?;
  println!("Rune page applied and {} locked in", build.champion.name);
  Ok(())
}

async fn watch(config: &Config, interval: Duration) -> Result<()> {
  let client = LcuClient::connect(config)?;
  let mut live = LiveClient::connect(config)?;
  let mut ticker = tokio::time::interval(interval);
  let mut last_phase: Option<GameflowPhase> = None;

  loop {
    tokio::select! {
      _ = tokio::signal::ctrl_c() => {
        tracing::info!("Stopping watch");
        return Ok(());
      }
      _ = ticker.tick() => {}
    }

    match client.get_phase().await {
      Ok(phase) if last_phase.as_ref() != Some(&phase) => {
        println!("Phase: {}", phase);
        last_phase = Some(phase);
      }
      Ok(_) => {}
      Err(e) => tracing::warn!("Phase check failed: {}", e),
    }

    if !live.is_match_active().await {
      continue;
    }
    match live.poll_events().await {
      Ok(events) => {
        for event in events {
          println!("[{:>7.1}s] {} {:?}", event.time, event.kind, event.payload);
        }
      }
      Err(e) => tracing::debug!("Event poll failed: {}", e),
    }
  }
}
