mod config;
mod dispatch;
mod infrastructure;

use anyhow::Context;
use clap::Parser;
use morrowland_core::domain::{LeaderboardSnapshot, LeaderboardTab, SortOrder};
use morrowland_core::services::{AggregationRequest, LeaderboardService, RatingAggregator, parse_min_reviews};
use morrowland_odata::{ODataConfig, ODataLeaderboardSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::LeaderboardConfig;
use crate::dispatch::{Command, HELP, dispatch};
use infrastructure::render::{render_json, render_table};
use infrastructure::reporter::ConsoleNotifier;

/// Type alias to simplify the generic signature of the Service.
type ConcreteLeaderboardService = LeaderboardService<ODataLeaderboardSource, ConsoleNotifier>;

/// Command line of the `morrowland` binary.
#[derive(Debug, Parser)]
#[command(name = "morrowland", version, about = "Festival artist leaderboard")]
pub struct Cli {
  /// OData V4 service root; overrides `[odata] service_url`.
  #[arg(long, env = "MORROWLAND_SERVICE_URL")]
  pub service_url: Option<String>,

  /// Free-text filter on name, genre or country.
  #[arg(long, short)]
  pub query: Option<String>,

  /// Minimum number of reviews (anything non-numeric means no minimum).
  #[arg(long)]
  pub min_reviews: Option<String>,

  /// Genre shown in the genre tab (defaults to the first one alphabetically).
  #[arg(long, short)]
  pub genre: Option<String>,

  /// Tab to show: overall or genre.
  #[arg(long, short)]
  pub tab: Option<LeaderboardTab>,

  /// Lowest rating first.
  #[arg(long)]
  pub ascending: bool,

  /// Print the views as JSON instead of a table.
  #[arg(long)]
  pub json: bool,

  /// Keep reading commands from stdin after the first load.
  #[arg(long, short)]
  pub interactive: bool,

  /// Do not print status messages on stderr.
  #[arg(long)]
  pub quiet: bool,
}

impl Cli {
  /// Applies the command line on top of the configured initial state.
  fn initial_request(&self, base: AggregationRequest) -> AggregationRequest {
    let mut request = base;
    if let Some(query) = &self.query {
      request = request.with_query(query);
    }
    if self.min_reviews.is_some() {
      request = request.with_min_reviews(parse_min_reviews(self.min_reviews.as_deref()));
    }
    if let Some(genre) = &self.genre {
      request = request.with_genre(genre);
    }
    if let Some(tab) = self.tab {
      request = request.with_tab(tab);
    }
    if self.ascending {
      request = request.with_sort(SortOrder::Ascending);
    }
    request
  }
}

fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();
}

fn print_snapshot(snapshot: &LeaderboardSnapshot, json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", render_json(snapshot).context("serialize leaderboard")?);
  } else {
    print!("{}", render_table(snapshot).context("format leaderboard table")?);
  }
  Ok(())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
  init_tracing();
  info!("Starting morrowland leaderboard v{}", env!("CARGO_PKG_VERSION"));

  // --- Dependency Injection Phase ---

  // 1. Configuration ([odata] and [leaderboard] sections of morrowland.toml)
  let mut odata_cfg = ODataConfig::load().context("load [odata] config")?;
  if let Some(url) = &cli.service_url {
    odata_cfg.service_url = url.clone();
  }
  let board_cfg = LeaderboardConfig::load().context("load [leaderboard] config")?;

  // 2. Data-access Adapter (OData V4 over HTTP)
  let source = ODataLeaderboardSource::new(odata_cfg).context("build OData client")?;

  // 3. Output Port Adapter (status messages)
  let notifier = ConsoleNotifier::new(cli.quiet);

  // 4. Service Wiring
  let request = cli.initial_request(AggregationRequest::from(&board_cfg));
  let service: ConcreteLeaderboardService =
    LeaderboardService::new(source, notifier, RatingAggregator::from(&board_cfg), request);

  // --- First load ---
  match service.refresh().await {
    Ok(snapshot) => print_snapshot(&snapshot, cli.json)?,
    // in interactive mode the user can retry with `refresh`
    Err(e) if cli.interactive => warn!("initial load failed: {e}"),
    Err(e) => return Err(e).context("load leaderboard"),
  }

  if cli.interactive {
    interactive_loop(&service, cli.json).await?;
  }

  Ok(())
}

async fn interactive_loop(service: &ConcreteLeaderboardService, json: bool) -> anyhow::Result<()> {
  eprintln!("{HELP}");
  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  while let Some(line) = lines.next_line().await.context("read stdin")? {
    let command = match Command::parse(&line) {
      Ok(c) => c,
      Err(e) => {
        eprintln!("{e}");
        continue;
      }
    };

    match command {
      Command::Quit => break,
      Command::Help => eprintln!("{HELP}"),
      other => match dispatch(service, other).await {
        Ok(Some(snapshot)) => print_snapshot(&snapshot, json)?,
        // errors were already logged and notified by the service
        Ok(None) | Err(_) => {}
      },
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_overrides_configured_state() {
    let cli =
      Cli::parse_from(["morrowland", "--query", " house ", "--min-reviews", "abc", "--tab", "genre", "--ascending"]);
    let base = AggregationRequest::default().with_min_reviews(4);

    let request = cli.initial_request(base);

    assert_eq!(request.query, "house");
    assert_eq!(request.min_reviews, 0);
    assert_eq!(request.tab, LeaderboardTab::Genre);
    assert_eq!(request.sort, SortOrder::Ascending);
  }

  #[test]
  fn cli_without_flags_keeps_config() {
    let cli = Cli::parse_from(["morrowland"]);
    let base = AggregationRequest::default().with_min_reviews(4).with_genre("House");

    assert_eq!(cli.initial_request(base.clone()), base);
  }
}
