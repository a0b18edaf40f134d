//! Maps host events (one command line each) to leaderboard triggers.

use morrowland_core::domain::{LeaderboardSnapshot, LeaderboardTab, TabParseError};
use morrowland_core::ports::{LeaderboardSource, Notifier};
use morrowland_core::services::LeaderboardService;
use morrowland_core::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Refresh,
  Search(String),
  MinReviews(String),
  ToggleSort,
  Tab(LeaderboardTab),
  Genre(String),
  Show,
  Help,
  Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("unknown command: {0} (try `help`)")]
  Unknown(String),
  #[error("`{0}` needs an argument")]
  MissingArgument(&'static str),
  #[error("{0}")]
  Invalid(String),
}

pub const HELP: &str = "\
commands:
  refresh             reload artists and reviews
  search <text>       filter by name, genre or country (empty clears)
  min <n>             minimum number of reviews
  sort                flip rating order
  tab overall|genre   switch view
  genre <name>        pick the genre for the genre tab
  show                print the current view
  quit";

impl Command {
  pub fn parse(line: &str) -> Result<Self, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
      Some((w, r)) => (w, r.trim()),
      None => (line, ""),
    };

    match word.to_lowercase().as_str() {
      "refresh" | "r" => Ok(Command::Refresh),
      "search" | "s" => Ok(Command::Search(rest.to_string())),
      "min" => Ok(Command::MinReviews(rest.to_string())),
      "sort" => Ok(Command::ToggleSort),
      "tab" if rest.is_empty() => Err(ParseError::MissingArgument("tab")),
      "tab" => rest.parse().map(Command::Tab).map_err(|e: TabParseError| ParseError::Invalid(e.to_string())),
      "genre" if rest.is_empty() => Err(ParseError::MissingArgument("genre")),
      "genre" => Ok(Command::Genre(rest.to_string())),
      "" | "show" | "ls" => Ok(Command::Show),
      "help" | "?" => Ok(Command::Help),
      "quit" | "exit" | "q" => Ok(Command::Quit),
      other => Err(ParseError::Unknown(other.to_string())),
    }
  }
}

/// Runs one command against the service.
///
/// Returns `None` for commands that do not produce a new view (`help`, `quit`).
pub async fn dispatch<S, N>(
  service: &LeaderboardService<S, N>,
  command: Command,
) -> Result<Option<LeaderboardSnapshot>, CoreError>
where
  S: LeaderboardSource,
  N: Notifier,
{
  let snapshot = match command {
    Command::Refresh => service.refresh().await?,
    Command::Search(text) => service.set_query(&text),
    Command::MinReviews(text) => service.set_min_reviews_text(&text),
    Command::ToggleSort => service.toggle_sort_direction().await,
    Command::Tab(tab) => service.select_tab(tab),
    Command::Genre(genre) => service.select_genre(&genre),
    Command::Show => service.snapshot(),
    Command::Help | Command::Quit => return Ok(None),
  };
  Ok(Some(snapshot))
}
