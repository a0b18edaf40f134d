use async_trait::async_trait;
use morrowland_core::domain::SortOrder;
use morrowland_core::ports::Notifier;
use tracing::info;

/// A `Notifier` that shows the short status messages ("toasts") on stderr.
///
/// stdout is kept for the leaderboard itself so it can be piped.
#[derive(Clone, Default)]
pub struct ConsoleNotifier {
  quiet: bool,
}

impl ConsoleNotifier {
  pub fn new(quiet: bool) -> Self {
    Self { quiet }
  }

  fn toast(&self, message: &str) {
    info!(target: "morrowland::toast", "{message}");
    if !self.quiet {
      eprintln!("» {message}");
    }
  }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
  async fn refreshed(&self) {
    self.toast("Refreshed");
  }

  // The cause is already logged by the service; keep the toast short.
  async fn refresh_failed(&self, _message: &str) {
    self.toast("Could not load the leaderboard, try refreshing again");
  }

  async fn sort_changed(&self, order: SortOrder) {
    let text = match order {
      SortOrder::Descending => "Sorted: highest rating first",
      SortOrder::Ascending => "Sorted: lowest rating first",
    };
    self.toast(text);
  }
}
