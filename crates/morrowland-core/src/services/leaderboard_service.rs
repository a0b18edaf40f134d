use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use crate::domain::{ArtistSummary, LeaderboardSnapshot, LeaderboardTab};
use crate::errors::CoreError;
use crate::ports::{LeaderboardSource, Notifier};
use crate::services::rating_aggregator::{
  AggregationRequest, RatingAggregator, ReviewIndex, build_review_index, parse_min_reviews,
};

/// Datos del último refresh que terminó bien.
struct LoadedData {
  artists: Vec<ArtistSummary>,
  index: ReviewIndex,
}

struct ServiceState {
  request: AggregationRequest,
  data: Option<LoadedData>,
  snapshot: LeaderboardSnapshot,
}

/// Orquesta lecturas, estado de la vista y recomputación del leaderboard.
///
/// Los triggers síncronos (`set_query`, `select_tab`...) recalculan con los
/// datos ya cargados. `refresh` vuelve a pedir ambos conjuntos en paralelo y
/// sólo aplica el resultado si ningún refresh posterior empezó entretanto.
pub struct LeaderboardService<S, N>
where
  S: LeaderboardSource,
  N: Notifier,
{
  source: S,
  notifier: N,
  aggregator: RatingAggregator,
  generation: AtomicU64,
  state: Mutex<ServiceState>,
}

impl<S, N> LeaderboardService<S, N>
where
  S: LeaderboardSource,
  N: Notifier,
{
  pub fn new(source: S, notifier: N, aggregator: RatingAggregator, request: AggregationRequest) -> Self {
    let snapshot = LeaderboardSnapshot {
      selected_genre: request.selected_genre.clone(),
      tab: request.tab,
      sort: request.sort,
      ..LeaderboardSnapshot::default()
    };

    Self {
      source,
      notifier,
      aggregator,
      generation: AtomicU64::new(0),
      state: Mutex::new(ServiceState { request, data: None, snapshot }),
    }
  }

  // -------- COMMAND (fetch) --------

  /// Pide leaderboard y reviews a la vez y recalcula cuando llegan ambos.
  ///
  /// Si cualquiera de las dos lecturas falla no se toca nada: las vistas
  /// anteriores siguen publicadas.
  pub async fn refresh(&self) -> Result<LeaderboardSnapshot, CoreError> {
    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
    debug!(generation, "leaderboard refresh started");

    let fetched = futures::try_join!(self.source.fetch_leaderboard(), self.source.fetch_reviews());

    let (artists, reviews) = match fetched {
      Ok(pair) => pair,
      Err(e) => {
        self.ensure_current(generation)?;
        error!(generation, error = %e, "leaderboard refresh failed");
        self.notifier.refresh_failed(&e.to_string()).await;
        return Err(CoreError::Source(e.to_string()));
      }
    };

    let index = build_review_index(&reviews);

    let snapshot = {
      let mut state = self.lock_state();
      // comprobado con el lock tomado: nadie puede aplicar entre medias
      self.ensure_current(generation)?;

      info!(generation, artists = artists.len(), reviews = reviews.len(), "leaderboard data loaded");
      state.data = Some(LoadedData { artists, index });
      self.recompute(&mut state)
    };

    self.notifier.refreshed().await;
    Ok(snapshot)
  }

  // -------- TRIGGERS (sync recompute) --------

  pub fn set_query(&self, query: &str) -> LeaderboardSnapshot {
    self.update(|r| r.with_query(query))
  }

  pub fn set_min_reviews(&self, min_reviews: u32) -> LeaderboardSnapshot {
    self.update(|r| r.with_min_reviews(min_reviews))
  }

  /// Variante para el texto tal cual lo escribe el usuario.
  pub fn set_min_reviews_text(&self, input: &str) -> LeaderboardSnapshot {
    self.set_min_reviews(parse_min_reviews(Some(input)))
  }

  pub async fn toggle_sort_direction(&self) -> LeaderboardSnapshot {
    let snapshot = self.update(|r| {
      let next = r.sort.toggled();
      r.with_sort(next)
    });
    self.notifier.sort_changed(snapshot.sort).await;
    snapshot
  }

  pub fn select_tab(&self, tab: LeaderboardTab) -> LeaderboardSnapshot {
    self.update(|r| r.with_tab(tab))
  }

  pub fn select_genre(&self, genre: &str) -> LeaderboardSnapshot {
    self.update(|r| r.with_genre(genre))
  }

  // -------- QUERY (read) --------

  pub fn snapshot(&self) -> LeaderboardSnapshot {
    self.lock_state().snapshot.clone()
  }

  pub fn request(&self) -> AggregationRequest {
    self.lock_state().request.clone()
  }

  pub fn is_loaded(&self) -> bool {
    self.lock_state().data.is_some()
  }

  // -------- internals --------

  fn update(&self, change: impl FnOnce(AggregationRequest) -> AggregationRequest) -> LeaderboardSnapshot {
    let mut state = self.lock_state();
    let request = std::mem::take(&mut state.request);
    state.request = change(request);
    self.recompute(&mut state)
  }

  fn recompute(&self, state: &mut ServiceState) -> LeaderboardSnapshot {
    let snapshot = match &state.data {
      Some(data) => self.aggregator.aggregate(&data.artists, &data.index, &state.request),
      // sin datos todavía: vistas vacías pero con los ajustes actuales
      None => LeaderboardSnapshot {
        selected_genre: state.request.selected_genre.clone(),
        tab: state.request.tab,
        sort: state.request.sort,
        ..LeaderboardSnapshot::default()
      },
    };

    state.request.selected_genre = snapshot.selected_genre.clone();
    state.snapshot = snapshot.clone();
    snapshot
  }

  fn ensure_current(&self, generation: u64) -> Result<(), CoreError> {
    let latest = self.generation.load(Ordering::SeqCst);
    if latest != generation {
      debug!(generation, latest, "discarding superseded leaderboard response");
      return Err(CoreError::Superseded { generation, latest });
    }
    Ok(())
  }

  fn lock_state(&self) -> MutexGuard<'_, ServiceState> {
    // el estado siempre se reemplaza entero, así que un panic a mitad no lo deja inconsistente
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Review, SortOrder};
  use crate::ports::SourceError;
  use async_trait::async_trait;
  use std::collections::VecDeque;
  use std::sync::Arc;
  use std::time::Duration;

  fn artist(id: &str, genre: &str, avg_rating: f64, review_count: u32) -> ArtistSummary {
    ArtistSummary {
      id: id.into(),
      name: id.to_uppercase(),
      genre: genre.into(),
      country: "BE".into(),
      avg_rating,
      review_count,
    }
  }

  type Response<T> = (Duration, Result<Vec<T>, String>);

  /// Fuente en memoria: cada llamada consume la siguiente respuesta encolada.
  #[derive(Default)]
  struct ScriptedSource {
    leaderboard: Mutex<VecDeque<Response<ArtistSummary>>>,
    reviews: Mutex<VecDeque<Response<Review>>>,
  }

  impl ScriptedSource {
    fn push_leaderboard(&self, delay_ms: u64, result: Result<Vec<ArtistSummary>, String>) {
      self.leaderboard.lock().unwrap().push_back((Duration::from_millis(delay_ms), result));
    }

    fn push_reviews(&self, result: Result<Vec<Review>, String>) {
      self.reviews.lock().unwrap().push_back((Duration::ZERO, result));
    }
  }

  async fn play<T>(queue: &Mutex<VecDeque<Response<T>>>) -> Result<Vec<T>, SourceError> {
    let next = queue.lock().unwrap().pop_front();
    let Some((delay, result)) = next else {
      return Ok(Vec::new());
    };
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
    result.map_err(SourceError::Transport)
  }

  #[async_trait]
  impl LeaderboardSource for Arc<ScriptedSource> {
    async fn fetch_leaderboard(&self) -> Result<Vec<ArtistSummary>, SourceError> {
      play(&self.leaderboard).await
    }

    async fn fetch_reviews(&self) -> Result<Vec<Review>, SourceError> {
      play(&self.reviews).await
    }
  }

  #[derive(Default, Clone)]
  struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
  }

  impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
      self.messages.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl Notifier for RecordingNotifier {
    async fn refreshed(&self) {
      self.messages.lock().unwrap().push("refreshed".into());
    }

    async fn refresh_failed(&self, message: &str) {
      self.messages.lock().unwrap().push(format!("failed: {message}"));
    }

    async fn sort_changed(&self, order: SortOrder) {
      self.messages.lock().unwrap().push(format!("sort: {order:?}"));
    }
  }

  fn service(
    source: &Arc<ScriptedSource>,
    notifier: &RecordingNotifier,
  ) -> LeaderboardService<Arc<ScriptedSource>, RecordingNotifier> {
    LeaderboardService::new(
      Arc::clone(source),
      notifier.clone(),
      RatingAggregator::default(),
      AggregationRequest::default(),
    )
  }

  fn ids(snapshot: &LeaderboardSnapshot) -> Vec<String> {
    snapshot.active().iter().map(|e| e.artist.id.to_string()).collect()
  }

  #[tokio::test]
  async fn refresh_publishes_both_views() {
    let source = Arc::new(ScriptedSource::default());
    source.push_leaderboard(0, Ok(vec![artist("a1", "Techno", 4.5, 10), artist("a2", "House", 4.8, 3)]));
    source.push_reviews(Ok(vec![
      Review { artist_id: "a1".into(), rating: 4.0, review_date: Some("2024-01-01".into()) },
      Review { artist_id: "a1".into(), rating: 5.0, review_date: Some("2024-01-02".into()) },
    ]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, &notifier);

    let snapshot = svc.refresh().await.unwrap();

    assert_eq!(ids(&snapshot), vec!["a2", "a1"]);
    assert_eq!(snapshot.selected_genre, "House");
    assert_eq!(snapshot.genre.len(), 1);
    let a1 = &snapshot.overall[1];
    assert_eq!(a1.trend_points.iter().map(|p| p.y).collect::<Vec<_>>(), vec![4.0, 4.5]);
    assert_eq!(notifier.messages(), vec!["refreshed"]);
    assert!(svc.is_loaded());
  }

  #[tokio::test]
  async fn failed_fetch_keeps_previous_views() {
    let source = Arc::new(ScriptedSource::default());
    source.push_leaderboard(0, Ok(vec![artist("a1", "Techno", 4.5, 10)]));
    source.push_reviews(Ok(vec![]));
    source.push_leaderboard(0, Ok(vec![artist("zz", "Techno", 1.0, 1)]));
    source.push_reviews(Err("timeout".into()));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, &notifier);

    svc.refresh().await.unwrap();
    let err = svc.refresh().await.unwrap_err();

    assert!(matches!(err, CoreError::Source(_)));
    assert_eq!(ids(&svc.snapshot()), vec!["a1"]);
    assert_eq!(notifier.messages(), vec!["refreshed".to_string(), "failed: transport error: timeout".to_string()]);
  }

  #[tokio::test]
  async fn failed_artist_fetch_keeps_previous_views() {
    let source = Arc::new(ScriptedSource::default());
    source.push_leaderboard(0, Ok(vec![artist("a1", "Techno", 4.5, 10)]));
    source.push_reviews(Ok(vec![]));
    source.push_leaderboard(0, Err("connection refused".into()));
    source.push_reviews(Ok(vec![Review { artist_id: "a1".into(), rating: 1.0, review_date: None }]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, &notifier);

    svc.refresh().await.unwrap();
    let err = svc.refresh().await.unwrap_err();

    assert!(matches!(err, CoreError::Source(_)));
    let snapshot = svc.snapshot();
    assert_eq!(ids(&snapshot), vec!["a1"]);
    assert_eq!(snapshot.overall[0].trend_points.iter().map(|p| p.y).collect::<Vec<_>>(), vec![4.5, 4.5]);
    assert_eq!(
      notifier.messages(),
      vec!["refreshed".to_string(), "failed: transport error: connection refused".to_string()]
    );
  }

  #[tokio::test]
  async fn superseded_refresh_is_discarded() {
    let source = Arc::new(ScriptedSource::default());
    source.push_leaderboard(50, Ok(vec![artist("old", "Techno", 3.0, 1)]));
    source.push_reviews(Ok(vec![]));
    source.push_leaderboard(0, Ok(vec![artist("new", "Techno", 4.0, 1)]));
    source.push_reviews(Ok(vec![]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, &notifier);

    let (slow, fast) = tokio::join!(svc.refresh(), async {
      tokio::time::sleep(Duration::from_millis(10)).await;
      svc.refresh().await
    });

    assert!(matches!(slow, Err(CoreError::Superseded { generation: 1, latest: 2 })));
    assert_eq!(ids(&fast.unwrap()), vec!["new"]);
    assert_eq!(ids(&svc.snapshot()), vec!["new"]);
    assert_eq!(notifier.messages(), vec!["refreshed"]);
  }

  #[tokio::test]
  async fn triggers_recompute_from_cached_data() {
    let source = Arc::new(ScriptedSource::default());
    source.push_leaderboard(
      0,
      Ok(vec![artist("a1", "Techno", 4.5, 10), artist("a2", "House", 4.8, 3), artist("a3", "House", 3.9, 7)]),
    );
    source.push_reviews(Ok(vec![]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, &notifier);
    svc.refresh().await.unwrap();

    assert_eq!(ids(&svc.set_min_reviews_text("5")), vec!["a1", "a3"]);
    assert_eq!(ids(&svc.set_query("house")), vec!["a3"]);
    assert_eq!(ids(&svc.set_min_reviews(0)), vec!["a2", "a3"]);

    let asc = svc.toggle_sort_direction().await;
    assert_eq!(asc.sort, SortOrder::Ascending);
    assert_eq!(ids(&asc), vec!["a3", "a2"]);

    let genre_tab = svc.select_tab(LeaderboardTab::Genre);
    assert_eq!(genre_tab.selected_genre, "House");
    assert_eq!(ids(&genre_tab), vec!["a3", "a2"]);

    svc.set_query("");
    let techno = svc.select_genre("Techno");
    assert_eq!(ids(&techno), vec!["a1"]);
    assert_eq!(techno.genre[0].rank, 1);

    assert_eq!(notifier.messages(), vec!["refreshed".to_string(), "sort: Ascending".to_string()]);
  }

  #[tokio::test]
  async fn triggers_before_first_load_keep_settings() {
    let source = Arc::new(ScriptedSource::default());
    let notifier = RecordingNotifier::default();
    let svc = service(&source, &notifier);

    let snapshot = svc.select_tab(LeaderboardTab::Genre);

    assert!(snapshot.overall.is_empty());
    assert_eq!(snapshot.tab, LeaderboardTab::Genre);
    assert_eq!(svc.request().tab, LeaderboardTab::Genre);
    assert!(!svc.is_loaded());
  }
}
