use std::fmt::{self, Write};

use morrowland_core::domain::{LeaderboardSnapshot, LeaderboardTab, RankedEntry, Stars};
use serde::Serialize;

/// What the JSON output exposes: the two views plus the genre selector.
#[derive(Debug, Serialize)]
struct SnapshotDto<'a> {
  tab: String,
  sort: String,
  selected_genre: &'a str,
  genre_options: Vec<&'a str>,
  overall: &'a [RankedEntry],
  genre: &'a [RankedEntry],
}

pub fn render_json(snapshot: &LeaderboardSnapshot) -> serde_json::Result<String> {
  let dto = SnapshotDto {
    tab: snapshot.tab.to_string(),
    sort: if snapshot.sort.is_descending() { "desc".into() } else { "asc".into() },
    selected_genre: &snapshot.selected_genre,
    genre_options: snapshot.genre_options.iter().map(|o| o.key.as_str()).collect(),
    overall: &snapshot.overall,
    genre: &snapshot.genre,
  };
  serde_json::to_string_pretty(&dto)
}

/// Plain text table of the active tab.
pub fn render_table(snapshot: &LeaderboardSnapshot) -> Result<String, fmt::Error> {
  let mut out = String::new();

  let scope = match snapshot.tab {
    LeaderboardTab::Overall => "overall".to_string(),
    LeaderboardTab::Genre => format!("genre: {}", snapshot.selected_genre),
  };
  let direction = if snapshot.sort.is_descending() { "highest first" } else { "lowest first" };
  writeln!(out, "Leaderboard ({scope}, {direction})")?;

  let entries = snapshot.active();
  if entries.is_empty() {
    out.push_str("  no artists match the current filters\n");
    return Ok(out);
  }

  for entry in entries {
    writeln!(
      out,
      "{:>3} {:<2} {:<24} {:<12} {:<4} {} {:>4.2} ({:>3})  {}",
      entry.rank,
      entry.badge.marker(),
      truncate(&entry.artist.name, 24),
      truncate(&entry.artist.genre, 12),
      truncate(&entry.artist.country, 4),
      Stars(entry.artist.avg_rating),
      entry.artist.avg_rating,
      entry.artist.review_count,
      trend_text(entry),
    )?;
  }

  if !snapshot.genre_options.is_empty() {
    let genres: Vec<&str> = snapshot.genre_options.iter().map(|o| o.label.as_str()).collect();
    writeln!(out, "Genres: {}", genres.join(", "))?;
  }

  Ok(out)
}

fn trend_text(entry: &RankedEntry) -> String {
  entry.trend_points.iter().map(|p| format!("{:.2}", p.y)).collect::<Vec<_>>().join(" → ")
}

fn truncate(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }
  let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
  cut.push('…');
  cut
}

#[cfg(test)]
mod tests {
  use super::*;
  use morrowland_core::domain::{ArtistSummary, Badge, GenreOption, TrendPoint};

  fn snapshot() -> LeaderboardSnapshot {
    let entry = RankedEntry {
      artist: ArtistSummary {
        id: "a1".into(),
        name: "Nova".into(),
        genre: "Techno".into(),
        country: "BE".into(),
        avg_rating: 4.5,
        review_count: 10,
      },
      rank: 1,
      badge: Badge::Gold,
      trend_points: vec![TrendPoint { x: 1, y: 4.0 }, TrendPoint { x: 2, y: 4.5 }],
    };
    LeaderboardSnapshot {
      overall: vec![entry.clone()],
      genre: vec![entry],
      genre_options: vec![GenreOption::new("Techno")],
      selected_genre: "Techno".into(),
      ..LeaderboardSnapshot::default()
    }
  }

  #[test]
  fn table_shows_rank_badge_and_trend() {
    let table = render_table(&snapshot()).unwrap();

    assert!(table.starts_with("Leaderboard (overall, highest first)"));
    assert!(table.contains("🥇"));
    assert!(table.contains("Nova"));
    assert!(table.contains("★★★★☆"));
    assert!(table.contains("4.00 → 4.50"));
    assert!(table.contains("Genres: Techno"));
  }

  #[test]
  fn empty_view_says_so() {
    let mut snap = snapshot();
    snap.tab = LeaderboardTab::Genre;
    snap.genre.clear();

    let table = render_table(&snap).unwrap();

    assert!(table.contains("genre: Techno"));
    assert!(table.contains("no artists match"));
  }

  #[test]
  fn json_has_both_views() {
    let json: serde_json::Value = serde_json::from_str(&render_json(&snapshot()).unwrap()).unwrap();

    assert_eq!(json["tab"], "overall");
    assert_eq!(json["sort"], "desc");
    assert_eq!(json["overall"][0]["rank"], 1);
    assert_eq!(json["overall"][0]["name"], "Nova");
    assert_eq!(json["genre"][0]["trend_points"][1]["y"], 4.5);
  }

  #[test]
  fn long_names_are_cut() {
    assert_eq!(truncate("Swedish House Mafia Reunion Tour", 10), "Swedish H…");
    assert_eq!(truncate("Nova", 10), "Nova");
  }
}
