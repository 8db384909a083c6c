//! Leaderboard of winning times
//!
//! Persisted as plain text, one `<name> <seconds>` pair per line, sorted
//! fastest first. Only the top entries are shown but the whole list is kept.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::RANKING_DISPLAY;

/// Name recorded when the player didn't give one
pub const ANONYMOUS: &str = "anonymous";

/// A single ranking entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    /// Time taken to finish the course
    pub seconds: f64,
}

impl RankingEntry {
    /// Parse one `<name> <seconds>` line
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let seconds: f64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || !seconds.is_finite() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            seconds,
        })
    }
}

/// Ranking list, sorted ascending by time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse the text format. Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<RankingEntry> = text.lines().filter_map(RankingEntry::parse).collect();
        entries.sort_by(|a, b| a.seconds.total_cmp(&b.seconds));
        Self { entries }
    }

    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} {:.3}\n", e.name, e.seconds))
            .collect()
    }

    /// Insert a result, returning its rank (1-indexed).
    ///
    /// Ties keep the earlier result ahead.
    pub fn add(&mut self, name: &str, seconds: f64) -> usize {
        let entry = RankingEntry {
            name: sanitize_name(name),
            seconds,
        };
        let pos = self
            .entries
            .iter()
            .position(|e| seconds < e.seconds)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        pos + 1
    }

    /// Entries shown to the player
    pub fn top(&self) -> &[RankingEntry] {
        let n = self.entries.len().min(RANKING_DISPLAY);
        &self.entries[..n]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&RankingEntry> {
        self.entries.first()
    }

    /// Load the ranking file. A missing or unreadable file is an empty ranking.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let ranking = Self::parse(&text);
                log::info!("Loaded {} ranking entries", ranking.entries.len());
                ranking
            }
            Err(e) => {
                log::warn!("Could not read ranking {}: {}, starting fresh", path.display(), e);
                Self::new()
            }
        }
    }

    /// Rewrite the whole ranking file
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_text())?;
        log::info!("Saved {} ranking entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Load, insert and write back in one go
    pub fn record(path: impl AsRef<Path>, name: &str, seconds: f64) -> io::Result<(Self, usize)> {
        let path = path.as_ref();
        let mut ranking = Self::load(path);
        let rank = ranking.add(name, seconds);
        ranking.save(path)?;
        Ok((ranking, rank))
    }
}

/// Names are a single whitespace-free token in the file format
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if cleaned.is_empty() {
        ANONYMOUS.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_skips_malformed_lines() {
        let ranking = Ranking::parse("alice 12.5\nnot-a-line\nbob fast\n\ncarol 9.25\ndave 1 2\n");
        let names: Vec<_> = ranking.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["carol", "alice"]);
    }

    #[test]
    fn test_add_keeps_order() {
        let mut ranking = Ranking::new();
        assert_eq!(ranking.add("a", 30.0), 1);
        assert_eq!(ranking.add("b", 10.0), 1);
        assert_eq!(ranking.add("c", 20.0), 2);
        assert_eq!(ranking.add("d", 20.0), 3);
        let names: Vec<_> = ranking.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d", "a"]);
        assert_eq!(ranking.best().map(|e| e.seconds), Some(10.0));
    }

    #[test]
    fn test_top_truncates_but_storage_does_not() {
        let mut ranking = Ranking::new();
        for i in 0..8 {
            ranking.add("p", f64::from(i));
        }
        assert_eq!(ranking.top().len(), RANKING_DISPLAY);
        assert_eq!(ranking.entries.len(), 8);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Ada Lovelace"), "Ada_Lovelace");
        assert_eq!(sanitize_name("  "), ANONYMOUS);
        assert_eq!(sanitize_name("neo"), "neo");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ranking = Ranking::load(dir.path().join("ranking.txt"));
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_record_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.txt");

        let (_, rank) = Ranking::record(&path, "first", 42.0).unwrap();
        assert_eq!(rank, 1);
        let (ranking, rank) = Ranking::record(&path, "second", 21.5).unwrap();
        assert_eq!(rank, 1);
        assert_eq!(ranking.entries.len(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "second 21.500\nfirst 42.000\n");
        assert_eq!(Ranking::load(&path), ranking);
    }

    proptest! {
        #[test]
        fn prop_always_sorted(times in proptest::collection::vec(0.0f64..1000.0, 0..50)) {
            let mut ranking = Ranking::new();
            for t in &times {
                ranking.add("p", *t);
            }
            prop_assert_eq!(ranking.entries.len(), times.len());
            prop_assert!(ranking.entries.windows(2).all(|w| w[0].seconds <= w[1].seconds));
            prop_assert!(ranking.top().len() <= RANKING_DISPLAY);
        }
    }
}
