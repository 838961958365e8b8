use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Persisted list of final scores, kept sorted from best to worst.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ScoreBoard {
    scores: Vec<u32>,
}

impl ScoreBoard {
    /// Reads the score file, treating a missing file as an empty board.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read score file {}", path.display()))
            }
        };

        let mut board: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid score file {}", path.display()))?;
        board.sort();
        Ok(board)
    }

    /// Writes the board as `{"scores": [...]}`.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to encode scores")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write score file {}", path.display()))
    }

    pub(crate) fn record(&mut self, score: u32) {
        self.scores.push(score);
        self.sort();
    }

    /// Scores from best to worst.
    pub(crate) fn scores(&self) -> &[u32] {
        &self.scores
    }

    fn sort(&mut self) {
        self.scores.sort_unstable_by(|left, right| right.cmp(left));
    }
}

/// Appends `score` to the board stored at `path` and returns the updated board.
pub(crate) fn append(path: &Path, score: u32) -> Result<ScoreBoard> {
    let mut board = ScoreBoard::load(path)?;
    board.record(score);
    board.save(path)?;
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_empty_board() {
        let dir = tempfile::tempdir().expect("temp dir");
        let board = ScoreBoard::load(&dir.path().join("scores.json")).expect("load");

        assert!(board.scores().is_empty());
    }

    #[test]
    fn appended_scores_reload_in_descending_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scores.json");

        for score in [120, 480, 0, 300, 480] {
            let _ = append(&path, score).expect("append");
        }

        let reloaded = ScoreBoard::load(&path).expect("reload");
        assert_eq!(reloaded.scores(), &[480, 480, 300, 120, 0]);
    }

    #[test]
    fn hand_edited_files_are_sorted_on_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scores.json");
        fs::write(&path, r#"{"scores": [5, 50, 15]}"#).expect("write");

        let board = ScoreBoard::load(&path).expect("load");
        assert_eq!(board.scores(), &[50, 15, 5]);
    }

    #[test]
    fn saved_file_uses_the_scores_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scores.json");
        let _ = append(&path, 75).expect("append");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(value["scores"], serde_json::json!([75]));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").expect("write");

        let error = ScoreBoard::load(&path).expect_err("corrupt file fails");
        assert!(error.to_string().contains("invalid score file"));
    }
}
