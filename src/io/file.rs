use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::BoardFileError;
use crate::model::Board;

/// `board.json` under the platform data directory.
pub fn default_board_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "TimeblockBoard")
        .map(|dirs| dirs.data_dir().join("board.json"))
        .unwrap_or_else(|| PathBuf::from("board.json"))
}

/// Save a board snapshot to a JSON file.
pub fn save_board(board: &Board, path: &Path) -> Result<(), BoardFileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(board)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), blocks = board.blocks.len(), "board saved");
    Ok(())
}

/// Load a board snapshot from a JSON file.
pub fn load_board(path: &Path) -> Result<Board, BoardFileError> {
    let json = std::fs::read_to_string(path)?;
    let board: Board = serde_json::from_str(&json)?;
    info!(path = %path.display(), blocks = board.blocks.len(), "board loaded");
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateInterval, Feature, Resource, Task, TimeInterval};
    use chrono::NaiveDate;
    use egui::Color32;
    use tempfile::tempdir;

    #[test]
    fn test_board_survives_save_and_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("board.json");

        let mut board = Board::new("Team");
        let alice = Resource::new("Alice", Color32::from_rgb(66, 133, 244));
        let alice_id = alice.id;
        board.resources.push(alice);
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let block_id = board.create_block(
            alice_id,
            day,
            TimeInterval::parse("10:00", "11:30").unwrap(),
            None,
            "Code review",
        );
        let feature = Feature::new("Checkout", Color32::from_rgb(52, 168, 83));
        board.tasks.push(Task::new(
            feature.id,
            "Payment API",
            DateInterval::new(day, day + chrono::Duration::days(3)).unwrap(),
        ));
        board.features.push(feature);

        save_board(&board, &path).expect("save");
        let loaded = load_board(&path).expect("load");

        assert_eq!(loaded.name, "Team");
        assert_eq!(loaded.resources[0].color, Color32::from_rgb(66, 133, 244));
        assert_eq!(
            loaded.block(block_id).unwrap().interval,
            TimeInterval::parse("10:00", "11:30").unwrap()
        );
        assert_eq!(loaded.tasks[0].dates.span_days(), 3);
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        std::fs::write(
            &path,
            r#"{"name":"x","resources":[],"items":[],"features":[],"tasks":[],
                "created":"2025-06-02T00:00:00Z","modified":"2025-06-02T00:00:00Z",
                "blocks":[{"id":"00000000-0000-0000-0000-000000000001",
                           "resource_id":"00000000-0000-0000-0000-000000000002",
                           "item_id":"00000000-0000-0000-0000-000000000003",
                           "day":"2025-06-02",
                           "interval":{"start":"11:00","end":"10:00"}}]}"#,
        )
        .unwrap();
        assert!(matches!(load_board(&path), Err(BoardFileError::Json(_))));
        assert!(matches!(
            load_board(&dir.path().join("missing.json")),
            Err(BoardFileError::Io(_))
        ));
    }
}
