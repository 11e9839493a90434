use chrono::NaiveDate;
use egui::Color32;
use tempfile::tempdir;

use timeblock_board::config::SchedulerSettings;
use timeblock_board::engine::collab::BlockCommitter;
use timeblock_board::engine::CollisionPolicy;
use timeblock_board::io::{load_board, save_board};
use timeblock_board::model::{Board, Resource, TimeInterval};

#[test]
fn test_committed_move_survives_reload() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("board.json");
    let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

    let mut board = Board::new("Team");
    let alice = Resource::new("Alice", Color32::LIGHT_BLUE);
    let person = alice.id;
    board.resources.push(alice);
    let id = board.create_block(person, day, TimeInterval::parse("10:00", "11:00").unwrap(), None, "Sync");
    assert!(board
        .commit_block(id, "14:00".parse().unwrap(), "15:30".parse().unwrap())
        .is_ok());
    save_board(&board, &path).unwrap();

    let loaded = load_board(&path).unwrap();
    let block = loaded.block(id).unwrap();
    assert_eq!(block.interval.to_string(), "14:00–15:30");
    assert_eq!(block.day, day);
    assert_eq!(loaded.item(block.item_id).unwrap().title, "Sync");
    assert_eq!(loaded.resources[0].color, Color32::LIGHT_BLUE);
}

#[test]
fn test_settings_drive_the_grid() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");

    let settings = SchedulerSettings {
        grid_start: "08:00".into(),
        grid_end: "20:00".into(),
        slot_minutes: 15,
        collision_policy: CollisionPolicy::Uniform,
        ..Default::default()
    };
    settings.save(&path).unwrap();

    let loaded = SchedulerSettings::load_or_default(&path);
    assert_eq!(loaded, settings);
    let grid = loaded.slot_grid().unwrap();
    assert_eq!(grid.slot_count(), 48);
    assert_eq!(grid.slot_span(0, 3).unwrap().to_string(), "08:00–09:00");
    assert!(loaded.block_timing().policy.checks_resize());
}

#[test]
fn test_broken_settings_fall_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "grid_start": "9am" }"#).unwrap();

    assert!(SchedulerSettings::load(&path).is_err());
    assert_eq!(SchedulerSettings::load_or_default(&path), SchedulerSettings::default());
}
