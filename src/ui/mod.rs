pub mod dialogs;
pub mod gantt_chart;
pub mod schedule_grid;
pub mod theme;
pub mod toolbar;
