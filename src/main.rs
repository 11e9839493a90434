#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

mod app;
mod ui;

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn,timeblock_board=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
    if let Err(e) = init_result {
        eprintln!("tracing already initialised: {e}");
    }
}

fn main() -> eframe::Result<()> {
    init_tracing();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Timeblock Board"),
        ..Default::default()
    };

    eframe::run_native(
        "Timeblock Board",
        options,
        Box::new(|cc| Ok(Box::new(app::SchedulerApp::new(cc)?))),
    )
}
