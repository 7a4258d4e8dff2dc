// Entry point for the treasure hunt aid
// Starts logging, loads configuration and language, then runs the terminal UI

use std::error::Error;
use tracing::info;

// Module declarations
mod tha_board;  // Board model: planting, reveals, group ids
mod tha_color;  // Tile palette and terminal color matching
mod tha_config; // Persisted configuration
mod tha_hint;   // Group labels and probability hints
mod tha_lang;   // English and German strings
mod tha_layout; // Tile geometry and hit testing
mod tha_log;    // File logging
mod tha_ui;     // Terminal UI rendering and event handling

use tha_config::load_or_create_config;
use tha_lang::Lang;
use tha_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Logging goes to a file; a missing data directory just leaves it off
    let log_path = tha_log::init();

    let (mut cfg, source) = load_or_create_config();
    info!(
        log = ?log_path,
        width = cfg.width,
        height = cfg.height,
        treasures = cfg.treasures,
        ?source,
        "starting"
    );

    let mut lang = Lang::new(&cfg.language);

    run_ui(&mut cfg, source, &mut lang)
}
