//! Receipt expense tracker - main entry point.

use anyhow::Result;

fn main() -> Result<()> {
    // Logging
    tracing_subscriber::fmt::init();

    // API keys and credential paths come from the environment (.env in dev)
    dotenvy::dotenv().ok();

    // Launch the GUI application
    expense_tracker::gui::run()
}
