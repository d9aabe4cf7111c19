//! GUI shell for the expense tracker.

mod app;
mod theme;

pub use app::run;
