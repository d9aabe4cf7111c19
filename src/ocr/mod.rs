//! Text recognition via the Google Cloud Vision API.

mod auth;
mod client;

pub use client::VisionClient;
