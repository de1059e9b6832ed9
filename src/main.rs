//! Binary entry point.
//!
//! Responsibility:
//! - Start the tokio runtime and call `app::run()` (no logic here).

use anyhow::Result;

mod api;
mod app;
mod config;
mod error;
mod middleware;
mod services;
mod state;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
