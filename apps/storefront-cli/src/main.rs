//! # Storefront CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging to stderr)
//! 3. Load configuration (file, environment, flags)
//! 4. Build the store orchestrator and mount (rehydrate) the stores
//! 5. Run the command, print its JSON response to stdout

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    storefront_cli::run().await
}
