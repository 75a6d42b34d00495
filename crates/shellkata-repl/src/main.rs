//! shellkata entry point.
//!
//! Launch the trainer, optionally on a given lesson:
//! ```bash
//! cargo run -p shellkata-repl -- 02_files
//! ```

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the terminal transcript
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    shellkata_repl::run()
}
