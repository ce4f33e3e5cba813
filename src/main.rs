// Entrypoint: set up logging and run the interactive flow once.
// Failures are reported on the console; only terminal I/O errors
// propagate out of `main`.

use caption_disk::ui;
use tracing_subscriber::EnvFilter;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    ui::run()
}
