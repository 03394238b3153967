use tracing::Level;

pub fn init_logging() {
    init_logging_with_level(Level::INFO);
}

/// Installs the fmt subscriber; a second call is a no-op.
pub fn init_logging_with_level(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
