use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;

/// Compact log lines on stderr so stdout keeps only the report.
pub fn init_logging(verbose: bool) -> Result<(), SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
