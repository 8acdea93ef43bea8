use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line, for container log collectors.
    Json,
}

fn env_filter(verbose: bool, default_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if verbose {
            "tarucca_processor=debug,info".to_string()
        } else {
            format!("tarucca_processor={}", default_level.unwrap_or("info"))
        };
        EnvFilter::new(directive)
    })
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `verbose`
/// and `default_level`. Calling it twice leaves the first subscriber in place.
pub fn init_logger(verbose: bool, format: LogFormat, default_level: Option<&str>) {
    let filter = env_filter(verbose, default_level);

    let result = match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialised: {}", e);
    }
}
