//! Tracing setup. `ART_BOOK_LOG` overrides the configured level,
//! e.g. `ART_BOOK_LOG=art_book=debug`.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "ART_BOOK_LOG";

/// Install the global subscriber. Returns false if one was already set.
pub fn init(default_level: &str) -> bool {
    let default_directive = default_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(default_directive.into())
                .with_env_var(LOG_ENV_VAR)
                .from_env_lossy(),
        )
        .try_init()
        .is_ok()
}
