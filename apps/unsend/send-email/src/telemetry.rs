//! Error reporting and log output for the binary.

use tracing::debug;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Install color-eyre, showing file:line and hiding environment noise.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Whether `APP_ENV` selects production output
pub fn is_production() -> bool {
    std::env::var("APP_ENV")
        .map(|env| env.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

/// Initialize tracing with span capture for errors.
///
/// - **Production** (`APP_ENV=production`): JSON lines, `error` and above by default
/// - **Development** (default): pretty output, `info` and above by default
///
/// `RUST_LOG` overrides the default filter in both modes.
pub fn init_tracing(production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if production {
            EnvFilter::new("error")
        } else {
            EnvFilter::new("info,email_unsend=debug")
        }
    });

    let result = if production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    if result.is_err() {
        debug!("Tracing already initialized, skipping re-initialization");
    }
}
