//! Subscriber setup for the binary. Library crates only emit events.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr. `-v` flags take precedence over `RUST_LOG`.
pub fn init(verbose: u8) {
    let filter = if verbose > 0 {
        EnvFilter::new(level_for(verbose))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(0)))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(0, "error")]
    #[case::info(1, "info")]
    #[case::debug(2, "debug")]
    #[case::saturates(9, "trace")]
    fn test_level_for(#[case] verbose: u8, #[case] expected: &str) {
        assert_eq!(level_for(verbose), expected);
    }
}
