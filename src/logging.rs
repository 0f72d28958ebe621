//! Tracing setup for the CLI. Everything goes to stderr so `print` output on
//! stdout stays clean.
//!
//! `ENUMGEN_LOG` (or `RUST_LOG`) takes `RUST_LOG` syntax, e.g.
//! `ENUMGEN_LOG=enumgen::sink=debug`. Without either, `-v` raises the default
//! level from `warn` to `info` (`-v`) or `debug` (`-vv` and up).
use tracing_subscriber::EnvFilter;

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    if let Ok(val) = std::env::var("ENUMGEN_LOG") {
        return EnvFilter::builder().parse_lossy(val);
    }
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(default_level(verbosity))
}

pub fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(7), "debug");
    }
}
