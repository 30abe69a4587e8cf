//! Diagnostics on stderr through `tracing-subscriber`.

use crossterm::tty::IsTty;
use tracing_subscriber::EnvFilter;

/// Filter for the -v / -q flags: default info, -v debug, -vv trace, -q warnings only.
/// Only the platelunch crates are shown.
pub fn filter_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "platelunch=warn";
    }
    match verbose {
        0 => "platelunch=info",
        1 => "platelunch=debug",
        _ => "platelunch=trace",
    }
}

/// Install the stderr subscriber. `PLATELUNCH_LOG` overrides the flags.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env("PLATELUNCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, quiet)));

    let stderr = std::io::stderr();
    let ansi = stderr.is_tty();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(ansi)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_filters() {
        assert_eq!(filter_directive(0, false), "platelunch=info");
        assert_eq!(filter_directive(1, false), "platelunch=debug");
        assert_eq!(filter_directive(3, false), "platelunch=trace");
        assert_eq!(filter_directive(2, true), "platelunch=warn");
    }

    #[test]
    fn directives_parse() {
        for (verbose, quiet) in [(0, false), (1, false), (2, false), (0, true)] {
            assert!(EnvFilter::try_new(filter_directive(verbose, quiet)).is_ok());
        }
    }
}
