//! Command-line interface definitions for portfwd.
//!
//! Uses clap's derive API for type-safe argument parsing.

use clap::Parser;

/// Local port forwarder.
///
/// Listens on one endpoint and relays every inbound connection to a fixed
/// target endpoint. Endpoints are written as `[scheme://]address`, where the
/// scheme is one of `tcp`, `tcp4`, `tcp6` or `unix` and defaults to `tcp`.
/// A bare `:PORT` means `tcp://localhost:PORT`.
#[derive(Parser, Debug)]
#[command(name = "portfwd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Endpoint to listen on (e.g. `:8080`, `unix:///tmp/in.sock`).
    #[arg(long = "listen", value_name = "ADDR", default_value = "")]
    pub listen: String,

    /// Endpoint to forward connections to (e.g. `tcp://10.0.0.5:80`).
    #[arg(long = "target", value_name = "ADDR", default_value = "")]
    pub target: String,

    /// Increase log verbosity.
    ///
    /// Can be specified multiple times:
    /// -v    = debug level
    /// -vv   = trace level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_basic() {
        let cli = Cli::parse_from([
            "portfwd",
            "--listen",
            ":8080",
            "--target",
            "unix:///run/app.sock",
        ]);
        assert_eq!(cli.listen, ":8080");
        assert_eq!(cli.target, "unix:///run/app.sock");
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_missing_values_default_to_empty() {
        let cli = Cli::parse_from(["portfwd"]);
        assert!(cli.listen.is_empty());
        assert!(cli.target.is_empty());
    }

    #[test]
    fn test_cli_verbosity() {
        let cli = Cli::parse_from(["portfwd", "-vv", "--listen=:1", "--target=:2"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.listen, ":1");
        assert_eq!(cli.target, ":2");
    }

    #[test]
    fn test_cli_rejects_positional() {
        assert!(Cli::try_parse_from(["portfwd", "extra"]).is_err());
    }
}
