use clap::Parser;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "tabiya",
    version,
    about = "Fetch your played chess games and mine your opening repertoire"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into an exit code.
///
/// Exit codes:
///   0 — success
///   1 — general/unknown error
///   2 — invalid arguments or configuration
///   3 — fetch failure (user not found, network, bad response)
///   4 — persistence failure (file I/O, codec)
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}").to_lowercase();

    if msg.contains("invalid date")
        || msg.contains("expected depth")
        || msg.contains("config")
    {
        2
    } else if msg.contains("user not found")
        || msg.contains("network error")
        || msg.contains("request failed")
        || msg.contains("fetching failed")
    {
        3
    } else if msg.contains("cannot write graph")
        || msg.contains("cannot load graph")
        || msg.contains("io error")
        || msg.contains("codec error")
    {
        4
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(commands::run(cli.command)) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_invalid_date() {
        let err = anyhow::anyhow!("invalid date \"2021-13-45\"");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_invalid_depth() {
        let err = anyhow::anyhow!("expected depth > 1, got 1");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_bad_config() {
        let err = anyhow::anyhow!("config file not found: /nope.toml");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_user_not_found() {
        let err = anyhow::anyhow!("fetching failed: user not found: ghost");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_network() {
        let err = anyhow::anyhow!("1 month(s) failed to fetch: 2021.05: network error: reset");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_persistence() {
        let err = anyhow::anyhow!("cannot load graph from /tmp/missing.bin: IO error");
        assert_eq!(classify_exit_code(&err), 4);
    }

    #[test]
    fn exit_code_general() {
        let err = anyhow::anyhow!("something unexpected happened");
        assert_eq!(classify_exit_code(&err), 1);
    }
}
