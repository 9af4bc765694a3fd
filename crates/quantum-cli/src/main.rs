//! Quantum CLI - command-line interface to the Quantum networking API

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quantum_cli::output::OutputFormat;
use quantum_cli::Cli;

/// `quantum` prefixes the targets of all three crates.
const VERBOSE_FILTER: &str = "quantum=debug";

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = OutputFormat::from_json_flag(cli.json);
    let client = cli.connection.build_client()?;
    let output = match cli.command.run(&client).await {
        Ok(output) => output,
        Err(err) => {
            if let Some(api_err) = err.downcast_ref::<quantum_core::Error>() {
                if api_err.should_log() {
                    tracing::error!(code = api_err.error_code(), "{api_err}");
                }
            }
            return Err(err);
        }
    };
    output.print(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn verbose_filter_is_a_single_debug_directive() {
        let filter = EnvFilter::try_new(VERBOSE_FILTER).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
