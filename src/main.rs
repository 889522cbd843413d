use color_eyre::Result;

use mirage::cli::{parse_args, run_cli_command, version_line, CliCommand, USAGE};
use mirage::{logging, ClientConfig, MirageApp};

fn main() -> Result<()> {
    // Handle flags that need no runtime before any initialization
    let command = parse_args(std::env::args());
    match &command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    color_eyre::install()?;
    logging::init();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(command))
}

async fn run(command: CliCommand) -> Result<()> {
    let config = ClientConfig::from_env();
    let app = MirageApp::new(config)?;

    if let Err(e) = app.start().await {
        tracing::warn!("Could not restore previous session: {}", e);
    }

    run_cli_command(&app, command).await
}
