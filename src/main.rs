mod cli;
mod client;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod pagination;
mod responses;
mod types;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Commands};
use client::GithubClient;
use config::Config;
use error::Result;
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init_logging(cli.verbose);
    output::set_format(cli.output_format());

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "gh-team", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        Commands::Team(args) => {
            let config = Config::load()?;
            let client = GithubClient::new(config.token()?, config.base_url(), config.graphql_url())?;
            commands::team::show(&client, &config, args).await?;
        }
    }

    Ok(())
}
