mod accounts;
mod cli;
mod derive;
mod error;
mod extract;
mod fetch;
mod merger;
mod models;
mod request;
mod settings;
mod writer;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "msar=debug" } else { "msar=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init {
            output_dir,
            accounts_file,
            extracts_dir,
        } => cli::init::run(output_dir, accounts_file, extracts_dir),
        Commands::Accounts { accounts_file } => cli::accounts::list(accounts_file),
        Commands::Run(args) => cli::run::run(args),
        Commands::Clean {
            file,
            mac,
            drop_columns,
            output,
            remove_raw,
        } => cli::clean::run(&file, mac, drop_columns, output, remove_raw),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
