mod analytics;
mod catalog;
mod cli;
mod error;
mod export;
mod fmt;
mod models;
mod parser;
mod report;
mod settings;
mod validator;

use clap::Parser;

use cli::{Cli, Commands, InputArgs};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let settings = settings::load_settings(cli.config.as_deref());

    let command = cli.command.unwrap_or(Commands::Run {
        input: InputArgs::default(),
        offline: false,
    });

    let result = match command {
        Commands::Run { input, offline } => cli::run::run(&settings, &input, offline),
        Commands::Validate { input } => cli::validate::run(&settings, &input),
        Commands::Analyze {
            input,
            top,
            threshold,
        } => cli::analyze::run(&settings, &input, top, threshold),
        Commands::Enrich {
            input,
            output,
            offline,
        } => cli::enrich::run(&settings, &input, output, offline),
        Commands::Init { force } => cli::init::run(cli.config, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
