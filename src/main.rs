//
//  gitlab-client
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitlab_client::cli::{Cli, Commands};
use gitlab_client::exit_codes;
use gitlab_client::output::OutputWriter;

fn main() {
    init_logging();

    let cli = Cli::parse();
    let output: OutputWriter = cli.global.output();

    match run(cli) {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            output.write_error(&format!("{e:#}"));
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

/// Initialize logging from `GLC_DEBUG` (default: warnings only)
fn init_logging() {
    let filter = EnvFilter::try_from_env("GLC_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Mr(cmd) => cmd.run(&cli.global),
        Commands::Snippet(cmd) => cmd.run(&cli.global),
        Commands::Version => {
            println!("{} version {}", gitlab_client::APP_NAME, gitlab_client::VERSION);
            Ok(())
        }
    }
}
