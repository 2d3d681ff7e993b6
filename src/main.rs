mod cli;
mod commands;
mod config;
mod engine;
mod paths;
mod progress;
mod resource;
mod schema;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;

use crate::resource::ReconcileError;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub url: Option<String>,
    pub token: Option<String>,
    pub file: String,
    pub state: Option<String>,
}

impl Context {
    /// Groups file path with `~` and variables expanded
    pub fn groups_path(&self) -> PathBuf {
        paths::expand(&self.file)
    }

    pub fn state_path(&self) -> Result<PathBuf> {
        paths::state_file(self.state.as_deref())
    }
}

fn main() {
    if let Err(err) = run() {
        ui::error(&format!("{err:#}"));
        if let Some(advice) = advice_for(&err) {
            ui::dim(advice);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        url: cli.url,
        token: cli.token,
        file: cli.file,
        state: cli.state,
    };

    match cli.command {
        Command::Plan(args) => commands::plan::run(&ctx, args.target.as_deref()),
        Command::Apply(args) => commands::apply::run(&ctx, &args),
        Command::Refresh => commands::refresh::run(&ctx),
        Command::Import {
            address,
            identifier,
        } => commands::import::run(&ctx, &address, &identifier),
        Command::Destroy(args) => commands::destroy::run(&ctx, args.target.as_deref(), args.yes),
        Command::State(cmd) => commands::state::run(&ctx, cmd),
        Command::Validate => commands::validate::run(&ctx),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "groupctl", &mut io::stdout());
            Ok(())
        }
    }
}

/// Advice for the first failure in the chain that has some
fn advice_for(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ReconcileError>() {
            e.advice()
        } else {
            cause
                .downcast_ref::<groupkit::Error>()
                .map(|e| e.category().advice())
        }
    })
}
