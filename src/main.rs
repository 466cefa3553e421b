//! TechDocs action - generate Backstage TechDocs and publish them to cloud storage.

mod action;
mod catalog;
mod cli;
mod config;
mod logger;
mod pipeline;
mod techdocs;
mod utils;

use clap::Parser;
use cli::Cli;
use config::ActionConfig;
use logger::{Annotation, annotate};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match ActionConfig::load(&cli).and_then(|config| action::run(&config)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{err:#}");
            annotate(Annotation::Error, &format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
