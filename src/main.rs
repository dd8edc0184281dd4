use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod manifest;
mod patch;
mod util;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Init(args) => workflow::run_init(&args),
        Command::Apply(args) => workflow::run_apply(&args),
        Command::Check(args) => workflow::run_check(&args),
        Command::Inspect(args) => workflow::run_inspect(&args),
    }
}
