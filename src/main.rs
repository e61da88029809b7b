mod app;
mod cli;
mod cut;
mod ffmpeg;
mod filter;
mod probe;
mod profile;
mod time;
mod timeframe;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let default_level = if args.debug { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    app::run(args)
}
