use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relm4::prelude::*;
use runaway::config;
use runaway::gui::app::AppModel;
use runaway::sys::runtime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "runaway", version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the one in the user config directory
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Seed for the random source, for reproducible runs
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Write the default config file (if missing), print its path, and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if args.write_config {
        config::write_default_config(&config_path)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path);
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("Using seed {}", seed);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(config_path.clone(), tx);

    // clap already consumed the command line
    let app = RelmApp::new("org.troia.runaway").with_args(Vec::new());

    app.run::<AppModel>((config, config_path, StdRng::seed_from_u64(seed), rx));
    Ok(())
}
