use anyhow::Result;
use clap::{Parser, Subcommand};

mod minesweeper;
mod pong;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal front end for the arcade games", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play minesweeper line by line
    Minesweeper(minesweeper::MinesweeperArgs),
    /// Watch an autopilot play pong against the computer
    Pong(pong::PongArgs),
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    // also forwards `log` records from the game cores
    tracing_subscriber::fmt()
        .with_max_level(verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    match args.command {
        Command::Minesweeper(cmd) => minesweeper::run(&cmd, seed),
        Command::Pong(cmd) => pong::run(&cmd, seed),
    }
}
