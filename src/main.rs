use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

mod inspect;

#[derive(Parser)]
#[command(author, version, about = "PDF table of contents tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the outline of each PDF, one `title:page` line per entry
    Show {
        /// Input paths (directories or PDF files)
        #[arg(required = true)]
        input_paths: Vec<PathBuf>,
    },

    /// Print the number of outline entries and pages of each PDF
    Count {
        /// Input paths (directories or PDF files)
        #[arg(required = true)]
        input_paths: Vec<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Show { input_paths } => inspect::show(&input_paths),
        Commands::Count { input_paths } => inspect::count(&input_paths),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
