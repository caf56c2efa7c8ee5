use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "blockvec-cmd")]
#[command(about = "Command-line utility for exercising block vectors")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a seven-element vector, take a view and pop the last element
    Demo,

    /// Print a view over a vector built from the given values
    Slice {
        /// Comma-separated list of integers
        #[arg(long)]
        values: String,

        /// First index of the view (may be larger than `end`)
        #[arg(long)]
        begin: usize,

        /// One past the last index of the view
        #[arg(long)]
        end: usize,
    },

    /// Apply sizing operations to a vector and display its layout
    Inspect {
        /// Comma-separated list of integers
        #[arg(long, default_value = "")]
        values: String,

        /// Growth quantum in elements
        #[arg(long)]
        block_size: Option<usize>,

        /// Fail instead of growing past the initial capacity
        #[arg(long)]
        fixed: bool,

        /// Resize the vector to this many elements
        #[arg(long)]
        resize: Option<usize>,

        /// Shrink the capacity to the smallest block multiple afterwards
        #[arg(long)]
        crop: bool,

        /// Increase verbosity (-v prints the elements, -vv the raw layout)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => commands::demo::run(),
        Commands::Slice { values, begin, end } => commands::slice::run(&values, begin, end),
        Commands::Inspect {
            values,
            block_size,
            fixed,
            resize,
            crop,
            verbose,
        } => commands::inspect::run(
            &values,
            commands::inspect::InspectOptions {
                block_size,
                fixed,
                resize,
                crop,
                verbose,
            },
        ),
    }
}
