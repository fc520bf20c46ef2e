mod error;
mod parser;
mod processor;
mod serialiser;
mod tracklist;

use crate::processor::{ProcessOpts, Summary};

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, LevelFilter};

fn main() {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(if cli.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(summary) => info!(
            "Operation successfully finished! {} lines read, {} sectors, {} songs written, {} lines skipped.",
            summary.lines, summary.sectors, summary.songs, summary.skipped
        ),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Rewrite tracklist song times relative to the start of each sector")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The tracklist to read from. Use '-' to read from standard input.",
        default_value = "tracklist.txt"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. It is truncated if it exists. Use '-' to write to standard output.",
        default_value = "tracklist_separated.txt"
    )]
    output: String,
    #[arg(
        long,
        value_name = "BYTES",
        help = "Longer lines are split and each piece is handled as a line of its own.",
        default_value_t = processor::DEFAULT_MAX_LINE_LEN as u64,
        value_parser = clap::value_parser!(u64).range(16..)
    )]
    max_line_length: u64,
    #[arg(short, long, help = "Only report problems, not the final summary.")]
    quiet: bool,
}

fn run(cli: &Cli) -> Result<Summary> {
    let input: Box<dyn BufRead> = if cli.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&cli.input)
            .context(format!("Cannot open input file: '{}'", cli.input))?;
        Box::new(BufReader::new(file))
    };

    let output: Box<dyn Write> = if cli.output == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        let file = File::create(&cli.output)
            .context(format!("Cannot open output file: '{}'", cli.output))?;
        Box::new(BufWriter::new(file))
    };

    let opts = ProcessOpts {
        max_line_len: cli.max_line_length as usize,
    };
    processor::process(input, output, &opts)
        .context(format!("Failed to rewrite tracklist: '{}'", cli.input))
}
