use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use serde_json::Value;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use verdict::{
    find_complement_witness, find_inclusion_witness, find_intersection_witness, find_witness,
    Word, BOTTOM,
};

mod input;

/// Witness-producing decision procedures over finite automata with epsilon
/// transitions.
#[derive(Parser)]
#[command(name = "verdict")]
struct Cli {
    /// Log search progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Emptiness check: print a shortest accepted word, or ⊥.
    Empty(SingleArgs),
    /// Complement emptiness: print a shortest rejected word, or ⊥.
    Complement(SingleArgs),
    /// Intersection emptiness for a {"A1": …, "A2": …} pair.
    Intersect(PairArgs),
    /// Inclusion check L(A1) ⊆ L(A2) for a {"A1": …, "A2": …} pair;
    /// prints a word in L(A1) \ L(A2), or ⊥ if inclusion holds.
    Include(PairArgs),
}

#[derive(Args)]
struct SingleArgs {
    /// Read the automaton JSON from a file; otherwise read stdin.
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Run the built-in demo automaton instead of reading input.
    #[arg(long)]
    demo: bool,
}

#[derive(Args)]
struct PairArgs {
    /// Read the pair JSON from a file; otherwise read stdin.
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Run the built-in demo pair instead of reading input.
    #[arg(long)]
    demo: bool,
}

fn read_value(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => io::read_to_string(io::stdin()).context("reading stdin")?,
    };
    serde_json::from_str(&text).context("parsing JSON")
}

fn single_value(args: &SingleArgs) -> Result<Value> {
    if args.demo {
        Ok(input::demo_automaton())
    } else {
        read_value(args.file.as_deref())
    }
}

fn pair_value(args: &PairArgs) -> Result<Value> {
    if args.demo {
        Ok(input::demo_pair())
    } else {
        read_value(args.file.as_deref())
    }
}

fn render(witness: Option<Word>) -> String {
    match witness {
        None => BOTTOM.to_owned(),
        Some(word) => word.to_string(),
    }
}

fn run(command: Command) -> Result<String> {
    let witness = match command {
        Command::Empty(args) => {
            let a = input::automaton_from_value(&single_value(&args)?)?;
            find_witness(&a)
        }
        Command::Complement(args) => {
            let a = input::automaton_from_value(&single_value(&args)?)?;
            find_complement_witness(&a)
        }
        Command::Intersect(args) => {
            let (a1, a2) = input::pair_from_value(&pair_value(&args)?)?;
            find_intersection_witness(&a1, &a2)
        }
        Command::Include(args) => {
            let (a1, a2) = input::pair_from_value(&pair_value(&args)?)?;
            find_inclusion_witness(&a1, &a2)
        }
    };
    Ok(render(witness))
}

fn init_logger() -> Result<()> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("initializing logger")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        // Asking for logs and silently getting none would be worse than
        // the warning; a logging failure is not an input error though, so
        // it does not change the exit code.
        if let Err(err) = init_logger() {
            eprintln!("Warning: {:#}", err);
        }
    }

    match run(cli.command) {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Input error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
