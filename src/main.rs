// cwalk: tree-walking interpreter for a small subset of C

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cwalk::interpreter::config::InterpreterConfig;
use cwalk::interpreter::constants::{DEFAULT_ENTRY_POINT, DEFAULT_HEAP_LIMIT, DEFAULT_MAX_CALL_DEPTH};

#[derive(Parser, Debug)]
#[command(name = "cwalk", version, about = "Run a small subset of C by walking its syntax tree")]
struct Cli {
    /// C source file to run
    #[arg(required_unless_present = "eval", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run this source text instead of a file
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    /// Read GET input from this file instead of stdin
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Function to start execution in
    #[arg(long, default_value = DEFAULT_ENTRY_POINT)]
    entry: String,

    /// Maximum number of nested function calls
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Maximum bytes held by heap blocks and arrays
    #[arg(long, default_value_t = DEFAULT_HEAP_LIMIT)]
    heap_limit: usize,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}]: {}", err.kind(), err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // RUST_LOG controls the level; default to WARN so program output stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn run(cli: Cli) -> Result<(), cwalk::Error> {
    let source = match cli.eval {
        Some(code) => code,
        None => fs::read_to_string(cli.file.unwrap_or_default())?,
    };

    let input: Box<dyn BufRead> = match cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let output = io::BufWriter::new(io::stdout().lock());

    let config = InterpreterConfig::new()
        .with_entry_point(cli.entry)
        .with_max_call_depth(cli.max_call_depth)
        .with_heap_limit(cli.heap_limit);

    cwalk::run_source(&source, input, output, config)?;
    Ok(())
}
