//! pdfchunks - Turn a document into page-anchored records
//!
//! A command line tool that partitions a document with a layout engine and
//! prints the aggregated text, image, and table records as JSON.

use chunkwise_core::api::{ProcessOptions, process_document};
use chunkwise_core::engine::{
    ChunkingStrategy, CommandEngine, JsonEngine, LayoutEngine, PartitionParams, Strategy,
};
use chunkwise_core::error::{ChunkError, Result};
use chunkwise_core::record::Record;
use clap::{ArgAction, Parser, ValueEnum};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exit status for missing required inputs.
const EXIT_MISSING_INPUT: i32 = 2;
/// Exit status for every other failure.
const EXIT_FAILURE: i32 = 1;

/// Where partitioned elements come from.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum EngineKind {
    /// The input file is element JSON produced earlier by the layout engine
    #[default]
    Json,
    /// Pipe the input file through an external partitioner program
    Command,
}

/// Extraction strategy requested from the layout engine.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StrategyArg {
    #[default]
    HiRes,
    Fast,
    OcrOnly,
    Auto,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::HiRes => Strategy::HiRes,
            StrategyArg::Fast => Strategy::Fast,
            StrategyArg::OcrOnly => Strategy::OcrOnly,
            StrategyArg::Auto => Strategy::Auto,
        }
    }
}

/// Chunking strategy requested from the layout engine.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ChunkingArg {
    #[default]
    ByTitle,
    Basic,
}

impl From<ChunkingArg> for ChunkingStrategy {
    fn from(value: ChunkingArg) -> Self {
        match value {
            ChunkingArg::ByTitle => ChunkingStrategy::ByTitle,
            ChunkingArg::Basic => ChunkingStrategy::Basic,
        }
    }
}

/// Partition a document and print its aggregated records as JSON.
#[derive(Parser, Debug)]
#[command(name = "pdfchunks")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input document, or "-" for stdin
    file: Option<PathBuf>,

    /// Identifier prefixed onto every record id
    #[arg(short = 'r', long = "resource-id")]
    resource_id: Option<String>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Engine options ===
    /// How the input is partitioned
    #[arg(short = 'e', long, value_enum, default_value = "json")]
    engine: EngineKind,

    /// Partitioner program for --engine command
    #[arg(long)]
    partitioner: Option<PathBuf>,

    /// Extra argument passed to the partitioner (repeatable)
    #[arg(long = "partitioner-arg", allow_hyphen_values = true)]
    partitioner_args: Vec<String>,

    /// Extraction strategy
    #[arg(long, value_enum, default_value = "hi-res")]
    strategy: StrategyArg,

    /// Chunking strategy
    #[arg(long = "chunking-strategy", value_enum, default_value = "by-title")]
    chunking_strategy: ChunkingArg,

    /// Maximum characters per chunk
    #[arg(long = "max-characters", default_value = "1000")]
    max_characters: usize,

    /// Do not ask the engine to infer table structure
    #[arg(long = "no-infer-tables", action = ArgAction::SetTrue)]
    no_infer_tables: bool,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the JSON output
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Build the log filter. `RUST_LOG` wins; otherwise `--debug` picks the level.
fn log_filter(debug: bool) -> EnvFilter {
    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

fn init_logging(debug: bool) -> std::result::Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(debug))
        .try_init()
        .map_err(|e| e as Box<dyn Error>)
}

/// Build partition parameters from command line arguments.
fn build_params(args: &Args) -> PartitionParams {
    PartitionParams {
        infer_table_structure: !args.no_infer_tables,
        strategy: args.strategy.into(),
        chunking_strategy: args.chunking_strategy.into(),
        max_characters: args.max_characters,
        ..PartitionParams::default()
    }
}

fn build_engine(args: &Args) -> Result<Box<dyn LayoutEngine>> {
    match args.engine {
        EngineKind::Json => Ok(Box::new(JsonEngine::new())),
        EngineKind::Command => {
            let program = args
                .partitioner
                .as_ref()
                .ok_or(ChunkError::MissingInput("partitioner"))?;
            Ok(Box::new(
                CommandEngine::new(program).args(&args.partitioner_args),
            ))
        }
    }
}

/// Read the whole input into memory so stdin and files are handled alike.
fn open_input(path: Option<&PathBuf>) -> Result<Option<Cursor<Vec<u8>>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let mut bytes = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().lock().read_to_end(&mut bytes)?;
    } else {
        File::open(path)?.read_to_end(&mut bytes)?;
    }
    Ok(Some(Cursor::new(bytes)))
}

fn write_records<W: Write>(writer: &mut W, records: &[Record], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, records)?;
    } else {
        serde_json::to_writer(&mut *writer, records)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reject absent required parameters before touching the engine or the input.
fn check_required(args: &Args) -> Result<()> {
    match args.resource_id.as_deref() {
        Some(id) if !id.is_empty() => {}
        _ => return Err(ChunkError::MissingInput("resource_id")),
    }
    if args.file.is_none() {
        return Err(ChunkError::MissingInput("file"));
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    check_required(args)?;
    let engine = build_engine(args)?;
    let input = open_input(args.file.as_ref())?;
    let options = ProcessOptions {
        params: build_params(args),
        ..ProcessOptions::default()
    };

    let records = process_document(
        engine.as_ref(),
        args.resource_id.as_deref(),
        input,
        Some(options),
    )?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        Box::new(BufWriter::new(File::create(&args.outfile)?))
    };
    write_records(&mut output, &records, args.pretty)
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.debug)?;

    if let Err(e) = run(&args) {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        let code = if e.is_missing_input() {
            EXIT_MISSING_INPUT
        } else {
            EXIT_FAILURE
        };
        std::process::exit(code);
    }

    Ok(())
}
