//! json2type: Infer Python typing definitions from newline-delimited JSON
//!
//! Every line is decoded as one JSON record; the types of all records are
//! unified and printed as a Python module of `TypedDict` declarations.
//!
//! Usage:
//!   # Read from file, output to stdout
//!   json2type events.jsonl
//!
//!   # Read from stdin, write the module to a file
//!   cat events.jsonl | json2type --output events_types.py
//!
//!   # Dump the inferred type model as JSON instead of Python
//!   json2type --emit model events.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use json2type::{infer_from_reader, render_module, InferConfig, JsonBackend, RenderConfig};
use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json2type")]
#[command(about = "Infer Python typing definitions from JSON lines", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Write the result to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// What to emit
    #[arg(long, value_enum, default_value_t = Emit::Python)]
    emit: Emit,

    /// Strings with fewer distinct values than this become t.Literal (default: 10)
    #[arg(long)]
    enum_threshold: Option<usize>,

    /// Name of the top-level type alias (default: RootType)
    #[arg(long)]
    root_name: Option<String>,

    /// Decode lines with simd-json
    #[arg(long)]
    simd: bool,

    /// Keep every distinct string value instead of stopping at the threshold
    #[arg(long)]
    unbounded: bool,

    /// Don't print the progress line
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
    /// Python typing module
    Python,
    /// The inferred type model as JSON
    Model,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    // Build config
    let mut render_config = RenderConfig::default();
    if let Some(threshold) = args.enum_threshold {
        render_config.enum_threshold = threshold;
    }
    if let Some(name) = args.root_name {
        render_config.root_name = name;
    }

    let infer_config = if args.unbounded {
        InferConfig::default()
    } else {
        InferConfig::bounded_by(&render_config)
    };
    let backend = if args.simd {
        JsonBackend::Simd
    } else {
        JsonBackend::SerdeJson
    };
    let infer_config = infer_config.with_backend(backend);

    // Create reader based on input source
    let reader: Box<dyn BufRead> = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {file_path}"))?;
        Box::new(BufReader::new(file))
    } else {
        Box::new(BufReader::new(stdin()))
    };

    let quiet = args.quiet;
    let inference = infer_from_reader(reader, infer_config, |index| {
        if !quiet {
            eprint!("Processing line: {index}\r");
        }
    })
    .context("Failed to infer types")?;

    if inference.records == 0 {
        eprintln!("Warning: No JSON records found in input");
    }
    if inference.skipped > 0 {
        eprintln!("Warning: skipped {} invalid line(s)", inference.skipped);
    }

    let output = match args.emit {
        Emit::Python => render_module(&inference.root, &render_config),
        Emit::Model => serde_json::to_string_pretty(&inference.root)?,
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(&path).with_context(|| format!("Failed to create {path}"))?;
            file.write_all(output.as_bytes())
                .context("Failed to write output")?;
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(output.as_bytes())
                .context("Failed to write output")?;
            out.flush()?;
        }
    }

    Ok(())
}
