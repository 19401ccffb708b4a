//! `hercm` - inspect and convert HERCM sparse matrix files
//!
//! Every subcommand reads one file; the converting ones write a new file and
//! never modify their input.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hercm::{checksum, CodecConfig, HercmError, HercmFile, Magic, Matrix, Symmetry, TransformPolicy};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hercm")]
#[command(about = "Inspect and convert HERCM sparse matrix files")]
#[command(version)]
struct Cli {
    /// Keep duplicate coordinates instead of summing them on load
    #[arg(long, global = true)]
    keep_duplicates: bool,

    /// Data tokens per line in written files
    #[arg(long, global = true, default_value_t = 9)]
    tokens_per_line: usize,

    /// Write the legacy BXF magic instead of HERCM
    #[arg(long, global = true)]
    bxf: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show header attributes and content checks
    Info {
        file: PathBuf,

        /// Print a JSON object instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check the stored verification value against the content
    Verify { file: PathBuf },
    /// Print the value at one coordinate
    Get { file: PathBuf, row: usize, col: usize },
    /// Convert between symmetric and asymmetric storage
    SetSymmetry {
        file: PathBuf,

        /// Target storage: sym or asym
        symmetry: Symmetry,

        /// Conflict policy: truncate, merge or reconcile
        #[arg(long, default_value = "truncate")]
        policy: TransformPolicy,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Drop explicitly stored zeros
    Rmzeros {
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct Summary<'a> {
    path: String,
    magic: Magic,
    height: usize,
    width: usize,
    nzentries: usize,
    symmetry: Symmetry,
    verification: Option<f64>,
    remarks: &'a [String],
    upper_triangle_empty: bool,
    lower_triangle_empty: bool,
    mirror_symmetric: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CodecConfig::default()
        .with_coalesce_on_load(!cli.keep_duplicates)
        .with_tokens_per_line(cli.tokens_per_line)
        .with_magic(if cli.bxf { Magic::Bxf } else { Magic::Hercm });

    match run(&cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands, config: &CodecConfig) -> hercm::Result<ExitCode> {
    match command {
        Commands::Info { file, json } => {
            let header = HercmFile::open(file)?.header;
            let matrix = hercm::load_with(file, config)?;
            let summary = Summary {
                path: file.display().to_string(),
                magic: header.magic,
                height: matrix.height(),
                width: matrix.width(),
                nzentries: matrix.nzentries(),
                symmetry: matrix.symmetry(),
                verification: matrix.verification(),
                remarks: matrix.remarks(),
                upper_triangle_empty: matrix.check_upper_triangle(),
                lower_triangle_empty: matrix.check_lower_triangle(),
                mirror_symmetric: matrix.is_mirror_symmetric(),
            };
            if *json {
                let text = serde_json::to_string_pretty(&summary)
                    .map_err(|e| HercmError::Validation(e.to_string()))?;
                println!("{text}");
            } else {
                print_summary(&summary);
            }
        }
        Commands::Verify { file } => match hercm::load_with(file, config) {
            Ok(matrix) => {
                let current = checksum::generate_verification_sum(matrix.elements());
                println!("{}: ok (verification {current:?})", file.display());
            }
            Err(hercm::Error::Core(err @ HercmError::Validation(_))) => {
                println!("{}: FAILED ({err})", file.display());
                return Ok(ExitCode::FAILURE);
            }
            Err(err) => return Err(err),
        },
        Commands::Get { file, row, col } => {
            let matrix = hercm::load_with(file, config)?;
            println!("{:?}", matrix.get_value(*row, *col)?);
        }
        Commands::SetSymmetry {
            file,
            symmetry,
            policy,
            output,
        } => {
            let mut matrix = hercm::load_with(file, config)?;
            let before = matrix.nzentries();
            matrix.set_symmetry(*symmetry, *policy)?;
            write(&mut matrix, output, config)?;
            println!(
                "{} -> {}: {symmetry} via {policy}, {before} -> {} entries",
                file.display(),
                output.display(),
                matrix.nzentries()
            );
        }
        Commands::Rmzeros { file, output } => {
            let mut matrix = hercm::load_with(file, config)?;
            let removed = matrix.remove_zeros();
            write(&mut matrix, output, config)?;
            println!(
                "{} -> {}: removed {removed} zero entries",
                file.display(),
                output.display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write(matrix: &mut Matrix, output: &Path, config: &CodecConfig) -> hercm::Result<()> {
    matrix.make_row_major();
    matrix.refresh_verification();
    hercm::save_with(matrix, output, config)
}

fn print_summary(summary: &Summary<'_>) {
    println!("{}", summary.path);
    println!("   Magic: {}", summary.magic);
    println!("   Dimensions: {} x {}", summary.height, summary.width);
    println!("   Entries: {}", summary.nzentries);
    println!("   Symmetry: {}", summary.symmetry);
    match summary.verification {
        Some(v) => println!("   Verification: {v:?}"),
        None => println!("   Verification: none"),
    }
    println!("   Upper triangle empty: {}", summary.upper_triangle_empty);
    println!("   Lower triangle empty: {}", summary.lower_triangle_empty);
    println!("   Mirror symmetric: {}", summary.mirror_symmetric);
    if !summary.remarks.is_empty() {
        println!("   Remarks: {}", summary.remarks.join(" "));
    }
}
