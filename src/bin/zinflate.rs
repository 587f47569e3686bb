//! zinflate CLI - gzip / zlib / raw DEFLATE decompressor
//!
//! A command-line interface for the zinflate library.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::{info, LevelFilter};

use zinflate::{decompress, decompress_as, gzip_members, Format, InflateOptions};

/// Decompress gzip, zlib or raw DEFLATE data.
///
/// The container is detected from the header unless `--format` is given.
#[derive(Parser, Debug)]
#[command(name = "zinflate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Compressed input file ("-" reads stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Input framing
    #[arg(short, long, value_enum, default_value = "auto")]
    format: FormatArg,

    /// Refuse to produce more than this many bytes
    #[arg(long, default_value_t = zinflate::DEFAULT_MAX_SIZE)]
    max_size: usize,

    /// Skip CRC32 / Adler-32 and header CRC verification
    #[arg(long)]
    no_verify: bool,

    /// List gzip members instead of decompressing
    #[arg(short, long)]
    list: bool,

    /// Verbose output (-v for info, -vv for per-block debug); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Detect gzip or zlib from the header
    Auto,
    Gzip,
    Zlib,
    /// Bare DEFLATE with no framing
    Deflate,
}

impl FormatArg {
    fn to_format(self) -> Option<Format> {
        match self {
            FormatArg::Auto => None,
            FormatArg::Gzip => Some(Format::Gzip),
            FormatArg::Zlib => Some(Format::Zlib),
            FormatArg::Deflate => Some(Format::Deflate),
        }
    }
}

fn init_logging(verbose: u8) {
    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    let level = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        logger.filter_level(level);
    }
    logger.format_timestamp(None).format_target(false).init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input = read_input(&args.input)?;
    let options = InflateOptions::default()
        .with_max_size(args.max_size)
        .with_checksums(!args.no_verify);

    if args.list {
        return list_members(&input, &options);
    }

    let start = Instant::now();
    let output = match args.format.to_format() {
        Some(format) => decompress_as(&input, format, &options)?,
        None => decompress(&input, &options)?,
    };
    let elapsed = start.elapsed();

    match &args.output {
        Some(path) => fs::write(path, &output)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }

    let ratio = if input.is_empty() {
        0.0
    } else {
        output.len() as f64 / input.len() as f64
    };
    info!(
        "{:?}: {} -> {} ({:.2}x) in {:.2?}",
        args.input,
        format_size(input.len() as u64),
        format_size(output.len() as u64),
        ratio,
        elapsed
    );

    Ok(())
}

fn read_input(path: &PathBuf) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

fn list_members(input: &[u8], options: &InflateOptions) -> Result<(), Box<dyn std::error::Error>> {
    let members = gzip_members(input, options)?;

    println!(
        "{:>6} {:>12} {:>12} {:>10}  name",
        "member", "compressed", "size", "crc32"
    );
    for (i, member) in members.iter().enumerate() {
        println!(
            "{:>6} {:>12} {:>12} {:>10}  {}",
            i,
            member.compressed_len,
            member.size,
            format!("{:08x}", member.crc32),
            member.header.filename_lossy().unwrap_or_default()
        );
        if let Some(comment) = member.header.comment_lossy() {
            info!("  comment: {comment}");
        }
        info!(
            "  blocks: {} stored, {} fixed, {} dynamic",
            member.stats.stored_blocks, member.stats.fixed_blocks, member.stats.dynamic_blocks
        );
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
