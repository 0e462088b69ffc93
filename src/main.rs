use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use argb_dither::{KernelCatalog, Rgba};
use respack::blob::BlobWriter;
use respack::pipeline;
use respack::symbols;

#[derive(Parser)]
#[command(name = "respack")]
#[command(about = "Image resource compiler for 2-bit-per-channel displays")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a directory of PNGs into a resource blob and C header
    Pack {
        /// Directory of source PNG images
        input: PathBuf,

        /// Package name (defaults to the input directory name)
        #[arg(short, long)]
        package: Option<String>,

        /// Output blob path (defaults to prezr.<package>.blob)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generated header path (defaults to prezr.<package>.h)
        #[arg(long)]
        header: Option<PathBuf>,

        /// Transparent color key as hex RGB (e.g. "#00FFFF")
        #[arg(short, long, default_value = "#00FFFF")]
        transparent: String,
    },
    /// Dither PNGs to display levels and write the results as PNG
    Dither {
        /// Source PNG image, or a directory of them
        input: PathBuf,

        /// Output PNG path (a directory when the input is one)
        #[arg(short, long)]
        output: PathBuf,

        /// Kernel name; omit to try every kernel and keep the best
        #[arg(short, long)]
        kernel: Option<String>,

        /// Directory for per-kernel preview images
        #[arg(long)]
        previews: Option<PathBuf>,

        /// Transparent color key as hex RGB (e.g. "#00FFFF")
        #[arg(short, long, default_value = "#00FFFF")]
        transparent: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "respack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            input,
            package,
            output,
            header,
            transparent,
        } => run_pack_command(&input, package, output, header, &transparent),
        Commands::Dither {
            input,
            output,
            kernel,
            previews,
            transparent,
        } => run_dither_command(&input, &output, kernel.as_deref(), previews.as_deref(), &transparent),
    }
}

fn run_pack_command(
    input: &Path,
    package: Option<String>,
    output: Option<PathBuf>,
    header: Option<PathBuf>,
    transparent: &str,
) -> anyhow::Result<()> {
    // The transparent key only matters for dithered previews, but reject a
    // malformed flag up front rather than silently ignoring it.
    parse_color_key(transparent)?;

    let package = match package {
        Some(p) => p,
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("cannot derive package name from {}", input.display()))?,
    };
    let output = output.unwrap_or_else(|| PathBuf::from(format!("prezr.{package}.blob")));
    let header = header.unwrap_or_else(|| PathBuf::from(format!("prezr.{package}.h")));

    let writer = BlobWriter::new();
    let built = pipeline::build_package(input, &package, &writer)?;

    std::fs::write(&output, &built.blob)?;
    let header_text = format!("{}{}", symbols::header_preamble(), built.symbols.render_header());
    std::fs::write(&header, header_text)?;

    println!(
        "Packed {} resources into {} ({} bytes), header {}",
        built.symbols.records().len(),
        output.display(),
        built.blob.len(),
        header.display()
    );
    if !built.skipped.is_empty() {
        println!("Skipped {} images (see log for details)", built.skipped.len());
        std::process::exit(1);
    }

    Ok(())
}

fn run_dither_command(
    input: &Path,
    output: &Path,
    kernel: Option<&str>,
    previews: Option<&Path>,
    transparent: &str,
) -> anyhow::Result<()> {
    let key = parse_color_key(transparent)?;
    let catalog = KernelCatalog::standard()?;

    let kernel = match kernel {
        Some(name) => Some(catalog.find(name).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown kernel \"{name}\"; available: {}",
                catalog
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?),
        None => None,
    };

    if input.is_dir() {
        let skipped = pipeline::dither_directory(input, output, &catalog, kernel, key, previews)?;
        println!("Dithered {} -> {}", input.display(), output.display());
        if !skipped.is_empty() {
            println!("Skipped {} images (see log for details)", skipped.len());
            std::process::exit(1);
        }
    } else {
        let winner = pipeline::dither_file(input, output, &catalog, kernel, key, previews)?;
        println!("Dithered {} with {winner} -> {}", input.display(), output.display());
    }

    Ok(())
}

/// Parse a "#RRGGBB" or "RRGGBB" hex string into an opaque color key.
fn parse_color_key(s: &str) -> anyhow::Result<Rgba> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("invalid color key \"{s}\" (expected hex RGB like \"#00FFFF\")");
    }
    let r = u8::from_str_radix(&hex[0..2], 16)?;
    let g = u8::from_str_radix(&hex[2..4], 16)?;
    let b = u8::from_str_radix(&hex[4..6], 16)?;
    Ok(Rgba::new(r, g, b, 255))
}
