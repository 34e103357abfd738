use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_fixtures::writer::WriterConfig;
use pdf_fixtures::FixtureKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pdf-fixtures",
    about = "Generate byte-exact synthetic PDF files for parser tests",
    version
)]
struct Cli {
    /// Log every appended object and finished revision
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write fixtures into a directory
    Generate {
        /// Output directory, created if missing
        #[arg(short, long, default_value = "fixtures")]
        output: PathBuf,

        /// Fixture to generate, by name or file name (repeatable, defaults to all)
        #[arg(short, long = "fixture")]
        fixtures: Vec<FixtureKind>,

        /// zlib level for compressed streams
        #[arg(short = 'l', long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
        compression_level: u32,

        /// Add the binary comment line after the header
        #[arg(short, long)]
        binary_marker: bool,
    },

    /// List the available fixtures
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "pdf_fixtures=debug,pdf_fixtures_cli=debug"
    } else {
        "pdf_fixtures=info,pdf_fixtures_cli=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            output,
            fixtures,
            compression_level,
            binary_marker,
        } => {
            let config = WriterConfig {
                compression_level,
                binary_marker,
                ..WriterConfig::default()
            };
            generate(&output, &selected(fixtures), &config)?;
        }

        Commands::List => {
            for kind in FixtureKind::ALL {
                println!(
                    "{:<26} {:<30} {}",
                    kind.name(),
                    kind.file_name(),
                    kind.description()
                );
            }
        }
    }

    Ok(())
}

/// Requested fixtures in order of first mention, or all of them
fn selected(requested: Vec<FixtureKind>) -> Vec<FixtureKind> {
    if requested.is_empty() {
        return FixtureKind::ALL.to_vec();
    }

    let mut kinds = Vec::with_capacity(requested.len());
    for kind in requested {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

/// Build every requested fixture first, then write them; a failed build
/// leaves the output directory untouched
fn generate(output: &Path, kinds: &[FixtureKind], config: &WriterConfig) -> Result<()> {
    let mut built = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let bytes = kind
            .build_with(config)
            .with_context(|| format!("Failed to build {}", kind.file_name()))?;
        built.push((kind, bytes));
    }

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    for (kind, bytes) in built {
        let path = output.join(kind.file_name());
        fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(fixture = kind.name(), path = %path.display(), "wrote fixture");
        println!("Generated: {} ({} bytes)", path.display(), bytes.len());
    }

    Ok(())
}
