//! Blocksite CLI
//!
//! Builds multilingual static sites from block-based CMS exports.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Blocksite.
#[derive(Parser)]
#[command(
    name = "blocksite",
    version,
    about = "A static site builder for block-based CMS content"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "blocksite.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Include draft records
        #[arg(long)]
        drafts: bool,
        /// Override the site URL (e.g., https://example.com)
        #[arg(long)]
        site_url: Option<String>,
        /// Fail when a block renderer cannot be resolved
        #[arg(long)]
        strict: bool,
    },
    /// Start development server with live reload
    Watch {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Scaffold a new block renderer
    New {
        /// Block name (e.g., VideoBlock)
        name: String,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Write Lighthouse CI URL list and configs
    Lighthouse {
        /// Directory to write the files into
        #[arg(long, default_value = ".")]
        out_dir: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    blocksite::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            drafts,
            site_url,
            strict,
        } => {
            blocksite::cmd::build::run(
                &cli.config,
                output.as_deref(),
                drafts,
                site_url.as_deref(),
                strict,
            )?;
        }
        Commands::Watch { port, open } => {
            blocksite::cmd::watch::run(&cli.config, port, open).await?;
        }
        Commands::New { name } => {
            blocksite::cmd::new::run(&cli.config, &name)?;
        }
        Commands::Check { strict } => {
            blocksite::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Lighthouse { out_dir } => {
            blocksite::cmd::lighthouse::run(&cli.config, &out_dir)?;
        }
    }

    Ok(())
}
