mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "glaze",
    about = "Converge HTML templates on the glass design system and verify the rendered pages",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from glaze.yaml or .git/)
    #[arg(long, global = true, env = "GLAZE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default glaze.yaml (and optionally a manifest skeleton)
    Init {
        /// Also write an empty glaze-manifest.yaml
        #[arg(long)]
        manifest: bool,
    },

    /// Splice missing features into every template
    Patch {
        /// Only process the documents listed in a manifest
        /// (default path: glaze-manifest.yaml)
        #[arg(long, value_name = "PATH")]
        manifest: Option<Option<PathBuf>>,
    },

    /// Report how far each template has converged, without modifying anything
    Audit {
        /// Exit non-zero unless every template is fully converged
        #[arg(long)]
        strict: bool,
    },

    /// Show which features a single file carries
    Detect {
        /// Template file to inspect
        file: PathBuf,
    },

    /// Remove leftover console.error statements from templates
    Scrub,

    /// Probe a running server and write the page report
    Verify {
        /// Probe pages only
        #[arg(long, conflicts_with = "api_only")]
        pages_only: bool,

        /// Probe API routes only
        #[arg(long)]
        api_only: bool,

        /// Override verify.base_url
        #[arg(long)]
        base_url: Option<String>,

        /// Do not write the report file
        #[arg(long)]
        no_report: bool,
    },

    /// Inspect or validate glaze.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Patch { .. } | Commands::Verify { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init { manifest } => cmd::init::run(&root, manifest),
        Commands::Patch { manifest } => cmd::patch::run(&root, manifest, cli.json),
        Commands::Audit { strict } => cmd::audit::run(&root, strict, cli.json),
        Commands::Detect { file } => cmd::detect::run(&root, &file, cli.json),
        Commands::Scrub => cmd::scrub::run(&root, cli.json),
        Commands::Verify {
            pages_only,
            api_only,
            base_url,
            no_report,
        } => cmd::verify::run(
            &root,
            cmd::verify::Options {
                pages_only,
                api_only,
                base_url,
                no_report,
            },
            cli.json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
