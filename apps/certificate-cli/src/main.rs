//! barangay-cert binary
//!
//! Renders barangay certificates from a JSON request and inspects the PDFs
//! it produced.

use anyhow::Context;
use certificate_cli::commands::{self, RenderArgs, RenderOutput};
use certificate_types::CertificateKind;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "barangay-cert")]
#[command(version, about = "Render and inspect barangay certificates")]
struct Args {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a certificate from a JSON request
    Render {
        /// Certificate request (JSON)
        #[arg(short, long)]
        request: PathBuf,

        /// Officials, barangay and output settings (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file; defaults to the configured directory and file name
        #[arg(short, long, conflicts_with = "data_url")]
        output: Option<PathBuf>,

        /// Print a data URL to stdout instead of writing a file
        #[arg(long)]
        data_url: bool,

        /// Refuse blank required fields and values that overflow the layout
        #[arg(long)]
        strict: bool,

        /// Certificate kind, overriding the request
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// Issue date (YYYY-MM-DD), overriding the request
        #[arg(long)]
        issue_date: Option<NaiveDate>,

        /// Punong barangay name, overriding the config
        #[arg(long)]
        punong_barangay: Option<String>,

        /// Kagawad on duty, overriding the config
        #[arg(long)]
        kagawad: Option<String>,
    },

    /// List the text drawn on a rendered certificate
    Inspect {
        pdf: PathBuf,

        /// Print the full inspection as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Clearance,
    Residency,
    Indigency,
}

impl From<KindArg> for CertificateKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Clearance => CertificateKind::Clearance,
            KindArg::Residency => CertificateKind::Residency,
            KindArg::Indigency => CertificateKind::Indigency,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries data URLs and listings; logs go to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("barangay-cert v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Render {
            request,
            config,
            output,
            data_url,
            strict,
            kind,
            issue_date,
            punong_barangay,
            kagawad,
        } => {
            let (_, output) = commands::render(&RenderArgs {
                request,
                config,
                output,
                data_url,
                strict,
                kind: kind.map(CertificateKind::from),
                issue_date,
                punong_barangay,
                kagawad,
            })?;
            match output {
                RenderOutput::File(path) => println!("{}", path.display()),
                RenderOutput::DataUrl(url) => println!("{}", url),
            }
        }
        Command::Inspect { pdf, json } => {
            let page = commands::inspect_file(&pdf)?;
            if json {
                let listing = serde_json::to_string_pretty(&page)
                    .context("Failed to serialize inspection")?;
                println!("{}", listing);
            } else {
                print!("{}", commands::format_inspection(&page));
            }
        }
    }

    Ok(())
}
