//! certgen CLI.
//!
//! Initializes a certificate authority or issues CA-signed and self-signed
//! certificates into a directory.

use std::path::PathBuf;
use std::process::ExitCode;

use certgen::cert::params::CertificateProfile;
use certgen::error::Result;
use certgen::store::CertificateStore;
use certgen::workflow::{self, IssueRequest, Mode};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "certgen")]
#[command(about = "Create a certificate authority and issue certificates", long_about = None)]
#[command(version)]
struct Cli {
    /// What to produce: ca, child or self
    #[arg(long, default_value = "ca")]
    cert: String,

    /// Directory to store keys and certificates in
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Organization name of the subject
    #[arg(long, default_value = "")]
    organization: String,

    /// Comma-separated DNS names ("localhost" is always added)
    #[arg(long, alias = "domens", default_value = "")]
    dns: String,

    /// Issue child and self-signed certificates as non-CA endpoint certificates
    #[arg(long)]
    endpoint_leaf: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "certgen failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mode: Mode = cli.cert.parse()?;
    let request = IssueRequest::new(
        cli.dir,
        cli.organization,
        IssueRequest::parse_dns_list(&cli.dns),
    );

    let mut store = if cli.endpoint_leaf {
        CertificateStore::with_leaf_profile(CertificateProfile::endpoint())
    } else {
        CertificateStore::new()
    };

    workflow::run(&mut store, mode, &request)
}
