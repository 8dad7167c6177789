//! Mode dispatch for a single invocation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::{CertGenError, Result};
use crate::store::CertificateStore;

/// What a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Initialize a new CA, overwriting any existing one.
    Ca,
    /// Issue a CA-signed certificate, loading or creating the CA first.
    Child,
    /// Issue a self-signed certificate.
    SelfSigned,
}

impl FromStr for Mode {
    type Err = CertGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ca" => Ok(Mode::Ca),
            "child" => Ok(Mode::Child),
            "self" => Ok(Mode::SelfSigned),
            other => Err(CertGenError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Ca => "ca",
            Mode::Child => "child",
            Mode::SelfSigned => "self",
        })
    }
}

/// Parameters shared by every mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub directory: PathBuf,
    pub organization: String,
    pub dns_names: Vec<String>,
}

impl IssueRequest {
    pub fn new(
        directory: impl Into<PathBuf>,
        organization: impl Into<String>,
        dns_names: Vec<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            organization: organization.into(),
            dns_names,
        }
    }

    /// Splits a comma-separated list, dropping blank entries.
    pub fn parse_dns_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Where the CA used by a child run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaSource {
    Loaded,
    Initialized,
}

/// Loads the CA from the request directory, initializing a new one if that fails
/// for any reason.
///
/// A CA created with an empty organization has no organization in its subject and
/// never loads, so every child run for it replaces `ca.key`/`ca.pem` and earlier
/// certificates stop chaining to the stored CA.
pub fn ensure_ca(store: &mut CertificateStore, request: &IssueRequest) -> Result<CaSource> {
    match store.load_ca(&request.directory) {
        Ok(()) => Ok(CaSource::Loaded),
        Err(err) => {
            if let CertGenError::MissingOrganization { path } = err.root() {
                warn!(
                    path = %path.display(),
                    "stored CA has no organization and is replaced; certificates it issued will no longer chain"
                );
            } else {
                warn!(error = %err, "could not load CA, initializing a new one");
            }
            store.init_ca(&request.directory, &request.organization, &request.dns_names)?;
            Ok(CaSource::Initialized)
        }
    }
}

/// Performs one run of `mode`.
pub fn run(store: &mut CertificateStore, mode: Mode, request: &IssueRequest) -> Result<()> {
    info!(%mode, directory = %request.directory.display(), "starting");
    match mode {
        Mode::Ca => {
            store.init_ca(&request.directory, &request.organization, &request.dns_names)?;
        }
        Mode::Child => {
            ensure_ca(store, request)?;
            store.issue_signed(&request.directory, &request.organization, &request.dns_names)?;
        }
        Mode::SelfSigned => {
            store.issue_self_signed(&request.directory, &request.organization, &request.dns_names)?;
        }
    }
    Ok(())
}
