//! Error types for certgen.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CertGenError>;

/// Represents errors that can occur while managing the certificate authority.
///
/// Every failure is terminal for the operation that raised it. Higher layers add
/// context with [`ResultExt::context`]; use [`CertGenError::root`] to get at the
/// underlying kind.
#[derive(Debug, Error)]
pub enum CertGenError {
    /// Error during RSA key generation.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// The random serial number could not be drawn.
    #[error("Serial number generation error: {0}")]
    SerialGeneration(String),

    /// Building or signing a certificate failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// A certificate could not be issued for `subject`.
    #[error("Signing error for {subject:?}: {source}")]
    IssueFailed {
        subject: String,
        #[source]
        source: Box<CertGenError>,
    },

    /// Writing key or certificate material failed.
    #[error("Failed to write {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading key or certificate material failed.
    #[error("Failed to read {}: {source}", path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold a PEM block with the expected label.
    #[error("Failed to decode PEM block in {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The PEM payload is not a valid key or certificate.
    #[error("Failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// The certificate subject carries no organization.
    #[error("Certificate {} has no organization in its subject", path.display())]
    MissingOrganization { path: PathBuf },

    /// The stored certificate was not issued for the stored private key.
    #[error("Certificate {} does not match the stored private key", path.display())]
    KeyMismatch { path: PathBuf },

    /// An issuance operation needs a CA but none has been initialized or loaded.
    #[error("No certificate authority is available to sign with")]
    NoCa,

    /// Unrecognized mode selector.
    #[error("Unknown mode {0:?}, expected one of: ca, child, self")]
    UnknownMode(String),

    /// Error during DER or PEM serialization.
    #[error("Failed to encode data: {0}")]
    Encoding(String),

    /// A certificate signature or issuer check failed.
    #[error("Verification error: {0}")]
    Verification(String),

    /// An error annotated with the step that produced it.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CertGenError>,
    },
}

impl CertGenError {
    /// Returns the innermost error, skipping any context layers.
    pub fn root(&self) -> &CertGenError {
        let mut current = self;
        while let CertGenError::Context { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Extension for attaching step context to fallible results.
pub trait ResultExt<T> {
    /// Wraps the error, if any, with a description of the failed step.
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| CertGenError::Context {
            context: context.to_string(),
            source: Box::new(err),
        })
    }
}

impl From<der::Error> for CertGenError {
    /// Converts a `der::Error` into a `CertGenError`.
    fn from(err: der::Error) -> Self {
        CertGenError::Encoding(err.to_string())
    }
}

impl From<x509_cert::spki::Error> for CertGenError {
    fn from(err: x509_cert::spki::Error) -> Self {
        CertGenError::Encoding(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertGenError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertGenError::Encoding(err.to_string())
    }
}

impl From<rsa::Error> for CertGenError {
    fn from(err: rsa::Error) -> Self {
        CertGenError::Signing(err.to_string())
    }
}
