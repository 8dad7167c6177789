//! # certgen - A Small Self-Managed Certificate Authority
//!
//! certgen creates an RSA root certificate authority, persists it as PEM files,
//! reloads it on later runs and issues certificates signed either by that CA or by
//! their own key. It is built entirely with rustcrypto libraries.
//!
//! ## Stored Material
//!
//! - `ca.key` / `ca.pem`: the CA private key (PKCS#1 inside a `PRIVATE KEY` block)
//!   and its self-signed certificate
//! - `<organization>.key` / `<organization>.pem`: issued key pairs
//!
//! All files are written with owner-only permissions, through a temporary file
//! renamed into place.
//!
//! A CA needs a non-empty organization to be loaded again. One created with an
//! empty organization is replaced on every `child` run, and certificates it
//! issued earlier no longer chain to the stored CA.
//!
//! ## Certificate Contents
//!
//! - **Key**: RSA 2048, signed with SHA-256 PKCS#1 v1.5
//! - **Subject**: a single organization attribute
//! - **Serial**: uniformly random below 2^62
//! - **Validity**: one calendar year from generation
//! - **SubjectAltName**: the requested DNS names plus `localhost`
//!
//! ## Quick Start
//!
//! ### Initializing a CA and Issuing a Certificate
//!
//! ```rust,no_run
//! use std::path::Path;
//! use certgen::store::CertificateStore;
//!
//! # fn main() -> Result<(), certgen::error::CertGenError> {
//! let dir = Path::new("/tmp/certs");
//! let names = vec!["acme.test".to_string()];
//!
//! let mut store = CertificateStore::new();
//! store.init_ca(dir, "Acme", &names)?;
//! let issued = store.issue_signed(dir, "Acme", &names)?;
//!
//! println!("Issued serial {:?}", issued.certificate().and_then(|c| c.serial_u64()));
//! # Ok(())
//! # }
//! ```
//!
//! ### Working with Key Containers Directly
//!
//! ```rust,no_run
//! use certgen::container::KeyContainer;
//!
//! # fn main() -> Result<(), certgen::error::CertGenError> {
//! let mut ca = KeyContainer::generate(true, "Example CA", &[])?;
//! ca.self_sign()?;
//!
//! let mut server = KeyContainer::generate(false, "Example", &["example.test".to_string()])?;
//! ca.sign(&mut server)?;
//!
//! let certificate = server.certificate().expect("signed above");
//! certificate.verify_issued_by(ca.certificate().expect("signed above"))?;
//! println!("{}", certificate.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Failures carry the step that produced them; [`error::CertGenError::root`]
//! exposes the underlying kind:
//!
//! ```rust
//! use certgen::{error::CertGenError, store::CertificateStore};
//!
//! let store = CertificateStore::new();
//! match store.issue_signed(std::path::Path::new("."), "Acme", &[]) {
//!     Err(err) if matches!(err.root(), CertGenError::NoCa) => println!("initialize a CA first"),
//!     Err(err) => println!("Other error: {}", err),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`key`]: RSA key generation, PKCS#1 import/export and signing
//! - [`cert`]: Certificate decoding, inspection, verification and extensions
//! - [`issuer`]: Certificate issuing
//! - [`container`]: Key containers and their on-disk layout
//! - [`store`]: CA initialization, loading and issuance
//! - [`workflow`]: Mode selection for a single run
//! - [`persist`]: Restricted, atomic file writes
//! - [`error`]: Error types and context

pub mod cert;
pub mod container;
pub mod error;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod persist;
pub mod store;
pub mod tbs_certificate;
pub mod workflow;
