//! Certificate authority orchestration.
//!
//! [`CertificateStore`] keeps the current CA for a run. Issuance itself is done by
//! [`issue_signed_by`] and [`issue_self_signed`], which take everything they need
//! as arguments.

use std::path::Path;

use tracing::info;

use crate::cert::params::CertificateProfile;
use crate::container::KeyContainer;
use crate::error::{CertGenError, Result, ResultExt};

/// Holds the CA used for signing, absent until initialized or loaded.
#[derive(Debug, Default)]
pub struct CertificateStore {
    ca: Option<KeyContainer>,
    leaf_profile: CertificateProfile,
}

impl CertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `profile` for certificates issued by this store.
    pub fn with_leaf_profile(profile: CertificateProfile) -> Self {
        Self {
            ca: None,
            leaf_profile: profile,
        }
    }

    pub fn ca(&self) -> Option<&KeyContainer> {
        self.ca.as_ref()
    }

    pub fn leaf_profile(&self) -> CertificateProfile {
        self.leaf_profile
    }

    /// Creates a self-signed CA, writes `ca.key`/`ca.pem` into `dir` and makes it
    /// the current CA. On failure the previous CA stays in place.
    pub fn init_ca(&mut self, dir: &Path, organization: &str, dns_names: &[String]) -> Result<()> {
        let mut ca = KeyContainer::generate(true, organization, dns_names)
            .context("can't create CA")?;
        ca.self_sign().context("can't self-sign CA")?;
        ca.store(true, dir).context("can't store CA")?;

        info!(
            directory = %dir.display(),
            organization,
            serial = ?ca.certificate().and_then(|c| c.serial_u64()),
            "initialized certificate authority"
        );
        self.ca = Some(ca);
        Ok(())
    }

    /// Replaces the current CA with the one stored in `dir`.
    ///
    /// The current CA is cleared first, so after a failed load none is set.
    pub fn load_ca(&mut self, dir: &Path) -> Result<()> {
        self.ca = None;
        let ca = KeyContainer::load(dir)?;
        info!(
            directory = %dir.display(),
            organization = ca.organization(),
            "loaded certificate authority"
        );
        self.ca = Some(ca);
        Ok(())
    }

    /// Issues a certificate signed by the current CA and writes it into `dir`.
    pub fn issue_signed(
        &self,
        dir: &Path,
        organization: &str,
        dns_names: &[String],
    ) -> Result<KeyContainer> {
        let ca = self
            .ca
            .as_ref()
            .ok_or(CertGenError::NoCa)
            .context("can't sign certificate")?;
        issue_signed_by(ca, self.leaf_profile, dir, organization, dns_names)
    }

    /// Issues a self-signed certificate into `dir`. The current CA is not used.
    pub fn issue_self_signed(
        &self,
        dir: &Path,
        organization: &str,
        dns_names: &[String],
    ) -> Result<KeyContainer> {
        issue_self_signed(self.leaf_profile, dir, organization, dns_names)
    }
}

/// Issues a certificate signed by `ca` and writes `<organization>.key`/`.pem`.
pub fn issue_signed_by(
    ca: &KeyContainer,
    profile: CertificateProfile,
    dir: &Path,
    organization: &str,
    dns_names: &[String],
) -> Result<KeyContainer> {
    let mut container = KeyContainer::generate_with_profile(profile, organization, dns_names)
        .context("can't create certificate")?;
    ca.sign(&mut container).context("can't sign certificate")?;
    container
        .store(false, dir)
        .context("can't store certificate")?;

    info!(
        directory = %dir.display(),
        organization,
        issuer = ca.organization(),
        serial = ?container.certificate().and_then(|c| c.serial_u64()),
        "issued certificate"
    );
    Ok(container)
}

/// Issues a self-signed certificate and writes `<organization>.key`/`.pem`.
pub fn issue_self_signed(
    profile: CertificateProfile,
    dir: &Path,
    organization: &str,
    dns_names: &[String],
) -> Result<KeyContainer> {
    let mut container = KeyContainer::generate_with_profile(profile, organization, dns_names)
        .context("can't create certificate")?;
    container
        .self_sign()
        .context("can't sign certificate")?;
    container
        .store(false, dir)
        .context("can't store certificate")?;

    info!(
        directory = %dir.display(),
        organization,
        serial = ?container.certificate().and_then(|c| c.serial_u64()),
        "issued self-signed certificate"
    );
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn issue_signed_without_ca_fails() {
        let dir = tempdir().unwrap();
        let store = CertificateStore::new();
        let err = store.issue_signed(dir.path(), "Acme", &[]).unwrap_err();
        assert!(matches!(err.root(), CertGenError::NoCa));
        assert!(!dir.path().join("Acme.key").exists());
    }

    #[test]
    fn failed_init_keeps_previous_ca() {
        let dir = tempdir().unwrap();
        let mut store = CertificateStore::new();
        store.init_ca(dir.path(), "Acme", &[]).unwrap();
        let serial = store.ca().unwrap().certificate().unwrap().serial_u64();

        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        assert!(store.init_ca(&blocker, "Other", &[]).is_err());
        assert_eq!(
            store.ca().unwrap().certificate().unwrap().serial_u64(),
            serial
        );
    }

    #[test]
    fn failed_load_clears_ca() {
        let dir = tempdir().unwrap();
        let empty = tempdir().unwrap();
        let mut store = CertificateStore::new();
        store.init_ca(dir.path(), "Acme", &[]).unwrap();

        let err = store.load_ca(empty.path()).unwrap_err();
        assert!(matches!(err.root(), CertGenError::StorageRead { .. }));
        assert!(store.ca().is_none());
    }

    #[test]
    fn corrupt_certificate_after_valid_key_clears_ca() {
        let dir = tempdir().unwrap();
        let mut store = CertificateStore::new();
        store.init_ca(dir.path(), "Acme", &[]).unwrap();
        std::fs::write(
            dir.path().join("ca.pem"),
            crate::pem_utils::der_to_pem(&[0x30, 0x03, 0x02, 0x01, 0x01], "CERTIFICATE"),
        )
        .unwrap();

        let err = store.load_ca(dir.path()).unwrap_err();
        assert!(matches!(err.root(), CertGenError::Parse { .. }));
        assert!(err.to_string().starts_with("can't load CA certificate"));
        assert!(store.ca().is_none());
    }

    #[test]
    fn endpoint_profile_issues_non_ca_certificates() {
        let dir = tempdir().unwrap();
        let store = CertificateStore::with_leaf_profile(CertificateProfile::endpoint());
        let container = store.issue_self_signed(dir.path(), "Edge", &[]).unwrap();
        assert!(!container.certificate().unwrap().is_ca().unwrap());
    }
}
