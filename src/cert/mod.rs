pub mod extensions;
pub mod params;

use der::{Decode, Encode};
use extensions::{BasicConstraints, KeyUsage, SubjectAltName, ToAndFromX509Extension};
use params::{DistinguishedName, ExtensionParam, Validity};
use rsa::RsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use sha2::Sha256;
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::error::{CertGenError, Result};
use crate::key::KeyPair;
use crate::pem_utils::{self, CERTIFICATE_LABEL};

/// A signed X.509 certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Parses a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> std::result::Result<Self, der::Error> {
        Ok(Self {
            inner: CertificateInner::from_der(der)?,
        })
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertGenError::Encoding(e.to_string()))
    }

    /// Encodes the certificate into a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(&self.to_der()?, CERTIFICATE_LABEL))
    }

    pub fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer_name(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    /// The subject's organization, if present and non-empty.
    pub fn organization(&self) -> Option<String> {
        DistinguishedName::from_x509_name(self.subject_name()).organization
    }

    /// Serial number bytes as encoded (no leading zero padding).
    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    /// Serial number as an integer.
    pub fn serial_u64(&self) -> Option<u64> {
        let bytes = self.serial_number();
        if bytes.len() > 8 {
            return None;
        }
        let mut padded = [0u8; 8];
        padded[8 - bytes.len()..].copy_from_slice(bytes);
        Some(u64::from_be_bytes(padded))
    }

    pub fn validity(&self) -> Validity {
        let validity = &self.inner.tbs_certificate.validity;
        Validity {
            not_before: OffsetDateTime::from(validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(validity.not_after.to_system_time()),
        }
    }

    /// DNS names from the SubjectAltName extension.
    pub fn dns_names(&self) -> Result<Vec<String>> {
        Ok(self
            .find_extension::<SubjectAltName>()?
            .map(|san| san.names)
            .unwrap_or_default())
    }

    /// Whether BasicConstraints marks the certificate as a CA.
    pub fn is_ca(&self) -> Result<bool> {
        Ok(self
            .find_extension::<BasicConstraints>()?
            .is_some_and(|bc| bc.is_ca))
    }

    pub fn key_usage(&self) -> Result<Option<KeyUsage>> {
        self.find_extension::<KeyUsage>()
    }

    /// Looks up and decodes a single extension.
    pub fn find_extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| {
                ExtensionParam {
                    oid: ext.extn_id,
                    critical: ext.critical,
                    value: ext.extn_value.as_bytes().to_vec(),
                }
                .to_extension::<E>()
            })
            .transpose()
    }

    /// DER encoding of the embedded `SubjectPublicKeyInfo`.
    pub fn spki_der(&self) -> Result<Vec<u8>> {
        Ok(self.inner.tbs_certificate.subject_public_key_info.to_der()?)
    }

    /// Whether the embedded public key is the public half of `key`.
    pub fn matches_key(&self, key: &KeyPair) -> Result<bool> {
        Ok(self.spki_der()? == key.spki_der()?)
    }

    /// Issuer and subject are the same name.
    pub fn is_self_issued(&self) -> bool {
        self.issuer_name() == self.subject_name()
    }

    /// Checks that `issuer` names this certificate's issuer and that its key
    /// produced the signature.
    pub fn verify_issued_by(&self, issuer: &Certificate) -> Result<()> {
        if self.issuer_name() != issuer.subject_name() {
            return Err(CertGenError::Verification(format!(
                "issuer {} does not match {}",
                self.issuer_name(),
                issuer.subject_name()
            )));
        }

        let public_key = RsaPublicKey::from_public_key_der(&issuer.spki_der()?)
            .map_err(|e| CertGenError::Verification(format!("issuer key: {e}")))?;
        let verifying_key = VerifyingKey::<Sha256>::new(public_key);

        let signature = self
            .inner
            .signature
            .as_bytes()
            .ok_or_else(|| CertGenError::Verification("signature has unused bits".to_string()))?;
        let signature = Signature::try_from(signature)
            .map_err(|e| CertGenError::Verification(e.to_string()))?;

        let tbs = self.inner.tbs_certificate.to_der()?;
        verifying_key
            .verify(&tbs, &signature)
            .map_err(|e| CertGenError::Verification(e.to_string()))
    }
}
