use der::Encode;
use der::asn1::BitString;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::cert::Certificate;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};
use crate::cert::params::{CertificateTemplate, ExtensionParam};
use crate::error::Result;
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> Result<Name>;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Issues a certificate for `subject_key` described by `template`.
    ///
    /// The certificate carries BasicConstraints and KeyUsage (both critical),
    /// ExtendedKeyUsage and SubjectAltName when non-empty, and subject/authority
    /// key identifiers.
    fn issue(&self, template: &CertificateTemplate, subject_key: &KeyPair) -> Result<Certificate> {
        let signing_key = self.signing_key();
        let signature_algorithm = signing_key.signature_algorithm()?;

        let basic_constraints = BasicConstraints {
            is_ca: template.is_ca,
            max_path_length: None,
        };

        let mut extensions: Vec<ExtensionParam> =
            vec![ExtensionParam::from_extension(basic_constraints, true)?];

        if !template.key_usage.is_empty() {
            extensions.push(ExtensionParam::from_extension(
                KeyUsage(template.key_usage),
                true,
            )?);
        }

        if !template.extended_key_usage.is_empty() {
            let extended_key_usage = ExtendedKeyUsage {
                usage: template.extended_key_usage.clone(),
            };
            extensions.push(ExtensionParam::from_extension(extended_key_usage, false)?);
        }

        if !template.dns_names.is_empty() {
            let san = SubjectAltName {
                names: template.dns_names.clone(),
            };
            extensions.push(ExtensionParam::from_extension(san, false)?);
        }

        extensions.push(ExtensionParam::from_extension(
            SubjectKeyIdentifier(subject_key.key_identifier()?),
            false,
        )?);
        extensions.push(ExtensionParam::from_extension(
            AuthorityKeyIdentifier {
                key_identifier: signing_key.key_identifier()?,
            },
            false,
        )?);

        let tbs_cert = TbsCertificate {
            serial_number: template.serial_bytes().to_vec(),
            signature_algorithm: signature_algorithm.clone(),
            issuer: self.issuer_name()?,
            validity: template.validity.clone(),
            subject: template.subject.as_x509_name()?,
            subject_public_key: subject_key.as_spki()?,
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let signature = signing_key.sign_data(&tbs_cert_inner.to_der()?)?;

        Ok(Certificate {
            inner: CertificateInner {
                tbs_certificate: tbs_cert_inner,
                signature_algorithm,
                signature: BitString::from_bytes(&signature)?,
            },
        })
    }
}
