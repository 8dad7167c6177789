use std::time::SystemTime;

use der::Encode;
use der::asn1::{GeneralizedTime, OctetString, UtcTime};
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::Time;

use crate::cert::params::{ExtensionParam, Validity};
use crate::error::Result;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - The unique identifier for the certificate.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
pub struct TbsCertificate {
    pub serial_number: Vec<u8>,
    pub signature_algorithm: AlgorithmIdentifierOwned,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key: SubjectPublicKeyInfoOwned,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| -> Result<x509_cert::ext::Extension> {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before.into())?,
            not_after: to_x509_time(self.validity.not_after.into())?,
        };

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number: SerialNumber::new(self.serial_number.as_slice())?,
            signature: self.signature_algorithm.clone(),
            issuer: self.issuer.clone(),
            validity,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key.clone(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }

    /// Encodes the `TbsCertificate` into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.to_tbs_certificate_inner()?.to_der()?)
    }
}

// UTCTime covers 1950..2049, later dates need GeneralizedTime (RFC 5280 4.1.2.5).
fn to_x509_time(at: SystemTime) -> Result<Time> {
    match UtcTime::from_system_time(at) {
        Ok(utc) => Ok(Time::UtcTime(utc)),
        Err(_) => Ok(Time::GeneralTime(GeneralizedTime::from_system_time(at)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};

    #[test]
    fn test_dates_after_2049_use_generalized_time() {
        let at = OffsetDateTime::new_utc(
            time::Date::from_calendar_date(2051, time::Month::January, 1).unwrap(),
            time::Time::MIDNIGHT,
        );
        assert!(matches!(to_x509_time(at.into()).unwrap(), Time::GeneralTime(_)));
        let now = OffsetDateTime::now_utc() - Duration::nanoseconds(1);
        assert!(matches!(to_x509_time(now.into()).unwrap(), Time::UtcTime(_)));
    }
}
