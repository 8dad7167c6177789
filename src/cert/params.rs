use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Tag;
use der::Tagged;
use der::asn1::{Any, Ia5StringRef, PrintableStringRef, SetOfVec, Utf8StringRef};
use time::Duration;
use time::{Month, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
pub use crate::cert::extensions::ExtendedKeyUsageOption;
pub use crate::cert::extensions::{FlagSet, KeyUsages};
use crate::error::{CertGenError, Result};

/// id-at-organizationName (2.5.4.10).
pub const ORGANIZATION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// Lifetime, in calendar years, of every certificate produced by this crate.
pub const VALIDITY_YEARS: i32 = 1;

/// The unsigned descriptor a certificate is built from.
///
/// # Fields
/// * `serial_number` - Random serial, below 2^62.
/// * `subject` - The distinguished name of the certificate subject.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `key_usage` - Flags for the critical KeyUsage extension.
/// * `extended_key_usage` - Purposes for the ExtendedKeyUsage extension.
/// * `dns_names` - DNS names for the SubjectAltName extension.
/// * `is_ca` - The BasicConstraints CA flag.
#[derive(Clone, Debug, Builder)]
pub struct CertificateTemplate {
    pub serial_number: u64,
    pub subject: DistinguishedName,
    pub validity: Validity,
    pub key_usage: FlagSet<KeyUsages>,
    #[builder(default)]
    pub extended_key_usage: Vec<ExtendedKeyUsageOption>,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default)]
    pub is_ca: bool,
}

impl CertificateTemplate {
    /// Big-endian serial bytes as handed to the DER encoder.
    pub fn serial_bytes(&self) -> [u8; 8] {
        self.serial_number.to_be_bytes()
    }
}

/// Which key-usage set a certificate carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyUsageProfile {
    /// keyCertSign and cRLSign.
    Authority,
    /// digitalSignature and dataEncipherment.
    Endpoint,
}

impl KeyUsageProfile {
    pub fn flags(self) -> FlagSet<KeyUsages> {
        match self {
            KeyUsageProfile::Authority => KeyUsages::KeyCertSign | KeyUsages::CRLSign,
            KeyUsageProfile::Endpoint => KeyUsages::DigitalSignature | KeyUsages::DataEncipherment,
        }
    }
}

/// Key usage and basic constraints, chosen independently of each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CertificateProfile {
    pub key_usage: KeyUsageProfile,
    pub is_ca: bool,
}

impl CertificateProfile {
    /// The profile historically produced for a container generated with `is_ca`.
    ///
    /// Key usage follows the flag, but the CA basic constraint is set either way.
    pub fn for_ca_flag(is_ca: bool) -> Self {
        if is_ca {
            Self::authority()
        } else {
            Self {
                key_usage: KeyUsageProfile::Endpoint,
                is_ca: true,
            }
        }
    }

    /// Signing authority: CA usages with `CA:TRUE`.
    pub fn authority() -> Self {
        Self {
            key_usage: KeyUsageProfile::Authority,
            is_ca: true,
        }
    }

    /// TLS endpoint: signature and encipherment usages with `CA:FALSE`.
    pub fn endpoint() -> Self {
        Self {
            key_usage: KeyUsageProfile::Endpoint,
            is_ca: false,
        }
    }
}

impl Default for CertificateProfile {
    fn default() -> Self {
        Self::for_ca_flag(true)
    }
}

/// Distinguished name of a subject or issuer.
///
/// Only the organization attribute is used; an empty organization yields an
/// empty name.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub organization: Option<String>,
}

impl DistinguishedName {
    pub fn from_organization(organization: &str) -> Self {
        Self {
            organization: (!organization.is_empty()).then(|| organization.to_string()),
        }
    }

    /// Converts the distinguished name to an X.509 `Name`.
    pub fn as_x509_name(&self) -> Result<Name> {
        let mut rdns = Vec::new();
        if let Some(organization) = &self.organization {
            let attribute = AttributeTypeAndValue {
                oid: ORGANIZATION_OID,
                value: Any::encode_from(&Utf8StringRef::new(organization)?)?,
            };
            rdns.push(RelativeDistinguishedName(SetOfVec::try_from(vec![
                attribute,
            ])?));
        }
        Ok(RdnSequence(rdns))
    }

    /// Reads the first non-empty organization attribute of an X.509 `Name`.
    pub fn from_x509_name(x509dn: &Name) -> Self {
        let organization = x509dn
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .filter(|attr| attr.oid == ORGANIZATION_OID)
            .filter_map(|attr| attribute_text(&attr.value))
            .find(|value| !value.is_empty());
        Self { organization }
    }
}

fn attribute_text(value: &Any) -> Option<String> {
    match value.tag() {
        Tag::Utf8String => value
            .decode_as::<Utf8StringRef<'_>>()
            .ok()
            .map(|s| s.as_str().to_string()),
        Tag::PrintableString => value
            .decode_as::<PrintableStringRef<'_>>()
            .ok()
            .map(|s| s.as_str().to_string()),
        Tag::Ia5String => value
            .decode_as::<Ia5StringRef<'_>>()
            .ok()
            .map(|s| s.as_str().to_string()),
        _ => None,
    }
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A window of `years` calendar years beginning at `not_before`.
    ///
    /// A start on February 29 ends on March 1 when the final year has no leap day.
    pub fn starting_at(not_before: OffsetDateTime, years: i32) -> Result<Self> {
        let not_after = add_years(not_before, years).map_err(|e| {
            CertGenError::Encoding(format!("validity end is out of range: {e}"))
        })?;
        Ok(Self {
            not_before,
            not_after,
        })
    }

    /// One calendar year from now.
    ///
    /// The start is truncated to whole seconds, the resolution of `UTCTime`, so the
    /// window survives encoding unchanged.
    pub fn one_year() -> Result<Self> {
        let now = OffsetDateTime::now_utc();
        let now = now - Duration::nanoseconds(i64::from(now.nanosecond()));
        Self::starting_at(now, VALIDITY_YEARS)
    }

    pub fn contains(&self, at: OffsetDateTime) -> bool {
        self.not_before <= at && at <= self.not_after
    }
}

fn add_years(
    at: OffsetDateTime,
    years: i32,
) -> std::result::Result<OffsetDateTime, time::error::ComponentRange> {
    let year = at.year() + years;
    match at.replace_year(year) {
        Ok(shifted) => Ok(shifted),
        Err(_) if at.month() == Month::February && at.day() == 29 => {
            Ok(at.replace_day(28)?.replace_year(year)? + Duration::days(1))
        }
        Err(e) => Err(e),
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }
}
