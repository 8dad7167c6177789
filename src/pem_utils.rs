use pem::{EncodeConfig, LineEnding, Pem};
use thiserror::Error;

/// Label of stored private keys. The payload is PKCS#1 despite the generic label.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Why a PEM payload could not be extracted.
#[derive(Debug, Error)]
pub enum PemBlockError {
    #[error("no PEM block found: {0}")]
    Malformed(#[from] pem::PemError),

    #[error("expected a {expected:?} block, found {found:?}")]
    UnexpectedLabel { expected: String, found: String },
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = Pem::new(label, der);
    pem::encode_config(&pem, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

/// Convert the first PEM block of `input` to DER, requiring the given label.
pub fn pem_to_der(input: impl AsRef<[u8]>, label: &str) -> Result<Vec<u8>, PemBlockError> {
    let pem = pem::parse(input)?;
    if pem.tag() != label {
        return Err(PemBlockError::UnexpectedLabel {
            expected: label.to_string(),
            found: pem.tag().to_string(),
        });
    }
    Ok(pem.into_contents())
}
