use der::Encode;
use der::asn1::{Any, Null};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::signature::SignatureEncoding;
use rsa::signature::Signer as RsaSigner;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::error::{CertGenError, Result};

/// Modulus size used for every generated key.
pub const RSA_KEY_BITS: usize = 2048;

/// An RSA key pair owned by a single key container.
#[derive(Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CertGenError::KeyGeneration(e.to_string()))?;
        Ok(Self::from_private(private))
    }

    /// Import a key from its PKCS#1 DER encoding.
    pub fn from_pkcs1_der(der: &[u8]) -> std::result::Result<Self, rsa::pkcs1::Error> {
        let private = RsaPrivateKey::from_pkcs1_der(der)?;
        Ok(Self::from_private(private))
    }

    fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair {
            private: Box::new(private),
            public,
        }
    }

    /// Export the private key as PKCS#1 DER.
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>> {
        Ok(self.private.to_pkcs1_der()?.as_bytes().to_vec())
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public.size() * 8
    }

    /// The public half as a `SubjectPublicKeyInfo`, as embedded in certificates.
    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        Ok(SubjectPublicKeyInfoOwned::from_key(self.public.clone())?)
    }

    /// DER encoding of [`KeyPair::as_spki`].
    pub fn spki_der(&self) -> Result<Vec<u8>> {
        Ok(self.as_spki()?.to_der()?)
    }

    /// SHA-1 over the subject public key bits (RFC 5280 method 1).
    pub fn key_identifier(&self) -> Result<Vec<u8>> {
        let spki = self.as_spki()?;
        let digest = <Sha1 as sha1::Digest>::digest(spki.subject_public_key.raw_bytes());
        Ok(digest.to_vec())
    }

    /// sha256WithRSAEncryption with explicit NULL parameters.
    pub fn signature_algorithm(&self) -> Result<AlgorithmIdentifierOwned> {
        Ok(AlgorithmIdentifierOwned {
            oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
            parameters: Some(Any::encode_from(&Null)?),
        })
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new(*self.private.clone());
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| CertGenError::Signing(e.to_string()))?;
        Ok(signature.to_vec())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &"rsa")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::signature::Verifier;

    #[test]
    fn test_pkcs1_export_import() {
        let key = KeyPair::generate_rsa(RSA_KEY_BITS).unwrap();
        assert_eq!(key.bits(), RSA_KEY_BITS);

        let der = key.to_pkcs1_der().unwrap();
        let imported = KeyPair::from_pkcs1_der(&der).unwrap();
        assert_eq!(key.public_key(), imported.public_key());
        assert_eq!(key.spki_der().unwrap(), imported.spki_der().unwrap());
    }

    #[test]
    fn test_sign_data_verifies() {
        let key = KeyPair::generate_rsa(RSA_KEY_BITS).unwrap();
        let signature = key.sign_data(b"to be signed").unwrap();

        let verifying_key = VerifyingKey::<Sha256>::new(key.public_key().clone());
        let signature = Signature::try_from(signature.as_slice()).unwrap();
        assert!(verifying_key.verify(b"to be signed", &signature).is_ok());
        assert!(verifying_key.verify(b"tampered", &signature).is_err());
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(KeyPair::from_pkcs1_der(b"not a key").is_err());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = KeyPair::generate_rsa(RSA_KEY_BITS).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("2048"));
        assert!(!debug.contains("private"));
    }
}
