//! PEM armor for X25519 keys.
//!
//! Public keys are written as RFC 8410 `SubjectPublicKeyInfo` under a
//! `PUBLIC KEY` label, secrets as unencrypted PKCS#8 under `PRIVATE KEY`.
//! Both are what `openssl pkey` reads for X25519.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{X25519PublicKey, X25519StaticSecret};
use crate::error::{KeysError, Result};

pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// SEQUENCE { SEQUENCE { OID 1.3.101.110 }, BIT STRING } up to the key.
const SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x6e, 0x03, 0x21, 0x00,
];

/// SEQUENCE { INTEGER 0, SEQUENCE { OID 1.3.101.110 }, OCTET STRING { OCTET STRING } }
/// up to the key.
const PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x6e, 0x04, 0x22, 0x04,
    0x20,
];

const LINE_WIDTH: usize = 64;

/// Wrap DER bytes in PEM armor with the given label.
pub fn encode(label: &str, der: &[u8]) -> Zeroizing<String> {
    let body = Zeroizing::new(STANDARD.encode(der));
    let mut out = Zeroizing::new(String::with_capacity(body.len() + body.len() / LINE_WIDTH + 64));

    out.push_str("-----BEGIN ");
    out.push_str(label);
    out.push_str("-----\n");
    for (i, c) in body.chars().enumerate() {
        if i > 0 && i % LINE_WIDTH == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    out.push_str("\n-----END ");
    out.push_str(label);
    out.push_str("-----\n");
    out
}

/// Strip PEM armor with the given label and return the DER bytes.
pub fn decode(label: &str, pem: &str) -> Result<Zeroizing<Vec<u8>>> {
    let begin = format!("-----BEGIN {}-----", label);
    let end = format!("-----END {}-----", label);

    let body = pem
        .trim()
        .strip_prefix(begin.as_str())
        .and_then(|rest| rest.strip_suffix(end.as_str()))
        .ok_or_else(|| KeysError::Decoding(format!("expected a {} block", label)))?;

    let compact: Zeroizing<String> =
        Zeroizing::new(body.chars().filter(|c| !c.is_ascii_whitespace()).collect());
    STANDARD
        .decode(compact.as_bytes())
        .map(Zeroizing::new)
        .map_err(|e| KeysError::Decoding(e.to_string()))
}

fn split_der<'a>(der: &'a [u8], prefix: &[u8], what: &str) -> Result<&'a [u8]> {
    match der.strip_prefix(prefix) {
        Some(key) if key.len() == 32 => Ok(key),
        _ => Err(KeysError::Decoding(format!("not an X25519 {}", what))),
    }
}

impl X25519PublicKey {
    /// `SubjectPublicKeyInfo` PEM.
    pub fn to_pem(&self) -> String {
        let mut der = Vec::with_capacity(SPKI_PREFIX.len() + 32);
        der.extend_from_slice(&SPKI_PREFIX);
        der.extend_from_slice(self.as_bytes());
        encode(PUBLIC_KEY_LABEL, &der).as_str().to_owned()
    }

    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = decode(PUBLIC_KEY_LABEL, pem)?;
        let key = split_der(&der, &SPKI_PREFIX, "public key")?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(key);
        Ok(Self::from_bytes(bytes))
    }
}

impl X25519StaticSecret {
    /// Unencrypted PKCS#8 PEM. The returned text is wiped on drop.
    pub fn to_pkcs8_pem(&self) -> Zeroizing<String> {
        let secret = Zeroizing::new(self.to_bytes());
        let mut der = Zeroizing::new(Vec::with_capacity(PKCS8_PREFIX.len() + 32));
        der.extend_from_slice(&PKCS8_PREFIX);
        der.extend_from_slice(secret.as_slice());
        encode(PRIVATE_KEY_LABEL, &der)
    }

    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        let der = decode(PRIVATE_KEY_LABEL, pem)?;
        let key = split_der(&der, &PKCS8_PREFIX, "private key")?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(key);
        let secret = Self::from_bytes(bytes);
        bytes.zeroize();
        Ok(secret)
    }
}
