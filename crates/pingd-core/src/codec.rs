//! Job record codec.
//!
//! Records are stored as `hex(nonce || ciphertext || tag)` where the
//! ciphertext is the AES-256-GCM encryption of the job's JSON encoding.
//! Every call to [`JobCodec::encrypt`] draws a fresh 12-byte nonce from the OS
//! RNG. Nonces are never reused or fixed.

use std::fmt;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};

use pingd_protocols::JobConfig;

use crate::error::CodecError;

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Process-wide 256-bit secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Use exactly 32 raw bytes as the key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CodecError::InvalidKeyLength(bytes.len()))?;
        Ok(Self(key))
    }

    /// Parse a configured key: 64 hex digits, or 32 raw characters.
    pub fn from_config_str(value: &str) -> Result<Self, CodecError> {
        if value.len() == KEY_LEN * 2 && value.chars().all(|c| c.is_ascii_hexdigit()) {
            let bytes = hex::decode(value)?;
            return Self::from_bytes(&bytes);
        }
        Self::from_bytes(value.as_bytes())
    }

    /// Generate a random key from the OS RNG.
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(key.as_slice());
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Encrypts and decrypts job records under one key.
#[derive(Clone)]
pub struct JobCodec {
    cipher: Aes256Gcm,
}

impl JobCodec {
    pub fn new(key: &SecretKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Serialize and encrypt a job config into its at-rest form.
    pub fn encrypt(&self, config: &JobConfig) -> Result<String, CodecError> {
        let plaintext = serde_json::to_vec(config).map_err(CodecError::Serialize)?;
        self.seal(&plaintext)
    }

    /// Decode, authenticate, decrypt and deserialize an at-rest record.
    pub fn decrypt(&self, data: &str) -> Result<JobConfig, CodecError> {
        let plaintext = self.open(data)?;
        serde_json::from_slice(&plaintext).map_err(CodecError::Deserialize)
    }

    fn seal(&self, plaintext: &[u8]) -> Result<String, CodecError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| CodecError::Encrypt)?;

        let mut record = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        record.extend_from_slice(&nonce);
        record.extend_from_slice(&ciphertext);
        Ok(hex::encode(record))
    }

    fn open(&self, data: &str) -> Result<Vec<u8>, CodecError> {
        let bytes = hex::decode(data.trim())?;
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(CodecError::Truncated(bytes.len()));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::Authentication)
    }
}

impl fmt::Debug for JobCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobCodec").finish_non_exhaustive()
    }
}

/// Encrypt `config` under `key`.
pub fn encrypt(key: &SecretKey, config: &JobConfig) -> Result<String, CodecError> {
    JobCodec::new(key).encrypt(config)
}

/// Decrypt a record produced by [`encrypt`] under the same key.
pub fn decrypt(key: &SecretKey, data: &str) -> Result<JobConfig, CodecError> {
    JobCodec::new(key).decrypt(data)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
