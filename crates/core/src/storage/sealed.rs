use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

use super::backend::KeyValueBackend;
use super::encryption::{self, KdfParams};
use super::format;

/// Password-protected key-value file.
///
/// Flow on write: map → bincode → AES-256-GCM(Argon2id(password)) → envelope bytes.
/// Every write draws a fresh salt and nonce.
pub struct SealedFileBackend {
    path: PathBuf,
    password: String,
    kdf_params: KdfParams,
}

impl std::fmt::Debug for SealedFileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedFileBackend")
            .field("path", &self.path)
            .field("kdf_params", &self.kdf_params)
            .finish_non_exhaustive()
    }
}

impl SealedFileBackend {
    pub fn new(path: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self::with_kdf_params(path, password, KdfParams::default())
    }

    pub fn with_kdf_params(
        path: impl Into<PathBuf>,
        password: impl Into<String>,
        kdf_params: KdfParams,
    ) -> Self {
        Self {
            path: path.into(),
            password: password.into(),
            kdf_params,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-encrypt the whole file under a new password.
    pub fn change_password(&mut self, new_password: impl Into<String>) -> Result<(), CoreError> {
        let document = self.read_document()?;
        self.password = new_password.into();
        self.write_document(&document)
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, CoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        let payload = format::decode(&bytes)?;
        let plaintext = encryption::open(&payload, &self.password)?;
        bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to decode sealed store: {e}")))
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), CoreError> {
        let plaintext = bincode::serialize(document)?;
        let payload = encryption::seal(&plaintext, &self.password, self.kdf_params)?;
        std::fs::write(&self.path, format::encode(&payload))?;
        Ok(())
    }
}

impl KeyValueBackend for SealedFileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CoreError> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.write_document(&document)
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}
