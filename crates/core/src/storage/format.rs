use crate::errors::CoreError;

use super::encryption::{KdfParams, SealedPayload};

/// Magic bytes identifying a sealed investment store.
pub const MAGIC: &[u8; 4] = b"INVK";

/// Current envelope version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_SIZE: usize = 54;

/// Encode a sealed payload into the on-disk envelope.
///
/// ```text
/// [INVK: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
pub fn encode(payload: &SealedPayload) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf.extend_from_slice(&payload.kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&payload.kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&payload.kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&payload.salt);
    buf.extend_from_slice(&payload.nonce);
    buf.extend_from_slice(&(payload.ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(&payload.ciphertext);
    buf
}

/// Decode an envelope, rejecting foreign files, future versions, truncated
/// data and KDF costs outside a sane range (a crafted file must not be able
/// to make us allocate gigabytes).
pub fn decode(data: &[u8]) -> Result<SealedPayload, CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a sealed investment store".into(),
        ));
    }
    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a sealed investment store".into(),
        ));
    }

    let mut cursor = Cursor { data, offset: 4 };
    let version = u16::from_le_bytes(cursor.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(cursor.take()?),
        time_cost: u32::from_le_bytes(cursor.take()?),
        parallelism: u32::from_le_bytes(cursor.take()?),
    };
    check_kdf_params(&kdf_params)?;

    let salt: [u8; 16] = cursor.take()?;
    let nonce: [u8; 12] = cursor.take()?;
    let ciphertext_len = u64::from_le_bytes(cursor.take()?) as usize;

    let remaining = data.len() - cursor.offset;
    if remaining < ciphertext_len {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {ciphertext_len} bytes of ciphertext, got {remaining}"
        )));
    }
    let ciphertext = data[cursor.offset..cursor.offset + ciphertext_len].to_vec();

    Ok(SealedPayload {
        kdf_params,
        salt,
        nonce,
        ciphertext,
    })
}

fn check_kdf_params(params: &KdfParams) -> Result<(), CoreError> {
    if !(8..=1_048_576).contains(&params.memory_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF memory_cost out of range: {} KiB",
            params.memory_cost
        )));
    }
    if !(1..=20).contains(&params.time_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF time_cost out of range: {}",
            params.time_cost
        )));
    }
    if !(1..=16).contains(&params.parallelism) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF parallelism out of range: {}",
            params.parallelism
        )));
    }
    Ok(())
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Cursor<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("Unexpected end of header".into()))?;
        self.offset = end;
        Ok(bytes)
    }
}
