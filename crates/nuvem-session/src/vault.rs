//! Encrypted at-rest storage for the session credential.
//!
//! The vault is a single file: magic, format version, Argon2id salt, AES
//! nonce, then the AES-256-GCM ciphertext of the JSON-serialized session.
//! The key is derived from a passphrase per save, with a fresh salt and
//! nonce every time; nothing from a previous write is reused.

use std::fs;
use std::path::{Path, PathBuf};

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nuvem_core::config::SessionConfig;
use nuvem_core::{ApiError, ApiResult};
use nuvem_entity::UserProfile;

const MAGIC: &[u8; 4] = b"NUVM";
const FORMAT_VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC.len() + 1 + SALT_LEN + NONCE_LEN;

/// The persisted session payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The authenticated user's profile.
    pub profile: UserProfile,
    /// Bearer credential for API calls.
    pub bearer_token: String,
}

/// File-backed encrypted session store.
#[derive(Debug, Clone)]
pub struct SessionVault {
    path: PathBuf,
}

impl SessionVault {
    /// Vault at the configured path.
    pub fn new(config: &SessionConfig) -> Self {
        Self::open(&config.vault_path)
    }

    /// Vault at an explicit path.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Encrypt and persist a session, replacing any previous vault file.
    pub fn save(&self, session: &StoredSession, passphrase: &str) -> ApiResult<()> {
        let plaintext = serde_json::to_vec(session)?;

        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let key = derive_key(passphrase, &salt)?;
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| ApiError::session(format!("Cipher init failed: {e}")))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_ref())
            .map_err(|_| ApiError::session("Session encryption failed"))?;

        let mut contents = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        contents.extend_from_slice(MAGIC);
        contents.push(FORMAT_VERSION);
        contents.extend_from_slice(&salt);
        contents.extend_from_slice(&nonce_bytes);
        contents.extend_from_slice(&ciphertext);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        info!(path = %self.path.display(), "Session vault written");
        Ok(())
    }

    /// Decrypt the stored session. Returns `None` when no vault exists;
    /// a corrupt vault or wrong passphrase is an error, never `None`.
    pub fn load(&self, passphrase: &str) -> ApiResult<Option<StoredSession>> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No session vault present");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if contents.len() < HEADER_LEN || &contents[..MAGIC.len()] != MAGIC {
            return Err(ApiError::session("Session vault is corrupt"));
        }
        let version = contents[MAGIC.len()];
        if version != FORMAT_VERSION {
            return Err(ApiError::session(format!(
                "Unsupported session vault version {version}"
            )));
        }

        let salt_start = MAGIC.len() + 1;
        let nonce_start = salt_start + SALT_LEN;
        let salt = &contents[salt_start..nonce_start];
        let nonce = &contents[nonce_start..HEADER_LEN];
        let ciphertext = &contents[HEADER_LEN..];

        let key = derive_key(passphrase, salt)?;
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| ApiError::session(format!("Cipher init failed: {e}")))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| ApiError::session("Wrong passphrase or corrupt session vault"))?;

        let session = serde_json::from_slice(&plaintext)?;
        Ok(Some(session))
    }

    /// Remove the vault file. Succeeds when no vault exists.
    pub fn clear(&self) -> ApiResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Session vault cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn derive_key(passphrase: &str, salt: &[u8]) -> ApiResult<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| ApiError::session(format!("Key derivation failed: {e}")))?;
    Ok(key)
}
