//! Local credential store with argon2-hashed PINs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use keygate_core::{validate_pin, validate_username, FieldError};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::lockout::{describe, LockoutPolicy};

/// On-disk record for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    /// Argon2id PHC string
    hash: String,
    #[serde(default)]
    failed_attempts: u32,
    /// Unix epoch seconds
    #[serde(default)]
    last_failed_attempt: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    users: BTreeMap<String, UserRecord>,
}

/// Credential store errors
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Identical for unknown users and wrong PINs
    #[error("Invalid username or PIN")]
    InvalidCredentials,

    #[error("Too many failed attempts. Try again in {0}")]
    LockedOut(String),

    #[error("User {0} is already enrolled")]
    AlreadyEnrolled(String),

    #[error("New PIN must differ from the current PIN")]
    PinUnchanged,

    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("Failed to hash PIN: {0}")]
    Hash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Username → PIN hash store backed by a JSON file
pub struct CredentialStore {
    path: PathBuf,
    file: CredentialFile,
    lockout: LockoutPolicy,
    params: Params,
    /// Verified against for unknown users so both paths cost one argon2 run
    decoy_hash: String,
}

impl CredentialStore {
    /// Load the store at `path`; a missing file is an empty store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        Self::load_with(path, Params::default(), LockoutPolicy::default())
    }

    /// Load with explicit hashing parameters and lockout policy
    pub fn load_with(
        path: impl Into<PathBuf>,
        params: Params,
        lockout: LockoutPolicy,
    ) -> Result<Self, CredentialError> {
        let path = path.into();
        let file = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            tracing::info!("No credential file at {:?}, starting empty", path);
            CredentialFile::default()
        };

        let decoy_hash = hash_with(&params, "00000")?;

        Ok(Self {
            path,
            file,
            lockout,
            params,
            decoy_hash,
        })
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a user is enrolled
    pub fn contains(&self, username: &str) -> bool {
        self.file.users.contains_key(username)
    }

    /// Number of enrolled users
    pub fn len(&self) -> usize {
        self.file.users.len()
    }

    /// True when nobody is enrolled
    pub fn is_empty(&self) -> bool {
        self.file.users.is_empty()
    }

    /// Add a new user
    pub fn enroll(&mut self, username: &str, pin: &str) -> Result<(), CredentialError> {
        validate_username(username)?;
        validate_pin(pin)?;

        if self.contains(username) {
            return Err(CredentialError::AlreadyEnrolled(username.to_string()));
        }

        let hash = self.hash_pin(pin)?;
        self.file.users.insert(
            username.to_string(),
            UserRecord {
                hash,
                failed_attempts: 0,
                last_failed_attempt: None,
            },
        );
        self.save()?;

        tracing::info!(username, "Enrolled user");
        Ok(())
    }

    /// Check a username/PIN pair, applying lockout bookkeeping
    pub fn verify(&mut self, username: &str, pin: &str) -> Result<(), CredentialError> {
        let now = chrono::Utc::now().timestamp();

        let Some(record) = self.file.users.get_mut(username) else {
            std::hint::black_box(pin_matches(&self.decoy_hash, pin));
            tracing::warn!(username, "Login attempt for unknown user");
            return Err(CredentialError::InvalidCredentials);
        };

        if let Some(remaining) = Self::lockout_for(&self.lockout, record, now) {
            return Err(CredentialError::LockedOut(describe(remaining)));
        }

        if pin_matches(&record.hash, pin) {
            record.failed_attempts = 0;
            record.last_failed_attempt = None;
            self.save()?;
            return Ok(());
        }

        record.failed_attempts += 1;
        record.last_failed_attempt = Some(now);
        let failed = record.failed_attempts;
        let locked = Self::lockout_for(&self.lockout, record, now);
        self.save()?;

        tracing::warn!(username, failed, "PIN verification failed");

        match locked {
            Some(remaining) => Err(CredentialError::LockedOut(describe(remaining))),
            None => Err(CredentialError::InvalidCredentials),
        }
    }

    /// Replace a user's PIN after verifying the current one
    pub fn change_pin(
        &mut self,
        username: &str,
        current_pin: &str,
        new_pin: &str,
    ) -> Result<(), CredentialError> {
        validate_pin(new_pin)?;
        if current_pin == new_pin {
            return Err(CredentialError::PinUnchanged);
        }

        self.verify(username, current_pin)?;

        let hash = self.hash_pin(new_pin)?;
        if let Some(record) = self.file.users.get_mut(username) {
            record.hash = hash;
        }
        self.save()?;

        tracing::info!(username, "PIN changed");
        Ok(())
    }

    /// Attempts left before lockout, `None` for unknown users
    pub fn attempts_remaining(&self, username: &str) -> Option<u32> {
        self.file
            .users
            .get(username)
            .map(|r| self.lockout.attempts_remaining(r.failed_attempts))
    }

    /// Remaining lockout for a user, if any
    pub fn lockout_remaining(&self, username: &str) -> Option<std::time::Duration> {
        let record = self.file.users.get(username)?;
        Self::lockout_for(&self.lockout, record, chrono::Utc::now().timestamp())
    }

    fn lockout_for(
        policy: &LockoutPolicy,
        record: &UserRecord,
        now: i64,
    ) -> Option<std::time::Duration> {
        let last = record.last_failed_attempt?;
        policy.remaining(record.failed_attempts, last, now)
    }

    fn hash_pin(&self, pin: &str) -> Result<String, CredentialError> {
        hash_with(&self.params, pin)
    }

    fn save(&self) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.file)?;
        fs::write(&self.path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

fn hash_with(params: &Params, pin: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());
    let pin_bytes = Zeroizing::new(pin.as_bytes().to_vec());

    argon2
        .hash_password(&pin_bytes, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Verify a PIN against a PHC string; parameters come from the hash itself
fn pin_matches(hash: &str, pin: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => {
            let pin_bytes = Zeroizing::new(pin.as_bytes().to_vec());
            Argon2::default()
                .verify_password(&pin_bytes, &parsed)
                .is_ok()
        }
        Err(e) => {
            tracing::error!("Stored hash is unreadable: {}", e);
            false
        }
    }
}

/// Cheap argon2 parameters so tests don't spend seconds hashing
#[cfg(test)]
pub(crate) fn test_params() -> Params {
    Params::new(1024, 1, 1, None).expect("valid argon2 params")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> CredentialStore {
        CredentialStore::load_with(
            dir.join("credentials.json"),
            test_params(),
            LockoutPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_enroll_and_verify() {
        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());

        store.enroll("alice", "12345").unwrap();
        assert!(store.contains("alice"));
        assert!(store.verify("alice", "12345").is_ok());
        assert!(matches!(
            store.verify("alice", "54321"),
            Err(CredentialError::InvalidCredentials)
        ));
        assert_eq!(store.attempts_remaining("alice"), Some(3));
    }

    #[test]
    fn test_enroll_validates_input() {
        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());

        assert!(matches!(
            store.enroll("  ", "12345"),
            Err(CredentialError::Validation(FieldError::Required { .. }))
        ));
        assert!(matches!(
            store.enroll("bob", "1234"),
            Err(CredentialError::Validation(FieldError::Format { .. }))
        ));

        store.enroll("bob", "11111").unwrap();
        assert!(matches!(
            store.enroll("bob", "22222"),
            Err(CredentialError::AlreadyEnrolled(_))
        ));
    }

    #[test]
    fn test_unknown_user() {
        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());

        let err = store.verify("mallory", "12345").unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or PIN");
        assert_eq!(store.attempts_remaining("mallory"), None);
    }

    #[test]
    fn test_unknown_user_indistinguishable_from_wrong_pin() {
        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());
        store.enroll("alice", "12345").unwrap();

        let known = store.verify("alice", "99999").unwrap_err().to_string();
        let unknown = store.verify("mallory", "99999").unwrap_err().to_string();
        assert_eq!(known, unknown);

        // Decoy hash is a real argon2 hash, so the unknown path does the same work
        assert!(PasswordHash::new(&store.decoy_hash).is_ok());
        assert!(!pin_matches(&store.decoy_hash, "99999"));
    }

    #[test]
    fn test_lockout_after_repeated_failures() {
        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());
        store.enroll("carol", "24680").unwrap();

        for _ in 0..3 {
            assert!(matches!(
                store.verify("carol", "00000"),
                Err(CredentialError::InvalidCredentials)
            ));
        }
        assert_eq!(store.attempts_remaining("carol"), Some(1));

        assert!(matches!(
            store.verify("carol", "00000"),
            Err(CredentialError::LockedOut(_))
        ));
        // Correct PIN is refused while locked
        assert!(matches!(
            store.verify("carol", "24680"),
            Err(CredentialError::LockedOut(_))
        ));
        assert!(store.lockout_remaining("carol").is_some());
    }

    #[test]
    fn test_success_resets_counter() {
        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());
        store.enroll("dave", "13579").unwrap();

        let _ = store.verify("dave", "00000");
        let _ = store.verify("dave", "00000");
        assert_eq!(store.attempts_remaining("dave"), Some(2));

        store.verify("dave", "13579").unwrap();
        assert_eq!(store.attempts_remaining("dave"), Some(4));
    }

    #[test]
    fn test_change_pin() {
        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());
        store.enroll("erin", "11111").unwrap();

        assert!(matches!(
            store.change_pin("erin", "11111", "11111"),
            Err(CredentialError::PinUnchanged)
        ));
        assert!(store.change_pin("erin", "99999", "22222").is_err());

        store.change_pin("erin", "11111", "22222").unwrap();
        assert!(store.verify("erin", "22222").is_ok());
        assert!(store.verify("erin", "11111").is_err());
    }

    #[test]
    fn test_persists_across_loads() {
        let temp_dir = tempdir().unwrap();
        {
            let mut store = store_in(temp_dir.path());
            store.enroll("frank", "31415").unwrap();
            let _ = store.verify("frank", "00000");
        }

        let mut reloaded = store_in(temp_dir.path());
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.attempts_remaining("frank"), Some(3));
        assert!(reloaded.verify("frank", "31415").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let mut store = store_in(temp_dir.path());
        store.enroll("gina", "27182").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
