use thiserror::Error;

/// All errors that can occur in twofabackup.
#[derive(Debug, Error)]
pub enum TwoFaError {
    // --- Store errors ---
    #[error("Service '{0}' already exists in the vault")]
    DuplicateServiceName(String),

    #[error("Vault database unavailable: {0}")]
    StoreUnavailable(String),

    #[error("The vault is empty: add new entries first")]
    EmptyVault,

    #[error("Stored entry '{0}' is damaged and cannot be shown")]
    CorruptRecord(String),

    // --- Crypto errors ---
    #[error("Invalid key! #001 (not a well-formed vault key)")]
    InvalidKey,

    #[error("Invalid key! #002 (wrong key or corrupted data)")]
    AuthenticationFailure,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Input / config errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl From<rusqlite::Error> for TwoFaError {
    fn from(err: rusqlite::Error) -> Self {
        TwoFaError::StoreUnavailable(err.to_string())
    }
}

/// Convenience type alias for twofabackup results.
pub type Result<T> = std::result::Result<T, TwoFaError>;
