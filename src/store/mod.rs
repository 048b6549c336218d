//! Storage layer (string-keyed key-value store).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage keys as constants.
pub mod keys {
    /// Snapshot of the signed-in user (JSON object)
    pub const CURRENT_USER: &str = "studio_user";
    /// Session token (JWT string)
    pub const SESSION_TOKEN: &str = "studio_session";
    /// All registered users (JSON array)
    pub const USER_DIRECTORY: &str = "studio_users_db";
}

/// Synchronous, string-keyed storage surviving restarts.
///
/// The stand-in for a browser origin's local storage: no transactions, no
/// uniqueness constraints, shared mutable state between any processes that
/// open the same backing store. Backend failures are arbitrary, so methods
/// return `anyhow::Result`; callers map them into their own error types.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is not
    /// an error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}
