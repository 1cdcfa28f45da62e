//! Storage engine configuration.

use rocksdb::Options;

/// Default limit on open files (`-1` lets RocksDB keep every file open).
pub const DEFAULT_MAX_OPEN_FILES: i32 = -1;

/// Options for opening a data directory.
///
/// # Example
///
/// ```rust
/// use nebula_dump_core::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert!(config.read_only);
///
/// let ingest = EngineConfig::writable();
/// assert!(!ingest.read_only);
/// assert!(ingest.create_if_missing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Open with `DB::open_for_read_only` (default: true).
    pub read_only: bool,
    /// Create the store if the directory is empty (default: false).
    pub create_if_missing: bool,
    /// Maximum open files (default: -1, unlimited).
    pub max_open_files: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            read_only: true,
            create_if_missing: false,
            max_open_files: DEFAULT_MAX_OPEN_FILES,
        }
    }
}

impl EngineConfig {
    /// Read-write, creating the store if needed. Used for SST ingest and
    /// export destinations.
    pub fn writable() -> Self {
        Self {
            read_only: false,
            create_if_missing: true,
            ..Self::default()
        }
    }

    pub(crate) fn db_options(&self) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(self.create_if_missing && !self.read_only);
        opts.set_max_open_files(self.max_open_files);
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_read_only() {
        let config = EngineConfig::default();
        assert!(config.read_only);
        assert!(!config.create_if_missing);
        assert_eq!(config.max_open_files, DEFAULT_MAX_OPEN_FILES);
    }

    #[test]
    fn test_writable() {
        let config = EngineConfig::writable();
        assert!(!config.read_only);
        assert!(config.create_if_missing);
        assert_eq!(config.max_open_files, DEFAULT_MAX_OPEN_FILES);
    }
}
