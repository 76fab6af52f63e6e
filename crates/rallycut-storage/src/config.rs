//! Storage configuration, read once at construction.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{StorageError, StorageResult};

/// Default blob container name.
pub const DEFAULT_CONTAINER: &str = "volleyball-videos";
/// Default blob prefix for inputs.
pub const DEFAULT_INPUT_FOLDER: &str = "inputs";
/// Default blob prefix for outputs.
pub const DEFAULT_OUTPUT_FOLDER: &str = "processed";
/// Default base directory for local mode.
pub const DEFAULT_UPLOADS_DIR: &str = "./uploads";
/// Default lifetime of signed read URLs (60 minutes).
pub const DEFAULT_SAS_TTL: Duration = Duration::from_secs(60 * 60);

/// Storage sink configuration.
///
/// Blob mode is selected by the presence of `connection_string`.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Azure storage connection string; `None` selects local-disk mode.
    pub connection_string: Option<String>,
    /// Blob container name.
    pub container: String,
    /// Blob name prefix for inputs.
    pub input_folder: String,
    /// Blob name prefix for outputs.
    pub output_folder: String,
    /// Base directory for local artifacts and staging.
    pub uploads_dir: PathBuf,
    /// Lifetime of signed read URLs.
    pub sas_ttl: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            container: DEFAULT_CONTAINER.to_string(),
            input_folder: DEFAULT_INPUT_FOLDER.to_string(),
            output_folder: DEFAULT_OUTPUT_FOLDER.to_string(),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            sas_ttl: DEFAULT_SAS_TTL,
        }
    }
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            connection_string: std::env::var("AZURE_STORAGE_CONNECTION_STRING")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            container: std::env::var("AZURE_STORAGE_CONTAINER")
                .unwrap_or(defaults.container),
            input_folder: std::env::var("AZURE_STORAGE_INPUT_FOLDER")
                .unwrap_or(defaults.input_folder),
            output_folder: std::env::var("AZURE_STORAGE_OUTPUT_FOLDER")
                .unwrap_or(defaults.output_folder),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            sas_ttl: defaults.sas_ttl,
        }
    }
}

/// Account name and key extracted from a connection string.
#[derive(Debug, Clone)]
pub(crate) struct AccountCredentials {
    pub account: String,
    pub key: String,
}

/// Pull `AccountName` and `AccountKey` out of an Azure connection string.
///
/// The raw key is needed for SAS signing, which the SDK's credential type
/// does not hand back.
pub(crate) fn parse_connection_string(conn: &str) -> StorageResult<AccountCredentials> {
    let mut account = None;
    let mut key = None;

    for part in conn.split(';') {
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        match name.trim() {
            "AccountName" => account = Some(value.trim().to_string()),
            // The key is base64 and may itself contain '='.
            "AccountKey" => key = Some(value.trim().to_string()),
            _ => {}
        }
    }

    match (account, key) {
        (Some(account), Some(key)) if !account.is_empty() && !key.is_empty() => {
            Ok(AccountCredentials { account, key })
        }
        _ => Err(StorageError::config_error(
            "connection string must contain AccountName= and AccountKey=",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert!(config.connection_string.is_none());
        assert_eq!(config.container, "volleyball-videos");
        assert_eq!(config.input_folder, "inputs");
        assert_eq!(config.output_folder, "processed");
        assert_eq!(config.uploads_dir, PathBuf::from("./uploads"));
        assert_eq!(config.sas_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_connection_string() {
        let creds = parse_connection_string(
            "DefaultEndpointsProtocol=https;AccountName=rallycut;AccountKey=a2V5cGFkZGluZw==;EndpointSuffix=core.windows.net",
        )
        .unwrap();
        assert_eq!(creds.account, "rallycut");
        // Trailing '=' padding survives the split.
        assert_eq!(creds.key, "a2V5cGFkZGluZw==");
    }

    #[test]
    fn test_parse_connection_string_missing_parts() {
        assert!(parse_connection_string("AccountName=rallycut").is_err());
        assert!(parse_connection_string("AccountKey=abc=").is_err());
        assert!(parse_connection_string("").is_err());
    }
}
