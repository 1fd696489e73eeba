//! Credential loading.
//!
//! The token and account name are read from a dotenv file with the process
//! environment as fallback. Nothing here touches the network.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigurationError;

pub const TOKEN_KEY: &str = "GITHUB_TOKEN";
pub const ACCOUNT_KEY: &str = "GITHUB_USERNAME";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Identity used for every API call of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub account: String,
}

// Keep the token out of logs and panics.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("account", &self.account)
            .finish()
    }
}

/// A key-value store that credentials are resolved from.
pub trait CredentialSource {
    fn get(&self, key: &str) -> Option<String>;
}

impl CredentialSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Values parsed from a dotenv file, backed by the process environment.
#[derive(Debug, Default)]
pub struct EnvFileSource {
    values: HashMap<String, String>,
}

impl EnvFileSource {
    /// Reads `path` if it exists. The process environment is left untouched.
    pub fn from_path(path: &Path) -> Result<Self, ConfigurationError> {
        let env_err = |source| ConfigurationError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let iter = dotenvy::from_path_iter(path).map_err(env_err)?;
        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(env_err)?;
            values.insert(key, value);
        }

        debug!(path = %path.display(), keys = values.len(), "read env file");
        Ok(Self { values })
    }

    /// Like [`EnvFileSource::from_path`] but a missing file yields an empty source.
    pub fn from_optional_path(path: &Path) -> Result<Self, ConfigurationError> {
        match Self::from_path(path) {
            Err(ConfigurationError::EnvFile { source, .. }) if source.not_found() => {
                debug!(path = %path.display(), "no env file, using process environment");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Loads the file named on the command line, or `.env` when none was given.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self, ConfigurationError> {
        match explicit {
            Some(path) => Self::from_path(&path),
            None => Self::from_optional_path(Path::new(DEFAULT_ENV_FILE)),
        }
    }
}

impl CredentialSource for EnvFileSource {
    fn get(&self, key: &str) -> Option<String> {
        // An exported variable wins over the file, as with a non-overriding dotenv load.
        std::env::var(key)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.values.get(key).cloned())
    }
}

/// Resolves the token and account. Values are returned exactly as stored.
pub fn load(source: &impl CredentialSource) -> Result<Credentials, ConfigurationError> {
    let token = required(source, TOKEN_KEY)?;
    let account = required(source, ACCOUNT_KEY)?;
    Ok(Credentials { token, account })
}

fn required(
    source: &impl CredentialSource,
    key: &'static str,
) -> Result<String, ConfigurationError> {
    match source.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigurationError::MissingValue { key }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn load_returns_values_unchanged() {
        let src = source(&[(TOKEN_KEY, " ghp_abc "), (ACCOUNT_KEY, "PGSch")]);
        let creds = load(&src).unwrap();
        assert_eq!(creds.token, " ghp_abc ");
        assert_eq!(creds.account, "PGSch");
    }

    #[test]
    fn empty_token_is_rejected() {
        let src = source(&[(TOKEN_KEY, ""), (ACCOUNT_KEY, "PGSch")]);
        let err = load(&src).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingValue { key: TOKEN_KEY }));
    }

    #[test]
    fn absent_account_is_rejected() {
        let src = source(&[(TOKEN_KEY, "ghp_abc")]);
        let err = load(&src).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingValue { key: ACCOUNT_KEY }));
    }

    #[test]
    fn debug_hides_token() {
        let creds = Credentials {
            token: "ghp_secret".into(),
            account: "acct".into(),
        };
        assert!(!format!("{creds:?}").contains("ghp_secret"));
    }

    #[test]
    fn env_file_values_are_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "REPO_TRAFFIC_TEST_TOKEN=from_file").unwrap();
        writeln!(file, "REPO_TRAFFIC_TEST_ACCOUNT=someone").unwrap();

        let src = EnvFileSource::from_path(file.path()).unwrap();
        assert_eq!(src.get("REPO_TRAFFIC_TEST_TOKEN").as_deref(), Some("from_file"));
        assert_eq!(src.get("REPO_TRAFFIC_TEST_ACCOUNT").as_deref(), Some("someone"));
        assert_eq!(src.get("REPO_TRAFFIC_TEST_UNSET_KEY"), None);
    }

    #[test]
    fn exported_variable_beats_empty_file_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "REPO_TRAFFIC_TEST_SHELL_TOKEN=").unwrap();
        writeln!(file, "REPO_TRAFFIC_TEST_FILE_ONLY=kept").unwrap();
        // SAFETY: the key is unique to this test and nothing else reads it.
        unsafe { std::env::set_var("REPO_TRAFFIC_TEST_SHELL_TOKEN", "ghp_from_shell") };

        let src = EnvFileSource::from_path(file.path()).unwrap();
        assert_eq!(
            src.get("REPO_TRAFFIC_TEST_SHELL_TOKEN").as_deref(),
            Some("ghp_from_shell")
        );
        assert_eq!(src.get("REPO_TRAFFIC_TEST_FILE_ONLY").as_deref(), Some("kept"));
    }

    #[test]
    fn missing_optional_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let src = EnvFileSource::from_optional_path(&dir.path().join(".env")).unwrap();
        assert_eq!(src.get("REPO_TRAFFIC_TEST_UNSET_KEY"), None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EnvFileSource::from_path(&dir.path().join("nope.env")).unwrap_err();
        assert!(matches!(err, ConfigurationError::EnvFile { .. }));
    }
}
