// Credential persistence: one pretty-printed JSON file per service.
//
// The file is owned by a single invocation at a time. There is no locking,
// so two processes writing at once can interleave and the last one wins.

use crate::config::ServiceProfile;
use crate::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Identity issued at registration. Older files written by other tools
/// used service-specific key names, accepted here as aliases.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Credentials {
    pub api_key: String,
    #[serde(alias = "journalist_name", alias = "agent_name")]
    pub account_name: String,
    #[serde(default, alias = "journalist_id", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_url: Option<String>,
    /// Social handle bound during verification.
    #[serde(default, alias = "twitter_handle", skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

impl Credentials {
    /// Fresh, unverified identity stamped with the current time.
    pub fn new(api_key: impl Into<String>, account_name: impl Into<String>, base_url: &str) -> Self {
        Credentials {
            api_key: api_key.into(),
            account_name: account_name.into(),
            account_id: None,
            verification_code: None,
            verified: false,
            registered_at: Utc::now(),
            base_url: base_url.to_string(),
            claim_url: None,
            handle: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    /// `~/.config/<service>/credentials.json`, falling back to the
    /// current directory when no home directory can be found.
    pub fn for_service(profile: &ServiceProfile) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(
            home.join(".config")
                .join(profile.config_dir)
                .join("credentials.json"),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<Credentials> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ClientError::NotFound(self.path.clone()))
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&text).map_err(|source| ClientError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the file, creating parent directories as needed.
    pub fn save(&self, creds: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = serde_json::to_string_pretty(creds)?;
        text.push('\n');
        fs::write(&self.path, text)?;
        info!(path = %self.path.display(), account = %creds.account_name, "saved credentials");
        Ok(())
    }

    /// Load, let `apply` change what it needs, write back. Untouched
    /// fields keep their stored values.
    pub fn update<F>(&self, apply: F) -> Result<Credentials>
    where
        F: FnOnce(&mut Credentials),
    {
        let mut creds = self.load()?;
        apply(&mut creds);
        self.save(&creds)?;
        Ok(creds)
    }
}
