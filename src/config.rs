// Service descriptors and the explicit client configuration assembled
// once at program entry.

use crate::api::AuthScheme;
use crate::credentials::{CredentialStore, Credentials};
use crate::error::{ClientError, Result};

/// Static facts about one remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceProfile {
    pub name: &'static str,
    pub default_base_url: &'static str,
    pub api_key_var: &'static str,
    pub base_url_var: &'static str,
    /// Directory under `~/.config` holding `credentials.json`.
    pub config_dir: &'static str,
    pub auth: AuthScheme,
}

pub static AINEWS: ServiceProfile = ServiceProfile {
    name: "AI News",
    default_base_url: "https://ymoltinator.com/api",
    api_key_var: "AINEWS_API_KEY",
    base_url_var: "AINEWS_BASE_URL",
    config_dir: "ainews",
    auth: AuthScheme::ApiKeyHeader,
};

pub static MOLTBOOK: ServiceProfile = ServiceProfile {
    name: "Moltbook",
    default_base_url: "https://www.moltbook.com/api/v1",
    api_key_var: "MOLTBOOK_API_KEY",
    base_url_var: "MOLTBOOK_BASE_URL",
    config_dir: "moltbook",
    auth: AuthScheme::Bearer,
};

/// Everything a service client needs to know about who it is and where
/// it talks to. Built once and passed by value into the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub display_name: Option<String>,
}

impl ClientConfig {
    pub fn for_service(profile: &ServiceProfile) -> Self {
        ClientConfig {
            api_key: None,
            base_url: profile.default_base_url.to_string(),
            display_name: None,
        }
    }

    /// Apply overrides from the process environment.
    pub fn from_env(profile: &ServiceProfile) -> Self {
        Self::from_lookup(profile, |var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(profile: &ServiceProfile, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        Self::for_service(profile)
            .with_base_url(read(profile.base_url_var))
            .with_api_key(read(profile.api_key_var))
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        if name.is_some() {
            self.display_name = name;
        }
        self
    }

    /// Fill in whatever is still unset from a stored identity. Explicit
    /// and environment values always win.
    pub fn merge_credentials(mut self, creds: &Credentials) -> Self {
        if self.api_key.is_none() && !creds.api_key.is_empty() {
            self.api_key = Some(creds.api_key.clone());
        }
        if self.display_name.is_none() && !creds.account_name.is_empty() {
            self.display_name = Some(creds.account_name.clone());
        }
        self
    }

    /// Merge the identity held by `store`. A missing file is only an
    /// error when `required` is set and no key came from elsewhere; a
    /// malformed file is always reported so the caller can re-register.
    pub fn with_stored_identity(self, store: &CredentialStore, required: bool) -> Result<Self> {
        match store.load() {
            Ok(creds) => Ok(self.merge_credentials(&creds)),
            Err(ClientError::NotFound(_)) if !required || self.api_key.is_some() => Ok(self),
            Err(err) => Err(err),
        }
    }
}
