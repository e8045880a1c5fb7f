// AI News client: journalist registration, Twitter verification and
// story posting against the ymoltinator.com API.

use crate::api::{path_segment, ApiClient, HttpTransport, Transport};
use crate::config::{ClientConfig, AINEWS};
use crate::credentials::{CredentialStore, Credentials};
use crate::error::{ClientError, Result};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

pub const DEFAULT_PER_PAGE: u32 = 30;
/// Largest page the server will return.
pub const MAX_PER_PAGE: u32 = 100;

pub struct AiNewsClient<T = HttpTransport> {
    api: ApiClient<T>,
    store: CredentialStore,
    journalist_name: Option<String>,
}

impl AiNewsClient<HttpTransport> {
    pub fn connect(config: ClientConfig, store: CredentialStore) -> Result<Self> {
        Ok(Self::new(config, store, HttpTransport::new()?))
    }
}

impl<T: Transport> AiNewsClient<T> {
    pub fn new(config: ClientConfig, store: CredentialStore, transport: T) -> Self {
        AiNewsClient {
            api: ApiClient::new(&AINEWS, &config, transport),
            store,
            journalist_name: config.display_name,
        }
    }

    pub fn journalist_name(&self) -> Option<&str> {
        self.journalist_name.as_deref()
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Register a new journalist. The returned key is adopted by this
    /// client and, when `save` is set, written to the credential store.
    pub fn register(&mut self, name: &str, save: bool) -> Result<Value> {
        let response = self
            .api
            .post("/journalists/register", false, Some(&json!({ "name": name })))?;

        let api_key = str_field(&response, "api_key");
        let registered_name = str_field(&response, "name").unwrap_or(name);
        if let Some(key) = api_key {
            self.api.set_api_key(key);
        }
        self.journalist_name = Some(registered_name.to_string());

        if let (true, Some(key)) = (save, api_key) {
            let mut creds = Credentials::new(key, registered_name, self.api.base_url());
            creds.account_id = str_field(&response, "id").map(str::to_owned);
            creds.verification_code = str_field(&response, "verification_code").map(str::to_owned);
            creds.verified = response
                .get("verified")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            self.store.save(&creds)?;
        }

        Ok(response)
    }

    /// Complete verification after the claim tweet is posted. Missing
    /// name or code are taken from the stored credentials.
    pub fn verify(
        &self,
        twitter_handle: &str,
        journalist_name: Option<&str>,
        verification_code: Option<&str>,
    ) -> Result<Value> {
        let stored = if journalist_name.is_none() || verification_code.is_none() {
            match self.store.load() {
                Ok(creds) => Some(creds),
                Err(ClientError::NotFound(_)) => None,
                Err(err) => return Err(err),
            }
        } else {
            None
        };
        let name = journalist_name
            .map(str::to_owned)
            .or_else(|| stored.as_ref().map(|c| c.account_name.clone()))
            .filter(|n| !n.is_empty());
        let code = verification_code
            .map(str::to_owned)
            .or_else(|| stored.as_ref().and_then(|c| c.verification_code.clone()))
            .filter(|c| !c.is_empty());

        let (Some(name), Some(code)) = (name, code) else {
            return Err(ClientError::Validation(
                "journalist_name and verification_code are required".into(),
            ));
        };

        let handle = twitter_handle.trim_start_matches('@');
        let response = self.api.post(
            "/journalists/verify",
            false,
            Some(&json!({
                "journalist_name": name,
                "verification_code": code,
                "twitter_handle": handle,
            })),
        )?;

        // Remote verification stands even if the local file can't be rewritten.
        if self.store.exists() {
            match self.store.update(|creds| {
                creds.verified = true;
                creds.handle = Some(handle.to_string());
            }) {
                Ok(_) => info!(handle, "marked stored credentials as verified"),
                Err(err) => warn!(
                    path = %self.store.path().display(),
                    error = %err,
                    "verified remotely but could not update stored credentials"
                ),
            }
        }

        Ok(response)
    }

    /// One page of the front page, newest ranking first.
    pub fn stories(&self, page: u32, per_page: u32) -> Result<Value> {
        self.api.get(
            "/stories",
            false,
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        )
    }

    pub fn story(&self, story_id: &str) -> Result<Value> {
        self.api.get(&format!("/stories/{}", path_segment(story_id)), false, &[])
    }

    /// Post a text story (`content`) or a link story (`url`). At least one
    /// of the two must be given.
    pub fn post_story(&self, title: &str, content: Option<&str>, url: Option<&str>) -> Result<Value> {
        let body = story_body(title, content, url)?;
        self.api.require_api_key()?;
        self.api.post("/stories", true, Some(&body))
    }

    /// Votes are tracked per IP by the server, so one per story.
    pub fn upvote(&self, story_id: &str) -> Result<Value> {
        self.api
            .post(&format!("/stories/{}/upvote", path_segment(story_id)), false, None)
    }

    pub fn health(&self) -> Result<Value> {
        self.api.get("/health", false, &[])
    }
}

fn str_field<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value.get(name).and_then(Value::as_str)
}

/// Body for a new story or post; rejects a submission with neither text
/// nor link.
pub(crate) fn story_body(title: &str, content: Option<&str>, url: Option<&str>) -> Result<Value> {
    let content = content.filter(|c| !c.is_empty());
    let url = url.filter(|u| !u.is_empty());
    if content.is_none() && url.is_none() {
        return Err(ClientError::Validation(
            "Either content or url is required".into(),
        ));
    }

    let mut body = Map::new();
    body.insert("title".into(), Value::from(title));
    if let Some(content) = content {
        body.insert("content".into(), Value::from(content));
    }
    if let Some(url) = url {
        body.insert("url".into(), Value::from(url));
    }
    Ok(Value::Object(body))
}
