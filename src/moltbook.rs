// Moltbook client. Everything except registration is authenticated with
// a bearer key.

use crate::ainews::story_body;
use crate::api::{path_segment, ApiClient, HttpTransport, Transport};
use crate::config::{ClientConfig, MOLTBOOK};
use crate::credentials::{CredentialStore, Credentials};
use crate::error::Result;
use clap::ValueEnum;
use serde_json::{json, Map, Value};

pub const DEFAULT_AGENT_NAME: &str = "YmoltinatorNews";
pub const DEFAULT_AGENT_DESCRIPTION: &str = "AI journalist for Ymoltinator News (https://ymoltinator.com). Covering the AI agent community - trending discussions, notable posts, and community happenings on Moltbook.";
pub const DEFAULT_LIMIT: u32 = 25;

/// Feed ordering understood by `GET /posts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FeedSort {
    #[default]
    Hot,
    New,
    Top,
}

impl FeedSort {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedSort::Hot => "hot",
            FeedSort::New => "new",
            FeedSort::Top => "top",
        }
    }
}

pub struct MoltbookClient<T = HttpTransport> {
    api: ApiClient<T>,
    store: CredentialStore,
    agent_name: Option<String>,
}

impl MoltbookClient<HttpTransport> {
    pub fn connect(config: ClientConfig, store: CredentialStore) -> Result<Self> {
        Ok(Self::new(config, store, HttpTransport::new()?))
    }
}

impl<T: Transport> MoltbookClient<T> {
    pub fn new(config: ClientConfig, store: CredentialStore, transport: T) -> Self {
        MoltbookClient {
            api: ApiClient::new(&MOLTBOOK, &config, transport),
            store,
            agent_name: config.display_name,
        }
    }

    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Register a new agent. A human still has to claim it through the
    /// returned `claim_url` before it can post.
    pub fn register(&mut self, name: &str, description: &str) -> Result<Value> {
        let response = self.api.post(
            "/agents/register",
            false,
            Some(&json!({ "name": name, "description": description })),
        )?;

        let agent = response.get("agent");
        let field = |key: &str| agent.and_then(|a| a.get(key)).and_then(Value::as_str);

        if let Some(key) = field("api_key") {
            self.api.set_api_key(key);
            let mut creds = Credentials::new(key, name, self.api.base_url());
            creds.claim_url = field("claim_url").map(str::to_owned);
            creds.verification_code = field("verification_code").map(str::to_owned);
            creds.account_id = field("id").map(str::to_owned);
            self.store.save(&creds)?;
        }
        self.agent_name = Some(name.to_string());

        Ok(response)
    }

    /// Claim status of the registered agent.
    pub fn status(&self) -> Result<Value> {
        self.authed_get("/agents/status", &[])
    }

    pub fn me(&self) -> Result<Value> {
        self.authed_get("/agents/me", &[])
    }

    pub fn feed(&self, sort: FeedSort, limit: u32) -> Result<Value> {
        self.authed_get(
            "/posts",
            &[("sort", sort.as_str().to_string()), ("limit", limit.to_string())],
        )
    }

    /// A single post with its comments.
    pub fn post(&self, post_id: &str) -> Result<Value> {
        self.authed_get(&format!("/posts/{}", path_segment(post_id)), &[])
    }

    pub fn search(&self, query: &str, limit: u32) -> Result<Value> {
        self.authed_get("/search", &[("q", query.to_string()), ("limit", limit.to_string())])
    }

    pub fn submolts(&self) -> Result<Value> {
        self.authed_get("/submolts", &[])
    }

    pub fn create_post(
        &self,
        submolt: &str,
        title: &str,
        content: Option<&str>,
        url: Option<&str>,
    ) -> Result<Value> {
        let mut body = story_body(title, content, url)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("submolt".into(), Value::from(submolt));
        }
        self.authed_post("/posts", Some(&body))
    }

    /// Comment on a post, or reply to `parent_id` within it.
    pub fn comment(&self, post_id: &str, content: &str, parent_id: Option<&str>) -> Result<Value> {
        let mut body = Map::new();
        body.insert("content".into(), Value::from(content));
        if let Some(parent) = parent_id {
            body.insert("parent_id".into(), Value::from(parent));
        }
        self.authed_post(&format!("/posts/{}/comments", path_segment(post_id)), Some(&Value::Object(body)))
    }

    pub fn upvote(&self, post_id: &str) -> Result<Value> {
        self.authed_post(&format!("/posts/{}/upvote", path_segment(post_id)), None)
    }

    fn authed_get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.api.require_api_key()?;
        self.api.get(path, true, query)
    }

    fn authed_post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.api.require_api_key()?;
        self.api.post(path, true, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::error::ClientError;
    use crate::test_utils::MockTransport;
    use tempfile::TempDir;

    fn client(key: Option<&str>, mock: MockTransport) -> (TempDir, MoltbookClient<MockTransport>) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("moltbook/credentials.json"));
        let config = ClientConfig::for_service(&MOLTBOOK)
            .with_base_url(Some("http://molt.test/api/v1".into()))
            .with_api_key(key.map(String::from));
        (dir, MoltbookClient::new(config, store, mock))
    }

    #[test]
    fn register_saves_nested_agent_fields() {
        let mock = MockTransport::new().respond(
            200,
            json!({
                "agent": {
                    "api_key": "moltbook_sk_1",
                    "claim_url": "https://www.moltbook.com/claim/abc",
                    "verification_code": "reef-X4B2"
                },
                "important": "SAVE YOUR API KEY!"
            }),
        );
        let (_dir, mut molt) = client(None, mock);

        molt.register(DEFAULT_AGENT_NAME, DEFAULT_AGENT_DESCRIPTION).unwrap();

        let sent = molt.api().transport().last_request();
        assert!(sent.headers.is_empty());
        assert_eq!(sent.body.as_ref().unwrap()["name"], DEFAULT_AGENT_NAME);

        let creds = molt.store().load().unwrap();
        assert_eq!(creds.api_key, "moltbook_sk_1");
        assert_eq!(creds.account_name, DEFAULT_AGENT_NAME);
        assert_eq!(creds.claim_url.as_deref(), Some("https://www.moltbook.com/claim/abc"));
        assert_eq!(creds.verification_code.as_deref(), Some("reef-X4B2"));
        assert_eq!(molt.api().api_key(), Some("moltbook_sk_1"));
    }

    #[test]
    fn register_without_key_in_response_saves_nothing() {
        let mock = MockTransport::new().respond(200, json!({"message": "pending"}));
        let (_dir, mut molt) = client(None, mock);
        molt.register("Bot", "desc").unwrap();
        assert!(!molt.store().exists());
    }

    #[test]
    fn feed_uses_bearer_auth_and_query() {
        let (_dir, molt) = client(Some("sk"), MockTransport::new().respond(200, json!({"posts": []})));
        molt.feed(FeedSort::New, 10).unwrap();

        let sent = molt.api().transport().last_request();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url, "http://molt.test/api/v1/posts");
        assert_eq!(sent.header("Authorization"), Some("Bearer sk"));
        assert_eq!(sent.query_param("sort"), Some("new"));
        assert_eq!(sent.query_param("limit"), Some("10"));
    }

    #[test]
    fn authenticated_calls_need_a_key() {
        let (_dir, molt) = client(None, MockTransport::new());
        assert!(matches!(molt.status(), Err(ClientError::MissingApiKey(_))));
        assert!(matches!(molt.upvote("p1"), Err(ClientError::MissingApiKey(_))));
        assert_eq!(molt.api().transport().call_count(), 0);
    }

    #[test]
    fn create_post_includes_submolt() {
        let mock = MockTransport::new().respond(201, json!({"success": true, "post": {"id": "p9"}}));
        let (_dir, molt) = client(Some("sk"), mock);

        molt.create_post("general", "Hello", Some("first post"), None).unwrap();

        assert_eq!(
            molt.api().transport().last_request().body,
            Some(json!({"submolt": "general", "title": "Hello", "content": "first post"}))
        );
    }

    #[test]
    fn create_post_requires_content_or_url() {
        let (_dir, molt) = client(Some("sk"), MockTransport::new());
        let err = molt.create_post("general", "Hello", None, None).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(molt.api().transport().call_count(), 0);
    }

    #[test]
    fn create_post_keeps_whitespace_content() {
        let (_dir, molt) = client(Some("sk"), MockTransport::new().respond(201, json!({})));
        molt.create_post("general", "Hello", Some(" "), None).unwrap();
        assert_eq!(molt.api().transport().last_request().body.unwrap()["content"], " ");
    }

    #[test]
    fn post_ids_are_escaped() {
        let mock = MockTransport::new()
            .respond(200, json!({}))
            .respond(201, json!({}));
        let (_dir, molt) = client(Some("sk"), mock);

        molt.upvote("p/1").unwrap();
        molt.comment("../agents/me", "hi", None).unwrap();

        let sent = molt.api().transport().requests();
        assert_eq!(sent[0].url, "http://molt.test/api/v1/posts/p%2F1/upvote");
        assert_eq!(sent[1].url, "http://molt.test/api/v1/posts/..%2Fagents%2Fme/comments");
    }

    #[test]
    fn comment_with_parent() {
        let (_dir, molt) = client(Some("sk"), MockTransport::new().respond(201, json!({})));
        molt.comment("p1", "agreed", Some("c7")).unwrap();

        let sent = molt.api().transport().last_request();
        assert_eq!(sent.url, "http://molt.test/api/v1/posts/p1/comments");
        assert_eq!(sent.body, Some(json!({"content": "agreed", "parent_id": "c7"})));
    }

    #[test]
    fn search_passes_query() {
        let (_dir, molt) = client(Some("sk"), MockTransport::new().respond(200, json!({"results": []})));
        molt.search("agent memory", DEFAULT_LIMIT).unwrap();

        let sent = molt.api().transport().last_request();
        assert_eq!(sent.url, "http://molt.test/api/v1/search");
        assert_eq!(sent.query_param("q"), Some("agent memory"));
        assert_eq!(sent.query_param("limit"), Some("25"));
    }

    #[test]
    fn upvote_no_content_is_success_sentinel() {
        let (_dir, molt) = client(Some("sk"), MockTransport::new().respond_raw(204, ""));
        assert_eq!(molt.upvote("p1").unwrap(), json!({"status": "success"}));
    }

    #[test]
    fn rejected_request_surfaces_api_error() {
        let mock = MockTransport::new().respond(401, json!({"success": false, "error": "Invalid API key"}));
        let (_dir, molt) = client(Some("bad"), mock);
        let err = molt.me().unwrap_err();
        assert_eq!(err.to_string(), "Invalid API key");
    }
}
