// Command-line surface: one subcommand per remote operation, grouped by
// service. Each handler builds its client, runs exactly one operation and
// renders the result.

use crate::ainews::{AiNewsClient, DEFAULT_PER_PAGE};
use crate::config::{ClientConfig, ServiceProfile, AINEWS, MOLTBOOK};
use crate::credentials::CredentialStore;
use crate::moltbook::{
    FeedSort, MoltbookClient, DEFAULT_AGENT_DESCRIPTION, DEFAULT_AGENT_NAME, DEFAULT_LIMIT,
};
use crate::ui;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "newsdesk", version)]
#[command(about = "Command-line clients for AI News and Moltbook", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub service: Service,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Overrides shared by both services.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// API key; wins over the environment and stored credentials
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API root, e.g. http://localhost:8080/api
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Credentials file to use instead of ~/.config/<service>/credentials.json
    #[arg(long, global = true, value_name = "PATH")]
    pub credentials: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Service {
    /// AI News (ymoltinator.com): journalists and stories
    Ainews {
        #[command(flatten)]
        conn: ConnectionArgs,
        #[command(subcommand)]
        command: AiNewsCommand,
    },
    /// Moltbook: the social network for AI agents
    Moltbook {
        #[command(flatten)]
        conn: ConnectionArgs,
        #[command(subcommand)]
        command: MoltbookCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AiNewsCommand {
    /// Register as a new AI journalist
    Register {
        name: String,
        /// Do not write the issued key to the credentials file
        #[arg(long)]
        no_save: bool,
    },
    /// Verify your account after posting the claim tweet
    Verify {
        twitter_handle: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// Latest stories
    Stories {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PER_PAGE, value_parser = clap::value_parser!(u32).range(1..=100))]
        per_page: u32,
        /// How many stories to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// A single story as JSON
    Story { id: String },
    /// Post a text story; content comes from --content or stdin
    Post {
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Post a link story
    Link { title: String, url: String },
    /// Upvote a story
    Upvote { id: String },
    /// Check API health
    Health,
}

#[derive(Subcommand, Debug)]
pub enum MoltbookCommand {
    /// Register as a new Moltbook agent
    Register {
        #[arg(long, default_value = DEFAULT_AGENT_NAME)]
        name: String,
        #[arg(long, default_value = DEFAULT_AGENT_DESCRIPTION)]
        description: String,
    },
    #[command(flatten)]
    Agent(AgentCommand),
}

/// Commands that act as the stored agent.
#[derive(Subcommand, Debug)]
pub enum AgentCommand {
    /// Check claim status
    Status,
    /// Our agent profile
    Profile,
    /// Latest posts
    Feed {
        #[arg(long, value_enum, default_value_t = FeedSort::Hot)]
        sort: FeedSort,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// List all communities
    Submolts,
    /// Search posts
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// A single post with comments
    Post { id: String },
    /// Create a new post in a submolt
    Create {
        submolt: String,
        title: String,
        content: Vec<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Comment on a post
    Comment {
        post_id: String,
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
        /// Reply to this comment instead of the post
        #[arg(long)]
        parent: Option<String>,
    },
    /// Upvote a post
    Upvote { id: String },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.service {
        Service::Ainews { conn, command } => run_ainews(conn, command),
        Service::Moltbook { conn, command } => run_moltbook(conn, command),
    }
}

/// Configuration is read from the environment exactly once, here.
fn connection(profile: &ServiceProfile, conn: ConnectionArgs) -> (ClientConfig, CredentialStore) {
    let config = ClientConfig::from_env(profile)
        .with_base_url(conn.base_url)
        .with_api_key(conn.api_key);
    let store = conn
        .credentials
        .map(CredentialStore::new)
        .unwrap_or_else(|| CredentialStore::for_service(profile));
    (config, store)
}

fn non_empty(words: Vec<String>) -> Option<String> {
    let joined = words.join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn run_ainews(conn: ConnectionArgs, command: AiNewsCommand) -> Result<()> {
    let (config, store) = connection(&AINEWS, conn);

    match command {
        AiNewsCommand::Register { name, no_save } => {
            let mut news = AiNewsClient::connect(config, store)?;
            let result = ui::with_spinner("Registering...", || news.register(&name, !no_save))?;
            let saved_to = (!no_save && news.store().exists()).then(|| news.store().path());
            ui::print_ainews_registration(&result, saved_to);
        }
        AiNewsCommand::Verify {
            twitter_handle,
            name,
            code,
        } => {
            let news = AiNewsClient::connect(config.with_stored_identity(&store, false)?, store)?;
            let result = ui::with_spinner("Verifying...", || {
                news.verify(&twitter_handle, name.as_deref(), code.as_deref())
            })?;
            ui::print_ainews_verification(&result);
        }
        AiNewsCommand::Stories {
            page,
            per_page,
            limit,
        } => {
            let news = AiNewsClient::connect(config.with_stored_identity(&store, false)?, store)?;
            let result = ui::with_spinner("Fetching stories...", || news.stories(page, per_page))?;
            ui::print_stories(&result, limit);
        }
        AiNewsCommand::Story { id } => {
            let news = AiNewsClient::connect(config.with_stored_identity(&store, false)?, store)?;
            let result = ui::with_spinner("Fetching story...", || news.story(&id))?;
            ui::print_json(&result);
        }
        AiNewsCommand::Post { title, content } => {
            let content = match content {
                Some(content) => content,
                None => ui::read_content()?,
            };
            let news = AiNewsClient::connect(config.with_stored_identity(&store, true)?, store)?;
            let result = ui::with_spinner("Posting story...", || {
                news.post_story(&title, Some(&content), None)
            })?;
            ui::print_created_story("Story posted!", &result);
        }
        AiNewsCommand::Link { title, url } => {
            let news = AiNewsClient::connect(config.with_stored_identity(&store, true)?, store)?;
            let result =
                ui::with_spinner("Posting link...", || news.post_story(&title, None, Some(&url)))?;
            ui::print_created_story("Link posted!", &result);
        }
        AiNewsCommand::Upvote { id } => {
            let news = AiNewsClient::connect(config, store)?;
            ui::with_spinner("Upvoting...", || news.upvote(&id))?;
            println!("👍 Upvoted!");
        }
        AiNewsCommand::Health => {
            let news = AiNewsClient::connect(config, store)?;
            let result = ui::with_spinner("Checking health...", || news.health())?;
            let status = result
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("unknown");
            ui::print_success(&format!("API Status: {}", status));
        }
    }
    Ok(())
}

fn run_moltbook(conn: ConnectionArgs, command: MoltbookCommand) -> Result<()> {
    let (config, store) = connection(&MOLTBOOK, conn);

    match command {
        MoltbookCommand::Register { name, description } => {
            let mut molt = MoltbookClient::connect(config, store)?;
            println!("🦞 Registering agent '{}' on Moltbook...", name);
            let result =
                ui::with_spinner("Registering...", || molt.register(&name, &description))?;
            let saved_to = molt.store().exists().then(|| molt.store().path());
            ui::print_moltbook_registration(&result, saved_to);
            Ok(())
        }
        MoltbookCommand::Agent(command) => {
            let molt = MoltbookClient::connect(config.with_stored_identity(&store, true)?, store)?;
            run_moltbook_authed(&molt, command)
        }
    }
}

fn run_moltbook_authed(molt: &MoltbookClient, command: AgentCommand) -> Result<()> {
    match command {
        AgentCommand::Status => {
            let name = molt.agent_name().unwrap_or("unknown");
            let result = ui::with_spinner(&format!("Checking status for '{}'...", name), || {
                molt.status()
            })?;
            ui::print_json(&result);
        }
        AgentCommand::Profile => {
            let result = ui::with_spinner("Fetching profile...", || molt.me())?;
            ui::print_json(&result);
        }
        AgentCommand::Feed { sort, limit } => {
            let message = format!("Fetching {} feed (limit {})...", sort.as_str(), limit);
            let result = ui::with_spinner(&message, || molt.feed(sort, limit))?;
            ui::print_posts(&result);
        }
        AgentCommand::Submolts => {
            let result = ui::with_spinner("Fetching submolts...", || molt.submolts())?;
            ui::print_submolts(&result);
        }
        AgentCommand::Search { query, limit } => {
            let query = query.join(" ");
            let message = format!("Searching for '{}'...", query);
            let result = ui::with_spinner(&message, || molt.search(&query, limit))?;
            ui::print_json(&result);
        }
        AgentCommand::Post { id } => {
            let result = ui::with_spinner("Fetching post...", || molt.post(&id))?;
            ui::print_json(&result);
        }
        AgentCommand::Create {
            submolt,
            title,
            content,
            url,
        } => {
            let content = non_empty(content);
            let message = format!("Creating post in m/{}...", submolt);
            let result = ui::with_spinner(&message, || {
                molt.create_post(&submolt, &title, content.as_deref(), url.as_deref())
            })?;
            ui::print_success("Post created successfully!");
            ui::print_json(&result);
        }
        AgentCommand::Comment {
            post_id,
            content,
            parent,
        } => {
            let content = content.join(" ");
            let result = ui::with_spinner("Adding comment...", || {
                molt.comment(&post_id, &content, parent.as_deref())
            })?;
            ui::print_success("Comment added successfully!");
            ui::print_json(&result);
        }
        AgentCommand::Upvote { id } => {
            let result = ui::with_spinner("Upvoting...", || molt.upvote(&id))?;
            ui::print_success("Upvoted!");
            ui::print_json(&result);
        }
    }
    Ok(())
}
