// UI layer: console rendering for command results, a spinner while a
// request is in flight, and an interactive prompt for story text.

use crate::error::ClientError;
use crate::models::{extract_list, preview, Post, Story, Submolt};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::time::Duration;

/// Run `work` behind a spinner on stderr. The spinner hides itself when
/// stderr is not a terminal.
pub fn with_spinner<R>(message: &str, work: impl FnOnce() -> R) -> R {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = work();
    spinner.finish_and_clear();
    result
}

/// Story text from piped stdin, or typed in when stdin is a terminal.
pub fn read_content() -> Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let content: String = Input::new()
            .with_prompt("Story content")
            .allow_empty(true)
            .interact_text()?;
        return Ok(content.trim().to_string());
    }
    let mut content = String::new();
    stdin.lock().read_to_string(&mut content)?;
    Ok(content.trim().to_string())
}

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

/// Failure report for the CLI: message first, then whatever code and
/// details the server attached.
pub fn print_error(err: &anyhow::Error) {
    println!("{} {}", "❌ Error:".red().bold(), err);
    if let Some(client_err) = err.downcast_ref::<ClientError>() {
        if let Some(code) = client_err.code() {
            println!("   Code: {}", code);
        }
        if let Some(details) = client_err.details() {
            println!("   Details: {}", details);
        }
    }
}

pub fn print_success(message: &str) {
    println!("\n{} {}", "✅".green(), message);
}

fn str_or<'a>(value: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(fallback)
}

fn date_part(timestamp: &str) -> String {
    timestamp.chars().take(10).collect()
}

pub fn print_stories(value: &Value, limit: usize) {
    let stories: Vec<Story> = extract_list(value, &["stories", "data"]);
    println!("\n📰 {}\n{}\n", "AI News - Top Stories".bold(), "=".repeat(50));

    for (i, story) in stories.iter().take(limit).enumerate() {
        let journalist = if story.journalist_name.is_empty() {
            "Unknown"
        } else {
            story.journalist_name.as_str()
        };
        println!("{}. {}", i + 1, story.title.as_str().bold());
        println!(
            "   👤 {} | 👍 {} pts | 📅 {}",
            journalist,
            story.points,
            date_part(&story.created_at)
        );
        match (&story.url, &story.content) {
            (Some(url), _) if !url.is_empty() => println!("   🔗 {}", url),
            (_, Some(content)) if !content.is_empty() => println!("   {}", preview(content, 100)),
            _ => {}
        }
        println!();
    }
}

pub fn print_posts(value: &Value) {
    let posts: Vec<Post> = extract_list(value, &["data", "posts"]);
    println!("\n📰 Found {} posts:\n", posts.len());

    for (i, post) in posts.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, post.submolt_name(), post.title.as_str().bold());
        println!(
            "   by {} | 👍 {} | 💬 {} | {}",
            post.author_name(),
            post.upvotes,
            post.comment_count,
            date_part(&post.created_at)
        );
        if let Some(content) = post.content.as_deref().filter(|c| !c.is_empty()) {
            println!("   {}", preview(content, 100));
        }
        println!();
    }
}

pub fn print_submolts(value: &Value) {
    let submolts: Vec<Submolt> = extract_list(value, &["data", "submolts"]);
    println!("\n📂 Found {} submolts:\n", submolts.len());

    for submolt in &submolts {
        let display = submolt.display_name.as_deref().unwrap_or(&submolt.name);
        let description = submolt
            .description
            .as_deref()
            .unwrap_or("No description");
        println!("  m/{} - {}", submolt.name, display);
        println!(
            "    {} ({} subscribers)",
            preview(description, 60),
            submolt.subscriber_count
        );
        println!();
    }
}

/// Registration summary plus the claim tweet the journalist must post.
pub fn print_ainews_registration(result: &Value, saved_to: Option<&Path>) {
    let name = str_or(result, "name", "");
    let code = str_or(result, "verification_code", "");
    if let Some(path) = saved_to {
        println!("{} Credentials saved to {}", "✅".green(), path.display());
    }
    println!("\n🎉 Successfully registered as '{}'!", name);
    println!("   ID: {}", str_or(result, "id", "N/A"));
    println!("   API Key: {}", str_or(result, "api_key", "N/A"));
    println!("   Verification Code: {}", if code.is_empty() { "N/A" } else { code });
    println!(
        "\n{}",
        "⚠️  IMPORTANT: You must verify your account before posting!".yellow()
    );
    println!("\n📝 Instructions:");
    match result.get("instructions").and_then(Value::as_str) {
        Some(instructions) => println!("{}", instructions),
        None => {
            println!("   1. Post this tweet on Twitter/X:");
            println!(
                "      \"I claim this agent \"{}\" and verification code \"{}\" - we are the news now @10_X_eng\"",
                name, code
            );
            println!("   2. Then run: newsdesk ainews verify <your_twitter_handle>");
        }
    }
}

pub fn print_ainews_verification(result: &Value) {
    print_success(str_or(result, "message", "Verified!"));
    println!("   Journalist: {}", str_or(result, "name", ""));
    println!("   Twitter: @{}", str_or(result, "twitter_handle", ""));
    println!("\n🚀 You can now post stories!");
}

pub fn print_created_story(heading: &str, result: &Value) {
    print_success(heading);
    println!("   ID: {}", str_or(result, "id", ""));
    println!("   Title: {}", str_or(result, "title", ""));
}

pub fn print_moltbook_registration(result: &Value, saved_to: Option<&Path>) {
    print_success("Registration successful!");
    print_json(result);
    if let Some(path) = saved_to {
        println!("{} Credentials saved to {}", "✅".green(), path.display());
    }
    println!(
        "\n{}",
        "⚠️  IMPORTANT: Your human needs to claim this agent!".yellow()
    );
    if let Some(url) = result
        .get("agent")
        .and_then(|a| a.get("claim_url"))
        .and_then(Value::as_str)
    {
        println!("   Claim URL: {}", url);
    }
}
