//! Plain-text rendering of posts, profiles and messages for the CLI.

use crate::domain::{MessageQueue, MessageType, StateMessage};
use crate::models::{Account, Post, Profile};

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// ```text
/// HOME
/// ════════════════════════════════════════════════════════════
/// ```
pub fn header(title: &str) -> String {
    format!("{}\n{}", title, "═".repeat(LINE_WIDTH))
}

pub fn separator() -> String {
    "─".repeat(LINE_WIDTH)
}

/// ```text
/// Alice (@alice)  2021-01-01T00:00:00Z  [p1]
///   hello world
///   ♥ 3  ⟳ 1  📎 1
/// ```
pub fn format_post(post: &Post) -> String {
    let mut lines = vec![format!(
        "{} (@{})  {}  [{}]",
        post.profile.display_name, post.profile.username, post.created_at, post.id
    )];
    if post.is_retweet {
        lines[0].push_str("  (retweet)");
    }
    if let Some(text) = post.text.as_deref().filter(|t| !t.is_empty()) {
        lines.extend(text.lines().map(|line| format!("  {}", line)));
    }

    let mut counts = format!(
        "  {} {}  {} {}",
        if post.liked { "♥" } else { "♡" },
        post.likes,
        if post.retweeted { "⟳" } else { "↻" },
        post.retweets
    );
    let attachments = post.attachments().len();
    if attachments > 0 {
        counts.push_str(&format!("  📎 {}", attachments));
    }
    lines.push(counts);
    lines.join("\n")
}

pub fn format_posts(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "  (no posts)".to_string();
    }
    posts
        .iter()
        .map(format_post)
        .collect::<Vec<_>>()
        .join(&format!("\n{}\n", separator()))
}

pub fn format_profile(profile: &Profile) -> String {
    let mut lines = vec![format!("{} (@{})", profile.display_name, profile.username)];
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        lines.push(format!("  {}", bio));
    }
    lines.push(format!(
        "  {} followers  {} following{}",
        profile.followers,
        profile.followee,
        if profile.following { "  (you follow)" } else { "" }
    ));
    lines.join("\n")
}

pub fn format_account(account: &Account) -> String {
    let mut lines = vec![
        format!("{} (@{})", account.display_name, account.username),
        format!("  {}", account.email),
    ];
    if let Some(bio) = account.bio.as_deref().filter(|b| !b.is_empty()) {
        lines.push(format!("  {}", bio));
    }
    lines.join("\n")
}

/// One line per queued message, tagged by type.
pub fn format_message(message: &StateMessage) -> String {
    let icon = match message.message_type {
        MessageType::Success => "✓",
        MessageType::Error => "✗",
        MessageType::Info => "ℹ",
        MessageType::None => "·",
    };
    format!("{} {}", icon, message.message)
}

/// Print every queued message, errors to stderr.
pub fn print_queue(queue: &MessageQueue) {
    for message in queue.iter() {
        if message.message_type == MessageType::Error {
            eprintln!("{}", format_message(message));
        } else {
            println!("{}", format_message(message));
        }
    }
}
