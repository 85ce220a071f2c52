//! Every user-facing line the relay sends. Menus are built from the enum
//! tables so the numbering always matches what the selection code accepts.

use flextea_types::{Audience, Category, MessageId};

pub fn registered(group: &str) -> String {
    format!("✅ You're verified under group: {group}")
}

pub fn category_menu() -> String {
    let mut out = String::from("📢 What would you like to post?");
    for (i, category) in Category::ALL.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, category.label()));
    }
    out
}

pub fn audience_menu() -> String {
    let mut out = String::from("👥 Who should see this?");
    for (i, audience) in Audience::ALL.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, audience.label()));
    }
    out
}

pub const COMPOSE: &str = "💬 Now type your message to post anonymously:";
pub const REPHRASE: &str = "⚠️ Please rephrase your message politely.";
pub const POSTED: &str = "✅ Your message was posted anonymously.";
pub const REPLY_PROMPT: &str = "✏️ Type your anonymous reply now:";
pub const REPLY_SENT: &str = "✅ Reply sent anonymously.";
pub const BAD_REPLY_FORMAT: &str = "❌ Invalid format. Use /reply MSG1";
pub const MENU_FALLBACK: &str = "🔢 Please answer with a number from the menu.";
pub const HELP: &str =
    "🍵 Send /spill to post anonymously, or /reply MSG1 to answer a post you received.";

pub fn unknown_message(id: MessageId) -> String {
    format!("❌ No such message: {id}")
}

/// The fan-out body each recipient of a post receives. Carries the
/// category, the message id and a reply instruction — never the author.
pub fn fan_out(category: Category, id: MessageId, body: &str) -> String {
    format!(
        "🍵 *{}* #{id}\n{body}\n\n💬 Reply anonymously: /reply {id}",
        category.label()
    )
}

/// What a message's author sees when an anonymous reply arrives.
pub fn reply_notification(id: MessageId, text: &str) -> String {
    format!("💌 Anonymous reply to #{id}:\n{text}")
}
