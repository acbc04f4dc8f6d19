//! Deployment notification building with one builder per delivery channel.
//!
//! A finished [`TaskRun`](shipnote_common::types::TaskRun) and a
//! [`Hook`](shipnote_common::types::Hook) are turned into a
//! [`ChannelMessage`]: a fully formed payload plus the transport metadata a
//! delivery layer needs. Built-in channels are mail, chat (Slack-style
//! attachments), markdown webhooks (DingTalk-style robots) and generic JSON
//! webhooks. Builders are pure; translation and URL generation are injected
//! through [`services`].

pub mod channels;
pub mod context;
pub mod error;
pub mod manager;
pub mod routing;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

use channels::chat::ChatMessage;
use channels::mail::MailMessage;
use channels::markdown::MarkdownMessage;
use serde_json::{Map, Value};
use shipnote_common::types::HookChannel;
use std::collections::BTreeMap;

/// Channel specific content of a built message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Mail(MailMessage),
    Chat(ChatMessage),
    Markdown(MarkdownMessage),
    /// Flat JSON object posted as-is
    Webhook(Map<String, Value>),
}

impl MessageBody {
    /// Wire representation of the body.
    pub fn to_json(&self) -> Value {
        match self {
            MessageBody::Mail(mail) => mail.payload(),
            MessageBody::Chat(chat) => chat.payload(),
            MessageBody::Markdown(markdown) => markdown.payload(),
            MessageBody::Webhook(object) => Value::Object(object.clone()),
        }
    }
}

/// A message ready to be handed to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    pub hook_id: String,
    pub channel: HookChannel,
    /// Email address or webhook URL the transport delivers to
    pub destination: String,
    pub headers: BTreeMap<String, String>,
    pub body: MessageBody,
}

impl ChannelMessage {
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "hook_id": self.hook_id,
            "channel": self.channel,
            "destination": self.destination,
            "headers": self.headers,
            "body": self.body.to_json(),
        })
    }
}
