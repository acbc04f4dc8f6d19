//! Per-channel message builders and the dispatch between them.

pub mod chat;
pub mod mail;
pub mod markdown;
pub mod webhook;

use crate::context::EventContext;
use crate::error::{NotifyError, Result};
use crate::utils::redact_sensitive_json;
use crate::ChannelMessage;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shipnote_common::types::{Hook, HookChannel, Outcome};

/// Translation keys used for one kind of deployment notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Templates {
    pub mail_subject: &'static str,
    pub mail_body: &'static str,
    pub chat_body: &'static str,
    pub markdown_body: &'static str,
}

impl Templates {
    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Succeeded => Self {
                mail_subject: "notify.deployment_succeeded.subject",
                mail_body: "notify.deployment_succeeded.mail",
                chat_body: "notify.deployment_succeeded.chat",
                markdown_body: "notify.deployment_succeeded.markdown",
            },
            Outcome::Failed => Self {
                mail_subject: "notify.deployment_failed.subject",
                mail_body: "notify.deployment_failed.mail",
                chat_body: "notify.deployment_failed.chat",
                markdown_body: "notify.deployment_failed.markdown",
            },
        }
    }
}

/// Builds the message for `hook` with the builder of its channel.
pub fn build(ctx: &EventContext<'_>, hook: &Hook) -> Result<ChannelMessage> {
    let templates = Templates::for_outcome(ctx.outcome());
    match hook.channel {
        HookChannel::Mail => mail::build(ctx, hook, templates.mail_subject, templates.mail_body),
        HookChannel::Chat => chat::build(ctx, hook, templates.chat_body),
        HookChannel::Markdown => markdown::build(ctx, hook, templates.markdown_body),
        HookChannel::Webhook => webhook::build(ctx, hook, &ctx.run().event),
    }
}

/// Checks a hook configuration against the schema of its channel.
pub fn validate_config(channel: HookChannel, config: &Value) -> Result<()> {
    match channel {
        HookChannel::Mail => mail::MailConfig::parse(config).map(|_| ()),
        HookChannel::Chat => chat::ChatConfig::parse(config).map(|_| ()),
        HookChannel::Markdown => markdown::MarkdownConfig::parse(config).map(|_| ()),
        HookChannel::Webhook => webhook::WebhookConfig::parse(config).map(|_| ()),
    }
}

/// Returns a copy of `config` safe to log or expose through an API.
///
/// Robot webhook URLs embed their access token, so they are masked as well.
pub fn redact_config(channel: HookChannel, config: &Value) -> Value {
    let mut redacted = redact_sensitive_json(config);
    if matches!(channel, HookChannel::Chat | HookChannel::Markdown) {
        if let Some(obj) = redacted.as_object_mut() {
            if obj.contains_key("webhook") {
                obj.insert("webhook".to_string(), Value::String("***".to_string()));
            }
        }
    }
    redacted
}

fn parse_config<T: DeserializeOwned>(channel: HookChannel, config: &Value) -> Result<T> {
    serde_json::from_value(config.clone()).map_err(|e| NotifyError::malformed(channel, e.to_string()))
}

fn require(channel: HookChannel, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NotifyError::malformed(channel, format!("'{field}' must not be empty")));
    }
    Ok(())
}
