use super::{parse_config, require};
use crate::context::{EventContext, LinkStyle};
use crate::error::Result;
use crate::{ChannelMessage, MessageBody};
use serde::Deserialize;
use serde_json::Value;
use shipnote_common::types::{Hook, HookChannel, Outcome};
use std::collections::BTreeMap;

const DEFAULT_ICON: &str = ":ghost:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAttachment {
    /// Body text with the run reference rendered as a link
    pub content: String,
    /// Same text without link markup
    pub fallback: String,
    pub color: &'static str,
    pub fields: Vec<ChatField>,
    pub footer: String,
    /// Unix seconds of the run's finish time
    pub timestamp: i64,
}

/// Slack-style message carrying a single attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from_icon: String,
    pub to_channel: String,
    pub attachment: ChatAttachment,
}

impl ChatMessage {
    pub fn payload(&self) -> Value {
        let icon_key = if self.from_icon.starts_with("http://") || self.from_icon.starts_with("https://") {
            "icon_url"
        } else {
            "icon_emoji"
        };
        let fields: Vec<Value> = self
            .attachment
            .fields
            .iter()
            .map(|f| {
                serde_json::json!({
                    "title": f.title,
                    "value": f.value,
                    "short": f.short,
                })
            })
            .collect();

        let mut payload = serde_json::json!({
            "channel": self.to_channel,
            "attachments": [{
                "text": self.attachment.content,
                "fallback": self.attachment.fallback,
                "color": self.attachment.color,
                "fields": fields,
                "footer": self.attachment.footer,
                "ts": self.attachment.timestamp,
            }],
        });
        payload[icon_key] = Value::String(self.from_icon.clone());
        payload
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatConfig {
    webhook: String,
    channel: String,
    #[serde(default = "default_icon")]
    icon: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl ChatConfig {
    pub(crate) fn parse(config: &Value) -> Result<Self> {
        let mut cfg: Self = parse_config(HookChannel::Chat, config)?;
        require(HookChannel::Chat, "webhook", &cfg.webhook)?;
        require(HookChannel::Chat, "channel", &cfg.channel)?;
        if cfg.icon.trim().is_empty() {
            cfg.icon = default_icon();
        }
        Ok(cfg)
    }
}

/// Builds the chat message for a finished deployment.
pub fn build(ctx: &EventContext<'_>, hook: &Hook, body_key: &str) -> Result<ChannelMessage> {
    let config = ChatConfig::parse(&hook.config)?;
    let run = ctx.run();
    let project_name = ctx.project().name.as_str();

    let reference = ctx.deployment_reference();
    let linked = LinkStyle::Chat.link(&ctx.deployment_url()?, &reference);
    let content = ctx.t(body_key, &[("deployment", linked.as_str()), ("project", project_name)])?;
    let fallback = ctx.t(body_key, &[("deployment", reference.as_str()), ("project", project_name)])?;

    let field = |key: &str, value: String| -> Result<ChatField> {
        Ok(ChatField {
            title: ctx.t(key, &[])?,
            value,
            short: true,
        })
    };
    let fields = vec![
        field("notify.project", ctx.project_link(LinkStyle::Chat)?)?,
        field("notify.commit", ctx.commit_display(LinkStyle::Chat))?,
        field("notify.committer", run.committer.clone())?,
        field("notify.branch", run.branch.clone())?,
    ];

    let color = match ctx.outcome() {
        Outcome::Succeeded => "good",
        Outcome::Failed => "danger",
    };

    let message = ChatMessage {
        from_icon: config.icon,
        to_channel: config.channel,
        attachment: ChatAttachment {
            content,
            fallback,
            color,
            fields,
            footer: ctx.app_name().to_string(),
            timestamp: run.finished_at.timestamp(),
        },
    };

    Ok(ChannelMessage {
        hook_id: hook.id.clone(),
        channel: HookChannel::Chat,
        destination: config.webhook,
        headers: BTreeMap::new(),
        body: MessageBody::Chat(message),
    })
}
