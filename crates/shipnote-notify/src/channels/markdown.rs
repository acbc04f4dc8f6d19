use super::{parse_config, require};
use crate::context::{EventContext, LinkStyle};
use crate::error::Result;
use crate::{ChannelMessage, MessageBody};
use serde::Deserialize;
use serde_json::Value;
use shipnote_common::types::{Hook, HookChannel};
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "application/json;charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownContent {
    pub title: String,
    pub text: String,
}

/// Who the robot should mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mentions {
    /// Sent as `atMobiles`
    pub mentions: Vec<String>,
    /// Sent as `isAtAll`
    pub mention_all: bool,
}

/// Markdown document for chat-robot webhooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownMessage {
    pub msgtype: &'static str,
    pub markdown: MarkdownContent,
    pub at: Mentions,
}

impl MarkdownMessage {
    pub fn payload(&self) -> Value {
        serde_json::json!({
            "msgtype": self.msgtype,
            "markdown": {
                "title": self.markdown.title,
                "text": self.markdown.text,
            },
            "at": {
                "atMobiles": self.at.mentions,
                "isAtAll": self.at.mention_all,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarkdownConfig {
    webhook: String,
    #[serde(default)]
    at_mobiles: Option<String>,
    #[serde(default)]
    is_at_all: Value,
}

impl MarkdownConfig {
    pub(crate) fn parse(config: &Value) -> Result<Self> {
        let cfg: Self = parse_config(HookChannel::Markdown, config)?;
        require(HookChannel::Markdown, "webhook", &cfg.webhook)?;
        Ok(cfg)
    }
}

/// Splits a comma separated mention list, dropping empty entries.
///
/// # Examples
///
/// ```
/// use shipnote_notify::channels::markdown::parse_mentions;
///
/// assert!(parse_mentions("").is_empty());
/// assert_eq!(parse_mentions("a,b,c"), vec!["a", "b", "c"]);
/// ```
pub fn parse_mentions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strict boolean reading of a loosely typed flag.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Builds the markdown robot message for a finished deployment.
pub fn build(ctx: &EventContext<'_>, hook: &Hook, body_key: &str) -> Result<ChannelMessage> {
    let config = MarkdownConfig::parse(&hook.config)?;
    let run = ctx.run();

    let reference = ctx.deployment_reference();
    let title = ctx.t(
        body_key,
        &[("deployment", reference.as_str()), ("project", ctx.project().name.as_str())],
    )?;

    let mut lines = vec![
        format!("#### {title}"),
        format!(
            "{}: {} {}: {}",
            ctx.t("notify.project", &[])?,
            ctx.project_link(LinkStyle::Markdown)?,
            ctx.t("notify.commit", &[])?,
            ctx.commit_display(LinkStyle::Markdown),
        ),
        String::new(),
        format!(
            "{}: {} {}: {}",
            ctx.t("notify.committer", &[])?,
            run.committer,
            ctx.t("notify.branch", &[])?,
            run.branch,
        ),
        String::new(),
    ];
    if let Some(reason) = ctx.reason_line()? {
        lines.push(format!("> {reason}"));
    }
    lines.push(format!(
        "##### {}",
        LinkStyle::Markdown.link(&ctx.deployment_url()?, &ctx.t("notify.deployment_details", &[])?)
    ));

    let message = MarkdownMessage {
        msgtype: "markdown",
        markdown: MarkdownContent {
            title,
            text: lines.join("\n"),
        },
        at: Mentions {
            mentions: config.at_mobiles.as_deref().map(parse_mentions).unwrap_or_default(),
            mention_all: coerce_bool(&config.is_at_all),
        },
    };

    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), CONTENT_TYPE.to_string());

    Ok(ChannelMessage {
        hook_id: hook.id.clone(),
        channel: HookChannel::Markdown,
        destination: config.webhook,
        headers,
        body: MessageBody::Markdown(message),
    })
}
