use super::{parse_config, require};
use crate::context::EventContext;
use crate::error::Result;
use crate::{ChannelMessage, MessageBody};
use serde::Deserialize;
use serde_json::{Map, Value};
use shipnote_common::types::{Hook, HookChannel, Outcome};
use std::collections::BTreeMap;

/// Run attributes forwarded to webhook receivers; everything else stays private.
pub const ALLOWED_ATTRIBUTES: [&str; 7] = [
    "id",
    "branch",
    "started_at",
    "finished_at",
    "commit",
    "source",
    "reason",
];

pub const HEADER_PROJECT_ID: &str = "X-Project-Id";
pub const HEADER_NOTIFICATION_ID: &str = "X-Notification-Id";
pub const HEADER_EVENT: &str = "X-Event";

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookConfig {
    url: String,
}

impl WebhookConfig {
    pub(crate) fn parse(config: &Value) -> Result<Self> {
        let cfg: Self = parse_config(HookChannel::Webhook, config)?;
        require(HookChannel::Webhook, "url", &cfg.url)?;
        Ok(cfg)
    }
}

/// Builds the generic JSON webhook payload for `event`.
pub fn build(ctx: &EventContext<'_>, hook: &Hook, event: &str) -> Result<ChannelMessage> {
    let config = WebhookConfig::parse(&hook.config)?;
    let run = ctx.run();

    let mut attributes = run.attributes()?;
    let mut payload: Map<String, Value> = ALLOWED_ATTRIBUTES
        .iter()
        .filter_map(|key| attributes.remove(*key).map(|value| ((*key).to_string(), value)))
        .collect();

    payload.insert("project".to_string(), Value::String(ctx.project().name.clone()));
    payload.insert("committed_by".to_string(), Value::String(run.committer.clone()));
    payload.insert("started_by".to_string(), Value::String(run.deployer.clone()));
    payload.insert(
        "status".to_string(),
        Value::String(Outcome::from_event(event).status().to_string()),
    );
    payload.insert("url".to_string(), Value::String(ctx.deployment_url()?));

    let mut headers = BTreeMap::new();
    headers.insert(HEADER_PROJECT_ID.to_string(), hook.project_id.clone());
    headers.insert(HEADER_NOTIFICATION_ID.to_string(), hook.id.clone());
    headers.insert(HEADER_EVENT.to_string(), event.to_string());

    Ok(ChannelMessage {
        hook_id: hook.id.clone(),
        channel: HookChannel::Webhook,
        destination: config.url,
        headers,
        body: MessageBody::Webhook(payload),
    })
}
