use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Project that owns deployments and hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    /// Display name shown in every notification
    pub name: String,
}

/// A finished deployment run of a project.
///
/// Owned by the caller; notification building only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRun {
    pub id: String,
    pub project_id: String,
    pub branch: String,
    /// Full commit hash
    pub commit: String,
    pub short_commit: String,
    /// Link to the commit on the repository host, when known
    #[serde(default)]
    pub commit_url: Option<String>,
    pub committer: String,
    /// Name of the user who started the deployment
    pub deployer: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Event that finished the run (e.g. `deployment_succeeded`)
    pub event: String,
    /// Free-text reason given when the deployment was started
    #[serde(default)]
    pub reason: Option<String>,
    /// Where the deployment was triggered from (e.g. `web`, `webhook`, `cli`)
    pub source: String,
}

impl TaskRun {
    /// Projects every attribute of the run into a flat JSON object.
    ///
    /// # Examples
    ///
    /// ```
    /// use shipnote_common::types::TaskRun;
    ///
    /// let run: TaskRun = serde_json::from_value(serde_json::json!({
    ///     "id": "42", "project_id": "7", "branch": "main",
    ///     "commit": "0123456789abcdef", "short_commit": "0123456",
    ///     "committer": "alice", "deployer": "bob",
    ///     "started_at": "2024-03-01T10:00:00Z", "finished_at": "2024-03-01T10:05:00Z",
    ///     "event": "deployment_succeeded", "source": "web"
    /// })).unwrap();
    /// let attrs = run.attributes().unwrap();
    /// assert_eq!(attrs["branch"], "main");
    /// assert!(attrs.contains_key("deployer"));
    /// ```
    pub fn attributes(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Classification of the event that finished a run.
///
/// Only events named with the `_succeeded` suffix count as success; every
/// other event name, known or not, is a failure.
///
/// # Examples
///
/// ```
/// use shipnote_common::types::Outcome;
///
/// assert_eq!(Outcome::from_event("deployment_succeeded"), Outcome::Succeeded);
/// assert_eq!(Outcome::from_event("deployment_failed"), Outcome::Failed);
/// assert_eq!(Outcome::from_event("deployment_rolled_back").status(), "failure");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Succeeded,
    Failed,
}

impl Outcome {
    pub const SUCCESS_SUFFIX: &'static str = "_succeeded";

    pub fn from_event(event: &str) -> Self {
        if event.ends_with(Self::SUCCESS_SUFFIX) {
            Outcome::Succeeded
        } else {
            Outcome::Failed
        }
    }

    /// Normalized status string sent to webhook receivers.
    pub fn status(self) -> &'static str {
        match self {
            Outcome::Succeeded => "success",
            Outcome::Failed => "failure",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Succeeded => write!(f, "succeeded"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// Delivery medium of a hook.
///
/// # Examples
///
/// ```
/// use shipnote_common::types::HookChannel;
///
/// let channel: HookChannel = "slack".parse().unwrap();
/// assert_eq!(channel, HookChannel::Chat);
/// assert_eq!(channel.to_string(), "chat");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookChannel {
    #[serde(alias = "email")]
    Mail,
    #[serde(alias = "slack")]
    Chat,
    #[serde(alias = "dingtalk")]
    Markdown,
    #[serde(alias = "custom")]
    Webhook,
}

impl HookChannel {
    pub const ALL: [HookChannel; 4] = [
        HookChannel::Mail,
        HookChannel::Chat,
        HookChannel::Markdown,
        HookChannel::Webhook,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookChannel::Mail => "mail",
            HookChannel::Chat => "chat",
            HookChannel::Markdown => "markdown",
            HookChannel::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for HookChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HookChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mail" | "email" => Ok(HookChannel::Mail),
            "chat" | "slack" => Ok(HookChannel::Chat),
            "markdown" | "dingtalk" => Ok(HookChannel::Markdown),
            "webhook" | "custom" => Ok(HookChannel::Webhook),
            _ => Err(format!("unknown hook channel: {s}")),
        }
    }
}

/// A notification subscription of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub id: String,
    pub project_id: String,
    /// Display name, used as the mail greeting
    pub name: String,
    pub channel: HookChannel,
    /// Channel specific settings (destination, icon, mentions, ...)
    #[serde(default)]
    pub config: Value,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub on_deployment_success: bool,
    #[serde(default = "default_true")]
    pub on_deployment_failure: bool,
}

fn default_true() -> bool {
    true
}
