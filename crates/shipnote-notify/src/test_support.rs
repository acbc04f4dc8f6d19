use crate::context::EventContext;
use crate::services::{CatalogTranslator, RouteTable};
use chrono::{TimeZone, Utc};
use shipnote_common::types::{Hook, HookChannel, Project, TaskRun};

pub(crate) const BASE_URL: &str = "https://deploy.example.com";
pub(crate) const APP_NAME: &str = "Shipnote";

pub(crate) struct Fixture {
    pub translator: CatalogTranslator,
    pub routes: RouteTable,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            translator: CatalogTranslator::new("en"),
            routes: RouteTable::new(BASE_URL),
        }
    }
}

impl Fixture {
    pub fn context<'a>(&'a self, project: &'a Project, run: &'a TaskRun) -> EventContext<'a> {
        EventContext::new(project, run, &self.translator, &self.routes, APP_NAME)
    }
}

pub(crate) fn fixture_project() -> Project {
    Project {
        id: "7".into(),
        name: "api-gateway".into(),
    }
}

pub(crate) fn fixture_run() -> TaskRun {
    TaskRun {
        id: "42".into(),
        project_id: "7".into(),
        branch: "main".into(),
        commit: "0123456789abcdef0123456789abcdef01234567".into(),
        short_commit: "0123456".into(),
        commit_url: None,
        committer: "Alice".into(),
        deployer: "Bob".into(),
        started_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        finished_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 30).unwrap(),
        event: "deployment_succeeded".into(),
        reason: None,
        source: "web".into(),
    }
}

pub(crate) fn fixture_hook(channel: HookChannel) -> Hook {
    let config = match channel {
        HookChannel::Mail => serde_json::json!({ "email": "ops@example.com" }),
        HookChannel::Chat => serde_json::json!({
            "webhook": "https://hooks.slack.com/services/T000/B000/XXXX",
            "channel": "#deploys",
            "icon": ":rocket:",
        }),
        HookChannel::Markdown => serde_json::json!({
            "webhook": "https://oapi.dingtalk.com/robot/send?access_token=test",
            "at_mobiles": "13800000000,13900000000",
            "is_at_all": false,
        }),
        HookChannel::Webhook => serde_json::json!({ "url": "https://ci.example.com/hooks/deploy" }),
    };

    Hook {
        id: format!("hook-{channel}"),
        project_id: "7".into(),
        name: "Ops Team".into(),
        channel,
        config,
        enabled: true,
        on_deployment_success: true,
        on_deployment_failure: true,
    }
}
