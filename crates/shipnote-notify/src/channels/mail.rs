use super::{parse_config, require};
use crate::context::EventContext;
use crate::error::Result;
use crate::{ChannelMessage, MessageBody};
use serde::Deserialize;
use serde_json::Value;
use shipnote_common::types::{Hook, HookChannel};
use std::collections::BTreeMap;

/// Template the transport renders the HTML body with.
pub const MAIL_TEMPLATE: &str = "deployment_finished";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailTemplateData {
    /// Hook display name
    pub name: String,
    pub greeting: String,
    pub table: Vec<SummaryRow>,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAction {
    pub label: String,
    pub url: String,
}

/// Email with a summary table and a link to the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub subject: String,
    pub template: &'static str,
    pub template_data: MailTemplateData,
    pub intro_lines: Vec<String>,
    pub action: MailAction,
    /// Lines after the action; holds the reason line when there is one
    pub outro_lines: Vec<String>,
}

impl MailMessage {
    pub fn payload(&self) -> Value {
        let table: Vec<Value> = self
            .template_data
            .table
            .iter()
            .map(|row| serde_json::json!({ "label": row.label, "value": row.value }))
            .collect();

        serde_json::json!({
            "subject": self.subject,
            "template": self.template,
            "template_data": {
                "name": self.template_data.name,
                "greeting": self.template_data.greeting,
                "table": table,
                "signature": self.template_data.signature,
            },
            "intro_lines": self.intro_lines,
            "action": {
                "label": self.action.label,
                "url": self.action.url,
            },
            "outro_lines": self.outro_lines,
        })
    }

    /// Plain-text alternative body.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.template_data.greeting);
        out.push_str("\n\n");
        for line in &self.intro_lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        for row in &self.template_data.table {
            out.push_str(&format!("{}: {}\n", row.label, row.value));
        }
        out.push_str(&format!("\n{}: {}\n", self.action.label, self.action.url));
        if !self.outro_lines.is_empty() {
            out.push('\n');
            for line in &self.outro_lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("\n-- \n");
        out.push_str(&self.template_data.signature);
        out
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MailConfig {
    email: String,
}

impl MailConfig {
    pub(crate) fn parse(config: &Value) -> Result<Self> {
        let cfg: Self = parse_config(HookChannel::Mail, config)?;
        require(HookChannel::Mail, "email", &cfg.email)?;
        Ok(cfg)
    }
}

/// Builds the email for a finished deployment.
pub fn build(
    ctx: &EventContext<'_>,
    hook: &Hook,
    subject_key: &str,
    body_key: &str,
) -> Result<ChannelMessage> {
    let config = MailConfig::parse(&hook.config)?;
    let project = ctx.project();
    let run = ctx.run();
    let project_param = [("project", project.name.as_str())];

    let row = |key: &str, value: String| -> Result<SummaryRow> {
        Ok(SummaryRow {
            label: ctx.t(key, &[])?,
            value,
        })
    };
    let table = vec![
        row("notify.project_name", project.name.clone())?,
        row("notify.deployed_branch", run.branch.clone())?,
        row("notify.started_at", ctx.started_at())?,
        row("notify.finished_at", ctx.finished_at())?,
        row("notify.last_committer", run.committer.clone())?,
        row("notify.last_commit", run.short_commit.clone())?,
    ];

    let message = MailMessage {
        subject: ctx.t(subject_key, &project_param)?,
        template: MAIL_TEMPLATE,
        template_data: MailTemplateData {
            name: hook.name.clone(),
            greeting: ctx.t("notify.greeting", &[("name", hook.name.as_str())])?,
            table,
            signature: ctx.app_name().to_string(),
        },
        intro_lines: vec![ctx.t(body_key, &project_param)?],
        action: MailAction {
            label: ctx.t("notify.deployment_details", &[])?,
            url: ctx.deployment_url()?,
        },
        outro_lines: ctx.reason_line()?.into_iter().collect(),
    };

    Ok(ChannelMessage {
        hook_id: hook.id.clone(),
        channel: HookChannel::Mail,
        destination: config.email,
        headers: BTreeMap::new(),
        body: MessageBody::Mail(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::test_support::{fixture_hook, fixture_project, fixture_run, Fixture};

    const SUBJECT: &str = "notify.deployment_succeeded.subject";
    const BODY: &str = "notify.deployment_succeeded.mail";

    fn mail(msg: &ChannelMessage) -> &MailMessage {
        match &msg.body {
            MessageBody::Mail(mail) => mail,
            other => panic!("expected mail body, got {other:?}"),
        }
    }

    #[test]
    fn builds_subject_table_and_action() {
        let fx = Fixture::default();
        let (project, run) = (fixture_project(), fixture_run());
        let hook = fixture_hook(HookChannel::Mail);

        let msg = build(&fx.context(&project, &run), &hook, SUBJECT, BODY).unwrap();
        assert_eq!(msg.destination, "ops@example.com");
        assert_eq!(msg.hook_id, "hook-mail");
        assert!(msg.headers.is_empty());

        let mail = mail(&msg);
        assert_eq!(mail.subject, "Deployment of api-gateway succeeded");
        assert_eq!(mail.template, MAIL_TEMPLATE);
        assert_eq!(mail.template_data.name, "Ops Team");
        assert_eq!(mail.template_data.greeting, "Hello Ops Team,");
        assert_eq!(
            mail.intro_lines,
            vec!["The deployment of api-gateway has completed successfully.".to_string()]
        );

        let table: Vec<(&str, &str)> = mail
            .template_data
            .table
            .iter()
            .map(|r| (r.label.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("Project Name", "api-gateway"),
                ("Deployed Branch", "main"),
                ("Started At", "2024-03-01 10:00:00"),
                ("Finished At", "2024-03-01 10:05:30"),
                ("Last Committer", "Alice"),
                ("Last Commit", "0123456"),
            ]
        );

        assert_eq!(mail.action.label, "View the deployment");
        assert_eq!(mail.action.url, "https://deploy.example.com/deployments/42");
        assert!(mail.outro_lines.is_empty());
    }

    #[test]
    fn payload_carries_template_and_table() {
        let fx = Fixture::default();
        let project = fixture_project();
        let mut run = fixture_run();
        run.reason = Some("Hotfix".into());
        let hook = fixture_hook(HookChannel::Mail);

        let msg = build(&fx.context(&project, &run), &hook, SUBJECT, BODY).unwrap();
        let payload = msg.body.to_json();
        assert!(payload.is_object());
        assert_eq!(payload["subject"], "Deployment of api-gateway succeeded");
        assert_eq!(payload["template"], MAIL_TEMPLATE);
        assert_eq!(payload["template_data"]["name"], "Ops Team");
        assert_eq!(payload["template_data"]["table"][0]["label"], "Project Name");
        assert_eq!(payload["template_data"]["table"][5]["value"], "0123456");
        assert_eq!(payload["action"]["url"], "https://deploy.example.com/deployments/42");
        assert_eq!(payload["outro_lines"][0], "Reason: Hotfix");
    }

    #[test]
    fn reason_line_follows_action() {
        let fx = Fixture::default();
        let project = fixture_project();
        let mut run = fixture_run();
        run.reason = Some("Hotfix for #123".into());
        let hook = fixture_hook(HookChannel::Mail);

        let msg = build(&fx.context(&project, &run), &hook, SUBJECT, BODY).unwrap();
        let mail = mail(&msg);
        assert_eq!(mail.outro_lines, vec!["Reason: Hotfix for #123".to_string()]);

        let text = mail.render_text();
        let action_at = text.find("View the deployment").unwrap();
        let reason_at = text.find("Reason: Hotfix for #123").unwrap();
        assert!(reason_at > action_at);
        assert_eq!(text.matches("Reason:").count(), 1);
    }

    #[test]
    fn blank_reason_has_no_line() {
        let fx = Fixture::default();
        let project = fixture_project();
        let mut run = fixture_run();
        run.reason = Some("   ".into());
        let hook = fixture_hook(HookChannel::Mail);

        let msg = build(&fx.context(&project, &run), &hook, SUBJECT, BODY).unwrap();
        assert!(mail(&msg).outro_lines.is_empty());
        assert!(!mail(&msg).render_text().contains("Reason"));
    }

    #[test]
    fn render_text_lists_table_in_order() {
        let fx = Fixture::default();
        let (project, run) = (fixture_project(), fixture_run());
        let hook = fixture_hook(HookChannel::Mail);

        let msg = build(&fx.context(&project, &run), &hook, SUBJECT, BODY).unwrap();
        let text = mail(&msg).render_text();
        assert!(text.starts_with("Hello Ops Team,\n\n"));
        let branch_at = text.find("Deployed Branch: main").unwrap();
        let commit_at = text.find("Last Commit: 0123456").unwrap();
        assert!(branch_at < commit_at);
        assert!(text.ends_with("-- \nShipnote"));
    }

    #[test]
    fn missing_email_is_malformed() {
        let fx = Fixture::default();
        let (project, run) = (fixture_project(), fixture_run());
        let mut hook = fixture_hook(HookChannel::Mail);

        hook.config = serde_json::json!({});
        let err = build(&fx.context(&project, &run), &hook, SUBJECT, BODY).unwrap_err();
        assert!(matches!(err, NotifyError::MalformedConfiguration { channel: HookChannel::Mail, .. }));

        hook.config = serde_json::json!({ "email": "" });
        assert!(build(&fx.context(&project, &run), &hook, SUBJECT, BODY).is_err());
    }

    #[test]
    fn unknown_template_key_fails() {
        let fx = Fixture::default();
        let (project, run) = (fixture_project(), fixture_run());
        let hook = fixture_hook(HookChannel::Mail);

        let err = build(&fx.context(&project, &run), &hook, "notify.nope", BODY).unwrap_err();
        assert!(matches!(err, NotifyError::MissingTranslation { .. }));
    }
}
