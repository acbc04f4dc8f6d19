use crate::channels;
use crate::context::EventContext;
use crate::error::{NotifyError, Result};
use crate::routing::{should_notify, SkipReason};
use crate::services::{Translator, UrlGenerator};
use crate::utils::{truncate_string, MAX_PREVIEW_LENGTH};
use crate::ChannelMessage;
use shipnote_common::types::{Hook, Project, TaskRun};
use tracing;

/// Result of notifying every hook of a project about one run.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub messages: Vec<ChannelMessage>,
    /// One [`NotifyError::BuildFailed`] per hook whose message could not be built
    pub failures: Vec<NotifyError>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds the notifications of finished runs for a set of hooks.
///
/// Holds only read-only services, so one manager can be shared between
/// threads and used for many runs.
pub struct NotificationManager {
    translator: Box<dyn Translator>,
    urls: Box<dyn UrlGenerator>,
    app_name: String,
}

impl NotificationManager {
    pub fn new(translator: Box<dyn Translator>, urls: Box<dyn UrlGenerator>, app_name: &str) -> Self {
        Self {
            translator,
            urls,
            app_name: app_name.to_string(),
        }
    }

    pub fn context<'a>(&'a self, project: &'a Project, run: &'a TaskRun) -> EventContext<'a> {
        EventContext::new(project, run, self.translator.as_ref(), self.urls.as_ref(), &self.app_name)
    }

    /// Builds the message of a single hook, tagging any failure with the hook.
    pub fn build(&self, project: &Project, run: &TaskRun, hook: &Hook) -> Result<ChannelMessage> {
        channels::build(&self.context(project, run), hook).map_err(|e| NotifyError::BuildFailed {
            hook_id: hook.id.clone(),
            channel: hook.channel,
            source: Box::new(e),
        })
    }

    /// Builds messages for every hook that wants this run.
    ///
    /// A hook whose message fails to build is reported and skipped; the
    /// remaining hooks are still processed.
    pub fn notify(&self, project: &Project, run: &TaskRun, hooks: &[Hook]) -> DispatchReport {
        let outcome = self.context(project, run).outcome();
        let mut report = DispatchReport::default();

        for hook in hooks {
            if let Err(reason) = should_notify(hook, project, outcome) {
                tracing::info!(
                    hook_id = %hook.id,
                    channel = %hook.channel,
                    reason = %reason,
                    "Notification skipped"
                );
                report.skipped.push((hook.id.clone(), reason));
                continue;
            }

            match self.build(project, run, hook) {
                Ok(message) => {
                    tracing::debug!(
                        hook_id = %hook.id,
                        channel = %hook.channel,
                        destination = %truncate_string(&message.destination, 64),
                        payload = %truncate_string(&message.body.to_json().to_string(), MAX_PREVIEW_LENGTH),
                        "Notification built"
                    );
                    report.messages.push(message);
                }
                Err(e) => {
                    tracing::error!(
                        hook_id = %hook.id,
                        channel = %hook.channel,
                        config = %channels::redact_config(hook.channel, &hook.config),
                        error = %e,
                        "Failed to build notification"
                    );
                    report.failures.push(e);
                }
            }
        }

        tracing::info!(
            run_id = %run.id,
            outcome = %outcome,
            built = report.messages.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "Notifications dispatched"
        );
        report
    }
}
