use shipnote_common::types::{Hook, Outcome, Project};

/// Why a hook does not receive a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    OtherProject,
    NotSubscribed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "hook disabled"),
            SkipReason::OtherProject => write!(f, "hook belongs to another project"),
            SkipReason::NotSubscribed => write!(f, "hook not subscribed to this outcome"),
        }
    }
}

/// Decides whether `hook` wants the notification for `outcome` of `project`.
pub fn should_notify(hook: &Hook, project: &Project, outcome: Outcome) -> Result<(), SkipReason> {
    if !hook.enabled {
        return Err(SkipReason::Disabled);
    }
    if hook.project_id != project.id {
        return Err(SkipReason::OtherProject);
    }
    let subscribed = match outcome {
        Outcome::Succeeded => hook.on_deployment_success,
        Outcome::Failed => hook.on_deployment_failure,
    };
    if !subscribed {
        return Err(SkipReason::NotSubscribed);
    }
    Ok(())
}
