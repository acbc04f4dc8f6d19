use shipnote_common::types::HookChannel;

/// Errors that can occur while building notifications.
///
/// # Examples
///
/// ```rust
/// use shipnote_notify::error::NotifyError;
///
/// let err = NotifyError::MissingTranslation {
///     key: "notify.branch".to_string(),
///     locale: "en".to_string(),
/// };
/// assert!(err.to_string().contains("notify.branch"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A template key has no text in any locale.
    #[error("Notify: missing translation for '{key}' (locale {locale})")]
    MissingTranslation { key: String, locale: String },

    /// A URL could not be generated for the referenced resource.
    #[error("Notify: cannot generate URL for {resource} '{id}'")]
    InvalidReference { resource: String, id: String },

    /// Hook configuration is missing a required field or contains an invalid value.
    #[error("Notify: invalid {channel} configuration: {reason}")]
    MalformedConfiguration { channel: HookChannel, reason: String },

    /// JSON serialization failed while projecting attributes.
    #[error("Notify: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Building the message of a single hook failed.
    #[error("Notify: failed to build {channel} message for hook '{hook_id}': {source}")]
    BuildFailed {
        hook_id: String,
        channel: HookChannel,
        #[source]
        source: Box<NotifyError>,
    },
}

impl NotifyError {
    pub(crate) fn malformed(channel: HookChannel, reason: impl Into<String>) -> Self {
        NotifyError::MalformedConfiguration {
            channel,
            reason: reason.into(),
        }
    }

    /// Hook id of a dispatcher build failure.
    pub fn hook_id(&self) -> Option<&str> {
        match self {
            NotifyError::BuildFailed { hook_id, .. } => Some(hook_id),
            _ => None,
        }
    }
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
