//! Values derived from a finished deployment, shared by every message builder.

use crate::error::Result;
use crate::services::{Resource, Translator, UrlGenerator};
use shipnote_common::types::{Outcome, Project, TaskRun};

/// Timestamp format used in human-readable summaries.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inline link syntax of a receiving client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `<url|label>`
    Chat,
    /// `[label](url)`
    Markdown,
}

impl LinkStyle {
    /// Inline link to `url`, with `label` escaped for the style.
    pub fn link(self, url: &str, label: &str) -> String {
        let label = self.escape(label);
        match self {
            LinkStyle::Chat => format!("<{url}|{label}>"),
            LinkStyle::Markdown => format!("[{label}]({url})"),
        }
    }

    /// Escapes the characters that would end a link label early.
    ///
    /// # Examples
    ///
    /// ```
    /// use shipnote_notify::context::LinkStyle;
    ///
    /// assert_eq!(LinkStyle::Chat.escape("a<b>&c"), "a&lt;b&gt;&amp;c");
    /// assert_eq!(LinkStyle::Markdown.escape("[a](b)"), "\\[a\\](b\\)");
    /// ```
    pub fn escape(self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match (self, c) {
                (LinkStyle::Chat, '&') => out.push_str("&amp;"),
                (LinkStyle::Chat, '<') => out.push_str("&lt;"),
                (LinkStyle::Chat, '>') => out.push_str("&gt;"),
                (LinkStyle::Markdown, '[' | ']' | ')' | '\\') => {
                    out.push('\\');
                    out.push(c);
                }
                _ => out.push(c),
            }
        }
        out
    }
}

/// The project and run being notified about, plus the services needed to
/// render them.
///
/// Everything is computed on demand; the context never mutates its inputs.
#[derive(Clone, Copy)]
pub struct EventContext<'a> {
    project: &'a Project,
    run: &'a TaskRun,
    translator: &'a dyn Translator,
    urls: &'a dyn UrlGenerator,
    app_name: &'a str,
}

impl<'a> EventContext<'a> {
    pub fn new(
        project: &'a Project,
        run: &'a TaskRun,
        translator: &'a dyn Translator,
        urls: &'a dyn UrlGenerator,
        app_name: &'a str,
    ) -> Self {
        Self {
            project,
            run,
            translator,
            urls,
            app_name,
        }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    pub fn run(&self) -> &'a TaskRun {
        self.run
    }

    pub fn app_name(&self) -> &'a str {
        self.app_name
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_event(&self.run.event)
    }

    /// Resolves a translation key through the injected translator.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> Result<String> {
        self.translator.resolve(key, params)
    }

    pub fn project_url(&self) -> Result<String> {
        self.urls.url_for(Resource::Project, &self.project.id)
    }

    pub fn deployment_url(&self) -> Result<String> {
        self.urls.url_for(Resource::Deployment, &self.run.id)
    }

    /// Project name linked to its page.
    pub fn project_link(&self, style: LinkStyle) -> Result<String> {
        Ok(style.link(&self.project_url()?, &self.project.name))
    }

    /// Commit URL, if the run has a non-empty one.
    pub fn commit_url(&self) -> Option<&'a str> {
        self.run
            .commit_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Short commit hash, linked only when a commit URL is known.
    pub fn commit_display(&self, style: LinkStyle) -> String {
        match self.commit_url() {
            Some(url) => style.link(url, &self.run.short_commit),
            None => self.run.short_commit.clone(),
        }
    }

    /// Plain `#<id>` reference to the run.
    pub fn deployment_reference(&self) -> String {
        format!("#{}", self.run.id)
    }

    pub fn started_at(&self) -> String {
        self.run.started_at.format(TIME_FORMAT).to_string()
    }

    pub fn finished_at(&self) -> String {
        self.run.finished_at.format(TIME_FORMAT).to_string()
    }

    /// The reason the run was started, unless empty or blank.
    pub fn reason(&self) -> Option<&'a str> {
        self.run
            .reason
            .as_deref()
            .filter(|reason| !reason.trim().is_empty())
    }

    /// Resolved "reason" line, present only when the run has a reason.
    pub fn reason_line(&self) -> Result<Option<String>> {
        self.reason()
            .map(|reason| self.t("notify.reason", &[("reason", reason)]))
            .transpose()
    }
}
