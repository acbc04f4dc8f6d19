//! Built-in translation catalog.
//!
//! Provides a static translation map keyed by `(locale, message_key)` and a
//! `{name}` placeholder interpolator. Supported locales: `zh-CN`, `en`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Default locale when none is configured.
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Supported locales.
pub const SUPPORTED_LOCALES: &[&str] = &["zh-CN", "en"];

/// Central translation registry.
pub struct Translations {
    map: HashMap<(&'static str, &'static str), &'static str>,
}

impl Translations {
    /// Get a translated template string for the given locale and key.
    /// Falls back to `en`; returns `None` if no locale has the key.
    pub fn get_template(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.map
            .get(&(locale, key))
            .or_else(|| {
                if locale != "en" {
                    self.map.get(&("en", key))
                } else {
                    None
                }
            })
            .copied()
    }
}

/// Global translation catalog.
pub static TRANSLATIONS: LazyLock<Translations> = LazyLock::new(|| {
    let mut map = HashMap::new();

    macro_rules! t {
        ($locale:expr, $key:expr, $val:expr) => {
            map.insert(($locale, $key), $val);
        };
    }

    // ---- Mail ----
    t!("en", "notify.deployment_succeeded.subject", "Deployment of {project} succeeded");
    t!("zh-CN", "notify.deployment_succeeded.subject", "{project} 部署成功");
    t!("en", "notify.deployment_failed.subject", "Deployment of {project} failed");
    t!("zh-CN", "notify.deployment_failed.subject", "{project} 部署失败");
    t!(
        "en",
        "notify.deployment_succeeded.mail",
        "The deployment of {project} has completed successfully."
    );
    t!("zh-CN", "notify.deployment_succeeded.mail", "{project} 的部署已成功完成。");
    t!("en", "notify.deployment_failed.mail", "The deployment of {project} has failed.");
    t!("zh-CN", "notify.deployment_failed.mail", "{project} 的部署失败了。");

    // ---- Chat / markdown ----
    t!("en", "notify.deployment_succeeded.chat", "Deployment {deployment} succeeded");
    t!("zh-CN", "notify.deployment_succeeded.chat", "部署 {deployment} 成功");
    t!("en", "notify.deployment_failed.chat", "Deployment {deployment} failed");
    t!("zh-CN", "notify.deployment_failed.chat", "部署 {deployment} 失败");
    t!("en", "notify.deployment_succeeded.markdown", "Deployment {deployment} succeeded");
    t!("zh-CN", "notify.deployment_succeeded.markdown", "部署 {deployment} 成功");
    t!("en", "notify.deployment_failed.markdown", "Deployment {deployment} failed");
    t!("zh-CN", "notify.deployment_failed.markdown", "部署 {deployment} 失败");

    // ---- Summary labels ----
    t!("en", "notify.greeting", "Hello {name},");
    t!("zh-CN", "notify.greeting", "{name}，您好：");
    t!("en", "notify.project", "Project");
    t!("zh-CN", "notify.project", "项目");
    t!("en", "notify.project_name", "Project Name");
    t!("zh-CN", "notify.project_name", "项目名称");
    t!("en", "notify.branch", "Branch");
    t!("zh-CN", "notify.branch", "分支");
    t!("en", "notify.deployed_branch", "Deployed Branch");
    t!("zh-CN", "notify.deployed_branch", "部署分支");
    t!("en", "notify.started_at", "Started At");
    t!("zh-CN", "notify.started_at", "开始时间");
    t!("en", "notify.finished_at", "Finished At");
    t!("zh-CN", "notify.finished_at", "结束时间");
    t!("en", "notify.commit", "Commit");
    t!("zh-CN", "notify.commit", "提交");
    t!("en", "notify.committer", "Committer");
    t!("zh-CN", "notify.committer", "提交者");
    t!("en", "notify.last_commit", "Last Commit");
    t!("zh-CN", "notify.last_commit", "最后提交");
    t!("en", "notify.last_committer", "Last Committer");
    t!("zh-CN", "notify.last_committer", "最后提交者");
    t!("en", "notify.deployment_details", "View the deployment");
    t!("zh-CN", "notify.deployment_details", "查看部署详情");
    t!("en", "notify.reason", "Reason: {reason}");
    t!("zh-CN", "notify.reason", "部署原因：{reason}");

    Translations { map }
});

/// Check if a locale string is supported.
pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Normalize locale: return the locale if supported, otherwise return the default.
pub fn normalize_locale(locale: &str) -> &str {
    if is_supported_locale(locale) {
        locale
    } else {
        DEFAULT_LOCALE
    }
}

/// Replaces `{name}` placeholders with the matching parameter value.
///
/// Substitution is single pass, so values are inserted verbatim even when they
/// contain braces themselves. Unknown placeholders are left untouched.
///
/// # Examples
///
/// ```
/// use shipnote_common::i18n::interpolate;
///
/// let text = interpolate("Reason: {reason} ({who})", &[("reason", "{hotfix}")]);
/// assert_eq!(text, "Reason: {hotfix} ({who})");
/// ```
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_template_zh_cn() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get_template("zh-CN", "notify.branch"), Some("分支"));
        assert_eq!(t.get_template("zh-CN", "notify.committer"), Some("提交者"));
    }

    #[test]
    fn test_get_template_en() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get_template("en", "notify.branch"), Some("Branch"));
        assert_eq!(t.get_template("en", "notify.reason"), Some("Reason: {reason}"));
    }

    #[test]
    fn test_fallback_to_en() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get_template("fr", "notify.branch"), Some("Branch"));
    }

    #[test]
    fn test_unknown_key_is_none() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get_template("en", "nonexistent.key"), None);
        assert_eq!(t.get_template("zh-CN", "nonexistent.key"), None);
    }

    #[test]
    fn test_all_keys_have_both_locales() {
        let t = &*TRANSLATIONS;
        let keys: std::collections::HashSet<&str> = t.map.keys().map(|(_, key)| *key).collect();

        for key in &keys {
            assert!(
                t.map.contains_key(&("zh-CN", key)),
                "Missing zh-CN translation for key: {key}"
            );
            assert!(
                t.map.contains_key(&("en", key)),
                "Missing en translation for key: {key}"
            );
        }
    }

    #[test]
    fn test_normalize_locale() {
        assert!(is_supported_locale("en"));
        assert!(!is_supported_locale("fr"));
        assert_eq!(normalize_locale("zh-CN"), "zh-CN");
        assert_eq!(normalize_locale("en"), "en");
        assert_eq!(normalize_locale("fr"), DEFAULT_LOCALE);
    }

    #[test]
    fn test_interpolate_named_params() {
        assert_eq!(
            interpolate("Deployment {deployment} of {project}", &[("deployment", "#42"), ("project", "api")]),
            "Deployment #42 of api"
        );
        assert_eq!(interpolate("no params", &[("x", "y")]), "no params");
        assert_eq!(interpolate("{a}{a}", &[("a", "1")]), "11");
    }

    #[test]
    fn test_interpolate_keeps_unknown_and_unclosed() {
        assert_eq!(interpolate("{missing} here", &[]), "{missing} here");
        assert_eq!(interpolate("open {brace", &[("brace", "x")]), "open {brace");
    }

    #[test]
    fn test_interpolate_does_not_rescan_values() {
        assert_eq!(
            interpolate("{reason}", &[("reason", "{project}"), ("project", "api")]),
            "{project}"
        );
    }
}
