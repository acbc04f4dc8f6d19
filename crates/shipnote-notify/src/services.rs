//! Read-only services injected into the message builders.

use crate::error::{NotifyError, Result};
use shipnote_common::i18n::{self, TRANSLATIONS};

/// Resolves translation keys into text.
pub trait Translator: Send + Sync {
    /// Returns the text for `key` with every `{name}` in `params` substituted.
    fn resolve(&self, key: &str, params: &[(&str, &str)]) -> Result<String>;
}

/// Kind of page a URL is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Project,
    Deployment,
}

impl Resource {
    fn path_segment(self) -> &'static str {
        match self {
            Resource::Project => "projects",
            Resource::Deployment => "deployments",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Project => write!(f, "project"),
            Resource::Deployment => write!(f, "deployment"),
        }
    }
}

/// Generates absolute URLs for application pages.
pub trait UrlGenerator: Send + Sync {
    fn url_for(&self, resource: Resource, id: &str) -> Result<String>;
}

/// [`Translator`] backed by the built-in [`TRANSLATIONS`] catalog.
#[derive(Debug, Clone)]
pub struct CatalogTranslator {
    locale: String,
}

impl CatalogTranslator {
    /// Unsupported locales fall back to [`i18n::DEFAULT_LOCALE`].
    pub fn new(locale: &str) -> Self {
        Self {
            locale: i18n::normalize_locale(locale).to_string(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Default for CatalogTranslator {
    fn default() -> Self {
        Self::new(i18n::DEFAULT_LOCALE)
    }
}

impl Translator for CatalogTranslator {
    fn resolve(&self, key: &str, params: &[(&str, &str)]) -> Result<String> {
        let template = TRANSLATIONS.get_template(&self.locale, key).ok_or_else(|| {
            NotifyError::MissingTranslation {
                key: key.to_string(),
                locale: self.locale.clone(),
            }
        })?;
        Ok(i18n::interpolate(template, params))
    }
}

/// [`UrlGenerator`] mapping resources under a fixed base URL.
///
/// # Examples
///
/// ```
/// use shipnote_notify::services::{Resource, RouteTable, UrlGenerator};
///
/// let routes = RouteTable::new("https://deploy.example.com/");
/// assert_eq!(
///     routes.url_for(Resource::Deployment, "42").unwrap(),
///     "https://deploy.example.com/deployments/42"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable {
    base_url: String,
}

impl RouteTable {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl UrlGenerator for RouteTable {
    fn url_for(&self, resource: Resource, id: &str) -> Result<String> {
        if id.trim().is_empty() {
            return Err(NotifyError::InvalidReference {
                resource: resource.to_string(),
                id: id.to_string(),
            });
        }
        Ok(format!(
            "{}/{}/{}",
            self.base_url,
            resource.path_segment(),
            urlencoding::encode(id)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_with_params() {
        let t = CatalogTranslator::new("en");
        assert_eq!(
            t.resolve("notify.reason", &[("reason", "rollback")]).unwrap(),
            "Reason: rollback"
        );
    }

    #[test]
    fn catalog_reports_missing_key() {
        let t = CatalogTranslator::new("en");
        let err = t.resolve("notify.nope", &[]).unwrap_err();
        match err {
            NotifyError::MissingTranslation { key, locale } => {
                assert_eq!(key, "notify.nope");
                assert_eq!(locale, "en");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn catalog_normalizes_unknown_locale() {
        let t = CatalogTranslator::new("fr");
        assert_eq!(t.locale(), i18n::DEFAULT_LOCALE);
        assert_eq!(t.resolve("notify.branch", &[]).unwrap(), "分支");
    }

    #[test]
    fn routes_join_base_and_encode_id() {
        let routes = RouteTable::new("https://deploy.example.com");
        assert_eq!(
            routes.url_for(Resource::Project, "7").unwrap(),
            "https://deploy.example.com/projects/7"
        );
        assert_eq!(
            routes.url_for(Resource::Deployment, "a b").unwrap(),
            "https://deploy.example.com/deployments/a%20b"
        );
    }

    #[test]
    fn routes_reject_blank_id() {
        let routes = RouteTable::new("https://deploy.example.com");
        let err = routes.url_for(Resource::Deployment, " ").unwrap_err();
        assert!(matches!(err, NotifyError::InvalidReference { .. }));
        assert!(err.to_string().contains("deployment"));
    }
}
