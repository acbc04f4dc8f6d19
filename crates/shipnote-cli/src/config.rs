use anyhow::Context;
use serde::{Deserialize, Serialize};
use shipnote_common::i18n;
use shipnote_common::types::{Hook, Project, TaskRun};
use shipnote_notify::manager::NotificationManager;
use shipnote_notify::services::{CatalogTranslator, RouteTable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 展示在聊天消息页脚和邮件签名中的应用名称
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// 生成项目与部署链接的根地址，例如 https://deploy.example.com
    pub base_url: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_app_name() -> String {
    "Shipnote".to_string()
}

fn default_locale() -> String {
    i18n::DEFAULT_LOCALE.to_string()
}

impl AppConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file '{path}'"))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&mut self) -> anyhow::Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https://, got '{}'", self.base_url);
        }
        if self.app_name.trim().is_empty() {
            anyhow::bail!("app_name must not be empty");
        }
        if !i18n::is_supported_locale(&self.locale) {
            tracing::warn!(
                locale = %self.locale,
                fallback = i18n::DEFAULT_LOCALE,
                "Unsupported locale, using default"
            );
            self.locale = i18n::normalize_locale(&self.locale).to_string();
        }
        Ok(())
    }

    /// Notification manager wired with the built-in catalog and route table.
    pub fn manager(&self) -> NotificationManager {
        NotificationManager::new(
            Box::new(CatalogTranslator::new(&self.locale)),
            Box::new(RouteTable::new(&self.base_url)),
            &self.app_name,
        )
    }
}

// ---- Event file (input of the preview command) ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFile {
    pub project: Project,
    pub run: TaskRun,
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

impl EventFile {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file '{path}'"))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse event file '{path}'"))
    }
}
