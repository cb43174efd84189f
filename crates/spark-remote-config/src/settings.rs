use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::SettingsError, provider::ProviderSettings};

/// 缺省拉取过期时间：12 小时。
pub const DEFAULT_EXPIRATION_SECS: u64 = 12 * 60 * 60;

/// 会话启动设置。
///
/// ### 契约说明（What）
/// - 可从 TOML 片段加载，缺失字段取缺省值：开发者模式关闭，过期时间 43 200 秒；
/// - 未知字段视为错误，避免拼写错误被静默忽略。
///
/// ```
/// use spark_remote_config::SessionSettings;
///
/// let settings = SessionSettings::from_toml_str("developer_mode = true").unwrap();
/// assert!(settings.developer_mode);
/// assert_eq!(settings.default_expiration().as_secs(), 43_200);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    pub developer_mode: bool,
    pub default_expiration_secs: u64,
}

impl SessionSettings {
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(raw)?)
    }

    #[inline]
    pub fn default_expiration(&self) -> Duration {
        Duration::from_secs(self.default_expiration_secs)
    }

    #[inline]
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings::new(self.developer_mode)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            developer_mode: false,
            default_expiration_secs: DEFAULT_EXPIRATION_SECS,
        }
    }
}
