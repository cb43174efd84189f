//! 错误分类。
//!
//! 只有拉取（fetch）与设置解析会失败；类型化读取始终是全函数，
//! 无法转换或查找不到的值一律回退到缺省值，不会以错误形式出现。

use std::time::Duration;

use thiserror::Error;

use crate::provider::FetchStatus;

/// 远程配置中心上报的失败原因，原样透传给调用方。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    /// 网络不可达或请求超时。
    #[error("remote config network failure: {reason}")]
    Network { reason: String },

    /// 拉取过于频繁，被配置中心限流。
    #[error("remote config fetch throttled, retry after {retry_after:?}")]
    Throttled { retry_after: Duration },

    /// 配置中心内部错误。
    #[error("remote config provider error: {reason}")]
    Internal { reason: String },
}

impl ProviderError {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}

/// [`crate::ConfigSession::fetch`] 的失败结果。
///
/// 失败不会修改当前生效的配置；调用方可以继续使用上一次激活的快照（或纯默认值）。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// 配置中心未返回成功状态，也未给出错误原因。
    #[error("remote config fetch finished with status {status}")]
    Unsuccessful { status: FetchStatus },
}

/// 会话设置解析失败。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid session settings: {0}")]
    Parse(#[from] toml::de::Error),
}

const _: fn() = || {
    fn assert_error_traits<T: std::error::Error + Send + Sync + 'static>() {}

    assert_error_traits::<ProviderError>();
    assert_error_traits::<FetchError>();
    assert_error_traits::<SettingsError>();
};
