//! 远程配置会话。
//!
//! 会话持有共享的 [`ConfigView`] 与配置中心句柄，负责开发者模式、拉取过期时间
//! 以及“拉取后立即激活”的流程。会话由调用方显式构造并以 `Arc` 共享，
//! 一个进程通常只需要一个实例；本 crate 不提供全局单例。

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

use crate::{
    error::{FetchError, ProviderError},
    provider::{ConfigProvider, FetchStatus, ProviderSettings},
    settings::SessionSettings,
    view::ConfigView,
};

/// 远程配置会话。
///
/// ## 设计目的（Why）
/// - 把配置中心的运行设置、拉取过期时间与“拉取即激活”流程收拢到一个显式注入的对象中。
///
/// ## 逻辑说明（How）
/// - 持有共享的 [`ConfigView`] 与配置中心句柄；开发者模式用原子量保存，过期时间与最近状态用互斥锁保存。
///
/// ## 契约定义（What）
/// - 构造时立即把 [`ProviderSettings`] 推送给配置中心；
/// - [`Self::fetch`] 成功后自动激活新数据，失败时不触碰当前生效的快照；
/// - 拉取不会自动重试，也不支持取消。
///
/// ## 设计权衡与注意事项（Trade-offs）
/// - 多个会话共享同一个配置中心时，后设置的开发者模式覆盖先前的设置。
pub struct ConfigSession {
    view: Arc<ConfigView>,
    provider: Arc<dyn ConfigProvider>,
    developer_mode: AtomicBool,
    default_expiration: Mutex<Duration>,
    last_status: Mutex<FetchStatus>,
}

impl ConfigSession {
    /// 以缺省设置构造会话。
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self::with_settings(provider, SessionSettings::default())
    }

    pub fn with_settings(provider: Arc<dyn ConfigProvider>, settings: SessionSettings) -> Self {
        provider.configure(settings.provider_settings());
        tracing::info!(
            developer_mode = settings.developer_mode,
            default_expiration_secs = settings.default_expiration_secs,
            "remote config session created"
        );
        Self {
            view: Arc::new(ConfigView::new(Arc::clone(&provider))),
            provider,
            developer_mode: AtomicBool::new(settings.developer_mode),
            default_expiration: Mutex::new(settings.default_expiration()),
            last_status: Mutex::new(FetchStatus::NoFetchYet),
        }
    }

    /// 共享的配置视图。
    #[inline]
    pub fn config(&self) -> Arc<ConfigView> {
        Arc::clone(&self.view)
    }

    pub fn developer_mode(&self) -> bool {
        self.developer_mode.load(Ordering::SeqCst)
    }

    /// 切换开发者模式；返回前配置中心已完成重新配置。
    pub fn set_developer_mode(&self, enabled: bool) {
        self.developer_mode.store(enabled, Ordering::SeqCst);
        self.provider.configure(ProviderSettings::new(enabled));
        tracing::info!(developer_mode = enabled, "remote config developer mode changed");
    }

    /// 配置中心当前实际生效的开发者模式。
    pub fn provider_developer_mode(&self) -> bool {
        self.provider.settings().developer_mode
    }

    pub fn default_expiration(&self) -> Duration {
        *self.default_expiration.lock()
    }

    pub fn set_default_expiration(&self, expiration: Duration) {
        *self.default_expiration.lock() = expiration;
    }

    /// 本会话最近一次观察到的拉取状态。
    pub fn last_fetch_status(&self) -> FetchStatus {
        *self.last_status.lock()
    }

    /// 拉取远程配置并激活。
    ///
    /// ### 逻辑（How）
    /// 1. 过期时间取 `expiration`，缺省时取会话默认值；
    /// 2. 等待配置中心拉取完成；
    /// 3. 状态为成功时调用 `activate_fetched` 并返回视图；
    ///    配置中心报错时原样透传，非成功且无错误原因时返回 [`FetchError::Unsuccessful`]。
    pub async fn fetch(&self, expiration: Option<Duration>) -> Result<Arc<ConfigView>, FetchError> {
        let expiration = expiration.unwrap_or_else(|| self.default_expiration());
        tracing::debug!(
            expiration_secs = expiration.as_secs_f64(),
            "remote config fetch started"
        );

        let status = match self.provider.fetch(expiration).await {
            Ok(status) => status,
            Err(error) => {
                self.record(status_of(&error));
                tracing::warn!(error = %error, "remote config fetch failed");
                return Err(error.into());
            }
        };
        self.record(status);

        if !status.is_success() {
            tracing::warn!(status = %status, "remote config fetch finished without success");
            return Err(FetchError::Unsuccessful { status });
        }

        let activated = self.provider.activate_fetched();
        tracing::info!(activated, "remote config fetched");
        Ok(self.config())
    }

    /// 在 Tokio 运行时上发起拉取，完成后把结果交给 `completion`。
    ///
    /// 丢弃返回的 [`tokio::task::JoinHandle`] 不会取消任务，`completion` 依旧会被调用。
    /// 必须在 Tokio 运行时上下文中调用。
    #[cfg(feature = "runtime-tokio")]
    pub fn spawn_fetch<F>(
        self: &Arc<Self>,
        expiration: Option<Duration>,
        completion: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<Arc<ConfigView>, FetchError>) + Send + 'static,
    {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = session.fetch(expiration).await;
            completion(outcome);
        })
    }

    fn record(&self, status: FetchStatus) {
        *self.last_status.lock() = status;
    }
}

fn status_of(error: &ProviderError) -> FetchStatus {
    match error {
        ProviderError::Throttled { .. } => FetchStatus::Throttled,
        _ => FetchStatus::Failure,
    }
}
