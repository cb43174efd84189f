use std::{collections::BTreeMap, fmt, time::Duration};

use async_trait::async_trait;

use crate::{error::ProviderError, namespace::Namespace, value::ConfigValue};

/// 一次拉取的结束状态。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FetchStatus {
    /// 尚未发生过拉取。
    NoFetchYet,
    /// 拉取成功，新数据等待激活。
    Success,
    /// 拉取失败。
    Failure,
    /// 被配置中心限流，未产生新数据。
    Throttled,
}

impl FetchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoFetchYet => "no_fetch_yet",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Throttled => "throttled",
        }
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 推送给配置中心的运行设置。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// 开发者模式：放宽拉取限流，便于开发期频繁刷新。
    pub developer_mode: bool,
}

impl ProviderSettings {
    pub const fn new(developer_mode: bool) -> Self {
        Self { developer_mode }
    }
}

/// 远程配置中心契约。
///
/// ## 设计目的（Why）
/// - 本 crate 只消费该接口，不关心传输、缓存与持久化；限流与激活算法同样归实现方所有。
///
/// ## 契约定义（What）
/// - `fetched_value`：只查询**已激活**的远程快照，不得合并实现方自身的默认层；
///   缺失返回 `None`。
/// - `set_defaults`：整体替换某个命名空间的默认层，传入空映射表示清空该命名空间。
/// - `fetch`：异步拉取；`expiration` 内的重复拉取可由实现方直接以缓存应答。
///   返回 `Err` 表示带原因的失败，`Ok` 携带结束状态。调用方不会取消进行中的拉取。
/// - `activate_fetched`：把最近一次成功拉取的数据换入可读快照，返回是否发生了替换；
///   读者只能观察到替换前或替换后的完整快照。
/// - `configure`/`settings`：写入与读取运行设置。
///
/// ## 设计权衡与注意事项（Trade-offs）
/// - 所有同步方法都应快速返回，不得阻塞调用线程；
/// - `set_defaults` 在调用方持有内部锁时被调用，实现中不得回调 [`crate::ConfigView`]。
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    fn fetched_value(&self, identifier: &str, namespace: &Namespace) -> Option<ConfigValue>;

    fn set_defaults(&self, namespace: &Namespace, defaults: BTreeMap<String, ConfigValue>);

    async fn fetch(&self, expiration: Duration) -> Result<FetchStatus, ProviderError>;

    fn activate_fetched(&self) -> bool;

    fn configure(&self, settings: ProviderSettings);

    fn settings(&self) -> ProviderSettings;
}
