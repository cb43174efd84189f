//! 进程内参考配置中心。
//!
//! [`InMemoryProvider`] 按 [`ConfigProvider`] 契约模拟远程配置中心：
//! 服务端数据通过 `stage*` 方法预置，`fetch` 把服务端数据拉到待激活区，
//! `activate_fetched` 再把待激活区原子地换入可读快照。适用于测试、演示与离线运行。

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::{
    error::ProviderError,
    namespace::Namespace,
    provider::{ConfigProvider, FetchStatus, ProviderSettings},
    value::ConfigValue,
};

type NamespacedValues = BTreeMap<Namespace, BTreeMap<String, ConfigValue>>;

#[derive(Default)]
struct FetchState {
    /// 最近一次真实往返拉到的数据，同时充当过期时间内的缓存。
    cached: Option<(Instant, Arc<NamespacedValues>)>,
    /// 已拉取、尚未激活的数据。
    pending: Option<Arc<NamespacedValues>>,
}

/// 进程内配置中心。
///
/// ## 逻辑说明（How）
/// - 非开发者模式下，距上次真实往返不足 `expiration` 的拉取直接复用缓存，
///   期间新预置的服务端数据不可见；开发者模式总是真实往返。
/// - 预置失败（[`Self::fail_with`]）会让后续拉取返回该错误，直到 [`Self::clear_failure`]。
/// - 激活使用 [`ArcSwap`] 整体替换快照，后完成的激活覆盖先完成的。
pub struct InMemoryProvider {
    remote: RwLock<NamespacedValues>,
    failure: Mutex<Option<ProviderError>>,
    fetch_state: Mutex<FetchState>,
    active: ArcSwap<NamespacedValues>,
    defaults: RwLock<NamespacedValues>,
    settings: Mutex<ProviderSettings>,
    round_trips: AtomicU64,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self {
            remote: RwLock::new(BTreeMap::new()),
            failure: Mutex::new(None),
            fetch_state: Mutex::new(FetchState::default()),
            active: ArcSwap::from_pointee(BTreeMap::new()),
            defaults: RwLock::new(BTreeMap::new()),
            settings: Mutex::new(ProviderSettings::default()),
            round_trips: AtomicU64::new(0),
        }
    }

    /// 在默认命名空间预置一条服务端数据。
    pub fn stage<I, V>(&self, identifier: I, value: V)
    where
        I: Into<String>,
        V: Into<ConfigValue>,
    {
        self.stage_in(&Namespace::DEFAULT, identifier, value);
    }

    /// 在指定命名空间预置一条服务端数据。
    pub fn stage_in<I, V>(&self, namespace: &Namespace, identifier: I, value: V)
    where
        I: Into<String>,
        V: Into<ConfigValue>,
    {
        self.remote
            .write()
            .entry(namespace.clone())
            .or_default()
            .insert(identifier.into(), value.into());
    }

    /// 整体替换某个命名空间的服务端数据。
    pub fn stage_namespace(&self, namespace: &Namespace, values: BTreeMap<String, ConfigValue>) {
        let mut remote = self.remote.write();
        if values.is_empty() {
            remote.remove(namespace);
        } else {
            remote.insert(namespace.clone(), values);
        }
    }

    /// 删除一条服务端数据。
    pub fn unstage(&self, namespace: &Namespace, identifier: &str) {
        let mut remote = self.remote.write();
        if let Some(bucket) = remote.get_mut(namespace) {
            bucket.remove(identifier);
            if bucket.is_empty() {
                remote.remove(namespace);
            }
        }
    }

    /// 让后续拉取失败。
    pub fn fail_with(&self, error: ProviderError) {
        *self.failure.lock() = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock() = None;
    }

    /// 实际发生的远程往返次数（不含缓存命中）。
    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// 配置中心自身默认层中某个命名空间的内容。
    pub fn defaults(&self, namespace: &Namespace) -> BTreeMap<String, ConfigValue> {
        self.defaults
            .read()
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    /// 配置中心原生读取：已激活的远程值优先，其次是配置中心自身的默认层。
    pub fn effective_value(&self, identifier: &str, namespace: &Namespace) -> Option<ConfigValue> {
        self.fetched_value(identifier, namespace).or_else(|| {
            self.defaults
                .read()
                .get(namespace)
                .and_then(|bucket| bucket.get(identifier))
                .cloned()
        })
    }

    fn round_trip(&self) -> Arc<NamespacedValues> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        Arc::new(self.remote.read().clone())
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigProvider for InMemoryProvider {
    fn fetched_value(&self, identifier: &str, namespace: &Namespace) -> Option<ConfigValue> {
        self.active
            .load()
            .get(namespace)
            .and_then(|bucket| bucket.get(identifier))
            .cloned()
    }

    fn set_defaults(&self, namespace: &Namespace, defaults: BTreeMap<String, ConfigValue>) {
        let mut layer = self.defaults.write();
        if defaults.is_empty() {
            layer.remove(namespace);
        } else {
            layer.insert(namespace.clone(), defaults);
        }
    }

    async fn fetch(&self, expiration: Duration) -> Result<FetchStatus, ProviderError> {
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }

        let developer_mode = self.settings.lock().developer_mode;
        let mut state = self.fetch_state.lock();
        let cached = state
            .cached
            .as_ref()
            .filter(|(fetched_at, _)| !developer_mode && fetched_at.elapsed() < expiration)
            .map(|(_, values)| Arc::clone(values));

        let values = match cached {
            Some(values) => {
                tracing::debug!(
                    expiration_secs = expiration.as_secs_f64(),
                    "serving remote config fetch from cache"
                );
                values
            }
            None => {
                let values = self.round_trip();
                state.cached = Some((Instant::now(), Arc::clone(&values)));
                values
            }
        };
        state.pending = Some(values);
        Ok(FetchStatus::Success)
    }

    fn activate_fetched(&self) -> bool {
        match self.fetch_state.lock().pending.take() {
            Some(values) => {
                self.active.store(values);
                true
            }
            None => false,
        }
    }

    fn configure(&self, settings: ProviderSettings) {
        *self.settings.lock() = settings;
    }

    fn settings(&self) -> ProviderSettings {
        *self.settings.lock()
    }
}
