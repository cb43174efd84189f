use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use crate::{
    codec::ConfigType, defaults::DefaultStore, key::TypedKey, namespace::Namespace,
    provider::ConfigProvider, value::ConfigValue,
};

/// 一次读取由哪一层给出。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// 已激活的远程快照。
    Remote,
    /// 本地注册的默认值。
    Default,
    /// 两层都未提供可用值，使用类型缺省值（零值、`None` 或枚举哨兵）。
    Fallback,
}

/// 带来源信息的读取结果。
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T: ConfigType> Resolved<T> {
    fn fallback() -> Self {
        Self {
            value: T::fallback(),
            source: ValueSource::Fallback,
        }
    }

    /// 丢弃来源信息。
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// 配置解析引擎。
///
/// ## 设计目的（Why）
/// - 以一组泛型方法覆盖所有值类型、可选性与命名空间组合，类型由 [`TypedKey`] 的参数决定。
///
/// ## 逻辑说明（How）
/// - 读取：先查配置中心已激活的远程快照；不存在时查本地默认层；都不存在时返回类型缺省值；
/// - 写入：只进入本地默认层，随后把受影响命名空间的完整映射推送给配置中心。
///
/// ## 契约定义（What）
/// - 按“是否存在”选层，选中后只在该层解码一次；解码失败返回缺省值，不再回落到下一层；
/// - 读取永不失败，也不会跨命名空间查找；
/// - 默认层读取（`default_value*`）只看本地默认镜像，不经过配置中心的原生默认值接口；
/// - 每次变更在返回前完成同步。
///
/// ## 设计权衡与注意事项（Trade-offs）
/// - 内部用读写锁保护默认层，推送在持锁期间完成，因此配置中心的 `set_defaults` 不得回调本视图；
/// - 方法均为同步调用，锁对调用方不可见。
pub struct ConfigView {
    defaults: RwLock<DefaultStore>,
    provider: Arc<dyn ConfigProvider>,
}

impl ConfigView {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self {
            defaults: RwLock::new(DefaultStore::new()),
            provider,
        }
    }

    /// 关联的配置中心。
    #[inline]
    pub fn provider(&self) -> &Arc<dyn ConfigProvider> {
        &self.provider
    }

    /// 在默认命名空间读取当前生效值。
    pub fn get<T: ConfigType>(&self, key: &TypedKey<T>) -> T {
        self.resolve(key).value
    }

    /// 在指定命名空间读取当前生效值。
    pub fn get_in<T, N>(&self, key: &TypedKey<T>, namespace: N) -> T
    where
        T: ConfigType,
        N: Into<Namespace>,
    {
        self.resolve_in(key, namespace).value
    }

    /// 在默认命名空间读取当前生效值，并给出命中的层。
    pub fn resolve<T: ConfigType>(&self, key: &TypedKey<T>) -> Resolved<T> {
        self.resolve_in(key, Namespace::DEFAULT)
    }

    /// 读取当前生效值，并给出命中的层。
    pub fn resolve_in<T, N>(&self, key: &TypedKey<T>, namespace: N) -> Resolved<T>
    where
        T: ConfigType,
        N: Into<Namespace>,
    {
        let namespace = namespace.into();
        let identifier = key.identifier();
        if let Some(raw) = self.provider.fetched_value(identifier, &namespace) {
            return decode(raw, ValueSource::Remote, identifier, &namespace);
        }
        let local = self.defaults.read().get(&namespace, identifier).cloned();
        match local {
            Some(raw) => decode(raw, ValueSource::Default, identifier, &namespace),
            None => Resolved::fallback(),
        }
    }

    /// 在默认命名空间读取本地注册的默认值。
    pub fn default_value<T: ConfigType>(&self, key: &TypedKey<T>) -> T {
        self.default_value_in(key, Namespace::DEFAULT)
    }

    /// 读取本地注册的默认值；未注册或无法转换时返回类型缺省值。
    pub fn default_value_in<T, N>(&self, key: &TypedKey<T>, namespace: N) -> T
    where
        T: ConfigType,
        N: Into<Namespace>,
    {
        let namespace = namespace.into();
        let local = self
            .defaults
            .read()
            .get(&namespace, key.identifier())
            .cloned();
        match local {
            Some(raw) => decode(raw, ValueSource::Default, key.identifier(), &namespace).value,
            None => T::fallback(),
        }
    }

    /// 在默认命名空间写入默认值。
    pub fn set<T: ConfigType>(&self, key: &TypedKey<T>, value: T) {
        self.set_in(key, value, Namespace::DEFAULT);
    }

    /// 写入默认值；可选类型写入 `None` 等价于删除该条目。
    pub fn set_in<T, N>(&self, key: &TypedKey<T>, value: T, namespace: N)
    where
        T: ConfigType,
        N: Into<Namespace>,
    {
        let namespace = namespace.into();
        let mut store = self.defaults.write();
        match value.to_config() {
            Some(encoded) => {
                store.set(&namespace, key.identifier(), encoded);
            }
            None => {
                store.remove(&namespace, key.identifier());
            }
        }
        self.sync(&store, &namespace);
    }

    pub fn remove<T>(&self, key: &TypedKey<T>) {
        self.remove_in(key, Namespace::DEFAULT);
    }

    /// 删除一条默认值；条目不存在时同样会同步，保持与配置中心一致。
    pub fn remove_in<T, N>(&self, key: &TypedKey<T>, namespace: N)
    where
        N: Into<Namespace>,
    {
        let namespace = namespace.into();
        let mut store = self.defaults.write();
        store.remove(&namespace, key.identifier());
        self.sync(&store, &namespace);
    }

    /// 删除整个命名空间的默认值。
    pub fn remove_namespace<N: Into<Namespace>>(&self, namespace: N) {
        let namespace = namespace.into();
        let mut store = self.defaults.write();
        store.remove_namespace(&namespace);
        self.sync(&store, &namespace);
    }

    /// 清空所有默认值。
    pub fn remove_all(&self) {
        let mut store = self.defaults.write();
        for namespace in store.remove_all() {
            self.sync(&store, &namespace);
        }
    }

    /// 本地默认层的副本。
    pub fn defaults(&self) -> DefaultStore {
        self.defaults.read().clone()
    }

    fn sync(&self, store: &DefaultStore, namespace: &Namespace) {
        let snapshot = store.snapshot(namespace);
        tracing::debug!(
            namespace = %namespace,
            entries = snapshot.len(),
            "syncing default layer to remote config provider"
        );
        self.provider.set_defaults(namespace, snapshot);
    }
}

impl fmt::Debug for ConfigView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigView")
            .field("defaults", &*self.defaults.read())
            .finish_non_exhaustive()
    }
}

fn decode<T: ConfigType>(
    raw: ConfigValue,
    source: ValueSource,
    identifier: &str,
    namespace: &Namespace,
) -> Resolved<T> {
    match T::from_config(&raw) {
        Some(value) => Resolved { value, source },
        None => {
            tracing::trace!(
                key = identifier,
                namespace = %namespace,
                requested = %T::KIND,
                found = %raw.kind(),
                "config value could not be coerced, using fallback"
            );
            Resolved::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryProvider;

    fn view() -> (Arc<InMemoryProvider>, ConfigView) {
        let provider = Arc::new(InMemoryProvider::new());
        let view = ConfigView::new(provider.clone());
        (provider, view)
    }

    #[test]
    fn set_pushes_full_namespace_to_provider_defaults() {
        let (provider, view) = view();
        view.set(&TypedKey::<i64>::new("quantity"), 0);
        view.set(&TypedKey::<String>::new("item"), "Apple".to_owned());

        let pushed = provider.defaults(&Namespace::DEFAULT);
        assert_eq!(pushed.len(), 2);
        assert_eq!(pushed.get("item"), Some(&ConfigValue::from("Apple")));
        assert_eq!(
            provider.effective_value("quantity", &Namespace::DEFAULT),
            Some(ConfigValue::Integer(0))
        );
    }

    #[test]
    fn removals_resync_the_affected_namespace() {
        let (provider, view) = view();
        let key = TypedKey::<bool>::new("flag");
        view.set_in(&key, true, "ios");
        view.set(&key, false);
        assert_eq!(provider.defaults(&Namespace::from("ios")).len(), 1);

        view.remove_in(&key, "ios");
        assert!(provider.defaults(&Namespace::from("ios")).is_empty());
        assert_eq!(provider.defaults(&Namespace::DEFAULT).len(), 1);

        view.set_in(&key, true, "android");
        view.remove_namespace("android");
        assert!(provider.defaults(&Namespace::from("android")).is_empty());

        view.remove_all();
        assert!(provider.defaults(&Namespace::DEFAULT).is_empty());
        assert!(view.defaults().is_empty());
    }

    #[test]
    fn writing_none_removes_an_optional_default() {
        let (_, view) = view();
        let key = TypedKey::<Option<String>>::new("banner");
        view.set(&key, Some("hello".to_owned()));
        assert_eq!(view.get(&key).as_deref(), Some("hello"));
        view.set(&key, None);
        assert_eq!(view.get(&key), None);
        assert_eq!(view.resolve(&key).source, ValueSource::Fallback);
    }

    #[test]
    fn coercion_miss_in_the_selected_layer_uses_fallback() {
        let (provider, view) = view();
        let key = TypedKey::<i64>::new("quantity");
        view.set(&key, 7);
        provider.stage("quantity", "many");
        futures::executor::block_on(provider.fetch(std::time::Duration::ZERO)).unwrap();
        provider.activate_fetched();

        let resolved = view.resolve(&key);
        assert_eq!(resolved, Resolved { value: 0, source: ValueSource::Fallback });
        assert_eq!(view.default_value(&key), 7);
    }

    #[test]
    fn debug_output_lists_defaults() {
        let (_, view) = view();
        view.set(&TypedKey::<i64>::new("quantity"), 1);
        let rendered = format!("{view:?}");
        assert!(rendered.contains("quantity"));
    }
}
