use std::collections::BTreeMap;

use crate::{namespace::Namespace, value::ConfigValue};

/// 本地注册的默认值，按命名空间分区。
///
/// ## 设计目的（Why）
/// - 作为默认值读取的唯一来源：`default_value*` 只查询这份本地镜像，不依赖配置中心的默认值接口。
///
/// ## 逻辑说明（How）
/// - 结构为 `Namespace → (identifier → ConfigValue)`，写入时不做任何类型转换。
///
/// ## 契约定义（What）
/// - `set` 返回被替换的旧值，`remove` 返回被删除的值且幂等；
/// - 命名空间内最后一个条目被删除后，该命名空间随之消失；
/// - `snapshot` 对不存在的命名空间返回空映射。
///
/// ## 设计权衡与注意事项（Trade-offs）
/// - 本类型不带锁，也不负责同步；并发访问与推送到配置中心默认层由 [`crate::ConfigView`] 负责。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefaultStore {
    entries: BTreeMap<Namespace, BTreeMap<String, ConfigValue>>,
}

impl DefaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入或覆盖一条默认值，返回被替换的旧值。
    pub fn set<I>(
        &mut self,
        namespace: &Namespace,
        identifier: I,
        value: ConfigValue,
    ) -> Option<ConfigValue>
    where
        I: Into<String>,
    {
        self.entries
            .entry(namespace.clone())
            .or_default()
            .insert(identifier.into(), value)
    }

    /// 删除一条默认值。
    pub fn remove(&mut self, namespace: &Namespace, identifier: &str) -> Option<ConfigValue> {
        let bucket = self.entries.get_mut(namespace)?;
        let removed = bucket.remove(identifier);
        if bucket.is_empty() {
            self.entries.remove(namespace);
        }
        removed
    }

    /// 删除整个命名空间，返回是否存在过。
    pub fn remove_namespace(&mut self, namespace: &Namespace) -> bool {
        self.entries.remove(namespace).is_some()
    }

    /// 清空全部命名空间，返回被清空的命名空间列表。
    pub fn remove_all(&mut self) -> Vec<Namespace> {
        let cleared = self.entries.keys().cloned().collect();
        self.entries.clear();
        cleared
    }

    /// 读取一条原始默认值，不做类型转换。
    pub fn get(&self, namespace: &Namespace, identifier: &str) -> Option<&ConfigValue> {
        self.entries
            .get(namespace)
            .and_then(|bucket| bucket.get(identifier))
    }

    /// 复制某个命名空间的完整映射；不存在时返回空映射。
    pub fn snapshot(&self, namespace: &Namespace) -> BTreeMap<String, ConfigValue> {
        self.entries.get(namespace).cloned().unwrap_or_default()
    }

    /// 按字典序遍历非空命名空间。
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.entries.keys()
    }

    /// 所有命名空间中的条目总数。
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ios() -> Namespace {
        Namespace::from("ios")
    }

    #[test]
    fn set_upserts_within_a_namespace() {
        let mut store = DefaultStore::new();
        assert_eq!(store.set(&Namespace::DEFAULT, "item", "Apple".into()), None);
        assert_eq!(
            store.set(&Namespace::DEFAULT, "item", "Pear".into()),
            Some(ConfigValue::from("Apple"))
        );
        assert_eq!(
            store.get(&Namespace::DEFAULT, "item"),
            Some(&ConfigValue::from("Pear"))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn namespaces_are_isolated() {
        let mut store = DefaultStore::new();
        store.set(&ios(), "quantity", ConfigValue::Integer(3));
        assert_eq!(store.get(&Namespace::DEFAULT, "quantity"), None);
        assert_eq!(store.get(&ios(), "quantity"), Some(&ConfigValue::Integer(3)));
        assert!(store.snapshot(&Namespace::DEFAULT).is_empty());
    }

    #[test]
    fn remove_is_idempotent_and_drops_empty_namespaces() {
        let mut store = DefaultStore::new();
        store.set(&ios(), "quantity", ConfigValue::Integer(3));
        assert_eq!(store.remove(&ios(), "quantity"), Some(ConfigValue::Integer(3)));
        assert_eq!(store.remove(&ios(), "quantity"), None);
        assert_eq!(store.remove(&Namespace::from("missing"), "quantity"), None);
        assert!(store.is_empty());
        assert_eq!(store.namespaces().count(), 0);
    }

    #[test]
    fn remove_namespace_and_remove_all() {
        let mut store = DefaultStore::new();
        store.set(&ios(), "a", ConfigValue::Boolean(true));
        store.set(&Namespace::DEFAULT, "b", ConfigValue::Boolean(false));
        assert!(store.remove_namespace(&ios()));
        assert!(!store.remove_namespace(&ios()));
        assert_eq!(store.len(), 1);

        store.set(&ios(), "a", ConfigValue::Boolean(true));
        let cleared = store.remove_all();
        assert_eq!(cleared, vec![Namespace::DEFAULT, ios()]);
        assert!(store.is_empty());
    }
}
