//! 键身份与命名空间隔离的性质测试。

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

use proptest::prelude::*;
use spark_remote_config::{ConfigView, InMemoryProvider, Namespace, TypedKey};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

proptest! {
    #[test]
    fn prop_key_identity_ignores_declared_type(a in identifier(), b in identifier()) {
        let as_int = TypedKey::<i64>::from_string(a.clone());
        let as_text = TypedKey::<Option<String>>::from_string(a.clone());
        let other = TypedKey::<bool>::from_string(b.clone());

        prop_assert!(as_int == as_text);
        prop_assert_eq!(hash_of(&as_int), hash_of(&as_text));
        prop_assert_eq!(as_int == other, a == b);
        prop_assert_eq!(as_int.same_identifier(&other), a == b);
    }

    #[test]
    fn prop_writes_stay_inside_their_namespace(
        key in identifier(),
        written in identifier(),
        probe in identifier(),
        value in any::<i64>(),
    ) {
        prop_assume!(written != probe);
        let view = ConfigView::new(Arc::new(InMemoryProvider::new()));
        let key = TypedKey::<Option<i64>>::from_string(key);

        view.set_in(&key, Some(value), Namespace::from(written.clone()));

        prop_assert_eq!(view.get_in(&key, Namespace::from(written)), Some(value));
        prop_assert_eq!(view.get_in(&key, Namespace::from(probe)), None);
        prop_assert_eq!(view.get(&key), None);
    }
}
