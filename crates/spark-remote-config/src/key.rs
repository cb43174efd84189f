use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// 绑定值类型的配置键。
///
/// ## 设计目的（Why）
/// - 让键在声明处就携带值类型，读写时由类型参数选择编解码，调用方无需按类型挑选访问方法。
///
/// ## 逻辑说明（How）
/// - `identifier`：远程配置中心中的稳定键名，例如 `quantity`、`bg_color`；
/// - `T`：读取时期望的值类型，仅作为编译期标记存在，运行时不保存任何类型信息。
///
/// ## 契约定义（What）
/// - 相等、哈希与排序**只比较 `identifier`**：两个标识相同但 `T` 不同的键视为同一个键，
///   即 `TypedKey::<i64>::new("a") == TypedKey::<String>::new("a")`；
/// - 空标识在 debug 构建中触发断言，release 构建不做校验。
///
/// ## 设计权衡与注意事项（Trade-offs）
/// - 同一标识是否只对应一种类型由调用方保证，本类型不维护跨类型注册表；
///   不同类型的键共享标识时，会读写同一条底层记录。
pub struct TypedKey<T> {
    identifier: Cow<'static, str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedKey<T> {
    /// 以静态字符串构造键，可用于 `const`/`static` 声明。
    pub const fn new(identifier: &'static str) -> Self {
        debug_assert!(!identifier.is_empty(), "config key identifier must not be empty");
        Self {
            identifier: Cow::Borrowed(identifier),
            _marker: PhantomData,
        }
    }

    /// 以运行时字符串构造键。
    pub fn from_string<I>(identifier: I) -> Self
    where
        I: Into<Cow<'static, str>>,
    {
        let identifier = identifier.into();
        debug_assert!(
            !identifier.is_empty(),
            "config key identifier must not be empty"
        );
        Self {
            identifier,
            _marker: PhantomData,
        }
    }

    /// 返回键名。
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 判断与另一类型的键是否指向同一条记录。
    #[inline]
    pub fn same_identifier<U>(&self, other: &TypedKey<U>) -> bool {
        self.identifier == other.identifier
    }
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedKey")
            .field("identifier", &self.identifier)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Display for TypedKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl<T, U> PartialEq<TypedKey<U>> for TypedKey<T> {
    fn eq(&self, other: &TypedKey<U>) -> bool {
        self.same_identifier(other)
    }
}

impl<T> Eq for TypedKey<T> {}

impl<T> Hash for TypedKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl<T, U> PartialOrd<TypedKey<U>> for TypedKey<T> {
    fn partial_cmp(&self, other: &TypedKey<U>) -> Option<Ordering> {
        Some(self.identifier.cmp(&other.identifier))
    }
}

impl<T> Ord for TypedKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identifier.cmp(&other.identifier)
    }
}

impl<T> From<&TypedKey<T>> for String {
    fn from(value: &TypedKey<T>) -> Self {
        value.identifier.to_string()
    }
}
