use std::{borrow::Cow, fmt};

/// 配置命名空间。
///
/// ### 契约说明（What）
/// - 命名空间是配置键的逻辑分区；空字符串代表默认分区 [`Namespace::DEFAULT`]。
/// - 键本身不携带命名空间，读写时逐次指定；任何读取都只在单个命名空间内解析。
/// - 实现 `Eq`、`Hash`、`Ord`，可直接作为映射键。
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(Cow<'static, str>);

impl Namespace {
    /// 默认命名空间。
    pub const DEFAULT: Namespace = Namespace(Cow::Borrowed(""));

    /// 创建命名空间。
    #[inline]
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        Self(name.into())
    }

    /// 原始名称；默认命名空间为空字符串。
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为默认命名空间。
    #[inline]
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("<default>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&'static str> for Namespace {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&Namespace> for Namespace {
    fn from(value: &Namespace) -> Self {
        value.clone()
    }
}
