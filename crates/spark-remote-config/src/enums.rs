//! 封闭枚举作为配置类型。
//!
//! - 整数枚举实现 [`IndexedEnum`]，通过序号往返；无法解码或缺失时回退到哨兵成员。
//! - 字符串枚举实现 [`NamedEnum`]，先精确匹配、再大小写不敏感匹配；通常以 `Option<E>` 声明键，
//!   解码失败即为 `None`。
//!
//! 具体的 [`crate::ValueCodec`]/[`crate::ConfigType`] 实现由
//! [`indexed_enum_codec!`](crate::indexed_enum_codec) 与
//! [`named_enum_codec!`](crate::named_enum_codec) 生成。

use crate::value::ConfigValue;

/// 以整数序号表示的枚举。
pub trait IndexedEnum: Sized + Copy {
    /// 解码失败或没有任何值时使用的成员。
    const SENTINEL: Self;

    fn from_index(index: i64) -> Option<Self>;

    fn index(self) -> i64;
}

/// 以字符串表示的枚举。
pub trait NamedEnum: Sized + Clone + 'static {
    /// 全部成员。
    fn variants() -> &'static [Self];

    /// 成员的线上名称。
    fn name(&self) -> &'static str;
}

pub fn decode_indexed<E: IndexedEnum>(value: &ConfigValue) -> Option<E> {
    value.as_integer().and_then(E::from_index)
}

pub fn encode_indexed<E: IndexedEnum>(value: &E) -> ConfigValue {
    ConfigValue::Integer(value.index())
}

pub fn decode_named<E: NamedEnum>(value: &ConfigValue) -> Option<E> {
    let text = value.as_text()?;
    let variants = E::variants();
    variants
        .iter()
        .find(|variant| variant.name() == text)
        .or_else(|| {
            variants
                .iter()
                .find(|variant| variant.name().eq_ignore_ascii_case(&text))
        })
        .cloned()
}

pub fn encode_named<E: NamedEnum>(value: &E) -> ConfigValue {
    ConfigValue::Text(value.name().to_owned())
}

/// 为实现了 [`IndexedEnum`] 的类型生成编解码实现。
///
/// ```
/// use spark_remote_config::{IndexedEnum, indexed_enum_codec};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum SampleType { A, B, None }
///
/// impl IndexedEnum for SampleType {
///     const SENTINEL: Self = SampleType::None;
///
///     fn from_index(index: i64) -> Option<Self> {
///         match index {
///             0 => Some(SampleType::A),
///             1 => Some(SampleType::B),
///             2 => Some(SampleType::None),
///             _ => None,
///         }
///     }
///
///     fn index(self) -> i64 {
///         self as i64
///     }
/// }
///
/// indexed_enum_codec!(SampleType);
/// ```
#[macro_export]
macro_rules! indexed_enum_codec {
    ($ty:ty) => {
        impl $crate::ValueCodec for $ty {
            const KIND: $crate::ValueKind = $crate::ValueKind::Number;

            fn decode(value: &$crate::ConfigValue) -> ::core::option::Option<Self> {
                $crate::enums::decode_indexed(value)
            }

            fn encode(&self) -> $crate::ConfigValue {
                $crate::enums::encode_indexed(self)
            }
        }

        impl $crate::ConfigType for $ty {
            const KIND: $crate::ValueKind = $crate::ValueKind::Number;

            fn from_config(value: &$crate::ConfigValue) -> ::core::option::Option<Self> {
                $crate::enums::decode_indexed(value)
            }

            fn to_config(&self) -> ::core::option::Option<$crate::ConfigValue> {
                ::core::option::Option::Some($crate::enums::encode_indexed(self))
            }

            fn fallback() -> Self {
                <$ty as $crate::IndexedEnum>::SENTINEL
            }
        }
    };
}

/// 为实现了 [`NamedEnum`] 的类型生成编解码实现。
///
/// - `named_enum_codec!(T)`：只生成 [`crate::ValueCodec`]，键需声明为 `TypedKey<Option<T>>`；
/// - `named_enum_codec!(T, fallback = expr)`：额外生成 [`crate::ConfigType`]，允许非可选声明。
#[macro_export]
macro_rules! named_enum_codec {
    ($ty:ty) => {
        impl $crate::ValueCodec for $ty {
            const KIND: $crate::ValueKind = $crate::ValueKind::Text;

            fn decode(value: &$crate::ConfigValue) -> ::core::option::Option<Self> {
                $crate::enums::decode_named(value)
            }

            fn encode(&self) -> $crate::ConfigValue {
                $crate::enums::encode_named(self)
            }
        }
    };
    ($ty:ty, fallback = $fallback:expr) => {
        $crate::named_enum_codec!($ty);

        impl $crate::ConfigType for $ty {
            const KIND: $crate::ValueKind = $crate::ValueKind::Text;

            fn from_config(value: &$crate::ConfigValue) -> ::core::option::Option<Self> {
                $crate::enums::decode_named(value)
            }

            fn to_config(&self) -> ::core::option::Option<$crate::ConfigValue> {
                ::core::option::Option::Some($crate::enums::encode_named(self))
            }

            fn fallback() -> Self {
                $fallback
            }
        }
    };
}
