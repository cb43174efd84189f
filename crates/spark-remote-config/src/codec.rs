//! 值编解码能力。
//!
//! 读写链路只依赖两个 trait：
//! - [`ValueCodec`]：具体类型与 [`ConfigValue`] 之间的纯转换，失败返回 `None`；
//! - [`ConfigType`]：键可声明的类型，在 `ValueCodec` 之上补充“缺省时返回什么”。
//!
//! 非可选类型的缺省值是零值（`0`、`""`、`false`、空字节），`Option<T>` 的缺省值是 `None`，
//! 整数枚举的缺省值是其哨兵成员（见 [`crate::enums`]）。

use std::time::Duration;

use url::Url;

use crate::value::{ConfigValue, ValueKind};

/// 具体类型与线上表示之间的转换。
///
/// ### 契约说明（What）
/// - `KIND`：读取时向配置层请求的表示种类。
/// - `decode`：无法转换时返回 `None`，调用方据此回退，不得 panic。
/// - `encode`：写入默认层时使用的表示。
pub trait ValueCodec: Sized {
    const KIND: ValueKind;

    fn decode(value: &ConfigValue) -> Option<Self>;

    fn encode(&self) -> ConfigValue;
}

/// 可作为 [`crate::TypedKey`] 类型参数、参与解析的类型。
///
/// ### 契约说明（What）
/// - `from_config`：命中某一层时的解码，返回 `None` 表示该层未提供可用值；
/// - `to_config`：写入默认层时的编码，返回 `None` 表示删除该条目；
/// - `fallback`：所有层都未命中时的结果，必须是全函数。
pub trait ConfigType: Sized {
    const KIND: ValueKind;

    fn from_config(value: &ConfigValue) -> Option<Self>;

    fn to_config(&self) -> Option<ConfigValue>;

    fn fallback() -> Self;
}

impl<T: ValueCodec> ConfigType for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_config(value: &ConfigValue) -> Option<Self> {
        T::decode(value).map(Some)
    }

    fn to_config(&self) -> Option<ConfigValue> {
        self.as_ref().map(ValueCodec::encode)
    }

    fn fallback() -> Self {
        None
    }
}

/// 为非可选类型实现 [`ConfigType`]，缺省值由表达式给出。
macro_rules! required {
    ($ty:ty, $fallback:expr) => {
        impl ConfigType for $ty {
            const KIND: ValueKind = <$ty as ValueCodec>::KIND;

            fn from_config(value: &ConfigValue) -> Option<Self> {
                <$ty as ValueCodec>::decode(value)
            }

            fn to_config(&self) -> Option<ConfigValue> {
                Some(ValueCodec::encode(self))
            }

            fn fallback() -> Self {
                $fallback
            }
        }
    };
}

macro_rules! integer_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ValueCodec for $ty {
                const KIND: ValueKind = ValueKind::Number;

                fn decode(value: &ConfigValue) -> Option<Self> {
                    // 超出 i64 的无符号值以文本形式落盘，需按目标类型直接解析。
                    value
                        .as_integer()
                        .and_then(|raw| <$ty>::try_from(raw).ok())
                        .or_else(|| {
                            value
                                .as_text()
                                .and_then(|text| text.trim().parse::<$ty>().ok())
                        })
                }

                fn encode(&self) -> ConfigValue {
                    // 超出 i64 的无符号值只能以文本保存。
                    i64::try_from(*self)
                        .map(ConfigValue::Integer)
                        .unwrap_or_else(|_| ConfigValue::Text(self.to_string()))
                }
            }

            required!($ty, 0);
        )*
    };
}

integer_codec!(i32, i64, u32, u64);

impl ValueCodec for f64 {
    const KIND: ValueKind = ValueKind::Number;

    fn decode(value: &ConfigValue) -> Option<Self> {
        value.as_float()
    }

    fn encode(&self) -> ConfigValue {
        ConfigValue::Float(*self)
    }
}

required!(f64, 0.0);

impl ValueCodec for f32 {
    const KIND: ValueKind = ValueKind::Number;

    fn decode(value: &ConfigValue) -> Option<Self> {
        value.as_float().map(|raw| raw as f32)
    }

    fn encode(&self) -> ConfigValue {
        ConfigValue::Float(f64::from(*self))
    }
}

required!(f32, 0.0);

impl ValueCodec for String {
    const KIND: ValueKind = ValueKind::Text;

    fn decode(value: &ConfigValue) -> Option<Self> {
        value.as_text()
    }

    fn encode(&self) -> ConfigValue {
        ConfigValue::Text(self.clone())
    }
}

required!(String, String::new());

impl ValueCodec for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn decode(value: &ConfigValue) -> Option<Self> {
        value.as_boolean()
    }

    fn encode(&self) -> ConfigValue {
        ConfigValue::Boolean(*self)
    }
}

required!(bool, false);

impl ValueCodec for Vec<u8> {
    const KIND: ValueKind = ValueKind::Binary;

    fn decode(value: &ConfigValue) -> Option<Self> {
        value.as_binary()
    }

    fn encode(&self) -> ConfigValue {
        ConfigValue::Binary(self.clone())
    }
}

required!(Vec<u8>, Vec::new());

/// URL 只以可选形式出现：解析失败即视为缺失。
impl ValueCodec for Url {
    const KIND: ValueKind = ValueKind::Text;

    fn decode(value: &ConfigValue) -> Option<Self> {
        value.as_text().and_then(|text| Url::parse(&text).ok())
    }

    fn encode(&self) -> ConfigValue {
        ConfigValue::Text(self.as_str().to_owned())
    }
}

/// 显示尺寸等派生浮点量，由双精度表示直接换算。
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Dimension(pub f64);

impl Dimension {
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Dimension {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Dimension> for f64 {
    fn from(value: Dimension) -> Self {
        value.0
    }
}

impl ValueCodec for Dimension {
    const KIND: ValueKind = ValueKind::Number;

    fn decode(value: &ConfigValue) -> Option<Self> {
        f64::decode(value).map(Self)
    }

    fn encode(&self) -> ConfigValue {
        self.0.encode()
    }
}

required!(Dimension, Dimension(0.0));

/// 以秒为单位的双精度数换算为 [`Duration`]；负数与非有限值视为无法转换。
///
/// ## 设计权衡与注意事项（Trade-offs）
/// - 精度受 `f64` 的 53 位尾数限制：秒数越大，可保留的小数位越少，
///   约 10^7 秒（数月）以上时纳秒位开始丢失；
/// - 超过 `u64::MAX` 秒的值（如 [`Duration::MAX`]）写入后读回视为无法转换，回退为 [`Duration::ZERO`]。
impl ValueCodec for Duration {
    const KIND: ValueKind = ValueKind::Number;

    fn decode(value: &ConfigValue) -> Option<Self> {
        f64::decode(value).and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    fn encode(&self) -> ConfigValue {
        ConfigValue::Float(self.as_secs_f64())
    }
}

required!(Duration, Duration::ZERO);
