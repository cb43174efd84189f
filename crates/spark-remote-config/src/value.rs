use std::fmt;

/// 配置值的线上表示。
///
/// ### 契约说明（What）
/// - 远程配置中心与本地默认层只交换四种表示：文本、数值、布尔、二进制。
///   数值在 Rust 侧拆为 `Integer` 与 `Float`，以免整数经浮点往返丢失精度。
/// - 本类型只负责“存什么”；“按什么类型读”由 [`crate::ValueCodec`] 决定，
///   具体的跨表示转换见 `as_*` 系列方法。
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Binary(Vec<u8>),
}

/// 值的表示种类。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Number,
    Boolean,
    Binary,
}

impl ValueKind {
    /// 稳定字符串，用于日志字段。
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TRUTHY: [&str; 5] = ["true", "yes", "y", "on", "1"];
const FALSY: [&str; 5] = ["false", "no", "n", "off", "0"];

impl ConfigValue {
    /// 当前值的表示种类。
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Integer(_) | Self::Float(_) => ValueKind::Number,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Binary(_) => ValueKind::Binary,
        }
    }

    /// 按文本表示读取。
    ///
    /// - 数值使用 `to_string`，布尔输出 `true`/`false`；
    /// - 二进制仅在合法 UTF-8 时可读。
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Boolean(value) => Some(value.to_string()),
            Self::Binary(bytes) => std::str::from_utf8(bytes).ok().map(str::to_owned),
        }
    }

    /// 按整数表示读取。
    ///
    /// - 浮点向零截断，需为有限值且落在 `i64` 范围内；
    /// - 文本先按整数解析，失败再按浮点解析后截断；
    /// - 布尔映射为 `1`/`0`。
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => truncate(*value),
            Self::Boolean(value) => Some(i64::from(*value)),
            Self::Text(text) => parse_integer(text),
            Self::Binary(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_integer),
        }
    }

    /// 按浮点表示读取。
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            Self::Boolean(value) => Some(if *value { 1.0 } else { 0.0 }),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Binary(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|text| text.trim().parse().ok()),
        }
    }

    /// 按布尔表示读取。
    ///
    /// 文本大小写不敏感地识别 `true/yes/y/on/1` 与 `false/no/n/off/0`，其余视为无法转换。
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            Self::Integer(value) => Some(*value != 0),
            Self::Float(value) => Some(*value != 0.0),
            Self::Text(text) => parse_boolean(text),
            Self::Binary(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_boolean),
        }
    }

    /// 按二进制表示读取；非二进制值取其文本形式的 UTF-8 字节。
    pub fn as_binary(&self) -> Option<Vec<u8>> {
        match self {
            Self::Binary(bytes) => Some(bytes.clone()),
            Self::Text(text) => Some(text.clone().into_bytes()),
            other => other.as_text().map(String::into_bytes),
        }
    }
}

fn truncate(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    // i64::MAX as f64 会向上取整到 2^63，故使用半开区间。
    if truncated >= -(2f64.powi(63)) && truncated < 2f64.powi(63) {
        Some(truncated as i64)
    } else {
        None
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(truncate))
}

fn parse_boolean(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if TRUTHY.iter().any(|candidate| trimmed.eq_ignore_ascii_case(candidate)) {
        Some(true)
    } else if FALSY.iter().any(|candidate| trimmed.eq_ignore_ascii_case(candidate)) {
        Some(false)
    } else {
        None
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<u8>> for ConfigValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}
