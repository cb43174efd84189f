#![doc = r#"
# spark-remote-config

## 定位（Why）
- 在远程配置中心之上提供强类型键访问：键在声明处携带值类型，读取永不失败；
- 读取顺序固定为“已激活的远程快照 → 本地默认值 → 类型缺省值”，且不跨命名空间；
- 配置中心以 [`ConfigProvider`] trait 注入，传输、缓存与激活算法都留给实现方。

## 快速上手

```
use std::sync::Arc;

use spark_remote_config::{ConfigSession, InMemoryProvider, TypedKey};

const QUANTITY: TypedKey<i64> = TypedKey::new("quantity");
const ITEM: TypedKey<Option<String>> = TypedKey::new("item");

let provider = Arc::new(InMemoryProvider::new());
let session = ConfigSession::new(provider.clone());
let config = session.config();

config.set(&QUANTITY, 1);
assert_eq!(config.get(&QUANTITY), 1);
assert_eq!(config.get(&ITEM), None);

provider.stage("quantity", 5_i64);
futures::executor::block_on(session.fetch(None)).unwrap();
assert_eq!(config.get(&QUANTITY), 5);
assert_eq!(config.default_value(&QUANTITY), 1);
```

## 模块
- [`key`]/[`namespace`]：类型化键与命名空间；
- [`value`]/[`codec`]/[`enums`]：线上表示与各类型的编解码；
- [`view`]：解析引擎 [`ConfigView`]；
- [`session`]：拉取与激活流程 [`ConfigSession`]；
- [`provider`]/[`memory`]：配置中心契约与进程内参考实现。
"#]

pub mod codec;
pub mod defaults;
pub mod enums;
pub mod error;
pub mod key;
pub mod memory;
pub mod namespace;
pub mod provider;
pub mod session;
pub mod settings;
pub mod value;
pub mod view;

pub use codec::{ConfigType, Dimension, ValueCodec};
pub use defaults::DefaultStore;
pub use enums::{IndexedEnum, NamedEnum};
pub use error::{FetchError, ProviderError, SettingsError};
pub use key::TypedKey;
pub use memory::InMemoryProvider;
pub use namespace::Namespace;
pub use provider::{ConfigProvider, FetchStatus, ProviderSettings};
pub use session::ConfigSession;
pub use settings::{DEFAULT_EXPIRATION_SECS, SessionSettings};
pub use value::{ConfigValue, ValueKind};
pub use view::{ConfigView, Resolved, ValueSource};

/// 常用类型的集中导入。
pub mod prelude {
    pub use crate::{
        ConfigProvider, ConfigSession, ConfigType, ConfigValue, ConfigView, FetchError,
        FetchStatus, Namespace, Resolved, TypedKey, ValueCodec, ValueSource,
    };
}
