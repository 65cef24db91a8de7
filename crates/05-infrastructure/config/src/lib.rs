//! # 启动配置
//!
//! 容器启动时只读取一次的键值配置。
//!
//! - [`ConfigSource`] - 配置源接口
//! - [`PropertiesConfigSource`] - `key=value` 文本文件
//! - [`TomlConfigSource`] - TOML 文件，嵌套表展开为点分键
//! - [`MemoryConfigSource`] - 内存配置
//! - [`ApplicationProperties`] - 合并后的键值表

pub mod keys;
pub mod properties;
pub mod sources;

pub use properties::ApplicationProperties;
pub use sources::{ConfigSource, MemoryConfigSource, PropertiesConfigSource, TomlConfigSource};
