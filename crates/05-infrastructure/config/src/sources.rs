//! 配置源实现

use crate::properties::ApplicationProperties;
use async_trait::async_trait;
use ioc_common::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置源 trait
///
/// 容器启动时调用一次 [`ConfigSource::load`]，不支持热重载。
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// 加载全部配置
    async fn load(&self) -> ConfigResult<ApplicationProperties>;

    /// 获取配置源名称
    fn name(&self) -> &str;
}

/// `key=value` 文本文件配置源
#[derive(Debug, Clone)]
pub struct PropertiesConfigSource {
    file_path: PathBuf,
    name: String,
}

impl PropertiesConfigSource {
    /// 创建新的文本配置源
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let file_path = path.as_ref().to_path_buf();
        Self {
            name: format!("properties:{}", file_path.display()),
            file_path,
        }
    }

    /// 文件路径
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl ConfigSource for PropertiesConfigSource {
    async fn load(&self) -> ConfigResult<ApplicationProperties> {
        debug!("加载配置文件: {}", self.file_path.display());

        let content = tokio::fs::read_to_string(&self.file_path).await?;
        let properties =
            ApplicationProperties::parse(&content, &self.file_path.display().to_string())?;

        info!("配置文件加载完成: {}, 共 {} 项", self.file_path.display(), properties.len());
        Ok(properties)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// TOML 配置源
///
/// 嵌套表展开为点分键，`[aop] pointCut = "..."` 等价于 `aop.pointCut=...`。
#[derive(Debug, Clone)]
pub struct TomlConfigSource {
    file_path: PathBuf,
    name: String,
}

impl TomlConfigSource {
    /// 创建新的 TOML 配置源
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let file_path = path.as_ref().to_path_buf();
        Self {
            name: format!("toml:{}", file_path.display()),
            file_path,
        }
    }

    /// 解析 TOML 文本
    pub fn parse(content: &str, location: &str) -> ConfigResult<ApplicationProperties> {
        let table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::parse_error(location, e.to_string()))?;

        let mut properties = ApplicationProperties::new();
        flatten_table(None, &table, &mut properties);
        Ok(properties)
    }
}

fn flatten_table(prefix: Option<&str>, table: &toml::Table, properties: &mut ApplicationProperties) {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };

        match value {
            toml::Value::Table(nested) => flatten_table(Some(&full_key), nested, properties),
            toml::Value::String(s) => properties.insert(full_key, s.clone()),
            toml::Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(|item| match item {
                        toml::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                properties.insert(full_key, joined);
            }
            other => properties.insert(full_key, other.to_string()),
        }
    }
}

#[async_trait]
impl ConfigSource for TomlConfigSource {
    async fn load(&self) -> ConfigResult<ApplicationProperties> {
        debug!("加载 TOML 配置文件: {}", self.file_path.display());

        let content = tokio::fs::read_to_string(&self.file_path).await?;
        let properties = Self::parse(&content, &self.file_path.display().to_string())?;

        info!("TOML 配置文件加载完成: {}, 共 {} 项", self.file_path.display(), properties.len());
        Ok(properties)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 内存配置源
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    properties: ApplicationProperties,
}

impl MemoryConfigSource {
    /// 创建新的内存配置源
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置项
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key, value);
        self
    }
}

impl From<ApplicationProperties> for MemoryConfigSource {
    fn from(properties: ApplicationProperties) -> Self {
        Self { properties }
    }
}

#[async_trait]
impl ConfigSource for MemoryConfigSource {
    async fn load(&self) -> ConfigResult<ApplicationProperties> {
        Ok(self.properties.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
