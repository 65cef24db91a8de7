//! 键值配置表

use crate::keys;
use ioc_common::{ConfigError, ConfigResult};
use std::collections::BTreeMap;

/// 合并后的应用配置
///
/// 键区分大小写；后写入的值覆盖先写入的值。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationProperties {
    values: BTreeMap<String, String>,
}

impl ApplicationProperties {
    /// 创建空配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 `key=value` 文本
    ///
    /// 支持 `=` 或 `:` 分隔，`#` 和 `!` 开头的行为注释，键和值两端空白会被去掉。
    pub fn parse(text: &str, location: &str) -> ConfigResult<Self> {
        let mut properties = Self::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some(separator) = line.find(['=', ':']) else {
                return Err(ConfigError::parse_error(
                    format!("{}:{}", location, index + 1),
                    format!("缺少分隔符: {line}"),
                ));
            };

            let key = line[..separator].trim();
            if key.is_empty() {
                return Err(ConfigError::parse_error(
                    format!("{}:{}", location, index + 1),
                    "配置键为空",
                ));
            }
            let value = line[separator + 1..].trim();
            properties.insert(key, value);
        }

        Ok(properties)
    }

    /// 写入配置
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 读取配置
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 读取非空白配置，空白值视为未设置
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    /// 读取必需配置
    pub fn require(&self, key: &str) -> ConfigResult<&str> {
        self.get_non_blank(key).ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// 组件扫描根包
    pub fn scan_package(&self) -> Option<&str> {
        self.get_non_blank(keys::SCAN_PACKAGE)
    }

    /// 合并另一份配置，冲突时以 `other` 为准
    pub fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// 配置项数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 遍历所有配置项
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ApplicationProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}
