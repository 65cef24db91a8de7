//! 组件扫描
//!
//! 扫描器只负责给出组件的类型元数据，容器据此注册 Bean 定义。

use crate::catalog::ClassCatalog;
use async_trait::async_trait;
use ioc_common::{is_within_package, ConfigError, ContainerResult, TypeDescriptor};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 组件扫描器 trait
#[async_trait]
pub trait ComponentScanner: Send + Sync {
    /// 扫描根包下的组件；空根包表示全部
    async fn scan(&self, root: &str) -> ContainerResult<Vec<TypeDescriptor>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

fn accept(descriptor: &TypeDescriptor, root: &str) -> bool {
    descriptor.is_component() && is_within_package(&descriptor.qualified_name, root)
}

/// 基于类型目录的扫描器
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    catalog: Arc<ClassCatalog>,
}

impl CatalogScanner {
    /// 创建目录扫描器
    pub fn new(catalog: Arc<ClassCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ComponentScanner for CatalogScanner {
    async fn scan(&self, root: &str) -> ContainerResult<Vec<TypeDescriptor>> {
        let found: Vec<TypeDescriptor> = self
            .catalog
            .descriptors()
            .filter(|descriptor| accept(descriptor, root))
            .cloned()
            .collect();

        info!("目录扫描完成: 根包 '{}', 发现 {} 个组件", root, found.len());
        Ok(found)
    }

    fn name(&self) -> &str {
        "catalog"
    }
}

/// 基于 JSON 清单文件的扫描器
///
/// 清单是 [`TypeDescriptor`] 数组，由构建工具生成。清单决定哪些类型注册为组件，
/// 以及注册时的 Bean 名称、延迟加载标记和接口别名。创建实例、注入依赖和匹配切点时
/// 使用目录中 `Component::descriptor()` 给出的方法和注入点，清单中的这两项不参与。
#[derive(Debug, Clone)]
pub struct ManifestScanner {
    path: PathBuf,
    name: String,
}

impl ManifestScanner {
    /// 创建清单扫描器
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: format!("manifest:{}", path.display()),
            path,
        }
    }
}

#[async_trait]
impl ComponentScanner for ManifestScanner {
    async fn scan(&self, root: &str) -> ContainerResult<Vec<TypeDescriptor>> {
        debug!("读取组件清单: {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(ConfigError::from)?;
        let descriptors: Vec<TypeDescriptor> = serde_json::from_str(&content)
            .map_err(|e| ConfigError::parse_error(self.path.display().to_string(), e.to_string()))?;

        let found: Vec<TypeDescriptor> = descriptors
            .into_iter()
            .filter(|descriptor| accept(descriptor, root))
            .collect();

        info!("清单扫描完成: {}, 发现 {} 个组件", self.path.display(), found.len());
        Ok(found)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
