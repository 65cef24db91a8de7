//! 应用上下文构建器

use crate::catalog::ClassCatalog;
use crate::component::Component;
use crate::container::ApplicationContext;
use crate::registry::{BeanDefinition, BeanDefinitionRegistry};
use crate::scanner::{CatalogScanner, ComponentScanner};
use ioc_aop::{AdvisedSupport, AopConfig, Aspect};
use ioc_common::{ContainerError, ContainerResult, TypeDescriptor};
use ioc_config::{
    ApplicationProperties, ConfigSource, MemoryConfigSource, PropertiesConfigSource, TomlConfigSource,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 应用上下文构建器
///
/// 使用建造者模式组装配置源、扫描器和类型目录，`build` 时完成注册和提前初始化。
pub struct ApplicationContextBuilder {
    /// 配置源列表，按添加顺序合并
    config_sources: Vec<Box<dyn ConfigSource>>,
    /// 组件扫描器列表；为空时使用目录扫描器
    scanners: Vec<Box<dyn ComponentScanner>>,
    /// 类型目录
    catalog: ClassCatalog,
    /// 手工注册的定义
    definitions: Vec<BeanDefinition>,
    /// 是否为组件声明的接口注册别名
    interface_aliases: bool,
}

impl ApplicationContextBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config_sources: Vec::new(),
            scanners: Vec::new(),
            catalog: ClassCatalog::new(),
            definitions: Vec::new(),
            interface_aliases: true,
        }
    }

    /// 使用给定的类型目录
    pub fn with_catalog(mut self, catalog: ClassCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// 登记组件类型
    pub fn component<T: Component>(mut self) -> Self {
        self.catalog = self.catalog.component::<T>();
        self
    }

    /// 登记切面类型
    pub fn aspect<A: Aspect>(mut self) -> Self {
        self.catalog = self.catalog.aspect::<A>();
        self
    }

    /// 添加配置源
    pub fn add_config_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        info!("添加配置源: {}", source.name());
        self.config_sources.push(Box::new(source));
        self
    }

    /// 添加 `key=value` 配置文件
    pub fn add_properties_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_config_source(PropertiesConfigSource::new(path))
    }

    /// 添加 TOML 配置文件
    pub fn add_toml_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_config_source(TomlConfigSource::new(path))
    }

    /// 添加内存配置
    pub fn add_properties(self, properties: ApplicationProperties) -> Self {
        self.add_config_source(MemoryConfigSource::from(properties))
    }

    /// 添加组件扫描器
    pub fn add_scanner<S: ComponentScanner + 'static>(mut self, scanner: S) -> Self {
        debug!("添加组件扫描器: {}", scanner.name());
        self.scanners.push(Box::new(scanner));
        self
    }

    /// 手工注册定义，在扫描结果之后注册
    pub fn register_definition(mut self, definition: BeanDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// 是否为组件声明的接口注册别名，默认开启
    pub fn interface_aliases(mut self, enabled: bool) -> Self {
        self.interface_aliases = enabled;
        self
    }

    /// 构建应用上下文
    pub async fn build(self) -> ContainerResult<Arc<ApplicationContext>> {
        let properties = self.load_properties().await?;
        let scan_root = properties.scan_package().unwrap_or_default().to_string();

        let catalog = Arc::new(self.catalog);
        let scanners = if self.scanners.is_empty() {
            vec![Box::new(CatalogScanner::new(catalog.clone())) as Box<dyn ComponentScanner>]
        } else {
            self.scanners
        };

        let mut discovered = Vec::new();
        for scanner in &scanners {
            let found = scanner.scan(&scan_root).await?;
            debug!("扫描器 {} 发现 {} 个组件", scanner.name(), found.len());
            discovered.extend(found);
        }

        let mut registry = BeanDefinitionRegistry::new();
        for descriptor in &discovered {
            register_descriptor(&mut registry, descriptor, self.interface_aliases)?;
        }
        for definition in self.definitions {
            registry.register(definition)?;
        }

        let advised = match AopConfig::from_properties(&properties) {
            Some(config) => {
                let aspect_class = catalog.aspect_class(&config.aspect_class).ok_or_else(|| {
                    ContainerError::invalid_aop_config(format!(
                        "切面类型未登记: {}",
                        config.aspect_class
                    ))
                })?;
                Some(Arc::new(AdvisedSupport::new(config, aspect_class)?))
            }
            None => {
                info!("未配置切点或切面类型，AOP 未启用");
                None
            }
        };

        let context = Arc::new(ApplicationContext::new(properties, registry, catalog, advised));
        context.initialize()?;
        Ok(context)
    }

    async fn load_properties(&self) -> ContainerResult<ApplicationProperties> {
        let mut properties = ApplicationProperties::new();
        for source in &self.config_sources {
            let loaded = source.load().await?;
            debug!("配置源 {} 加载 {} 项", source.name(), loaded.len());
            properties.merge(loaded);
        }
        Ok(properties)
    }
}

impl Default for ApplicationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn register_descriptor(
    registry: &mut BeanDefinitionRegistry,
    descriptor: &TypeDescriptor,
    interface_aliases: bool,
) -> ContainerResult<()> {
    let bean_name = descriptor.bean_name();
    registry.register(
        BeanDefinition::new(bean_name.clone(), descriptor.qualified_name.clone())
            .lazy(descriptor.is_lazy()),
    )?;

    if interface_aliases {
        for interface in &descriptor.interfaces {
            registry.register(BeanDefinition::alias(
                interface.clone(),
                descriptor.qualified_name.clone(),
                bean_name.clone(),
            ))?;
        }
    }
    Ok(())
}
