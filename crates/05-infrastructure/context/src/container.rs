//! 应用上下文
//!
//! ## 创建流程
//!
//! 1. 已完成的单例直接返回
//! 2. 获取全局可重入创建锁，再次检查完成缓存和提前暴露缓存
//! 3. 同类型已有实例时复用（每个类型只有一个实例）
//! 4. 无参构造；类型匹配切点时改用代理视图
//! 5. 按名称和类型提前暴露，再执行依赖注入
//! 6. 注入完成后移入完成缓存
//!
//! 提前暴露只对持有创建锁的线程可见，其他线程等待锁释放后只会看到完成的单例。
//! setter 循环依赖因此可以结束：循环中的后来者拿到的是尚未完成注入的实例。

use crate::catalog::ClassCatalog;
use crate::component::ManagedInstance;
use crate::registry::{BeanDefinition, BeanDefinitionRegistry};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use ioc_aop::{AdvisedSupport, ProxyFactory};
use ioc_common::{BeanRef, ContainerError, ContainerResult, InjectionPoint, ProxyKind};
use ioc_config::ApplicationProperties;
use parking_lot::ReentrantMutex;
use serde::Serialize;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Bean 工厂 trait
pub trait BeanFactory: Send + Sync {
    /// 按名称获取 Bean
    fn get_bean(&self, name: &str) -> ContainerResult<BeanRef>;

    /// 按类型（全限定名）获取 Bean
    fn get_bean_by_type(&self, type_name: &str) -> ContainerResult<BeanRef>;

    /// 全部定义名称，按注册顺序
    fn definition_names(&self) -> Vec<String>;
}

/// 容器统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerStats {
    /// Bean 定义数量
    pub definitions: usize,
    /// 已创建的实例数量
    pub singletons: usize,
    /// 其中代理实例数量
    pub proxies: usize,
    /// 已缓存的拦截器链数量
    pub cached_chains: usize,
}

/// 应用上下文
pub struct ApplicationContext {
    id: Uuid,
    started_at: DateTime<Utc>,
    properties: ApplicationProperties,
    registry: BeanDefinitionRegistry,
    catalog: Arc<ClassCatalog>,
    advised: Option<Arc<AdvisedSupport>>,
    singletons: DashMap<String, BeanRef>,
    creation: ReentrantMutex<RefCell<HashMap<String, BeanRef>>>,
}

impl ApplicationContext {
    pub(crate) fn new(
        properties: ApplicationProperties,
        registry: BeanDefinitionRegistry,
        catalog: Arc<ClassCatalog>,
        advised: Option<Arc<AdvisedSupport>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            properties,
            registry,
            catalog,
            advised,
            singletons: DashMap::new(),
            creation: ReentrantMutex::new(RefCell::new(HashMap::new())),
        }
    }

    /// 按注册顺序创建全部非延迟加载的 Bean，任何失败都会中止启动
    pub(crate) fn initialize(&self) -> ContainerResult<()> {
        let eager: Vec<&Arc<BeanDefinition>> =
            self.registry.definitions().filter(|d| !d.lazy).collect();
        info!(
            "开始初始化容器 {}: {} 个定义, {} 个需要提前创建",
            self.id,
            self.registry.len(),
            eager.len()
        );

        for definition in eager {
            if let Err(e) = self.get_bean(&definition.name) {
                error!("Bean {} 初始化失败: {}", definition.name, e);
                return Err(e);
            }
        }

        info!("容器 {} 初始化完成, 共 {} 个实例", self.id, self.stats().singletons);
        Ok(())
    }

    /// 上下文 ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 启动时间
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 启动时加载的配置
    pub fn properties(&self) -> &ApplicationProperties {
        &self.properties
    }

    /// 生效的切面支持；未启用 AOP 时为 `None`
    pub fn advised_support(&self) -> Option<&Arc<AdvisedSupport>> {
        self.advised.as_ref()
    }

    /// 是否存在指定名称的定义
    pub fn contains_bean(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// 按名称查找定义
    pub fn definition(&self, name: &str) -> Option<Arc<BeanDefinition>> {
        self.registry.lookup(name).ok()
    }

    /// 单例是否已创建完成
    pub fn is_singleton_created(&self, name: &str) -> bool {
        self.singletons.contains_key(name)
    }

    /// 按名称获取 Bean 并取出指定视图
    pub fn get_bean_as<H>(&self, name: &str) -> ContainerResult<H>
    where
        H: Any + Clone,
    {
        let bean = self.get_bean(name)?;
        bean.downcast::<H>()
            .ok_or_else(|| ContainerError::BeanNotOfRequiredType {
                name: name.to_string(),
                expected: std::any::type_name::<H>().to_string(),
                actual: bean.handle_type().to_string(),
            })
    }

    /// Bean 的代理策略；未代理时为 `None`
    pub fn proxy_kind(&self, name: &str) -> ContainerResult<Option<ProxyKind>> {
        Ok(self.get_bean(name)?.proxy_kind())
    }

    /// 统计信息
    pub fn stats(&self) -> ContainerStats {
        let mut instances = HashSet::new();
        let mut proxies = HashSet::new();
        for entry in self.singletons.iter() {
            instances.insert(entry.type_name().to_string());
            if entry.is_proxy() {
                proxies.insert(entry.type_name().to_string());
            }
        }

        ContainerStats {
            definitions: self.registry.len(),
            singletons: instances.len(),
            proxies: proxies.len(),
            cached_chains: self.advised.as_ref().map_or(0, |a| a.chain_count()),
        }
    }

    fn create_bean(&self, definition: &BeanDefinition) -> ContainerResult<BeanRef> {
        let class = self
            .catalog
            .component_class(&definition.type_name)
            .ok_or_else(|| ContainerError::Instantiation {
                type_name: definition.type_name.clone(),
                source: format!("类型目录中不存在 {}", definition.type_name).into(),
            })?;
        let descriptor = class.descriptor().clone();

        debug!("创建 Bean: {}", definition);
        let raw: Arc<dyn ManagedInstance> = class.instantiate()?;

        let exposed = match &self.advised {
            Some(advised) if advised.class_matches(&descriptor) => {
                let factory = ProxyFactory::new(advised.clone(), descriptor.clone());
                debug!("Bean {} 匹配切点，使用{}代理", definition.name, factory.kind());
                raw.clone().proxy(&factory)
            }
            _ => raw.clone().expose(),
        };

        {
            let guard = self.creation.lock();
            let mut early = guard.borrow_mut();
            early.insert(definition.name.clone(), exposed.clone());
            early.insert(definition.type_name.clone(), exposed.clone());
        }

        for point in &descriptor.injection_points {
            let injected = self
                .resolve_dependency(&definition.name, point)
                .and_then(|dependency| raw.inject(point, &dependency));
            if let Err(e) = injected {
                let guard = self.creation.lock();
                let mut early = guard.borrow_mut();
                early.remove(&definition.name);
                early.remove(&definition.type_name);
                return Err(e);
            }
        }

        {
            let guard = self.creation.lock();
            let mut early = guard.borrow_mut();
            early.remove(&definition.name);
            early.remove(&definition.type_name);
        }
        self.singletons
            .insert(definition.type_name.clone(), exposed.clone());
        self.singletons
            .insert(definition.name.clone(), exposed.clone());

        debug!("Bean 创建完成: {}", definition.name);
        Ok(exposed)
    }

    fn resolve_dependency(&self, owner: &str, point: &InjectionPoint) -> ContainerResult<BeanRef> {
        let dependency = point.dependency_name();
        let resolved = match self.get_bean(&dependency) {
            Err(e) if e.is_not_found() && point.explicit_name().is_none() => {
                debug!(
                    "默认依赖名 {} 不存在，按类型 {} 查找",
                    dependency, point.declared_type
                );
                self.get_bean_by_type(&point.declared_type)
            }
            other => other,
        };

        resolved
            .map(|bean| {
                debug!("注入依赖: {}.{} <- {}", owner, point.field, bean.type_name());
                bean
            })
            .map_err(|source| ContainerError::DependencyResolution {
                bean: owner.to_string(),
                field: point.field.clone(),
                dependency,
                source: Box::new(source),
            })
    }

    fn cached(&self, key: &str) -> Option<BeanRef> {
        self.singletons.get(key).map(|entry| entry.value().clone())
    }
}

impl BeanFactory for ApplicationContext {
    /// 按名称获取 Bean
    ///
    /// 已创建的单例直接从缓存读取，不加锁。首次创建时持有全局创建锁，
    /// 组件的 `instantiate` 和 `inject` 都在锁内执行：同一实例只会创建一次，
    /// 但所有线程的首次创建是串行的，构造函数阻塞会让其它线程的首次获取一起等待。
    /// 同一线程内的嵌套获取可以重入，循环依赖由此拿到提前暴露的实例。
    fn get_bean(&self, name: &str) -> ContainerResult<BeanRef> {
        if let Some(bean) = self.cached(name) {
            return Ok(bean);
        }

        let guard = self.creation.lock();
        if let Some(bean) = self.cached(name) {
            return Ok(bean);
        }
        if let Some(bean) = guard.borrow().get(name).cloned() {
            return Ok(bean);
        }

        let definition = self.registry.lookup(name)?;

        let existing = self
            .cached(&definition.type_name)
            .or_else(|| guard.borrow().get(&definition.type_name).cloned());
        if let Some(bean) = existing {
            debug!("Bean {} 复用类型 {} 的已有实例", name, definition.type_name);
            if self.is_singleton_created(&definition.type_name) {
                self.singletons.insert(definition.name.clone(), bean.clone());
            }
            return Ok(bean);
        }

        self.create_bean(&definition)
    }

    fn get_bean_by_type(&self, type_name: &str) -> ContainerResult<BeanRef> {
        if let Some(bean) = self.cached(type_name) {
            return Ok(bean);
        }
        if self.registry.contains(type_name) {
            return self.get_bean(type_name);
        }
        match self.registry.find_by_type(type_name) {
            Some(definition) => self.get_bean(&definition.name),
            None => Err(ContainerError::not_found(type_name)),
        }
    }

    fn definition_names(&self) -> Vec<String> {
        self.registry.names().to_vec()
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .field("definitions", &self.registry.len())
            .field("aop", &self.advised.is_some())
            .finish()
    }
}
