//! Bean 定义注册表

use ioc_common::{ContainerError, ContainerResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Bean 定义
///
/// 注册后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDefinition {
    /// Bean 名称，注册表内唯一
    pub name: String,
    /// 目标类型（全限定名）
    pub type_name: String,
    /// 产生这个定义的 Bean 名称；接口别名指向组件自身的名称
    pub factory_name: String,
    /// 是否延迟加载
    pub lazy: bool,
}

impl BeanDefinition {
    /// 创建非延迟加载的定义
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            factory_name: name.clone(),
            name,
            type_name: type_name.into(),
            lazy: false,
        }
    }

    /// 接口别名定义：按接口全限定名注册，总是延迟加载
    pub fn alias(
        interface: impl Into<String>,
        type_name: impl Into<String>,
        factory_name: impl Into<String>,
    ) -> Self {
        Self {
            name: interface.into(),
            type_name: type_name.into(),
            factory_name: factory_name.into(),
            lazy: true,
        }
    }

    /// 设置延迟加载
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// 是否为别名定义
    pub fn is_alias(&self) -> bool {
        self.factory_name != self.name
    }
}

impl fmt::Display for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.type_name)?;
        if self.lazy {
            f.write_str(" (lazy)")?;
        }
        Ok(())
    }
}

/// Bean 定义注册表
///
/// 启动阶段写入，之后只读。
#[derive(Debug, Clone, Default)]
pub struct BeanDefinitionRegistry {
    definitions: HashMap<String, Arc<BeanDefinition>>,
    order: Vec<String>,
}

impl BeanDefinitionRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册定义；名称已存在时返回错误，注册表保持不变
    pub fn register(&mut self, definition: BeanDefinition) -> ContainerResult<()> {
        if self.definitions.contains_key(&definition.name) {
            warn!("Bean 定义重复，拒绝注册: {}", definition.name);
            return Err(ContainerError::DuplicateDefinition {
                name: definition.name,
            });
        }

        debug!("注册 Bean 定义: {}", definition);
        self.order.push(definition.name.clone());
        self.definitions
            .insert(definition.name.clone(), Arc::new(definition));
        Ok(())
    }

    /// 按名称查找定义
    pub fn lookup(&self, name: &str) -> ContainerResult<Arc<BeanDefinition>> {
        self.definitions
            .get(name)
            .cloned()
            .ok_or_else(|| ContainerError::not_found(name))
    }

    /// 是否存在指定名称的定义
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 按注册顺序排列的全部名称
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// 按注册顺序遍历定义
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<BeanDefinition>> {
        self.order.iter().filter_map(|name| self.definitions.get(name))
    }

    /// 目标类型为给定类型的第一个定义
    pub fn find_by_type(&self, type_name: &str) -> Option<&Arc<BeanDefinition>> {
        self.definitions().find(|definition| definition.type_name == type_name)
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
