//! 类型目录
//!
//! 静态登记的组件类型和切面类型，容器按全限定名查找。

use crate::component::{Component, ComponentClass};
use ioc_aop::{Aspect, AspectClass};
use ioc_common::TypeDescriptor;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 类型目录
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    components: Vec<ComponentClass>,
    index: HashMap<String, usize>,
    aspects: HashMap<String, AspectClass>,
}

impl ClassCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记组件类型
    pub fn component<T: Component>(mut self) -> Self {
        self.add_component(ComponentClass::of::<T>());
        self
    }

    /// 登记切面类型
    pub fn aspect<A: Aspect>(mut self) -> Self {
        self.add_aspect(AspectClass::of::<A>());
        self
    }

    /// 登记组件类型；同名类型以后登记的为准
    pub fn add_component(&mut self, class: ComponentClass) {
        let name = class.qualified_name().to_string();
        match self.index.get(&name) {
            Some(&position) => {
                warn!("组件类型重复登记，覆盖之前的登记: {}", name);
                self.components[position] = class;
            }
            None => {
                debug!("登记组件类型: {}", name);
                self.index.insert(name, self.components.len());
                self.components.push(class);
            }
        }
    }

    /// 登记切面类型
    pub fn add_aspect(&mut self, class: AspectClass) {
        debug!("登记切面类型: {}", class.qualified_name());
        if let Some(previous) = self.aspects.insert(class.qualified_name().to_string(), class) {
            warn!("切面类型重复登记，覆盖之前的登记: {}", previous.qualified_name());
        }
    }

    /// 按全限定名查找组件类型
    pub fn component_class(&self, qualified_name: &str) -> Option<&ComponentClass> {
        self.index
            .get(qualified_name)
            .and_then(|&position| self.components.get(position))
    }

    /// 按全限定名查找切面类型
    pub fn aspect_class(&self, qualified_name: &str) -> Option<&AspectClass> {
        self.aspects.get(qualified_name)
    }

    /// 所有组件的类型元数据，按登记顺序
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.components.iter().map(|class| class.descriptor().as_ref())
    }

    /// 组件类型数量
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// 是否没有任何组件类型
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
