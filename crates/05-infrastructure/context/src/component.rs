//! 组件定义
//!
//! 组件通过 [`Component`] 提供静态元数据、无参构造、setter 注入和对外视图。
//! 容器只通过类型擦除的 [`ComponentClass`] 使用组件。

use ioc_aop::ProxyFactory;
use ioc_common::{BeanRef, BoxError, ContainerError, ContainerResult, InjectionPoint, TypeDescriptor};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// 组件 trait
///
/// # 示例
///
/// ```ignore
/// impl Component for HelloService {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::new("demo.Hello.impl.HelloService")
///             .implements("demo.Hello.IHelloService")
///             .tag(TAG_SERVICE)
///             .method(MethodSignature::public("String", "say_hello").param("String"))
///     }
///
///     fn instantiate() -> Result<Self, BoxError> {
///         Ok(Self::default())
///     }
///
///     fn expose(self: Arc<Self>) -> BeanRef {
///         BeanRef::new("demo.Hello.impl.HelloService", self as Arc<dyn HelloApi>)
///     }
///
///     fn proxy(self: Arc<Self>, factory: &ProxyFactory) -> BeanRef {
///         factory.bean(factory.proxy(self) as Arc<dyn HelloApi>)
///     }
/// }
/// ```
pub trait Component: Send + Sync + Sized + 'static {
    /// 类型元数据
    fn descriptor() -> TypeDescriptor;

    /// 无参构造
    fn instantiate() -> Result<Self, BoxError>;

    /// 注入一个依赖；注入点来自 [`TypeDescriptor::injection_points`]
    fn inject(&self, point: &InjectionPoint, _dependency: &BeanRef) -> ContainerResult<()> {
        Err(ContainerError::injection_failed(
            Self::descriptor().qualified_name,
            &point.field,
            "组件没有实现依赖注入",
        ))
    }

    /// 原始实例对外暴露的视图
    fn expose(self: Arc<Self>) -> BeanRef;

    /// 代理后的视图，必须与 [`Component::expose`] 的视图类型一致
    fn proxy(self: Arc<Self>, _factory: &ProxyFactory) -> BeanRef {
        warn!(
            "组件 {} 没有提供代理视图，使用原始实例",
            Self::descriptor().qualified_name
        );
        self.expose()
    }
}

/// 容器持有的原始实例
pub(crate) trait ManagedInstance: Send + Sync {
    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()>;

    fn expose(self: Arc<Self>) -> BeanRef;

    fn proxy(self: Arc<Self>, factory: &ProxyFactory) -> BeanRef;
}

impl<T: Component> ManagedInstance for T {
    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()> {
        <T as Component>::inject(self, point, dependency)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        <T as Component>::expose(self)
    }

    fn proxy(self: Arc<Self>, factory: &ProxyFactory) -> BeanRef {
        <T as Component>::proxy(self, factory)
    }
}

/// 类型擦除的组件类型
#[derive(Clone)]
pub struct ComponentClass {
    descriptor: Arc<TypeDescriptor>,
    factory: fn() -> Result<Arc<dyn ManagedInstance>, BoxError>,
}

impl ComponentClass {
    /// 从具体组件类型构造
    pub fn of<T: Component>() -> Self {
        Self {
            descriptor: Arc::new(T::descriptor()),
            factory: || T::instantiate().map(|instance| Arc::new(instance) as Arc<dyn ManagedInstance>),
        }
    }

    /// 类型元数据
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// 全限定类型名
    pub fn qualified_name(&self) -> &str {
        &self.descriptor.qualified_name
    }

    pub(crate) fn instantiate(&self) -> ContainerResult<Arc<dyn ManagedInstance>> {
        (self.factory)().map_err(|source| ContainerError::Instantiation {
            type_name: self.qualified_name().to_string(),
            source,
        })
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("qualified_name", &self.qualified_name())
            .finish()
    }
}
