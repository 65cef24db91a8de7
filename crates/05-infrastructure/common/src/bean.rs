//! Bean 句柄
//!
//! 容器中保存的实例都是类型擦除的 [`BeanRef`]。句柄内部存放组件对外暴露的
//! 视图（通常是 `Arc<dyn 某接口 + Send + Sync>`），无论是否被代理，调用方
//! 都按同一个视图类型取用。

use crate::errors::ContainerError;
use crate::metadata::InjectionPoint;
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 代理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKind {
    /// 基于接口：代理呈现目标类型声明的接口
    Interface,
    /// 基于子类：代理呈现目标类型自身的公开方法
    Subclass,
}

impl ProxyKind {
    /// 按声明的接口数量选择代理策略
    pub fn for_interfaces(interfaces: &[String]) -> Self {
        if interfaces.is_empty() {
            Self::Subclass
        } else {
            Self::Interface
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface => f.write_str("interface"),
            Self::Subclass => f.write_str("subclass"),
        }
    }
}

/// 类型擦除的 Bean 句柄
#[derive(Clone)]
pub struct BeanRef {
    handle: Arc<dyn Any + Send + Sync>,
    handle_type: &'static str,
    type_name: Arc<str>,
    proxy_kind: Option<ProxyKind>,
}

impl BeanRef {
    /// 包装原始（未代理）组件视图
    pub fn new<H>(type_name: impl Into<Arc<str>>, handle: H) -> Self
    where
        H: Any + Send + Sync,
    {
        Self {
            handle: Arc::new(handle),
            handle_type: std::any::type_name::<H>(),
            type_name: type_name.into(),
            proxy_kind: None,
        }
    }

    /// 包装代理视图
    pub fn proxied<H>(type_name: impl Into<Arc<str>>, handle: H, kind: ProxyKind) -> Self
    where
        H: Any + Send + Sync,
    {
        Self {
            proxy_kind: Some(kind),
            ..Self::new(type_name, handle)
        }
    }

    /// 取出指定类型的视图
    pub fn downcast<H>(&self) -> Option<H>
    where
        H: Any + Clone,
    {
        self.handle.downcast_ref::<H>().cloned()
    }

    /// 是否可以按指定视图类型取用
    pub fn is<H: Any>(&self) -> bool {
        (*self.handle).type_id() == TypeId::of::<H>()
    }

    /// 目标组件的全限定类型名
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 视图的 Rust 类型名
    pub fn handle_type(&self) -> &'static str {
        self.handle_type
    }

    /// 代理策略；未代理时为 `None`
    pub fn proxy_kind(&self) -> Option<ProxyKind> {
        self.proxy_kind
    }

    /// 是否为代理
    pub fn is_proxy(&self) -> bool {
        self.proxy_kind.is_some()
    }

    /// 两个句柄是否指向同一个实例
    pub fn same_instance(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.handle, &b.handle)
    }
}

impl fmt::Debug for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanRef")
            .field("type_name", &self.type_name)
            .field("handle_type", &self.handle_type)
            .field("proxy_kind", &self.proxy_kind)
            .finish()
    }
}

/// 只写一次的注入槽
///
/// 组件用它保存容器通过 setter 注入的依赖。
pub struct Autowired<H> {
    cell: OnceCell<H>,
}

impl<H> Autowired<H>
where
    H: Any + Clone + Send + Sync,
{
    /// 创建空的注入槽
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 从 Bean 句柄填充注入槽
    pub fn fill(&self, owner: &str, point: &InjectionPoint, dependency: &BeanRef) -> Result<(), ContainerError> {
        let handle = dependency.downcast::<H>().ok_or_else(|| {
            ContainerError::injection_failed(
                owner,
                &point.field,
                format!(
                    "依赖 {} 的视图类型为 {}，字段需要 {}",
                    dependency.type_name(),
                    dependency.handle_type(),
                    std::any::type_name::<H>()
                ),
            )
        })?;
        self.cell
            .set(handle)
            .map_err(|_| ContainerError::injection_failed(owner, &point.field, "字段已被注入"))
    }

    /// 已注入的依赖
    pub fn get(&self) -> Option<&H> {
        self.cell.get()
    }

    /// 是否已注入
    pub fn is_wired(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<H> Default for Autowired<H>
where
    H: Any + Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for Autowired<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("wired", &self.cell.get().is_some())
            .finish()
    }
}

/// 方法调用参数
///
/// 代理在调用目标方法前复制一份参数放进连接点。
pub struct Argument {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    display: String,
}

impl Argument {
    /// 创建参数
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        Self {
            display: format!("{value:?}"),
            type_name: std::any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// 按类型读取参数值
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// 参数的 Rust 类型名
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
