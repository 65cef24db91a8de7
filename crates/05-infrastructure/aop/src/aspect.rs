//! 切面定义
//!
//! 切面类型通过 [`Aspect`] 描述自己的通知方法，容器按名称调用它们。
//! 通知方法的参数按声明类型绑定：连接点、异常、返回值，其余参数不绑定。

use crate::join_point::JoinPoint;
use ioc_common::{BoxError, ContainerError, ContainerResult, MethodError, MethodResult};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 通知方法的参数类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceParam {
    /// 连接点
    JoinPoint,
    /// 目标方法抛出的异常，仅异常通知绑定
    Error,
    /// 目标方法的返回值，仅返回通知绑定
    ReturnValue,
    /// 其他类型，不绑定
    Other(String),
}

/// 通知方法描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceMethod {
    /// 方法名
    pub name: String,
    /// 参数类型
    pub params: Vec<AdviceParam>,
}

impl AdviceMethod {
    /// 创建通知方法描述
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = AdviceParam>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
        }
    }
}

/// 切面类型描述
///
/// 通知方法只按名称查找；同名方法以最后声明的为准。
#[derive(Debug, Clone, Default)]
pub struct AspectDescriptor {
    qualified_name: String,
    advice_methods: HashMap<String, AdviceMethod>,
}

impl AspectDescriptor {
    /// 创建切面描述
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            advice_methods: HashMap::new(),
        }
    }

    /// 声明通知方法
    pub fn advice(mut self, name: impl Into<String>, params: impl IntoIterator<Item = AdviceParam>) -> Self {
        let method = AdviceMethod::new(name, params);
        self.advice_methods.insert(method.name.clone(), method);
        self
    }

    /// 全限定类型名
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// 按名称查找通知方法
    pub fn find_advice(&self, name: &str) -> Option<&AdviceMethod> {
        self.advice_methods.get(name)
    }
}

/// 通知调用时绑定的实参
#[derive(Clone, Copy)]
pub enum AdviceArg<'a> {
    /// 连接点
    JoinPoint(&'a JoinPoint<'a>),
    /// 目标方法抛出的异常
    Error(&'a MethodError),
    /// 目标方法的返回值
    ReturnValue(&'a (dyn Any + Send + Sync)),
    /// 未绑定
    Unbound,
}

impl<'a> AdviceArg<'a> {
    /// 连接点实参
    pub fn join_point(&self) -> Option<&'a JoinPoint<'a>> {
        match *self {
            Self::JoinPoint(join_point) => Some(join_point),
            _ => None,
        }
    }

    /// 异常实参
    pub fn error(&self) -> Option<&'a MethodError> {
        match *self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// 按类型读取返回值实参
    pub fn return_value<T: Any>(&self) -> Option<&'a T> {
        match *self {
            Self::ReturnValue(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for AdviceArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinPoint(join_point) => write!(f, "JoinPoint({join_point})"),
            Self::Error(error) => write!(f, "Error({error})"),
            Self::ReturnValue(_) => f.write_str("ReturnValue(..)"),
            Self::Unbound => f.write_str("Unbound"),
        }
    }
}

/// 切面 trait
pub trait Aspect: Send + Sync + 'static {
    /// 切面类型描述
    fn descriptor() -> AspectDescriptor
    where
        Self: Sized;

    /// 创建切面实例
    fn instantiate() -> Result<Self, BoxError>
    where
        Self: Sized;

    /// 按名称调用通知方法，实参顺序与声明的参数一致
    fn invoke_advice(&self, name: &str, args: &[AdviceArg<'_>]) -> MethodResult<()>;
}

/// 类型擦除的切面类型
#[derive(Clone)]
pub struct AspectClass {
    descriptor: AspectDescriptor,
    factory: fn() -> Result<Arc<dyn Aspect>, BoxError>,
}

impl AspectClass {
    /// 从具体切面类型构造
    pub fn of<A: Aspect>() -> Self {
        Self {
            descriptor: A::descriptor(),
            factory: || A::instantiate().map(|aspect| Arc::new(aspect) as Arc<dyn Aspect>),
        }
    }

    /// 切面类型描述
    pub fn descriptor(&self) -> &AspectDescriptor {
        &self.descriptor
    }

    /// 全限定类型名
    pub fn qualified_name(&self) -> &str {
        self.descriptor.qualified_name()
    }

    /// 创建切面实例
    pub fn instantiate(&self) -> ContainerResult<Arc<dyn Aspect>> {
        (self.factory)().map_err(|source| ContainerError::Instantiation {
            type_name: self.qualified_name().to_string(),
            source,
        })
    }
}

impl fmt::Debug for AspectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectClass")
            .field("qualified_name", &self.qualified_name())
            .finish()
    }
}
