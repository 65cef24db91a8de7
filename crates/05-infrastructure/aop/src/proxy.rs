//! 代理分发
//!
//! [`AopProxy`] 是目标实例的装饰器。组件为它实现自己对外暴露的 trait
//! （手写或者用 `#[aop_proxy]` 生成），每个方法都交给 [`AopProxy::invoke`]。
//! 声明了接口的类型按接口代理，否则按子类代理；两者调用行为一致。

use crate::join_point::JoinPoint;
use crate::support::AdvisedSupport;
use ioc_common::{Argument, BeanRef, MethodResult, ProxyKind, TypeDescriptor};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// AOP 代理
pub struct AopProxy<T> {
    target: Arc<T>,
    support: Arc<AdvisedSupport>,
    descriptor: Arc<TypeDescriptor>,
    kind: ProxyKind,
}

impl<T> AopProxy<T>
where
    T: Send + Sync + 'static,
{
    /// 包装目标实例
    pub fn new(target: Arc<T>, support: Arc<AdvisedSupport>, descriptor: Arc<TypeDescriptor>) -> Self {
        let kind = ProxyKind::for_interfaces(&descriptor.interfaces);
        Self {
            target,
            support,
            descriptor,
            kind,
        }
    }

    /// 目标实例
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// 代理策略
    pub fn kind(&self) -> ProxyKind {
        self.kind
    }

    /// 目标类型描述
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// 通过拦截器链调用目标方法
    ///
    /// 方法按名称和参数类型定位，同名重载各自使用自己的拦截器链。
    /// 元数据中没有登记的方法直接调用目标，不经过任何通知。
    pub fn invoke<R, F>(
        &self,
        method: &str,
        parameter_types: &[&str],
        args: Vec<Argument>,
        body: F,
    ) -> MethodResult<R>
    where
        R: Any + Send + Sync,
        F: FnOnce(&T) -> MethodResult<R>,
    {
        let Some(signature) = self.descriptor.find_overload(method, parameter_types) else {
            return body(self.target.as_ref());
        };

        let chain = self.support.chain_for(signature);
        if chain.is_empty() {
            return body(self.target.as_ref());
        }

        let join_point = JoinPoint::new(
            self,
            self.target.as_ref(),
            signature,
            &args,
            &self.descriptor.qualified_name,
        );
        chain.proceed(&join_point, || body(self.target.as_ref()))
    }
}

impl<T> fmt::Debug for AopProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AopProxy")
            .field("target", &self.descriptor.qualified_name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// 代理工厂
///
/// 容器为每个需要代理的 Bean 创建一个工厂，交给组件构造自己的代理视图。
#[derive(Clone)]
pub struct ProxyFactory {
    support: Arc<AdvisedSupport>,
    descriptor: Arc<TypeDescriptor>,
}

impl ProxyFactory {
    /// 创建代理工厂
    pub fn new(support: Arc<AdvisedSupport>, descriptor: Arc<TypeDescriptor>) -> Self {
        Self { support, descriptor }
    }

    /// 代理策略
    pub fn kind(&self) -> ProxyKind {
        ProxyKind::for_interfaces(&self.descriptor.interfaces)
    }

    /// 包装目标实例
    pub fn proxy<T>(&self, target: Arc<T>) -> Arc<AopProxy<T>>
    where
        T: Send + Sync + 'static,
    {
        Arc::new(AopProxy::new(target, self.support.clone(), self.descriptor.clone()))
    }

    /// 把代理视图包装为 Bean 句柄
    pub fn bean<H>(&self, handle: H) -> BeanRef
    where
        H: Any + Send + Sync,
    {
        BeanRef::proxied(self.descriptor.qualified_name.as_str(), handle, self.kind())
    }
}

impl fmt::Debug for ProxyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyFactory")
            .field("target", &self.descriptor.qualified_name)
            .field("kind", &self.kind())
            .finish()
    }
}
