//! 通知拦截器与拦截器链

use crate::aspect::{AdviceArg, AdviceMethod, AdviceParam, Aspect};
use crate::join_point::JoinPoint;
use ioc_common::{MethodError, MethodResult, MethodSignature};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    /// 前置通知
    Before,
    /// 返回通知
    AfterReturning,
    /// 异常通知
    AfterThrowing,
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::AfterReturning => f.write_str("after-returning"),
            Self::AfterThrowing => f.write_str("after-throwing"),
        }
    }
}

/// 通知拦截器：把一个通知方法绑定到切面实例
#[derive(Clone)]
pub struct AdviceInterceptor {
    kind: AdviceKind,
    method: AdviceMethod,
    aspect: Arc<dyn Aspect>,
    throw_filter: Option<String>,
}

impl AdviceInterceptor {
    /// 创建拦截器
    pub fn new(kind: AdviceKind, method: AdviceMethod, aspect: Arc<dyn Aspect>) -> Self {
        Self {
            kind,
            method,
            aspect,
            throw_filter: None,
        }
    }

    /// 异常通知只处理给定类型名的异常
    pub fn with_throw_filter(mut self, type_name: Option<String>) -> Self {
        self.throw_filter = type_name;
        self
    }

    /// 通知类型
    pub fn kind(&self) -> AdviceKind {
        self.kind
    }

    /// 通知方法名
    pub fn advice_name(&self) -> &str {
        &self.method.name
    }

    /// 异常过滤条件
    pub fn throw_filter(&self) -> Option<&str> {
        self.throw_filter.as_deref()
    }

    /// 异常是否通过过滤条件；类型名精确匹配，未配置过滤时全部通过
    pub fn accepts(&self, error: &MethodError) -> bool {
        self.throw_filter
            .as_deref()
            .map_or(true, |type_name| error.is(type_name))
    }

    fn bind<'a>(
        &self,
        join_point: &'a JoinPoint<'a>,
        return_value: Option<&'a (dyn Any + Send + Sync)>,
        error: Option<&'a MethodError>,
    ) -> Vec<AdviceArg<'a>> {
        self.method
            .params
            .iter()
            .map(|param| match param {
                AdviceParam::JoinPoint => AdviceArg::JoinPoint(join_point),
                AdviceParam::Error => error.map_or(AdviceArg::Unbound, AdviceArg::Error),
                AdviceParam::ReturnValue => {
                    return_value.map_or(AdviceArg::Unbound, AdviceArg::ReturnValue)
                }
                AdviceParam::Other(_) => AdviceArg::Unbound,
            })
            .collect()
    }

    fn invoke<'a>(
        &self,
        join_point: &'a JoinPoint<'a>,
        return_value: Option<&'a (dyn Any + Send + Sync)>,
        error: Option<&'a MethodError>,
    ) -> MethodResult<()> {
        let args = self.bind(join_point, return_value, error);
        debug!("执行{}通知: {} @ {}", self.kind, self.method.name, join_point);
        self.aspect.invoke_advice(&self.method.name, &args)
    }
}

impl fmt::Debug for AdviceInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdviceInterceptor")
            .field("kind", &self.kind)
            .field("method", &self.method.name)
            .field("throw_filter", &self.throw_filter)
            .finish()
    }
}

/// 绑定到单个方法的拦截器链
///
/// 执行顺序：全部前置通知 → 目标方法 → 全部返回通知，或者通过过滤的异常通知。
/// 异常通知不会吞掉异常，原始错误总是返回给调用方。
#[derive(Debug)]
pub struct InterceptorChain {
    method: MethodSignature,
    interceptors: Vec<AdviceInterceptor>,
}

impl InterceptorChain {
    /// 创建空链
    pub fn new(method: MethodSignature) -> Self {
        Self {
            method,
            interceptors: Vec::new(),
        }
    }

    /// 追加拦截器
    pub fn push(&mut self, interceptor: AdviceInterceptor) {
        self.interceptors.push(interceptor);
    }

    /// 绑定的方法签名
    pub fn method(&self) -> &MethodSignature {
        &self.method
    }

    /// 拦截器，按配置顺序
    pub fn interceptors(&self) -> &[AdviceInterceptor] {
        &self.interceptors
    }

    /// 拦截器数量
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// 是否没有任何拦截器
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    fn of_kind(&self, kind: AdviceKind) -> impl Iterator<Item = &AdviceInterceptor> {
        self.interceptors.iter().filter(move |i| i.kind == kind)
    }

    /// 沿链执行一次调用
    pub fn proceed<R, F>(&self, join_point: &JoinPoint<'_>, target: F) -> MethodResult<R>
    where
        R: Any + Send + Sync,
        F: FnOnce() -> MethodResult<R>,
    {
        for interceptor in self.of_kind(AdviceKind::Before) {
            interceptor.invoke(join_point, None, None)?;
        }

        match target() {
            Ok(value) => {
                for interceptor in self.of_kind(AdviceKind::AfterReturning) {
                    interceptor.invoke(join_point, Some(&value as &(dyn Any + Send + Sync)), None)?;
                }
                Ok(value)
            }
            Err(error) => {
                for interceptor in self.of_kind(AdviceKind::AfterThrowing) {
                    if !interceptor.accepts(&error) {
                        debug!(
                            "异常类型 {} 不匹配过滤条件 {:?}，跳过异常通知 {}",
                            error.type_name(),
                            interceptor.throw_filter(),
                            interceptor.advice_name()
                        );
                        continue;
                    }
                    if let Err(advice_error) = interceptor.invoke(join_point, None, Some(&error)) {
                        warn!(
                            "异常通知 {} 执行失败: {}，继续抛出原始异常 {}",
                            interceptor.advice_name(),
                            advice_error,
                            error
                        );
                    }
                }
                Err(error)
            }
        }
    }
}
