//! # AOP
//!
//! 切点匹配、通知链构建和代理分发。
//!
//! ## 处理流程
//!
//! 1. [`AopConfig`] 描述唯一生效的切面配置
//! 2. [`Pointcut`] 把切点表达式编译为类级和方法级匹配器（每个容器只编译一次）
//! 3. [`AdvisedSupport`] 按 (类型, 方法) 懒构建并缓存 [`InterceptorChain`]
//! 4. [`AopProxy`] 装饰目标实例，每次调用都经过拦截器链
//!
//! 通知执行顺序固定为：前置通知 → 目标方法 → 返回通知 / 匹配的异常通知。

pub mod advice;
pub mod aspect;
pub mod config;
pub mod join_point;
pub mod pointcut;
pub mod proxy;
pub mod support;

pub use advice::{AdviceInterceptor, AdviceKind, InterceptorChain};
pub use aspect::{AdviceArg, AdviceMethod, AdviceParam, Aspect, AspectClass, AspectDescriptor};
pub use config::AopConfig;
pub use join_point::JoinPoint;
pub use pointcut::Pointcut;
pub use proxy::{AopProxy, ProxyFactory};
pub use support::AdvisedSupport;

// 代理实现（包括 `#[aop_proxy]` 生成的代码）需要的类型
pub use ioc_common::{Argument, MethodError, MethodResult};
