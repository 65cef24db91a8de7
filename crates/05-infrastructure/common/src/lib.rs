//! # IoC Common
//!
//! 这个 crate 提供了容器各层共享的元数据、错误类型和 Bean 句柄。
//!
//! ## 核心类型
//!
//! - [`TypeDescriptor`] - 组件类型的静态元数据（替代运行时反射）
//! - [`MethodSignature`] - 方法签名，切点匹配的输入
//! - [`InjectionPoint`] - 声明式注入点
//! - [`BeanRef`] - 类型擦除的共享 Bean 句柄
//! - [`Autowired`] - 只写一次的注入槽
//! - [`ContainerError`] / [`MethodError`] - 错误类型
//!
//! ## 设计原则
//!
//! - 元数据显式声明，不依赖运行时反射
//! - 类型标识使用点分全限定名（如 `demo.Hello.impl.HelloService`）

pub mod bean;
pub mod errors;
pub mod metadata;
pub mod naming;

pub use bean::*;
pub use errors::*;
pub use metadata::*;
pub use naming::*;
