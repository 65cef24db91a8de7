//! # IoC Context
//!
//! Bean 定义注册表、应用上下文和组件扫描。
//!
//! ## 启动流程
//!
//! 1. 按顺序加载并合并配置源
//! 2. 扫描器在 `scanPackage` 下发现组件，注册 Bean 定义（以及接口别名）
//! 3. 读取切面配置，编译切点并创建唯一的切面实例
//! 4. 按注册顺序创建全部非延迟加载的 Bean，任何失败都会中止启动
//!
//! ## 使用示例
//!
//! ```ignore
//! let context = ApplicationContextBuilder::new()
//!     .component::<HelloService>()
//!     .aspect::<LogAspect>()
//!     .add_properties_file("application.properties")
//!     .build()
//!     .await?;
//!
//! let hello: Arc<dyn HelloApi> = context.get_bean_as("helloService")?;
//! ```

pub mod builder;
pub mod catalog;
pub mod component;
pub mod container;
pub mod registry;
pub mod scanner;

pub use builder::ApplicationContextBuilder;
pub use catalog::ClassCatalog;
pub use component::{Component, ComponentClass};
pub use container::{ApplicationContext, BeanFactory, ContainerStats};
pub use registry::{BeanDefinition, BeanDefinitionRegistry};
pub use scanner::{CatalogScanner, ComponentScanner, ManifestScanner};

// 组件实现常用的类型
pub use ioc_aop::{AopProxy, Argument, MethodError, MethodResult, ProxyFactory};
pub use ioc_common::{Autowired, BeanRef, InjectionPoint, TypeDescriptor};
