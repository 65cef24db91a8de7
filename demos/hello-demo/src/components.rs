//! 演示组件

use ioc_common::{ContainerError, ContainerResult, MethodSignature, TAG_COMPONENT, TAG_SERVICE};
use ioc_context::{
    Autowired, BeanRef, Component, InjectionPoint, MethodError, MethodResult, ProxyFactory, TypeDescriptor,
};
use ioc_macros::aop_proxy;
use std::sync::Arc;
use tracing::info;

/// 问候接口
pub trait IHello: Send + Sync {
    /// 问候
    fn say_hello(&self, name: &str) -> MethodResult<String>;

    /// 整数除法，除数为零时抛出 `ArithmeticException`
    fn divide(&self, dividend: u32, divisor: u32) -> MethodResult<u32>;
}

/// 工具组件的公开方法
pub trait TestUtilOps: Send + Sync {
    /// 自检
    fn test(&self) -> MethodResult<()>;
}

/// 没有声明接口的工具组件
#[derive(Debug, Default)]
pub struct TestUtil;

impl TestUtil {
    pub const TYPE_NAME: &'static str = "demo.TestUtil";
}

#[aop_proxy(root = "ioc_context")]
impl TestUtilOps for TestUtil {
    fn test(&self) -> MethodResult<()> {
        info!("TestUtil 自检通过");
        Ok(())
    }
}

impl Component for TestUtil {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_NAME)
            .tag(TAG_COMPONENT)
            .method(MethodSignature::public("()", "test"))
    }

    fn instantiate() -> Result<Self, ioc_common::BoxError> {
        Ok(Self)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new(Self::TYPE_NAME, self as Arc<dyn TestUtilOps>)
    }

    fn proxy(self: Arc<Self>, factory: &ProxyFactory) -> BeanRef {
        factory.bean(factory.proxy(self) as Arc<dyn TestUtilOps>)
    }
}

/// 问候服务
#[derive(Debug, Default)]
pub struct HelloService {
    test_util: Autowired<Arc<dyn TestUtilOps>>,
}

impl HelloService {
    pub const TYPE_NAME: &'static str = "demo.Hello.impl.HelloService";

    fn test_util(&self) -> MethodResult<&Arc<dyn TestUtilOps>> {
        self.test_util
            .get()
            .ok_or_else(|| MethodError::new("IllegalStateException", "test_util 尚未注入"))
    }
}

#[aop_proxy(root = "ioc_context")]
impl IHello for HelloService {
    fn say_hello(&self, name: &str) -> MethodResult<String> {
        self.test_util()?.test()?;
        let greeting = format!("Hello {name}!");
        info!("{}", greeting);
        Ok(greeting)
    }

    fn divide(&self, dividend: u32, divisor: u32) -> MethodResult<u32> {
        dividend
            .checked_div(divisor)
            .ok_or_else(|| MethodError::new("ArithmeticException", "/ by zero"))
    }
}

impl Component for HelloService {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_NAME)
            .implements("demo.Hello.IHello")
            .tag(TAG_SERVICE)
            .method(MethodSignature::public("String", "say_hello").param("String"))
            .method(
                MethodSignature::public("u32", "divide")
                    .param("u32")
                    .param("u32")
                    .throws("ArithmeticException"),
            )
            .inject(InjectionPoint::new("test_util", TestUtil::TYPE_NAME))
    }

    fn instantiate() -> Result<Self, ioc_common::BoxError> {
        Ok(Self::default())
    }

    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()> {
        match point.field.as_str() {
            "test_util" => self.test_util.fill(Self::TYPE_NAME, point, dependency),
            other => Err(ContainerError::injection_failed(Self::TYPE_NAME, other, "未知的注入点")),
        }
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new(Self::TYPE_NAME, self as Arc<dyn IHello>)
    }

    fn proxy(self: Arc<Self>, factory: &ProxyFactory) -> BeanRef {
        factory.bean(factory.proxy(self) as Arc<dyn IHello>)
    }
}
