//! 集成测试共享的组件和切面

#![allow(dead_code)]

use ioc_aop::{AdviceArg, AdviceParam, Aspect, AspectDescriptor};
use ioc_common::{
    BoxError, ContainerError, ContainerResult, MethodSignature, TAG_COMPONENT, TAG_LAZY, TAG_SERVICE,
};
use ioc_config::{keys, ApplicationProperties};
use ioc_context::{
    Autowired, BeanRef, Component, InjectionPoint, MethodError, MethodResult, ProxyFactory, TypeDescriptor,
};
use ioc_macros::aop_proxy;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// 记录一条事件（按线程隔离）
pub fn record(event: impl Into<String>) {
    EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

/// 取出当前线程记录的全部事件
pub fn take_events() -> Vec<String> {
    EVENTS.with(|events| events.borrow_mut().drain(..).collect())
}

/// 切面配置
pub fn aop_properties(point_cut: &str) -> ApplicationProperties {
    [
        (keys::SCAN_PACKAGE, "demo"),
        (keys::AOP_POINT_CUT, point_cut),
        (keys::AOP_ASPECT_CLASS, RecordingAspect::TYPE_NAME),
        (keys::AOP_ASPECT_BEFORE, "before"),
        (keys::AOP_ASPECT_AFTER, "after"),
        (keys::AOP_ASPECT_AFTER_THROW, "afterThrowing"),
        (keys::AOP_ASPECT_AFTER_THROW_NAME, "ArithmeticException"),
    ]
    .into_iter()
    .collect()
}

/// 记录通知调用的切面
#[derive(Debug, Default)]
pub struct RecordingAspect;

impl RecordingAspect {
    pub const TYPE_NAME: &'static str = "demo.aspect.LogAspect";
}

fn describe_return(arg: &AdviceArg<'_>) -> String {
    if let Some(value) = arg.return_value::<String>() {
        return value.clone();
    }
    if let Some(value) = arg.return_value::<u32>() {
        return value.to_string();
    }
    if arg.return_value::<()>().is_some() {
        return "()".to_string();
    }
    "?".to_string()
}

impl Aspect for RecordingAspect {
    fn descriptor() -> AspectDescriptor {
        AspectDescriptor::new(Self::TYPE_NAME)
            .advice("before", [AdviceParam::JoinPoint])
            .advice("after", [AdviceParam::JoinPoint, AdviceParam::ReturnValue])
            .advice("afterThrowing", [AdviceParam::JoinPoint, AdviceParam::Error])
            .advice("audit", [AdviceParam::Other("String".to_string()), AdviceParam::JoinPoint])
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn invoke_advice(&self, name: &str, args: &[AdviceArg<'_>]) -> MethodResult<()> {
        let method = args
            .iter()
            .find_map(AdviceArg::join_point)
            .map(|jp| jp.method_name().to_string())
            .unwrap_or_default();

        match name {
            "before" => record(format!("before {method}")),
            "after" => record(format!("after {method} ret={}", describe_return(&args[1]))),
            "afterThrowing" => {
                let error = args[1].error().map(|e| e.type_name().to_string()).unwrap_or_default();
                record(format!("afterThrowing {method} {error}"));
            }
            "audit" => {
                let first_unbound = matches!(args[0], AdviceArg::Unbound);
                record(format!("audit {method} unbound={first_unbound}"));
            }
            other => return Err(MethodError::new("NoSuchMethodException", other)),
        }
        Ok(())
    }
}

/// 问候接口
pub trait IHello: Send + Sync {
    fn say_hello(&self, name: &str) -> MethodResult<String>;
    fn divide(&self, dividend: u32, divisor: u32) -> MethodResult<u32>;
    fn fail_state(&self) -> MethodResult<()>;
}

/// 工具组件的公开方法
pub trait TestUtilOps: Send + Sync {
    fn test(&self) -> MethodResult<()>;
}

/// 没有接口的工具组件
#[derive(Debug, Default)]
pub struct TestUtil;

impl TestUtil {
    pub const TYPE_NAME: &'static str = "demo.TestUtil";
}

#[aop_proxy(root = "ioc_context")]
impl TestUtilOps for TestUtil {
    fn test(&self) -> MethodResult<()> {
        record("test");
        Ok(())
    }
}

impl Component for TestUtil {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_NAME)
            .tag(TAG_COMPONENT)
            .method(MethodSignature::public("()", "test"))
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new(Self::TYPE_NAME, self as Arc<dyn TestUtilOps>)
    }

    fn proxy(self: Arc<Self>, factory: &ProxyFactory) -> BeanRef {
        factory.bean(factory.proxy(self) as Arc<dyn TestUtilOps>)
    }
}

/// 实现了接口的服务组件
#[derive(Debug, Default)]
pub struct HelloService {
    pub test_util: Autowired<Arc<dyn TestUtilOps>>,
}

impl HelloService {
    pub const TYPE_NAME: &'static str = "demo.Hello.impl.HelloService";
    pub const INTERFACE: &'static str = "demo.Hello.IHello";
}

#[aop_proxy(root = "ioc_context")]
impl IHello for HelloService {
    fn say_hello(&self, name: &str) -> MethodResult<String> {
        let test_util = self
            .test_util
            .get()
            .ok_or_else(|| MethodError::new("IllegalStateException", "test_util 尚未注入"))?;
        test_util.test()?;
        record(format!("say_hello {name}"));
        Ok(format!("Hello {name}"))
    }

    fn divide(&self, dividend: u32, divisor: u32) -> MethodResult<u32> {
        record(format!("divide {dividend} {divisor}"));
        dividend
            .checked_div(divisor)
            .ok_or_else(|| MethodError::new("ArithmeticException", "/ by zero"))
    }

    fn fail_state(&self) -> MethodResult<()> {
        record("fail_state");
        Err(MethodError::new("IllegalStateException", "状态错误"))
    }
}

impl Component for HelloService {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_NAME)
            .implements(Self::INTERFACE)
            .tag(TAG_SERVICE)
            .method(MethodSignature::public("String", "say_hello").param("String"))
            .method(
                MethodSignature::public("u32", "divide")
                    .param("u32")
                    .param("u32")
                    .throws("ArithmeticException"),
            )
            .method(MethodSignature::public("()", "fail_state"))
            .inject(InjectionPoint::new("test_util", TestUtil::TYPE_NAME))
    }

    fn instantiate() -> Result<Self, BoxError> {
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

/// 按单个参数缩放
pub trait Scale: Send + Sync {
    fn scale(&self, value: u32) -> MethodResult<u32>;
    fn reciprocal(&self, value: u32) -> MethodResult<u32>;
}

/// 按给定系数缩放，与 [`Scale::scale`] 同名
pub trait ScaleBy: Send + Sync {
    fn scale(&self, value: u32, factor: u32) -> MethodResult<u32>;
}

/// 同时暴露两组同名方法
pub trait MeterOps: Scale + ScaleBy {}

impl<T: Scale + ScaleBy> MeterOps for T {}

/// 带有重载方法、抛出全限定异常名的组件
#[derive(Debug, Default)]
pub struct Meter;

impl Meter {
    pub const TYPE_NAME: &'static str = "demo.meter.Meter";
    pub const ARITHMETIC: &'static str = "java.lang.ArithmeticException";
}

#[aop_proxy(root = "ioc_context")]
impl Scale for Meter {
    fn scale(&self, value: u32) -> MethodResult<u32> {
        record(format!("scale {value}"));
        Ok(value * 10)
    }

    fn reciprocal(&self, value: u32) -> MethodResult<u32> {
        record(format!("reciprocal {value}"));
        100u32
            .checked_div(value)
            .ok_or_else(|| MethodError::new(Meter::ARITHMETIC, "/ by zero"))
    }
}

#[aop_proxy(root = "ioc_context")]
impl ScaleBy for Meter {
    fn scale(&self, value: u32, factor: u32) -> MethodResult<u32> {
        record(format!("scale {value} {factor}"));
        Ok(value * factor)
    }
}

impl Component for Meter {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::TYPE_NAME)
            .tag(TAG_COMPONENT)
            .method(MethodSignature::public("u32", "scale").param("u32"))
            .method(MethodSignature::public("u32", "scale").param("u32").param("u32"))
            .method(
                MethodSignature::public("u32", "reciprocal")
                    .param("u32")
                    .throws(Self::ARITHMETIC),
            )
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new(Self::TYPE_NAME, self as Arc<dyn MeterOps>)
    }

    fn proxy(self: Arc<Self>, factory: &ProxyFactory) -> BeanRef {
        factory.bean(factory.proxy(self) as Arc<dyn MeterOps>)
    }
}

/// 互相依赖的组件
#[derive(Debug, Default)]
pub struct Left {
    pub right: Autowired<Arc<Right>>,
}

/// 互相依赖的组件
#[derive(Debug, Default)]
pub struct Right {
    pub left: Autowired<Arc<Left>>,
}

impl Component for Left {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.cycle.Left")
            .tag(TAG_COMPONENT)
            .inject(InjectionPoint::new("right", "demo.cycle.Right"))
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()> {
        self.right.fill("demo.cycle.Left", point, dependency)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.cycle.Left", self)
    }
}

impl Component for Right {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.cycle.Right")
            .tag(TAG_COMPONENT)
            .inject(InjectionPoint::new("left", "demo.cycle.Left"))
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()> {
        self.left.fill("demo.cycle.Right", point, dependency)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.cycle.Right", self)
    }
}

/// 问候者
pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

/// 显式命名的问候者
#[derive(Debug, Default)]
pub struct EnglishGreeter;

/// 显式命名的问候者
#[derive(Debug, Default)]
pub struct FrenchGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

impl Greeter for FrenchGreeter {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

impl Component for EnglishGreeter {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.greeting.EnglishGreeter")
            .tag(TAG_COMPONENT)
            .named("englishGreeter")
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.greeting.EnglishGreeter", self as Arc<dyn Greeter>)
    }
}

impl Component for FrenchGreeter {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.greeting.FrenchGreeter")
            .tag(TAG_COMPONENT)
            .named("bonjour")
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.greeting.FrenchGreeter", self as Arc<dyn Greeter>)
    }
}

/// 通过显式名称注入问候者的组件
#[derive(Debug, Default)]
pub struct GreetingConsumer {
    pub greeter: Autowired<Arc<dyn Greeter>>,
}

impl Component for GreetingConsumer {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.greeting.GreetingConsumer")
            .tag(TAG_COMPONENT)
            .inject(InjectionPoint::new("greeter", "demo.greeting.Greeter").qualified("bonjour"))
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()> {
        self.greeter.fill("demo.greeting.GreetingConsumer", point, dependency)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.greeting.GreetingConsumer", self)
    }
}

/// 通过接口名注入服务的组件；默认名 `iHello` 不存在，回退为按类型查找
#[derive(Debug, Default)]
pub struct HelloClient {
    pub hello: Autowired<Arc<dyn IHello>>,
}

impl Component for HelloClient {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.client.HelloClient")
            .tag(TAG_COMPONENT)
            .inject(InjectionPoint::new("hello", HelloService::INTERFACE))
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()> {
        self.hello.fill("demo.client.HelloClient", point, dependency)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.client.HelloClient", self)
    }
}

/// 依赖一个不存在的显式名称
#[derive(Debug, Default)]
pub struct NeedsMissing {
    pub missing: Autowired<Arc<TestUtil>>,
}

impl Component for NeedsMissing {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.broken.NeedsMissing")
            .tag(TAG_COMPONENT)
            .inject(InjectionPoint::new("missing", TestUtil::TYPE_NAME).qualified("nobody"))
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn inject(&self, point: &InjectionPoint, dependency: &BeanRef) -> ContainerResult<()> {
        self.missing.fill("demo.broken.NeedsMissing", point, dependency)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.broken.NeedsMissing", self)
    }
}

/// 构造失败的组件
#[derive(Debug)]
pub struct Broken;

impl Component for Broken {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.broken.Broken").tag(TAG_COMPONENT)
    }

    fn instantiate() -> Result<Self, BoxError> {
        Err("连接池不可用".into())
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.broken.Broken", self)
    }
}

/// 已创建的 [`Counted`] 实例数
pub static COUNTED_INSTANCES: AtomicUsize = AtomicUsize::new(0);

/// 构造较慢、用于并发测试的延迟加载组件
#[derive(Debug)]
pub struct Counted;

impl Component for Counted {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new("demo.Counted").tag(TAG_COMPONENT).tag(TAG_LAZY)
    }

    fn instantiate() -> Result<Self, BoxError> {
        COUNTED_INSTANCES.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        Ok(Self)
    }

    fn expose(self: Arc<Self>) -> BeanRef {
        BeanRef::new("demo.Counted", self)
    }
}
