//! 切面集成测试：通知顺序、异常过滤、代理策略和拦截器链缓存

mod common;

use common::*;
use ioc_common::{ContainerError, ProxyKind};
use ioc_config::{keys, ApplicationProperties};
use ioc_context::{ApplicationContext, ApplicationContextBuilder};
use std::sync::Arc;

const HELLO_POINT_CUT: &str = "public * demo.Hello.impl.HelloService.*(..)";

async fn context_with(properties: ApplicationProperties) -> Arc<ApplicationContext> {
    ApplicationContextBuilder::new()
        .component::<HelloService>()
        .component::<TestUtil>()
        .aspect::<RecordingAspect>()
        .add_properties(properties)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_before_body_after_order() {
    init_test_logger();
    let context = context_with(aop_properties(HELLO_POINT_CUT)).await;
    take_events();

    let hello: Arc<dyn IHello> = context.get_bean_as("helloService").unwrap();
    assert_eq!(hello.say_hello("World").unwrap(), "Hello World");

    assert_eq!(
        take_events(),
        vec![
            "before say_hello",
            "test",
            "say_hello World",
            "after say_hello ret=Hello World",
        ]
    );
}

#[tokio::test]
async fn test_after_throwing_respects_filter() {
    init_test_logger();
    let context = context_with(aop_properties(HELLO_POINT_CUT)).await;
    let hello: Arc<dyn IHello> = context.get_bean_as("helloService").unwrap();
    take_events();

    let err = hello.divide(1, 0).unwrap_err();
    assert!(err.is("ArithmeticException"));
    assert_eq!(
        take_events(),
        vec!["before divide", "divide 1 0", "afterThrowing divide ArithmeticException"]
    );

    // 不匹配过滤条件的异常不触发异常通知，但仍然返回给调用方
    let err = hello.fail_state().unwrap_err();
    assert!(err.is("IllegalStateException"));
    assert_eq!(take_events(), vec!["before fail_state", "fail_state"]);
}

#[tokio::test]
async fn test_after_throwing_without_filter_sees_every_error() {
    init_test_logger();
    let mut properties = aop_properties(HELLO_POINT_CUT);
    properties.insert(keys::AOP_ASPECT_AFTER_THROW_NAME, "");
    let context = context_with(properties).await;
    let hello: Arc<dyn IHello> = context.get_bean_as("helloService").unwrap();
    take_events();

    assert!(hello.fail_state().is_err());
    assert_eq!(
        take_events(),
        vec!["before fail_state", "fail_state", "afterThrowing fail_state IllegalStateException"]
    );
}

#[tokio::test]
async fn test_proxy_kind_follows_interfaces() {
    init_test_logger();
    let context = context_with(aop_properties("public * demo.*.*(..)")).await;

    assert_eq!(context.proxy_kind("helloService").unwrap(), Some(ProxyKind::Interface));
    assert_eq!(context.proxy_kind("testUtil").unwrap(), Some(ProxyKind::Subclass));
    assert_eq!(context.stats().proxies, 2);

    // 被注入的工具组件同样经过代理
    let hello: Arc<dyn IHello> = context.get_bean_as("helloService").unwrap();
    take_events();
    hello.say_hello("Rust").unwrap();
    assert_eq!(
        take_events(),
        vec![
            "before say_hello",
            "before test",
            "test",
            "after test ret=()",
            "say_hello Rust",
            "after say_hello ret=Hello Rust",
        ]
    );
}

#[tokio::test]
async fn test_unmatched_class_is_not_proxied() {
    init_test_logger();
    let context = context_with(aop_properties(HELLO_POINT_CUT)).await;

    assert_eq!(context.proxy_kind("helloService").unwrap(), Some(ProxyKind::Interface));
    assert_eq!(context.proxy_kind("testUtil").unwrap(), None);
    assert_eq!(context.stats().proxies, 1);
}

#[tokio::test]
async fn test_unmatched_method_calls_target_directly() {
    init_test_logger();
    let context =
        context_with(aop_properties("public String demo.Hello.impl.HelloService.say_hello(..)")).await;
    let hello: Arc<dyn IHello> = context.get_bean_as("helloService").unwrap();
    take_events();

    assert_eq!(hello.divide(4, 2).unwrap(), 2);
    assert_eq!(take_events(), vec!["divide 4 2"]);

    hello.say_hello("A").unwrap();
    assert_eq!(take_events().first().map(String::as_str), Some("before say_hello"));
}

#[tokio::test]
async fn test_chains_are_cached_per_method() {
    init_test_logger();
    let context = context_with(aop_properties(HELLO_POINT_CUT)).await;
    let hello: Arc<dyn IHello> = context.get_bean_as("helloService").unwrap();
    assert_eq!(context.stats().cached_chains, 0);

    hello.say_hello("a").unwrap();
    hello.say_hello("b").unwrap();
    assert_eq!(context.stats().cached_chains, 1);

    hello.divide(6, 3).unwrap();
    assert_eq!(context.stats().cached_chains, 2);
    take_events();
}

#[tokio::test]
async fn test_unbound_advice_params() {
    init_test_logger();
    let mut properties = aop_properties(HELLO_POINT_CUT);
    properties.insert(keys::AOP_ASPECT_BEFORE, "audit");
    let context = context_with(properties).await;
    let hello: Arc<dyn IHello> = context.get_bean_as("helloService").unwrap();
    take_events();

    hello.divide(9, 3).unwrap();
    assert_eq!(
        take_events(),
        vec!["audit divide unbound=true", "divide 9 3", "after divide ret=3"]
    );
}

#[tokio::test]
async fn test_unknown_advice_name_fails_startup() {
    init_test_logger();
    let mut properties = aop_properties(HELLO_POINT_CUT);
    properties.insert(keys::AOP_ASPECT_AFTER, "missing");

    let err = ApplicationContextBuilder::new()
        .component::<HelloService>()
        .component::<TestUtil>()
        .aspect::<RecordingAspect>()
        .add_properties(properties)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, ContainerError::InvalidAopConfig { .. }));
}

#[tokio::test]
async fn test_malformed_point_cut_fails_startup() {
    init_test_logger();

    let err = ApplicationContextBuilder::new()
        .component::<HelloService>()
        .component::<TestUtil>()
        .aspect::<RecordingAspect>()
        .add_properties(aop_properties("public * demo.Hello.impl.HelloService.*"))
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, ContainerError::InvalidAopConfig { .. }));
}

#[tokio::test]
async fn test_advised_support_exposes_config() {
    init_test_logger();
    let context = context_with(aop_properties("public * demo.*.*(..)")).await;

    let advised = context.advised_support().unwrap();
    assert_eq!(advised.config().aspect_class, RecordingAspect::TYPE_NAME);
    assert_eq!(advised.pointcut().expression(), "public * demo.*.*(..)");
    take_events();
}

async fn meter_context(properties: ApplicationProperties) -> Arc<ApplicationContext> {
    ApplicationContextBuilder::new()
        .component::<Meter>()
        .aspect::<RecordingAspect>()
        .add_properties(properties)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_overloads_are_advised_per_signature() {
    init_test_logger();
    let context = meter_context(aop_properties("public u32 demo.meter.Meter.scale(u32)")).await;
    let meter: Arc<dyn MeterOps> = context.get_bean_as("meter").unwrap();
    take_events();

    // 同名但参数不同的方法不匹配切点
    assert_eq!(ScaleBy::scale(meter.as_ref(), 2, 3).unwrap(), 6);
    assert_eq!(take_events(), vec!["scale 2 3"]);

    assert_eq!(Scale::scale(meter.as_ref(), 2).unwrap(), 20);
    assert_eq!(take_events(), vec!["before scale", "scale 2", "after scale ret=20"]);
    assert_eq!(context.stats().cached_chains, 2);
}

#[tokio::test]
async fn test_qualified_exception_filter_matches_exactly() {
    init_test_logger();
    let mut properties = aop_properties("public * demo.meter.Meter.*(..)");
    properties.insert(keys::AOP_ASPECT_AFTER_THROW_NAME, "java.lang.ArithmeticException");
    let context = meter_context(properties).await;
    let meter: Arc<dyn MeterOps> = context.get_bean_as("meter").unwrap();
    take_events();

    let err = meter.reciprocal(0).unwrap_err();
    assert!(err.is("java.lang.ArithmeticException"));
    assert_eq!(
        take_events(),
        vec![
            "before reciprocal",
            "reciprocal 0",
            "afterThrowing reciprocal java.lang.ArithmeticException",
        ]
    );
}

#[tokio::test]
async fn test_simple_name_filter_ignores_qualified_exception() {
    init_test_logger();
    let context = meter_context(aop_properties("public * demo.meter.Meter.*(..)")).await;
    let meter: Arc<dyn MeterOps> = context.get_bean_as("meter").unwrap();
    take_events();

    // 过滤条件 `ArithmeticException` 与 `java.lang.ArithmeticException` 不相等
    let err = meter.reciprocal(0).unwrap_err();
    assert!(err.is(Meter::ARITHMETIC));
    assert_eq!(take_events(), vec!["before reciprocal", "reciprocal 0"]);
}
