use ioc_aop::{
    AdviceArg, AdviceParam, AdvisedSupport, AopConfig, Aspect, AspectClass, AspectDescriptor, MethodResult,
    ProxyFactory,
};
use ioc_common::{BoxError, MethodSignature, TypeDescriptor};
use ioc_macros::aop_proxy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static BEFORE_CALLS: AtomicUsize = AtomicUsize::new(0);

struct CountingAspect;

impl Aspect for CountingAspect {
    fn descriptor() -> AspectDescriptor {
        AspectDescriptor::new("demo.CountingAspect").advice("before", [AdviceParam::JoinPoint])
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn invoke_advice(&self, _name: &str, _args: &[AdviceArg<'_>]) -> MethodResult<()> {
        BEFORE_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

trait Greeter: Send + Sync {
    fn greet(&self, name: &str, times: u32) -> MethodResult<String>;
}

struct Hello;

// 默认引用 ioc_aop
#[aop_proxy]
impl Greeter for Hello {
    fn greet(&self, name: &str, times: u32) -> MethodResult<String> {
        Ok(name.repeat(times as usize))
    }
}

fn main() {
    let config = AopConfig::new("public * demo.Hello.greet(String,u32)", "demo.CountingAspect").before("before");
    let support = AdvisedSupport::new(config, &AspectClass::of::<CountingAspect>()).unwrap();
    let descriptor = TypeDescriptor::new("demo.Hello")
        .method(MethodSignature::public("String", "greet").param("String").param("u32"));
    let factory = ProxyFactory::new(Arc::new(support), Arc::new(descriptor));

    let plain: &dyn Greeter = &Hello;
    assert_eq!(plain.greet("ab", 2).unwrap(), "abab");
    assert_eq!(BEFORE_CALLS.load(Ordering::SeqCst), 0);

    let proxy: Arc<dyn Greeter> = factory.proxy(Arc::new(Hello));
    assert_eq!(proxy.greet("ab", 2).unwrap(), "abab");
    assert_eq!(BEFORE_CALLS.load(Ordering::SeqCst), 1);
}
