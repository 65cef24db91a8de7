use ioc_aop::{
    AdviceArg, AdviceParam, AdvisedSupport, AopConfig, Aspect, AspectClass, AspectDescriptor, MethodError,
    MethodResult, ProxyFactory,
};
use ioc_common::{BoxError, MethodSignature, TypeDescriptor};
use ioc_macros::aop_proxy;
use std::sync::Arc;
use std::sync::Mutex;

static ADVISED: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct TraceAspect;

impl Aspect for TraceAspect {
    fn descriptor() -> AspectDescriptor {
        AspectDescriptor::new("demo.TraceAspect").advice("before", [AdviceParam::JoinPoint])
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn invoke_advice(&self, _name: &str, args: &[AdviceArg<'_>]) -> MethodResult<()> {
        if let Some(join_point) = args.first().and_then(AdviceArg::join_point) {
            ADVISED.lock().unwrap().push(join_point.to_string());
        }
        Ok(())
    }
}

trait Scale: Send + Sync {
    const UNIT: u32;

    fn scale(&self, value: u32) -> Result<u32, MethodError>;
}

trait ScaleBy: Send + Sync {
    fn scale(&self, value: u32, factor: u32) -> MethodResult<u32>;
}

struct Meter;

#[aop_proxy(root = "ioc_aop")]
impl Scale for Meter {
    const UNIT: u32 = 10;

    fn scale(&self, value: u32) -> Result<u32, MethodError> {
        Ok(value * Self::UNIT)
    }
}

#[aop_proxy(root = "ioc_aop")]
impl ScaleBy for Meter {
    fn scale(&self, value: u32, factor: u32) -> MethodResult<u32> {
        Ok(value * factor)
    }
}

fn main() {
    let config = AopConfig::new("public u32 demo.Meter.scale(u32)", "demo.TraceAspect").before("before");
    let support = AdvisedSupport::new(config, &AspectClass::of::<TraceAspect>()).unwrap();
    let descriptor = TypeDescriptor::new("demo.Meter")
        .method(MethodSignature::public("u32", "scale").param("u32"))
        .method(MethodSignature::public("u32", "scale").param("u32").param("u32"));
    let factory = ProxyFactory::new(Arc::new(support), Arc::new(descriptor));
    let proxy = factory.proxy(Arc::new(Meter));

    assert_eq!(ScaleBy::scale(proxy.as_ref(), 2, 3).unwrap(), 6);
    assert!(ADVISED.lock().unwrap().is_empty());

    assert_eq!(Scale::scale(proxy.as_ref(), 2).unwrap(), 20);
    assert_eq!(ADVISED.lock().unwrap().len(), 1);
}
