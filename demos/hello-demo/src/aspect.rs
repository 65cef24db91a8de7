//! 日志切面

use ioc_aop::{AdviceArg, AdviceParam, Aspect, AspectDescriptor};
use ioc_common::{BoxError, MethodError, MethodResult};
use tracing::{info, warn};

/// 日志切面：记录调用前后和异常
#[derive(Debug, Default)]
pub struct LogAspect;

impl Aspect for LogAspect {
    fn descriptor() -> AspectDescriptor {
        AspectDescriptor::new("demo.aspect.LogAspect")
            .advice("before", [AdviceParam::JoinPoint])
            .advice("after", [AdviceParam::JoinPoint, AdviceParam::ReturnValue])
            .advice("afterThrowing", [AdviceParam::JoinPoint, AdviceParam::Error])
    }

    fn instantiate() -> Result<Self, BoxError> {
        Ok(Self)
    }

    fn invoke_advice(&self, name: &str, args: &[AdviceArg<'_>]) -> MethodResult<()> {
        let join_point = args.first().and_then(AdviceArg::join_point);
        let target = join_point.map(|jp| jp.to_string()).unwrap_or_default();

        match name {
            "before" => info!("前置通知: {}", target),
            "after" => {
                let returned = args
                    .get(1)
                    .and_then(|arg| arg.return_value::<String>())
                    .cloned()
                    .unwrap_or_else(|| "-".to_string());
                info!("后置通知: {} => {}", target, returned);
            }
            "afterThrowing" => {
                if let Some(error) = args.get(1).and_then(AdviceArg::error) {
                    warn!("出现异常: {}, Throws: {}", target, error.message());
                }
            }
            other => {
                return Err(MethodError::new(
                    "NoSuchMethodException",
                    format!("LogAspect 没有通知方法 {other}"),
                ))
            }
        }
        Ok(())
    }
}
