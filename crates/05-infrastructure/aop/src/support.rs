//! 切面支持
//!
//! 每个容器持有一份 [`AdvisedSupport`]：编译好的切点、唯一的切面实例，
//! 以及按 (类型, 方法) 缓存的拦截器链。

use crate::advice::{AdviceInterceptor, AdviceKind, InterceptorChain};
use crate::aspect::{AspectClass, Aspect};
use crate::config::AopConfig;
use crate::pointcut::Pointcut;
use dashmap::DashMap;
use ioc_common::{ContainerError, ContainerResult, MethodSignature, TypeDescriptor};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 切面支持
pub struct AdvisedSupport {
    config: AopConfig,
    pointcut: Pointcut,
    aspect_class: AspectClass,
    aspect: Arc<dyn Aspect>,
    chains: DashMap<String, Arc<InterceptorChain>>,
}

impl AdvisedSupport {
    /// 校验配置并创建切面支持
    ///
    /// 切面类型与配置不一致、切点无法编译或者通知方法不存在时返回
    /// [`ContainerError::InvalidAopConfig`]。
    pub fn new(config: AopConfig, aspect_class: &AspectClass) -> ContainerResult<Self> {
        if aspect_class.qualified_name() != config.aspect_class {
            return Err(ContainerError::invalid_aop_config(format!(
                "切面类型 {} 与配置的 {} 不一致",
                aspect_class.qualified_name(),
                config.aspect_class
            )));
        }

        let pointcut = Pointcut::compile(&config.point_cut)?;

        for name in config.advice_names() {
            if aspect_class.descriptor().find_advice(name).is_none() {
                return Err(ContainerError::invalid_aop_config(format!(
                    "切面 {} 中不存在通知方法 {}",
                    config.aspect_class, name
                )));
            }
        }

        let aspect = aspect_class.instantiate()?;

        info!(
            "AOP 已启用: 切点 {}, 切面 {}",
            pointcut.expression(),
            config.aspect_class
        );

        Ok(Self {
            config,
            pointcut,
            aspect_class: aspect_class.clone(),
            aspect,
            chains: DashMap::new(),
        })
    }

    /// 生效的切面配置
    pub fn config(&self) -> &AopConfig {
        &self.config
    }

    /// 编译后的切点
    pub fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    /// 类型是否需要代理
    pub fn class_matches(&self, descriptor: &TypeDescriptor) -> bool {
        self.pointcut.class_matches(&descriptor.qualified_name)
    }

    /// 取得方法的拦截器链，首次访问时构建并缓存
    ///
    /// 缓存键为 [`MethodSignature::identity`]，同名重载互不共享。
    pub fn chain_for(&self, method: &MethodSignature) -> Arc<InterceptorChain> {
        let key = method.identity();
        if let Some(chain) = self.chains.get(&key) {
            return chain.clone();
        }

        self.chains
            .entry(key)
            .or_insert_with(|| Arc::new(self.build_chain(method)))
            .clone()
    }

    /// 已缓存的拦截器链数量
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    fn build_chain(&self, method: &MethodSignature) -> InterceptorChain {
        let mut chain = InterceptorChain::new(method.clone());
        if !self.pointcut.matches_method(method) {
            debug!("方法 {} 不匹配切点，不织入通知", method);
            return chain;
        }

        let configured = [
            (AdviceKind::Before, &self.config.aspect_before),
            (AdviceKind::AfterReturning, &self.config.aspect_after),
            (AdviceKind::AfterThrowing, &self.config.aspect_after_throw),
        ];
        for (kind, name) in configured {
            let Some(advice) = name
                .as_deref()
                .and_then(|name| self.aspect_class.descriptor().find_advice(name))
            else {
                continue;
            };

            let mut interceptor = AdviceInterceptor::new(kind, advice.clone(), self.aspect.clone());
            if kind == AdviceKind::AfterThrowing {
                interceptor = interceptor.with_throw_filter(self.config.aspect_after_throw_name.clone());
            }
            chain.push(interceptor);
        }

        debug!("拦截器链构建完成: {}, 共 {} 个通知", method, chain.len());
        chain
    }
}

impl fmt::Debug for AdvisedSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisedSupport")
            .field("pointcut", &self.pointcut.expression())
            .field("aspect", &self.aspect_class.qualified_name())
            .field("chains", &self.chains.len())
            .finish()
    }
}
