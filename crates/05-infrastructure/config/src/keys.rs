//! 约定的配置键

/// 组件扫描根包
pub const SCAN_PACKAGE: &str = "scanPackage";
/// 切点表达式
pub const AOP_POINT_CUT: &str = "aop.pointCut";
/// 切面类型
pub const AOP_ASPECT_CLASS: &str = "aop.aspectClass";
/// 前置通知方法名
pub const AOP_ASPECT_BEFORE: &str = "aop.aspectBefore";
/// 返回通知方法名
pub const AOP_ASPECT_AFTER: &str = "aop.aspectAfter";
/// 异常通知方法名
pub const AOP_ASPECT_AFTER_THROW: &str = "aop.aspectAfterThrow";
/// 异常通知过滤的异常类型名
pub const AOP_ASPECT_AFTER_THROW_NAME: &str = "aop.aspectAfterThrowName";
