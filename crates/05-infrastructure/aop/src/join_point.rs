//! 连接点

use ioc_common::{Argument, MethodSignature};
use std::any::Any;
use std::fmt;

/// 一次方法调用的连接点
///
/// 每次调用新建，调用结束即丢弃。
#[derive(Clone, Copy)]
pub struct JoinPoint<'a> {
    proxy: &'a (dyn Any + Send + Sync),
    target: &'a (dyn Any + Send + Sync),
    method: &'a MethodSignature,
    args: &'a [Argument],
    declaring_type: &'a str,
}

impl<'a> JoinPoint<'a> {
    /// 创建连接点
    pub fn new(
        proxy: &'a (dyn Any + Send + Sync),
        target: &'a (dyn Any + Send + Sync),
        method: &'a MethodSignature,
        args: &'a [Argument],
        declaring_type: &'a str,
    ) -> Self {
        Self {
            proxy,
            target,
            method,
            args,
            declaring_type,
        }
    }

    /// 代理对象
    pub fn proxy(&self) -> &'a (dyn Any + Send + Sync) {
        self.proxy
    }

    /// 目标对象
    pub fn target(&self) -> &'a (dyn Any + Send + Sync) {
        self.target
    }

    /// 按具体类型读取目标对象
    pub fn target_as<T: Any>(&self) -> Option<&'a T> {
        self.target.downcast_ref::<T>()
    }

    /// 方法签名
    pub fn method(&self) -> &'a MethodSignature {
        self.method
    }

    /// 方法名
    pub fn method_name(&self) -> &'a str {
        &self.method.name
    }

    /// 调用参数
    pub fn args(&self) -> &'a [Argument] {
        self.args
    }

    /// 按位置和类型读取参数
    pub fn arg<T: Any>(&self, index: usize) -> Option<&'a T> {
        self.args.get(index).and_then(Argument::value::<T>)
    }

    /// 声明类型（全限定名）
    pub fn declaring_type(&self) -> &'a str {
        self.declaring_type
    }
}

/// 文本形式：`demo.Hello.say_hello("world")`
impl fmt::Display for JoinPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.declaring_type, self.method.name)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for JoinPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinPoint")
            .field("method", &self.method.to_string())
            .field("args", &self.args)
            .field("declaring_type", &self.declaring_type)
            .finish()
    }
}
