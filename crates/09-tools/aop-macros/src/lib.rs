//! # IoC Macros
//!
//! 这个 crate 提供了生成 AOP 代理实现的过程宏。
//!
//! ## 核心宏
//!
//! - [`aop_proxy`] - 为 `AopProxy<Type>` 生成与 `impl Trait for Type` 相同的 trait 实现
//!
//! ## 使用示例
//!
//! ```ignore
//! use ioc_macros::aop_proxy;
//!
//! pub trait HelloApi: Send + Sync {
//!     fn say_hello(&self, name: &str) -> MethodResult<String>;
//! }
//!
//! #[aop_proxy]
//! impl HelloApi for HelloService {
//!     fn say_hello(&self, name: &str) -> MethodResult<String> {
//!         Ok(format!("hello {name}"))
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod proxy;

// Re-exports are not allowed in proc-macro crates

/// AOP 代理生成宏
///
/// 原样保留 `impl Trait for Type`，并额外生成 `impl Trait for AopProxy<Type>`，
/// 其中每个方法都复制参数后交给 `AopProxy::invoke`，并附带参数类型的源码写法，
/// 用于在同名重载中选中对应的方法签名。
///
/// # 参数
///
/// - `root = "ioc_context"` - 生成代码引用 `AopProxy` 和 `Argument` 的 crate（默认 `ioc_aop`）
///
/// # 要求
///
/// - 方法接收 `&self`，返回 `MethodResult<_>` 或 `Result<_, MethodError>`
/// - 引用参数通过 `ToOwned` 复制，其余参数通过 `Clone` 复制；复制结果需要实现 `Debug`
#[proc_macro_attribute]
pub fn aop_proxy(args: TokenStream, input: TokenStream) -> TokenStream {
    proxy::aop_proxy_impl(args, input)
}
