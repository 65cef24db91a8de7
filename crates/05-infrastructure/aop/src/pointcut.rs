//! 切点表达式
//!
//! 表达式形如 `public * demo.Hello.impl.HelloService.*(..)`：
//! 修饰符、返回类型、`类型.方法名`、参数列表。`*` 匹配任意字符，参数列表中的
//! `..` 匹配任意参数，其余字符按字面匹配。

use ioc_common::{ContainerError, ContainerResult, MethodSignature};
use regex::Regex;
use tracing::debug;

/// 编译后的切点
#[derive(Debug, Clone)]
pub struct Pointcut {
    expression: String,
    class_pattern: Regex,
    method_pattern: Regex,
}

impl Pointcut {
    /// 编译切点表达式
    pub fn compile(expression: &str) -> ContainerResult<Self> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ContainerError::invalid_aop_config("切点表达式为空"));
        }

        let invalid = |reason: &str| {
            ContainerError::invalid_aop_config(format!("切点表达式 `{expression}` 无效: {reason}"))
        };

        let open = expression.find('(').ok_or_else(|| invalid("缺少参数列表"))?;
        let close = expression.rfind(')').ok_or_else(|| invalid("参数列表未闭合"))?;
        if close < open {
            return Err(invalid("参数列表未闭合"));
        }
        if !expression[close + 1..].trim().is_empty() {
            return Err(invalid("参数列表之后不允许出现其他内容"));
        }

        let params = &expression[open + 1..close];
        if params.contains(['(', ')']) {
            return Err(invalid("参数列表中不允许嵌套括号"));
        }

        let mut head: Vec<&str> = expression[..open].split_whitespace().collect();
        let qualified_method = head.pop().ok_or_else(|| invalid("缺少方法名"))?;
        let (class_part, method_part) = qualified_method
            .rsplit_once('.')
            .ok_or_else(|| invalid("方法名之前缺少类型"))?;
        if class_part.is_empty() || method_part.is_empty() {
            return Err(invalid("类型或方法名为空"));
        }

        let class_regex = wildcard_to_regex(class_part);
        let prefix = match head.as_slice() {
            [] => r"(?:\S+ )*".to_string(),
            [return_type] => format!(r"(?:\S+ )*{} ", wildcard_to_regex(return_type)),
            tokens => {
                let literal: Vec<String> = tokens.iter().map(|t| wildcard_to_regex(t)).collect();
                format!("{} ", literal.join(" "))
            }
        };
        let method_regex = format!(
            r"^{prefix}{class_regex}\.{}\({}\)$",
            wildcard_to_regex(method_part),
            params_to_regex(params)
        );

        let class_pattern = Regex::new(&format!("^{class_regex}$"))
            .map_err(|e| invalid(&e.to_string()))?;
        let method_pattern = Regex::new(&method_regex).map_err(|e| invalid(&e.to_string()))?;

        debug!("切点编译完成: {} => {}", expression, method_regex);

        Ok(Self {
            expression: expression.to_string(),
            class_pattern,
            method_pattern,
        })
    }

    /// 原始表达式
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// 类型是否可能被代理
    pub fn class_matches(&self, type_descriptor: &str) -> bool {
        self.class_pattern.is_match(type_descriptor)
    }

    /// 方法签名文本是否匹配，尾部的 `throws` 子句不参与匹配
    pub fn method_matches(&self, signature: &str) -> bool {
        self.method_pattern.is_match(strip_throws(signature.trim()))
    }

    /// 方法签名是否匹配
    pub fn matches_method(&self, signature: &MethodSignature) -> bool {
        self.method_matches(&signature.to_string())
    }
}

fn strip_throws(signature: &str) -> &str {
    match signature.rfind(") throws ") {
        Some(index) => &signature[..=index],
        None => signature,
    }
}

fn wildcard_to_regex(token: &str) -> String {
    token
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}

fn params_to_regex(params: &str) -> String {
    let params = params.trim();
    if params.is_empty() {
        return String::new();
    }
    params
        .split(',')
        .map(|param| match param.trim() {
            ".." => ".*".to_string(),
            other => wildcard_to_regex(other),
        })
        .collect::<Vec<_>>()
        .join(",")
}
