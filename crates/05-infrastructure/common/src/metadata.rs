//! 元数据定义
//!
//! 组件类型、方法签名和注入点的静态描述。容器只依赖这些元数据，
//! 不做任何运行时反射。

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件标记：通用组件
pub const TAG_COMPONENT: &str = "component";
/// 组件标记：服务
pub const TAG_SERVICE: &str = "service";
/// 组件标记：控制器
pub const TAG_CONTROLLER: &str = "controller";
/// 组件标记：仓储
pub const TAG_REPOSITORY: &str = "repository";
/// 组件标记：延迟加载
pub const TAG_LAZY: &str = "lazy";

/// 可被容器管理的组件标记
pub const COMPONENT_TAGS: [&str; 4] = [TAG_COMPONENT, TAG_SERVICE, TAG_CONTROLLER, TAG_REPOSITORY];

/// 类型描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// 全限定类型名
    pub qualified_name: String,
    /// 声明实现的接口（全限定名）
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// 标记
    #[serde(default)]
    pub marker_tags: Vec<String>,
    /// 公开方法
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
    /// 注入点
    #[serde(default)]
    pub injection_points: Vec<InjectionPoint>,
    /// 显式 Bean 名称
    #[serde(default)]
    pub bean_name: Option<String>,
}

impl TypeDescriptor {
    /// 创建新的类型描述符
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            interfaces: Vec::new(),
            marker_tags: Vec::new(),
            methods: Vec::new(),
            injection_points: Vec::new(),
            bean_name: None,
        }
    }

    /// 声明实现的接口
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 添加标记
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.marker_tags.push(tag.into());
        self
    }

    /// 添加公开方法，声明类型自动设为当前类型
    pub fn method(mut self, mut signature: MethodSignature) -> Self {
        signature.declaring_type = self.qualified_name.clone();
        self.methods.push(signature);
        self
    }

    /// 添加注入点
    pub fn inject(mut self, point: InjectionPoint) -> Self {
        self.injection_points.push(point);
        self
    }

    /// 设置显式 Bean 名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.bean_name = Some(name.into());
        self
    }

    /// 简短的类型名称（不包含包路径）
    pub fn simple_name(&self) -> &str {
        naming::simple_name(&self.qualified_name)
    }

    /// Bean 名称：显式名称优先，否则为首字母小写的简短类型名
    pub fn bean_name(&self) -> String {
        match self.bean_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => naming::default_bean_name(&self.qualified_name),
        }
    }

    /// 是否带有指定标记
    pub fn has_tag(&self, tag: &str) -> bool {
        self.marker_tags.iter().any(|t| t == tag)
    }

    /// 是否为可被容器管理的组件
    pub fn is_component(&self) -> bool {
        COMPONENT_TAGS.iter().any(|tag| self.has_tag(tag))
    }

    /// 是否延迟加载
    pub fn is_lazy(&self) -> bool {
        self.has_tag(TAG_LAZY)
    }

    /// 按名称查找第一个方法
    pub fn find_method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// 按名称和参数类型查找方法
    ///
    /// 参数类型按 [`naming::normalize_type_name`] 比较。没有完全一致的签名时，
    /// 若同名同参数个数的方法只有一个，则取这一个。
    pub fn find_overload(&self, name: &str, parameter_types: &[&str]) -> Option<&MethodSignature> {
        let mut same_arity = self
            .methods
            .iter()
            .filter(|m| m.name == name && m.parameter_types.len() == parameter_types.len());

        if let Some(exact) = same_arity.clone().find(|m| m.accepts(parameter_types)) {
            return Some(exact);
        }
        match (same_arity.next(), same_arity.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

/// 方法签名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    /// 可见性
    #[serde(default = "default_visibility")]
    pub visibility: String,
    /// 返回类型
    pub return_type: String,
    /// 声明类型（全限定名）
    #[serde(default)]
    pub declaring_type: String,
    /// 方法名
    pub name: String,
    /// 参数类型
    #[serde(default)]
    pub parameter_types: Vec<String>,
    /// 声明抛出的异常类型
    #[serde(default)]
    pub throws: Vec<String>,
}

fn default_visibility() -> String {
    "public".to_string()
}

impl MethodSignature {
    /// 创建公开方法签名
    pub fn public(return_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            visibility: default_visibility(),
            return_type: return_type.into(),
            declaring_type: String::new(),
            name: name.into(),
            parameter_types: Vec::new(),
            throws: Vec::new(),
        }
    }

    /// 添加参数类型
    pub fn param(mut self, parameter_type: impl Into<String>) -> Self {
        self.parameter_types.push(parameter_type.into());
        self
    }

    /// 添加声明抛出的异常
    pub fn throws(mut self, error_type: impl Into<String>) -> Self {
        self.throws.push(error_type.into());
        self
    }

    /// 方法标识：`声明类型.方法名(参数类型)`，区分同名重载
    pub fn identity(&self) -> String {
        format!(
            "{}.{}({})",
            self.declaring_type,
            self.name,
            self.parameter_types.join(",")
        )
    }

    /// 参数类型是否与给定的类型列表一致
    pub fn accepts(&self, parameter_types: &[&str]) -> bool {
        self.parameter_types.len() == parameter_types.len()
            && self
                .parameter_types
                .iter()
                .zip(parameter_types)
                .all(|(declared, actual)| {
                    naming::normalize_type_name(declared) == naming::normalize_type_name(actual)
                })
    }
}

/// 文本形式：`public String demo.Hello.say_hello(String,u32) throws demo.Error`
impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}.{}({})",
            self.visibility,
            self.return_type,
            self.declaring_type,
            self.name,
            self.parameter_types.join(",")
        )?;
        if !self.throws.is_empty() {
            write!(f, " throws {}", self.throws.join(","))?;
        }
        Ok(())
    }
}

/// 注入点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionPoint {
    /// 字段名称
    pub field: String,
    /// 字段声明类型（全限定名）
    pub declared_type: String,
    /// 显式依赖名称
    #[serde(default)]
    pub qualifier: Option<String>,
}

impl InjectionPoint {
    /// 创建按类型推导名称的注入点
    pub fn new(field: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            declared_type: declared_type.into(),
            qualifier: None,
        }
    }

    /// 指定显式依赖名称
    pub fn qualified(mut self, name: impl Into<String>) -> Self {
        self.qualifier = Some(name.into());
        self
    }

    /// 显式依赖名称（空白视为未设置）
    pub fn explicit_name(&self) -> Option<&str> {
        self.qualifier
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// 依赖名称：显式名称原样使用，否则由声明类型推导
    pub fn dependency_name(&self) -> String {
        match self.explicit_name() {
            Some(name) => name.to_string(),
            None => naming::default_bean_name(&self.declared_type),
        }
    }
}
