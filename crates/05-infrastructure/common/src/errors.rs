//! 错误类型定义

use thiserror::Error;

/// 装箱的通用错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {location}, 原因: {message}")]
    ParseError { location: String, message: String },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse_error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// 容器错误类型
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Bean 定义重复: {name}")]
    DuplicateDefinition { name: String },

    #[error("Bean 不存在: {name}")]
    NotFound { name: String },

    #[error("Bean 实例化失败: {type_name}, 原因: {source}")]
    Instantiation { type_name: String, source: BoxError },

    #[error("依赖解析失败: {bean}.{field} -> {dependency}, 原因: {source}")]
    DependencyResolution {
        bean: String,
        field: String,
        dependency: String,
        source: Box<ContainerError>,
    },

    #[error("依赖注入失败: {bean}.{field}, 原因: {message}")]
    InjectionFailed {
        bean: String,
        field: String,
        message: String,
    },

    #[error("AOP 配置无效: {message}")]
    InvalidAopConfig { message: String },

    #[error("Bean 类型不匹配: {name}, 期望 {expected}, 实际 {actual}")]
    BeanNotOfRequiredType {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

impl ContainerError {
    /// 创建 Bean 不存在错误
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// 创建 AOP 配置错误
    pub fn invalid_aop_config(message: impl Into<String>) -> Self {
        Self::InvalidAopConfig {
            message: message.into(),
        }
    }

    /// 创建注入失败错误
    pub fn injection_failed(
        bean: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InjectionFailed {
            bean: bean.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// 是否为 Bean 不存在错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// 受管方法抛出的错误
///
/// `type_name` 是异常类型名，异常通知的过滤条件按它做精确匹配。
#[derive(Error, Debug)]
#[error("{type_name}: {message}")]
pub struct MethodError {
    type_name: String,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl MethodError {
    /// 创建方法错误
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// 附加底层错误
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 异常类型名
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 错误消息
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 异常类型名是否与给定名称完全一致
    pub fn is(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }
}

impl From<ContainerError> for MethodError {
    fn from(error: ContainerError) -> Self {
        Self::new("ContainerError", error.to_string()).with_source(error)
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
pub type MethodResult<T> = Result<T, MethodError>;
