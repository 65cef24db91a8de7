//! 切面配置

use ioc_config::{keys, ApplicationProperties};

/// 切面配置
///
/// 一个容器只有一份生效的切面配置。通知方法名为空视为未配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AopConfig {
    /// 切点表达式
    pub point_cut: String,
    /// 切面类型（全限定名）
    pub aspect_class: String,
    /// 前置通知方法名
    pub aspect_before: Option<String>,
    /// 返回通知方法名
    pub aspect_after: Option<String>,
    /// 异常通知方法名
    pub aspect_after_throw: Option<String>,
    /// 异常通知只处理的异常类型名
    pub aspect_after_throw_name: Option<String>,
}

impl AopConfig {
    /// 创建新的切面配置
    pub fn new(point_cut: impl Into<String>, aspect_class: impl Into<String>) -> Self {
        Self {
            point_cut: point_cut.into(),
            aspect_class: aspect_class.into(),
            aspect_before: None,
            aspect_after: None,
            aspect_after_throw: None,
            aspect_after_throw_name: None,
        }
    }

    /// 设置前置通知
    pub fn before(mut self, method: impl Into<String>) -> Self {
        self.aspect_before = non_blank(method.into());
        self
    }

    /// 设置返回通知
    pub fn after(mut self, method: impl Into<String>) -> Self {
        self.aspect_after = non_blank(method.into());
        self
    }

    /// 设置异常通知
    pub fn after_throwing(mut self, method: impl Into<String>) -> Self {
        self.aspect_after_throw = non_blank(method.into());
        self
    }

    /// 设置异常通知过滤的异常类型名
    pub fn after_throwing_name(mut self, type_name: impl Into<String>) -> Self {
        self.aspect_after_throw_name = non_blank(type_name.into());
        self
    }

    /// 从应用配置读取
    ///
    /// 缺少切点表达式或切面类型时返回 `None`，表示不启用 AOP。
    pub fn from_properties(properties: &ApplicationProperties) -> Option<Self> {
        let point_cut = properties.get_non_blank(keys::AOP_POINT_CUT)?;
        let aspect_class = properties.get_non_blank(keys::AOP_ASPECT_CLASS)?;

        let owned = |key: &str| properties.get_non_blank(key).map(|v| v.trim().to_string());

        Some(Self {
            point_cut: point_cut.trim().to_string(),
            aspect_class: aspect_class.trim().to_string(),
            aspect_before: owned(keys::AOP_ASPECT_BEFORE),
            aspect_after: owned(keys::AOP_ASPECT_AFTER),
            aspect_after_throw: owned(keys::AOP_ASPECT_AFTER_THROW),
            aspect_after_throw_name: owned(keys::AOP_ASPECT_AFTER_THROW_NAME),
        })
    }

    /// 配置中出现的全部通知方法名
    pub fn advice_names(&self) -> impl Iterator<Item = &str> {
        [&self.aspect_before, &self.aspect_after, &self.aspect_after_throw]
            .into_iter()
            .filter_map(|name| name.as_deref())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
