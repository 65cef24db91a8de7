//! 命名约定

/// 简短类型名：全限定名最后一段
pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit(['.', ':'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(qualified_name)
}

/// 首字母小写
///
/// 前两个字符都是大写时保持原样（`URLService` 仍为 `URLService`）。
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => {
            let mut result: String = first.to_lowercase().collect();
            result.push_str(&name[first.len_utf8()..]);
            result
        }
        (None, _) => String::new(),
    }
}

/// 由类型名推导默认 Bean 名称
pub fn default_bean_name(qualified_name: &str) -> String {
    decapitalize(simple_name(qualified_name))
}

/// 类型是否位于指定包（含子包）下；空包表示全部
pub fn is_within_package(qualified_name: &str, package: &str) -> bool {
    let package = package.trim().trim_end_matches('.');
    if package.is_empty() {
        return true;
    }
    qualified_name == package
        || qualified_name
            .strip_prefix(package)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// 参数类型的比较形式
///
/// 去掉引用、生命周期、`mut` 和路径前缀，`str` 视为 `String`：
/// `&'a str`、`java.lang.String`、`std::string::String` 都得到 `String`。
pub fn normalize_type_name(type_name: &str) -> String {
    let mut rest = type_name.trim();
    while let Some(stripped) = rest.strip_prefix('&') {
        rest = stripped.trim_start();
        if rest.starts_with('\'') {
            let end = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            rest = rest[end..].trim_start();
        }
        rest = rest.strip_prefix("mut ").unwrap_or(rest).trim_start();
    }

    let compact: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    let (head, generics) = compact.split_at(compact.find('<').unwrap_or(compact.len()));
    let head = head
        .rsplit(['.', ':'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(head);

    match head {
        "str" => format!("String{generics}"),
        _ => format!("{head}{generics}"),
    }
}
