use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};

/// 数据格式家族标签。
///
/// ## 设计目的（Why）
/// - 同一路由配置中可能声明多种数据格式，标签在描述符构造时即固定，用于日志与诊断；
/// - 通过枚举而非自由字符串，确保跨语言实现时可以进行枚举校验。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DataFormatKind {
    /// XML 数据绑定格式。
    XmlBinding,
}

impl DataFormatKind {
    /// 标签在配置文件中的稳定名称。
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::XmlBinding => "jaxb",
        }
    }
}

impl fmt::Display for DataFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XML 绑定数据格式的声明式描述符。
///
/// # 设计背景（Why）
/// - 描述符由配置加载阶段一次性构造，构建器只读不写，保证同一描述符可以被多次、并发地构建；
/// - 除上下文标识外所有字段均可缺省，缺省值的替换规则集中在构建阶段（见 [`crate::policy`]），
///   描述符本身只忠实记录“是否声明过”。
///
/// # 契约说明（What）
/// - 写访问器不做任何校验，上下文标识为空等问题推迟到构建时以 `BuildError` 报告；
/// - `kind` 在构造时固定为 [`DataFormatKind::XmlBinding`]，不参与序列化；
/// - 序列化字段名为 camelCase，与路由配置中的属性名一致。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct XmlBindingDescriptor {
    #[serde(skip, default = "xml_binding_kind")]
    kind: DataFormatKind,
    context_identifier: String,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pretty_print: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    ignore_wrapper_element: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    filter_non_text_chars: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoding: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    fragment_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    partial_target_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    partial_target_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace_prefix_mapper_type_name: Option<String>,
}

fn xml_binding_kind() -> DataFormatKind {
    DataFormatKind::XmlBinding
}

impl Default for XmlBindingDescriptor {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl XmlBindingDescriptor {
    /// 以上下文标识创建描述符，其余字段均未声明。
    pub fn new(context_identifier: impl Into<String>) -> Self {
        Self {
            kind: DataFormatKind::XmlBinding,
            context_identifier: context_identifier.into(),
            pretty_print: None,
            ignore_wrapper_element: None,
            filter_non_text_chars: None,
            encoding: None,
            fragment_mode: None,
            partial_target_type_name: None,
            partial_target_namespace: None,
            namespace_prefix_mapper_type_name: None,
        }
    }

    /// 常见场景的便捷构造：同时声明上下文标识与 `prettyPrint`。
    pub fn with_pretty_print(context_identifier: impl Into<String>, pretty_print: bool) -> Self {
        let mut descriptor = Self::new(context_identifier);
        descriptor.set_pretty_print(Some(pretty_print));
        descriptor
    }

    /// 数据格式家族标签。
    pub fn kind(&self) -> DataFormatKind {
        self.kind
    }

    pub fn context_identifier(&self) -> &str {
        &self.context_identifier
    }

    pub fn set_context_identifier(&mut self, context_identifier: impl Into<String>) {
        self.context_identifier = context_identifier.into();
    }

    pub fn pretty_print(&self) -> Option<bool> {
        self.pretty_print
    }

    pub fn set_pretty_print(&mut self, pretty_print: Option<bool>) {
        self.pretty_print = pretty_print;
    }

    pub fn ignore_wrapper_element(&self) -> Option<bool> {
        self.ignore_wrapper_element
    }

    pub fn set_ignore_wrapper_element(&mut self, ignore_wrapper_element: Option<bool>) {
        self.ignore_wrapper_element = ignore_wrapper_element;
    }

    pub fn filter_non_text_chars(&self) -> Option<bool> {
        self.filter_non_text_chars
    }

    pub fn set_filter_non_text_chars(&mut self, filter_non_text_chars: Option<bool>) {
        self.filter_non_text_chars = filter_non_text_chars;
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn set_encoding(&mut self, encoding: Option<String>) {
        self.encoding = encoding;
    }

    pub fn fragment_mode(&self) -> Option<bool> {
        self.fragment_mode
    }

    pub fn set_fragment_mode(&mut self, fragment_mode: Option<bool>) {
        self.fragment_mode = fragment_mode;
    }

    pub fn partial_target_type_name(&self) -> Option<&str> {
        self.partial_target_type_name.as_deref()
    }

    pub fn set_partial_target_type_name(&mut self, partial_target_type_name: Option<String>) {
        self.partial_target_type_name = partial_target_type_name;
    }

    /// 部分编组目标的限定名文本，构建时才解析。
    pub fn partial_target_namespace(&self) -> Option<&str> {
        self.partial_target_namespace.as_deref()
    }

    pub fn set_partial_target_namespace(&mut self, partial_target_namespace: Option<String>) {
        self.partial_target_namespace = partial_target_namespace;
    }

    /// 命名空间前缀映射器的类型名称，构建时经类型解析器解析。
    pub fn namespace_prefix_mapper_type_name(&self) -> Option<&str> {
        self.namespace_prefix_mapper_type_name.as_deref()
    }

    pub fn set_namespace_prefix_mapper_type_name(&mut self, type_name: Option<String>) {
        self.namespace_prefix_mapper_type_name = type_name;
    }
}

/// 宽松布尔解析：配置中的属性值常以文本出现。
///
/// - 布尔值原样接受；
/// - 字符串 `"true"`/`"false"`（忽略 ASCII 大小写）；
/// - 整数：大于 0 视为 `true`；
/// - 其余输入报错，而不是静默当作 `false`。
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientBool;

    impl de::Visitor<'_> for LenientBool {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean, \"true\"/\"false\" or an integer")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
            Ok(value > 0)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
            Ok(value > 0)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            if value.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if value.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }
    }

    deserializer.deserialize_any(LenientBool).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_declares_only_the_context() {
        let descriptor = XmlBindingDescriptor::new("com.example.orders");
        assert_eq!(descriptor.kind(), DataFormatKind::XmlBinding);
        assert_eq!(descriptor.context_identifier(), "com.example.orders");
        assert_eq!(descriptor.pretty_print(), None);
        assert_eq!(descriptor.ignore_wrapper_element(), None);
        assert_eq!(descriptor.filter_non_text_chars(), None);
        assert_eq!(descriptor.fragment_mode(), None);
        assert_eq!(descriptor.encoding(), None);
        assert_eq!(descriptor.partial_target_type_name(), None);
        assert_eq!(descriptor.partial_target_namespace(), None);
        assert_eq!(descriptor.namespace_prefix_mapper_type_name(), None);
    }

    #[test]
    fn convenience_constructor_sets_pretty_print() {
        let descriptor = XmlBindingDescriptor::with_pretty_print("ctx", false);
        assert_eq!(descriptor.pretty_print(), Some(false));
        assert_eq!(descriptor.kind().as_str(), "jaxb");
    }

    #[test]
    fn default_descriptor_has_blank_context() {
        let descriptor = XmlBindingDescriptor::default();
        assert!(descriptor.context_identifier().is_empty());
        assert_eq!(descriptor.kind(), DataFormatKind::XmlBinding);
    }

    #[test]
    fn setters_accept_values_without_validation() {
        let mut descriptor = XmlBindingDescriptor::new("ctx");
        descriptor.set_partial_target_namespace(Some("{broken".to_owned()));
        descriptor.set_encoding(Some("UTF-16".to_owned()));
        descriptor.set_context_identifier("   ");
        assert_eq!(descriptor.partial_target_namespace(), Some("{broken"));
        assert_eq!(descriptor.encoding(), Some("UTF-16"));
        assert_eq!(descriptor.context_identifier(), "   ");
    }
}
