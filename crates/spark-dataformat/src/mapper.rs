//! 命名空间前缀映射能力。
//!
//! 编解码器在输出 XML 时会向映射器询问某个命名空间应使用的前缀；映射器类型由描述符以名称声明，
//! 构建时经类型解析器解析并实例化（见 [`crate::builder::resolve_auxiliary_types`]）。

use std::collections::BTreeMap;
use std::fmt;

/// 命名空间前缀映射器契约。
///
/// # 契约说明（What）
/// - `namespace_uri`：编解码器即将声明的命名空间；
/// - `suggestion`：编解码器自身建议的前缀，映射器可直接沿用；
/// - `require_prefix`：为 `true` 时表示该位置不允许使用默认命名空间，返回空字符串前缀是非法的；
/// - 返回 `None` 表示不干预，由编解码器自行决定。
///
/// 实现必须 `Send + Sync`：同一实例会随编解码器交给调用方，可能被多线程共享。
pub trait NamespacePrefixMapper: Send + Sync + fmt::Debug {
    /// 注册到类型解析器时使用的类型名称。
    fn type_name(&self) -> &str;

    /// 返回首选前缀。
    fn preferred_prefix(
        &self,
        namespace_uri: &str,
        suggestion: Option<&str>,
        require_prefix: bool,
    ) -> Option<String>;
}

/// 基于固定表的前缀映射器。
///
/// 未命中表项时回退到编解码器的建议前缀；当 `require_prefix` 为真而表中给出的是空前缀时，
/// 同样回退，避免生成非法的默认命名空间声明。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticPrefixMapper {
    prefixes: BTreeMap<String, String>,
}

impl StaticPrefixMapper {
    /// 注册名称，供 [`TypeRegistry::register_mapper`](crate::TypeRegistry::register_mapper) 使用。
    pub const TYPE_NAME: &'static str = "spark.dataformat.StaticPrefixMapper";

    /// 创建空映射器。
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条 `namespace → prefix` 映射。
    pub fn with_prefix(mut self, namespace_uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.prefixes.insert(namespace_uri.into(), prefix.into());
        self
    }

    /// 已登记的映射条数。
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// 是否没有任何映射。
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl NamespacePrefixMapper for StaticPrefixMapper {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn preferred_prefix(
        &self,
        namespace_uri: &str,
        suggestion: Option<&str>,
        require_prefix: bool,
    ) -> Option<String> {
        match self.prefixes.get(namespace_uri) {
            Some(prefix) if !(require_prefix && prefix.is_empty()) => Some(prefix.clone()),
            _ => suggestion.map(str::to_owned),
        }
    }
}
