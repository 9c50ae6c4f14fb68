//! # catalog：从路由配置片段加载描述符
//!
//! ## 角色定位（Why）
//! - 描述符来自声明式配置而非手写代码，本模块负责把 TOML 片段解码为具名描述符集合；
//! - 解码阶段只做语法与字段类型检查，语义校验（上下文非空、限定名合法、类型可解析）统一推迟到构建时。
//!
//! ## 格式（What）
//! ```toml
//! [jaxb.orders]
//! contextIdentifier = "com.example.orders"
//! prettyPrint = false
//! partialTargetNamespace = "{urn:example}Item"
//! ```
//! - 表名 `jaxb` 对应 [`DataFormatKind::XmlBinding`](crate::DataFormatKind)；
//! - 未知字段直接报错，避免拼写错误被静默忽略。

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::descriptor::XmlBindingDescriptor;
use crate::error::DescriptorLoadError;

/// 具名描述符集合，按名称有序存放。
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorCatalog {
    #[serde(default)]
    jaxb: BTreeMap<String, XmlBindingDescriptor>,
}

impl DescriptorCatalog {
    /// 解析 TOML 文本。
    pub fn from_toml_str(text: &str) -> Result<Self, DescriptorLoadError> {
        let catalog: Self = toml::from_str(text)?;
        tracing::debug!(descriptors = catalog.len(), "loaded data format catalog");
        Ok(catalog)
    }

    /// 按名称查找描述符。
    pub fn get(&self, name: &str) -> Option<&XmlBindingDescriptor> {
        self.jaxb.get(name)
    }

    /// 全部描述符名称，按字典序。
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.jaxb.keys().map(String::as_str)
    }

    /// 遍历 `(名称, 描述符)`。
    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlBindingDescriptor)> {
        self.jaxb
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.jaxb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jaxb.is_empty()
    }
}
