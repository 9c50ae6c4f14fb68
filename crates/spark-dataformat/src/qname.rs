use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidQualifiedName, QualifiedNameIssue};

/// XML 风格的限定名：`(namespace URI, local part)`。
///
/// ### 设计目标（Why）
/// - 部分编组（partial marshalling）需要以限定名指明目标元素，描述符中以文本形式声明，
///   构建时解析为结构化值再交给编解码器；
/// - 文本形式沿用业界通行的 Clark 记法：`{namespaceURI}localPart`，无命名空间时为裸 `localPart`。
///
/// ### 契约说明（What）
/// - 空字符串 `namespace_uri` 表示“无命名空间”；
/// - `Display` 输出与 [`QualifiedName::parse`] 接受的文本互逆。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace_uri: String,
    local_part: String,
}

impl QualifiedName {
    /// 以命名空间与本地名构造限定名。
    pub fn new(namespace_uri: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            local_part: local_part.into(),
        }
    }

    /// 构造无命名空间的限定名。
    pub fn local(local_part: impl Into<String>) -> Self {
        Self::new(String::new(), local_part)
    }

    /// 解析 Clark 记法文本。
    ///
    /// ### 逻辑（How）
    /// - 不以 `{` 开头：整段文本作为本地名，命名空间为空（空文本得到空本地名）；
    /// - 以 `{}` 开头：拒绝，空命名空间必须使用裸写法；
    /// - 以 `{` 开头但没有 `}`：拒绝；
    /// - 其余情况：花括号之间为命名空间，`}` 之后为本地名。
    pub fn parse(text: &str) -> Result<Self, InvalidQualifiedName> {
        let Some(rest) = text.strip_prefix('{') else {
            return Ok(Self::local(text));
        };
        if rest.starts_with('}') {
            return Err(InvalidQualifiedName::new(
                text,
                QualifiedNameIssue::EmptyNamespaceBraces,
            ));
        }
        match rest.split_once('}') {
            Some((namespace_uri, local_part)) => Ok(Self::new(namespace_uri, local_part)),
            None => Err(InvalidQualifiedName::new(
                text,
                QualifiedNameIssue::MissingClosingBrace,
            )),
        }
    }

    /// 命名空间 URI，无命名空间时为空字符串。
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// 本地名。
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// 是否带有命名空间。
    pub fn has_namespace(&self) -> bool {
        !self.namespace_uri.is_empty()
    }
}

impl FromStr for QualifiedName {
    type Err = InvalidQualifiedName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_namespace() {
            write!(f, "{{{}}}{}", self.namespace_uri, self.local_part)
        } else {
            f.write_str(&self.local_part)
        }
    }
}
