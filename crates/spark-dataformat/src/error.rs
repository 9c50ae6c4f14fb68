//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义数据格式构建过程中可能出现的全部错误，避免各子模块各自拼接字符串；
//! - 区分“外部协作方报告的原始错误”（类型解析、实例化、编解码器拒绝属性）与“构建器对外暴露的
//!   统一错误”（[`BuildError`]），后者通过 `source()` 保留完整错误链。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 [`thiserror::Error`]，满足 `Send + Sync + 'static`；
//! - [`BuildError`] 提供稳定的 [`BuildErrorKind`] 与错误码（见 [`codes`]），供日志与告警聚合；
//! - 所有构建错误均为致命错误：构建器不会重试，也不会返回部分配置的编解码器。

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::codec::CodecProperty;

/// 构建错误的稳定错误码。
///
/// 命名遵循 `<域>.<对象>.<原因>`，与日志字段 `error.code` 对齐。
pub mod codes {
    /// 描述符缺少上下文标识。
    pub const MISSING_CONTEXT_IDENTIFIER: &str = "dataformat.descriptor.missing_context";
    /// 编解码工厂无法创建实例。
    pub const CODEC_INSTANTIATION_FAILED: &str = "dataformat.codec.instantiation_failed";
    /// 辅助类型解析或实例化失败。
    pub const AUXILIARY_TYPE_RESOLUTION_FAILED: &str = "dataformat.aux_type.resolution_failed";
    /// 限定名文本格式非法。
    pub const INVALID_QUALIFIED_NAME: &str = "dataformat.qname.invalid";
    /// 编解码器拒绝了某个属性赋值。
    pub const PROPERTY_REJECTED: &str = "dataformat.codec.property_rejected";
}

/// 类型解析器未能找到指定名称的类型。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type `{name}` is not registered with the type resolver")]
pub struct TypeNotFoundError {
    name: String,
}

impl TypeNotFoundError {
    /// 以请求的类型名称构造错误。
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 未命中的类型名称。
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// 向类型注册表登记类型时的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistrationError {
    /// 同名类型已经登记，拒绝覆盖。
    #[error("type `{name}` is already registered")]
    Duplicate { name: String },
}

/// 已解析的类型无法通过零参构造器实例化。
///
/// - **意图 (Why)**：区分“类型根本不可构造”与“构造器运行时失败”两类配置缺陷，便于排障；
/// - **契约 (What)**：两种变体都携带类型名称，`ConstructorFailed` 额外携带构造器给出的原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InstantiationError {
    /// 类型已注册，但没有可用的零参构造器。
    #[error("type `{name}` has no usable zero-argument constructor")]
    NoZeroArgConstructor { name: String },

    /// 构造器本身返回了失败。
    #[error("constructor of type `{name}` failed: {reason}")]
    ConstructorFailed { name: String, reason: String },
}

impl InstantiationError {
    /// 构造“构造器失败”错误，供注册表中的构造闭包使用。
    pub fn constructor_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConstructorFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// 出错的类型名称。
    pub fn type_name(&self) -> &str {
        match self {
            Self::NoZeroArgConstructor { name } | Self::ConstructorFailed { name, .. } => name,
        }
    }
}

/// 辅助类型处理失败的原始原因：解析阶段或实例化阶段。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuxiliaryTypeError {
    #[error(transparent)]
    NotFound(#[from] TypeNotFoundError),
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),
}

/// 限定名解析失败的具体原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QualifiedNameIssue {
    /// 以 `{}` 开头：空命名空间必须使用不带花括号的写法。
    EmptyNamespaceBraces,
    /// 以 `{` 开头但缺少对应的 `}`。
    MissingClosingBrace,
}

impl fmt::Display for QualifiedNameIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNamespaceBraces => {
                f.write_str("an empty namespace must be written as a bare local part")
            }
            Self::MissingClosingBrace => f.write_str("missing closing '}'"),
        }
    }
}

/// 文本无法解析为 `{namespaceURI}localPart` 或裸 `localPart`。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid qualified name `{input}`: {issue}")]
pub struct InvalidQualifiedName {
    input: String,
    issue: QualifiedNameIssue,
}

impl InvalidQualifiedName {
    pub(crate) fn new(input: &str, issue: QualifiedNameIssue) -> Self {
        Self {
            input: input.to_owned(),
            issue,
        }
    }

    /// 原始输入文本。
    pub fn input(&self) -> &str {
        &self.input
    }

    /// 失败原因。
    pub fn issue(&self) -> QualifiedNameIssue {
        self.issue
    }
}

/// 编解码器拒绝了一次属性赋值。
///
/// - **意图 (Why)**：编解码器由宿主提供，可能并不支持全部属性或对取值有额外约束；
/// - **契约 (What)**：`property` 指出被拒绝的属性，`reason` 为编解码器给出的说明。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("codec rejected property `{property}`: {reason}")]
pub struct PropertyRejected {
    property: CodecProperty,
    reason: Cow<'static, str>,
}

impl PropertyRejected {
    /// 由编解码器实现构造拒绝错误。
    pub fn new(property: CodecProperty, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            property,
            reason: reason.into(),
        }
    }

    /// 被拒绝的属性。
    pub fn property(&self) -> CodecProperty {
        self.property
    }

    /// 拒绝原因。
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// 编解码工厂无法创建实例。
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CodecFactoryError {
    message: Cow<'static, str>,
    #[source]
    cause: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl CodecFactoryError {
    /// 仅携带描述信息的工厂错误。
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// 附加底层原因。
    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

/// 构建器对外暴露的统一错误。
///
/// # 教案式说明
/// - **意图 (Why)**：调用方只需要处理一种错误类型即可覆盖整个构建流程，同时仍能借助
///   `source()` 追溯到类型解析器、编解码工厂或编解码器给出的原始原因；
/// - **契约 (What)**：
///   - 每个变体对应一个 [`BuildErrorKind`] 与一个稳定错误码；
///   - 错误返回时不会附带任何编解码器实例，部分配置的实例由构建器直接丢弃；
/// - **风险 (Trade-offs)**：上下文字段使用 `String` 保存，牺牲少量分配换取可读的诊断信息。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// 描述符的上下文标识为空或仅包含空白。
    #[error("data format `{format}` requires a non-blank context identifier")]
    MissingContextIdentifier { format: &'static str },

    /// 编解码工厂未能为给定上下文创建实例。
    #[error("failed to instantiate codec for context `{context_identifier}`")]
    CodecInstantiation {
        context_identifier: String,
        #[source]
        source: CodecFactoryError,
    },

    /// 命名的辅助类型无法解析或实例化。
    #[error("failed to resolve auxiliary type `{type_name}`")]
    AuxiliaryTypeResolution {
        type_name: String,
        #[source]
        source: AuxiliaryTypeError,
    },

    /// 部分编组目标命名空间不是合法的限定名。
    #[error(transparent)]
    InvalidQualifiedName(#[from] InvalidQualifiedName),

    /// 编解码器拒绝了属性赋值。
    #[error(transparent)]
    PropertyRejected(#[from] PropertyRejected),
}

impl BuildError {
    pub(crate) fn auxiliary_type(type_name: &str, source: impl Into<AuxiliaryTypeError>) -> Self {
        Self::AuxiliaryTypeResolution {
            type_name: type_name.to_owned(),
            source: source.into(),
        }
    }

    /// 错误类别。
    pub fn kind(&self) -> BuildErrorKind {
        match self {
            Self::MissingContextIdentifier { .. } => BuildErrorKind::MissingContextIdentifier,
            Self::CodecInstantiation { .. } => BuildErrorKind::CodecInstantiationFailed,
            Self::AuxiliaryTypeResolution { .. } => BuildErrorKind::AuxiliaryTypeResolutionFailed,
            Self::InvalidQualifiedName(_) => BuildErrorKind::InvalidQualifiedName,
            Self::PropertyRejected(_) => BuildErrorKind::PropertyRejected,
        }
    }

    /// 稳定错误码，等价于 `self.kind().code()`。
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// 若失败源于类型未注册，返回原始的 [`TypeNotFoundError`]。
    pub fn type_not_found(&self) -> Option<&TypeNotFoundError> {
        match self {
            Self::AuxiliaryTypeResolution {
                source: AuxiliaryTypeError::NotFound(err),
                ..
            } => Some(err),
            _ => None,
        }
    }

    /// 若失败源于实例化，返回原始的 [`InstantiationError`]。
    pub fn instantiation_error(&self) -> Option<&InstantiationError> {
        match self {
            Self::AuxiliaryTypeResolution {
                source: AuxiliaryTypeError::Instantiation(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

/// [`BuildError`] 的类别枚举。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BuildErrorKind {
    MissingContextIdentifier,
    CodecInstantiationFailed,
    AuxiliaryTypeResolutionFailed,
    InvalidQualifiedName,
    PropertyRejected,
}

impl BuildErrorKind {
    /// 类别对应的稳定错误码。
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingContextIdentifier => codes::MISSING_CONTEXT_IDENTIFIER,
            Self::CodecInstantiationFailed => codes::CODEC_INSTANTIATION_FAILED,
            Self::AuxiliaryTypeResolutionFailed => codes::AUXILIARY_TYPE_RESOLUTION_FAILED,
            Self::InvalidQualifiedName => codes::INVALID_QUALIFIED_NAME,
            Self::PropertyRejected => codes::PROPERTY_REJECTED,
        }
    }
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 从声明式配置加载描述符失败。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DescriptorLoadError {
    /// TOML 语法错误、未知字段或字段类型不匹配。
    #[error("failed to parse data format catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

const _: fn() = || {
    fn assert_error_traits<T: StdError + Send + Sync + 'static>() {}

    assert_error_traits::<BuildError>();
    assert_error_traits::<DescriptorLoadError>();
    assert_error_traits::<AuxiliaryTypeError>();
};
