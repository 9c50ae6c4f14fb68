//! 编解码器侧契约：属性标识、属性值、属性设置能力与实例工厂。
//!
//! # 设计背景（Why）
//! - 真正执行编组/解组的编解码器由宿主提供，本 crate 只负责“装配”；
//! - 因此编解码器对本 crate 仅暴露一个窄接口：[`ConfigurableCodec::set_property`]，
//!   属性集合则收敛为封闭枚举 [`CodecProperty`]，避免字符串拼写错误在运行时才暴露。
//!
//! # 契约说明（What）
//! - 构建器对每个属性最多调用一次 `set_property`，调用顺序见 [`crate::builder::configure`]；
//! - 工厂以描述符的上下文标识为输入创建实例，失败时返回 [`CodecFactoryError`]。

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{CodecFactoryError, PropertyRejected};
use crate::mapper::NamespacePrefixMapper;
use crate::qname::QualifiedName;

/// 构建器会写入编解码器的属性。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum CodecProperty {
    PrettyPrint,
    IgnoreWrapperElement,
    FilterNonTextChars,
    FragmentMode,
    PartialTargetTypeName,
    PartialTargetNamespace,
    Encoding,
    ContextIdentifier,
    NamespacePrefixMapper,
}

impl CodecProperty {
    /// 属性的稳定名称，与描述符字段名一致。
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrettyPrint => "prettyPrint",
            Self::IgnoreWrapperElement => "ignoreWrapperElement",
            Self::FilterNonTextChars => "filterNonTextChars",
            Self::FragmentMode => "fragmentMode",
            Self::PartialTargetTypeName => "partialTargetTypeName",
            Self::PartialTargetNamespace => "partialTargetNamespace",
            Self::Encoding => "encoding",
            Self::ContextIdentifier => "contextIdentifier",
            Self::NamespacePrefixMapper => "namespacePrefixMapper",
        }
    }

    /// 根据稳定名称解析属性。
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "prettyPrint" => Some(Self::PrettyPrint),
            "ignoreWrapperElement" => Some(Self::IgnoreWrapperElement),
            "filterNonTextChars" => Some(Self::FilterNonTextChars),
            "fragmentMode" => Some(Self::FragmentMode),
            "partialTargetTypeName" => Some(Self::PartialTargetTypeName),
            "partialTargetNamespace" => Some(Self::PartialTargetNamespace),
            "encoding" => Some(Self::Encoding),
            "contextIdentifier" => Some(Self::ContextIdentifier),
            "namespacePrefixMapper" => Some(Self::NamespacePrefixMapper),
            _ => None,
        }
    }
}

impl fmt::Display for CodecProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 写入编解码器的属性值。
///
/// `PrefixMapper` 以 `Arc` 持有映射器实例：编解码器拿到的是本次构建新建的实例，
/// 调用方可通过 [`Arc::ptr_eq`] 区分不同构建产生的实例。
#[derive(Clone, Debug)]
pub enum PropertyValue {
    Bool(bool),
    Text(String),
    QualifiedName(QualifiedName),
    PrefixMapper(Arc<dyn NamespacePrefixMapper>),
}

impl PropertyValue {
    /// 布尔值视图。
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// 文本视图。
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// 限定名视图。
    pub fn as_qualified_name(&self) -> Option<&QualifiedName> {
        match self {
            Self::QualifiedName(value) => Some(value),
            _ => None,
        }
    }

    /// 前缀映射器视图。
    pub fn as_prefix_mapper(&self) -> Option<&Arc<dyn NamespacePrefixMapper>> {
        match self {
            Self::PrefixMapper(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for PropertyValue {
    /// 映射器按实例身份比较，其余变体按值比较。
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::QualifiedName(a), Self::QualifiedName(b)) => a == b,
            (Self::PrefixMapper(a), Self::PrefixMapper(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// 编解码器的属性设置能力。
///
/// # 契约说明（What）
/// - 每次调用对应一次属性赋值，不应产生其它可观察副作用；
/// - 不支持的属性或非法取值以 [`PropertyRejected`] 拒绝，构建器会中止本次构建。
pub trait ConfigurableCodec {
    /// 写入一个属性。
    fn set_property(
        &mut self,
        property: CodecProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyRejected>;
}

impl<C: ConfigurableCodec + ?Sized> ConfigurableCodec for Box<C> {
    fn set_property(
        &mut self,
        property: CodecProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyRejected> {
        (**self).set_property(property, value)
    }
}

/// 编解码器实例工厂。
///
/// # 设计初衷（Why）
/// - 编解码器的具体类型与构造方式由宿主决定，构建器只需要“给定上下文标识，拿到一个可配置实例”；
/// - 关联类型 `Codec` 让构建结果保持具体类型，调用方无需向下转型。
pub trait CodecFactory {
    /// 工厂产出的编解码器类型。
    type Codec: ConfigurableCodec;

    /// 为给定上下文标识创建新的编解码器实例。
    fn instantiate(&self, context_identifier: &str) -> Result<Self::Codec, CodecFactoryError>;
}

impl<F: CodecFactory + ?Sized> CodecFactory for &F {
    type Codec = F::Codec;

    fn instantiate(&self, context_identifier: &str) -> Result<Self::Codec, CodecFactoryError> {
        (**self).instantiate(context_identifier)
    }
}

/// 将构造闭包包装为 [`CodecFactory`]。
///
/// # 风险提示（Trade-offs）
/// - 闭包若捕获共享状态，需要自行保证并发构建下的安全性；构建器本身不加锁。
pub struct TypedCodecFactory<C, F>
where
    C: ConfigurableCodec,
    F: Fn(&str) -> Result<C, CodecFactoryError>,
{
    constructor: F,
    _marker: PhantomData<fn() -> C>,
}

impl<C, F> TypedCodecFactory<C, F>
where
    C: ConfigurableCodec,
    F: Fn(&str) -> Result<C, CodecFactoryError>,
{
    /// 基于构造闭包创建工厂。
    pub fn new(constructor: F) -> Self {
        Self {
            constructor,
            _marker: PhantomData,
        }
    }
}

impl<C, F> CodecFactory for TypedCodecFactory<C, F>
where
    C: ConfigurableCodec,
    F: Fn(&str) -> Result<C, CodecFactoryError>,
{
    type Codec = C;

    fn instantiate(&self, context_identifier: &str) -> Result<C, CodecFactoryError> {
        (self.constructor)(context_identifier)
    }
}

impl<C, F> fmt::Debug for TypedCodecFactory<C, F>
where
    C: ConfigurableCodec,
    F: Fn(&str) -> Result<C, CodecFactoryError>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCodecFactory")
            .field("codec", &std::any::type_name::<C>())
            .finish()
    }
}
