//! # 构建器：描述符 → 已配置的编解码器
//!
//! ## 定位与职责（Why）
//! - 将配置加载阶段得到的静态描述符桥接为运行时对象：解析按名称声明的辅助类型、
//!   通过宿主工厂创建编解码器、再按缺省值规则逐项写入属性；
//! - 构建器不持有任何可变状态，每次构建彼此独立，可在多个线程上并发执行。
//!
//! ## 行为逻辑（How）
//! 1. [`build`] 校验上下文标识非空；
//! 2. 调用 [`CodecFactory::instantiate`] 创建编解码器；
//! 3. [`resolve_auxiliary_types`] 解析并实例化命名空间前缀映射器（若声明）；
//! 4. [`configure`] 按固定顺序写入属性，布尔选项查 [`BOOLEAN_POLICY`]；
//! 5. 返回编解码器。任一步失败立即返回 [`BuildError`]，不重试、不回滚。
//!
//! ## 风险提示（Trade-offs）
//! - 失败时已写入的属性不会撤销：部分配置的编解码器随错误一起被丢弃，调用方永远拿不到它；
//! - 映射器实例每次构建都会重新创建，构造开销较大的映射器应在其内部自行共享昂贵状态。

use std::sync::Arc;

use tracing::{debug, debug_span, trace, warn};

use crate::codec::{CodecFactory, CodecProperty, ConfigurableCodec, PropertyValue};
use crate::descriptor::XmlBindingDescriptor;
use crate::error::BuildError;
use crate::mapper::NamespacePrefixMapper;
use crate::policy::BOOLEAN_POLICY;
use crate::qname::QualifiedName;
use crate::resolver::TypeResolver;

/// 单次构建中解析出的命名空间前缀映射器实例，仅属于该次构建。
pub type ResolvedPrefixMapper = Arc<dyn NamespacePrefixMapper>;

/// 解析描述符引用的辅助类型。
///
/// # 契约说明（What）
/// - 未声明 `namespacePrefixMapperTypeName` 时返回 `Ok(None)`，不访问解析器；
/// - 声明时先解析再调用零参构造器，两步中的任何失败都包装为
///   [`BuildError::AuxiliaryTypeResolution`]，原始错误保留在 `source()` 中。
pub fn resolve_auxiliary_types<R>(
    descriptor: &XmlBindingDescriptor,
    resolver: &R,
) -> Result<Option<ResolvedPrefixMapper>, BuildError>
where
    R: TypeResolver<dyn NamespacePrefixMapper> + ?Sized,
{
    let Some(type_name) = descriptor.namespace_prefix_mapper_type_name() else {
        return Ok(None);
    };

    let handle = resolver
        .resolve(type_name)
        .map_err(|err| BuildError::auxiliary_type(type_name, err))?;
    let instance = handle
        .instantiate()
        .map_err(|err| BuildError::auxiliary_type(type_name, err))?;

    debug!(type_name, "resolved namespace prefix mapper");
    Ok(Some(instance))
}

/// 按缺省值规则把描述符写入编解码器。
///
/// # 写入顺序与规则
/// | 顺序 | 属性 | 规则 |
/// |---|---|---|
/// | 1-4 | 布尔选项 | 总是写入，缺省值查 [`BOOLEAN_POLICY`] |
/// | 5 | `partialTargetTypeName` | 仅声明时写入 |
/// | 6 | `partialTargetNamespace` | 仅声明时写入，先解析为 [`QualifiedName`] |
/// | 7 | `encoding` | 仅声明时写入 |
/// | 8 | `contextIdentifier` | 总是写入 |
/// | 9 | `namespacePrefixMapper` | 仅在 `resolved_mapper` 存在时写入 |
///
/// 限定名非法时在写入该属性之前返回错误；此前已写入的属性保持原样。
pub fn configure<C>(
    codec: &mut C,
    descriptor: &XmlBindingDescriptor,
    resolved_mapper: Option<ResolvedPrefixMapper>,
) -> Result<(), BuildError>
where
    C: ConfigurableCodec + ?Sized,
{
    for (property, default, declared) in BOOLEAN_POLICY {
        let value = default.effective(declared(descriptor));
        apply(codec, property, PropertyValue::Bool(value))?;
    }

    if let Some(type_name) = descriptor.partial_target_type_name() {
        apply(
            codec,
            CodecProperty::PartialTargetTypeName,
            PropertyValue::Text(type_name.to_owned()),
        )?;
    }
    if let Some(namespace) = descriptor.partial_target_namespace() {
        let name = QualifiedName::parse(namespace)?;
        apply(
            codec,
            CodecProperty::PartialTargetNamespace,
            PropertyValue::QualifiedName(name),
        )?;
    }
    if let Some(encoding) = descriptor.encoding() {
        apply(
            codec,
            CodecProperty::Encoding,
            PropertyValue::Text(encoding.to_owned()),
        )?;
    }

    apply(
        codec,
        CodecProperty::ContextIdentifier,
        PropertyValue::Text(descriptor.context_identifier().to_owned()),
    )?;

    if let Some(mapper) = resolved_mapper {
        apply(
            codec,
            CodecProperty::NamespacePrefixMapper,
            PropertyValue::PrefixMapper(mapper),
        )?;
    }
    Ok(())
}

fn apply<C>(codec: &mut C, property: CodecProperty, value: PropertyValue) -> Result<(), BuildError>
where
    C: ConfigurableCodec + ?Sized,
{
    trace!(property = property.as_str(), ?value, "apply codec property");
    codec.set_property(property, value)?;
    Ok(())
}

/// 完整构建流程：校验、实例化、解析辅助类型、写入属性。
///
/// # 契约说明（What）
/// - **前置条件**：描述符已由配置加载阶段构造完毕；解析器允许并发只读访问；
/// - **后置条件**：成功时返回完全配置的编解码器；失败时返回 [`BuildError`]，不返回任何实例；
/// - 不缓存任何中间结果，相同输入的两次构建得到两个互相独立的编解码器。
pub fn build<R, F>(
    descriptor: &XmlBindingDescriptor,
    resolver: &R,
    codec_factory: &F,
) -> Result<F::Codec, BuildError>
where
    R: TypeResolver<dyn NamespacePrefixMapper> + ?Sized,
    F: CodecFactory + ?Sized,
{
    let span = debug_span!(
        "dataformat.build",
        kind = descriptor.kind().as_str(),
        context = descriptor.context_identifier(),
    );
    let _entered = span.enter();

    let outcome = build_in_span(descriptor, resolver, codec_factory);
    if let Err(err) = &outcome {
        warn!(error.code = err.code(), error = %err, "data format build failed");
    }
    outcome
}

fn build_in_span<R, F>(
    descriptor: &XmlBindingDescriptor,
    resolver: &R,
    codec_factory: &F,
) -> Result<F::Codec, BuildError>
where
    R: TypeResolver<dyn NamespacePrefixMapper> + ?Sized,
    F: CodecFactory + ?Sized,
{
    let context_identifier = descriptor.context_identifier();
    if context_identifier.trim().is_empty() {
        return Err(BuildError::MissingContextIdentifier {
            format: descriptor.kind().as_str(),
        });
    }

    let mut codec = codec_factory
        .instantiate(context_identifier)
        .map_err(|source| BuildError::CodecInstantiation {
            context_identifier: context_identifier.to_owned(),
            source,
        })?;
    let resolved_mapper = resolve_auxiliary_types(descriptor, resolver)?;
    configure(&mut codec, descriptor, resolved_mapper)?;

    debug!("data format codec configured");
    Ok(codec)
}

/// 绑定解析器与工厂的可复用构建器。
///
/// - **意图 (Why)**：宿主通常在启动时确定解析器与工厂，之后为路由中的每个描述符反复构建；
/// - **契约 (What)**：只持有共享引用，不持有可变状态，`build` 可在多个线程上并发调用
///   （前提是 `R`、`F` 本身满足 `Sync`）。
#[derive(Debug)]
pub struct DataFormatBuilder<'a, R: ?Sized, F: ?Sized> {
    resolver: &'a R,
    codec_factory: &'a F,
}

impl<'a, R, F> DataFormatBuilder<'a, R, F>
where
    R: TypeResolver<dyn NamespacePrefixMapper> + ?Sized,
    F: CodecFactory + ?Sized,
{
    /// 绑定解析器与工厂。
    pub fn new(resolver: &'a R, codec_factory: &'a F) -> Self {
        Self {
            resolver,
            codec_factory,
        }
    }

    /// 构建单个描述符，等价于 [`build`]。
    pub fn build(&self, descriptor: &XmlBindingDescriptor) -> Result<F::Codec, BuildError> {
        build(descriptor, self.resolver, self.codec_factory)
    }
}

impl<R: ?Sized, F: ?Sized> Clone for DataFormatBuilder<'_, R, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized, F: ?Sized> Copy for DataFormatBuilder<'_, R, F> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TypedCodecFactory;
    use crate::error::{BuildErrorKind, CodecFactoryError};
    use crate::mapper::StaticPrefixMapper;
    use crate::resolver::TypeRegistry;
    use crate::test_stubs::{RecordingCodec, RejectingCodec};
    use tracing_test::traced_test;

    fn registry() -> TypeRegistry<dyn NamespacePrefixMapper> {
        let registry = TypeRegistry::new();
        registry
            .register_mapper::<StaticPrefixMapper>(StaticPrefixMapper::TYPE_NAME)
            .expect("register mapper");
        registry
    }

    #[test]
    fn configure_writes_properties_in_declared_order() {
        let mut descriptor = XmlBindingDescriptor::new("com.example.orders");
        descriptor.set_partial_target_type_name(Some("com.example.Item".to_owned()));
        descriptor.set_partial_target_namespace(Some("{urn:example}Item".to_owned()));
        descriptor.set_encoding(Some("UTF-8".to_owned()));
        let mapper: ResolvedPrefixMapper = Arc::new(StaticPrefixMapper::new());

        let mut codec = RecordingCodec::new("com.example.orders");
        configure(&mut codec, &descriptor, Some(mapper)).expect("configure");

        let order: Vec<_> = codec.assignments().iter().map(|(p, _)| *p).collect();
        assert_eq!(
            order,
            vec![
                CodecProperty::PrettyPrint,
                CodecProperty::IgnoreWrapperElement,
                CodecProperty::FilterNonTextChars,
                CodecProperty::FragmentMode,
                CodecProperty::PartialTargetTypeName,
                CodecProperty::PartialTargetNamespace,
                CodecProperty::Encoding,
                CodecProperty::ContextIdentifier,
                CodecProperty::NamespacePrefixMapper,
            ]
        );
    }

    #[test]
    fn malformed_namespace_stops_before_writing_it() {
        let mut descriptor = XmlBindingDescriptor::new("ctx");
        descriptor.set_partial_target_type_name(Some("com.example.Item".to_owned()));
        descriptor.set_partial_target_namespace(Some("{urn:example".to_owned()));
        descriptor.set_encoding(Some("UTF-8".to_owned()));

        let mut codec = RecordingCodec::new("ctx");
        let err = configure(&mut codec, &descriptor, None).expect_err("invalid qname");

        assert_eq!(err.kind(), BuildErrorKind::InvalidQualifiedName);
        assert!(codec.value(CodecProperty::PartialTargetTypeName).is_some());
        assert_eq!(codec.count(CodecProperty::PartialTargetNamespace), 0);
        assert_eq!(codec.count(CodecProperty::Encoding), 0);
        assert_eq!(codec.count(CodecProperty::ContextIdentifier), 0);
    }

    #[test]
    fn absent_mapper_name_skips_the_resolver() {
        let descriptor = XmlBindingDescriptor::new("ctx");
        let empty: TypeRegistry<dyn NamespacePrefixMapper> = TypeRegistry::new();
        let resolved = resolve_auxiliary_types(&descriptor, &empty).expect("nothing to resolve");
        assert!(resolved.is_none());
    }

    #[test]
    fn blank_context_identifier_is_rejected_before_instantiation() {
        let descriptor = XmlBindingDescriptor::new("  \t");
        let factory = TypedCodecFactory::new(|_: &str| -> Result<RecordingCodec, CodecFactoryError> {
            panic!("factory must not be called for a blank context")
        });
        let err = build(&descriptor, &registry(), &factory).expect_err("blank context");
        assert_eq!(err.kind(), BuildErrorKind::MissingContextIdentifier);
        assert_eq!(err.code(), "dataformat.descriptor.missing_context");
    }

    #[test]
    fn factory_failure_is_wrapped() {
        let descriptor = XmlBindingDescriptor::new("ctx");
        let factory = TypedCodecFactory::new(|ctx: &str| -> Result<RecordingCodec, CodecFactoryError> {
            Err(CodecFactoryError::new(format!("unknown context `{ctx}`")))
        });
        let err = build(&descriptor, &registry(), &factory).expect_err("factory fails");
        assert_eq!(err.kind(), BuildErrorKind::CodecInstantiationFailed);
        let source = std::error::Error::source(&err).expect("cause kept");
        assert_eq!(source.to_string(), "unknown context `ctx`");
    }

    #[test]
    fn codec_rejection_aborts_the_build() {
        let descriptor = XmlBindingDescriptor::new("ctx");
        let factory = TypedCodecFactory::new(|_: &str| {
            Ok::<_, CodecFactoryError>(RejectingCodec::new(CodecProperty::FragmentMode))
        });
        let err = build(&descriptor, &registry(), &factory).expect_err("rejected");
        assert_eq!(err.kind(), BuildErrorKind::PropertyRejected);
        match err {
            BuildError::PropertyRejected(rejected) => {
                assert_eq!(rejected.property(), CodecProperty::FragmentMode);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn builder_handle_is_reusable() {
        let registry = registry();
        let factory = TypedCodecFactory::new(|ctx: &str| Ok::<_, CodecFactoryError>(RecordingCodec::new(ctx)));
        let builder = DataFormatBuilder::new(&registry, &factory);
        let first = builder
            .build(&XmlBindingDescriptor::new("a"))
            .expect("first build");
        let second = builder
            .build(&XmlBindingDescriptor::new("b"))
            .expect("second build");
        assert_eq!(first.created_for(), "a");
        assert_eq!(second.created_for(), "b");
    }

    #[test]
    #[traced_test]
    fn successful_build_traces_property_assignments() {
        let mut descriptor = XmlBindingDescriptor::new("ctx");
        descriptor.set_namespace_prefix_mapper_type_name(Some(
            StaticPrefixMapper::TYPE_NAME.to_owned(),
        ));
        let factory = TypedCodecFactory::new(|ctx: &str| Ok::<_, CodecFactoryError>(RecordingCodec::new(ctx)));
        build(&descriptor, &registry(), &factory).expect("build succeeds");

        assert!(logs_contain("resolved namespace prefix mapper"));
        assert!(logs_contain("apply codec property"));
        assert!(logs_contain("data format codec configured"));
    }

    #[test]
    #[traced_test]
    fn failed_build_logs_the_error_code() {
        let mut descriptor = XmlBindingDescriptor::new("ctx");
        descriptor.set_namespace_prefix_mapper_type_name(Some("com.example.Missing".to_owned()));
        let factory = TypedCodecFactory::new(|ctx: &str| Ok::<_, CodecFactoryError>(RecordingCodec::new(ctx)));
        let err = build(&descriptor, &registry(), &factory).expect_err("unknown mapper");

        assert_eq!(err.kind(), BuildErrorKind::AuxiliaryTypeResolutionFailed);
        assert!(logs_contain("data format build failed"));
        assert!(logs_contain("dataformat.aux_type.resolution_failed"));
    }
}
