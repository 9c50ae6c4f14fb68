//! 缺省值规则的性质测试。
//!
//! # 测试目标（Why）
//! - `prettyPrint` 与 `ignoreWrapperElement` 缺省为开，`filterNonTextChars` 与 `fragmentMode` 缺省为关；
//! - 显式声明的值无论极性都原样写入；
//! - 四个布尔选项在每次构建中都恰好写入一次。
//!
//! # 测试方法（How）
//! - 以 `proptest` 枚举四个 `Option<bool>` 的全部组合，并随机搭配字符串选项，
//!   断言编解码器记录的最终值等于“声明值或缺省值”。

use proptest::prelude::*;

use spark_dataformat::test_stubs::RecordingCodec;
use spark_dataformat::{
    BOOLEAN_POLICY, BooleanDefault, CodecFactoryError, CodecProperty, NamespacePrefixMapper,
    TypeRegistry, TypedCodecFactory, XmlBindingDescriptor, build,
};

fn build_recording(descriptor: &XmlBindingDescriptor) -> RecordingCodec {
    let registry: TypeRegistry<dyn NamespacePrefixMapper> = TypeRegistry::new();
    let factory = TypedCodecFactory::new(|ctx: &str| -> Result<RecordingCodec, CodecFactoryError> {
        Ok(RecordingCodec::new(ctx))
    });
    build(descriptor, &registry, &factory).expect("descriptor without aux types builds")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn boolean_options_follow_declared_or_default(
        pretty_print in proptest::option::of(any::<bool>()),
        ignore_wrapper_element in proptest::option::of(any::<bool>()),
        filter_non_text_chars in proptest::option::of(any::<bool>()),
        fragment_mode in proptest::option::of(any::<bool>()),
        encoding in proptest::option::of("[A-Z]{3,5}-[0-9]{1,4}"),
    ) {
        let mut descriptor = XmlBindingDescriptor::new("com.example.model");
        descriptor.set_pretty_print(pretty_print);
        descriptor.set_ignore_wrapper_element(ignore_wrapper_element);
        descriptor.set_filter_non_text_chars(filter_non_text_chars);
        descriptor.set_fragment_mode(fragment_mode);
        descriptor.set_encoding(encoding.clone());

        let codec = build_recording(&descriptor);

        prop_assert_eq!(
            codec.bool_value(CodecProperty::PrettyPrint),
            Some(pretty_print.unwrap_or(true))
        );
        prop_assert_eq!(
            codec.bool_value(CodecProperty::IgnoreWrapperElement),
            Some(ignore_wrapper_element.unwrap_or(true))
        );
        prop_assert_eq!(
            codec.bool_value(CodecProperty::FilterNonTextChars),
            Some(filter_non_text_chars.unwrap_or(false))
        );
        prop_assert_eq!(
            codec.bool_value(CodecProperty::FragmentMode),
            Some(fragment_mode.unwrap_or(false))
        );

        for (property, _, _) in BOOLEAN_POLICY {
            prop_assert_eq!(codec.count(property), 1);
        }
        prop_assert_eq!(codec.count(CodecProperty::Encoding), usize::from(encoding.is_some()));
        prop_assert_eq!(codec.count(CodecProperty::ContextIdentifier), 1);
    }

    #[test]
    fn policy_table_agrees_with_declared_flags(declared in proptest::option::of(any::<bool>())) {
        for (property, default, _) in BOOLEAN_POLICY {
            let mut descriptor = XmlBindingDescriptor::new("ctx");
            match property {
                CodecProperty::PrettyPrint => descriptor.set_pretty_print(declared),
                CodecProperty::IgnoreWrapperElement => descriptor.set_ignore_wrapper_element(declared),
                CodecProperty::FilterNonTextChars => descriptor.set_filter_non_text_chars(declared),
                CodecProperty::FragmentMode => descriptor.set_fragment_mode(declared),
                other => prop_assert!(false, "unexpected boolean property {other}"),
            }

            let codec = build_recording(&descriptor);
            prop_assert_eq!(codec.bool_value(property), Some(default.effective(declared)));
        }
    }
}

#[test]
fn absent_flags_produce_the_asymmetric_defaults() {
    let codec = build_recording(&XmlBindingDescriptor::new("ctx"));
    assert_eq!(codec.bool_value(CodecProperty::PrettyPrint), Some(true));
    assert_eq!(codec.bool_value(CodecProperty::IgnoreWrapperElement), Some(true));
    assert_eq!(codec.bool_value(CodecProperty::FilterNonTextChars), Some(false));
    assert_eq!(codec.bool_value(CodecProperty::FragmentMode), Some(false));
}

#[test]
fn policy_table_lists_each_boolean_once() {
    let on: Vec<_> = BOOLEAN_POLICY
        .iter()
        .filter(|(_, default, _)| *default == BooleanDefault::On)
        .map(|(property, _, _)| *property)
        .collect();
    assert_eq!(
        on,
        vec![CodecProperty::PrettyPrint, CodecProperty::IgnoreWrapperElement]
    );
}
