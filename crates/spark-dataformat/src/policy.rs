//! 布尔选项的缺省值替换规则。
//!
//! 四个布尔选项无论是否声明都会写入编解码器，但缺省极性并不相同：
//! `prettyPrint` 与 `ignoreWrapperElement` 缺省开启，`filterNonTextChars` 与 `fragmentMode` 缺省关闭。
//! 这一不对称无法从选项本身推导，故集中登记在 [`BOOLEAN_POLICY`] 中，构建器只查表。

use crate::codec::CodecProperty;
use crate::descriptor::XmlBindingDescriptor;

/// 布尔选项的缺省极性。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BooleanDefault {
    /// 仅当显式声明为 `false` 时关闭。
    On,
    /// 仅当显式声明为 `true` 时开启。
    Off,
}

impl BooleanDefault {
    /// 根据声明值计算最终写入编解码器的值。
    #[inline]
    pub const fn effective(self, declared: Option<bool>) -> bool {
        match self {
            Self::On => !matches!(declared, Some(false)),
            Self::Off => matches!(declared, Some(true)),
        }
    }
}

/// 从描述符读取某个布尔选项的声明值。
pub type DeclaredFlag = fn(&XmlBindingDescriptor) -> Option<bool>;

/// 布尔选项表：属性、缺省极性、描述符中的读取方式。按写入顺序排列。
pub const BOOLEAN_POLICY: [(CodecProperty, BooleanDefault, DeclaredFlag); 4] = [
    (
        CodecProperty::PrettyPrint,
        BooleanDefault::On,
        XmlBindingDescriptor::pretty_print,
    ),
    (
        CodecProperty::IgnoreWrapperElement,
        BooleanDefault::On,
        XmlBindingDescriptor::ignore_wrapper_element,
    ),
    (
        CodecProperty::FilterNonTextChars,
        BooleanDefault::Off,
        XmlBindingDescriptor::filter_non_text_chars,
    ),
    (
        CodecProperty::FragmentMode,
        BooleanDefault::Off,
        XmlBindingDescriptor::fragment_mode,
    ),
];

/// 查询某个布尔属性的缺省极性；非布尔属性返回 `None`。
pub fn boolean_default(property: CodecProperty) -> Option<BooleanDefault> {
    BOOLEAN_POLICY
        .iter()
        .find(|(candidate, _, _)| *candidate == property)
        .map(|(_, default, _)| *default)
}
