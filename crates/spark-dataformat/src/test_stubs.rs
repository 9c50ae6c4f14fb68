//! 测试桩：记录或拒绝属性赋值的编解码器。
//!
//! # 设计背景（Why）
//! - 构建器只通过 [`ConfigurableCodec`] 与编解码器交互，断言“写了什么、写了几次、按什么顺序写”
//!   即可覆盖全部行为；
//! - 集中维护桩对象，单元测试、集成测试与宿主侧示例共用同一实现。

use crate::codec::{CodecProperty, ConfigurableCodec, PropertyValue};
use crate::error::PropertyRejected;

/// 按调用顺序记录每一次属性赋值的编解码器。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingCodec {
    created_for: String,
    assignments: Vec<(CodecProperty, PropertyValue)>,
}

impl RecordingCodec {
    /// 模拟工厂以上下文标识创建实例。
    pub fn new(context_identifier: &str) -> Self {
        Self {
            created_for: context_identifier.to_owned(),
            assignments: Vec::new(),
        }
    }

    /// 工厂创建实例时收到的上下文标识。
    pub fn created_for(&self) -> &str {
        &self.created_for
    }

    /// 全部赋值，按调用顺序排列。
    pub fn assignments(&self) -> &[(CodecProperty, PropertyValue)] {
        &self.assignments
    }

    /// 某属性最后一次被写入的值。
    pub fn value(&self, property: CodecProperty) -> Option<&PropertyValue> {
        self.assignments
            .iter()
            .rev()
            .find(|(candidate, _)| *candidate == property)
            .map(|(_, value)| value)
    }

    /// 某属性被写入的次数。
    pub fn count(&self, property: CodecProperty) -> usize {
        self.assignments
            .iter()
            .filter(|(candidate, _)| *candidate == property)
            .count()
    }

    /// 布尔属性的最终值。
    pub fn bool_value(&self, property: CodecProperty) -> Option<bool> {
        self.value(property).and_then(PropertyValue::as_bool)
    }
}

impl ConfigurableCodec for RecordingCodec {
    fn set_property(
        &mut self,
        property: CodecProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyRejected> {
        self.assignments.push((property, value));
        Ok(())
    }
}

/// 拒绝某一个属性、接受其余属性的编解码器。
#[derive(Clone, Debug)]
pub struct RejectingCodec {
    rejected: CodecProperty,
    accepted: Vec<CodecProperty>,
}

impl RejectingCodec {
    /// 创建拒绝 `rejected` 的实例。
    pub fn new(rejected: CodecProperty) -> Self {
        Self {
            rejected,
            accepted: Vec::new(),
        }
    }

    /// 已接受的属性，按调用顺序排列。
    pub fn accepted(&self) -> &[CodecProperty] {
        &self.accepted
    }
}

impl ConfigurableCodec for RejectingCodec {
    fn set_property(
        &mut self,
        property: CodecProperty,
        _value: PropertyValue,
    ) -> Result<(), PropertyRejected> {
        if property == self.rejected {
            return Err(PropertyRejected::new(property, "property is not supported"));
        }
        self.accepted.push(property);
        Ok(())
    }
}
