#![deny(unsafe_code)]
#![doc = "spark-dataformat: 将声明式 XML 绑定描述符装配为已配置的编解码实例。"]
#![doc = ""]
#![doc = "== 构建流程 =="]
#![doc = "描述符（通常由 [`DescriptorCatalog`] 从路由配置加载）→ 校验上下文标识 → 宿主工厂创建编解码器 → 类型解析器解析命名空间前缀映射器 → 按缺省值规则写入属性 → 返回编解码器。"]
#![doc = ""]
#![doc = "== 协作方 =="]
#![doc = "真正的编组/解组算法、类型名称到具体类型的映射都属于宿主：本 crate 只依赖 [`ConfigurableCodec`]、[`CodecFactory`] 与 [`TypeResolver`] 三个窄接口，并提供 [`TypeRegistry`] 作为开箱即用的解析器。"]

pub mod builder;
pub mod catalog;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod mapper;
pub mod policy;
pub mod qname;
pub mod resolver;
/// 测试桩命名空间，集中暴露记录型与拒绝型编解码器，供单元测试、集成测试与示例复用。
pub mod test_stubs;

pub use builder::{
    DataFormatBuilder, ResolvedPrefixMapper, build, configure, resolve_auxiliary_types,
};
pub use catalog::DescriptorCatalog;
pub use codec::{CodecFactory, CodecProperty, ConfigurableCodec, PropertyValue, TypedCodecFactory};
pub use descriptor::{DataFormatKind, XmlBindingDescriptor};
pub use error::{
    AuxiliaryTypeError, BuildError, BuildErrorKind, CodecFactoryError, DescriptorLoadError,
    InstantiationError, InvalidQualifiedName, PropertyRejected, QualifiedNameIssue,
    RegistrationError, TypeNotFoundError,
};
pub use mapper::{NamespacePrefixMapper, StaticPrefixMapper};
pub use policy::{BOOLEAN_POLICY, BooleanDefault};
pub use qname::QualifiedName;
pub use resolver::{TypeHandle, TypeRegistry, TypeResolver};
