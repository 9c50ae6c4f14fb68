//! # 类型解析：按名称取得可实例化的类型
//!
//! ## 核心意图（Why）
//! - 描述符只在配置加载时才给出辅助类型的名称，名称到具体类型的映射属于宿主环境
//!   （插件注册表、编译期工厂表等），构建器不能自行决定；
//! - 因此以 [`TypeResolver`] 抽象“名称进、类型句柄或未找到出”的契约，由宿主注入。
//!
//! ## 行为契约（What）
//! - `resolve`：命中时返回 [`TypeHandle`]，否则返回 [`TypeNotFoundError`]；
//! - [`TypeHandle::instantiate`]：调用零参构造器创建**新**实例，每次调用互不共享；
//! - [`TypeRegistry`]：基于 `DashMap` 的并发安全实现，构建期间只读访问，可被多个构建并行使用。
//!
//! ## 风险提示（Trade-offs）
//! - `DashMap` 的读 guard 在持有期间会阻塞同分片写入，`resolve` 只克隆句柄后立即释放 guard；
//! - 注册表拒绝同名覆盖，热替换类型需先 `unregister` 再 `register`。

use std::fmt;
use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};

use crate::error::{InstantiationError, RegistrationError, TypeNotFoundError};
use crate::mapper::NamespacePrefixMapper;

type Constructor<T> = dyn Fn() -> Result<Arc<T>, InstantiationError> + Send + Sync;

/// 已解析类型的句柄：类型名称加可选的零参构造器。
pub struct TypeHandle<T: ?Sized> {
    name: Arc<str>,
    constructor: Option<Arc<Constructor<T>>>,
}

impl<T: ?Sized> TypeHandle<T> {
    /// 以零参构造器登记类型。
    pub fn with_constructor<F>(name: &str, constructor: F) -> Self
    where
        F: Fn() -> Result<Arc<T>, InstantiationError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            constructor: Some(Arc::new(constructor)),
        }
    }

    /// 登记一个可被解析、但没有可用零参构造器的类型。
    pub fn abstract_type(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            constructor: None,
        }
    }

    /// 类型名称。
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否具备零参构造器。
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// 调用零参构造器创建新实例。
    pub fn instantiate(&self) -> Result<Arc<T>, InstantiationError> {
        match &self.constructor {
            Some(constructor) => constructor(),
            None => Err(InstantiationError::NoZeroArgConstructor {
                name: self.name.as_ref().to_owned(),
            }),
        }
    }
}

impl<T: ?Sized> Clone for TypeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            constructor: self.constructor.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for TypeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("name", &self.name)
            .field("instantiable", &self.is_instantiable())
            .finish()
    }
}

/// 名称到类型句柄的解析契约。
///
/// 实现必须允许并发只读访问：多个构建可能同时解析。
pub trait TypeResolver<T: ?Sized>: Send + Sync {
    /// 解析全限定类型名称。
    fn resolve(&self, name: &str) -> Result<TypeHandle<T>, TypeNotFoundError>;
}

impl<T: ?Sized, R: TypeResolver<T> + ?Sized> TypeResolver<T> for Arc<R> {
    fn resolve(&self, name: &str) -> Result<TypeHandle<T>, TypeNotFoundError> {
        (**self).resolve(name)
    }
}

/// 基于 `DashMap` 的类型注册表。
///
/// # 教案式注释
/// - **意图 (Why)**：为宿主提供开箱即用的“编译期工厂表”式解析器；
/// - **契约 (What)**：内部以 `Arc<str>` 为键，同名类型只能登记一次；
/// - **风险 (Trade-offs)**：未内建按前缀或通配符查找，名称必须完全匹配。
pub struct TypeRegistry<T: ?Sized> {
    types: DashMap<Arc<str>, TypeHandle<T>>,
}

impl<T: ?Sized> TypeRegistry<T> {
    /// 创建空注册表。
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
        }
    }

    /// 登记类型句柄，同名已存在时返回 [`RegistrationError::Duplicate`]。
    pub fn register(&self, handle: TypeHandle<T>) -> Result<(), RegistrationError> {
        match self.types.entry(Arc::clone(&handle.name)) {
            Entry::Occupied(_) => Err(RegistrationError::Duplicate {
                name: handle.name.as_ref().to_owned(),
            }),
            Entry::Vacant(vacant) => {
                tracing::debug!(type_name = %handle.name, "registered auxiliary type");
                vacant.insert(handle);
                Ok(())
            }
        }
    }

    /// 移除并返回类型句柄。
    pub fn unregister(&self, name: &str) -> Option<TypeHandle<T>> {
        self.types.remove(name).map(|(_, handle)| handle)
    }

    /// 是否登记了指定名称。
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// 已登记类型数量。
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// 注册表是否为空。
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry<dyn NamespacePrefixMapper> {
    /// 以 `M::default` 作为零参构造器登记映射器类型。
    pub fn register_mapper<M>(&self, name: &str) -> Result<(), RegistrationError>
    where
        M: NamespacePrefixMapper + Default + 'static,
    {
        self.register(TypeHandle::with_constructor(name, || {
            Ok(Arc::new(M::default()) as Arc<dyn NamespacePrefixMapper>)
        }))
    }
}

impl<T: ?Sized> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("len", &self.types.len())
            .finish()
    }
}

impl<T: ?Sized> TypeResolver<T> for TypeRegistry<T> {
    fn resolve(&self, name: &str) -> Result<TypeHandle<T>, TypeNotFoundError> {
        self.types
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TypeNotFoundError::new(name))
    }
}
