//! Matrix factories.
//!
//! One [`MatrixFactory`] exists per value type × storage type combination.
//! A [`FactoryRegistry`] owns them and is passed to, or owned by, the
//! application; there is no process-wide singleton. Applications may
//! register their own factories to override a combination.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::{Coordinates, FactoryRegistry, MatrixConfig, StorageType, ValueType};
//!
//! let registry = FactoryRegistry::with_config(
//!     MatrixConfig::new().with_default_storage(StorageType::Sparse),
//! );
//! let m = registry.zeros(ValueType::Int, &[100, 100]).unwrap();
//! assert_eq!(m.storage_type(), StorageType::Sparse);
//! m.set_as_int(3, &Coordinates::at(5, 5)).unwrap();
//!
//! let copy = registry
//!     .copy_of(m.as_ref(), ValueType::Double, StorageType::Dense)
//!     .unwrap();
//! assert_eq!(copy.get_as_double(&Coordinates::at(5, 5)).unwrap(), 3.0);
//! ```

use crate::config::MatrixConfig;
use crate::dense::DenseMatrix;
use crate::element::Element;
use crate::error::{MatrixError, MatrixResult};
use crate::matrix::{Matrix, MatrixRef};
use crate::sparse::SparseMatrix;
use crate::types::{StorageType, ValueType};
use crate::value::Value;
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Run `$body` with `$t` bound to the element type of `$vt`.
macro_rules! with_element_type {
    ($vt:expr, $t:ident => $body:expr) => {
        match $vt {
            ValueType::Boolean => {
                type $t = bool;
                $body
            }
            ValueType::Byte => {
                type $t = i8;
                $body
            }
            ValueType::Short => {
                type $t = i16;
                $body
            }
            ValueType::Char => {
                type $t = char;
                $body
            }
            ValueType::Int => {
                type $t = i32;
                $body
            }
            ValueType::Long => {
                type $t = i64;
                $body
            }
            ValueType::Float => {
                type $t = f32;
                $body
            }
            ValueType::Double => {
                type $t = f64;
                $body
            }
            ValueType::BigInteger => {
                type $t = BigInt;
                $body
            }
            ValueType::Object => {
                type $t = Value;
                $body
            }
            ValueType::String => {
                type $t = String;
                $body
            }
        }
    };
}

/// Constructor for one value type × storage type combination.
pub trait MatrixFactory: Send + Sync + fmt::Debug {
    fn value_type(&self) -> ValueType;

    fn storage_type(&self) -> StorageType;

    /// Matrix of default values.
    fn zeros(&self, size: &[usize]) -> MatrixRef;

    /// Copy of `source` converted to this factory's value type.
    fn copy_of(&self, source: &dyn Matrix) -> MatrixResult<MatrixRef>;

    /// Dense matrix of this factory's value type, whatever its storage.
    fn dense(&self, size: &[usize]) -> MatrixRef {
        create_matrix(self.value_type(), StorageType::Dense, size)
    }
}

/// Factory for [`DenseMatrix<T>`].
pub struct DenseFactory<T: Element> {
    _element: PhantomData<fn() -> T>,
}

impl<T: Element> DenseFactory<T> {
    pub fn new() -> Self {
        Self {
            _element: PhantomData,
        }
    }
}

impl<T: Element> Default for DenseFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> fmt::Debug for DenseFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DenseFactory<{}>", T::VALUE_TYPE)
    }
}

impl<T: Element> MatrixFactory for DenseFactory<T> {
    fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Dense
    }

    fn zeros(&self, size: &[usize]) -> MatrixRef {
        Arc::new(DenseMatrix::<T>::zeros(size))
    }

    fn copy_of(&self, source: &dyn Matrix) -> MatrixResult<MatrixRef> {
        let copy = DenseMatrix::<T>::zeros(source.size());
        copy.copy_from(source)?;
        Ok(Arc::new(copy))
    }
}

/// Factory for [`SparseMatrix<T>`], optionally capping entries.
pub struct SparseFactory<T: Element> {
    max_entries: Option<usize>,
    _element: PhantomData<fn() -> T>,
}

impl<T: Element> SparseFactory<T> {
    pub fn new() -> Self {
        Self {
            max_entries: None,
            _element: PhantomData,
        }
    }

    pub fn with_max_entries(max_entries: Option<usize>) -> Self {
        Self {
            max_entries,
            _element: PhantomData,
        }
    }

    fn empty(&self, size: &[usize]) -> SparseMatrix<T> {
        match self.max_entries {
            Some(max) => SparseMatrix::with_max_entries(size, max),
            None => SparseMatrix::zeros(size),
        }
    }
}

impl<T: Element> Default for SparseFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> fmt::Debug for SparseFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SparseFactory<{}>(max_entries={:?})", T::VALUE_TYPE, self.max_entries)
    }
}

impl<T: Element> MatrixFactory for SparseFactory<T> {
    fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Sparse
    }

    fn zeros(&self, size: &[usize]) -> MatrixRef {
        Arc::new(self.empty(size))
    }

    fn copy_of(&self, source: &dyn Matrix) -> MatrixResult<MatrixRef> {
        let copy = self.empty(source.size());
        copy.copy_from(source)?;
        Ok(Arc::new(copy))
    }
}

/// Zero-filled matrix of any value type × storage type combination.
pub fn create_matrix(value_type: ValueType, storage_type: StorageType, size: &[usize]) -> MatrixRef {
    with_element_type!(value_type, T => match storage_type {
        StorageType::Dense => Arc::new(DenseMatrix::<T>::zeros(size)) as MatrixRef,
        StorageType::Sparse => Arc::new(SparseMatrix::<T>::zeros(size)) as MatrixRef,
    })
}

fn default_factory(
    value_type: ValueType,
    storage_type: StorageType,
    max_sparse_entries: Option<usize>,
) -> Arc<dyn MatrixFactory> {
    with_element_type!(value_type, T => match storage_type {
        StorageType::Dense => Arc::new(DenseFactory::<T>::new()) as Arc<dyn MatrixFactory>,
        StorageType::Sparse => {
            Arc::new(SparseFactory::<T>::with_max_entries(max_sparse_entries)) as Arc<dyn MatrixFactory>
        }
    })
}

/// Owned registry of factories keyed by value type and storage type.
#[derive(Debug)]
pub struct FactoryRegistry {
    config: MatrixConfig,
    factories: HashMap<(ValueType, StorageType), Arc<dyn MatrixFactory>>,
}

impl FactoryRegistry {
    /// Registry with a factory for every combination and default settings.
    pub fn with_defaults() -> Self {
        Self::with_config(MatrixConfig::default())
    }

    /// Registry with a factory for every combination, honouring `config`.
    pub fn with_config(config: MatrixConfig) -> Self {
        let mut factories = HashMap::new();
        for value_type in ValueType::ALL {
            for storage_type in [StorageType::Dense, StorageType::Sparse] {
                factories.insert(
                    (value_type, storage_type),
                    default_factory(value_type, storage_type, config.max_sparse_entries),
                );
            }
        }
        tracing::debug!(
            default_storage = %config.default_storage,
            max_sparse_entries = ?config.max_sparse_entries,
            factories = factories.len(),
            "factory registry ready"
        );
        Self { config, factories }
    }

    /// Registry without any factories.
    pub fn empty(config: MatrixConfig) -> Self {
        Self {
            config,
            factories: HashMap::new(),
        }
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Install a factory, returning the one it replaces.
    pub fn register(&mut self, factory: Arc<dyn MatrixFactory>) -> Option<Arc<dyn MatrixFactory>> {
        let key = (factory.value_type(), factory.storage_type());
        tracing::debug!(value_type = %key.0, storage_type = %key.1, "registering factory");
        self.factories.insert(key, factory)
    }

    /// Factory for a combination.
    ///
    /// # Errors
    ///
    /// `Unsupported` if nothing is registered for it.
    pub fn get(&self, value_type: ValueType, storage_type: StorageType) -> MatrixResult<Arc<dyn MatrixFactory>> {
        self.factories
            .get(&(value_type, storage_type))
            .cloned()
            .ok_or_else(|| {
                MatrixError::unsupported(
                    "factory lookup",
                    format!("no factory registered for {} {}", storage_type, value_type),
                )
            })
    }

    /// Zero matrix using the configured default storage.
    pub fn zeros(&self, value_type: ValueType, size: &[usize]) -> MatrixResult<MatrixRef> {
        self.zeros_with(value_type, self.config.default_storage, size)
    }

    pub fn zeros_with(
        &self,
        value_type: ValueType,
        storage_type: StorageType,
        size: &[usize],
    ) -> MatrixResult<MatrixRef> {
        Ok(self.get(value_type, storage_type)?.zeros(size))
    }

    /// Converted copy of `source`.
    pub fn copy_of(
        &self,
        source: &dyn Matrix,
        value_type: ValueType,
        storage_type: StorageType,
    ) -> MatrixResult<MatrixRef> {
        self.get(value_type, storage_type)?.copy_of(source)
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
