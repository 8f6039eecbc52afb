//! Calculation nodes.
//!
//! A [`CalculationNode`] is a [`Matrix`] whose cells are computed by a
//! [`Calculation`] from one or more source matrices. Nodes hold their
//! sources by shared reference and never copy them, so a node read in link
//! mode always reflects the current source state. [`evaluate`] turns a node
//! into the caller's requested delivery: the node itself, a fresh matrix, or
//! a write-back into the first source.
//!
//! Nodes form a DAG. A node cannot exist before its sources, so the only
//! way to build a cycle is [`CalculationNode::replace_source`], which
//! rejects any replacement that (transitively) reaches the node itself.
//!
//! # Change propagation
//!
//! Every node subscribes a forwarder to each source's observers. When a
//! source changes, the forwarder drops the calculation's memoised
//! aggregates and notifies the node's own subscribers, so changes travel
//! downstream through a chain of nodes. Forwarders hold weak references and
//! are removed when the node is dropped or the source is replaced.
//!
//! # Examples
//!
//! ```
//! use omnimat_calc::{evaluate, CalcOptions, CalculationNode, EvalMode, UnaryCalculation, UnaryOp};
//! use omnimat_core::{Coordinates, DenseMatrix, Matrix, MatrixRef};
//! use std::sync::Arc;
//!
//! let source: MatrixRef = Arc::new(DenseMatrix::from_column_major(vec![1.0, 4.0, 9.0, 16.0], &[2, 2]).unwrap());
//! let node = CalculationNode::new(UnaryCalculation::new(UnaryOp::Sqrt), vec![source.clone()]).unwrap();
//! assert_eq!(node.get_as_double(&Coordinates::at(1, 1)).unwrap(), 4.0);
//!
//! let snapshot = evaluate(node.clone(), EvalMode::New, &CalcOptions::default()).unwrap();
//! source.set_as_double(25.0, &Coordinates::at(1, 1)).unwrap();
//! assert_eq!(node.get_as_double(&Coordinates::at(1, 1)).unwrap(), 5.0);
//! assert_eq!(snapshot.get_as_double(&Coordinates::at(1, 1)).unwrap(), 4.0);
//! ```

use crate::options::{CalcOptions, Dimension, EvalMode};
use omnimat_core::{
    create_matrix, AllCoordinates, Annotation, ConstructionError, CoordinateIter, Coordinates, Matrix, MatrixError,
    MatrixHeader, MatrixId, MatrixRef, MatrixResult, Observers, StorageType, SubscriptionId, Value, ValueType,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};

/// A transform from source matrices to cell values.
///
/// Implementations validate their sources in [`Calculation::output_size`],
/// which runs at construction and on every source replacement, so `get` may
/// assume the source count and sizes it accepted there.
pub trait Calculation: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Value type of the produced cells.
    fn value_type(&self) -> ValueType;

    fn dimension(&self) -> Dimension {
        Dimension::All
    }

    /// Whether repeated reads over unchanged sources return the same values.
    fn is_idempotent(&self) -> bool {
        true
    }

    /// Whether the calculation memoises an aggregate of its sources, which
    /// is only sound for sources that read the same values every time.
    fn requires_repeatable_sources(&self) -> bool {
        false
    }

    /// Size of the output for `sources`, or the reason they are invalid.
    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>>;

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value>;

    /// Write through to the sources. Read-only unless overridden.
    fn set(&self, _sources: &[MatrixRef], _value: Value, _coordinates: &Coordinates) -> MatrixResult<()> {
        Err(MatrixError::unsupported(self.name(), "calculation is read-only"))
    }

    /// Drop memoised intermediate results.
    fn invalidate(&self) {}
}

/// Check the number of sources a calculation was given.
pub fn expect_sources(operation: &str, sources: &[MatrixRef], count: usize) -> MatrixResult<()> {
    if sources.len() != count {
        return Err(MatrixError::invalid_argument(format!(
            "{} takes {} source(s), got {}",
            operation,
            count,
            sources.len()
        )));
    }
    Ok(())
}

/// Check that a source is two-dimensional.
pub fn expect_2d(operation: &str, source: &MatrixRef) -> MatrixResult<()> {
    if source.dimension_count() != 2 {
        return Err(ConstructionError::DimensionMismatch {
            operation: operation.to_string(),
            expected: 2,
            got: source.dimension_count(),
        }
        .into());
    }
    Ok(())
}

/// Matrix view computed on demand by a [`Calculation`].
pub struct CalculationNode {
    header: MatrixHeader,
    calculation: Box<dyn Calculation>,
    sources: RwLock<Vec<MatrixRef>>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
    this: Weak<CalculationNode>,
}

impl CalculationNode {
    /// Build a node over `sources`.
    ///
    /// # Errors
    ///
    /// Construction errors from the calculation's source validation, and
    /// `NonRepeatableSource` when a memoising calculation gets a
    /// non-idempotent source.
    pub fn new<C>(calculation: C, sources: Vec<MatrixRef>) -> MatrixResult<Arc<Self>>
    where
        C: Calculation + 'static,
    {
        Self::from_boxed(Box::new(calculation), sources)
    }

    pub fn from_boxed(calculation: Box<dyn Calculation>, sources: Vec<MatrixRef>) -> MatrixResult<Arc<Self>> {
        if calculation.requires_repeatable_sources() && sources.iter().any(|s| !s.is_idempotent()) {
            tracing::warn!(calculation = calculation.name(), "rejecting non-repeatable source");
            return Err(ConstructionError::NonRepeatableSource {
                operation: calculation.name().to_string(),
            }
            .into());
        }
        let size = calculation.output_size(&sources)?;

        let node = Arc::new_cyclic(|this: &Weak<CalculationNode>| {
            let subscriptions = sources.iter().map(|s| subscribe_forwarder(s, this.clone())).collect();
            CalculationNode {
                header: MatrixHeader::new(&size),
                calculation,
                sources: RwLock::new(sources),
                subscriptions: Mutex::new(subscriptions),
                this: this.clone(),
            }
        });
        tracing::debug!(
            node = %node.id(),
            calculation = node.calculation.name(),
            size = ?node.size(),
            sources = node.sources.read().len(),
            "calculation node built"
        );
        Ok(node)
    }

    pub fn calculation(&self) -> &dyn Calculation {
        self.calculation.as_ref()
    }

    pub fn dimension(&self) -> Dimension {
        self.calculation.dimension()
    }

    /// Swap source `index` for `source`.
    ///
    /// # Errors
    ///
    /// - `Cycle` if `source` is this node or depends on it
    /// - `NonRepeatableSource` for a memoising calculation and a
    ///   non-idempotent source
    /// - the calculation's validation errors, and `SizeMismatch` if the
    ///   output size would change
    pub fn replace_source(&self, index: usize, source: MatrixRef) -> MatrixResult<()> {
        let id = self.id();
        if source.id() == id || source.depends_on(id) {
            tracing::warn!(node = %id, source = %source.id(), "rejecting source replacement that forms a cycle");
            return Err(ConstructionError::Cycle { node: id.0 }.into());
        }
        if self.calculation.requires_repeatable_sources() && !source.is_idempotent() {
            tracing::warn!(node = %id, source = %source.id(), "rejecting non-repeatable source");
            return Err(ConstructionError::NonRepeatableSource {
                operation: self.calculation.name().to_string(),
            }
            .into());
        }

        let mut candidate = self.sources.read().clone();
        if index >= candidate.len() {
            return Err(MatrixError::invalid_argument(format!(
                "source index {} out of range for {} source(s)",
                index,
                candidate.len()
            )));
        }
        candidate[index] = source.clone();
        let size = self.calculation.output_size(&candidate)?;
        if size != self.size() {
            return Err(MatrixError::size_mismatch(self.size(), &size));
        }

        {
            let mut sources = self.sources.write();
            let mut subscriptions = self.subscriptions.lock();
            sources[index].observers().unsubscribe(subscriptions[index]);
            subscriptions[index] = subscribe_forwarder(&source, self.this.clone());
            sources[index] = source;
        }
        self.calculation.invalidate();
        tracing::debug!(node = %id, index, "source replaced");
        self.header.observers().notify();
        Ok(())
    }
}

fn subscribe_forwarder(source: &MatrixRef, node: Weak<CalculationNode>) -> SubscriptionId {
    source.observers().subscribe(move || {
        if let Some(node) = node.upgrade() {
            node.calculation.invalidate();
            node.header.observers().notify();
        }
    })
}

impl Drop for CalculationNode {
    fn drop(&mut self) {
        let sources = self.sources.get_mut();
        let subscriptions = self.subscriptions.get_mut();
        for (source, id) in sources.iter().zip(subscriptions.iter()) {
            source.observers().unsubscribe(*id);
        }
    }
}

impl Matrix for CalculationNode {
    fn id(&self) -> MatrixId {
        self.header.id()
    }

    fn size(&self) -> &[usize] {
        self.header.size()
    }

    fn value_type(&self) -> ValueType {
        self.calculation.value_type()
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Dense
    }

    fn annotation(&self) -> Option<Annotation> {
        self.header.annotation()
    }

    fn set_annotation(&self, annotation: Option<Annotation>) {
        self.header.set_annotation(annotation)
    }

    fn get_value(&self, coordinates: &Coordinates) -> MatrixResult<Value> {
        coordinates.check_bounds(self.size())?;
        let sources = self.sources.read();
        self.calculation.get(&sources, coordinates)
    }

    fn set_value(&self, value: Value, coordinates: &Coordinates) -> MatrixResult<()> {
        coordinates.check_bounds(self.size())?;
        let sources = self.sources.read().clone();
        self.calculation.set(&sources, value, coordinates)
    }

    fn contains(&self, coordinates: &Coordinates) -> bool {
        coordinates.is_within(self.size())
    }

    fn available_coordinates(&self) -> CoordinateIter<'_> {
        Box::new(AllCoordinates::new(self.size()))
    }

    fn observers(&self) -> &Observers {
        self.header.observers()
    }

    fn sources(&self) -> Vec<MatrixRef> {
        self.sources.read().clone()
    }

    fn is_idempotent(&self) -> bool {
        self.calculation.is_idempotent() && self.sources.read().iter().all(|s| s.is_idempotent())
    }
}

impl fmt::Debug for CalculationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculationNode")
            .field("id", &self.header.id())
            .field("calculation", &self.calculation)
            .field("size", &self.size())
            .finish()
    }
}

/// Copy every cell of `matrix` into a new matrix of its value type.
pub fn materialize(matrix: &dyn Matrix, storage: StorageType) -> MatrixResult<MatrixRef> {
    materialize_as(matrix, matrix.value_type(), storage)
}

/// Copy every cell of `matrix` into a new matrix of `value_type`,
/// converting through the shared routine.
pub fn materialize_as(matrix: &dyn Matrix, value_type: ValueType, storage: StorageType) -> MatrixResult<MatrixRef> {
    let target = create_matrix(value_type, storage, matrix.size());
    for c in AllCoordinates::new(matrix.size()) {
        target.set_value(matrix.get_value(&c)?, &c)?;
    }
    tracing::debug!(source = %matrix.id(), target = %target.id(), %value_type, %storage, "materialized");
    Ok(target)
}

/// Copy `staged` into `target` cell by cell. If a write fails, the cells
/// already written get their previous values back before the error returns.
fn write_back(staged: &dyn Matrix, target: &dyn Matrix) -> MatrixResult<()> {
    let mut written = Vec::new();
    for c in AllCoordinates::new(target.size()) {
        let previous = target.get_value(&c)?;
        if let Err(err) = target.set_value(staged.get_value(&c)?, &c) {
            for (c, value) in written.into_iter().rev() {
                if let Err(restore) = target.set_value(value, &c) {
                    tracing::warn!(target = %target.id(), coordinates = %c, error = %restore, "could not restore cell");
                }
            }
            return Err(err);
        }
        written.push((c, previous));
    }
    Ok(())
}

/// Deliver `node` according to `mode`.
///
/// # Errors
///
/// Read errors of the node, `SizeMismatch` for [`EvalMode::Orig`] when the
/// first source differs in size from the node, and write errors of that
/// source (for example a read-only calculation or a failed conversion).
/// A failed [`EvalMode::Orig`] leaves the source as it was.
pub fn evaluate(node: Arc<CalculationNode>, mode: EvalMode, options: &CalcOptions) -> MatrixResult<MatrixRef> {
    match mode {
        EvalMode::Link => Ok(node as MatrixRef),
        EvalMode::New => materialize(node.as_ref(), options.storage),
        EvalMode::Orig => {
            let target = node
                .sources()
                .into_iter()
                .next()
                .ok_or_else(|| MatrixError::invalid_argument("in-place evaluation needs a source"))?;
            if target.size() != node.size() {
                return Err(MatrixError::size_mismatch(target.size(), node.size()));
            }
            // Every conversion into the target's type happens here, before
            // the target is touched.
            let staged = materialize_as(node.as_ref(), target.value_type(), StorageType::Dense)?;
            write_back(staged.as_ref(), target.as_ref())?;
            tracing::debug!(node = %node.id(), target = %target.id(), "evaluated in place");
            Ok(target)
        }
    }
}
