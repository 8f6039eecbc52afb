//! Integration tests for omnimat-core
//!
//! These tests exercise the matrix contract across engines, factories and
//! link sources together.

use anyhow::Result;
use omnimat_core::link::{write_delimited, DelimitedTextSource, LinkOptions, StringTableReader};
use omnimat_core::{
    matrices_equal, CapabilityRegistry, Coordinates, DenseMatrix, FactoryRegistry, Feature, Matrix, MatrixConfig,
    MatrixRef, SparseEnumerable, SparseMatrix, StorageType, Value, ValueType,
};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_every_combination_round_trips_its_own_kind() -> Result<()> {
    let registry = FactoryRegistry::with_defaults();
    let c = Coordinates::at(1, 2);
    for storage in [StorageType::Dense, StorageType::Sparse] {
        for value_type in ValueType::ALL {
            let m = registry.zeros_with(value_type, storage, &[2, 3])?;
            let v = match value_type {
                ValueType::Boolean => Value::Boolean(true),
                ValueType::Byte => Value::Byte(-7),
                ValueType::Short => Value::Short(1234),
                ValueType::Char => Value::Char('z'),
                ValueType::Int => Value::Int(-99_999),
                ValueType::Long => Value::Long(i64::MAX),
                ValueType::Float => Value::Float(0.25),
                ValueType::Double => Value::Double(-1e300),
                ValueType::BigInteger => Value::BigInteger(num_bigint::BigInt::from(i64::MIN) * 3),
                ValueType::Object => Value::from("anything"),
                ValueType::String => Value::from("text"),
            };
            m.set_value(v.clone(), &c)?;
            assert_eq!(m.get_value(&c)?, v, "{} {}", storage, value_type);
        }
    }
    Ok(())
}

#[test]
fn test_integral_matrices_reject_non_finite_everywhere() -> Result<()> {
    let registry = FactoryRegistry::with_defaults();
    let c = Coordinates::at(0, 0);
    for storage in [StorageType::Dense, StorageType::Sparse] {
        for value_type in ValueType::ALL.into_iter().filter(|t| t.is_integral()) {
            let m = registry.zeros_with(value_type, storage, &[1, 1])?;
            let before = m.get_value(&c)?;
            for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert!(m.set_as_double(bad, &c).unwrap_err().is_type_validation());
                assert!(m.set_as_float(bad as f32, &c).unwrap_err().is_type_validation());
            }
            assert_eq!(m.get_value(&c)?, before);
        }
    }
    Ok(())
}

#[test]
fn test_dense_and_sparse_agree() -> Result<()> {
    let dense = DenseMatrix::<f64>::zeros(&[4, 4]);
    let sparse = SparseMatrix::<f64>::zeros(&[4, 4]);
    for (i, c) in [Coordinates::at(0, 3), Coordinates::at(2, 2), Coordinates::at(3, 0)]
        .iter()
        .enumerate()
    {
        dense.set_as_double(i as f64 + 1.0, c)?;
        sparse.set_as_double(i as f64 + 1.0, c)?;
    }
    assert!(matrices_equal(&dense, &sparse)?);
    assert_eq!(dense.available_coordinates().count(), 16);
    assert_eq!(sparse.available_coordinates().count(), 3);
    assert!((sparse.density() - 3.0 / 16.0).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_concurrent_readers() -> Result<()> {
    let m: MatrixRef = Arc::new(DenseMatrix::from_fn(&[50, 20], |c| (c.row() + c.column()) as f64));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let m = m.clone();
            thread::spawn(move || {
                m.available_coordinates()
                    .map(|c| m.get_as_double(&c).unwrap_or(f64::NAN))
                    .sum::<f64>()
            })
        })
        .collect();
    for handle in handles {
        let sum = handle.join().map_err(|_| anyhow::anyhow!("reader panicked"))?;
        assert!((sum - 34_000.0).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn test_observers_fire_on_mutation_only() -> Result<()> {
    let m = SparseMatrix::<i32>::with_max_entries(&[3, 3], 1);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    m.observers().subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    m.set_as_int(1, &Coordinates::at(0, 0))?;
    assert!(m.set_as_int(1, &Coordinates::at(1, 1)).is_err());
    assert!(m.set_as_double(f64::NAN, &Coordinates::at(0, 0)).is_err());
    m.get_as_int(&Coordinates::at(0, 0))?;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_link_source_feeds_factories() -> Result<()> {
    let mut capabilities = CapabilityRegistry::new();
    let reader: Arc<dyn DelimitedTextSource> = Arc::new(StringTableReader);
    capabilities.register(Feature::FileLink, Arc::new(reader));

    let reader = capabilities
        .get::<Arc<dyn DelimitedTextSource>>(Feature::FileLink)
        .ok_or_else(|| anyhow::anyhow!("file link not registered"))?;
    let options = LinkOptions::new('\t');
    let table = reader.read_matrix(&mut Cursor::new("1\t0\n0\t2.5\n"), &options)?;

    let registry = FactoryRegistry::with_config(MatrixConfig::new().with_default_storage(StorageType::Sparse));
    let numbers = registry.copy_of(table.as_ref(), ValueType::Double, registry.config().default_storage)?;
    assert_eq!(numbers.available_coordinates().count(), 2);
    assert_eq!(numbers.get_as_double(&Coordinates::at(1, 1))?, 2.5);

    let mut out = Vec::new();
    write_delimited(numbers.as_ref(), &mut out, &options)?;
    assert_eq!(String::from_utf8(out)?, "1\t0\n0\t2.5\n");
    Ok(())
}

#[test]
fn test_three_dimensional_matrices() -> Result<()> {
    let m = SparseMatrix::<f32>::zeros(&[2, 3, 4]);
    let c = Coordinates::new(&[1, 2, 3]);
    m.set_as_double(0.5, &c)?;
    assert_eq!(m.get_as_float(&c)?, 0.5);
    assert!(m.get_value(&Coordinates::at(1, 2)).unwrap_err().is_out_of_bounds());

    let dense = DenseMatrix::<f32>::zeros(&[2, 3, 4]);
    dense.copy_from(&m)?;
    assert_eq!(dense.to_column_major_vec()[1 + 2 * 2 + 3 * 6], 0.5);
    Ok(())
}
