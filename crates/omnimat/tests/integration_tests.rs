//! Integration tests for the omnimat meta crate
//!
//! End-to-end use through the prelude: link a delimited table, convert it,
//! and run calculations over the result.

use anyhow::Result;
use omnimat::core::link::{write_delimited, DelimitedTextSource, LinkOptions, StringTableReader};
use omnimat::core::{CapabilityRegistry, Feature};
use omnimat::prelude::*;
use proptest::prelude::*;
use std::io::Cursor;
use std::sync::Arc;

const CSV: &str = "1,2,3\n4,5,6\n7,8,10\n";

#[test]
fn test_linked_table_through_calculations() -> Result<()> {
    let mut capabilities = CapabilityRegistry::new();
    capabilities.register(Feature::FileLink, Arc::new(StringTableReader));
    let reader = capabilities
        .get::<StringTableReader>(Feature::FileLink)
        .ok_or_else(|| anyhow::anyhow!("file link not registered"))?;

    let text = reader.read_matrix(&mut Cursor::new(CSV), &LinkOptions::default())?;
    assert_eq!(text.value_type(), ValueType::String);
    let numbers = text.convert(ValueType::Double, EvalMode::New)?;

    let column_means = numbers.mean(Dimension::Column, EvalMode::New)?;
    assert_eq!(column_means.get_as_double(&Coordinates::at(0, 0))?, 4.0);
    assert!((column_means.get_as_double(&Coordinates::at(0, 2))? - 19.0 / 3.0).abs() < 1e-12);

    let rounded = numbers
        .divide(3.0, EvalMode::Link)?
        .discretize(DiscretizationMethod::Round, Dimension::All, EvalMode::New)?;
    assert_eq!(rounded.value_type(), ValueType::Long);
    assert_eq!(rounded.get_as_long(&Coordinates::at(2, 2))?, 3);

    let mut out = Vec::new();
    write_delimited(numbers.transpose(EvalMode::Link)?.as_ref(), &mut out, &LinkOptions::default())?;
    assert_eq!(String::from_utf8(out)?, "1,4,7\n2,5,8\n3,6,10\n");
    Ok(())
}

#[test]
fn test_factory_config_from_prelude() -> Result<()> {
    let registry = FactoryRegistry::with_config(
        MatrixConfig::new()
            .with_default_storage(StorageType::Sparse)
            .with_max_sparse_entries(1),
    );
    let m = registry.zeros(ValueType::Int, &[10, 10])?;
    m.set_as_int(1, &Coordinates::at(0, 0))?;
    assert!(m.set_as_int(2, &Coordinates::at(0, 1)).unwrap_err().is_capacity());
    Ok(())
}

proptest! {
    #[test]
    fn prop_negate_twice_restores_values(values in prop::collection::vec(-1.0e6..1.0e6f64, 1..20)) {
        let n = values.len();
        let m: MatrixRef = Arc::new(DenseMatrix::from_column_major(values.clone(), &[n, 1]).unwrap());
        let back = m.negate(EvalMode::Link).unwrap().negate(EvalMode::New).unwrap();
        for (row, v) in values.iter().enumerate() {
            prop_assert_eq!(back.get_as_double(&Coordinates::at(row, 0)).unwrap(), *v);
        }
    }
}
