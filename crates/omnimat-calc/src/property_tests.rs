//! Property-based tests for calculation nodes
//!
//! Uses proptest to check evaluation and statistics invariants over random
//! 2D matrices.

#[cfg(test)]
mod tests {
    use crate::{CalcOptions, Dimension, EvalMode, MatrixCalcExt};
    use crate::stats::Moments;
    use omnimat_core::{AllCoordinates, Coordinates, DenseMatrix, MatrixRef};
    use proptest::prelude::*;
    use std::sync::Arc;

    // 2D matrix of moderate finite values
    fn matrix_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<f64>)> {
        (2usize..6, 1usize..5).prop_flat_map(|(rows, columns)| {
            (
                Just(vec![rows, columns]),
                prop::collection::vec(-1.0e3..1.0e3f64, rows * columns),
            )
        })
    }

    fn build(size: &[usize], values: Vec<f64>) -> MatrixRef {
        Arc::new(DenseMatrix::from_column_major(values, size).unwrap())
    }

    proptest! {
        #[test]
        fn prop_link_tracks_source_and_snapshot_does_not(
            (size, values) in matrix_strategy(),
            replacement in -1.0..1.0f64,
        ) {
            let source = build(&size, values.clone());
            let live = source.tan(EvalMode::Link).unwrap();
            let frozen = source.tan(EvalMode::New).unwrap();
            let target = Coordinates::at(size[0] - 1, size[1] - 1);

            source.set_as_double(replacement, &target).unwrap();
            prop_assert_eq!(live.get_as_double(&target).unwrap(), replacement.tan());
            prop_assert_eq!(frozen.get_as_double(&target).unwrap(), values[values.len() - 1].tan());
        }

        #[test]
        fn prop_column_standardize_has_zero_mean_unit_std((size, values) in matrix_strategy()) {
            let source = build(&size, values);
            let z = source.standardize(Dimension::Column, EvalMode::Link).unwrap();
            for column in 0..size[1] {
                let raw = Moments::collect(
                    (0..size[0]).map(|row| source.get_as_double(&Coordinates::at(row, column)).unwrap()),
                    false,
                );
                let moments = Moments::collect(
                    (0..size[0]).map(|row| z.get_as_double(&Coordinates::at(row, column)).unwrap()),
                    false,
                );
                prop_assert!(moments.mean().abs() < 1e-9);
                // Constant columns stay centered rather than scaled.
                if raw.std(false) > 1e-3 {
                    prop_assert!((moments.std(false) - 1.0).abs() < 1e-9);
                }
            }
        }

        #[test]
        fn prop_transpose_twice_is_identity((size, values) in matrix_strategy()) {
            let source = build(&size, values);
            let back = source
                .transpose(EvalMode::Link)
                .unwrap()
                .transpose(EvalMode::Link)
                .unwrap();
            prop_assert_eq!(back.size(), source.size());
            for c in AllCoordinates::new(&size) {
                prop_assert_eq!(back.get_value(&c).unwrap(), source.get_value(&c).unwrap());
            }
        }

        #[test]
        fn prop_row_sums_add_up_to_total((size, values) in matrix_strategy()) {
            let source = build(&size, values);
            let total = source.sum(Dimension::All, EvalMode::New).unwrap();
            let rows = source.sum(Dimension::Row, EvalMode::New).unwrap();
            let from_rows: f64 = (0..size[0])
                .map(|row| rows.get_as_double(&Coordinates::at(row, 0)).unwrap())
                .sum();
            let expected = total.get_as_double(&Coordinates::at(0, 0)).unwrap();
            prop_assert!((from_rows - expected).abs() < 1e-6);
        }

        #[test]
        fn prop_population_never_exceeds_sample_std((size, values) in matrix_strategy()) {
            let source = build(&size, values);
            let population = source.std(Dimension::All, &CalcOptions::default(), EvalMode::New).unwrap();
            let sample = source
                .std(Dimension::All, &CalcOptions::new().with_bessel_correction(true), EvalMode::New)
                .unwrap();
            let origin = Coordinates::at(0, 0);
            prop_assert!(population.get_as_double(&origin).unwrap() <= sample.get_as_double(&origin).unwrap() + 1e-12);
        }
    }
}
