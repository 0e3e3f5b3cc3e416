//! # Product Table Caching Tests
//!
//! Exercises the full path from raw metric arguments to cached façades:
//! idempotence, sharing while live, eviction, isolation between product
//! types, and rejection of invalid metrics before anything is cached.

use cayley_cache::{Cached, InstanceRegistry, RegistryStats};
use cayley_core::MetricError;
use cayley_tables::{
    CombinedProductTable, GeometricProductTable, InnerProductTable, LeftContractionProductTable,
    OuterProductTable, TableError,
};
use cayley_tensor::ProductKind;
use proptest::prelude::*;

fn basis(dim: usize, index: usize) -> Vec<f64> {
    let mut v = vec![0.0; dim];
    v[index] = 1.0;
    v
}

#[test]
fn euclidean_plane_layout_and_products() {
    let registry = InstanceRegistry::new();
    let gp = registry.get::<GeometricProductTable>(&[1.0, 1.0]).unwrap();

    let blades = gp.combined().blades();
    assert_eq!(blades.bitmaps(), &[0b00, 0b01, 0b10, 0b11]);

    let e1 = basis(4, 1);
    let e2 = basis(4, 2);
    assert_eq!(gp.multiply(&e1, &e1).unwrap(), basis(4, 0));
    assert_eq!(gp.multiply(&e1, &e2).unwrap(), basis(4, 3));
    assert_eq!(gp.multiply(&e2, &e1).unwrap(), vec![0.0, 0.0, 0.0, -1.0]);
}

#[test]
fn negative_signature_squares_to_minus_one() {
    let registry = InstanceRegistry::new();
    let gp = registry.get::<GeometricProductTable>(&[-1.0]).unwrap();
    let e1 = basis(2, 1);
    assert_eq!(gp.multiply(&e1, &e1).unwrap(), vec![-1.0, 0.0]);
}

#[test]
fn value_equal_arguments_give_equal_tables() {
    let registry = InstanceRegistry::new();
    let a = registry.get::<OuterProductTable>(&[1.0, -1.0, 0.0]).unwrap();
    let b = registry.get::<OuterProductTable>(&[1.0, -1.0, -0.0]).unwrap();
    assert_eq!(a, b);
    assert!(Cached::ptr_eq(&a, &b));

    let elsewhere = InstanceRegistry::new();
    let c = elsewhere.get::<OuterProductTable>(&[1.0, -1.0, 0.0]).unwrap();
    assert_eq!(a, c);
    assert!(!Cached::ptr_eq(&a, &c));
    assert_eq!(a.value(), c.value());
    assert_eq!(a.func(), c.func());
}

#[test]
fn distinct_metrics_give_distinct_tables() {
    let registry = InstanceRegistry::new();
    let a = registry.get::<GeometricProductTable>(&[1.0, 1.0]).unwrap();
    let b = registry.get::<GeometricProductTable>(&[1.0, -1.0]).unwrap();
    assert_ne!(a, b);
    assert_eq!(registry.live_count_of::<GeometricProductTable>(), 2);
    assert_eq!(registry.live_count_of::<CombinedProductTable>(), 2);
}

#[test]
fn evicted_table_is_rebuilt_identically() {
    let registry = InstanceRegistry::new();
    let (value, func) = {
        let lc = registry
            .get::<LeftContractionProductTable>(&[2.0, 1.0, -1.0])
            .unwrap();
        (lc.value().clone(), lc.func().clone())
    };
    assert_eq!(registry.live_count(), 0);

    let again = registry
        .get::<LeftContractionProductTable>(&[2.0, 1.0, -1.0])
        .unwrap();
    assert_eq!(again.value(), &value);
    assert_eq!(again.func(), &func);
}

#[test]
fn facade_keeps_combined_table_alive() {
    let registry = InstanceRegistry::new();
    let metric = cayley_core::Metric::new(&[1.0, 1.0, 1.0]).unwrap();
    let inner = registry.get::<InnerProductTable>(metric.values()).unwrap();
    assert!(registry.contains::<CombinedProductTable>(&metric));

    let combined = registry.get::<CombinedProductTable>(metric.values()).unwrap();
    assert!(Cached::ptr_eq(inner.combined(), &combined));
    drop(combined);
    assert!(registry.contains::<CombinedProductTable>(&metric));

    drop(inner);
    assert!(!registry.contains::<CombinedProductTable>(&metric));
}

#[test]
fn product_types_sharing_a_metric_stay_isolated() {
    let registry = InstanceRegistry::new();
    let outer = registry.get::<OuterProductTable>(&[1.0, 1.0]).unwrap();
    let inner = registry.get::<InnerProductTable>(&[1.0, 1.0]).unwrap();

    assert!(outer != inner);
    assert_eq!(outer.key(), inner.key());
    assert_ne!(outer.stable_digest().unwrap(), inner.stable_digest().unwrap());
    // Outer, inner, and the combined table they share.
    assert_eq!(registry.stats().types, 3);
    assert_eq!(registry.live_count(), 3);
}

#[test]
fn outer_and_inner_never_share_a_coefficient() {
    let registry = InstanceRegistry::new();
    let combined = registry
        .get::<CombinedProductTable>(&[1.0, -1.0, 1.0, 0.0])
        .unwrap();
    let outer = combined.tensor(ProductKind::Outer);
    let inner = combined.tensor(ProductKind::Inner);
    for e in outer.iter() {
        assert_eq!(inner.get(e.left, e.right, e.result), 0.0);
    }
}

#[test]
fn non_finite_metric_is_rejected_before_caching() {
    let registry = InstanceRegistry::new();
    let err = registry
        .get::<GeometricProductTable>(&[1.0, f64::NAN])
        .unwrap_err();
    assert!(matches!(
        err,
        TableError::Metric(MetricError::NonFinite { position: 1, .. })
    ));
    assert_eq!(registry.stats(), RegistryStats::default());
}

#[test]
fn oversized_metric_is_rejected_before_caching() {
    let registry = InstanceRegistry::new();
    let err = registry
        .get::<CombinedProductTable>(&[1.0; 13])
        .unwrap_err();
    assert!(matches!(
        err,
        TableError::Metric(MetricError::TooManyGenerators { count: 13, .. })
    ));
    assert_eq!(registry.stats(), RegistryStats::default());
}

#[test]
fn concurrent_requests_observe_equal_tables() {
    let registry = InstanceRegistry::new();
    let tables: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| registry.get::<GeometricProductTable>(&[1.0, 1.0, 1.0])))
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap().unwrap())
            .collect()
    });
    for t in &tables {
        assert_eq!(t, &tables[0]);
        assert_eq!(t.value(), tables[0].value());
    }
}

#[test]
fn reset_isolates_later_requests() {
    let registry = InstanceRegistry::new();
    let before = registry.get::<GeometricProductTable>(&[1.0]).unwrap();
    registry.reset();
    assert_eq!(registry.live_count(), 0);

    let after = registry.get::<GeometricProductTable>(&[1.0]).unwrap();
    assert_eq!(before, after);
    assert!(!Cached::ptr_eq(&before, &after));
}

fn metric_entry() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), Just(-1.0), Just(0.0), -4.0..4.0f64]
}

proptest! {
    #[test]
    fn geometric_product_is_associative(
        metric in prop::collection::vec(metric_entry(), 3),
        a in prop::collection::vec(-3i8..=3, 8),
        b in prop::collection::vec(-3i8..=3, 8),
        c in prop::collection::vec(-3i8..=3, 8),
    ) {
        let registry = InstanceRegistry::new();
        let gp = registry.get::<GeometricProductTable>(&metric).unwrap();
        let to_f64 = |v: &[i8]| v.iter().map(|&x| f64::from(x)).collect::<Vec<_>>();
        let (a, b, c) = (to_f64(&a), to_f64(&b), to_f64(&c));

        let left = gp.multiply(&gp.multiply(&a, &b).unwrap(), &c).unwrap();
        let right = gp.multiply(&a, &gp.multiply(&b, &c).unwrap()).unwrap();
        for (l, r) in left.iter().zip(&right) {
            prop_assert!((l - r).abs() <= 1e-9 * (1.0 + l.abs().max(r.abs())));
        }
    }

    #[test]
    fn outer_product_is_antisymmetric_on_vectors(
        metric in prop::collection::vec(metric_entry(), 3),
        i in 1usize..=3,
        j in 1usize..=3,
    ) {
        let registry = InstanceRegistry::new();
        let op = registry.get::<OuterProductTable>(&metric).unwrap();
        let (u, v) = (basis(8, i), basis(8, j));
        let uv = op.multiply(&u, &v).unwrap();
        let vu = op.multiply(&v, &u).unwrap();
        for (x, y) in uv.iter().zip(&vu) {
            prop_assert_eq!(*x, -*y);
        }
    }
}
