//! # Table and Multiply Subcommands
//!
//! `cayley table` lists the nonzero coefficients of one product table as
//! `left ∘ right = coefficient result` lines. `cayley multiply` evaluates a
//! product of two dense coefficient vectors.
//!
//! Both obtain their table through the instance registry, exactly as library
//! callers do.

use anyhow::{Context, Result};
use clap::Args;

use cayley_cache::{Cached, InstanceRegistry};
use cayley_core::BladeIndex;
use cayley_tables::{Geometric, Inner, LeftContraction, Outer, ProductOperator, ProductTable};
use cayley_tensor::{ProductKind, SparseTensor};

use crate::{format_multivector, MetricArgs, ProductArg};

/// Arguments for the `cayley table` subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub metric: MetricArgs,

    /// Which product to show.
    #[arg(long, value_enum, default_value_t)]
    pub product: ProductArg,

    /// Emit the sparse tensor as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `cayley multiply` subcommand.
#[derive(Args, Debug)]
pub struct MultiplyArgs {
    #[command(flatten)]
    pub metric: MetricArgs,

    /// Which product to evaluate.
    #[arg(long, value_enum, default_value_t)]
    pub product: ProductArg,

    /// Left operand coefficients in dense blade order.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub left: Vec<f64>,

    /// Right operand coefficients in dense blade order.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub right: Vec<f64>,

    /// Emit the raw coefficient vector as JSON.
    #[arg(long)]
    pub json: bool,
}

/// The façade for `product`, type-erased down to what the subcommands need.
struct Selected {
    blades: BladeIndex,
    tensor: SparseTensor,
    evaluate: Box<dyn Fn(&[f64], &[f64]) -> Result<Vec<f64>>>,
}

fn select<P: ProductOperator>(registry: &InstanceRegistry, metric: &[f64]) -> Result<Selected> {
    let table: Cached<ProductTable<P>> = registry
        .get::<ProductTable<P>>(metric)
        .with_context(|| format!("cannot build {} table", P::KIND))?;
    Ok(Selected {
        blades: table.combined().blades().clone(),
        tensor: table.value().clone(),
        evaluate: Box::new(move |a: &[f64], b: &[f64]| Ok(table.multiply(a, b)?)),
    })
}

fn select_product(
    registry: &InstanceRegistry,
    product: ProductArg,
    metric: &[f64],
) -> Result<Selected> {
    match ProductKind::from(product) {
        ProductKind::Geometric => select::<Geometric>(registry, metric),
        ProductKind::Outer => select::<Outer>(registry, metric),
        ProductKind::Inner => select::<Inner>(registry, metric),
        ProductKind::LeftContraction => select::<LeftContraction>(registry, metric),
    }
}

/// Execute the table subcommand.
pub fn run_table(args: &TableArgs, registry: &InstanceRegistry) -> Result<u8> {
    let metric = args.metric.resolve()?;
    let selected = select_product(registry, args.product, metric.values())?;
    tracing::info!(
        product = ProductKind::from(args.product).as_str(),
        nnz = selected.tensor.nnz(),
        "product table ready"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selected.tensor)?);
        return Ok(0);
    }
    for line in render_table(&selected.blades, &selected.tensor, args.product.into()) {
        println!("{line}");
    }
    Ok(0)
}

/// Execute the multiply subcommand.
pub fn run_multiply(args: &MultiplyArgs, registry: &InstanceRegistry) -> Result<u8> {
    let metric = args.metric.resolve()?;
    let selected = select_product(registry, args.product, metric.values())?;
    let result = (selected.evaluate)(&args.left, &args.right).context("multiplication failed")?;

    if args.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", format_multivector(&selected.blades, &result));
    }
    Ok(0)
}

fn operator_symbol(kind: ProductKind) -> &'static str {
    match kind {
        ProductKind::Geometric => "*",
        ProductKind::Outer => "^",
        ProductKind::Inner => "|",
        ProductKind::LeftContraction => "<<",
    }
}

fn render_table(blades: &BladeIndex, tensor: &SparseTensor, kind: ProductKind) -> Vec<String> {
    let name = |i: usize| blades.blade_name(i).unwrap_or_else(|| format!("#{i}"));
    let op = operator_symbol(kind);
    tensor
        .iter()
        .map(|e| {
            format!(
                "{} {op} {} = {} {}",
                name(e.left),
                name(e.right),
                e.value,
                name(e.result)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cayley_tables::GeometricProductTable;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct MultiplyCli {
        #[command(flatten)]
        args: MultiplyArgs,
    }

    #[derive(Parser, Debug)]
    struct TableCli {
        #[command(flatten)]
        args: TableArgs,
    }

    #[test]
    fn parses_negative_metric_and_operands() {
        let cli = MultiplyCli::try_parse_from([
            "multiply",
            "--metric",
            "-1,1",
            "--product",
            "left-contraction",
            "--left",
            "0,1,0,0",
            "--right",
            "0,0,0,-2",
        ])
        .unwrap();
        assert_eq!(cli.args.metric.metric, vec![-1.0, 1.0]);
        assert_eq!(cli.args.product, ProductArg::LeftContraction);
        assert_eq!(cli.args.right, vec![0.0, 0.0, 0.0, -2.0]);
    }

    #[test]
    fn table_defaults_to_geometric() {
        let cli = TableCli::try_parse_from(["table", "--metric", "1,1"]).unwrap();
        assert_eq!(cli.args.product, ProductArg::Geometric);
        assert!(!cli.args.json);
    }

    #[test]
    fn euclidean_plane_table_lines() {
        let registry = InstanceRegistry::new();
        let selected = select_product(&registry, ProductArg::Geometric, &[1.0, 1.0]).unwrap();
        let lines = render_table(&selected.blades, &selected.tensor, ProductKind::Geometric);
        assert_eq!(lines.len(), 16);
        assert!(lines.contains(&"e1 * e2 = 1 e12".to_string()));
        assert!(lines.contains(&"e2 * e1 = -1 e12".to_string()));
    }

    #[test]
    fn outer_table_omits_self_products() {
        let registry = InstanceRegistry::new();
        let selected = select_product(&registry, ProductArg::Outer, &[1.0, 1.0]).unwrap();
        let lines = render_table(&selected.blades, &selected.tensor, ProductKind::Outer);
        assert!(!lines.iter().any(|l| l.starts_with("e1 ^ e1")));
        assert!(lines.contains(&"e1 ^ e2 = 1 e12".to_string()));
    }

    #[test]
    fn multiply_evaluates_through_registry() {
        let registry = InstanceRegistry::new();
        let selected = select_product(&registry, ProductArg::Geometric, &[1.0, 1.0]).unwrap();
        let out = (selected.evaluate)(&[0.0, 1.0, 0.0, 0.0], &[0.0, 0.0, 1.0, 0.0]).unwrap();
        assert_eq!(format_multivector(&selected.blades, &out), "e12");
        assert_eq!(registry.live_count_of::<GeometricProductTable>(), 1);
    }

    #[test]
    fn invalid_metric_is_reported() {
        let registry = InstanceRegistry::new();
        let err = select_product(&registry, ProductArg::Inner, &[f64::NAN]).err().unwrap();
        assert!(format!("{err:#}").contains("inner"));
    }

    #[test]
    fn multiply_accepts_signature() {
        let cli = MultiplyCli::try_parse_from([
            "multiply",
            "--signature",
            "0,1",
            "--left",
            "0,1",
            "--right",
            "0,1",
        ])
        .unwrap();
        assert_eq!(cli.args.metric.resolve().unwrap().values(), &[-1.0]);
        let registry = InstanceRegistry::new();
        assert_eq!(run_multiply(&cli.args, &registry).unwrap(), 0);
    }

    #[test]
    fn operand_length_mismatch_is_reported() {
        let registry = InstanceRegistry::new();
        let args = MultiplyArgs {
            metric: MetricArgs {
                metric: vec![1.0],
                ..MetricArgs::default()
            },
            product: ProductArg::Geometric,
            left: vec![1.0],
            right: vec![1.0, 0.0],
            json: false,
        };
        assert!(run_multiply(&args, &registry).is_err());
    }
}
