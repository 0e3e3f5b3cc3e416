//! # cayley-cli — Command-Line Front End
//!
//! Provides the `cayley` binary for inspecting and evaluating product tables.
//!
//! ## Subcommands
//!
//! - `cayley blades`: Blade enumeration for N generators.
//! - `cayley table`: Nonzero coefficients of one product table.
//! - `cayley multiply`: Evaluate a product of two coefficient vectors.
//! - `cayley persist`: Persisted reference and stable digest of a table.
//!
//! ```bash
//! cayley blades --generators 3
//! cayley table --metric 1,1,-1 --product outer
//! cayley table --signature 3,0,1 --generators 4
//! cayley multiply --metric 1,1 --left 0,1,0,0 --right 0,0,1,0
//! cayley -vv --config cayley.yaml persist --metric 1,1,1 --product inner
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; table logic lives in `cayley-tables`.
//! - Handlers return `anyhow::Result<u8>`, the `u8` being the exit code.

pub mod blades;
pub mod config;
pub mod persist;
pub mod product;

use anyhow::{bail, Result};
use clap::Args;

use cayley_core::{BladeIndex, Metric};
use cayley_tensor::ProductKind;

/// How a subcommand's metric is given on the command line.
#[derive(Args, Debug, Default)]
pub struct MetricArgs {
    /// Metric diagonal, one self-product per generator (e.g. `1,1,-1`).
    /// Omit for the scalar algebra.
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        conflicts_with = "signature"
    )]
    pub metric: Vec<f64>,

    /// Signature `p,q` or `p,q,r`: p generators square to +1, then q to -1,
    /// then r to 0.
    #[arg(long, value_delimiter = ',')]
    pub signature: Option<Vec<usize>>,

    /// Require the metric to cover exactly this many generators.
    #[arg(long)]
    pub generators: Option<usize>,
}

impl MetricArgs {
    /// Validate and freeze the metric these arguments describe.
    pub fn resolve(&self) -> Result<Metric> {
        let metric = match self.signature.as_deref() {
            None => Metric::new(&self.metric)?,
            Some(&[p, q]) => Metric::signature(p, q, 0)?,
            Some(&[p, q, r]) => Metric::signature(p, q, r)?,
            Some(other) => bail!("--signature takes p,q or p,q,r, got {} values", other.len()),
        };
        match self.generators {
            Some(n) => Ok(Metric::for_generators(n, metric.values())?),
            None => Ok(metric),
        }
    }
}

/// Product selector accepted on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductArg {
    /// Geometric product.
    #[default]
    Geometric,
    /// Outer (wedge) product.
    Outer,
    /// Inner product.
    Inner,
    /// Left contraction.
    LeftContraction,
}

impl From<ProductArg> for ProductKind {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::Geometric => ProductKind::Geometric,
            ProductArg::Outer => ProductKind::Outer,
            ProductArg::Inner => ProductKind::Inner,
            ProductArg::LeftContraction => ProductKind::LeftContraction,
        }
    }
}

/// Render a coefficient vector as a sum of named blades, e.g. `1 + 2*e12 - e3`.
///
/// Zero coefficients are skipped; the zero vector renders as `0`.
pub fn format_multivector(blades: &BladeIndex, coefficients: &[f64]) -> String {
    let mut out = String::new();
    for (index, &c) in coefficients.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        let Some(name) = blades.blade_name(index) else {
            continue;
        };
        let sign = if c < 0.0 { "-" } else { "+" };
        let magnitude = c.abs();
        if out.is_empty() {
            if c < 0.0 {
                out.push('-');
            }
        } else {
            out.push_str(&format!(" {sign} "));
        }
        if index == 0 {
            out.push_str(&magnitude.to_string());
        } else if magnitude == 1.0 {
            out.push_str(&name);
        } else {
            out.push_str(&format!("{magnitude}*{name}"));
        }
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}
