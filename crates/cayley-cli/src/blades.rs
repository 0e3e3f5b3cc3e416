//! # Blades Subcommand
//!
//! Prints the dense blade order of an N-generator algebra, one blade per line:
//!
//! ```text
//! 0  1    grade 0  bitmap 0b000
//! 1  e1   grade 1  bitmap 0b001
//! ```

use anyhow::{Context, Result};
use clap::Args;

use cayley_core::BladeIndex;

/// Arguments for the `cayley blades` subcommand.
#[derive(Args, Debug)]
pub struct BladesArgs {
    /// Number of generators.
    #[arg(long, short = 'n')]
    pub generators: usize,

    /// Print only blades of this grade.
    #[arg(long)]
    pub grade: Option<usize>,

    /// Emit the blade index as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the blades subcommand.
pub fn run_blades(args: &BladesArgs) -> Result<u8> {
    let blades = BladeIndex::new(args.generators)
        .with_context(|| format!("cannot index {} generators", args.generators))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&blades)?);
        return Ok(0);
    }

    for line in render(&blades, args.grade) {
        println!("{line}");
    }
    Ok(0)
}

fn render(blades: &BladeIndex, grade: Option<usize>) -> Vec<String> {
    let width = blades.generators().max(1);
    blades
        .iter()
        .filter(|b| grade.map_or(true, |g| b.grade == g))
        .map(|b| {
            let name = blades.blade_name(b.index).unwrap_or_default();
            format!(
                "{:<4} {:<8} grade {}  bitmap 0b{:0width$b}",
                b.index, name, b.grade, b.bitmap
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_three_generators_in_order() {
        let blades = BladeIndex::new(3).unwrap();
        let lines = render(&blades, None);
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("0    1 "));
        assert!(lines[4].contains("e12"));
        assert!(lines[7].ends_with("bitmap 0b111"));
    }

    #[test]
    fn filters_by_grade() {
        let blades = BladeIndex::new(3).unwrap();
        let lines = render(&blades, Some(2));
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.contains("grade 2")));
    }

    #[test]
    fn rejects_too_many_generators() {
        let args = BladesArgs {
            generators: 40,
            grade: None,
            json: false,
        };
        assert!(run_blades(&args).is_err());
    }
}
