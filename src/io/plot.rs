use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::variation::{EnergyCurve, Plotter};

/// Writes each energy curve as `parameter,energy` rows.
#[derive(Clone, Debug)]
pub struct CsvPlotter {
    pub path: PathBuf,
}

impl CsvPlotter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Plotter for CsvPlotter {
    fn plot(&mut self, curve: &EnergyCurve) -> Result<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        writeln!(out, "parameter,energy")?;
        for (x, e) in curve.parameters.iter().zip(&curve.energies) {
            writeln!(out, "{x},{e}")?;
        }
        out.flush()?;
        info!(path = %self.path.display(), "energy curve written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{Expr, Symbol};

    #[test]
    fn test_writes_header_and_rows() {
        let b = Symbol::positive("b");
        let energy = Expr::rational(1, 2) * b.expr().pow(2) - b.expr();
        let curve = EnergyCurve::sample(&energy, &b, 1.0).unwrap();
        let path = std::env::temp_dir().join(format!("variational-curve-{}.csv", std::process::id()));
        CsvPlotter::new(&path).plot(&curve).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "parameter,energy");
        assert_eq!(lines.len(), EnergyCurve::SAMPLES + 1);
        assert!(lines[1].starts_with("0.5,"));
    }
}
