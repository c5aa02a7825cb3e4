//! Double-description adapter.
//!
//! Drives an external cdd-style polyhedral converter (`cddexec`,
//! `lcdd`, or compatible) through the standard polyhedra file format:
//! the system is written as an H- or V-representation file, the tool
//! converts to the dual representation on stdout, and the section
//! between `begin` and `end` is read back. Writers and parsers are
//! pure functions so they can be tested without the binary.

use super::{ConeSolver, GeneratorSystem, IneqSystem, SolverError};
use log::{debug, info};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Adapter around an external double-description binary.
#[derive(Clone, Debug)]
pub struct CddSolver {
    program: PathBuf,
}

impl Default for CddSolver {
    fn default() -> Self {
        Self {
            program: PathBuf::from("cddexec"),
        }
    }
}

impl CddSolver {
    /// Use a specific binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, input: &str, extension: &str) -> Result<String, SolverError> {
        let mut file = tempfile::Builder::new()
            .prefix("wclone")
            .suffix(extension)
            .tempfile()?;
        file.write_all(input.as_bytes())?;
        file.flush()?;
        info!("calling {} on {}", self.program.display(), file.path().display());
        let output = Command::new(&self.program)
            .arg(file.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        if !output.status.success() {
            return Err(SolverError::Failed {
                program: self.program.display().to_string(),
                status: output.status.code().unwrap_or(-1),
            });
        }
        String::from_utf8(output.stdout)
            .map_err(|e| SolverError::Parse(format!("solver output is not UTF-8: {e}")))
    }
}

impl ConeSolver for CddSolver {
    fn extreme_rays(&self, system: &IneqSystem) -> Result<Vec<Vec<f64>>, SolverError> {
        let output = self.run(&write_ine(system), ".ine")?;
        let section = parse_section(&output, "V-representation")?;
        let mut rays = Vec::new();
        for row in section.rows {
            let (marker, coords) = row
                .split_first()
                .ok_or_else(|| SolverError::Parse("empty generator row".into()))?;
            if *marker == 0.0 {
                rays.push(coords.to_vec());
            } else {
                // a vertex row; cones through the origin carry no
                // generator information there
                debug!("skipping vertex row in generator output");
            }
        }
        Ok(rays)
    }

    fn inequalities(&self, generators: &GeneratorSystem) -> Result<IneqSystem, SolverError> {
        let output = self.run(&write_ext(generators), ".ext")?;
        let section = parse_section(&output, "H-representation")?;
        let vars = section
            .cols
            .checked_sub(1)
            .ok_or_else(|| SolverError::Parse("inequality section without columns".into()))?;
        let mut system = IneqSystem::new(vars);
        for row in &section.rows {
            if row.len() != vars + 1 {
                return Err(SolverError::Parse(format!(
                    "inequality row of width {} in a section of width {}",
                    row.len(),
                    vars + 1
                )));
            }
            system.push_row(row);
        }
        Ok(system)
    }

    /// Redundant rows are removed by the round trip through the dual:
    /// the extreme rays of the system span the same cone, and their
    /// inequality description is minimal.
    fn canonicalize(&self, system: IneqSystem) -> Result<IneqSystem, SolverError> {
        let rays = self.extreme_rays(&system)?;
        if rays.is_empty() {
            return Ok(system);
        }
        let generators = GeneratorSystem::from_rows(system.vars(), &rays);
        self.inequalities(&generators)
    }
}

/// Serialize an inequality system as an H-representation file.
pub(crate) fn write_ine(system: &IneqSystem) -> String {
    let mut out = String::new();
    out.push_str("H-representation\n");
    out.push_str("begin\n");
    let _ = writeln!(out, " {} {} real", system.len(), system.vars() + 1);
    for row in system.rows() {
        for v in row {
            let _ = write!(out, " {v}");
        }
        out.push('\n');
    }
    out.push_str("end\n");
    out
}

/// Serialize cone generators as a V-representation file; every row is
/// a ray, marked by a leading zero.
pub(crate) fn write_ext(generators: &GeneratorSystem) -> String {
    let mut out = String::new();
    out.push_str("V-representation\n");
    out.push_str("begin\n");
    let _ = writeln!(out, " {} {} real", generators.len(), generators.vars() + 1);
    for ray in generators.rays() {
        out.push_str(" 0");
        for v in ray {
            let _ = write!(out, " {v}");
        }
        out.push('\n');
    }
    out.push_str("end\n");
    out
}

pub(crate) struct Section {
    pub cols: usize,
    pub rows: Vec<Vec<f64>>,
}

/// Extract the `begin`…`end` block following the given representation
/// header from solver output.
pub(crate) fn parse_section(text: &str, header: &str) -> Result<Section, SolverError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('*'));
    lines
        .by_ref()
        .find(|l| *l == header)
        .ok_or_else(|| SolverError::Parse(format!("no {header} section in solver output")))?;
    let begin = lines
        .next()
        .ok_or_else(|| SolverError::Parse("missing begin line".into()))?;
    if begin != "begin" {
        return Err(SolverError::Parse(format!(
            "expected begin, found {begin:?}"
        )));
    }
    let shape = lines
        .next()
        .ok_or_else(|| SolverError::Parse("missing dimension line".into()))?;
    let mut fields = shape.split_whitespace();
    let count: usize = fields
        .next()
        .ok_or_else(|| SolverError::Parse("missing row count".into()))?
        .parse()
        .map_err(|_| SolverError::Parse(format!("malformed row count in {shape:?}")))?;
    let cols: usize = fields
        .next()
        .ok_or_else(|| SolverError::Parse("missing column count".into()))?
        .parse()
        .map_err(|_| SolverError::Parse(format!("malformed column count in {shape:?}")))?;
    let mut rows = Vec::with_capacity(count);
    for line in lines {
        if line == "end" {
            if rows.len() != count {
                return Err(SolverError::Parse(format!(
                    "section declared {count} rows but held {}",
                    rows.len()
                )));
            }
            return Ok(Section { cols, rows });
        }
        let row: Result<Vec<f64>, SolverError> =
            line.split_whitespace().map(parse_number).collect();
        rows.push(row?);
    }
    Err(SolverError::Parse("unterminated section".into()))
}

/// Parse a numeric field, accepting both decimal and exact `p/q`
/// rational notation.
pub(crate) fn parse_number(field: &str) -> Result<f64, SolverError> {
    if let Some((num, den)) = field.split_once('/') {
        let num: f64 = num
            .parse()
            .map_err(|_| SolverError::Parse(format!("malformed rational {field:?}")))?;
        let den: f64 = den
            .parse()
            .map_err(|_| SolverError::Parse(format!("malformed rational {field:?}")))?;
        if den == 0.0 {
            return Err(SolverError::Parse(format!("zero denominator in {field:?}")));
        }
        Ok(num / den)
    } else {
        field
            .parse()
            .map_err(|_| SolverError::Parse(format!("malformed number {field:?}")))
    }
}
