//! LP feasibility adapter.
//!
//! Drives an external `lp_solve`-compatible binary through its lp file
//! format. Feasibility systems carry no objective, so the file always
//! minimises the empty sum; a run either prints a variable assignment
//! or reports infeasibility, which is surfaced as
//! [`LpSolution::Infeasible`], never as an error.

use super::{LpProblem, LpSolution, LpSolver, Relation, SolverError};
use log::info;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Adapter around an external `lp_solve`-style binary.
#[derive(Clone, Debug)]
pub struct LpSolveAdapter {
    program: PathBuf,
}

impl Default for LpSolveAdapter {
    fn default() -> Self {
        Self {
            program: PathBuf::from("lp_solve"),
        }
    }
}

impl LpSolveAdapter {
    /// Use a specific binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl LpSolver for LpSolveAdapter {
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        let mut file = tempfile::Builder::new()
            .prefix("wclone")
            .suffix(".lp")
            .tempfile()?;
        file.write_all(write_lp(problem).as_bytes())?;
        file.flush()?;
        info!(
            "calling {} on a feasibility program with {} variables and {} constraints",
            self.program.display(),
            problem.vars(),
            problem.constraints().len()
        );
        let output = Command::new(&self.program)
            .arg(file.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        let text = String::from_utf8_lossy(&output.stdout);
        if text.contains("infeasible") {
            return Ok(LpSolution::Infeasible);
        }
        if !output.status.success() {
            return Err(SolverError::Failed {
                program: self.program.display().to_string(),
                status: output.status.code().unwrap_or(-1),
            });
        }
        parse_solution(&text, problem.vars())
    }
}

/// Serialize a feasibility program in lp format. Variables are named
/// `x0 … x{n-1}`; sign-unrestricted ones are declared free.
pub(crate) fn write_lp(problem: &LpProblem) -> String {
    let mut out = String::new();
    out.push_str("/* feasibility */\nmin: ;\n");
    for (i, c) in problem.constraints().iter().enumerate() {
        let _ = write!(out, "c{i}:");
        let mut empty = true;
        for (j, &a) in c.coeffs.iter().enumerate() {
            if a != 0.0 {
                let _ = write!(out, " {a:+} x{j}");
                empty = false;
            }
        }
        if empty {
            // lp format rejects empty sums
            out.push_str(" 0 x0");
        }
        let op = match c.relation {
            Relation::Eq => "=",
            Relation::Le => "<=",
            Relation::Ge => ">=",
        };
        let _ = writeln!(out, " {op} {};", c.rhs);
    }
    let free: Vec<String> = problem
        .nonneg()
        .iter()
        .enumerate()
        .filter(|&(_, &nonneg)| !nonneg)
        .map(|(j, _)| format!("x{j}"))
        .collect();
    if !free.is_empty() {
        let _ = writeln!(out, "free {};", free.join(", "));
    }
    out
}

/// Read the variable assignment out of `lp_solve` output.
pub(crate) fn parse_solution(text: &str, vars: usize) -> Result<LpSolution, SolverError> {
    let mut values: HashMap<&str, f64> = HashMap::new();
    let mut in_variables = false;
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("Actual values of the variables") {
            in_variables = true;
            continue;
        }
        if !in_variables || line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(name), Some(value), None) = (fields.next(), fields.next(), fields.next())
        else {
            // past the variable table
            in_variables = false;
            continue;
        };
        let value: f64 = value
            .parse()
            .map_err(|_| SolverError::Parse(format!("malformed variable value {value:?}")))?;
        values.insert(name, value);
    }
    let mut assignment = Vec::with_capacity(vars);
    for j in 0..vars {
        let name = format!("x{j}");
        let value = values.get(name.as_str()).ok_or_else(|| {
            SolverError::Parse(format!("solver output is missing variable {name}"))
        })?;
        assignment.push(*value);
    }
    Ok(LpSolution::Feasible(assignment))
}
