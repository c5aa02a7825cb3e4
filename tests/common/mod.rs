//! Scripted solver doubles for exercising the decode paths without
//! external binaries.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use weighted_clones::solver::{GeneratorSystem, IneqSystem, LpProblem, LpSolution, SolverError};
use weighted_clones::{ConeSolver, LpSolver};

/// A cone solver replaying prepared answers, recording what it was
/// asked.
#[derive(Debug, Default)]
pub struct ScriptedCone {
    rays: RefCell<VecDeque<Vec<Vec<f64>>>>,
    inequalities: RefCell<VecDeque<IneqSystem>>,
    pub seen_systems: RefCell<Vec<IneqSystem>>,
    pub seen_generators: RefCell<Vec<GeneratorSystem>>,
}

impl ScriptedCone {
    pub fn returning_rays(scripts: Vec<Vec<Vec<f64>>>) -> Self {
        Self {
            rays: RefCell::new(scripts.into()),
            ..Self::default()
        }
    }

    pub fn push_rays(&self, rays: Vec<Vec<f64>>) {
        self.rays.borrow_mut().push_back(rays);
    }

    pub fn push_inequalities(&self, system: IneqSystem) {
        self.inequalities.borrow_mut().push_back(system);
    }
}

impl ConeSolver for ScriptedCone {
    fn extreme_rays(&self, system: &IneqSystem) -> Result<Vec<Vec<f64>>, SolverError> {
        self.seen_systems.borrow_mut().push(system.clone());
        self.rays
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SolverError::Parse("scripted cone ran out of ray answers".into()))
    }

    fn inequalities(&self, generators: &GeneratorSystem) -> Result<IneqSystem, SolverError> {
        self.seen_generators.borrow_mut().push(generators.clone());
        self.inequalities
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SolverError::Parse("scripted cone ran out of inequality answers".into()))
    }

    fn canonicalize(&self, system: IneqSystem) -> Result<IneqSystem, SolverError> {
        Ok(system)
    }
}

/// An LP solver replaying prepared outcomes, recording the programs.
#[derive(Debug, Default)]
pub struct ScriptedLp {
    outcomes: RefCell<VecDeque<LpSolution>>,
    pub seen: RefCell<Vec<LpProblem>>,
}

impl ScriptedLp {
    pub fn returning(outcomes: Vec<LpSolution>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl LpSolver for ScriptedLp {
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        self.seen.borrow_mut().push(problem.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SolverError::Parse("scripted LP ran out of outcomes".into()))
    }
}
