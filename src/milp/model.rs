//! Binary integer program definition.

use super::variables::{BoolVar, LinearExpr, VarId};
use std::collections::HashSet;

/// Relation between a constraint's expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `expr <= rhs`
    LessEq,
    /// `expr == rhs`
    Equal,
    /// `expr >= rhs`
    GreaterEq,
}

/// A linear constraint `expr (<=|==|>=) rhs`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// Human-readable label, used in logs and validation messages.
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Checks the constraint against an assignment, with absolute tolerance `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::LessEq => lhs <= self.rhs + tol,
            Sense::Equal => (lhs - self.rhs).abs() <= tol,
            Sense::GreaterEq => lhs >= self.rhs - tol,
        }
    }
}

/// Objective function of a [`BinaryModel`].
#[derive(Debug, Clone)]
pub enum Objective {
    Maximize(LinearExpr),
    Minimize(LinearExpr),
}

impl Objective {
    /// The expression being optimized.
    pub fn expr(&self) -> &LinearExpr {
        match self {
            Objective::Maximize(expr) | Objective::Minimize(expr) => expr,
        }
    }
}

/// A binary integer program: boolean variables, linear constraints and a
/// linear objective.
///
/// The model is solver-agnostic. It is handed to a
/// [`MilpSolver`](super::MilpSolver) which translates it into a backend
/// problem.
///
/// # Examples
///
/// ```
/// use fpl_squad::milp::{BinaryModel, BoolVar, LinearExpr, Objective};
///
/// let mut model = BinaryModel::new("pick_one");
/// let a = model.add_bool_var(BoolVar::new("a"));
/// let b = model.add_bool_var(BoolVar::new("b"));
/// model.add_eq("exactly_one", LinearExpr::sum([a, b]), 1.0);
/// model.set_objective(Objective::Maximize(
///     LinearExpr::new().with_term(a, 1.0).with_term(b, 2.0),
/// ));
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryModel {
    /// Model name.
    pub name: String,
    /// Boolean variables, indexed by [`VarId`].
    pub vars: Vec<BoolVar>,
    /// Constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl BinaryModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a boolean variable and returns its handle.
    pub fn add_bool_var(&mut self, var: BoolVar) -> VarId {
        self.vars.push(var);
        VarId(self.vars.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add `expr <= rhs`.
    pub fn add_le(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Sense::LessEq, rhs);
    }

    /// Convenience: add `expr == rhs`.
    pub fn add_eq(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Sense::Equal, rhs);
    }

    /// Convenience: add `expr >= rhs`.
    pub fn add_ge(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Sense::GreaterEq, rhs);
    }

    fn push(&mut self, name: impl Into<String>, expr: LinearExpr, sense: Sense, rhs: f64) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        });
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// Validates the model for consistency.
    ///
    /// Checks that variable names are unique, every referenced variable
    /// exists, all coefficients are finite and an objective is set.
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::with_capacity(self.vars.len());
        for var in &self.vars {
            if !names.insert(var.name.as_str()) {
                return Err(format!("duplicate variable name: {}", var.name));
            }
        }

        let Some(objective) = &self.objective else {
            return Err(format!("model {} has no objective", self.name));
        };
        self.check_expr("objective", objective.expr())?;

        for constraint in &self.constraints {
            self.check_expr(&constraint.name, &constraint.expr)?;
            if !constraint.rhs.is_finite() {
                return Err(format!("{}: non-finite right-hand side", constraint.name));
            }
        }
        Ok(())
    }

    fn check_expr(&self, label: &str, expr: &LinearExpr) -> Result<(), String> {
        for &(var, coef) in &expr.terms {
            if var.0 >= self.vars.len() {
                return Err(format!("{label}: undefined variable #{}", var.0));
            }
            if !coef.is_finite() {
                return Err(format!(
                    "{label}: non-finite coefficient on {}",
                    self.vars[var.0].name
                ));
            }
        }
        Ok(())
    }

    /// Returns the names of all constraints violated by `values`.
    pub fn violated_constraints(&self, values: &[f64], tol: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tol))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
