//! Binary decision variables and linear expressions over them.

/// Handle to a variable inside a [`BinaryModel`](super::BinaryModel).
///
/// Handles are dense indices assigned in insertion order, so a solver can
/// return its assignment as a plain `Vec<f64>` indexed by `VarId::index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of this variable in the model's variable list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A boolean (0/1) decision variable.
#[derive(Debug, Clone)]
pub struct BoolVar {
    /// Variable name, unique within a model.
    pub name: String,
    /// Fixed value, if any.
    pub fixed: Option<bool>,
}

impl BoolVar {
    /// Creates a free boolean variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }

    /// Creates a boolean variable pinned to `value`.
    pub fn fixed(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            fixed: Some(value),
        }
    }

    /// Whether this variable is pinned.
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }
}

/// A linear combination `Σ coefficient · variable`.
///
/// Terms are kept as pushed; repeated variables are summed on evaluation
/// and by the backend.
///
/// # Examples
///
/// ```
/// use fpl_squad::milp::{BinaryModel, BoolVar, LinearExpr};
///
/// let mut model = BinaryModel::new("example");
/// let a = model.add_bool_var(BoolVar::new("a"));
/// let b = model.add_bool_var(BoolVar::new("b"));
///
/// let expr = LinearExpr::new().with_term(a, 2.0).with_term(b, 3.5);
/// assert_eq!(expr.len(), 2);
/// assert!((expr.evaluate(&[1.0, 1.0]) - 5.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    /// (variable, coefficient) pairs.
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Sum of the given variables, each with coefficient 1.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression against an assignment indexed by [`VarId`].
    ///
    /// Variables outside the assignment count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum()
    }
}
