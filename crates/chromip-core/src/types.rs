use chromip_expr::ComparisonSense;
use chromip_expr::ids::VariableId;

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "min",
            Sense::Maximize => "max",
        }
    }
}

/// Bounds for a variable or constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `lower <= upper` and neither side is NaN.
    pub fn is_valid(&self) -> bool {
        !self.lower.is_nan() && !self.upper.is_nan() && self.lower <= self.upper
    }

    /// Bounds representing `expr (sense) rhs`.
    pub fn from_sense(sense: ComparisonSense, rhs: f64) -> Self {
        match sense {
            ComparisonSense::LessEqual => Bounds::new(f64::NEG_INFINITY, rhs),
            ComparisonSense::GreaterEqual => Bounds::new(rhs, f64::INFINITY),
            ComparisonSense::Equal => Bounds::new(rhs, rhs),
        }
    }
}

/// A decision variable with bounds and integrality constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub bounds: Bounds,
    pub is_integer: bool,
}

impl Variable {
    /// Create a binary variable with bounds [0, 1] and integer constraint.
    pub fn binary() -> Self {
        Self {
            bounds: Bounds::new(0.0, 1.0),
            is_integer: true,
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn continuous(bounds: Bounds) -> Self {
        Self {
            bounds,
            is_integer: false,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(bounds: Bounds) -> Self {
        Self {
            bounds,
            is_integer: true,
        }
    }

    /// Integer with domain exactly {0, 1}.
    #[allow(clippy::float_cmp)]
    pub fn is_binary(&self) -> bool {
        self.is_integer && self.bounds.lower == 0.0 && self.bounds.upper == 1.0
    }
}

/// A constraint row with lower and upper activity bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub bounds: Bounds,
}

impl Constraint {
    /// Relational operator and right-hand side, or `None` for a ranged row.
    #[allow(clippy::float_cmp)]
    pub fn sense(&self) -> Option<(ComparisonSense, f64)> {
        let Bounds { lower, upper } = self.bounds;
        if lower == upper {
            Some((ComparisonSense::Equal, lower))
        } else if lower == f64::NEG_INFINITY {
            Some((ComparisonSense::LessEqual, upper))
        } else if upper == f64::INFINITY {
            Some((ComparisonSense::GreaterEqual, lower))
        } else {
            None
        }
    }

    /// Whether a row activity lies within bounds, up to `tolerance`.
    pub fn is_satisfied_by(&self, activity: f64, tolerance: f64) -> bool {
        activity >= self.bounds.lower - tolerance && activity <= self.bounds.upper + tolerance
    }
}

/// Objective function with a sense, linear terms and a constant offset.
#[derive(Debug, Clone, Default)]
pub struct Objective {
    pub sense: Option<Sense>,
    pub terms: Vec<(VariableId, f64)>,
    pub constant: f64,
}

impl Objective {
    /// Create a new empty objective
    pub fn new() -> Self {
        Self::default()
    }
}
