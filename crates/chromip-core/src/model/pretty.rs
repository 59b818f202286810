//! Human-readable ASCII model formatting.

use std::fmt::Write as _;

use chromip_expr::ids::{ConstraintId, VariableId};

use crate::model::Model;
use crate::types::{Bounds, Sense};

const FLOAT_EQ_EPSILON: f64 = 1e-12;
const PREVIEW_CONSTRAINTS: usize = 20;
const PREVIEW_TERMS: usize = 30;
const PREVIEW_DOMAIN_ITEMS: usize = 20;

/// Formatting controls for pretty-print output.
#[derive(Debug, Clone, Copy)]
pub struct PrettyPrintOptions {
    /// Maximum number of constraints to render.
    pub constraints: Option<usize>,
    /// Maximum number of terms to render per linear expression.
    pub terms: Option<usize>,
    /// Maximum number of variables listed in the domain section.
    pub domain_items: Option<usize>,
}

impl PrettyPrintOptions {
    /// Preview mode used by terse displays.
    pub fn preview() -> Self {
        Self {
            constraints: Some(PREVIEW_CONSTRAINTS),
            terms: Some(PREVIEW_TERMS),
            domain_items: Some(PREVIEW_DOMAIN_ITEMS),
        }
    }

    /// Full mode with no truncation.
    pub fn full() -> Self {
        Self {
            constraints: None,
            terms: None,
            domain_items: None,
        }
    }
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self::preview()
    }
}

struct ConstraintRenderLine {
    lhs: String,
    op: &'static str,
    rhs: String,
}

impl Model {
    /// Render the model to ASCII, using names where they are set.
    pub fn format_ascii(&self, options: PrettyPrintOptions) -> String {
        let mut lines = vec![self.render_objective_line(options.terms), String::new()];
        lines.push("s.t.".to_string());

        let rows = self.rows();
        let total_constraints = self.num_constraints();
        let constraint_limit = options
            .constraints
            .unwrap_or(total_constraints)
            .min(total_constraints);

        if constraint_limit == 0 {
            lines.push(" (none)".to_string());
        } else {
            let mut rendered = Vec::with_capacity(constraint_limit);
            for (idx, row) in rows.iter().enumerate().take(constraint_limit) {
                let constraint_id = ConstraintId::new(idx as u32);
                let mut lhs = self.format_linear_expression(row, options.terms);
                if let Some(label) = self.get_constraint_name(constraint_id) {
                    lhs = format!("{label}: {lhs}");
                }
                if let Ok(constraint) = self.get_constraint(constraint_id) {
                    rendered.push(render_constraint_line(lhs, constraint.bounds));
                }
            }

            let lhs_width = rendered
                .iter()
                .map(|entry: &ConstraintRenderLine| entry.lhs.len())
                .max()
                .unwrap_or(0);
            for entry in rendered {
                lines.push(format!(
                    " {:lhs_width$} {:>2} {}",
                    entry.lhs,
                    entry.op,
                    entry.rhs,
                    lhs_width = lhs_width
                ));
            }
        }

        if constraint_limit < total_constraints {
            lines.push(format!(
                " ... ({} more constraints)",
                total_constraints - constraint_limit
            ));
        }

        let mut binary_vars = Vec::new();
        let mut other_vars = Vec::new();
        for (var_id, var) in self.variables() {
            let label = self.variable_label(var_id);
            if var.is_binary() {
                binary_vars.push(label);
            } else {
                other_vars.push(format_variable_bounds_line(&label, var.bounds));
            }
        }

        if !binary_vars.is_empty() || !other_vars.is_empty() {
            lines.push(String::new());
        }
        if !binary_vars.is_empty() {
            lines.push(format_variable_group_line(
                "Binary",
                &binary_vars,
                options.domain_items,
            ));
        }
        if !other_vars.is_empty() {
            lines.push(format_variable_group_line(
                "Bounds",
                &other_vars,
                options.domain_items,
            ));
        }

        lines.join("\n")
    }

    fn render_objective_line(&self, max_terms: Option<usize>) -> String {
        let objective = self.objective();
        let Some(sense) = objective.sense else {
            return "Objective: (not set)".to_string();
        };

        let sense_label = match sense {
            Sense::Minimize => "Min",
            Sense::Maximize => "Max",
        };
        let mut expr = self.format_linear_expression(&objective.terms, max_terms);
        if !float_approx_equal(objective.constant, 0.0) {
            if objective.terms.is_empty() {
                expr = format_ascii_number(objective.constant);
            } else if objective.constant < 0.0 {
                let _ = write!(expr, " - {}", format_ascii_number(-objective.constant));
            } else {
                let _ = write!(expr, " + {}", format_ascii_number(objective.constant));
            }
        }
        match self.get_objective_name() {
            Some(name) => format!("{sense_label} {name}: {expr}"),
            None => format!("{sense_label} {expr}"),
        }
    }

    fn format_linear_expression(
        &self,
        terms: &[(VariableId, f64)],
        max_terms: Option<usize>,
    ) -> String {
        let nonzero_terms: Vec<(VariableId, f64)> = terms
            .iter()
            .copied()
            .filter(|(_, coeff)| !float_approx_equal(*coeff, 0.0))
            .collect();
        if nonzero_terms.is_empty() {
            return "0".to_string();
        }

        let term_limit = max_terms
            .unwrap_or(nonzero_terms.len())
            .min(nonzero_terms.len());
        let mut rendered = String::new();

        for (idx, (var_id, coeff)) in nonzero_terms.iter().take(term_limit).enumerate() {
            let negative = *coeff < 0.0;
            let abs_coeff = coeff.abs();
            let label = self.variable_label(*var_id);
            let term_body = if float_approx_equal(abs_coeff, 1.0) {
                label
            } else {
                format!("{} {label}", format_ascii_number(abs_coeff))
            };

            if idx == 0 {
                if negative {
                    rendered.push('-');
                }
                rendered.push_str(&term_body);
            } else if negative {
                let _ = write!(rendered, " - {term_body}");
            } else {
                let _ = write!(rendered, " + {term_body}");
            }
        }

        if term_limit < nonzero_terms.len() {
            let _ = write!(
                rendered,
                " + ... ({} more terms)",
                nonzero_terms.len() - term_limit
            );
        }

        rendered
    }

    fn variable_label(&self, var_id: VariableId) -> String {
        self.get_variable_name(var_id)
            .map_or_else(|| format!("v[{}]", var_id.inner()), ToString::to_string)
    }
}

fn render_constraint_line(lhs: String, bounds: Bounds) -> ConstraintRenderLine {
    if float_approx_equal(bounds.lower, bounds.upper) {
        return ConstraintRenderLine {
            lhs,
            op: "=",
            rhs: format_ascii_number(bounds.upper),
        };
    }
    if bounds.lower == f64::NEG_INFINITY && bounds.upper.is_finite() {
        return ConstraintRenderLine {
            lhs,
            op: "<=",
            rhs: format_ascii_number(bounds.upper),
        };
    }
    if bounds.upper == f64::INFINITY && bounds.lower.is_finite() {
        return ConstraintRenderLine {
            lhs,
            op: ">=",
            rhs: format_ascii_number(bounds.lower),
        };
    }
    if bounds.lower.is_finite() && bounds.upper.is_finite() {
        return ConstraintRenderLine {
            lhs,
            op: "in",
            rhs: format!(
                "[{}, {}]",
                format_ascii_number(bounds.lower),
                format_ascii_number(bounds.upper)
            ),
        };
    }
    ConstraintRenderLine {
        lhs,
        op: "  ",
        rhs: "free".to_string(),
    }
}

/// Shared numeric formatter for ASCII pretty-print output.
pub fn format_ascii_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }

    let mut rendered = format!("{value:.12}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    if rendered == "-0" {
        "0".to_string()
    } else {
        rendered
    }
}

fn float_approx_equal(lhs: f64, rhs: f64) -> bool {
    if lhs.to_bits() == rhs.to_bits() {
        return true;
    }
    if !lhs.is_finite() || !rhs.is_finite() {
        return false;
    }
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= FLOAT_EQ_EPSILON * scale
}

fn format_variable_group_line(
    label: &str,
    variables: &[String],
    max_items: Option<usize>,
) -> String {
    let limit = max_items.unwrap_or(variables.len()).min(variables.len());
    let mut line = format!("{label}: ");
    line.push_str(&variables[..limit].join(", "));
    if limit < variables.len() {
        if limit > 0 {
            line.push_str(", ");
        }
        let _ = write!(line, "... ({} more)", variables.len() - limit);
    }
    line
}

fn format_variable_bounds_line(label: &str, bounds: Bounds) -> String {
    match (bounds.lower.is_finite(), bounds.upper.is_finite()) {
        (true, true) => format!(
            "{} <= {label} <= {}",
            format_ascii_number(bounds.lower),
            format_ascii_number(bounds.upper)
        ),
        (true, false) => format!("{} <= {label}", format_ascii_number(bounds.lower)),
        (false, true) => format!("{label} <= {}", format_ascii_number(bounds.upper)),
        (false, false) => format!("{label} free"),
    }
}
