//! Mapping HiGHS model statuses onto the shared solver statuses.

use crate::ffi::HighsStatus;
use chromip_core::SolverStatus;

pub(crate) fn highs_to_core_status(status: HighsStatus) -> SolverStatus {
    match status {
        HighsStatus::Optimal => SolverStatus::Optimal,
        HighsStatus::Infeasible => SolverStatus::Infeasible,
        HighsStatus::Unbounded => SolverStatus::Unbounded,
        HighsStatus::ReachedTimeLimit => SolverStatus::ReachedTimeLimit,
        HighsStatus::ReachedIterationLimit => SolverStatus::ReachedIterationLimit,
        HighsStatus::UnboundedOrInfeasible | HighsStatus::Unknown => SolverStatus::Unknown,
    }
}

/// Limit statuses only count when HiGHS produced an incumbent.
pub(crate) fn highs_has_solution(status: HighsStatus, objective_value: f64) -> bool {
    match status {
        HighsStatus::Optimal => true,
        HighsStatus::ReachedTimeLimit | HighsStatus::ReachedIterationLimit => {
            objective_value.is_finite()
        }
        _ => false,
    }
}
