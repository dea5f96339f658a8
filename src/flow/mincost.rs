use std::fmt::Debug;

use num_traits::Float;

use crate::error::{Error, Result};
use crate::flow::maximum_flow::validate;

/// External linear-programming collaborator for the minimum-cost flow
/// variant. Implementations minimize `sum(cost[u][v] * flow[u][v])` subject
/// to `demand[u][v] <= flow[u][v] <= capacity[u][v]` and flow conservation
/// at every vertex except `source` and `sink`, returning the flow matrix.
/// An infeasible program is reported as [`Error::Infeasible`].
pub trait LpSolver<T> {
    fn solve(
        &self,
        cost: &[Vec<T>],
        capacity: &[Vec<T>],
        demand: &[Vec<T>],
        source: usize,
        sink: usize,
    ) -> Result<Vec<Vec<T>>>;
}

/// Computes a minimum-cost flow by delegating to an external LP solver.
///
/// This crate only owns the contract: the matrices are checked for shape
/// and sign before the solver runs, and an infeasibility report comes back
/// to the caller unmodified, with no retry or reinterpretation.
pub fn mincost_flow<T, S>(
    solver: &S,
    cost: &[Vec<T>],
    capacity: &[Vec<T>],
    demand: &[Vec<T>],
    source: usize,
    sink: usize,
) -> Result<Vec<Vec<T>>>
where
    T: Float + Debug,
    S: LpSolver<T>,
{
    let n = validate(capacity, source, sink)?;
    for (name, matrix) in [("cost", cost), ("demand", demand)] {
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(Error::InvalidInput(format!(
                "{name} matrix must match the capacity matrix dimension"
            )));
        }
    }
    for u in 0..n {
        for v in 0..n {
            if demand[u][v] > capacity[u][v] {
                return Err(Error::InvalidInput(format!(
                    "demand exceeds capacity on edge ({u}, {v})"
                )));
            }
        }
    }
    solver.solve(cost, capacity, demand, source, sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the matrices it was handed and returns a canned answer.
    struct FakeSolver {
        answer: Result<Vec<Vec<f64>>>,
    }

    impl LpSolver<f64> for FakeSolver {
        fn solve(
            &self,
            _cost: &[Vec<f64>],
            _capacity: &[Vec<f64>],
            _demand: &[Vec<f64>],
            _source: usize,
            _sink: usize,
        ) -> Result<Vec<Vec<f64>>> {
            self.answer.clone()
        }
    }

    fn square(value: f64) -> Vec<Vec<f64>> {
        vec![vec![value; 3]; 3]
    }

    #[test]
    fn delegates_to_the_solver() {
        let solver = FakeSolver {
            answer: Ok(square(1.0)),
        };
        let flow = mincost_flow(&solver, &square(1.0), &square(4.0), &square(0.0), 0, 2).unwrap();
        assert_eq!(flow, square(1.0));
    }

    #[test]
    fn infeasibility_is_surfaced_unmodified() {
        let solver = FakeSolver {
            answer: Err(Error::Infeasible("demand unmet".to_string())),
        };
        let result = mincost_flow(&solver, &square(1.0), &square(4.0), &square(0.0), 0, 2);
        assert_eq!(result, Err(Error::Infeasible("demand unmet".to_string())));
    }

    #[test]
    fn rejects_mismatched_matrices() {
        let solver = FakeSolver {
            answer: Ok(square(0.0)),
        };
        let short_cost = vec![vec![0.0; 3]; 2];
        assert!(matches!(
            mincost_flow(&solver, &short_cost, &square(4.0), &square(0.0), 0, 2),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_demand_above_capacity() {
        let solver = FakeSolver {
            answer: Ok(square(0.0)),
        };
        assert!(matches!(
            mincost_flow(&solver, &square(1.0), &square(4.0), &square(5.0), 0, 2),
            Err(Error::InvalidInput(_))
        ));
    }
}
