use std::fmt::Debug;

use num_traits::Float;

use crate::error::{Error, Result};
use crate::flow::ext_multiroute::{breaking_points_impl, emrf, intersection_with_routes, BreakingPoint};
use crate::flow::kishimoto::kishimoto;
use crate::flow::maximum_flow::{validate, FlowAlgorithm, FlowResult};

/// The multiroute solvers. Kishimoto handles integer route counts;
/// the extended algorithm answers any nonnegative real count from the
/// breaking-point curve and is forced whenever the count is non-integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultirouteAlgorithm {
    #[default]
    Kishimoto,
    ExtendedMultirouteFlow,
}

/// Computes the maximum `routes`-route flow between `source` and `target`:
/// the largest flow that decomposes into `routes` edge-disjoint routes of
/// equal share. `routes == 1` is the classical max flow; non-integer route
/// counts are answered by the extended algorithm regardless of
/// `mrf_algorithm`.
pub fn multiroute_flow<T>(
    capacity: &[Vec<T>],
    source: usize,
    target: usize,
    routes: T,
    flow_algorithm: FlowAlgorithm,
    mrf_algorithm: MultirouteAlgorithm,
) -> Result<FlowResult<T>>
where
    T: Float + Debug,
{
    validate(capacity, source, target)?;
    if routes < T::one() || routes.is_nan() {
        return Err(Error::InvalidInput(
            "route count must be at least 1".to_string(),
        ));
    }
    let use_emrf = mrf_algorithm == MultirouteAlgorithm::ExtendedMultirouteFlow
        || routes.fract() != T::zero();
    if use_emrf {
        Ok(emrf(capacity, source, target, flow_algorithm, routes))
    } else {
        let k = routes
            .to_usize()
            .ok_or_else(|| Error::InvalidInput("route count too large".to_string()))?;
        Ok(kishimoto(capacity, source, target, flow_algorithm, k))
    }
}

/// The full breaking-point curve of the parametric multiroute flow, for
/// callers that want the whole function rather than one route count.
pub fn breaking_points<T>(
    capacity: &[Vec<T>],
    source: usize,
    target: usize,
) -> Result<Vec<BreakingPoint<T>>>
where
    T: Float + Debug,
{
    validate(capacity, source, target)?;
    Ok(breaking_points_impl(capacity, source, target))
}

/// Evaluates a precomputed breaking-point curve at `routes`. Pure
/// geometry; no graph is needed.
pub fn multiroute_flow_at<T>(points: &[BreakingPoint<T>], routes: T) -> T
where
    T: Float + Debug,
{
    intersection_with_routes(points, routes).1
}
