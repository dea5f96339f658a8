use std::fmt::Debug;

use num_traits::Float;

use crate::flow::ext_multiroute::tol;
use crate::flow::maximum_flow::{run_algorithm, FlowAlgorithm, FlowResult};
use crate::flow::residual::ResidualNetwork;

/// Kishimoto's algorithm for the maximum `routes`-route flow (integer
/// `routes >= 1`).
///
/// Every edge is capped at a uniform per-route restriction and the capped
/// network is solved with the chosen max-flow engine; as long as the value
/// falls short of `routes * restriction` a cut tighter than the classical
/// one has been revealed, so the restriction is lowered to `value / routes`
/// and the instance re-solved. The fixed point `value == routes *
/// restriction` (within the curve tolerance) is the multiroute flow. With
/// one route this degenerates to the classical max flow. The network
/// buffers are allocated once and reused across iterations.
pub(crate) fn kishimoto<T>(
    base: &[Vec<T>],
    source: usize,
    target: usize,
    algorithm: FlowAlgorithm,
    routes: usize,
) -> FlowResult<T>
where
    T: Float + Debug,
{
    let mut net = ResidualNetwork::new(base.to_vec());
    let (mut value, mut partition) = run_algorithm(&mut net, source, target, algorithm);
    if routes == 1 {
        return FlowResult {
            value,
            flow: net.flow_matrix().to_vec(),
            partition,
        };
    }

    let k = T::from(routes).expect("route count must be representable");
    let mut restriction = value / k;
    let mut iteration = 0usize;
    loop {
        net.restrict(base, restriction);
        net.reset();
        let (v, p) = run_algorithm(&mut net, source, target, algorithm);
        value = v;
        partition = p;
        iteration += 1;
        if value >= k * restriction - tol() {
            break;
        }
        restriction = value / k;
    }
    log::debug!("kishimoto converged after {iteration} restricted solves");

    FlowResult {
        value,
        flow: net.flow_matrix().to_vec(),
        partition,
    }
}
