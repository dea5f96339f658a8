use std::collections::VecDeque;
use std::fmt::Debug;

use num_traits::Float;

use crate::flow::residual::ResidualNetwork;

const NO_LEVEL: usize = usize::MAX;

/// Outcome of one bidirectional path search inside a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathStatus {
    /// The searches met at the contained vertex.
    Found(usize),
    /// The forward search exhausted its frontier before reaching the target.
    NoPathToTarget,
    /// The backward search exhausted its frontier before reaching the source.
    NoPathToSource,
}

/// Computes the maximum flow from `source` to `target` with Dinic's
/// algorithm. Work is organized into phases: a BFS from `source` assigns
/// levels, then a blocking flow is extracted from the level graph; the
/// algorithm ends on the first phase whose level BFS cannot reach the
/// target. Runs in `O(V^2 * E)`.
pub fn dinic<T>(net: &mut ResidualNetwork<T>, source: usize, target: usize) -> T
where
    T: Float + Debug,
{
    let n = net.vertex_count();
    let mut level = vec![NO_LEVEL; n];
    let mut parent = vec![None; n];
    let mut successor = vec![None; n];
    let mut value = T::zero();

    while build_levels(net, source, target, &mut level) {
        log::debug!("dinic phase: target at level {}", level[target]);
        value = value + blocking_flow(net, source, target, &level, &mut parent, &mut successor);
    }
    value
}

/// BFS from `source` over positive-residual edges; `level[v]` becomes the
/// BFS distance. Returns `true` when the target is reachable.
fn build_levels<T>(
    net: &ResidualNetwork<T>,
    source: usize,
    target: usize,
    level: &mut [usize],
) -> bool
where
    T: Float + Debug,
{
    level.fill(NO_LEVEL);
    level[source] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        for &v in net.neighbors(u) {
            if level[v] == NO_LEVEL && net.residual(u, v) > T::zero() {
                level[v] = level[u] + 1;
                queue.push_back(v);
            }
        }
    }
    level[target] != NO_LEVEL
}

/// Saturates the level graph: fetches level-advancing augmenting paths until
/// none is left, pushing the bottleneck along each. Returns the flow added
/// during this phase.
fn blocking_flow<T>(
    net: &mut ResidualNetwork<T>,
    source: usize,
    target: usize,
    level: &[usize],
    parent: &mut [Option<usize>],
    successor: &mut [Option<usize>],
) -> T
where
    T: Float + Debug,
{
    let mut added = T::zero();
    while let PathStatus::Found(meet) = fetch_path(net, source, target, level, parent, successor) {
        // Bottleneck over source -> ... -> meet (parent links) and
        // meet -> ... -> target (successor links).
        let mut bottleneck = T::infinity();
        let mut v = meet;
        while let Some(u) = parent[v] {
            bottleneck = bottleneck.min(net.residual(u, v));
            v = u;
        }
        let mut v = meet;
        while let Some(w) = successor[v] {
            bottleneck = bottleneck.min(net.residual(v, w));
            v = w;
        }

        let mut v = meet;
        while let Some(u) = parent[v] {
            net.push_flow(u, v, bottleneck);
            v = u;
        }
        let mut v = meet;
        while let Some(w) = successor[v] {
            net.push_flow(v, w, bottleneck);
            v = w;
        }
        added = added + bottleneck;
    }
    added
}

/// Bidirectional BFS restricted to edges that advance exactly one level.
/// The two searches run in lockstep; on success the meeting vertex is
/// returned with the path recorded in `parent` (source side, pointing back)
/// and `successor` (target side, pointing forward). When the frontiers are
/// exhausted simultaneously the forward failure is reported; either failure
/// status ends the phase without touching the flow.
fn fetch_path<T>(
    net: &ResidualNetwork<T>,
    source: usize,
    target: usize,
    level: &[usize],
    parent: &mut [Option<usize>],
    successor: &mut [Option<usize>],
) -> PathStatus
where
    T: Float + Debug,
{
    let n = net.vertex_count();
    parent.fill(None);
    successor.fill(None);
    let mut seen_fwd = vec![false; n];
    let mut seen_bwd = vec![false; n];
    seen_fwd[source] = true;
    seen_bwd[target] = true;

    let mut fwd = VecDeque::new();
    let mut bwd = VecDeque::new();
    fwd.push_back(source);
    bwd.push_back(target);

    loop {
        let Some(u) = fwd.pop_front() else {
            return PathStatus::NoPathToTarget;
        };
        for &v in net.neighbors(u) {
            if !seen_fwd[v] && level[v] == level[u] + 1 && net.residual(u, v) > T::zero() {
                seen_fwd[v] = true;
                parent[v] = Some(u);
                if seen_bwd[v] {
                    return PathStatus::Found(v);
                }
                fwd.push_back(v);
            }
        }

        let Some(w) = bwd.pop_front() else {
            return PathStatus::NoPathToSource;
        };
        for &u in net.neighbors(w) {
            if !seen_bwd[u]
                && level[u] != NO_LEVEL
                && level[u] + 1 == level[w]
                && net.residual(u, w) > T::zero()
            {
                seen_bwd[u] = true;
                successor[u] = Some(w);
                if seen_fwd[u] {
                    return PathStatus::Found(u);
                }
                bwd.push_back(u);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::maximum_flow::tests::{assert_valid_flow, clrs_network, eight_vertex_network};

    #[test]
    fn clrs_example() {
        let mut net = ResidualNetwork::new(clrs_network());
        assert_eq!(dinic(&mut net, 0, 5), 23.0);
    }

    #[test]
    fn eight_vertex_example() {
        let capacity = eight_vertex_network();
        let mut net = ResidualNetwork::new(capacity.clone());
        assert_eq!(dinic(&mut net, 0, 7), 28.0);
        assert_valid_flow(&capacity, net.flow_matrix(), 0, 7, 28.0);
    }

    #[test]
    fn disconnected_target() {
        let capacity = vec![
            vec![0.0, 10.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 5.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ];
        let mut net = ResidualNetwork::new(capacity);
        assert_eq!(dinic(&mut net, 0, 3), 0.0);
    }

    #[test]
    fn two_parallel_paths_in_one_phase() {
        let capacity = vec![
            vec![0.0, 10.0, 5.0, 0.0],
            vec![0.0, 0.0, 0.0, 10.0],
            vec![0.0, 0.0, 0.0, 5.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ];
        let mut net = ResidualNetwork::new(capacity);
        assert_eq!(dinic(&mut net, 0, 3), 15.0);
    }
}
