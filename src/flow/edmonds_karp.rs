use std::collections::VecDeque;
use std::fmt::Debug;

use num_traits::Float;

use crate::flow::residual::ResidualNetwork;

/// Computes the maximum flow from `source` to `target` with the
/// Edmonds-Karp algorithm: repeatedly augment along a shortest
/// (fewest-edges) path in the residual network until none exists.
///
/// The flow matrix is left in `net`; the return value is the total flow.
/// Runs in `O(V * E^2)`.
pub fn edmonds_karp<T>(net: &mut ResidualNetwork<T>, source: usize, target: usize) -> T
where
    T: Float + Debug,
{
    let mut parent = vec![None; net.vertex_count()];
    let mut value = T::zero();
    while find_augmenting_path(net, source, target, &mut parent) {
        value = value + augment_path(net, source, target, &parent);
    }
    value
}

/// BFS over positive-residual edges. Returns `true` when `target` was
/// reached, leaving the predecessor of each visited vertex in `parent`.
fn find_augmenting_path<T>(
    net: &ResidualNetwork<T>,
    source: usize,
    target: usize,
    parent: &mut [Option<usize>],
) -> bool
where
    T: Float + Debug,
{
    let n = net.vertex_count();
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    parent.fill(None);
    visited[source] = true;
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        for &v in net.neighbors(u) {
            if !visited[v] && net.residual(u, v) > T::zero() {
                visited[v] = true;
                parent[v] = Some(u);
                if v == target {
                    return true;
                }
                queue.push_back(v);
            }
        }
    }
    false
}

/// Pushes the bottleneck residual capacity along the path recorded in
/// `parent` and returns it.
fn augment_path<T>(
    net: &mut ResidualNetwork<T>,
    source: usize,
    target: usize,
    parent: &[Option<usize>],
) -> T
where
    T: Float + Debug,
{
    let mut bottleneck = T::infinity();
    let mut v = target;
    while v != source {
        let u = parent[v].expect("augmenting path must reach the source");
        bottleneck = bottleneck.min(net.residual(u, v));
        v = u;
    }

    let mut v = target;
    while v != source {
        let u = parent[v].expect("augmenting path must reach the source");
        net.push_flow(u, v, bottleneck);
        v = u;
    }
    bottleneck
}
