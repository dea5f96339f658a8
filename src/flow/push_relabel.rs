use std::collections::VecDeque;
use std::fmt::Debug;

use num_traits::Float;

use crate::flow::residual::ResidualNetwork;

/// Scratch state of one push-relabel run. Heights only ever increase once
/// set; `count[h]` tracks how many vertices sit at height `h` so the gap
/// heuristic can detect an emptied level.
struct Scratch<T> {
    excess: Vec<T>,
    height: Vec<usize>,
    active: Vec<bool>,
    count: Vec<usize>,
    queue: VecDeque<usize>,
}

/// Computes the maximum flow from `source` to `target` with the FIFO
/// push-relabel algorithm and the gap heuristic.
///
/// Heights are seeded with the BFS distance to the target (vertices that
/// cannot reach it start at `n`, alongside the source), every source edge is
/// saturated, and vertices with excess are discharged in FIFO order until
/// the queue drains. The flow value is the excess absorbed at the target.
/// Runs in `O(V^3)`.
pub fn push_relabel<T>(net: &mut ResidualNetwork<T>, source: usize, target: usize) -> T
where
    T: Float + Debug,
{
    let n = net.vertex_count();
    let mut s = Scratch {
        excess: vec![T::zero(); n],
        height: initial_heights(net, source, target),
        active: vec![false; n],
        count: vec![0; 2 * n + 2],
        queue: VecDeque::new(),
    };
    for &h in &s.height {
        s.count[h] += 1;
    }
    // Source and target are permanently "active" so they are never enqueued
    // and never discharged.
    s.active[source] = true;
    s.active[target] = true;

    for i in 0..net.neighbors(source).len() {
        let v = net.neighbors(source)[i];
        let cap = net.residual(source, v);
        if cap > T::zero() {
            net.push_flow(source, v, cap);
            s.excess[v] = s.excess[v] + cap;
            enqueue_vertex(v, &mut s);
        }
    }

    while let Some(v) = s.queue.pop_front() {
        s.active[v] = false;
        discharge(net, v, &mut s, source, n);
    }
    s.excess[target]
}

/// BFS distance to `target` over capacity edges, walked backwards. The
/// source and every vertex that cannot reach the target start at `n`, which
/// keeps the height invariant valid: no residual edge can leave the
/// unreachable set toward a reachable vertex.
fn initial_heights<T>(net: &ResidualNetwork<T>, source: usize, target: usize) -> Vec<usize>
where
    T: Float + Debug,
{
    let n = net.vertex_count();
    let mut height = vec![n; n];
    height[target] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(target);
    while let Some(v) = queue.pop_front() {
        for &u in net.neighbors(v) {
            if u != source && height[u] == n && net.capacity(u, v) > T::zero() {
                height[u] = height[v] + 1;
                queue.push_back(u);
            }
        }
    }
    height[source] = n;
    height
}

/// Enqueues `v` unless it is already queued (or is the source/target).
fn enqueue_vertex<T>(v: usize, s: &mut Scratch<T>)
where
    T: Float + Debug,
{
    if !s.active[v] && s.excess[v] > T::zero() {
        s.active[v] = true;
        s.queue.push_back(v);
    }
}

/// Drains the excess out of `v`: pushes along admissible edges
/// (`height[v] == height[u] + 1`, positive residual) and, when stuck,
/// either runs the gap heuristic (if `v` is alone at its height) or
/// relabels `v` to one above its lowest residual neighbor.
fn discharge<T>(net: &mut ResidualNetwork<T>, v: usize, s: &mut Scratch<T>, source: usize, n: usize)
where
    T: Float + Debug,
{
    while s.excess[v] > T::zero() {
        for i in 0..net.neighbors(v).len() {
            if s.excess[v] <= T::zero() {
                break;
            }
            let u = net.neighbors(v)[i];
            let residual = net.residual(v, u);
            if residual > T::zero() && s.height[v] == s.height[u] + 1 {
                let amount = s.excess[v].min(residual);
                net.push_flow(v, u, amount);
                s.excess[v] = s.excess[v] - amount;
                s.excess[u] = s.excess[u] + amount;
                enqueue_vertex(u, s);
            }
        }
        if s.excess[v] > T::zero() {
            if s.count[s.height[v]] == 1 && s.height[v] < n {
                // v is alone at its height: emptying it opens a gap.
                gap(s.height[v], s, source, n);
            } else {
                relabel(net, v, s);
            }
        }
    }
}

/// Lifts `v` to one above its lowest residual neighbor, the minimum
/// increment that restores an admissible edge.
fn relabel<T>(net: &ResidualNetwork<T>, v: usize, s: &mut Scratch<T>)
where
    T: Float + Debug,
{
    let mut lowest = usize::MAX;
    for &u in net.neighbors(v) {
        if net.residual(v, u) > T::zero() {
            lowest = lowest.min(s.height[u]);
        }
    }
    assert!(
        lowest != usize::MAX,
        "relabel on vertex {v} with no residual neighbor"
    );
    s.count[s.height[v]] -= 1;
    s.height[v] = lowest + 1;
    s.count[s.height[v]] += 1;
}

/// Gap heuristic: height `h` is about to empty, so no vertex above it can
/// still reach the target through descending heights. Lift everything above
/// `h` straight to `n + 1`, short-circuiting the individual relabels.
fn gap<T>(h: usize, s: &mut Scratch<T>, source: usize, n: usize)
where
    T: Float + Debug,
{
    for w in 0..s.height.len() {
        if w != source && s.height[w] >= h && s.height[w] <= n {
            s.count[s.height[w]] -= 1;
            s.height[w] = n + 1;
            s.count[n + 1] += 1;
        }
    }
}
