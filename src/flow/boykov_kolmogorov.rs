use std::collections::VecDeque;
use std::fmt::Debug;

use num_traits::Float;

use crate::flow::maximum_flow::CutSide;
use crate::flow::residual::ResidualNetwork;

/// Computes the maximum flow from `source` to `target` with the
/// Boykov-Kolmogorov algorithm and returns it together with the three-way
/// vertex partition the search trees induce at convergence.
///
/// Two trees are grown, one from each terminal, along non-saturated edges.
/// When they touch, the connecting path is augmented, which saturates at
/// least one edge and orphans the subtrees hanging below it; orphans are
/// then re-attached or freed through an explicit worklist (no recursion, so
/// adversarial inputs cannot blow the stack). Vertices still free when no
/// connecting edge remains are reported as [`CutSide::Unreachable`].
pub fn boykov_kolmogorov<T>(
    net: &mut ResidualNetwork<T>,
    source: usize,
    target: usize,
) -> (T, Vec<CutSide>)
where
    T: Float + Debug,
{
    let n = net.vertex_count();
    let mut tree = vec![CutSide::Unreachable; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut active = VecDeque::new();
    let mut queued = vec![false; n];
    let mut orphans = Vec::new();

    tree[source] = CutSide::Source;
    tree[target] = CutSide::Target;
    for v in [source, target] {
        active.push_back(v);
        queued[v] = true;
    }

    let mut value = T::zero();
    while let Some((s_end, t_end)) = grow(net, &mut tree, &mut parent, &mut active, &mut queued) {
        value = value + augment(net, source, target, s_end, t_end, &tree, &mut parent, &mut orphans);
        adopt(
            net,
            source,
            target,
            &mut tree,
            &mut parent,
            &mut active,
            &mut queued,
            &mut orphans,
        );
    }
    (value, tree)
}

/// Residual capacity of the tree edge `u -> v`: a source-tree parent feeds
/// its child, a target-tree parent drains it.
fn tree_residual<T>(net: &ResidualNetwork<T>, side: CutSide, u: usize, v: usize) -> T
where
    T: Float + Debug,
{
    match side {
        CutSide::Target => net.residual(v, u),
        _ => net.residual(u, v),
    }
}

/// Growth phase: extend both trees from the active frontier until a
/// positive-residual edge connects them. Returns the endpoints of that edge
/// ordered (source side, target side), or `None` once the frontier is
/// exhausted, which terminates the whole algorithm.
fn grow<T>(
    net: &ResidualNetwork<T>,
    tree: &mut [CutSide],
    parent: &mut [Option<usize>],
    active: &mut VecDeque<usize>,
    queued: &mut [bool],
) -> Option<(usize, usize)>
where
    T: Float + Debug,
{
    while let Some(&p) = active.front() {
        if tree[p] != CutSide::Unreachable {
            for &q in net.neighbors(p) {
                if tree_residual(net, tree[p], p, q) <= T::zero() {
                    continue;
                }
                if tree[q] == CutSide::Unreachable {
                    tree[q] = tree[p];
                    parent[q] = Some(p);
                    if !queued[q] {
                        queued[q] = true;
                        active.push_back(q);
                    }
                } else if tree[q] != tree[p] {
                    // Leave p on the frontier; it may have more connections.
                    return match tree[p] {
                        CutSide::Source => Some((p, q)),
                        _ => Some((q, p)),
                    };
                }
            }
        }
        active.pop_front();
        queued[p] = false;
    }
    None
}

/// Augmentation phase: push the bottleneck along
/// `source -> .. -> s_end -> t_end -> .. -> target` and orphan every tree
/// vertex whose parent edge saturates.
#[allow(clippy::too_many_arguments)]
fn augment<T>(
    net: &mut ResidualNetwork<T>,
    source: usize,
    target: usize,
    s_end: usize,
    t_end: usize,
    tree: &[CutSide],
    parent: &mut [Option<usize>],
    orphans: &mut Vec<usize>,
) -> T
where
    T: Float + Debug,
{
    // source-side path, root first.
    let mut left = vec![s_end];
    let mut v = s_end;
    while v != source {
        v = parent[v].expect("source tree vertex must be rooted");
        left.push(v);
    }
    left.reverse();

    // target-side path, connection first.
    let mut right = vec![t_end];
    let mut v = t_end;
    while v != target {
        v = parent[v].expect("target tree vertex must be rooted");
        right.push(v);
    }

    let mut bottleneck = net.residual(s_end, t_end);
    for w in left.windows(2) {
        bottleneck = bottleneck.min(net.residual(w[0], w[1]));
    }
    for w in right.windows(2) {
        bottleneck = bottleneck.min(net.residual(w[0], w[1]));
    }

    net.push_flow(s_end, t_end, bottleneck);
    for w in left.windows(2) {
        net.push_flow(w[0], w[1], bottleneck);
        if net.residual(w[0], w[1]) <= T::zero() && tree[w[1]] == CutSide::Source {
            parent[w[1]] = None;
            orphans.push(w[1]);
        }
    }
    for w in right.windows(2) {
        net.push_flow(w[0], w[1], bottleneck);
        if net.residual(w[0], w[1]) <= T::zero() && tree[w[0]] == CutSide::Target {
            parent[w[0]] = None;
            orphans.push(w[0]);
        }
    }
    bottleneck
}

/// Adoption phase: re-attach each orphan to a rooted parent within its own
/// tree, or free it and orphan its children in turn. Runs the worklist to a
/// fixed point.
#[allow(clippy::too_many_arguments)]
fn adopt<T>(
    net: &ResidualNetwork<T>,
    source: usize,
    target: usize,
    tree: &mut [CutSide],
    parent: &mut [Option<usize>],
    active: &mut VecDeque<usize>,
    queued: &mut [bool],
    orphans: &mut Vec<usize>,
) where
    T: Float + Debug,
{
    while let Some(v) = orphans.pop() {
        let side = tree[v];
        let new_parent = net.neighbors(v).iter().copied().find(|&u| {
            tree[u] == side
                && tree_residual(net, side, u, v) > T::zero()
                && is_rooted(u, parent, source, target)
        });
        match new_parent {
            Some(u) => parent[v] = Some(u),
            None => {
                for &u in net.neighbors(v) {
                    if tree[u] == side {
                        if tree_residual(net, side, u, v) > T::zero() && !queued[u] {
                            queued[u] = true;
                            active.push_back(u);
                        }
                        if parent[u] == Some(v) {
                            parent[u] = None;
                            orphans.push(u);
                        }
                    }
                }
                tree[v] = CutSide::Unreachable;
            }
        }
    }
}

/// Whether the parent chain of `u` reaches a terminal (orphans in progress
/// have a severed chain and must not adopt anyone).
fn is_rooted(mut u: usize, parent: &[Option<usize>], source: usize, target: usize) -> bool {
    loop {
        if u == source || u == target {
            return true;
        }
        match parent[u] {
            Some(p) => u = p,
            None => return false,
        }
    }
}
