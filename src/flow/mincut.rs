use std::collections::VecDeque;
use std::fmt::Debug;

use num_traits::Float;

use crate::error::Result;
use crate::flow::maximum_flow::{maximum_flow, CutSide, FlowAlgorithm};

/// A minimum source/target cut: the two vertex sets and the total capacity
/// crossing from the source side, which equals the maximum flow value.
#[derive(Debug, Clone, PartialEq)]
pub struct MinCut<T> {
    pub source_side: Vec<usize>,
    pub target_side: Vec<usize>,
    pub value: T,
}

/// Computes the minimum cut between `source` and `target`.
///
/// Runs the chosen max-flow algorithm to exhaustion, then classifies
/// vertices: for Boykov-Kolmogorov the search trees already partition the
/// graph (free vertices land on the target side, which keeps the cut free
/// of residual crossings); for the other algorithms one BFS from the source
/// over positive-residual edges does it.
pub fn mincut<T>(
    capacity: &[Vec<T>],
    source: usize,
    target: usize,
    algorithm: FlowAlgorithm,
) -> Result<MinCut<T>>
where
    T: Float + Debug,
{
    let result = maximum_flow(capacity, source, target, algorithm)?;
    let n = capacity.len();

    let on_source_side: Vec<bool> = match result.partition {
        Some(partition) => partition.iter().map(|&s| s == CutSide::Source).collect(),
        None => residual_reachable(capacity, &result.flow, source),
    };

    let mut value = T::zero();
    for u in 0..n {
        if !on_source_side[u] {
            continue;
        }
        for v in 0..n {
            if !on_source_side[v] {
                value = value + capacity[u][v];
            }
        }
    }

    let source_side = (0..n).filter(|&v| on_source_side[v]).collect();
    let target_side = (0..n).filter(|&v| !on_source_side[v]).collect();
    Ok(MinCut {
        source_side,
        target_side,
        value,
    })
}

/// Vertices reachable from `source` through positive residual capacity in
/// the exhausted network.
fn residual_reachable<T>(capacity: &[Vec<T>], flow: &[Vec<T>], source: usize) -> Vec<bool>
where
    T: Float + Debug,
{
    let n = capacity.len();
    let mut reached = vec![false; n];
    let mut queue = VecDeque::new();
    reached[source] = true;
    queue.push_back(source);
    while let Some(u) = queue.pop_front() {
        for v in 0..n {
            if !reached[v] && capacity[u][v] - flow[u][v] > T::zero() {
                reached[v] = true;
                queue.push_back(v);
            }
        }
    }
    reached
}
