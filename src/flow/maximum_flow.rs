use std::fmt::Debug;

use num_traits::Float;

use crate::error::{Error, Result};
use crate::flow::boykov_kolmogorov::boykov_kolmogorov;
use crate::flow::dinic::dinic;
use crate::flow::edmonds_karp::edmonds_karp;
use crate::flow::push_relabel::push_relabel;
use crate::flow::residual::ResidualNetwork;

/// The interchangeable max-flow engines. All four return the same flow
/// value on the same input; only [`BoykovKolmogorov`](Self::BoykovKolmogorov)
/// also produces a vertex partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowAlgorithm {
    EdmondsKarp,
    Dinic,
    #[default]
    PushRelabel,
    BoykovKolmogorov,
}

/// Which side of the minimum cut a vertex lies on. `Unreachable` only
/// occurs with Boykov-Kolmogorov, whose two search trees need not cover
/// every vertex at convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutSide {
    Source,
    Target,
    Unreachable,
}

/// A solved flow: its value, the antisymmetric flow matrix, and, for
/// Boykov-Kolmogorov only, the induced partition.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowResult<T> {
    pub value: T,
    pub flow: Vec<Vec<T>>,
    pub partition: Option<Vec<CutSide>>,
}

/// Computes the maximum flow between `source` and `target` over the given
/// capacity matrix (`capacity[u][v] == 0` means no edge).
///
/// This is the fresh-allocation entry point: inputs are validated, a new
/// [`ResidualNetwork`] is built, and the chosen algorithm runs on it.
/// Callers solving many related instances (the multiroute layer) reuse one
/// network through [`run_algorithm`] instead.
pub fn maximum_flow<T>(
    capacity: &[Vec<T>],
    source: usize,
    target: usize,
    algorithm: FlowAlgorithm,
) -> Result<FlowResult<T>>
where
    T: Float + Debug,
{
    validate(capacity, source, target)?;
    let mut net = ResidualNetwork::new(capacity.to_vec());
    let (value, partition) = run_algorithm(&mut net, source, target, algorithm);
    Ok(FlowResult {
        value,
        flow: net.flow_matrix().to_vec(),
        partition,
    })
}

/// Dispatches one already-validated instance on a prepared network whose
/// flow matrix is zero. The buffer-reuse layer behind [`maximum_flow`].
pub(crate) fn run_algorithm<T>(
    net: &mut ResidualNetwork<T>,
    source: usize,
    target: usize,
    algorithm: FlowAlgorithm,
) -> (T, Option<Vec<CutSide>>)
where
    T: Float + Debug,
{
    match algorithm {
        FlowAlgorithm::EdmondsKarp => (edmonds_karp(net, source, target), None),
        FlowAlgorithm::Dinic => (dinic(net, source, target), None),
        FlowAlgorithm::PushRelabel => (push_relabel(net, source, target), None),
        FlowAlgorithm::BoykovKolmogorov => {
            let (value, partition) = boykov_kolmogorov(net, source, target);
            (value, Some(partition))
        }
    }
}

/// Rejects malformed requests before any algorithm touches the matrix:
/// non-square or negative capacities, out-of-range vertices, and
/// `source == target`. Returns the vertex count.
pub(crate) fn validate<T>(capacity: &[Vec<T>], source: usize, target: usize) -> Result<usize>
where
    T: Float + Debug,
{
    let n = capacity.len();
    for row in capacity {
        if row.len() != n {
            return Err(Error::InvalidInput(
                "capacity matrix must be square".to_string(),
            ));
        }
        for &c in row {
            if c < T::zero() || c.is_nan() {
                return Err(Error::InvalidInput(
                    "capacities must be nonnegative".to_string(),
                ));
            }
        }
    }
    if source >= n || target >= n {
        return Err(Error::InvalidVertex);
    }
    if source == target {
        return Err(Error::IdenticalVertices);
    }
    Ok(n)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const ALGORITHMS: [FlowAlgorithm; 4] = [
        FlowAlgorithm::EdmondsKarp,
        FlowAlgorithm::Dinic,
        FlowAlgorithm::PushRelabel,
        FlowAlgorithm::BoykovKolmogorov,
    ];

    /// The CLRS figure 26 network, max flow 23 from 0 to 5.
    pub(crate) fn clrs_network() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 16.0, 13.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 10.0, 12.0, 0.0, 0.0],
            vec![0.0, 4.0, 0.0, 0.0, 14.0, 0.0],
            vec![0.0, 0.0, 9.0, 0.0, 0.0, 20.0],
            vec![0.0, 0.0, 0.0, 7.0, 0.0, 4.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ]
    }

    /// 8-vertex network with max flow 28 from 0 to 7 and min cut
    /// {0, 2, 3, 6} / {1, 4, 5, 7}.
    pub(crate) fn eight_vertex_network() -> Vec<Vec<f64>> {
        let edges = [
            (0, 1, 10.0),
            (0, 2, 5.0),
            (0, 3, 15.0),
            (1, 2, 4.0),
            (1, 4, 9.0),
            (1, 5, 15.0),
            (2, 3, 4.0),
            (2, 5, 8.0),
            (3, 6, 16.0),
            (4, 5, 15.0),
            (4, 7, 10.0),
            (5, 6, 15.0),
            (5, 7, 10.0),
            (6, 2, 6.0),
            (6, 7, 10.0),
        ];
        let mut capacity = vec![vec![0.0; 8]; 8];
        for (u, v, c) in edges {
            capacity[u][v] = c;
        }
        capacity
    }

    /// Checks antisymmetry, capacity respect, conservation at interior
    /// vertices and the flow value at both terminals.
    pub(crate) fn assert_valid_flow(
        capacity: &[Vec<f64>],
        flow: &[Vec<f64>],
        source: usize,
        target: usize,
        value: f64,
    ) {
        let n = capacity.len();
        for u in 0..n {
            for v in 0..n {
                assert!(
                    (flow[u][v] + flow[v][u]).abs() < 1e-9,
                    "flow not antisymmetric at ({u}, {v})"
                );
                assert!(
                    flow[u][v] <= capacity[u][v] + 1e-9,
                    "capacity violated at ({u}, {v})"
                );
            }
        }
        for v in 0..n {
            let net_in: f64 = (0..n).map(|u| flow[u][v]).sum();
            if v == source {
                assert!((net_in + value).abs() < 1e-9, "source emits {net_in}");
            } else if v == target {
                assert!((net_in - value).abs() < 1e-9, "target absorbs {net_in}");
            } else {
                assert!(net_in.abs() < 1e-9, "conservation violated at {v}");
            }
        }
    }

    #[test]
    fn all_algorithms_agree_on_the_eight_vertex_network() {
        let capacity = eight_vertex_network();
        for algorithm in ALGORITHMS {
            let result = maximum_flow(&capacity, 0, 7, algorithm).unwrap();
            assert_eq!(result.value, 28.0, "{algorithm:?}");
            assert_valid_flow(&capacity, &result.flow, 0, 7, result.value);
        }
    }

    #[test]
    fn partition_present_only_for_boykov_kolmogorov() {
        let capacity = eight_vertex_network();
        for algorithm in ALGORITHMS {
            let result = maximum_flow(&capacity, 0, 7, algorithm).unwrap();
            assert_eq!(
                result.partition.is_some(),
                algorithm == FlowAlgorithm::BoykovKolmogorov
            );
        }
    }

    #[test]
    fn rejects_non_square_matrix() {
        let capacity = vec![vec![0.0, 1.0], vec![0.0]];
        assert!(matches!(
            maximum_flow(&capacity, 0, 1, FlowAlgorithm::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_negative_capacity() {
        let capacity = vec![vec![0.0, -1.0], vec![0.0, 0.0]];
        assert!(matches!(
            maximum_flow(&capacity, 0, 1, FlowAlgorithm::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_vertex() {
        let capacity = vec![vec![0.0, 1.0], vec![0.0, 0.0]];
        assert_eq!(
            maximum_flow(&capacity, 0, 2, FlowAlgorithm::default()),
            Err(Error::InvalidVertex)
        );
    }

    #[test]
    fn rejects_identical_source_and_target() {
        let capacity = vec![vec![0.0, 1.0], vec![0.0, 0.0]];
        assert_eq!(
            maximum_flow(&capacity, 1, 1, FlowAlgorithm::default()),
            Err(Error::IdenticalVertices)
        );
    }

    #[test]
    fn agreement_on_random_networks() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let n = rng.gen_range(4..10);
            let mut capacity = vec![vec![0.0; n]; n];
            for (u, row) in capacity.iter_mut().enumerate() {
                for (v, c) in row.iter_mut().enumerate() {
                    if u != v && rng.gen_bool(0.4) {
                        *c = rng.gen_range(1..20) as f64;
                    }
                }
            }
            let reference = maximum_flow(&capacity, 0, n - 1, FlowAlgorithm::EdmondsKarp)
                .unwrap()
                .value;
            for algorithm in ALGORITHMS {
                let result = maximum_flow(&capacity, 0, n - 1, algorithm).unwrap();
                assert!(
                    (result.value - reference).abs() < 1e-9,
                    "{algorithm:?} returned {} instead of {reference}",
                    result.value
                );
                assert_valid_flow(&capacity, &result.flow, 0, n - 1, result.value);
            }
        }
    }
}
