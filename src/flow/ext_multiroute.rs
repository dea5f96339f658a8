use std::fmt::Debug;

use num_traits::Float;

use crate::flow::maximum_flow::{run_algorithm, CutSide, FlowAlgorithm, FlowResult};
use crate::flow::residual::ResidualNetwork;

/// Absolute tolerance used by every breakpoint comparison in the multiroute
/// layer (curve merging, route-line intersection, the Kishimoto fixed
/// point). Two candidate breakpoints closer than this on both coordinates
/// are treated as one; callers comparing against returned curve values
/// should allow the same slack.
pub const APPROX_TOL: f64 = 1e-10;

pub(crate) fn tol<T: Float>() -> T {
    T::from(APPROX_TOL).expect("tolerance must be representable")
}

fn cast<T: Float>(value: usize) -> T {
    T::from(value).expect("slope must be representable")
}

/// Componentwise comparison of two curve points under [`APPROX_TOL`].
pub fn approximately_equal<T: Float>(a: (T, T), b: (T, T)) -> bool {
    (a.0 - b.0).abs() <= tol() && (a.1 - b.1).abs() <= tol()
}

/// A vertex of the piecewise-linear restricted max-flow curve
/// `r -> maxflow(min(capacity, r))`.
///
/// `restriction` is the per-route capacity cap at which this segment
/// starts, `flow` the restricted max-flow value there, and `slope` the
/// number of min-cut edges still capped by the restriction (the segment's
/// integer slope). The route count attained at the vertex is
/// `flow / restriction`, and slopes strictly decrease along the curve,
/// which is concave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakingPoint<T> {
    pub restriction: T,
    pub flow: T,
    pub slope: usize,
}

/// Nonzero minimum and maximum of the capacity matrix. Zero entries encode
/// absent edges, so they are skipped rather than treated as a minimum.
pub(crate) fn minmax_capacity<T>(capacity: &[Vec<T>]) -> (T, T)
where
    T: Float + Debug,
{
    let mut lo = T::infinity();
    let mut hi = T::zero();
    for row in capacity {
        for &c in row {
            if c > T::zero() {
                lo = lo.min(c);
                hi = hi.max(c);
            }
        }
    }
    if hi == T::zero() {
        (T::zero(), T::zero())
    } else {
        (lo, hi)
    }
}

/// Slope of the restricted max-flow curve just right of `restriction`: the
/// number of cut-crossing edges whose capacity still exceeds it (those are
/// the edges saturated at the restriction itself, so widening the cap by
/// `dr` gains `slope * dr` flow).
pub(crate) fn slope_at<T>(capacity: &[Vec<T>], partition: &[CutSide], restriction: T) -> usize
where
    T: Float + Debug,
{
    let n = capacity.len();
    let mut slope = 0;
    for u in 0..n {
        if partition[u] != CutSide::Source {
            continue;
        }
        for v in 0..n {
            if partition[v] != CutSide::Source && capacity[u][v] > restriction {
                slope += 1;
            }
        }
    }
    slope
}

/// Intersection of the lines through `(x1, y1)` with slope `a1` and
/// `(x2, y2)` with slope `a2`. The caller guarantees `a1 != a2`.
pub(crate) fn intersection<T>(x1: T, y1: T, a1: T, x2: T, y2: T, a2: T) -> (T, T)
where
    T: Float,
{
    let x = (y2 - y1 + a1 * x1 - a2 * x2) / (a1 - a2);
    (x, y1 + a1 * (x - x1))
}

/// Solves one restricted instance with Boykov-Kolmogorov (its partition is
/// needed for the slope) and returns `(flow, slope)`.
fn probe<T>(
    net: &mut ResidualNetwork<T>,
    base: &[Vec<T>],
    source: usize,
    target: usize,
    restriction: T,
) -> (T, usize)
where
    T: Float + Debug,
{
    net.restrict(base, restriction);
    net.reset();
    let (value, partition) = run_algorithm(net, source, target, FlowAlgorithm::BoykovKolmogorov);
    let partition = partition.expect("search-tree algorithm always yields a partition");
    (value, slope_at(base, &partition, restriction))
}

/// Samples one `(restriction, flow)` point per distinct slope of the curve,
/// by dichotomy between restrictions whose slopes differ: probing at the
/// intersection of the two known segment lines either confirms they meet
/// there or discovers a slope strictly between them. One restricted
/// max-flow evaluation per sample, so `O(#slopes)` evaluations rather than
/// one per edge. Slot `s` of the result holds the sample of slope `s`.
pub(crate) fn auxiliary_points<T>(
    base: &[Vec<T>],
    source: usize,
    target: usize,
) -> Vec<Option<(T, T)>>
where
    T: Float + Debug,
{
    let connectivity = edge_connectivity(base, source, target);
    let mut aux: Vec<Option<(T, T)>> = vec![None; connectivity + 1];
    if connectivity == 0 {
        return aux;
    }

    let (lo, hi) = minmax_capacity(base);
    let mut net = ResidualNetwork::new(base.to_vec());
    let (flow_lo, slope_lo) = probe(&mut net, base, source, target, lo);
    aux[slope_lo] = Some((lo, flow_lo));
    let (flow_hi, slope_hi) = probe(&mut net, base, source, target, hi);
    aux[slope_hi] = Some((hi, flow_hi));
    log::debug!(
        "parametric sweep: connectivity {connectivity}, slopes {slope_lo} down to {slope_hi}"
    );

    let mut pending = vec![((lo, flow_lo, slope_lo), (hi, flow_hi, slope_hi))];
    while let Some(((x1, y1, s1), (x2, y2, s2))) = pending.pop() {
        if s1 <= s2 + 1 {
            // No slope can lie strictly between adjacent (or equal) ones.
            continue;
        }
        let (x, expected) = intersection(x1, y1, cast(s1), x2, y2, cast(s2));
        let (flow, slope) = probe(&mut net, base, source, target, x);
        if slope < s1 && slope > s2 && !approximately_equal((x, expected), (x, flow)) {
            aux[slope] = Some((x, flow));
            pending.push(((x1, y1, s1), (x, flow, slope)));
            pending.push(((x, flow, slope), (x2, y2, s2)));
        }
    }
    aux
}

/// Unit-capacity max flow: the number of edge-disjoint source-target paths,
/// which bounds the slopes of the parametric curve.
fn edge_connectivity<T>(base: &[Vec<T>], source: usize, target: usize) -> usize
where
    T: Float + Debug,
{
    let unit: Vec<Vec<T>> = base
        .iter()
        .map(|row| {
            row.iter()
                .map(|&c| if c > T::zero() { T::one() } else { T::zero() })
                .collect()
        })
        .collect();
    let mut net = ResidualNetwork::new(unit);
    let (value, _) = run_algorithm(&mut net, source, target, FlowAlgorithm::Dinic);
    value
        .round()
        .to_usize()
        .expect("unit-capacity flow must be a small integer")
}

/// Reduces the auxiliary samples to the actual vertices of the curve. The
/// first point is always `(0, 0)` with the connectivity as slope; each
/// further vertex is the intersection of the previous segment's line with
/// the next sampled one, walking slopes in decreasing order. Degenerate
/// segments (intersection collapsing onto the previous vertex within
/// [`APPROX_TOL`]) are merged away.
pub(crate) fn breaking_points_impl<T>(
    base: &[Vec<T>],
    source: usize,
    target: usize,
) -> Vec<BreakingPoint<T>>
where
    T: Float + Debug,
{
    let aux = auxiliary_points(base, source, target);
    let connectivity = aux.len() - 1;
    let mut points = vec![BreakingPoint {
        restriction: T::zero(),
        flow: T::zero(),
        slope: connectivity,
    }];
    for s in (0..connectivity).rev() {
        let Some((x, y)) = aux[s] else { continue };
        let prev = *points.last().unwrap();
        let (vx, vy) = intersection(prev.restriction, prev.flow, cast(prev.slope), x, y, cast(s));
        if approximately_equal((vx, vy), (prev.restriction, prev.flow)) {
            points.last_mut().unwrap().slope = s;
        } else {
            points.push(BreakingPoint {
                restriction: vx,
                flow: vy,
                slope: s,
            });
        }
    }
    points
}

/// Intersection of the curve with the line of slope `routes` through the
/// origin. The `y` coordinate is the `routes`-route flow value; beyond the
/// connectivity the only intersection is the origin (zero flow).
pub(crate) fn intersection_with_routes<T>(points: &[BreakingPoint<T>], routes: T) -> (T, T)
where
    T: Float + Debug,
{
    let connectivity = points[0].slope;
    if points.len() == 1 || routes > cast(connectivity) {
        return (T::zero(), T::zero());
    }
    for j in 1..points.len() {
        let p = points[j];
        if routes * p.restriction >= p.flow - tol() {
            // The route line has risen to meet the curve on segment j - 1.
            let q = points[j - 1];
            let a = cast::<T>(q.slope);
            if (a - routes).abs() <= tol() {
                // Collinear with the segment: the vertex is the answer.
                return (p.restriction, p.flow);
            }
            return intersection(q.restriction, q.flow, a, T::zero(), T::zero(), routes);
        }
    }
    // Still below the curve at the last vertex: cross on the final,
    // open-ended segment.
    let p = *points.last().unwrap();
    intersection(p.restriction, p.flow, cast(p.slope), T::zero(), T::zero(), routes)
}

/// Extended multiroute flow: answers any nonnegative real route count from
/// the breaking-point curve, then re-solves one restricted max flow to
/// materialize a witness flow matrix (and a partition when the chosen
/// engine is Boykov-Kolmogorov).
pub(crate) fn emrf<T>(
    base: &[Vec<T>],
    source: usize,
    target: usize,
    algorithm: FlowAlgorithm,
    routes: T,
) -> FlowResult<T>
where
    T: Float + Debug,
{
    let points = breaking_points_impl(base, source, target);
    let (x, y) = intersection_with_routes(&points, routes);
    let mut net = ResidualNetwork::new(base.to_vec());
    net.restrict(base, x.max(T::zero()));
    let (_, partition) = run_algorithm(&mut net, source, target, algorithm);
    FlowResult {
        value: y,
        flow: net.flow_matrix().to_vec(),
        partition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::maximum_flow::tests::eight_vertex_network;

    fn two_parallel_paths() -> Vec<Vec<f64>> {
        // 0 -> 1 -> 3 with capacity 5, 0 -> 2 -> 3 with capacity 2.
        vec![
            vec![0.0, 5.0, 2.0, 0.0],
            vec![0.0, 0.0, 0.0, 5.0],
            vec![0.0, 0.0, 0.0, 2.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ]
    }

    #[test]
    fn line_intersection_is_exact() {
        let (x, y) = intersection(0.0, 0.0, 2.0, 5.0, 7.0, 1.0);
        assert_eq!((x, y), (2.0, 4.0));
    }

    #[test]
    fn approximate_equality_uses_the_documented_tolerance() {
        assert!(approximately_equal((1.0, 2.0), (1.0 + 1e-12, 2.0 - 1e-12)));
        assert!(!approximately_equal((1.0, 2.0), (1.0 + 1e-6, 2.0)));
    }

    #[test]
    fn minmax_ignores_absent_edges() {
        assert_eq!(minmax_capacity(&two_parallel_paths()), (2.0, 5.0));
    }

    #[test]
    fn parallel_paths_curve() {
        use approx::assert_relative_eq;

        let points = breaking_points_impl(&two_parallel_paths(), 0, 3);
        assert_eq!(points.len(), 3);
        assert_eq!(
            points[0],
            BreakingPoint { restriction: 0.0, flow: 0.0, slope: 2 }
        );
        assert_relative_eq!(points[1].restriction, 2.0, epsilon = 1e-9);
        assert_relative_eq!(points[1].flow, 4.0, epsilon = 1e-9);
        assert_eq!(points[1].slope, 1);
        assert_relative_eq!(points[2].restriction, 5.0, epsilon = 1e-9);
        assert_relative_eq!(points[2].flow, 7.0, epsilon = 1e-9);
        assert_eq!(points[2].slope, 0);
    }

    #[test]
    fn slopes_are_strictly_decreasing_and_curve_concave() {
        for capacity in [two_parallel_paths(), eight_vertex_network()] {
            let target = capacity.len() - 1;
            let points = breaking_points_impl(&capacity, 0, target);
            for w in points.windows(2) {
                assert!(w[0].slope > w[1].slope);
                assert!(w[0].restriction < w[1].restriction);
                assert!(w[0].flow <= w[1].flow);
            }
        }
    }

    #[test]
    fn route_query_at_each_vertex_recovers_its_flow() {
        for capacity in [two_parallel_paths(), eight_vertex_network()] {
            let target = capacity.len() - 1;
            let points = breaking_points_impl(&capacity, 0, target);
            for p in &points[1..] {
                let routes = p.flow / p.restriction;
                let (_, y) = intersection_with_routes(&points, routes);
                assert!(
                    (y - p.flow).abs() < 1e-8,
                    "query at {routes} routes returned {y}, vertex flow {}",
                    p.flow
                );
            }
        }
    }

    #[test]
    fn route_counts_beyond_connectivity_yield_zero() {
        let points = breaking_points_impl(&two_parallel_paths(), 0, 3);
        assert_eq!(intersection_with_routes(&points, 2.5), (0.0, 0.0));
    }

    #[test]
    fn fractional_route_query_interpolates() {
        use approx::assert_relative_eq;

        let points = breaking_points_impl(&two_parallel_paths(), 0, 3);
        // The 1.5-route line y = 1.5x meets the slope-1 segment at (4, 6).
        let (x, y) = intersection_with_routes(&points, 1.5);
        assert_relative_eq!(x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(y, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn no_path_gives_the_degenerate_curve() {
        let capacity = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        let points = breaking_points_impl(&capacity, 0, 1);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].slope, 0);
        assert_eq!(intersection_with_routes(&points, 1.0), (0.0, 0.0));
    }
}
