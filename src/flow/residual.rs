use num_traits::Float;
use std::fmt::Debug;

/// A directed capacitated network together with the flow routed through it.
///
/// The capacity matrix is dense: `capacity[u][v] > 0` means an edge `u -> v`.
/// The flow matrix is kept antisymmetric (`flow[u][v] == -flow[v][u]`), so a
/// pair `(u, v)` is traversable whenever its residual capacity
/// `capacity[u][v] - flow[u][v]` is positive, which covers both unsaturated
/// forward edges and cancellable reverse flow.
///
/// The buffers (including the neighbor table, the union of out- and in-edges
/// per vertex) are allocated once and reused across repeated solves via
/// [`reset`](ResidualNetwork::reset) and
/// [`restrict`](ResidualNetwork::restrict).
#[derive(Debug, Clone)]
pub struct ResidualNetwork<T> {
    n: usize,
    capacity: Vec<Vec<T>>,
    flow: Vec<Vec<T>>,
    neighbors: Vec<Vec<usize>>,
}

impl<T> ResidualNetwork<T>
where
    T: Float + Debug,
{
    /// Builds a network from a square nonnegative capacity matrix. The
    /// matrix is assumed validated by the caller (see `maximum_flow`).
    pub fn new(capacity: Vec<Vec<T>>) -> Self {
        let n = capacity.len();
        let mut neighbors = vec![Vec::new(); n];
        for (u, row) in capacity.iter().enumerate() {
            for v in 0..n {
                if u != v && (row[v] > T::zero() || capacity[v][u] > T::zero()) {
                    neighbors[u].push(v);
                }
            }
        }
        ResidualNetwork {
            n,
            capacity,
            flow: vec![vec![T::zero(); n]; n],
            neighbors,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Vertices adjacent to `u` through a forward or backward capacity edge.
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.neighbors[u]
    }

    pub fn capacity(&self, u: usize, v: usize) -> T {
        self.capacity[u][v]
    }

    pub fn flow(&self, u: usize, v: usize) -> T {
        self.flow[u][v]
    }

    pub fn flow_matrix(&self) -> &[Vec<T>] {
        &self.flow
    }

    /// Remaining capacity on `(u, v)`, counting cancellable reverse flow.
    pub fn residual(&self, u: usize, v: usize) -> T {
        self.capacity[u][v] - self.flow[u][v]
    }

    /// Routes `amount` additional flow along `(u, v)`.
    ///
    /// # Panics
    /// Panics if `amount` is not in `(0, residual(u, v)]`. Violating the
    /// bound is a bookkeeping bug in the calling algorithm, never a
    /// user-input condition, so it fails loudly instead of clamping.
    pub fn push_flow(&mut self, u: usize, v: usize, amount: T) {
        assert!(
            amount > T::zero() && amount <= self.residual(u, v),
            "invalid flow amount {:?} on edge ({}, {}) with residual {:?}",
            amount,
            u,
            v,
            self.residual(u, v),
        );
        self.flow[u][v] = self.flow[u][v] + amount;
        self.flow[v][u] = self.flow[v][u] - amount;
    }

    /// Zeroes the flow matrix, keeping every allocation.
    pub fn reset(&mut self) {
        for row in &mut self.flow {
            row.fill(T::zero());
        }
    }

    /// Reloads the capacity matrix as `min(base[u][v], limit)` in place.
    /// Used by the multiroute sweep. The neighbor table still covers every
    /// edge of `base`; capping an edge (even to zero) only removes residual
    /// capacity, which every traversal already checks.
    pub fn restrict(&mut self, base: &[Vec<T>], limit: T) {
        for (u, row) in self.capacity.iter_mut().enumerate() {
            for (v, cap) in row.iter_mut().enumerate() {
                *cap = base[u][v].min(limit);
            }
        }
    }

    /// Net flow arriving at `v`; for the target this is the flow value.
    pub fn flow_into(&self, v: usize) -> T {
        (0..self.n).fold(T::zero(), |acc, u| acc + self.flow[u][v])
    }
}
