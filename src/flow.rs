pub mod boykov_kolmogorov;
pub mod dinic;
pub mod edmonds_karp;
pub mod ext_multiroute;
pub mod kishimoto;
pub mod maximum_flow;
pub mod mincost;
pub mod mincut;
pub mod multiroute;
pub mod push_relabel;
pub mod residual;

pub use ext_multiroute::{approximately_equal, BreakingPoint, APPROX_TOL};
pub use maximum_flow::{maximum_flow, CutSide, FlowAlgorithm, FlowResult};
pub use mincost::{mincost_flow, LpSolver};
pub use mincut::{mincut, MinCut};
pub use multiroute::{
    breaking_points, multiroute_flow, multiroute_flow_at, MultirouteAlgorithm,
};
pub use residual::ResidualNetwork;
