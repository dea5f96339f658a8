pub mod error;
pub mod flow;

pub use error::{Error, Result};
pub use flow::{
    breaking_points, maximum_flow, mincost_flow, mincut, multiroute_flow, multiroute_flow_at,
    BreakingPoint, CutSide, FlowAlgorithm, FlowResult, LpSolver, MinCut, MultirouteAlgorithm,
    ResidualNetwork,
};
