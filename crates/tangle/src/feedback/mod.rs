//! Feedback edge sets: which dependencies to cut to remove every cycle.
//!
//! - [`ranking`] annotates edges with how many cycles they break and orders
//!   the cycles for the search
//! - [`solver`] picks the cheapest set of edges hitting every cycle

pub mod ranking;
pub mod solver;

pub use ranking::{rank_cycles, FeedbackCycle, FeedbackEdge};
pub use solver::{
    FeedbackSolution, FeedbackSolver, DEFAULT_MAX_CYCLES_FOR_EXACT_SEARCH,
    DEFAULT_MAX_SEARCH_CALLS,
};
