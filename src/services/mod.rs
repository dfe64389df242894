pub mod recommendations;
pub mod sessions;
pub mod votes;

pub use recommendations::{recommend, Recommender};
pub use votes::{PanelDirective, VoteOutcome, VoteReconciler};
