pub mod geo;
pub mod score;

pub use score::{rank_candidates, CandidateProfile, RankedCandidate, ViewerProfile};
