pub mod boost_service;
pub mod candidate_filter;
pub mod liked_me;
pub mod match_service;
pub mod photos;
pub mod quota;
pub mod rewind_service;
pub mod swipe_service;
pub mod users;
