pub mod resolver;
pub mod similarity;

pub use resolver::{find_duplicate, DuplicateMatch, MatchKind, FUZZY_THRESHOLD};
pub use similarity::similarity;
