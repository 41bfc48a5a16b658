/// View layer
///
/// - Card stack canvas and pointer capture (cards.rs)
/// - End-of-deck summary modal (summary.rs)

pub mod cards;
pub mod summary;
