/// State management module
///
/// Pure application state, kept free of view concerns so it can be
/// unit tested without a window:
/// - Deck of fetched cats and the decision cursor (deck.rs)
/// - Drag/commit gesture state machine (gesture.rs)

pub mod deck;
pub mod gesture;
