/// Deck management
///
/// Owns the ordered batch of fetched cats and the position cursor.
/// Pure state, no view concerns: the UI layer derives the visible
/// stack, progress bar and summary from accessors on `Deck`.

use iced::widget::image;

/// How many cards are stacked visually at any time.
pub const VISIBLE_CARDS: usize = 3;

/// Scale lost per depth level in the visible stack.
pub const DEPTH_SCALE_STEP: f32 = 0.05;

/// Vertical offset gained per depth level, in logical pixels.
pub const DEPTH_OFFSET_STEP: f32 = 10.0;

/// The outcome of a decision on the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Like,
    Dislike,
}

/// A single fetched cat.
///
/// Cards are never removed from the deck; decided cards stay behind the
/// cursor so the summary can show the liked ones again.
#[derive(Debug, Clone)]
pub struct Card {
    /// Position in the original fetch batch, also the display order.
    pub id: usize,
    /// Decoded image handle for the view layer.
    pub handle: image::Handle,
    /// Set exactly once, when the user likes this card.
    pub liked: bool,
}

/// The ordered working set of cards plus the decision cursor.
///
/// Cards at indices below the cursor have been decided; the rest are
/// pending. The cursor only moves forward, except through `reset`.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
    current: usize,
    liked: Vec<usize>,
}

impl Deck {
    /// Build a deck from fetched image handles, in fetch order.
    pub fn new(handles: Vec<image::Handle>) -> Self {
        let cards = handles
            .into_iter()
            .enumerate()
            .map(|(id, handle)| Card {
                id,
                handle,
                liked: false,
            })
            .collect();

        Self {
            cards,
            current: 0,
            liked: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// The pending cards that should be stacked on screen, topmost first.
    pub fn visible_window(&self) -> &[Card] {
        let start = self.current.min(self.cards.len());
        let end = (start + VISIBLE_CARDS).min(self.cards.len());
        &self.cards[start..end]
    }

    /// The card currently on top of the stack, if any is pending.
    pub fn top_card(&self) -> Option<&Card> {
        self.cards.get(self.current)
    }

    /// Look up any card by id, decided or not.
    pub fn card(&self, id: usize) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Record a decision on the current card and advance the cursor.
    ///
    /// A no-op once the deck is exhausted; callers are expected to race
    /// animation completions against fresh input, so the guard is silent.
    pub fn decide(&mut self, decision: Decision) {
        let Some(card) = self.cards.get_mut(self.current) else {
            return;
        };

        if decision == Decision::Like {
            card.liked = true;
            self.liked.push(card.id);
        }

        self.current += 1;
        tracing::debug!(
            card = card.id,
            ?decision,
            progress = self.current,
            "decision recorded"
        );
    }

    /// True once every card has been decided.
    pub fn is_exhausted(&self) -> bool {
        self.current >= self.cards.len()
    }

    /// `(decided, total)` for the progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.current, self.cards.len())
    }

    /// Liked cards, in the order they were liked (which preserves deck order).
    pub fn liked_cards(&self) -> impl Iterator<Item = &Card> {
        self.liked.iter().filter_map(|&id| self.cards.get(id))
    }

    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    /// The headline for the summary modal.
    pub fn summary_stats(&self) -> String {
        format!(
            "You liked {} out of {} cats!",
            self.liked.len(),
            self.len()
        )
    }

    /// Placeholder shown in the summary grid when nothing was liked;
    /// `None` once there is at least one liked cat to display.
    pub fn empty_grid_message(&self) -> Option<&'static str> {
        self.liked
            .is_empty()
            .then_some("No cats were liked. Try again!")
    }

    /// Rewind the deck for another run with the same cards. Idempotent.
    pub fn reset(&mut self) {
        self.current = 0;
        self.liked.clear();
        for card in &mut self.cards {
            card.liked = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_of(n: usize) -> Deck {
        Deck::new((0..n).map(|_| image::Handle::from_bytes(Vec::new())).collect())
    }

    #[test]
    fn cursor_advances_monotonically_and_saturates() {
        let mut deck = deck_of(3);

        for step in 1..=5 {
            deck.decide(Decision::Dislike);
            let (decided, total) = deck.progress();
            assert_eq!(decided, step.min(3));
            assert_eq!(total, 3);
        }

        assert!(deck.is_exhausted());
    }

    #[test]
    fn decide_when_exhausted_is_a_silent_noop() {
        let mut deck = deck_of(1);
        deck.decide(Decision::Like);
        assert!(deck.is_exhausted());

        // Extra decisions change nothing, including the liked list.
        deck.decide(Decision::Like);
        assert_eq!(deck.progress(), (1, 1));
        assert_eq!(deck.liked_count(), 1);
    }

    #[test]
    fn liked_list_preserves_deck_order() {
        let mut deck = deck_of(15);
        for i in 0..15 {
            if i == 0 || i == 2 || i == 4 {
                deck.decide(Decision::Like);
            } else {
                deck.decide(Decision::Dislike);
            }
        }

        assert!(deck.is_exhausted());
        assert_eq!(deck.progress(), (15, 15));

        let liked: Vec<usize> = deck.liked_cards().map(|card| card.id).collect();
        assert_eq!(liked, vec![0, 2, 4]);
        assert!(deck.liked_cards().all(|card| card.liked));
        assert_eq!(deck.summary_stats(), "You liked 3 out of 15 cats!");
    }

    #[test]
    fn summary_with_no_likes_gets_the_placeholder_not_an_empty_grid() {
        let mut deck = deck_of(3);
        for _ in 0..3 {
            deck.decide(Decision::Dislike);
        }
        assert!(deck.is_exhausted());

        assert_eq!(
            deck.empty_grid_message(),
            Some("No cats were liked. Try again!")
        );
        assert_eq!(deck.summary_stats(), "You liked 0 out of 3 cats!");

        // One like and the grid takes over from the placeholder.
        deck.reset();
        deck.decide(Decision::Like);
        assert_eq!(deck.empty_grid_message(), None);
    }

    #[test]
    fn reset_clears_everything_and_is_idempotent() {
        let mut deck = deck_of(4);
        deck.decide(Decision::Like);
        deck.decide(Decision::Dislike);

        deck.reset();
        assert_eq!(deck.progress(), (0, 4));
        assert_eq!(deck.liked_count(), 0);
        assert!(deck.visible_window().iter().all(|card| !card.liked));

        deck.reset();
        assert_eq!(deck.progress(), (0, 4));
        assert_eq!(deck.liked_count(), 0);
    }

    #[test]
    fn visible_window_shrinks_near_the_end() {
        let mut deck = deck_of(4);
        assert_eq!(deck.visible_window().len(), 3);
        assert_eq!(deck.visible_window()[0].id, 0);

        deck.decide(Decision::Dislike);
        deck.decide(Decision::Dislike);
        assert_eq!(deck.visible_window().len(), 2);
        assert_eq!(deck.visible_window()[0].id, 2);

        deck.decide(Decision::Dislike);
        deck.decide(Decision::Dislike);
        assert!(deck.visible_window().is_empty());
        assert!(deck.top_card().is_none());
    }
}
