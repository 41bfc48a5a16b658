/// Gesture state machine
///
/// Converts raw pointer motion into card transforms and like/dislike
/// decisions. Animation sequencing (snap-back, exit, the slow button
/// path) is modeled as explicit phases sampled against an `Instant`
/// clock, so the whole machine is testable without a window or timers:
/// the UI only has to feed it events and frame ticks.

use std::time::{Duration, Instant};

use iced::{Point, Vector};

use crate::state::deck::Decision;

/// Horizontal travel required for a release to commit a decision.
pub const RELEASE_THRESHOLD: f32 = 100.0;

/// Horizontal travel at which the LIKE/PASS indicator appears.
pub const INDICATOR_THRESHOLD: f32 = 50.0;

/// Degrees of card rotation per pixel of horizontal drag.
pub const ROTATION_PER_PIXEL: f32 = 0.1;

/// Horizontal travel over which drag opacity falls off.
const OPACITY_FALLOFF: f32 = 300.0;

/// Dragged cards never fade below this.
const OPACITY_FLOOR: f32 = 0.5;

/// How far an exiting card travels horizontally.
const EXIT_DISTANCE: f32 = 600.0;

/// Final rotation of a button-initiated exit, in degrees.
const BUTTON_EXIT_ROTATION: f32 = 30.0;

/// Return-to-rest animation after an under-threshold release.
pub const SNAP_BACK: Duration = Duration::from_millis(300);

/// Exit animation following a drag release over the threshold.
pub const SWIPE_EXIT: Duration = Duration::from_millis(300);

/// How long a button press displays the indicator before the card moves.
pub const BUTTON_HOLD: Duration = Duration::from_millis(400);

/// Exit animation for the button path, after the hold.
pub const BUTTON_EXIT: Duration = Duration::from_millis(600);

/// What initiated a commit; the button path animates slower and applies
/// its decision only once the animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitSource {
    Swipe,
    Button,
}

/// Completed transitions that the controller must react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// A commit animation ran to completion and the card left the stack.
    Finalized {
        decision: Decision,
        card: usize,
        source: CommitSource,
    },
    /// A snap-back finished; the card is back at rest.
    SettledBack,
}

/// Position, rotation and opacity applied to the bound card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub translation: Vector,
    /// Degrees, clockwise positive.
    pub rotation: f32,
    pub opacity: f32,
}

impl CardTransform {
    pub fn identity() -> Self {
        Self {
            translation: Vector::new(0.0, 0.0),
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Dragging {
        start: Point,
        offset: Vector,
        card: usize,
    },
    SnappingBack {
        from: Vector,
        started: Instant,
    },
    Committing {
        decision: Decision,
        source: CommitSource,
        card: usize,
        from: Vector,
        started: Instant,
    },
}

/// The active interaction, if any. At most one session exists at a time;
/// new presses are ignored while a drag or a commit is in flight, which
/// is the only reentrancy guard the single-threaded event loop needs.
#[derive(Debug, Clone)]
pub struct Gesture {
    phase: Phase,
}

impl Default for Gesture {
    fn default() -> Self {
        Self { phase: Phase::Idle }
    }
}

impl Gesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag session bound to `card`, the topmost card at press
    /// time. Ignored while another session or commit is active; a press
    /// during a snap-back abandons the return animation and starts over.
    pub fn press(&mut self, at: Point, card: usize) -> bool {
        match self.phase {
            Phase::Idle | Phase::SnappingBack { .. } => {
                self.phase = Phase::Dragging {
                    start: at,
                    offset: Vector::new(0.0, 0.0),
                    card,
                };
                true
            }
            _ => false,
        }
    }

    /// Update the drag offset from the latest pointer position.
    pub fn drag_to(&mut self, point: Point) {
        if let Phase::Dragging { start, offset, .. } = &mut self.phase {
            *offset = point - *start;
        }
    }

    /// End the drag. Past the release threshold this commits immediately
    /// (the fast path: the caller applies the returned decision right
    /// away while the exit animation plays); under it, the card snaps
    /// back and no decision is made.
    pub fn release(&mut self, now: Instant) -> Option<Decision> {
        let Phase::Dragging { offset, card, .. } = self.phase else {
            return None;
        };

        if offset.x.abs() > RELEASE_THRESHOLD {
            let decision = if offset.x > 0.0 {
                Decision::Like
            } else {
                Decision::Dislike
            };
            self.phase = Phase::Committing {
                decision,
                source: CommitSource::Swipe,
                card,
                from: offset,
                started: now,
            };
            Some(decision)
        } else if offset.x == 0.0 && offset.y == 0.0 {
            // A click without movement has nothing to animate.
            self.phase = Phase::Idle;
            None
        } else {
            self.phase = Phase::SnappingBack {
                from: offset,
                started: now,
            };
            None
        }
    }

    /// Start the slow commit path for the explicit Like/Dislike buttons:
    /// indicator first, a hold so the choice registers, then a long exit.
    /// The decision is applied by the caller only when `tick` reports
    /// `Finalized`. Returns false while any session or commit is active,
    /// which keeps repeat presses inert for the whole hold + exit.
    pub fn press_button(&mut self, decision: Decision, card: usize, now: Instant) -> bool {
        match self.phase {
            Phase::Idle | Phase::SnappingBack { .. } => {
                self.phase = Phase::Committing {
                    decision,
                    source: CommitSource::Button,
                    card,
                    from: Vector::new(0.0, 0.0),
                    started: now,
                };
                true
            }
            _ => false,
        }
    }

    /// Advance running animations to `now`, reporting a completed
    /// transition at most once.
    pub fn tick(&mut self, now: Instant) -> Option<GestureEvent> {
        match self.phase {
            Phase::SnappingBack { started, .. } => {
                if now.saturating_duration_since(started) >= SNAP_BACK {
                    self.phase = Phase::Idle;
                    Some(GestureEvent::SettledBack)
                } else {
                    None
                }
            }
            Phase::Committing {
                decision,
                source,
                card,
                started,
                ..
            } => {
                let total = match source {
                    CommitSource::Swipe => SWIPE_EXIT,
                    CommitSource::Button => BUTTON_HOLD + BUTTON_EXIT,
                };
                if now.saturating_duration_since(started) >= total {
                    self.phase = Phase::Idle;
                    Some(GestureEvent::Finalized {
                        decision,
                        card,
                        source,
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Drop any active session without animating. Used on restart.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// The card this session is acting on, resolved at interaction start.
    pub fn bound_card(&self) -> Option<usize> {
        match self.phase {
            Phase::Dragging { card, .. } | Phase::Committing { card, .. } => Some(card),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// True while a commit animation owns the top card; the other half of
    /// the reentrancy guard, exposed so the view can disable the buttons.
    pub fn is_committing(&self) -> bool {
        matches!(self.phase, Phase::Committing { .. })
    }

    /// Whether a timed animation is running and frame ticks are needed.
    pub fn in_motion(&self) -> bool {
        matches!(
            self.phase,
            Phase::SnappingBack { .. } | Phase::Committing { .. }
        )
    }

    /// True while the bound card committed via swipe is still animating
    /// out even though the deck cursor has already advanced past it.
    pub fn exiting_card(&self) -> Option<usize> {
        match self.phase {
            Phase::Committing {
                source: CommitSource::Swipe,
                card,
                ..
            } => Some(card),
            _ => None,
        }
    }

    /// The transform the bound card should render with at `now`.
    pub fn transform(&self, now: Instant) -> CardTransform {
        match self.phase {
            Phase::Idle => CardTransform::identity(),
            Phase::Dragging { offset, .. } => drag_transform(offset),
            Phase::SnappingBack { from, started } => {
                let remaining = 1.0 - progress(started, now, SNAP_BACK);
                drag_transform(from * remaining)
            }
            Phase::Committing {
                decision,
                source,
                from,
                started,
                ..
            } => match source {
                CommitSource::Swipe => {
                    let t = progress(started, now, SWIPE_EXIT);
                    let x = from.x + decision_sign(decision) * EXIT_DISTANCE * t;
                    CardTransform {
                        translation: Vector::new(x, from.y),
                        rotation: x * ROTATION_PER_PIXEL,
                        opacity: drag_opacity(from.x) * (1.0 - t),
                    }
                }
                CommitSource::Button => {
                    let since = now.saturating_duration_since(started);
                    if since < BUTTON_HOLD {
                        // Holding: the card rests while the indicator shows.
                        CardTransform::identity()
                    } else {
                        let t = progress(started + BUTTON_HOLD, now, BUTTON_EXIT);
                        let sign = decision_sign(decision);
                        CardTransform {
                            translation: Vector::new(sign * EXIT_DISTANCE * t, 0.0),
                            rotation: sign * BUTTON_EXIT_ROTATION * t,
                            opacity: 1.0 - t,
                        }
                    }
                }
            },
        }
    }

    /// Which directional indicator the bound card should show, if any.
    /// Stateless: recomputed from the current offset on every move, and
    /// forced on for the whole commit animation.
    pub fn indicator(&self) -> Option<Decision> {
        match self.phase {
            Phase::Dragging { offset, .. } => {
                if offset.x > INDICATOR_THRESHOLD {
                    Some(Decision::Like)
                } else if offset.x < -INDICATOR_THRESHOLD {
                    Some(Decision::Dislike)
                } else {
                    None
                }
            }
            Phase::Committing { decision, .. } => Some(decision),
            _ => None,
        }
    }
}

fn decision_sign(decision: Decision) -> f32 {
    match decision {
        Decision::Like => 1.0,
        Decision::Dislike => -1.0,
    }
}

fn drag_opacity(dx: f32) -> f32 {
    (1.0 - dx.abs() / OPACITY_FALLOFF).max(OPACITY_FLOOR)
}

fn drag_transform(offset: Vector) -> CardTransform {
    CardTransform {
        translation: offset,
        rotation: offset.x * ROTATION_PER_PIXEL,
        opacity: drag_opacity(offset.x),
    }
}

/// Normalized [0, 1] animation progress at `now`.
fn progress(started: Instant, now: Instant, duration: Duration) -> f32 {
    let elapsed = now.saturating_duration_since(started).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn dragged_to(dx: f32, dy: f32) -> Gesture {
        let mut gesture = Gesture::new();
        assert!(gesture.press(Point::new(0.0, 0.0), 0));
        gesture.drag_to(Point::new(dx, dy));
        gesture
    }

    #[test]
    fn release_past_threshold_commits_in_drag_direction() {
        let t0 = Instant::now();

        let mut gesture = dragged_to(150.0, 10.0);
        assert_eq!(gesture.release(t0), Some(Decision::Like));
        assert!(gesture.is_committing());
        assert_eq!(gesture.exiting_card(), Some(0));

        let mut gesture = dragged_to(-150.0, 0.0);
        assert_eq!(gesture.release(t0), Some(Decision::Dislike));
    }

    #[test]
    fn release_under_threshold_snaps_back_to_identity() {
        let t0 = Instant::now();
        let mut gesture = dragged_to(30.0, 0.0);

        assert_eq!(gesture.release(t0), None);
        assert!(gesture.in_motion());

        // Halfway back: offset has shrunk but not vanished.
        let mid = gesture.transform(t0 + ms(150));
        assert!((mid.translation.x - 15.0).abs() < EPS);

        assert_eq!(gesture.tick(t0 + ms(299)), None);
        assert_eq!(gesture.tick(t0 + ms(300)), Some(GestureEvent::SettledBack));
        assert_eq!(gesture.transform(t0 + ms(300)), CardTransform::identity());
        assert!(!gesture.in_motion());
    }

    #[test]
    fn swipe_exit_finishes_after_its_duration() {
        let t0 = Instant::now();
        let mut gesture = dragged_to(150.0, 0.0);
        gesture.release(t0);

        assert_eq!(gesture.tick(t0 + ms(100)), None);
        assert_eq!(
            gesture.tick(t0 + ms(300)),
            Some(GestureEvent::Finalized {
                decision: Decision::Like,
                card: 0,
                source: CommitSource::Swipe,
            })
        );
        assert!(!gesture.in_motion());
    }

    #[test]
    fn drag_transform_tracks_offset_rotation_and_opacity() {
        let gesture = dragged_to(120.0, -20.0);
        let t = gesture.transform(Instant::now());

        assert!((t.translation.x - 120.0).abs() < EPS);
        assert!((t.translation.y + 20.0).abs() < EPS);
        assert!((t.rotation - 12.0).abs() < EPS);
        assert!((t.opacity - 0.6).abs() < EPS);
    }

    #[test]
    fn drag_opacity_never_falls_below_the_floor() {
        let t = dragged_to(450.0, 0.0).transform(Instant::now());
        assert!((t.opacity - 0.5).abs() < EPS);
    }

    #[test]
    fn indicator_is_strict_and_stateless() {
        let mut gesture = dragged_to(51.0, 0.0);
        assert_eq!(gesture.indicator(), Some(Decision::Like));

        gesture.drag_to(Point::new(50.0, 0.0));
        assert_eq!(gesture.indicator(), None);

        gesture.drag_to(Point::new(-51.0, 0.0));
        assert_eq!(gesture.indicator(), Some(Decision::Dislike));

        // Returning to center clears it; nothing sticks.
        gesture.drag_to(Point::new(0.0, 0.0));
        assert_eq!(gesture.indicator(), None);
    }

    #[test]
    fn button_path_holds_then_exits() {
        let t0 = Instant::now();
        let mut gesture = Gesture::new();
        assert!(gesture.press_button(Decision::Like, 3, t0));

        // During the hold the card rests but the indicator is forced on.
        assert_eq!(gesture.transform(t0 + ms(200)), CardTransform::identity());
        assert_eq!(gesture.indicator(), Some(Decision::Like));

        // Halfway through the exit: translated, rotated, fading.
        let t = gesture.transform(t0 + ms(700));
        assert!((t.translation.x - 300.0).abs() < EPS);
        assert!((t.rotation - 15.0).abs() < EPS);
        assert!((t.opacity - 0.5).abs() < EPS);

        assert_eq!(gesture.tick(t0 + ms(999)), None);
        assert_eq!(
            gesture.tick(t0 + ms(1000)),
            Some(GestureEvent::Finalized {
                decision: Decision::Like,
                card: 3,
                source: CommitSource::Button,
            })
        );
    }

    #[test]
    fn reentrancy_guard_holds_for_the_whole_button_sequence() {
        let t0 = Instant::now();
        let mut gesture = Gesture::new();
        assert!(gesture.press_button(Decision::Dislike, 0, t0));

        assert!(!gesture.press_button(Decision::Like, 0, t0 + ms(100)));
        assert!(!gesture.press_button(Decision::Like, 0, t0 + ms(900)));
        assert!(!gesture.press(Point::new(0.0, 0.0), 0));

        gesture.tick(t0 + ms(1000)).expect("commit should finalize");
        assert!(gesture.press_button(Decision::Like, 1, t0 + ms(1001)));
    }

    #[test]
    fn presses_during_a_drag_are_ignored() {
        let mut gesture = dragged_to(20.0, 0.0);
        assert!(!gesture.press(Point::new(5.0, 5.0), 1));
        assert!(!gesture.press_button(Decision::Like, 1, Instant::now()));
        assert_eq!(gesture.bound_card(), Some(0));
    }

    #[test]
    fn press_during_snap_back_starts_a_fresh_session() {
        let t0 = Instant::now();
        let mut gesture = dragged_to(40.0, 0.0);
        gesture.release(t0);
        assert!(gesture.in_motion());

        assert!(gesture.press(Point::new(10.0, 10.0), 2));
        assert!(gesture.is_dragging());
        assert_eq!(gesture.bound_card(), Some(2));
    }

    #[test]
    fn release_without_a_session_does_nothing() {
        let mut gesture = Gesture::new();
        assert_eq!(gesture.release(Instant::now()), None);
        assert_eq!(gesture.transform(Instant::now()), CardTransform::identity());
    }
}
