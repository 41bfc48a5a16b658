/// Card stack renderer and pointer capture
///
/// A canvas `Program` that draws the visible deck window (top card plus
/// up to two stacked behind it) and translates raw mouse/touch events
/// into gesture messages. All interaction state lives in the gesture
/// machine owned by the app; the canvas itself is stateless.

use std::time::Instant;

use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas as canvas_widget;
use iced::widget::canvas::{self, Program};
use iced::{alignment, Color, Degrees, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use crate::state::deck::{Card, Deck, Decision, DEPTH_OFFSET_STEP, DEPTH_SCALE_STEP};
use crate::state::gesture::{CardTransform, Gesture};
use crate::Message;

/// Margin between the canvas edge and the resting card.
const CARD_MARGIN: f32 = 16.0;

/// Corner radius of the card backdrop.
const CARD_RADIUS: f32 = 18.0;

pub fn card_stack<'a>(deck: &'a Deck, gesture: &'a Gesture, now: Instant) -> Element<'a, Message> {
    canvas_widget(CardStack { deck, gesture, now })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

struct CardStack<'a> {
    deck: &'a Deck,
    gesture: &'a Gesture,
    now: Instant,
}

impl Program<Message> for CardStack<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse press over the stack starts a drag session.
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_over(bounds) {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::CardPressed(position)),
                    );
                }
            }

            // Moves are forwarded only mid-drag; the position is absolute,
            // so the card keeps following even outside the canvas bounds.
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if self.gesture.is_dragging() {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::CardDragged(position)),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
            | canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                if self.gesture.is_dragging() {
                    return (canvas::event::Status::Captured, Some(Message::CardReleased));
                }
            }

            // Single-touch mirrors the mouse path.
            canvas::Event::Touch(touch::Event::FingerPressed { position, .. }) => {
                if bounds.contains(position) {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::CardPressed(position)),
                    );
                }
            }

            canvas::Event::Touch(touch::Event::FingerMoved { position, .. }) => {
                if self.gesture.is_dragging() {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::CardDragged(position)),
                    );
                }
            }

            canvas::Event::Touch(touch::Event::FingerLifted { .. })
            | canvas::Event::Touch(touch::Event::FingerLost { .. }) => {
                if self.gesture.is_dragging() {
                    return (canvas::event::Status::Captured, Some(Message::CardReleased));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let base = resting_rect(bounds.size());

        // Back to front, so the top card paints last.
        let window = self.deck.visible_window();
        for (depth, card) in window.iter().enumerate().rev() {
            if self.gesture.bound_card() == Some(card.id) {
                let transform = self.gesture.transform(self.now);
                draw_card(&mut frame, theme, base, card, transform, self.gesture.indicator());
            } else {
                let rect = depth_rect(base, depth);
                draw_card(&mut frame, theme, rect, card, CardTransform::identity(), None);
            }
        }

        // A swipe-committed card has already left the window but keeps
        // animating out above the next cards.
        if let Some(id) = self.gesture.exiting_card() {
            if let Some(card) = self.deck.card(id) {
                let transform = self.gesture.transform(self.now);
                draw_card(&mut frame, theme, base, card, transform, self.gesture.indicator());
            }
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if self.gesture.is_dragging() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) && self.deck.top_card().is_some() {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Where the top card rests, leaving room for the stacked cards below.
fn resting_rect(canvas_size: Size) -> Rectangle {
    let size = Size::new(
        canvas_size.width - 2.0 * CARD_MARGIN,
        canvas_size.height - 2.0 * CARD_MARGIN - DEPTH_OFFSET_STEP * 2.0,
    );
    Rectangle::new(Point::new(CARD_MARGIN, CARD_MARGIN), size)
}

/// Stacking cue for cards behind the top one: slightly smaller, nudged down.
fn depth_rect(base: Rectangle, depth: usize) -> Rectangle {
    let scale = 1.0 - DEPTH_SCALE_STEP * depth as f32;
    let size = Size::new(base.width * scale, base.height * scale);
    Rectangle::new(
        Point::new(
            base.x + (base.width - size.width) / 2.0,
            base.y + (base.height - size.height) / 2.0 + DEPTH_OFFSET_STEP * depth as f32,
        ),
        size,
    )
}

fn draw_card(
    frame: &mut canvas::Frame,
    theme: &Theme,
    rect: Rectangle,
    card: &Card,
    transform: CardTransform,
    indicator: Option<Decision>,
) {
    let palette = theme.extended_palette();
    let rect = Rectangle::new(
        Point::new(
            rect.x + transform.translation.x,
            rect.y + transform.translation.y,
        ),
        rect.size(),
    );

    let backdrop = canvas::Path::rounded_rectangle(rect.position(), rect.size(), CARD_RADIUS.into());
    frame.fill(
        &backdrop,
        Color {
            a: transform.opacity,
            ..palette.background.weak.color
        },
    );

    let inset = Rectangle::new(
        Point::new(rect.x + 6.0, rect.y + 6.0),
        Size::new(rect.width - 12.0, rect.height - 12.0),
    );
    frame.draw_image(
        inset,
        canvas::Image::new(card.handle.clone())
            .rotation(Degrees(transform.rotation))
            .opacity(transform.opacity),
    );

    if let Some(decision) = indicator {
        let (label, color) = match decision {
            Decision::Like => ("LIKE", Color::from_rgb(0.18, 0.80, 0.44)),
            Decision::Dislike => ("PASS", Color::from_rgb(0.91, 0.30, 0.24)),
        };
        frame.fill_text(canvas::Text {
            content: label.to_owned(),
            position: Point::new(rect.center_x(), rect.y + 48.0),
            color,
            size: 44.0.into(),
            horizontal_alignment: alignment::Horizontal::Center,
            vertical_alignment: alignment::Vertical::Center,
            ..canvas::Text::default()
        });
    }
}
