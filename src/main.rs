use std::time::{Duration, Instant};

use iced::widget::{button, column, container, image, progress_bar, row, text};
use iced::{window, Alignment, Element, Length, Point, Subscription, Task, Theme};
use tracing_subscriber::EnvFilter;

mod net;
mod state;
mod ui;

use net::fetch::{self, FetchError};
use state::deck::{Decision, Deck};
use state::gesture::{CommitSource, Gesture, GestureEvent};

/// Pause between the last exit animation and the summary modal.
const SUMMARY_DELAY: Duration = Duration::from_millis(500);

/// Main application state
struct CatSwipe {
    screen: Screen,
    /// Clock sample from the latest frame tick, used to sample animations.
    now: Instant,
}

enum Screen {
    /// Batch fetch in flight; no controls yet.
    Loading,
    /// The batch fetch failed; terminal, the user has to restart the app.
    Failed(String),
    /// Deck ready and being swiped through.
    Ready(Session),
}

struct Session {
    deck: Deck,
    gesture: Gesture,
    summary_open: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// The startup batch fetch resolved.
    DeckLoaded(Result<Vec<image::Handle>, FetchError>),
    /// Pointer pressed over the card stack.
    CardPressed(Point),
    /// Pointer moved while a drag session is active.
    CardDragged(Point),
    /// Pointer released or lost.
    CardReleased,
    LikePressed,
    DislikePressed,
    /// Frame tick while an animation is running.
    Tick(Instant),
    /// The post-exhaustion delay elapsed.
    ShowSummary,
    Restart,
}

impl CatSwipe {
    fn new() -> (Self, Task<Message>) {
        (
            CatSwipe {
                screen: Screen::Loading,
                now: Instant::now(),
            },
            Task::perform(fetch::fetch_deck(), Message::DeckLoaded),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::DeckLoaded(Ok(handles)) => {
                self.screen = Screen::Ready(Session {
                    deck: Deck::new(handles),
                    gesture: Gesture::new(),
                    summary_open: false,
                });
                Task::none()
            }
            Message::DeckLoaded(Err(error)) => {
                tracing::error!(%error, "batch fetch failed");
                self.screen = Screen::Failed(error.user_message());
                Task::none()
            }
            Message::CardPressed(position) => {
                if let Screen::Ready(session) = &mut self.screen {
                    if !session.summary_open {
                        // Bind to whichever card is topmost right now, not
                        // to anything remembered from an earlier render.
                        if let Some(top) = session.deck.top_card() {
                            session.gesture.press(position, top.id);
                        }
                    }
                }
                Task::none()
            }
            Message::CardDragged(position) => {
                if let Screen::Ready(session) = &mut self.screen {
                    session.gesture.drag_to(position);
                }
                Task::none()
            }
            Message::CardReleased => {
                let now = Instant::now();
                self.now = now;
                if let Screen::Ready(session) = &mut self.screen {
                    // Fast path: a swipe past the threshold decides right
                    // away, while the exit animation plays out.
                    if let Some(decision) = session.gesture.release(now) {
                        session.deck.decide(decision);
                        return schedule_summary(&session.deck);
                    }
                }
                Task::none()
            }
            Message::LikePressed => self.button_decision(Decision::Like),
            Message::DislikePressed => self.button_decision(Decision::Dislike),
            Message::Tick(now) => {
                self.now = now;
                if let Screen::Ready(session) = &mut self.screen {
                    if let Some(event) = session.gesture.tick(now) {
                        match event {
                            GestureEvent::Finalized {
                                decision,
                                source: CommitSource::Button,
                                ..
                            } => {
                                // Slow path: the decision lands only once
                                // the hold + exit animation is done.
                                session.deck.decide(decision);
                                return schedule_summary(&session.deck);
                            }
                            // Swipe decisions were already applied at
                            // release; finalization only ends the exit
                            // animation. Deciding again here would double
                            // up on the next card.
                            GestureEvent::Finalized { .. } | GestureEvent::SettledBack => {}
                        }
                    }
                }
                Task::none()
            }
            Message::ShowSummary => {
                if let Screen::Ready(session) = &mut self.screen {
                    if session.deck.is_exhausted() {
                        session.summary_open = true;
                    }
                }
                Task::none()
            }
            Message::Restart => {
                if let Screen::Ready(session) = &mut self.screen {
                    tracing::info!("restarting deck");
                    session.deck.reset();
                    session.gesture.reset();
                    session.summary_open = false;
                }
                Task::none()
            }
        }
    }

    fn button_decision(&mut self, decision: Decision) -> Task<Message> {
        if let Screen::Ready(session) = &mut self.screen {
            if !session.summary_open {
                if let Some(top) = session.deck.top_card() {
                    session.gesture.press_button(decision, top.id, Instant::now());
                }
            }
        }
        Task::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        match &self.screen {
            Screen::Ready(session) if session.gesture.in_motion() => {
                window::frames().map(Message::Tick)
            }
            _ => Subscription::none(),
        }
    }

    fn view(&self) -> Element<Message> {
        match &self.screen {
            Screen::Loading => centered_notice("🐱 Cat Swipe", "Loading cats..."),
            Screen::Failed(message) => centered_notice("🙀 Cat Swipe", message),
            Screen::Ready(session) => {
                let (decided, total) = session.deck.progress();

                let header = column![
                    text("Cat Swipe").size(32),
                    progress_bar(0.0..=total.max(1) as f32, decided as f32).height(8),
                    text(format!("{decided} / {total}")).size(14),
                ]
                .spacing(8)
                .align_x(Alignment::Center);

                let stack_area = container(ui::cards::card_stack(
                    &session.deck,
                    &session.gesture,
                    self.now,
                ))
                .width(Length::Fixed(360.0))
                .height(Length::Fixed(460.0));

                let accepting = !session.gesture.is_committing()
                    && !session.deck.is_exhausted()
                    && !session.summary_open;
                let controls = row![
                    button(text("✖ Pass").size(20))
                        .style(button::danger)
                        .padding(14)
                        .on_press_maybe(accepting.then_some(Message::DislikePressed)),
                    button(text("❤ Like").size(20))
                        .style(button::success)
                        .padding(14)
                        .on_press_maybe(accepting.then_some(Message::LikePressed)),
                ]
                .spacing(40);

                let base: Element<Message> = container(
                    column![header, stack_area, controls]
                        .spacing(16)
                        .align_x(Alignment::Center),
                )
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();

                if session.summary_open {
                    ui::summary::over(base, &session.deck)
                } else {
                    base
                }
            }
        }
    }

    fn theme(&self) -> Theme {
        Theme::CatppuccinMocha
    }
}

/// Schedule the summary reveal if that decision finished the deck.
fn schedule_summary(deck: &Deck) -> Task<Message> {
    if deck.is_exhausted() {
        Task::perform(tokio::time::sleep(SUMMARY_DELAY), |_| Message::ShowSummary)
    } else {
        Task::none()
    }
}

fn centered_notice<'a>(title: &'a str, body: &'a str) -> Element<'a, Message> {
    container(
        column![text(title).size(40), text(body).size(18)]
            .spacing(20)
            .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cat_swipe=info")),
        )
        .init();

    iced::application("Cat Swipe", CatSwipe::update, CatSwipe::view)
        .subscription(CatSwipe::subscription)
        .theme(CatSwipe::theme)
        .window_size(iced::Size::new(420.0, 720.0))
        .centered()
        .run_with(CatSwipe::new)
}
