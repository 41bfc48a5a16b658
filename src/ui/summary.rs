/// Summary modal
///
/// Shown once the deck is exhausted: a headline with the like count, a
/// wrapped grid of the liked cats, and a restart control. Rendered as an
/// opaque overlay stacked on top of the (finished) deck view.

use iced::widget::{button, center, column, container, image, opaque, stack, text};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::state::deck::Deck;
use crate::Message;

const THUMBNAIL_SIZE: f32 = 96.0;

/// Stack the summary modal over the base deck view.
pub fn over<'a>(base: Element<'a, Message>, deck: &'a Deck) -> Element<'a, Message> {
    let modal = container(
        column![
            text("Your Cat Matches!").size(28),
            text(deck.summary_stats()).size(18),
            liked_grid(deck),
            button(text("Start Over").size(18))
                .style(button::primary)
                .padding(12)
                .on_press(Message::Restart),
        ]
        .spacing(20)
        .align_x(Alignment::Center),
    )
    .width(Length::Fixed(360.0))
    .padding(24)
    .style(container::rounded_box);

    stack![
        base,
        opaque(center(opaque(modal)).style(|_theme| {
            container::Style {
                background: Some(
                    Color {
                        a: 0.7,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }
        }))
    ]
    .into()
}

fn liked_grid(deck: &Deck) -> Element<'_, Message> {
    if let Some(message) = deck.empty_grid_message() {
        return text(message).size(16).into();
    }

    let thumbnails: Vec<Element<'_, Message>> = deck
        .liked_cards()
        .map(|card| {
            image(card.handle.clone())
                .width(THUMBNAIL_SIZE)
                .height(THUMBNAIL_SIZE)
                .content_fit(ContentFit::Cover)
                .into()
        })
        .collect();

    iced_aw::Wrap::with_elements(thumbnails)
        .spacing(8.0)
        .line_spacing(8.0)
        .into()
}
