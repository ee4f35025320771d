use crate::card::{result_card, MUTED_COLOR};
use crate::Message;
use iced::widget::{button, column, container, row, scrollable, text, Column, Space};
use iced::{Element, Length};
use pullsearch_core::RedditItem;
use std::collections::HashSet;

/// Fraction of the scroll range past which more results are requested.
pub const LOAD_MORE_THRESHOLD: f32 = 0.95;

pub fn near_bottom(relative_y: f32) -> bool {
    relative_y.is_finite() && relative_y >= LOAD_MORE_THRESHOLD
}

pub struct ResultsView<'a> {
    pub items: &'a [RedditItem],
    pub expanded: &'a HashSet<String>,
    pub search_query: &'a str,
    pub loading: bool,
    pub has_more: bool,
}

impl<'a> ResultsView<'a> {
    pub fn view(self) -> Element<'a, Message> {
        let mut list = Column::new().spacing(12).padding([0, 12, 0, 0]);

        for item in self.items {
            list = list.push(result_card(
                item,
                self.search_query,
                self.expanded.contains(&item.id),
            ));
        }

        if self.loading {
            list = list.push(
                container(text("Loading...").style(MUTED_COLOR))
                    .width(Length::Fill)
                    .center_x(),
            );
        } else if self.has_more {
            list = list.push(
                container(button("Load more").on_press(Message::LoadMore))
                    .width(Length::Fill)
                    .center_x(),
            );
        }

        let toolbar = row![
            Space::with_width(Length::Fill),
            button("Export to CSV").on_press_maybe(
                (!self.items.is_empty()).then_some(Message::ExportCsv)
            ),
        ];

        column![
            toolbar,
            scrollable(list)
                .on_scroll(Message::Scrolled)
                .height(Length::Fill)
        ]
        .spacing(10)
        .into()
    }
}
