use crate::Message;
use iced::widget::{button, column, container, row, text, Row};
use iced::{theme, Alignment, Color, Element, Length};
use pullsearch_core::{highlight, match_count, preview_text, RedditItem};

pub const PREVIEW_CHARS: usize = 100;

const MATCH_COLOR: Color = Color {
    r: 0.80,
    g: 0.45,
    b: 0.0,
    a: 1.0,
};
pub(crate) const MUTED_COLOR: Color = Color {
    r: 0.45,
    g: 0.45,
    b: 0.45,
    a: 1.0,
};

/// Content shown in the card body: the full text when expanded, otherwise a
/// preview cut at [`PREVIEW_CHARS`].
pub fn body_text(item: &RedditItem, expanded: bool) -> String {
    let content = item.content();
    if expanded {
        content.to_string()
    } else {
        preview_text(content, PREVIEW_CHARS).into_owned()
    }
}

pub fn byline(item: &RedditItem) -> String {
    let posted = item
        .created_at()
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_default();
    format!(
        "Posted by u/{}  •  {}  •  r/{}",
        item.author, posted, item.subreddit
    )
}

pub fn result_card<'a>(
    item: &'a RedditItem,
    search_query: &str,
    expanded: bool,
) -> Element<'a, Message> {
    let header = row![
        column![
            highlighted(&item.title, search_query, 18),
            text(byline(item)).size(13).style(MUTED_COLOR)
        ]
        .spacing(6)
        .width(Length::Fill),
        button(if expanded { "Less" } else { "More" })
            .on_press(Message::ToggleExpanded(item.id.clone())),
    ]
    .spacing(10)
    .align_items(Alignment::Start);

    let mut card = column![
        header,
        highlighted(&body_text(item, expanded), search_query, 15)
    ]
    .spacing(10);

    if let Some(link) = item.link() {
        card = card.push(
            button(text("View on Reddit").size(13))
                .style(theme::Button::Text)
                .padding(0)
                .on_press(Message::OpenLink(link)),
        );
    }

    container(card)
        .padding(14)
        .width(Length::Fill)
        .style(iced::theme::Container::Box)
        .into()
}

fn highlighted<'a>(value: &str, term: &str, size: u16) -> Element<'a, Message> {
    let segments = highlight(value, term);
    if match_count(&segments) == 0 {
        return text(value.to_string()).size(size).into();
    }

    let children: Vec<Element<'a, Message>> = segments
        .into_iter()
        .map(|segment| {
            let piece = text(segment.text).size(size);
            if segment.is_match {
                piece.style(MATCH_COLOR).into()
            } else {
                piece.into()
            }
        })
        .collect();
    Row::with_children(children).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(selftext: &str) -> RedditItem {
        RedditItem {
            id: "t1".to_string(),
            title: "Title".to_string(),
            selftext: Some(selftext.to_string()),
            body: None,
            author: "ferris".to_string(),
            subreddit: "rust".to_string(),
            created_utc: 1_640_995_200,
            url: String::new(),
            score: 1,
            num_comments: Some(0),
            permalink: "/r/rust/comments/t1/".to_string(),
            is_self: Some(true),
            thumbnail: None,
        }
    }

    #[test]
    fn test_body_preview_and_expanded() {
        let long = "x".repeat(150);
        let item = item(&long);
        let preview = body_text(&item, false);
        assert_eq!(preview, format!("{}...", "x".repeat(100)));
        assert_eq!(body_text(&item, true), long);
    }

    #[test]
    fn test_short_body_not_truncated() {
        assert_eq!(body_text(&item("short"), false), "short");
    }

    #[test]
    fn test_byline() {
        assert_eq!(
            byline(&item("")),
            "Posted by u/ferris  •  January 1, 2022  •  r/rust"
        );
    }
}
