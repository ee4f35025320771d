use iced::widget::{button, column, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length};
use pullsearch_core::{
    millis_to_date, parse_date_millis, SearchFilters, SearchType, SortDirection, SortType,
};

#[derive(Debug, Clone)]
pub enum FormMessage {
    QueryChanged(String),
    Submit,
    TypeSelected(SearchType),
    SubredditChanged(String),
    AfterChanged(String),
    BeforeChanged(String),
    SortTypeSelected(SortType),
    SortSelected(SortDirection),
    ToggleAdvanced,
}

/// Query box plus filter controls.
///
/// The draft holds every filter the user picked. The query only enters the
/// draft on submission, so editing the text box alone never searches.
#[derive(Debug, Clone)]
pub struct SearchForm {
    draft: SearchFilters,
    query_input: String,
    after_input: String,
    before_input: String,
    show_advanced: bool,
}

impl SearchForm {
    pub fn new(filters: &SearchFilters) -> Self {
        Self {
            draft: filters.clone(),
            query_input: filters.query.clone(),
            after_input: format_date(filters.after),
            before_input: format_date(filters.before),
            show_advanced: false,
        }
    }

    /// Applies `message` and returns the filters to search with, if any.
    pub fn update(&mut self, message: FormMessage) -> Option<SearchFilters> {
        match message {
            FormMessage::QueryChanged(query) => {
                self.query_input = query;
                None
            }
            FormMessage::Submit => {
                if self.query_input.trim().is_empty() {
                    return None;
                }
                self.draft.query = self.query_input.clone();
                self.emit()
            }
            FormMessage::TypeSelected(search_type) => {
                self.draft.search_type = search_type;
                self.emit()
            }
            FormMessage::SubredditChanged(subreddit) => {
                self.draft.subreddit = subreddit;
                self.emit()
            }
            FormMessage::AfterChanged(input) => {
                let parsed = parse_date_input(&input);
                self.after_input = input;
                let after = parsed?;
                self.draft.after = after;
                self.emit()
            }
            FormMessage::BeforeChanged(input) => {
                let parsed = parse_date_input(&input);
                self.before_input = input;
                let before = parsed?;
                self.draft.before = before;
                self.emit()
            }
            FormMessage::SortTypeSelected(sort_type) => {
                self.draft.sort_type = sort_type;
                self.emit()
            }
            FormMessage::SortSelected(sort) => {
                self.draft.sort = sort;
                self.emit()
            }
            FormMessage::ToggleAdvanced => {
                self.show_advanced = !self.show_advanced;
                None
            }
        }
    }

    fn emit(&self) -> Option<SearchFilters> {
        if self.draft.query.trim().is_empty() {
            return None;
        }
        Some(self.draft.with_page(1))
    }

    pub fn view(&self) -> Element<'_, FormMessage> {
        let search_bar = row![
            text_input("Search Reddit...", &self.query_input)
                .on_input(FormMessage::QueryChanged)
                .on_submit(FormMessage::Submit)
                .padding(8)
                .width(Length::Fill),
            button("Search").on_press(FormMessage::Submit).padding(8),
            pick_list(
                SearchType::ALL,
                Some(self.draft.search_type),
                FormMessage::TypeSelected
            ),
            button("Filters")
                .on_press(FormMessage::ToggleAdvanced)
                .padding(8),
        ]
        .spacing(10)
        .align_items(Alignment::Center);

        if !self.show_advanced {
            return search_bar.into();
        }

        let advanced = row![
            labeled(
                "Subreddit",
                text_input("e.g., programming", &self.draft.subreddit)
                    .on_input(FormMessage::SubredditChanged)
                    .padding(6)
                    .into()
            ),
            labeled(
                "After Date",
                text_input("YYYY-MM-DD", &self.after_input)
                    .on_input(FormMessage::AfterChanged)
                    .padding(6)
                    .into()
            ),
            labeled(
                "Before Date",
                text_input("YYYY-MM-DD", &self.before_input)
                    .on_input(FormMessage::BeforeChanged)
                    .padding(6)
                    .into()
            ),
            labeled(
                "Sort By",
                pick_list(
                    SortType::ALL,
                    Some(self.draft.sort_type),
                    FormMessage::SortTypeSelected
                )
                .into()
            ),
            labeled(
                "Direction",
                pick_list(
                    SortDirection::ALL,
                    Some(self.draft.sort),
                    FormMessage::SortSelected
                )
                .into()
            ),
        ]
        .spacing(10);

        column![search_bar, advanced].spacing(10).into()
    }
}

fn labeled<'a>(label: &'a str, control: Element<'a, FormMessage>) -> Element<'a, FormMessage> {
    column![text(label).size(13), control]
        .spacing(4)
        .width(Length::FillPortion(1))
        .into()
}

/// `Some(None)` clears the bound, `None` means the input is not a date yet.
fn parse_date_input(input: &str) -> Option<Option<i64>> {
    if input.trim().is_empty() {
        Some(None)
    } else {
        parse_date_millis(input).map(Some)
    }
}

fn format_date(millis: Option<i64>) -> String {
    millis
        .and_then(millis_to_date)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted_form() -> SearchForm {
        let mut form = SearchForm::new(&SearchFilters::default());
        form.update(FormMessage::QueryChanged("rust".to_string()));
        assert!(form.update(FormMessage::Submit).is_some());
        form
    }

    #[test]
    fn test_blank_query_not_submitted() {
        let mut form = SearchForm::new(&SearchFilters::default());
        form.update(FormMessage::QueryChanged("   ".to_string()));
        assert!(form.update(FormMessage::Submit).is_none());
        assert!(form
            .update(FormMessage::TypeSelected(SearchType::Comment))
            .is_none());
    }

    #[test]
    fn test_filter_change_emits_page_one() {
        let mut form = SearchForm::new(&SearchFilters {
            query: "rust".to_string(),
            page: 4,
            ..Default::default()
        });
        let emitted = form
            .update(FormMessage::SubredditChanged("learnrust".to_string()))
            .unwrap();
        assert_eq!(emitted.subreddit, "learnrust");
        assert_eq!(emitted.page, 1);
    }

    #[test]
    fn test_query_edit_needs_submit() {
        let mut form = submitted_form();
        assert!(form
            .update(FormMessage::QueryChanged("tokio".to_string()))
            .is_none());
        let emitted = form.update(FormMessage::SortSelected(SortDirection::Asc)).unwrap();
        assert_eq!(emitted.query, "rust");

        let emitted = form.update(FormMessage::Submit).unwrap();
        assert_eq!(emitted.query, "tokio");
        assert_eq!(emitted.sort, SortDirection::Asc);
    }

    #[test]
    fn test_date_fields() {
        let mut form = submitted_form();
        assert!(form
            .update(FormMessage::AfterChanged("2022-01".to_string()))
            .is_none());

        let emitted = form
            .update(FormMessage::AfterChanged("2022-01-01".to_string()))
            .unwrap();
        assert_eq!(emitted.after, Some(1_640_995_200_000));

        let cleared = form.update(FormMessage::AfterChanged(String::new())).unwrap();
        assert_eq!(cleared.after, None);
    }

    #[test]
    fn test_dates_shown_as_calendar_dates() {
        let form = SearchForm::new(&SearchFilters {
            before: Some(1_641_081_600_000),
            ..Default::default()
        });
        assert_eq!(form.before_input, "2022-01-02");
        assert_eq!(form.after_input, "");
    }

    #[test]
    fn test_toggle_advanced() {
        let mut form = SearchForm::new(&SearchFilters::default());
        assert!(form.update(FormMessage::ToggleAdvanced).is_none());
        assert!(form.show_advanced);
    }
}
