mod card;
mod form;
mod results;

pub use form::{FormMessage, SearchForm};
pub use results::{near_bottom, ResultsView};

use iced::widget::{button, column, container, scrollable, text};
use iced::{theme, Color, Command, Element, Length};
use pullsearch_client::{ApiMetrics, PullPushClient};
use pullsearch_core::{
    write_csv, ApiError, AppConfig, CoreError, ErrorExt, ErrorReporter, SearchFilters,
    SearchRequest, SearchResponse, SearchState,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

const ERROR_COLOR: Color = Color {
    r: 0.73,
    g: 0.11,
    b: 0.11,
    a: 1.0,
};

#[derive(Debug, Clone)]
pub enum Message {
    Form(FormMessage),
    SearchCompleted(SearchRequest, Result<SearchResponse, ApiError>),
    Scrolled(scrollable::Viewport),
    LoadMore,
    ToggleExpanded(String),
    ExportCsv,
    OpenLink(String),
    MetricsUpdated(ApiMetrics),
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    open::that_detached(url)
}

pub struct App {
    client: Arc<PullPushClient>,
    config: AppConfig,
    state: SearchState,
    form: SearchForm,
    expanded: HashSet<String>,
    error_banner: Option<String>,
    notice: Option<String>,
    metrics_summary: Option<String>,
    reporter: ErrorReporter,
    open_url: fn(&str) -> std::io::Result<()>,
}

impl App {
    pub fn new(config: AppConfig, client: PullPushClient) -> Self {
        let state = SearchState::new(config.default_page_size);
        let form = SearchForm::new(state.filters());
        Self {
            client: Arc::new(client),
            config,
            state,
            form,
            expanded: HashSet::new(),
            error_banner: None,
            notice: None,
            metrics_summary: None,
            reporter: ErrorReporter::new("gui"),
            open_url: open_in_browser,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn update(&mut self, message: Message) -> Result<Command<Message>, CoreError> {
        match message {
            Message::Form(form_message) => match self.form.update(form_message) {
                Some(filters) => Ok(self.search(filters)),
                None => Ok(Command::none()),
            },
            Message::SearchCompleted(request, outcome) => {
                if let Err(e) = &outcome {
                    self.reporter.report_warning(&CoreError::from(e.clone()));
                }
                let completion = self.state.complete(request, outcome);
                debug!("Search completed: {:?}", completion);
                Ok(self.refresh_metrics())
            }
            Message::Scrolled(viewport) => Ok(self.scrolled_to(viewport.relative_offset().y)),
            Message::LoadMore => Ok(self.load_more()),
            Message::ToggleExpanded(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
                Ok(Command::none())
            }
            Message::ExportCsv => {
                self.export()?;
                Ok(Command::none())
            }
            Message::OpenLink(url) => {
                info!("Opening {}", url);
                (self.open_url)(&url)?;
                Ok(Command::none())
            }
            Message::MetricsUpdated(metrics) => {
                self.metrics_summary = Some(metrics.summary());
                Ok(Command::none())
            }
        }
    }

    /// Logs `error` and shows it in the banner. Search failures are shown by
    /// the state machine itself; this covers everything else.
    pub fn report(&mut self, error: &CoreError) {
        self.reporter.report_error(error);
        self.error_banner = Some(error.user_friendly_message());
    }

    fn search(&mut self, filters: SearchFilters) -> Command<Message> {
        self.notice = None;
        self.error_banner = None;
        let request = self.state.begin_search(filters);
        if request.replaces_results() {
            self.expanded.clear();
        }
        self.dispatch(request)
    }

    fn load_more(&mut self) -> Command<Message> {
        match self.state.load_more() {
            Some(request) => self.dispatch(request),
            None => Command::none(),
        }
    }

    fn scrolled_to(&mut self, relative_y: f32) -> Command<Message> {
        if near_bottom(relative_y) {
            self.load_more()
        } else {
            Command::none()
        }
    }

    fn dispatch(&mut self, request: SearchRequest) -> Command<Message> {
        let outgoing = request.outgoing();
        if let Ok(url) = self.client.request_url(&outgoing) {
            self.state.record_api_url(&request, url.to_string());
        }

        let client = Arc::clone(&self.client);
        Command::perform(
            async move {
                let outcome = client.search(&outgoing).await;
                (request, outcome)
            },
            |(request, outcome)| Message::SearchCompleted(request, outcome),
        )
    }

    fn refresh_metrics(&self) -> Command<Message> {
        let client = Arc::clone(&self.client);
        Command::perform(
            async move { client.get_metrics().await },
            Message::MetricsUpdated,
        )
    }

    fn export(&mut self) -> Result<(), CoreError> {
        let path = self.config.export_path();
        write_csv(self.state.results(), &path)?;
        info!("Saved {} results", self.state.results().len());
        self.error_banner = None;
        self.notice = Some(format!(
            "Exported {} results to {}",
            self.state.results().len(),
            path.display()
        ));
        Ok(())
    }

    pub fn view(&self) -> Element<'_, Message> {
        let title = text("Reddit Search").size(28);
        let mut content = column![title, self.form.view().map(Message::Form)].spacing(16);

        for banner in [self.state.error(), self.error_banner.as_deref()]
            .into_iter()
            .flatten()
        {
            content = content.push(text(banner).style(ERROR_COLOR));
        }

        if let Some(notice) = &self.notice {
            content = content.push(text(notice).size(13));
        }

        if !self.state.results().is_empty() {
            let count = match self.state.total_results() {
                Some(total) => format!("Found {} of {} results", self.state.results().len(), total),
                None => format!("Found {} results", self.state.results().len()),
            };
            content = content.push(text(count));
            if let Some(url) = self.state.api_url() {
                content = content.push(
                    button(text(format!("Generated API URL: {}", url)).size(12))
                        .style(theme::Button::Text)
                        .padding(0)
                        .on_press(Message::OpenLink(url.to_string())),
                );
            }
        }

        if let Some(summary) = &self.metrics_summary {
            content = content.push(text(summary).size(12));
        }

        content = content.push(
            ResultsView {
                items: self.state.results(),
                expanded: &self.expanded,
                search_query: &self.state.filters().query,
                loading: self.state.is_loading(),
                has_more: self.state.has_more(),
            }
            .view(),
        );

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullsearch_core::{RedditItem, SearchMetadata};

    fn app_with_export_dir(dir: &std::path::Path) -> App {
        let config = AppConfig {
            export_dir: dir.to_path_buf(),
            ..Default::default()
        };
        let client = PullPushClient::from_config(&config).unwrap();
        App::new(config, client)
    }

    fn page(ids: std::ops::Range<usize>, total: u64) -> Result<SearchResponse, ApiError> {
        Ok(SearchResponse {
            data: ids
                .map(|n| RedditItem {
                    id: n.to_string(),
                    title: if n == 1 {
                        "B, with comma".to_string()
                    } else {
                        format!("Item {}", n)
                    },
                    selftext: Some("text".to_string()),
                    body: None,
                    author: "a".to_string(),
                    subreddit: "rust".to_string(),
                    created_utc: 1_640_995_200,
                    url: String::new(),
                    score: 0,
                    num_comments: None,
                    permalink: String::new(),
                    is_self: Some(true),
                    thumbnail: None,
                })
                .collect(),
            metadata: Some(SearchMetadata { total: Some(total) }),
        })
    }

    fn submit(app: &mut App, query: &str) -> SearchRequest {
        app.update(Message::Form(FormMessage::QueryChanged(query.to_string())))
            .unwrap();
        app.update(Message::Form(FormMessage::Submit)).unwrap();
        assert!(app.state().is_loading());
        SearchRequest {
            generation: 1,
            filters: SearchFilters {
                query: query.to_string(),
                ..Default::default()
            },
            size: 25,
        }
    }

    #[test]
    fn test_submit_and_complete() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_export_dir(dir.path());
        let request = submit(&mut app, "rust");
        assert!(app
            .state()
            .api_url()
            .unwrap()
            .contains("/submission/?q=rust"));

        app.update(Message::SearchCompleted(request, page(0..25, 60)))
            .unwrap();
        assert_eq!(app.state().results().len(), 25);
        assert!(!app.state().is_loading());
    }

    #[test]
    fn test_scroll_requests_more_only_near_bottom() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_export_dir(dir.path());
        let request = submit(&mut app, "rust");
        app.update(Message::SearchCompleted(request, page(0..25, 60)))
            .unwrap();

        app.scrolled_to(0.3);
        assert!(!app.state().is_loading());

        app.scrolled_to(0.99);
        assert!(app.state().is_loading());
        assert_eq!(app.state().current_size(), 50);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_export_dir(dir.path());
        let request = submit(&mut app, "rust");
        app.update(Message::SearchCompleted(request, page(0..2, 2)))
            .unwrap();

        app.update(Message::ExportCsv).unwrap();
        let csv = std::fs::read_to_string(dir.path().join("reddit_search_results.csv")).unwrap();
        assert!(csv.starts_with("title,content,author,subreddit,created_at,url"));
        assert!(csv.contains("\"B, with comma\""));
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_export_failure_surfaces_in_banner() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_export_dir(&dir.path().join("missing"));
        let error = app.update(Message::ExportCsv).err().unwrap();
        assert_eq!(error.error_code(), "EXPORT");
        app.report(&error);
        assert!(app.error_banner.is_some());
    }

    fn no_browser(_url: &str) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no browser found",
        ))
    }

    fn accept_url(_url: &str) -> std::io::Result<()> {
        Ok(())
    }

    #[test]
    fn test_open_link() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_export_dir(dir.path());
        app.open_url = accept_url;
        assert!(app
            .update(Message::OpenLink("https://reddit.com/r/rust".to_string()))
            .is_ok());
        assert!(app.error_banner.is_none());

        app.open_url = no_browser;
        let error = app
            .update(Message::OpenLink("https://reddit.com/r/rust".to_string()))
            .err()
            .unwrap();
        app.report(&error);
        assert_eq!(
            app.error_banner.as_deref(),
            Some("System error: no browser found")
        );
    }

    #[test]
    fn test_failed_search_keeps_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_export_dir(dir.path());
        let request = submit(&mut app, "rust");
        app.update(Message::SearchCompleted(request, page(0..25, 60)))
            .unwrap();

        app.update(Message::LoadMore).unwrap();
        let pending = SearchRequest {
            generation: 2,
            filters: app.state().filters().with_page(2),
            size: 50,
        };
        app.update(Message::SearchCompleted(
            pending,
            Err(ApiError::NoResponse {
                details: "timed out".to_string(),
            }),
        ))
        .unwrap();
        assert_eq!(app.state().results().len(), 25);
        assert_eq!(app.state().error(), Some("No response received from server"));
    }

    #[test]
    fn test_toggle_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_export_dir(dir.path());
        app.update(Message::ToggleExpanded("abc".to_string())).unwrap();
        assert!(app.expanded.contains("abc"));
        app.update(Message::ToggleExpanded("abc".to_string())).unwrap();
        assert!(app.expanded.is_empty());
    }
}
