use gui::App;
use iced::{Application, Settings};
use pullsearch_client::PullPushClient;
use pullsearch_core::{AppConfig, CoreError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CoreError> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Reddit Search against {}", config.api_base_url);

    let client = PullPushClient::from_config(&config)?;

    let mut settings = Settings::with_flags((config, client));
    settings.window = iced::window::Settings {
        size: iced::Size::new(1200.0, 800.0),
        min_size: Some(iced::Size::new(800.0, 600.0)),
        ..Default::default()
    };

    PullsearchApp::run(settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        CoreError::Internal {
            message: format!("GUI error: {e}"),
        }
    })
}

struct PullsearchApp {
    app: App,
}

impl Application for PullsearchApp {
    type Message = gui::Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = (AppConfig, PullPushClient);

    fn new((config, client): Self::Flags) -> (Self, iced::Command<Self::Message>) {
        tracing::info!("Initializing application");
        (
            Self {
                app: App::new(config, client),
            },
            iced::Command::none(),
        )
    }

    fn title(&self) -> String {
        "Reddit Search".to_string()
    }

    fn update(&mut self, message: Self::Message) -> iced::Command<Self::Message> {
        match self.app.update(message) {
            Ok(command) => command,
            Err(e) => {
                self.app.report(&e);
                iced::Command::none()
            }
        }
    }

    fn view(&self) -> iced::Element<Self::Message> {
        self.app.view()
    }
}
