use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, DashboardService, QuizLoopService};
use site_core::model::PublicId;
use storage::HttpConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug, Parser)]
#[command(name = "site", version, about = "Project dashboard and science quiz")]
struct Args {
    /// Base URL of the site backend.
    #[arg(long, env = "SITE_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Session token sent as the `auth_token` cookie.
    #[arg(long, env = "SITE_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "SITE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

impl Args {
    fn http_config(&self) -> Result<HttpConfig, storage::HttpInitError> {
        Ok(HttpConfig::new(&self.base_url)?
            .with_auth_token(self.auth_token.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

struct DesktopApp {
    config: HttpConfig,
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn project_url(&self, public_id: &PublicId) -> String {
        self.config.page_url(&format!("project/{public_id}"))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.http_config()?;
    info!(?config, "starting");
    let services = AppServices::new_http(&config, Clock::default_clock())?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { config, services });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Site")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
