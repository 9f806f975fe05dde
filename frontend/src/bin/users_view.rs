//! Command-line host for the users view.
//!
//! Loads [`FrontendSettings`], wires the HTTP repository behind the user
//! directory service, mounts the view once and prints what it renders. Exits
//! non-zero when the request fails.

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::eyre::{Context, Result, eyre};
use frontend::domain::UserDirectoryService;
use frontend::inbound::view::{UsersView, ViewState};
use frontend::outbound::http::HttpUserRepository;
use frontend::{FrontendSettings, LogFormat};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = FrontendSettings::load_from_iter(env::args_os())
        .map_err(|err| eyre!("failed to load frontend settings: {err}"))?;
    init_tracing(settings.log_format()?);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let state = runtime.block_on(run(&settings))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", frontend::inbound::view::render(&state))
        .context("failed to write users view")?;

    match state {
        ViewState::Failed(error) => Err(eyre!("users request failed: {error}")),
        _ => Ok(()),
    }
}

async fn run(settings: &FrontendSettings) -> Result<ViewState> {
    let endpoint = settings.users_url()?;
    let timeout = settings.request_timeout()?;
    info!(%endpoint, timeout_secs = timeout.as_secs(), "requesting users");

    let repository = HttpUserRepository::over_reqwest(endpoint, timeout)
        .context("failed to build HTTP client")?;
    let service = UserDirectoryService::new(Arc::new(repository));

    let mut view = UsersView::new(Arc::new(service));
    view.mount();
    let state = view.wait_until_settled().await;
    view.unmount();
    Ok(state)
}

fn init_tracing(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let outcome = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if let Err(e) = outcome {
        warn!(error = %e, "tracing init failed");
    }
}
