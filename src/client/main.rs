/**
 * Salama Monitor - Main Entry Point
 *
 * Terminal front end for the dashboard sync units. Observes alerts and
 * cameras against the configured backend and logs every published state
 * until Ctrl-C.
 */
use futures_util::StreamExt;
use salama::client::{AlertsQuery, AlertsState, AlertsSync, ApiClient, CamerasState, CamerasSync, Config};
use salama::shared::alert::AlertSummary;
use tracing_subscriber::EnvFilter;

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    match std::env::var("SALAMA_CONFIG") {
        Ok(path) => {
            tracing::info!(%path, "loading configuration file");
            Ok(Config::load(path)?)
        }
        Err(_) => Ok(Config::from_env()?),
    }
}

fn log_alerts(state: &AlertsState) {
    if state.is_loading {
        return;
    }
    if let Some(error) = &state.error_message {
        tracing::warn!(%error, shown = state.data.len(), "alerts");
        return;
    }
    let summary = AlertSummary::of(&state.data);
    tracing::info!(
        critical = summary.critical,
        warning = summary.warning,
        info = summary.info,
        "alerts"
    );
    if let Some(latest) = state.data.first() {
        tracing::info!(
            id = latest.id,
            kind = latest.kind.as_str(),
            location = %latest.location,
            when = %latest.timestamp,
            object = %latest.object_detected,
            "latest alert"
        );
    }
}

fn log_cameras(state: &CamerasState) {
    if state.is_loading {
        return;
    }
    if let Some(error) = &state.error_message {
        tracing::warn!(%error, shown = state.data.len(), "cameras");
        return;
    }
    let pending = state.data.iter().filter(|c| c.snapshot_loading).count();
    let with_image = state.data.iter().filter(|c| c.snapshot.is_some()).count();
    tracing::info!(total = state.data.len(), pending, with_image, "cameras");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,salama=debug")),
        )
        .init();

    let config = load_config()?;
    tracing::info!(
        api = config.api_base_url(),
        timeout = ?config.request_timeout(),
        refresh = ?config.alerts_refresh_interval(),
        "starting salama-monitor"
    );

    let api = ApiClient::new(config.clone())?;
    let mut alerts = AlertsSync::observe(api.clone(), AlertsQuery::from_config(&config));
    let cameras = CamerasSync::observe(api);

    let mut alert_updates = alerts.updates();
    let mut camera_updates = cameras.updates();

    loop {
        tokio::select! {
            Some(state) = alert_updates.next() => log_alerts(&state),
            Some(state) = camera_updates.next() => log_cameras(&state),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    alerts.dispose();
    cameras.dispose();
    tracing::info!(
        alert_fetches = alerts.metrics().total_fetches,
        camera_fetches = cameras.metrics().total_fetches,
        "monitor stopped"
    );
    Ok(())
}
