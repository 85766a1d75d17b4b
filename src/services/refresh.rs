use std::time::Duration;

use tracing::{error, info};

use crate::config::{SiteConfig, WeatherConfig};
use crate::error::WeatherError;
use crate::services::weather_service::WeatherClient;
use crate::shared_state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Success,
    Failure,
}

/// Wait before the next automatic fetch: the long interval after a success,
/// the short retry interval after a failure.
pub fn next_delay(outcome: RefreshOutcome, cfg: &WeatherConfig) -> Duration {
    match outcome {
        RefreshOutcome::Success => cfg.refresh_interval(),
        RefreshOutcome::Failure => cfg.retry_interval(),
    }
}

/// Run one fetch and record its result in `state`.
pub async fn refresh_once(
    client: &WeatherClient,
    site: &SiteConfig,
    state: &AppState,
) -> RefreshOutcome {
    match client.fetch(site).await {
        Ok(snapshot) => {
            info!(
                site = %site.name,
                clouds = snapshot.cloud_cover_pct,
                radiation = snapshot.radiation_w_m2,
                sunrise = %snapshot.sunrise,
                sunset = %snapshot.sunset,
                "weather updated"
            );
            state.set_snapshot(snapshot);
            RefreshOutcome::Success
        }
        Err(e) => {
            record_failure(state, &e);
            RefreshOutcome::Failure
        }
    }
}

fn record_failure(state: &AppState, e: &WeatherError) {
    error!(kind = ?e.kind(), "weather fetch failed: {}", e);
    state.set_failure(e);
}

/// Background loop. It is the only place that fetches, so at most one
/// request is in flight. A manual refresh cuts the current wait short.
pub async fn run_refresh_loop(client: WeatherClient, site: SiteConfig, cfg: WeatherConfig, state: AppState) {
    loop {
        let outcome = refresh_once(&client, &site, &state).await;
        let delay = next_delay(outcome, &cfg);
        info!("next weather refresh in {}s", delay.as_secs());

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = state.refresh.notified() => {
                info!("manual weather refresh requested");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy() {
        let cfg = WeatherConfig::default();
        assert_eq!(next_delay(RefreshOutcome::Success, &cfg), Duration::from_secs(600));
        assert_eq!(next_delay(RefreshOutcome::Failure, &cfg), Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_failed_refresh_is_recorded() {
        let cfg = WeatherConfig {
            base_url: "http://127.0.0.1:9/v1/forecast".into(),
            timeout_s: 2,
            ..WeatherConfig::default()
        };
        let client = WeatherClient::new(&cfg).unwrap();
        let state = AppState::new();
        let outcome = refresh_once(&client, &crate::test_support::site(), &state).await;
        assert_eq!(outcome, RefreshOutcome::Failure);
        assert!(state.get_failure().is_some());
        assert!(state.get_snapshot().is_none());
    }

    #[tokio::test]
    async fn test_manual_refresh_cuts_wait_short() {
        let state = AppState::new();
        let waiter = {
            let state = state.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(600)) => false,
                    _ = state.refresh.notified() => true,
                }
            })
        };
        tokio::task::yield_now().await;
        state.request_refresh();
        assert!(waiter.await.unwrap());
    }
}
