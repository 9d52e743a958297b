use std::time::Duration;

use tracing::debug;

use recipebox_api::AppState;

/// Periodically drop expired sessions so abandoned logins don't pile up.
pub async fn run_session_sweeper(state: AppState, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let purged = state.sessions.purge_expired();
        if purged > 0 {
            debug!("Session sweep: dropped {} expired sessions", purged);
        }
    }
}
