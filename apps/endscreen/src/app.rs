//! The control loop: follow the log, classify lines, show the end screen.

use std::time::Duration;

use anyhow::Context;
use endscreen_game_log::{Classifier, Follower};
use endscreen_overlay::Overlay;
use endscreen_status::{Notification, Session};
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Runs until the follower is cancelled by an interrupt.
///
/// Everything is sequential: each line is classified before the next read,
/// and while the end screen is shown the log is not being polled. Lines
/// written during that window are picked up once the screen closes.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("SIGINT received, shutting down");
                cancel.cancel();
            }
        });
    }

    let mut follower = Follower::open(
        &config.log,
        Duration::from_secs_f64(config.log_interval.max(0.0)),
        cancel.clone(),
    )
    .with_context(|| format!("opening log file {}", config.log.display()))?;

    let classifier = Classifier::new();
    let mut session = Session::default();
    let mut overlay = Overlay::new(config.screen.clone(), cancel.clone());

    tracing::info!(log = %config.log.display(), "following game log");

    while let Some(line) = follower.next_line().await.context("reading game log")? {
        match classifier.classify(&line, &mut session) {
            Ok(Some(Notification::MissionComplete { player, mission })) => {
                tracing::info!(mission = %mission.name, "mission complete, showing end screen");
                overlay
                    .show(&player, &mission)
                    .context("showing end screen")?;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "skipping line"),
        }
    }

    Ok(())
}
