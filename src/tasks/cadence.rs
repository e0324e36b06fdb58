//! Tick cadence background task

use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast::error::RecvError, time::interval};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, TimerCommand};

/// Background task that drives the phase timer at a 1-second cadence
///
/// The task owns the only ticking interval in the process. A start command
/// arms it, a further start command replaces it so the next tick lands a full
/// second after the restart, and a stop command or a timer that winds down to
/// idle disarms it.
pub async fn cadence_task(state: Arc<AppState>) {
    info!("Starting cadence task");

    let mut commands = state.command_tx.subscribe();

    loop {
        match commands.recv().await {
            Ok(TimerCommand::Start) => {
                debug!("Cadence armed");
                let mut ticker = interval(Duration::from_secs(1));
                ticker.tick().await; // the first tick completes immediately

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            match state.advance_timer() {
                                Ok(true) => {}
                                Ok(false) => {
                                    debug!("Timer wound down to idle, cadence disarmed");
                                    break;
                                }
                                Err(e) => {
                                    error!("Failed to advance timer: {}", e);
                                    break;
                                }
                            }
                        }

                        command = commands.recv() => {
                            match command {
                                Ok(TimerCommand::Start) => {
                                    debug!("Cadence rearmed for a fresh session");
                                    ticker = interval(Duration::from_secs(1));
                                    ticker.tick().await;
                                }
                                Ok(TimerCommand::Stop) => {
                                    debug!("Cadence disarmed");
                                    break;
                                }
                                Err(RecvError::Lagged(missed)) => {
                                    warn!("Cadence missed {} timer commands", missed);
                                }
                                Err(RecvError::Closed) => {
                                    info!("Command channel closed, stopping cadence task");
                                    return;
                                }
                            }
                        }
                    }
                }
            }
            Ok(TimerCommand::Stop) => {
                // Already idle, nothing to disarm.
                continue;
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Cadence missed {} timer commands", missed);
            }
            Err(RecvError::Closed) => {
                info!("Command channel closed, stopping cadence task");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        settings::{SettingsStore, TimerSettings},
        timer::Phase,
    };
    use tokio::time::sleep;

    fn test_state() -> Arc<AppState> {
        let path = std::env::temp_dir().join(format!(
            "workpace-cadence-test-{}.json",
            std::process::id()
        ));
        Arc::new(AppState::new(
            20721,
            "127.0.0.1".to_string(),
            SettingsStore::new(path),
            TimerSettings::default(),
        ))
    }

    #[tokio::test]
    async fn cadence_ticks_the_timer_and_disarms_on_stop() {
        let state = test_state();
        tokio::spawn(cadence_task(Arc::clone(&state)));
        // Give the task a moment to subscribe before arming it.
        sleep(Duration::from_millis(100)).await;

        state.start_timer().unwrap();
        sleep(Duration::from_millis(2600)).await;

        let ticked = state.get_timer().unwrap();
        assert_eq!(ticked.phase, Phase::Work);
        assert!(ticked.remaining_seconds < 1500);

        state.stop_timer().unwrap();
        sleep(Duration::from_millis(200)).await;
        assert_eq!(state.get_timer().unwrap().phase, Phase::Idle);

        // A disarmed cadence leaves the idle timer untouched.
        sleep(Duration::from_millis(1500)).await;
        let idle = state.get_timer().unwrap();
        assert_eq!(idle.phase, Phase::Idle);
        assert_eq!(idle.remaining_seconds, 0);
    }

    #[tokio::test]
    async fn restart_replaces_the_tick_schedule() {
        let state = test_state();
        tokio::spawn(cadence_task(Arc::clone(&state)));
        sleep(Duration::from_millis(100)).await;

        state.start_timer().unwrap();
        sleep(Duration::from_millis(2850)).await;
        assert!(state.get_timer().unwrap().remaining_seconds < 1500);

        // Restart just before the old schedule's next tick would land.
        state.start_timer().unwrap();
        sleep(Duration::from_millis(550)).await;

        // A tick on the old schedule would have fired by now; the rearmed
        // cadence waits a full second from the restart instead.
        let fresh = state.get_timer().unwrap();
        assert_eq!(fresh.phase, Phase::Work);
        assert_eq!(fresh.remaining_seconds, 1500);

        sleep(Duration::from_millis(700)).await;
        assert!(state.get_timer().unwrap().remaining_seconds < 1500);

        state.stop_timer().unwrap();
    }
}
