//! Periodic tasks that drive the console.
//!
//! One tokio task per concern:
//!
//! | Task | Period | Effect |
//! |------|--------|--------|
//! | speed | `speed_tick_ms` | random-walk the speed |
//! | indicators | `indicator_tick_ms` | maybe redraw the turn signals |
//! | battery | `battery_tick_ms` | charge or drain the battery |
//! | swap | `swap_tick_ms` | advance a running battery swap |
//! | carousel | deadline | auto-advance the info panel |
//! | render | `render_interval_ms` | hand a snapshot to the renderer (optional) |
//!
//! Interval tasks first fire one full period after start. The carousel task
//! sleeps until the carousel's own deadline and is woken early whenever
//! explicit navigation moves it.
//!
//! All tasks share one [`CancellationToken`]. Every `select!` checks the
//! token first, so once a task has observed cancellation it never touches
//! the dashboard again.

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::dashboard::Dashboard;
use crate::traits::{Clock, DashboardRenderer};

/// Handle to the running periodic tasks.
///
/// Dropping the handle cancels the tasks without waiting for them;
/// [`Scheduler::shutdown`] cancels and waits.
#[derive(Debug)]
pub struct Scheduler {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Scheduler {
    /// Start the simulation tasks (no renderer).
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<C: Clock + 'static>(dashboard: Arc<Dashboard<C>>) -> Self {
        let scheduler = Self {
            token: CancellationToken::new(),
            tracker: TaskTracker::new(),
        };
        scheduler.spawn_simulation(&dashboard);
        tracing::info!("scheduler started");
        scheduler
    }

    /// Start the simulation tasks plus a render loop feeding `renderer`.
    pub fn start_with_renderer<C, R>(dashboard: Arc<Dashboard<C>>, renderer: R) -> Self
    where
        C: Clock + 'static,
        R: DashboardRenderer + 'static,
    {
        let scheduler = Self::start(Arc::clone(&dashboard));
        scheduler.spawn_render(dashboard, renderer);
        scheduler
    }

    /// A token that is cancelled when the scheduler stops. Useful for
    /// tying other tasks (the web server) to the same lifetime.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether the tasks are still meant to run.
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Cancel every task and wait until all have exited.
    pub async fn shutdown(&self) {
        self.token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        tracing::info!("scheduler stopped");
    }

    // ========================================================================
    // Task spawning
    // ========================================================================

    fn spawn_simulation<C: Clock + 'static>(&self, dashboard: &Arc<Dashboard<C>>) {
        let config = dashboard.config().clone();

        let dash = Arc::clone(dashboard);
        self.spawn_periodic("speed", config.speed_tick_ms, move || {
            dash.speed_tick();
        });

        let dash = Arc::clone(dashboard);
        self.spawn_periodic("indicators", config.indicator_tick_ms, move || {
            dash.indicator_tick();
        });

        let dash = Arc::clone(dashboard);
        self.spawn_periodic("battery", config.battery_tick_ms, move || {
            dash.battery_tick();
        });

        let dash = Arc::clone(dashboard);
        self.spawn_periodic("swap", config.swap_tick_ms, move || {
            dash.swap_tick();
        });

        self.spawn_carousel(Arc::clone(dashboard));
    }

    fn spawn_periodic<F>(&self, name: &'static str, period_ms: u64, mut tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        let token = self.token.clone();
        let period = Duration::from_millis(period_ms.max(1));

        self.tracker.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => tick(),
                }
            }
            tracing::debug!(task = name, "periodic task stopped");
        });
    }

    fn spawn_carousel<C: Clock + 'static>(&self, dashboard: Arc<Dashboard<C>>) {
        let token = self.token.clone();

        self.tracker.spawn(async move {
            loop {
                let wait = dashboard.carousel_time_until_due();
                let due = async {
                    match wait {
                        Some(ms) => time::sleep(Duration::from_millis(ms)).await,
                        None => pending::<()>().await,
                    }
                };

                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    // Deadline moved; recompute the wait.
                    _ = dashboard.carousel_changed().notified() => {}
                    _ = due => {
                        dashboard.carousel_tick();
                    }
                }
            }
            tracing::debug!(task = "carousel", "periodic task stopped");
        });
    }

    fn spawn_render<C, R>(&self, dashboard: Arc<Dashboard<C>>, mut renderer: R)
    where
        C: Clock + 'static,
        R: DashboardRenderer + 'static,
    {
        let token = self.token.clone();
        let period = Duration::from_millis(dashboard.config().render_interval_ms.max(1));

        self.tracker.spawn(async move {
            if let Err(e) = renderer.init() {
                tracing::warn!(error = %e, "renderer init failed");
            }
            // First frame immediately so the console is never blank.
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(e) = renderer.render(&dashboard.snapshot()) {
                            tracing::warn!(error = %e, "render failed");
                        }
                    }
                }
            }
            if let Err(e) = renderer.show_message("Console stopped", None) {
                tracing::debug!(error = %e, "renderer shutdown message failed");
            }
            tracing::debug!(task = "render", "periodic task stopped");
        });
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
