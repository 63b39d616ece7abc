//! Info-panel carousel: active index, auto-advance, navigation, and swipes.
//!
//! The controller is deadline based. It never sleeps; it records when the
//! next auto-advance is due and [`CarouselController::tick`] advances only
//! once that time has passed. The scheduler uses
//! [`CarouselController::time_until_due`] to know how long to wait.
//!
//! # Navigation Resets the Timer
//!
//! Every explicit navigation that changes or re-selects a panel (`next`,
//! `prev`, `go_to`, a resolved swipe) pushes the next auto-advance a full
//! period into the future, so a manual move is never followed by an
//! immediate automatic one.
//!
//! # Example
//!
//! ```rust
//! use ride_console::carousel::{CarouselController, SwipeDirection};
//!
//! let mut carousel = CarouselController::new(["Rider", "Trip", "Vehicle"], 60_000, 50.0, 0).unwrap();
//!
//! assert_eq!(carousel.swipe(100.0, 40.0, 0), Some(SwipeDirection::Next));
//! assert_eq!(carousel.state().active_index, 1);
//!
//! assert_eq!(carousel.swipe(100.0, 70.0, 0), None); // below threshold
//!
//! assert!(carousel.tick(60_000));
//! assert_eq!(carousel.state().active_index, 2);
//! ```

use heapless::String as HString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SimulationConfig;

/// Maximum length of a panel title.
pub const MAX_PANEL_TITLE: usize = 24;

/// Short panel title.
pub type PanelTitle = HString<MAX_PANEL_TITLE>;

/// Panels shown by the driver console.
pub const DEFAULT_PANELS: [&str; 4] = ["Rider Info", "Trip Details", "Vehicle", "Battery"];

/// Errors from carousel navigation.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CarouselError {
    /// `go_to` target outside `[0, panel_count)`.
    #[error("panel index {index} out of range (0..{panel_count})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of panels.
        panel_count: usize,
    },

    /// A carousel needs at least one panel.
    #[error("carousel needs at least one panel")]
    EmptyCarousel,
}

/// Resolved direction of a swipe gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Finger moved left: show the next panel.
    Next,
    /// Finger moved right: show the previous panel.
    Prev,
}

/// Classify a horizontal gesture.
///
/// `distance = start_x - end_x`; beyond `+threshold` is [`SwipeDirection::Next`],
/// beyond `-threshold` is [`SwipeDirection::Prev`], anything else is no swipe.
pub fn resolve_swipe(start_x: f64, end_x: f64, threshold: f64) -> Option<SwipeDirection> {
    let distance = start_x - end_x;
    if distance > threshold {
        Some(SwipeDirection::Next)
    } else if distance < -threshold {
        Some(SwipeDirection::Prev)
    } else {
        None
    }
}

/// Accumulates touch events for one gesture.
///
/// A gesture resolves only when both a start and at least one move were
/// recorded. A tap (start without move) or a stray end event never swipes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeTracker {
    start_x: Option<f64>,
    last_x: Option<f64>,
}

impl SwipeTracker {
    /// Begin a gesture, discarding any unfinished one.
    pub fn touch_start(&mut self, x: f64) {
        self.start_x = Some(x);
        self.last_x = None;
    }

    /// Record the current finger position. Ignored outside a gesture.
    pub fn touch_move(&mut self, x: f64) {
        if self.start_x.is_some() {
            self.last_x = Some(x);
        }
    }

    /// Finish the gesture and return its start and end, if complete.
    pub fn touch_end(&mut self) -> Option<(f64, f64)> {
        let gesture = self.start_x.zip(self.last_x);
        *self = Self::default();
        gesture
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.start_x.is_some()
    }
}

/// Observable carousel state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarouselState {
    /// Visible panel, `0 <= active_index < panel_count`.
    pub active_index: usize,
    /// Number of panels, at least 1.
    pub panel_count: usize,
    /// Title of the visible panel.
    pub active_title: PanelTitle,
}

/// Chooses the visible panel.
#[derive(Clone, Debug)]
pub struct CarouselController {
    panels: Vec<PanelTitle>,
    active_index: usize,
    auto_advance_ms: u64,
    next_due_ms: u64,
    swipe_threshold: f64,
    tracker: SwipeTracker,
}

impl CarouselController {
    /// Create a carousel showing the first panel, with the first
    /// auto-advance due one period after `now_ms`.
    pub fn new<I, S>(
        panels: I,
        auto_advance_ms: u64,
        swipe_threshold: f64,
        now_ms: u64,
    ) -> Result<Self, CarouselError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let panels = collect_titles(panels)?;
        Ok(Self::with_titles(panels, auto_advance_ms, swipe_threshold, now_ms))
    }

    /// The console's default panels with periods from `config`.
    pub fn from_config(config: &SimulationConfig, now_ms: u64) -> Self {
        let panels = DEFAULT_PANELS.iter().map(|title| short_title(title)).collect();
        Self::with_titles(panels, config.carousel_advance_ms, config.swipe_threshold, now_ms)
    }

    /// `panels` must be non-empty.
    fn with_titles(
        panels: Vec<PanelTitle>,
        auto_advance_ms: u64,
        swipe_threshold: f64,
        now_ms: u64,
    ) -> Self {
        debug_assert!(!panels.is_empty());
        let auto_advance_ms = auto_advance_ms.max(1);
        Self {
            panels,
            active_index: 0,
            auto_advance_ms,
            next_due_ms: now_ms.saturating_add(auto_advance_ms),
            swipe_threshold: swipe_threshold.abs(),
            tracker: SwipeTracker::default(),
        }
    }

    /// Replace the panel set.
    ///
    /// When the count changes the carousel returns to the first panel and the
    /// timer restarts. An empty set is rejected and leaves the carousel as is.
    pub fn set_panels<I, S>(&mut self, panels: I, now_ms: u64) -> Result<(), CarouselError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let panels = collect_titles(panels)?;
        if panels.len() != self.panels.len() {
            self.active_index = 0;
            self.reset_timer(now_ms);
            tracing::debug!(panel_count = panels.len(), "carousel panel count changed");
        }
        self.panels = panels;
        Ok(())
    }

    /// Whether timer and swipe navigation can do anything.
    pub fn can_cycle(&self) -> bool {
        self.panels.len() > 1
    }

    /// Auto-advance if due. Returns `true` when the panel changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.can_cycle() || now_ms < self.next_due_ms {
            return false;
        }
        self.active_index = (self.active_index + 1) % self.panels.len();
        self.reset_timer(now_ms);
        tracing::debug!(active_index = self.active_index, "carousel auto-advance");
        true
    }

    /// Milliseconds until the next auto-advance, `None` when there is nothing to cycle.
    pub fn time_until_due(&self, now_ms: u64) -> Option<u64> {
        self.can_cycle()
            .then(|| self.next_due_ms.saturating_sub(now_ms))
    }

    /// Show the next panel, wrapping to the first.
    pub fn next(&mut self, now_ms: u64) -> usize {
        self.active_index = (self.active_index + 1) % self.panels.len();
        self.reset_timer(now_ms);
        self.active_index
    }

    /// Show the previous panel, wrapping to the last.
    pub fn prev(&mut self, now_ms: u64) -> usize {
        let count = self.panels.len();
        self.active_index = (self.active_index + count - 1) % count;
        self.reset_timer(now_ms);
        self.active_index
    }

    /// Jump to a panel. Out-of-range indices leave the carousel untouched.
    pub fn go_to(&mut self, index: usize, now_ms: u64) -> Result<usize, CarouselError> {
        if index >= self.panels.len() {
            return Err(CarouselError::IndexOutOfRange {
                index,
                panel_count: self.panels.len(),
            });
        }
        self.active_index = index;
        self.reset_timer(now_ms);
        Ok(index)
    }

    /// Resolve a complete gesture and navigate. Returns the applied direction.
    pub fn swipe(&mut self, start_x: f64, end_x: f64, now_ms: u64) -> Option<SwipeDirection> {
        if !self.can_cycle() {
            return None;
        }
        let direction = resolve_swipe(start_x, end_x, self.swipe_threshold)?;
        match direction {
            SwipeDirection::Next => self.next(now_ms),
            SwipeDirection::Prev => self.prev(now_ms),
        };
        tracing::debug!(?direction, active_index = self.active_index, "carousel swipe");
        Some(direction)
    }

    /// Touch began at `x`.
    pub fn touch_start(&mut self, x: f64) {
        self.tracker.touch_start(x);
    }

    /// Finger moved to `x`.
    pub fn touch_move(&mut self, x: f64) {
        self.tracker.touch_move(x);
    }

    /// Touch ended: resolve the tracked gesture, if any.
    pub fn touch_end(&mut self, now_ms: u64) -> Option<SwipeDirection> {
        let (start_x, end_x) = self.tracker.touch_end()?;
        self.swipe(start_x, end_x, now_ms)
    }

    /// Current state.
    pub fn state(&self) -> CarouselState {
        CarouselState {
            active_index: self.active_index,
            panel_count: self.panels.len(),
            active_title: self.panels[self.active_index].clone(),
        }
    }

    /// All panel titles in order.
    pub fn panels(&self) -> &[PanelTitle] {
        &self.panels
    }

    /// Configured swipe threshold.
    pub fn swipe_threshold(&self) -> f64 {
        self.swipe_threshold
    }

    fn reset_timer(&mut self, now_ms: u64) {
        self.next_due_ms = now_ms.saturating_add(self.auto_advance_ms);
    }
}

fn collect_titles<I, S>(panels: I) -> Result<Vec<PanelTitle>, CarouselError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let titles: Vec<PanelTitle> = panels
        .into_iter()
        .map(|title| short_title(title.as_ref()))
        .collect();
    if titles.is_empty() {
        return Err(CarouselError::EmptyCarousel);
    }
    Ok(titles)
}

/// Truncate a title to [`MAX_PANEL_TITLE`] bytes on a char boundary.
fn short_title(s: &str) -> PanelTitle {
    let mut title = PanelTitle::new();
    for c in s.chars() {
        if title.push(c).is_err() {
            break;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(count: usize) -> CarouselController {
        let titles: Vec<String> = (0..count).map(|i| format!("p{i}")).collect();
        CarouselController::new(titles, 60_000, 50.0, 0).unwrap()
    }

    #[test]
    fn default_panels() {
        let c = CarouselController::from_config(&SimulationConfig::default(), 0);
        let state = c.state();
        assert_eq!(state.panel_count, 4);
        assert_eq!(state.active_index, 0);
        assert_eq!(state.active_title.as_str(), "Rider Info");
    }

    #[test]
    fn from_config_matches_new_with_default_panels() {
        let config = SimulationConfig::default()
            .with_carousel_advance_ms(5_000)
            .with_swipe_threshold(80.0);
        let from_config = CarouselController::from_config(&config, 1_000);
        let built = CarouselController::new(DEFAULT_PANELS, 5_000, 80.0, 1_000).unwrap();

        assert_eq!(from_config.panels(), built.panels());
        assert_eq!(from_config.swipe_threshold(), 80.0);
        assert_eq!(from_config.time_until_due(1_000), Some(5_000));
        assert_eq!(from_config.time_until_due(1_000), built.time_until_due(1_000));
    }

    #[test]
    fn empty_carousel_rejected() {
        let result = CarouselController::new(Vec::<String>::new(), 1000, 50.0, 0);
        assert_eq!(result.unwrap_err(), CarouselError::EmptyCarousel);
    }

    #[test]
    fn next_wraps_to_zero() {
        let mut c = carousel(3);
        c.go_to(2, 0).unwrap();
        assert_eq!(c.next(0), 0);
    }

    #[test]
    fn prev_wraps_to_last() {
        let mut c = carousel(3);
        assert_eq!(c.prev(0), 2);
    }

    #[test]
    fn go_to_out_of_range_is_noop() {
        let mut c = carousel(3);
        c.go_to(1, 0).unwrap();
        assert_eq!(
            c.go_to(3, 0),
            Err(CarouselError::IndexOutOfRange {
                index: 3,
                panel_count: 3
            })
        );
        assert_eq!(c.state().active_index, 1);
    }

    #[test]
    fn swipe_threshold() {
        let mut c = carousel(3);
        assert_eq!(c.swipe(100.0, 40.0, 0), Some(SwipeDirection::Next));
        assert_eq!(c.state().active_index, 1);

        assert_eq!(c.swipe(100.0, 70.0, 0), None);
        assert_eq!(c.state().active_index, 1);

        assert_eq!(c.swipe(40.0, 100.0, 0), Some(SwipeDirection::Prev));
        assert_eq!(c.state().active_index, 0);
    }

    #[test]
    fn swipe_exactly_at_threshold_does_nothing() {
        assert_eq!(resolve_swipe(100.0, 50.0, 50.0), None);
        assert_eq!(resolve_swipe(50.0, 100.0, 50.0), None);
        assert_eq!(resolve_swipe(f64::NAN, 0.0, 50.0), None);
    }

    #[test]
    fn single_panel_disables_swipe_and_timer() {
        let mut c = carousel(1);
        assert_eq!(c.swipe(300.0, 0.0, 0), None);
        assert!(!c.tick(1_000_000));
        assert_eq!(c.time_until_due(0), None);
        assert_eq!(c.state().active_index, 0);
    }

    #[test]
    fn timer_advances_when_due() {
        let mut c = carousel(3);
        assert!(!c.tick(59_999));
        assert!(c.tick(60_000));
        assert_eq!(c.state().active_index, 1);
        assert_eq!(c.time_until_due(60_000), Some(60_000));
    }

    #[test]
    fn navigation_resets_timer() {
        let mut c = carousel(3);
        c.next(50_000);
        // Original deadline passes without an advance
        assert!(!c.tick(60_000));
        assert_eq!(c.state().active_index, 1);
        assert_eq!(c.time_until_due(60_000), Some(50_000));
        assert!(c.tick(110_000));
        assert_eq!(c.state().active_index, 2);
    }

    #[test]
    fn rejected_go_to_keeps_timer() {
        let mut c = carousel(3);
        let _ = c.go_to(9, 50_000);
        assert!(c.tick(60_000));
    }

    #[test]
    fn touch_gesture_resolves() {
        let mut c = carousel(3);
        c.touch_start(200.0);
        c.touch_move(150.0);
        c.touch_move(120.0);
        assert_eq!(c.touch_end(0), Some(SwipeDirection::Next));
        assert_eq!(c.state().active_index, 1);
    }

    #[test]
    fn touch_without_move_never_navigates() {
        let mut c = carousel(3);
        c.touch_start(200.0);
        assert_eq!(c.touch_end(0), None);
        assert_eq!(c.touch_end(0), None);
        assert_eq!(c.state().active_index, 0);
    }

    #[test]
    fn move_without_start_ignored() {
        let mut tracker = SwipeTracker::default();
        tracker.touch_move(10.0);
        assert!(!tracker.is_active());
        assert_eq!(tracker.touch_end(), None);
    }

    #[test]
    fn zero_coordinate_is_a_real_position() {
        let mut c = carousel(3);
        c.touch_start(0.0);
        c.touch_move(80.0);
        assert_eq!(c.touch_end(0), Some(SwipeDirection::Prev));
    }

    #[test]
    fn panel_count_change_resets_index() {
        let mut c = carousel(4);
        c.go_to(3, 0).unwrap();
        c.set_panels(["a", "b"], 0).unwrap();
        assert_eq!(c.state().active_index, 0);
        assert_eq!(c.state().panel_count, 2);
    }

    #[test]
    fn same_count_keeps_index() {
        let mut c = carousel(3);
        c.go_to(2, 0).unwrap();
        c.set_panels(["x", "y", "z"], 0).unwrap();
        assert_eq!(c.state().active_index, 2);
        assert_eq!(c.state().active_title.as_str(), "z");
    }

    #[test]
    fn set_empty_panels_rejected() {
        let mut c = carousel(3);
        c.go_to(1, 0).unwrap();
        assert!(c.set_panels(Vec::<&str>::new(), 0).is_err());
        assert_eq!(c.state().panel_count, 3);
        assert_eq!(c.state().active_index, 1);
    }

    #[test]
    fn long_titles_truncated() {
        let c = CarouselController::new(["x".repeat(100)], 1000, 50.0, 0).unwrap();
        assert_eq!(c.panels()[0].len(), MAX_PANEL_TITLE);
    }
}
