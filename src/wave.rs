//! Dynamic wave gesture detection.
//!
//! Two co-resident detectors per hand side over the same palm-center
//! stream: `WaveDetector` classifies ambient side-to-side oscillation
//! from a sliding time window, and `HelloWaveDetector` recognizes a
//! longer, deliberately sustained greeting wave with strict gating.
//! State is owned per hand side by the caller; nothing global.

use std::collections::VecDeque;
use tracing::{debug, info};

use crate::pose::{PalmDirection, PoseSnapshot};

// ── Ambient wave detector ──────────────────────────────────

/// One timestamped palm-center sample.
#[derive(Debug, Clone, Copy)]
struct WaveSample {
    x: f32,
    y: f32,
    t_ms: f64,
}

/// Thresholds for ambient wave detection.
#[derive(Debug, Clone)]
pub struct WaveConfig {
    /// Sliding window length in milliseconds.
    pub window_ms: f64,
    /// Minimum samples in the window before evaluating.
    pub min_samples: usize,
    /// Minimum horizontal range across the window.
    pub min_amplitude: f32,
    /// Reject if the vertical range exceeds the horizontal range times
    /// this multiplier (filters vertical-only motion).
    pub max_vertical_ratio: f32,
    /// Per-step delta below which a sample-to-sample move is jitter.
    pub min_step: f32,
    /// Direction reversals required to report waving.
    pub min_direction_changes: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            window_ms: 900.0,
            min_samples: 5,
            min_amplitude: 0.04,
            max_vertical_ratio: 1.0,
            min_step: 0.005,
            min_direction_changes: 1,
        }
    }
}

/// Sliding-window oscillation detector for one hand side.
///
/// Gated frames (hand not an open palm, OK gesture, or palm facing
/// away) are silent: the history is left untouched and stale samples
/// simply age out of the window.
#[derive(Debug)]
pub struct WaveDetector {
    /// Configuration.
    pub config: WaveConfig,
    /// Bounded palm-center history.
    history: VecDeque<WaveSample>,
}

impl WaveDetector {
    pub fn new() -> Self {
        Self {
            config: WaveConfig::default(),
            history: VecDeque::new(),
        }
    }

    /// Feed one frame's pose snapshot.  Returns whether the hand is
    /// currently waving.
    pub fn update(&mut self, snapshot: &PoseSnapshot, now_ms: f64) -> bool {
        if !snapshot.is_open_palm
            || snapshot.is_ok
            || snapshot.palm_direction == PalmDirection::Away
        {
            return false;
        }

        self.history.push_back(WaveSample {
            x: snapshot.palm_center[0],
            y: snapshot.palm_center[1],
            t_ms: now_ms,
        });
        while let Some(front) = self.history.front() {
            if now_ms - front.t_ms > self.config.window_ms {
                self.history.pop_front();
            } else {
                break;
            }
        }

        if self.history.len() < self.config.min_samples {
            return false;
        }

        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for s in &self.history {
            min_x = min_x.min(s.x);
            max_x = max_x.max(s.x);
            min_y = min_y.min(s.y);
            max_y = max_y.max(s.y);
        }
        let x_range = max_x - min_x;
        let y_range = max_y - min_y;

        if x_range < self.config.min_amplitude {
            return false;
        }
        if y_range > x_range * self.config.max_vertical_ratio {
            return false;
        }

        let changes = self.direction_changes();
        changes >= self.config.min_direction_changes
    }

    /// Count sign reversals in consecutive-sample x deltas, ignoring
    /// steps below `min_step`.
    fn direction_changes(&self) -> u32 {
        let mut changes = 0;
        let mut last_sign = 0i8;
        let mut prev_x: Option<f32> = None;
        for s in &self.history {
            if let Some(px) = prev_x {
                let delta = s.x - px;
                if delta.abs() >= self.config.min_step {
                    let sign = if delta > 0.0 { 1 } else { -1 };
                    if last_sign != 0 && sign != last_sign {
                        changes += 1;
                    }
                    last_sign = sign;
                }
            }
            prev_x = Some(s.x);
        }
        changes
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    /// Status s-expression for IPC reporting.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:samples {} :window-ms {:.0} :min-amplitude {:.3})",
            self.history.len(),
            self.config.window_ms,
            self.config.min_amplitude,
        )
    }
}

// ── Hello wave detector ────────────────────────────────────

/// Thresholds for the sustained "hello" wave.
#[derive(Debug, Clone)]
pub struct HelloWaveConfig {
    /// Palm-center y must be below this (raised hand; smaller y is
    /// higher on screen).
    pub raised_max_y: f32,
    /// Minimum x delta to commit a direction.
    pub min_delta: f32,
    /// Committed direction reversals required before the timer starts.
    pub min_direction_changes: u32,
    /// Elapsed time since the timer started before reporting.
    pub trigger_ms: f64,
    /// Consecutive qualifying frames required alongside the duration.
    pub min_consecutive_frames: u32,
}

impl Default for HelloWaveConfig {
    fn default() -> Self {
        Self {
            raised_max_y: 0.5,
            min_delta: 0.01,
            min_direction_changes: 2,
            trigger_ms: 800.0,
            min_consecutive_frames: 8,
        }
    }
}

/// Per-frame hello-wave report.
#[derive(Debug, Clone, Copy)]
pub struct HelloWaveStatus {
    /// Whether a sustained hello wave is currently recognized.
    pub waving: bool,
    /// Milliseconds since the wave timer started (0 when idle).
    pub duration_ms: f64,
}

/// Sustained-greeting detector for one hand side.
///
/// Any single non-qualifying frame fully resets the detector.  That is
/// deliberate: tolerance for dropped frames would admit false
/// positives, and a greeting wave is long enough to survive the
/// strictness.
#[derive(Debug)]
pub struct HelloWaveDetector {
    /// Configuration.
    pub config: HelloWaveConfig,
    /// Timer start, set once enough reversals have accumulated.
    wave_start_ms: Option<f64>,
    /// Qualifying frames since the timer started.
    consecutive_frames: u32,
    /// Committed direction reversals so far.
    direction_changes: u32,
    /// Previous sample x.
    last_x: Option<f32>,
    /// Last committed direction: -1, 0, or 1.
    last_direction: i8,
    /// Previous report, for logging the rising edge.
    was_waving: bool,
}

impl HelloWaveDetector {
    pub fn new() -> Self {
        Self {
            config: HelloWaveConfig::default(),
            wave_start_ms: None,
            consecutive_frames: 0,
            direction_changes: 0,
            last_x: None,
            last_direction: 0,
            was_waving: false,
        }
    }

    /// Feed one frame's pose snapshot.
    pub fn update(&mut self, snapshot: &PoseSnapshot, now_ms: f64) -> HelloWaveStatus {
        let raised = snapshot.palm_center[1] < self.config.raised_max_y;
        let blocked = snapshot.is_pointing
            || snapshot.is_thumbs_up
            || snapshot.is_ok
            || snapshot.is_fist;
        let qualifies = snapshot.is_open_palm
            && raised
            && !blocked
            && snapshot.palm_direction != PalmDirection::Away;

        if !qualifies {
            self.reset();
            return HelloWaveStatus {
                waving: false,
                duration_ms: 0.0,
            };
        }

        let x = snapshot.palm_center[0];
        if let Some(prev) = self.last_x {
            let delta = x - prev;
            let direction = if delta > self.config.min_delta {
                1
            } else if delta < -self.config.min_delta {
                -1
            } else {
                0
            };
            if direction != 0 {
                if self.last_direction != 0 && direction != self.last_direction {
                    self.direction_changes += 1;
                }
                self.last_direction = direction;
            }
        }
        self.last_x = Some(x);

        if self.direction_changes >= self.config.min_direction_changes {
            if self.wave_start_ms.is_none() {
                self.wave_start_ms = Some(now_ms);
                debug!(
                    "Hello wave timer started for {:?} at {:.0}ms",
                    snapshot.hand, now_ms,
                );
            }
            self.consecutive_frames += 1;
        }

        let duration_ms = self.wave_start_ms.map(|s| now_ms - s).unwrap_or(0.0);
        let waving = self.wave_start_ms.is_some()
            && duration_ms >= self.config.trigger_ms
            && self.consecutive_frames >= self.config.min_consecutive_frames;

        if waving && !self.was_waving {
            info!(
                "Hello wave recognized on {:?} ({:.0}ms sustained)",
                snapshot.hand, duration_ms,
            );
        }
        self.was_waving = waving;

        HelloWaveStatus {
            waving,
            duration_ms,
        }
    }

    /// Clear all detector state (timer, counters, last position).
    pub fn reset(&mut self) {
        self.wave_start_ms = None;
        self.consecutive_frames = 0;
        self.direction_changes = 0;
        self.last_x = None;
        self.last_direction = 0;
        self.was_waving = false;
    }

    /// Status s-expression for IPC reporting.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:timer {} :changes {} :frames {})",
            self.wave_start_ms
                .map(|s| format!("{:.0}", s))
                .unwrap_or_else(|| "nil".to_string()),
            self.direction_changes,
            self.consecutive_frames,
        )
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Open-palm snapshot with the palm center moved to (x, y).
#[cfg(test)]
fn open_snapshot(x: f32, y: f32) -> PoseSnapshot {
    use crate::hand::Hand;
    use crate::pose::{classify_pose, open_hand, PoseConfig};

    let mut snapshot = classify_pose(&open_hand(Hand::Right), &PoseConfig::default());
    snapshot.palm_center = [x, y, 0.0];
    snapshot
}

/// Fist snapshot (fails both detectors' gates) at (x, y).
#[cfg(test)]
fn fist_snapshot(x: f32, y: f32) -> PoseSnapshot {
    use crate::hand::Hand;
    use crate::pose::{classify_pose, fist_hand, PoseConfig};

    let mut snapshot = classify_pose(&fist_hand(Hand::Right), &PoseConfig::default());
    snapshot.palm_center = [x, y, 0.0];
    snapshot
}

// ── Tests ──────────────────────────────────────────────────
