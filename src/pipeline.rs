//! Per-frame orchestration — the single entry point the embedder calls
//! once per hand-tracking result.
//!
//! Owns all per-side detector and interaction state and enforces the
//! intra-frame ordering the shared state requires: per-hand static and
//! dynamic detection plus single-hand interaction first, then two-hand
//! scale, then the auto-reset scheduler with fresh hand presence.

use crate::auto_reset::AutoResetScheduler;
use crate::hand::{Hand, HandFrame};
use crate::interaction::{InteractionEvent, InteractionState};
use crate::pose::{classify_pose, PoseConfig, PoseSnapshot};
use crate::scene::{ObjectId, ObjectRegistry};
use crate::wave::{HelloWaveDetector, HelloWaveStatus, WaveDetector};

// ── Provider input ─────────────────────────────────────────

/// One hand as delivered by the tracking provider: a side label plus a
/// raw landmark slice (confidence is already thresholded upstream).
#[derive(Debug, Clone, Copy)]
pub struct ProviderHand<'a> {
    pub hand: Hand,
    pub landmarks: &'a [[f32; 3]],
}

// ── Per-hand view ──────────────────────────────────────────

/// Everything the rendering/UI layer needs about one present hand.
#[derive(Debug, Clone)]
pub struct HandView {
    pub snapshot: PoseSnapshot,
    /// Ambient wave detected this frame.
    pub waving: bool,
    /// Sustained hello-wave report.
    pub hello: HelloWaveStatus,
    pub dragging: bool,
    pub rotating: bool,
    /// Two-hand scale engaged (shared across both views).
    pub scaling: bool,
}

/// Result of processing one tracking result.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub left: Option<HandView>,
    pub right: Option<HandView>,
    /// Current selection after this frame.
    pub selected: Option<ObjectId>,
    /// Interaction events emitted this frame.
    pub events: Vec<InteractionEvent>,
}

impl FrameReport {
    /// View for one side.
    pub fn view(&self, hand: Hand) -> Option<&HandView> {
        match hand {
            Hand::Left => self.left.as_ref(),
            Hand::Right => self.right.as_ref(),
        }
    }
}

// ── Pipeline state ─────────────────────────────────────────

/// Central per-frame state: pose config, one wave/hello detector pair
/// per hand side, the interaction machine, and the reset scheduler.
pub struct PipelineState {
    /// Static classifier thresholds.
    pub pose_config: PoseConfig,
    /// Interaction state machine.
    pub interaction: InteractionState,
    /// Auto-reset scheduler.
    pub auto_reset: AutoResetScheduler,
    left_wave: WaveDetector,
    right_wave: WaveDetector,
    left_hello: HelloWaveDetector,
    right_hello: HelloWaveDetector,
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            pose_config: PoseConfig::default(),
            interaction: InteractionState::new(),
            auto_reset: AutoResetScheduler::new(),
            left_wave: WaveDetector::new(),
            right_wave: WaveDetector::new(),
            left_hello: HelloWaveDetector::new(),
            right_hello: HelloWaveDetector::new(),
        }
    }

    /// Process one hand-tracking result.
    ///
    /// `hands` holds zero, one, or two provider hands; a malformed
    /// landmark slice is dropped at the boundary and that hand is
    /// simply absent this frame.
    pub fn process<R: ObjectRegistry>(
        &mut self,
        hands: &[ProviderHand],
        now_ms: f64,
        registry: &mut R,
    ) -> FrameReport {
        let mut events = Vec::new();

        let mut left_frame: Option<HandFrame> = None;
        let mut right_frame: Option<HandFrame> = None;
        for h in hands {
            match (h.hand, HandFrame::from_landmarks(h.hand, h.landmarks)) {
                (Hand::Left, Some(frame)) => left_frame = Some(frame),
                (Hand::Right, Some(frame)) => right_frame = Some(frame),
                (_, None) => {}
            }
        }

        // ── Stage 1: per-hand detection and single-hand interaction ──
        let left_parts = match &left_frame {
            Some(frame) => Some(process_hand(
                frame,
                &self.pose_config,
                &mut self.left_wave,
                &mut self.left_hello,
                &mut self.interaction,
                now_ms,
                registry,
                &mut events,
            )),
            None => {
                self.left_hello.reset();
                events.extend(self.interaction.hand_lost(Hand::Left));
                None
            }
        };
        let right_parts = match &right_frame {
            Some(frame) => Some(process_hand(
                frame,
                &self.pose_config,
                &mut self.right_wave,
                &mut self.right_hello,
                &mut self.interaction,
                now_ms,
                registry,
                &mut events,
            )),
            None => {
                self.right_hello.reset();
                events.extend(self.interaction.hand_lost(Hand::Right));
                None
            }
        };

        // ── Stage 2: two-hand scale, after both per-hand updates ──
        events.extend(self.interaction.update_two_hand_scale(
            left_parts.as_ref().map(|(s, _, _)| s),
            right_parts.as_ref().map(|(s, _, _)| s),
            registry,
        ));

        // ── Stage 3: auto-reset, with this frame's presence ──
        let any_present = left_frame.is_some() || right_frame.is_some();
        self.auto_reset.update(any_present, now_ms, registry);

        let scaling = self.interaction.is_scaling();
        let view = |parts: Option<(PoseSnapshot, bool, HelloWaveStatus)>, hand: Hand| {
            parts.map(|(snapshot, waving, hello)| HandView {
                snapshot,
                waving,
                hello,
                dragging: self.interaction.is_dragging(hand),
                rotating: self.interaction.is_rotating(hand),
                scaling,
            })
        };

        FrameReport {
            left: view(left_parts, Hand::Left),
            right: view(right_parts, Hand::Right),
            selected: self.interaction.selected(),
            events,
        }
    }

    /// Aggregate status s-expression for IPC reporting.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:interaction {} :auto-reset {} :left-wave {} :right-wave {})",
            self.interaction.status_sexp(),
            self.auto_reset.status_sexp(),
            self.left_wave.status_sexp(),
            self.right_wave.status_sexp(),
        )
    }
}

/// One present hand's stage-1 work: classify, run both wave detectors,
/// run single-hand interaction.
fn process_hand<R: ObjectRegistry>(
    frame: &HandFrame,
    pose_config: &PoseConfig,
    wave: &mut WaveDetector,
    hello: &mut HelloWaveDetector,
    interaction: &mut InteractionState,
    now_ms: f64,
    registry: &mut R,
    events: &mut Vec<InteractionEvent>,
) -> (PoseSnapshot, bool, HelloWaveStatus) {
    let snapshot = classify_pose(frame, pose_config);
    let waving = wave.update(&snapshot, now_ms);
    let hello_status = hello.update(&snapshot, now_ms);
    events.extend(interaction.update_hand(frame, &snapshot, now_ms, registry));
    (snapshot, waving, hello_status)
}

// ── Test helpers ───────────────────────────────────────────

/// Open-palm hand translated so the palm center sits at (x, 0.35) —
/// raised enough for the hello-wave gate.
#[cfg(test)]
fn raised_open_hand(hand: Hand, x: f32) -> HandFrame {
    use crate::pose::open_hand;

    let mut frame = open_hand(hand);
    let dx = x - 0.5;
    for lm in frame.landmarks.iter_mut() {
        lm[0] += dx;
        lm[1] -= 0.45;
    }
    frame
}

// ── Tests ──────────────────────────────────────────────────
