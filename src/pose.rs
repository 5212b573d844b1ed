//! Static hand pose classification.
//!
//! Classifies one `HandFrame` into a `PoseSnapshot`: finger extension
//! flags, pinch states for the four thumb-fingertip pairs, named pose
//! flags, and palm orientation.  Pure per-frame derivation, no state.

use crate::hand::{Finger, Hand, HandFrame, HandLandmark};

// ── Palm direction ─────────────────────────────────────────

/// Discretized palm orientation: the axis of largest magnitude in the
/// palm normal, labeled by sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PalmDirection {
    Up,
    Down,
    Left,
    Right,
    /// Palm facing the camera.
    Camera,
    /// Palm facing away from the camera.
    Away,
}

impl PalmDirection {
    /// String representation for status reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Camera => "camera",
            Self::Away => "away",
        }
    }
}

// ── Pinch finger ───────────────────────────────────────────

/// Which fingertip the thumb is pinching against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchFinger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl PinchFinger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

/// Distance/flag pair for one thumb-fingertip pinch.
#[derive(Debug, Clone, Copy)]
pub struct PinchPair {
    /// 3D distance between thumb tip and the target fingertip.
    pub distance: f32,
    /// Whether the distance is under the pinch threshold.
    pub active: bool,
}

// ── Config ─────────────────────────────────────────────────

/// Thresholds for static pose classification.
#[derive(Debug, Clone)]
pub struct PoseConfig {
    /// Tip-to-wrist must exceed this ratio of MCP-to-wrist for a
    /// non-thumb finger to count as extended.
    pub extension_ratio: f32,
    /// Thumb spread factor (thumb-tip to index-MCP vs wrist to
    /// index-MCP).
    pub thumb_extension_factor: f32,
    /// Pinch distance threshold in normalized units.
    pub pinch_threshold: f32,
    /// Scale the pinch threshold by measured palm size, keeping pinch
    /// detection stable across distance from the camera.
    pub adaptive_pinch: bool,
    /// Palm size at which `pinch_threshold` applies unscaled.
    pub reference_palm_size: f32,
    /// Vertical thumb-tip vs wrist margin for thumbs-up/down.
    pub thumb_vertical_margin: f32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            extension_ratio: 1.2,
            thumb_extension_factor: 0.65,
            pinch_threshold: 0.07,
            adaptive_pinch: false,
            reference_palm_size: 0.2,
            thumb_vertical_margin: 0.05,
        }
    }
}

// ── Pose snapshot ──────────────────────────────────────────

/// Derived classification of one hand in one frame.
#[derive(Debug, Clone)]
pub struct PoseSnapshot {
    /// Which hand this snapshot describes.
    pub hand: Hand,
    pub thumb_extended: bool,
    pub index_extended: bool,
    pub middle_extended: bool,
    pub ring_extended: bool,
    pub pinky_extended: bool,
    /// Number of extended fingers (0-5).
    pub extended_count: u8,
    pub index_pinch: PinchPair,
    pub middle_pinch: PinchPair,
    pub ring_pinch: PinchPair,
    pub pinky_pinch: PinchPair,
    /// First active pinch in priority order index > middle > ring >
    /// pinky; simultaneous pinches collapse to the first match.
    pub pinching_finger: Option<PinchFinger>,
    pub is_pointing: bool,
    pub is_victory: bool,
    pub is_thumbs_up: bool,
    pub is_thumbs_down: bool,
    pub is_ok: bool,
    pub is_call_me: bool,
    pub is_rock_on: bool,
    pub is_open_palm: bool,
    pub is_fist: bool,
    /// Midpoint of wrist and middle-finger MCP.
    pub palm_center: [f32; 3],
    /// Side-aware palm normal.
    pub palm_normal: [f32; 3],
    pub palm_direction: PalmDirection,
}

impl PoseSnapshot {
    /// Extension flag for a single finger.
    pub fn extended(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb_extended,
            Finger::Index => self.index_extended,
            Finger::Middle => self.middle_extended,
            Finger::Ring => self.ring_extended,
            Finger::Pinky => self.pinky_extended,
        }
    }

    /// Status s-expression for IPC/UI reporting.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:hand :{} :extended {} :pinching {} :palm :{} :open-palm {} :fist {})",
            self.hand.as_str(),
            self.extended_count,
            self.pinching_finger
                .map(|f| format!(":{}", f.as_str()))
                .unwrap_or_else(|| "nil".to_string()),
            self.palm_direction.as_str(),
            if self.is_open_palm { "t" } else { "nil" },
            if self.is_fist { "t" } else { "nil" },
        )
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Classify one hand frame.  Total: always returns a snapshot.
pub fn classify_pose(frame: &HandFrame, config: &PoseConfig) -> PoseSnapshot {
    let thumb_extended = frame.thumb_extended(config.thumb_extension_factor);
    let index_extended = frame.finger_extended(Finger::Index, config.extension_ratio);
    let middle_extended = frame.finger_extended(Finger::Middle, config.extension_ratio);
    let ring_extended = frame.finger_extended(Finger::Ring, config.extension_ratio);
    let pinky_extended = frame.finger_extended(Finger::Pinky, config.extension_ratio);
    let extended_count = [
        thumb_extended,
        index_extended,
        middle_extended,
        ring_extended,
        pinky_extended,
    ]
    .iter()
    .filter(|e| **e)
    .count() as u8;

    let threshold = if config.adaptive_pinch {
        config.pinch_threshold * frame.palm_size() / config.reference_palm_size
    } else {
        config.pinch_threshold
    };
    let pinch = |tip: HandLandmark| -> PinchPair {
        let distance = frame.distance(HandLandmark::ThumbTip, tip);
        PinchPair {
            distance,
            active: distance < threshold,
        }
    };
    let index_pinch = pinch(HandLandmark::IndexTip);
    let middle_pinch = pinch(HandLandmark::MiddleTip);
    let ring_pinch = pinch(HandLandmark::RingTip);
    let pinky_pinch = pinch(HandLandmark::PinkyTip);

    let pinching_finger = if index_pinch.active {
        Some(PinchFinger::Index)
    } else if middle_pinch.active {
        Some(PinchFinger::Middle)
    } else if ring_pinch.active {
        Some(PinchFinger::Ring)
    } else if pinky_pinch.active {
        Some(PinchFinger::Pinky)
    } else {
        None
    };

    let fingers_curled = !index_extended && !middle_extended && !ring_extended && !pinky_extended;
    let thumb_tip_y = frame.landmark(HandLandmark::ThumbTip)[1];
    let wrist_y = frame.landmark(HandLandmark::Wrist)[1];

    // Named poses: conjunctions over the extension vector.  y grows
    // downward, so "above the wrist" means a smaller y.
    let is_pointing = index_extended && !middle_extended && !ring_extended && !pinky_extended;
    let is_victory = index_extended && middle_extended && !ring_extended && !pinky_extended;
    let is_thumbs_up = thumb_extended
        && fingers_curled
        && thumb_tip_y + config.thumb_vertical_margin < wrist_y;
    let is_thumbs_down = thumb_extended
        && fingers_curled
        && thumb_tip_y > wrist_y + config.thumb_vertical_margin;
    let is_ok = index_pinch.active && middle_extended && ring_extended && pinky_extended;
    let is_call_me = thumb_extended
        && pinky_extended
        && !index_extended
        && !middle_extended
        && !ring_extended;
    let is_rock_on = index_extended && pinky_extended && !middle_extended && !ring_extended;
    let is_open_palm = extended_count >= 4;
    let is_fist = fingers_curled;

    let palm_center = frame.palm_center();
    let palm_normal = frame.palm_normal();
    let palm_direction = direction_from_normal(&palm_normal);

    PoseSnapshot {
        hand: frame.hand,
        thumb_extended,
        index_extended,
        middle_extended,
        ring_extended,
        pinky_extended,
        extended_count,
        index_pinch,
        middle_pinch,
        ring_pinch,
        pinky_pinch,
        pinching_finger,
        is_pointing,
        is_victory,
        is_thumbs_up,
        is_thumbs_down,
        is_ok,
        is_call_me,
        is_rock_on,
        is_open_palm,
        is_fist,
        palm_center,
        palm_normal,
        palm_direction,
    }
}

/// Pick the axis of largest magnitude and label it by sign.
///
/// Exact-magnitude ties are not explicitly broken: whichever comparison
/// evaluates true first wins, falling through toward the z axis.
fn direction_from_normal(n: &[f32; 3]) -> PalmDirection {
    let (ax, ay, az) = (n[0].abs(), n[1].abs(), n[2].abs());
    if ax > ay && ax > az {
        if n[0] > 0.0 {
            PalmDirection::Right
        } else {
            PalmDirection::Left
        }
    } else if ay > az {
        if n[1] > 0.0 {
            PalmDirection::Down
        } else {
            PalmDirection::Up
        }
    } else if n[2] > 0.0 {
        PalmDirection::Camera
    } else {
        PalmDirection::Away
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Synthetic right-hand-shaped frame with all five fingers extended and
/// the palm toward the camera.  Shared by the wave and pipeline tests.
#[cfg(test)]
pub(crate) fn open_hand(hand: Hand) -> HandFrame {
    let mut frame = crate::hand::uniform_frame(hand, 0.5, 0.7, 0.0);
    let lm = |f: &mut HandFrame, l: HandLandmark, x: f32, y: f32| {
        f.landmarks[l.index()] = [x, y, 0.0];
    };
    lm(&mut frame, HandLandmark::Wrist, 0.5, 0.9);
    lm(&mut frame, HandLandmark::IndexMcp, 0.45, 0.7);
    lm(&mut frame, HandLandmark::MiddleMcp, 0.5, 0.7);
    lm(&mut frame, HandLandmark::RingMcp, 0.55, 0.7);
    lm(&mut frame, HandLandmark::PinkyMcp, 0.6, 0.7);
    lm(&mut frame, HandLandmark::IndexTip, 0.45, 0.4);
    lm(&mut frame, HandLandmark::MiddleTip, 0.5, 0.38);
    lm(&mut frame, HandLandmark::RingTip, 0.55, 0.4);
    lm(&mut frame, HandLandmark::PinkyTip, 0.6, 0.45);
    lm(&mut frame, HandLandmark::ThumbTip, 0.3, 0.7);
    frame
}

/// Synthetic fist: all four fingertips curled back near their MCPs,
/// thumb tucked against the index MCP.
#[cfg(test)]
pub(crate) fn fist_hand(hand: Hand) -> HandFrame {
    let mut frame = open_hand(hand);
    let lm = |f: &mut HandFrame, l: HandLandmark, x: f32, y: f32| {
        f.landmarks[l.index()] = [x, y, 0.0];
    };
    lm(&mut frame, HandLandmark::IndexTip, 0.46, 0.75);
    lm(&mut frame, HandLandmark::MiddleTip, 0.5, 0.76);
    lm(&mut frame, HandLandmark::RingTip, 0.54, 0.75);
    lm(&mut frame, HandLandmark::PinkyTip, 0.58, 0.74);
    lm(&mut frame, HandLandmark::ThumbTip, 0.47, 0.72);
    frame
}

// ── Tests ──────────────────────────────────────────────────
