//! Hand landmark data structures and palm geometry.
//!
//! Models the 21 landmarks per hand delivered by the tracking provider
//! (wrist + four joints for each of five fingers, MediaPipe order).
//! Provides distance queries, finger-extension tests, and palm
//! center/normal/size computation.  No provider dependency.

use tracing::debug;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks in provider (MediaPipe) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for status reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// Fingertip landmarks, thumb first.
    pub fn fingertips() -> [HandLandmark; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::PinkyTip,
        ]
    }
}

// ── Finger enum ────────────────────────────────────────────

/// One of the five fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }

    /// Tip landmark for this finger.
    pub fn tip(&self) -> HandLandmark {
        match self {
            Self::Thumb => HandLandmark::ThumbTip,
            Self::Index => HandLandmark::IndexTip,
            Self::Middle => HandLandmark::MiddleTip,
            Self::Ring => HandLandmark::RingTip,
            Self::Pinky => HandLandmark::PinkyTip,
        }
    }

    /// Knuckle (MCP) landmark for this finger.
    pub fn mcp(&self) -> HandLandmark {
        match self {
            Self::Thumb => HandLandmark::ThumbMcp,
            Self::Index => HandLandmark::IndexMcp,
            Self::Middle => HandLandmark::MiddleMcp,
            Self::Ring => HandLandmark::RingMcp,
            Self::Pinky => HandLandmark::PinkyMcp,
        }
    }
}

// ── Hand enum ──────────────────────────────────────────────

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The opposite hand.
    pub fn other(&self) -> Hand {
        match self {
            Self::Left => Hand::Right,
            Self::Right => Hand::Left,
        }
    }
}

// ── Hand frame ─────────────────────────────────────────────

/// One hand in one frame: 21 ordered landmarks plus a side label.
///
/// Positions are `[x, y, z]` with x/y normalized to [0,1] in camera
/// space (y grows downward) and z as relative depth to the wrist.
/// The fixed-size array makes the 21-point precondition structural;
/// use [`HandFrame::from_landmarks`] at the provider boundary.
#[derive(Debug, Clone)]
pub struct HandFrame {
    /// Which hand this frame represents.
    pub hand: Hand,
    /// 21 landmark positions indexed by [`HandLandmark`].
    pub landmarks: [[f32; 3]; LANDMARK_COUNT],
}

impl HandFrame {
    /// Build a frame from a provider landmark slice.
    ///
    /// Returns `None` (and logs) if the slice does not contain exactly
    /// 21 points; callers treat that hand as absent for the frame.
    pub fn from_landmarks(hand: Hand, points: &[[f32; 3]]) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            debug!(
                "Hand frame: expected {} landmarks, got {} for {:?}",
                LANDMARK_COUNT,
                points.len(),
                hand,
            );
            return None;
        }
        let mut landmarks = [[0.0; 3]; LANDMARK_COUNT];
        landmarks.copy_from_slice(points);
        Some(Self { hand, landmarks })
    }

    /// Position of a single landmark.
    pub fn landmark(&self, lm: HandLandmark) -> [f32; 3] {
        self.landmarks[lm.index()]
    }

    /// Euclidean distance between two landmarks.
    pub fn distance(&self, a: HandLandmark, b: HandLandmark) -> f32 {
        point_distance(&self.landmark(a), &self.landmark(b))
    }

    /// Palm center: midpoint of the wrist and the middle-finger MCP.
    pub fn palm_center(&self) -> [f32; 3] {
        let w = self.landmark(HandLandmark::Wrist);
        let m = self.landmark(HandLandmark::MiddleMcp);
        [
            (w[0] + m[0]) * 0.5,
            (w[1] + m[1]) * 0.5,
            (w[2] + m[2]) * 0.5,
        ]
    }

    /// Palm size: wrist to middle-MCP distance.  Used as the
    /// hand-scale reference for adaptive thresholds.
    pub fn palm_size(&self) -> f32 {
        self.distance(HandLandmark::Wrist, HandLandmark::MiddleMcp)
    }

    /// Palm normal: cross product of wrist→middle-MCP and
    /// wrist→pinky-MCP, sign-flipped for the left hand so the normal
    /// points off the palm surface for both sides.
    pub fn palm_normal(&self) -> [f32; 3] {
        let w = self.landmark(HandLandmark::Wrist);
        let m = self.landmark(HandLandmark::MiddleMcp);
        let p = self.landmark(HandLandmark::PinkyMcp);
        let v1 = [m[0] - w[0], m[1] - w[1], m[2] - w[2]];
        let v2 = [p[0] - w[0], p[1] - w[1], p[2] - w[2]];
        let cross = [
            v1[1] * v2[2] - v1[2] * v2[1],
            v1[2] * v2[0] - v1[0] * v2[2],
            v1[0] * v2[1] - v1[1] * v2[0],
        ];
        match self.hand {
            Hand::Right => cross,
            Hand::Left => [-cross[0], -cross[1], -cross[2]],
        }
    }

    /// Whether a non-thumb finger is extended: the tip must be farther
    /// from the wrist than `ratio` times the MCP-to-wrist distance.
    pub fn finger_extended(&self, finger: Finger, ratio: f32) -> bool {
        let tip_dist = self.distance(finger.tip(), HandLandmark::Wrist);
        let mcp_dist = self.distance(finger.mcp(), HandLandmark::Wrist);
        tip_dist > ratio * mcp_dist
    }

    /// Whether the thumb is extended.  The thumb's extension axis
    /// differs from the other fingers, so it compares thumb-tip to
    /// index-MCP spread against `factor` times the wrist to index-MCP
    /// distance instead.
    pub fn thumb_extended(&self, factor: f32) -> bool {
        let spread = self.distance(HandLandmark::ThumbTip, HandLandmark::IndexMcp);
        let hand_len = self.distance(HandLandmark::Wrist, HandLandmark::IndexMcp);
        spread > factor * hand_len
    }
}

/// Euclidean distance between two 3D points.
pub fn point_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

// ── Test helpers ───────────────────────────────────────────

/// Build a frame with every landmark at the same point.
#[cfg(test)]
pub(crate) fn uniform_frame(hand: Hand, x: f32, y: f32, z: f32) -> HandFrame {
    HandFrame {
        hand,
        landmarks: [[x, y, z]; LANDMARK_COUNT],
    }
}

// ── Tests ──────────────────────────────────────────────────
