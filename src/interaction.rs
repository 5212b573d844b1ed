//! Pinch-driven object interaction — selection, drag, rotation, and
//! two-hand scaling.
//!
//! Each hand gets one authoritative pinch-edge update per frame; the
//! click, drag, and rotation logic all consume the resulting immutable
//! `PinchEdge` read-only.  Selection is a single shared slot.  Objects
//! are mutated through the externally owned `ObjectRegistry`.

use tracing::{debug, info};

use crate::hand::{Hand, HandFrame, HandLandmark};
use crate::pose::PoseSnapshot;
use crate::scene::{ObjectId, ObjectRegistry, Vec3};

// ── Pinch edge ─────────────────────────────────────────────

/// Pinch transition for one hand in one frame.  Derived strictly from
/// comparing this frame's pinch flag to the stored previous flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchEdge {
    /// Pinch began this frame.
    pub started: bool,
    /// Pinch ended this frame.
    pub ended: bool,
    /// Current pinch state.
    pub pinching: bool,
}

// ── Events ─────────────────────────────────────────────────

/// Events emitted by the interaction state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// An object became the selection.
    Selected { id: ObjectId },
    /// The selection was cleared.
    Deselected,
    /// A drag began on the selected object.
    DragStarted { hand: Hand, id: ObjectId },
    /// The drag ended.
    DragEnded { hand: Hand },
    /// A free rotation began on the selected object.
    RotationStarted { hand: Hand, id: ObjectId },
    /// The rotation ended.
    RotationEnded { hand: Hand },
    /// Two-hand scaling engaged.
    ScaleStarted { id: ObjectId },
    /// Two-hand scaling released.
    ScaleEnded,
}

impl InteractionEvent {
    /// Serialize the event as an IPC s-expression.
    pub fn to_sexp(&self) -> String {
        match self {
            Self::Selected { id } => {
                format!("(:type :event :event :object-selected :id {})", id)
            }
            Self::Deselected => "(:type :event :event :selection-cleared)".to_string(),
            Self::DragStarted { hand, id } => format!(
                "(:type :event :event :drag-started :hand :{} :id {})",
                hand.as_str(),
                id,
            ),
            Self::DragEnded { hand } => format!(
                "(:type :event :event :drag-ended :hand :{})",
                hand.as_str(),
            ),
            Self::RotationStarted { hand, id } => format!(
                "(:type :event :event :rotation-started :hand :{} :id {})",
                hand.as_str(),
                id,
            ),
            Self::RotationEnded { hand } => format!(
                "(:type :event :event :rotation-ended :hand :{})",
                hand.as_str(),
            ),
            Self::ScaleStarted { id } => {
                format!("(:type :event :event :scale-started :id {})", id)
            }
            Self::ScaleEnded => "(:type :event :event :scale-ended)".to_string(),
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Configuration for the interaction state machine.
#[derive(Debug, Clone)]
pub struct InteractionConfig {
    /// Pinch-and-release under this long counts as a click.
    pub click_timeout_ms: f64,
    /// Radians of rotation per normalized unit of palm travel.
    pub rotation_ratio: f32,
    /// Palm travel below this applies no rotation update.
    pub rotation_deadzone: f32,
    /// Scale clamp range.
    pub scale_min: f32,
    pub scale_max: f32,
    /// Which hand drags the selection.  Policy, not structure: the
    /// machine itself is side-agnostic.
    pub drag_hand: Hand,
    /// Which hand rotates the selection.
    pub rotate_hand: Hand,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_timeout_ms: 1000.0,
            rotation_ratio: 6.0,
            rotation_deadzone: 0.01,
            scale_min: 0.3,
            scale_max: 3.0,
            drag_hand: Hand::Right,
            rotate_hand: Hand::Left,
        }
    }
}

// ── Per-hand state ─────────────────────────────────────────

/// Rotation baseline captured at pinch start.
#[derive(Debug, Clone, Copy)]
pub struct RotationBase {
    /// Palm center at pinch start.
    pub palm: Vec3,
    /// Object rotation at pinch start.
    pub rotation: Vec3,
}

/// Interaction bookkeeping for a single hand.
#[derive(Debug, Clone, Default)]
struct HandInteraction {
    /// Previous frame's pinch flag, the only edge-detection source.
    was_pinching: bool,
    /// Timestamp of the last pinch start.
    pinch_start_ms: f64,
    /// Object under the interaction point at pinch start.
    pinch_start_object: Option<ObjectId>,
    /// Interaction-point-to-object offset, present only mid-drag.
    drag_offset: Option<Vec3>,
    /// Present only mid-rotation.
    rotation_base: Option<RotationBase>,
}

/// Two-hand scale baseline captured on entry.
#[derive(Debug, Clone, Copy)]
struct ScaleBaseline {
    scale: f32,
    palm_distance: f32,
}

// ── State ──────────────────────────────────────────────────

/// Central interaction state: per-hand pinch bookkeeping plus the
/// shared selection slot and scale baseline.
pub struct InteractionState {
    /// Configuration.
    pub config: InteractionConfig,
    left: HandInteraction,
    right: HandInteraction,
    selected: Option<ObjectId>,
    scale_base: Option<ScaleBaseline>,
}

/// Interaction point for a hand: midpoint of the thumb and index tips.
pub fn interaction_point(frame: &HandFrame) -> Vec3 {
    let t = frame.landmark(HandLandmark::ThumbTip);
    let i = frame.landmark(HandLandmark::IndexTip);
    Vec3::new(
        (t[0] + i[0]) * 0.5,
        (t[1] + i[1]) * 0.5,
        (t[2] + i[2]) * 0.5,
    )
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            config: InteractionConfig::default(),
            left: HandInteraction::default(),
            right: HandInteraction::default(),
            selected: None,
            scale_base: None,
        }
    }

    fn hand_state(&self, hand: Hand) -> &HandInteraction {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    fn hand_state_mut(&mut self, hand: Hand) -> &mut HandInteraction {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// The currently selected object, if any.
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Whether a hand has a drag in flight.
    pub fn is_dragging(&self, hand: Hand) -> bool {
        self.hand_state(hand).drag_offset.is_some()
    }

    /// Whether a hand has a rotation in flight.
    pub fn is_rotating(&self, hand: Hand) -> bool {
        self.hand_state(hand).rotation_base.is_some()
    }

    /// Whether two-hand scaling is engaged.
    pub fn is_scaling(&self) -> bool {
        self.scale_base.is_some()
    }

    /// The single authoritative pinch-edge update for one hand.  Runs
    /// exactly once per hand per frame; all downstream logic consumes
    /// the returned value read-only.
    fn update_pinch_edge(&mut self, hand: Hand, pinching: bool) -> PinchEdge {
        let hs = self.hand_state_mut(hand);
        let started = !hs.was_pinching && pinching;
        let ended = hs.was_pinching && !pinching;
        hs.was_pinching = pinching;
        PinchEdge {
            started,
            ended,
            pinching,
        }
    }

    /// Per-frame single-hand processing: click-vs-drag disambiguation,
    /// drag, and rotation for one present hand.
    pub fn update_hand<R: ObjectRegistry>(
        &mut self,
        frame: &HandFrame,
        snapshot: &PoseSnapshot,
        now_ms: f64,
        registry: &mut R,
    ) -> Vec<InteractionEvent> {
        let hand = frame.hand;
        let pinching = snapshot.index_pinch.active;
        let point = interaction_point(frame);
        let palm = Vec3::from(snapshot.palm_center);

        let edge = self.update_pinch_edge(hand, pinching);
        let mut events = Vec::new();

        // ── Click bookkeeping (both hands) ──
        if edge.started {
            let under = registry.object_at(point);
            let hs = self.hand_state_mut(hand);
            hs.pinch_start_ms = now_ms;
            hs.pinch_start_object = under;
            debug!("Pinch start on {:?}: object {:?}", hand, under);
        }
        if edge.ended {
            let elapsed = now_ms - self.hand_state(hand).pinch_start_ms;
            let started_on = self.hand_state(hand).pinch_start_object;
            let under_now = registry.object_at(point);
            if elapsed <= self.config.click_timeout_ms && under_now == started_on {
                match under_now {
                    Some(id) if self.selected != Some(id) => {
                        self.release_manipulation(&mut events);
                        self.selected = Some(id);
                        info!("Object {} selected by {:?} click", id, hand);
                        events.push(InteractionEvent::Selected { id });
                    }
                    Some(_) => {
                        // Re-click on the selection keeps it selected.
                    }
                    None => {
                        if self.selected.take().is_some() {
                            info!("Selection cleared by {:?} click", hand);
                            events.push(InteractionEvent::Deselected);
                        }
                    }
                }
            }
            // Object changed mid-gesture or timeout exceeded: an
            // abandoned click, silently ignored.
        }

        // ── Drag (policy hand, suspended while scaling) ──
        if hand == self.config.drag_hand {
            if edge.pinching && self.scale_base.is_none() {
                if let Some(id) = self.selected {
                    if let Some(pose) = registry.pose(id) {
                        let hs = self.hand_state_mut(hand);
                        match hs.drag_offset {
                            None => {
                                hs.drag_offset = Some(point.sub(pose.position));
                                debug!("Drag started on {} by {:?}", id, hand);
                                events.push(InteractionEvent::DragStarted { hand, id });
                            }
                            Some(offset) => {
                                registry.set_position(id, point.sub(offset));
                            }
                        }
                    }
                }
            }
            if edge.ended && self.hand_state_mut(hand).drag_offset.take().is_some() {
                debug!("Drag ended by {:?}", hand);
                events.push(InteractionEvent::DragEnded { hand });
            }
        }

        // ── Rotation (policy hand) ──
        if hand == self.config.rotate_hand {
            if edge.started {
                if let Some(id) = self.selected {
                    if let Some(pose) = registry.pose(id) {
                        self.hand_state_mut(hand).rotation_base = Some(RotationBase {
                            palm,
                            rotation: pose.rotation,
                        });
                        debug!("Rotation started on {} by {:?}", id, hand);
                        events.push(InteractionEvent::RotationStarted { hand, id });
                    }
                }
            }
            if edge.pinching {
                if let (Some(id), Some(base)) =
                    (self.selected, self.hand_state(hand).rotation_base)
                {
                    let delta = palm.sub(base.palm);
                    let travel = (delta.x * delta.x + delta.y * delta.y).sqrt();
                    if travel >= self.config.rotation_deadzone {
                        // Horizontal travel yaws, vertical travel
                        // pitches (sign-inverted); no wraparound.
                        let yaw = base.rotation.y + delta.x * self.config.rotation_ratio;
                        let pitch = base.rotation.x - delta.y * self.config.rotation_ratio;
                        registry.set_rotation(id, Vec3::new(pitch, yaw, base.rotation.z));
                    }
                }
            }
            if edge.ended && self.hand_state_mut(hand).rotation_base.take().is_some() {
                debug!("Rotation ended by {:?}", hand);
                events.push(InteractionEvent::RotationEnded { hand });
            }
        }

        events
    }

    /// Two-hand scale.  Runs after both hands' per-frame updates.
    pub fn update_two_hand_scale<R: ObjectRegistry>(
        &mut self,
        left: Option<&PoseSnapshot>,
        right: Option<&PoseSnapshot>,
        registry: &mut R,
    ) -> Vec<InteractionEvent> {
        let mut events = Vec::new();

        let (id, ls, rs) = match (self.selected, left, right) {
            (Some(id), Some(l), Some(r)) if l.index_pinch.active && r.index_pinch.active => {
                (id, l, r)
            }
            _ => {
                if self.scale_base.take().is_some() {
                    debug!("Two-hand scale released");
                    events.push(InteractionEvent::ScaleEnded);
                }
                return events;
            }
        };

        let lp = Vec3::from(ls.palm_center);
        let rp = Vec3::from(rs.palm_center);
        let palm_distance = lp.distance(rp);

        match self.scale_base {
            None => {
                if let Some(pose) = registry.pose(id) {
                    if palm_distance > f32::EPSILON {
                        self.scale_base = Some(ScaleBaseline {
                            scale: pose.scale,
                            palm_distance,
                        });
                        debug!("Two-hand scale engaged on {}", id);
                        events.push(InteractionEvent::ScaleStarted { id });
                    }
                }
            }
            Some(base) => {
                let ratio = palm_distance / base.palm_distance;
                let scale = (base.scale * ratio)
                    .clamp(self.config.scale_min, self.config.scale_max);
                registry.set_scale(id, scale);
            }
        }

        events
    }

    /// A hand disappeared this frame: clear its pinch bookkeeping and
    /// release any manipulation it was driving.
    pub fn hand_lost(&mut self, hand: Hand) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        let hs = self.hand_state_mut(hand);
        hs.was_pinching = false;
        hs.pinch_start_object = None;
        if hs.drag_offset.take().is_some() {
            debug!("Drag released: {:?} hand lost", hand);
            events.push(InteractionEvent::DragEnded { hand });
        }
        if hs.rotation_base.take().is_some() {
            debug!("Rotation released: {:?} hand lost", hand);
            events.push(InteractionEvent::RotationEnded { hand });
        }
        if self.scale_base.take().is_some() {
            debug!("Two-hand scale released: {:?} hand lost", hand);
            events.push(InteractionEvent::ScaleEnded);
        }
        events
    }

    /// Release every in-flight manipulation (selection is changing).
    fn release_manipulation(&mut self, events: &mut Vec<InteractionEvent>) {
        for hand in [Hand::Left, Hand::Right] {
            let hs = self.hand_state_mut(hand);
            if hs.drag_offset.take().is_some() {
                events.push(InteractionEvent::DragEnded { hand });
            }
            if hs.rotation_base.take().is_some() {
                events.push(InteractionEvent::RotationEnded { hand });
            }
        }
        if self.scale_base.take().is_some() {
            events.push(InteractionEvent::ScaleEnded);
        }
    }

    /// Status s-expression for IPC reporting.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:selected {} :left (:pinching {} :dragging {} :rotating {}) :right (:pinching {} :dragging {} :rotating {}) :scaling {})",
            self.selected
                .map(|id| id.to_string())
                .unwrap_or_else(|| "nil".to_string()),
            if self.left.was_pinching { "t" } else { "nil" },
            if self.left.drag_offset.is_some() { "t" } else { "nil" },
            if self.left.rotation_base.is_some() { "t" } else { "nil" },
            if self.right.was_pinching { "t" } else { "nil" },
            if self.right.drag_offset.is_some() { "t" } else { "nil" },
            if self.right.rotation_base.is_some() { "t" } else { "nil" },
            if self.scale_base.is_some() { "t" } else { "nil" },
        )
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Frame with the pinch pair centered on (x, y): a narrow gap pinches,
/// a wide gap does not.  The palm trails below the point.
#[cfg(test)]
pub(crate) fn hand_at(hand: Hand, x: f32, y: f32, pinching: bool) -> HandFrame {
    use crate::pose::open_hand;

    let mut frame = open_hand(hand);
    let gap = if pinching { 0.01 } else { 0.05 };
    frame.landmarks[HandLandmark::ThumbTip.index()] = [x - gap, y, 0.0];
    frame.landmarks[HandLandmark::IndexTip.index()] = [x + gap, y, 0.0];
    frame.landmarks[HandLandmark::Wrist.index()] = [x, y + 0.2, 0.0];
    frame.landmarks[HandLandmark::MiddleMcp.index()] = [x, y + 0.05, 0.0];
    frame
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{classify_pose, PoseConfig};
    use crate::scene::SceneObjects;

    /// Run one per-hand interaction frame.
    fn step<R: ObjectRegistry>(
        state: &mut InteractionState,
        hand: Hand,
        x: f32,
        y: f32,
        pinching: bool,
        now_ms: f64,
        registry: &mut R,
    ) -> Vec<InteractionEvent> {
        let frame = hand_at(hand, x, y, pinching);
        let snapshot = classify_pose(&frame, &PoseConfig::default());
        assert_eq!(snapshot.index_pinch.active, pinching);
        state.update_hand(&frame, &snapshot, now_ms, registry)
    }

    /// Scene with one object at (0.5, 0.5, 0.0), radius 0.2.
    fn one_object_scene() -> (SceneObjects, ObjectId) {
        let mut scene = SceneObjects::new();
        let id = scene.add(Vec3::new(0.5, 0.5, 0.0), 0.2);
        (scene, id)
    }

    /// Click-select the object with the right hand.
    fn select(
        state: &mut InteractionState,
        scene: &mut SceneObjects,
        x: f32,
        y: f32,
        t0: f64,
    ) -> Vec<InteractionEvent> {
        let mut events = step(state, Hand::Right, x, y, true, t0, scene);
        events.extend(step(state, Hand::Right, x, y, false, t0 + 200.0, scene));
        events
    }

    #[test]
    fn test_quick_click_selects() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();

        let events = select(&mut state, &mut scene, 0.5, 0.5, 0.0);
        assert_eq!(state.selected(), Some(id));
        assert!(events.contains(&InteractionEvent::Selected { id }));
    }

    #[test]
    fn test_slow_pinch_is_not_a_click() {
        let (mut scene, _id) = one_object_scene();
        let mut state = InteractionState::new();

        step(&mut state, Hand::Left, 0.5, 0.5, true, 0.0, &mut scene);
        let events = step(&mut state, Hand::Left, 0.5, 0.5, false, 1500.0, &mut scene);
        assert_eq!(state.selected(), None);
        assert!(events.is_empty());
    }

    #[test]
    fn test_click_start_and_end_on_different_objects_ignored() {
        let mut scene = SceneObjects::new();
        let a = scene.add(Vec3::new(0.2, 0.5, 0.0), 0.1);
        let b = scene.add(Vec3::new(0.8, 0.5, 0.0), 0.1);
        let mut state = InteractionState::new();

        step(&mut state, Hand::Right, 0.2, 0.5, true, 0.0, &mut scene);
        let events = step(&mut state, Hand::Right, 0.8, 0.5, false, 300.0, &mut scene);
        assert_eq!(state.selected(), None);
        assert!(events.is_empty());
        let _ = (a, b);
    }

    #[test]
    fn test_empty_space_click_deselects() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();

        select(&mut state, &mut scene, 0.5, 0.5, 0.0);
        assert_eq!(state.selected(), Some(id));

        // Quick pinch far from anything.
        step(&mut state, Hand::Right, 0.05, 0.05, true, 1000.0, &mut scene);
        let events = step(&mut state, Hand::Right, 0.05, 0.05, false, 1200.0, &mut scene);
        assert_eq!(state.selected(), None);
        assert!(events.contains(&InteractionEvent::Deselected));
    }

    #[test]
    fn test_reclick_keeps_selection_silently() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();

        select(&mut state, &mut scene, 0.5, 0.5, 0.0);
        let events = select(&mut state, &mut scene, 0.5, 0.5, 1000.0);
        assert_eq!(state.selected(), Some(id));
        assert!(!events.contains(&InteractionEvent::Selected { id }));
        assert!(!events.contains(&InteractionEvent::Deselected));
    }

    #[test]
    fn test_left_hand_can_also_click() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();

        step(&mut state, Hand::Left, 0.5, 0.5, true, 0.0, &mut scene);
        step(&mut state, Hand::Left, 0.5, 0.5, false, 200.0, &mut scene);
        assert_eq!(state.selected(), Some(id));
    }

    #[test]
    fn test_drag_follows_point_with_offset() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        // Pinch at an offset from the object center, then move.
        let events = step(&mut state, Hand::Right, 0.55, 0.5, true, 1000.0, &mut scene);
        assert!(events.contains(&InteractionEvent::DragStarted {
            hand: Hand::Right,
            id,
        }));
        assert!(state.is_dragging(Hand::Right));

        step(&mut state, Hand::Right, 0.65, 0.6, true, 1050.0, &mut scene);
        let pose = scene.pose(id).unwrap();
        assert!((pose.position.x - 0.6).abs() < 1e-5);
        assert!((pose.position.y - 0.6).abs() < 1e-5);

        let events = step(&mut state, Hand::Right, 0.65, 0.6, false, 1100.0, &mut scene);
        assert!(events.contains(&InteractionEvent::DragEnded { hand: Hand::Right }));
        assert!(!state.is_dragging(Hand::Right));
    }

    #[test]
    fn test_drag_idempotent_when_point_static() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        step(&mut state, Hand::Right, 0.55, 0.5, true, 1000.0, &mut scene);
        let before = scene.pose(id).unwrap().position;
        step(&mut state, Hand::Right, 0.55, 0.5, true, 1050.0, &mut scene);
        step(&mut state, Hand::Right, 0.55, 0.5, true, 1100.0, &mut scene);
        let after = scene.pose(id).unwrap().position;
        assert_eq!(before, after);
    }

    #[test]
    fn test_drag_does_not_require_point_over_object() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        // Pinch well away from the object: selection, not hit-testing,
        // is authoritative.
        step(&mut state, Hand::Right, 0.9, 0.9, true, 1000.0, &mut scene);
        assert!(state.is_dragging(Hand::Right));
        step(&mut state, Hand::Right, 0.8, 0.9, true, 1050.0, &mut scene);
        let pose = scene.pose(id).unwrap();
        assert!((pose.position.x - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_no_drag_without_selection() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();

        step(&mut state, Hand::Right, 0.5, 0.5, true, 0.0, &mut scene);
        step(&mut state, Hand::Right, 0.7, 0.7, true, 50.0, &mut scene);
        assert!(!state.is_dragging(Hand::Right));
        let pose = scene.pose(id).unwrap();
        assert_eq!(pose.position, Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_rotation_maps_palm_travel_to_yaw_and_pitch() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        let events = step(&mut state, Hand::Left, 0.3, 0.5, true, 1000.0, &mut scene);
        assert!(events.contains(&InteractionEvent::RotationStarted {
            hand: Hand::Left,
            id,
        }));

        // Palm moves +0.1 in x and -0.1 in y (up on screen).
        step(&mut state, Hand::Left, 0.4, 0.4, true, 1050.0, &mut scene);
        let rot = scene.pose(id).unwrap().rotation;
        let ratio = state.config.rotation_ratio;
        assert!((rot.y - 0.1 * ratio).abs() < 1e-4, "yaw {}", rot.y);
        assert!((rot.x - 0.1 * ratio).abs() < 1e-4, "pitch {}", rot.x);

        let events = step(&mut state, Hand::Left, 0.4, 0.4, false, 1100.0, &mut scene);
        assert!(events.contains(&InteractionEvent::RotationEnded { hand: Hand::Left }));
        assert!(!state.is_rotating(Hand::Left));
    }

    #[test]
    fn test_rotation_deadzone_suppresses_jitter() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        step(&mut state, Hand::Left, 0.3, 0.5, true, 1000.0, &mut scene);
        // Sub-deadzone wobble: no rotation applied.
        step(&mut state, Hand::Left, 0.302, 0.5, true, 1050.0, &mut scene);
        let rot = scene.pose(id).unwrap().rotation;
        assert_eq!(rot, Vec3::ZERO);
    }

    #[test]
    fn test_rotation_allows_multiple_turns() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        state.config.rotation_ratio = 20.0;
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        step(&mut state, Hand::Left, 0.1, 0.5, true, 1000.0, &mut scene);
        step(&mut state, Hand::Left, 0.9, 0.5, true, 1050.0, &mut scene);
        let rot = scene.pose(id).unwrap().rotation;
        // 0.8 units x 20 rad/unit = 16 rad, over two full turns.
        assert!(rot.y > 2.0 * std::f32::consts::TAU);
    }

    #[test]
    fn test_two_hand_scale_tracks_palm_distance() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        let lf = hand_at(Hand::Left, 0.3, 0.5, true);
        let rf = hand_at(Hand::Right, 0.7, 0.5, true);
        let ls = classify_pose(&lf, &PoseConfig::default());
        let rs = classify_pose(&rf, &PoseConfig::default());
        state.update_hand(&lf, &ls, 1000.0, &mut scene);
        state.update_hand(&rf, &rs, 1000.0, &mut scene);

        let events = state.update_two_hand_scale(Some(&ls), Some(&rs), &mut scene);
        assert!(events.contains(&InteractionEvent::ScaleStarted { id }));
        assert!(state.is_scaling());

        // Halve the inter-palm distance: scale halves.
        let lf = hand_at(Hand::Left, 0.4, 0.5, true);
        let rf = hand_at(Hand::Right, 0.6, 0.5, true);
        let ls = classify_pose(&lf, &PoseConfig::default());
        let rs = classify_pose(&rf, &PoseConfig::default());
        state.update_hand(&lf, &ls, 1050.0, &mut scene);
        state.update_hand(&rf, &rs, 1050.0, &mut scene);
        state.update_two_hand_scale(Some(&ls), Some(&rs), &mut scene);
        let scale = scene.pose(id).unwrap().scale;
        assert!((scale - 0.5).abs() < 1e-4, "scale {}", scale);
    }

    #[test]
    fn test_two_hand_scale_clamps() {
        let (mut scene, id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        let lf = hand_at(Hand::Left, 0.45, 0.5, true);
        let rf = hand_at(Hand::Right, 0.55, 0.5, true);
        let ls = classify_pose(&lf, &PoseConfig::default());
        let rs = classify_pose(&rf, &PoseConfig::default());
        state.update_hand(&lf, &ls, 1000.0, &mut scene);
        state.update_hand(&rf, &rs, 1000.0, &mut scene);
        state.update_two_hand_scale(Some(&ls), Some(&rs), &mut scene);

        // Stretch far beyond the clamp ceiling.
        let lf = hand_at(Hand::Left, 0.0, 0.5, true);
        let rf = hand_at(Hand::Right, 1.0, 0.5, true);
        let ls = classify_pose(&lf, &PoseConfig::default());
        let rs = classify_pose(&rf, &PoseConfig::default());
        state.update_hand(&lf, &ls, 1050.0, &mut scene);
        state.update_hand(&rf, &rs, 1050.0, &mut scene);
        state.update_two_hand_scale(Some(&ls), Some(&rs), &mut scene);
        let scale = scene.pose(id).unwrap().scale;
        assert!((scale - state.config.scale_max).abs() < 1e-5);
    }

    #[test]
    fn test_scale_exits_when_either_pinch_ends() {
        let (mut scene, _id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        let lf = hand_at(Hand::Left, 0.3, 0.5, true);
        let rf = hand_at(Hand::Right, 0.7, 0.5, true);
        let ls = classify_pose(&lf, &PoseConfig::default());
        let rs = classify_pose(&rf, &PoseConfig::default());
        state.update_hand(&lf, &ls, 1000.0, &mut scene);
        state.update_hand(&rf, &rs, 1000.0, &mut scene);
        state.update_two_hand_scale(Some(&ls), Some(&rs), &mut scene);
        assert!(state.is_scaling());

        // Left hand releases.
        let lf = hand_at(Hand::Left, 0.3, 0.5, false);
        let ls = classify_pose(&lf, &PoseConfig::default());
        state.update_hand(&lf, &ls, 1050.0, &mut scene);
        let events = state.update_two_hand_scale(Some(&ls), Some(&rs), &mut scene);
        assert!(events.contains(&InteractionEvent::ScaleEnded));
        assert!(!state.is_scaling());
    }

    #[test]
    fn test_scale_requires_selection() {
        let (mut scene, _id) = one_object_scene();
        let mut state = InteractionState::new();

        let lf = hand_at(Hand::Left, 0.3, 0.1, true);
        let rf = hand_at(Hand::Right, 0.7, 0.1, true);
        let ls = classify_pose(&lf, &PoseConfig::default());
        let rs = classify_pose(&rf, &PoseConfig::default());
        let events = state.update_two_hand_scale(Some(&ls), Some(&rs), &mut scene);
        assert!(events.is_empty());
        assert!(!state.is_scaling());
    }

    #[test]
    fn test_hand_lost_releases_everything() {
        let (mut scene, _id) = one_object_scene();
        let mut state = InteractionState::new();
        select(&mut state, &mut scene, 0.5, 0.5, 0.0);

        step(&mut state, Hand::Right, 0.55, 0.5, true, 1000.0, &mut scene);
        assert!(state.is_dragging(Hand::Right));

        let events = state.hand_lost(Hand::Right);
        assert!(events.contains(&InteractionEvent::DragEnded { hand: Hand::Right }));
        assert!(!state.is_dragging(Hand::Right));

        // A fresh pinch after reacquisition is a clean start edge.
        let events = step(&mut state, Hand::Right, 0.5, 0.5, true, 2000.0, &mut scene);
        let _ = events;
        assert!(state.is_dragging(Hand::Right));
    }

    #[test]
    fn test_selection_switch_releases_drag() {
        let mut scene = SceneObjects::new();
        let a = scene.add(Vec3::new(0.3, 0.5, 0.0), 0.1);
        let b = scene.add(Vec3::new(0.8, 0.5, 0.0), 0.1);
        let mut state = InteractionState::new();

        // Select and start dragging A with the right hand.
        step(&mut state, Hand::Right, 0.3, 0.5, true, 0.0, &mut scene);
        step(&mut state, Hand::Right, 0.3, 0.5, false, 200.0, &mut scene);
        assert_eq!(state.selected(), Some(a));
        step(&mut state, Hand::Right, 0.3, 0.5, true, 400.0, &mut scene);
        assert!(state.is_dragging(Hand::Right));

        // Left hand clicks B: selection switches, the drag releases.
        step(&mut state, Hand::Left, 0.8, 0.5, true, 500.0, &mut scene);
        let events = step(&mut state, Hand::Left, 0.8, 0.5, false, 700.0, &mut scene);
        assert_eq!(state.selected(), Some(b));
        assert!(events.contains(&InteractionEvent::DragEnded { hand: Hand::Right }));
        assert!(!state.is_dragging(Hand::Right));
    }

    #[test]
    fn test_event_sexp() {
        assert!(InteractionEvent::Selected { id: 7 }
            .to_sexp()
            .contains(":object-selected :id 7"));
        assert!(InteractionEvent::DragStarted {
            hand: Hand::Right,
            id: 7,
        }
        .to_sexp()
        .contains(":hand :right"));
        assert_eq!(
            InteractionEvent::Deselected.to_sexp(),
            "(:type :event :event :selection-cleared)",
        );
    }

    #[test]
    fn test_status_sexp() {
        let state = InteractionState::new();
        let sexp = state.status_sexp();
        assert!(sexp.contains(":selected nil"));
        assert!(sexp.contains(":scaling nil"));
    }
}
