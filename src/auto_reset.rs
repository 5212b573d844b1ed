//! Auto-reset scheduling — after a hand-absence timeout, tween every
//! tracked object back to its recorded initial pose.
//!
//! State machine: `idle → pending → resetting → idle`.  Hand presence
//! at any point cancels the pending timer and any in-flight tweens;
//! cancellation removes tweens outright, leaving objects wherever they
//! had reached.  There is no pause concept.

use tracing::{debug, info};

use crate::scene::{ObjectId, ObjectRegistry, Vec3};

// ── Phase ──────────────────────────────────────────────────

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetPhase {
    /// Hands present, or nothing to do.
    Idle,
    /// No hands; the absence timer is running.
    Pending {
        /// Wall-clock deadline for starting the reset.
        deadline_ms: f64,
    },
    /// Tweens are converging objects to their initial poses.
    Resetting,
}

impl ResetPhase {
    /// String representation for status reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Resetting => "resetting",
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Timing configuration for the auto-reset scheduler.
#[derive(Debug, Clone)]
pub struct AutoResetConfig {
    /// Hands must be absent this long before the reset starts.
    pub absence_timeout_ms: f64,
    /// Position tween duration.
    pub position_duration_ms: f64,
    /// Scale tween duration.
    pub scale_duration_ms: f64,
    /// Rotation tween duration.  Longer than position/scale for a more
    /// gradual visual settle.
    pub rotation_duration_ms: f64,
}

impl Default for AutoResetConfig {
    fn default() -> Self {
        Self {
            absence_timeout_ms: 3000.0,
            position_duration_ms: 1000.0,
            scale_duration_ms: 1000.0,
            rotation_duration_ms: 1600.0,
        }
    }
}

// ── Tweens ─────────────────────────────────────────────────

/// What a single tween interpolates.
#[derive(Debug, Clone, Copy)]
enum TweenValue {
    Position { from: Vec3, to: Vec3 },
    Rotation { from: Vec3, to: Vec3 },
    Scale { from: f32, to: f32 },
}

/// One in-flight interpolation on one object.
#[derive(Debug, Clone)]
struct Tween {
    object: ObjectId,
    value: TweenValue,
    start_ms: f64,
    duration_ms: f64,
}

impl Tween {
    /// Apply the eased value for `now_ms`.  Returns true once the tween
    /// has reached its end.
    fn apply<R: ObjectRegistry>(&self, now_ms: f64, registry: &mut R) -> bool {
        let t = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        };
        let eased = ease_in_out_cubic(t as f32);
        match self.value {
            TweenValue::Position { from, to } => {
                registry.set_position(self.object, from.lerp(to, eased));
            }
            TweenValue::Rotation { from, to } => {
                registry.set_rotation(self.object, from.lerp(to, eased));
            }
            TweenValue::Scale { from, to } => {
                registry.set_scale(self.object, from + (to - from) * eased);
            }
        }
        t >= 1.0
    }
}

/// Cubic ease-in-out over [0, 1].
fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// ── Scheduler ──────────────────────────────────────────────

/// Watches hand presence and drives the reset tween set.
pub struct AutoResetScheduler {
    /// Configuration.
    pub config: AutoResetConfig,
    phase: ResetPhase,
    tweens: Vec<Tween>,
}

impl AutoResetScheduler {
    pub fn new() -> Self {
        Self {
            config: AutoResetConfig::default(),
            phase: ResetPhase::Idle,
            tweens: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ResetPhase {
        self.phase
    }

    /// In-flight tween count.
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Per-frame update.  Runs after interaction processing so
    /// presence is fresh.
    pub fn update<R: ObjectRegistry>(
        &mut self,
        any_hand_present: bool,
        now_ms: f64,
        registry: &mut R,
    ) {
        if any_hand_present {
            if self.phase != ResetPhase::Idle {
                debug!("Auto-reset cancelled: hand present");
                self.tweens.clear();
                self.phase = ResetPhase::Idle;
            }
            return;
        }

        match self.phase {
            ResetPhase::Idle => {
                let deadline_ms = now_ms + self.config.absence_timeout_ms;
                debug!("Auto-reset timer armed, deadline {:.0}ms", deadline_ms);
                self.phase = ResetPhase::Pending { deadline_ms };
            }
            ResetPhase::Pending { deadline_ms } => {
                if now_ms >= deadline_ms {
                    self.start_tweens(now_ms, registry);
                    info!(
                        "Auto-reset started: {} tweens over {} objects",
                        self.tweens.len(),
                        registry.object_ids().len(),
                    );
                    self.phase = ResetPhase::Resetting;
                }
            }
            ResetPhase::Resetting => {
                self.tweens.retain(|tw| !tw.apply(now_ms, registry));
                if self.tweens.is_empty() {
                    debug!("Auto-reset complete");
                    self.phase = ResetPhase::Idle;
                }
            }
        }
    }

    /// Start independent position/rotation/scale tweens for every
    /// tracked object, from its live current pose to its initial pose.
    fn start_tweens<R: ObjectRegistry>(&mut self, now_ms: f64, registry: &mut R) {
        self.tweens.clear();
        for id in registry.object_ids() {
            let (current, initial) = match (registry.pose(id), registry.initial_pose(id)) {
                (Some(c), Some(i)) => (c, i),
                _ => continue,
            };
            self.tweens.push(Tween {
                object: id,
                value: TweenValue::Position {
                    from: current.position,
                    to: initial.position,
                },
                start_ms: now_ms,
                duration_ms: self.config.position_duration_ms,
            });
            self.tweens.push(Tween {
                object: id,
                value: TweenValue::Rotation {
                    from: current.rotation,
                    to: initial.rotation,
                },
                start_ms: now_ms,
                duration_ms: self.config.rotation_duration_ms,
            });
            self.tweens.push(Tween {
                object: id,
                value: TweenValue::Scale {
                    from: current.scale,
                    to: initial.scale,
                },
                start_ms: now_ms,
                duration_ms: self.config.scale_duration_ms,
            });
        }
    }

    /// Status s-expression for IPC reporting.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:phase :{} :tweens {} :timeout-ms {:.0})",
            self.phase.as_str(),
            self.tweens.len(),
            self.config.absence_timeout_ms,
        )
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObjects;

    /// Scene with one object displaced from its initial pose.
    fn displaced_scene() -> (SceneObjects, ObjectId) {
        let mut scene = SceneObjects::new();
        let id = scene.add(Vec3::new(1.0, 1.0, 1.0), 0.5);
        scene.set_position(id, Vec3::new(4.0, 4.0, 4.0));
        scene.set_rotation(id, Vec3::new(2.0, 2.0, 0.0));
        scene.set_scale(id, 2.5);
        (scene, id)
    }

    #[test]
    fn test_ease_endpoints() {
        assert!((ease_in_out_cubic(0.0)).abs() < 1e-6);
        assert!((ease_in_out_cubic(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_timer_arms_on_absence() {
        let (mut scene, _id) = displaced_scene();
        let mut sched = AutoResetScheduler::new();

        sched.update(false, 0.0, &mut scene);
        assert_eq!(sched.phase().as_str(), "pending");
    }

    #[test]
    fn test_presence_cancels_pending() {
        let (mut scene, id) = displaced_scene();
        let mut sched = AutoResetScheduler::new();

        sched.update(false, 0.0, &mut scene);
        sched.update(true, 1000.0, &mut scene);
        assert_eq!(sched.phase(), ResetPhase::Idle);

        // Deadline passing later has no effect: the timer was cancelled.
        sched.update(true, 5000.0, &mut scene);
        assert_eq!(sched.phase(), ResetPhase::Idle);
        let pose = scene.pose(id).unwrap();
        assert_eq!(pose.position, Vec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_reset_converges_to_initial() {
        let (mut scene, id) = displaced_scene();
        let mut sched = AutoResetScheduler::new();

        sched.update(false, 0.0, &mut scene);
        sched.update(false, 3000.0, &mut scene);
        assert_eq!(sched.phase(), ResetPhase::Resetting);
        assert_eq!(sched.tween_count(), 3);

        // Step well past the longest (rotation) duration.
        sched.update(false, 3800.0, &mut scene);
        sched.update(false, 4700.0, &mut scene);

        let pose = scene.pose(id).unwrap();
        let initial = scene.initial_pose(id).unwrap();
        assert!((pose.position.distance(initial.position)) < 1e-4);
        assert!((pose.rotation.distance(initial.rotation)) < 1e-4);
        assert!((pose.scale - initial.scale).abs() < 1e-4);
        assert_eq!(sched.phase(), ResetPhase::Idle);
    }

    #[test]
    fn test_rotation_settles_slower_than_position() {
        let (mut scene, id) = displaced_scene();
        let mut sched = AutoResetScheduler::new();

        sched.update(false, 0.0, &mut scene);
        sched.update(false, 3000.0, &mut scene);
        // Position (1000ms) is done; rotation (1600ms) is not.
        sched.update(false, 4200.0, &mut scene);

        let pose = scene.pose(id).unwrap();
        let initial = scene.initial_pose(id).unwrap();
        assert!(pose.position.distance(initial.position) < 1e-4);
        assert!(pose.rotation.distance(initial.rotation) > 1e-3);
        assert_eq!(sched.phase(), ResetPhase::Resetting);
        assert_eq!(sched.tween_count(), 1);
    }

    #[test]
    fn test_hand_mid_tween_halts_at_current_pose() {
        let (mut scene, id) = displaced_scene();
        let mut sched = AutoResetScheduler::new();

        sched.update(false, 0.0, &mut scene);
        sched.update(false, 3000.0, &mut scene);
        sched.update(false, 3500.0, &mut scene);

        let halfway = scene.pose(id).unwrap().position;
        let initial = scene.initial_pose(id).unwrap().position;
        assert!(halfway.distance(initial) > 1e-3);
        assert!(halfway.distance(Vec3::new(4.0, 4.0, 4.0)) > 1e-3);

        // A hand reappears: tweens are removed, nothing moves further.
        sched.update(true, 3600.0, &mut scene);
        assert_eq!(sched.phase(), ResetPhase::Idle);
        assert_eq!(sched.tween_count(), 0);
        assert_eq!(scene.pose(id).unwrap().position, halfway);

        // Objects stay put on later frames too.
        sched.update(true, 9999.0, &mut scene);
        assert_eq!(scene.pose(id).unwrap().position, halfway);
    }

    #[test]
    fn test_new_absence_restarts_from_current() {
        let (mut scene, id) = displaced_scene();
        let mut sched = AutoResetScheduler::new();

        sched.update(false, 0.0, &mut scene);
        sched.update(false, 3000.0, &mut scene);
        sched.update(false, 3500.0, &mut scene);
        sched.update(true, 3600.0, &mut scene);
        let halted = scene.pose(id).unwrap().position;

        // Absence again: a fresh timer, then a fresh tween set from
        // the halted pose.
        sched.update(false, 4000.0, &mut scene);
        assert_eq!(sched.phase().as_str(), "pending");
        sched.update(false, 7000.0, &mut scene);
        assert_eq!(sched.phase(), ResetPhase::Resetting);
        sched.update(false, 7100.0, &mut scene);
        let pose = scene.pose(id).unwrap().position;
        assert!(pose.distance(halted) < halted.distance(Vec3::new(4.0, 4.0, 4.0)));
    }

    #[test]
    fn test_empty_scene_reset_is_trivial() {
        let mut scene = SceneObjects::new();
        let mut sched = AutoResetScheduler::new();

        sched.update(false, 0.0, &mut scene);
        sched.update(false, 3000.0, &mut scene);
        // No objects, no tweens: the next frame drains to idle.
        sched.update(false, 3016.0, &mut scene);
        assert_eq!(sched.phase(), ResetPhase::Idle);
    }

    #[test]
    fn test_status_sexp() {
        let sched = AutoResetScheduler::new();
        let sexp = sched.status_sexp();
        assert!(sexp.contains(":phase :idle"));
        assert!(sexp.contains(":tweens 0"));
    }
}
