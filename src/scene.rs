//! Scene object registry — positions, rotations, scales, and
//! initial-pose bookkeeping for hand-manipulated objects.
//!
//! The interaction and auto-reset code consume objects through the
//! `ObjectRegistry` trait; `SceneObjects` is the in-memory
//! implementation used by tests and simple embedders.  Rendering owns
//! the meshes; this module owns only poses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

// ── Vec3 ───────────────────────────────────────────────────

/// 3D vector in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    pub fn distance(&self, other: Vec3) -> f32 {
        self.sub(other).length()
    }

    /// Linear interpolation: t=0 gives self, t=1 gives other.
    pub fn lerp(&self, other: Vec3, t: f32) -> Vec3 {
        Vec3::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(p: [f32; 3]) -> Self {
        Vec3::new(p[0], p[1], p[2])
    }
}

// ── Object ids ─────────────────────────────────────────────

/// Opaque object identifier.
pub type ObjectId = u64;

/// Monotonically increasing object ID generator.
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique object ID.
pub fn next_object_id() -> ObjectId {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

// ── Object pose ────────────────────────────────────────────

/// Full pose of one object: position, Euler rotation (radians),
/// uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl ObjectPose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

// ── Registry trait ─────────────────────────────────────────

/// Interface to the externally owned object set.
///
/// All queries are fallible-by-Option: an unknown id or an empty hit
/// means "nothing to do", never an error.
pub trait ObjectRegistry {
    /// Which object, if any, contains this world point.
    fn object_at(&self, point: Vec3) -> Option<ObjectId>;
    /// Current pose of an object.
    fn pose(&self, id: ObjectId) -> Option<ObjectPose>;
    /// Pose recorded at scene setup, read-only thereafter.
    fn initial_pose(&self, id: ObjectId) -> Option<ObjectPose>;
    fn set_position(&mut self, id: ObjectId, position: Vec3);
    fn set_rotation(&mut self, id: ObjectId, rotation: Vec3);
    fn set_scale(&mut self, id: ObjectId, scale: f32);
    /// All tracked object ids.
    fn object_ids(&self) -> Vec<ObjectId>;
}

// ── In-memory implementation ───────────────────────────────

/// One registered object.
#[derive(Debug, Clone)]
struct SceneObject {
    pose: ObjectPose,
    initial: ObjectPose,
    /// Hit-test radius at scale 1.0.
    radius: f32,
}

/// In-memory object registry with sphere hit testing.
#[derive(Debug, Default)]
pub struct SceneObjects {
    objects: HashMap<ObjectId, SceneObject>,
}

impl SceneObjects {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    /// Register an object, capturing its initial pose.  Returns the
    /// new id.
    pub fn add(&mut self, position: Vec3, radius: f32) -> ObjectId {
        let id = next_object_id();
        let pose = ObjectPose::at(position);
        self.objects.insert(
            id,
            SceneObject {
                pose,
                initial: pose,
                radius,
            },
        );
        id
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Status s-expression for IPC reporting.
    pub fn status_sexp(&self) -> String {
        format!("(:objects {})", self.objects.len())
    }
}

impl ObjectRegistry for SceneObjects {
    /// Nearest object whose scaled hit sphere contains the point.
    fn object_at(&self, point: Vec3) -> Option<ObjectId> {
        let mut best: Option<(ObjectId, f32)> = None;
        for (id, obj) in &self.objects {
            let d = obj.pose.position.distance(point);
            if d <= obj.radius * obj.pose.scale {
                match best {
                    Some((_, bd)) if bd <= d => {}
                    _ => best = Some((*id, d)),
                }
            }
        }
        best.map(|(id, _)| id)
    }

    fn pose(&self, id: ObjectId) -> Option<ObjectPose> {
        self.objects.get(&id).map(|o| o.pose)
    }

    fn initial_pose(&self, id: ObjectId) -> Option<ObjectPose> {
        self.objects.get(&id).map(|o| o.initial)
    }

    fn set_position(&mut self, id: ObjectId, position: Vec3) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.pose.position = position;
        }
    }

    fn set_rotation(&mut self, id: ObjectId, rotation: Vec3) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.pose.rotation = rotation;
        }
    }

    fn set_scale(&mut self, id: ObjectId, scale: f32) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.pose.scale = scale;
        }
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }
}

// ── Tests ──────────────────────────────────────────────────
