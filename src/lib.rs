//! handstage — hand-landmark gesture recognition and pinch interaction.
//!
//! Turns a per-frame stream of up to two hands (21 normalized 3D
//! landmarks each) into static pose classification, sustained wave
//! detection, and a pinch-driven interaction model over an externally
//! owned object registry: click-to-select, drag, single-hand free
//! rotation, two-hand scaling, and an auto-reset that tweens objects
//! home after the hands leave.
//!
//! The embedder owns capture, rendering, and the clock; it calls
//! [`pipeline::PipelineState::process`] once per tracking result with
//! the current wall-clock time in milliseconds.

pub mod auto_reset;
pub mod hand;
pub mod interaction;
pub mod pipeline;
pub mod pose;
pub mod scene;
pub mod wave;

pub use auto_reset::{AutoResetConfig, AutoResetScheduler, ResetPhase};
pub use hand::{Finger, Hand, HandFrame, HandLandmark, LANDMARK_COUNT};
pub use interaction::{InteractionConfig, InteractionEvent, InteractionState, PinchEdge};
pub use pipeline::{FrameReport, HandView, PipelineState, ProviderHand};
pub use pose::{classify_pose, PalmDirection, PinchFinger, PoseConfig, PoseSnapshot};
pub use scene::{ObjectId, ObjectPose, ObjectRegistry, SceneObjects, Vec3};
pub use wave::{HelloWaveConfig, HelloWaveDetector, HelloWaveStatus, WaveConfig, WaveDetector};
