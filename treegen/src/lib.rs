//! Procedural tree-geometry synthesis.
//!
//! One call turns a [`GrowthConfig`] into a branch skeleton ([`Forest`]) and
//! two renderable buffer sets ([`MeshBuffers`]): tapering bark tubes and
//! foliage. Two growth strategies (grammar expansion and noise-guided
//! growth) and three foliage strategies (billboard planes, ellipsoidal
//! clusters, hemispherical domes) plug into the same data shapes, so any
//! pairing works.
//!
//! The crate stops at geometry: attaching the buffers to a scene, binding
//! materials and persisting presets are the caller's business.

pub mod config;
pub mod foliage;
pub mod forest;
pub mod generator;
pub mod growth;
pub mod math;
pub mod mesh;
pub mod noise_field;
pub mod presets;
pub mod spatial;
pub mod texture;
pub mod tube;

pub use config::{
	BarkParams, BranchingParams, CanopyVolume, ClusterParams, ConfigError, DomeParams,
	GrammarParams, GrowthConfig, LeafMode, LeafParams, PlaneLeafParams, StructureMode,
	StructureParams, ThicknessParams,
};
pub use forest::{Branch, BranchPoint, Forest};
pub use generator::{generate, generate_with, GeneratedTree};
pub use mesh::MeshBuffers;
