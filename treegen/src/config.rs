use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which skeleton generator produces the branch forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StructureMode {
	/// Grammar expansion interpreted by a turtle walk.
	LSystem,
	/// Iterative noise-guided growth with optional canopy attraction.
	#[default]
	GuidedGrowth,
}

/// Which foliage strategy consumes the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LeafMode {
	/// Billboard quads scattered along branch segments.
	Planes,
	/// Ellipsoidal shells around branch-tip groups.
	#[default]
	Clusters,
	/// Open-bottom hemispherical shells for soft canopy silhouettes.
	Domes,
}

/// Trunk shape parameters shared by both growth modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureParams {
	pub mode: StructureMode,
	/// Length of each branch segment in units.
	pub segment_length: f32,
	/// Overall trunk height in units.
	pub trunk_height: f32,
	/// Randomized variation applied to trunk height.
	pub trunk_height_variation: f32,
	/// How much the trunk leans as it grows.
	pub trunk_lean_strength: f32,
	/// Noise scale for trunk direction variation.
	pub trunk_noise_scale: f32,
	/// Noise strength for trunk direction variation.
	pub trunk_noise_strength: f32,
}

impl Default for StructureParams {
	fn default() -> Self {
		Self {
			mode: StructureMode::default(),
			segment_length: 1.0,
			trunk_height: 6.0,
			trunk_height_variation: 0.15,
			trunk_lean_strength: 0.2,
			trunk_noise_scale: 0.35,
			trunk_noise_strength: 0.2,
		}
	}
}

/// Parameters of the grammar ("L-System") growth mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarParams {
	/// Starting string for expansion.
	pub axiom: String,
	/// Number of rewrite passes over the string.
	pub iterations: u32,
	/// Percent chance that an `F` doubles during expansion.
	pub growth_probability: f32,
	/// Percent chance of the left-heavy branch pattern over the right-heavy one.
	pub branch_probability: f32,
	/// Minimum pitch for the left rotation marker, degrees.
	pub angle_x_min: f32,
	/// Maximum pitch for the left rotation marker, degrees.
	pub angle_x_max: f32,
	/// Minimum yaw applied by both rotation markers, degrees.
	pub angle_y_min: f32,
	/// Maximum yaw applied by both rotation markers, degrees.
	pub angle_y_max: f32,
}

impl Default for GrammarParams {
	fn default() -> Self {
		Self {
			axiom: "FB".to_owned(),
			iterations: 3,
			growth_probability: 50.0,
			branch_probability: 50.0,
			angle_x_min: 15.0,
			angle_x_max: 45.0,
			angle_y_min: -30.0,
			angle_y_max: 30.0,
		}
	}
}

/// Branch spawning and curvature parameters for guided growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchingParams {
	/// How many branching levels to generate (0 = trunk only).
	pub levels: u32,
	/// Branches spawned per parent at each level.
	pub per_level: u32,
	/// Reduce branch counts at higher levels.
	pub density_falloff: f32,
	/// Primary branch length as a fraction of trunk height.
	pub length_factor: f32,
	/// Length reduction per branching level.
	pub length_falloff: f32,
	/// Minimum branch angle away from the parent direction, degrees.
	pub angle_min: f32,
	/// Maximum branch angle away from the parent direction, degrees.
	pub angle_max: f32,
	/// Bias branches upward (0 = none, 1 = strong).
	pub upward_bias: f32,
	/// How much branches droop toward the tips.
	pub droop: f32,
	/// Noise scale for branch direction variation.
	pub noise_scale: f32,
	/// Noise strength for branch direction variation.
	pub noise_strength: f32,
	/// Azimuth jitter for branch distribution around the parent, degrees.
	pub twist_jitter: f32,
	/// Hard cap on total generated branches (0 = unlimited).
	pub max_generated_branches: u32,
	/// Minimum upward component for branch direction.
	pub min_upward: f32,
	/// Keep branch points above the base height.
	pub clamp_above_base: bool,
	/// Minimum clearance above base when clamping branches.
	pub ground_clearance: f32,
}

impl Default for BranchingParams {
	fn default() -> Self {
		Self {
			levels: 3,
			per_level: 3,
			density_falloff: 0.7,
			length_factor: 0.75,
			length_falloff: 0.7,
			angle_min: 20.0,
			angle_max: 55.0,
			upward_bias: 0.2,
			droop: 0.25,
			noise_scale: 0.6,
			noise_strength: 0.2,
			twist_jitter: 12.0,
			max_generated_branches: 120,
			min_upward: 0.02,
			clamp_above_base: false,
			ground_clearance: 0.05,
		}
	}
}

/// A soft ellipsoidal attractor biasing guided growth. Zero or more may be
/// active per configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyVolume {
	/// Center of the volume relative to the tree base.
	pub center_offset: Vec3,
	/// Ellipsoid radii of the volume.
	pub radii: Vec3,
	/// Strength of branch attraction toward the volume, in [0, 1].
	pub attraction: f32,
	/// Target the nearest point on the ellipsoid surface instead of the center.
	pub surface_target: bool,
	/// Height fraction at which attraction starts ramping in.
	pub height_start: f32,
	/// Height fraction at which attraction reaches full strength.
	pub height_end: f32,
}

impl Default for CanopyVolume {
	fn default() -> Self {
		Self {
			center_offset: Vec3::new(0.0, 5.0, 0.0),
			radii: Vec3::new(3.0, 2.5, 3.0),
			attraction: 0.35,
			surface_target: true,
			height_start: 0.35,
			height_end: 1.0,
		}
	}
}

/// Radius behavior along and across branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThicknessParams {
	/// Starting thickness of the trunk at the base.
	pub base_thickness: f32,
	/// Radius multiplier per segment (1.0 = no thinning).
	pub thinning_rate: f32,
	/// Radius multiplier applied once to the first segment of a child branch.
	pub child_thickness: f32,
}

impl Default for ThicknessParams {
	fn default() -> Self {
		Self { base_thickness: 0.5, thinning_rate: 0.9, child_thickness: 0.7 }
	}
}

/// Bark surface appearance: tube tessellation, tiling and UV variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarkParams {
	/// Vertices per tube ring.
	pub radial_segments: u32,
	/// Texture repeats around the branch circumference.
	pub tiling_horizontal: f32,
	/// Texture repeats per unit of branch length.
	pub tiling_vertical: f32,
	/// Random UV offset per branch to break up repetition.
	pub uv_randomness: f32,
	/// Noise-based UV distortion strength.
	pub uv_noise_strength: f32,
	/// Scale of the noise pattern used for UV distortion.
	pub uv_noise_scale: f32,
	/// How far child tubes extrude back into their parent for seamless joins.
	pub blend_distance: f32,
}

impl Default for BarkParams {
	fn default() -> Self {
		Self {
			radial_segments: 8,
			tiling_horizontal: 1.0,
			tiling_vertical: 1.0,
			uv_randomness: 0.3,
			uv_noise_strength: 0.1,
			uv_noise_scale: 1.0,
			blend_distance: 0.2,
		}
	}
}

/// Plane-leaf specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneLeafParams {
	/// Width of each leaf quad.
	pub width: f32,
	/// Length of each leaf quad.
	pub length: f32,
	/// Emit a mirrored back face per leaf.
	pub double_sided: bool,
	/// How far leaves extend from the branch surface.
	pub distance_from_branch: f32,
	/// Random variation of the radial offset.
	pub radial_jitter: f32,
	/// Texture tiling for leaf quads.
	pub texture_tiling: f32,
	/// Fraction of leaves gathered near clump anchors instead of spread
	/// uniformly along the segment.
	pub clumpiness: f32,
	/// Parametric spread of leaves around their clump anchor.
	pub clump_spread: f32,
	/// How strongly clump anchors gather toward the segment tip.
	pub tip_bias: f32,
	/// Scale leaf size from bottom to top of the tree.
	pub size_by_height: bool,
	/// Size multiplier at the bottom of the tree.
	pub size_bottom: f32,
	/// Size multiplier at the top of the tree.
	pub size_top: f32,
}

impl Default for PlaneLeafParams {
	fn default() -> Self {
		Self {
			width: 0.25,
			length: 0.4,
			double_sided: false,
			distance_from_branch: 0.1,
			radial_jitter: 0.04,
			texture_tiling: 1.0,
			clumpiness: 0.5,
			clump_spread: 0.25,
			tip_bias: 0.6,
			size_by_height: false,
			size_bottom: 1.0,
			size_top: 1.0,
		}
	}
}

/// Cluster-mode parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
	/// Base size of each spherical leaf cluster.
	pub radius: f32,
	/// Minimum cluster size as a multiplier of base radius.
	pub size_min: f32,
	/// Maximum cluster size as a multiplier of base radius.
	pub size_max: f32,
	/// Per-axis stretch of the cluster shape (1 = sphere).
	pub shape: Vec3,
	/// Organic irregularity of the cluster surface.
	pub noise_strength: f32,
	/// Scale of the noise pattern for cluster irregularity.
	pub noise_scale: f32,
	/// Add a transparent outer shell layer for depth.
	pub outer_shell: bool,
	/// Outer shell radius as a multiplier of cluster radius.
	pub outer_shell_thickness: f32,
	/// Alpha of the outer shell layer.
	pub outer_shell_transparency: f32,
	/// Ring segments per cluster sphere.
	pub segments: u32,
	/// Texture tiling on clusters.
	pub texture_tiling: f32,
	/// Randomize cluster rotation.
	pub randomize_rotation: bool,
	/// How far clusters extend from branch tips.
	pub offset: f32,
}

impl Default for ClusterParams {
	fn default() -> Self {
		Self {
			radius: 0.8,
			size_min: 0.8,
			size_max: 1.2,
			shape: Vec3::new(1.2, 0.8, 1.1),
			noise_strength: 0.15,
			noise_scale: 2.0,
			outer_shell: true,
			outer_shell_thickness: 1.2,
			outer_shell_transparency: 0.3,
			segments: 12,
			texture_tiling: 1.0,
			randomize_rotation: true,
			offset: 0.3,
		}
	}
}

/// Dome-mode parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomeParams {
	/// Base radius of each leaf dome.
	pub radius: f32,
	/// Per-axis stretch of the dome shape (1 = hemisphere).
	pub shape: Vec3,
	/// How much to push domes outward from branch tips.
	pub offset: f32,
	/// Ring segments per dome.
	pub segments: u32,
	/// Scale of the noise pattern used for dome irregularity.
	pub noise_scale: f32,
	/// Organic irregularity of the dome surface.
	pub noise_strength: f32,
	/// Randomize dome rotation.
	pub randomize_rotation: bool,
	/// Texture tiling on domes.
	pub texture_tiling: f32,
}

impl Default for DomeParams {
	fn default() -> Self {
		Self {
			radius: 1.2,
			shape: Vec3::new(1.15, 0.75, 1.05),
			offset: 0.5,
			segments: 12,
			noise_scale: 2.0,
			noise_strength: 0.12,
			randomize_rotation: true,
			texture_tiling: 1.0,
		}
	}
}

/// Foliage parameters shared by every leaf mode, plus the per-mode groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafParams {
	pub mode: LeafMode,
	/// Leaves per branch segment (Planes) or target element count
	/// (Clusters/Domes).
	pub density: f32,
	/// Height fraction below which no leaves appear.
	pub start_height: f32,
	/// Random variation in leaf/cluster sizes.
	pub size_variation: f32,
	/// Alpha written into the foliage vertex colors.
	pub transparency: f32,
	/// Random UV offset per leaf element.
	pub uv_randomness: f32,
	/// Noise-based UV distortion strength for leaves.
	pub uv_noise_strength: f32,
	/// Scale of the noise pattern used for leaf UV distortion.
	pub uv_noise_scale: f32,
	/// Hard cap on generated foliage elements (0 = unlimited).
	pub max_leaf_count: u32,
	/// Scale per-segment density by branch thickness (Planes).
	pub optimize_distribution: bool,
	/// Minimum branch radius that still receives leaves.
	pub min_branch_radius: f32,
	/// Weight of the density signal over the center-distance signal when
	/// sizing clusters and domes.
	pub proximity_size_weight: f32,
	/// Uniform perturbation applied to every element size.
	pub size_jitter: f32,
	/// Neighbor count at which the density-based size signal saturates.
	pub proximity_count_ceiling: u32,
	pub planes: PlaneLeafParams,
	pub clusters: ClusterParams,
	pub domes: DomeParams,
}

impl Default for LeafParams {
	fn default() -> Self {
		Self {
			mode: LeafMode::default(),
			density: 1.2,
			start_height: 0.5,
			size_variation: 0.2,
			transparency: 1.0,
			uv_randomness: 0.2,
			uv_noise_strength: 0.05,
			uv_noise_scale: 2.0,
			max_leaf_count: 2000,
			optimize_distribution: true,
			min_branch_radius: 0.05,
			proximity_size_weight: 0.7,
			size_jitter: 0.1,
			proximity_count_ceiling: 8,
			planes: PlaneLeafParams::default(),
			clusters: ClusterParams::default(),
			domes: DomeParams::default(),
		}
	}
}

/// The full parameter set for one generation call. Immutable input; plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrowthConfig {
	/// Seed for deterministic growth. Zero is a documented escape hatch
	/// meaning "seed from ambient entropy": the run is then not reproducible.
	/// Every nonzero seed makes a generation pass bit-for-bit repeatable.
	pub random_seed: u64,
	pub structure: StructureParams,
	pub grammar: GrammarParams,
	pub branching: BranchingParams,
	/// Active canopy attractors for guided growth; may be empty.
	pub canopy: Vec<CanopyVolume>,
	pub thickness: ThicknessParams,
	pub bark: BarkParams,
	pub leaves: LeafParams,
}

impl GrowthConfig {
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.random_seed = seed;
		self
	}

	pub fn with_structure_mode(mut self, mode: StructureMode) -> Self {
		self.structure.mode = mode;
		self
	}

	pub fn with_leaf_mode(mut self, mode: LeafMode) -> Self {
		self.leaves.mode = mode;
		self
	}

	pub fn with_canopy_volume(mut self, volume: CanopyVolume) -> Self {
		self.canopy.push(volume);
		self
	}

	/// Opt-in range check for callers that want early feedback instead of the
	/// degenerate-input-produces-empty-output behavior of generation itself.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.structure.segment_length <= 0.0 {
			return Err(ConfigError::SegmentLength(self.structure.segment_length));
		}
		if self.structure.trunk_height <= 0.0 {
			return Err(ConfigError::TrunkHeight(self.structure.trunk_height));
		}
		if self.bark.radial_segments < 3 {
			return Err(ConfigError::RadialSegments(self.bark.radial_segments));
		}
		if self.leaves.density < 0.0 {
			return Err(ConfigError::LeafDensity(self.leaves.density));
		}
		for volume in &self.canopy {
			if volume.height_start < 0.0
				|| volume.height_end > 1.0
				|| volume.height_start > volume.height_end
			{
				return Err(ConfigError::CanopyHeightBand {
					start: volume.height_start,
					end: volume.height_end,
				});
			}
		}
		Ok(())
	}
}

/// Out-of-range configuration, reported by [`GrowthConfig::validate`] only.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("segment length must be positive, got {0}")]
	SegmentLength(f32),
	#[error("trunk height must be positive, got {0}")]
	TrunkHeight(f32),
	#[error("radial segment count must be at least 3, got {0}")]
	RadialSegments(u32),
	#[error("leaf density must be non-negative, got {0}")]
	LeafDensity(f32),
	#[error("canopy height band must satisfy 0 <= start <= end <= 1, got {start}..{end}")]
	CanopyHeightBand { start: f32, end: f32 },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config_is_valid() {
		assert!(GrowthConfig::default().validate().is_ok());
	}

	#[test]
	fn test_validate_rejects_bad_ranges() {
		let mut config = GrowthConfig::default();
		config.structure.segment_length = 0.0;
		assert_eq!(config.validate(), Err(ConfigError::SegmentLength(0.0)));

		let mut config = GrowthConfig::default();
		config.bark.radial_segments = 2;
		assert_eq!(config.validate(), Err(ConfigError::RadialSegments(2)));

		let mut config = GrowthConfig::default();
		config.leaves.density = -1.0;
		assert_eq!(config.validate(), Err(ConfigError::LeafDensity(-1.0)));
	}

	#[test]
	fn test_validate_rejects_inverted_canopy_band() {
		let config = GrowthConfig::default().with_canopy_volume(CanopyVolume {
			height_start: 0.9,
			height_end: 0.2,
			..CanopyVolume::default()
		});
		assert!(matches!(config.validate(), Err(ConfigError::CanopyHeightBand { .. })));
	}

	#[test]
	fn test_config_round_trips_through_json() {
		let config = GrowthConfig::default()
			.with_seed(42)
			.with_leaf_mode(LeafMode::Planes)
			.with_canopy_volume(CanopyVolume::default());
		let json = serde_json::to_string(&config).unwrap();
		let back: GrowthConfig = serde_json::from_str(&json).unwrap();
		assert_eq!(config, back);
	}
}
