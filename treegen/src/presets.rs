//! Ready-made configurations for common tree shapes.
//!
//! These are plain constructors, not persisted assets: callers grab one,
//! adjust fields and hand it to [`crate::generate`].

use crate::config::{CanopyVolume, GrowthConfig, LeafMode, StructureMode};
use glam::Vec3;

/// Broad deciduous tree: grammar-grown skeleton under chunky leaf clusters.
pub fn oak() -> GrowthConfig {
	let mut config = GrowthConfig::default()
		.with_structure_mode(StructureMode::LSystem)
		.with_leaf_mode(LeafMode::Clusters);

	config.grammar.axiom = "FFFB".to_owned();
	config.grammar.iterations = 3;
	config.grammar.growth_probability = 40.0;
	config.grammar.branch_probability = 55.0;
	config.grammar.angle_x_min = 25.0;
	config.grammar.angle_x_max = 50.0;
	config.grammar.angle_y_min = -10.0;
	config.grammar.angle_y_max = 40.0;

	config.structure.segment_length = 0.7;
	config.thickness.base_thickness = 0.6;
	config.thickness.thinning_rate = 0.9;
	config.thickness.child_thickness = 0.75;
	config.bark.blend_distance = 0.25;

	config.leaves.density = 2.2;
	config.leaves.start_height = 0.25;
	config.leaves.size_variation = 0.25;
	config.leaves.transparency = 0.95;
	config.leaves.min_branch_radius = 0.02;
	config.leaves.max_leaf_count = 3500;
	config.leaves.clusters.radius = 1.1;
	config.leaves.clusters.size_min = 0.85;
	config.leaves.clusters.size_max = 1.35;
	config.leaves.clusters.shape = Vec3::new(1.3, 0.95, 1.1);
	config.leaves.clusters.noise_strength = 0.18;
	config.leaves.clusters.segments = 14;
	config.leaves.clusters.texture_tiling = 1.2;
	config.leaves.clusters.offset = 0.2;

	config
}

/// Conifer: sparse grammar skeleton, dense double-sided needle quads pulled
/// tight to the branches.
pub fn pine() -> GrowthConfig {
	let mut config = GrowthConfig::default()
		.with_structure_mode(StructureMode::LSystem)
		.with_leaf_mode(LeafMode::Planes);

	config.grammar.axiom = "FFFFB".to_owned();
	config.grammar.iterations = 4;
	config.grammar.growth_probability = 35.0;
	config.grammar.branch_probability = 35.0;
	config.grammar.angle_x_min = 15.0;
	config.grammar.angle_x_max = 35.0;
	config.grammar.angle_y_min = -55.0;
	config.grammar.angle_y_max = 5.0;

	config.structure.segment_length = 0.9;
	config.thickness.base_thickness = 0.4;
	config.thickness.thinning_rate = 0.92;
	config.thickness.child_thickness = 0.65;
	config.bark.blend_distance = 0.15;

	config.leaves.density = 9.0;
	config.leaves.start_height = 0.25;
	config.leaves.size_variation = 0.15;
	config.leaves.min_branch_radius = 0.015;
	config.leaves.max_leaf_count = 4500;
	config.leaves.planes.width = 0.05;
	config.leaves.planes.length = 0.35;
	config.leaves.planes.double_sided = true;
	config.leaves.planes.distance_from_branch = 0.05;
	config.leaves.planes.radial_jitter = 0.05;
	config.leaves.planes.clumpiness = 0.7;
	config.leaves.planes.clump_spread = 0.2;
	config.leaves.planes.tip_bias = 0.8;
	config.leaves.planes.size_by_height = true;
	config.leaves.planes.size_bottom = 1.3;
	config.leaves.planes.size_top = 0.6;

	config
}

/// Palm: a tall, lightly branched guided trunk topped by a few broad domes.
pub fn palm() -> GrowthConfig {
	let mut config = GrowthConfig::default()
		.with_structure_mode(StructureMode::GuidedGrowth)
		.with_leaf_mode(LeafMode::Domes);

	config.structure.segment_length = 1.1;
	config.structure.trunk_height = 9.0;
	config.structure.trunk_lean_strength = 0.35;
	config.structure.trunk_noise_strength = 0.15;
	config.thickness.base_thickness = 0.5;
	config.thickness.thinning_rate = 0.95;
	config.thickness.child_thickness = 0.85;
	config.bark.blend_distance = 0.1;

	config.branching.levels = 1;
	config.branching.per_level = 6;
	config.branching.length_factor = 0.35;
	config.branching.angle_min = 35.0;
	config.branching.angle_max = 70.0;
	config.branching.droop = 0.6;

	config.leaves.density = 4.0;
	config.leaves.start_height = 0.6;
	config.leaves.size_variation = 0.15;
	config.leaves.min_branch_radius = 0.02;
	config.leaves.max_leaf_count = 2500;
	config.leaves.domes.radius = 2.6;
	config.leaves.domes.shape = Vec3::new(1.1, 0.55, 1.1);
	config.leaves.domes.offset = 0.8;
	config.leaves.domes.segments = 14;
	config.leaves.domes.noise_strength = 0.08;
	config.leaves.domes.texture_tiling = 1.2;

	config
}

/// Weeping willow: guided growth drawn into a low, wide canopy volume with
/// heavy droop and clumped hanging leaves.
pub fn willow() -> GrowthConfig {
	let mut config = GrowthConfig::default()
		.with_structure_mode(StructureMode::GuidedGrowth)
		.with_leaf_mode(LeafMode::Planes)
		.with_canopy_volume(CanopyVolume {
			center_offset: Vec3::new(0.0, 4.5, 0.0),
			radii: Vec3::new(4.0, 2.0, 4.0),
			attraction: 0.5,
			surface_target: true,
			height_start: 0.3,
			height_end: 0.9,
		});

	config.structure.trunk_height = 5.5;
	config.structure.trunk_lean_strength = 0.15;
	config.thickness.base_thickness = 0.55;

	config.branching.levels = 3;
	config.branching.per_level = 4;
	config.branching.droop = 0.8;
	config.branching.min_upward = -0.15;
	config.branching.clamp_above_base = true;
	config.branching.ground_clearance = 0.3;
	config.branching.max_generated_branches = 160;

	config.leaves.density = 5.0;
	config.leaves.start_height = 0.3;
	config.leaves.max_leaf_count = 4000;
	config.leaves.planes.width = 0.12;
	config.leaves.planes.length = 0.5;
	config.leaves.planes.clumpiness = 0.8;
	config.leaves.planes.clump_spread = 0.15;
	config.leaves.planes.tip_bias = 0.85;
	config.leaves.planes.double_sided = true;

	config
}

/// Looks a preset up by name.
pub fn by_name(name: &str) -> Option<GrowthConfig> {
	match name {
		"oak" => Some(oak()),
		"pine" => Some(pine()),
		"palm" => Some(palm()),
		"willow" => Some(willow()),
		_ => None,
	}
}

/// Names accepted by [`by_name`].
pub const PRESET_NAMES: &[&str] = &["oak", "pine", "palm", "willow"];
