use super::GrowthStrategy;
use crate::config::{CanopyVolume, GrowthConfig};
use crate::forest::{Branch, BranchPoint, Forest};
use crate::math::{clamp01, inverse_lerp, lerp, perpendicular, rotate_around_axis, uniform};
use crate::mesh::MeshBuffers;
use crate::noise_field::NoiseField;
use crate::tube::TubeBuilder;
use glam::{Quat, Vec3};
use rand::{rngs::StdRng, Rng};

/// Azimuthal step between sibling branches. Phyllotaxis-style packing spreads
/// spawns evenly around the parent axis without collision checks.
const GOLDEN_ANGLE: f32 = 137.507_76;

/// Blend weight pulling the trunk direction toward its per-step target.
const TRUNK_STEER: f32 = 0.6;
/// Blend weight pulling branch directions toward their per-step target.
const BRANCH_STEER: f32 = 0.55;

/// Iterative noise-guided growth: the trunk and every branch are stepped
/// segment by segment, steering toward a target direction assembled from
/// lean, coherent noise, droop and optional canopy attraction.
pub struct GuidedGrowth;

impl GrowthStrategy for GuidedGrowth {
	fn grow(&self, config: &GrowthConfig, rng: &mut StdRng, bark: &mut MeshBuffers) -> Forest {
		let structure = &config.structure;
		let branching = &config.branching;
		let thickness = &config.thickness;
		let tube = TubeBuilder::from_config(config);

		let base_pos = Vec3::ZERO;
		let trunk_up = Vec3::Y;

		let variation = structure.trunk_height_variation;
		let height = (structure.trunk_height * uniform(rng, 1.0 - variation, 1.0 + variation))
			.max(structure.segment_length * 2.0);
		let trunk_segments = ((height / structure.segment_length).round() as i64).max(2) as usize;
		let trunk_step = height / trunk_segments as f32;

		let lean_dir =
			Quat::from_rotation_y(uniform(rng, 0.0, 360.0).to_radians()) * Vec3::Z;
		let trunk_noise =
			NoiseField::new(structure.trunk_noise_scale, structure.trunk_noise_strength);
		let trunk_seed_offset = (config.random_seed as i32).wrapping_add(13);

		let mut points = Vec::with_capacity(trunk_segments + 1);
		let mut pos = base_pos;
		let mut dir = trunk_up;
		let mut radius = thickness.base_thickness;
		points.push(BranchPoint::new(pos, radius));

		for i in 0..trunk_segments {
			let t = (i + 1) as f32 / trunk_segments as f32;
			// Noise influence fades with height so the crown stays calmer
			// than the base.
			let noise_factor = lerp(1.0, 0.4, t);
			let noise = trunk_noise.drift(pos, trunk_seed_offset) * noise_factor;
			let lean = lean_dir * (structure.trunk_lean_strength * t);
			let target = (trunk_up + lean + noise).normalize();
			dir = dir.slerp(target, TRUNK_STEER).normalize();

			pos += dir * trunk_step;
			radius *= thickness.thinning_rate;
			points.push(BranchPoint::new(pos, radius));
		}

		let trunk = Branch::new(points);
		tube.extrude(bark, &trunk, None, 0);

		let branch_noise = NoiseField::new(branching.noise_scale, branching.noise_strength);
		let mut branches: Vec<Branch> = vec![trunk];
		let mut parents: Vec<usize> = vec![0];
		let mut total_branches = 1u32;
		let mut branch_seed = 1u64;

		'levels: for depth in 1..=branching.levels {
			if parents.is_empty() {
				break;
			}
			let mut next_parents = Vec::new();
			let depth_factor = depth as f32 / branching.levels.max(1) as f32;

			for &parent_index in &parents {
				let density_scale = lerp(1.0, branching.density_falloff, depth_factor);
				let desired = ((branching.per_level as f32 * density_scale).round() as i64).max(1);

				for i in 0..desired {
					if branching.max_generated_branches > 0
						&& total_branches >= branching.max_generated_branches
					{
						break 'levels;
					}

					let t = lerp(0.3, 0.9, rng.gen::<f32>());
					let Some((start_point, parent_dir)) = branches[parent_index].sample(t) else {
						continue;
					};

					let axis =
						if parent_dir.length_squared() > 1e-4 { parent_dir } else { trunk_up };
					let perp = perpendicular(axis);
					let azimuth = i as f32 * GOLDEN_ANGLE
						+ uniform(rng, -branching.twist_jitter, branching.twist_jitter);
					let outward = rotate_around_axis(perp, axis, azimuth).normalize();

					let angle = uniform(rng, branching.angle_min, branching.angle_max);
					let mut base_dir = axis.slerp(outward, clamp01(angle / 90.0)).normalize();
					base_dir = base_dir
						.slerp(trunk_up, clamp01(branching.upward_bias * (1.0 - depth_factor)))
						.normalize();

					let length = height
						* branching.length_factor
						* branching.length_falloff.powi(depth as i32 - 1)
						* uniform(rng, 0.85, 1.15);
					let start_radius = (start_point.radius * thickness.child_thickness).max(0.001);

					let branch = grow_branch(
						config,
						&branch_noise,
						GrowSite {
							start: start_point.position,
							direction: base_dir,
							length,
							radius: start_radius,
							depth,
							branch_seed,
							base: base_pos,
							trunk_height: height,
						},
					);
					tube.extrude(bark, &branch, Some(axis), branch_seed);
					branches.push(branch);
					next_parents.push(branches.len() - 1);

					branch_seed += 1;
					total_branches += 1;
				}
			}

			parents = next_parents;
		}

		log::debug!("guided growth produced {} branches", branches.len());

		let mut forest = Forest::new();
		for branch in branches {
			forest.push(branch);
		}
		forest
	}
}

/// Where and how a single branch starts growing.
struct GrowSite {
	start: Vec3,
	direction: Vec3,
	length: f32,
	radius: f32,
	depth: u32,
	branch_seed: u64,
	base: Vec3,
	trunk_height: f32,
}

fn grow_branch(config: &GrowthConfig, branch_noise: &NoiseField, site: GrowSite) -> Branch {
	let branching = &config.branching;
	let thickness = &config.thickness;

	let segments =
		((site.length / config.structure.segment_length).round() as i64).max(2) as usize;
	let step = site.length / segments as f32;
	let seed_offset =
		(site.branch_seed as i32).wrapping_add((site.depth as i32).wrapping_mul(31));

	let mut points = Vec::with_capacity(segments + 1);
	let mut pos = site.start;
	let mut dir = site.direction.normalize();
	let mut radius = site.radius;
	points.push(BranchPoint::new(pos, radius));

	for i in 0..segments {
		let t = (i + 1) as f32 / segments as f32;
		let depth_factor = site.depth as f32 / branching.levels.max(1) as f32;
		let noise_factor = lerp(0.6, 0.2, t) * lerp(1.0, 0.7, depth_factor);
		let noise = branch_noise.drift(pos, seed_offset) * noise_factor;
		let droop = Vec3::NEG_Y * (branching.droop * t * 0.6);
		let mut target = (dir + noise + droop).normalize();

		for volume in &config.canopy {
			let center = site.base + volume.center_offset;
			let canopy_dir = canopy_target_direction(pos, center, volume);
			if canopy_dir.length_squared() <= 1e-4 {
				continue;
			}
			let attraction = canopy_attraction(pos, site.base, site.trunk_height, volume);
			if attraction > 0.0 {
				target = target.slerp(canopy_dir, attraction).normalize();
			}
		}

		// Floor on the vertical component keeps branches from diving.
		if target.y < branching.min_upward {
			target.y = branching.min_upward;
			target = target.normalize();
		}
		dir = dir.slerp(target, BRANCH_STEER).normalize();

		pos += dir * step;
		if branching.clamp_above_base {
			let min_y = site.base.y + branching.ground_clearance;
			if pos.y < min_y {
				pos.y = min_y;
				if dir.y < branching.min_upward {
					dir.y = branching.min_upward;
					dir = dir.normalize();
				}
			}
		}
		radius *= thickness.thinning_rate;
		points.push(BranchPoint::new(pos, radius));
	}

	Branch::new(points)
}

/// Attraction ramps from zero to the volume's strength across its height band.
fn canopy_attraction(position: Vec3, base: Vec3, trunk_height: f32, volume: &CanopyVolume) -> f32 {
	let height_t = inverse_lerp(
		base.y + trunk_height * volume.height_start,
		base.y + trunk_height * volume.height_end,
		position.y,
	);
	clamp01(height_t) * volume.attraction
}

/// Direction toward the volume: straight to its center, or to the nearest
/// point on its ellipsoidal surface when surface targeting is on.
fn canopy_target_direction(position: Vec3, center: Vec3, volume: &CanopyVolume) -> Vec3 {
	let to_center = center - position;
	if !volume.surface_target || volume.radii.length_squared() < 1e-4 {
		return to_center.normalize_or_zero();
	}

	let from_center = position - center;
	if from_center.length_squared() < 1e-4 {
		return to_center.normalize_or_zero();
	}

	let dir = from_center.normalize();
	let surface = center + dir * volume.radii;
	(surface - position).normalize_or_zero()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	fn config() -> GrowthConfig {
		GrowthConfig::default().with_seed(42)
	}

	#[test]
	fn test_exact_trunk_when_variation_is_zero() {
		// trunkHeight 6, segmentLength 1, no variation: 6 segments, 7 points,
		// radius thinning by a constant factor per step.
		let mut cfg = config();
		cfg.structure.trunk_height = 6.0;
		cfg.structure.segment_length = 1.0;
		cfg.structure.trunk_height_variation = 0.0;
		cfg.branching.levels = 0;

		let mut rng = StdRng::seed_from_u64(42);
		let mut bark = MeshBuffers::new();
		let forest = GuidedGrowth.grow(&cfg, &mut rng, &mut bark);

		assert_eq!(forest.len(), 1);
		let trunk = &forest.branches()[0];
		assert_eq!(trunk.len(), 7);
		for (i, point) in trunk.points().iter().enumerate() {
			let expected = cfg.thickness.base_thickness * cfg.thickness.thinning_rate.powi(i as i32);
			assert!((point.radius - expected).abs() < 1e-6);
		}
	}

	#[test]
	fn test_branch_cap_halts_generation() {
		let mut cfg = config();
		cfg.branching.max_generated_branches = 5;
		let mut rng = StdRng::seed_from_u64(42);
		let mut bark = MeshBuffers::new();
		let forest = GuidedGrowth.grow(&cfg, &mut rng, &mut bark);
		assert!(forest.len() <= 5);
	}

	#[test]
	fn test_zero_cap_means_unlimited() {
		let mut cfg = config();
		cfg.branching.max_generated_branches = 0;
		cfg.branching.levels = 2;
		let mut rng = StdRng::seed_from_u64(42);
		let mut bark = MeshBuffers::new();
		let forest = GuidedGrowth.grow(&cfg, &mut rng, &mut bark);
		assert!(forest.len() > 1);
	}

	#[test]
	fn test_taper_is_monotonic_past_first_segment() {
		let cfg = config();
		let mut rng = StdRng::seed_from_u64(42);
		let mut bark = MeshBuffers::new();
		let forest = GuidedGrowth.grow(&cfg, &mut rng, &mut bark);

		for branch in &forest {
			for window in branch.points().windows(2).skip(1) {
				assert!(window[1].radius <= window[0].radius * cfg.thickness.thinning_rate + 1e-6);
			}
		}
	}

	#[test]
	fn test_min_upward_floor_limits_descent() {
		let mut cfg = config();
		cfg.branching.droop = 1.0;
		cfg.branching.min_upward = 0.1;
		cfg.branching.levels = 1;
		let mut rng = StdRng::seed_from_u64(7);
		let mut bark = MeshBuffers::new();
		let forest = GuidedGrowth.grow(&cfg, &mut rng, &mut bark);

		// Steered directions keep a positive vertical component, so no branch
		// may fall faster than its horizontal travel allows.
		for branch in forest.branches().iter().skip(1) {
			let points = branch.points();
			let drop = points[0].position.y - points[points.len() - 1].position.y;
			let span = points[0].position.distance(points[points.len() - 1].position);
			assert!(drop < span);
		}
	}

	#[test]
	fn test_ground_clamp_keeps_points_above_clearance() {
		let mut cfg = config();
		cfg.branching.clamp_above_base = true;
		cfg.branching.ground_clearance = 0.05;
		cfg.branching.droop = 1.0;
		let mut rng = StdRng::seed_from_u64(42);
		let mut bark = MeshBuffers::new();
		let forest = GuidedGrowth.grow(&cfg, &mut rng, &mut bark);

		for branch in forest.branches().iter().skip(1) {
			for point in branch.points() {
				assert!(point.position.y >= 0.05 - 1e-6);
			}
		}
	}

	#[test]
	fn test_canopy_attraction_ramps_inside_band() {
		let volume = CanopyVolume {
			attraction: 0.5,
			height_start: 0.2,
			height_end: 0.8,
			..CanopyVolume::default()
		};
		let base = Vec3::ZERO;
		let below = canopy_attraction(Vec3::new(0.0, 0.5, 0.0), base, 10.0, &volume);
		let inside = canopy_attraction(Vec3::new(0.0, 5.0, 0.0), base, 10.0, &volume);
		let above = canopy_attraction(Vec3::new(0.0, 9.5, 0.0), base, 10.0, &volume);
		assert_eq!(below, 0.0);
		assert!(inside > 0.0 && inside < 0.5);
		assert_eq!(above, 0.5);
	}

	#[test]
	fn test_surface_target_points_at_ellipsoid_shell() {
		let volume = CanopyVolume {
			surface_target: true,
			radii: Vec3::new(2.0, 1.0, 2.0),
			..CanopyVolume::default()
		};
		let center = Vec3::new(0.0, 5.0, 0.0);
		// A point east of the center should be pulled toward the shell point
		// east of the center, not toward the center itself.
		let position = Vec3::new(4.0, 5.0, 0.0);
		let dir = canopy_target_direction(position, center, &volume);
		assert!((dir - Vec3::NEG_X).length() < 1e-5);
	}
}
