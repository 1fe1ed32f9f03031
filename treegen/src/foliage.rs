pub mod clusters;
pub mod domes;
pub mod planes;
pub mod shell;

pub use clusters::ClusterLeaves;
pub use domes::DomeLeaves;
pub use planes::PlaneLeaves;

use crate::config::{GrowthConfig, LeafParams};
use crate::forest::Forest;
use crate::math::{clamp01, lerp, uniform};
use crate::mesh::MeshBuffers;
use crate::spatial::SpatialHash;
use glam::{Vec3, Vec4};
use rand::rngs::StdRng;

/// Neighbor queries around candidate endpoints use this multiple of the
/// element radius as both the query radius and the hash cell size.
pub(crate) const PROXIMITY_RADIUS_MULTIPLIER: f32 = 3.0;
/// Spreads per-element shell seeds apart so adjacent elements never share a
/// noise slice.
pub(crate) const SHELL_SEED_MULTIPLIER: u64 = 7919;

/// A foliage placement strategy. Consumes the forest read-only and appends to
/// the foliage buffers; degenerate input produces nothing rather than failing.
pub trait FoliageStrategy {
	fn place(
		&self,
		config: &GrowthConfig,
		forest: &Forest,
		rng: &mut StdRng,
		buffers: &mut MeshBuffers,
	);
}

/// Collects one candidate endpoint per qualifying branch: the tip, inset
/// slightly backward along the final direction and pushed forward by the
/// mode-specific offset.
pub(crate) fn collect_endpoints(
	forest: &Forest,
	leaves: &LeafParams,
	min_y: f32,
	height_range: f32,
	tip_inset: f32,
	tip_offset: f32,
) -> Vec<Vec3> {
	let mut endpoints = Vec::new();
	for branch in forest {
		if branch.is_degenerate() {
			continue;
		}
		let Some(tip) = branch.tip() else {
			continue;
		};
		let tip_height = (tip.position.y - min_y) / height_range;
		if tip_height < leaves.start_height || tip.radius < leaves.min_branch_radius {
			continue;
		}
		let Some(direction) = branch.tip_direction() else {
			continue;
		};
		endpoints.push(tip.position - direction * tip_inset + direction * tip_offset);
	}
	endpoints
}

/// Ranks endpoints by local density, ascending, and keeps the first
/// `target_count`. Isolated tips come first so no branch tip is left bare
/// when the target count is smaller than the candidate set.
pub(crate) fn build_leaf_targets(
	endpoints: &[Vec3],
	proximity_radius: f32,
	target_count: usize,
) -> Vec<(Vec3, usize)> {
	if endpoints.is_empty() || target_count == 0 {
		return Vec::new();
	}

	let hash = SpatialHash::build(endpoints, proximity_radius);
	let mut data: Vec<(Vec3, usize)> = endpoints
		.iter()
		.map(|&pos| (pos, hash.count_within(endpoints, pos, proximity_radius)))
		.collect();
	data.sort_by_key(|&(_, count)| count);
	data.truncate(target_count.min(data.len()));
	data
}

pub(crate) fn tree_center(positions: &[Vec3]) -> Vec3 {
	if positions.is_empty() {
		return Vec3::ZERO;
	}
	positions.iter().copied().sum::<Vec3>() / positions.len() as f32
}

pub(crate) fn max_distance_from_center(positions: &[(Vec3, usize)], center: Vec3) -> f32 {
	positions
		.iter()
		.map(|&(pos, _)| center.distance(pos))
		.fold(0.0, f32::max)
}

/// Size multiplier for one cluster or dome.
///
/// Blends a density signal (more neighbors, larger element, saturating at the
/// configured ceiling) with a center-distance signal (farther out, smaller),
/// then perturbs the result by a small uniform factor. Isolated tips get a
/// mid-range size so they still read as covered.
pub(crate) fn element_size_multiplier(
	rng: &mut StdRng,
	leaves: &LeafParams,
	size_min: f32,
	size_max: f32,
	position: Vec3,
	nearby_count: usize,
	center: Vec3,
	max_distance: f32,
) -> f32 {
	let min_isolated = (size_min + size_max) * 0.5;
	let ceiling = leaves.proximity_count_ceiling.max(3) as f32;
	let proximity_size = if nearby_count <= 2 {
		min_isolated
	} else {
		lerp(min_isolated, size_max, clamp01((nearby_count as f32 - 2.0) / (ceiling - 2.0)))
	};

	let distance_t =
		if max_distance > 0.0 { center.distance(position) / max_distance } else { 0.0 };
	let center_distance_size = lerp(size_max, size_min, distance_t);

	let size = lerp(center_distance_size, proximity_size, leaves.proximity_size_weight);
	size * uniform(rng, 1.0 - leaves.size_jitter, 1.0 + leaves.size_jitter)
}

pub(crate) fn leaf_color(alpha: f32) -> Vec4 {
	Vec4::new(1.0, 1.0, 1.0, alpha)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::forest::{Branch, BranchPoint};
	use rand::SeedableRng;

	fn forest_with_tips(tips: &[Vec3]) -> Forest {
		let mut forest = Forest::new();
		for &tip in tips {
			forest.push(Branch::new(vec![
				BranchPoint::new(tip - Vec3::Y, 0.3),
				BranchPoint::new(tip, 0.2),
			]));
		}
		forest
	}

	#[test]
	fn test_every_qualifying_tip_becomes_a_candidate() {
		let tips: Vec<Vec3> =
			(0..10).map(|i| Vec3::new(i as f32, 5.0 + i as f32 * 0.1, 0.0)).collect();
		let forest = forest_with_tips(&tips);
		let (min_y, _, range) = forest.height_range();

		let mut leaves = LeafParams::default();
		leaves.start_height = 0.0;
		leaves.min_branch_radius = 0.0;

		let endpoints = collect_endpoints(&forest, &leaves, min_y, range, 0.0, 0.0);
		assert_eq!(endpoints.len(), tips.len());
	}

	#[test]
	fn test_height_and_radius_gates_filter_candidates() {
		let mut forest = Forest::new();
		// Tall and thick: qualifies.
		forest.push(Branch::new(vec![
			BranchPoint::new(Vec3::new(0.0, 9.0, 0.0), 0.3),
			BranchPoint::new(Vec3::new(0.0, 10.0, 0.0), 0.2),
		]));
		// Too low.
		forest.push(Branch::new(vec![
			BranchPoint::new(Vec3::ZERO, 0.3),
			BranchPoint::new(Vec3::new(0.0, 1.0, 0.0), 0.2),
		]));
		// Too thin.
		forest.push(Branch::new(vec![
			BranchPoint::new(Vec3::new(1.0, 9.0, 0.0), 0.3),
			BranchPoint::new(Vec3::new(1.0, 10.0, 0.0), 0.01),
		]));

		let (min_y, _, range) = forest.height_range();
		let mut leaves = LeafParams::default();
		leaves.start_height = 0.5;
		leaves.min_branch_radius = 0.05;

		let endpoints = collect_endpoints(&forest, &leaves, min_y, range, 0.0, 0.0);
		assert_eq!(endpoints.len(), 1);
	}

	#[test]
	fn test_targets_prefer_isolated_endpoints() {
		// A tight pack of endpoints plus two far-away loners: the loners must
		// be serviced first.
		let mut endpoints: Vec<Vec3> =
			(0..8).map(|i| Vec3::new(i as f32 * 0.1, 0.0, 0.0)).collect();
		endpoints.push(Vec3::new(50.0, 0.0, 0.0));
		endpoints.push(Vec3::new(-50.0, 0.0, 0.0));

		let targets = build_leaf_targets(&endpoints, 1.0, 2);
		assert_eq!(targets.len(), 2);
		for (pos, count) in &targets {
			assert!(pos.x.abs() > 10.0);
			assert_eq!(*count, 1);
		}
	}

	#[test]
	fn test_target_count_truncates() {
		let endpoints: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
		assert_eq!(build_leaf_targets(&endpoints, 0.5, 3).len(), 3);
		assert_eq!(build_leaf_targets(&endpoints, 0.5, 99).len(), 10);
		assert!(build_leaf_targets(&endpoints, 0.5, 0).is_empty());
	}

	#[test]
	fn test_size_multiplier_shrinks_with_distance() {
		let mut leaves = LeafParams::default();
		leaves.size_jitter = 0.0;
		leaves.proximity_size_weight = 0.0;
		let mut rng = StdRng::seed_from_u64(1);
		let center = Vec3::ZERO;
		let near =
			element_size_multiplier(&mut rng, &leaves, 0.8, 1.2, Vec3::ZERO, 1, center, 10.0);
		let far = element_size_multiplier(
			&mut rng,
			&leaves,
			0.8,
			1.2,
			Vec3::new(10.0, 0.0, 0.0),
			1,
			center,
			10.0,
		);
		assert!(near > far);
		assert!((near - 1.2).abs() < 1e-6);
		assert!((far - 0.8).abs() < 1e-6);
	}

	#[test]
	fn test_size_multiplier_saturates_at_ceiling() {
		let mut leaves = LeafParams::default();
		leaves.size_jitter = 0.0;
		leaves.proximity_size_weight = 1.0;
		leaves.proximity_count_ceiling = 8;
		let mut rng = StdRng::seed_from_u64(1);
		let at_ceiling =
			element_size_multiplier(&mut rng, &leaves, 0.8, 1.2, Vec3::ZERO, 8, Vec3::ZERO, 0.0);
		let beyond =
			element_size_multiplier(&mut rng, &leaves, 0.8, 1.2, Vec3::ZERO, 20, Vec3::ZERO, 0.0);
		assert!((at_ceiling - 1.2).abs() < 1e-6);
		assert!((beyond - 1.2).abs() < 1e-6);
	}
}
