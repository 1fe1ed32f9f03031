use glam::{IVec3, Vec3};
use std::collections::HashMap;

/// Uniform-grid index over a fixed point set for radius-bounded neighbor
/// counting.
///
/// Cell size equals the query radius, so any neighbor within the radius lives
/// in the 3x3x3 block of cells around the query point. Built once per foliage
/// pass and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SpatialHash {
	cell_size: f32,
	cells: HashMap<IVec3, Vec<usize>>,
}

impl SpatialHash {
	pub fn build(points: &[Vec3], cell_size: f32) -> Self {
		let cell_size = cell_size.max(1e-4);
		let mut cells: HashMap<IVec3, Vec<usize>> = HashMap::new();
		for (index, point) in points.iter().enumerate() {
			cells.entry(cell_of(*point, cell_size)).or_default().push(index);
		}
		Self { cell_size, cells }
	}

	pub fn cell_size(&self) -> f32 {
		self.cell_size
	}

	/// Counts indexed points strictly within `radius` of `position`.
	///
	/// When `position` itself is one of the indexed points it is included in
	/// the count (distance zero).
	pub fn count_within(&self, points: &[Vec3], position: Vec3, radius: f32) -> usize {
		let radius_sqr = radius * radius;
		let base = cell_of(position, self.cell_size);
		let mut count = 0;
		for x in -1..=1 {
			for y in -1..=1 {
				for z in -1..=1 {
					let Some(bucket) = self.cells.get(&(base + IVec3::new(x, y, z))) else {
						continue;
					};
					for &index in bucket {
						if (position - points[index]).length_squared() < radius_sqr {
							count += 1;
						}
					}
				}
			}
		}
		count
	}
}

fn cell_of(position: Vec3, cell_size: f32) -> IVec3 {
	IVec3::new(
		(position.x / cell_size).floor() as i32,
		(position.y / cell_size).floor() as i32,
		(position.z / cell_size).floor() as i32,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn brute_force_count(points: &[Vec3], position: Vec3, radius: f32) -> usize {
		points
			.iter()
			.filter(|p| (position - **p).length_squared() < radius * radius)
			.count()
	}

	#[test]
	fn test_counts_match_brute_force() {
		let points: Vec<Vec3> = (0..64)
			.map(|i| {
				let f = i as f32;
				Vec3::new((f * 0.37).sin() * 4.0, (f * 0.61).cos() * 4.0, (f * 0.19).sin() * 4.0)
			})
			.collect();
		let radius = 1.5;
		let hash = SpatialHash::build(&points, radius);
		for &p in &points {
			assert_eq!(hash.count_within(&points, p, radius), brute_force_count(&points, p, radius));
		}
	}

	#[test]
	fn test_neighbor_symmetry() {
		let points =
			vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.9, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)];
		let radius = 1.0;
		let hash = SpatialHash::build(&points, radius);
		for (i, &a) in points.iter().enumerate() {
			for (j, &b) in points.iter().enumerate() {
				if i == j {
					continue;
				}
				let a_sees_b = (a - b).length_squared() < radius * radius;
				// count_within includes the query point itself, so subtract it
				// when comparing pairwise visibility in both directions.
				let from_a = hash.count_within(&points, a, radius);
				let from_b = hash.count_within(&points, b, radius);
				if a_sees_b {
					assert!(from_a >= 2);
					assert!(from_b >= 2);
				}
			}
		}
	}

	#[test]
	fn test_zero_cell_size_is_clamped() {
		let points = vec![Vec3::ZERO];
		let hash = SpatialHash::build(&points, 0.0);
		assert!(hash.cell_size() > 0.0);
	}
}
