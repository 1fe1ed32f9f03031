use glam::Vec3;

/// One cross-section of a branch: where the branch passes and how thick it is there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchPoint {
	pub position: Vec3,
	pub radius: f32,
}

impl BranchPoint {
	pub fn new(position: Vec3, radius: f32) -> Self {
		Self { position, radius }
	}
}

/// An ordered run of cross-sections from attachment point to tip.
///
/// A branch is only meaningful with at least two points; shorter branches are
/// silently skipped by every consumer rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct Branch {
	points: Vec<BranchPoint>,
}

impl Branch {
	pub fn new(points: Vec<BranchPoint>) -> Self {
		Self { points }
	}

	pub fn points(&self) -> &[BranchPoint] {
		&self.points
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	/// Whether the branch has enough points to form at least one segment.
	pub fn is_degenerate(&self) -> bool {
		self.points.len() < 2
	}

	pub fn tip(&self) -> Option<&BranchPoint> {
		self.points.last()
	}

	/// Direction of the final segment, i.e. the way the branch is heading at its tip.
	pub fn tip_direction(&self) -> Option<Vec3> {
		if self.points.len() < 2 {
			return None;
		}
		let last = self.points[self.points.len() - 1].position;
		let prev = self.points[self.points.len() - 2].position;
		let dir = last - prev;
		if dir.length_squared() < 1e-8 {
			None
		} else {
			Some(dir.normalize())
		}
	}

	/// Samples the cross-section closest to parametric position `t` in [0, 1],
	/// together with the local growth direction at that point.
	pub fn sample(&self, t: f32) -> Option<(BranchPoint, Vec3)> {
		if self.points.is_empty() {
			return None;
		}
		let count = self.points.len();
		let index = ((t * (count - 1) as f32).round() as usize).min(count - 1);
		let next = (index + 1).min(count - 1);
		let prev = index.saturating_sub(1);

		let direction = if next != index {
			(self.points[next].position - self.points[index].position).normalize_or_zero()
		} else {
			(self.points[index].position - self.points[prev].position).normalize_or_zero()
		};
		Some((self.points[index], direction))
	}
}

/// The full set of branches for one tree, trunk first, descendants in
/// generation order. Produced by a growth strategy and consumed by both mesh
/// builders; never persisted.
#[derive(Debug, Clone, Default)]
pub struct Forest {
	branches: Vec<Branch>,
}

impl Forest {
	pub fn new() -> Self {
		Self { branches: Vec::new() }
	}

	pub fn push(&mut self, branch: Branch) {
		self.branches.push(branch);
	}

	pub fn branches(&self) -> &[Branch] {
		&self.branches
	}

	pub fn len(&self) -> usize {
		self.branches.len()
	}

	pub fn is_empty(&self) -> bool {
		self.branches.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Branch> {
		self.branches.iter()
	}

	/// Vertical extent of all branch points as `(min_y, max_y, range)`.
	///
	/// The range is clamped away from zero so height fractions stay finite
	/// when every point shares one height.
	pub fn height_range(&self) -> (f32, f32, f32) {
		let mut min_y = f32::INFINITY;
		let mut max_y = f32::NEG_INFINITY;
		for branch in &self.branches {
			for point in branch.points() {
				min_y = min_y.min(point.position.y);
				max_y = max_y.max(point.position.y);
			}
		}
		let range = (max_y - min_y).max(1e-4);
		(min_y, max_y, range)
	}
}

impl<'a> IntoIterator for &'a Forest {
	type Item = &'a Branch;
	type IntoIter = std::slice::Iter<'a, Branch>;

	fn into_iter(self) -> Self::IntoIter {
		self.branches.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn straight_branch(count: usize) -> Branch {
		let points = (0..count)
			.map(|i| BranchPoint::new(Vec3::new(0.0, i as f32, 0.0), 0.5))
			.collect();
		Branch::new(points)
	}

	#[test]
	fn test_tip_direction_follows_last_segment() {
		let branch = Branch::new(vec![
			BranchPoint::new(Vec3::ZERO, 0.5),
			BranchPoint::new(Vec3::new(0.0, 1.0, 0.0), 0.4),
			BranchPoint::new(Vec3::new(1.0, 1.0, 0.0), 0.3),
		]);
		let dir = branch.tip_direction().unwrap();
		assert!((dir - Vec3::X).length() < 1e-6);
	}

	#[test]
	fn test_degenerate_branch_has_no_tip_direction() {
		let branch = straight_branch(1);
		assert!(branch.is_degenerate());
		assert!(branch.tip_direction().is_none());
	}

	#[test]
	fn test_sample_clamps_to_ends() {
		let branch = straight_branch(5);
		let (start, _) = branch.sample(0.0).unwrap();
		let (end, _) = branch.sample(1.0).unwrap();
		assert_eq!(start.position.y, 0.0);
		assert_eq!(end.position.y, 4.0);
	}

	#[test]
	fn test_height_range_clamps_flat_forests() {
		let mut forest = Forest::new();
		forest.push(Branch::new(vec![
			BranchPoint::new(Vec3::ZERO, 0.5),
			BranchPoint::new(Vec3::new(1.0, 0.0, 0.0), 0.4),
		]));
		let (min_y, max_y, range) = forest.height_range();
		assert_eq!(min_y, 0.0);
		assert_eq!(max_y, 0.0);
		assert!(range >= 1e-4);
	}
}
