use crate::config::{GrowthConfig, LeafMode, StructureMode};
use crate::foliage::{ClusterLeaves, DomeLeaves, FoliageStrategy, PlaneLeaves};
use crate::forest::Forest;
use crate::growth::{GrowthStrategy, GuidedGrowth, LSystemGrowth};
use crate::mesh::MeshBuffers;
use rand::{rngs::StdRng, SeedableRng};

/// Everything one generation call produces: renderable bark and foliage
/// buffers plus the branch skeleton for inspection.
#[derive(Debug, Clone)]
pub struct GeneratedTree {
	pub bark: MeshBuffers,
	pub foliage: MeshBuffers,
	pub forest: Forest,
}

/// Generates one tree from the configuration.
///
/// Pure call-and-return: no background work, no I/O, no failure mode beyond
/// empty buffers for degenerate input. A nonzero `random_seed` makes the whole
/// pass bit-for-bit reproducible; seed zero draws ambient entropy instead.
pub fn generate(config: &GrowthConfig) -> GeneratedTree {
	let mut rng = match config.random_seed {
		0 => StdRng::from_entropy(),
		seed => StdRng::seed_from_u64(seed),
	};
	generate_with(config, &mut rng)
}

/// Generation with a caller-owned RNG stream.
pub fn generate_with(config: &GrowthConfig, rng: &mut StdRng) -> GeneratedTree {
	let mut bark = MeshBuffers::new();
	let forest = match config.structure.mode {
		StructureMode::LSystem => LSystemGrowth.grow(config, rng, &mut bark),
		StructureMode::GuidedGrowth => GuidedGrowth.grow(config, rng, &mut bark),
	};

	let mut foliage = MeshBuffers::with_colors();
	match config.leaves.mode {
		LeafMode::Planes => PlaneLeaves.place(config, &forest, rng, &mut foliage),
		LeafMode::Clusters => ClusterLeaves.place(config, &forest, rng, &mut foliage),
		LeafMode::Domes => DomeLeaves.place(config, &forest, rng, &mut foliage),
	}

	log::debug!(
		"generated tree: {} branches, {} bark triangles, {} foliage triangles",
		forest.len(),
		bark.triangle_count(),
		foliage.triangle_count()
	);
	GeneratedTree { bark, foliage, forest }
}
