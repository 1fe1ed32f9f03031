pub mod guided;
pub mod lsystem;

pub use guided::GuidedGrowth;
pub use lsystem::LSystemGrowth;

use crate::config::GrowthConfig;
use crate::forest::Forest;
use crate::mesh::MeshBuffers;
use rand::rngs::StdRng;

/// A branch skeleton generator.
///
/// Strategies emit the forest and feed every finished branch through the tube
/// builder as they go, so one pass produces both the skeleton and the bark
/// buffers. Both implementations emit identical forest shapes; downstream
/// consumers never know which one ran.
pub trait GrowthStrategy {
	fn grow(&self, config: &GrowthConfig, rng: &mut StdRng, bark: &mut MeshBuffers) -> Forest;
}
