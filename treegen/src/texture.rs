use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Deterministic per-element UV perturbation.
///
/// Two independent parts are added to the base UV: a fixed offset drawn from a
/// child RNG forked from the element seed, and a coherent-noise offset computed
/// purely from world position. Forking keeps the caller's RNG stream untouched,
/// so a texture lookup never shifts the surrounding growth sequence. Either
/// part is disabled by setting its strength to zero.
#[derive(Debug, Clone)]
pub struct TextureVariation {
	perlin: Perlin,
	/// Strength of the per-seed fixed offset.
	pub randomness: f32,
	/// Spatial scale of the positional noise offset.
	pub noise_scale: f32,
	/// Strength of the positional noise offset.
	pub noise_strength: f32,
}

impl TextureVariation {
	pub fn new(randomness: f32, noise_scale: f32, noise_strength: f32) -> Self {
		Self { perlin: Perlin::new(0), randomness, noise_scale, noise_strength }
	}

	/// The fixed UV offset associated with `seed`.
	pub fn seed_offset(&self, seed: u64) -> Vec2 {
		let mut rng = StdRng::seed_from_u64(seed);
		Vec2::new(rng.gen::<f32>(), rng.gen::<f32>())
	}

	pub fn apply(&self, base_uv: Vec2, world_position: Vec3, seed: u64) -> Vec2 {
		let mut uv = base_uv;

		if self.randomness > 0.0 {
			uv += self.seed_offset(seed) * self.randomness;
		}

		if self.noise_strength > 0.0 {
			let scale = self.noise_scale as f64;
			let u = self.perlin.get([
				world_position.x as f64 * scale,
				world_position.z as f64 * scale,
			]) as f32;
			let v = self.perlin.get([
				world_position.y as f64 * scale,
				world_position.x as f64 * scale,
			]) as f32;
			uv += Vec2::new(u, v) * 0.5 * self.noise_strength;
		}

		uv
	}
}
