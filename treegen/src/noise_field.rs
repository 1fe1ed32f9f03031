use glam::Vec3;
use noise::{NoiseFn, Perlin};

/// A coherent-noise lookup with a fixed frequency and amplitude.
///
/// Growth directions are perturbed by sampling three decorrelated 2D slices of
/// one Perlin instance; the integer `seed_offset` is folded into the sample
/// coordinates so different branches read different slices without reseeding
/// the noise function itself.
#[derive(Debug, Clone)]
pub struct NoiseField {
	perlin: Perlin,
	pub frequency: f32,
	pub amplitude: f32,
}

impl NoiseField {
	pub fn new(frequency: f32, amplitude: f32) -> Self {
		Self { perlin: Perlin::new(0), frequency, amplitude }
	}

	/// Raw 2D sample in [-1, 1].
	pub fn pair(&self, x: f32, y: f32) -> f32 {
		self.perlin.get([x as f64, y as f64]) as f32
	}

	/// Direction-drift vector with components in [-amplitude, amplitude].
	pub fn drift(&self, position: Vec3, seed_offset: i32) -> Vec3 {
		let s = seed_offset as f32;
		let f = self.frequency;
		let x = self.pair(position.y * f + s, position.z * f + s * 2.0);
		let y = self.pair(position.z * f + s * 3.0, position.x * f + s * 4.0);
		let z = self.pair(position.x * f + s * 5.0, position.y * f + s * 6.0);
		Vec3::new(x, y, z) * self.amplitude
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_drift_is_deterministic() {
		let field = NoiseField::new(0.35, 0.2);
		let p = Vec3::new(1.5, 2.0, -0.5);
		assert_eq!(field.drift(p, 13), field.drift(p, 13));
	}

	#[test]
	fn test_drift_varies_with_seed_offset() {
		let field = NoiseField::new(0.35, 0.2);
		let p = Vec3::new(1.5, 2.0, -0.5);
		assert_ne!(field.drift(p, 13), field.drift(p, 44));
	}

	#[test]
	fn test_drift_respects_amplitude() {
		let field = NoiseField::new(0.6, 0.25);
		for i in 0..32 {
			let p = Vec3::new(i as f32 * 0.7, i as f32 * 0.3, -(i as f32));
			let drift = field.drift(p, 31);
			assert!(drift.x.abs() <= 0.25 + 1e-6);
			assert!(drift.y.abs() <= 0.25 + 1e-6);
			assert!(drift.z.abs() <= 0.25 + 1e-6);
		}
	}

	#[test]
	fn test_zero_amplitude_silences_field() {
		let field = NoiseField::new(0.6, 0.0);
		assert_eq!(field.drift(Vec3::new(3.0, 1.0, 2.0), 7), Vec3::ZERO);
	}
}
