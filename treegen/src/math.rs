use glam::{Mat3, Quat, Vec3};
use rand::{rngs::StdRng, Rng};

/// A unit vector perpendicular to `direction`, preferring the horizontal plane.
pub fn perpendicular(direction: Vec3) -> Vec3 {
	let perp = direction.cross(Vec3::Y);
	if perp.length_squared() < 1e-8 {
		direction.cross(Vec3::X).normalize()
	} else {
		perp.normalize()
	}
}

/// Rotation whose local +Z looks along `forward` with +Y matched to `up` as
/// closely as possible.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
	let f = forward.normalize_or_zero();
	if f == Vec3::ZERO {
		return Quat::IDENTITY;
	}
	let mut right = up.cross(f);
	if right.length_squared() < 1e-8 {
		right = perpendicular(f);
	}
	let right = right.normalize();
	let real_up = f.cross(right);
	Quat::from_mat3(&Mat3::from_cols(right, real_up, f))
}

/// Rotates `vector` around `axis` by `angle_degrees`.
pub fn rotate_around_axis(vector: Vec3, axis: Vec3, angle_degrees: f32) -> Vec3 {
	Quat::from_axis_angle(axis, angle_degrees.to_radians()) * vector
}

pub fn clamp01(value: f32) -> f32 {
	value.clamp(0.0, 1.0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
	a + (b - a) * t
}

/// Where `value` sits between `a` and `b`, unclamped, 0 when the ends coincide.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
	if (b - a).abs() < 1e-8 {
		0.0
	} else {
		(value - a) / (b - a)
	}
}

/// Uniform draw from `[min, max)`, tolerating an empty or inverted range.
pub fn uniform(rng: &mut StdRng, min: f32, max: f32) -> f32 {
	if min >= max {
		min
	} else {
		rng.gen_range(min..max)
	}
}
