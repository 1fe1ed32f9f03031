use super::GrowthStrategy;
use crate::config::{GrammarParams, GrowthConfig};
use crate::forest::{Branch, BranchPoint, Forest};
use crate::math::uniform;
use crate::mesh::MeshBuffers;
use crate::tube::TubeBuilder;
use glam::{Quat, Vec3};
use rand::rngs::StdRng;

/// Grammar-driven growth: a seed string is stochastically rewritten for a
/// fixed number of passes, then interpreted as turtle commands.
///
/// Alphabet: `F` advances one segment, `B` is a structurally inert branch
/// marker consumed by expansion, `[`/`]` push and pop turtle state, `l`/`r`
/// are randomized rotation markers.
pub struct LSystemGrowth;

#[derive(Clone, Copy)]
struct Turtle {
	position: Vec3,
	rotation: Quat,
}

/// Cross-sections accumulated for the branch currently being walked.
struct PendingBranch {
	points: Vec<BranchPoint>,
	radius: f32,
	/// The next `F` is the first segment after a push and takes the extra
	/// child-thickness factor.
	first_segment: bool,
	/// Parent's advance direction at the push, used for the tube blend ring.
	connection: Option<Vec3>,
	last_advance: Vec3,
}

impl LSystemGrowth {
	/// Expands the axiom according to the stochastic rewrite rules.
	///
	/// `F` doubles with `growth_probability` percent chance; `B` picks one of
	/// the two branch patterns with `branch_probability` percent chance; every
	/// other character passes through unchanged.
	pub fn expand(params: &GrammarParams, rng: &mut StdRng) -> String {
		let mut expanded = params.axiom.clone();
		for _ in 0..params.iterations {
			let mut next = String::with_capacity(expanded.len() * 2);
			for character in expanded.chars() {
				match character {
					'F' => {
						if uniform(rng, 0.0, 100.0) < params.growth_probability {
							next.push_str("FF");
						} else {
							next.push('F');
						}
					}
					'B' => {
						if uniform(rng, 0.0, 100.0) < params.branch_probability {
							next.push_str("[lFB][rrFB]");
						} else {
							next.push_str("[llFB][rFB]");
						}
					}
					other => next.push(other),
				}
			}
			expanded = next;
		}
		expanded
	}
}

impl GrowthStrategy for LSystemGrowth {
	fn grow(&self, config: &GrowthConfig, rng: &mut StdRng, bark: &mut MeshBuffers) -> Forest {
		let grammar = &config.grammar;
		let thickness = &config.thickness;
		let segment_length = config.structure.segment_length;
		let branch_cap = config.branching.max_generated_branches as usize;
		let tube = TubeBuilder::from_config(config);

		let expanded = Self::expand(grammar, rng);

		let mut turtle = Turtle { position: Vec3::ZERO, rotation: Quat::IDENTITY };
		let mut turtle_stack: Vec<Turtle> = Vec::new();
		let mut branch_stack: Vec<PendingBranch> = Vec::new();
		let mut current = PendingBranch {
			points: vec![BranchPoint::new(Vec3::ZERO, thickness.base_thickness)],
			radius: thickness.base_thickness,
			first_segment: false,
			connection: None,
			last_advance: Vec3::Y,
		};
		// Children emitted during the walk; the trunk closes after it.
		let mut children: Vec<Branch> = Vec::new();

		for instruction in expanded.chars() {
			match instruction {
				'F' => {
					let direction = turtle.rotation * Vec3::Y;
					turtle.position += direction * segment_length;

					let mut radius = current.radius * thickness.thinning_rate;
					if current.first_segment {
						radius *= thickness.child_thickness;
						current.first_segment = false;
					}
					current.radius = radius;
					current.last_advance = direction;
					current.points.push(BranchPoint::new(turtle.position, radius));
				}
				'[' => {
					turtle_stack.push(turtle);
					let connection = current.last_advance;
					let seed_point = BranchPoint::new(turtle.position, current.radius);
					let parent = std::mem::replace(
						&mut current,
						PendingBranch {
							radius: seed_point.radius,
							points: vec![seed_point],
							first_segment: true,
							connection: Some(connection),
							last_advance: connection,
						},
					);
					branch_stack.push(parent);
				}
				']' => {
					let Some(saved) = turtle_stack.pop() else {
						continue;
					};
					turtle = saved;
					let Some(parent) = branch_stack.pop() else {
						continue;
					};
					let finished = std::mem::replace(&mut current, parent);

					let cap_reached = branch_cap > 0 && children.len() + 1 >= branch_cap;
					if finished.points.len() >= 2 && !cap_reached {
						let branch = Branch::new(finished.points);
						let branch_seed = children.len() as u64 + 1;
						tube.extrude(bark, &branch, finished.connection, branch_seed);
						children.push(branch);
					}
				}
				'l' => {
					let pitch = uniform(rng, grammar.angle_x_min, grammar.angle_x_max);
					let yaw = uniform(rng, grammar.angle_y_min, grammar.angle_y_max);
					turtle.rotation *= Quat::from_axis_angle(Vec3::NEG_Z, pitch.to_radians());
					turtle.rotation *= Quat::from_axis_angle(Vec3::Y, yaw.to_radians());
				}
				'r' => {
					let pitch = uniform(rng, grammar.angle_y_min, grammar.angle_y_max);
					let yaw = uniform(rng, grammar.angle_y_min, grammar.angle_y_max);
					turtle.rotation *= Quat::from_axis_angle(Vec3::Z, pitch.to_radians());
					turtle.rotation *= Quat::from_axis_angle(Vec3::Y, yaw.to_radians());
				}
				_ => {}
			}
		}

		// The trunk is the outermost branch, never closed by `]`.
		let mut forest = Forest::new();
		if current.points.len() >= 2 {
			let trunk = Branch::new(current.points);
			tube.extrude(bark, &trunk, None, 0);
			forest.push(trunk);
		}
		for child in children {
			forest.push(child);
		}

		log::debug!(
			"grammar walk over {} instructions emitted {} branches",
			expanded.len(),
			forest.len()
		);
		forest
	}
}
