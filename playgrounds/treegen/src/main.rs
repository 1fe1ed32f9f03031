mod obj;

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use treegen::{generate, presets, GrowthConfig};

/// Generates a tree and writes its bark and foliage meshes as OBJ files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Named preset to start from (oak, pine, palm, willow).
	#[arg(long, conflicts_with = "config")]
	preset: Option<String>,

	/// JSON growth configuration to load instead of a preset.
	#[arg(long)]
	config: Option<PathBuf>,

	/// Override the configuration's random seed (nonzero = reproducible).
	#[arg(long)]
	seed: Option<u64>,

	/// Output path stem; `<stem>_bark.obj` and `<stem>_leaves.obj` are written.
	#[arg(long, default_value = "tree")]
	out: String,
}

fn load_config(args: &Args) -> anyhow::Result<GrowthConfig> {
	if let Some(path) = &args.config {
		let text = fs::read_to_string(path)
			.with_context(|| format!("reading config {}", path.display()))?;
		return serde_json::from_str(&text)
			.with_context(|| format!("parsing config {}", path.display()));
	}

	let name = args.preset.as_deref().unwrap_or("oak");
	match presets::by_name(name) {
		Some(config) => Ok(config),
		None => bail!("unknown preset {name:?}, expected one of {:?}", presets::PRESET_NAMES),
	}
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let mut config = load_config(&args)?;
	if let Some(seed) = args.seed {
		config.random_seed = seed;
	}
	config.validate().context("invalid growth configuration")?;

	let tree = generate(&config);

	let bark_path = PathBuf::from(format!("{}_bark.obj", args.out));
	obj::write_obj(&bark_path, "bark", &tree.bark)?;
	println!(
		"{}: {} vertices, {} triangles",
		bark_path.display(),
		tree.bark.vertices.len(),
		tree.bark.triangle_count()
	);

	let leaves_path = PathBuf::from(format!("{}_leaves.obj", args.out));
	if tree.foliage.is_empty() {
		println!("{}: no foliage generated, skipped", leaves_path.display());
	} else {
		obj::write_obj(&leaves_path, "leaves", &tree.foliage)?;
		println!(
			"{}: {} vertices, {} triangles",
			leaves_path.display(),
			tree.foliage.vertices.len(),
			tree.foliage.triangle_count()
		);
	}

	println!("forest: {} branches", tree.forest.len());
	Ok(())
}
