//! lux: progressive path tracer for binary STL models.
//!
//! Usage: lux [--config render.json] [--output out.png] [--smooth] model.stl...

mod scene;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use lux_core::{load_binary_stl, Mesh};
use lux_renderer::{Image, RenderConfig, RenderResult, Renderer};

struct Args {
    models: Vec<PathBuf>,
    config: Option<PathBuf>,
    output: PathBuf,
    smooth: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--config render.json] [--output out.png] [--smooth] input.stl...",
        program
    )
}

fn parse_args(args: &[String]) -> Result<Args> {
    let program = args.first().map(String::as_str).unwrap_or("lux");
    let mut parsed = Args {
        models: Vec::new(),
        config: None,
        output: PathBuf::from("out.png"),
        smooth: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = iter.next().with_context(|| usage(program))?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--output" | "-o" => {
                let value = iter.next().with_context(|| usage(program))?;
                parsed.output = PathBuf::from(value);
            }
            "--smooth" => parsed.smooth = true,
            "--help" | "-h" => bail!(usage(program)),
            flag if flag.starts_with('-') => bail!("Unknown option {}\n{}", flag, usage(program)),
            path => parsed.models.push(PathBuf::from(path)),
        }
    }

    if parsed.models.is_empty() {
        bail!(usage(program));
    }
    Ok(parsed)
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

fn save_checkpoint(image: &Image, path: &Path, config: &RenderConfig) -> RenderResult<()> {
    let is_ppm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));
    if is_ppm {
        image.save_ppm(path, config.exposure, config.gamma)
    } else {
        image.save_png(path, config.exposure, config.gamma)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;
    let config = load_config(args.config.as_deref())?;

    let mut meshes: Vec<Mesh> = Vec::with_capacity(args.models.len());
    for path in &args.models {
        let mesh = load_binary_stl(path).with_context(|| format!("Failed to load {}", path.display()))?;
        log::info!(
            "Loaded {}: {} triangles, {} vertices",
            path.display(),
            mesh.triangle_count(),
            mesh.vertex_count()
        );
        meshes.push(mesh);
    }
    scene::place_models(&mut meshes, config.camera.up, args.smooth);
    let world = scene::studio_scene(&meshes);

    let renderer = Renderer::new(config.clone())?;
    let camera = config.camera();
    let mut image = renderer.new_image();

    let output = args.output;
    let passes = renderer.render_progressive(&world, &camera, &mut image, |image, pass| {
        save_checkpoint(image, &output, &config)?;
        log::info!("Checkpoint {} saved to {}", pass, output.display());
        Ok(())
    })?;

    log::info!("Finished after {} passes", passes);
    Ok(())
}
