//! Surface angle measurement driver
//!
//! Builds a scene from an OBJ file (or a demo floor with a block), clicks
//! the given world points through the measurement session and prints the
//! resulting angle.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec3;
use sa_core::primitive::{generate_box_mesh, generate_plane_mesh};
use sa_core::{CategoryMask, Frame, MeshScene, Viewpoint, load_obj};
use sa_session::{FrameOutput, InputEvent, MeasurementConfig, MeasurementSession};

#[derive(Parser, Debug)]
#[command(author, version, about = "Measure the angle between three points on a mesh", long_about = None)]
struct Args {
    /// Measurement settings (RON). Defaults are used when missing
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// OBJ mesh to measure on; a demo scene is used if omitted
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Uniform scale applied to the OBJ mesh
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// World point to click, as `x,y,z`. Give up to three, in A, B, C order
    #[arg(short, long = "point", value_parser = parse_vec3)]
    points: Vec<Vec3>,

    /// Viewpoint position, as `x,y,z`
    #[arg(long, value_parser = parse_vec3, default_value = "0,6,4")]
    eye: Vec3,

    /// Point the viewpoint looks at, as `x,y,z`
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
    target: Vec3,

    /// Snap clicks to the nearest mesh vertex
    #[arg(long)]
    snap: bool,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got '{s}'"));
    };
    let parse = |v: &str| {
        v.parse::<f32>()
            .map_err(|e| format!("invalid component '{v}': {e}"))
    };
    Ok(Vec3::new(parse(*x)?, parse(*y)?, parse(*z)?))
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sa_cli=info,sa_session=info,sa_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => MeasurementConfig::load_or_default(path),
        None => MeasurementConfig::default(),
    };
    if args.snap {
        config.vertex_snap = true;
    }

    if let Some(path) = &args.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        println!("Wrote settings to {}", path.display());
        return Ok(());
    }

    if args.points.len() > 3 {
        bail!("At most three points can be measured, got {}", args.points.len());
    }

    if args.eye.distance_squared(args.target) <= f32::EPSILON {
        bail!("Viewpoint position and target must differ, both are {}", args.eye);
    }

    let scene = build_scene(&args)?;
    let view = Viewpoint::new(args.eye, args.target, config.up_axis.vector());
    let mut session = MeasurementSession::new(config);

    for point in &args.points {
        let Some(pixel) = view.world_to_screen(*point) else {
            bail!("Point {point} is behind the viewpoint");
        };
        tracing::debug!(%point, ?pixel, "Clicking");
        session.handle_events([InputEvent::PointerDown { pixel }, InputEvent::PointerUp]);
        session.tick(&scene, &view);
    }

    println!("{}", session.status_text());
    report(session.output());
    Ok(())
}

fn build_scene(args: &Args) -> Result<MeshScene> {
    let mut scene = MeshScene::new();
    match &args.mesh {
        Some(path) => {
            let mesh = load_obj(path, args.scale)
                .with_context(|| format!("Failed to load mesh {}", path.display()))?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "mesh".to_string());
            scene.add_surface(name, mesh, Frame::IDENTITY, CategoryMask::DEFAULT);
        }
        None => {
            scene.add_surface(
                "floor",
                generate_plane_mesh(10.0, 10),
                Frame::IDENTITY,
                CategoryMask::DEFAULT,
            );
            scene.add_surface(
                "block",
                generate_box_mesh(Vec3::ONE),
                Frame::from_translation(Vec3::new(0.0, 0.5, 0.0)),
                CategoryMask::DEFAULT,
            );
        }
    }
    tracing::info!(surfaces = scene.len(), "Scene ready");
    Ok(scene)
}

fn report(output: &FrameOutput) {
    if let Some(reason) = output.degenerate {
        println!("No angle: {reason}");
        return;
    }
    if !output.has_measurement() {
        return;
    }

    match (&output.label, output.angle_degrees) {
        (Some(label), _) => println!("Angle: {}", label.text),
        (None, Some(degrees)) => println!("Angle: {degrees:.1}°"),
        (None, None) => {}
    }
    for (name, line) in ["B→A", "B→C"].iter().zip(&output.lines) {
        println!(
            "  {name}: {} samples, {} on a surface",
            line.len(),
            line.projected
        );
    }
    if let Some(arc) = &output.arc {
        println!(
            "  arc: {} vertices, {} triangles",
            arc.vertices.len(),
            arc.triangle_count()
        );
    }
}
