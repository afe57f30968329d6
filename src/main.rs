use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use sphere_tracer::vector::{ Vector3, Color };
use sphere_tracer::sphere::Sphere;
use sphere_tracer::world::World;
use sphere_tracer::camera::Camera;
use sphere_tracer::scene::Scene;
use sphere_tracer::parallel::parallel_render;
use sphere_tracer::consts::{
    NUM_THREADS, CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_OF_VIEW
};

/// Renders a scene of spheres to a PPM image.
#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// A JSON scene description; a built-in scene is rendered when omitted
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Where to write the rendered image
    #[clap(short, long, default_value = "./out.ppm")]
    out: PathBuf,

    /// How many render threads to use
    #[clap(short, long)]
    threads: Option<usize>,
}

/// The built-in scene: a gray ground sphere, a red glassy sphere flanked by
/// three mirrored ones, and a single emissive sphere overhead.
fn default_scene() -> Scene {
    let ground = Sphere::new(Vector3::new(0.0, -10004.0, -20.0), 10000.0,
        Color::new(0.20, 0.20, 0.20));

    let mut middle = Sphere::new(Vector3::new(0.0, 0.0, -20.0), 4.0,
        Color::new(1.00, 0.32, 0.36));
    middle.reflectivity = 1.0;
    middle.transparency = 0.5;

    let mut right = Sphere::new(Vector3::new(5.0, -1.0, -15.0), 2.0,
        Color::new(0.90, 0.76, 0.46));
    right.reflectivity = 1.0;

    let mut back = Sphere::new(Vector3::new(5.0, 0.0, -25.0), 3.0,
        Color::new(0.65, 0.77, 0.97));
    back.reflectivity = 1.0;

    let mut left = Sphere::new(Vector3::new(-5.5, 0.0, -15.0), 3.0,
        Color::new(0.90, 0.90, 0.90));
    left.reflectivity = 1.0;

    let mut light = Sphere::new(Vector3::new(0.0, 20.0, -30.0), 3.0,
        Color::zero());
    light.emission_color = Color::new(3.0, 3.0, 3.0);

    let world = World::new(vec![ground, middle, right, back, left, light]);
    let camera = Camera::new(CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_OF_VIEW);

    Scene { world, camera }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let scene = match args.scene {
        Some(ref path) => Scene::load(path)?,
        None => default_scene(),
    };

    let Scene { world, camera } = scene;
    log::info!("rendering a {}x{} image of {} spheres",
        camera.width, camera.height, world.spheres.len());

    let threads = args.threads.unwrap_or(NUM_THREADS);
    let canvas = if threads > 1 {
        parallel_render(world, camera, threads)
    } else {
        camera.render(&world)
    };

    canvas.save(&args.out)?;
    log::info!("saved render to {}", args.out.display());

    Ok(())
}
