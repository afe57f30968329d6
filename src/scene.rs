use std::convert::{ TryFrom, TryInto };
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{ Serialize, Deserialize };

use crate::sphere::Sphere;
use crate::texture::Texture;
use crate::world::World;
use crate::camera::Camera;

/// A renderable scene: a world of spheres and the camera framing it.
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// Reads a scene description from a JSON file.
    ///
    /// Any texture paths in the description are resolved and loaded here;
    /// a missing or malformed texture file fails the whole load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let scene_json: SceneJson = serde_json::from_str(&text)?;

        Ok(scene_json.try_into()?)
    }
}

/// The JSON mirror of a `Scene`.
#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    canvas_width: usize,
    canvas_height: usize,
    field_of_view: f64,

    spheres: Vec<SphereJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct SphereJson {
    center: [f64; 3],
    radius: f64,
    surface_color: [f64; 3],

    #[serde(default)]
    reflectivity: f64,

    #[serde(default)]
    transparency: f64,

    #[serde(default)]
    emission_color: [f64; 3],

    #[serde(default)]
    texture: Option<String>,
}

impl TryFrom<SceneJson> for Scene {
    type Error = image::ImageError;

    fn try_from(scene_json: SceneJson) -> Result<Scene, Self::Error> {
        let camera = Camera::new(
            scene_json.canvas_width,
            scene_json.canvas_height,
            scene_json.field_of_view
        );

        let mut spheres = Vec::with_capacity(scene_json.spheres.len());
        for sphere_json in scene_json.spheres {
            let mut sphere = Sphere::new(
                sphere_json.center.into(),
                sphere_json.radius,
                sphere_json.surface_color.into()
            );

            sphere.reflectivity = sphere_json.reflectivity;
            sphere.transparency = sphere_json.transparency;
            sphere.emission_color = sphere_json.emission_color.into();

            if let Some(ref path) = sphere_json.texture {
                sphere.texture = Some(Texture::open(path)?);
            }

            spheres.push(sphere);
        }

        Ok(Scene { world: World::new(spheres), camera })
    }
}

/* Tests */

#[test]
fn scene_from_json() {
    use crate::vector::{ Vector3, Color };

    let text = r#"{
        "canvas_width": 320,
        "canvas_height": 240,
        "field_of_view": 30.0,
        "spheres": [
            {
                "center": [0.0, -10004.0, -20.0],
                "radius": 10000.0,
                "surface_color": [0.2, 0.2, 0.2]
            },
            {
                "center": [0.0, 0.0, -20.0],
                "radius": 4.0,
                "surface_color": [1.0, 0.32, 0.36],
                "reflectivity": 1.0,
                "transparency": 0.5
            },
            {
                "center": [0.0, 20.0, -30.0],
                "radius": 3.0,
                "surface_color": [0.0, 0.0, 0.0],
                "emission_color": [3.0, 3.0, 3.0]
            }
        ]
    }"#;

    let scene_json: SceneJson = serde_json::from_str(text).unwrap();
    let scene: Scene = scene_json.try_into().unwrap();

    assert_eq!(scene.camera.width, 320);
    assert_eq!(scene.camera.height, 240);
    assert_eq!(scene.world.spheres.len(), 3);

    let ground = &scene.world.spheres[0];
    assert_eq!(ground.center, Vector3::new(0.0, -10004.0, -20.0));
    assert_eq!(ground.radius2, 10000.0 * 10000.0);
    assert_eq!(ground.reflectivity, 0.0);
    assert!(ground.texture.is_none());

    let middle = &scene.world.spheres[1];
    assert_eq!(middle.surface_color, Color::new(1.0, 0.32, 0.36));
    assert_eq!(middle.reflectivity, 1.0);
    assert_eq!(middle.transparency, 0.5);

    let light = &scene.world.spheres[2];
    assert!(light.is_emissive());
    assert_eq!(light.emission_color, Color::new(3.0, 3.0, 3.0));
}
