use std::f64::consts::PI;

use crate::vector::Vector3;
use crate::ray::Ray;
use crate::world::World;
use crate::canvas::Canvas;

/// A pinhole camera for generating a canvas.
///
/// The camera sits at the origin looking down the negative z axis. Each
/// pixel maps to normalized device coordinates, scaled by the field of view
/// and the image aspect ratio.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub width: usize,

    /// The vertical size of the resultant canvas.
    pub height: usize,

    /// The field of view, in degrees.
    pub fov: f64,

    inv_width: f64,
    inv_height: f64,
    aspect: f64,
    angle: f64,
}

impl Camera {
    pub fn new(width: usize, height: usize, fov: f64) -> Camera {
        let inv_width = 1.0 / (width as f64);
        let inv_height = 1.0 / (height as f64);
        let aspect = (width as f64) / (height as f64);
        let angle = (PI * 0.5 * fov / 180.0).tan();

        Camera {
            width,
            height,
            fov,
            inv_width,
            inv_height,
            aspect,
            angle,
        }
    }

    /// The primary ray through the center of pixel `(px, py)`.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        let x = (2.0 * ((px as f64 + 0.5) * self.inv_width) - 1.0)
            * self.angle * self.aspect;
        let y = (1.0 - 2.0 * ((py as f64 + 0.5) * self.inv_height))
            * self.angle;

        let direction = Vector3::new(x, y, -1.0).normalized();
        Ray::new(Vector3::zero(), direction)
    }

    /// Renders a world onto a fresh canvas, one trace call per pixel.
    pub fn render(&self, world: &World) -> Canvas {
        let mut image = Canvas::new(self.width, self.height);

        for y in 0..self.height {
            for x in 0..self.width {
                let ray = self.ray_for_pixel(x, y);
                let color = world.trace(&ray, 0);
                image.write_pixel(x, y, &color);
            }
        }

        image
    }
}

/* Tests */

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, 90.0);
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_directions_are_normalized() {
    let c = Camera::new(201, 101, 30.0);

    for &(px, py) in [(0, 0), (200, 0), (17, 93), (100, 50)].iter() {
        let r = c.ray_for_pixel(px, py);
        assert!(crate::feq(r.direction.length(), 1.0));
    }
}

#[test]
fn corner_rays_mirror_each_other() {
    let c = Camera::new(201, 101, 60.0);
    let top_left = c.ray_for_pixel(0, 0);
    let bottom_right = c.ray_for_pixel(200, 100);

    let mirrored = Vector3::new(
        -bottom_right.direction.x,
        -bottom_right.direction.y,
        bottom_right.direction.z
    );

    assert_eq!(top_left.direction, mirrored);
}

#[test]
fn render_is_deterministic() {
    use crate::vector::Color;
    use crate::sphere::Sphere;

    let mut mirror = Sphere::new(Vector3::new(0.0, 0.0, -20.0), 4.0,
        Color::new(1.0, 0.32, 0.36));
    mirror.reflectivity = 1.0;

    let mut light = Sphere::new(Vector3::new(0.0, 20.0, -30.0), 3.0,
        Color::zero());
    light.emission_color = Color::new(3.0, 3.0, 3.0);

    let w = World::new(vec![mirror, light]);
    let c = Camera::new(16, 12, 30.0);

    assert_eq!(c.render(&w), c.render(&w));
}
