use std::f64::consts::PI;

use crate::vector::{ Vector3, Color };
use crate::ray::Ray;
use crate::texture::Texture;

/// A sphere with material properties and an optional surface texture.
///
/// Spheres are the only primitive. A sphere with a positive emission color
/// doubles as a point-like light source located at its center. Spheres are
/// built once at scene-construction time and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,

    /// The squared radius, cached for the intersection solve.
    pub radius2: f64,

    pub surface_color: Color,
    pub emission_color: Color,

    /// Fraction of incoming light reflected, in `[0, 1]`.
    pub reflectivity: f64,

    /// Fraction of incoming light transmitted, in `[0, 1]`.
    pub transparency: f64,

    pub texture: Option<Texture>,
}

impl Sphere {
    /// Creates an opaque, non-emissive, untextured sphere.
    ///
    /// Material attributes beyond the surface color are left at their
    /// defaults and can be assigned directly on the returned value.
    pub fn new(center: Vector3, radius: f64, surface_color: Color) -> Sphere {
        Sphere {
            center,
            radius,
            radius2: radius * radius,
            surface_color,
            emission_color: Color::zero(),
            reflectivity: 0.0,
            transparency: 0.0,
            texture: None,
        }
    }

    /// Whether this sphere acts as a light source.
    pub fn is_emissive(&self) -> bool {
        self.emission_color.x > 0.0
    }

    /// Checks whether a ray intersects this sphere.
    ///
    /// Solves the ray-sphere quadratic geometrically. Returns the two
    /// parametric distances `(t0, t1)` along the ray with `t0 <= t1`, or
    /// `None` if the ray misses.
    ///
    /// A sphere whose center lies behind the ray origin is reported as a
    /// miss, even when the origin is inside it. The engine only casts rays
    /// outward from surfaces or the camera, where that case cannot
    /// contribute a visible hit.
    pub fn intersect(&self, ray: &Ray) -> Option<(f64, f64)> {
        let l = self.center - ray.origin;
        let tca = l.dot(&ray.direction);
        if tca < 0.0 {
            return None;
        }

        let d2 = l.dot(&l) - tca * tca;
        if d2 > self.radius2 {
            return None;
        }

        let thc = f64::sqrt(self.radius2 - d2);
        Some((tca - thc, tca + thc))
    }

    /// The surface color at a point on this sphere.
    ///
    /// Untextured spheres return their flat surface color. Textured spheres
    /// project the point onto longitude/latitude coordinates and sample the
    /// nearest texel.
    pub fn color_at(&self, point: Vector3) -> Color {
        match self.texture {
            None => self.surface_color,
            Some(ref texture) => {
                let local = point - self.center;
                let u = local.z.atan2(local.x) / (2.0 * PI) + 0.5;
                let v = (local.y / self.radius).acos() / PI;

                texture.sample(u, v)
            }
        }
    }
}

/* Tests */

#[test]
fn intersect_head_on() {
    let s = Sphere::new(Vector3::zero(), 1.0, Color::new(1.0, 1.0, 1.0));
    let r = Ray::new(
        Vector3::new(0.0, 0.0, -5.0),
        Vector3::new(0.0, 0.0, 1.0)
    );

    assert_eq!(s.intersect(&r), Some((4.0, 6.0)));
}

#[test]
fn intersect_through_center_is_equidistant() {
    let s = Sphere::new(Vector3::zero(), 1.0, Color::new(1.0, 1.0, 1.0));
    let r = Ray::new(
        Vector3::new(0.0, 0.0, -5.0),
        Vector3::new(0.0, 0.0, 1.0)
    );

    let (t0, t1) = s.intersect(&r).unwrap();
    let l = s.center - r.origin;
    let tca = l.dot(&r.direction);

    assert!(t0 <= t1);
    assert!(crate::feq(tca - t0, t1 - tca));
}

#[test]
fn intersect_sphere_behind_origin() {
    let s = Sphere::new(Vector3::zero(), 1.0, Color::new(1.0, 1.0, 1.0));
    let r = Ray::new(
        Vector3::new(0.0, 0.0, 5.0),
        Vector3::new(0.0, 0.0, 1.0)
    );

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn intersect_miss() {
    let s = Sphere::new(Vector3::zero(), 1.0, Color::new(1.0, 1.0, 1.0));
    let r = Ray::new(
        Vector3::new(0.0, 2.0, -5.0),
        Vector3::new(0.0, 0.0, 1.0)
    );

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn intersect_from_inside() {
    let s = Sphere::new(Vector3::zero(), 1.0, Color::new(1.0, 1.0, 1.0));
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    // The origin sits at the center: the near root lies behind the origin.
    assert_eq!(s.intersect(&r), Some((-1.0, 1.0)));
}

#[test]
fn intersect_is_idempotent() {
    let s = Sphere::new(Vector3::new(1.0, 2.0, -7.0), 2.5,
        Color::new(1.0, 1.0, 1.0));
    let r = Ray::new(
        Vector3::new(0.0, 0.0, 3.0),
        Vector3::new(0.1, 0.2, -1.0).normalized()
    );

    assert_eq!(s.intersect(&r), s.intersect(&r));
}

#[test]
fn color_at_flat() {
    let s = Sphere::new(Vector3::zero(), 1.0, Color::new(0.2, 0.4, 0.6));

    assert_eq!(s.color_at(Vector3::new(0.0, 0.0, 1.0)),
        Color::new(0.2, 0.4, 0.6));
}

#[test]
fn color_at_textured() {
    use image::RgbImage;
    use crate::texture::Texture;

    let image = RgbImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgb([255, 255, 255])
        } else {
            image::Rgb([0, 0, 0])
        }
    });

    let mut s = Sphere::new(Vector3::zero(), 1.0, Color::new(1.0, 0.0, 0.0));
    s.texture = Some(Texture::from_image(&image));

    // On the +x axis: u = 0.5, v = 0.5, the bottom-right (white) texel.
    assert_eq!(s.color_at(Vector3::new(1.0, 0.0, 0.0)),
        Color::new(1.0, 1.0, 1.0));

    // At the north pole: u = 0.5, v = 0.0, the top-right (black) texel.
    assert_eq!(s.color_at(Vector3::new(0.0, 1.0, 0.0)),
        Color::new(0.0, 0.0, 0.0));
}
