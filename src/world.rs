use crate::vector::{ Vector3, Color };
use crate::ray::Ray;
use crate::sphere::Sphere;
use crate::consts::{ BACKGROUND, MAX_RAY_DEPTH, SHADOW_BIAS, SPHERE_IOR };

/// A world of spheres.
///
/// Sphere order matters: when two spheres are equidistant along a ray, the
/// first one in the list wins the nearest-hit search. The world is read-only
/// during rendering and is shared freely between recursive trace calls.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub spheres: Vec<Sphere>,
}

/// The outcome of bending a ray across a sphere boundary.
///
/// Past the critical angle the refraction solve has no real solution and
/// no ray is transmitted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Refraction {
    Refracted(Vector3),
    TotalInternalReflection,
}

/// Linear blend between `a` and `b`.
fn mix(a: f64, b: f64, t: f64) -> f64 {
    b * t + a * (1.0 - t)
}

/// Bends `direction` across a surface with normal `normal`.
///
/// All transparent spheres share a fixed index of refraction; `inside`
/// selects which side of the boundary the ray is crossing from.
pub fn refract(direction: Vector3, normal: Vector3, inside: bool)
    -> Refraction {
    let eta = if inside { SPHERE_IOR } else { 1.0 / SPHERE_IOR };
    let cosi = -normal.dot(&direction);
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);

    if k < 0.0 {
        return Refraction::TotalInternalReflection;
    }

    let refracted = direction * eta + normal * (eta * cosi - f64::sqrt(k));
    Refraction::Refracted(refracted.normalized())
}

impl World {
    pub fn new(spheres: Vec<Sphere>) -> World {
        World { spheres }
    }

    /// Creates a world with no spheres.
    pub fn empty() -> World {
        Default::default()
    }

    /// Finds the nearest sphere hit by a ray.
    ///
    /// Uses the near intersection root, falling back to the far root when
    /// the near one lies behind the ray origin (the origin is inside the
    /// sphere). Ties keep the earliest sphere in list order.
    fn nearest_hit(&self, ray: &Ray) -> Option<(&Sphere, f64)> {
        let mut t_near = f64::INFINITY;
        let mut nearest = None;

        for sphere in self.spheres.iter() {
            if let Some((t0, t1)) = sphere.intersect(ray) {
                let t = if t0 < 0.0 { t1 } else { t0 };
                if t < t_near {
                    t_near = t;
                    nearest = Some((sphere, t));
                }
            }
        }

        nearest
    }

    /// Traces a ray through the world, returning the color seen along it.
    ///
    /// Rays that escape the scene return the background sentinel. Hits on
    /// reflective or transparent spheres recurse (while `depth` is under the
    /// cap) into a Fresnel-weighted mix of reflection and refraction; all
    /// other hits take direct illumination from the scene's emissive
    /// spheres. A hit never takes both paths. The hit sphere's own emission
    /// is added to whichever result.
    pub fn trace(&self, ray: &Ray, depth: u32) -> Color {
        let (sphere, t_near) = match self.nearest_hit(ray) {
            Some(hit) => hit,
            None => return BACKGROUND,
        };

        let phit = ray.position(t_near);
        let mut nhit = (phit - sphere.center).normalized();

        // A ray leaving the inside of the sphere sees the back of the
        // surface; flip the normal and remember the side for refraction.
        let mut inside = false;
        if ray.direction.dot(&nhit) > 0.0 {
            nhit = -nhit;
            inside = true;
        }

        let recurse = sphere.transparency > 0.0 || sphere.reflectivity > 0.0;
        let surface_color = if recurse && depth < MAX_RAY_DEPTH {
            let facing_ratio = -ray.direction.dot(&nhit);
            let fresnel = mix((1.0 - facing_ratio).powi(3), 1.0, 0.1);

            let reflect_ray = Ray::new(
                phit + nhit * SHADOW_BIAS,
                ray.direction.reflect(&nhit).normalized()
            );
            let reflection = self.trace(&reflect_ray, depth + 1);

            let refraction = if sphere.transparency > 0.0 {
                match refract(ray.direction, nhit, inside) {
                    Refraction::Refracted(direction) => {
                        let refract_ray = Ray::new(
                            phit - nhit * SHADOW_BIAS,
                            direction
                        );
                        self.trace(&refract_ray, depth + 1)
                    },

                    // Nothing transmits past the critical angle; the
                    // transmitted share follows the reflection instead.
                    Refraction::TotalInternalReflection =>
                        self.trace(&reflect_ray, depth + 1),
                }
            } else {
                Color::zero()
            };

            (reflection * fresnel
                + refraction * (1.0 - fresnel) * sphere.transparency)
                * sphere.color_at(phit)
        } else {
            self.direct_lighting(sphere, phit, nhit)
        };

        surface_color + sphere.emission_color
    }

    /// Direct illumination at a point from every emissive sphere.
    ///
    /// Shadowing is binary: a single occluder between the point and a light
    /// zeroes that light's contribution, and the occluder search exits
    /// early. Falloff is Lambertian with no distance attenuation.
    fn direct_lighting(&self, sphere: &Sphere, phit: Vector3, nhit: Vector3)
        -> Color {
        let mut color = Color::zero();
        let shadow_origin = phit + nhit * SHADOW_BIAS;

        for (i, light) in self.spheres.iter().enumerate() {
            if !light.is_emissive() {
                continue;
            }

            let light_direction = (light.center - phit).normalized();
            let shadow_ray = Ray::new(shadow_origin, light_direction);

            let occluded = self.spheres.iter().enumerate().any(|(j, other)|
                j != i && other.intersect(&shadow_ray).is_some()
            );
            if occluded {
                continue;
            }

            let lambert = f64::max(0.0, nhit.dot(&light_direction));
            color += sphere.color_at(phit) * lambert * light.emission_color;
        }

        color
    }
}

/* Tests */

#[cfg(test)]
fn diffuse_sphere(center: Vector3, radius: f64, color: Color) -> Sphere {
    Sphere::new(center, radius, color)
}

#[cfg(test)]
fn light_sphere(center: Vector3, radius: f64, emission: Color) -> Sphere {
    let mut light = Sphere::new(center, radius, Color::zero());
    light.emission_color = emission;
    light
}

#[test]
fn trace_miss_returns_background() {
    let w = World::new(vec![
        diffuse_sphere(Vector3::new(0.0, 0.0, -20.0), 4.0,
            Color::new(1.0, 0.32, 0.36)),
    ]);

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));

    assert_eq!(w.trace(&r, 0), BACKGROUND);
}

#[test]
fn trace_empty_world_returns_background() {
    let w = World::empty();
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    assert_eq!(w.trace(&r, 0), BACKGROUND);
}

#[test]
fn trace_diffuse_sphere_lit_head_on() {
    // The light sits behind the camera, along the surface normal of the
    // front pole of the diffuse sphere.
    let w = World::new(vec![
        diffuse_sphere(Vector3::new(0.0, 0.0, -10.0), 1.0,
            Color::new(1.0, 0.5, 0.25)),
        light_sphere(Vector3::new(0.0, 0.0, 2.0), 1.0,
            Color::new(2.0, 2.0, 2.0)),
    ]);

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    // N . L is exactly 1, so the result is the surface color filtered by
    // the light's emission.
    assert_eq!(w.trace(&r, 0), Color::new(2.0, 1.0, 0.5));
}

#[test]
fn trace_diffuse_ignores_recursion_depth() {
    let w = World::new(vec![
        diffuse_sphere(Vector3::new(0.0, 0.0, -10.0), 1.0,
            Color::new(1.0, 0.5, 0.25)),
        light_sphere(Vector3::new(0.0, 0.0, 2.0), 1.0,
            Color::new(2.0, 2.0, 2.0)),
    ]);

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    assert_eq!(w.trace(&r, 0), w.trace(&r, 50));
}

#[test]
fn trace_occluded_light_contributes_nothing() {
    // The occluder sits squarely between the lit point and the light, but
    // off the primary ray's path.
    let w = World::new(vec![
        diffuse_sphere(Vector3::new(0.0, 0.0, -10.0), 1.0,
            Color::new(1.0, 0.5, 0.25)),
        light_sphere(Vector3::new(0.0, 4.0, -9.0), 1.0,
            Color::new(2.0, 2.0, 2.0)),
        diffuse_sphere(Vector3::new(0.0, 2.0, -9.0), 0.5,
            Color::new(1.0, 1.0, 1.0)),
    ]);

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    assert_eq!(w.trace(&r, 0), Color::zero());
}

#[test]
fn trace_mirror_sphere_reflects_background() {
    let mut mirror = Sphere::new(Vector3::new(0.0, 0.0, -10.0), 1.0,
        Color::new(1.0, 1.0, 1.0));
    mirror.reflectivity = 1.0;

    let w = World::new(vec![mirror]);
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    // Head-on, the Fresnel factor is exactly 0.1; the reflected ray escapes
    // to the background sentinel.
    assert_eq!(w.trace(&r, 0), BACKGROUND * 0.1);
}

#[test]
fn trace_exhausted_depth_falls_back_to_direct_lighting() {
    let mut mirror = Sphere::new(Vector3::new(0.0, 0.0, -10.0), 1.0,
        Color::new(1.0, 1.0, 1.0));
    mirror.reflectivity = 1.0;

    let w = World::new(vec![mirror]);
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    // At the recursion cap there are no lights to sample, so the mirror
    // shades to black.
    assert_eq!(w.trace(&r, MAX_RAY_DEPTH), Color::zero());
}

#[test]
fn trace_equidistant_spheres_first_in_order_wins() {
    let w = World::new(vec![
        light_sphere(Vector3::new(0.0, 0.0, -10.0), 1.0,
            Color::new(1.0, 0.0, 0.0)),
        light_sphere(Vector3::new(0.0, 0.0, -10.0), 1.0,
            Color::new(0.0, 1.0, 0.0)),
    ]);

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    // Both spheres are coincident; the first one listed is shaded. Its own
    // emission dominates the returned color.
    assert_eq!(w.trace(&r, 0).x, 1.0);
    assert_eq!(w.trace(&r, 0).y, 0.0);
}

#[test]
fn trace_transparent_sphere_stays_finite() {
    let mut glass = Sphere::new(Vector3::new(0.0, 0.0, -10.0), 2.0,
        Color::new(0.9, 0.9, 0.9));
    glass.reflectivity = 1.0;
    glass.transparency = 0.5;

    let w = World::new(vec![glass]);

    // Sweep rays from head-on out past the silhouette; every traced color
    // must be finite even where internal rays pass the critical angle.
    for i in 0..40 {
        let x = i as f64 * 0.05;
        let r = Ray::new(Vector3::zero(),
            Vector3::new(x, 0.0, -10.0).normalized());
        let c = w.trace(&r, 0);

        assert!(c.x.is_finite() && c.y.is_finite() && c.z.is_finite());
    }
}

#[test]
fn refract_head_on_continues_straight() {
    let direction = Vector3::new(0.0, 0.0, -1.0);
    let normal = Vector3::new(0.0, 0.0, 1.0);

    assert_eq!(refract(direction, normal, false),
        Refraction::Refracted(Vector3::new(0.0, 0.0, -1.0)));
}

#[test]
fn refract_past_critical_angle_reflects_internally() {
    // Leaving the denser medium at grazing incidence: cos(i) = 0.2 is well
    // past the critical angle for the fixed index.
    let direction = Vector3::new(f64::sqrt(1.0 - 0.04), 0.0, -0.2);
    let normal = Vector3::new(0.0, 0.0, 1.0);

    assert_eq!(refract(direction, normal, true),
        Refraction::TotalInternalReflection);
}
