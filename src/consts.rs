use crate::vector::Color;

// Runtime parameters
pub const NUM_THREADS: usize = 4;
pub const CANVAS_WIDTH: usize = 640;
pub const CANVAS_HEIGHT: usize = 480;
pub const FIELD_OF_VIEW: f64 = 30.0;

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Maximum recursion depth for reflection and refraction rays
pub const MAX_RAY_DEPTH: u32 = 5;

// Offset applied to secondary ray origins to avoid self-intersection
pub const SHADOW_BIAS: f64 = 1e-4;

// Refractive index for all transparent spheres
pub const SPHERE_IOR: f64 = 1.1;

// Color returned when a ray escapes the scene. Out of display range on
// purpose; clamped only when the canvas is quantized to 8 bits.
pub const BACKGROUND: Color = Color { x: 2.0, y: 2.0, z: 2.0 };
