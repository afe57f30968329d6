use std::path::Path;

use image::RgbImage;

use crate::vector::Color;

/// A rectangular grid of color samples mapped onto a sphere's surface.
///
/// Samples are stored row-major, normalized to the `[0.0, 1.0]` channel
/// range at load time. Lookups are nearest-neighbor; no interpolation is
/// performed between texels.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// The width of the texture, in texels.
    pub width: usize,

    /// The height of the texture, in texels.
    pub height: usize,

    /// The texels of the texture, stored as a flattened vector.
    texels: Vec<Color>,
}

impl Texture {
    /// Loads a texture from a raster image file.
    ///
    /// Decoding (including magic-header validation) is delegated to the
    /// `image` crate; any recognized full-color raster format works. Missing
    /// files and malformed images surface as an `ImageError`.
    pub fn open<P: AsRef<Path>>(path: P) -> image::ImageResult<Texture> {
        let image = image::open(path)?.to_rgb8();
        Ok(Texture::from_image(&image))
    }

    /// Builds a texture from a decoded 8-bit RGB image.
    pub fn from_image(image: &RgbImage) -> Texture {
        let width = image.width() as usize;
        let height = image.height() as usize;

        let mut texels = Vec::with_capacity(width * height);
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            texels.push(Color::new(
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0
            ));
        }

        Texture { width, height, texels }
    }

    /// Samples the texel nearest to surface coordinates `(u, v)`.
    ///
    /// Coordinates map onto texel indices by scaling against the texture
    /// dimensions, then clamping into `[0, width) x [0, height)`. Clamping
    /// (rather than wrapping) means pathological coordinates outside
    /// `[0, 1]` pin to the texture edge.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let x = ((u * self.width as f64) as usize).min(self.width - 1);
        let y = ((v * self.height as f64) as usize).min(self.height - 1);

        self.texels[(y * self.width) + x]
    }
}

/* Tests */

#[cfg(test)]
fn checker_image() -> RgbImage {
    // 2x2 image: white in the top-left and bottom-right, black elsewhere.
    RgbImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgb([255, 255, 255])
        } else {
            image::Rgb([0, 0, 0])
        }
    })
}

#[test]
fn from_image_normalizes_channels() {
    let image = RgbImage::from_pixel(1, 1, image::Rgb([255, 127, 0]));
    let texture = Texture::from_image(&image);

    assert_eq!(texture.sample(0.0, 0.0),
        Color::new(1.0, 127.0 / 255.0, 0.0));
}

#[test]
fn sample_nearest_texel() {
    let texture = Texture::from_image(&checker_image());

    assert_eq!(texture.sample(0.25, 0.25), Color::new(1.0, 1.0, 1.0));
    assert_eq!(texture.sample(0.75, 0.25), Color::new(0.0, 0.0, 0.0));
    assert_eq!(texture.sample(0.25, 0.75), Color::new(0.0, 0.0, 0.0));
    assert_eq!(texture.sample(0.75, 0.75), Color::new(1.0, 1.0, 1.0));
}

#[test]
fn sample_clamps_out_of_range_coordinates() {
    let texture = Texture::from_image(&checker_image());

    // Below range pins to the first texel, above range to the last.
    assert_eq!(texture.sample(-3.0, -3.0), texture.sample(0.0, 0.0));
    assert_eq!(texture.sample(7.0, 7.0), texture.sample(0.99, 0.99));
    assert_eq!(texture.sample(1.0, 1.0), texture.sample(0.99, 0.99));
}

#[test]
fn sample_nan_coordinates_stay_in_bounds() {
    let texture = Texture::from_image(&checker_image());

    // A NaN coordinate casts to index zero rather than out of bounds.
    assert_eq!(texture.sample(f64::NAN, f64::NAN), texture.sample(0.0, 0.0));
}
