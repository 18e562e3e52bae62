use std::{path::Path, sync::Arc};

use crate::vec3::{Color, Float, Point3};
use enum_dispatch::enum_dispatch;
use image::RgbImage;

#[enum_dispatch]
pub trait TextureValue {
    fn value(&self, u: Float, v: Float, point: &Point3) -> Color;
}

#[enum_dispatch(TextureValue)]
#[derive(Clone, Debug)]
pub enum Texture {
    SolidColor,
    CheckerTexture,
    ImageTexture,
}

#[derive(Clone, Copy, Debug)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn new_rgb(r: Float, g: Float, b: Float) -> Self {
        Self {
            color: Color::new(r, g, b),
        }
    }
}

impl TextureValue for SolidColor {
    fn value(&self, _u: Float, _v: Float, _point: &Point3) -> Color {
        self.color
    }
}

/// A 3-D checker pattern keyed on the sign of sin(10x)·sin(10y)·sin(10z) at
/// the hit point, so it works on any surface without UV coordinates.
#[derive(Clone, Debug)]
pub struct CheckerTexture {
    odd: Arc<Texture>,
    even: Arc<Texture>,
}

impl CheckerTexture {
    pub fn new(odd: Arc<Texture>, even: Arc<Texture>) -> Self {
        Self { odd, even }
    }

    pub fn new_colors(odd: Color, even: Color) -> Self {
        Self {
            odd: Arc::new(SolidColor::new(odd).into()),
            even: Arc::new(SolidColor::new(even).into()),
        }
    }
}

impl TextureValue for CheckerTexture {
    fn value(&self, u: Float, v: Float, point: &Point3) -> Color {
        let sines = (10.0 * point.x).sin() * (10.0 * point.y).sin() * (10.0 * point.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, point)
        } else {
            self.even.value(u, v, point)
        }
    }
}

/// UV-mapped image texture. The decoded pixels are shared read-only across
/// every work item; a texture whose image failed to decode keeps answering
/// `value` with a fixed fallback color instead of faulting.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    pixels: Option<Arc<RgbImage>>,
    /// Repetition rate of the image across the [0,1] UV square.
    cyclic_frequency: Float,
}

/// What an ImageTexture answers when it has no pixel data.
fn fallback_color() -> Color {
    Color::new(0.0, 0.0, 1.0)
}

impl ImageTexture {
    pub fn from_image(image: RgbImage, cyclic_frequency: Float) -> Self {
        Self {
            pixels: Some(Arc::new(image)),
            cyclic_frequency,
        }
    }

    pub fn from_bytes(data: &[u8], cyclic_frequency: Float) -> Self {
        let pixels = match image::load_from_memory(data) {
            Ok(decoded) => Some(Arc::new(decoded.to_rgb8())),
            Err(err) => {
                log::warn!("could not decode texture image: {err}");
                None
            }
        };
        Self {
            pixels,
            cyclic_frequency,
        }
    }

    pub fn open(path: impl AsRef<Path>, cyclic_frequency: Float) -> Self {
        let path = path.as_ref();
        let pixels = match image::open(path) {
            Ok(decoded) => Some(Arc::new(decoded.to_rgb8())),
            Err(err) => {
                log::warn!("could not load texture image '{}': {err}", path.display());
                None
            }
        };
        Self {
            pixels,
            cyclic_frequency,
        }
    }
}

impl TextureValue for ImageTexture {
    fn value(&self, u: Float, v: Float, _point: &Point3) -> Color {
        let Some(image) = &self.pixels else {
            return fallback_color();
        };
        if image.width() == 0 || image.height() == 0 {
            return fallback_color();
        }

        // The image repeats with the cyclic frequency; rows are stored
        // top-down while v grows bottom-up, hence the flip.
        let u = (u * self.cyclic_frequency).rem_euclid(1.0);
        let v = 1.0 - (v * self.cyclic_frequency).rem_euclid(1.0);

        let i = (u * (image.width() - 1) as Float) as u32;
        let j = (v * (image.height() - 1) as Float) as u32;

        let [r, g, b] = image[(i, j)].0;
        let scale = 1.0 / 255.0;
        Color::new(r as Float, g as Float, b as Float) * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solid_color_is_constant() {
        let tex = SolidColor::new_rgb(0.2, 0.4, 0.6);
        let a = tex.value(0.0, 0.0, &Point3::zeros());
        let b = tex.value(0.7, 0.3, &Point3::new(5.0, -2.0, 1.0));
        assert_abs_diff_eq!(a, Color::new(0.2, 0.4, 0.6));
        assert_abs_diff_eq!(a, b);
    }

    #[test]
    fn test_checker_alternates_with_sine_sign() {
        let odd = Color::new(1.0, 0.0, 0.0);
        let even = Color::new(0.0, 1.0, 0.0);
        let tex = CheckerTexture::new_colors(odd, even);

        // sin(0.5)^3 > 0 at (0.05, 0.05, 0.05)
        let p_even = Point3::new(0.05, 0.05, 0.05);
        // sin(3.5) < 0 flips the product's sign at (0.35, 0.05, 0.05)
        let p_odd = Point3::new(0.35, 0.05, 0.05);

        assert_abs_diff_eq!(tex.value(0.0, 0.0, &p_even), even);
        assert_abs_diff_eq!(tex.value(0.0, 0.0, &p_odd), odd);
    }

    fn two_by_two() -> RgbImage {
        // row 0: red, green; row 1: blue, white
        RgbImage::from_raw(
            2,
            2,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )
        .unwrap()
    }

    #[test]
    fn test_image_texture_flips_v() {
        let tex = ImageTexture::from_image(two_by_two(), 1.0);
        // v = 0 is the bottom of the image, i.e. the last stored row
        let bottom_left = tex.value(0.0, 0.0, &Point3::zeros());
        assert_abs_diff_eq!(bottom_left, Color::new(0.0, 0.0, 1.0), epsilon = 1e-5);
        // v near 1 samples the first stored row
        let top_left = tex.value(0.0, 0.99, &Point3::zeros());
        assert_abs_diff_eq!(top_left, Color::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_image_texture_falls_back_on_bad_data() {
        let tex = ImageTexture::from_bytes(b"definitely not an image", 1.0);
        let c = tex.value(0.5, 0.5, &Point3::zeros());
        assert_abs_diff_eq!(c, fallback_color());
    }

    #[test]
    fn test_image_texture_falls_back_on_missing_file() {
        let tex = ImageTexture::open("/no/such/texture.png", 1.0);
        let c = tex.value(0.5, 0.5, &Point3::zeros());
        assert_abs_diff_eq!(c, fallback_color());
    }

    #[test]
    fn test_enum_dispatch_reaches_variant() {
        let tex: Texture = SolidColor::new_rgb(0.1, 0.2, 0.3).into();
        assert_abs_diff_eq!(
            tex.value(0.0, 0.0, &Point3::zeros()),
            Color::new(0.1, 0.2, 0.3)
        );
    }
}
