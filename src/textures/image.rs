// Copyright @yucwang 2026

use crate::core::texture::Texture;
use crate::math::constants::{ Float, Vector2f };
use crate::math::spectrum::RGBSpectrum;
use image::io::Reader as ImageReader;
use image::Rgb32FImage;
use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum TextureError {
    Io(std::io::Error),
    Decode(image::ImageError),
    Empty { path: String },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Io(err) => write!(f, "failed to open texture: {}", err),
            TextureError::Decode(err) => write!(f, "failed to decode texture: {}", err),
            TextureError::Empty { path } => write!(f, "texture {} has no pixels", path),
        }
    }
}

impl std::error::Error for TextureError {}

impl From<std::io::Error> for TextureError {
    fn from(err: std::io::Error) -> Self {
        TextureError::Io(err)
    }
}

impl From<image::ImageError> for TextureError {
    fn from(err: image::ImageError) -> Self {
        TextureError::Decode(err)
    }
}

fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// RGB image looked up bilinearly. `v = 0` is the bottom row; coordinates
/// outside `[0, 1)` evaluate to white.
pub struct ImageTexture {
    width: usize,
    height: usize,
    texels: Vec<RGBSpectrum>,
}

impl ImageTexture {
    /// Loads a PNG/JPEG through `image`, linearizing sRGB values when asked.
    pub fn open<P: AsRef<Path>>(path: P, srgb: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = ImageReader::open(path)?.decode()?;
        let mut rgb = img.to_rgb32f();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(TextureError::Empty { path: path.display().to_string() });
        }
        if srgb {
            for p in rgb.pixels_mut() {
                p[0] = srgb_to_linear(p[0]);
                p[1] = srgb_to_linear(p[1]);
                p[2] = srgb_to_linear(p[2]);
            }
        }
        log::info!("Loaded texture {} ({}x{})", path.display(), rgb.width(), rgb.height());
        Ok(Self::from_rgb_image(&rgb))
    }

    /// Panics on an empty image.
    pub fn from_rgb_image(img: &Rgb32FImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        assert!(width > 0 && height > 0, "an image texture needs at least one texel");
        let texels = img.pixels().map(|p| RGBSpectrum::new(p[0], p[1], p[2])).collect();
        Self { width, height, texels }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn texel(&self, x: isize, y: isize) -> RGBSpectrum {
        let x = x.max(0).min(self.width as isize - 1) as usize;
        let y = y.max(0).min(self.height as isize - 1) as usize;
        self.texels[y * self.width + x]
    }
}

impl Texture for ImageTexture {
    fn eval(&self, uv: &Vector2f) -> RGBSpectrum {
        if !(uv.x >= 0.0 && uv.x < 1.0 && uv.y >= 0.0 && uv.y < 1.0) {
            return RGBSpectrum::white();
        }

        let x = uv.x * self.width as Float - 0.5;
        let y = (1.0 - uv.y) * self.height as Float - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.texel(x0, y0) * (1.0 - tx) + self.texel(x0 + 1, y0) * tx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - tx) + self.texel(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    fn describe(&self) -> String {
        format!("ImageTexture: {}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checker() -> ImageTexture {
        let mut img = Rgb32FImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([1.0, 0.0, 0.0]));
        img.put_pixel(1, 0, Rgb([0.0, 1.0, 0.0]));
        img.put_pixel(0, 1, Rgb([0.0, 0.0, 1.0]));
        img.put_pixel(1, 1, Rgb([1.0, 1.0, 1.0]));
        ImageTexture::from_rgb_image(&img)
    }

    #[test]
    fn test_texel_centers() {
        let tex = checker();
        // Top-left texel centre in uv space.
        let c = tex.eval(&Vector2f::new(0.25, 0.75));
        assert!((c[0] - 1.0).abs() < 1e-5 && c[1].abs() < 1e-5 && c[2].abs() < 1e-5);
        let c = tex.eval(&Vector2f::new(0.25, 0.25));
        assert!((c[2] - 1.0).abs() < 1e-5 && c[0].abs() < 1e-5);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let tex = checker();
        let c = tex.eval(&Vector2f::new(0.5, 0.75));
        assert!((c[0] - 0.5).abs() < 1e-5);
        assert!((c[1] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_outside_unit_square_is_white() {
        let tex = checker();
        assert_eq!(tex.eval(&Vector2f::new(1.0, 0.5)), RGBSpectrum::white());
        assert_eq!(tex.eval(&Vector2f::new(-0.1, 0.5)), RGBSpectrum::white());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        match ImageTexture::open("does/not/exist.png", true) {
            Err(TextureError::Io(_)) => {}
            other => panic!("unexpected result: {:?}", other.map(|t| t.dimensions())),
        }
    }
}
