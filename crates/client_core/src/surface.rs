use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use image::{imageops, Rgba, RgbaImage};
use shared::domain::{Rect, SurfaceSize};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A decoded sprite, RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    rgba: RgbaImage,
}

impl SpriteImage {
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Self { rgba }
    }

    pub fn decode(bytes: &[u8]) -> image::ImageResult<Self> {
        Ok(Self::from_rgba(image::load_from_memory(bytes)?.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Rescaled copy, or a plain clone when the size already matches.
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        if self.width() == width && self.height() == height {
            return self.clone();
        }
        Self::from_rgba(imageops::resize(
            &self.rgba,
            width,
            height,
            imageops::FilterType::Triangle,
        ))
    }
}

/// 2D raster the animation draws into. Methods take `&self` so the surface can
/// be shared between the drawing task and whoever presents it.
pub trait DrawingSurface: Send + Sync {
    fn size(&self) -> SurfaceSize;
    fn clear_rect(&self, rect: Rect);
    fn draw_image(&self, sprite: &SpriteImage, rect: Rect);
}

pub struct RasterSurface {
    pixels: Mutex<RgbaImage>,
    generation: AtomicU64,
}

impl RasterSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            pixels: Mutex::new(RgbaImage::from_pixel(size.width, size.height, TRANSPARENT)),
            generation: AtomicU64::new(0),
        }
    }

    /// Bumped on every mutation; presenters compare it to skip re-uploads.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> RgbaImage {
        self.with_pixels(|pixels| pixels.clone())
    }

    fn with_pixels<T>(&self, f: impl FnOnce(&mut RgbaImage) -> T) -> T {
        // A panic mid-draw leaves at worst a torn frame.
        let mut pixels = match self.pixels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut pixels)
    }

    fn touch(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new(SurfaceSize::DEFAULT)
    }
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> SurfaceSize {
        self.with_pixels(|pixels| SurfaceSize {
            width: pixels.width(),
            height: pixels.height(),
        })
    }

    fn clear_rect(&self, rect: Rect) {
        self.with_pixels(|pixels| {
            let Some((x0, y0, x1, y1)) = clip(rect, pixels.width(), pixels.height()) else {
                return;
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    pixels.put_pixel(x, y, TRANSPARENT);
                }
            }
        });
        self.touch();
    }

    fn draw_image(&self, sprite: &SpriteImage, rect: Rect) {
        let sprite = sprite.scaled(rect.width, rect.height);
        self.with_pixels(|pixels| imageops::overlay(pixels, sprite.rgba(), rect.x, rect.y));
        self.touch();
    }
}

fn clip(rect: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x.clamp(0, i64::from(width));
    let y0 = rect.y.clamp(0, i64::from(height));
    let x1 = (rect.x + i64::from(rect.width)).clamp(0, i64::from(width));
    let y1 = (rect.y + i64::from(rect.height)).clamp(0, i64::from(height));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    // Bounded by width/height above, so the casts are lossless.
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}
