//! Sprite-slide animation: clear, draw, step right, wait for the next tick.

use std::time::Duration;

use async_trait::async_trait;
use shared::domain::{Rect, SPRITE_SIZE, SPRITE_STEP, SPRITE_Y};

use crate::surface::{DrawingSurface, SpriteImage};

#[async_trait]
pub trait FrameClock: Send + Sync {
    /// Resolves at the next display tick.
    async fn next_frame(&self);
}

pub struct IntervalFrameClock {
    period: Duration,
}

impl IntervalFrameClock {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for IntervalFrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

#[async_trait]
impl FrameClock for IntervalFrameClock {
    async fn next_frame(&self) {
        tokio::time::sleep(self.period).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSlide {
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub step: i64,
}

impl Default for SpriteSlide {
    fn default() -> Self {
        Self {
            y: SPRITE_Y,
            width: SPRITE_SIZE,
            height: SPRITE_SIZE,
            step: SPRITE_STEP,
        }
    }
}

/// Runs the slide from x = 0 until x reaches the surface width. `on_frame`
/// sees the offset each frame was drawn at. Returns the number of frames.
pub async fn run_slide(
    surface: &dyn DrawingSurface,
    sprite: &SpriteImage,
    slide: SpriteSlide,
    clock: &dyn FrameClock,
    mut on_frame: impl FnMut(i64) + Send,
) -> u32 {
    let bounds = surface.size();
    let sprite = sprite.scaled(slide.width, slide.height);
    let step = slide.step.max(1);
    let mut x = 0_i64;
    let mut frames = 0_u32;

    loop {
        surface.clear_rect(Rect::covering(bounds));
        surface.draw_image(&sprite, Rect::new(x, slide.y, slide.width, slide.height));
        on_frame(x);
        frames += 1;

        x += step;
        if x >= i64::from(bounds.width) {
            return frames;
        }
        clock.next_frame().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;
    use image::{Rgba, RgbaImage};
    use shared::domain::SurfaceSize;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingClock {
        ticks: AtomicU32,
    }

    #[async_trait]
    impl FrameClock for CountingClock {
        async fn next_frame(&self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sprite() -> SpriteImage {
        SpriteImage::from_rgba(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255])))
    }

    #[tokio::test]
    async fn slides_two_units_per_frame_until_width() {
        let surface = RasterSurface::default();
        let clock = CountingClock::default();
        let mut offsets = Vec::new();

        let frames = run_slide(&surface, &sprite(), SpriteSlide::default(), &clock, |x| {
            offsets.push(x)
        })
        .await;

        assert_eq!(frames, 300);
        assert_eq!(offsets.first(), Some(&0));
        assert_eq!(offsets.last(), Some(&598));
        assert!(offsets.windows(2).all(|pair| pair[1] - pair[0] == 2));
        assert_eq!(clock.ticks.load(Ordering::SeqCst), 299);
    }

    #[tokio::test]
    async fn last_frame_leaves_only_the_final_sprite() {
        let surface = RasterSurface::new(SurfaceSize {
            width: 20,
            height: 10,
        });
        let slide = SpriteSlide {
            y: 0,
            width: 4,
            height: 4,
            step: 2,
        };

        let frames = run_slide(&surface, &sprite(), slide, &CountingClock::default(), |_| {}).await;

        assert_eq!(frames, 10);
        let frame = surface.snapshot();
        assert_eq!(frame.get_pixel(18, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(frame.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }
}
