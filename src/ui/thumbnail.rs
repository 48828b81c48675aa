//! Thumbnail capture of the rendered block preview
//!
//! The preview is drawn into an overlay, left to settle for a fixed delay,
//! then grabbed from a viewport screenshot and encoded as JPEG. Capture is
//! best-effort: every failure ends in `None` and publishing carries on.

use std::time::{Duration, Instant};

use eframe::egui::{self, ColorImage, Pos2, Rect};
use image::imageops::FilterType;
use image::{codecs::jpeg::JpegEncoder, RgbImage};
use thiserror::Error;

use crate::core::config::PublishConfig;

/// How long to wait for the screenshot event before giving up
const SCREENSHOT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("capture region is empty")]
    EmptyRegion,
    #[error("no preview area to capture")]
    NoTarget,
    #[error("screenshot timed out")]
    TimedOut,
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Settling { until: Instant },
    Requested { since: Instant },
}

/// One capture in flight
#[derive(Debug)]
pub struct ThumbnailCapture {
    stage: Stage,
    target: Option<Rect>,
    max_width: u32,
    quality: u8,
}

impl ThumbnailCapture {
    pub fn start(config: &PublishConfig) -> Self {
        Self {
            stage: Stage::Settling {
                until: Instant::now() + config.thumbnail_delay(),
            },
            target: None,
            max_width: config.thumbnail_max_width,
            quality: config.thumbnail_quality,
        }
    }

    /// Record where the preview was drawn this frame
    pub fn set_target(&mut self, rect: Rect) {
        self.target = Some(rect);
    }

    /// Drive the capture; returns the outcome once it is over
    pub fn update(&mut self, ctx: &egui::Context) -> Option<Option<Vec<u8>>> {
        let outcome = match self.stage {
            Stage::Settling { until } => {
                let now = Instant::now();
                if now < until {
                    ctx.request_repaint_after(until - now);
                    return None;
                }
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
                self.stage = Stage::Requested { since: now };
                ctx.request_repaint();
                return None;
            }
            Stage::Requested { since } => {
                let screenshot = ctx.input(|i| {
                    i.raw.events.iter().find_map(|event| match event {
                        egui::Event::Screenshot { image, .. } => Some(image.clone()),
                        _ => None,
                    })
                });
                match screenshot {
                    Some(image) => self.encode_target(&image, ctx.pixels_per_point()),
                    None if since.elapsed() > SCREENSHOT_TIMEOUT => Err(ThumbnailError::TimedOut),
                    None => {
                        ctx.request_repaint();
                        return None;
                    }
                }
            }
        };

        match outcome {
            Ok(bytes) => {
                tracing::debug!("Captured thumbnail ({} bytes)", bytes.len());
                Some(Some(bytes))
            }
            Err(e) => {
                tracing::warn!("Thumbnail generation failed: {}", e);
                Some(None)
            }
        }
    }

    fn encode_target(&self, screenshot: &ColorImage, pixels_per_point: f32) -> Result<Vec<u8>, ThumbnailError> {
        let target = self.target.ok_or(ThumbnailError::NoTarget)?;
        let cropped = crop(screenshot, target, pixels_per_point)?;
        encode_jpeg(&cropped, self.max_width, self.quality)
    }
}

/// The part of `region` (in points) inside a screenshot of `size` pixels,
/// and whether anything was cut off
pub fn visible_region(size: [usize; 2], region: Rect, pixels_per_point: f32) -> Option<(Rect, bool)> {
    let bounds = Rect::from_min_max(
        Pos2::ZERO,
        Pos2::new(
            size[0] as f32 / pixels_per_point,
            size[1] as f32 / pixels_per_point,
        ),
    );
    let visible = region.intersect(bounds);
    if visible.width() < 1.0 || visible.height() < 1.0 {
        return None;
    }
    Some((visible, visible != region))
}

/// Cut `region` (in points) out of a screenshot, clamped to the image
pub fn crop(screenshot: &ColorImage, region: Rect, pixels_per_point: f32) -> Result<ColorImage, ThumbnailError> {
    let (visible, clipped) =
        visible_region(screenshot.size, region, pixels_per_point).ok_or(ThumbnailError::EmptyRegion)?;
    if clipped {
        tracing::debug!(
            "Thumbnail preview {:?} does not fit the window, capturing {:?}",
            region,
            visible
        );
    }
    Ok(screenshot.region(&visible, Some(pixels_per_point)))
}

/// Encode as JPEG, scaling down to `max_width` if wider
pub fn encode_jpeg(image: &ColorImage, max_width: u32, quality: u8) -> Result<Vec<u8>, ThumbnailError> {
    let [width, height] = image.size;
    if width == 0 || height == 0 {
        return Err(ThumbnailError::EmptyRegion);
    }
    let rgb: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b()])
        .collect();
    let mut img = RgbImage::from_raw(width as u32, height as u32, rgb)
        .ok_or(ThumbnailError::EmptyRegion)?;

    if max_width > 0 && img.width() > max_width {
        let scaled_height = (u64::from(img.height()) * u64::from(max_width) / u64::from(img.width())).max(1) as u32;
        img = image::imageops::resize(&img, max_width, scaled_height, FilterType::Triangle);
    }

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode_image(&img)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize) -> ColorImage {
        let rgba: Vec<u8> = std::iter::repeat([30u8, 120, 200, 255])
            .take(width * height)
            .flatten()
            .collect();
        ColorImage::from_rgba_unmultiplied([width, height], &rgba)
    }

    #[test]
    fn test_encode_jpeg_scales_down() {
        let bytes = encode_jpeg(&solid(1280, 400), 640, 80).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 200));
    }

    #[test]
    fn test_encode_jpeg_keeps_small_images() {
        let bytes = encode_jpeg(&solid(100, 50), 640, 80).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 50));
    }

    #[test]
    fn test_crop_clamps_to_screenshot() {
        let shot = solid(200, 100);
        let cropped = crop(&shot, Rect::from_min_max(Pos2::new(50.0, 10.0), Pos2::new(400.0, 90.0)), 1.0).unwrap();
        assert_eq!(cropped.size, [150, 80]);

        let outside = Rect::from_min_max(Pos2::new(300.0, 300.0), Pos2::new(400.0, 400.0));
        assert!(matches!(crop(&shot, outside, 1.0), Err(ThumbnailError::EmptyRegion)));
    }

    #[test]
    fn test_visible_region_reports_clipping() {
        let inside = Rect::from_min_max(Pos2::new(10.0, 10.0), Pos2::new(100.0, 50.0));
        assert_eq!(visible_region([200, 100], inside, 1.0), Some((inside, false)));

        let tall = Rect::from_min_max(Pos2::new(10.0, 10.0), Pos2::new(100.0, 300.0));
        let (visible, clipped) = visible_region([200, 100], tall, 1.0).unwrap();
        assert!(clipped);
        assert_eq!(visible.max, Pos2::new(100.0, 100.0));

        assert_eq!(visible_region([200, 100], inside, 4.0).map(|(_, c)| c), Some(true));
    }

    #[test]
    fn test_crop_respects_pixels_per_point() {
        let shot = solid(400, 200);
        let cropped = crop(&shot, Rect::from_min_max(Pos2::ZERO, Pos2::new(100.0, 50.0)), 2.0).unwrap();
        assert_eq!(cropped.size, [200, 100]);
    }
}
