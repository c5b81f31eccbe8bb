use image::DynamicImage;
use ndarray::Array3;

use crate::data_types::FrameGeometry;
use crate::error::{EventFrameError, Result};

/// A rasterized multi-channel frame derived from accumulating events.
///
/// Pixel data is stored as a 3D array in (height, width, channels) row-major
/// order with (0, 0) in the top-left corner. Each frame carries the timestamp
/// of the boundary that produced it, which frame alignment relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: Array3<f32>,
    timestamp: f64,
}

impl Frame {
    /// Creates a zero-filled frame for the given geometry.
    pub fn zeros(geometry: &FrameGeometry, timestamp: f64) -> Self {
        Self {
            pixels: Array3::zeros(geometry.shape()),
            timestamp,
        }
    }

    pub fn from_array(pixels: Array3<f32>, timestamp: f64) -> Self {
        Self { pixels, timestamp }
    }

    //region Accessors

    pub fn pixels(&self) -> &Array3<f32> {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut Array3<f32> {
        &mut self.pixels
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: f64) {
        self.timestamp = timestamp;
    }

    pub fn height(&self) -> usize {
        self.pixels.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.pixels.shape()[1]
    }

    pub fn channels(&self) -> usize {
        self.pixels.shape()[2]
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            height: self.height(),
            width: self.width(),
            channels: self.channels(),
        }
    }

    //endregion

    //region Numeric hygiene

    /// Replaces every NaN value with 0.0 in place.
    ///
    /// Morphology and edge extraction require sanitized input; a NaN that
    /// leaks into a min/max window would poison the whole neighborhood.
    pub fn sanitize_nan(&mut self) {
        self.pixels.mapv_inplace(|v| if v.is_nan() { 0.0 } else { v });
    }

    /// Returns a copy rescaled to the 0..255 range via min-max normalization.
    ///
    /// An all-equal frame (max == min) maps to zeros rather than dividing by
    /// zero. NaN values are treated as 0.0.
    pub fn min_max_normalized(&self) -> Frame {
        let mut out = self.clone();
        out.sanitize_nan();
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in out.pixels.iter() {
            min = min.min(v);
            max = max.max(v);
        }
        let span = max - min;
        if span > 0.0 {
            out.pixels.mapv_inplace(|v| 255.0 * (v - min) / span);
        } else {
            out.pixels.fill(0.0);
        }
        out
    }

    //endregion

    //region Export as Image

    /// Exports one channel as an 8-bit grayscale DynamicImage.
    ///
    /// Values are min-max rescaled to 0..255 so signed count frames remain
    /// visible. Intended for inspection and debugging, not as a lossless
    /// persistence format.
    pub fn export_channel_as_dynamic_image(&self, channel: usize) -> Result<DynamicImage> {
        if channel >= self.channels() {
            return Err(EventFrameError::BadParameters(format!(
                "channel {} out of range for frame with {} channels",
                channel,
                self.channels()
            )));
        }
        let normalized = self.min_max_normalized();
        let (height, width) = (self.height(), self.width());
        let mut buffer = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                buffer.push(normalized.pixels[[y, x, channel]].round().clamp(0.0, 255.0) as u8);
            }
        }
        let img_buffer = image::GrayImage::from_raw(width as u32, height as u32, buffer)
            .ok_or_else(|| EventFrameError::Internal("failed to build grayscale image".into()))?;
        Ok(DynamicImage::ImageLuma8(img_buffer))
    }

    /// Exports one channel as PNG bytes.
    pub fn export_channel_as_png_bytes(&self, channel: usize) -> Result<Vec<u8>> {
        let dynamic_img = self.export_channel_as_dynamic_image(channel)?;
        let mut buffer = Vec::new();
        dynamic_img
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|e| EventFrameError::Internal(format!("failed to encode PNG: {}", e)))?;
        Ok(buffer)
    }

    /// Exports one channel as BMP bytes.
    pub fn export_channel_as_bmp_bytes(&self, channel: usize) -> Result<Vec<u8>> {
        let dynamic_img = self.export_channel_as_dynamic_image(channel)?;
        let mut buffer = Vec::new();
        dynamic_img
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Bmp)
            .map_err(|e| EventFrameError::Internal(format!("failed to encode BMP: {}", e)))?;
        Ok(buffer)
    }

    //endregion
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> FrameGeometry {
        FrameGeometry::new(4, 4, 1).unwrap()
    }

    #[test]
    fn test_zeros_shape_and_timestamp() {
        let frame = Frame::zeros(&geometry(), 2.5);
        assert_eq!(frame.pixels().shape(), &[4, 4, 1]);
        assert_eq!(frame.timestamp(), 2.5);
        assert!(frame.pixels().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sanitize_nan() {
        let mut frame = Frame::zeros(&geometry(), 0.0);
        frame.pixels_mut()[[0, 0, 0]] = f32::NAN;
        frame.pixels_mut()[[1, 1, 0]] = 3.0;
        frame.sanitize_nan();
        assert_eq!(frame.pixels()[[0, 0, 0]], 0.0);
        assert_eq!(frame.pixels()[[1, 1, 0]], 3.0);
    }

    #[test]
    fn test_min_max_normalized_range() {
        let mut frame = Frame::zeros(&geometry(), 0.0);
        frame.pixels_mut()[[0, 0, 0]] = -2.0;
        frame.pixels_mut()[[3, 3, 0]] = 2.0;
        let normalized = frame.min_max_normalized();
        assert_eq!(normalized.pixels()[[0, 0, 0]], 0.0);
        assert_eq!(normalized.pixels()[[3, 3, 0]], 255.0);
        assert_eq!(normalized.pixels()[[1, 1, 0]], 127.5);
    }

    #[test]
    fn test_min_max_normalized_flat_frame() {
        let mut frame = Frame::zeros(&geometry(), 0.0);
        frame.pixels_mut().fill(7.0);
        let normalized = frame.min_max_normalized();
        assert!(normalized.pixels().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_png_export_roundtrip_header() {
        let frame = Frame::zeros(&geometry(), 0.0);
        let bytes = frame.export_channel_as_png_bytes(0).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_export_rejects_bad_channel() {
        let frame = Frame::zeros(&geometry(), 0.0);
        assert!(frame.export_channel_as_png_bytes(1).is_err());
    }
}
