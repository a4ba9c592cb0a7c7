//! Image processing functionality for DOCX conversion

use std::io::Cursor;

use docx_rs::*;
use image::GenericImageView;

/// EMUs per pixel at 96 DPI.
const EMU_PER_PX: u32 = 9525;
/// Page content width cap, in EMUs.
const MAX_WIDTH_EMU: u32 = 5486400;

/// Image processor for DOCX documents
#[derive(Default)]
pub struct DocxImageProcessor;

impl DocxImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Embed image data as a block-level picture, with an optional caption.
    ///
    /// Unsupported formats are transcoded to PNG; data the `image` crate
    /// cannot read degrades to a placeholder paragraph.
    pub fn process_image_data(
        &self,
        docx: Docx,
        data: &[u8],
        alt_text: Option<&str>,
        explicit_px: (Option<u32>, Option<u32>),
    ) -> Docx {
        let (width, height) = self.calculate_image_dimensions(data, explicit_px);

        let pic = match image::guess_format(data) {
            Ok(image::ImageFormat::Png) | Ok(image::ImageFormat::Jpeg) => {
                Pic::new(data).size(width, height)
            }
            Ok(_) => match self.transcode_to_png(data) {
                Some(png) => Pic::new(&png).size(width, height),
                None => {
                    return Self::placeholder(docx, "unable to convert to a supported format");
                }
            },
            Err(_) => return Self::placeholder(docx, "unknown image format"),
        };

        let img_para = Paragraph::new().add_run(Run::new().add_image(pic));
        let docx = docx.add_paragraph(img_para);

        match alt_text {
            Some(alt) if !alt.is_empty() => {
                let caption = Paragraph::new()
                    .style("Caption")
                    .add_run(Run::new().add_text(alt));
                docx.add_paragraph(caption)
            }
            _ => docx,
        }
    }

    fn transcode_to_png(&self, data: &[u8]) -> Option<Vec<u8>> {
        let img = image::load_from_memory(data).ok()?;
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .ok()?;
        Some(buffer)
    }

    fn placeholder(docx: Docx, reason: &str) -> Docx {
        let para =
            Paragraph::new().add_run(Run::new().add_text(format!("[image processing error: {reason}]")));
        docx.add_paragraph(para)
    }

    fn sniff_size(&self, data: &[u8]) -> Option<(u32, u32)> {
        let img = image::load_from_memory(data).ok()?;
        Some(img.dimensions())
    }

    /// Calculate embedded dimensions in EMUs. Explicit document attributes
    /// win over the encoded pixel size; a missing axis is derived from the
    /// aspect ratio. Wide images are scaled down to the page width.
    pub fn calculate_image_dimensions(
        &self,
        data: &[u8],
        explicit_px: (Option<u32>, Option<u32>),
    ) -> (u32, u32) {
        let sniffed = self.sniff_size(data);
        let (px_w, px_h) = match (explicit_px, sniffed) {
            ((Some(w), Some(h)), _) => (w, h),
            ((Some(w), None), Some((sw, sh))) if sw > 0 => (w, scale_axis(w, sh, sw)),
            ((None, Some(h)), Some((sw, sh))) if sh > 0 => (scale_axis(h, sw, sh), h),
            (_, Some((sw, sh))) => (sw, sh),
            // No usable size anywhere: fall back to a visible default.
            _ => return (4000000, 3000000),
        };

        let scaled_w = px_w.saturating_mul(EMU_PER_PX);
        let scaled_h = px_h.saturating_mul(EMU_PER_PX);

        if scaled_w > MAX_WIDTH_EMU && scaled_w > 0 {
            let ratio = scaled_h as f32 / scaled_w as f32;
            (MAX_WIDTH_EMU, (MAX_WIDTH_EMU as f32 * ratio) as u32)
        } else {
            (scaled_w, scaled_h)
        }
    }
}

/// Derive one axis from the other via the aspect ratio. The intermediate
/// product can exceed u32 for large document-supplied sizes, so the math
/// runs in u64 and saturates.
fn scale_axis(base: u32, num: u32, den: u32) -> u32 {
    (base as u64 * num as u64 / den as u64).min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_with_size(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn missing_axis_derives_from_aspect_ratio() {
        let processor = DocxImageProcessor::new();
        let data = png_with_size(2, 1);
        let (w, h) = processor.calculate_image_dimensions(&data, (Some(100), None));
        assert_eq!((w, h), (100 * EMU_PER_PX, 50 * EMU_PER_PX));
    }

    #[test]
    fn huge_explicit_width_on_a_tall_image_is_capped() {
        let processor = DocxImageProcessor::new();
        let data = png_with_size(1, 3);
        let (w, h) = processor.calculate_image_dimensions(&data, (Some(2_000_000_000), None));
        assert_eq!(w, MAX_WIDTH_EMU);
        assert_eq!(h, MAX_WIDTH_EMU);
    }
}
