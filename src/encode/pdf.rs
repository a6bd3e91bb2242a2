//! Minimal single-page PDF writer.
//!
//! The page is sized to the image at 72 dpi, so one pixel maps to one point.
//! The image is flattened onto white and embedded as a baseline JPEG, which
//! PDF readers decode natively through the `DCTDecode` filter.

use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};

use crate::error::RenderResult;

const JPEG_QUALITY: u8 = 92;

/// Writes `img` as a one-page PDF document.
pub fn write_pdf(img: &RgbaImage) -> RenderResult<Vec<u8>> {
    let (width, height) = img.dimensions();

    let mut jpeg = Vec::new();
    flatten_on_white(img).write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))?;

    let content = format!("q\n{width} 0 0 {height} 0 0 cm\n/Im0 Do\nQ\n");

    let mut doc = PdfWriter::new();
    doc.object(b"<< /Type /Catalog /Pages 2 0 R >>")?;
    doc.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>")?;
    doc.object(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>"
        )
        .as_bytes(),
    )?;
    doc.stream(
        &format!(
            "/Type /XObject /Subtype /Image /Width {width} /Height {height} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode"
        ),
        &jpeg,
    )?;
    doc.stream("", content.as_bytes())?;
    doc.finish()
}

/// Composites every pixel over opaque white and drops the alpha channel.
fn flatten_on_white(img: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let alpha = a as u32;
        let over = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([over(r), over(g), over(b)])
    })
}

/// Accumulates numbered objects and writes the cross-reference table.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self) -> std::io::Result<()> {
        self.offsets.push(self.buf.len());
        write!(self.buf, "{} 0 obj\n", self.offsets.len())
    }

    fn object(&mut self, body: &[u8]) -> std::io::Result<()> {
        self.begin()?;
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
        Ok(())
    }

    fn stream(&mut self, dict: &str, data: &[u8]) -> std::io::Result<()> {
        self.begin()?;
        write!(self.buf, "<< {dict} /Length {} >>\nstream\n", data.len())?;
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
        Ok(())
    }

    fn finish(mut self) -> RenderResult<Vec<u8>> {
        let xref = self.buf.len();
        let size = self.offsets.len() + 1;
        write!(self.buf, "xref\n0 {size}\n0000000000 65535 f \n")?;
        for offset in &self.offsets {
            write!(self.buf, "{offset:010} 00000 n \n")?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n"
        )?;
        Ok(self.buf)
    }
}
