//! Binary PGM (P5) export
//!
//! Layout: `P5\n<width> <height>\n255\n` followed by `width * height` bytes in
//! row-major order, each `round(clamp(intensity, 0, 1) * 255)`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::Canvas;
use crate::Result;

/// Largest sample value written to the header
pub const PGM_MAX_VALUE: u8 = 255;

/// Converts an intensity to an 8-bit sample
#[inline]
pub fn intensity_to_byte(intensity: f32) -> u8 {
    (intensity.clamp(0.0, 1.0) * PGM_MAX_VALUE as f32).round() as u8
}

impl Canvas {
    /// Text header for this canvas
    pub fn pgm_header(&self) -> String {
        format!("P5\n{} {}\n{}\n", self.width(), self.height(), PGM_MAX_VALUE)
    }

    /// Encodes the whole raster, header included
    pub fn to_pgm_bytes(&self) -> Vec<u8> {
        let header = self.pgm_header();
        let mut bytes = Vec::with_capacity(header.len() + self.pixels.len());
        bytes.extend_from_slice(header.as_bytes());
        // Standard layout iterates row by row
        bytes.extend(self.pixels.iter().map(|v| intensity_to_byte(*v)));
        bytes
    }

    /// Writes the raster to any byte sink
    pub fn write_pgm<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_pgm_bytes())?;
        Ok(())
    }

    /// Writes the raster to a file, creating or truncating it
    pub fn save_pgm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_pgm(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_intensity_to_byte() {
        assert_eq!(intensity_to_byte(0.0), 0);
        assert_eq!(intensity_to_byte(1.0), 255);
        assert_eq!(intensity_to_byte(0.5), 128);
        assert_eq!(intensity_to_byte(-2.0), 0);
        assert_eq!(intensity_to_byte(7.0), 255);
        assert_eq!(intensity_to_byte(0.02), 5);
    }

    #[test]
    fn test_white_two_by_two() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.clear(1.0);
        let bytes = canvas.to_pgm_bytes();
        let header = b"P5\n2 2\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_row_major_order() {
        let mut canvas = Canvas::new(3, 2).unwrap();
        canvas.plot(2.0, 0.0, 1.0);
        canvas.plot(0.0, 1.0, 0.5);
        let bytes = canvas.to_pgm_bytes();
        let data = &bytes[canvas.pgm_header().len()..];
        assert_eq!(data, &[0, 0, 255, 128, 0, 0]);
    }

    #[test]
    fn test_save_pgm_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.pgm");

        let mut canvas = Canvas::new(4, 3).unwrap();
        canvas.clear(0.5);
        canvas.save_pgm(&path).unwrap();

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents, canvas.to_pgm_bytes());
        assert_eq!(contents.len(), "P5\n4 3\n255\n".len() + 12);
    }

    #[test]
    fn test_save_pgm_bad_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.pgm");
        let canvas = Canvas::new(1, 1).unwrap();
        assert!(canvas.save_pgm(path).is_err());
    }
}
