//! The rendered pixel buffer and image persistence.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageResult, RgbImage};

/// 8-bit channel ceiling used for quantization and as the PPM maxval.
pub const MAX_COLOR: u8 = 255;

/// PPM flavor: ASCII `P3` or binary `P6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpmFormat {
    Ascii,
    Binary,
}

/// A finished raster image: row-major RGB byte triples, pixel index
/// `width * row + column`, zero-initialized to black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    max_color: u8,
    data: Vec<[u8; 3]>,
}

impl PixelBuffer {
    /// An all-black buffer of the given dimensions.
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            max_color: MAX_COLOR,
            data: vec![[0, 0, 0]; width as usize * height as usize],
        }
    }

    /// Wrap an already rendered row-major pixel vector.
    pub fn from_pixels(width: u32, height: u32, data: Vec<[u8; 3]>) -> PixelBuffer {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        PixelBuffer {
            width,
            height,
            max_color: MAX_COLOR,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_color(&self) -> u8 {
        self.max_color
    }

    pub fn pixel(&self, row: u32, column: u32) -> [u8; 3] {
        self.data[(self.width * row + column) as usize]
    }

    pub fn set_pixel(&mut self, row: u32, column: u32, rgb: [u8; 3]) {
        self.data[(self.width * row + column) as usize] = rgb;
    }

    fn flat_bytes(&self) -> Vec<u8> {
        self.data.iter().flatten().copied().collect()
    }

    /// Convert into the `image` crate's buffer type.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.flat_bytes())
            .expect("pixel data length matches dimensions")
    }

    /// Encode as PPM into `writer`, either ASCII `P3` or binary `P6`.
    pub fn write_ppm<W: Write>(&self, writer: W, format: PpmFormat) -> ImageResult<()> {
        let encoding = match format {
            PpmFormat::Ascii => SampleEncoding::Ascii,
            PpmFormat::Binary => SampleEncoding::Binary,
        };
        let encoder = PnmEncoder::new(writer).with_subtype(PnmSubtype::Pixmap(encoding));
        encoder.write_image(
            &self.flat_bytes(),
            self.width,
            self.height,
            ExtendedColorType::Rgb8,
        )
    }

    /// Write the image to `path`, picking the container from the extension.
    ///
    /// `.ppm` paths get binary `P6` data; everything else goes through the
    /// `image` crate's extension dispatch (PNG, BMP, ...).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageError> {
        let path = path.as_ref();
        if path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("ppm")) {
            let writer = BufWriter::new(File::create(path)?);
            self.write_ppm(writer, PpmFormat::Binary)
        } else {
            self.to_image().save(path)
        }
    }
}
