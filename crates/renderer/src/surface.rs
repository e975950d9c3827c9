//! Host pixel surfaces.
//!
//! The renderer draws its visible output through the [`Surface`] trait so the
//! host decides how pixels are stored. Two hosts are provided:
//!
//! - [`BufferSurface`]: straight RGBA in a `Vec<u8>`. What you write is what
//!   you read back.
//! - [`PixmapSurface`]: a `tiny_skia::Pixmap`, which keeps pixels
//!   premultiplied. Raw writes are taken as already premultiplied and reads
//!   are demultiplied, so straight colors written to it come back brighter.
//!   The palette probe detects this and the colorize pass compensates.

use heatmap_common::{HeatmapError, HeatmapResult};

use crate::bounds::Rect;
use crate::png::create_png_auto;

/// A rectangular RGBA pixel buffer supplied by the host.
pub trait Surface: Sized {
    /// Allocate a fully transparent surface.
    fn with_size(width: u32, height: u32) -> HeatmapResult<Self>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Read a block of straight RGBA pixels, row-major.
    fn read_rgba(&self, rect: Rect) -> HeatmapResult<Vec<u8>>;

    /// Write a block of RGBA pixels, row-major.
    fn write_rgba(&mut self, rect: Rect, data: &[u8]) -> HeatmapResult<()>;

    /// Encode the surface as a PNG image.
    fn encode_png(&self) -> HeatmapResult<Vec<u8>>;

    fn read_pixel(&self, x: u32, y: u32) -> HeatmapResult<[u8; 4]> {
        let block = self.read_rgba(Rect::new(x, y, x + 1, y + 1))?;
        Ok([block[0], block[1], block[2], block[3]])
    }

    fn write_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> HeatmapResult<()> {
        self.write_rgba(Rect::new(x, y, x + 1, y + 1), &rgba)
    }
}

fn check_rect(rect: Rect, width: u32, height: u32) -> HeatmapResult<()> {
    if !rect.fits(width, height) {
        return Err(HeatmapError::Surface(format!(
            "region {:?} outside {}x{} surface",
            rect, width, height
        )));
    }
    Ok(())
}

fn check_len(rect: Rect, data: &[u8]) -> HeatmapResult<()> {
    if data.len() != rect.area() * 4 {
        return Err(HeatmapError::Surface(format!(
            "expected {} bytes for region {:?}, got {}",
            rect.area() * 4,
            rect,
            data.len()
        )));
    }
    Ok(())
}

/// Copy a block out of a tightly packed RGBA buffer.
fn copy_out(pixels: &[u8], stride: u32, rect: Rect) -> Vec<u8> {
    let row_len = rect.width() as usize * 4;
    let mut block = Vec::with_capacity(rect.area() * 4);
    for y in rect.top..rect.bottom {
        let start = (y as usize * stride as usize + rect.left as usize) * 4;
        block.extend_from_slice(&pixels[start..start + row_len]);
    }
    block
}

/// Copy a block into a tightly packed RGBA buffer.
fn copy_in(pixels: &mut [u8], stride: u32, rect: Rect, data: &[u8]) {
    let row_len = rect.width() as usize * 4;
    if row_len == 0 {
        return;
    }
    for (row, src) in data.chunks_exact(row_len).enumerate() {
        let y = rect.top as usize + row;
        let start = (y * stride as usize + rect.left as usize) * 4;
        pixels[start..start + row_len].copy_from_slice(src);
    }
}

// ============================================================================
// BufferSurface
// ============================================================================

/// Straight (non-premultiplied) RGBA buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl BufferSurface {
    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl Surface for BufferSurface {
    fn with_size(width: u32, height: u32) -> HeatmapResult<Self> {
        if width == 0 || height == 0 {
            return Err(HeatmapError::Surface(format!(
                "cannot allocate {}x{} surface",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn read_rgba(&self, rect: Rect) -> HeatmapResult<Vec<u8>> {
        check_rect(rect, self.width, self.height)?;
        Ok(copy_out(&self.pixels, self.width, rect))
    }

    fn write_rgba(&mut self, rect: Rect, data: &[u8]) -> HeatmapResult<()> {
        check_rect(rect, self.width, self.height)?;
        check_len(rect, data)?;
        copy_in(&mut self.pixels, self.width, rect, data);
        Ok(())
    }

    fn encode_png(&self) -> HeatmapResult<Vec<u8>> {
        create_png_auto(&self.pixels, self.width as usize, self.height as usize)
    }
}

// ============================================================================
// PixmapSurface
// ============================================================================

/// Surface backed by a premultiplied `tiny_skia::Pixmap`.
#[derive(Clone)]
pub struct PixmapSurface {
    pixmap: tiny_skia::Pixmap,
}

impl PixmapSurface {
    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }
}

/// Undo premultiplication of one raw pixel.
fn demultiply(px: &mut [u8]) {
    let a = px[3] as u32;
    if a == 0 {
        px[..3].fill(0);
        return;
    }
    for c in &mut px[..3] {
        *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
    }
}

impl Surface for PixmapSurface {
    fn with_size(width: u32, height: u32) -> HeatmapResult<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            HeatmapError::Surface(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        Ok(Self { pixmap })
    }

    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn read_rgba(&self, rect: Rect) -> HeatmapResult<Vec<u8>> {
        check_rect(rect, self.width(), self.height())?;
        let mut block = copy_out(self.pixmap.data(), self.width(), rect);
        block.chunks_exact_mut(4).for_each(demultiply);
        Ok(block)
    }

    fn write_rgba(&mut self, rect: Rect, data: &[u8]) -> HeatmapResult<()> {
        check_rect(rect, self.width(), self.height())?;
        check_len(rect, data)?;
        let stride = self.width();
        copy_in(self.pixmap.data_mut(), stride, rect, data);
        Ok(())
    }

    fn encode_png(&self) -> HeatmapResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| HeatmapError::Encode(e.to_string()))
    }
}
