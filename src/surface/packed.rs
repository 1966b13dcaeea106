use crate::foundation::core::Rect;
use crate::foundation::error::{VdpError, VdpResult};

/// Packed 32-bit-per-pixel pixel store backing bitmap and output surfaces.
///
/// Rows are tightly packed (`stride == width * 4`). Bytes are kept in `B8G8R8A8` memory order
/// with premultiplied alpha; the pixmap does not interpret channel order, it only owns storage.
pub(crate) struct PackedSurface {
    pixmap: vello_cpu::Pixmap,
    generation: u64,
}

impl PackedSurface {
    pub(crate) fn new(width: u32, height: u32) -> VdpResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| VdpError::invalid_size(format!("surface width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| VdpError::invalid_size(format!("surface height {height} exceeds u16")))?;
        let len = usize::from(w) * usize::from(h);
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| {
            VdpError::resources(format!("cannot allocate {width}x{height} surface"))
        })?;
        let clear = vello_cpu::peniko::color::PremulRgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        };
        pixels.resize(len, clear);
        Ok(Self {
            pixmap: vello_cpu::Pixmap::from_parts(pixels, w, h),
            generation: 0,
        })
    }

    pub(crate) fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub(crate) fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    pub(crate) fn stride(&self) -> usize {
        self.width() as usize * 4
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    pub(crate) fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Record that pixels were written behind the store's back.
    pub(crate) fn mark_dirty(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of completed writes; lets readers tell whether content changed.
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Borrow the whole surface as a paint source.
    pub(crate) fn view(&self) -> ImageView<'_> {
        ImageView {
            data: self.data(),
            width: self.width(),
            height: self.height(),
            stride: self.stride(),
        }
    }

    /// Copy the whole surface into an owned image.
    pub(crate) fn to_owned_image(&self) -> OwnedImage {
        OwnedImage {
            data: self.data().to_vec(),
            width: self.width(),
            height: self.height(),
            stride: self.stride(),
        }
    }
}

/// Borrowed packed image with an explicit row pitch.
#[derive(Clone, Copy)]
pub(crate) struct ImageView<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) stride: usize,
}

impl<'a> ImageView<'a> {
    /// Wrap caller-provided bytes, enforcing the store's stride rules.
    ///
    /// `stride` must be a multiple of 4 and hold at least one full row, and `data` must cover
    /// every row.
    pub(crate) fn from_external(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> VdpResult<Self> {
        let row = width as usize * 4;
        if !stride.is_multiple_of(4) || stride < row {
            return Err(VdpError::invalid_value(format!(
                "source pitch {stride} is invalid for width {width}"
            )));
        }
        let needed = match height {
            0 => 0,
            h => stride * (h as usize - 1) + row,
        };
        if data.len() < needed {
            return Err(VdpError::invalid_value(format!(
                "source holds {} bytes, {needed} required",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = y as usize * self.stride + x as usize * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// Owned packed image, used for scratch results and aliasing-free copies.
pub(crate) struct OwnedImage {
    pub(crate) data: Vec<u8>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) stride: usize,
}

impl OwnedImage {
    /// Zero-filled image; sizes that overflow or cannot be reserved fail with `Resources`.
    pub(crate) fn try_new(width: u32, height: u32) -> VdpResult<Self> {
        let (stride, len) = (width as usize)
            .checked_mul(4)
            .and_then(|stride| Some((stride, stride.checked_mul(height as usize)?)))
            .ok_or_else(|| VdpError::resources(format!("scratch image {width}x{height}")))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| VdpError::resources(format!("scratch image {width}x{height}: {e}")))?;
        data.resize(len, 0);
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub(crate) fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }
}

/// Pixel snapshot of a packed surface, for inspection and readback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfacePixels {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row pitch in bytes.
    pub stride: usize,
    /// Write generation the snapshot was taken at.
    pub generation: u64,
    /// `B8G8R8A8` premultiplied bytes.
    pub data: Vec<u8>,
}

impl SurfacePixels {
    pub(crate) fn capture(surface: &PackedSurface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            stride: surface.stride(),
            generation: surface.generation(),
            data: surface.data().to_vec(),
        }
    }

    /// `[b, g, r, a]` at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = y as usize * self.stride + x as usize * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/packed.rs"]
mod tests;
