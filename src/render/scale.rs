//! Format conversion and resampling between pixel stores.

use crate::foundation::error::{VdpError, VdpResult};

/// Pixel layouts the scaler reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PixelFormat {
    /// Three planes: full-resolution Y, half-resolution U and V.
    Yuv420p,
    /// Packed `B8G8R8A8`.
    Bgra,
}

/// Resampling filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Filter {
    /// Nearest neighbour: `(x * src_w / dst_w, y * src_h / dst_h)`.
    Point,
    /// Linear interpolation between the four nearest source pixels.
    Bilinear,
}

/// One source plane with its row pitch.
#[derive(Clone, Copy)]
pub(crate) struct Plane<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) stride: usize,
}

/// Configured conversion from one format and size to packed `B8G8R8A8`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScaleContext {
    pub(crate) src_format: PixelFormat,
    pub(crate) src_w: u32,
    pub(crate) src_h: u32,
    pub(crate) dst_w: u32,
    pub(crate) dst_h: u32,
    pub(crate) filter: Filter,
}

impl ScaleContext {
    pub(crate) fn new(
        src_format: PixelFormat,
        (src_w, src_h): (u32, u32),
        dst_format: PixelFormat,
        (dst_w, dst_h): (u32, u32),
        filter: Filter,
    ) -> VdpResult<Self> {
        if dst_format != PixelFormat::Bgra {
            return Err(VdpError::invalid_value(format!(
                "scaler cannot write {dst_format:?}"
            )));
        }
        Ok(Self {
            src_format,
            src_w,
            src_h,
            dst_w,
            dst_h,
            filter,
        })
    }

    /// Convert `src` into `dst` and return the number of destination rows written.
    ///
    /// An empty source writes nothing; callers compare the row count against the height they
    /// expected.
    pub(crate) fn scale(
        &self,
        src: &[Plane<'_>],
        dst: &mut [u8],
        dst_stride: usize,
    ) -> VdpResult<u32> {
        if self.src_w == 0 || self.src_h == 0 || self.dst_w == 0 || self.dst_h == 0 {
            return Ok(0);
        }
        let dst_row = self.dst_w as usize * 4;
        if dst_stride < dst_row || dst.len() < dst_stride * (self.dst_h as usize - 1) + dst_row {
            return Err(VdpError::invalid_value(format!(
                "destination too small for {}x{}",
                self.dst_w, self.dst_h
            )));
        }

        match self.src_format {
            PixelFormat::Yuv420p => self.yuv420p_to_bgra(src, dst, dst_stride),
            PixelFormat::Bgra => self.bgra_to_bgra(src, dst, dst_stride),
        }
    }

    fn yuv420p_to_bgra(
        &self,
        src: &[Plane<'_>],
        dst: &mut [u8],
        dst_stride: usize,
    ) -> VdpResult<u32> {
        let [y, u, v] = match src {
            [y, u, v, ..] => [*y, *u, *v],
            _ => {
                return Err(VdpError::invalid_value("yuv420p source needs three planes"));
            }
        };
        let (sw, sh) = (self.src_w as usize, self.src_h as usize);
        if y.data.len() < plane_len(y.stride, sw, sh)
            || u.data.len() < plane_len(u.stride, sw / 2, sh / 2)
            || v.data.len() < plane_len(v.stride, sw / 2, sh / 2)
        {
            return Err(VdpError::invalid_value("yuv420p planes too small"));
        }

        for dy in 0..self.dst_h as usize {
            let sy = dy * sh / self.dst_h as usize;
            let cy = (sy / 2).min((sh / 2).saturating_sub(1));
            let row = &mut dst[dy * dst_stride..dy * dst_stride + self.dst_w as usize * 4];
            for (dx, px) in row.chunks_exact_mut(4).enumerate() {
                let sx = dx * sw / self.dst_w as usize;
                let cx = (sx / 2).min((sw / 2).saturating_sub(1));
                let luma = y.data[sy * y.stride + sx];
                let (cb, cr) = if sw >= 2 && sh >= 2 {
                    (u.data[cy * u.stride + cx], v.data[cy * v.stride + cx])
                } else {
                    (128, 128)
                };
                px.copy_from_slice(&ycbcr_to_bgra(luma, cb, cr));
            }
        }
        Ok(self.dst_h)
    }

    fn bgra_to_bgra(&self, src: &[Plane<'_>], dst: &mut [u8], dst_stride: usize) -> VdpResult<u32> {
        let plane = src
            .first()
            .ok_or_else(|| VdpError::invalid_value("bgra source needs one plane"))?;
        let src_row = self.src_w as usize * 4;
        let needed = plane_len(plane.stride, src_row, self.src_h as usize);
        if plane.stride < src_row || plane.data.len() < needed {
            return Err(VdpError::invalid_value("bgra source too small"));
        }

        if (self.src_w, self.src_h) == (self.dst_w, self.dst_h) {
            for y in 0..self.src_h as usize {
                dst[y * dst_stride..y * dst_stride + src_row]
                    .copy_from_slice(&plane.data[y * plane.stride..y * plane.stride + src_row]);
            }
            return Ok(self.dst_h);
        }

        let mut packed = Vec::with_capacity(src_row * self.src_h as usize);
        for row in plane.data.chunks(plane.stride).take(self.src_h as usize) {
            packed.extend_from_slice(&row[..src_row]);
        }
        // The byte order is carried through untouched, so the RGBA view is only a container.
        let img = image::RgbaImage::from_raw(self.src_w, self.src_h, packed)
            .ok_or_else(|| VdpError::error("scaler source buffer size mismatch"))?;
        let filter = match self.filter {
            Filter::Point => image::imageops::FilterType::Nearest,
            Filter::Bilinear => image::imageops::FilterType::Triangle,
        };
        let scaled = image::imageops::resize(&img, self.dst_w, self.dst_h, filter);

        let dst_row = self.dst_w as usize * 4;
        let mut rows = 0u32;
        for (y, row) in scaled.as_raw().chunks_exact(dst_row).enumerate() {
            dst[y * dst_stride..y * dst_stride + dst_row].copy_from_slice(row);
            rows += 1;
        }
        Ok(rows)
    }
}

fn plane_len(stride: usize, row_bytes: usize, rows: usize) -> usize {
    match rows {
        0 => 0,
        r => stride * (r - 1) + row_bytes,
    }
}

/// BT.601 limited-range Y'CbCr to opaque `[b, g, r, a]`.
pub(crate) fn ycbcr_to_bgra(y: u8, cb: u8, cr: u8) -> [u8; 4] {
    let c = i32::from(y) - 16;
    let d = i32::from(cb) - 128;
    let e = i32::from(cr) - 128;
    let clamp = |v: i32| v.clamp(0, 255) as u8;
    let r = clamp((298 * c + 409 * e + 128) >> 8);
    let g = clamp((298 * c - 100 * d - 208 * e + 128) >> 8);
    let b = clamp((298 * c + 516 * d + 128) >> 8);
    [b, g, r, 255]
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
