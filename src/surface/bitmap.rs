use crate::driver::{Device, Driver};
use crate::foundation::core::{Handle, Rect, RgbaFormat};
use crate::foundation::error::{VdpError, VdpResult};
use crate::handles::table::{Object, ObjectKind};
use crate::render::composite::{Operator, paint};
use crate::surface::packed::{ImageView, PackedSurface, SurfacePixels};
use parking_lot::Mutex;
use std::sync::Arc;

/// Packed RGBA surface used as a compositing source.
pub struct BitmapSurface {
    pub(crate) device: Arc<Device>,
    pub(crate) format: RgbaFormat,
    pub(crate) frequently_accessed: bool,
    pub(crate) pixels: Mutex<PackedSurface>,
}

/// Answer of the bitmap surface capability query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BitmapSurfaceCapabilities {
    /// Always `true`; creation does its own format check.
    pub is_supported: bool,
    /// Advertised maximum width. Creation does not enforce it.
    pub max_width: u32,
    /// Advertised maximum height.
    pub max_height: u32,
}

impl Driver {
    /// Capability query for bitmap surfaces. The answer does not depend on `format`.
    #[tracing::instrument(skip(self))]
    pub fn bitmap_surface_query_capabilities(
        &self,
        device: Handle,
        format: RgbaFormat,
    ) -> VdpResult<BitmapSurfaceCapabilities> {
        self.handles.device(device)?;
        Ok(BitmapSurfaceCapabilities {
            is_supported: true,
            max_width: self.opts.max_bitmap_surface_size,
            max_height: self.opts.max_bitmap_surface_size,
        })
    }

    /// Allocate a transparent bitmap surface.
    #[tracing::instrument(skip(self))]
    pub fn bitmap_surface_create(
        &self,
        device: Handle,
        format: RgbaFormat,
        width: u32,
        height: u32,
        frequently_accessed: bool,
    ) -> VdpResult<Handle> {
        let device = self.handles.device(device)?;
        format.ensure_supported()?;

        let surface = BitmapSurface {
            device,
            format,
            frequently_accessed,
            pixels: Mutex::new(PackedSurface::new(width, height)?),
        };
        Ok(self.handles.add(Object::BitmapSurface(Arc::new(surface))))
    }

    /// Destroy a bitmap surface.
    #[tracing::instrument(skip(self))]
    pub fn bitmap_surface_destroy(&self, surface: Handle) -> VdpResult<()> {
        self.handles.take(surface, ObjectKind::BitmapSurface)?;
        Ok(())
    }

    /// Parameter readback is not implemented.
    pub fn bitmap_surface_get_parameters(
        &self,
        _surface: Handle,
    ) -> VdpResult<(RgbaFormat, u32, u32, bool)> {
        Err(VdpError::no_implementation("bitmap_surface_get_parameters"))
    }

    /// Overwrite `destination_rect` (default: whole surface) with caller pixels.
    ///
    /// `source_data` holds one row per `source_pitch` bytes in the surface's own format; the copy
    /// replaces destination pixels outright and is clipped to the surface.
    #[tracing::instrument(skip(self, source_data))]
    pub fn bitmap_surface_put_bits_native(
        &self,
        surface: Handle,
        source_data: &[u8],
        source_pitch: u32,
        destination_rect: Option<Rect>,
    ) -> VdpResult<()> {
        let surface = self.handles.bitmap_surface(surface)?;
        let mut pixels = surface.pixels.lock();
        let rect = destination_rect.unwrap_or_else(|| pixels.bounds());
        let src = ImageView::from_external(
            source_data,
            rect.width(),
            rect.height(),
            source_pitch as usize,
        )?;
        paint(
            &mut pixels,
            src,
            (i64::from(rect.x0), i64::from(rect.y0)),
            rect,
            Operator::Source,
        );
        pixels.mark_dirty();
        tracing::debug!(
            screen = surface.device.screen,
            format = ?surface.format,
            frequently_accessed = surface.frequently_accessed,
            "bitmap bits uploaded"
        );
        Ok(())
    }

    /// Pixel snapshot of a live bitmap surface, for inspection outside the emulated API.
    pub fn bitmap_surface_pixels(&self, surface: Handle) -> VdpResult<SurfacePixels> {
        let surface = self.handles.bitmap_surface(surface)?;
        let pixels = surface.pixels.lock();
        Ok(SurfacePixels::capture(&pixels))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/bitmap.rs"]
mod tests;
