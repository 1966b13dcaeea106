use crate::driver::{Device, Driver};
use crate::foundation::core::{Handle, Rect, RgbaFormat, YCbCrFormat};
use crate::foundation::error::{VdpError, VdpResult};
use crate::handles::table::{Object, ObjectKind};
use crate::surface::packed::{PackedSurface, SurfacePixels};
use parking_lot::Mutex;
use std::sync::Arc;

/// Packed RGBA surface; render target of the mixer and compositor and source of presentation.
pub struct OutputSurface {
    pub(crate) device: Arc<Device>,
    pub(crate) format: RgbaFormat,
    pub(crate) pixels: Mutex<PackedSurface>,
}

impl Driver {
    /// Allocate a transparent output surface.
    #[tracing::instrument(skip(self))]
    pub fn output_surface_create(
        &self,
        device: Handle,
        format: RgbaFormat,
        width: u32,
        height: u32,
    ) -> VdpResult<Handle> {
        let device = self.handles.device(device)?;
        let max = self.opts.max_output_surface_size;
        if width > max || height > max {
            return Err(VdpError::invalid_size(format!(
                "output surface {width}x{height} exceeds {max}"
            )));
        }
        format.ensure_supported()?;

        let surface = OutputSurface {
            device,
            format,
            pixels: Mutex::new(PackedSurface::new(width, height)?),
        };
        Ok(self.handles.add(Object::OutputSurface(Arc::new(surface))))
    }

    /// Destroy an output surface.
    #[tracing::instrument(skip(self))]
    pub fn output_surface_destroy(&self, surface: Handle) -> VdpResult<()> {
        self.handles.take(surface, ObjectKind::OutputSurface)?;
        Ok(())
    }

    /// Pixel snapshot of a live output surface, for inspection outside the emulated API.
    pub fn output_surface_pixels(&self, surface: Handle) -> VdpResult<SurfacePixels> {
        let surface = self.handles.output_surface(surface)?;
        let pixels = surface.pixels.lock();
        tracing::trace!(
            screen = surface.device.screen,
            format = ?surface.format,
            "output surface snapshot"
        );
        Ok(SurfacePixels::capture(&pixels))
    }

    /// Not implemented.
    pub fn output_surface_query_capabilities(
        &self,
        _device: Handle,
        _format: RgbaFormat,
    ) -> VdpResult<(bool, u32, u32)> {
        Err(VdpError::no_implementation("output_surface_query_capabilities"))
    }

    /// Not implemented.
    pub fn output_surface_query_get_put_bits_native_capabilities(
        &self,
        _device: Handle,
        _format: RgbaFormat,
    ) -> VdpResult<bool> {
        Err(VdpError::no_implementation(
            "output_surface_query_get_put_bits_native_capabilities",
        ))
    }

    /// Not implemented.
    pub fn output_surface_query_put_bits_indexed_capabilities(
        &self,
        _device: Handle,
        _format: RgbaFormat,
        _bits_index_format: u32,
        _color_table_format: u32,
    ) -> VdpResult<bool> {
        Err(VdpError::no_implementation(
            "output_surface_query_put_bits_indexed_capabilities",
        ))
    }

    /// Not implemented.
    pub fn output_surface_query_put_bits_ycbcr_capabilities(
        &self,
        _device: Handle,
        _format: RgbaFormat,
        _ycbcr_format: YCbCrFormat,
    ) -> VdpResult<bool> {
        Err(VdpError::no_implementation(
            "output_surface_query_put_bits_ycbcr_capabilities",
        ))
    }

    /// Not implemented; see [`Driver::output_surface_pixels`].
    pub fn output_surface_get_parameters(
        &self,
        _surface: Handle,
    ) -> VdpResult<(RgbaFormat, u32, u32)> {
        Err(VdpError::no_implementation("output_surface_get_parameters"))
    }

    /// Not implemented.
    pub fn output_surface_get_bits_native(
        &self,
        _surface: Handle,
        _source_rect: Option<Rect>,
        _destination_data: &mut [u8],
        _destination_pitch: u32,
    ) -> VdpResult<()> {
        Err(VdpError::no_implementation("output_surface_get_bits_native"))
    }

    /// Not implemented.
    pub fn output_surface_put_bits_native(
        &self,
        _surface: Handle,
        _source_data: &[u8],
        _source_pitch: u32,
        _destination_rect: Option<Rect>,
    ) -> VdpResult<()> {
        Err(VdpError::no_implementation("output_surface_put_bits_native"))
    }

    /// Not implemented.
    pub fn output_surface_put_bits_indexed(
        &self,
        _surface: Handle,
        _source_data: &[u8],
        _source_pitch: u32,
        _destination_rect: Option<Rect>,
        _color_table: &[u8],
    ) -> VdpResult<()> {
        Err(VdpError::no_implementation("output_surface_put_bits_indexed"))
    }

    /// Not implemented.
    pub fn output_surface_put_bits_ycbcr(
        &self,
        _surface: Handle,
        _source_format: YCbCrFormat,
        _source_data: &[&[u8]],
        _source_pitches: &[u32],
        _destination_rect: Option<Rect>,
    ) -> VdpResult<()> {
        Err(VdpError::no_implementation("output_surface_put_bits_ycbcr"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/output.rs"]
mod tests;
