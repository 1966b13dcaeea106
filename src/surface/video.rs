use crate::driver::{Device, Driver};
use crate::foundation::core::{ChromaType, Handle, YCbCrFormat};
use crate::foundation::error::{VdpError, VdpResult};
use crate::handles::table::{Object, ObjectKind};
use parking_lot::Mutex;
use std::sync::Arc;

/// Three-plane Y'CbCr storage. Chroma planes are kept in V-then-U order.
pub(crate) struct Planes {
    pub(crate) y: Vec<u8>,
    pub(crate) v: Vec<u8>,
    pub(crate) u: Vec<u8>,
}

/// Planar video surface.
pub struct VideoSurface {
    pub(crate) device: Arc<Device>,
    pub(crate) chroma_type: ChromaType,
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Luma row pitch: `width` rounded up to a multiple of 4. Chroma rows use half of it.
    pub(crate) stride: u32,
    pub(crate) planes: Mutex<Planes>,
}

/// Geometry of a live video surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoSurfaceInfo {
    /// Chroma type given at creation.
    pub chroma_type: ChromaType,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Luma row pitch in bytes.
    pub stride: u32,
    /// Screen of the owning device.
    pub screen: i32,
}

/// Answer of the video surface capability query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoSurfaceCapabilities {
    /// Always `true`: every chroma type is accepted.
    pub is_supported: bool,
    /// Largest advertised width.
    pub max_width: u32,
    /// Largest advertised height.
    pub max_height: u32,
}

fn luma_stride(width: u32) -> u32 {
    if width.is_multiple_of(4) {
        width
    } else {
        (width & !3).saturating_add(4)
    }
}

fn alloc_plane(len: usize) -> VdpResult<Vec<u8>> {
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(len)
        .map_err(|e| VdpError::resources(format!("video plane of {len} bytes: {e}")))?;
    plane.resize(len, 0);
    Ok(plane)
}

/// Bytes a plane of `rows` rows at `pitch` must hold when each row carries `row_bytes`.
fn plane_extent(rows: usize, pitch: usize, row_bytes: usize) -> usize {
    match rows {
        0 => 0,
        r => pitch * (r - 1) + row_bytes,
    }
}

#[derive(Clone, Copy)]
struct PlaneLayout {
    rows: usize,
    row_bytes: usize,
    stride: usize,
}

impl VideoSurface {
    fn layouts(&self) -> [PlaneLayout; 3] {
        let stride = self.stride as usize;
        let chroma = PlaneLayout {
            rows: self.height as usize / 2,
            row_bytes: self.width as usize / 2,
            stride: stride / 2,
        };
        [
            PlaneLayout {
                rows: self.height as usize,
                row_bytes: self.width as usize,
                stride,
            },
            chroma,
            chroma,
        ]
    }

    pub(crate) fn info(&self) -> VideoSurfaceInfo {
        VideoSurfaceInfo {
            chroma_type: self.chroma_type,
            width: self.width,
            height: self.height,
            stride: self.stride,
            screen: self.device.screen,
        }
    }
}

fn check_planes<T>(planes: &[T], pitches: &[u32]) -> VdpResult<()> {
    if planes.len() < 3 || pitches.len() < 3 {
        return Err(VdpError::invalid_pointer(format!(
            "planar transfer needs 3 planes and 3 pitches, got {} and {}",
            planes.len(),
            pitches.len()
        )));
    }
    Ok(())
}

impl Driver {
    /// Capability query for video surfaces; every chroma type reports supported.
    #[tracing::instrument(skip(self))]
    pub fn video_surface_query_capabilities(
        &self,
        device: Handle,
        chroma_type: ChromaType,
    ) -> VdpResult<VideoSurfaceCapabilities> {
        self.handles.device(device)?;
        Ok(VideoSurfaceCapabilities {
            is_supported: true,
            max_width: self.opts.max_video_surface_width,
            max_height: self.opts.max_video_surface_height,
        })
    }

    /// Capability query for planar transfers; every combination reports supported.
    #[tracing::instrument(skip(self))]
    pub fn video_surface_query_get_put_bits_ycbcr_capabilities(
        &self,
        device: Handle,
        chroma_type: ChromaType,
        format: YCbCrFormat,
    ) -> VdpResult<bool> {
        self.handles.device(device)?;
        Ok(true)
    }

    /// Allocate a zero-filled planar surface.
    #[tracing::instrument(skip(self))]
    pub fn video_surface_create(
        &self,
        device: Handle,
        chroma_type: ChromaType,
        width: u32,
        height: u32,
    ) -> VdpResult<Handle> {
        let device = self.handles.device(device)?;
        let stride = luma_stride(width);
        let luma_len = (stride as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| VdpError::resources(format!("video surface {width}x{height}")))?;
        let chroma_len = luma_len / chroma_type.storage_divider();

        // A failed allocation drops whatever planes were already reserved.
        let planes = Planes {
            y: alloc_plane(luma_len)?,
            v: alloc_plane(chroma_len)?,
            u: alloc_plane(chroma_len)?,
        };
        let surface = VideoSurface {
            device,
            chroma_type,
            width,
            height,
            stride,
            planes: Mutex::new(planes),
        };
        Ok(self.handles.add(Object::VideoSurface(Arc::new(surface))))
    }

    /// Destroy a video surface.
    #[tracing::instrument(skip(self))]
    pub fn video_surface_destroy(&self, surface: Handle) -> VdpResult<()> {
        self.handles.take(surface, ObjectKind::VideoSurface)?;
        Ok(())
    }

    /// Parameter readback is not implemented.
    pub fn video_surface_get_parameters(
        &self,
        _surface: Handle,
    ) -> VdpResult<(ChromaType, u32, u32)> {
        Err(VdpError::no_implementation("video_surface_get_parameters"))
    }

    /// Geometry of a live video surface, for inspection outside the emulated API.
    pub fn video_surface_info(&self, surface: Handle) -> VdpResult<VideoSurfaceInfo> {
        Ok(self.handles.video_surface(surface)?.info())
    }

    /// Upload three YV12 planes (Y, V, U) into `surface`.
    ///
    /// Luma copies `width` bytes for `height` rows; each chroma plane copies `width / 2` bytes for
    /// `height / 2` rows. Any other format fails with `InvalidYCbCrFormat`.
    #[tracing::instrument(skip(self, source_data))]
    pub fn video_surface_put_bits_ycbcr(
        &self,
        surface: Handle,
        format: YCbCrFormat,
        source_data: &[&[u8]],
        source_pitches: &[u32],
    ) -> VdpResult<()> {
        let surface = self.handles.video_surface(surface)?;
        if format != YCbCrFormat::Yv12 {
            return Err(VdpError::invalid_ycbcr_format(format!(
                "put_bits_ycbcr supports only Yv12, got {format:?}"
            )));
        }
        check_planes(source_data, source_pitches)?;

        let layouts = surface.layouts();
        for (i, layout) in layouts.iter().enumerate() {
            let pitch = source_pitches[i] as usize;
            if layout.rows > 0 && pitch < layout.row_bytes {
                return Err(VdpError::invalid_value(format!(
                    "plane {i} pitch {pitch} below row size {}",
                    layout.row_bytes
                )));
            }
            let needed = plane_extent(layout.rows, pitch, layout.row_bytes);
            if source_data[i].len() < needed {
                return Err(VdpError::invalid_value(format!(
                    "plane {i} holds {} bytes, {needed} required",
                    source_data[i].len()
                )));
            }
        }

        let mut planes = surface.planes.lock();
        let Planes { y, v, u } = &mut *planes;
        for ((dst, src), (layout, pitch)) in [y, v, u]
            .into_iter()
            .zip(source_data.iter())
            .zip(layouts.iter().zip(source_pitches.iter()))
        {
            let pitch = *pitch as usize;
            for row in 0..layout.rows {
                let s = row * pitch;
                let d = row * layout.stride;
                dst[d..d + layout.row_bytes].copy_from_slice(&src[s..s + layout.row_bytes]);
            }
        }
        Ok(())
    }

    /// Read the surface back as three YV12 planes (Y, V, U).
    #[tracing::instrument(skip(self, destination_data))]
    pub fn video_surface_get_bits_ycbcr(
        &self,
        surface: Handle,
        format: YCbCrFormat,
        destination_data: &mut [&mut [u8]],
        destination_pitches: &[u32],
    ) -> VdpResult<()> {
        let surface = self.handles.video_surface(surface)?;
        if format != YCbCrFormat::Yv12 {
            return Err(VdpError::invalid_ycbcr_format(format!(
                "get_bits_ycbcr supports only Yv12, got {format:?}"
            )));
        }
        check_planes(destination_data, destination_pitches)?;

        let layouts = surface.layouts();
        for (i, layout) in layouts.iter().enumerate() {
            let pitch = destination_pitches[i] as usize;
            if layout.rows > 0 && pitch < layout.row_bytes {
                return Err(VdpError::invalid_value(format!(
                    "plane {i} pitch {pitch} below row size {}",
                    layout.row_bytes
                )));
            }
            let needed = plane_extent(layout.rows, pitch, layout.row_bytes);
            if destination_data[i].len() < needed {
                return Err(VdpError::invalid_value(format!(
                    "plane {i} holds {} bytes, {needed} required",
                    destination_data[i].len()
                )));
            }
        }

        let planes = surface.planes.lock();
        for ((dst, src), (layout, pitch)) in destination_data
            .iter_mut()
            .zip([&planes.y, &planes.v, &planes.u])
            .zip(layouts.iter().zip(destination_pitches.iter()))
        {
            let pitch = *pitch as usize;
            for row in 0..layout.rows {
                let s = row * layout.stride;
                let d = row * pitch;
                dst[d..d + layout.row_bytes].copy_from_slice(&src[s..s + layout.row_bytes]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/video.rs"]
mod tests;
