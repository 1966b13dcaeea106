use crate::driver::{Device, Driver};
use crate::foundation::core::{ChromaType, Color, CscMatrix, Handle, PictureStructure, Rect};
use crate::foundation::error::{VdpError, VdpResult};
use crate::handles::table::{Object, ObjectKind};
use crate::render::scale::{Filter, PixelFormat, Plane, ScaleContext};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Optional post-processing features a mixer can be created with.
#[repr(u32)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[allow(missing_docs)]
pub enum MixerFeature {
    DeinterlaceTemporal = 0,
    DeinterlaceTemporalSpatial = 1,
    InverseTelecine = 2,
    NoiseReduction = 3,
    Sharpness = 4,
    LumaKey = 5,
    HighQualityScalingL1 = 11,
    HighQualityScalingL2 = 12,
    HighQualityScalingL3 = 13,
    HighQualityScalingL4 = 14,
    HighQualityScalingL5 = 15,
    HighQualityScalingL6 = 16,
    HighQualityScalingL7 = 17,
    HighQualityScalingL8 = 18,
    HighQualityScalingL9 = 19,
}

impl MixerFeature {
    /// Decode a raw feature id.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        use MixerFeature::*;
        Ok(match raw {
            0 => DeinterlaceTemporal,
            1 => DeinterlaceTemporalSpatial,
            2 => InverseTelecine,
            3 => NoiseReduction,
            4 => Sharpness,
            5 => LumaKey,
            11 => HighQualityScalingL1,
            12 => HighQualityScalingL2,
            13 => HighQualityScalingL3,
            14 => HighQualityScalingL4,
            15 => HighQualityScalingL5,
            16 => HighQualityScalingL6,
            17 => HighQualityScalingL7,
            18 => HighQualityScalingL8,
            19 => HighQualityScalingL9,
            other => {
                return Err(VdpError::InvalidVideoMixerFeature(format!(
                    "unknown mixer feature {other}"
                )));
            }
        })
    }
}

/// Creation-time mixer parameter with its value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MixerParameter {
    /// Width of the video surfaces that will be mixed.
    VideoSurfaceWidth(u32),
    /// Height of the video surfaces that will be mixed.
    VideoSurfaceHeight(u32),
    /// Chroma type of the video surfaces that will be mixed.
    ChromaType(ChromaType),
    /// Number of overlay layers.
    Layers(u32),
}

impl MixerParameter {
    /// Decode a raw `(id, value)` pair.
    pub fn from_raw(id: u32, value: u32) -> VdpResult<Self> {
        match id {
            0 => Ok(Self::VideoSurfaceWidth(value)),
            1 => Ok(Self::VideoSurfaceHeight(value)),
            2 => Ok(Self::ChromaType(ChromaType::from_raw(value)?)),
            3 => Ok(Self::Layers(value)),
            other => Err(VdpError::InvalidVideoMixerParameter(format!(
                "unknown mixer parameter {other}"
            ))),
        }
    }
}

/// Runtime mixer attribute with its value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MixerAttributeValue {
    /// Fill color outside the video rect.
    BackgroundColor(Color),
    /// Conversion matrix; `None` restores the default.
    CscMatrix(Option<CscMatrix>),
    /// Noise reduction strength in `[0, 1]`.
    NoiseReductionLevel(f32),
    /// Sharpness in `[-1, 1]`.
    SharpnessLevel(f32),
    /// Lower luma-key bound.
    LumaKeyMinLuma(f32),
    /// Upper luma-key bound.
    LumaKeyMaxLuma(f32),
    /// Skip chroma deinterlacing.
    SkipChromaDeinterlace(bool),
}

/// Overlay layer passed to [`Driver::video_mixer_render`]. Accepted and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layer {
    /// Must be 0.
    pub struct_version: u32,
    /// Bitmap or output surface to overlay.
    pub source_surface: Handle,
    /// Region of the overlay source.
    pub source_rect: Option<Rect>,
    /// Region of the destination.
    pub destination_rect: Option<Rect>,
}

#[derive(Default)]
struct MixerState {
    enables: BTreeMap<MixerFeature, bool>,
    attributes: Vec<MixerAttributeValue>,
}

/// Video mixer: turns the current video surface into output-surface pixels.
pub struct VideoMixer {
    pub(crate) device: Arc<Device>,
    pub(crate) features: Vec<MixerFeature>,
    pub(crate) parameters: Vec<MixerParameter>,
    state: Mutex<MixerState>,
}

/// Arguments of [`Driver::video_mixer_render`].
///
/// Only `video_surface_current` and `destination_surface` influence the result; the current
/// frame always fills the whole destination.
#[derive(Clone, Copy, Debug)]
pub struct MixerRender<'a> {
    /// Background output surface. Ignored.
    pub background_surface: Option<Handle>,
    /// Region of the background surface. Ignored.
    pub background_source_rect: Option<Rect>,
    /// Field/frame structure of the current picture. Ignored.
    pub current_picture_structure: PictureStructure,
    /// Earlier frames for deinterlacing. Ignored.
    pub video_surface_past: &'a [Handle],
    /// Frame to convert.
    pub video_surface_current: Handle,
    /// Later frames for deinterlacing. Ignored.
    pub video_surface_future: &'a [Handle],
    /// Region of the video surface. Ignored.
    pub video_source_rect: Option<Rect>,
    /// Output surface receiving the frame.
    pub destination_surface: Handle,
    /// Region of the destination to clear. Ignored.
    pub destination_rect: Option<Rect>,
    /// Region of the destination to place video in. Ignored.
    pub destination_video_rect: Option<Rect>,
    /// Overlay layers. Ignored.
    pub layers: &'a [Layer],
}

impl<'a> MixerRender<'a> {
    /// Render `current` as a progressive frame onto `destination`.
    pub fn new(current: Handle, destination: Handle) -> Self {
        Self {
            background_surface: None,
            background_source_rect: None,
            current_picture_structure: PictureStructure::Frame,
            video_surface_past: &[],
            video_surface_current: current,
            video_surface_future: &[],
            video_source_rect: None,
            destination_surface: destination,
            destination_rect: None,
            destination_video_rect: None,
            layers: &[],
        }
    }
}

impl Driver {
    /// Create a mixer. Features and parameters are recorded; none changes rendering.
    #[tracing::instrument(skip(self))]
    pub fn video_mixer_create(
        &self,
        device: Handle,
        features: &[MixerFeature],
        parameters: &[MixerParameter],
    ) -> VdpResult<Handle> {
        let device = self.handles.device(device)?;
        let mixer = VideoMixer {
            device,
            features: features.to_vec(),
            parameters: parameters.to_vec(),
            state: Mutex::new(MixerState::default()),
        };
        Ok(self.handles.add(Object::VideoMixer(Arc::new(mixer))))
    }

    /// Destroy a mixer.
    #[tracing::instrument(skip(self))]
    pub fn video_mixer_destroy(&self, mixer: Handle) -> VdpResult<()> {
        self.handles.take(mixer, ObjectKind::VideoMixer)?;
        Ok(())
    }

    /// Record feature enables.
    #[tracing::instrument(skip(self))]
    pub fn video_mixer_set_feature_enables(
        &self,
        mixer: Handle,
        enables: &[(MixerFeature, bool)],
    ) -> VdpResult<()> {
        let mixer = self.handles.video_mixer(mixer)?;
        let mut state = mixer.state.lock();
        for &(feature, enabled) in enables {
            if !mixer.features.contains(&feature) {
                tracing::debug!(?feature, "enable for a feature the mixer was not created with");
            }
            state.enables.insert(feature, enabled);
        }
        tracing::debug!(recorded = state.enables.len(), "feature enables recorded");
        Ok(())
    }

    /// Record attribute values.
    #[tracing::instrument(skip(self))]
    pub fn video_mixer_set_attribute_values(
        &self,
        mixer: Handle,
        values: &[MixerAttributeValue],
    ) -> VdpResult<()> {
        let mixer = self.handles.video_mixer(mixer)?;
        let mut state = mixer.state.lock();
        state.attributes.extend_from_slice(values);
        tracing::debug!(recorded = state.attributes.len(), "attribute values recorded");
        Ok(())
    }

    /// Convert the current video surface into the destination output surface.
    ///
    /// Point-samples 4:2:0 planes to `B8G8R8A8` at the destination size. A converter that writes
    /// fewer rows than the destination holds yields `Error`.
    #[tracing::instrument(skip(self, render), fields(
        current = %render.video_surface_current,
        destination = %render.destination_surface,
    ))]
    pub fn video_mixer_render(&self, mixer: Handle, render: &MixerRender<'_>) -> VdpResult<()> {
        let mixer = self.handles.video_mixer(mixer)?;
        let video = self.handles.video_surface(render.video_surface_current)?;
        let output = self.handles.output_surface(render.destination_surface)?;
        tracing::trace!(
            screen = mixer.device.screen,
            parameters = ?mixer.parameters,
            structure = ?render.current_picture_structure,
            "mixing current frame"
        );

        let planes = video.planes.lock();
        let mut pixels = output.pixels.lock();
        let ctx = ScaleContext::new(
            PixelFormat::Yuv420p,
            (video.width, video.height),
            PixelFormat::Bgra,
            (pixels.width(), pixels.height()),
            Filter::Point,
        )?;
        let stride = video.stride as usize;
        let src = [
            Plane {
                data: &planes.y,
                stride,
            },
            Plane {
                data: &planes.u,
                stride: stride / 2,
            },
            Plane {
                data: &planes.v,
                stride: stride / 2,
            },
        ];
        let dst_stride = pixels.stride();
        let expected = pixels.height();
        let rows = ctx.scale(&src, pixels.data_mut(), dst_stride)?;
        pixels.mark_dirty();
        if rows != expected {
            tracing::warn!(rows, expected, "short conversion");
            return Err(VdpError::error(format!(
                "converter wrote {rows} of {expected} rows"
            )));
        }
        Ok(())
    }

    /// Not implemented.
    pub fn video_mixer_query_feature_support(
        &self,
        _device: Handle,
        _feature: MixerFeature,
    ) -> VdpResult<bool> {
        Err(VdpError::no_implementation("video_mixer_query_feature_support"))
    }

    /// Not implemented.
    pub fn video_mixer_query_parameter_support(
        &self,
        _device: Handle,
        _parameter: u32,
    ) -> VdpResult<bool> {
        Err(VdpError::no_implementation("video_mixer_query_parameter_support"))
    }

    /// Not implemented.
    pub fn video_mixer_query_attribute_support(
        &self,
        _device: Handle,
        _attribute: u32,
    ) -> VdpResult<bool> {
        Err(VdpError::no_implementation("video_mixer_query_attribute_support"))
    }

    /// Not implemented.
    pub fn video_mixer_query_parameter_value_range(
        &self,
        _device: Handle,
        _parameter: u32,
    ) -> VdpResult<(u32, u32)> {
        Err(VdpError::no_implementation(
            "video_mixer_query_parameter_value_range",
        ))
    }

    /// Not implemented.
    pub fn video_mixer_query_attribute_value_range(
        &self,
        _device: Handle,
        _attribute: u32,
    ) -> VdpResult<(f32, f32)> {
        Err(VdpError::no_implementation(
            "video_mixer_query_attribute_value_range",
        ))
    }

    /// Not implemented.
    pub fn video_mixer_get_feature_support(
        &self,
        _mixer: Handle,
        _features: &[MixerFeature],
    ) -> VdpResult<Vec<bool>> {
        Err(VdpError::no_implementation("video_mixer_get_feature_support"))
    }

    /// Not implemented.
    pub fn video_mixer_get_feature_enables(
        &self,
        _mixer: Handle,
        _features: &[MixerFeature],
    ) -> VdpResult<Vec<bool>> {
        Err(VdpError::no_implementation("video_mixer_get_feature_enables"))
    }

    /// Not implemented.
    pub fn video_mixer_get_parameter_values(
        &self,
        _mixer: Handle,
        _parameters: &[u32],
    ) -> VdpResult<Vec<MixerParameter>> {
        Err(VdpError::no_implementation("video_mixer_get_parameter_values"))
    }

    /// Not implemented.
    pub fn video_mixer_get_attribute_values(
        &self,
        _mixer: Handle,
        _attributes: &[u32],
    ) -> VdpResult<Vec<MixerAttributeValue>> {
        Err(VdpError::no_implementation("video_mixer_get_attribute_values"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mixer.rs"]
mod tests;
