//! Function-id resolution.
//!
//! Clients reach operations only through ids resolved here. The table is static; an id that is
//! absent from it, or whose operation this emulation does not provide at all, is rejected with
//! `InvalidFuncId`.

use crate::driver::Driver;
use crate::foundation::core::Handle;
use crate::foundation::error::{VdpError, VdpResult};

/// Every operation id of the emulated API.
#[allow(missing_docs)]
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FuncId {
    GetErrorString = 0,
    GetProcAddress = 1,
    GetApiVersion = 2,
    GetInformationString = 4,
    DeviceDestroy = 5,
    GenerateCscMatrix = 6,
    VideoSurfaceQueryCapabilities = 7,
    VideoSurfaceQueryGetPutBitsYCbCrCapabilities = 8,
    VideoSurfaceCreate = 9,
    VideoSurfaceDestroy = 10,
    VideoSurfaceGetParameters = 11,
    VideoSurfaceGetBitsYCbCr = 12,
    VideoSurfacePutBitsYCbCr = 13,
    OutputSurfaceQueryCapabilities = 14,
    OutputSurfaceQueryGetPutBitsNativeCapabilities = 15,
    OutputSurfaceQueryPutBitsIndexedCapabilities = 16,
    OutputSurfaceQueryPutBitsYCbCrCapabilities = 17,
    OutputSurfaceCreate = 18,
    OutputSurfaceDestroy = 19,
    OutputSurfaceGetParameters = 20,
    OutputSurfaceGetBitsNative = 21,
    OutputSurfacePutBitsNative = 22,
    OutputSurfacePutBitsIndexed = 23,
    OutputSurfacePutBitsYCbCr = 24,
    BitmapSurfaceQueryCapabilities = 25,
    BitmapSurfaceCreate = 26,
    BitmapSurfaceDestroy = 27,
    BitmapSurfaceGetParameters = 28,
    BitmapSurfacePutBitsNative = 29,
    OutputSurfaceRenderOutputSurface = 33,
    OutputSurfaceRenderBitmapSurface = 34,
    OutputSurfaceRenderVideoSurfaceLuma = 35,
    DecoderQueryCapabilities = 36,
    DecoderCreate = 37,
    DecoderDestroy = 38,
    DecoderGetParameters = 39,
    DecoderRender = 40,
    VideoMixerQueryFeatureSupport = 41,
    VideoMixerQueryParameterSupport = 42,
    VideoMixerQueryAttributeSupport = 43,
    VideoMixerQueryParameterValueRange = 44,
    VideoMixerQueryAttributeValueRange = 45,
    VideoMixerCreate = 46,
    VideoMixerSetFeatureEnables = 47,
    VideoMixerSetAttributeValues = 48,
    VideoMixerGetFeatureSupport = 49,
    VideoMixerGetFeatureEnables = 50,
    VideoMixerGetParameterValues = 51,
    VideoMixerGetAttributeValues = 52,
    VideoMixerDestroy = 53,
    VideoMixerRender = 54,
    PresentationQueueTargetDestroy = 55,
    PresentationQueueCreate = 56,
    PresentationQueueDestroy = 57,
    PresentationQueueSetBackgroundColor = 58,
    PresentationQueueGetBackgroundColor = 59,
    PresentationQueueGetTime = 62,
    PresentationQueueDisplay = 63,
    PresentationQueueBlockUntilSurfaceIdle = 64,
    PresentationQueueQuerySurfaceStatus = 65,
    PreemptionCallbackRegister = 66,
    PresentationQueueTargetCreateX11 = 0x1000,
}

struct ProcEntry {
    id: FuncId,
    name: &'static str,
    resolvable: bool,
}

const fn entry(id: FuncId, name: &'static str) -> ProcEntry {
    ProcEntry {
        id,
        name,
        resolvable: true,
    }
}

static PROC_TABLE: &[ProcEntry] = &[
    entry(FuncId::GetErrorString, "VDP_FUNC_ID_GET_ERROR_STRING"),
    entry(FuncId::GetProcAddress, "VDP_FUNC_ID_GET_PROC_ADDRESS"),
    entry(FuncId::GetApiVersion, "VDP_FUNC_ID_GET_API_VERSION"),
    entry(FuncId::GetInformationString, "VDP_FUNC_ID_GET_INFORMATION_STRING"),
    entry(FuncId::DeviceDestroy, "VDP_FUNC_ID_DEVICE_DESTROY"),
    entry(FuncId::GenerateCscMatrix, "VDP_FUNC_ID_GENERATE_CSC_MATRIX"),
    entry(
        FuncId::VideoSurfaceQueryCapabilities,
        "VDP_FUNC_ID_VIDEO_SURFACE_QUERY_CAPABILITIES",
    ),
    entry(
        FuncId::VideoSurfaceQueryGetPutBitsYCbCrCapabilities,
        "VDP_FUNC_ID_VIDEO_SURFACE_QUERY_GET_PUT_BITS_Y_CB_CR_CAPABILITIES",
    ),
    entry(FuncId::VideoSurfaceCreate, "VDP_FUNC_ID_VIDEO_SURFACE_CREATE"),
    entry(FuncId::VideoSurfaceDestroy, "VDP_FUNC_ID_VIDEO_SURFACE_DESTROY"),
    entry(
        FuncId::VideoSurfaceGetParameters,
        "VDP_FUNC_ID_VIDEO_SURFACE_GET_PARAMETERS",
    ),
    entry(
        FuncId::VideoSurfaceGetBitsYCbCr,
        "VDP_FUNC_ID_VIDEO_SURFACE_GET_BITS_Y_CB_CR",
    ),
    entry(
        FuncId::VideoSurfacePutBitsYCbCr,
        "VDP_FUNC_ID_VIDEO_SURFACE_PUT_BITS_Y_CB_CR",
    ),
    entry(
        FuncId::OutputSurfaceQueryCapabilities,
        "VDP_FUNC_ID_OUTPUT_SURFACE_QUERY_CAPABILITIES",
    ),
    entry(
        FuncId::OutputSurfaceQueryGetPutBitsNativeCapabilities,
        "VDP_FUNC_ID_OUTPUT_SURFACE_QUERY_GET_PUT_BITS_NATIVE_CAPABILITIES",
    ),
    entry(
        FuncId::OutputSurfaceQueryPutBitsIndexedCapabilities,
        "VDP_FUNC_ID_OUTPUT_SURFACE_QUERY_PUT_BITS_INDEXED_CAPABILITIES",
    ),
    entry(
        FuncId::OutputSurfaceQueryPutBitsYCbCrCapabilities,
        "VDP_FUNC_ID_OUTPUT_SURFACE_QUERY_PUT_BITS_Y_CB_CR_CAPABILITIES",
    ),
    entry(FuncId::OutputSurfaceCreate, "VDP_FUNC_ID_OUTPUT_SURFACE_CREATE"),
    entry(FuncId::OutputSurfaceDestroy, "VDP_FUNC_ID_OUTPUT_SURFACE_DESTROY"),
    entry(
        FuncId::OutputSurfaceGetParameters,
        "VDP_FUNC_ID_OUTPUT_SURFACE_GET_PARAMETERS",
    ),
    entry(
        FuncId::OutputSurfaceGetBitsNative,
        "VDP_FUNC_ID_OUTPUT_SURFACE_GET_BITS_NATIVE",
    ),
    entry(
        FuncId::OutputSurfacePutBitsNative,
        "VDP_FUNC_ID_OUTPUT_SURFACE_PUT_BITS_NATIVE",
    ),
    entry(
        FuncId::OutputSurfacePutBitsIndexed,
        "VDP_FUNC_ID_OUTPUT_SURFACE_PUT_BITS_INDEXED",
    ),
    entry(
        FuncId::OutputSurfacePutBitsYCbCr,
        "VDP_FUNC_ID_OUTPUT_SURFACE_PUT_BITS_Y_CB_CR",
    ),
    entry(
        FuncId::BitmapSurfaceQueryCapabilities,
        "VDP_FUNC_ID_BITMAP_SURFACE_QUERY_CAPABILITIES",
    ),
    entry(FuncId::BitmapSurfaceCreate, "VDP_FUNC_ID_BITMAP_SURFACE_CREATE"),
    entry(FuncId::BitmapSurfaceDestroy, "VDP_FUNC_ID_BITMAP_SURFACE_DESTROY"),
    entry(
        FuncId::BitmapSurfaceGetParameters,
        "VDP_FUNC_ID_BITMAP_SURFACE_GET_PARAMETERS",
    ),
    entry(
        FuncId::BitmapSurfacePutBitsNative,
        "VDP_FUNC_ID_BITMAP_SURFACE_PUT_BITS_NATIVE",
    ),
    entry(
        FuncId::OutputSurfaceRenderOutputSurface,
        "VDP_FUNC_ID_OUTPUT_SURFACE_RENDER_OUTPUT_SURFACE",
    ),
    entry(
        FuncId::OutputSurfaceRenderBitmapSurface,
        "VDP_FUNC_ID_OUTPUT_SURFACE_RENDER_BITMAP_SURFACE",
    ),
    ProcEntry {
        id: FuncId::OutputSurfaceRenderVideoSurfaceLuma,
        name: "VDP_FUNC_ID_OUTPUT_SURFACE_RENDER_VIDEO_SURFACE_LUMA",
        resolvable: false,
    },
    entry(
        FuncId::DecoderQueryCapabilities,
        "VDP_FUNC_ID_DECODER_QUERY_CAPABILITIES",
    ),
    entry(FuncId::DecoderCreate, "VDP_FUNC_ID_DECODER_CREATE"),
    entry(FuncId::DecoderDestroy, "VDP_FUNC_ID_DECODER_DESTROY"),
    entry(FuncId::DecoderGetParameters, "VDP_FUNC_ID_DECODER_GET_PARAMETERS"),
    entry(FuncId::DecoderRender, "VDP_FUNC_ID_DECODER_RENDER"),
    entry(
        FuncId::VideoMixerQueryFeatureSupport,
        "VDP_FUNC_ID_VIDEO_MIXER_QUERY_FEATURE_SUPPORT",
    ),
    entry(
        FuncId::VideoMixerQueryParameterSupport,
        "VDP_FUNC_ID_VIDEO_MIXER_QUERY_PARAMETER_SUPPORT",
    ),
    entry(
        FuncId::VideoMixerQueryAttributeSupport,
        "VDP_FUNC_ID_VIDEO_MIXER_QUERY_ATTRIBUTE_SUPPORT",
    ),
    entry(
        FuncId::VideoMixerQueryParameterValueRange,
        "VDP_FUNC_ID_VIDEO_MIXER_QUERY_PARAMETER_VALUE_RANGE",
    ),
    entry(
        FuncId::VideoMixerQueryAttributeValueRange,
        "VDP_FUNC_ID_VIDEO_MIXER_QUERY_ATTRIBUTE_VALUE_RANGE",
    ),
    entry(FuncId::VideoMixerCreate, "VDP_FUNC_ID_VIDEO_MIXER_CREATE"),
    entry(
        FuncId::VideoMixerSetFeatureEnables,
        "VDP_FUNC_ID_VIDEO_MIXER_SET_FEATURE_ENABLES",
    ),
    entry(
        FuncId::VideoMixerSetAttributeValues,
        "VDP_FUNC_ID_VIDEO_MIXER_SET_ATTRIBUTE_VALUES",
    ),
    entry(
        FuncId::VideoMixerGetFeatureSupport,
        "VDP_FUNC_ID_VIDEO_MIXER_GET_FEATURE_SUPPORT",
    ),
    entry(
        FuncId::VideoMixerGetFeatureEnables,
        "VDP_FUNC_ID_VIDEO_MIXER_GET_FEATURE_ENABLES",
    ),
    entry(
        FuncId::VideoMixerGetParameterValues,
        "VDP_FUNC_ID_VIDEO_MIXER_GET_PARAMETER_VALUES",
    ),
    entry(
        FuncId::VideoMixerGetAttributeValues,
        "VDP_FUNC_ID_VIDEO_MIXER_GET_ATTRIBUTE_VALUES",
    ),
    entry(FuncId::VideoMixerDestroy, "VDP_FUNC_ID_VIDEO_MIXER_DESTROY"),
    entry(FuncId::VideoMixerRender, "VDP_FUNC_ID_VIDEO_MIXER_RENDER"),
    entry(
        FuncId::PresentationQueueTargetDestroy,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_TARGET_DESTROY",
    ),
    entry(
        FuncId::PresentationQueueCreate,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_CREATE",
    ),
    entry(
        FuncId::PresentationQueueDestroy,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_DESTROY",
    ),
    entry(
        FuncId::PresentationQueueSetBackgroundColor,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_SET_BACKGROUND_COLOR",
    ),
    entry(
        FuncId::PresentationQueueGetBackgroundColor,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_GET_BACKGROUND_COLOR",
    ),
    entry(
        FuncId::PresentationQueueGetTime,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_GET_TIME",
    ),
    entry(
        FuncId::PresentationQueueDisplay,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_DISPLAY",
    ),
    entry(
        FuncId::PresentationQueueBlockUntilSurfaceIdle,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_BLOCK_UNTIL_SURFACE_IDLE",
    ),
    entry(
        FuncId::PresentationQueueQuerySurfaceStatus,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_QUERY_SURFACE_STATUS",
    ),
    entry(
        FuncId::PreemptionCallbackRegister,
        "VDP_FUNC_ID_PREEMPTION_CALLBACK_REGISTER",
    ),
    entry(
        FuncId::PresentationQueueTargetCreateX11,
        "VDP_FUNC_ID_PRESENTATION_QUEUE_TARGET_CREATE_X11",
    ),
];

impl FuncId {
    /// Resolve a raw id to an operation this emulation provides.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        match PROC_TABLE.iter().find(|e| e.id as u32 == raw) {
            Some(e) if e.resolvable => Ok(e.id),
            Some(e) => Err(VdpError::InvalidFuncId(format!(
                "{} is not provided",
                e.name
            ))),
            None => Err(VdpError::InvalidFuncId(format!("unknown function id {raw}"))),
        }
    }

    /// Raw numeric id.
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Stable symbolic name (`VDP_FUNC_ID_*`).
    pub fn name(self) -> &'static str {
        PROC_TABLE
            .iter()
            .find(|e| e.id == self)
            .map_or("VDP_FUNC_ID_UNKNOWN", |e| e.name)
    }

    /// All ids that resolve successfully, in table order.
    pub fn all() -> impl Iterator<Item = FuncId> {
        PROC_TABLE.iter().filter(|e| e.resolvable).map(|e| e.id)
    }
}

/// Resolve `function_id` for `device`.
pub fn get_proc_address(_driver: &Driver, device: Handle, function_id: u32) -> VdpResult<FuncId> {
    let resolved = FuncId::from_raw(function_id);
    tracing::trace!(%device, function_id, ok = resolved.is_ok(), "get_proc_address");
    resolved
}

#[cfg(test)]
#[path = "../tests/unit/procs.rs"]
mod tests;
