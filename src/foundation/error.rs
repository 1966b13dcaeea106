/// Convenience result type used by every driver operation.
pub type VdpResult<T> = Result<T, VdpError>;

/// Status codes surfaced to callers, numbered like the emulated API.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Status {
    /// The operation completed successfully.
    Ok = 0,
    /// The operation exists but this emulation does not implement it.
    NoImplementation = 1,
    /// The display was preempted.
    DisplayPreempted = 2,
    /// Unknown handle, or a handle of the wrong object kind.
    InvalidHandle = 3,
    /// A required pointer argument was missing.
    InvalidPointer = 4,
    /// Unsupported chroma type.
    InvalidChromaType = 5,
    /// Unsupported planar (Y'CbCr) format.
    InvalidYCbCrFormat = 6,
    /// Unsupported packed RGBA format.
    InvalidRgbaFormat = 7,
    /// Unsupported indexed format.
    InvalidIndexedFormat = 8,
    /// Unsupported color standard.
    InvalidColorStandard = 9,
    /// Unsupported color table format.
    InvalidColorTableFormat = 10,
    /// Unsupported blend factor combination.
    InvalidBlendFactor = 11,
    /// Unsupported blend equation.
    InvalidBlendEquation = 12,
    /// Unsupported flag.
    InvalidFlag = 13,
    /// Unsupported decoder profile.
    InvalidDecoderProfile = 14,
    /// Unknown video mixer feature.
    InvalidVideoMixerFeature = 15,
    /// Unknown video mixer parameter.
    InvalidVideoMixerParameter = 16,
    /// Unknown video mixer attribute.
    InvalidVideoMixerAttribute = 17,
    /// Unknown picture structure.
    InvalidVideoMixerPictureStructure = 18,
    /// Unknown function id.
    InvalidFuncId = 19,
    /// Size out of the supported range.
    InvalidSize = 20,
    /// A value argument was malformed.
    InvalidValue = 21,
    /// A structure version did not match.
    InvalidStructVersion = 22,
    /// Allocation failed.
    Resources = 23,
    /// Handles belong to different devices.
    HandleDeviceMismatch = 24,
    /// Generic failure.
    Error = 25,
}

const ALL_STATUSES: [Status; 26] = [
    Status::Ok,
    Status::NoImplementation,
    Status::DisplayPreempted,
    Status::InvalidHandle,
    Status::InvalidPointer,
    Status::InvalidChromaType,
    Status::InvalidYCbCrFormat,
    Status::InvalidRgbaFormat,
    Status::InvalidIndexedFormat,
    Status::InvalidColorStandard,
    Status::InvalidColorTableFormat,
    Status::InvalidBlendFactor,
    Status::InvalidBlendEquation,
    Status::InvalidFlag,
    Status::InvalidDecoderProfile,
    Status::InvalidVideoMixerFeature,
    Status::InvalidVideoMixerParameter,
    Status::InvalidVideoMixerAttribute,
    Status::InvalidVideoMixerPictureStructure,
    Status::InvalidFuncId,
    Status::InvalidSize,
    Status::InvalidValue,
    Status::InvalidStructVersion,
    Status::Resources,
    Status::HandleDeviceMismatch,
    Status::Error,
];

impl Status {
    /// Decode a raw status value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        ALL_STATUSES.get(raw as usize).copied()
    }

    /// Raw numeric value.
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Stable symbolic name (`VDP_STATUS_*`).
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "VDP_STATUS_OK",
            Status::NoImplementation => "VDP_STATUS_NO_IMPLEMENTATION",
            Status::DisplayPreempted => "VDP_STATUS_DISPLAY_PREEMPTED",
            Status::InvalidHandle => "VDP_STATUS_INVALID_HANDLE",
            Status::InvalidPointer => "VDP_STATUS_INVALID_POINTER",
            Status::InvalidChromaType => "VDP_STATUS_INVALID_CHROMA_TYPE",
            Status::InvalidYCbCrFormat => "VDP_STATUS_INVALID_Y_CB_CR_FORMAT",
            Status::InvalidRgbaFormat => "VDP_STATUS_INVALID_RGBA_FORMAT",
            Status::InvalidIndexedFormat => "VDP_STATUS_INVALID_INDEXED_FORMAT",
            Status::InvalidColorStandard => "VDP_STATUS_INVALID_COLOR_STANDARD",
            Status::InvalidColorTableFormat => "VDP_STATUS_INVALID_COLOR_TABLE_FORMAT",
            Status::InvalidBlendFactor => "VDP_STATUS_INVALID_BLEND_FACTOR",
            Status::InvalidBlendEquation => "VDP_STATUS_INVALID_BLEND_EQUATION",
            Status::InvalidFlag => "VDP_STATUS_INVALID_FLAG",
            Status::InvalidDecoderProfile => "VDP_STATUS_INVALID_DECODER_PROFILE",
            Status::InvalidVideoMixerFeature => "VDP_STATUS_INVALID_VIDEO_MIXER_FEATURE",
            Status::InvalidVideoMixerParameter => "VDP_STATUS_INVALID_VIDEO_MIXER_PARAMETER",
            Status::InvalidVideoMixerAttribute => "VDP_STATUS_INVALID_VIDEO_MIXER_ATTRIBUTE",
            Status::InvalidVideoMixerPictureStructure => {
                "VDP_STATUS_INVALID_VIDEO_MIXER_PICTURE_STRUCTURE"
            }
            Status::InvalidFuncId => "VDP_STATUS_INVALID_FUNC_ID",
            Status::InvalidSize => "VDP_STATUS_INVALID_SIZE",
            Status::InvalidValue => "VDP_STATUS_INVALID_VALUE",
            Status::InvalidStructVersion => "VDP_STATUS_INVALID_STRUCT_VERSION",
            Status::Resources => "VDP_STATUS_RESOURCES",
            Status::HandleDeviceMismatch => "VDP_STATUS_HANDLE_DEVICE_MISMATCH",
            Status::Error => "VDP_STATUS_ERROR",
        }
    }

    /// Human readable description, as returned by `get_error_string`.
    pub fn description(self) -> &'static str {
        match self {
            Status::Ok => "The operation completed successfully; no error.",
            Status::NoImplementation => "No backend implementation could be loaded.",
            Status::DisplayPreempted => "The display was preempted, or a fatal error occurred.",
            Status::InvalidHandle => "An invalid handle value was provided.",
            Status::InvalidPointer => "An invalid pointer was provided.",
            Status::InvalidChromaType => "An invalid/unsupported chroma type was provided.",
            Status::InvalidYCbCrFormat => "An invalid/unsupported Y'CbCr format was provided.",
            Status::InvalidRgbaFormat => "An invalid/unsupported RGBA format was provided.",
            Status::InvalidIndexedFormat => "An invalid/unsupported indexed format was provided.",
            Status::InvalidColorStandard => "An invalid/unsupported color standard was provided.",
            Status::InvalidColorTableFormat => {
                "An invalid/unsupported color table format was provided."
            }
            Status::InvalidBlendFactor => "An invalid/unsupported blend factor was provided.",
            Status::InvalidBlendEquation => "An invalid/unsupported blend equation was provided.",
            Status::InvalidFlag => "An invalid/unsupported flag was provided.",
            Status::InvalidDecoderProfile => "An invalid/unsupported decoder profile was provided.",
            Status::InvalidVideoMixerFeature => {
                "An invalid/unsupported video mixer feature was requested."
            }
            Status::InvalidVideoMixerParameter => {
                "An invalid/unsupported video mixer parameter was requested."
            }
            Status::InvalidVideoMixerAttribute => {
                "An invalid/unsupported video mixer attribute was requested."
            }
            Status::InvalidVideoMixerPictureStructure => {
                "An invalid/unsupported video mixer picture structure was provided."
            }
            Status::InvalidFuncId => "An invalid/unsupported function id was provided.",
            Status::InvalidSize => "The size of a supplied object does not match the object it is being used with.",
            Status::InvalidValue => "An invalid/unsupported value was supplied.",
            Status::InvalidStructVersion => {
                "An invalid/unsupported structure version was specified in a versioned structure."
            }
            Status::Resources => "The system does not have enough resources to complete the requested operation at this time.",
            Status::HandleDeviceMismatch => {
                "The set of handles supplied are not all related to the same device."
            }
            Status::Error => "A catch-all error, used when no other error code applies.",
        }
    }
}

/// Error taxonomy used by driver operations.
///
/// Every variant maps onto one [`Status`]; the message carries call-site context for logs.
#[derive(thiserror::Error, Debug)]
pub enum VdpError {
    /// Operation exists but is not implemented by this emulation.
    #[error("not implemented: {0}")]
    NoImplementation(String),

    /// Unknown handle or handle of the wrong kind.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    /// Missing required argument.
    #[error("invalid pointer: {0}")]
    InvalidPointer(String),

    /// Unsupported chroma type.
    #[error("invalid chroma type: {0}")]
    InvalidChromaType(String),

    /// Unsupported planar format.
    #[error("invalid ycbcr format: {0}")]
    InvalidYCbCrFormat(String),

    /// Unsupported packed format.
    #[error("invalid rgba format: {0}")]
    InvalidRgbaFormat(String),

    /// Unsupported color standard.
    #[error("invalid color standard: {0}")]
    InvalidColorStandard(String),

    /// Unsupported blend factor combination.
    #[error("invalid blend factor: {0}")]
    InvalidBlendFactor(String),

    /// Unsupported blend equation.
    #[error("invalid blend equation: {0}")]
    InvalidBlendEquation(String),

    /// Unknown mixer feature.
    #[error("invalid video mixer feature: {0}")]
    InvalidVideoMixerFeature(String),

    /// Unknown mixer parameter.
    #[error("invalid video mixer parameter: {0}")]
    InvalidVideoMixerParameter(String),

    /// Unknown mixer attribute.
    #[error("invalid video mixer attribute: {0}")]
    InvalidVideoMixerAttribute(String),

    /// Unknown picture structure.
    #[error("invalid picture structure: {0}")]
    InvalidPictureStructure(String),

    /// Unknown function id.
    #[error("invalid function id: {0}")]
    InvalidFuncId(String),

    /// Size out of range.
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// Malformed value or structure version.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Allocation failure.
    #[error("out of resources: {0}")]
    Resources(String),

    /// Rendering step produced an unexpected result.
    #[error("rendering error: {0}")]
    Error(String),

    /// Wrapped failure from a collaborator (display transport, IO).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VdpError {
    /// Build a [`VdpError::NoImplementation`] value.
    pub fn no_implementation(msg: impl Into<String>) -> Self {
        Self::NoImplementation(msg.into())
    }

    /// Build a [`VdpError::InvalidHandle`] value.
    pub fn invalid_handle(msg: impl Into<String>) -> Self {
        Self::InvalidHandle(msg.into())
    }

    /// Build a [`VdpError::InvalidPointer`] value.
    pub fn invalid_pointer(msg: impl Into<String>) -> Self {
        Self::InvalidPointer(msg.into())
    }

    /// Build a [`VdpError::InvalidYCbCrFormat`] value.
    pub fn invalid_ycbcr_format(msg: impl Into<String>) -> Self {
        Self::InvalidYCbCrFormat(msg.into())
    }

    /// Build a [`VdpError::InvalidRgbaFormat`] value.
    pub fn invalid_rgba_format(msg: impl Into<String>) -> Self {
        Self::InvalidRgbaFormat(msg.into())
    }

    /// Build a [`VdpError::InvalidBlendFactor`] value.
    pub fn invalid_blend_factor(msg: impl Into<String>) -> Self {
        Self::InvalidBlendFactor(msg.into())
    }

    /// Build a [`VdpError::InvalidSize`] value.
    pub fn invalid_size(msg: impl Into<String>) -> Self {
        Self::InvalidSize(msg.into())
    }

    /// Build a [`VdpError::InvalidValue`] value.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Build a [`VdpError::Resources`] value.
    pub fn resources(msg: impl Into<String>) -> Self {
        Self::Resources(msg.into())
    }

    /// Build a [`VdpError::Error`] value.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Status code reported to callers for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::NoImplementation(_) => Status::NoImplementation,
            Self::InvalidHandle(_) => Status::InvalidHandle,
            Self::InvalidPointer(_) => Status::InvalidPointer,
            Self::InvalidChromaType(_) => Status::InvalidChromaType,
            Self::InvalidYCbCrFormat(_) => Status::InvalidYCbCrFormat,
            Self::InvalidRgbaFormat(_) => Status::InvalidRgbaFormat,
            Self::InvalidColorStandard(_) => Status::InvalidColorStandard,
            Self::InvalidBlendFactor(_) => Status::InvalidBlendFactor,
            Self::InvalidBlendEquation(_) => Status::InvalidBlendEquation,
            Self::InvalidVideoMixerFeature(_) => Status::InvalidVideoMixerFeature,
            Self::InvalidVideoMixerParameter(_) => Status::InvalidVideoMixerParameter,
            Self::InvalidVideoMixerAttribute(_) => Status::InvalidVideoMixerAttribute,
            Self::InvalidPictureStructure(_) => Status::InvalidVideoMixerPictureStructure,
            Self::InvalidFuncId(_) => Status::InvalidFuncId,
            Self::InvalidSize(_) => Status::InvalidSize,
            Self::InvalidValue(_) => Status::InvalidValue,
            Self::Resources(_) => Status::Resources,
            Self::Error(_) | Self::Other(_) => Status::Error,
        }
    }
}

/// Collapse an operation result into the status code the caller sees.
pub fn status_of<T>(result: &VdpResult<T>) -> Status {
    match result {
        Ok(_) => Status::Ok,
        Err(e) => e.status(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
