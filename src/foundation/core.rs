use crate::foundation::error::{VdpError, VdpResult};

/// Opaque integer identifying a live object instance.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Handle(pub u32);

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Timestamp in nanoseconds.
pub type Time = u64;

/// Display-server drawable (window) id.
pub type Drawable = u32;

/// Color conversion matrix, three rows of `[y, cb, cr, offset]` coefficients.
pub type CscMatrix = [[f32; 4]; 3];

/// Axis-aligned rectangle `[x0, x1) x [y0, y1)` in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl Rect {
    /// Build a rectangle from its edges.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle covering a whole `width x height` surface.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        }
    }

    /// Horizontal extent; inverted rectangles are empty.
    pub fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Vertical extent; inverted rectangles are empty.
    pub fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Return `true` when both rectangles have the same extents.
    pub fn same_extent(self, other: Rect) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }
}

/// Floating-point RGBA color, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub red: f32,
    /// Green channel.
    pub green: f32,
    /// Blue channel.
    pub blue: f32,
    /// Alpha channel.
    pub alpha: f32,
}

/// Chroma subsampling of a video surface.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChromaType {
    /// 4:2:0 subsampling.
    Yuv420 = 0,
    /// 4:2:2 subsampling.
    Yuv422 = 1,
    /// 4:4:4, no subsampling.
    Yuv444 = 2,
}

impl ChromaType {
    /// Decode a raw chroma type.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        match raw {
            0 => Ok(Self::Yuv420),
            1 => Ok(Self::Yuv422),
            2 => Ok(Self::Yuv444),
            other => Err(VdpError::InvalidChromaType(format!("unknown chroma type {other}"))),
        }
    }

    /// Divider applied to the luma plane size to get one chroma plane size.
    pub fn storage_divider(self) -> usize {
        match self {
            Self::Yuv420 => 4,
            Self::Yuv422 => 2,
            Self::Yuv444 => 1,
        }
    }
}

/// Planar or packed Y'CbCr memory layouts accepted by bit transfer calls.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum YCbCrFormat {
    /// Luma plane followed by an interleaved CbCr plane.
    Nv12 = 0,
    /// Luma plane, then V plane, then U plane.
    Yv12 = 1,
    /// Packed U Y V Y.
    Uyvy = 2,
    /// Packed Y U Y V.
    Yuyv = 3,
    /// Packed Y U V A.
    Y8U8V8A8 = 4,
    /// Packed V U Y A.
    V8U8Y8A8 = 5,
}

impl YCbCrFormat {
    /// Decode a raw Y'CbCr format.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        match raw {
            0 => Ok(Self::Nv12),
            1 => Ok(Self::Yv12),
            2 => Ok(Self::Uyvy),
            3 => Ok(Self::Yuyv),
            4 => Ok(Self::Y8U8V8A8),
            5 => Ok(Self::V8U8Y8A8),
            other => Err(VdpError::invalid_ycbcr_format(format!(
                "unknown ycbcr format {other}"
            ))),
        }
    }
}

/// Packed RGBA layouts.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RgbaFormat {
    /// 8-bit B, G, R, A bytes in memory order. The only supported layout.
    B8G8R8A8 = 0,
    /// 8-bit R, G, B, A bytes.
    R8G8B8A8 = 1,
    /// 10-bit RGB with 2-bit alpha.
    R10G10B10A2 = 2,
    /// 10-bit BGR with 2-bit alpha.
    B10G10R10A2 = 3,
    /// Alpha only.
    A8 = 4,
}

impl RgbaFormat {
    /// Decode a raw RGBA format.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        match raw {
            0 => Ok(Self::B8G8R8A8),
            1 => Ok(Self::R8G8B8A8),
            2 => Ok(Self::R10G10B10A2),
            3 => Ok(Self::B10G10R10A2),
            4 => Ok(Self::A8),
            other => Err(VdpError::invalid_rgba_format(format!(
                "unknown rgba format {other}"
            ))),
        }
    }

    /// Reject every layout but the single supported one.
    pub(crate) fn ensure_supported(self) -> VdpResult<()> {
        if self == Self::B8G8R8A8 {
            Ok(())
        } else {
            Err(VdpError::invalid_rgba_format(format!(
                "unsupported rgba format {self:?}"
            )))
        }
    }
}

/// Color standards known to the CSC matrix generator.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorStandard {
    /// ITU-R BT.601.
    ItuRBt601 = 0,
    /// ITU-R BT.709.
    ItuRBt709 = 1,
    /// SMPTE 240M.
    Smpte240M = 2,
}

impl ColorStandard {
    /// Decode a raw color standard.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        match raw {
            0 => Ok(Self::ItuRBt601),
            1 => Ok(Self::ItuRBt709),
            2 => Ok(Self::Smpte240M),
            other => Err(VdpError::InvalidColorStandard(format!(
                "unknown color standard {other}"
            ))),
        }
    }
}

/// Current version of [`Procamp`].
pub const PROCAMP_VERSION: u32 = 0;

/// Brightness/contrast/saturation/hue adjustments.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Procamp {
    /// Must equal [`PROCAMP_VERSION`].
    pub struct_version: u32,
    /// Brightness offset.
    pub brightness: f32,
    /// Contrast multiplier.
    pub contrast: f32,
    /// Saturation multiplier.
    pub saturation: f32,
    /// Hue rotation.
    pub hue: f32,
}

impl Default for Procamp {
    fn default() -> Self {
        Self {
            struct_version: PROCAMP_VERSION,
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            hue: 0.0,
        }
    }
}

/// Presentation status of a surface in a queue.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PresentationQueueStatus {
    /// Not queued and not visible.
    Idle = 0,
    /// Waiting to be shown.
    Queued = 1,
    /// Currently on screen.
    Visible = 2,
}

/// Field/frame structure of the current picture passed to the mixer.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PictureStructure {
    /// Top field only.
    TopField = 0,
    /// Bottom field only.
    BottomField = 1,
    /// Progressive frame.
    Frame = 2,
}

impl PictureStructure {
    /// Decode a raw picture structure.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        match raw {
            0 => Ok(Self::TopField),
            1 => Ok(Self::BottomField),
            2 => Ok(Self::Frame),
            other => Err(VdpError::InvalidPictureStructure(format!(
                "unknown picture structure {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
