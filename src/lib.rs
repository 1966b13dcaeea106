//! softvdp is a software emulation of a VDPAU-style video device.
//!
//! Clients create objects (devices, video/bitmap/output surfaces, video mixers, presentation
//! queue targets and queues) through a [`Driver`] and refer to them by opaque [`Handle`]s. All
//! pixel work runs on the CPU:
//!
//! 1. **Upload**: planar YV12 frames go into video surfaces, packed `B8G8R8A8` pixels into bitmap
//!    surfaces.
//! 2. **Mix**: a video mixer point-samples the current video surface into an output surface
//!    (BT.601, limited range).
//! 3. **Composite**: output and bitmap surfaces are blended onto output surfaces with one of two
//!    emulated blend modes (overwrite, premultiplied source-over).
//! 4. **Present**: a presentation queue copies an output surface into a shared image and blits it
//!    to a drawable through a [`DisplayTransport`].
//!
//! Operations are reached either directly as `Driver` methods or by resolving a numeric
//! [`FuncId`] with the resolver returned from [`Driver::device_create_x11`].
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Synchronous**: every call finishes its work, presentation included, before returning.
//! - **Status codes**: every failure maps onto a [`Status`] via [`VdpError::status`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod decoder;
mod driver;
mod foundation;
mod handles;
mod present;
mod procs;
mod render;
mod surface;

pub use decoder::{DecoderCapabilities, DecoderProfile};
pub use driver::{API_VERSION, Driver, GetProcAddress, PreemptionCallback};
pub use foundation::core::{
    ChromaType, Color, ColorStandard, CscMatrix, Drawable, Handle, PROCAMP_VERSION,
    PictureStructure, PresentationQueueStatus, Procamp, Rect, RgbaFormat, Time, YCbCrFormat,
};
pub use foundation::error::{Status, VdpError, VdpResult, status_of};
pub use foundation::opts::{CONFIG_ENV, DriverOpts};
pub use handles::table::{HandleTable, ObjectKind};
pub use present::queue::PresentationStats;
pub use present::transport::{Blit, DisplayTransport, MemoryTransport, SharedImage};
#[cfg(feature = "x11")]
pub use present::x11::X11Transport;
pub use procs::{FuncId, get_proc_address};
pub use render::composite::{
    BLEND_STATE_VERSION, BlendEquation, BlendFactor, BlendState, CompositeArgs, PremulPixel,
};
pub use render::mixer::{Layer, MixerAttributeValue, MixerFeature, MixerParameter, MixerRender};
pub use surface::bitmap::BitmapSurfaceCapabilities;
pub use surface::packed::SurfacePixels;
pub use surface::video::{VideoSurfaceCapabilities, VideoSurfaceInfo};
