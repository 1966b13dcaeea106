use crate::driver::Driver;
use crate::foundation::core::{Color, Handle, Rect};
use crate::foundation::error::{VdpError, VdpResult};
use crate::render::scale::{Filter, PixelFormat, Plane, ScaleContext};
use crate::surface::packed::{ImageView, OwnedImage, PackedSurface};

/// Premultiplied 8-bit pixel; channel order does not matter to the blend math.
pub type PremulPixel = [u8; 4];

/// Current version of [`BlendState`].
pub const BLEND_STATE_VERSION: u32 = 0;

/// Blend factor of the emulated blend equation.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub enum BlendFactor {
    Zero = 0,
    One = 1,
    SrcColor = 2,
    OneMinusSrcColor = 3,
    SrcAlpha = 4,
    OneMinusSrcAlpha = 5,
    DstAlpha = 6,
    OneMinusDstAlpha = 7,
    DstColor = 8,
    OneMinusDstColor = 9,
    SrcAlphaSaturate = 10,
    ConstantColor = 11,
    OneMinusConstantColor = 12,
    ConstantAlpha = 13,
    OneMinusConstantAlpha = 14,
}

impl BlendFactor {
    /// Decode a raw blend factor.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        use BlendFactor::*;
        const ALL: [BlendFactor; 15] = [
            Zero,
            One,
            SrcColor,
            OneMinusSrcColor,
            SrcAlpha,
            OneMinusSrcAlpha,
            DstAlpha,
            OneMinusDstAlpha,
            DstColor,
            OneMinusDstColor,
            SrcAlphaSaturate,
            ConstantColor,
            OneMinusConstantColor,
            ConstantAlpha,
            OneMinusConstantAlpha,
        ];
        ALL.get(raw as usize)
            .copied()
            .ok_or_else(|| VdpError::invalid_blend_factor(format!("unknown blend factor {raw}")))
    }
}

/// Blend equation of the emulated blend state.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub enum BlendEquation {
    Subtract = 0,
    ReverseSubtract = 1,
    Add = 2,
    Min = 3,
    Max = 4,
}

impl BlendEquation {
    /// Decode a raw blend equation.
    pub fn from_raw(raw: u32) -> VdpResult<Self> {
        match raw {
            0 => Ok(Self::Subtract),
            1 => Ok(Self::ReverseSubtract),
            2 => Ok(Self::Add),
            3 => Ok(Self::Min),
            4 => Ok(Self::Max),
            other => Err(VdpError::InvalidBlendEquation(format!(
                "unknown blend equation {other}"
            ))),
        }
    }
}

/// Blend configuration passed to the render operations. Only the color terms select behaviour.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub struct BlendState {
    /// Must equal [`BLEND_STATE_VERSION`].
    pub struct_version: u32,
    pub blend_factor_source_color: BlendFactor,
    pub blend_factor_destination_color: BlendFactor,
    pub blend_factor_source_alpha: BlendFactor,
    pub blend_factor_destination_alpha: BlendFactor,
    pub blend_equation_color: BlendEquation,
    pub blend_equation_alpha: BlendEquation,
    pub blend_constant: Color,
}

impl BlendState {
    fn uniform(src: BlendFactor, dst: BlendFactor) -> Self {
        Self {
            struct_version: BLEND_STATE_VERSION,
            blend_factor_source_color: src,
            blend_factor_destination_color: dst,
            blend_factor_source_alpha: src,
            blend_factor_destination_alpha: dst,
            blend_equation_color: BlendEquation::Add,
            blend_equation_alpha: BlendEquation::Add,
            blend_constant: Color::default(),
        }
    }

    /// `(One, Zero, Add)`: the source replaces the destination.
    pub fn overwrite() -> Self {
        Self::uniform(BlendFactor::One, BlendFactor::Zero)
    }

    /// `(One, OneMinusSrcAlpha, Add)`: premultiplied source-over.
    pub fn source_over() -> Self {
        Self::uniform(BlendFactor::One, BlendFactor::OneMinusSrcAlpha)
    }
}

/// Paint operator the blend state reduces to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operator {
    Source,
    Over,
}

impl Operator {
    /// Map a blend state onto one of the two emulated operators.
    pub(crate) fn from_blend_state(state: &BlendState) -> VdpResult<Self> {
        if state.struct_version != BLEND_STATE_VERSION {
            return Err(VdpError::invalid_value(format!(
                "blend state struct_version {} != {BLEND_STATE_VERSION}",
                state.struct_version
            )));
        }
        match (
            state.blend_factor_source_color,
            state.blend_factor_destination_color,
            state.blend_equation_color,
        ) {
            (BlendFactor::One, BlendFactor::Zero, BlendEquation::Add) => Ok(Self::Source),
            (BlendFactor::One, BlendFactor::OneMinusSrcAlpha, BlendEquation::Add) => Ok(Self::Over),
            (src, dst, eq) => {
                tracing::warn!(?src, ?dst, ?eq, "blend state rejected");
                Err(VdpError::invalid_blend_factor(format!(
                    "unsupported blend ({src:?}, {dst:?}, {eq:?})"
                )))
            }
        }
    }
}

/// Arguments shared by both render operations.
#[derive(Clone, Copy, Debug)]
pub struct CompositeArgs<'a> {
    /// Region of the destination to write; whole surface when `None`.
    pub destination_rect: Option<Rect>,
    /// Region of the source to read; whole surface when `None`.
    pub source_rect: Option<Rect>,
    /// Per-vertex modulation colors. Accepted and ignored.
    pub colors: Option<&'a [Color]>,
    /// Blend state selecting the paint operator.
    pub blend_state: &'a BlendState,
    /// Rotation and color-per-vertex flags. Accepted and ignored.
    pub flags: u32,
}

impl<'a> CompositeArgs<'a> {
    /// Whole source onto whole destination with `blend_state`.
    pub fn new(blend_state: &'a BlendState) -> Self {
        Self {
            destination_rect: None,
            source_rect: None,
            colors: None,
            blend_state,
            flags: 0,
        }
    }
}

pub(crate) fn over(dst: PremulPixel, src: PremulPixel) -> PremulPixel {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Paint `src`, placed at `offset` in destination coordinates, into `dst` within `clip`.
///
/// `Source` clears clip pixels the source does not cover; `Over` leaves them untouched.
pub(crate) fn paint(
    dst: &mut PackedSurface,
    src: ImageView<'_>,
    (ox, oy): (i64, i64),
    clip: Rect,
    op: Operator,
) {
    let bounds = dst.bounds();
    let x0 = clip.x0.min(bounds.x1);
    let x1 = clip.x1.min(bounds.x1);
    let y0 = clip.y0.min(bounds.y1);
    let y1 = clip.y1.min(bounds.y1);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let stride = dst.stride();
    let data = dst.data_mut();
    for y in y0..y1 {
        let sy = i64::from(y) - oy;
        let row_inside = sy >= 0 && sy < i64::from(src.height);
        for x in x0..x1 {
            let sx = i64::from(x) - ox;
            let i = y as usize * stride + x as usize * 4;
            let px = if row_inside && sx >= 0 && sx < i64::from(src.width) {
                Some(src.pixel(sx as u32, sy as u32))
            } else {
                None
            };
            let d = [data[i], data[i + 1], data[i + 2], data[i + 3]];
            let out = match (op, px) {
                (Operator::Source, Some(s)) => s,
                (Operator::Source, None) => [0; 4],
                (Operator::Over, Some(s)) => over(d, s),
                (Operator::Over, None) => d,
            };
            data[i..i + 4].copy_from_slice(&out);
        }
    }
}

fn origin_offset(d: Rect, s: Rect) -> (i64, i64) {
    (
        i64::from(d.x0) - i64::from(s.x0),
        i64::from(d.y0) - i64::from(s.y0),
    )
}

/// Resample `s_rect` of `src` into a fresh image of `d_rect`'s size.
///
/// `d_rect` may hang off the destination, but neither extent may exceed `max_extent`, the
/// largest surface the driver creates.
fn scale_region(
    src: ImageView<'_>,
    s_rect: Rect,
    d_rect: Rect,
    max_extent: u32,
) -> VdpResult<OwnedImage> {
    if d_rect.width() > max_extent || d_rect.height() > max_extent {
        return Err(VdpError::error(format!(
            "destination rect {d_rect:?} exceeds {max_extent}x{max_extent}"
        )));
    }
    if s_rect.x1 > src.width || s_rect.y1 > src.height {
        return Err(VdpError::invalid_value(format!(
            "source rect {s_rect:?} exceeds {}x{}",
            src.width, src.height
        )));
    }
    let start = s_rect.y0 as usize * src.stride + s_rect.x0 as usize * 4;
    let plane = Plane {
        data: src.data.get(start..).unwrap_or_default(),
        stride: src.stride,
    };
    let mut scratch = OwnedImage::try_new(d_rect.width(), d_rect.height())?;
    let ctx = ScaleContext::new(
        PixelFormat::Bgra,
        (s_rect.width(), s_rect.height()),
        PixelFormat::Bgra,
        (d_rect.width(), d_rect.height()),
        Filter::Bilinear,
    )?;
    let stride = scratch.stride;
    let rows = ctx.scale(&[plane], &mut scratch.data, stride)?;
    if rows != d_rect.height() {
        return Err(VdpError::error(format!(
            "scaler wrote {rows} of {} rows",
            d_rect.height()
        )));
    }
    Ok(scratch)
}

impl Driver {
    /// Composite an output surface onto another output surface.
    ///
    /// Differing rect extents scale the source bilinearly first. Source and destination may be
    /// the same surface.
    #[tracing::instrument(skip(self, args))]
    pub fn output_surface_render_output_surface(
        &self,
        destination: Handle,
        source: Handle,
        args: &CompositeArgs<'_>,
    ) -> VdpResult<()> {
        let dst = self.handles.output_surface(destination)?;
        let src = self.handles.output_surface(source)?;
        let op = Operator::from_blend_state(args.blend_state)?;

        // Snapshot first so a surface composited onto itself reads unmodified pixels.
        let src_img = src.pixels.lock().to_owned_image();
        let s_rect = args
            .source_rect
            .unwrap_or_else(|| Rect::from_size(src_img.width, src_img.height));

        let mut pixels = dst.pixels.lock();
        let d_rect = args.destination_rect.unwrap_or_else(|| pixels.bounds());
        if s_rect.same_extent(d_rect) {
            paint(
                &mut pixels,
                src_img.view(),
                origin_offset(d_rect, s_rect),
                d_rect,
                op,
            );
        } else {
            tracing::debug!(?s_rect, ?d_rect, "scaling source");
            let scratch = scale_region(
                src_img.view(),
                s_rect,
                d_rect,
                self.opts.max_output_surface_size,
            )?;
            paint(
                &mut pixels,
                scratch.view(),
                (i64::from(d_rect.x0), i64::from(d_rect.y0)),
                d_rect,
                op,
            );
        }
        pixels.mark_dirty();
        Ok(())
    }

    /// Composite a bitmap surface onto an output surface.
    ///
    /// Bitmap sources are never scaled: the source is placed at `d_rect.origin - s_rect.origin`
    /// and clipped to the destination rect.
    #[tracing::instrument(skip(self, args))]
    pub fn output_surface_render_bitmap_surface(
        &self,
        destination: Handle,
        source: Handle,
        args: &CompositeArgs<'_>,
    ) -> VdpResult<()> {
        let dst = self.handles.output_surface(destination)?;
        let src = self.handles.bitmap_surface(source)?;
        let op = Operator::from_blend_state(args.blend_state)?;

        let src_pixels = src.pixels.lock();
        let s_rect = args.source_rect.unwrap_or_else(|| src_pixels.bounds());
        let mut pixels = dst.pixels.lock();
        let d_rect = args.destination_rect.unwrap_or_else(|| pixels.bounds());
        paint(
            &mut pixels,
            src_pixels.view(),
            origin_offset(d_rect, s_rect),
            d_rect,
            op,
        );
        pixels.mark_dirty();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
