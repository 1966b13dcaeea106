use super::*;
use crate::foundation::core::RgbaFormat;
use crate::foundation::error::Status;
use crate::present::transport::MemoryTransport;
use std::sync::Arc;

fn driver_with_device() -> (Driver, Handle) {
    let driver = Driver::default();
    let (device, _) = driver
        .device_create_x11(Arc::new(MemoryTransport::new()), 0)
        .unwrap();
    (driver, device)
}

fn filled_output(driver: &Driver, device: Handle, w: u32, h: u32, px: [u8; 4]) -> Handle {
    let handle = driver
        .output_surface_create(device, RgbaFormat::B8G8R8A8, w, h)
        .unwrap();
    let surface = driver.handles.output_surface(handle).unwrap();
    let mut pixels = surface.pixels.lock();
    for chunk in pixels.data_mut().chunks_exact_mut(4) {
        chunk.copy_from_slice(&px);
    }
    drop(pixels);
    handle
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn over_half_alpha_blends() {
    // 128 + 200 * 127 / 255 = 128 + 100 (rounded)
    assert_eq!(over([200, 200, 200, 255], [128, 0, 0, 128]), [228, 100, 100, 255]);
}

#[test]
fn blend_factor_and_equation_decode() {
    assert_eq!(BlendFactor::from_raw(5).unwrap(), BlendFactor::OneMinusSrcAlpha);
    assert_eq!(
        BlendFactor::from_raw(15).unwrap_err().status(),
        Status::InvalidBlendFactor
    );
    assert_eq!(BlendEquation::from_raw(2).unwrap(), BlendEquation::Add);
    assert_eq!(
        BlendEquation::from_raw(9).unwrap_err().status(),
        Status::InvalidBlendEquation
    );
}

#[test]
fn operator_selection_covers_two_triples() {
    assert_eq!(
        Operator::from_blend_state(&BlendState::overwrite()).unwrap(),
        Operator::Source
    );
    assert_eq!(
        Operator::from_blend_state(&BlendState::source_over()).unwrap(),
        Operator::Over
    );

    let mut additive = BlendState::overwrite();
    additive.blend_factor_destination_color = BlendFactor::One;
    assert_eq!(
        Operator::from_blend_state(&additive).unwrap_err().status(),
        Status::InvalidBlendFactor
    );

    let mut max = BlendState::source_over();
    max.blend_equation_color = BlendEquation::Max;
    assert_eq!(
        Operator::from_blend_state(&max).unwrap_err().status(),
        Status::InvalidBlendFactor
    );

    let mut stale = BlendState::overwrite();
    stale.struct_version = 1;
    assert_eq!(
        Operator::from_blend_state(&stale).unwrap_err().status(),
        Status::InvalidValue
    );
}

#[test]
fn paint_source_clears_uncovered_clip_pixels() {
    let mut dst = PackedSurface::new(3, 1).unwrap();
    dst.data_mut().fill(9);
    let src = OwnedImage {
        data: vec![1, 2, 3, 4],
        width: 1,
        height: 1,
        stride: 4,
    };
    paint(&mut dst, src.view(), (1, 0), Rect::new(0, 0, 2, 1), Operator::Source);
    assert_eq!(dst.data(), &[0, 0, 0, 0, 1, 2, 3, 4, 9, 9, 9, 9]);
}

#[test]
fn paint_clips_to_destination_bounds() {
    let mut dst = PackedSurface::new(2, 2).unwrap();
    let src = OwnedImage {
        data: vec![7; 4 * 4 * 4],
        width: 4,
        height: 4,
        stride: 16,
    };
    paint(&mut dst, src.view(), (-1, -1), Rect::new(0, 0, 10, 10), Operator::Over);
    assert!(dst.data().iter().all(|&b| b == 7));
}

#[test]
fn render_output_overwrite_copies_region() {
    let (driver, device) = driver_with_device();
    let dst = filled_output(&driver, device, 4, 4, [0, 0, 0, 255]);
    let src = filled_output(&driver, device, 4, 4, [10, 20, 30, 255]);
    let state = BlendState::overwrite();
    let args = CompositeArgs {
        destination_rect: Some(Rect::new(2, 2, 4, 4)),
        source_rect: Some(Rect::new(0, 0, 2, 2)),
        ..CompositeArgs::new(&state)
    };
    driver
        .output_surface_render_output_surface(dst, src, &args)
        .unwrap();
    let pixels = driver.output_surface_pixels(dst).unwrap();
    assert_eq!(pixels.pixel(1, 1), [0, 0, 0, 255]);
    assert_eq!(pixels.pixel(2, 2), [10, 20, 30, 255]);
    assert_eq!(pixels.pixel(3, 3), [10, 20, 30, 255]);
    assert_eq!(pixels.generation, 1);
}

#[test]
fn render_output_scales_when_extents_differ() {
    let (driver, device) = driver_with_device();
    let dst = filled_output(&driver, device, 8, 8, [0, 0, 0, 0]);
    let src = filled_output(&driver, device, 2, 2, [50, 60, 70, 255]);
    let state = BlendState::overwrite();
    let args = CompositeArgs {
        destination_rect: Some(Rect::new(0, 0, 8, 4)),
        ..CompositeArgs::new(&state)
    };
    driver
        .output_surface_render_output_surface(dst, src, &args)
        .unwrap();
    let pixels = driver.output_surface_pixels(dst).unwrap();
    assert_eq!(pixels.pixel(7, 3), [50, 60, 70, 255]);
    assert_eq!(pixels.pixel(7, 4), [0, 0, 0, 0]);
}

#[test]
fn render_output_onto_itself_reads_original_pixels() {
    let (driver, device) = driver_with_device();
    let surface = filled_output(&driver, device, 4, 1, [0, 0, 0, 255]);
    {
        let s = driver.handles.output_surface(surface).unwrap();
        s.pixels.lock().data_mut()[0..4].copy_from_slice(&[1, 1, 1, 255]);
    }
    let state = BlendState::overwrite();
    let args = CompositeArgs {
        destination_rect: Some(Rect::new(1, 0, 4, 1)),
        source_rect: Some(Rect::new(0, 0, 3, 1)),
        ..CompositeArgs::new(&state)
    };
    driver
        .output_surface_render_output_surface(surface, surface, &args)
        .unwrap();
    let pixels = driver.output_surface_pixels(surface).unwrap();
    assert_eq!(pixels.pixel(1, 0), [1, 1, 1, 255]);
    assert_eq!(pixels.pixel(2, 0), [0, 0, 0, 255]);
}

#[test]
fn render_checks_handles_before_blend_state() {
    let (driver, device) = driver_with_device();
    let dst = filled_output(&driver, device, 1, 1, [0; 4]);
    let mut state = BlendState::overwrite();
    state.struct_version = 3;
    let args = CompositeArgs::new(&state);
    let err = driver
        .output_surface_render_output_surface(dst, Handle(4242), &args)
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidHandle);
    let err = driver
        .output_surface_render_output_surface(dst, dst, &args)
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidValue);
}

#[test]
fn render_bitmap_is_painted_unscaled_at_offset() {
    let (driver, device) = driver_with_device();
    let dst = filled_output(&driver, device, 4, 4, [0, 0, 0, 255]);
    let bitmap = driver
        .bitmap_surface_create(device, RgbaFormat::B8G8R8A8, 2, 2, false)
        .unwrap();
    driver
        .bitmap_surface_put_bits_native(bitmap, &[0, 0, 128, 128].repeat(4), 8, None)
        .unwrap();

    let state = BlendState::source_over();
    let args = CompositeArgs {
        destination_rect: Some(Rect::new(1, 1, 4, 4)),
        source_rect: Some(Rect::new(0, 0, 2, 2)),
        ..CompositeArgs::new(&state)
    };
    driver
        .output_surface_render_bitmap_surface(dst, bitmap, &args)
        .unwrap();
    let pixels = driver.output_surface_pixels(dst).unwrap();
    assert_eq!(pixels.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(pixels.pixel(1, 1), [0, 0, 128, 255]);
    assert_eq!(pixels.pixel(2, 2), [0, 0, 128, 255]);
    // Outside the bitmap but inside the rect: untouched under source-over.
    assert_eq!(pixels.pixel(3, 3), [0, 0, 0, 255]);
}

#[test]
fn oversized_scaled_destination_rect_is_an_error() {
    let (driver, device) = driver_with_device();
    let dst = filled_output(&driver, device, 4, 4, [5, 6, 7, 255]);
    let src = filled_output(&driver, device, 2, 2, [50, 60, 70, 255]);
    let before = driver.output_surface_pixels(dst).unwrap();

    let state = BlendState::overwrite();
    let args = CompositeArgs {
        destination_rect: Some(Rect::new(0, 0, u32::MAX, u32::MAX)),
        ..CompositeArgs::new(&state)
    };
    let err = driver
        .output_surface_render_output_surface(dst, src, &args)
        .unwrap_err();
    assert_eq!(err.status(), Status::Error);

    let after = driver.output_surface_pixels(dst).unwrap();
    assert_eq!(after.generation, before.generation);
    assert_eq!(after.data, before.data);
}

#[test]
fn scaled_destination_rect_may_hang_off_the_surface() {
    let (driver, device) = driver_with_device();
    let dst = filled_output(&driver, device, 4, 4, [0, 0, 0, 255]);
    let src = filled_output(&driver, device, 2, 2, [50, 60, 70, 255]);
    let state = BlendState::overwrite();
    let args = CompositeArgs {
        destination_rect: Some(Rect::new(2, 2, 10, 10)),
        ..CompositeArgs::new(&state)
    };
    driver
        .output_surface_render_output_surface(dst, src, &args)
        .unwrap();
    let pixels = driver.output_surface_pixels(dst).unwrap();
    assert_eq!(pixels.pixel(3, 3), [50, 60, 70, 255]);
    assert_eq!(pixels.pixel(1, 1), [0, 0, 0, 255]);
}
