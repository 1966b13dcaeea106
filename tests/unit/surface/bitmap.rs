use super::*;
use crate::foundation::error::Status;
use crate::present::transport::MemoryTransport;

fn driver_with_device() -> (Driver, Handle) {
    let driver = Driver::default();
    let (device, _) = driver
        .device_create_x11(Arc::new(MemoryTransport::new()), 0)
        .unwrap();
    (driver, device)
}

#[test]
fn capabilities_need_a_live_device() {
    let (driver, device) = driver_with_device();
    let caps = driver
        .bitmap_surface_query_capabilities(device, RgbaFormat::B8G8R8A8)
        .unwrap();
    assert_eq!(
        caps,
        BitmapSurfaceCapabilities {
            is_supported: true,
            max_width: 2048,
            max_height: 2048,
        }
    );
    // Unsupported formats are only rejected at creation.
    assert!(
        driver
            .bitmap_surface_query_capabilities(device, RgbaFormat::A8)
            .unwrap()
            .is_supported
    );
    let err = driver
        .bitmap_surface_query_capabilities(Handle(77), RgbaFormat::B8G8R8A8)
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidHandle);
}

#[test]
fn create_checks_device_then_format_then_size() {
    let (driver, device) = driver_with_device();
    let bad_device = driver
        .bitmap_surface_create(Handle(77), RgbaFormat::A8, 9999, 1, false)
        .unwrap_err();
    assert_eq!(bad_device.status(), Status::InvalidHandle);

    let bad_format = driver
        .bitmap_surface_create(device, RgbaFormat::R8G8B8A8, 9999, 1, false)
        .unwrap_err();
    assert_eq!(bad_format.status(), Status::InvalidRgbaFormat);

    let too_big = driver
        .bitmap_surface_create(device, RgbaFormat::B8G8R8A8, 65536, 1, false)
        .unwrap_err();
    assert_eq!(too_big.status(), Status::InvalidSize);

    // Only the device is registered.
    assert_eq!(driver.handles.len(), 1);
}

#[test]
fn advertised_maximum_does_not_limit_creation() {
    let (driver, device) = driver_with_device();
    let h = driver
        .bitmap_surface_create(device, RgbaFormat::B8G8R8A8, 2049, 1, false)
        .unwrap();
    let pixels = driver.bitmap_surface_pixels(h).unwrap();
    assert_eq!((pixels.width, pixels.height), (2049, 1));
}

#[test]
fn put_bits_native_overwrites_rect() {
    let (driver, device) = driver_with_device();
    let h = driver
        .bitmap_surface_create(device, RgbaFormat::B8G8R8A8, 4, 4, true)
        .unwrap();

    // 2x2 block with a padded pitch of 12 bytes.
    let mut src = vec![0u8; 24];
    for (i, px) in [[10, 20, 30, 40], [50, 60, 70, 80]].iter().enumerate() {
        src[i * 4..i * 4 + 4].copy_from_slice(px);
        src[12 + i * 4..12 + i * 4 + 4].copy_from_slice(px);
    }
    driver
        .bitmap_surface_put_bits_native(h, &src, 12, Some(Rect::new(1, 1, 3, 3)))
        .unwrap();

    let pixels = driver.bitmap_surface_pixels(h).unwrap();
    assert_eq!(pixels.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(pixels.pixel(1, 1), [10, 20, 30, 40]);
    assert_eq!(pixels.pixel(2, 2), [50, 60, 70, 80]);
    assert_eq!(pixels.pixel(3, 3), [0, 0, 0, 0]);
    assert_eq!(pixels.generation, 1);
}

#[test]
fn put_bits_native_defaults_to_whole_surface() {
    let (driver, device) = driver_with_device();
    let h = driver
        .bitmap_surface_create(device, RgbaFormat::B8G8R8A8, 2, 2, false)
        .unwrap();
    let src = [9u8; 16];
    driver
        .bitmap_surface_put_bits_native(h, &src, 8, None)
        .unwrap();
    let pixels = driver.bitmap_surface_pixels(h).unwrap();
    assert!(pixels.data.iter().all(|&b| b == 9));
}

#[test]
fn put_bits_native_rejects_bad_pitch() {
    let (driver, device) = driver_with_device();
    let h = driver
        .bitmap_surface_create(device, RgbaFormat::B8G8R8A8, 4, 4, false)
        .unwrap();
    let src = [1u8; 64];
    for pitch in [6, 12] {
        let err = driver
            .bitmap_surface_put_bits_native(h, &src, pitch, None)
            .unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
    }
    let pixels = driver.bitmap_surface_pixels(h).unwrap();
    assert!(pixels.data.iter().all(|&b| b == 0));
    assert_eq!(pixels.generation, 0);
}

#[test]
fn get_parameters_is_not_implemented() {
    let (driver, device) = driver_with_device();
    let h = driver
        .bitmap_surface_create(device, RgbaFormat::B8G8R8A8, 1, 1, false)
        .unwrap();
    assert_eq!(
        driver.bitmap_surface_get_parameters(h).unwrap_err().status(),
        Status::NoImplementation
    );
    driver.bitmap_surface_destroy(h).unwrap();
    assert!(driver.bitmap_surface_pixels(h).is_err());
}
