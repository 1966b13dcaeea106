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
fn luma_stride_rounds_up_to_four() {
    assert_eq!(luma_stride(64), 64);
    assert_eq!(luma_stride(65), 68);
    assert_eq!(luma_stride(3), 4);
    assert_eq!(luma_stride(0), 0);
}

#[test]
fn create_sizes_planes_by_chroma_type() {
    let (driver, device) = driver_with_device();
    for (chroma, divider) in [
        (ChromaType::Yuv420, 4),
        (ChromaType::Yuv422, 2),
        (ChromaType::Yuv444, 1),
    ] {
        let h = driver.video_surface_create(device, chroma, 30, 10).unwrap();
        let surface = driver.handles.video_surface(h).unwrap();
        assert_eq!(surface.stride, 32);
        let planes = surface.planes.lock();
        assert_eq!(planes.y.len(), 320);
        assert_eq!(planes.v.len(), 320 / divider);
        assert_eq!(planes.u.len(), 320 / divider);
        assert!(planes.y.iter().all(|&b| b == 0));
    }
}

#[test]
fn create_on_unknown_device_fails() {
    let (driver, _) = driver_with_device();
    let err = driver
        .video_surface_create(Handle(999), ChromaType::Yuv420, 16, 16)
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidHandle);
}

#[test]
fn capability_queries_report_supported() {
    let (driver, device) = driver_with_device();
    let caps = driver
        .video_surface_query_capabilities(device, ChromaType::Yuv444)
        .unwrap();
    assert!(caps.is_supported);
    assert_eq!((caps.max_width, caps.max_height), (1920, 1080));
    assert!(
        driver
            .video_surface_query_get_put_bits_ycbcr_capabilities(
                device,
                ChromaType::Yuv420,
                YCbCrFormat::Nv12
            )
            .unwrap()
    );
}

#[test]
fn yv12_upload_and_readback_round_trip() {
    let (driver, device) = driver_with_device();
    let h = driver
        .video_surface_create(device, ChromaType::Yuv420, 6, 4)
        .unwrap();

    let y: Vec<u8> = (0..6 * 4).map(|i| i as u8).collect();
    let v: Vec<u8> = (0..3 * 2).map(|i| 100 + i as u8).collect();
    let u: Vec<u8> = (0..3 * 2).map(|i| 200 + i as u8).collect();
    driver
        .video_surface_put_bits_ycbcr(h, YCbCrFormat::Yv12, &[&y, &v, &u], &[6, 3, 3])
        .unwrap();

    {
        let surface = driver.handles.video_surface(h).unwrap();
        let planes = surface.planes.lock();
        assert_eq!(&planes.y[8..14], &y[6..12]);
        assert_eq!(&planes.v[4..7], &v[3..6]);
        assert_eq!(&planes.u[0..3], &u[0..3]);
    }

    let mut y2 = vec![0u8; 24];
    let mut v2 = vec![0u8; 6];
    let mut u2 = vec![0u8; 6];
    driver
        .video_surface_get_bits_ycbcr(
            h,
            YCbCrFormat::Yv12,
            &mut [&mut y2, &mut v2, &mut u2],
            &[6, 3, 3],
        )
        .unwrap();
    assert_eq!((y2, v2, u2), (y, v, u));
}

#[test]
fn put_bits_rejects_other_formats() {
    let (driver, device) = driver_with_device();
    let h = driver
        .video_surface_create(device, ChromaType::Yuv420, 4, 4)
        .unwrap();
    let plane = [0u8; 16];
    let err = driver
        .video_surface_put_bits_ycbcr(h, YCbCrFormat::Nv12, &[&plane, &plane, &plane], &[4, 2, 2])
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidYCbCrFormat);
}

#[test]
fn put_bits_rejects_short_sources() {
    let (driver, device) = driver_with_device();
    let h = driver
        .video_surface_create(device, ChromaType::Yuv420, 8, 8)
        .unwrap();
    let y = [0u8; 64];
    let c = [0u8; 15];
    let err = driver
        .video_surface_put_bits_ycbcr(h, YCbCrFormat::Yv12, &[&y, &c, &c], &[8, 4, 4])
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidValue);

    let err = driver
        .video_surface_put_bits_ycbcr(h, YCbCrFormat::Yv12, &[&y, &y], &[8, 4])
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidPointer);
}

#[test]
fn get_parameters_is_not_implemented_but_info_works() {
    let (driver, device) = driver_with_device();
    let h = driver
        .video_surface_create(device, ChromaType::Yuv422, 10, 6)
        .unwrap();
    assert_eq!(
        driver.video_surface_get_parameters(h).unwrap_err().status(),
        Status::NoImplementation
    );
    let info = driver.video_surface_info(h).unwrap();
    assert_eq!(info.chroma_type, ChromaType::Yuv422);
    assert_eq!((info.width, info.height, info.stride), (10, 6, 12));
}

#[test]
fn destroy_invalidates_handle() {
    let (driver, device) = driver_with_device();
    let h = driver
        .video_surface_create(device, ChromaType::Yuv420, 4, 4)
        .unwrap();
    driver.video_surface_destroy(h).unwrap();
    assert_eq!(
        driver.video_surface_destroy(h).unwrap_err().status(),
        Status::InvalidHandle
    );
    assert!(driver.video_surface_info(h).is_err());
}
