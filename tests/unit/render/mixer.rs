use super::*;
use crate::foundation::core::{RgbaFormat, YCbCrFormat};
use crate::foundation::error::Status;
use crate::present::transport::MemoryTransport;

fn driver_with_device() -> (Driver, Handle) {
    let driver = Driver::default();
    let (device, _) = driver
        .device_create_x11(Arc::new(MemoryTransport::new()), 0)
        .unwrap();
    (driver, device)
}

fn uniform_video(driver: &Driver, device: Handle, w: u32, h: u32, yuv: [u8; 3]) -> Handle {
    let surface = driver
        .video_surface_create(device, ChromaType::Yuv420, w, h)
        .unwrap();
    let y = vec![yuv[0]; (w * h) as usize];
    let v = vec![yuv[2]; (w * h / 4) as usize];
    let u = vec![yuv[1]; (w * h / 4) as usize];
    driver
        .video_surface_put_bits_ycbcr(surface, YCbCrFormat::Yv12, &[&y, &v, &u], &[w, w / 2, w / 2])
        .unwrap();
    surface
}

#[test]
fn raw_ids_decode() {
    assert_eq!(MixerFeature::from_raw(11).unwrap(), MixerFeature::HighQualityScalingL1);
    assert_eq!(
        MixerFeature::from_raw(6).unwrap_err().status(),
        Status::InvalidVideoMixerFeature
    );
    assert_eq!(
        MixerParameter::from_raw(2, 1).unwrap(),
        MixerParameter::ChromaType(ChromaType::Yuv422)
    );
    assert_eq!(
        MixerParameter::from_raw(9, 0).unwrap_err().status(),
        Status::InvalidVideoMixerParameter
    );
    assert_eq!(
        MixerParameter::from_raw(2, 7).unwrap_err().status(),
        Status::InvalidChromaType
    );
}

#[test]
fn setters_record_without_effect() {
    let (driver, device) = driver_with_device();
    let mixer = driver
        .video_mixer_create(
            device,
            &[MixerFeature::Sharpness],
            &[MixerParameter::VideoSurfaceWidth(64)],
        )
        .unwrap();
    driver
        .video_mixer_set_feature_enables(mixer, &[(MixerFeature::Sharpness, true)])
        .unwrap();
    driver
        .video_mixer_set_attribute_values(mixer, &[MixerAttributeValue::SharpnessLevel(0.5)])
        .unwrap();

    let m = driver.handles.video_mixer(mixer).unwrap();
    let state = m.state.lock();
    assert_eq!(state.enables.get(&MixerFeature::Sharpness), Some(&true));
    assert_eq!(state.attributes.len(), 1);
}

#[test]
fn setters_need_a_live_mixer() {
    let (driver, _) = driver_with_device();
    let err = driver
        .video_mixer_set_feature_enables(Handle(55), &[])
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidHandle);
}

#[test]
fn render_mid_gray_fills_destination() {
    let (driver, device) = driver_with_device();
    let mixer = driver.video_mixer_create(device, &[], &[]).unwrap();
    let video = uniform_video(&driver, device, 16, 16, [128, 128, 128]);
    let output = driver
        .output_surface_create(device, RgbaFormat::B8G8R8A8, 32, 8)
        .unwrap();
    driver
        .video_mixer_render(mixer, &MixerRender::new(video, output))
        .unwrap();
    let pixels = driver.output_surface_pixels(output).unwrap();
    for px in pixels.data.chunks_exact(4) {
        assert_eq!(px, &[130, 130, 130, 255]);
    }
    assert_eq!(pixels.generation, 1);
}

#[test]
fn render_validates_every_handle() {
    let (driver, device) = driver_with_device();
    let mixer = driver.video_mixer_create(device, &[], &[]).unwrap();
    let video = uniform_video(&driver, device, 4, 4, [16, 128, 128]);
    let output = driver
        .output_surface_create(device, RgbaFormat::B8G8R8A8, 4, 4)
        .unwrap();

    for (m, v, o) in [
        (Handle(900), video, output),
        (mixer, output, output),
        (mixer, video, video),
    ] {
        let err = driver
            .video_mixer_render(m, &MixerRender::new(v, o))
            .unwrap_err();
        assert_eq!(err.status(), Status::InvalidHandle);
    }
    let pixels = driver.output_surface_pixels(output).unwrap();
    assert_eq!(pixels.generation, 0);
}

#[test]
fn render_from_empty_video_surface_is_an_error() {
    let (driver, device) = driver_with_device();
    let mixer = driver.video_mixer_create(device, &[], &[]).unwrap();
    let video = driver
        .video_surface_create(device, ChromaType::Yuv420, 0, 0)
        .unwrap();
    let output = driver
        .output_surface_create(device, RgbaFormat::B8G8R8A8, 4, 4)
        .unwrap();
    let err = driver
        .video_mixer_render(mixer, &MixerRender::new(video, output))
        .unwrap_err();
    assert_eq!(err.status(), Status::Error);
}

#[test]
fn queries_are_not_implemented() {
    let (driver, device) = driver_with_device();
    let mixer = driver.video_mixer_create(device, &[], &[]).unwrap();
    assert_eq!(
        driver
            .video_mixer_query_feature_support(device, MixerFeature::LumaKey)
            .unwrap_err()
            .status(),
        Status::NoImplementation
    );
    assert_eq!(
        driver
            .video_mixer_get_attribute_values(mixer, &[0])
            .unwrap_err()
            .status(),
        Status::NoImplementation
    );
    driver.video_mixer_destroy(mixer).unwrap();
    assert!(driver.video_mixer_destroy(mixer).is_err());
}
