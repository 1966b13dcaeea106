use super::*;
use crate::foundation::error::Status;

#[test]
fn rect_extents_saturate_when_inverted() {
    let r = Rect::new(10, 4, 2, 8);
    assert_eq!(r.width(), 0);
    assert_eq!(r.height(), 4);
    assert!(r.is_empty());
}

#[test]
fn rect_same_extent_ignores_origin() {
    let a = Rect::new(0, 0, 16, 8);
    let b = Rect::new(100, 50, 116, 58);
    assert!(a.same_extent(b));
    assert!(!a.same_extent(Rect::from_size(16, 9)));
}

#[test]
fn chroma_storage_dividers() {
    assert_eq!(ChromaType::Yuv420.storage_divider(), 4);
    assert_eq!(ChromaType::Yuv422.storage_divider(), 2);
    assert_eq!(ChromaType::Yuv444.storage_divider(), 1);
}

#[test]
fn unknown_raw_values_report_their_specific_status() {
    assert_eq!(
        ChromaType::from_raw(9).unwrap_err().status(),
        Status::InvalidChromaType
    );
    assert_eq!(
        YCbCrFormat::from_raw(42).unwrap_err().status(),
        Status::InvalidYCbCrFormat
    );
    assert_eq!(
        RgbaFormat::from_raw(7).unwrap_err().status(),
        Status::InvalidRgbaFormat
    );
    assert_eq!(
        ColorStandard::from_raw(3).unwrap_err().status(),
        Status::InvalidColorStandard
    );
    assert_eq!(YCbCrFormat::from_raw(1).unwrap(), YCbCrFormat::Yv12);
}

#[test]
fn only_bgra_is_supported() {
    assert!(RgbaFormat::B8G8R8A8.ensure_supported().is_ok());
    assert_eq!(
        RgbaFormat::R8G8B8A8.ensure_supported().unwrap_err().status(),
        Status::InvalidRgbaFormat
    );
}
