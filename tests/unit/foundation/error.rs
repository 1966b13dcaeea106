use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VdpError::invalid_handle("x")
            .to_string()
            .contains("invalid handle:")
    );
    assert!(
        VdpError::invalid_blend_factor("x")
            .to_string()
            .contains("invalid blend factor:")
    );
    assert!(
        VdpError::no_implementation("x")
            .to_string()
            .contains("not implemented:")
    );
    assert!(
        VdpError::error("x")
            .to_string()
            .contains("rendering error:")
    );
}

#[test]
fn other_preserves_source_and_maps_to_generic_error() {
    let base = std::io::Error::other("boom");
    let err = VdpError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.status(), Status::Error);
}

#[test]
fn raw_status_values_match_wire_numbering() {
    assert_eq!(Status::Ok.as_raw(), 0);
    assert_eq!(Status::InvalidHandle.as_raw(), 3);
    assert_eq!(Status::InvalidBlendFactor.as_raw(), 11);
    assert_eq!(Status::InvalidFuncId.as_raw(), 19);
    assert_eq!(Status::Error.as_raw(), 25);
    for raw in 0..26 {
        assert_eq!(Status::from_raw(raw).map(Status::as_raw), Some(raw));
    }
    assert_eq!(Status::from_raw(26), None);
}

#[test]
fn status_of_maps_results() {
    let ok: VdpResult<u32> = Ok(1);
    assert_eq!(status_of(&ok), Status::Ok);

    let bad: VdpResult<u32> = Err(VdpError::invalid_size("too wide"));
    assert_eq!(status_of(&bad), Status::InvalidSize);
}

#[test]
fn names_use_the_wire_prefix() {
    assert_eq!(Status::InvalidRgbaFormat.as_str(), "VDP_STATUS_INVALID_RGBA_FORMAT");
    assert!(Status::Resources.description().contains("resources"));
}
