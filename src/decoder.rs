//! Decoder entry points. Decoding is not emulated; every call reports `NoImplementation`.

use crate::driver::Driver;
use crate::foundation::core::Handle;
use crate::foundation::error::{VdpError, VdpResult};

/// Codec profile id as passed through the emulated API.
pub type DecoderProfile = u32;

/// Answer of a decoder capability query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecoderCapabilities {
    /// Profile is decodable.
    pub is_supported: bool,
    /// Highest level supported.
    pub max_level: u32,
    /// Largest macroblock count per picture.
    pub max_macroblocks: u32,
    /// Largest picture width.
    pub max_width: u32,
    /// Largest picture height.
    pub max_height: u32,
}

impl Driver {
    /// Not implemented.
    pub fn decoder_query_capabilities(
        &self,
        _device: Handle,
        _profile: DecoderProfile,
    ) -> VdpResult<DecoderCapabilities> {
        Err(VdpError::no_implementation("decoder_query_capabilities"))
    }

    /// Not implemented.
    pub fn decoder_create(
        &self,
        _device: Handle,
        _profile: DecoderProfile,
        _width: u32,
        _height: u32,
        _max_references: u32,
    ) -> VdpResult<Handle> {
        Err(VdpError::no_implementation("decoder_create"))
    }

    /// Not implemented.
    pub fn decoder_destroy(&self, _decoder: Handle) -> VdpResult<()> {
        Err(VdpError::no_implementation("decoder_destroy"))
    }

    /// Not implemented.
    pub fn decoder_get_parameters(
        &self,
        _decoder: Handle,
    ) -> VdpResult<(DecoderProfile, u32, u32)> {
        Err(VdpError::no_implementation("decoder_get_parameters"))
    }

    /// Not implemented.
    pub fn decoder_render(
        &self,
        _decoder: Handle,
        _target: Handle,
        _picture_info: &[u8],
        _bitstream_buffers: &[&[u8]],
    ) -> VdpResult<()> {
        Err(VdpError::no_implementation("decoder_render"))
    }
}
