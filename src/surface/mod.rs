pub(crate) mod packed;

pub mod bitmap;
pub mod output;
pub mod video;
