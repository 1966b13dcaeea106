pub mod queue;
pub mod transport;
#[cfg(feature = "x11")]
pub mod x11;
