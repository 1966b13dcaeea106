pub mod composite;
pub mod mixer;
pub(crate) mod scale;
