pub mod stats;

pub(crate) mod validate;
