#[macro_use]
extern crate log;

mod error;
pub use error::ImportError;

mod dexcom;
pub use dexcom::DexcomImporter;
