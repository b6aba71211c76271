pub mod error;

pub use error::IdCropError;
