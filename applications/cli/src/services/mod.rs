/// Application services
pub mod encoder;

pub use encoder::{EncodeStats, EncoderService};
