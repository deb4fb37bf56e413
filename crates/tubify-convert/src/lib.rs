mod converter;
mod identity;

pub use converter::{Converter, ConverterConfig};
pub use identity::{clean_name, search_key, track_identity, video_identity};
