pub mod inspect;

pub use inspect::{AudioInfo, AudioInspector, SUPPORTED_FORMATS};
