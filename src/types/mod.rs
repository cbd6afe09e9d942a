pub mod error;
pub mod slide;
pub mod utils;

pub use error::{Result, SlideError, StatusClassifier, TransportError};
pub use slide::{Slide, SlideCandidate};
pub use utils::{char_len, json_string, json_string_array, preview};
