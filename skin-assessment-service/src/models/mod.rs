//! Domain models for the skin assessment service.

pub mod prompt;
pub mod upload;

pub use prompt::{MessagesRequest, SkinProfile};
pub use upload::{EncodedImage, FaceForm, FacePhotos, FaceView, FormValue, UploadError, UploadedImage};
