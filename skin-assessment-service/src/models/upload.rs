//! Multipart upload model: the three face views and their validation.

use axum::body::Bytes;
use thiserror::Error;

/// Anatomical view of one uploaded photograph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceView {
    Front,
    Left,
    Right,
}

impl FaceView {
    /// All views in the order they are sent to the model.
    pub const ALL: [FaceView; 3] = [FaceView::Front, FaceView::Left, FaceView::Right];

    pub fn field_name(self) -> &'static str {
        match self {
            FaceView::Front => "face_front",
            FaceView::Left => "face_left",
            FaceView::Right => "face_right",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.field_name() == name)
    }
}

impl std::fmt::Display for FaceView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// One multipart part, as received.
#[derive(Debug, Clone)]
pub enum FormValue {
    /// Part whose `Content-Disposition` carries a filename.
    File {
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    },
    Text(String),
}

impl FormValue {
    /// An empty text value counts as not provided.
    fn is_blank(&self) -> bool {
        matches!(self, FormValue::Text(text) if text.is_empty())
    }
}

/// An uploaded photograph that passed validation.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub view: FaceView,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Base64 text of one photograph, tagged with the media type sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub view: FaceView,
    pub media_type: &'static str,
    pub data: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No file provided")]
    MissingFile,

    #[error("Invalid file type")]
    InvalidFileType,
}

/// Fields collected from the multipart body. The first occurrence of a
/// field name wins; unknown names are dropped.
#[derive(Debug, Default)]
pub struct FaceForm {
    front: Option<FormValue>,
    left: Option<FormValue>,
    right: Option<FormValue>,
    pub concern: Option<String>,
    pub skin_type: Option<String>,
}

impl FaceForm {
    /// Whether a field with this name is kept by `insert`.
    pub fn accepts(name: &str) -> bool {
        FaceView::from_field_name(name).is_some() || matches!(name, "concern" | "skin_type")
    }

    pub fn insert(&mut self, name: &str, value: FormValue) {
        if let Some(view) = FaceView::from_field_name(name) {
            let slot = self.slot(view);
            if slot.is_none() {
                *slot = Some(value);
            }
            return;
        }

        let profile_slot = match name {
            "concern" => &mut self.concern,
            "skin_type" => &mut self.skin_type,
            _ => return,
        };
        if profile_slot.is_none() {
            if let FormValue::Text(text) = value {
                *profile_slot = Some(text);
            }
        }
    }

    fn slot(&mut self, view: FaceView) -> &mut Option<FormValue> {
        match view {
            FaceView::Front => &mut self.front,
            FaceView::Left => &mut self.left,
            FaceView::Right => &mut self.right,
        }
    }

    /// Presence is checked on all three views before any type check.
    pub fn into_photos(self) -> Result<FacePhotos, UploadError> {
        let values = [self.front, self.left, self.right];

        if values
            .iter()
            .any(|value| value.as_ref().map_or(true, FormValue::is_blank))
        {
            return Err(UploadError::MissingFile);
        }

        let mut images = Vec::with_capacity(3);
        for (view, value) in FaceView::ALL.into_iter().zip(values) {
            match value {
                Some(FormValue::File {
                    file_name,
                    content_type,
                    data,
                }) => images.push(UploadedImage {
                    view,
                    file_name,
                    content_type,
                    data,
                }),
                _ => return Err(UploadError::InvalidFileType),
            }
        }

        let [front, left, right]: [UploadedImage; 3] = images
            .try_into()
            .map_err(|_| UploadError::MissingFile)?;
        Ok(FacePhotos { front, left, right })
    }
}

/// Exactly one validated photograph per view.
#[derive(Debug, Clone)]
pub struct FacePhotos {
    pub front: UploadedImage,
    pub left: UploadedImage,
    pub right: UploadedImage,
}

impl FacePhotos {
    pub fn into_array(self) -> [UploadedImage; 3] {
        [self.front, self.left, self.right]
    }

    pub fn total_bytes(&self) -> usize {
        self.front.data.len() + self.left.data.len() + self.right.data.len()
    }
}
