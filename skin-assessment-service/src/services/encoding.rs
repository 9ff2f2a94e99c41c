//! Base64 encoding of uploaded photographs.

use crate::models::prompt::IMAGE_MEDIA_TYPE;
use crate::models::{EncodedImage, FacePhotos, FaceView, UploadedImage};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::try_join_all;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Encoding task for {view} failed: {source}")]
    TaskFailed {
        view: FaceView,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Encode one photograph byte-for-byte. No resizing or format conversion.
pub fn encode_image(image: &UploadedImage) -> EncodedImage {
    EncodedImage {
        view: image.view,
        media_type: IMAGE_MEDIA_TYPE,
        data: STANDARD.encode(&image.data),
    }
}

/// Encode all three photographs concurrently on the blocking pool.
///
/// The result is ordered front, left, right.
pub async fn encode_all(photos: FacePhotos) -> Result<Vec<EncodedImage>, EncodingError> {
    let tasks = photos.into_array().map(|image| async move {
        let view = image.view;
        tokio::task::spawn_blocking(move || encode_image(&image))
            .await
            .map_err(|source| EncodingError::TaskFailed { view, source })
    });

    try_join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FaceForm, FormValue};
    use axum::body::Bytes;

    fn photos(sizes: [usize; 3]) -> FacePhotos {
        let mut form = FaceForm::default();
        for (view, size) in FaceView::ALL.into_iter().zip(sizes) {
            form.insert(
                view.field_name(),
                FormValue::File {
                    file_name: Some(format!("{}.jpg", view)),
                    content_type: Some("image/jpeg".to_string()),
                    data: Bytes::from(vec![view as u8 + 1; size]),
                },
            );
        }
        form.into_photos().unwrap()
    }

    #[test]
    fn test_encode_image_is_standard_base64() {
        let image = UploadedImage {
            view: FaceView::Front,
            file_name: None,
            content_type: Some("image/png".to_string()),
            data: Bytes::from_static(b"\xff\xd8\xff\xe0hello"),
        };
        let encoded = encode_image(&image);
        assert_eq!(encoded.data, "/9j/4GhlbGxv");
        // The declared content type is not forwarded.
        assert_eq!(encoded.media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_encode_all_preserves_order_and_content() {
        let encoded = encode_all(photos([10 * 1024, 12 * 1024, 9 * 1024])).await.unwrap();

        assert_eq!(encoded.len(), 3);
        assert_eq!(
            encoded.iter().map(|e| e.view).collect::<Vec<_>>(),
            FaceView::ALL.to_vec()
        );
        for (image, size) in encoded.iter().zip([10 * 1024, 12 * 1024, 9 * 1024]) {
            assert!(!image.data.is_empty());
            assert_eq!(STANDARD.decode(&image.data).unwrap().len(), size);
        }
    }

    #[tokio::test]
    async fn test_empty_file_encodes_to_empty_string() {
        let encoded = encode_all(photos([0, 1, 2])).await.unwrap();
        assert_eq!(encoded[0].data, "");
        assert_eq!(encoded[1].data, "Ag==");
    }
}
