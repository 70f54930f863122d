use async_trait::async_trait;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub aspect: (u32, u32),
    pub quality: f32,
    pub allows_editing: bool,
}

impl CaptureOptions {
    pub const PORTRAIT: CaptureOptions = CaptureOptions {
        aspect: (3, 4),
        quality: 0.7,
        allows_editing: true,
    };
    pub const SQUARE: CaptureOptions = CaptureOptions {
        aspect: (1, 1),
        quality: 0.7,
        allows_editing: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSource {
    Camera,
    Library,
}

/// Camera and photo library. Returns `None` when the user cancels.
#[async_trait]
pub trait MediaPicker: Send + Sync {
    async fn request_permission(&self, source: PhotoSource) -> bool;
    async fn pick(&self, source: PhotoSource, options: CaptureOptions) -> Option<String>;
}

#[async_trait]
pub trait BarcodeScanner: Send + Sync {
    async fn request_permission(&self) -> bool;
}

/// Asks for permission, then opens the picker. `Ok(None)` means cancelled.
pub async fn acquire_photo(
    picker: &dyn MediaPicker,
    source: PhotoSource,
    options: CaptureOptions,
) -> ApiResult<Option<String>> {
    if !picker.request_permission(source).await {
        let capability = match source {
            PhotoSource::Camera => "camera",
            PhotoSource::Library => "photo library",
        };
        return Err(ApiError::PermissionDenied(capability.into()));
    }
    Ok(picker.pick(source, options).await)
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;

    pub struct FakePicker {
        pub granted: bool,
        pub uri: Option<String>,
    }

    impl FakePicker {
        pub fn returning(uri: &str) -> Self {
            Self {
                granted: true,
                uri: Some(uri.into()),
            }
        }

        pub fn denied() -> Self {
            Self {
                granted: false,
                uri: None,
            }
        }
    }

    #[async_trait]
    impl MediaPicker for FakePicker {
        async fn request_permission(&self, _source: PhotoSource) -> bool {
            self.granted
        }
        async fn pick(&self, _source: PhotoSource, _options: CaptureOptions) -> Option<String> {
            self.uri.clone()
        }
    }

    pub struct FakeScanner(pub bool);

    #[async_trait]
    impl BarcodeScanner for FakeScanner {
        async fn request_permission(&self) -> bool {
            self.0
        }
    }
}
