use anyhow::Result;
use async_trait::async_trait;

/// 업로드할 이미지 (multipart에서 읽은 원본)
/// Raw image bytes read from a multipart request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// 미디어 호스트 업로드 결과
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

/// 미디어 호스트 인터페이스
/// Media host collaborator. The auth layer never depends on it.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage>;

    async fn delete(&self, public_id: &str) -> Result<()>;
}
