use super::types::GenerateRequest;
use crate::error::Result;
use async_trait::async_trait;

/// Common trait for text generation backends.
/// Callers hold an `Option<&dyn TextModel>` and fall back when it is `None`.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a completion for the request
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Name of the underlying model, for logs
    fn model_name(&self) -> &str;
}
