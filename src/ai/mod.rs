//! Text generation backends used by summaries and picks research.

pub mod openai;
pub mod traits;
pub mod types;

pub use openai::OpenAiModel;
pub use traits::TextModel;
pub use types::GenerateRequest;

#[cfg(test)]
pub(crate) mod scripted {
    use super::{GenerateRequest, TextModel};
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Test double that replays a fixed reply and records requests
    pub struct ScriptedModel {
        reply: Option<String>,
        pub requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedModel {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn last_request(&self) -> Option<GenerateRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn generate(&self, request: &GenerateRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .ok_or_else(|| Error::Ai("scripted failure".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }
}
