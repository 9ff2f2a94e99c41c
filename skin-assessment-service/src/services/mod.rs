pub mod backend;
pub mod encoding;
pub mod providers;

pub use backend::BackendClient;
pub use providers::{AnthropicProvider, AssessmentProvider, MockProvider, ProviderError};
