//! Concrete `ProviderAdapter` implementations for the closed set
//! `{openai, deepseek, huggingface}` (spec §3 Provider Identity).

pub mod huggingface;
pub mod openai;

pub use huggingface::HuggingFaceAdapter;
pub use openai::OpenAiAdapter;
