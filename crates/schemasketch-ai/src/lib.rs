pub mod llm_provider;
pub mod openai_provider;
pub mod prompt;
pub mod synthesizer;
pub mod validator;

pub use llm_provider::*;
pub use openai_provider::*;
pub use synthesizer::*;
pub use validator::{validate_reply, ValidationFailure};
