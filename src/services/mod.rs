pub mod catalog_text;
pub mod email;
pub mod library;
pub mod providers;
pub mod recommender;

pub use providers::{ChatProvider, OpenAiProvider, StructuredPrompt};
pub use recommender::generate_recommendation;
