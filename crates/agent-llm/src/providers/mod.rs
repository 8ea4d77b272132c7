//! HTTP backends behind [`LLMProvider`](crate::LLMProvider)

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;
