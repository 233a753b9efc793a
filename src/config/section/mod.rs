//! Configuration section definitions.

pub mod docs;
pub mod publish;

pub use docs::DocsConfig;
pub use publish::{GithubPagesConfig, PublishConfig};
