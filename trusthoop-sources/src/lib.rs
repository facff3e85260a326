//! TrustHoop Sources
//!
//! Evidence collection adapters and the optional narrative layer:
//! - **HttpSource**: JSON endpoint per source, URL-templated by subject and factor
//! - **StaticSource**: in-memory or TOML-backed fixtures
//! - **ProfileSummarizer**: LLM narration of a finished profile
//!
//! Every adapter implements [`SignalSource`]; the runtime fans out over them.

pub mod backend;
pub mod fixture;
pub mod http;
pub mod summarizer;
pub mod traits;

pub use backend::*;
pub use fixture::*;
pub use http::*;
pub use summarizer::*;
pub use traits::*;
