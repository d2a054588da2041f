//! # watson-sdk
//!
//! Watson 自然语言服务的异步 Rust 客户端：文本分类与组合文本分析。
//!
//! Async client for Watson natural-language services: the Natural Language
//! Classifier (train, classify, manage classifiers) and AlchemyLanguage
//! combined analysis (entities, concepts, keywords, relations, sentiment, ...).
//!
//! ## Request lifecycle
//!
//! Every call follows the same pipeline:
//!
//! 1. [`request::RequestBuilder`] validates parameters and builds an
//!    [`request::OutboundRequest`] (auth, headers, JSON/form/multipart body).
//! 2. [`transport::send`] performs the exchange under the client's timeout.
//! 3. [`response::classify`] sorts the raw response into success, empty
//!    success, remote error or undecodable body.
//! 4. [`decode`] turns the body into a typed model whose optional fields are
//!    `None` when the service did not send them.
//!
//! Failures at any stage surface as a single [`ServiceError`]. Local failures
//! carry codes from [`error_code::SYNTHETIC_RANGE`], remote failures carry the
//! service's own code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use watson_sdk::classifier::NaturalLanguageClassifier;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let nlc = NaturalLanguageClassifier::new("username", "password")?;
//!     let classification = nlc.classify("10D41B-nlc-1", "is it sunny?").await?;
//!     println!("{:?}", classification.top_class);
//!     Ok(())
//! }
//! ```
//!
//! Callback-style callers use the `*_with_handler` variants; the handler runs
//! exactly once on the client's callback queue (see [`client::dispatch`]).
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`classifier`] | Natural Language Classifier service |
//! | [`alchemy`] | AlchemyLanguage combined analysis |
//! | [`client`] | Configuration, builder, shared pipeline, completion dispatch |
//! | [`request`] | Outbound request construction |
//! | [`transport`] | HTTP exchange and timeout |
//! | [`response`] | Response classification |
//! | [`decode`] | Field-by-field model decoding |
//! | [`error`] / [`error_code`] | Error taxonomy and codes |

pub mod alchemy;
pub mod classifier;
pub mod client;
pub mod decode;
pub mod error;
pub mod error_code;
pub mod request;
pub mod response;
pub mod transport;

pub use alchemy::AlchemyLanguage;
pub use classifier::NaturalLanguageClassifier;
pub use client::{Credentials, ServiceClientBuilder, ServiceConfiguration};
pub use error::{Error, ErrorContext, ServiceError};
pub use error_code::ErrorKind;

/// Result of internal plumbing (request building, configuration).
pub type Result<T> = std::result::Result<T, Error>;

/// Result of a service operation.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
