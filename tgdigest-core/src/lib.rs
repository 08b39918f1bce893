mod chunk;
mod config;
mod error;
mod format;
mod link;
pub mod models;
mod pipeline;
pub mod platform;

pub use chunk::split_message_into_chunks;
pub use config::Config;
pub use error::*;
pub use format::{
    DIGEST_FOOTER, DIGEST_HEADER, SUMMARIZATION_PROMPT, build_prompt, sign_last_chunk,
    wrap_digest,
};
pub use link::{LinkTarget, build_permalink};
pub use pipeline::{DigestPipeline, DigestReport, MESSAGE_LIMIT, Stage};

#[cfg(test)]
mod tests;
