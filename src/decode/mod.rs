//! Input decoder module
//!
//! Supports: JSON, JSONL, and auto-detection between the two
//!
//! # Overview
//!
//! Source files hold containers (`{"items": [...]}`), either as one JSON
//! document per file or one document per line. Decoders turn a file body
//! into the list of containers it holds. Whether each container is valid
//! is the transform's concern, not the decoder's.

mod decoders;
mod types;

pub use decoders::{AutoDecoder, JsonDecoder, JsonlDecoder};
pub use types::{ContainerDecoder, DecoderFormat};

/// Build the decoder for a configured format
pub fn build_decoder(format: DecoderFormat) -> Box<dyn ContainerDecoder> {
    match format {
        DecoderFormat::Auto => Box::new(AutoDecoder::new()),
        DecoderFormat::Json => Box::new(JsonDecoder::new()),
        DecoderFormat::Jsonl => Box::new(JsonlDecoder::new()),
    }
}

#[cfg(test)]
mod tests;
