//! Defines the custom error types for the application.
//!
//! Store-level failures live in [`crate::store::StoreError`] and are wrapped
//! here so the binary only ever sees one error type.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DealerError {
    #[error("I/O Error: {1} - {0}")]
    Io(#[source] std::io::Error, String),

    #[error("XML Parse Error in {document} document: {message}")]
    XmlParse {
        document: &'static str,
        message: String,
    },

    #[error("Unexpected root element: expected <{expected}>, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("Arithmetic Error: {0}")]
    Arithmetic(String),

    #[error("Store Error: {0}")]
    Store(#[from] StoreError),
}
