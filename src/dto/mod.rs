//! Transfer records shaped after the XML documents the tool reads and writes.
//!
//! Every document type names its fixed root element through [`XmlDocument`],
//! which the XML codec uses both to reject foreign documents on import and to
//! name the root on export.

pub mod export;
pub mod import;

/// A top-level XML document with a fixed root element name.
pub trait XmlDocument {
    /// Root element name, without any namespace prefix.
    const ROOT: &'static str;
}
