//! XML codec for the import and export documents.
//!
//! Parsing checks the root element against [`XmlDocument::ROOT`] before
//! handing the text to serde, since `quick-xml` itself ignores the root name.
//! Writing emits an XML declaration, indents by two spaces and never declares
//! a namespace.

use crate::dto::XmlDocument;
use crate::errors::DealerError;
use quick_xml::Reader;
use quick_xml::events::Event;
use quick_xml::se::Serializer;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

/// Parse a document of type `T` from XML text.
pub fn parse_document<T>(xml: &str) -> Result<T, DealerError>
where
    T: DeserializeOwned + XmlDocument,
{
    let found = root_element(xml).map_err(|e| DealerError::XmlParse {
        document: T::ROOT,
        message: e.to_string(),
    })?;

    match found {
        Some(name) if name == T::ROOT => {}
        Some(name) => {
            return Err(DealerError::UnexpectedRoot {
                expected: T::ROOT,
                found: name,
            });
        }
        None => {
            return Err(DealerError::XmlParse {
                document: T::ROOT,
                message: "document has no root element".to_string(),
            });
        }
    }

    quick_xml::de::from_str(xml).map_err(|e| DealerError::XmlParse {
        document: T::ROOT,
        message: e.to_string(),
    })
}

/// Serialize a document to XML text, declaration included.
pub fn write_document<T>(document: &T) -> Result<String, DealerError>
where
    T: Serialize + XmlDocument,
{
    let mut buffer = String::with_capacity(256);
    buffer.push_str(XML_DECLARATION);
    buffer.push('\n');

    let mut serializer = Serializer::with_root(&mut buffer, Some(T::ROOT)).map_err(|e| {
        DealerError::Serialization(format!("Invalid root element <{}>: {}", T::ROOT, e))
    })?;
    serializer.indent(' ', 2);

    document.serialize(serializer).map_err(|e| {
        DealerError::Serialization(format!("Failed to serialize <{}> document: {}", T::ROOT, e))
    })?;

    Ok(buffer)
}

/// Name of the first element in the document, if there is one.
fn root_element(xml: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(String::from_utf8_lossy(e.name().as_ref()).into_owned()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
