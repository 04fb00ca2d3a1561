//! Wire formatting for resource payloads.
//!
//! JSON and HTML responses carry the payload value directly — a JSON value
//! is its own wire encoding. XML responses are rendered into a document
//! string: a top-level array becomes a collection of `<record>` elements, a
//! top-level object a single record under `<root>`.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

/// The `application/json` content type.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The `text/html` content type.
pub const CONTENT_TYPE_HTML: &str = "text/html";

/// The `application/xml` content type.
pub const CONTENT_TYPE_XML: &str = "application/xml";

/// Produces the wire-ready value for a payload under the given content
/// type.
///
/// For `application/xml` this is a string holding the rendered document;
/// for everything else the payload itself is the wire value.
#[must_use]
pub fn wire_value(data: &Value, content_type: &str) -> Value {
    if content_type == CONTENT_TYPE_XML {
        Value::String(to_xml(data))
    } else {
        data.clone()
    }
}

/// Renders a payload as an XML document.
///
/// Arrays at the top level are treated as collections: each element is
/// written as a `<record>`. Objects are written as a single record with one
/// element per field; nested arrays repeat their field element.
///
/// # Example
///
/// ```rust
/// use restkit::format::to_xml;
/// use serde_json::json;
///
/// let xml = to_xml(&json!({"id": 5, "name": "x"}));
/// assert_eq!(xml, "<root><id>5</id><name>x</name></root>");
///
/// let xml = to_xml(&json!([{"id": 1}, {"id": 2}]));
/// assert_eq!(
///     xml,
///     "<root><record><id>1</id></record><record><id>2</id></record></root>",
/// );
/// ```
#[must_use]
pub fn to_xml(data: &Value) -> String {
    let mut writer = Writer::new(Vec::new());
    // writes into a Vec, which cannot fail
    write_document(&mut writer, data).expect("in-memory XML write failed");
    String::from_utf8(writer.into_inner()).expect("XML writer emitted invalid UTF-8")
}

type WriteResult = Result<(), Box<dyn std::error::Error>>;

fn write_document(writer: &mut Writer<Vec<u8>>, data: &Value) -> WriteResult {
    writer.write_event(Event::Start(BytesStart::new("root")))?;
    match data {
        Value::Array(items) => {
            for item in items {
                write_element(writer, "record", item)?;
            }
        }
        Value::Object(fields) => {
            for (name, value) in fields {
                write_element(writer, name, value)?;
            }
        }
        scalar => write_text(writer, scalar)?,
    }
    writer.write_event(Event::End(BytesEnd::new("root")))?;
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> WriteResult {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
        }
        Value::Object(fields) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (field, nested) in fields {
                write_element(writer, field, nested)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        scalar => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            write_text(writer, scalar)?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, value: &Value) -> WriteResult {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    Ok(())
}
