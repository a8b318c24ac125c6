//! Generic XML decoding
//!
//! Carte answers every request with a small XML document. Rather than binding
//! each answer to a fixed schema, bodies are decoded into an ordered element
//! tree that keeps every element and attribute the server sent.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding an XML body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// The body held no element at all
    #[error("empty XML document")]
    Empty,

    /// The tokenizer rejected the input
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// Non-whitespace text outside the root element
    #[error("unexpected text outside the root element: {0}")]
    StrayText(String),

    /// A second top-level element followed the root
    #[error("multiple root elements: <{0}> follows the root")]
    MultipleRoots(String),

    /// The input ended before an element was closed
    #[error("unclosed element <{0}>")]
    Unclosed(String),
}

/// A decoded XML element
///
/// Children and attributes keep document order. Text and CDATA content
/// directly inside the element is concatenated into `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    /// Creates an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Descends through `/`-separated child names, e.g. `result/log_channel_id`
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// Converts the element body into a JSON value
    ///
    /// Leaf elements become strings (or null when empty). Anything with
    /// attributes or children becomes an object: attributes are keyed `@name`,
    /// repeated children collapse into arrays and text sits under `#text`.
    pub fn to_json(&self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return match &self.text {
                Some(text) => Value::String(text.clone()),
                None => Value::Null,
            };
        }

        let mut map = Map::new();
        for (key, value) in &self.attributes {
            map.insert(format!("@{}", key), Value::String(value.clone()));
        }

        for child in &self.children {
            let value = child.to_json();
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }

        if let Some(text) = &self.text {
            map.insert("#text".to_string(), Value::String(text.clone()));
        }

        Value::Object(map)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, String> {
        let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));

        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            element.attributes.push((key, value.into_owned()));
        }

        Ok(element)
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }
}

/// Decodes a complete XML document into its root element
pub fn parse(input: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let malformed = |message: String| XmlError::Malformed { position, message };

        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = XmlElement::from_start(&e).map_err(malformed)?;
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::MultipleRoots(element.name));
                }
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = XmlElement::from_start(&e).map_err(malformed)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(e)) => {
                let element = stack.pop().ok_or_else(|| {
                    malformed(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| malformed(e.to_string()))?;
                add_text(&mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                add_text(&mut stack, &text)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(e.to_string())),
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    root.ok_or(XmlError::Empty)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(XmlError::MultipleRoots(element.name)),
        None => *root = Some(element),
    }
    Ok(())
}

fn add_text(stack: &mut [XmlElement], text: &str) -> Result<(), XmlError> {
    if text.trim().is_empty() {
        return Ok(());
    }

    match stack.last_mut() {
        Some(current) => {
            current.push_text(text);
            Ok(())
        }
        None => Err(XmlError::StrayText(text.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_document() {
        let root = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <jobstatus>
              <jobname>load_sales</jobname>
              <result><nr_errors>0</nr_errors></result>
            </jobstatus>"#,
        )
        .unwrap();

        assert_eq!(root.name, "jobstatus");
        assert_eq!(root.child("jobname").and_then(|e| e.text()), Some("load_sales"));
        assert_eq!(root.find("result/nr_errors").and_then(|e| e.text()), Some("0"));
        assert!(root.find("result/missing").is_none());
    }

    #[test]
    fn test_parse_attributes_entities_and_cdata() {
        let root = parse(
            r#"<webresult kind="run"><message>a &amp; b</message><log><![CDATA[line <1>]]></log></webresult>"#,
        )
        .unwrap();

        assert_eq!(root.attribute("kind"), Some("run"));
        assert_eq!(root.child("message").and_then(|e| e.text()), Some("a & b"));
        assert_eq!(root.child("log").and_then(|e| e.text()), Some("line <1>"));
    }

    #[test]
    fn test_self_closing_element_has_no_text() {
        let root = parse("<transstatus><error_desc/></transstatus>").unwrap();
        let error_desc = root.child("error_desc").unwrap();
        assert_eq!(error_desc.text(), None);
        assert_eq!(root.to_json(), json!({ "error_desc": null }));
    }

    #[test]
    fn test_to_json_collapses_repeated_children() {
        let root = parse(
            r#"<transstatus id="7"><step>a</step><step>b</step><status_desc>Running</status_desc></transstatus>"#,
        )
        .unwrap();

        assert_eq!(
            root.to_json(),
            json!({
                "@id": "7",
                "step": ["a", "b"],
                "status_desc": "Running"
            })
        );
        assert_eq!(root.children_named("step").count(), 2);
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert_eq!(parse(""), Err(XmlError::Empty));
        assert_eq!(parse("   \n "), Err(XmlError::Empty));
    }

    #[test]
    fn test_unclosed_element_is_rejected() {
        assert_eq!(
            parse("<jobstatus><status>Running</status>"),
            Err(XmlError::Unclosed("jobstatus".to_string()))
        );
    }

    #[test]
    fn test_mismatched_tags_are_rejected() {
        assert!(matches!(
            parse("<a><b></a></b>"),
            Err(XmlError::Malformed { .. })
        ));
    }

    #[test]
    fn test_plain_text_body_is_rejected() {
        assert!(matches!(
            parse("Internal Server Error"),
            Err(XmlError::StrayText(_))
        ));
    }

    #[test]
    fn test_second_root_is_rejected() {
        assert_eq!(
            parse("<a/><b/>"),
            Err(XmlError::MultipleRoots("b".to_string()))
        );
    }
}
