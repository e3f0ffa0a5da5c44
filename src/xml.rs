//! Structured XML document building.
//!
//! A thin wrapper over the `quick-xml` event writer. Element ordering is
//! whatever the caller writes; text escaping happens centrally here so
//! free-text fields (names, remittance info) can never break the
//! document.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

use crate::error::{Error, Result};

/// Incremental builder for one XML document.
pub struct XmlBuilder {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlBuilder {
    /// Create a builder producing 4-space-indented output.
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4),
        }
    }

    /// Write the `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    pub fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    /// Open a container element.
    pub fn open(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(tag)))?;
        Ok(())
    }

    /// Open a container element carrying attributes.
    pub fn open_with_attrs(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(tag);
        for &(key, value) in attrs {
            start.push_attribute((key, value));
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    /// Close a container element.
    pub fn close(&mut self, tag: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Write a leaf element with escaped text content.
    pub fn leaf(&mut self, tag: &str, text: &str) -> Result<()> {
        self.open(tag)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(tag)
    }

    /// Write a leaf element with attributes and escaped text content.
    pub fn leaf_with_attrs(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.open_with_attrs(tag, attrs)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(tag)
    }

    /// Finish the document and return it as a string.
    pub fn finish(self) -> Result<String> {
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| Error::XmlError(e.to_string()))
    }
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_escapes_special_characters() {
        let mut builder = XmlBuilder::new();
        builder.open("Doc").unwrap();
        builder.leaf("Ustrd", "Fish & Chips <Ltd> \"quoted\"").unwrap();
        builder.close("Doc").unwrap();
        let xml = builder.finish().unwrap();
        assert!(xml.contains("Fish &amp; Chips &lt;Ltd&gt;"));
        assert!(!xml.contains("<Ltd>"));
    }

    #[test]
    fn test_attributes_are_rendered() {
        let mut builder = XmlBuilder::new();
        builder
            .leaf_with_attrs("InstdAmt", &[("Ccy", "USD")], "100.00")
            .unwrap();
        let xml = builder.finish().unwrap();
        assert!(xml.contains("<InstdAmt Ccy=\"USD\">100.00</InstdAmt>"));
    }

    #[test]
    fn test_declaration_comes_first() {
        let mut builder = XmlBuilder::new();
        builder.declaration().unwrap();
        builder.open("Doc").unwrap();
        builder.close("Doc").unwrap();
        let xml = builder.finish().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    }
}
