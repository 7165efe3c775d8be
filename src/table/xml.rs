use crate::errors::{AppError, AppResult};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use std::fmt::Display;
use std::io::Cursor;

/// Anything that serializes itself as an element of an Open Data Table.
pub trait ToXml {
    fn write_xml(&self, writer: &mut XmlWriter) -> AppResult<()>;
}

/// Tab-indented XML writer over an in-memory buffer.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::with_capacity(4 * 1024)), b'\t', 1),
        }
    }

    pub fn declaration(&mut self) -> AppResult<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    pub fn start(&mut self, name: &str, attributes: &[(&str, String)]) -> AppResult<()> {
        self.write(Event::Start(element(name, attributes)))
    }

    pub fn end(&mut self, name: &str) -> AppResult<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attributes: &[(&str, String)]) -> AppResult<()> {
        self.write(Event::Empty(element(name, attributes)))
    }

    /// `<name>text</name>`; only `&`, `<` and `>` are escaped so queries stay readable.
    pub fn text_element(&mut self, name: &str, text: &str) -> AppResult<()> {
        self.start(name, &[])?;
        self.write(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
        self.end(name)
    }

    /// `<name><![CDATA[body]]></name>`.
    ///
    /// A body containing `]]>` is split over consecutive CDATA sections.
    pub fn cdata_element(&mut self, name: &str, body: &str) -> AppResult<()> {
        self.start(name, &[])?;
        for section in cdata_sections(body) {
            self.write(Event::CData(BytesCData::new(section)))?;
        }
        self.end(name)
    }

    pub fn finish(self) -> AppResult<String> {
        let buffer = self.writer.into_inner().into_inner();
        String::from_utf8(buffer).map_err(|e| xml_error("convert XML to UTF-8", e))
    }

    fn write(&mut self, event: Event) -> AppResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| xml_error("write XML event", e))
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn element<'a>(name: &'a str, attributes: &'a [(&'a str, String)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for (key, value) in attributes {
        start.push_attribute((*key, value.as_str()));
    }
    start
}

fn cdata_sections(body: &str) -> Vec<String> {
    let parts: Vec<&str> = body.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut section = String::new();
            if i > 0 {
                section.push('>');
            }
            section.push_str(part);
            if i < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}

fn xml_error(action: &str, err: impl Display) -> AppError {
    AppError::XmlError(format!("Failed to {action}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdata_without_terminator_is_one_section() {
        assert_eq!(cdata_sections("var a = 1;"), vec!["var a = 1;"]);
    }

    #[test]
    fn cdata_terminator_is_split() {
        assert_eq!(
            cdata_sections("if (a[b[0]]>1) {}"),
            vec!["if (a[b[0]]", ">1) {}"]
        );
    }

    #[test]
    fn writes_nested_elements_with_tabs() {
        let mut w = XmlWriter::new();
        w.start("meta", &[]).unwrap();
        w.text_element("author", "josue & co").unwrap();
        w.empty("key", &[("id", "artist".to_string())]).unwrap();
        w.end("meta").unwrap();
        let xml = w.finish().unwrap();
        assert_eq!(
            xml,
            "<meta>\n\t<author>josue &amp; co</author>\n\t<key id=\"artist\"/>\n</meta>"
        );
    }

    #[test]
    fn text_keeps_quotes_readable() {
        let mut w = XmlWriter::new();
        w.text_element("sampleQuery", "SELECT * FROM t WHERE id='345' AND a<\"b\"")
            .unwrap();
        assert_eq!(
            w.finish().unwrap(),
            "<sampleQuery>SELECT * FROM t WHERE id='345' AND a&lt;\"b\"</sampleQuery>"
        );
    }

    #[test]
    fn writes_cdata_element() {
        let mut w = XmlWriter::new();
        w.cdata_element("execute", "response.object = <a/>;").unwrap();
        let xml = w.finish().unwrap();
        assert_eq!(
            xml,
            "<execute><![CDATA[response.object = <a/>;]]></execute>"
        );
    }
}
