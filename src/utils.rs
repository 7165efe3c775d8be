use crate::errors::{AppError, AppResult};
use crate::models::ResponseFormat;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

/// Pretty-prints a response body in the given format.
pub fn prettify(content: &str, format: ResponseFormat) -> AppResult<String> {
    match format {
        ResponseFormat::Json => pretty_json(content),
        ResponseFormat::Xml => pretty_xml(content),
    }
}

pub fn pretty_json(content: &str) -> AppResult<String> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Re-indents an XML document with tabs.
pub fn pretty_xml(content: &str) -> AppResult<String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    loop {
        match reader
            .read_event()
            .map_err(|e| AppError::XmlError(format!("Failed to read XML: {e}")))?
        {
            Event::Eof => break,
            event => writer
                .write_event(event)
                .map_err(|e| AppError::XmlError(format!("Failed to write XML: {e}")))?,
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| AppError::XmlError(format!("Failed to convert XML to UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_json_indents() {
        let pretty = pretty_json(r#"{"query":{"count":0}}"#).unwrap();
        assert_eq!(pretty, "{\n  \"query\": {\n    \"count\": 0\n  }\n}");
    }

    #[test]
    fn pretty_json_rejects_garbage() {
        assert!(pretty_json("<query/>").is_err());
    }

    #[test]
    fn pretty_xml_indents_with_tabs() {
        let pretty = pretty_xml("<query><results><place>Congo</place></results></query>").unwrap();
        assert_eq!(
            pretty,
            "<query>\n\t<results>\n\t\t<place>Congo</place>\n\t</results>\n</query>"
        );
    }

    #[test]
    fn prettify_dispatches_on_format() {
        assert!(prettify("{}", ResponseFormat::Json).is_ok());
        assert!(prettify("<a/>", ResponseFormat::Xml).is_ok());
        assert!(prettify("<a>", ResponseFormat::Json).is_err());
    }
}
