//! Word-document (.docx) text extraction.
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml`.
//! Paragraph text is concatenated with newline separators.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::DocxUnreadable(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::DocxUnreadable(format!("missing document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::DocxUnreadable(e.to_string()))?;

    paragraphs_from_xml(&xml)
}

/// Walks the document XML collecting `w:t` runs, one line per `w:p` paragraph.
fn paragraphs_from_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"t" => in_text_run = false,
            Ok(Event::Text(t)) if in_text_run => {
                let run = t
                    .unescape()
                    .map_err(|e| ExtractError::DocxUnreadable(e.to_string()))?;
                current.push_str(&run);
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::DocxUnreadable(e.to_string())),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn docx_with_body(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", FileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    const TWO_PARAGRAPHS: &str = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Senior Rust Engineer</w:t></w:r></w:p>
    <w:p><w:r><w:t>5 years of </w:t></w:r><w:r><w:t>systems experience</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_paragraphs_join_with_newlines() {
        let bytes = docx_with_body(TWO_PARAGRAPHS);
        let text = extract_text(&bytes).unwrap();
        assert_eq!(
            text,
            "Senior Rust Engineer\n5 years of systems experience"
        );
    }

    #[test]
    fn test_runs_within_a_paragraph_concatenate_without_separator() {
        let bytes = docx_with_body(TWO_PARAGRAPHS);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("5 years of systems experience"));
    }

    #[test]
    fn test_not_a_zip_is_a_typed_error() {
        let err = extract_text(b"plain text, not a zip").unwrap_err();
        assert!(matches!(err, ExtractError::DocxUnreadable(_)));
    }

    #[test]
    fn test_zip_without_document_body_is_a_typed_error() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("unrelated.txt", FileOptions::default())
                .unwrap();
            writer.write_all(b"hello").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_text(&buf.into_inner()).unwrap_err();
        assert!(matches!(err, ExtractError::DocxUnreadable(_)));
    }
}
