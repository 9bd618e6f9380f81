#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Writes a minimal `.docx` whose body holds one paragraph per entry
pub fn write_docx(path: &Path, paragraphs: &[&str]) -> std::io::Result<()> {
    let mut body = String::new();
    for text in paragraphs {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape(text));
        body.push_str("</w:t></w:r></w:p>");
    }
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}<w:sectPr/></w:body></w:document>",
        body
    );

    let mut zip = zip::ZipWriter::new(File::create(path)?);
    zip.start_file("[Content_Types].xml", SimpleFileOptions::default())?;
    zip.write_all(
        b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
          <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>",
    )?;
    zip.start_file("word/document.xml", SimpleFileOptions::default())?;
    zip.write_all(document.as_bytes())?;
    zip.finish()?;
    Ok(())
}

/// Writes bytes that are not a zip archive under a document name
pub fn write_corrupt(path: &Path) -> std::io::Result<()> {
    std::fs::write(path, b"PK\x03\x04 truncated garbage")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
