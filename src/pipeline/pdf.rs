/// Source of raw document text. The pipeline only needs "bytes in, text
/// out"; anything that yields page text can stand in for a PDF in tests.
pub trait TextSource {
    /// Extract the full text of a document, pages concatenated in order.
    /// A document with no extractable text at all yields an empty string;
    /// the extraction adapter reports that as `EmptyDocument`.
    fn extract_text(&self, bytes: &[u8]) -> String;
}

/// Text extractor for digital PDFs with embedded text layers.
/// Scanned/image-only PDFs yield no text and degrade to an empty document.
pub struct PdfTextExtractor;

impl TextSource for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> String {
        match pdf_extract::extract_text_from_mem_by_pages(bytes) {
            Ok(pages) => pages.join("\n"),
            Err(e) => {
                tracing::warn!(error = %e, "PDF text extraction failed, treating document as empty");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a valid PDF with text using lopdf (the library that
    /// pdf-extract uses internally).
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(content_stream);

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(page) = doc.get_object_mut(page_id) {
            if let Object::Dictionary(ref mut dict) = page {
                dict.set("Parent", pages_id);
            }
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });

        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extract_text_from_digital_pdf() {
        let extractor = PdfTextExtractor;
        let pdf_bytes = make_test_pdf("Local Land Charges Register Search");
        let text = extractor.extract_text(&pdf_bytes);
        assert!(
            text.contains("Local") || text.contains("Search"),
            "expected extracted text, got: {text}"
        );
    }

    #[test]
    fn invalid_pdf_yields_empty_text() {
        let extractor = PdfTextExtractor;
        assert_eq!(extractor.extract_text(b"not a pdf"), "");
    }

    #[test]
    fn empty_input_yields_empty_text() {
        let extractor = PdfTextExtractor;
        assert_eq!(extractor.extract_text(b""), "");
    }
}
