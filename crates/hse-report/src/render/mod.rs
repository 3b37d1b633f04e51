//! Inspection report rendering
//!
//! Rendering happens in two steps:
//! - [`compose`] resolves language, sanitizes text and decides what goes in
//!   each section, producing a [`ReportContent`]
//! - painting lays that content out on A4 pages with lopdf
//!
//! The output carries no timestamps, so identical input renders to
//! identical bytes.

pub mod images;
pub mod layout;

use hse_types::{Language, RiskLevel, SiteField, SiteInfo};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::catalog::BoundResponse;
use crate::error::RenderError;
use crate::i18n::{risk_label, site_field_label, site_type_label, Phrase};
use crate::sanitize::{encode_pdf_text, encode_pdf_text_lossy, filename_component, normalize_punctuation};

pub use images::ImageAttachment;
use layout::{
    wrap, Font, Page, PageCursor, Rgb, BLACK, BODY_HEIGHT, CONTENT_WIDTH, GREY, MARGIN, PAGE_HEIGHT, PAGE_WIDTH,
};

pub const PDF_MIME_TYPE: &str = "application/pdf";

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 14.0;
const CELL_PADDING: f32 = 4.0;

/// Checklist table column widths: label, status, comment
const COLUMN_WIDTHS: [f32; 3] = [270.0, 50.0, CONTENT_WIDTH - 320.0];

/// A finished report document
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Canonical file name derived from location and job title
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One checklist table row, already localized and sanitized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRow {
    pub label: String,
    pub status: &'static str,
    pub comment: String,
}

/// A `No` answer listed in the summary. `comment` may be blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonCompliance {
    pub label: String,
    pub comment: String,
}

/// Everything printed in a report, before layout
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContent {
    pub language: Language,
    pub title: String,
    /// "Key: value" lines in site field order
    pub metadata: Vec<(SiteField, String)>,
    pub risk: RiskLevel,
    pub risk_line: String,
    pub rows: Vec<ChecklistRow>,
    pub non_compliances: Vec<NonCompliance>,
}

impl ReportContent {
    /// Line printed under the summary heading when nothing failed
    pub fn empty_summary_line(&self) -> Option<&'static str> {
        self.non_compliances
            .is_empty()
            .then(|| Phrase::NoNonCompliances.text(self.language))
    }
}

/// Canonical report file name for a site
pub fn report_filename(site: &SiteInfo) -> String {
    format!(
        "HSE_Report_{}_{}.pdf",
        filename_component(&site.location),
        filename_component(&site.job_title)
    )
}

/// Decide the report text. Fails when the site metadata is incomplete.
pub fn compose(
    site: &SiteInfo,
    responses: &[BoundResponse<'_>],
    risk: RiskLevel,
    language: Language,
) -> Result<ReportContent, RenderError> {
    site.validate()?;

    let metadata = site
        .fields()
        .map(|(field, value)| {
            let value = match field {
                SiteField::SiteType => site_type_label(value, language),
                _ => value,
            };
            let line = format!(
                "{}: {}",
                site_field_label(field, language),
                normalize_punctuation(value.trim())
            );
            (field, line)
        })
        .collect();

    let rows = responses
        .iter()
        .map(|bound| ChecklistRow {
            label: normalize_punctuation(bound.label(language)),
            status: bound.response.status.token(),
            comment: normalize_punctuation(bound.response.comment.trim()),
        })
        .collect();

    let non_compliances = responses
        .iter()
        .filter(|bound| bound.response.status.is_non_compliance())
        .map(|bound| NonCompliance {
            label: normalize_punctuation(bound.label(language)),
            comment: normalize_punctuation(bound.response.comment.trim()),
        })
        .collect();

    Ok(ReportContent {
        language,
        title: Phrase::Title.text(language).to_string(),
        metadata,
        risk,
        risk_line: format!(
            "{}: {}",
            Phrase::Risk.text(language),
            risk_label(risk, language)
        ),
        rows,
        non_compliances,
    })
}

/// Render a complete report.
///
/// Images that cannot be decoded are left out of the appendix.
pub fn render(
    site: &SiteInfo,
    responses: &[BoundResponse<'_>],
    risk: RiskLevel,
    language: Language,
    images: &[ImageAttachment],
) -> Result<RenderedReport, RenderError> {
    let content = compose(site, responses, risk, language)?;
    let bytes = paint(&content, images)?;
    let filename = report_filename(site);
    debug!("Rendered {} ({} bytes)", filename, bytes.len());
    Ok(RenderedReport { filename, bytes })
}

fn risk_color(risk: RiskLevel) -> Rgb {
    match risk {
        RiskLevel::Green => (0.2, 0.7, 0.3),
        RiskLevel::Yellow => (0.95, 0.8, 0.1),
        RiskLevel::Red => (0.85, 0.15, 0.15),
    }
}

/// Lay out the content and serialize it to PDF bytes
pub fn paint(content: &ReportContent, attachments: &[ImageAttachment]) -> Result<Vec<u8>, RenderError> {
    let language = content.language;
    let mut doc = Document::with_version("1.5");
    let mut cursor = PageCursor::new();

    // Title
    cursor.text(MARGIN, Font::Bold, TITLE_SIZE, &encode_pdf_text(&content.title, "title")?);
    cursor.advance(TITLE_SIZE + 10.0);

    // Metadata block
    for (field, line) in &content.metadata {
        for wrapped in wrap(&encode_pdf_text(line, field.name())?, Font::Regular, BODY_SIZE, CONTENT_WIDTH) {
            cursor.ensure_space(LEADING);
            cursor.text(MARGIN, Font::Regular, BODY_SIZE, &wrapped);
            cursor.advance(LEADING);
        }
    }
    cursor.advance(6.0);

    // Risk line with a colored marker
    let risk_line = encode_pdf_text(&content.risk_line, "risk level")?;
    cursor.ensure_space(LEADING + 12.0);
    cursor.fill_rect(MARGIN, cursor.y() - 2.0, 10.0, 10.0, risk_color(content.risk));
    cursor.text(MARGIN + 16.0, Font::Bold, HEADING_SIZE, &risk_line);
    cursor.advance(LEADING + 12.0);

    paint_checklist(&mut cursor, content)?;
    paint_summary(&mut cursor, content)?;

    // Image appendix, one page per decodable image
    let caption = Phrase::Evidence.text(language);
    let mut image_index = 0;
    for attachment in attachments {
        let Some(image) = images::load(attachment) else {
            continue;
        };
        image_index += 1;
        let (width, height) = (image.width as f32, image.height as f32);
        let image_id = doc.add_object(Object::Stream(image.stream));

        cursor.new_page();
        let mut title = encode_pdf_text_lossy(caption);
        title.extend_from_slice(format!(" {}: ", image_index).as_bytes());
        title.extend_from_slice(&encode_pdf_text_lossy(&attachment.name));
        cursor.text(MARGIN, Font::Bold, HEADING_SIZE, &title);
        cursor.advance(HEADING_SIZE + 10.0);

        let max_height = cursor.remaining();
        let scale = (CONTENT_WIDTH / width).min(max_height / height).min(1.0);
        let (w, h) = (width * scale, height * scale);
        let bottom = cursor.y() - h;
        cursor.image(format!("Im{}", image_index), image_id, MARGIN, bottom, w, h);
    }

    let pages = cursor.finish(&encode_pdf_text_lossy(Phrase::Page.text(language)));
    assemble(&mut doc, pages, &content.title)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn paint_table_header(cursor: &mut PageCursor, language: Language) -> Result<(), RenderError> {
    let headers = [Phrase::Item, Phrase::Status, Phrase::Comment];
    let height = LEADING + CELL_PADDING;
    cursor.fill_rect(MARGIN, cursor.y() - height + LEADING - 2.0, CONTENT_WIDTH, height, GREY);
    let mut x = MARGIN + CELL_PADDING;
    for (phrase, width) in headers.iter().zip(COLUMN_WIDTHS) {
        let text = encode_pdf_text(phrase.text(language), "table header")?;
        cursor.text(x, Font::Bold, BODY_SIZE, &text);
        x += width;
    }
    cursor.advance(height);
    Ok(())
}

fn paint_checklist(cursor: &mut PageCursor, content: &ReportContent) -> Result<(), RenderError> {
    let language = content.language;
    cursor.ensure_space(HEADING_SIZE + 3.0 * LEADING);
    cursor.text(
        MARGIN,
        Font::Bold,
        HEADING_SIZE,
        &encode_pdf_text(Phrase::Checklist.text(language), "heading")?,
    );
    cursor.advance(LEADING + 4.0);
    paint_table_header(cursor, language)?;

    for row in &content.rows {
        let cells = [
            wrap(
                &encode_pdf_text(&row.label, "checklist item")?,
                Font::Regular,
                BODY_SIZE,
                COLUMN_WIDTHS[0] - 2.0 * CELL_PADDING,
            ),
            vec![row.status.as_bytes().to_vec()],
            wrap(
                &encode_pdf_text(&row.comment, &format!("comment on '{}'", row.label))?,
                Font::Regular,
                BODY_SIZE,
                COLUMN_WIDTHS[2] - 2.0 * CELL_PADDING,
            ),
        ];
        let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
        let row_height = line_count as f32 * LEADING + CELL_PADDING;

        // Rows that fit on one page are kept together
        if row_height <= BODY_HEIGHT && cursor.ensure_space(row_height) {
            paint_table_header(cursor, language)?;
        }

        for i in 0..line_count {
            if cursor.ensure_space(LEADING) {
                paint_table_header(cursor, language)?;
            }
            let mut x = MARGIN + CELL_PADDING;
            for (lines, width) in cells.iter().zip(COLUMN_WIDTHS) {
                if let Some(line) = lines.get(i) {
                    cursor.text(x, Font::Regular, BODY_SIZE, line);
                }
                x += width;
            }
            cursor.advance(LEADING);
        }
        cursor.advance(CELL_PADDING);
        cursor.rule(MARGIN, CONTENT_WIDTH, BLACK);
        cursor.advance(LEADING - CELL_PADDING);
    }
    cursor.advance(LEADING);
    Ok(())
}

fn paint_summary(cursor: &mut PageCursor, content: &ReportContent) -> Result<(), RenderError> {
    let language = content.language;
    cursor.ensure_space(HEADING_SIZE + 2.0 * LEADING);
    cursor.text(
        MARGIN,
        Font::Bold,
        HEADING_SIZE,
        &encode_pdf_text(Phrase::NonCompliances.text(language), "heading")?,
    );
    cursor.advance(LEADING + 4.0);

    if let Some(line) = content.empty_summary_line() {
        cursor.text(MARGIN, Font::Regular, BODY_SIZE, &encode_pdf_text(line, "summary")?);
        cursor.advance(LEADING);
        return Ok(());
    }

    for entry in &content.non_compliances {
        // Blank comments still produce an entry
        let bullet = format!("- {}: {}", entry.label, entry.comment);
        let encoded = encode_pdf_text(bullet.trim_end(), "non-compliance")?;
        let lines = wrap(&encoded, Font::Regular, BODY_SIZE, CONTENT_WIDTH - 10.0);
        let height = lines.len() as f32 * LEADING;
        if height <= BODY_HEIGHT {
            cursor.ensure_space(height);
        }
        for (i, line) in lines.iter().enumerate() {
            cursor.ensure_space(LEADING);
            let indent = if i == 0 { 0.0 } else { 10.0 };
            cursor.text(MARGIN + indent, Font::Regular, BODY_SIZE, line);
            cursor.advance(LEADING);
        }
    }
    Ok(())
}

fn font_dictionary() -> Dictionary {
    let mut fonts = Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"Font".to_vec()));
        dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        dict.set("BaseFont", Object::Name(font.base_font().to_vec()));
        dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        fonts.set(font.resource_name(), Object::Dictionary(dict));
    }
    fonts
}

/// Build the page tree, catalog and info dictionary
fn assemble(doc: &mut Document, pages: Vec<Page>, title: &str) -> Result<(), RenderError> {
    let pages_id = doc.new_object_id();
    let fonts_id = doc.add_object(Object::Dictionary(font_dictionary()));

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let encoded = Content {
            operations: page.operations,
        }
        .encode()
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Object::Stream(Stream::new(Dictionary::new(), encoded)));

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Reference(fonts_id));
        if !page.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, id) in &page.images {
                xobjects.set(name.as_bytes(), Object::Reference(*id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ]),
        );
        let page_id: ObjectId = doc.add_object(Object::Dictionary(page_dict));
        kids.push(Object::Reference(page_id));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(kids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));

    let mut info = Dictionary::new();
    info.set(
        "Title",
        Object::String(encode_pdf_text_lossy(title), StringFormat::Literal),
    );
    info.set(
        "Producer",
        Object::String(b"hse-report".to_vec(), StringFormat::Literal),
    );
    let info_id = doc.add_object(Object::Dictionary(info));

    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::images::tests::{tiny_jpeg_header, tiny_png};
    use super::*;
    use crate::catalog::Catalog;
    use hse_types::{ChecklistResponse, ResponseStatus};
    use pretty_assertions::assert_eq;

    const WIRELINE: &str = "Wireline Operation";

    fn site() -> SiteInfo {
        SiteInfo {
            job_title: "Wireline Operation".to_string(),
            site_type: "Onshore".to_string(),
            location: "Pad 4".to_string(),
            date: "2024-05-01".to_string(),
            auditor: "Jane Doe".to_string(),
        }
    }

    fn answers(catalog: &Catalog, no_count: usize) -> Vec<ChecklistResponse> {
        catalog
            .job_type(WIRELINE)
            .unwrap()
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let status = if i < no_count {
                    ResponseStatus::No
                } else {
                    ResponseStatus::Yes
                };
                ChecklistResponse::new(item.key.clone(), status, "")
            })
            .collect()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_filename_uses_location_and_job() {
        let name = report_filename(&site());
        assert_eq!(name, "HSE_Report_Pad_4_Wireline_Operation.pdf");
    }

    #[test]
    fn test_compose_metadata_in_field_order() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 0);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let content = compose(&site(), &bound, RiskLevel::Green, Language::En).unwrap();

        let lines: Vec<&str> = content.metadata.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "HSE Job Responsibility: Wireline Operation",
                "Site Type: Onshore",
                "Site Location: Pad 4",
                "Inspection Date: 2024-05-01",
                "Auditor Name: Jane Doe",
            ]
        );
        assert_eq!(content.risk_line, "Risk Level: Green");
        assert_eq!(content.rows.len(), 8);
        assert_eq!(
            content.empty_summary_line(),
            Some("No non-compliances recorded.")
        );
    }

    #[test]
    fn test_compose_french() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 1);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let content = compose(&site(), &bound, RiskLevel::Yellow, Language::Fr).unwrap();

        assert_eq!(content.title, "Rapport de diagnostic HSE");
        assert_eq!(content.metadata[1].1, "Type de site: Terrestre");
        assert_eq!(content.risk_line, "Niveau de risque: Jaune");
        assert_eq!(
            content.rows[0].label,
            "Réunion de sécurité avant le travail (Briefing)"
        );
        assert_eq!(content.empty_summary_line(), None);
    }

    #[test]
    fn test_blank_comments_still_listed() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 3);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let content = compose(&site(), &bound, RiskLevel::Red, Language::En).unwrap();

        assert_eq!(content.non_compliances.len(), 3);
        assert!(content.non_compliances.iter().all(|n| n.comment.is_empty()));
        assert_eq!(content.rows.iter().filter(|r| r.status == "No").count(), 3);
    }

    #[test]
    fn test_metadata_punctuation_is_normalized() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 0);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let mut s = site();
        s.location = "Pad 4 \u{2013} O\u{2019}Neil yard".to_string();
        let content = compose(&s, &bound, RiskLevel::Green, Language::En).unwrap();
        assert_eq!(content.metadata[2].1, "Site Location: Pad 4 - O'Neil yard");
    }

    #[test]
    fn test_render_rejects_incomplete_site() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 0);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let mut s = site();
        s.date = "May 1st".to_string();
        let err = render(&s, &bound, RiskLevel::Green, Language::En, &[]).unwrap_err();
        assert!(matches!(err, RenderError::Invalid(_)));
    }

    #[test]
    fn test_render_rejects_unencodable_comment() {
        let catalog = Catalog::builtin().unwrap();
        let mut responses = answers(&catalog, 1);
        responses[0].comment = "Guard rail \u{2714} missing".to_string();
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let err = render(&site(), &bound, RiskLevel::Yellow, Language::En, &[]).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedCharacter { ch: '\u{2714}', .. }));
    }

    #[test]
    fn test_render_produces_loadable_pdf() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 0);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let report = render(&site(), &bound, RiskLevel::Green, Language::En, &[]).unwrap();

        assert!(report.bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&report.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(contains(&report.bytes, b"(Site Location: Pad 4) Tj"));
        assert!(contains(&report.bytes, b"(No non-compliances recorded.) Tj"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 2);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let images = [ImageAttachment::new("pad.png", tiny_png(8, 8))];

        let first = render(&site(), &bound, RiskLevel::Yellow, Language::Fr, &images).unwrap();
        let second = render(&site(), &bound, RiskLevel::Yellow, Language::Fr, &images).unwrap();
        assert_eq!(first.filename, second.filename);
        assert!(first.bytes == second.bytes, "rendering must be byte-identical");
    }

    #[test]
    fn test_each_decodable_image_gets_a_page() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 0);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let images = [
            ImageAttachment::new("a.png", tiny_png(20, 10)),
            ImageAttachment::new("missing.jpg", Vec::new()),
            ImageAttachment::new("b.jpg", tiny_jpeg_header(64, 48)),
            ImageAttachment::new("c.png", b"not an image".to_vec()),
        ];
        let report = render(&site(), &bound, RiskLevel::Green, Language::En, &images).unwrap();

        let doc = Document::load_mem(&report.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert!(contains(&report.bytes, b"(Evidence image 1: a.png) Tj"));
        assert!(contains(&report.bytes, b"(Evidence image 2: b.jpg) Tj"));
    }

    fn number(object: &Object) -> f32 {
        match object {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            other => panic!("expected a number, got {:?}", other),
        }
    }

    /// Every text run per page as (font size, baseline y, text)
    fn text_runs(bytes: &[u8]) -> Vec<Vec<(f32, f32, Vec<u8>)>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                let (mut size, mut y) = (0.0, 0.0);
                let mut runs = Vec::new();
                for op in content.operations {
                    match op.operator.as_str() {
                        "Tf" => size = number(&op.operands[1]),
                        "Td" => y = number(&op.operands[1]),
                        "Tj" => runs.push((size, y, op.operands[0].as_str().unwrap().to_vec())),
                        _ => {}
                    }
                }
                runs
            })
            .collect()
    }

    /// Body text (everything but the small footer) stays above the bottom margin
    fn assert_body_text_on_page(pages: &[Vec<(f32, f32, Vec<u8>)>]) {
        for (index, runs) in pages.iter().enumerate() {
            for (size, y, text) in runs {
                if *size < BODY_SIZE {
                    continue;
                }
                assert!(
                    *y >= MARGIN && *y <= PAGE_HEIGHT - MARGIN,
                    "page {}: {:?} drawn at y={}",
                    index + 1,
                    String::from_utf8_lossy(text),
                    y
                );
            }
        }
    }

    fn count_words(pages: &[Vec<(f32, f32, Vec<u8>)>], word: &[u8]) -> usize {
        pages
            .iter()
            .flatten()
            .map(|(_, _, text)| text.windows(word.len()).filter(|w| *w == word).count())
            .sum()
    }

    #[test]
    fn test_long_comment_continues_across_pages() {
        let catalog = Catalog::builtin().unwrap();
        let mut responses = answers(&catalog, 1);
        responses[0].comment = "Observed during the walkdown and escalated. ".repeat(120);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let report = render(&site(), &bound, RiskLevel::Yellow, Language::En, &[]).unwrap();

        let pages = text_runs(&report.bytes);
        assert!(pages.len() >= 2);
        assert_body_text_on_page(&pages);

        // Once in the table and once in the summary, nothing dropped
        assert_eq!(count_words(&pages, b"escalated."), 240);

        // The table header is repeated on the page the row continues on
        let headers_on = |page: &Vec<(f32, f32, Vec<u8>)>| page.iter().filter(|(_, _, t)| t == b"Item").count();
        assert_eq!(headers_on(&pages[0]), 1);
        assert_eq!(headers_on(&pages[1]), 1);
    }

    #[test]
    fn test_many_long_comments_stay_on_the_page() {
        let catalog = Catalog::builtin().unwrap();
        let mut responses = answers(&catalog, 8);
        for r in responses.iter_mut() {
            r.comment = "Observed during the walkdown and escalated to the site supervisor. ".repeat(6);
        }
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let report = render(&site(), &bound, RiskLevel::Red, Language::En, &[]).unwrap();

        let pages = text_runs(&report.bytes);
        assert!(pages.len() >= 2);
        assert_body_text_on_page(&pages);
        assert_eq!(count_words(&pages, b"supervisor."), 8 * 6 * 2);
    }

    #[test]
    fn test_long_metadata_value_stays_on_the_page() {
        let catalog = Catalog::builtin().unwrap();
        let responses = answers(&catalog, 0);
        let bound = catalog.bind_responses(WIRELINE, &responses).unwrap();
        let mut s = site();
        s.location = "North yard gate ".repeat(300);
        let report = render(&s, &bound, RiskLevel::Green, Language::En, &[]).unwrap();

        let pages = text_runs(&report.bytes);
        assert!(pages.len() >= 2);
        assert_body_text_on_page(&pages);
        assert_eq!(count_words(&pages, b"gate"), 300);
    }
}
