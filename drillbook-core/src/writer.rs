use crate::document::RenderedDocument;
use crate::error::Result;
use crate::graphics::GraphicsContext;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::page::{Page, PageElement};
use crate::text::{encode_win_ansi, FontFamily};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Write;

const CATALOG_ID: u32 = 1;
const PAGES_ID: u32 = 2;
const FIRST_FONT_ID: u32 = 3;

/// Serializes laid-out pages into a PDF 1.7 file.
///
/// Object numbers are assigned in a fixed order (catalog, page tree, fonts,
/// then a page/content pair per page, info last), so the same pages always
/// produce the same bytes.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: BTreeMap<ObjectId, u64>,
    current_position: u64,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_positions: BTreeMap::new(),
            current_position: 0,
        }
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.current_position
    }

    pub fn write_document(&mut self, document: &RenderedDocument) -> Result<()> {
        self.write_header()?;

        let catalog_id = self.write_catalog()?;
        let font_ids = self.write_fonts()?;
        self.write_pages(document.pages(), &font_ids)?;
        let info_id = self.write_info(document)?;

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(catalog_id, info_id, xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.7\n")?;
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_catalog(&mut self) -> Result<ObjectId> {
        let catalog_id = ObjectId::new(CATALOG_ID, 0);

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::name("Catalog"));
        catalog.set("Pages", ObjectId::new(PAGES_ID, 0));

        self.write_object(catalog_id, &Object::Dictionary(catalog))?;
        Ok(catalog_id)
    }

    /// Standard Type1 fonts shared by every page.
    fn write_fonts(&mut self) -> Result<Vec<(FontFamily, ObjectId)>> {
        let mut ids = Vec::new();
        for (offset, family) in FontFamily::ALL.iter().enumerate() {
            let id = ObjectId::new(FIRST_FONT_ID + offset as u32, 0);

            let mut font = Dictionary::new();
            font.set("Type", Object::name("Font"));
            font.set("Subtype", Object::name("Type1"));
            font.set("BaseFont", Object::name(family.pdf_name()));
            font.set("Encoding", Object::name("WinAnsiEncoding"));

            self.write_object(id, &Object::Dictionary(font))?;
            ids.push((*family, id));
        }
        Ok(ids)
    }

    fn write_pages(&mut self, pages: &[Page], font_ids: &[(FontFamily, ObjectId)]) -> Result<()> {
        let pages_id = ObjectId::new(PAGES_ID, 0);
        let first_page_id = FIRST_FONT_ID + FontFamily::ALL.len() as u32;
        let page_id = |index: usize| ObjectId::new(first_page_id + index as u32 * 2, 0);

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::name("Pages"));
        pages_dict.set("Count", pages.len());
        pages_dict.set(
            "Kids",
            (0..pages.len())
                .map(|index| Object::Reference(page_id(index)))
                .collect::<Vec<_>>(),
        );
        self.write_object(pages_id, &Object::Dictionary(pages_dict))?;

        let mut fonts = Dictionary::new();
        for (family, id) in font_ids {
            fonts.set(family.resource_name(), *id);
        }
        let mut resources = Dictionary::new();
        resources.set("Font", fonts);

        for (index, page) in pages.iter().enumerate() {
            let id = page_id(index);
            let content_id = ObjectId::new(id.number() + 1, 0);

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::name("Page"));
            page_dict.set("Parent", pages_id);
            page_dict.set(
                "MediaBox",
                vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width()),
                    Object::Real(page.height()),
                ],
            );
            page_dict.set("Contents", content_id);
            page_dict.set("Resources", resources.clone());
            self.write_object(id, &Object::Dictionary(page_dict))?;

            self.write_page_content(content_id, page)?;
        }

        Ok(())
    }

    fn write_page_content(&mut self, content_id: ObjectId, page: &Page) -> Result<()> {
        #[allow(unused_mut)]
        let mut stream = Stream::new(page_content(page));

        #[cfg(feature = "compression")]
        stream.compress_flate()?;

        self.write_stream(content_id, &stream)
    }

    fn write_info(&mut self, document: &RenderedDocument) -> Result<ObjectId> {
        let info_id = ObjectId::new(self.next_object_number(), 0);
        let metadata = document.metadata();
        let mut info_dict = Dictionary::new();

        if let Some(ref title) = metadata.title {
            info_dict.set("Title", title.as_str());
        }
        if let Some(ref author) = metadata.author {
            info_dict.set("Author", author.as_str());
        }
        if let Some(ref subject) = metadata.subject {
            info_dict.set("Subject", subject.as_str());
        }
        if let Some(ref creator) = metadata.creator {
            info_dict.set("Creator", creator.as_str());
        }
        if let Some(ref producer) = metadata.producer {
            info_dict.set("Producer", producer.as_str());
        }
        if let Some(creation_date) = metadata.creation_date {
            info_dict.set("CreationDate", format_pdf_date(creation_date));
        }

        self.write_object(info_id, &Object::Dictionary(info_dict))?;
        Ok(info_id)
    }

    fn next_object_number(&self) -> u32 {
        self.xref_positions
            .keys()
            .next_back()
            .map_or(1, |id| id.number() + 1)
    }

    fn write_object(&mut self, id: ObjectId, object: &Object) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;
        self.write_object_value(object)?;
        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_stream(&mut self, id: ObjectId, stream: &Stream) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;
        self.write_object_value(&Object::Dictionary(stream.dictionary().clone()))?;
        self.write_bytes(b"\nstream\n")?;
        self.write_bytes(stream.data())?;
        self.write_bytes(b"\nendstream\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(format_real(*f).as_bytes())?,
            Object::String(s) => {
                self.write_bytes(b"(")?;
                self.write_bytes(&escape_string(&encode_win_ansi(s)))?;
                self.write_bytes(b")")?;
            }
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => {
                self.write_bytes(b"<<")?;
                for (key, value) in dict.entries() {
                    self.write_bytes(b"\n/")?;
                    self.write_bytes(key.as_bytes())?;
                    self.write_bytes(b" ")?;
                    self.write_object_value(value)?;
                }
                self.write_bytes(b"\n>>")?;
            }
            Object::Reference(id) => {
                let ref_str = format!("{} {} R", id.number(), id.generation());
                self.write_bytes(ref_str.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_xref(&mut self) -> Result<()> {
        let max_obj_num = self.next_object_number() - 1;
        let entries: Vec<(u32, u64)> = self
            .xref_positions
            .iter()
            .map(|(id, position)| (id.number(), *position))
            .collect();

        self.write_bytes(b"xref\n")?;
        self.write_bytes(format!("0 {}\n", max_obj_num + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f \n")?;

        // Object numbers are dense, but fill any gap with a free entry.
        let mut expected = 1;
        for (number, position) in entries {
            while expected < number {
                self.write_bytes(b"0000000000 00000 f \n")?;
                expected += 1;
            }
            self.write_bytes(format!("{position:010} 00000 n \n").as_bytes())?;
            expected = number + 1;
        }

        Ok(())
    }

    fn write_trailer(
        &mut self,
        catalog_id: ObjectId,
        info_id: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        let mut trailer = Dictionary::new();
        trailer.set("Size", self.next_object_number() as i64);
        trailer.set("Root", catalog_id);
        trailer.set("Info", info_id);

        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer))?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

/// Builds the content stream for one page's display list.
pub fn page_content(page: &Page) -> Vec<u8> {
    let mut ctx = GraphicsContext::new();

    for element in page.elements() {
        match element {
            PageElement::Box {
                x,
                y,
                width,
                height,
                radius,
                fill,
                border,
                border_width,
                ..
            } => {
                ctx.save_state();
                ctx.set_fill_color(*fill);
                ctx.rounded_rect(*x, *y, *width, *height, *radius);
                if *border_width > 0.0 {
                    ctx.set_line_width(*border_width).set_stroke_color(*border);
                    ctx.fill_stroke();
                } else {
                    ctx.fill();
                }
                ctx.restore_state();
            }
            PageElement::Rule {
                x1,
                x2,
                y,
                color,
                width,
            } => {
                ctx.save_state();
                ctx.set_line_width(*width).set_stroke_color(*color);
                ctx.move_to(*x1, *y).line_to(*x2, *y).stroke();
                ctx.restore_state();
            }
            PageElement::Text {
                text, x, y, style, ..
            } => {
                ctx.show_text(
                    style.family.resource_name(),
                    style.size,
                    style.color,
                    *x,
                    *y,
                    &encode_win_ansi(text),
                );
            }
        }
    }

    ctx.finish()
}

fn format_real(value: f64) -> String {
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn escape_string(bytes: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        if matches!(byte, b'(' | b')' | b'\\') {
            escaped.push(b'\\');
        }
        escaped.push(byte);
    }
    escaped
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");

    // For UTC, the offset is always +00'00
    format!("{formatted}+00'00")
}
