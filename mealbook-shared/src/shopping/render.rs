/// Shopping-list PDF renderer
///
/// Lays the aggregated rows out as a paginated three-column table on
/// 21cm × 29.7cm pages:
///
/// - columns 9cm / 4cm / 3.5cm (name / quantity / unit), 30pt rows,
///   body font size 12, name column left-aligned with 0.5cm padding;
/// - a repeating centered title on every page (size 16), drawn 108pt
///   below the top edge on the first page and 54pt below on later pages;
/// - a footer (size 9) at 1in × 0.75in reading `First Page / {info}` on
///   the first page and `Page {n} {info}` afterwards.
///
/// The style (title, footer info line, font face) is built once at server
/// startup and passed in by reference; the renderer registers no global
/// state. An empty row set renders a single page carrying one blank
/// placeholder row instead of failing.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

/// Fixed filename of the exported artifact
pub const ARTIFACT_FILENAME: &str = "shopping-list.pdf";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// 1 pt = 25.4/72 mm
const MM_PER_PT: f32 = 0.352_778;

const TITLE_FONT_SIZE: f32 = 16.0;
const BODY_FONT_SIZE: f32 = 12.0;
const FOOTER_FONT_SIZE: f32 = 9.0;

/// Title baseline: 108pt below the top edge on the first page, 54pt on
/// later pages.
const TITLE_Y_FIRST_MM: f32 = PAGE_HEIGHT_MM - 108.0 * MM_PER_PT;
const TITLE_Y_LATER_MM: f32 = PAGE_HEIGHT_MM - 54.0 * MM_PER_PT;

/// Footer anchor: 1in from the left, 0.75in from the bottom.
const FOOTER_X_MM: f32 = 25.4;
const FOOTER_Y_MM: f32 = 19.05;

/// The 16.5cm table is centered on the 21cm page.
const TABLE_LEFT_MM: f32 = (PAGE_WIDTH_MM - (COL_NAME_MM + COL_AMOUNT_MM + COL_UNIT_MM)) / 2.0;
const COL_NAME_MM: f32 = 90.0;
const COL_AMOUNT_MM: f32 = 40.0;
const COL_UNIT_MM: f32 = 35.0;
const CELL_PADDING_MM: f32 = 5.0;

/// 30pt rows; the first page leaves headroom under the lower title.
const ROW_HEIGHT_MM: f32 = 30.0 * MM_PER_PT;
const TABLE_TOP_FIRST_MM: f32 = 203.0;
const TABLE_TOP_LATER_MM: f32 = 250.0;
const TABLE_BOTTOM_MM: f32 = 30.0;

/// Error type for artifact construction failures
///
/// Fatal for the request: no partial document is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Font resource could not be registered
    #[error("Failed to register document font: {0}")]
    Font(String),

    /// Document assembly or serialization failed
    #[error("Failed to assemble document: {0}")]
    Build(String),
}

/// Document-wide style, constructed once at startup
///
/// Replaces the legacy process-global font registration: the style is
/// owned by the application state and passed by reference per request.
#[derive(Debug, Clone)]
pub struct DocumentStyle {
    /// Page title repeated on every page
    pub title: String,

    /// Info line appended to the page footer
    pub page_info: String,

    /// Font face for all text
    pub font: BuiltinFont,
}

impl DocumentStyle {
    /// Creates a style with the standard Helvetica face
    pub fn new(title: impl Into<String>, page_info: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page_info: page_info.into(),
            font: BuiltinFont::Helvetica,
        }
    }
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self::new("Shopping list", "shopping-list")
    }
}

/// One table row: name, normalized quantity text, unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListRow {
    /// Ingredient display name
    pub name: String,

    /// Normalized quantity text
    pub amount: String,

    /// Measurement unit string
    pub unit: String,
}

impl ShoppingListRow {
    /// The explicit blank row rendered for an empty cart
    pub fn placeholder() -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            unit: String::new(),
        }
    }
}

/// Renders the rows into PDF bytes
///
/// An empty `rows` slice renders exactly one page with a single blank
/// placeholder row.
///
/// # Errors
///
/// Returns [`RenderError`] if font registration or document serialization
/// fails; no partial output is produced.
pub fn render_shopping_list(
    style: &DocumentStyle,
    rows: &[ShoppingListRow],
) -> Result<Vec<u8>, RenderError> {
    let placeholder = [ShoppingListRow::placeholder()];
    let rows: &[ShoppingListRow] = if rows.is_empty() { &placeholder } else { rows };

    let (doc, first_page, first_layer) = PdfDocument::new(
        style.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Page 1",
    );

    let font = doc
        .add_builtin_font(style.font)
        .map_err(|e| RenderError::Font(e.to_string()))?;

    for (page_idx, page_rows) in paginate(rows).into_iter().enumerate() {
        let layer = if page_idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", page_idx + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        draw_page(&layer, &font, style, page_rows, page_idx);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Build(e.to_string()))
}

/// Splits rows into per-page chunks
///
/// The first page holds fewer rows than later pages because its title
/// sits lower. Always yields at least one (possibly empty) page.
fn paginate(rows: &[ShoppingListRow]) -> Vec<&[ShoppingListRow]> {
    let first_capacity = page_capacity(TABLE_TOP_FIRST_MM);
    let later_capacity = page_capacity(TABLE_TOP_LATER_MM);

    let mut pages = Vec::new();
    let (first, mut rest) = rows.split_at(rows.len().min(first_capacity));
    pages.push(first);

    while !rest.is_empty() {
        let (chunk, tail) = rest.split_at(rest.len().min(later_capacity));
        pages.push(chunk);
        rest = tail;
    }

    pages
}

/// Rows that fit between a table top and the footer clearance
fn page_capacity(table_top_mm: f32) -> usize {
    ((table_top_mm - TABLE_BOTTOM_MM) / ROW_HEIGHT_MM) as usize
}

/// Rough text width for centering with a builtin face
///
/// The builtin fonts ship no metrics we can query, so centering uses the
/// common 0.5em average-glyph approximation.
fn approx_text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * 0.5 * MM_PER_PT
}

fn draw_page(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    style: &DocumentStyle,
    rows: &[ShoppingListRow],
    page_idx: usize,
) {
    let is_first = page_idx == 0;

    // Repeating page title, centered
    let title_y = if is_first { TITLE_Y_FIRST_MM } else { TITLE_Y_LATER_MM };
    let title_x =
        ((PAGE_WIDTH_MM - approx_text_width_mm(&style.title, TITLE_FONT_SIZE)) / 2.0).max(0.0);
    layer.use_text(style.title.as_str(), TITLE_FONT_SIZE, Mm(title_x), Mm(title_y), font);

    // Table body
    let table_top = if is_first { TABLE_TOP_FIRST_MM } else { TABLE_TOP_LATER_MM };
    let baseline_offset = (ROW_HEIGHT_MM - BODY_FONT_SIZE * MM_PER_PT) / 2.0;

    let amount_col_x = TABLE_LEFT_MM + COL_NAME_MM;
    let unit_col_x = amount_col_x + COL_AMOUNT_MM;

    for (row_idx, row) in rows.iter().enumerate() {
        let y = table_top - (row_idx + 1) as f32 * ROW_HEIGHT_MM + baseline_offset;

        // Name left-aligned with cell padding; quantity and unit centered
        // in their columns.
        layer.use_text(
            row.name.as_str(),
            BODY_FONT_SIZE,
            Mm(TABLE_LEFT_MM + CELL_PADDING_MM),
            Mm(y),
            font,
        );

        let amount_x = amount_col_x
            + ((COL_AMOUNT_MM - approx_text_width_mm(&row.amount, BODY_FONT_SIZE)) / 2.0).max(0.0);
        layer.use_text(row.amount.as_str(), BODY_FONT_SIZE, Mm(amount_x), Mm(y), font);

        let unit_x = unit_col_x
            + ((COL_UNIT_MM - approx_text_width_mm(&row.unit, BODY_FONT_SIZE)) / 2.0).max(0.0);
        layer.use_text(row.unit.as_str(), BODY_FONT_SIZE, Mm(unit_x), Mm(y), font);
    }

    // Footer: the first page is labeled, later pages are numbered
    let footer = if is_first {
        format!("First Page / {}", style.page_info)
    } else {
        format!("Page {} {}", page_idx + 1, style.page_info)
    };
    layer.use_text(footer, FOOTER_FONT_SIZE, Mm(FOOTER_X_MM), Mm(FOOTER_Y_MM), font);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, amount: &str, unit: &str) -> ShoppingListRow {
        ShoppingListRow {
            name: name.to_string(),
            amount: amount.to_string(),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_page_capacities_are_sane() {
        let first = page_capacity(TABLE_TOP_FIRST_MM);
        let later = page_capacity(TABLE_TOP_LATER_MM);

        assert!(first >= 10, "first page should hold a useful row count");
        assert!(later > first, "later pages start higher and hold more");
    }

    #[test]
    fn test_paginate_single_page() {
        let rows = vec![row("Flour", "3.5", "kg"); 3];
        let pages = paginate(&rows);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 3);
    }

    #[test]
    fn test_paginate_spills_to_second_page() {
        let first_capacity = page_capacity(TABLE_TOP_FIRST_MM);
        let rows = vec![row("Flour", "3.5", "kg"); first_capacity + 1];

        let pages = paginate(&rows);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), first_capacity);
        assert_eq!(pages[1].len(), 1);
    }

    #[test]
    fn test_paginate_fills_later_pages() {
        let first_capacity = page_capacity(TABLE_TOP_FIRST_MM);
        let later_capacity = page_capacity(TABLE_TOP_LATER_MM);
        let rows = vec![row("Flour", "1", "kg"); first_capacity + later_capacity + 1];

        let pages = paginate(&rows);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].len(), later_capacity);
        assert_eq!(pages[2].len(), 1);
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let style = DocumentStyle::default();
        let rows = vec![
            row("Flour", "3.5", "kg"),
            row("Sugar", "0.5", "kg"),
            row("Egg", "3", "pcs"),
        ];

        let bytes = render_shopping_list(&style, &rows).expect("render should succeed");

        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF");
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_empty_rows_yields_placeholder_document() {
        let style = DocumentStyle::default();

        let bytes = render_shopping_list(&style, &[]).expect("empty cart must render");

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_long_list_paginates_without_error() {
        let style = DocumentStyle::default();
        let rows: Vec<ShoppingListRow> = (0..100)
            .map(|i| row(&format!("Ingredient {}", i), "1.5", "g"))
            .collect();

        let bytes = render_shopping_list(&style, &rows).expect("render should succeed");

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_placeholder_row_is_blank() {
        let placeholder = ShoppingListRow::placeholder();
        assert!(placeholder.name.is_empty());
        assert!(placeholder.amount.is_empty());
        assert!(placeholder.unit.is_empty());
    }
}
