//! Paginated PDF report built with lopdf.
//!
//! Layout happens in two passes: [`PdfRenderer::layout`] walks the metrics
//! and produces drawing operations per page, then the pages are assembled
//! into a PDF document. Coordinates are whole points on a US-letter page.

use super::format::{currency, pdf_safe, percentage, ratio, timestamp_label, truncate_name};
use super::{ReportContext, ReportRenderer};
use crate::aggregator::{view_totals, CampaignMetrics, MetricsResult};
use crate::utils::config::{
    DEFAULT_CURRENCY_PREFIX, DEFAULT_HIGH_ROAS_THRESHOLD, PAGE_HEIGHT, PAGE_MARGIN, PAGE_WIDTH,
    ROW_HEIGHT,
};
use crate::utils::error::RenderError;
use log::{debug, info};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

const HEADER_GRAY: f32 = 0.9;
const TOTAL_GRAY: f32 = 0.95;
const CELL_PADDING: i64 = 5;
const SECTION_GAP: i64 = 30;

/// Column headers and widths of a table
struct Table {
    headers: &'static [&'static str],
    widths: &'static [i64],
}

const SUMMARY_TABLE: Table = Table {
    headers: &["Metric", "Value"],
    widths: &[200, 200],
};

const CAMPAIGN_TABLE: Table = Table {
    headers: &["Campaign Name", "Spend", "Sales", "ROAS", "CPA", "CTR", "CR"],
    widths: &[150, 80, 80, 40, 80, 40, 40],
};

impl Table {
    fn width(&self) -> i64 {
        self.widths.iter().sum()
    }

    fn x_positions(&self) -> Vec<i64> {
        self.widths
            .iter()
            .scan(PAGE_MARGIN, |x, width| {
                let start = *x;
                *x += width;
                Some(start)
            })
            .collect()
    }
}

/// Drawing operations and visible strings of one page
#[derive(Debug, Clone, Default)]
pub struct LayoutPage {
    pub operations: Vec<Operation>,
    pub texts: Vec<String>,
}

/// All pages of a laid-out report
#[derive(Debug, Clone, Default)]
pub struct ReportLayout {
    pub pages: Vec<LayoutPage>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether `text` was drawn on page `index` (zero-based)
    pub fn page_contains(&self, index: usize, text: &str) -> bool {
        self.pages
            .get(index)
            .is_some_and(|page| page.texts.iter().any(|t| t == text))
    }

    pub fn contains(&self, text: &str) -> bool {
        (0..self.pages.len()).any(|i| self.page_contains(i, text))
    }
}

/// Cursor-based page writer; `y` is the baseline of the next line
struct Canvas {
    finished: Vec<LayoutPage>,
    current: LayoutPage,
    y: i64,
}

impl Canvas {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: LayoutPage::default(),
            y: PAGE_HEIGHT - PAGE_MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - PAGE_MARGIN;
    }

    fn below_margin(&self) -> bool {
        self.y < PAGE_MARGIN
    }

    fn advance(&mut self, dy: i64) {
        self.y -= dy;
    }

    fn text(&mut self, x: i64, font: &str, size: i64, text: &str) {
        let ops = &mut self.current.operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), self.y.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        ops.push(Operation::new("ET", vec![]));
        self.current.texts.push(text.to_string());
    }

    /// Grey band behind a row whose baseline is the cursor
    fn fill_row(&mut self, width: i64, gray: f32) {
        let ops = &mut self.current.operations;
        ops.push(Operation::new("g", vec![gray.into()]));
        ops.push(Operation::new(
            "re",
            vec![
                PAGE_MARGIN.into(),
                (self.y - CELL_PADDING).into(),
                width.into(),
                ROW_HEIGHT.into(),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("g", vec![0i64.into()]));
    }

    fn stroke_cell(&mut self, x: i64, width: i64) {
        let ops = &mut self.current.operations;
        ops.push(Operation::new(
            "re",
            vec![
                x.into(),
                (self.y - CELL_PADDING).into(),
                width.into(),
                ROW_HEIGHT.into(),
            ],
        ));
        ops.push(Operation::new("S", vec![]));
    }

    fn finish(mut self) -> ReportLayout {
        self.finished.push(self.current);
        ReportLayout {
            pages: self.finished,
        }
    }
}

/// PDF renderer for the daily report
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    pub currency_prefix: String,

    /// Only used for the section title; the view itself is computed upstream
    pub high_roas_threshold: f64,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            high_roas_threshold: DEFAULT_HIGH_ROAS_THRESHOLD,
        }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.currency_prefix = prefix.into();
        self
    }

    pub fn with_high_roas_threshold(mut self, threshold: f64) -> Self {
        self.high_roas_threshold = threshold;
        self
    }

    /// Lay out the whole report without serializing it
    pub fn layout(&self, metrics: &MetricsResult, context: &ReportContext) -> ReportLayout {
        let mut canvas = Canvas::new();

        let title = format!(
            "Daily Marketing Performance Report ({})",
            timestamp_label(context.generated_at)
        );
        canvas.text(PAGE_MARGIN, BOLD_FONT, 16, &title);
        canvas.advance(ROW_HEIGHT);

        canvas.text(PAGE_MARGIN, BOLD_FONT, 14, "Summary Metrics");
        canvas.advance(SECTION_GAP);

        draw_header(&mut canvas, &SUMMARY_TABLE);
        for (metric, value) in self.summary_rows(metrics, context) {
            draw_row(&mut canvas, &SUMMARY_TABLE, &[metric.to_string(), value]);
        }

        canvas.advance(SECTION_GAP);
        let threshold = self.high_roas_threshold;
        self.campaign_section(
            &mut canvas,
            &format!("Campaigns with ROAS > {}", threshold),
            &metrics.high_roas,
            &format!("No campaigns with ROAS > {}", threshold),
            false,
        );

        canvas.advance(SECTION_GAP);
        self.campaign_section(
            &mut canvas,
            "Active Campaigns",
            &metrics.active,
            "No active campaigns",
            true,
        );

        let layout = canvas.finish();
        debug!("Report laid out on {} page(s)", layout.page_count());
        layout
    }

    fn summary_rows(
        &self,
        metrics: &MetricsResult,
        context: &ReportContext,
    ) -> Vec<(&'static str, String)> {
        let o = &metrics.overall;
        let prefix = self.currency_prefix.as_str();
        vec![
            ("Date", context.date.format("%Y-%m-%d").to_string()),
            ("Total Sales", currency(prefix, o.total_sales)),
            ("Total Ad Spend", currency(prefix, o.total_ad_spend)),
            ("Overall ROAS", ratio(o.overall_roas)),
            ("Overall CPA", currency(prefix, o.overall_cpa)),
            ("Overall CTR", percentage(o.overall_ctr)),
            ("Overall Conversion Rate", percentage(o.overall_conversion_rate)),
            ("Total Impressions", o.total_impressions.to_string()),
            ("Total Clicks", o.total_clicks.to_string()),
        ]
    }

    fn campaign_cells(&self, row: &CampaignMetrics) -> Vec<String> {
        let prefix = self.currency_prefix.as_str();
        let name = if row.campaign_name.is_empty() {
            "(unnamed)".to_string()
        } else {
            truncate_name(&pdf_safe(&row.campaign_name))
        };
        vec![
            name,
            currency(prefix, row.spend),
            currency(prefix, row.sales),
            ratio(row.roas),
            currency(prefix, row.cpa),
            percentage(row.ctr),
            percentage(row.conversion_rate),
        ]
    }

    fn campaign_section(
        &self,
        canvas: &mut Canvas,
        title: &str,
        rows: &[CampaignMetrics],
        empty_message: &str,
        with_total: bool,
    ) {
        // keep the title together with at least the header and one row
        if canvas.y < PAGE_MARGIN + SECTION_GAP + 2 * ROW_HEIGHT {
            canvas.new_page();
        }
        canvas.text(PAGE_MARGIN, BOLD_FONT, 14, title);
        canvas.advance(SECTION_GAP);

        if rows.is_empty() {
            canvas.text(PAGE_MARGIN, REGULAR_FONT, 12, empty_message);
            canvas.advance(ROW_HEIGHT);
            return;
        }

        draw_header(canvas, &CAMPAIGN_TABLE);
        for row in rows {
            draw_row(canvas, &CAMPAIGN_TABLE, &self.campaign_cells(row));
        }

        if with_total {
            let (spend, sales) = view_totals(rows);
            if canvas.below_margin() {
                canvas.new_page();
            }
            canvas.fill_row(CAMPAIGN_TABLE.width(), TOTAL_GRAY);
            let xs = CAMPAIGN_TABLE.x_positions();
            let prefix = self.currency_prefix.as_str();
            canvas.text(xs[0] + CELL_PADDING, BOLD_FONT, 12, "Total");
            canvas.text(xs[1] + CELL_PADDING, BOLD_FONT, 12, &currency(prefix, spend));
            canvas.text(xs[2] + CELL_PADDING, BOLD_FONT, 12, &currency(prefix, sales));
            for (x, width) in xs.iter().zip(CAMPAIGN_TABLE.widths) {
                canvas.stroke_cell(*x, *width);
            }
            canvas.advance(ROW_HEIGHT);
        }
    }
}

fn draw_header(canvas: &mut Canvas, table: &Table) {
    canvas.fill_row(table.width(), HEADER_GRAY);
    for (x, header) in table.x_positions().into_iter().zip(table.headers) {
        canvas.text(x + CELL_PADDING, BOLD_FONT, 12, header);
    }
    canvas.advance(ROW_HEIGHT);
}

/// Draw one bordered row, breaking the page (and repeating the header) first if needed
fn draw_row(canvas: &mut Canvas, table: &Table, cells: &[String]) {
    if canvas.below_margin() {
        canvas.new_page();
        draw_header(canvas, table);
    }

    let xs = table.x_positions();
    for (x, width) in xs.iter().zip(table.widths) {
        canvas.stroke_cell(*x, *width);
    }
    for (x, cell) in xs.iter().zip(cells) {
        canvas.text(x + CELL_PADDING, REGULAR_FONT, 12, cell);
    }
    canvas.advance(ROW_HEIGHT);
}

/// Assemble laid-out pages into PDF bytes
pub fn layout_to_pdf(layout: ReportLayout) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in layout.pages {
        let content = Content {
            operations: page.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::ContentEncoding(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0i64.into(), 0i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| RenderError::Serialization(e.to_string()))?;
    Ok(bytes)
}

impl ReportRenderer for PdfRenderer {
    fn render(
        &self,
        metrics: &MetricsResult,
        context: &ReportContext,
    ) -> Result<Vec<u8>, RenderError> {
        let layout = self.layout(metrics, context);
        let pages = layout.page_count();
        let bytes = layout_to_pdf(layout)?;
        info!("PDF rendered: {} page(s), {} bytes", pages, bytes.len());
        Ok(bytes)
    }
}
