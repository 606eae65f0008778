//! Styled building blocks shared by the three documents.
//!
//! Each factory takes literal content plus a style registry and returns a
//! ready-to-place flowable with the house styling baked in.

use crate::drawables::{CardRow, MetricCard};
use crate::error::{DocError, Result};
use crate::flowable::{Flowable, Paragraph};
use crate::font::StandardFont;
use crate::markup;
use crate::style::{Alignment, ParagraphStyle, StyleSheet};
use crate::table::{Cell, Table, TableStyle, VAlign};
use crate::theme;
use crate::types::{Pt, inch};

/// Usable width of a letter page with 0.75 in margins.
pub const CONTENT_WIDTH_IN: f32 = 6.5;

const ALL: (i32, i32) = (0, 0);
const LAST: (i32, i32) = (-1, -1);

/// Header row, body rows and optional column widths (inches) for a data table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub col_widths_in: Option<Vec<f32>>,
}

impl TableSpec {
    pub fn new(header: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
            col_widths_in: None,
        }
    }

    pub fn with_widths_in(mut self, widths: &[f32]) -> Self {
        self.col_widths_in = Some(widths.to_vec());
        self
    }

    pub fn validate(&self) -> Result<()> {
        let columns = self.header.len();
        if columns == 0 {
            return Err(DocError::InvalidTable("table header is empty".to_string()));
        }
        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns)
        {
            return Err(DocError::InvalidTable(format!(
                "row {} has {} cells, header has {}",
                idx + 1,
                row.len(),
                columns
            )));
        }
        if let Some(widths) = &self.col_widths_in {
            if widths.len() != columns {
                return Err(DocError::InvalidTable(format!(
                    "{} column widths for {} columns",
                    widths.len(),
                    columns
                )));
            }
            if widths.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(DocError::InvalidDimensions(
                    "column widths must be finite and non-negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Explicit widths, or the content width split evenly.
    pub fn col_widths(&self) -> Vec<Pt> {
        match &self.col_widths_in {
            Some(widths) => widths.iter().map(|w| inch(*w)).collect(),
            None => {
                let columns = self.header.len().max(1);
                vec![inch(CONTENT_WIDTH_IN / columns as f32); columns]
            }
        }
    }
}

/// Navy header row over banded body rows separated by hairlines.
pub fn data_table(spec: &TableSpec, cell_padding: f32) -> Result<Table> {
    spec.validate()?;
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(spec.rows.len() + 1);
    rows.push(spec.header.iter().map(|h| Cell::from(h.as_str())).collect());
    for row in &spec.rows {
        rows.push(row.iter().map(|c| Cell::from(c.as_str())).collect());
    }
    let style = TableStyle::new()
        .background(ALL, (-1, 0), theme::PRIMARY)
        .text_color(ALL, (-1, 0), theme::WHITE)
        .font(ALL, (-1, 0), StandardFont::HelveticaBold)
        .font_size(ALL, (-1, 0), 9.0)
        .font((0, 1), LAST, StandardFont::Helvetica)
        .font_size((0, 1), LAST, 9.0)
        .text_color((0, 1), LAST, theme::TEXT)
        .padding(ALL, LAST, cell_padding)
        .row_backgrounds((0, 1), LAST, &[theme::WHITE, theme::LIGHT])
        .line_below(ALL, (-1, -2), 0.5, theme::RULE)
        .valign(ALL, LAST, VAlign::Top);
    Ok(Table::new(rows)?
        .with_col_widths(spec.col_widths())?
        .with_style(style)?
        .with_repeat_rows(1))
}

fn single_cell(content: Vec<Box<dyn Flowable>>) -> Result<Table> {
    let rows = content.into_iter().map(|f| vec![Cell::from(f)]).collect();
    Table::new(rows)?.with_col_widths(vec![inch(CONTENT_WIDTH_IN)])
}

fn box_padding(style: TableStyle, vertical: f32, horizontal: f32) -> TableStyle {
    style
        .top_padding(ALL, LAST, vertical)
        .bottom_padding(ALL, LAST, vertical)
        .left_padding(ALL, LAST, horizontal)
        .right_padding(ALL, LAST, horizontal)
}

/// Full-width navy panel with white body text, built on the `Body` style.
pub fn highlight_box(content: &str, styles: &StyleSheet) -> Result<Table> {
    let text = styles
        .get("Body")?
        .derive("BoxText")
        .with_text_color(theme::WHITE);
    let paragraph: Box<dyn Flowable> = Box::new(Paragraph::new(content, &text)?);
    let style = box_padding(
        TableStyle::new().background(ALL, LAST, theme::PRIMARY),
        12.0,
        15.0,
    );
    single_cell(vec![paragraph])?.with_style(style)
}

/// Rounded navy panel with a gold title row over a white body row.
pub fn titled_highlight_box(title: &str, content: &str, styles: &StyleSheet) -> Result<Table> {
    let heading = format!(
        "<font color=\"{}\">{}</font>",
        theme::markup_hex(theme::SECONDARY),
        markup::escape(title)
    );
    let title: Box<dyn Flowable> =
        Box::new(Paragraph::new(&heading, styles.get("HighlightTitle")?)?);
    let body: Box<dyn Flowable> = Box::new(Paragraph::new(content, styles.get("HighlightBody")?)?);
    let style = box_padding(
        TableStyle::new().background(ALL, LAST, theme::PRIMARY),
        12.0,
        15.0,
    )
    .rounded_corners(5.0);
    single_cell(vec![title, body])?.with_style(style)
}

/// Pale amber callout with a thin amber outline.
pub fn warning_box(content: &str, styles: &StyleSheet) -> Result<Table> {
    let text = styles
        .get("Body")?
        .derive("WarnText")
        .with_text_color(theme::TEXT);
    let paragraph: Box<dyn Flowable> = Box::new(Paragraph::new(content, &text)?);
    let style = box_padding(
        TableStyle::new().background(ALL, LAST, theme::WARNING_BG),
        10.0,
        15.0,
    )
    .outline(ALL, LAST, 1.0, theme::WARNING);
    single_cell(vec![paragraph])?.with_style(style)
}

/// A light strip of centred value/label pairs, one column each, with a gold
/// bar before every column.
pub fn metrics_row(metrics: &[(&str, &str)], styles: &StyleSheet) -> Result<Table> {
    if metrics.is_empty() {
        return Err(DocError::InvalidTable("metrics row needs at least one metric".to_string()));
    }
    let body = styles.get("BodyText")?;
    let mut cells = Vec::with_capacity(metrics.len());
    for (value, label) in metrics {
        let content = format!(
            "<para align=\"center\"><font size=\"16\" color=\"{}\"><b>{}</b></font><br/><font size=\"7\" color=\"{}\">{}</font></para>",
            theme::markup_hex(theme::PRIMARY),
            markup::escape(value),
            theme::markup_hex(theme::TEXT_LIGHT),
            markup::escape(&label.to_uppercase())
        );
        let paragraph: Box<dyn Flowable> = Box::new(Paragraph::new(&content, body)?);
        cells.push(Cell::from(paragraph));
    }
    let mut style = TableStyle::new()
        .background(ALL, LAST, theme::LIGHT)
        .top_padding(ALL, LAST, 10.0)
        .bottom_padding(ALL, LAST, 10.0)
        .left_padding(ALL, LAST, 5.0)
        .right_padding(ALL, LAST, 5.0)
        .valign(ALL, LAST, VAlign::Middle);
    for col in 0..metrics.len() as i32 {
        style = style.line_before((col, 0), (col, -1), 3.0, theme::SECONDARY);
    }
    Table::new(vec![cells])?
        .with_col_widths(vec![inch(1.625); metrics.len()])?
        .with_style(style)
}

/// The same figures as [`metrics_row`], drawn as individual cards.
pub fn metric_cards(metrics: &[(&str, &str)]) -> Result<CardRow> {
    let cards = metrics
        .iter()
        .map(|(value, label)| Box::new(MetricCard::new(*value, *label)) as Box<dyn Flowable>)
        .collect();
    CardRow::new(cards, 8.0)
}

/// Full-width 3 pt gold bar placed under section titles.
pub fn section_rule() -> Result<Table> {
    Table::new(vec![vec![Cell::from("")]])?
        .with_col_widths(vec![inch(CONTENT_WIDTH_IN)])?
        .with_row_heights(vec![Some(Pt::from_f32(3.0))])?
        .with_style(TableStyle::new().background(ALL, LAST, theme::SECONDARY))
}

/// Two half-width columns of grey document metadata, the right one right-aligned.
pub fn meta_table(rows: &[[&str; 2]]) -> Result<Table> {
    let cells = rows
        .iter()
        .map(|row| row.iter().map(|c| Cell::from(*c)).collect())
        .collect();
    let half = inch(CONTENT_WIDTH_IN / 2.0);
    Table::new(cells)?
        .with_col_widths(vec![half, half])?
        .with_style(
            TableStyle::new()
                .font(ALL, LAST, StandardFont::Helvetica)
                .font_size(ALL, LAST, 10.0)
                .text_color(ALL, LAST, theme::TEXT_LIGHT)
                .align(ALL, (0, -1), Alignment::Left)
                .align((1, 0), (1, -1), Alignment::Right),
        )
}

/// One column of a [`panel_table`]: a bold heading over bullet lines.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelColumn {
    heading: String,
    lines: Vec<String>,
}

impl PanelColumn {
    pub fn new(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            lines: Vec::new(),
        }
    }

    /// Appends `•`-prefixed markup lines.
    pub fn bullets(mut self, items: &[&str]) -> Self {
        self.lines
            .extend(items.iter().map(|item| format!("\u{2022} {item}")));
        self
    }

    /// A blank line then a bold sub-heading inside the same cell.
    pub fn subheading(mut self, text: &str) -> Self {
        self.lines.push(String::new());
        self.lines.push(format!("<b>{}</b>", markup::escape(text)));
        self
    }

    fn body_markup(&self) -> String {
        self.lines.join("<br/>")
    }
}

/// Layout knobs for [`panel_table`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelStyle {
    pub background: Option<crate::types::Color>,
    pub padding: Option<f32>,
    pub top_padding: Option<f32>,
}

/// Side-by-side columns of bold headings over `<br/>`-joined bullet lists.
pub fn panel_table(
    columns: &[PanelColumn],
    col_width_in: f32,
    panel: PanelStyle,
    styles: &StyleSheet,
) -> Result<Table> {
    if columns.is_empty() {
        return Err(DocError::InvalidTable("panel table needs at least one column".to_string()));
    }
    let heading_style = styles.get("BodyText")?;
    let bullet_style = styles.get("BulletText")?;
    let mut headings = Vec::with_capacity(columns.len());
    let mut bodies = Vec::with_capacity(columns.len());
    for column in columns {
        let heading = format!("<b>{}</b>", markup::escape(&column.heading));
        let heading: Box<dyn Flowable> = Box::new(Paragraph::new(&heading, heading_style)?);
        let body: Box<dyn Flowable> =
            Box::new(Paragraph::new(&column.body_markup(), bullet_style)?);
        headings.push(Cell::from(heading));
        bodies.push(Cell::from(body));
    }
    let mut style = TableStyle::new().valign(ALL, LAST, VAlign::Top);
    if let Some(color) = panel.background {
        style = style.background(ALL, LAST, color);
    }
    if let Some(padding) = panel.padding {
        style = style
            .top_padding(ALL, LAST, padding)
            .bottom_padding(ALL, LAST, padding)
            .left_padding(ALL, LAST, padding);
    }
    if let Some(padding) = panel.top_padding {
        style = style.top_padding(ALL, LAST, padding);
    }
    Table::new(vec![headings, bodies])?
        .with_col_widths(vec![inch(col_width_in); columns.len()])?
        .with_style(style)
}

/// A `•`-prefixed paragraph.
pub fn bullet(text: &str, style: &ParagraphStyle) -> Result<Paragraph> {
    Paragraph::new(&format!("\u{2022} {text}"), style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Command};
    use crate::types::{Color, Size};

    fn sheet() -> StyleSheet {
        let mut styles = StyleSheet::sample();
        for style in [
            ParagraphStyle::new("Body").with_leading(14.0).with_text_color(theme::TEXT),
            ParagraphStyle::new("HighlightTitle")
                .with_font(StandardFont::HelveticaBold)
                .with_font_size(12.0)
                .with_text_color(theme::SECONDARY)
                .with_space_after(8.0),
            ParagraphStyle::new("HighlightBody")
                .with_leading(14.0)
                .with_text_color(theme::WHITE),
            ParagraphStyle::new("BulletText").with_left_indent(20.0),
        ] {
            styles.add(style).expect("add");
        }
        styles
    }

    fn draw(flowable: &dyn Flowable) -> Vec<Command> {
        let mut canvas = Canvas::new(Size::letter());
        let width = Pt::from_f32(468.0);
        let size = flowable.wrap(width, Pt::from_f32(600.0));
        flowable.draw(&mut canvas, Pt::from_f32(54.0), Pt::from_f32(54.0), width, size.height);
        canvas.finish().pages.remove(0).commands
    }

    fn fills(commands: &[Command]) -> Vec<Color> {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::SetFillColor(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn table_spec_validation() {
        let ok = TableSpec::new(&["A", "B"], &[&["1", "2"]]);
        assert!(ok.validate().is_ok());
        assert_eq!(ok.col_widths(), vec![inch(3.25), inch(3.25)]);

        let ragged = TableSpec::new(&["A", "B"], &[&["1"]]);
        assert!(matches!(ragged.validate(), Err(DocError::InvalidTable(_))));

        let widths = TableSpec::new(&["A"], &[]).with_widths_in(&[1.0, 2.0]);
        assert!(matches!(widths.validate(), Err(DocError::InvalidTable(_))));

        let negative = TableSpec::new(&["A"], &[]).with_widths_in(&[-1.0]);
        assert!(matches!(negative.validate(), Err(DocError::InvalidDimensions(_))));

        assert!(TableSpec::new(&[], &[]).validate().is_err());
    }

    #[test]
    fn data_table_styles_header_and_bands() {
        let spec = TableSpec::new(
            &["Metric", "Value"],
            &[&["MSRP", "$350 - $400"], &["Target ASP", "$375"], &["Est. COGS", "~$140/unit"]],
        )
        .with_widths_in(&[3.25, 3.25]);
        let table = data_table(&spec, 8.0).expect("table");
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 2);
        let commands = draw(&table);
        let colors = fills(&commands);
        assert!(colors.contains(&theme::PRIMARY));
        assert!(colors.contains(&theme::LIGHT));
        let fonts: Vec<StandardFont> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::SetFontName(font) => Some(*font),
                _ => None,
            })
            .collect();
        assert_eq!(fonts.first(), Some(&StandardFont::HelveticaBold));
        assert!(fonts.contains(&StandardFont::Helvetica));
        let hairlines = commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetStrokeColor(c) if *c == theme::RULE))
            .count();
        assert!(hairlines >= 1);
    }

    #[test]
    fn header_only_table_is_valid() {
        let spec = TableSpec::new(&["Only"], &[]);
        let table = data_table(&spec, 6.0).expect("header-only table");
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn boxes_use_their_palettes() {
        let styles = sheet();
        let plain = highlight_box("<b>Critical Path:</b> a \u{2192} b", &styles).expect("box");
        assert!(fills(&draw(&plain)).contains(&theme::PRIMARY));

        let titled =
            titled_highlight_box("Strategic Vision", "Body text.", &styles).expect("titled");
        assert_eq!(titled.row_count(), 2);
        let commands = draw(&titled);
        assert!(fills(&commands).contains(&theme::SECONDARY));
        assert!(commands.iter().any(|cmd| matches!(cmd, Command::CurveTo { .. })));

        let warning = warning_box("<b>TRADEMARK UPDATE:</b> proceed", &styles).expect("warning");
        let commands = draw(&warning);
        assert!(fills(&commands).contains(&theme::WARNING_BG));
        assert!(commands
            .iter()
            .any(|cmd| matches!(cmd, Command::SetStrokeColor(c) if *c == theme::WARNING)));
    }

    #[test]
    fn boxes_need_their_styles() {
        let styles = StyleSheet::sample();
        assert!(matches!(
            highlight_box("x", &styles),
            Err(DocError::UnknownStyle(name)) if name == "Body"
        ));
        assert!(titled_highlight_box("t", "x", &styles).is_err());
    }

    #[test]
    fn metrics_row_centres_values_and_uppercases_labels() {
        let styles = sheet();
        let row = metrics_row(&[("$375", "Target MSRP"), ("60-65%", "Gross Margin")], &styles)
            .expect("row");
        assert_eq!(row.wrap(Pt::from_f32(468.0), Pt::from_f32(600.0)).width, inch(3.25));
        let commands = draw(&row);
        let text: Vec<&str> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(text.contains(&"$375"));
        assert!(text.contains(&"TARGET MSRP"));
        let gold_bars = commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetStrokeColor(c) if *c == theme::SECONDARY))
            .count();
        assert!(gold_bars >= 1);
        assert!(metrics_row(&[], &styles).is_err());
    }

    #[test]
    fn section_rule_is_three_points_tall() {
        let rule = section_rule().expect("rule");
        let size = rule.wrap(Pt::from_f32(468.0), Pt::from_f32(600.0));
        assert_eq!(size, Size::new(inch(6.5), Pt::from_f32(3.0)));
        let commands = draw(&rule);
        assert_eq!(fills(&commands).first(), Some(&theme::SECONDARY));
        assert!(!commands.iter().any(|cmd| matches!(cmd, Command::DrawString { .. })));
    }

    #[test]
    fn meta_table_right_aligns_the_second_column() {
        let table = meta_table(&[["Version: 1.0", "Date: January 2025"]]).expect("meta");
        let commands = draw(&table);
        let xs: Vec<(Pt, &str)> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { x, text, .. } => Some((*x, text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(xs.len(), 2);
        let right = &xs[1];
        let width = StandardFont::Helvetica.string_width(Pt::from_f32(10.0), right.1);
        // table is centred in the 468pt frame, right padding 6
        assert_eq!(right.0 + width, Pt::from_f32(54.0) + inch(6.5) - Pt::from_f32(6.0));
    }

    #[test]
    fn panel_columns_join_bullets_and_subheadings() {
        let column = PanelColumn::new("Direct Competitors")
            .bullets(&["Generic drink dispensers", "Keg-style novelty products"])
            .subheading("Indirect Competitors")
            .bullets(&["Premium coolers (YETI, Igloo)"]);
        assert_eq!(
            column.body_markup(),
            "\u{2022} Generic drink dispensers<br/>\u{2022} Keg-style novelty products<br/><br/><b>Indirect Competitors</b><br/>\u{2022} Premium coolers (YETI, Igloo)"
        );
        let styles = sheet();
        let table = panel_table(
            &[column, PanelColumn::new("Advantages").bullets(&["<b>First-mover</b>"])],
            3.25,
            PanelStyle {
                background: Some(theme::LIGHT),
                padding: Some(8.0),
                top_padding: None,
            },
            &styles,
        )
        .expect("panel");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert!(fills(&draw(&table)).contains(&theme::LIGHT));
    }

    #[test]
    fn metric_cards_form_a_row() {
        let row = metric_cards(&[("$375", "MSRP"), ("62%", "Margin")]).expect("cards");
        let size = row.wrap(Pt::from_f32(468.0), Pt::from_f32(600.0));
        assert_eq!(size.width, inch(3.0) + Pt::from_f32(8.0));
    }

    #[test]
    fn bullet_prefixes_a_dot() {
        let style = ParagraphStyle::new("BulletText");
        let para = bullet("Durable, food-grade materials", &style).expect("bullet");
        assert_eq!(para.plain_text(), "\u{2022} Durable, food-grade materials");
    }
}
