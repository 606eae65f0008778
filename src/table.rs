use crate::canvas::Canvas;
use crate::error::{DocError, Result};
use crate::flowable::{Flowable, Pagination};
use crate::font::{self, StandardFont};
use crate::style::Alignment;
use crate::types::{Color, EdgeSizes, Pt, Size};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::{Arc, Mutex};

/// Table cell content. Plain text never wraps; `\n` starts a new line.
#[derive(Clone)]
pub enum Cell {
    Text(String),
    Flowable(Box<dyn Flowable>),
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Cell::Flowable(flowable) => f.debug_tuple("Flowable").field(&flowable.debug_name()).finish(),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<Box<dyn Flowable>> for Cell {
    fn from(flowable: Box<dyn Flowable>) -> Self {
        Cell::Flowable(flowable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Below,
    Above,
    Before,
    After,
    Box,
}

#[derive(Debug, Clone, PartialEq)]
enum StyleCommand {
    Background(Color),
    RowBackgrounds(Vec<Color>),
    TextColor(Color),
    Font(StandardFont),
    FontSize(Pt),
    Padding(Side, Pt),
    Align(Alignment),
    VAlign(VAlign),
    Line(LineKind, Pt, Color),
    RoundedCorners(Pt),
}

/// A `(col, row)` rectangle. Negative indices count back from the last column or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    start: (i32, i32),
    end: (i32, i32),
}

/// Ordered table styling commands. Later commands override earlier ones.
#[derive(Debug, Clone, Default)]
pub struct TableStyle {
    commands: Vec<(CellRange, StyleCommand)>,
}

impl TableStyle {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, start: (i32, i32), end: (i32, i32), command: StyleCommand) -> Self {
        self.commands.push((CellRange { start, end }, command));
        self
    }

    pub fn background(self, start: (i32, i32), end: (i32, i32), color: Color) -> Self {
        self.push(start, end, StyleCommand::Background(color))
    }

    /// Cycles `colors` over the rows of the range.
    pub fn row_backgrounds(self, start: (i32, i32), end: (i32, i32), colors: &[Color]) -> Self {
        self.push(start, end, StyleCommand::RowBackgrounds(colors.to_vec()))
    }

    pub fn text_color(self, start: (i32, i32), end: (i32, i32), color: Color) -> Self {
        self.push(start, end, StyleCommand::TextColor(color))
    }

    pub fn font(self, start: (i32, i32), end: (i32, i32), font: StandardFont) -> Self {
        self.push(start, end, StyleCommand::Font(font))
    }

    pub fn font_size(self, start: (i32, i32), end: (i32, i32), size: f32) -> Self {
        self.push(start, end, StyleCommand::FontSize(Pt::from_f32(size)))
    }

    pub fn top_padding(self, start: (i32, i32), end: (i32, i32), padding: f32) -> Self {
        self.push(start, end, StyleCommand::Padding(Side::Top, Pt::from_f32(padding)))
    }

    pub fn right_padding(self, start: (i32, i32), end: (i32, i32), padding: f32) -> Self {
        self.push(start, end, StyleCommand::Padding(Side::Right, Pt::from_f32(padding)))
    }

    pub fn bottom_padding(self, start: (i32, i32), end: (i32, i32), padding: f32) -> Self {
        self.push(start, end, StyleCommand::Padding(Side::Bottom, Pt::from_f32(padding)))
    }

    pub fn left_padding(self, start: (i32, i32), end: (i32, i32), padding: f32) -> Self {
        self.push(start, end, StyleCommand::Padding(Side::Left, Pt::from_f32(padding)))
    }

    pub fn padding(self, start: (i32, i32), end: (i32, i32), padding: f32) -> Self {
        self.top_padding(start, end, padding)
            .right_padding(start, end, padding)
            .bottom_padding(start, end, padding)
            .left_padding(start, end, padding)
    }

    pub fn align(self, start: (i32, i32), end: (i32, i32), align: Alignment) -> Self {
        self.push(start, end, StyleCommand::Align(align))
    }

    pub fn valign(self, start: (i32, i32), end: (i32, i32), valign: VAlign) -> Self {
        self.push(start, end, StyleCommand::VAlign(valign))
    }

    pub fn line_below(self, start: (i32, i32), end: (i32, i32), width: f32, color: Color) -> Self {
        self.push(start, end, StyleCommand::Line(LineKind::Below, Pt::from_f32(width), color))
    }

    pub fn line_above(self, start: (i32, i32), end: (i32, i32), width: f32, color: Color) -> Self {
        self.push(start, end, StyleCommand::Line(LineKind::Above, Pt::from_f32(width), color))
    }

    pub fn line_before(self, start: (i32, i32), end: (i32, i32), width: f32, color: Color) -> Self {
        self.push(start, end, StyleCommand::Line(LineKind::Before, Pt::from_f32(width), color))
    }

    pub fn line_after(self, start: (i32, i32), end: (i32, i32), width: f32, color: Color) -> Self {
        self.push(start, end, StyleCommand::Line(LineKind::After, Pt::from_f32(width), color))
    }

    /// Outline around the range.
    pub fn outline(self, start: (i32, i32), end: (i32, i32), width: f32, color: Color) -> Self {
        self.push(start, end, StyleCommand::Line(LineKind::Box, Pt::from_f32(width), color))
    }

    /// Clips cell backgrounds to a rounded rectangle around the whole table.
    pub fn rounded_corners(self, radius: f32) -> Self {
        self.push((0, 0), (-1, -1), StyleCommand::RoundedCorners(Pt::from_f32(radius)))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CellStyle {
    background: Option<Color>,
    text_color: Color,
    font: StandardFont,
    font_size: Pt,
    padding: EdgeSizes,
    align: Alignment,
    valign: VAlign,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            background: None,
            text_color: Color::BLACK,
            font: StandardFont::Helvetica,
            font_size: Pt::from_f32(10.0),
            padding: EdgeSizes::new(3.0, 6.0, 3.0, 6.0),
            align: Alignment::Left,
            valign: VAlign::Bottom,
        }
    }
}

impl CellStyle {
    fn leading(&self) -> Pt {
        self.font_size.mul_ratio(6, 5)
    }
}

// Border edges keyed by (horizontal, line index, cell index along the line).
type EdgeKey = (bool, usize, usize);

#[derive(Debug, Default)]
struct RowHeightCache {
    entries: Vec<(i64, Arc<Vec<Pt>>)>,
}

impl RowHeightCache {
    fn get(&self, key: i64) -> Option<Arc<Vec<Pt>>> {
        self.entries
            .iter()
            .find_map(|(k, v)| if *k == key { Some(v.clone()) } else { None })
    }

    fn insert(&mut self, key: i64, value: Arc<Vec<Pt>>) {
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, value));
        const MAX_ENTRIES: usize = 8;
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
    }
}

#[derive(Debug, Clone)]
struct TableData {
    rows: Vec<Vec<Cell>>,
    styles: Vec<Vec<CellStyle>>,
    edges: BTreeMap<EdgeKey, (Pt, Color)>,
    columns: usize,
    col_widths: Option<Vec<Pt>>,
    row_heights: Vec<Option<Pt>>,
    corner_radius: Option<Pt>,
    repeat_rows: usize,
    height_cache: Arc<Mutex<RowHeightCache>>,
}

impl TableData {
    fn column_widths(&self, avail_width: Pt) -> Vec<Pt> {
        match &self.col_widths {
            Some(widths) => widths.clone(),
            None => vec![avail_width / self.columns as i32; self.columns],
        }
    }

    fn row_heights(&self, col_widths: &[Pt]) -> Arc<Vec<Pt>> {
        let key = col_widths.iter().sum::<Pt>().to_milli_i64();
        if let Some(heights) = self.height_cache.lock().ok().and_then(|cache| cache.get(key)) {
            return heights;
        }
        let heights: Vec<Pt> = (0..self.rows.len())
            .map(|row| {
                self.row_heights[row].unwrap_or_else(|| {
                    (0..self.columns)
                        .map(|col| self.cell_height(row, col, col_widths[col]))
                        .fold(Pt::ZERO, Pt::max)
                })
            })
            .collect();
        let heights = Arc::new(heights);
        if let Ok(mut cache) = self.height_cache.lock() {
            cache.insert(key, heights.clone());
        }
        heights
    }

    fn content_size(&self, row: usize, col: usize, col_width: Pt) -> Size {
        let style = &self.styles[row][col];
        let inner = (col_width - style.padding.horizontal()).max(Pt::ZERO);
        match &self.rows[row][col] {
            Cell::Text(text) => {
                let lines = text.split('\n').count() as i32;
                let width = text
                    .split('\n')
                    .map(|line| style.font.string_width(style.font_size, line))
                    .fold(Pt::ZERO, Pt::max);
                Size::new(width, style.leading() * lines)
            }
            Cell::Flowable(flowable) => flowable.wrap(inner, Pt::from_f32(100_000.0)),
        }
    }

    fn cell_height(&self, row: usize, col: usize, col_width: Pt) -> Pt {
        let style = &self.styles[row][col];
        self.content_size(row, col, col_width).height + style.padding.vertical()
    }

    fn apply(&mut self, range: CellRange, command: &StyleCommand) -> Result<()> {
        let Some((cols, rows)) = self.resolve(range)? else {
            return Ok(());
        };
        match command {
            StyleCommand::RoundedCorners(radius) => {
                self.corner_radius = Some(*radius);
            }
            StyleCommand::Line(kind, width, color) => {
                self.apply_line(*kind, cols, rows, *width, *color);
            }
            StyleCommand::RowBackgrounds(colors) => {
                if colors.is_empty() {
                    return Ok(());
                }
                for (offset, row) in rows.clone().enumerate() {
                    let color = colors[offset % colors.len()];
                    for col in cols.clone() {
                        self.styles[row][col].background = Some(color);
                    }
                }
            }
            other => {
                for row in rows.clone() {
                    for col in cols.clone() {
                        let style = &mut self.styles[row][col];
                        match other {
                            StyleCommand::Background(color) => style.background = Some(*color),
                            StyleCommand::TextColor(color) => style.text_color = *color,
                            StyleCommand::Font(font) => style.font = *font,
                            StyleCommand::FontSize(size) => style.font_size = *size,
                            StyleCommand::Padding(side, value) => match side {
                                Side::Top => style.padding.top = *value,
                                Side::Right => style.padding.right = *value,
                                Side::Bottom => style.padding.bottom = *value,
                                Side::Left => style.padding.left = *value,
                            },
                            StyleCommand::Align(align) => style.align = *align,
                            StyleCommand::VAlign(valign) => style.valign = *valign,
                            StyleCommand::RowBackgrounds(_)
                            | StyleCommand::Line(..)
                            | StyleCommand::RoundedCorners(_) => {}
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_line(
        &mut self,
        kind: LineKind,
        cols: Range<usize>,
        rows: Range<usize>,
        width: Pt,
        color: Color,
    ) {
        let mut set = |key: EdgeKey| {
            self.edges.insert(key, (width, color));
        };
        match kind {
            LineKind::Below | LineKind::Above => {
                for row in rows.clone() {
                    let line = if kind == LineKind::Below { row + 1 } else { row };
                    for col in cols.clone() {
                        set((true, line, col));
                    }
                }
            }
            LineKind::Before | LineKind::After => {
                for col in cols.clone() {
                    let line = if kind == LineKind::After { col + 1 } else { col };
                    for row in rows.clone() {
                        set((false, line, row));
                    }
                }
            }
            LineKind::Box => {
                for col in cols.clone() {
                    set((true, rows.start, col));
                    set((true, rows.end, col));
                }
                for row in rows.clone() {
                    set((false, cols.start, row));
                    set((false, cols.end, row));
                }
            }
        }
    }

    fn resolve(&self, range: CellRange) -> Result<Option<(Range<usize>, Range<usize>)>> {
        let cols = resolve_axis(range.start.0, range.end.0, self.columns, "column")?;
        let rows = resolve_axis(range.start.1, range.end.1, self.rows.len(), "row")?;
        Ok(cols.zip(rows))
    }
}

fn resolve_axis(start: i32, end: i32, len: usize, axis: &str) -> Result<Option<Range<usize>>> {
    let n = len as i64;
    let fix = |idx: i32| {
        let idx = idx as i64;
        if idx < 0 { n + idx } else { idx }
    };
    let (lo, hi) = (fix(start), fix(end));
    if lo > hi {
        return Ok(None);
    }
    if lo < 0 || hi >= n {
        return Err(DocError::InvalidTable(format!(
            "{axis} range {start}..={end} is outside 0..{len}"
        )));
    }
    Ok(Some(lo as usize..hi as usize + 1))
}

/// A grid of cells with per-cell styling, splittable between rows.
#[derive(Debug, Clone)]
pub struct Table {
    data: Arc<TableData>,
    body: Range<usize>,
    show_header: bool,
    pagination: Pagination,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(DocError::InvalidTable("table has no cells".to_string()));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != columns) {
            return Err(DocError::InvalidTable(format!(
                "row {idx} has {} cells, expected {columns}",
                row.len()
            )));
        }
        let count = rows.len();
        Ok(Self {
            data: Arc::new(TableData {
                styles: vec![vec![CellStyle::default(); columns]; count],
                rows,
                edges: BTreeMap::new(),
                columns,
                col_widths: None,
                row_heights: vec![None; count],
                corner_radius: None,
                repeat_rows: 0,
                height_cache: Arc::new(Mutex::new(RowHeightCache::default())),
            }),
            body: 0..count,
            show_header: false,
            pagination: Pagination::default(),
        })
    }

    fn data_mut(&mut self) -> &mut TableData {
        let data = Arc::make_mut(&mut self.data);
        data.height_cache = Arc::new(Mutex::new(RowHeightCache::default()));
        data
    }

    pub fn with_col_widths(mut self, widths: Vec<Pt>) -> Result<Self> {
        if widths.len() != self.data.columns {
            return Err(DocError::InvalidTable(format!(
                "{} column widths for {} columns",
                widths.len(),
                self.data.columns
            )));
        }
        if widths.iter().any(|w| *w < Pt::ZERO) {
            return Err(DocError::InvalidTable("negative column width".to_string()));
        }
        self.data_mut().col_widths = Some(widths);
        Ok(self)
    }

    pub fn with_row_heights(mut self, heights: Vec<Option<Pt>>) -> Result<Self> {
        if heights.len() != self.data.rows.len() {
            return Err(DocError::InvalidTable(format!(
                "{} row heights for {} rows",
                heights.len(),
                self.data.rows.len()
            )));
        }
        self.data_mut().row_heights = heights;
        Ok(self)
    }

    pub fn with_style(mut self, style: TableStyle) -> Result<Self> {
        let data = self.data_mut();
        for (range, command) in &style.commands {
            data.apply(*range, command)?;
        }
        Ok(self)
    }

    /// Leading rows repeated at the top of every continuation.
    pub fn with_repeat_rows(mut self, rows: usize) -> Self {
        let count = self.data.rows.len();
        self.data_mut().repeat_rows = rows.min(count);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn row_count(&self) -> usize {
        self.body.len()
    }

    pub fn column_count(&self) -> usize {
        self.data.columns
    }

    fn displayed_rows(&self) -> Vec<usize> {
        let mut rows = Vec::with_capacity(self.body.len() + self.data.repeat_rows);
        if self.show_header {
            rows.extend(0..self.data.repeat_rows);
        }
        rows.extend(self.body.clone());
        rows
    }

    fn part(&self, body: Range<usize>, show_header: bool) -> Table {
        Table {
            data: self.data.clone(),
            body,
            show_header,
            pagination: self.pagination,
        }
    }

    fn draw_cell(&self, canvas: &mut Canvas, row: usize, col: usize, x: Pt, y: Pt, width: Pt, height: Pt) {
        let style = &self.data.styles[row][col];
        let inner_x = x + style.padding.left;
        let inner_w = (width - style.padding.horizontal()).max(Pt::ZERO);
        let inner_top = y + style.padding.top;
        let inner_h = (height - style.padding.vertical()).max(Pt::ZERO);
        let content = self.data.content_size(row, col, width);
        let top = match style.valign {
            VAlign::Top => inner_top,
            VAlign::Middle => inner_top + (inner_h - content.height).mul_ratio(1, 2),
            VAlign::Bottom => inner_top + inner_h - content.height,
        };
        match &self.data.rows[row][col] {
            Cell::Text(text) => {
                canvas.set_fill_color(style.text_color);
                canvas.set_font(style.font, style.font_size);
                let leading = style.leading();
                let offset = font::centered_baseline(leading, style.font_size);
                for (idx, line) in text.split('\n').enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    let baseline = top + leading * idx as i32 + offset;
                    match style.align {
                        Alignment::Center => {
                            canvas.draw_centred_string(inner_x + inner_w.mul_ratio(1, 2), baseline, line)
                        }
                        Alignment::Right => canvas.draw_right_string(inner_x + inner_w, baseline, line),
                        Alignment::Left | Alignment::Justify => {
                            canvas.draw_string(inner_x, baseline, line)
                        }
                    }
                }
            }
            Cell::Flowable(flowable) => {
                flowable.draw(canvas, inner_x, top, inner_w, content.height);
            }
        }
    }
}

impl Flowable for Table {
    fn wrap(&self, avail_width: Pt, _avail_height: Pt) -> Size {
        let col_widths = self.data.column_widths(avail_width);
        let heights = self.data.row_heights(&col_widths);
        Size {
            width: col_widths.iter().sum(),
            height: self.displayed_rows().iter().map(|row| heights[*row]).sum(),
        }
    }

    fn split(
        &self,
        avail_width: Pt,
        avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        let col_widths = self.data.column_widths(avail_width);
        let heights = self.data.row_heights(&col_widths);
        let header_rows = if self.show_header {
            self.data.repeat_rows
        } else {
            0
        };
        let mut used: Pt = (0..header_rows).map(|row| heights[row]).sum();
        let mut taken = 0usize;
        for row in self.body.clone() {
            if used + heights[row] > avail_height {
                break;
            }
            used += heights[row];
            taken += 1;
        }
        // The first part must carry at least one row beyond the repeated header.
        let min_taken = if self.body.start < self.data.repeat_rows {
            self.data.repeat_rows - self.body.start + 1
        } else {
            1
        };
        if taken < min_taken || taken >= self.body.len() {
            return None;
        }
        let cut = self.body.start + taken;
        let first = self.part(self.body.start..cut, self.show_header);
        let second = self.part(cut..self.body.end, self.data.repeat_rows > 0);
        Some((Box::new(first), Box::new(second)))
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, avail_width: Pt, _avail_height: Pt) {
        let col_widths = self.data.column_widths(avail_width);
        let heights = self.data.row_heights(&col_widths);
        let table_width: Pt = col_widths.iter().sum();
        // Centred; a table wider than the frame overhangs both edges equally.
        let left = x + (avail_width - table_width).mul_ratio(1, 2);
        let rows = self.displayed_rows();

        let mut col_x = Vec::with_capacity(col_widths.len() + 1);
        let mut cursor = left;
        for width in &col_widths {
            col_x.push(cursor);
            cursor += *width;
        }
        col_x.push(cursor);
        let mut row_y = Vec::with_capacity(rows.len() + 1);
        let mut cursor = y;
        for row in &rows {
            row_y.push(cursor);
            cursor += heights[*row];
        }
        row_y.push(cursor);
        let table_height = cursor - y;

        let clip = self.data.corner_radius.filter(|r| *r > Pt::ZERO);
        if let Some(radius) = clip {
            canvas.save_state();
            canvas.rounded_rect_path(left, y, table_width, table_height, radius);
            canvas.clip_path();
        }
        for (slot, row) in rows.iter().enumerate() {
            for col in 0..self.data.columns {
                if let Some(color) = self.data.styles[*row][col].background {
                    canvas.set_fill_color(color);
                    canvas.draw_rect(col_x[col], row_y[slot], col_widths[col], heights[*row]);
                }
            }
        }
        if clip.is_some() {
            canvas.restore_state();
        }

        for (slot, row) in rows.iter().enumerate() {
            for col in 0..self.data.columns {
                self.draw_cell(
                    canvas,
                    *row,
                    col,
                    col_x[col],
                    row_y[slot],
                    col_widths[col],
                    heights[*row],
                );
            }
        }

        for (&(horizontal, line, along), &(width, color)) in &self.data.edges {
            if horizontal {
                if along >= self.data.columns {
                    continue;
                }
                let y = rows
                    .iter()
                    .position(|row| *row == line)
                    .map(|slot| row_y[slot])
                    .or_else(|| {
                        rows.iter()
                            .position(|row| *row + 1 == line)
                            .map(|slot| row_y[slot + 1])
                    });
                if let Some(y) = y {
                    canvas.set_stroke_color(color);
                    canvas.set_line_width(width);
                    canvas.line(col_x[along], y, col_x[along + 1], y);
                }
            } else if let Some(slot) = rows.iter().position(|row| *row == along) {
                if line >= col_x.len() {
                    continue;
                }
                canvas.set_stroke_color(color);
                canvas.set_line_width(width);
                canvas.line(col_x[line], row_y[slot], col_x[line], row_y[slot + 1]);
            }
        }
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn debug_name(&self) -> &'static str {
        "Table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::types::Size as PageSize;

    fn grid(rows: usize, cols: usize) -> Vec<Vec<Cell>> {
        (0..rows)
            .map(|r| (0..cols).map(|c| Cell::from(format!("r{r}c{c}"))).collect())
            .collect()
    }

    #[test]
    fn row_heights_cache_keeps_only_recent_widths() {
        let table = Table::new(grid(3, 2)).expect("table");
        for width in 0..20 {
            let w = Pt::from_f32(100.0 + width as f32);
            table.wrap(w, Pt::from_f32(500.0));
        }
        let cache = table.data.height_cache.lock().expect("cache");
        assert_eq!(cache.entries.len(), 8);
        let newest = Pt::from_f32(119.0).to_milli_i64();
        assert!(cache.get(newest).is_some());
        assert!(cache.get(Pt::from_f32(100.0).to_milli_i64()).is_none());
    }

    #[test]
    fn ragged_rows_and_bad_widths_are_rejected() {
        let mut rows = grid(2, 3);
        rows[1].pop();
        assert!(matches!(Table::new(rows), Err(DocError::InvalidTable(_))));
        assert!(matches!(Table::new(Vec::new()), Err(DocError::InvalidTable(_))));
        let table = Table::new(grid(2, 3)).expect("table");
        assert!(table.with_col_widths(vec![Pt::from_f32(10.0)]).is_err());
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let style = TableStyle::new().background((0, -1), (-1, -1), Color::WHITE);
        let table = Table::new(grid(3, 2))
            .expect("table")
            .with_style(style)
            .expect("style");
        assert_eq!(table.data.styles[2][1].background, Some(Color::WHITE));
        assert_eq!(table.data.styles[1][1].background, None);
    }

    #[test]
    fn inverted_ranges_are_empty_and_out_of_range_is_an_error() {
        // (0,1)..(-1,0) on a one-row table resolves to rows 1..=0.
        let style = TableStyle::new().background((0, 1), (-1, -1), Color::WHITE);
        assert!(Table::new(grid(1, 2)).expect("table").with_style(style).is_ok());
        let style = TableStyle::new().background((0, 0), (5, 0), Color::WHITE);
        assert!(matches!(
            Table::new(grid(1, 2)).expect("table").with_style(style),
            Err(DocError::InvalidTable(_))
        ));
    }

    #[test]
    fn later_commands_win_and_row_bands_cycle() {
        let light = Color::from_rgb8(0xf7, 0xfa, 0xfc);
        let style = TableStyle::new()
            .background((0, 0), (-1, -1), Color::BLACK)
            .row_backgrounds((0, 1), (-1, -1), &[Color::WHITE, light])
            .font_size((0, 0), (-1, 0), 9.0)
            .font_size((0, 0), (0, 0), 12.0);
        let table = Table::new(grid(4, 2))
            .expect("table")
            .with_style(style)
            .expect("style");
        let s = &table.data.styles;
        assert_eq!(s[0][0].background, Some(Color::BLACK));
        assert_eq!(s[1][0].background, Some(Color::WHITE));
        assert_eq!(s[2][1].background, Some(light));
        assert_eq!(s[3][0].background, Some(Color::WHITE));
        assert_eq!(s[0][0].font_size, Pt::from_f32(12.0));
        assert_eq!(s[0][1].font_size, Pt::from_f32(9.0));
    }

    #[test]
    fn row_height_is_text_lines_plus_padding() {
        let table = Table::new(vec![vec![Cell::from("one\ntwo"), Cell::from("x")]]).expect("table");
        let size = table.wrap(Pt::from_f32(200.0), Pt::from_f32(500.0));
        // Two 12pt lines plus 3pt top and bottom padding.
        assert_eq!(size.height, Pt::from_f32(30.0));
        assert_eq!(size.width, Pt::from_f32(200.0));
    }

    #[test]
    fn splits_between_rows_and_repeats_the_header() {
        let table = Table::new(grid(5, 2))
            .expect("table")
            .with_repeat_rows(1);
        // Each row is 12 + 6 = 18pt.
        let (first, second) = table
            .split(Pt::from_f32(200.0), Pt::from_f32(40.0))
            .expect("split");
        assert_eq!(first.wrap(Pt::from_f32(200.0), Pt::ZERO).height, Pt::from_f32(36.0));
        // Header plus the three remaining rows.
        assert_eq!(second.wrap(Pt::from_f32(200.0), Pt::ZERO).height, Pt::from_f32(72.0));
        // A header alone is not a valid first part.
        assert!(table.split(Pt::from_f32(200.0), Pt::from_f32(20.0)).is_none());
    }

    #[test]
    fn narrow_tables_are_centred() {
        let table = Table::new(grid(1, 1))
            .expect("table")
            .with_col_widths(vec![Pt::from_f32(100.0)])
            .expect("widths")
            .with_style(TableStyle::new().background((0, 0), (-1, -1), Color::WHITE))
            .expect("style");
        let mut canvas = Canvas::new(PageSize::letter());
        table.draw(
            &mut canvas,
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(300.0),
            Pt::from_f32(100.0),
        );
        let doc = canvas.finish();
        let rect = doc.pages[0].commands.iter().find_map(|cmd| match cmd {
            Command::DrawRect { x, .. } => Some(*x),
            _ => None,
        });
        assert_eq!(rect, Some(Pt::from_f32(100.0)));
    }

    #[test]
    fn wide_tables_overhang_evenly() {
        let table = Table::new(grid(1, 1))
            .expect("table")
            .with_col_widths(vec![Pt::from_f32(468.0)])
            .expect("widths")
            .with_style(TableStyle::new().background((0, 0), (-1, -1), Color::WHITE))
            .expect("style");
        let mut canvas = Canvas::new(PageSize::letter());
        table.draw(
            &mut canvas,
            Pt::from_f32(60.0),
            Pt::ZERO,
            Pt::from_f32(456.0),
            Pt::from_f32(100.0),
        );
        let doc = canvas.finish();
        let rect = doc.pages[0].commands.iter().find_map(|cmd| match cmd {
            Command::DrawRect { x, .. } => Some(*x),
            _ => None,
        });
        assert_eq!(rect, Some(Pt::from_f32(54.0)));
    }

    #[test]
    fn rounded_corners_clip_the_backgrounds() {
        let table = Table::new(grid(2, 1))
            .expect("table")
            .with_style(
                TableStyle::new()
                    .background((0, 0), (-1, -1), Color::BLACK)
                    .line_below((0, 0), (-1, 0), 0.5, Color::WHITE)
                    .rounded_corners(5.0),
            )
            .expect("style");
        let mut canvas = Canvas::new(PageSize::letter());
        table.draw(
            &mut canvas,
            Pt::ZERO,
            Pt::ZERO,
            Pt::from_f32(200.0),
            Pt::from_f32(100.0),
        );
        let commands = canvas.finish().pages.remove(0).commands;
        let clip = commands.iter().position(|c| matches!(c, Command::ClipPath));
        let fill = commands.iter().position(|c| matches!(c, Command::DrawRect { .. }));
        let stroke = commands.iter().position(|c| matches!(c, Command::Stroke));
        assert!(clip < fill && fill < stroke, "{commands:?}");
    }
}
