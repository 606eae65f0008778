//! The three PopTop documents: literal content, styles and page decoration.

mod business_plan;
mod execution_plan;
mod execution_plan_v2;

use crate::canvas::Canvas;
use crate::doc_context::DocContext;
use crate::doc_template::DocTemplate;
use crate::error::{DocError, Result};
use crate::flowable::Flowable;
use crate::font::StandardFont;
use crate::page_template::OnPageCallback;
use crate::style::StyleSheet;
use crate::theme;
use crate::types::{Margins, Pt, Size, inch};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const PAGE_MARGIN_IN: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    BusinessPlan,
    ExecutionPlan,
    ExecutionPlanV2,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::BusinessPlan,
        DocumentKind::ExecutionPlan,
        DocumentKind::ExecutionPlanV2,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            DocumentKind::BusinessPlan => "business-plan",
            DocumentKind::ExecutionPlan => "execution-plan",
            DocumentKind::ExecutionPlanV2 => "execution-plan-v2",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DocumentKind::BusinessPlan => "PopTop-Business-Plan-v1.pdf",
            DocumentKind::ExecutionPlan => "PopTop-Execution-Plan-v1.pdf",
            DocumentKind::ExecutionPlanV2 => "PopTop-Execution-Plan-v2.pdf",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::BusinessPlan => "PopTop Business Plan",
            DocumentKind::ExecutionPlan => "PopTop Execution Plan",
            DocumentKind::ExecutionPlanV2 => "PopTop Execution Plan v2.1",
        }
    }

    pub fn subject(self) -> &'static str {
        match self {
            DocumentKind::BusinessPlan => "The Centerpiece of Your Tailgate",
            DocumentKind::ExecutionPlan => "NPI to RTM: Comprehensive Roadmap",
            DocumentKind::ExecutionPlanV2 => "NPI to RTM: Aggressive Reset Roadmap v2.1",
        }
    }

    pub fn styles(self) -> Result<StyleSheet> {
        match self {
            DocumentKind::BusinessPlan => business_plan::styles(),
            DocumentKind::ExecutionPlan => execution_plan::styles(),
            DocumentKind::ExecutionPlanV2 => execution_plan_v2::styles(),
        }
    }

    pub fn story(self, styles: &StyleSheet) -> Result<Vec<Box<dyn Flowable>>> {
        match self {
            DocumentKind::BusinessPlan => business_plan::story(styles),
            DocumentKind::ExecutionPlan => execution_plan::story(styles),
            DocumentKind::ExecutionPlanV2 => execution_plan_v2::story(styles),
        }
    }

    /// Letter paper with 0.75 in margins and this document's page callbacks.
    pub fn doc_template(self) -> DocTemplate {
        let (first, later) = match self {
            DocumentKind::BusinessPlan => (
                Arc::new(business_plan::draw_cover) as OnPageCallback,
                page_number_callback(1),
            ),
            DocumentKind::ExecutionPlan | DocumentKind::ExecutionPlanV2 => {
                (page_number_callback(0), page_number_callback(0))
            }
        };
        DocTemplate::simple(
            Size::letter(),
            Margins::all_inches(PAGE_MARGIN_IN),
            Some(first),
            Some(later),
        )
    }

    /// Styles, story and template in one step.
    pub fn assemble(self) -> Result<DocTemplate> {
        let styles = self.styles()?;
        let story = self.story(&styles)?;
        let mut template = self.doc_template();
        template.extend(story);
        Ok(template)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DocumentKind {
    type Err = DocError;

    fn from_str(value: &str) -> Result<Self> {
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == value)
            .ok_or_else(|| {
                DocError::InvalidConfiguration(format!(
                    "unknown document {value:?} (expected one of: business-plan, execution-plan, execution-plan-v2)"
                ))
            })
    }
}

/// Centred page number 0.5 in above the bottom edge, shifted down by `offset`
/// so an unnumbered cover does not count.
fn page_number_callback(offset: usize) -> OnPageCallback {
    Arc::new(move |canvas: &mut Canvas, ctx: &DocContext| {
        draw_page_number(canvas, ctx, offset);
    })
}

pub(crate) fn draw_page_number(canvas: &mut Canvas, ctx: &DocContext, offset: usize) {
    let Some(number) = ctx.page_number.checked_sub(offset).filter(|n| *n > 0) else {
        return;
    };
    canvas.save_state();
    canvas.set_font(StandardFont::Helvetica, Pt::from_f32(9.0));
    canvas.set_fill_color(theme::TEXT_LIGHT);
    canvas.draw_centred_string(
        ctx.page_size.width.mul_ratio(1, 2),
        ctx.page_size.height - inch(0.5),
        &number.to_string(),
    );
    canvas.restore_state();
}
