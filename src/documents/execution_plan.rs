use crate::error::Result;
use crate::factories::{TableSpec, data_table, highlight_box, meta_table};
use crate::flowable::Flowable;
use crate::font::StandardFont;
use crate::story::StoryBuilder;
use crate::style::{Alignment, ParagraphStyle, StyleSheet};
use crate::theme;

const CELL_PADDING: f32 = 6.0;
const TASK_WIDTHS: [f32; 3] = [3.5, 1.5, 1.5];

pub(super) fn styles() -> Result<StyleSheet> {
    let mut styles = StyleSheet::sample();
    styles.add(
        ParagraphStyle::new("DocTitle")
            .with_font(StandardFont::HelveticaBold)
            .with_font_size(28.0)
            .with_text_color(theme::PRIMARY)
            .with_alignment(Alignment::Center)
            .with_space_after(15.0)
            .with_leading(34.0),
    )?;
    styles.add(
        ParagraphStyle::new("DocSubtitle")
            .with_font_size(14.0)
            .with_text_color(theme::TEXT_LIGHT)
            .with_alignment(Alignment::Center)
            .with_space_before(10.0)
            .with_space_after(25.0)
            .with_leading(18.0),
    )?;
    styles.add(
        ParagraphStyle::new("SectionHeader")
            .with_font(StandardFont::HelveticaBold)
            .with_font_size(16.0)
            .with_text_color(theme::PRIMARY)
            .with_space_before(20.0)
            .with_space_after(10.0),
    )?;
    styles.add(
        ParagraphStyle::new("SubSection")
            .with_font(StandardFont::HelveticaBold)
            .with_font_size(12.0)
            .with_text_color(theme::SECONDARY)
            .with_space_before(15.0)
            .with_space_after(8.0),
    )?;
    styles.add(
        ParagraphStyle::new("Body")
            .with_text_color(theme::TEXT)
            .with_space_before(4.0)
            .with_space_after(4.0)
            .with_leading(14.0),
    )?;
    styles.add(
        ParagraphStyle::new("BulletItem")
            .with_text_color(theme::TEXT)
            .with_left_indent(20.0)
            .with_space_before(2.0)
            .with_space_after(2.0),
    )?;
    Ok(styles)
}

pub(super) fn task_table(story: &mut StoryBuilder<'_>, rows: &[&[&str]]) -> Result<()> {
    table(
        story,
        TableSpec::new(&["Task", "Owner", "Target"], rows).with_widths_in(&TASK_WIDTHS),
    )
}

pub(super) fn table(story: &mut StoryBuilder<'_>, spec: TableSpec) -> Result<()> {
    story.push(data_table(&spec, CELL_PADDING)?);
    Ok(())
}

pub(super) fn gate(story: &mut StoryBuilder<'_>, space: f32, text: &str) -> Result<()> {
    story.spacer(space).para("Body", text)?;
    Ok(())
}

pub(super) fn story(styles: &StyleSheet) -> Result<Vec<Box<dyn Flowable>>> {
    let mut story = StoryBuilder::new(styles);

    story
        .para("DocTitle", "PopTop Execution Plan")?
        .para("DocSubtitle", "NPI to RTM: Comprehensive Roadmap")?;
    story.push(meta_table(&[
        ["Version: 1.0", "Date: January 2025"],
        ["Target RTM: Summer 2025", "Document Owner: Paul Giarrizzo"],
    ])?);
    story
        .spacer(20.0)
        .para("SectionHeader", "Team Roster &amp; Responsibilities")?;
    table(
        &mut story,
        TableSpec::new(
            &["Name", "Role", "Primary Responsibilities"],
            &[
                &["Alex Munn", "Co-Founder / Equity", "Strategic decisions, capital allocation"],
                &["Ross Munn", "Co-Founder / Equity", "Manufacturing sourcing, supplier relationships"],
                &["Paul Giarrizzo", "Business Lead", "Execution driver, biz dev, licensing, GTM"],
                &["Brian Williams", "Engineer", "SolidWorks CAD, prototyping, 3D printing, DFM"],
                &["Nathan Childress", "Operations", "Task execution, support across workstreams"],
            ],
        )
        .with_widths_in(&[1.5, 1.5, 3.5]),
    )?;
    story.spacer(15.0);
    story.push(highlight_box(
        "<b>Critical Path:</b> Design Freeze \u{2192} Prototype Validation \u{2192} Licensing Approval \
         \u{2192} Production \u{2192} Launch",
        styles,
    )?);
    story.page_break();

    design_and_prototyping(&mut story)?;
    brand_and_ip(&mut story)?;
    manufacturing(&mut story)?;
    licensing(&mut story)?;
    go_to_market(&mut story)?;
    launch(&mut story)?;
    engineering_scope(&mut story)?;
    budget_and_metrics(&mut story)?;
    next_steps(&mut story)?;

    story.spacer(30.0);
    story.push(highlight_box(
        "<i>\"The best time to plant a tree was 20 years ago. The second best time is now.\"</i>\
         <br/><br/><b>Let's build something great.</b>",
        styles,
    )?);
    Ok(story.finish())
}

fn design_and_prototyping(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 1: Design &amp; Prototyping (Weeks 1-8)")?
        .para("Body", "<b>Owners:</b> Brian Williams + Paul Giarrizzo")?
        .para("SubSection", "1.1 CAD Design Completion")?;
    task_table(
        story,
        &[
            &["Finalize V1 dimensions & capacity", "Brian", "Week 2"],
            &["Complete SolidWorks assembly", "Brian", "Week 3"],
            &["Design dispensing mechanism", "Brian", "Week 4"],
            &["Design modular branding panels", "Brian", "Week 5"],
            &["DFM review", "Brian + Ross", "Week 6"],
            &["Create technical drawings package", "Brian", "Week 7"],
        ],
    )?;
    story.para("SubSection", "1.2 Prototyping")?;
    task_table(
        story,
        &[
            &["Print prototype V1 (4x4' printer)", "Brian", "Week 4"],
            &["Functional testing", "Brian + Paul", "Week 5"],
            &["Iterate based on testing", "Brian", "Week 6"],
            &["Print prototype V2 (refined)", "Brian", "Week 7"],
            &["Final validation testing", "Team", "Week 8"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 1 Gate:</b> Design freeze approval by all stakeholders",
    )?;
    story.page_break();
    Ok(())
}

fn brand_and_ip(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 2: Brand Identity &amp; IP (Weeks 2-10)")?
        .para("Body", "<b>Owner:</b> Paul Giarrizzo")?
        .para("SubSection", "2.1 Trademark &amp; Brand")?;
    task_table(
        story,
        &[
            &["Finalize 'PopTop' name decision", "Team", "Week 2"],
            &["Trademark search (USPTO)", "Paul", "Week 3"],
            &["File trademark application", "Paul / Jeff Johnson", "Week 4"],
            &["Logo design (3 concepts)", "Paul", "Week 4"],
            &["Logo selection & refinement", "Team", "Week 5"],
            &["Brand style guide creation", "Paul", "Week 6"],
            &["Register domain", "Paul", "Week 3"],
            &["Secure social media handles", "Paul", "Week 3"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 2 Gate:</b> Trademark filed, logo approved, brand guide complete",
    )
}

fn manufacturing(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 3: Manufacturing &amp; Supply Chain (Weeks 6-16)")?
        .para("Body", "<b>Owners:</b> Ross Munn + Brian Williams")?
        .para("SubSection", "3.1 Supplier &amp; Production")?;
    task_table(
        story,
        &[
            &["Identify 3-5 potential manufacturers", "Ross", "Week 6"],
            &["Send RFQ with tech drawings", "Ross + Brian", "Week 8"],
            &["Evaluate quotes & capabilities", "Ross + Paul", "Week 10"],
            &["Select primary manufacturer", "Team", "Week 11"],
            &["Tooling deposit & kick-off", "Paul", "Week 12"],
            &["First article inspection (T1)", "Brian + Ross", "Week 16"],
            &["T1 approval / modifications", "Brian", "Week 17"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 3 Gate:</b> T1 samples approved, production order confirmed",
    )?;
    story.page_break();
    Ok(())
}

fn licensing(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 4: Licensing (Weeks 4-20)")?
        .para("Body", "<b>Owner:</b> Paul Giarrizzo")?
        .para("SubSection", "4.1 CLC / Fanatics Engagement")?;
    task_table(
        story,
        &[
            &["Research CLC application process", "Paul", "Week 4"],
            &["Prepare licensee application", "Paul", "Week 6"],
            &["Submit CLC application", "Paul", "Week 8"],
            &["Follow-up & provide samples", "Paul", "Week 10-14"],
            &["Receive approval (est.)", "Paul", "Week 16-18"],
        ],
    )?;
    story.para("SubSection", "4.2 School Selection Strategy")?;
    table(
        story,
        TableSpec::new(
            &["Priority", "Schools", "Rationale"],
            &[
                &["Tier 1", "Indiana, Purdue, Notre Dame", "Home state, network access"],
                &["Tier 2", "Ohio State, Michigan, Alabama", "Large fanbases, tailgate culture"],
                &["Tier 3", "SEC schools (LSU, Georgia)", "Premium tailgate market"],
            ],
        )
        .with_widths_in(&[1.0, 2.75, 2.75]),
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 4 Gate:</b> CLC approval + at least 3 school licenses secured",
    )
}

fn go_to_market(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 5: Go-To-Market Prep (Weeks 14-22)")?
        .para("Body", "<b>Owners:</b> Paul Giarrizzo + Nathan Childress")?;
    task_table(
        story,
        &[
            &["Shopify store setup", "Paul", "Week 14"],
            &["Email capture / waitlist", "Paul", "Week 14"],
            &["Payment processing (Stripe)", "Paul", "Week 16"],
            &["Social media content calendar", "Paul + Nathan", "Week 16"],
            &["Product photography", "Paul", "Week 18"],
            &["Launch campaign strategy", "Paul", "Week 18"],
            &["Pre-launch email sequence", "Paul", "Week 20"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 5 Gate:</b> Store live (pre-launch mode), marketing assets ready",
    )?;
    story.page_break();
    Ok(())
}

fn launch(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 6: Launch &amp; Operations (Weeks 20-26)")?
        .para("Body", "<b>Owner:</b> Full Team")?;
    task_table(
        story,
        &[
            &["Inventory received at 3PL", "Ross + Paul", "Week 20"],
            &["Final QC on first units", "Brian", "Week 20"],
            &["Soft launch (friends/family)", "Paul", "Week 21"],
            &["Public launch announcement", "Paul", "Week 22"],
            &["Social media push", "Nathan + Paul", "Week 22-24"],
            &["Customer service setup", "Nathan", "Week 22"],
            &["Weekly sales reporting", "Paul", "Ongoing"],
        ],
    )?;
    gate(
        story,
        15.0,
        "<b>Phase 6 Gate:</b> Successful launch, positive feedback, reorder trigger hit",
    )
}

fn engineering_scope(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .spacer(20.0)
        .para("SectionHeader", "Brian Williams: Engineering Scope Summary")?
        .para(
            "Body",
            "<b>Your Role:</b> Critical path owner for product development through RTM+6 months",
        )?
        .spacer(10.0)
        .para("SubSection", "Key Deliverables:")?
        .bullets(
            "BulletItem",
            &[
                "Complete SolidWorks CAD package",
                "Functional prototypes (V1, V2)",
                "Technical drawings for manufacturing",
                "DFM collaboration with manufacturer",
                "T1 sample validation",
                "Production quality support",
            ],
        )?
        .spacer(10.0)
        .para("SubSection", "Compensation (per Agreement):")?
        .bullets(
            "BulletItem",
            &[
                "Option A: 5% of net revenue for 5 years",
                "Option B: 5% of net revenue capped at $175,000",
            ],
        )?
        .page_break();
    Ok(())
}

fn budget_and_metrics(story: &mut StoryBuilder<'_>) -> Result<()> {
    story.para("SectionHeader", "Budget Estimates (High-Level)")?;
    table(
        story,
        TableSpec::new(
            &["Category", "Estimate", "Notes"],
            &[
                &["Tooling", "$15,000 - $40,000", "Depends on complexity"],
                &["First Production (500 units)", "$35,000 - $50,000", "~$70-100/unit"],
                &["Trademark Filing", "$1,500 - $3,000", "With attorney"],
                &["Licensing Fees", "$5,000 - $15,000", "CLC + school fees"],
                &["Marketing Launch", "$5,000 - $10,000", "Initial campaign"],
                &["E-commerce Setup", "$500 - $1,000", "Shopify + apps"],
                &["TOTAL ESTIMATED", "$62,000 - $119,000", "Phase 1-6"],
            ],
        )
        .with_widths_in(&[2.0, 1.75, 2.75]),
    )?;
    story.spacer(20.0).para("SectionHeader", "Success Metrics")?;
    table(
        story,
        TableSpec::new(
            &["Metric", "Target", "Measurement"],
            &[
                &["RTM Date", "Before August 2025", "Calendar"],
                &["Launch Inventory", "500+ units", "Inventory count"],
                &["School Licenses", "3-5 at launch", "License count"],
                &["Pre-launch Waitlist", "1,000+ signups", "Email list"],
                &["Launch Week Sales", "50+ units", "Shopify"],
                &["Customer Satisfaction", "4.5+ stars", "Reviews"],
            ],
        )
        .with_widths_in(&[2.0, 2.25, 2.25]),
    )
}

fn next_steps(story: &mut StoryBuilder<'_>) -> Result<()> {
    let owners: [(&str, &[&str]); 4] = [
        (
            "Paul",
            &[
                "Finalize execution plan",
                "Set up project dashboard",
                "Schedule weekly sync",
                "Begin trademark search",
            ],
        ),
        (
            "Brian",
            &[
                "Review engineering timeline",
                "Begin/continue SolidWorks",
                "Identify design questions",
            ],
        ),
        (
            "Ross",
            &["Begin manufacturer research", "Identify supplier contacts"],
        ),
        (
            "Nathan",
            &["Review assigned tasks", "Set up communication channels"],
        ),
    ];
    story
        .spacer(20.0)
        .para("SectionHeader", "Immediate Next Steps (Next 2 Weeks)")?;
    for (owner, tasks) in owners {
        story
            .para("Body", &format!("<b>{owner}:</b>"))?
            .bullets("BulletItem", tasks)?
            .spacer(5.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pt;

    #[test]
    fn title_styles_are_centred() {
        let styles = styles().expect("styles");
        for name in ["DocTitle", "DocSubtitle"] {
            assert_eq!(styles.get(name).expect(name).alignment, Alignment::Center);
        }
        assert_eq!(
            styles.get("DocTitle").expect("title").resolved_leading(),
            Pt::from_f32(34.0)
        );
        // Section headers fall back to 1.2 x size.
        assert_eq!(
            styles.get("SectionHeader").expect("header").resolved_leading(),
            Pt::from_f32(16.0).mul_ratio(6, 5)
        );
    }

    #[test]
    fn story_runs_title_to_closing_quote() {
        let styles = styles().expect("styles");
        let story = story(&styles).expect("story");
        assert_eq!(story[0].debug_name(), "Paragraph");
        assert_eq!(story.last().map(|f| f.debug_name()), Some("Table"));
        let breaks = story.iter().filter(|f| f.is_break_marker()).count();
        assert_eq!(breaks, 5);
    }
}
