//! Aggressive reset roadmap targeting launch on Sep 1, 2026.

use super::execution_plan::{gate, table, task_table};
use crate::error::Result;
use crate::factories::{TableSpec, highlight_box, meta_table, warning_box};
use crate::flowable::Flowable;
use crate::font::StandardFont;
use crate::story::StoryBuilder;
use crate::style::{ParagraphStyle, StyleSheet};
use crate::theme;

/// The v1 sheet plus a small body style and a red alert style.
pub(super) fn styles() -> Result<StyleSheet> {
    let mut styles = super::execution_plan::styles()?;
    styles.add(
        ParagraphStyle::new("BodySmall")
            .with_font_size(9.0)
            .with_text_color(theme::TEXT)
            .with_space_before(2.0)
            .with_space_after(2.0)
            .with_leading(12.0),
    )?;
    styles.add(
        ParagraphStyle::new("AlertText")
            .with_font(StandardFont::HelveticaBold)
            .with_text_color(theme::DANGER)
            .with_space_before(4.0)
            .with_space_after(4.0)
            .with_leading(14.0),
    )?;
    Ok(styles)
}

pub(super) fn story(styles: &StyleSheet) -> Result<Vec<Box<dyn Flowable>>> {
    let mut story = StoryBuilder::new(styles);

    overview(&mut story)?;
    reboot(&mut story)?;
    design_and_brand(&mut story)?;
    manufacturing_and_licensing(&mut story)?;
    go_to_market_and_launch(&mut story)?;
    engineering_risks_budget(&mut story)?;
    metrics_and_next_steps(&mut story)?;

    story.spacer(20.0);
    story.push(highlight_box(
        "<b>Document Status:</b> v2.1 ACTIVE | <b>Next Review:</b> Feb 6, 2026 (kickoff) then Wednesdays<br/><br/>\
         <i>Version History:</i><br/>\
         v1.0 (Jan 2025): Original plan, Summer 2025 target<br/>\
         v2.0 (Feb 2025): Reset with Summer 2026 target, added Phase 0, 44-week CLC timeline<br/>\
         v2.1 (Feb 2026): Aggressive reset -- all 2026 dates, CLC 6-12 wks post-design freeze, Sep 1 launch",
        styles,
    )?);
    Ok(story.finish())
}

fn overview(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    story
        .para("DocTitle", "PopTop Execution Plan")?
        .para("DocSubtitle", "NPI to RTM: Aggressive Reset Roadmap v2.1")?;
    story.push(meta_table(&[
        ["Version: 2.1", "Date: February 2026"],
        ["Target RTM: Sep 1, 2026 (Football Season)", "Document Owner: Paul Giarrizzo"],
        ["Context: Aggressive 7-month timeline", "Previous: v2.0 (Feb 2025), v1.0 (Jan 2025)"],
    ])?);
    story
        .spacer(20.0)
        .para("SectionHeader", "Team Roster &amp; Responsibilities")?;
    table(
        story,
        TableSpec::new(
            &["Name", "Role", "Primary Responsibilities", "Commitment"],
            &[
                &["Paul Giarrizzo", "Business Lead", "Execution driver, biz dev, licensing, GTM", "Lead"],
                &["Alex Munn", "Co-Founder / Equity", "Strategic decisions, capital, TM/domain", "Advisory"],
                &["Ross Munn", "Co-Founder / Equity", "Manufacturing sourcing, suppliers", "Part-time"],
                &["Brian Williams", "Engineer", "SolidWorks CAD, prototyping, DFM", "NPI to RTM+6mo"],
                &["Nathan Childress", "Operations", "Task execution, social media", "As assigned"],
            ],
        )
        .with_widths_in(&[1.3, 1.3, 2.5, 1.4]),
    )?;
    story.spacer(15.0);
    story.push(highlight_box(
        "<b>Critical Path:</b> Team Alignment (Feb 6) -&gt; Design Freeze (Apr 24) -&gt; CLC Submission (May 1) -&gt; \
         CLC Approval (6-12 wks) -&gt; Production (Jul) -&gt; Inventory (Aug 14) -&gt; LAUNCH (Sep 1, 2026)",
        styles,
    )?);

    story.spacer(15.0).para("SectionHeader", "Key Milestones")?;
    table(
        story,
        TableSpec::new(
            &["Milestone", "Date"],
            &[
                &["Reboot Call", "Feb 6, 2026"],
                &["Design Freeze", "Apr 24, 2026"],
                &["CLC Submission", "May 1, 2026"],
                &["CLC Approval (est.)", "Jun 12 - Jul 24, 2026"],
                &["Production Run Auth", "Jul 31, 2026"],
                &["Inventory at 3PL", "Aug 14, 2026"],
                &["Soft Launch", "Aug 21, 2026"],
                &["PUBLIC LAUNCH", "Sep 1, 2026"],
            ],
        )
        .with_widths_in(&[3.25, 3.25]),
    )?;

    story.spacer(15.0).para("SectionHeader", "Timeline Overview")?;
    table(
        story,
        TableSpec::new(
            &["Phase", "Focus", "Start", "End", "Duration"],
            &[
                &["Phase 0", "Reboot & Foundation", "Feb 4", "Feb 14", "2 weeks"],
                &["Phase 1", "Design & Prototyping", "Feb 9", "Apr 24", "10 weeks"],
                &["Phase 2", "Brand Identity & IP", "Feb 6", "Apr 3", "8 wks (parallel)"],
                &["Phase 3", "Manufacturing & Supply", "Apr 24", "Jul 31", "14 weeks"],
                &["Phase 4", "Licensing (CLC)", "Feb 13", "Aug 7", "6-12 wks post-freeze"],
                &["Phase 5", "Go-To-Market Prep", "Jun 19", "Aug 28", "10 weeks"],
                &["Phase 6", "Launch & Operations", "Aug 7", "Nov 30", "Football season"],
            ],
        )
        .with_widths_in(&[0.8, 1.6, 1.1, 1.1, 1.3]),
    )?;
    story.page_break();
    Ok(())
}

fn reboot(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    story
        .para("SectionHeader", "Phase 0: Reboot &amp; Foundation (Feb 4 - 14, 2026)")?
        .para(
            "Body",
            "<b>Owner:</b> Paul Giarrizzo | <b>Goal:</b> Team re-aligned, infrastructure live, trademark path clear",
        )?
        .para("SubSection", "0.1 Team Realignment")?;
    task_table(
        story,
        &[
            &["Thursday standing call (reboot)", "Paul", "Feb 6"],
            &["Confirm team commitment", "Paul", "Feb 13"],
            &["Brian: sign royalty agreement", "Paul + Brian", "Feb 13"],
            &["Alex: confirm capital for Phase 1-2", "Paul + Alex", "Feb 13"],
            &["Contact Ross -- update & re-engage", "Paul", "Feb 8"],
            &["Set up team communication channel", "Nathan / Paul", "Feb 13"],
        ],
    )?;

    let status_header: &[&str] = &["Task", "Owner", "Status", "Target"];
    let status_widths = [2.5, 1.0, 1.2, 1.2];
    story.para("SubSection", "0.2 Project Infrastructure")?;
    table(
        story,
        TableSpec::new(
            status_header,
            &[
                &["Deploy Google Sheets Command Center", "Paul", "COMPLETE", "Feb 4"],
                &["Share dashboard + docs with team", "Paul", "Pending", "Feb 8"],
            ],
        )
        .with_widths_in(&status_widths),
    )?;
    story.para("SubSection", "0.3 Brand Protection")?;
    table(
        story,
        TableSpec::new(
            status_header,
            &[
                &["USPTO trademark search", "Paul", "COMPLETE", "Feb 3"],
                &["Domain availability check", "Paul", "COMPLETE", "Feb 3"],
                &["Attorney trademark search", "Jeff Johnson", "COMPLETE", "Apr 2025"],
                &["Attorney recommendation: proceed", "Jeff Johnson", "COMPLETE", "Apr 2025"],
                &["Authorize Jeff to file TM ($1,300)", "Paul + Alex", "DECISION NEEDED", "Feb 6 call"],
                &["Register domain", "Alex", "Pending", "Feb 10"],
                &["Secure social media handles", "Nathan", "Pending", "Feb 17"],
            ],
        )
        .with_widths_in(&status_widths),
    )?;

    story.spacer(10.0);
    story.push(warning_box(
        "<b>TRADEMARK UPDATE:</b> Jeff Johnson (IP Law USA) completed a professional federal search in April 2025. \
         Found two potentially relevant marks ('Pop Top' Class 21 water bottles, 'Top Pop' Class 32 soft drinks) but \
         <b>recommends proceeding</b> -- neither is a showstopper for beverage dispensers. \
         Filing cost: <b>$1,300</b> (1 class). Jeff's firm has been waiting for authorization since June 2025. \
         <b>Decision needed on Feb 6 call.</b>",
        styles,
    )?);
    gate(
        story,
        10.0,
        "<b>Phase 0 Gate:</b> Team committed, dashboard live, standing call running, trademark path clear",
    )?;
    story.page_break();
    Ok(())
}

fn design_and_brand(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 1: Design &amp; Prototyping (Feb 9 - Apr 24, 2026)")?
        .para(
            "Body",
            "<b>Owners:</b> Brian Williams + Paul Giarrizzo | <b>Goal:</b> Design freeze with validated, manufacturable prototype",
        )?
        .para("SubSection", "1.1 CAD Design Completion")?;
    task_table(
        story,
        &[
            &["Review existing CAD files", "Brian", "Feb 13"],
            &["Finalize V1 dimensions & capacity", "Brian", "Feb 27"],
            &["Complete SolidWorks assembly", "Brian", "Mar 13"],
            &["Design dispensing mechanism", "Brian", "Mar 20"],
            &["Design modular branding panels", "Brian", "Mar 27"],
            &["DFM review with Ross", "Brian + Ross", "Apr 3"],
            &["Create technical drawings package", "Brian", "Apr 10"],
        ],
    )?;
    story.para("SubSection", "1.2 Prototyping")?;
    task_table(
        story,
        &[
            &["Print prototype V1 (3D printer)", "Brian", "Mar 20"],
            &["Functional testing (pour, seal, clean)", "Brian + Paul", "Mar 27"],
            &["Iterate based on testing", "Brian", "Apr 3"],
            &["Print prototype V2 (refined)", "Brian", "Apr 10"],
            &["Final validation testing", "Team", "Apr 17"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 1 Gate:</b> Design freeze approval by all stakeholders -- <b>April 24, 2026</b>",
    )?;

    story
        .para("SectionHeader", "Phase 2: Brand Identity &amp; IP (Feb 6 - Apr 3, 2026)")?
        .para(
            "Body",
            "<b>Owner:</b> Paul Giarrizzo | <b>Goal:</b> Trademark filed, brand locked, digital presence secured",
        )?
        .para("SubSection", "2.1 Trademark &amp; Brand (REQUIRES ATTORNEY REVIEW)")?;
    task_table(
        story,
        &[
            &["Attorney search completed", "Jeff Johnson", "COMPLETE (Apr 2025)"],
            &["Attorney recommendation: proceed", "Jeff Johnson", "COMPLETE"],
            &["Authorize Jeff to file TM ($1,300)", "Paul + Alex", "Feb 6 call"],
            &["Trademark application filed", "Jeff Johnson", "Upon authorization"],
            &["Register domain", "Alex", "Feb 10"],
            &["Secure social media handles", "Nathan", "Feb 17"],
            &["Logo design (3 concepts)", "Paul", "Mar 13"],
            &["Logo selection & refinement", "Team", "Mar 20"],
            &["Brand style guide", "Paul", "Mar 27"],
        ],
    )?;
    story.para("SubSection", "2.2 Legal Foundation")?;
    task_table(
        story,
        &[
            &["Brian royalty agreement signed", "Paul + Brian", "Feb 13"],
            &["Entity formation (LLC)", "Paul + Alex", "Feb 27"],
            &["Operating agreement", "Paul + Alex", "Mar 6"],
            &["Patent strategy discussion", "Paul + Attorney", "Mar 13"],
            &["Provisional patent decision", "Team", "Mar 20"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 2 Gate:</b> Trademark filed, logo approved, brand guide complete, domain + socials live",
    )?;
    story.page_break();
    Ok(())
}

fn manufacturing_and_licensing(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para(
            "SectionHeader",
            "Phase 3: Manufacturing &amp; Supply Chain (Apr 24 - Jul 31, 2026)",
        )?
        .para(
            "Body",
            "<b>Owners:</b> Ross Munn + Brian Williams | <b>Goal:</b> Manufacturer selected, T1 samples approved, production authorized",
        )?;
    task_table(
        story,
        &[
            &["Identify 3-5 manufacturers", "Ross", "May 8"],
            &["Send RFQ with tech drawings", "Ross + Brian", "May 15"],
            &["Evaluate quotes & capabilities", "Ross + Paul", "May 29"],
            &["Select primary manufacturer", "Team", "Jun 5"],
            &["Negotiate terms & MOQ", "Ross + Paul", "Jun 12"],
            &["Tooling deposit & kick-off", "Paul (finance)", "Jun 12"],
            &["T1 samples (first article)", "Brian + Ross", "Jul 17"],
            &["T1 approval / modifications", "Brian", "Jul 24"],
            &["Production run authorization", "Team", "Jul 31"],
            &["Packaging design + supplier", "Paul + Ross", "Jun 26 - Jul 10"],
            &["3PL evaluation & contract", "Paul", "Jul 10 - Jul 17"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 3 Gate:</b> T1 samples approved, production order confirmed -- <b>July 31, 2026</b>",
    )?;

    story
        .spacer(10.0)
        .para(
            "SectionHeader",
            "Phase 4: Licensing / CLC / Fanatics (Feb 13 - Aug 7, 2026)",
        )?
        .para(
            "Body",
            "<b>Owner:</b> Paul Giarrizzo | <b>CLC approval: 6-12 weeks after submission with final design + working prototype</b>",
        )?;
    task_table(
        story,
        &[
            &["Research CLC application process", "Paul", "Mar 6"],
            &["Prepare application materials", "Paul", "Apr 3"],
            &["Submit CLC application (w/ proto + DFM)", "Paul", "May 1"],
            &["CLC approval (6-12 wks from submission)", "Paul", "Jun 12 - Jul 24"],
            &["Negotiate school licenses (3-5)", "Paul", "Jun 19 - Aug 7"],
        ],
    )?;
    story.para("SubSection", "School Selection Strategy")?;
    table(
        story,
        TableSpec::new(
            &["Priority", "Schools", "Rationale"],
            &[
                &["Tier 1", "Indiana, Purdue, Notre Dame", "Home state, network access"],
                &["Tier 2", "Ohio State, Michigan, Alabama", "Large fanbases, tailgate culture"],
                &["Tier 3", "SEC (LSU, Georgia, etc.)", "Premium tailgate market"],
            ],
        )
        .with_widths_in(&[1.0, 2.75, 2.75]),
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 4 Gate:</b> CLC approval + at least 3 school licenses secured (target: Jul-Aug 2026)",
    )?;
    story.page_break();
    Ok(())
}

fn go_to_market_and_launch(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Phase 5: Go-To-Market Prep (Jun 19 - Aug 28, 2026)")?
        .para("Body", "<b>Owners:</b> Paul Giarrizzo + Nathan Childress")?;
    task_table(
        story,
        &[
            &["Shopify store setup", "Paul", "Jun 26"],
            &["Email capture / waitlist page", "Paul", "Jun 26"],
            &["Payment processing (Stripe)", "Paul", "Jul 3"],
            &["Product photography", "Paul", "Jul 24"],
            &["Product copy & descriptions", "Paul", "Jul 31"],
            &["Social media content calendar", "Paul + Nathan", "Jul 31"],
            &["Launch campaign strategy", "Paul", "Jul 31"],
            &["Influencer outreach list", "Nathan", "Jul 31"],
            &["PR / media list", "Paul", "Aug 7"],
            &["Pre-launch email sequence", "Paul", "Aug 14"],
            &["Waitlist goal: 1,000+ signups", "Paul + Nathan", "Aug 28"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 5 Gate:</b> Store live (pre-launch mode), marketing assets ready, waitlist building",
    )?;

    story
        .para("SectionHeader", "Phase 6: Launch &amp; Operations (Aug 7 - Nov 30, 2026)")?
        .para(
            "Body",
            "<b>Owner:</b> Full Team | <b>Goal:</b> Successful launch for 2026 College Football season",
        )?;
    task_table(
        story,
        &[
            &["Inventory received at 3PL", "Ross + Paul", "Aug 14"],
            &["Final QC on first units", "Brian", "Aug 18"],
            &["Soft launch (friends/family)", "Paul", "Aug 21"],
            &["Collect feedback + fix issues", "Team", "Aug 25 - 28"],
            &["Customer service setup", "Nathan", "Sep 1"],
            &["PUBLIC LAUNCH", "Paul", "SEP 1, 2026"],
            &["Social media launch push", "Nathan + Paul", "Sep 2026"],
            &["Tailgate season marketing", "Paul + Nathan", "Sep - Nov 2026"],
            &["Weekly sales reporting", "Paul", "Ongoing"],
            &["V2 feature roadmap", "Brian + Paul", "Nov 2026"],
        ],
    )?;
    gate(
        story,
        10.0,
        "<b>Phase 6 Gate:</b> Successful launch, positive feedback, reorder trigger hit",
    )?;
    story.page_break();
    Ok(())
}

fn engineering_risks_budget(story: &mut StoryBuilder<'_>) -> Result<()> {
    story
        .para("SectionHeader", "Brian Williams: Engineering Scope Summary")?
        .para(
            "Body",
            "<b>Your Role:</b> Critical path owner for product development through RTM+6 months",
        )?
        .spacer(10.0)
        .para("SubSection", "Key Deliverables:")?;
    for item in [
        "Complete SolidWorks CAD package (by Mar 13)",
        "Functional prototypes V1 + V2 (Mar 20 - Apr 10)",
        "Technical drawings for manufacturing (Apr 10)",
        "DFM collaboration with Ross (Apr 3)",
        "T1 sample validation (Jul 17-24)",
        "Production quality support",
        "Design iteration support post-launch",
    ] {
        story.para("BulletItem", item)?;
    }
    story
        .spacer(10.0)
        .para(
            "SubSection",
            "Compensation (per Product Development &amp; Royalty Agreement):",
        )?
        .para("BulletItem", "Option A: 5% of net revenue for 5 years")?
        .para("BulletItem", "Option B: 5% of net revenue capped at $175,000")?;

    story.spacer(15.0).para("SectionHeader", "Critical Risks")?;
    table(
        story,
        TableSpec::new(
            &["Risk", "Probability", "Impact", "Mitigation"],
            &[
                &["Team disengagement", "Medium", "Critical", "Weekly calls, dashboard, clear ownership"],
                &["CLC approval delays (>12 wks)", "Low", "High", "Submit May 1 with complete package"],
                &["Trademark conflict", "Low-Med", "Medium", "Attorney reviewed, recommends proceeding"],
                &["Tooling delays", "Medium", "High", "Start RFQ at design freeze, buffer built in"],
                &["Capital constraints", "Medium", "Medium", "Phased spending, pre-orders"],
                &["Design iteration overruns", "Medium", "Medium", "Hard freeze Apr 24, rapid prototyping"],
                &["Aggressive timeline slip", "Medium", "High", "Weekly tracking, early escalation"],
            ],
        )
        .with_widths_in(&[1.8, 0.9, 0.8, 3.0]),
    )?;

    story.spacer(15.0).para("SectionHeader", "Budget Estimates")?;
    table(
        story,
        TableSpec::new(
            &["Category", "Estimate", "Phase"],
            &[
                &["Trademark + Legal", "$4,000 - $10,000", "Phase 2"],
                &["Tooling", "$15,000 - $40,000", "Phase 3"],
                &["First Production (500 units)", "$35,000 - $50,000", "Phase 3"],
                &["Licensing Fees (CLC + schools)", "$5,000 - $15,000", "Phase 4"],
                &["E-commerce + Marketing", "$6,000 - $11,000", "Phase 5-6"],
                &["TOTAL ESTIMATED", "$65,000 - $126,000", "Phases 0-6"],
            ],
        )
        .with_widths_in(&[2.5, 2.0, 2.0]),
    )?;
    story.spacer(10.0).para("SubSection", "Phased Capital Needs:")?;
    table(
        story,
        TableSpec::new(
            &["Period", "Amount", "Purpose"],
            &[
                &["Feb - Apr 2026", "$4K - $10K", "Trademark, legal, brand, patent"],
                &["Apr - Jul 2026", "$50K - $90K", "Tooling, first production run"],
                &["Jun - Aug 2026", "$5K - $15K", "Licensing fees"],
                &["Jun - Sep 2026", "$6K - $11K", "E-commerce, marketing"],
            ],
        )
        .with_widths_in(&[1.5, 1.5, 3.5]),
    )?;
    story.page_break();
    Ok(())
}

fn metrics_and_next_steps(story: &mut StoryBuilder<'_>) -> Result<()> {
    story.para("SectionHeader", "Success Metrics")?;
    table(
        story,
        TableSpec::new(
            &["Metric", "Target", "Measurement"],
            &[
                &["RTM Date", "Before Sep 1, 2026", "Calendar"],
                &["Launch Inventory", "500+ units", "Inventory count"],
                &["School Licenses", "3-5 at launch", "License count"],
                &["Pre-launch Waitlist", "1,000+ signups", "Email list"],
                &["Launch Month Sales", "100+ units", "Shopify"],
                &["Customer Satisfaction", "4.5+ stars", "Reviews"],
                &["Football Season Sales", "500+ units (Sep-Nov)", "Shopify"],
            ],
        )
        .with_widths_in(&[2.0, 2.25, 2.25]),
    )?;

    let owners: [(&str, &[&str]); 5] = [
        (
            "Paul",
            &[
                "Authorize Jeff Johnson to file trademark ($1,300) -- if agreed on call",
                "Share dashboard + execution plan with team",
                "Schedule recurring Wednesday call (starting Feb 11)",
                "Contact Ross separately by Feb 8",
                "Begin CLC application research",
            ],
        ),
        (
            "Brian",
            &[
                "Review existing CAD files by Feb 13",
                "Confirm engineering timeline for Apr 24 design freeze",
                "Sign Product Development &amp; Royalty Agreement",
            ],
        ),
        (
            "Alex",
            &[
                "Register best available domain (drinkpoptop.com / getpoptop.com)",
                "Confirm capital availability for Phases 1-2",
            ],
        ),
        (
            "Ross",
            &[
                "Begin manufacturer research (to be ready at design freeze)",
                "Identify supplier network contacts",
            ],
        ),
        (
            "Nathan",
            &["Set up team communication channel", "Secure social media handles"],
        ),
    ];
    story
        .spacer(20.0)
        .para("SectionHeader", "Immediate Next Steps (Next 2 Weeks)")?;
    for (owner, tasks) in owners {
        story.para("Body", &format!("<b>{owner}:</b>"))?;
        for task in tasks {
            story.para("BulletItem", task)?;
        }
        story.spacer(5.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pt;

    #[test]
    fn extends_the_v1_sheet() {
        let styles = styles().expect("styles");
        assert!(styles.contains("DocTitle"));
        assert!(styles.contains("BulletItem"));
        let alert = styles.get("AlertText").expect("alert");
        assert_eq!(alert.text_color, theme::DANGER);
        assert_eq!(alert.font, StandardFont::HelveticaBold);
        assert_eq!(
            styles.get("BodySmall").expect("small").resolved_leading(),
            Pt::from_f32(12.0)
        );
    }

    #[test]
    fn story_breaks_between_phase_groups() {
        let styles = styles().expect("styles");
        let story = story(&styles).expect("story");
        let breaks = story.iter().filter(|f| f.is_break_marker()).count();
        assert_eq!(breaks, 6);
        assert_eq!(story.last().map(|f| f.debug_name()), Some("Table"));
    }
}
