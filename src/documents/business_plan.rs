use crate::canvas::Canvas;
use crate::doc_context::DocContext;
use crate::error::Result;
use crate::factories::{
    PanelColumn, PanelStyle, TableSpec, data_table, metrics_row, panel_table,
    section_rule, titled_highlight_box,
};
use crate::flowable::Flowable;
use crate::font::StandardFont;
use crate::story::StoryBuilder;
use crate::style::{Alignment, ParagraphStyle, StyleSheet, TextTransform};
use crate::theme;
use crate::types::{Pt, inch};

const CELL_PADDING: f32 = 8.0;
const HALF: f32 = 3.25;
const THIRD: f32 = 2.17;

const COVER_META: [&str; 5] = [
    "Company: PopTop, LLC (a Munn Family Holdings company)",
    "Jurisdiction: Indiana LLC",
    "Stage: Prototype \u{2192} Pre-Launch",
    "Target RTM: Summer 2025",
    "Version: 1.0 | January 2025",
];

/// Full-bleed navy cover with the two-tone wordmark.
pub(super) fn draw_cover(canvas: &mut Canvas, ctx: &DocContext) {
    let page = ctx.page_size;
    let center = page.width.mul_ratio(1, 2);
    canvas.save_state();

    canvas.set_fill_color(theme::PRIMARY);
    canvas.draw_rect(Pt::ZERO, Pt::ZERO, page.width, page.height);

    let logo = Pt::from_f32(60.0);
    canvas.set_font(StandardFont::HelveticaBold, logo);
    let pop = canvas.string_width("Pop");
    let top = canvas.string_width("Top");
    let start = (page.width - pop - top).mul_ratio(1, 2);
    canvas.set_fill_color(theme::WHITE);
    canvas.draw_string(start, inch(3.0), "Pop");
    canvas.set_fill_color(theme::SECONDARY);
    canvas.draw_string(start + pop, inch(3.0), "Top");

    canvas.set_fill_color(theme::WHITE);
    canvas.set_font(StandardFont::Helvetica, Pt::from_f32(12.0));
    canvas.draw_centred_string(center, inch(3.5), "BUSINESS PLAN");

    canvas.set_fill_color(theme::SECONDARY);
    canvas.set_font(StandardFont::HelveticaOblique, Pt::from_f32(16.0));
    canvas.draw_centred_string(center, inch(4.5), "\"The Centerpiece of Your Tailgate\"");

    canvas.set_fill_color(theme::WHITE);
    canvas.set_font(StandardFont::Helvetica, Pt::from_f32(10.0));
    let mut baseline = page.height - inch(3.5);
    for line in COVER_META {
        canvas.draw_centred_string(center, baseline, line);
        baseline += Pt::from_f32(20.0);
    }

    canvas.restore_state();
}

pub(super) fn styles() -> Result<StyleSheet> {
    let mut styles = StyleSheet::sample();
    styles.add(
        ParagraphStyle::new("SectionTitle")
            .with_font(StandardFont::HelveticaBold)
            .with_font_size(24.0)
            .with_text_color(theme::PRIMARY)
            .with_space_before(20.0)
            .with_space_after(12.0),
    )?;
    styles.add(
        ParagraphStyle::new("SubsectionTitle")
            .with_font(StandardFont::HelveticaBold)
            .with_font_size(12.0)
            .with_text_color(theme::PRIMARY)
            .with_space_before(15.0)
            .with_space_after(8.0)
            .with_text_transform(TextTransform::Uppercase),
    )?;
    styles.add(
        ParagraphStyle::new("CustomBody")
            .with_text_color(theme::TEXT)
            .with_space_before(6.0)
            .with_space_after(6.0)
            .with_leading(14.0)
            .with_alignment(Alignment::Justify),
    )?;

    let body = styles.get_mut("BodyText")?;
    body.font = StandardFont::Helvetica;
    body.font_size = Pt::from_f32(10.0);
    body.text_color = theme::TEXT;
    body.leading = Some(Pt::from_f32(14.0));

    styles.add(
        ParagraphStyle::new("HighlightTitle")
            .with_font(StandardFont::HelveticaBold)
            .with_font_size(12.0)
            .with_text_color(theme::SECONDARY)
            .with_space_after(8.0),
    )?;
    styles.add(
        ParagraphStyle::new("HighlightBody")
            .with_text_color(theme::WHITE)
            .with_leading(14.0),
    )?;
    styles.add(
        ParagraphStyle::new("BulletText")
            .with_text_color(theme::TEXT)
            .with_left_indent(20.0)
            .with_space_before(3.0)
            .with_space_after(3.0),
    )?;
    styles.add(
        ParagraphStyle::new("TableHeader")
            .with_font(StandardFont::HelveticaBold)
            .with_font_size(9.0)
            .with_text_color(theme::WHITE),
    )?;
    styles.add(
        ParagraphStyle::new("TableCell")
            .with_font_size(9.0)
            .with_text_color(theme::TEXT),
    )?;
    styles.add(
        ParagraphStyle::new("CenteredQuote")
            .with_font(StandardFont::HelveticaOblique)
            .with_font_size(14.0)
            .with_text_color(theme::PRIMARY)
            .with_alignment(Alignment::Center)
            .with_space_before(10.0)
            .with_space_after(10.0),
    )?;
    Ok(styles)
}

fn section(story: &mut StoryBuilder<'_>, title: &str) -> Result<()> {
    story.para("SectionTitle", title)?.spacer(5.0);
    story.push(section_rule()?).spacer(15.0);
    Ok(())
}

fn table(story: &mut StoryBuilder<'_>, spec: TableSpec) -> Result<()> {
    story.push(data_table(&spec, CELL_PADDING)?);
    Ok(())
}

fn shaded_panels() -> PanelStyle {
    PanelStyle {
        background: Some(theme::LIGHT),
        padding: Some(8.0),
        top_padding: None,
    }
}

pub(super) fn story(styles: &StyleSheet) -> Result<Vec<Box<dyn Flowable>>> {
    let mut story = StoryBuilder::new(styles);

    // Page 1 belongs to the cover callback.
    story.hard_page_break();

    executive_summary(&mut story)?;
    problem_and_opportunity(&mut story)?;
    product_overview(&mut story)?;
    market_analysis(&mut story)?;
    competitive_landscape(&mut story)?;
    licensing(&mut story)?;
    go_to_market(&mut story)?;
    brand(&mut story)?;
    operations(&mut story)?;
    team(&mut story)?;
    financials(&mut story)?;
    capital(&mut story)?;

    Ok(story.finish())
}

fn executive_summary(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "01 Executive Summary")?;
    story.para(
        "BodyText",
        "PopTop is a consumer products company building a <b>premium, category-defining beverage \
         dispensing platform</b> engineered specifically for collegiate sports tailgating and \
         fan-centered social experiences.",
    )?;
    story.spacer(15.0);
    story.push(metrics_row(
        &[
            ("$375", "Target MSRP"),
            ("60-65%", "Gross Margin"),
            ("$10-20M", "Initial SOM"),
            ("$500M+", "Total TAM"),
        ],
        styles,
    )?);
    story.spacer(15.0);
    story.para(
        "BodyText",
        "The Company's flagship product is a high-capacity, portable, and visually distinctive \
         drink dispenser designed to serve as the functional and social centerpiece of tailgates, \
         watch parties, and outdoor fan gatherings. Unlike generic beverage dispensers, PopTop \
         products are purpose-built for licensed collegiate branding, durability, and repeat use \
         in demanding outdoor environments.",
    )?;
    story.spacer(15.0);
    story.push(titled_highlight_box(
        "Strategic Vision",
        "PopTop is designed from inception as a <b>brand and platform company</b>, not a single-SKU \
         novelty product. The long-term objective is to become the dominant and trusted name in \
         premium beverage dispensing for social and fan-driven environments.",
        styles,
    )?);
    story.spacer(15.0);
    story
        .para("SubsectionTitle", "GO-TO-MARKET STRATEGY")?
        .para(
            "BodyText",
            "Establish a strong beachhead in collegiate athletics through direct-to-consumer sales \
             and strategic licensing partnerships (CLC and Fanatics), then expand into additional \
             product variants and adjacent markets including professional sports, outdoor lifestyle, \
             hospitality, and events.",
        )?
        .page_break();
    Ok(())
}

fn problem_and_opportunity(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "02 Problem &amp; Opportunity")?;
    story
        .para("SubsectionTitle", "THE PROBLEM")?
        .para(
            "BodyText",
            "Despite significant consumer spending on tailgating and fan gear, the beverage dispensing \
             category remains fragmented, commoditized, and underserved. Existing options fall into \
             three categories:",
        )?
        .bullets(
            "BulletText",
            &[
                "<b>Low-cost plastic dispensers</b> lacking durability, aesthetic appeal, and temperature performance",
                "<b>Novelty/keg-style products</b> difficult to transport, clean, or brand consistently",
                "<b>Improvised solutions</b> (coolers, tubs, cans) that don't scale for group use",
            ],
        )?
        .spacer(10.0)
        .para(
            "BodyText",
            "None of these solutions are designed with <b>collegiate fandom</b>, <b>licensed branding</b>, \
             or <b>premium ownership experience</b> as core design requirements. There is no dominant brand \
             in beverage dispensing analogous to YETI's position in coolers.",
        )?
        .spacer(10.0)
        .para("SubsectionTitle", "THE OPPORTUNITY")?
        .para(
            "BodyText",
            "Collegiate sports fandom represents one of the most passionate and ritual-driven consumer \
             segments in the United States. Tailgating is central to the experience and often represents \
             a multi-decade tradition for alumni and fans.",
        )?
        .spacer(15.0);
    story.push(metrics_row(
        &[
            ("130+", "FBS Programs"),
            ("Millions", "Engaged Fans"),
            ("Premium", "Spending Trend"),
            ("High", "Brand Loyalty"),
        ],
        styles,
    )?);
    story
        .spacer(15.0)
        .para(
            "BodyText",
            "PopTop addresses this gap by offering a premium, licensed, and extensible beverage \
             dispensing solution that elevates the social experience while reinforcing fan identity.",
        )?
        .page_break();
    Ok(())
}

fn product_overview(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "03 Product Overview")?;
    story
        .para("SubsectionTitle", "FLAGSHIP PRODUCT (V1)")?
        .para(
            "BodyText",
            "A rugged, tabletop/portable drink dispenser designed specifically for tailgates and group events.",
        )?
        .para("SubsectionTitle", "Core Features:")?
        .bullets(
            "BulletText",
            &[
                "Durable, food-grade materials",
                "High-capacity reservoir (optimized for group use)",
                "Controlled pour / tap-style dispensing",
                "Modular branding surfaces (team logos, colors)",
                "Designed for ice compatibility",
                "Portable, easy-clean construction",
            ],
        )?
        .spacer(15.0)
        .para("SubsectionTitle", "Target Economics:")?;
    table(
        story,
        TableSpec::new(
            &["Metric", "Value"],
            &[
                &["MSRP", "$350 - $400"],
                &["Target ASP", "$375"],
                &["Est. COGS", "~$140/unit"],
                &["Gross Margin", "60 - 65%"],
            ],
        )
        .with_widths_in(&[HALF, HALF]),
    )?;
    story
        .spacer(15.0)
        .para("SubsectionTitle", "PRODUCT ROADMAP")?;
    table(
        story,
        TableSpec::new(
            &["Version", "Description", "Key Features"],
            &[
                &["V1", "Flagship Launch", "Core dispenser with ice compatibility"],
                &["V2", "Insulated/Refrigerated", "Enhanced temperature retention"],
                &["V3", "Electric-Powered", "AC outlet powered cooling"],
                &["V4", "Battery-Powered", "Portable cooling system"],
                &["V5", "Smart Dispensing", "Volume tracking, app integration"],
                &["V6", "Commercial/Hospitality", "High-volume, venue-grade"],
            ],
        )
        .with_widths_in(&[0.8, 1.8, 3.9]),
    )?;
    story.spacer(15.0);
    story.push(titled_highlight_box(
        "Platform Philosophy",
        "PopTop is intentionally engineered as a <b>platform</b>, not a one-off product. Each \
         version builds on core IP while expanding addressable markets and use cases.",
        styles,
    )?);
    story.page_break();
    Ok(())
}

fn market_analysis(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "04 Market Analysis")?;
    story.para("SubsectionTitle", "TARGET CUSTOMER PROFILE")?;
    story.push(panel_table(
        &[
            PanelColumn::new("Primary Demographics").bullets(&[
                "Collegiate sports fans and alumni",
                "Tailgaters and watch-party hosts",
                "Booster clubs and alumni associations",
                "Age range: 25-60",
                "Middle to upper-middle income",
            ]),
            PanelColumn::new("Psychographics").bullets(&[
                "Value quality and durability",
                "Strong brand/team alignment",
                "Social signaling conscious",
                "Repeat purchasers of premium fan gear",
                "Multi-generational traditions",
            ]),
        ],
        HALF,
        PanelStyle {
            top_padding: Some(5.0),
            ..PanelStyle::default()
        },
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "PRIMARY MARKET: COLLEGIATE ATHLETICS")?
        .para(
            "BodyText",
            "Initial focus on U.S. collegiate athletics, beginning with flagship programs and conferences \
             where tailgating culture and discretionary spending are highest:",
        )?
        .bullets(
            "BulletText",
            &[
                "Power 5 conferences (SEC, Big Ten, Big 12, ACC, Pac-12)",
                "Major football and basketball programs",
                "Schools with strong licensing ecosystems",
            ],
        )?
        .spacer(15.0)
        .para("SubsectionTitle", "SECONDARY &amp; EXPANSION MARKETS")?;
    table(
        story,
        TableSpec::new(
            &["Market", "Opportunity", "Timeline"],
            &[
                &["Professional Sports", "NFL, MLB, NBA, NHL fanbases", "Year 2-3"],
                &["Outdoor/Lifestyle", "Camping, RV, overlanding", "Year 2-3"],
                &["Corporate Events", "Branded hospitality", "Year 3+"],
                &["Venue/Hospitality", "Event rentals, stadiums", "Year 3+"],
            ],
        )
        .with_widths_in(&[2.0, 2.75, 1.75]),
    )?;
    story
        .spacer(15.0)
        .para("SubsectionTitle", "MARKET SIZING")?;
    story.push(metrics_row(
        &[
            ("~130", "FBS Programs"),
            ("0.25%", "Initial Penetration"),
            ("$10-20M", "Initial SOM"),
            ("$500M+", "Total TAM"),
        ],
        styles,
    )?);
    story.page_break();
    Ok(())
}

fn competitive_landscape(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "05 Competitive Landscape")?;
    story.push(panel_table(
        &[
            PanelColumn::new("Direct Competitors")
                .bullets(&[
                    "Generic drink dispensers (Amazon, big-box)",
                    "Keg-style novelty products",
                    "Basic plastic dispensers",
                ])
                .subheading("Indirect Competitors")
                .bullets(&[
                    "Premium coolers (YETI, Igloo)",
                    "Party beverage tubs",
                    "DIY/improvised solutions",
                ]),
            PanelColumn::new("Competitive Advantages").bullets(&[
                "<b>Purpose-built</b> for tailgating use case",
                "<b>Premium design</b> &amp; materials",
                "<b>Licensed collegiate branding</b>",
                "<b>Platform extensibility</b>",
                "<b>Strong brand narrative</b>",
                "<b>First-mover</b> in category",
            ]),
        ],
        HALF,
        PanelStyle::default(),
        styles,
    )?);
    story.spacer(15.0);
    story.push(titled_highlight_box(
        "Strategic Position",
        "<b>No incumbent brand owns this category.</b> PopTop has the opportunity to establish \
         category leadership similar to how YETI defined premium coolers. The combination of \
         licensed branding + premium construction + tailgate-specific design creates a defensible moat.",
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "COMPETITIVE MATRIX")?;
    table(
        story,
        TableSpec::new(
            &["Factor", "Generic", "Novelty", "YETI/Coolers", "PopTop"],
            &[
                &["Build Quality", "Low", "Low-Med", "High", "High"],
                &["Collegiate Licensing", "None", "Limited", "Some", "Core"],
                &["Tailgate-Specific", "No", "Partial", "No", "Yes"],
                &["Price Point", "$20-50", "$50-150", "$200-400", "$350-400"],
                &["Brand Premium", "None", "Low", "High", "High"],
            ],
        )
        .with_widths_in(&[1.5, 1.1, 1.1, 1.4, 1.4]),
    )?;
    story.page_break();
    Ok(())
}

fn licensing(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "06 Licensing &amp; Partnerships")?;
    story
        .para("SubsectionTitle", "LICENSING STRATEGY")?
        .para(
            "BodyText",
            "Collegiate licensing is central to PopTop's value proposition and competitive moat. \
             Licensed products command premium pricing and create emotional connection with consumers.",
        )?
        .spacer(10.0);
    story.push(panel_table(
        &[
            PanelColumn::new("Phase 1: Foundation").bullets(&[
                "Establish CLC relationship",
                "Fanatics partnership",
                "3-5 flagship programs",
            ]),
            PanelColumn::new("Phase 2: Expansion").bullets(&[
                "Power 5 conferences",
                "Top 25 programs",
                "Regional expansion",
            ]),
            PanelColumn::new("Phase 3: Scale").bullets(&[
                "Full FBS coverage",
                "Pro sports leagues",
                "International",
            ]),
        ],
        THIRD,
        shaded_panels(),
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "STRATEGIC PARTNERS (TARGET)")?;
    table(
        story,
        TableSpec::new(
            &["Partner", "Type", "Value"],
            &[
                &["Fanatics", "Distribution & Licensing", "Access to 300M+ customers, licensing infrastructure"],
                &["CLC", "Licensing Agent", "200+ university relationships"],
                &["Campus Bookstores", "Retail Channel", "Direct access to students/alumni"],
                &["Stadium Operators", "Retail/Events", "High-traffic game day exposure"],
            ],
        )
        .with_widths_in(&[1.5, 1.75, 3.25]),
    )?;
    story.spacer(15.0);
    story.push(titled_highlight_box(
        "Licensing as a Moat",
        "Licensing is a <b>moat, not a tax</b>. PopTop becomes a preferred platform partner rather \
         than a one-off licensed item. Deep licensing relationships create barriers to entry for \
         competitors and drive recurring revenue through new school additions.",
        styles,
    )?);
    story.page_break();
    Ok(())
}

fn go_to_market(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "07 Go-To-Market Strategy")?;
    story.para("SubsectionTitle", "PHASED APPROACH")?;
    story.push(panel_table(
        &[
            PanelColumn::new("Phase 1: D2C").bullets(&[
                "PopTop.com launch",
                "Limited school drops",
                "Pre-orders / waitlists",
                "Scarcity-driven launches",
            ]),
            PanelColumn::new("Phase 2: Wholesale").bullets(&[
                "Fanatics integration",
                "Campus bookstores",
                "Sporting goods retailers",
                "Regional chains",
            ]),
            PanelColumn::new("Phase 3: Enterprise").bullets(&[
                "Alumni associations",
                "Corporate tailgates",
                "Event rentals",
                "Venue partnerships",
            ]),
        ],
        THIRD,
        shaded_panels(),
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "MARKETING STRATEGY")?
        .para(
            "BodyText",
            "Marketing is <b>visual, experiential, and social-first</b>. The product should photograph \
             exceptionally well and feel iconic when present at the tailgate.",
        )?;
    story.push(panel_table(
        &[
            PanelColumn::new("Channels").bullets(&[
                "Instagram / TikTok (lifestyle content)",
                "Game day photography",
                "Influencer partnerships",
                "Alumni network activations",
                "Stadium/event presence",
            ]),
            PanelColumn::new("Tactics").bullets(&[
                "Limited edition drops by school",
                "Early access for alumni groups",
                "User-generated content campaigns",
                "Rivalry week promotions",
                "Championship tie-ins",
            ]),
        ],
        HALF,
        PanelStyle::default(),
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "LAUNCH TIMELINE")?;
    table(
        story,
        TableSpec::new(
            &["Milestone", "Target", "Focus"],
            &[
                &["Prototype Complete", "Q1 2025", "Engineering validation"],
                &["Licensing Secured", "Q2 2025", "Initial school agreements"],
                &["Production Run", "Q2-Q3 2025", "Manufacturing at scale"],
                &["RTM Launch", "Summer 2025", "Pre-football season"],
            ],
        )
        .with_widths_in(&[THIRD, THIRD, THIRD]),
    )?;
    story.page_break();
    Ok(())
}

fn brand(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "08 Brand &amp; Positioning")?;
    story.para("SubsectionTitle", "BRAND ATTRIBUTES")?;
    story.push(metrics_row(
        &[
            ("Bold", "Commanding Presence"),
            ("Premium", "Quality & Craft"),
            ("Social", "Community Focused"),
            ("Tradition", "Built to Last"),
        ],
        styles,
    )?);
    story.spacer(20.0);
    story.push(titled_highlight_box(
        "Brand Positioning",
        "<para align=\"center\"><font size=\"16\"><i>\"The Centerpiece of Your Tailgate\"</i></font></para>",
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "BRAND PROMISE")?
        .para(
            "BodyText",
            "PopTop products are designed to be the functional and social centerpiece of every tailgate. \
             When you show up with a PopTop, you're not just bringing drinks - you're bringing the party. \
             The product should photograph exceptionally well and feel iconic when present for the big game.",
        )?
        .spacer(15.0);
    story.push(panel_table(
        &[
            PanelColumn::new("Design Principles").bullets(&[
                "Clean, modern aesthetics",
                "Premium material finishes",
                "Bold, visible branding",
                "Modular customization",
                "Instagram-worthy design",
            ]),
            PanelColumn::new("Brand Voice").bullets(&[
                "Confident but not arrogant",
                "Fun but not frivolous",
                "Premium but accessible",
                "Tradition-honoring",
                "Community-building",
            ]),
        ],
        HALF,
        PanelStyle::default(),
        styles,
    )?);
    story.page_break();
    Ok(())
}

fn operations(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "09 Operations &amp; Manufacturing")?;
    story
        .para("SubsectionTitle", "PRODUCT DEVELOPMENT STATUS")?
        .bullets(
            "BulletText",
            &[
                "Initial concept and product requirements defined",
                "CAD design and engineering underway (SolidWorks)",
                "Prototyping utilizing in-house 4'x4' 3D printing capability",
            ],
        )?
        .para(
            "BodyText",
            "Design philosophy emphasizes <b>durability, manufacturability, modularity, and licensing compliance</b>.",
        )?
        .spacer(15.0)
        .para("SubsectionTitle", "MANUFACTURING STRATEGY")?;
    story.push(panel_table(
        &[
            PanelColumn::new("Phase 1: Pilot").bullets(&[
                "Low-volume runs",
                "Domestic/near-shore mfg",
                "Rapid iteration",
                "Field testing",
            ]),
            PanelColumn::new("Phase 2: Scaled").bullets(&[
                "Overseas partners",
                "US-based QC",
                "Tooling investment",
                "Volume pricing",
            ]),
            PanelColumn::new("Phase 3: Full Scale").bullets(&[
                "Multiple SKUs",
                "Regional distribution",
                "Inventory optimization",
                "JIT fulfillment",
            ]),
        ],
        THIRD,
        shaded_panels(),
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "SUPPLY CHAIN &amp; RISKS")?;
    table(
        story,
        TableSpec::new(
            &["Area", "Approach / Mitigation"],
            &[
                &["Materials", "Food-grade sourcing with supplier redundancy"],
                &["Packaging", "Designed for eCommerce shipping, premium unboxing"],
                &["Inventory", "Aligned with seasonal demand (football season)"],
                &["Tooling Delays", "Early engagement, parallel development"],
                &["Licensing Delays", "Multiple school pipeline, early submission"],
            ],
        )
        .with_widths_in(&[2.0, 4.5]),
    )?;
    story.page_break();
    Ok(())
}

fn team(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "10 Team &amp; Advisors")?;
    story.para("SubsectionTitle", "CORE TEAM")?;
    table(
        story,
        TableSpec::new(
            &["Role", "Name", "Responsibility"],
            &[
                &["Founders / Equity Holders", "Alex Munn, Ross Munn", "LLC ownership, strategic direction"],
                &["Business Lead", "Paul Giarrizzo", "Business plan, execution strategy, operations"],
                &["Engineering", "Brian Williams", "SolidWorks CAD, 3D printing, prototyping"],
                &["Operations", "Nathan Childress", "Team member, execution support"],
            ],
        )
        .with_widths_in(&[1.75, 1.75, 3.0]),
    )?;
    story
        .spacer(15.0)
        .para("SubsectionTitle", "EXTERNAL PARTNERS")?;
    table(
        story,
        TableSpec::new(
            &["Function", "Partner"],
            &[&["Legal / IP", "Jeff Johnson (IP Law USA)"]],
        )
        .with_widths_in(&[2.0, 4.5]),
    )?;
    story
        .spacer(15.0)
        .para("SubsectionTitle", "TARGET ADVISORS")?
        .bullets(
            "BulletText",
            &[
                "eCommerce distribution executive",
                "Licensing specialist (collegiate/pro sports)",
                "Consumer hardware scaling operator",
            ],
        )?
        .spacer(15.0);
    story.push(titled_highlight_box(
        "Team Strengths",
        "The team combines <b>entrepreneurial drive</b> with <b>engineering capability</b> and \
         <b>business acumen</b>. In-house 3D printing capability (4'x4' printer) enables rapid \
         prototyping and iteration without external dependencies.",
        styles,
    )?);
    story.page_break();
    Ok(())
}

fn financials(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "11 Financial Projections")?;
    story.para("SubsectionTitle", "CORE ASSUMPTIONS")?;
    story.push(metrics_row(
        &[
            ("$375", "Average Selling Price"),
            ("$140", "Est. COGS/Unit"),
            ("62%", "Gross Margin"),
            ("$235", "Gross Profit/Unit"),
        ],
        styles,
    )?);
    story
        .spacer(20.0)
        .para("SubsectionTitle", "THREE-YEAR PROJECTIONS")?;
    table(
        story,
        TableSpec::new(
            &["Metric", "Year 1 (Launch)", "Year 2", "Year 3"],
            &[
                &["Units Sold", "2,500", "7,500", "20,000"],
                &["Revenue", "$937,500", "$2,812,500", "$7,500,000"],
                &["Gross Profit", "$587,500", "$1,762,500", "$4,700,000"],
                &["Gross Margin", "62.7%", "62.7%", "62.7%"],
            ],
        )
        .with_widths_in(&[1.625; 4]),
    )?;
    story
        .spacer(15.0)
        .para("SubsectionTitle", "YEAR 1 EXPENSE CATEGORIES")?
        .bullets(
            "BulletText",
            &[
                "Tooling &amp; manufacturing setup",
                "Licensing fees and royalties",
                "Initial inventory investment",
                "Marketing launch campaign",
                "Operations &amp; fulfillment",
            ],
        )?
        .spacer(10.0)
        .para(
            "BodyText",
            "<i>Projections exclude potential upside from additional product lines, international \
             expansion, or enterprise/B2B sales.</i>",
        )?
        .page_break();
    Ok(())
}

fn capital(story: &mut StoryBuilder<'_>) -> Result<()> {
    let styles = story.styles();
    section(story, "12 Capital &amp; Growth Strategy")?;
    story.para("SubsectionTitle", "INITIAL CAPITAL NEEDS")?;
    table(
        story,
        TableSpec::new(
            &["Category", "Use of Funds"],
            &[
                &["Tooling & Manufacturing", "Mold development, production setup"],
                &["Licensing Fees", "CLC/school licensing agreements"],
                &["Inventory", "Initial production run"],
                &["Marketing Launch", "Brand development, campaign execution"],
            ],
        )
        .with_widths_in(&[2.5, 4.0]),
    )?;
    story.spacer(15.0);
    story.push(titled_highlight_box(
        "Target Raise (Optional)",
        "<para align=\"center\"><font size=\"20\"><b>$500K - $1.5M</b></font></para>\
         <para align=\"center\">Strategic investors preferred. Ideal partner brings <b>distribution</b>, \
         <b>licensing leverage</b>, or <b>eComm scale</b>.</para>",
        styles,
    )?);
    story
        .spacer(15.0)
        .para("SubsectionTitle", "EXIT VISION")?;
    story.push(panel_table(
        &[
            PanelColumn::new("Strategic Acquirers").bullets(&[
                "Fanatics",
                "YETI",
                "Private equity roll-up",
                "Consumer products conglomerate",
            ]),
            PanelColumn::new("Exit Criteria").bullets(&[
                "Established brand leadership",
                "Proven unit economics",
                "Scalable licensing model",
                "Platform extensibility demonstrated",
            ]),
        ],
        HALF,
        PanelStyle::default(),
        styles,
    )?);
    story.spacer(20.0);
    story.push(titled_highlight_box(
        "Long-Term Vision",
        "PopTop aims to be the <b>default beverage system for fans</b>. Brand scales across \
         beverage platforms and becomes synonymous with premium tailgate experiences.",
        styles,
    )?);

    let body = styles.get("BodyText")?;
    let footer = body
        .derive("Footer")
        .with_alignment(Alignment::Center)
        .with_text_color(theme::TEXT_LIGHT)
        .with_font_size(9.0);
    let footer2 = footer.derive("Footer2");
    story
        .spacer(40.0)
        .para_with(
            &footer,
            "<i>This document is confidential and intended for strategic discussion purposes only.</i>",
        )?
        .para_with(&footer2, "PopTop, LLC | A Munn Family Holdings Company | Indiana")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::types::Size;

    #[test]
    fn body_text_is_overridden_in_place() {
        let styles = styles().expect("styles");
        let body = styles.get("BodyText").expect("BodyText");
        assert_eq!(body.text_color, theme::TEXT);
        assert_eq!(body.resolved_leading(), Pt::from_f32(14.0));
        assert_eq!(body.space_before, Pt::from_f32(6.0));
        let sub = styles.get("SubsectionTitle").expect("sub");
        assert_eq!(sub.text_transform, TextTransform::Uppercase);
        assert_eq!(
            styles.get("CustomBody").expect("custom").alignment,
            Alignment::Justify
        );
    }

    #[test]
    fn cover_draws_the_wordmark_tagline_and_meta() {
        let mut canvas = Canvas::new(Size::letter());
        draw_cover(&mut canvas, &DocContext::new(1, "First", Size::letter()));
        let commands = canvas.finish().pages.remove(0).commands;
        assert!(matches!(
            commands.get(2),
            Some(Command::DrawRect { width, height, .. })
                if *width == Pt::from_f32(612.0) && *height == Pt::from_f32(792.0)
        ));
        let strings: Vec<(Pt, Pt, &str)> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { x, y, text } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(strings.len(), 3 + COVER_META.len() + 1);
        let (pop_x, pop_y, _) = strings[0];
        let (top_x, _, _) = strings[1];
        let pop_w = StandardFont::HelveticaBold.string_width(Pt::from_f32(60.0), "Pop");
        let top_w = StandardFont::HelveticaBold.string_width(Pt::from_f32(60.0), "Top");
        assert_eq!(pop_y, inch(3.0));
        assert_eq!(top_x, pop_x + pop_w);
        assert_eq!(pop_x, (Pt::from_f32(612.0) - pop_w - top_w).mul_ratio(1, 2));
        assert_eq!(strings[2].2, "BUSINESS PLAN");
        assert_eq!(strings[4].1, Pt::from_f32(540.0));
        assert_eq!(strings[8].1, Pt::from_f32(620.0));
        assert!(strings.iter().all(|(_, _, text)| text.parse::<u32>().is_err()));
    }

    #[test]
    fn story_opens_with_a_hard_break() {
        let styles = styles().expect("styles");
        let story = story(&styles).expect("story");
        assert!(story[0].is_break_marker());
        assert_eq!(story[0].debug_name(), "PageBreak");
        assert_eq!(story[1].debug_name(), "Paragraph");
    }
}
