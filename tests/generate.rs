use poptop_docs::inspect::{extract_page_text, inspect_pdf_path};
use poptop_docs::{BuildReport, DocError, DocumentKind, Renderer};
use serde_json::Value;
use std::path::Path;

fn is_page_number(run: &str) -> bool {
    !run.is_empty() && run.chars().all(|c| c.is_ascii_digit())
}

#[test]
fn write_all_produces_parseable_pdfs_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let renderer = Renderer::builder()
        .output_dir(dir.path())
        .verify(true)
        .build()
        .expect("renderer");

    let reports = renderer.write_all(&DocumentKind::ALL).expect("write all");
    let kinds: Vec<DocumentKind> = reports.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, DocumentKind::ALL.to_vec());

    for report in &reports {
        assert!(report.verified);
        assert_eq!(report.path, dir.path().join(report.kind.file_name()));
        let inspected = inspect_pdf_path(&report.path).expect("inspect");
        assert_eq!(inspected.page_count, report.pages);
        assert_eq!(inspected.file_size_bytes, report.bytes);
        assert_eq!(inspected.title.as_deref(), Some(report.kind.title()));
        assert_eq!(report.sha256.len(), 64);
    }
    // Cover plus twelve sections that each start on a fresh page.
    assert!(reports[0].pages >= 13);
}

#[test]
fn business_plan_cover_has_no_page_number() {
    let document = DocumentKind::BusinessPlan
        .assemble()
        .and_then(|template| template.build())
        .expect("build");

    let cover = document.pages[0].text_runs();
    assert!(cover.contains(&"BUSINESS PLAN"));
    assert!(cover.contains(&"Pop"));
    assert!(cover.contains(&"Jurisdiction: Indiana LLC"));
    assert!(!cover.iter().any(|run| is_page_number(run)));

    let first_body = document.pages[1].text_runs();
    assert!(first_body.contains(&"01 Executive Summary"));
    assert!(first_body.contains(&"1"));
}

#[test]
fn execution_plans_number_every_page() {
    for kind in [DocumentKind::ExecutionPlan, DocumentKind::ExecutionPlanV2] {
        let document = kind
            .assemble()
            .and_then(|template| template.build())
            .expect("build");
        for (idx, page) in document.pages.iter().enumerate() {
            let expected = (idx + 1).to_string();
            assert!(
                page.text_runs().contains(&expected.as_str()),
                "{kind} page {} is missing its number",
                idx + 1
            );
        }
    }
}

#[test]
fn cover_text_survives_into_the_pdf() {
    let renderer = Renderer::builder().build().expect("renderer");
    let rendered = renderer.render(DocumentKind::BusinessPlan).expect("render");
    let text = extract_page_text(&rendered.bytes, 1).expect("page text");
    assert!(text.contains("BUSINESS PLAN"));
    assert!(text.contains("Centerpiece of Your Tailgate"));
}

#[test]
fn missing_output_dir_fails_unless_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nested").join("out");

    let renderer = Renderer::builder()
        .output_dir(&missing)
        .build()
        .expect("renderer");
    let err = renderer
        .write_document(DocumentKind::ExecutionPlan)
        .expect_err("missing dir");
    assert!(matches!(err, DocError::OutputDir(path) if path == missing));

    let renderer = Renderer::builder()
        .output_dir(&missing)
        .create_dirs(true)
        .compress(false)
        .build()
        .expect("renderer");
    let report = renderer
        .write_document(DocumentKind::ExecutionPlan)
        .expect("write");
    assert!(report.path.is_file());
    assert!(report.bytes > 0);
}

fn trace_summaries(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .expect("read trace")
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).expect("json line"))
        .filter(|event| event["type"] == "debug.summary")
        .collect()
}

fn assert_summary_matches(summaries: &[Value], report: &BuildReport) {
    let matching: Vec<&Value> = summaries
        .iter()
        .filter(|summary| summary["context"] == report.kind.slug())
        .collect();
    assert_eq!(matching.len(), 1, "{} summaries", report.kind);
    let counts = &matching[0]["counts"];
    assert_eq!(counts["layout.pages"], report.pages as u64, "{}", report.kind);
    assert_eq!(
        counts["layout.page_break"],
        (report.pages - 1) as u64,
        "{}",
        report.kind
    );
}

#[test]
fn debug_trace_counts_one_break_between_pages() {
    let dir = tempfile::tempdir().expect("tempdir");
    let trace = dir.path().join("layout.jsonl");
    let renderer = Renderer::builder()
        .output_dir(dir.path())
        .debug_log(&trace)
        .build()
        .expect("renderer");

    let report = renderer
        .write_document(DocumentKind::BusinessPlan)
        .expect("write");
    assert_summary_matches(&trace_summaries(&trace), &report);
}

#[test]
fn parallel_builds_keep_their_own_trace_summaries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let trace = dir.path().join("layout.jsonl");
    let renderer = Renderer::builder()
        .output_dir(dir.path())
        .debug_log(&trace)
        .build()
        .expect("renderer");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("pool");
    let reports = pool
        .install(|| renderer.write_all(&DocumentKind::ALL))
        .expect("write all");

    let summaries = trace_summaries(&trace);
    assert_eq!(summaries.len(), reports.len());
    for report in &reports {
        assert_summary_matches(&summaries, report);
    }
}
