// Criterion benchmarks for TPE Matching

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tpe_matching::core::{format_contractor_contacts, Matcher, TagList};
use tpe_matching::models::{Contractor, ContractorContactRow, Partner};

const AREAS: [&str; 6] = [
    "marketing_sales",
    "team_building",
    "operations",
    "hiring",
    "customer_retention",
    "finance",
];

fn create_partner(id: usize) -> Partner {
    Partner {
        id: id as i32,
        company_name: format!("Partner {}", id),
        description: String::new(),
        logo_url: String::new(),
        website: String::new(),
        service_categories: String::new(),
        powerconfidence_score: Some((id % 100) as f64),
        key_differentiators: TagList::new(),
        testimonials: None,
        success_stories: None,
        focus_areas_served: TagList::from_list([AREAS[id % AREAS.len()], AREAS[(id + 2) % AREAS.len()]]),
    }
}

fn create_contractor() -> Contractor {
    Contractor {
        id: 1,
        focus_areas: TagList::from_list(["marketing_sales", "operations", "hiring"]),
        primary_focus_area: Some("marketing_sales".to_string()),
    }
}

fn bench_tag_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_parsing");

    let inputs = [
        ("json_array", r#"["marketing_sales","team_building","operations"]"#),
        ("pg_array", r#"{marketing_sales,"team building",operations}"#),
        ("delimited", "marketing_sales, team_building, operations"),
        ("malformed", r#"["marketing_sales", "team_building"#),
    ];

    for (name, raw) in inputs {
        group.bench_with_input(BenchmarkId::new("parse", name), raw, |b, raw| {
            b.iter(|| TagList::parse(black_box(Some(raw))));
        });
    }

    group.finish();
}

fn bench_partner_selection(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let contractor = create_contractor();

    let mut group = c.benchmark_group("partner_selection");

    for candidate_count in [10, 100, 1000, 10000].iter() {
        let candidates: Vec<Partner> = (0..*candidate_count).map(create_partner).collect();

        group.bench_with_input(
            BenchmarkId::new("select", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    matcher.select(
                        black_box(&contractor),
                        black_box(candidates.clone()),
                        black_box(2),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_contractor_export(c: &mut Criterion) {
    let rows: Vec<ContractorContactRow> = (0..500)
        .map(|i| ContractorContactRow {
            id: i,
            name: Some(format!("Contractor Number {}", i)),
            email: Some(format!("c{}@example.com", i)),
            current_stage: Some("matching".to_string()),
            focus_areas: TagList::from_list([AREAS[i as usize % AREAS.len()], "Team Building"]),
            ..Default::default()
        })
        .collect();

    c.bench_function("format_contractor_contacts_500", |b| {
        b.iter(|| format_contractor_contacts(black_box(&rows)));
    });
}

criterion_group!(
    benches,
    bench_tag_parsing,
    bench_partner_selection,
    bench_contractor_export
);

criterion_main!(benches);
