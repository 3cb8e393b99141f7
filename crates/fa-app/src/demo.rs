//! Demo dataset
//!
//! Synthetic firms for running the platform without a hosted store. Seeded,
//! so repeated runs browse the same data.

use fa_core::{columns, Row, Value};
use fa_data::{MemoryStore, FIRMS_TABLE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NAME_STEMS: &[&str] = &[
    "Alpha", "Bayside", "Crestview", "Delta", "Evergreen", "Foothill", "Gulfstream", "Harbor",
    "Ironwood", "Juniper", "Keystone", "Lakeshore", "Magnolia", "Northside", "Oakmont",
    "Palmetto", "Quail Ridge", "Riverbend", "Summit", "Tidewater",
];

const NAME_SUFFIXES: &[&str] =
    &["CPA", "Tax Group", "Advisors", "Accounting", "& Associates", "Financial Services"];

const CITIES: &[&str] = &[
    "Tampa", "Atlanta", "Birmingham", "Nashville", "Charlotte", "Charleston", "Jackson",
    "Orlando", "Savannah", "Memphis", "Mobile", "Columbia",
];

const SERVICES: &[&str] = &["Tax", "Audit", "Bookkeeping", "Advisory", "Wealth Management"];

const BROKERS: &[&str] = &["Poe Group", "APS", "Sunbelt", "Private"];

pub fn demo_store(count: usize) -> MemoryStore {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = (0..count).map(|i| firm(i, &mut rng)).collect();
    MemoryStore::new(FIRMS_TABLE, rows)
}

fn firm(i: usize, rng: &mut StdRng) -> Row {
    let state = pick(rng, columns::STATES).0;
    let city = pick(rng, CITIES);
    let name = format!("{} {}", pick(rng, NAME_STEMS), pick(rng, NAME_SUFFIXES));
    let score = rng.gen_range(20.0..100.0f64).round();
    let for_sale = rng.gen_bool(0.1);

    let mut row = Row::new();
    row.insert("firm_id".into(), format!("F{:05}", i).into());
    row.insert("firm_name".into(), name.clone().into());
    row.insert("city".into(), (*city).into());
    row.insert("state".into(), state.into());
    row.insert("zip_code".into(), format!("{:05}", rng.gen_range(27_000..39_999)).into());
    row.insert("phone".into(), optional(rng, 0.8, phone));
    row.insert(
        "website".into(),
        optional(rng, 0.5, |_| {
            Value::Text(format!("https://{}.example.com", name.to_lowercase().replace(' ', "")))
        }),
    );
    row.insert("credentials".into(), "CPA".into());
    row.insert("acquisition_score".into(), Value::Number(score));
    row.insert("acquisition_tier".into(), tier_for(score).into());
    row.insert("client_segment".into(), pick(rng, columns::SEGMENTS).0.into());
    row.insert(
        "estimated_revenue".into(),
        Value::Number((rng.gen_range(100.0..3_000.0f64) * 1_000.0).round()),
    );
    row.insert(
        "annual_revenue".into(),
        optional(rng, 0.3, |rng| {
            Value::Number((rng.gen_range(100.0..3_000.0f64) * 1_000.0).round())
        }),
    );
    row.insert(
        "google_rating".into(),
        optional(rng, 0.6, |rng| {
            Value::Number((rng.gen_range(3.0..5.0f64) * 10.0).round() / 10.0)
        }),
    );
    row.insert(
        "google_review_count".into(),
        optional(rng, 0.6, |rng| Value::Number(rng.gen_range(0..400) as f64)),
    );
    row.insert("for_sale".into(), Value::Bool(for_sale));
    if for_sale {
        row.insert("sale_status".into(), "active".into());
        row.insert("broker_name".into(), (*pick(rng, BROKERS)).into());
        row.insert(
            "asking_price".into(),
            Value::Number((rng.gen_range(200.0..4_000.0f64) * 1_000.0).round()),
        );
    } else {
        row.insert("sale_status".into(), Value::Null);
        row.insert("broker_name".into(), Value::Null);
        row.insert("asking_price".into(), Value::Null);
    }
    row.insert("primary_service".into(), (*pick(rng, SERVICES)).into());
    row.insert("wealth_mgmt_potential".into(), Value::Number(rng.gen_range(0.0..100.0f64).round()));
    row.insert("sources".into(), sources(rng).into());

    // roughly the share of the real table that is geocoded
    if rng.gen_bool(0.6) {
        row.insert("latitude".into(), Value::Number(rng.gen_range(25.0..36.5f64)));
        row.insert("longitude".into(), Value::Number(rng.gen_range(-90.0..-76.0f64)));
    } else {
        row.insert("latitude".into(), Value::Null);
        row.insert("longitude".into(), Value::Null);
    }

    row
}

fn tier_for(score: f64) -> &'static str {
    if score >= 80.0 {
        "A"
    } else if score >= 60.0 {
        "B"
    } else if score >= 40.0 {
        "C"
    } else {
        "D"
    }
}

fn sources(rng: &mut StdRng) -> String {
    let mut keys: Vec<&str> = Vec::new();
    for source in columns::SOURCES {
        if rng.gen_bool(0.3) {
            keys.push(source.key);
        }
    }
    if keys.is_empty() {
        keys.push(columns::SOURCES[0].key);
    }
    keys.join(", ")
}

fn phone(rng: &mut StdRng) -> Value {
    Value::Text(format!(
        "({}) {}-{:04}",
        rng.gen_range(200..990),
        rng.gen_range(200..990),
        rng.gen_range(0..10_000)
    ))
}

fn optional(rng: &mut StdRng, p: f64, value: impl FnOnce(&mut StdRng) -> Value) -> Value {
    if rng.gen_bool(p) {
        value(rng)
    } else {
        Value::Null
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
