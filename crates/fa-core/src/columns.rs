//! Column and data-source registries
//!
//! Static configuration describing the firms table: which columns exist, how
//! they render, which can be sorted, and which column subset each upstream
//! data source exposes. Both the query builder (column allowlists) and the
//! exporters (header labels) consult this registry.

/// How a column's values should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
    Currency,
    Url,
    Rating,
}

/// A typed column descriptor
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    /// Unbounded free-text columns are excluded from sorting: their content
    /// makes the sort order unstable and the remote sort slow.
    pub sortable: bool,
}

const fn col(name: &'static str, label: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, label, kind, sortable: true }
}

const fn text_col(name: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec { name, label, kind: ColumnKind::Text, sortable: false }
}

/// Every firms-table column the platform knows about
pub const FIRM_COLUMNS: &[ColumnSpec] = &[
    col("firm_id", "Firm ID", ColumnKind::Text),
    col("firm_name", "Firm Name", ColumnKind::Text),
    col("city", "City", ColumnKind::Text),
    col("state", "State", ColumnKind::Text),
    col("zip_code", "Zip", ColumnKind::Text),
    text_col("full_address", "Address"),
    col("phone", "Phone", ColumnKind::Text),
    text_col("website", "Website"),
    col("email", "Email", ColumnKind::Text),
    col("credentials", "Credentials", ColumnKind::Text),
    col("acquisition_score", "Score", ColumnKind::Numeric),
    col("acquisition_tier", "Tier", ColumnKind::Text),
    col("client_segment", "Segment", ColumnKind::Text),
    col("estimated_revenue", "Est. Revenue", ColumnKind::Currency),
    col("annual_revenue", "Annual Revenue", ColumnKind::Currency),
    col("asking_price", "Asking Price", ColumnKind::Currency),
    col("google_rating", "Rating", ColumnKind::Rating),
    col("google_review_count", "Reviews", ColumnKind::Numeric),
    col("for_sale", "For Sale", ColumnKind::Text),
    col("sale_status", "Sale Status", ColumnKind::Text),
    col("broker_name", "Broker", ColumnKind::Text),
    text_col("listing_notes", "Notes"),
    text_col("sources", "Sources"),
    col("latitude", "Latitude", ColumnKind::Numeric),
    col("longitude", "Longitude", ColumnKind::Numeric),
    col("wealth_mgmt_potential", "Wealth Mgmt Potential", ColumnKind::Numeric),
    col("primary_service", "Primary Service", ColumnKind::Text),
    col("employee_count", "Employees", ColumnKind::Numeric),
    col("estimated_employee_count", "Est. Employees", ColumnKind::Numeric),
    col("software", "Software", ColumnKind::Text),
];

/// Look up a column descriptor by name
pub fn column(name: &str) -> Option<&'static ColumnSpec> {
    FIRM_COLUMNS.iter().find(|c| c.name == name)
}

/// Display label for a column; unknown columns fall back to the raw name
pub fn label(name: &str) -> &str {
    column(name).map(|c| c.label).unwrap_or(name)
}

pub fn is_sortable(name: &str) -> bool {
    column(name).map(|c| c.sortable).unwrap_or(false)
}

/// Numeric columns whose per-column filter is a floor (`>= threshold`).
/// The raw-data view offers a single input box per column, so a numeric
/// filter is a lower bound rather than a range.
pub const FLOOR_FILTER_COLUMNS: &[&str] = &[
    "annual_revenue",
    "asking_price",
    "estimated_revenue",
    "acquisition_score",
    "google_rating",
    "google_review_count",
];

/// One upstream data pipeline and the column subset it populates
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec {
    /// Key as it appears inside the delimited `sources` provenance string
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub columns: &'static [&'static str],
}

/// The seven ingestion pipelines feeding the firms table
pub const SOURCES: &[SourceSpec] = &[
    SourceSpec {
        key: "cpadirectory",
        label: "CPA Directory",
        description: "Name & location from CPAdirectory.com",
        columns: &[
            "firm_name", "city", "state", "zip_code", "credentials",
            "acquisition_tier", "acquisition_score",
        ],
    },
    SourceSpec {
        key: "state_cpa_boards",
        label: "State CPA Boards",
        description: "Licensed CPAs from AL, FL, TN boards",
        columns: &[
            "firm_name", "city", "state", "credentials",
            "acquisition_tier", "acquisition_score",
        ],
    },
    SourceSpec {
        key: "google_maps",
        label: "Google Maps",
        description: "Address, phone, website, ratings",
        columns: &[
            "firm_name", "city", "state", "full_address", "phone", "website",
            "google_rating", "google_review_count",
            "acquisition_tier", "acquisition_score",
        ],
    },
    SourceSpec {
        key: "google_maps_detail",
        label: "Google Maps Detail",
        description: "Extended detail for AL, FL, GA, MS, NC, SC, TN",
        columns: &[
            "firm_name", "city", "state", "full_address", "phone", "website",
            "google_rating", "google_review_count",
            "acquisition_tier", "acquisition_score",
        ],
    },
    SourceSpec {
        key: "accounting_practice_exchange",
        label: "Practice Exchange",
        description: "Active M&A listings with revenue & broker data",
        columns: &[
            "firm_name", "city", "state", "annual_revenue", "asking_price",
            "sale_status", "broker_name", "listing_notes",
            "acquisition_tier", "acquisition_score",
        ],
    },
    SourceSpec {
        key: "accounting_practice_sales",
        label: "APS Listings",
        description: "Live for-sale listings from accountingpracticesales.com",
        columns: &[
            "firm_name", "state", "annual_revenue", "asking_price",
            "sale_status", "broker_name", "credentials",
            "acquisition_tier", "acquisition_score",
        ],
    },
    SourceSpec {
        key: "secretary_of_state",
        label: "Secretary of State",
        description: "SC business entity registrations",
        columns: &[
            "firm_name", "city", "state", "full_address",
            "acquisition_tier", "acquisition_score",
        ],
    },
];

/// Look up a source descriptor by key
pub fn source(key: &str) -> Option<&'static SourceSpec> {
    SOURCES.iter().find(|s| s.key == key)
}

/// Covered states, abbreviation and display name
pub const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("LA", "Louisiana"),
    ("MS", "Mississippi"),
    ("NC", "North Carolina"),
    ("SC", "South Carolina"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
];

pub fn state_name(abbr: &str) -> &str {
    STATES
        .iter()
        .find(|(a, _)| *a == abbr)
        .map(|(_, n)| *n)
        .unwrap_or(abbr)
}

/// Acquisition tiers, best first
pub const TIERS: &[&str] = &["A", "B", "C", "D"];

/// Client segments, key and display label
pub const SEGMENTS: &[(&str, &str)] = &[
    ("hnw_individuals", "HNW Individuals"),
    ("professionals", "Professionals"),
    ("mixed", "Mixed"),
    ("small_business", "Small Business"),
    ("tax_only", "Tax Only"),
    ("unknown", "Unknown"),
];

/// Fields tracked by the data-completeness report
pub const COMPLETENESS_FIELDS: &[&str] = &[
    "firm_name", "city", "state", "full_address", "zip_code",
    "phone", "website", "email", "annual_revenue", "for_sale",
    "google_rating", "google_review_count", "credentials",
    "latitude", "longitude", "estimated_revenue", "client_segment",
    "wealth_mgmt_potential", "acquisition_score", "acquisition_tier",
    "primary_service", "employee_count", "estimated_employee_count",
    "sale_status", "broker_name", "asking_price", "software",
];
