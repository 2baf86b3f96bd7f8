// Colored terminal output for catalogs and Woo reports.
//
// This module handles all terminal-specific formatting: colors, tables and
// section layout. The main.rs command handlers delegate here.

use colored::Colorize;
use serde_json::Value;

use super::{format_bytes, format_date, truncate_chars};
use crate::catalog::ckan::{Organization, PackageSearch};
use crate::catalog::dataset::{dcat_attr, Dataset};
use crate::catalog::dcat::Distribution;
use crate::woo::report::{RelatedDataset, WooReport};

/// Display a list of datasets as a table.
pub fn display_dataset_list(datasets: &[Dataset], total: usize) {
    if datasets.is_empty() {
        println!("Geen datasets gevonden.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Datasets ({} van {}) ===", datasets.len(), total).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<38} {:<44}",
        "#".dimmed(),
        "ID".dimmed(),
        "Titel".dimmed(),
    );
    println!("  {}", "-".repeat(88).dimmed());

    for (i, ds) in datasets.iter().enumerate() {
        println!(
            "  {:>4}. {:<38} {:<44}",
            i + 1,
            truncate_chars(&ds.identifier, 35).cyan(),
            truncate_chars(ds.display_title(), 41),
        );
    }
    println!();
}

/// Display one DCAT dataset with the attributes a reader cares about.
pub fn display_dataset_detail(dataset: &Dataset, raw: &Value) {
    let empty = Value::Null;
    let resource = raw.get("data").unwrap_or(raw);
    let attrs = resource.get("attributes").unwrap_or(&empty);

    println!("\n{}", format!("=== {} ===", dataset.display_title()).bold());
    println!("  ID: {}", dataset.identifier.cyan());

    if let Some(description) = &dataset.description {
        println!("\n  {}", truncate_chars(description, 400));
    }
    if !dataset.keywords.is_empty() {
        println!("\n  Trefwoorden: {}", dataset.keywords.join(", ").dimmed());
    }

    for (label, key) in [
        ("Uitgever", "publisher"),
        ("Thema", "theme"),
        ("Licentie", "license"),
    ] {
        if let Some(value) = dcat_attr(attrs, key).and_then(display_value) {
            println!("  {label}: {value}");
        }
    }
    for (label, key) in [("Uitgegeven", "issued"), ("Gewijzigd", "modified")] {
        if let Some(value) = dcat_attr(attrs, key).and_then(Value::as_str) {
            println!("  {label}: {}", format_date(value));
        }
    }
    println!();
}

/// Display the downloads of a dataset.
pub fn display_distributions(dataset_id: &str, distributions: &[Distribution]) {
    if distributions.is_empty() {
        println!("Geen distributies gevonden voor {dataset_id}.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Formaten voor {} ({}) ===", dataset_id, distributions.len()).bold()
    );
    println!();

    for dist in distributions {
        let size = dist.byte_size.map(format_bytes).unwrap_or_default();
        println!(
            "  {:<8} {} {}",
            dist.format.green().bold(),
            dist.title.as_deref().unwrap_or("(zonder titel)"),
            size.dimmed(),
        );
        if let Some(url) = &dist.access_url {
            println!("           {}", url.dimmed());
        }
    }
    println!();
}

/// Display a Woo report with colored section headers.
pub fn display_report(report: &WooReport) {
    let rule = "=".repeat(70);
    let title = report.title.as_deref().unwrap_or(&report.dataset_id);

    println!("\n{}", rule.dimmed());
    println!("{} {}", "WOO KOPPELING ANALYSE:".bold(), title.bold());
    println!("{}", rule.dimmed());
    println!("  Dataset ID: {}", report.dataset_id.cyan());
    println!(
        "  Relevantie score: {}",
        colorize_score(report.relevance_score)
    );

    section("GEËXTRAHEERDE TREFWOORDEN:");
    if report.keywords.is_empty() {
        println!("  {}", "(geen trefwoorden gevonden)".dimmed());
    } else {
        println!("  {}", report.keywords.join(", "));
    }

    section("GEÏDENTIFICEERDE ONDERWERPEN:");
    if report.topics.is_empty() {
        println!("  {}", "(geen specifieke onderwerpen gevonden)".dimmed());
    }
    for topic in &report.topics {
        println!("  • {}", topic.yellow());
    }
    if !report.sources.is_empty() {
        println!("  {}", "Herkomst:".dimmed());
        for source in &report.sources {
            println!("    {}", source.describe().dimmed());
        }
    }

    section("GERELATEERDE WOO CATEGORIEËN:");
    if report.categories.is_empty() {
        println!("  {}", "(geen directe categorieën gevonden)".dimmed());
    }
    for category in &report.categories {
        println!(
            "  • {} - {}",
            category.code.to_string().green().bold(),
            category.label
        );
        println!("    {} {}", "Reden:".dimmed(), category.justification);
    }

    section("AANBEVELINGEN:");
    if report.recommendations.is_empty() {
        println!("  Geen Woo-relevantie vastgesteld voor deze dataset.");
    } else {
        println!("  {}", report.recommendations);
    }

    section("AANBEVOLEN ZOEKTERMEN VOOR WOO-INDEX:");
    if report.search_terms.is_empty() {
        println!("  {}", "(geen zoektermen)".dimmed());
    }
    for term in &report.search_terms {
        println!("  • {term}");
    }

    section("WOO-INDEX:");
    println!("  {}", report.woo_index_url.underline());
    println!("{}", rule.dimmed());
}

/// Display datasets related to a topic or category.
pub fn display_related(term: &str, related: &[RelatedDataset<'_>]) {
    if related.is_empty() {
        println!("Geen datasets gevonden die gerelateerd zijn aan '{term}'.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Datasets gerelateerd aan '{}' ({}) ===", term, related.len()).bold()
    );
    println!();

    for (i, item) in related.iter().enumerate() {
        let codes: Vec<String> = item
            .analysis
            .matched_categories
            .iter()
            .map(|c| c.code.to_string())
            .collect();
        println!(
            "  {:>3}. {} {}",
            i + 1,
            truncate_chars(item.dataset.display_title(), 60),
            format!("({})", item.dataset.identifier).dimmed(),
        );
        println!(
            "       score {}  categorieën: {}",
            colorize_score(item.analysis.relevance_score()),
            codes.join(", ").green(),
        );
    }
    println!();
}

/// Display a CKAN package search page.
pub fn display_package_search(search: &PackageSearch, dataset_url: impl Fn(&str) -> String) {
    if search.results.is_empty() {
        println!("Geen datasets gevonden op data.overheid.nl.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== data.overheid.nl ({} van {} resultaten) ===",
            search.results.len(),
            search.count
        )
        .bold()
    );
    println!();

    for (i, package) in search.results.iter().enumerate() {
        let name = str_field(package, "name").unwrap_or("?");
        let title = str_field(package, "title").unwrap_or(name);
        let organization = package
            .get("organization")
            .and_then(|org| str_field(org, "title"))
            .unwrap_or("onbekende organisatie");
        let modified = str_field(package, "metadata_modified")
            .map(format_date)
            .unwrap_or_default();

        println!("  {:>3}. {}", i + 1, truncate_chars(title, 70).bold());
        println!(
            "       {}  {}  {}",
            organization.cyan(),
            modified.dimmed(),
            format!("{} bronnen", resource_count(package)).dimmed(),
        );
        println!("       {}", dataset_url(name).dimmed());
    }
    println!();
}

/// Display one CKAN package.
pub fn display_package_detail(
    dataset: &Dataset,
    raw: &Value,
    url: &str,
    resource_url: impl Fn(&str) -> String,
) {
    println!("\n{}", format!("=== {} ===", dataset.display_title()).bold());
    println!("  Naam: {}", dataset.identifier.cyan());
    if let Some(org) = raw.get("organization").and_then(|o| str_field(o, "title")) {
        println!("  Organisatie: {org}");
    }
    if let Some(license) = str_field(raw, "license_title") {
        println!("  Licentie: {license}");
    }
    if let Some(modified) = str_field(raw, "metadata_modified") {
        println!("  Gewijzigd: {}", format_date(modified));
    }
    if let Some(description) = &dataset.description {
        println!("\n  {}", truncate_chars(description, 400));
    }
    if !dataset.keywords.is_empty() {
        println!("\n  Tags: {}", dataset.keywords.join(", ").dimmed());
    }

    if let Some(resources) = raw.get("resources").and_then(Value::as_array) {
        println!("\n  Bronnen ({}):", resources.len());
        for resource in resources {
            let format = str_field(resource, "format")
                .filter(|f| !f.is_empty())
                .unwrap_or("?");
            let name = str_field(resource, "name").unwrap_or("(zonder naam)");
            println!("    {:<8} {}", format.green(), truncate_chars(name, 60));
            if let Some(id) = str_field(resource, "id") {
                println!("             {}", resource_url(id).dimmed());
            }
        }
    }
    println!("\n  {}", url.underline());
    println!();
}

/// Display organisations, largest catalogs first.
pub fn display_organizations(organizations: &[Organization], limit: usize) {
    if organizations.is_empty() {
        println!("Geen organisaties gevonden.");
        return;
    }

    let mut sorted: Vec<&Organization> = organizations.iter().collect();
    sorted.sort_by(|a, b| b.package_count.cmp(&a.package_count));

    println!(
        "\n{}",
        format!(
            "=== Organisaties ({} van {}) ===",
            limit.min(sorted.len()),
            sorted.len()
        )
        .bold()
    );
    println!();
    println!(
        "  {:<40} {:<40} {:>8}",
        "Naam".dimmed(),
        "Titel".dimmed(),
        "Datasets".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for org in sorted.into_iter().take(limit) {
        println!(
            "  {:<40} {:<40} {:>8}",
            truncate_chars(&org.name, 37).cyan(),
            truncate_chars(org.display_title(), 37),
            org.package_count,
        );
    }
    println!();
}

/// Display one organisation, with its datasets when they were requested.
pub fn display_organization_detail(org: &Organization) {
    println!("\n{}", format!("=== {} ===", org.display_title()).bold());
    println!("  Naam: {}", org.name.cyan());
    println!("  Datasets: {}", org.package_count);
    if let Some(description) = org.description.as_deref().filter(|d| !d.is_empty()) {
        println!("\n  {}", truncate_chars(description, 400));
    }

    if !org.packages.is_empty() {
        println!("\n  Datasets:");
        for package in &org.packages {
            let name = str_field(package, "name").unwrap_or("?");
            let title = str_field(package, "title").unwrap_or(name);
            println!("    • {} {}", truncate_chars(title, 60), format!("({name})").dimmed());
        }
    }
    println!();
}

fn section(header: &str) {
    println!("\n{}", header.bold());
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn resource_count(package: &Value) -> u64 {
    package
        .get("num_resources")
        .and_then(Value::as_u64)
        .or_else(|| {
            package
                .get("resources")
                .and_then(Value::as_array)
                .map(|r| r.len() as u64)
        })
        .unwrap_or(0)
}

/// DCAT attributes may be a string, a list, or an object with a name.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(display_value).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(_) => ["foaf:name", "name", "title", "@id"]
            .iter()
            .find_map(|key| value.get(*key).and_then(display_value)),
        _ => None,
    }
}

/// Colorize a relevance score: more connections, warmer color.
fn colorize_score(score: usize) -> colored::ColoredString {
    let text = score.to_string();
    match score {
        0 => text.dimmed(),
        1..=4 => text.yellow(),
        _ => text.green().bold(),
    }
}
