//! Catalog subcommands: filter, sections, facets.

use std::fmt::Write as _;
use std::path::Path;

use sku_eval::{FacetCount, Section};

use super::Context;
use crate::fail;
use crate::input;

pub(crate) fn cmd_filter(ctx: &Context, catalog_path: &Path, rules_path: &Path) {
    let products = input::load_catalog(ctx, catalog_path);
    let rules = input::load_rules(ctx, rules_path);
    let ids: Vec<String> = sku_eval::filter_products(&products, &rules)
        .into_iter()
        .map(|p| p.id.clone())
        .collect();
    tracing::info!(
        matched = ids.len(),
        total = products.len(),
        rules = rules.len(),
        "filtered catalog"
    );
    ctx.emit(&ids, |ids| {
        ids.iter().fold(String::new(), |mut out, id| {
            let _ = writeln!(out, "{}", id);
            out
        })
    });
}

pub(crate) fn cmd_sections(ctx: &Context, catalog_path: &Path) {
    if crate::config::config_path(ctx.config.as_deref()).is_none() {
        fail(
            "error: sections need a config file (--config or SKU_CONFIG)",
            ctx.output,
            ctx.quiet,
        );
    }
    let config = ctx.merch_config();
    let products = input::load_catalog(ctx, catalog_path);
    let sections = sku_eval::build_sections(&products, &config.sections);
    ctx.emit(&sections, |sections| render_sections(sections));
}

pub(crate) fn cmd_facets(ctx: &Context, catalog_path: &Path, key: &str) {
    let products = input::load_catalog(ctx, catalog_path);
    let counts = sku_eval::facet_counts(&products, key);
    ctx.emit(&counts, |counts| render_counts(counts));
}

fn render_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        match &section.title {
            Some(title) => {
                let _ = writeln!(out, "{} ({})", section.id, title);
            }
            None => {
                let _ = writeln!(out, "{}", section.id);
            }
        }
        if section.product_ids.is_empty() {
            let _ = writeln!(out, "  (no products)");
        }
        for id in &section.product_ids {
            let _ = writeln!(out, "  {}", id);
        }
    }
    out
}

fn render_counts(counts: &[FacetCount]) -> String {
    let mut out = String::new();
    for c in counts {
        let _ = writeln!(out, "{}\t{}", c.value, c.count);
    }
    out
}
