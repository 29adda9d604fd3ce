//! Configurator subcommands: default, resolve, exact, options, available.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use sku_eval::{Configurator, ConfiguratorState, FacetOptions, Selection};
use sku_interchange::{Product, SpecValue, Variant};

use super::Context;
use crate::input::{self, Assignment};

#[derive(Serialize)]
struct ExactMatch<'a> {
    selection: &'a Selection,
    variant: Option<&'a Variant>,
}

#[derive(Serialize)]
struct Availability<'a> {
    key: &'a str,
    value: &'a str,
    available: bool,
}

fn configurator<'a>(ctx: &Context, product: &'a Product) -> Configurator<'a> {
    Configurator::with_policy(product, ctx.merch_config().defaults)
}

/// The selection from `path`, or the default selection when absent.
fn starting_selection(ctx: &Context, cfg: &Configurator<'_>, path: Option<&Path>) -> Selection {
    match path {
        Some(p) => input::load_selection(ctx, p),
        None => cfg.initial_state().selection,
    }
}

pub(crate) fn cmd_default(ctx: &Context, product_path: &Path) {
    let product = input::load_product(ctx, product_path);
    let state = configurator(ctx, &product).initial_state();
    ctx.emit(&state, render_state);
}

pub(crate) fn cmd_resolve(
    ctx: &Context,
    product_path: &Path,
    selection_path: Option<&Path>,
    change: &Assignment,
) {
    let product = input::load_product(ctx, product_path);
    let cfg = configurator(ctx, &product);
    let current = starting_selection(ctx, &cfg, selection_path);
    let value = SpecValue::Text(change.value.clone());
    let state = cfg.select(&current, &change.key, &value);
    tracing::info!(
        key = %change.key,
        value = %change.value,
        variant = state.variant_id.as_deref().unwrap_or("none"),
        "resolved selection change"
    );
    ctx.emit(&state, render_state);
}

pub(crate) fn cmd_exact(ctx: &Context, product_path: &Path, selection_path: &Path) {
    let product = input::load_product(ctx, product_path);
    let selection = input::load_selection(ctx, selection_path);
    let cfg = configurator(ctx, &product);
    let result = ExactMatch {
        selection: &selection,
        variant: cfg.index().find_exact(&selection),
    };
    ctx.emit(&result, |r| match r.variant {
        Some(v) => format!("{}\n", v.id),
        None => "no exact match\n".to_string(),
    });
}

pub(crate) fn cmd_options(ctx: &Context, product_path: &Path, selection_path: Option<&Path>) {
    let product = input::load_product(ctx, product_path);
    let cfg = configurator(ctx, &product);
    let selection = starting_selection(ctx, &cfg, selection_path);
    let options = cfg.index().options(&selection);
    ctx.emit(&options, render_options);
}

pub(crate) fn cmd_available(
    ctx: &Context,
    product_path: &Path,
    key: &str,
    value: &str,
    selection_path: Option<&Path>,
) {
    let product = input::load_product(ctx, product_path);
    let cfg = configurator(ctx, &product);
    let selection = starting_selection(ctx, &cfg, selection_path);
    let available = cfg
        .index()
        .is_available(key, &SpecValue::from(value), &selection);
    let result = Availability {
        key,
        value,
        available,
    };
    ctx.emit(&result, |r| {
        let word = if r.available { "available" } else { "unavailable" };
        format!("{}={}: {}\n", r.key, r.value, word)
    });
}

fn render_selection(selection: &Selection) -> String {
    if selection.is_empty() {
        return "(empty)".to_string();
    }
    selection
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_options(options: &FacetOptions) -> String {
    let mut out = String::new();
    for (key, values) in options.iter() {
        let _ = writeln!(out, "  {}: {}", key, values.join(", "));
    }
    out
}

fn render_state(state: &ConfiguratorState) -> String {
    let mut out = String::new();
    match &state.variant_id {
        Some(id) => {
            let stock = if state.in_stock { "in stock" } else { "out of stock" };
            let _ = writeln!(out, "variant: {} ({})", id, stock);
        }
        None => {
            let _ = writeln!(out, "variant: none");
        }
    }
    if let Some(price) = &state.price {
        let _ = writeln!(out, "price: {}", price);
    }
    let _ = writeln!(out, "selection: {}", render_selection(&state.selection));
    let _ = writeln!(out, "options:");
    out.push_str(&render_options(&state.options));
    out
}
