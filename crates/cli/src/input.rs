//! Reading input documents and command-line values.
//!
//! Every loader reports a readable error and exits on failure, so command
//! handlers only ever see parsed values.

use std::path::Path;
use std::str::FromStr;

use sku_eval::Selection;
use sku_interchange::{FilterRule, Product};

use crate::commands::Context;
use crate::fail;

/// A `key=value` facet change from `--set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment {
    pub key: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty facet key in '{}'", s));
        }
        Ok(Assignment {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Read and parse a JSON file.
pub(crate) fn read_json(ctx: &Context, path: &Path, what: &str) -> serde_json::Value {
    let content = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            let msg = format!("error: {} file not found: {}", what, path.display());
            fail(&msg, ctx.output, ctx.quiet);
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error: invalid JSON in {}: {}", path.display(), e);
            fail(&msg, ctx.output, ctx.quiet);
        }
    }
}

pub(crate) fn load_product(ctx: &Context, path: &Path) -> Product {
    let doc = read_json(ctx, path, "product");
    match sku_interchange::parse_product(&doc) {
        Ok(product) => {
            tracing::debug!(
                product = %product.id,
                variants = product.variants.len(),
                "loaded product"
            );
            product
        }
        Err(e) => fail(&format!("error: {}: {}", path.display(), e), ctx.output, ctx.quiet),
    }
}

pub(crate) fn load_catalog(ctx: &Context, path: &Path) -> Vec<Product> {
    let doc = read_json(ctx, path, "catalog");
    match sku_interchange::from_catalog(&doc) {
        Ok(products) => {
            tracing::debug!(products = products.len(), "loaded catalog");
            products
        }
        Err(e) => fail(&format!("error: {}: {}", path.display(), e), ctx.output, ctx.quiet),
    }
}

pub(crate) fn load_rules(ctx: &Context, path: &Path) -> Vec<FilterRule> {
    let doc = read_json(ctx, path, "rules");
    match sku_interchange::parse_rules(&doc) {
        Ok(rules) => rules,
        Err(e) => fail(&format!("error: {}: {}", path.display(), e), ctx.output, ctx.quiet),
    }
}

pub(crate) fn load_selection(ctx: &Context, path: &Path) -> Selection {
    let doc = read_json(ctx, path, "selection");
    match sku_eval::parse_selection(&doc) {
        Ok(selection) => selection,
        Err(e) => fail(&format!("error: {}: {}", path.display(), e), ctx.output, ctx.quiet),
    }
}
