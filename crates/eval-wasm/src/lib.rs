use slab::Slab;
use sku_eval::{Configurator, Selection};
use sku_interchange::{Product, SpecValue};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

mod inspect;

thread_local! {
    static PRODUCTS: RefCell<Slab<Product>> = const { RefCell::new(Slab::new()) };
}

fn error_json(msg: &str) -> String {
    serde_json::json!({ "error": msg }).to_string()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(&format!("serialization error: {}", e)))
}

fn with_product<F>(handle: u32, f: F) -> String
where
    F: FnOnce(&Product) -> String,
{
    PRODUCTS.with(|products| {
        let products = products.borrow();
        match products.get(handle as usize) {
            Some(product) => f(product),
            None => error_json(&format!("invalid product handle: {}", handle)),
        }
    })
}

/// Parse a selection document. Empty input and `null` are the empty
/// selection.
fn parse_selection(json_str: &str) -> Result<Selection, String> {
    if json_str.trim().is_empty() {
        return Ok(Selection::new());
    }
    let val: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| format!("invalid selection JSON: {}", e))?;
    sku_eval::parse_selection(&val).map_err(|e| e.to_string())
}

/// Parse a facet value. Anything that is not valid JSON is taken as a
/// bare string, so `16GB` and `"16GB"` are the same value.
fn parse_value(key: &str, json_str: &str) -> Result<SpecValue, String> {
    match serde_json::from_str::<serde_json::Value>(json_str) {
        Ok(val) => SpecValue::from_json(&val)
            .ok_or_else(|| format!("invalid facet value for '{}': expected a scalar", key)),
        Err(_) => Ok(SpecValue::Text(json_str.to_string())),
    }
}

#[wasm_bindgen]
pub fn load_product(product_json: &str) -> String {
    let doc: serde_json::Value = match serde_json::from_str(product_json) {
        Ok(v) => v,
        Err(e) => return error_json(&format!("invalid JSON: {}", e)),
    };

    let product = match sku_interchange::parse_product(&doc) {
        Ok(p) => p,
        Err(e) => return error_json(&format!("invalid product: {}", e)),
    };

    let handle = PRODUCTS.with(|products| products.borrow_mut().insert(product));

    serde_json::json!({ "handle": handle }).to_string()
}

#[wasm_bindgen]
pub fn free_product(handle: u32) {
    PRODUCTS.with(|products| {
        let mut products = products.borrow_mut();
        if products.contains(handle as usize) {
            products.remove(handle as usize);
        }
    });
}

/// Configurator state for the default selection.
#[wasm_bindgen]
pub fn default_selection(handle: u32) -> String {
    with_product(handle, |product| {
        to_json(&Configurator::new(product).initial_state())
    })
}

/// Configurator state after setting `key` to `value_json` on top of
/// `selection_json`.
#[wasm_bindgen]
pub fn resolve_selection(handle: u32, selection_json: &str, key: &str, value_json: &str) -> String {
    let selection = match parse_selection(selection_json) {
        Ok(s) => s,
        Err(e) => return error_json(&e),
    };
    let value = match parse_value(key, value_json) {
        Ok(v) => v,
        Err(e) => return error_json(&e),
    };

    with_product(handle, |product| {
        to_json(&Configurator::new(product).select(&selection, key, &value))
    })
}

#[wasm_bindgen]
pub fn facet_options(handle: u32, selection_json: &str) -> String {
    let selection = match parse_selection(selection_json) {
        Ok(s) => s,
        Err(e) => return error_json(&e),
    };

    with_product(handle, |product| {
        to_json(&sku_eval::options(&product.variants, &selection))
    })
}

#[wasm_bindgen]
pub fn facet_available(handle: u32, selection_json: &str, key: &str, value_json: &str) -> String {
    let selection = match parse_selection(selection_json) {
        Ok(s) => s,
        Err(e) => return error_json(&e),
    };
    let value = match parse_value(key, value_json) {
        Ok(v) => v,
        Err(e) => return error_json(&e),
    };

    with_product(handle, |product| {
        let available = sku_eval::is_available(key, &value, &product.variants, &selection);
        serde_json::json!({ "available": available }).to_string()
    })
}

#[wasm_bindgen]
pub fn find_exact_variant(handle: u32, selection_json: &str) -> String {
    let selection = match parse_selection(selection_json) {
        Ok(s) => s,
        Err(e) => return error_json(&e),
    };

    with_product(handle, |product| {
        let variant = sku_eval::find_exact(&selection, &product.variants);
        to_json(&serde_json::json!({ "variant": variant }))
    })
}

#[wasm_bindgen]
pub fn inspect_product(handle: u32) -> String {
    with_product(handle, |product| inspect::build_inspect(product).to_string())
}

/// Whether a product document satisfies a rule set. Stateless.
#[wasm_bindgen]
pub fn matches_rules(product_json: &str, rules_json: &str) -> String {
    let doc: serde_json::Value = match serde_json::from_str(product_json) {
        Ok(v) => v,
        Err(e) => return error_json(&format!("invalid product JSON: {}", e)),
    };
    let rules_doc: serde_json::Value = match serde_json::from_str(rules_json) {
        Ok(v) => v,
        Err(e) => return error_json(&format!("invalid rules JSON: {}", e)),
    };

    let product = match sku_interchange::parse_product(&doc) {
        Ok(p) => p,
        Err(e) => return error_json(&format!("invalid product: {}", e)),
    };
    let rules = match sku_interchange::parse_rules(&rules_doc) {
        Ok(r) => r,
        Err(e) => return error_json(&format!("invalid rules: {}", e)),
    };

    let matches = sku_eval::matches(&product, Some(rules.as_slice()));
    serde_json::json!({ "matches": matches }).to_string()
}
