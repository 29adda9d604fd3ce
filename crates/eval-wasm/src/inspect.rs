use sku_eval::VariantIndex;
use sku_interchange::Product;

/// Structural summary of a loaded product for configurator UIs: the
/// conditions in display order and, per condition, the facet keys its
/// variants carry and how many are in stock.
pub fn build_inspect(product: &Product) -> serde_json::Value {
    let index = VariantIndex::new(&product.variants);

    let conditions: Vec<serde_json::Value> = index
        .conditions()
        .iter()
        .map(|condition| {
            let variants = index.variants_for(condition);
            let in_stock = variants.iter().filter(|v| v.in_stock()).count();
            serde_json::json!({
                "condition": condition,
                "variants": variants.len(),
                "in_stock": in_stock,
                "facets": index.facet_keys(condition),
            })
        })
        .collect();

    let mut summary = serde_json::json!({
        "id": product.id,
        "variant_count": product.variants.len(),
        "conditions": conditions,
    });
    if let Some(category) = &product.category {
        summary["category"] = serde_json::json!(category);
    }
    if let Some(price) = &product.base_price {
        summary["base_price"] = serde_json::json!(price);
    }
    summary
}
