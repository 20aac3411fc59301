use serde::Deserialize;
use serde_json::{Map, Value};

use novelfinder_catalog::{Category, ProductDetail, Tag};
use novelfinder_core::Entity;
use novelfinder_infra::store::ProductRow;

use crate::app::admin_site::ModelAdmin;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AdminSearchQuery {
    #[serde(default)]
    pub q: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn category_to_json(category: &Category) -> Value {
    serde_json::json!({
        "identifier": category.id_typed().to_string(),
        "name": category.name(),
    })
}

pub fn tag_to_json(tag: &Tag) -> Value {
    serde_json::json!({
        "identifier": tag.id_typed().to_string(),
        "name": tag.name(),
    })
}

pub fn product_to_json(detail: &ProductDetail) -> Value {
    serde_json::json!({
        "identifier": detail.product.id_typed().to_string(),
        "name": detail.product.name(),
        "description": detail.product.description(),
        "category": category_to_json(&detail.category),
        "tags": detail.tags.iter().map(tag_to_json).collect::<Vec<_>>(),
    })
}

pub fn model_admin_to_json(admin: &ModelAdmin) -> Value {
    serde_json::json!({
        "model": admin.name,
        "url": format!("/admin/{}/", admin.name),
        "list_display": admin.list_display,
        "search_fields": admin.search_fields,
    })
}

/// One admin row holding exactly the registered `list_display` columns.
fn admin_row(admin: &ModelAdmin, column: impl Fn(&str) -> Value) -> Value {
    let mut row = Map::with_capacity(admin.list_display.len());
    for &name in admin.list_display {
        row.insert(name.to_string(), column(name));
    }
    Value::Object(row)
}

pub fn product_admin_row(admin: &ModelAdmin, row: &ProductRow) -> Value {
    admin_row(admin, |column| match column {
        "identifier" => row.product.id_typed().to_string().into(),
        "name" => row.product.name().into(),
        "description" => row.product.description().into(),
        "category" => row.category.label().into(),
        _ => Value::Null,
    })
}

pub fn category_admin_row(admin: &ModelAdmin, category: &Category) -> Value {
    admin_row(admin, |column| match column {
        "identifier" => category.id_typed().to_string().into(),
        "name" => category.name().into(),
        _ => Value::Null,
    })
}

pub fn tag_admin_row(admin: &ModelAdmin, tag: &Tag) -> Value {
    admin_row(admin, |column| match column {
        "identifier" => tag.id_typed().to_string().into(),
        "name" => tag.name().into(),
        _ => Value::Null,
    })
}
