//! Read-only admin registrations.
//!
//! Each model is listed with a fixed set of columns (`list_display`) and can
//! be narrowed with a free-text query over `search_fields`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminModel {
    Product,
    Category,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAdmin {
    pub model: AdminModel,
    /// URL segment, e.g. `/admin/product/`.
    pub name: &'static str,
    pub list_display: &'static [&'static str],
    pub search_fields: &'static [&'static str],
}

pub static ADMIN_SITE: [ModelAdmin; 3] = [
    ModelAdmin {
        model: AdminModel::Product,
        name: "product",
        list_display: &["identifier", "name", "description", "category"],
        search_fields: &["identifier", "name", "description"],
    },
    ModelAdmin {
        model: AdminModel::Category,
        name: "category",
        list_display: &["identifier", "name"],
        search_fields: &["identifier", "name"],
    },
    ModelAdmin {
        model: AdminModel::Tag,
        name: "tag",
        list_display: &["identifier", "name"],
        search_fields: &["identifier", "name"],
    },
];

pub fn lookup(name: &str) -> Option<&'static ModelAdmin> {
    ADMIN_SITE.iter().find(|admin| admin.name == name)
}
