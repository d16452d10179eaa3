use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The two flat catalogs users are organised by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Level,
    Group,
}

impl CatalogKind {
    pub fn table(&self) -> &'static str {
        match self {
            CatalogKind::Level => "user_levels",
            CatalogKind::Group => "user_groups",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Level => "Level",
            CatalogKind::Group => "Group",
        }
    }

    /// Response key for a single entry
    pub fn key(&self) -> &'static str {
        match self {
            CatalogKind::Level => "level",
            CatalogKind::Group => "group",
        }
    }

    /// Response key for a listing
    pub fn plural_key(&self) -> &'static str {
        match self {
            CatalogKind::Level => "levels",
            CatalogKind::Group => "groups",
        }
    }
}

/// A level or a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
}

#[derive(Debug, Clone)]
pub struct CatalogInput {
    pub name: String,
    pub acronym: String,
}
