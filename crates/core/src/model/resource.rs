use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::model::ids::ResourceId;
use crate::model::lesson::CategoryParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    Article,
    Pdf,
    Website,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 3] = [
        ResourceCategory::Article,
        ResourceCategory::Pdf,
        ResourceCategory::Website,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ResourceCategory::Article => "Article",
            ResourceCategory::Pdf => "PDF",
            ResourceCategory::Website => "Website",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for ResourceCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CategoryParseError::Resource(s.to_owned()))
    }
}

/// Either every category or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter<C> {
    #[default]
    All,
    Only(C),
}

impl<C: PartialEq + Copy> CategoryFilter<C> {
    #[must_use]
    pub fn admits(&self, category: C) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl<C: FromStr> FromStr for CategoryFilter<C> {
    type Err = C::Err;

    /// `"All"` (any case) selects everything; anything else must parse as `C`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// External learning material from the seed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    pub url: Url,
    pub category: ResourceCategory,
    pub source: String,
}

impl Resource {
    /// Case-insensitive substring match over title, description, or source.
    ///
    /// `needle` must already be trimmed and lowercased; empty matches all.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || [&self.title, &self.description, &self.source]
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}
