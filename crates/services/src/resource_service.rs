use std::sync::{PoisonError, RwLock};

use lab_core::model::{CategoryFilter, Resource, ResourceCategory};

/// Current resource library filters. Not persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceFilters {
    pub search: String,
    pub category: CategoryFilter<ResourceCategory>,
}

/// Resource catalog with a replaceable filter.
pub struct ResourceService {
    resources: Vec<Resource>,
    filters: RwLock<ResourceFilters>,
}

impl ResourceService {
    #[must_use]
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            filters: RwLock::new(ResourceFilters::default()),
        }
    }

    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[must_use]
    pub fn filters(&self) -> ResourceFilters {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the filter state wholesale.
    pub fn set_filters(&self, filters: ResourceFilters) {
        *self
            .filters
            .write()
            .unwrap_or_else(PoisonError::into_inner) = filters;
    }

    /// Resources passing the current filters, recomputed on every call.
    #[must_use]
    pub fn filtered_resources(&self) -> Vec<Resource> {
        let filters = self.filters();
        let needle = filters.search.trim().to_lowercase();
        self.resources
            .iter()
            .filter(|resource| filters.category.admits(resource.category))
            .filter(|resource| resource.matches_search(&needle))
            .cloned()
            .collect()
    }
}
