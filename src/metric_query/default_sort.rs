use super::{CompiledMetricQuery, SortField};
use crate::explore_catalog::{DimensionType, Explore};

/// Pick the sort a query gets when the user has not chosen one.
///
/// The first selected time dimension wins (newest first), then the first
/// selected metric (largest first), then the first selected dimension.
pub fn default_sort_field(explore: &Explore, query: &CompiledMetricQuery) -> Option<SortField> {
    let time_dimension = query.dimensions.iter().find(|id| {
        explore.find_dimension(id).is_some_and(|d| {
            matches!(
                d.dimension_type,
                DimensionType::Date | DimensionType::Timestamp
            )
        })
    });
    if let Some(id) = time_dimension {
        return Some(SortField::desc(id.as_str()));
    }

    if let Some(id) = query
        .metrics
        .iter()
        .find(|id| explore.find_metric(id).is_some())
    {
        return Some(SortField::desc(id.as_str()));
    }

    query
        .dimensions
        .iter()
        .find(|id| explore.find_dimension(id).is_some())
        .map(|id| SortField::asc(id.as_str()))
}
