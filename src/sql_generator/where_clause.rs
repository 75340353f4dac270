use super::errors::SqlGeneratorError;
use super::predicates::TypedPredicate;
use crate::config::CompilerConfig;
use crate::explore_catalog::Explore;
use crate::metric_query::{FilterGroup, FilterNode, FilterRule};

/// One indentation step for nested filter groups
const TAB_SPACE: &str = "  ";

/// Renders a filter tree into a WHERE clause, resolving each rule's
/// dimension through the explore.
pub struct FilterTreeCompiler<'a> {
    explore: &'a Explore,
    config: &'a CompilerConfig,
}

impl<'a> FilterTreeCompiler<'a> {
    pub fn new(explore: &'a Explore, config: &'a CompilerConfig) -> Self {
        FilterTreeCompiler { explore, config }
    }

    /// `WHERE (...)`, or an empty string when the tree holds no rule
    pub fn generate_where_clause(&self, root: &FilterGroup) -> Result<String, SqlGeneratorError> {
        if root.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("WHERE {}", self.render_group(root, 1)?))
    }

    fn render_group(&self, group: &FilterGroup, depth: usize) -> Result<String, SqlGeneratorError> {
        let group_tab = TAB_SPACE.repeat(depth - 1);
        let content_tab = TAB_SPACE.repeat(depth);

        // Empty sub-groups would leave a dangling operator, drop them
        let children = group.children.iter().filter(|child| match child {
            FilterNode::Group(g) => !g.is_empty(),
            FilterNode::Leaf(_) => true,
        });

        let mut lines = Vec::new();
        for (index, child) in children.enumerate() {
            let operator = if index > 0 {
                format!("{} ", group.group_operator)
            } else {
                String::new()
            };
            let line = match child {
                FilterNode::Group(g) => self.render_group(g, depth + 1)?,
                FilterNode::Leaf(rule) => self.render_rule(rule)?,
            };
            lines.push(format!("{}{}{}", content_tab, operator, line));
        }

        Ok(format!("(\n{}\n{})", lines.join("\n"), group_tab))
    }

    fn render_rule(&self, rule: &FilterRule) -> Result<String, SqlGeneratorError> {
        let id = rule.field_id();
        let dimension = self
            .explore
            .find_dimension(&id)
            .ok_or_else(|| SqlGeneratorError::UnknownFieldReference(id.clone()))?;

        let predicate = TypedPredicate::from_rule(dimension.dimension_type, rule)?;
        let sql = predicate.render(
            &dimension.compiled_sql,
            &self.config.date_format,
            &self.config.timestamp_format,
        )?;
        log::trace!("Rendered filter on {} ({}): {}", id, rule.operator, sql);
        Ok(sql)
    }
}

/// Generate the WHERE clause for `filters` with default formatting
pub fn generate_where_clause(
    filters: &FilterGroup,
    explore: &Explore,
) -> Result<String, SqlGeneratorError> {
    let config = CompilerConfig::default();
    FilterTreeCompiler::new(explore, &config).generate_where_clause(filters)
}
