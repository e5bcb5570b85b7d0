use std::cmp::min;
use std::fmt::Formatter;

use anyhow::ensure;
use datafusion_common::Column;
use datafusion_expr::Expr;
use itertools::Itertools;

use crate::error::{BasaltError, BasaltResult};
use crate::operator::{DisplayFields, OperatorTrait};

/// Scan of an index in the search backend.
///
/// Besides the index name, a scan carries what the optimizer managed to push into it: the
/// fields to fetch, a filter and a row limit. `None` means nothing was pushed, e.g. a scan
/// without project list fetches all fields.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TableScan {
    table_name: String,
    projects: Option<Vec<Column>>,
    filter: Option<Expr>,
    limit: Option<usize>,
}

impl TableScan {
    pub fn new<S: Into<String>>(table_name: S) -> Self {
        Self {
            table_name: table_name.into(),
            projects: None,
            filter: None,
            limit: None,
        }
    }

    pub fn with_limit<S: Into<String>>(table_name: S, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new(table_name)
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn projects(&self) -> Option<&[Column]> {
        self.projects.as_deref()
    }

    pub fn has_projects(&self) -> bool {
        self.projects.is_some()
    }

    pub fn filter(&self) -> Option<&Expr> {
        self.filter.as_ref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Creates a copy of this scan which only fetches `projects`.
    ///
    /// A scan's project list can be set only once, and must not be empty since an empty list
    /// can't be told apart from "all fields".
    pub fn with_projects(&self, projects: Vec<Column>) -> BasaltResult<Self> {
        ensure!(
            !self.has_projects(),
            BasaltError::ScanAlreadyProjected(self.table_name.clone())
        );
        ensure!(
            !projects.is_empty(),
            BasaltError::EmptyProjectList(self.table_name.clone())
        );

        Ok(Self {
            projects: Some(projects),
            ..self.clone()
        })
    }

    /// Creates a copy of this scan with `predicate` added to its pushed filter.
    pub fn with_filter(&self, predicate: Expr) -> Self {
        let filter = match &self.filter {
            Some(existing) => existing.clone().and(predicate),
            None => predicate,
        };

        Self {
            filter: Some(filter),
            ..self.clone()
        }
    }

    /// Creates a copy of this scan returning at most `limit` rows.
    pub fn with_pushed_limit(&self, limit: usize) -> Self {
        let limit = self.limit.map(|l| min(l, limit)).unwrap_or(limit);
        Self {
            limit: Some(limit),
            ..self.clone()
        }
    }
}

impl OperatorTrait for TableScan {
    fn arity(&self) -> usize {
        0
    }
}

impl DisplayFields for TableScan {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("");
        s.field("table_name", &self.table_name);
        if let Some(projects) = &self.projects {
            s.field("projects", &format_args!("[{}]", projects.iter().join(", ")));
        }
        if let Some(filter) = &self.filter {
            s.field("filter", &format_args!("{}", filter));
        }
        if let Some(limit) = self.limit {
            s.field("limit", &limit);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use datafusion_common::Column;
    use datafusion_expr::{col, lit};

    use crate::error::BasaltError;
    use crate::operator::TableScan;

    #[test]
    fn test_set_projects_once() {
        let scan = TableScan::new("accounts");
        let projected = scan
            .with_projects(vec![Column::from_name("age")])
            .unwrap();

        assert!(!scan.has_projects());
        assert_eq!(Some(&[Column::from_name("age")][..]), projected.projects());

        let err = projected
            .with_projects(vec![Column::from_name("name")])
            .unwrap_err();
        assert_eq!(
            Some(&BasaltError::ScanAlreadyProjected("accounts".to_string())),
            err.downcast_ref::<BasaltError>()
        );
    }

    #[test]
    fn test_empty_projects_rejected() {
        let err = TableScan::new("accounts").with_projects(vec![]).unwrap_err();
        assert_eq!(
            Some(&BasaltError::EmptyProjectList("accounts".to_string())),
            err.downcast_ref::<BasaltError>()
        );
    }

    #[test]
    fn test_pushed_limit_keeps_smaller() {
        let scan = TableScan::with_limit("accounts", 5);
        assert_eq!(Some(5), scan.with_pushed_limit(10).limit());
        assert_eq!(Some(3), scan.with_pushed_limit(3).limit());
    }

    #[test]
    fn test_filters_are_combined() {
        let scan = TableScan::new("accounts")
            .with_filter(col("age").gt(lit(30)))
            .with_filter(col("state").eq(lit("CA")));

        assert_eq!(
            Some(&col("age").gt(lit(30)).and(col("state").eq(lit("CA")))),
            scan.filter()
        );
    }
}
