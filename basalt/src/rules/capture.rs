use std::collections::HashMap;

use datafusion_common::Column;
use datafusion_expr::Expr;
use derive_more::From;
use enum_as_inner::EnumAsInner;
use strum_macros::AsRefStr;

use crate::error::{BasaltError, BasaltResult};
use crate::plan::PlanNodeRef;

/// A value bound by a pattern.
#[derive(Clone, Debug, PartialEq, EnumAsInner, From, AsRefStr)]
pub enum Captured {
    Node(PlanNodeRef),
    Columns(Vec<Column>),
    Expr(Expr),
}

/// Captures of one successful match, consumed by the rule's rewrite.
///
/// A new store is created for every match attempt, so captures of different attempts or
/// different rules never see each other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Captures {
    values: HashMap<&'static str, Captured>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `name`, replacing any earlier binding.
    pub fn insert<V: Into<Captured>>(&mut self, name: &'static str, value: V) {
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: &'static str) -> BasaltResult<&Captured> {
        Ok(self
            .values
            .get(name)
            .ok_or(BasaltError::CaptureNotBound(name))?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn node(&self, name: &'static str) -> BasaltResult<&PlanNodeRef> {
        let captured = self.get(name)?;
        Ok(captured
            .as_node()
            .ok_or_else(|| type_mismatch(name, "Node", captured))?)
    }

    pub fn columns(&self, name: &'static str) -> BasaltResult<&[Column]> {
        let captured = self.get(name)?;
        Ok(captured
            .as_columns()
            .ok_or_else(|| type_mismatch(name, "Columns", captured))?)
    }

    pub fn expr(&self, name: &'static str) -> BasaltResult<&Expr> {
        let captured = self.get(name)?;
        Ok(captured
            .as_expr()
            .ok_or_else(|| type_mismatch(name, "Expr", captured))?)
    }
}

fn type_mismatch(name: &'static str, expected: &'static str, actual: &Captured) -> BasaltError {
    BasaltError::CaptureTypeMismatch {
        name,
        expected,
        actual: actual.as_ref().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use datafusion_common::Column;
    use datafusion_expr::col;

    use crate::error::BasaltError;
    use crate::rules::Captures;

    #[test]
    fn test_typed_access() {
        let mut captures = Captures::new();
        captures.insert("columns", vec![Column::from_name("a")]);
        captures.insert("predicate", col("a"));

        assert_eq!(2, captures.len());
        assert_eq!(&[Column::from_name("a")][..], captures.columns("columns").unwrap());
        assert_eq!(&col("a"), captures.expr("predicate").unwrap());
    }

    #[test]
    fn test_unbound_capture() {
        let captures = Captures::new();
        let err = captures.node("scan").unwrap_err();
        assert_eq!(
            Some(&BasaltError::CaptureNotBound("scan")),
            err.downcast_ref::<BasaltError>()
        );
    }

    #[test]
    fn test_capture_type_mismatch() {
        let mut captures = Captures::new();
        captures.insert("scan", col("a"));

        let err = captures.node("scan").unwrap_err();
        assert_eq!(
            Some(&BasaltError::CaptureTypeMismatch {
                name: "scan",
                expected: "Node",
                actual: "Expr".to_string(),
            }),
            err.downcast_ref::<BasaltError>()
        );
    }
}
