use std::collections::HashSet;
use std::fmt::Formatter;

use datafusion_common::Column;
use datafusion_expr::utils::expr_to_columns;
use datafusion_expr::Expr;
use itertools::Itertools;

use crate::error::DFResult;
use crate::operator::{DisplayFields, OperatorTrait};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Projection {
    expr: Vec<Expr>,
}

impl Projection {
    pub fn new<I: IntoIterator<Item = Expr>>(exprs: I) -> Self {
        Self {
            expr: exprs.into_iter().collect(),
        }
    }

    pub fn expr(&self) -> &[Expr] {
        &self.expr
    }

    /// Columns referenced by the projection list, including the ones used inside computed
    /// expressions.
    ///
    /// Each column appears once, ordered by qualified name.
    pub fn column_references(&self) -> DFResult<Vec<Column>> {
        let mut columns = HashSet::new();
        for expr in &self.expr {
            expr_to_columns(expr, &mut columns)?;
        }

        Ok(columns
            .into_iter()
            .sorted_by_key(|c| c.flat_name())
            .collect())
    }
}

impl OperatorTrait for Projection {
    fn arity(&self) -> usize {
        1
    }
}

impl DisplayFields for Projection {
    fn display(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("")
            .field("expr", &format_args!("[{}]", self.expr.iter().join(", ")))
            .finish()
    }
}
