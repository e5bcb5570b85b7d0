use std::fmt::Formatter;

use datafusion_expr::Expr;
use itertools::Itertools;

use crate::operator::{DisplayFields, OperatorTrait};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Aggregate {
    group_expr: Vec<Expr>,
    aggr_expr: Vec<Expr>,
}

impl Aggregate {
    pub fn new<G, A>(group_expr: G, aggr_expr: A) -> Self
    where
        G: IntoIterator<Item = Expr>,
        A: IntoIterator<Item = Expr>,
    {
        Self {
            group_expr: group_expr.into_iter().collect(),
            aggr_expr: aggr_expr.into_iter().collect(),
        }
    }

    pub fn group_expr(&self) -> &[Expr] {
        &self.group_expr
    }

    pub fn aggr_expr(&self) -> &[Expr] {
        &self.aggr_expr
    }
}

impl OperatorTrait for Aggregate {
    fn arity(&self) -> usize {
        1
    }
}

impl DisplayFields for Aggregate {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field(
                "group_expr",
                &format_args!("[{}]", self.group_expr.iter().join(", ")),
            )
            .field(
                "aggr_expr",
                &format_args!("[{}]", self.aggr_expr.iter().join(", ")),
            )
            .finish()
    }
}
