use std::fmt::Formatter;

use datafusion_expr::Expr;
use itertools::Itertools;

use crate::operator::{DisplayFields, OperatorTrait};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Sort {
    expr: Vec<Expr>,
}

impl Sort {
    pub fn new<I: IntoIterator<Item = Expr>>(exprs: I) -> Self {
        Self {
            expr: exprs.into_iter().collect(),
        }
    }

    pub fn expr(&self) -> &[Expr] {
        &self.expr
    }
}

impl OperatorTrait for Sort {
    fn arity(&self) -> usize {
        1
    }
}

impl DisplayFields for Sort {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("expr", &format_args!("[{}]", self.expr.iter().join(", ")))
            .finish()
    }
}
