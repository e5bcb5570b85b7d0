use std::fmt::Formatter;

use datafusion_expr::Expr;

use crate::operator::{DisplayFields, OperatorTrait};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Filter {
    predicate: Expr,
}

impl Filter {
    pub fn new(predicate: Expr) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &Expr {
        &self.predicate
    }
}

impl OperatorTrait for Filter {
    fn arity(&self) -> usize {
        1
    }
}

impl DisplayFields for Filter {
    fn display(&self, fmt: &mut Formatter) -> std::fmt::Result {
        fmt.debug_struct("")
            .field("predicate", &format_args!("{}", self.predicate))
            .finish()
    }
}
