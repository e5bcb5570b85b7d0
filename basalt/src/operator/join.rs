use std::fmt::Formatter;

use datafusion_expr::Expr;
use strum_macros::Display;

use crate::operator::{DisplayFields, OperatorTrait};

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Display)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

/// Logical join operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Join {
    join_type: JoinType,
    expr: Expr,
}

impl Join {
    pub fn new(join_type: JoinType, expr: Expr) -> Self {
        Self { join_type, expr }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl OperatorTrait for Join {
    fn arity(&self) -> usize {
        2
    }
}

impl DisplayFields for Join {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("join_type", &self.join_type)
            .field("expr", &format_args!("{}", self.expr))
            .finish()
    }
}
