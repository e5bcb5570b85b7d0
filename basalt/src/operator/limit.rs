use std::fmt::Formatter;

use crate::operator::{DisplayFields, OperatorTrait};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Limit {
    limit: usize,
}

impl Limit {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl OperatorTrait for Limit {
    fn arity(&self) -> usize {
        1
    }
}

impl DisplayFields for Limit {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("").field("limit", &self.limit).finish()
    }
}
