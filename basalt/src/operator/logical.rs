use enum_as_inner::EnumAsInner;
use std::fmt::{Display, Formatter};

use crate::operator::{Aggregate, DisplayFields, Filter, OperatorTrait, Sort};
use crate::operator::{Join, Limit, Projection, TableScan};
use enum_dispatch::enum_dispatch;
use strum_macros::AsRefStr;

/// Logical relational operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner, AsRefStr)]
#[enum_dispatch]
pub enum LogicalOperator {
    LogicalScan(TableScan),
    LogicalProjection(Projection),
    LogicalFilter(Filter),
    LogicalJoin(Join),
    LogicalAggregate(Aggregate),
    LogicalSort(Sort),
    LogicalLimit(Limit),
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())?;
        self.display(f)
    }
}

#[cfg(test)]
mod tests {
    use datafusion_expr::{col, lit};

    use crate::operator::{
        Filter, Join, JoinType, Limit, LogicalOperator, OperatorTrait, Projection,
        TableScan,
    };

    #[test]
    fn test_operator_arity() {
        assert_eq!(0, LogicalOperator::from(TableScan::new("t1")).arity());
        assert_eq!(1, LogicalOperator::from(Limit::new(3)).arity());
        assert_eq!(
            1,
            LogicalOperator::from(Filter::new(col("a").gt(lit(1)))).arity()
        );
        assert_eq!(
            2,
            LogicalOperator::from(Join::new(JoinType::Inner, col("a").eq(col("b")))).arity()
        );
    }

    #[test]
    fn test_operator_display() {
        let op = LogicalOperator::from(Projection::new(vec![col("a"), col("b")]));
        assert_eq!("LogicalProjection { expr: [a, b] }", op.to_string());

        let op = LogicalOperator::from(Limit::new(10));
        assert_eq!("LogicalLimit { limit: 10 }", op.to_string());

        let op = LogicalOperator::from(TableScan::new("accounts"));
        assert_eq!("LogicalScan { table_name: \"accounts\" }", op.to_string());
    }
}
