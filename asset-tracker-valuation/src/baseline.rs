use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

// 基准为 0 时百分比记为 0
fn pnl_percentage(pnl: Decimal, initial_value: Decimal) -> Decimal {
    if initial_value > Decimal::ZERO {
        pnl / initial_value * dec!(100)
    } else {
        Decimal::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineComparison {
    pub initial_value: Decimal,  // 预设余额
    pub current_value: Decimal,  // 实时余额
    pub pnl: Decimal,            // 差额
    pub pnl_percentage: Decimal, // 差额百分比
}

impl BaselineComparison {
    pub fn compare(current_value: Decimal, initial_value: Decimal) -> Self {
        let pnl = current_value - initial_value;

        BaselineComparison {
            initial_value,
            current_value,
            pnl,
            pnl_percentage: pnl_percentage(pnl, initial_value),
        }
    }
}

/// 多账户合计，百分比由合计值计算，不取平均
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchTotals {
    pub total_value: Decimal,
    pub total_initial: Decimal,
    pub total_pnl: Decimal,
    pub total_pnl_percentage: Decimal,
}

impl<'a> FromIterator<&'a BaselineComparison> for BatchTotals {
    fn from_iter<T: IntoIterator<Item = &'a BaselineComparison>>(iter: T) -> Self {
        let (total_value, total_initial) = iter
            .into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(value, initial), item| {
                (value + item.current_value, initial + item.initial_value)
            });
        let total_pnl = total_value - total_initial;

        BatchTotals {
            total_value,
            total_initial,
            total_pnl,
            total_pnl_percentage: pnl_percentage(total_pnl, total_initial),
        }
    }
}
