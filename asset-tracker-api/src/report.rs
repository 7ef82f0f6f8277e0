use asset_tracker_valuation::{AccountFailure, BatchReport};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::{self, Write};

/// 单个策略的预设余额与实时余额
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetRealtimeRow {
    pub account_id: i32,
    pub strategy_name: String,
    pub preset_balance: Decimal,
    pub realtime_balance: Decimal,
    pub difference: Decimal,
    pub percentage_difference: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub total_preset_balance: Decimal,
    pub total_realtime_balance: Decimal,
    pub total_difference: Decimal,
    pub total_percentage_difference: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub currency: String,
    pub rows: Vec<PresetRealtimeRow>,
    pub summary: SummaryTable,
    pub failures: Vec<String>,
}

impl From<&BatchReport> for BalanceReport {
    fn from(report: &BatchReport) -> Self {
        let rows = report
            .accounts
            .iter()
            .map(|account| PresetRealtimeRow {
                account_id: account.account_id,
                strategy_name: account.label.clone(),
                preset_balance: account.baseline.initial_value,
                realtime_balance: account.baseline.current_value,
                difference: account.baseline.pnl,
                percentage_difference: account.baseline.pnl_percentage,
            })
            .collect();

        let summary = SummaryTable {
            total_preset_balance: report.totals.total_initial,
            total_realtime_balance: report.totals.total_value,
            total_difference: report.totals.total_pnl,
            total_percentage_difference: report.totals.total_pnl_percentage,
        };

        BalanceReport {
            currency: report.currency.clone(),
            rows,
            summary,
            failures: report.failures.iter().map(AccountFailure::to_string).collect(),
        }
    }
}

// 展示时保留两位小数
fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();

        writeln!(
            out,
            "{:<8} {:<24} {:>16} {:>16} {:>16} {:>10}",
            "account", "strategy", "preset", "realtime", "difference", "pct"
        )?;

        for row in &self.rows {
            writeln!(
                out,
                "{:<8} {:<24} {:>16} {:>16} {:>16} {:>10}",
                row.account_id,
                row.strategy_name,
                money(row.preset_balance),
                money(row.realtime_balance),
                money(row.difference),
                percent(row.percentage_difference),
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Total ({})", self.currency)?;
        writeln!(
            out,
            "  preset balance:   {}",
            money(self.summary.total_preset_balance)
        )?;
        writeln!(
            out,
            "  realtime balance: {}",
            money(self.summary.total_realtime_balance)
        )?;
        writeln!(
            out,
            "  difference:       {}",
            money(self.summary.total_difference)
        )?;
        write!(
            out,
            "  percentage:       {}",
            percent(self.summary.total_percentage_difference)
        )?;

        for failure in &self.failures {
            write!(out, "\n{}", failure)?;
        }

        f.write_str(&out)
    }
}
