//! Report aggregation
//!
//! Turns the ordered rows of a report response into typed rows with their
//! derived totals, averages and ratios, plus a summary computed from the
//! accumulated sums. Averages and ratios are never summed or averaged across
//! rows: the summary derives them once from the final sums, with the same
//! zero-denominator policy as the rows.

use serde_json::Value;

use crate::numeric::{coerce_numeric, finite_or_zero, ratio_percent, safe_average};
use crate::wire::RawReportRow;

/// Sales / distribution avenue tracked per metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Unilateral,
    Online,
    Offline,
    Beijing,
    Guangzhou,
}

impl Channel {
    /// Display / column order
    pub const ALL: [Channel; 5] = [
        Channel::Unilateral,
        Channel::Online,
        Channel::Offline,
        Channel::Beijing,
        Channel::Guangzhou,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Channel::Unilateral => "unilateral",
            Channel::Online => "online",
            Channel::Offline => "offline",
            Channel::Beijing => "beijing",
            Channel::Guangzhou => "guangzhou",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Unilateral => "Unilateral",
            Channel::Online => "Online listing",
            Channel::Offline => "Offline listing",
            Channel::Beijing => "Beijing exchange",
            Channel::Guangzhou => "Guangzhou exchange",
        }
    }

    pub fn qty_field(self) -> &'static str {
        match self {
            Channel::Unilateral => "unilateral_qty",
            Channel::Online => "online_qty",
            Channel::Offline => "offline_qty",
            Channel::Beijing => "beijing_qty",
            Channel::Guangzhou => "guangzhou_qty",
        }
    }

    pub fn amt_field(self) -> &'static str {
        match self {
            Channel::Unilateral => "unilateral_amt",
            Channel::Online => "online_amt",
            Channel::Offline => "offline_amt",
            Channel::Beijing => "beijing_amt",
            Channel::Guangzhou => "guangzhou_amt",
        }
    }
}

/// Which of the two report tables a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Monthly analysis, keyed by production month, with ledger columns
    Analysis,
    /// Keyed by transaction month, channel columns only
    TransactionTime,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::Analysis, ReportKind::TransactionTime];

    pub fn period_field(self) -> &'static str {
        match self {
            ReportKind::Analysis => "production_year_month",
            ReportKind::TransactionTime => "transaction_year_month",
        }
    }

    pub fn has_ledger(self) -> bool {
        self == ReportKind::Analysis
    }

    /// Fixed column count of the rendered table
    pub fn column_count(self) -> usize {
        match self {
            ReportKind::Analysis => 26,
            ReportKind::TransactionTime => 19,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Analysis => "Production month analysis",
            ReportKind::TransactionTime => "Transaction month summary",
        }
    }
}

/// Quantity and amount of one channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelMetrics {
    pub qty: f64,
    pub amt: f64,
}

/// Certificate ledger fields (analysis report only)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerMetrics {
    pub ordinary_green: f64,
    pub green_green: f64,
    pub issued_platform_sold: f64,
}

/// A report row after numeric coercion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    pub period: String,
    /// Indexed like [`Channel::ALL`]
    pub channels: [ChannelMetrics; 5],
    pub ledger: Option<LedgerMetrics>,
}

impl ReportRow {
    pub fn from_raw(kind: ReportKind, raw: &RawReportRow) -> Self {
        let period = match raw.get(kind.period_field()) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let channels = Channel::ALL.map(|c| ChannelMetrics {
            qty: coerce_numeric(raw.get(c.qty_field())),
            amt: coerce_numeric(raw.get(c.amt_field())),
        });

        let ledger = kind.has_ledger().then(|| LedgerMetrics {
            ordinary_green: coerce_numeric(raw.get("ordinary_green")),
            green_green: coerce_numeric(raw.get("green_green")),
            issued_platform_sold: coerce_numeric(raw.get("issued_platform_sold")),
        });

        Self {
            period,
            channels,
            ledger,
        }
    }

    pub fn channel(&self, channel: Channel) -> ChannelMetrics {
        self.channels[channel as usize]
    }
}

/// Ledger-derived figures
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerDerived {
    /// ordinary_green + green_green
    pub total_issued: f64,
    /// ordinary_green - issued_platform_sold
    pub inventory: f64,
    /// issued_platform_sold / ordinary_green as "12.3%"
    pub issued_ratio: String,
    /// total_qty / ordinary_green as "12.3%"
    pub trading_ratio: String,
}

/// Derived, never stored on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    /// amt / qty per channel, rounded to 2 decimals, 0 without quantity
    pub channel_avgs: [f64; 5],
    pub total_qty: f64,
    pub total_amt: f64,
    pub total_avg: f64,
    pub ledger: Option<LedgerDerived>,
}

impl DerivedMetrics {
    pub fn channel_avg(&self, channel: Channel) -> f64 {
        self.channel_avgs[channel as usize]
    }

    /// Totals come from the caller so the summary can pass accumulated sums
    fn compute(channels: &[ChannelMetrics; 5], total_qty: f64, total_amt: f64, ledger: Option<&LedgerMetrics>) -> Self {
        let total_qty = finite_or_zero(total_qty);
        let total_amt = finite_or_zero(total_amt);
        let ledger = ledger.map(|l| LedgerDerived {
            total_issued: finite_or_zero(l.ordinary_green + l.green_green),
            inventory: finite_or_zero(l.ordinary_green - l.issued_platform_sold),
            issued_ratio: ratio_percent(l.issued_platform_sold, l.ordinary_green),
            trading_ratio: ratio_percent(total_qty, l.ordinary_green),
        });

        Self {
            channel_avgs: channels.map(|c| safe_average(c.amt, c.qty)),
            total_qty,
            total_amt,
            total_avg: safe_average(total_amt, total_qty),
            ledger,
        }
    }

    /// Per-row derivation
    pub fn for_row(row: &ReportRow) -> Self {
        let total_qty = row.channels.iter().map(|c| c.qty).fold(0.0, |acc, q| acc + q);
        let total_amt = row.channels.iter().map(|c| c.amt).fold(0.0, |acc, a| acc + a);
        Self::compute(&row.channels, total_qty, total_amt, row.ledger.as_ref())
    }
}

/// A row together with its derived fields
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub row: ReportRow,
    pub derived: DerivedMetrics,
}

/// Cross-row figures of one report
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub row_count: usize,
    /// Summed channel quantities / amounts
    pub channels: [ChannelMetrics; 5],
    /// Summed ledger fields (analysis only)
    pub ledger: Option<LedgerMetrics>,
    /// Averages / ratios derived from the sums
    pub derived: DerivedMetrics,
}

/// Running sums of every additive field
#[derive(Debug, Clone)]
pub struct SummaryAccumulator {
    row_count: usize,
    channels: [ChannelMetrics; 5],
    ledger: Option<LedgerMetrics>,
    total_qty: f64,
    total_amt: f64,
}

impl SummaryAccumulator {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            row_count: 0,
            channels: [ChannelMetrics::default(); 5],
            ledger: kind.has_ledger().then(LedgerMetrics::default),
            total_qty: 0.0,
            total_amt: 0.0,
        }
    }

    /// Add a row's raw fields and its totals; averages and ratios are skipped
    pub fn add(&mut self, row: &ReportRow, derived: &DerivedMetrics) {
        self.row_count += 1;

        for (sum, metrics) in self.channels.iter_mut().zip(row.channels.iter()) {
            sum.qty += metrics.qty;
            sum.amt += metrics.amt;
        }

        if let (Some(sum), Some(ledger)) = (self.ledger.as_mut(), row.ledger.as_ref()) {
            sum.ordinary_green += ledger.ordinary_green;
            sum.green_green += ledger.green_green;
            sum.issued_platform_sold += ledger.issued_platform_sold;
        }

        self.total_qty += derived.total_qty;
        self.total_amt += derived.total_amt;
    }

    /// Derive summary averages / ratios from the accumulated sums.
    /// A sum that overflowed to infinity reads as 0.
    pub fn finish(&self) -> Summary {
        let channels = self.channels.map(|c| ChannelMetrics {
            qty: finite_or_zero(c.qty),
            amt: finite_or_zero(c.amt),
        });
        let ledger = self.ledger.map(|l| LedgerMetrics {
            ordinary_green: finite_or_zero(l.ordinary_green),
            green_green: finite_or_zero(l.green_green),
            issued_platform_sold: finite_or_zero(l.issued_platform_sold),
        });

        Summary {
            row_count: self.row_count,
            channels,
            ledger,
            derived: DerivedMetrics::compute(&channels, self.total_qty, self.total_amt, ledger.as_ref()),
        }
    }
}

/// Output of one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub kind: ReportKind,
    pub rows: Vec<AggregatedRow>,
    pub summary: Summary,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reduce raw response rows, in received order
pub fn reduce(kind: ReportKind, raw_rows: &[RawReportRow]) -> Aggregation {
    reduce_rows(kind, raw_rows.iter().map(|raw| ReportRow::from_raw(kind, raw)))
}

/// Reduce already coerced rows, in iteration order
pub fn reduce_rows(kind: ReportKind, rows: impl IntoIterator<Item = ReportRow>) -> Aggregation {
    let mut accumulator = SummaryAccumulator::new(kind);
    let mut aggregated = Vec::new();

    for row in rows {
        let derived = DerivedMetrics::for_row(&row);
        accumulator.add(&row, &derived);
        aggregated.push(AggregatedRow { row, derived });
    }

    Aggregation {
        kind,
        rows: aggregated,
        summary: accumulator.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::round2;
    use proptest::prelude::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawReportRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_single_unilateral_row() {
        let rows = vec![raw(json!({
            "production_year_month": "2024-05",
            "unilateral_qty": 10,
            "unilateral_amt": 100,
            "online_qty": 0,
            "online_amt": 0,
            "ordinary_green": 0
        }))];
        let result = reduce(ReportKind::Analysis, &rows);

        let row = &result.rows[0];
        assert_eq!(row.row.period, "2024-05");
        assert_eq!(row.derived.channel_avg(Channel::Unilateral), 10.0);
        assert_eq!(row.derived.total_qty, 10.0);
        assert_eq!(row.derived.total_amt, 100.0);

        let ledger = row.derived.ledger.as_ref().unwrap();
        assert_eq!(ledger.issued_ratio, "0.0%");
        assert_eq!(ledger.trading_ratio, "0.0%");
    }

    #[test]
    fn test_ledger_derivations() {
        let rows = vec![raw(json!({
            "ordinary_green": "200",
            "green_green": 50,
            "issued_platform_sold": 30,
            "online_qty": 40,
            "online_amt": 120
        }))];
        let result = reduce(ReportKind::Analysis, &rows);
        let ledger = result.rows[0].derived.ledger.clone().unwrap();

        assert_eq!(ledger.total_issued, 250.0);
        assert_eq!(ledger.inventory, 170.0);
        assert_eq!(ledger.issued_ratio, "15.0%");
        assert_eq!(ledger.trading_ratio, "20.0%");
    }

    #[test]
    fn test_malformed_fields_are_zero() {
        let rows = vec![raw(json!({
            "unilateral_qty": null,
            "unilateral_amt": "n/a",
            "online_qty": "7",
            "online_amt": "21.5"
        }))];
        let result = reduce(ReportKind::TransactionTime, &rows);
        let derived = &result.rows[0].derived;

        assert_eq!(derived.channel_avg(Channel::Unilateral), 0.0);
        assert_eq!(derived.total_qty, 7.0);
        assert_eq!(derived.total_avg, 3.07);
        assert!(derived.ledger.is_none());
        assert!(result.rows[0].row.ledger.is_none());
    }

    #[test]
    fn test_summary_weights_by_quantity() {
        // Per-row averages 10 and 1; the weighted summary average is 110 / 20
        let rows = vec![
            raw(json!({"transaction_year_month": "2024-01", "beijing_qty": 10, "beijing_amt": 100})),
            raw(json!({"transaction_year_month": "2024-02", "beijing_qty": 10, "beijing_amt": 10})),
        ];
        let result = reduce(ReportKind::TransactionTime, &rows);

        assert_eq!(result.summary.row_count, 2);
        assert_eq!(result.summary.channels[Channel::Beijing as usize].qty, 20.0);
        assert_eq!(result.summary.derived.channel_avg(Channel::Beijing), 5.5);
        assert_eq!(result.summary.derived.total_avg, 5.5);
    }

    #[test]
    fn test_summary_ratios_from_sums() {
        let rows = vec![
            raw(json!({"ordinary_green": 100, "issued_platform_sold": 10, "online_qty": 50})),
            raw(json!({"ordinary_green": 0, "issued_platform_sold": 5, "online_qty": 25})),
        ];
        let result = reduce(ReportKind::Analysis, &rows);

        assert_eq!(result.rows[1].derived.ledger.as_ref().unwrap().issued_ratio, "0.0%");
        let summary = result.summary.derived.ledger.as_ref().unwrap();
        assert_eq!(summary.issued_ratio, "15.0%");
        assert_eq!(summary.trading_ratio, "75.0%");
        assert_eq!(summary.inventory, 85.0);
    }

    #[test]
    fn test_empty_input_zero_summary() {
        let result = reduce(ReportKind::Analysis, &[]);
        assert!(result.is_empty());
        assert_eq!(result.summary.row_count, 0);
        assert_eq!(result.summary.derived.total_qty, 0.0);
        assert_eq!(result.summary.derived.total_avg, 0.0);

        let ledger = result.summary.derived.ledger.as_ref().unwrap();
        assert_eq!(ledger.issued_ratio, "0.0%");
        assert_eq!(ledger.trading_ratio, "0.0%");
    }

    #[test]
    fn test_overflowing_sums_read_as_zero() {
        let rows = vec![
            raw(json!({"ordinary_green": 1e308, "online_qty": 1e308, "online_amt": 5})),
            raw(json!({"ordinary_green": "1e308", "online_qty": "1e308"})),
            raw(json!({"offline_qty": 1e308, "guangzhou_qty": 1e308})),
        ];
        let result = reduce(ReportKind::Analysis, &rows);

        // Row three alone already overflows its own total
        assert_eq!(result.rows[0].derived.total_qty, 1e308);
        assert_eq!(result.rows[2].derived.total_qty, 0.0);

        let summary = &result.summary;
        assert_eq!(summary.channels[Channel::Online as usize].qty, 0.0);
        assert_eq!(summary.ledger.unwrap().ordinary_green, 0.0);
        assert_eq!(summary.derived.total_qty, 0.0);
        assert_eq!(summary.derived.channel_avg(Channel::Online), 0.0);
        let ledger = summary.derived.ledger.as_ref().unwrap();
        assert_eq!(ledger.total_issued, 0.0);
        assert_eq!(ledger.trading_ratio, "0.0%");
        assert_eq!(summary.derived.total_avg, 0.0);
    }

    #[test]
    fn test_row_order_preserved() {
        let rows = vec![
            raw(json!({"production_year_month": "2024-03"})),
            raw(json!({"production_year_month": "2024-01"})),
        ];
        let periods: Vec<String> = reduce(ReportKind::Analysis, &rows)
            .rows
            .into_iter()
            .map(|r| r.row.period)
            .collect();
        assert_eq!(periods, vec!["2024-03", "2024-01"]);
    }

    fn arb_row() -> impl Strategy<Value = ReportRow> {
        (
            prop::array::uniform5((0.0f64..1e6, 0.0f64..1e7)),
            0.0f64..1e6,
            0.0f64..1e6,
        )
            .prop_map(|(pairs, ordinary_green, sold)| ReportRow {
                period: String::new(),
                channels: pairs.map(|(qty, amt)| ChannelMetrics { qty, amt }),
                ledger: Some(LedgerMetrics {
                    ordinary_green,
                    green_green: 0.0,
                    issued_platform_sold: sold,
                }),
            })
    }

    proptest! {
        #[test]
        fn prop_summary_total_qty_is_sum_of_rows(rows in prop::collection::vec(arb_row(), 0..20)) {
            let result = reduce_rows(ReportKind::Analysis, rows);
            let summed = result.rows.iter().fold(0.0, |acc, r| acc + r.derived.total_qty);
            prop_assert_eq!(summed, result.summary.derived.total_qty);
        }

        #[test]
        fn prop_total_avg_matches_policy(row in arb_row()) {
            let derived = DerivedMetrics::for_row(&row);
            if derived.total_qty > 0.0 {
                prop_assert_eq!(derived.total_avg, round2(derived.total_amt / derived.total_qty));
            } else {
                prop_assert_eq!(derived.total_avg, 0.0);
            }
        }

        #[test]
        fn prop_ratios_zero_without_ordinary_green(mut row in arb_row()) {
            if let Some(ledger) = row.ledger.as_mut() {
                ledger.ordinary_green = 0.0;
            }
            let derived = DerivedMetrics::for_row(&row);
            let ledger = derived.ledger.unwrap();
            prop_assert_eq!(ledger.issued_ratio, "0.0%");
            prop_assert_eq!(ledger.trading_ratio, "0.0%");
        }
    }
}
