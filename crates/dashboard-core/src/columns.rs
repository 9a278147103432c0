//! Metric column visibility toggles

use serde::{Deserialize, Serialize};

/// Metric class a column is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Qty,
    Amt,
    Avg,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Qty, Metric::Amt, Metric::Avg];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Qty => "Quantity",
            Metric::Amt => "Amount",
            Metric::Avg => "Average price",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qty" | "quantity" => Ok(Metric::Qty),
            "amt" | "amount" => Ok(Metric::Amt),
            "avg" | "average" => Ok(Metric::Avg),
            other => Err(format!("unknown metric '{}' (expected qty, amt or avg)", other)),
        }
    }
}

/// Class of a rendered column: always shown, or governed by a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnClass {
    Plain,
    Metric(Metric),
}

/// Quantity / amount / average toggles shared by both report tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnVisibility {
    pub qty: bool,
    pub amt: bool,
    pub avg: bool,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            qty: true,
            amt: true,
            avg: true,
        }
    }
}

impl ColumnVisibility {
    pub fn is_visible(&self, metric: Metric) -> bool {
        match metric {
            Metric::Qty => self.qty,
            Metric::Amt => self.amt,
            Metric::Avg => self.avg,
        }
    }

    pub fn set(&mut self, metric: Metric, visible: bool) {
        match metric {
            Metric::Qty => self.qty = visible,
            Metric::Amt => self.amt = visible,
            Metric::Avg => self.avg = visible,
        }
    }

    pub fn column_visible(&self, class: ColumnClass) -> bool {
        match class {
            ColumnClass::Plain => true,
            ColumnClass::Metric(metric) => self.is_visible(metric),
        }
    }

    pub fn enabled_count(&self) -> usize {
        Metric::ALL.iter().filter(|m| self.is_visible(**m)).count()
    }

    /// Colspan of a channel group header; `None` hides the header
    pub fn group_colspan(&self) -> Option<usize> {
        match self.enabled_count() {
            0 => None,
            n => Some(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_visible_by_default() {
        let columns = ColumnVisibility::default();
        assert_eq!(columns.group_colspan(), Some(3));
        assert!(columns.column_visible(ColumnClass::Metric(Metric::Avg)));
    }

    #[test]
    fn test_hiding_quantity_reduces_colspan_by_one() {
        let mut columns = ColumnVisibility::default();
        columns.set(Metric::Qty, false);
        assert!(!columns.column_visible(ColumnClass::Metric(Metric::Qty)));
        assert!(columns.column_visible(ColumnClass::Plain));
        assert_eq!(columns.group_colspan(), Some(2));
    }

    #[test]
    fn test_all_off_hides_group_header() {
        let mut columns = ColumnVisibility::default();
        for metric in Metric::ALL {
            columns.set(metric, false);
        }
        assert_eq!(columns.group_colspan(), None);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("QTY".parse::<Metric>(), Ok(Metric::Qty));
        assert_eq!("average".parse::<Metric>(), Ok(Metric::Avg));
        assert!("price".parse::<Metric>().is_err());
    }
}
