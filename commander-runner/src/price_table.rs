//! Price table loading for the runner.
//!
//! A price table is the aligned, forward-filled close matrix the engine
//! consumes: one date column plus one column per symbol. On load:
//! 1. Blank or non-numeric cells are read as missing
//! 2. Each column is forward filled (leading gaps stay missing: not yet listed)
//! 3. Exchange symbols are renamed to their local names via the universe aliases
//!
//! The engine never fills gaps itself; everything it sees comes through here.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use commander_core::domain::PriceSeries;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("price table has no date column")]
    MissingDateColumn,

    #[error("price table has no rows")]
    EmptyTable,

    #[error("row {row}: unparseable date '{value}'")]
    BadDate { row: usize, value: String },

    #[error("row {row}: dates must be strictly increasing")]
    DatesNotIncreasing { row: usize },

    #[error("row {row}: expected {expected} cells, found {found}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column '{symbol}' has {found} prices for {expected} dates")]
    ColumnLength {
        symbol: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("invalid universe: {0}")]
    InvalidUniverse(String),
}

/// Aligned daily closes for a set of symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl PriceTable {
    /// Build from already-aligned columns. Missing values are NaN and get forward filled.
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, LoadError> {
        for (row, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(LoadError::DatesNotIncreasing { row: row + 1 });
            }
        }
        for (symbol, prices) in &columns {
            if prices.len() != dates.len() {
                return Err(LoadError::ColumnLength {
                    symbol: symbol.clone(),
                    expected: dates.len(),
                    found: prices.len(),
                });
            }
        }
        let mut table = Self { dates, columns };
        table.forward_fill();
        Ok(table)
    }

    /// Read a wide CSV: `date,SYM1,SYM2,...` with ISO dates.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut names = headers.iter().map(|h| h.trim().to_string());
        match names.next() {
            Some(first) if first.eq_ignore_ascii_case("date") => {}
            _ => return Err(LoadError::MissingDateColumn),
        }
        let symbols: Vec<String> = names.collect();
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].contains(symbol) {
                return Err(LoadError::DuplicateColumn(symbol.clone()));
            }
        }

        let mut dates = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); symbols.len()];
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let row = i + 1;
            if record.len() != symbols.len() + 1 {
                return Err(LoadError::RowLength {
                    row,
                    expected: symbols.len() + 1,
                    found: record.len(),
                });
            }
            let raw_date = record.get(0).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
                LoadError::BadDate {
                    row,
                    value: raw_date.to_string(),
                }
            })?;
            dates.push(date);
            for (column, cell) in columns.iter_mut().zip(record.iter().skip(1)) {
                column.push(parse_price(cell));
            }
        }

        if dates.is_empty() {
            return Err(LoadError::EmptyTable);
        }
        Self::new(dates, symbols.into_iter().zip(columns).collect())
    }

    pub fn load_csv(path: &Path) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Carry the last valid price forward over gaps in every column.
    pub fn forward_fill(&mut self) {
        for prices in self.columns.values_mut() {
            let mut last = f64::NAN;
            for p in prices.iter_mut() {
                if p.is_finite() && *p > 0.0 {
                    last = *p;
                } else {
                    *p = last;
                }
            }
        }
    }

    /// Rename columns from exchange symbols to local names.
    ///
    /// `aliases` maps local name to exchange symbol. A local column that is
    /// already present wins over its alias.
    pub fn rename_aliases(&mut self, aliases: &BTreeMap<String, String>) {
        for (local, exchange) in aliases {
            if self.columns.contains_key(local) {
                continue;
            }
            if let Some(prices) = self.columns.remove(exchange) {
                self.columns.insert(local.clone(), prices);
            }
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.columns.contains_key(symbol)
    }

    /// Raw column including leading NaN before the first listing.
    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.columns.get(symbol).map(Vec::as_slice)
    }

    /// The symbol's prices from its first valid observation onward.
    ///
    /// Returns `None` if the column is absent or holds no price at all.
    pub fn series(&self, symbol: &str) -> Option<PriceSeries> {
        let prices = self.columns.get(symbol)?;
        let first = prices.iter().position(|p| p.is_finite())?;
        Some(PriceSeries::new(prices[first..].to_vec()))
    }

    /// Deterministic BLAKE3 hash over dates and every column in symbol order.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for date in &self.dates {
            hasher.update(date.to_string().as_bytes());
        }
        for (symbol, prices) in &self.columns {
            hasher.update(symbol.as_bytes());
            for p in prices {
                hasher.update(&p.to_le_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn parse_price(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
date,SPY,1321.T
2024-01-02,470.0,
2024-01-03,,33000
2024-01-04,472.5,33100
2024-01-05,NaN,
";

    #[test]
    fn reads_wide_csv_with_forward_fill() {
        let table = PriceTable::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.column("SPY").unwrap(), &[470.0, 470.0, 472.5, 472.5]);
        let nikkei = table.column("1321.T").unwrap();
        assert!(nikkei[0].is_nan());
        assert_eq!(&nikkei[1..], &[33000.0, 33100.0, 33100.0]);
    }

    #[test]
    fn series_starts_at_first_listing() {
        let table = PriceTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let series = table.series("1321.T").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last(), Some(33100.0));
        assert!(table.series("QQQ").is_none());
    }

    #[test]
    fn aliases_rename_exchange_symbols() {
        let mut table = PriceTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let aliases = BTreeMap::from([("N225".to_string(), "1321.T".to_string())]);
        table.rename_aliases(&aliases);
        assert!(table.contains("N225"));
        assert!(!table.contains("1321.T"));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let csv = "date,SPY\n2024-01-03,1\n2024-01-02,2\n";
        assert!(matches!(
            PriceTable::from_csv_reader(csv.as_bytes()),
            Err(LoadError::DatesNotIncreasing { row: 1 })
        ));
    }

    #[test]
    fn rejects_missing_date_column() {
        let csv = "SPY,QQQ\n1,2\n";
        assert!(matches!(
            PriceTable::from_csv_reader(csv.as_bytes()),
            Err(LoadError::MissingDateColumn)
        ));
    }

    #[test]
    fn rejects_bad_date() {
        let csv = "date,SPY\nyesterday,1\n";
        assert!(matches!(
            PriceTable::from_csv_reader(csv.as_bytes()),
            Err(LoadError::BadDate { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            PriceTable::from_csv_reader("date,SPY\n".as_bytes()),
            Err(LoadError::EmptyTable)
        ));
    }

    #[test]
    fn hash_is_deterministic_and_content_sensitive() {
        let a = PriceTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let b = PriceTable::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(a.dataset_hash(), b.dataset_hash());

        let changed = CSV.replace("472.5", "472.6");
        let c = PriceTable::from_csv_reader(changed.as_bytes()).unwrap();
        assert_ne!(a.dataset_hash(), c.dataset_hash());
    }
}
