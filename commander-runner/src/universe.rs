//! The evaluated universe: symbols in display order plus their side tables.
//!
//! ```toml
//! symbols = ["SPY", "N225"]
//!
//! [aliases]
//! N225 = "1321.T"
//!
//! [margins]
//! N225 = 0.20
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::price_table::LoadError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    /// Symbols in evaluation order.
    pub symbols: Vec<String>,
    /// Local name to exchange symbol.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Structural yield per symbol. Absent means 0.
    #[serde(default)]
    pub margins: BTreeMap<String, f64>,
}

impl Default for Universe {
    /// Twenty broad equity, factor and REIT funds across US, Europe, emerging and Japan.
    fn default() -> Self {
        let symbols = [
            "SPY", "QQQ", "NOBL", "FDD", "VWO", "N225", "TPX", "GROW", "JDEF", "VT", "VTV",
            "MTUM", "QUAL", "JVLU", "JQ", "FEZ", "VNQI", "SCHD", "VYM", "JREIT",
        ];
        let aliases = [
            ("N225", "1321.T"),
            ("TPX", "1306.T"),
            ("JREIT", "1343.T"),
            ("GROW", "2516.T"),
            ("JDEF", "1399.T"),
            ("JVLU", "1593.T"),
            ("JQ", "2636.T"),
        ];
        let margins = [
            ("N225", 0.20),
            ("TPX", 0.10),
            ("FDD", 0.017),
            ("JQ", 0.206),
            ("JREIT", 0.05),
        ];

        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            aliases: aliases
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            margins: margins.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

impl Universe {
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        let universe: Universe = toml::from_str(text)?;
        universe.validate()?;
        Ok(universe)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.symbols.is_empty() {
            return Err(LoadError::InvalidUniverse("no symbols".into()));
        }
        for (i, symbol) in self.symbols.iter().enumerate() {
            if symbol.trim().is_empty() {
                return Err(LoadError::InvalidUniverse(format!("blank symbol at {i}")));
            }
            if self.symbols[..i].contains(symbol) {
                return Err(LoadError::InvalidUniverse(format!("duplicate symbol '{symbol}'")));
            }
        }
        if let Some((symbol, margin)) = self.margins.iter().find(|(_, m)| !m.is_finite()) {
            return Err(LoadError::InvalidUniverse(format!(
                "margin for '{symbol}' is {margin}"
            )));
        }
        Ok(())
    }

    /// Structural yield for `symbol`, 0 when unknown.
    pub fn margin(&self, symbol: &str) -> f64 {
        self.margins.get(symbol).copied().unwrap_or(0.0)
    }

    /// Exchange symbol to fetch `symbol` under.
    pub fn exchange_symbol<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.aliases.get(symbol).map(String::as_str).unwrap_or(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe() {
        let u = Universe::default();
        assert_eq!(u.len(), 20);
        assert_eq!(u.symbols[0], "SPY");
        assert_eq!(u.margin("N225"), 0.20);
        assert_eq!(u.margin("SPY"), 0.0);
        assert_eq!(u.exchange_symbol("JQ"), "2636.T");
        assert_eq!(u.exchange_symbol("QQQ"), "QQQ");
        assert!(u.validate().is_ok());
    }

    #[test]
    fn every_margin_and_alias_names_a_member() {
        let u = Universe::default();
        for symbol in u.margins.keys().chain(u.aliases.keys()) {
            assert!(u.symbols.contains(symbol), "{symbol} not in universe");
        }
    }

    #[test]
    fn parses_toml_with_optional_tables() {
        let u = Universe::from_toml_str(r#"symbols = ["SPY", "QQQ"]"#).unwrap();
        assert_eq!(u.symbols, vec!["SPY", "QQQ"]);
        assert!(u.aliases.is_empty());
        assert_eq!(u.margin("SPY"), 0.0);

        let text = r#"
symbols = ["TPX"]

[aliases]
TPX = "1306.T"

[margins]
TPX = 0.1
"#;
        let u = Universe::from_toml_str(text).unwrap();
        assert_eq!(u.exchange_symbol("TPX"), "1306.T");
        assert_eq!(u.margin("TPX"), 0.1);
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        assert!(Universe::from_toml_str("symbols = []").is_err());
        assert!(Universe::from_toml_str(r#"symbols = ["SPY", "SPY"]"#).is_err());
    }
}
