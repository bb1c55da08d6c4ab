//! Asset catalog: symbol descriptions and categories.

use serde::{Deserialize, Serialize};

/// Description used for symbols missing from the catalog.
pub const UNKNOWN_ASSET: &str = "Unknown Asset";

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl AssetInfo {
    fn new(symbol: &str, description: &str, category: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            description: description.to_string(),
            category: Some(category.to_string()),
        }
    }
}

/// Lookup over a list of [`AssetInfo`] entries.
#[derive(Debug, Clone, Copy)]
pub struct AssetCatalog<'a> {
    entries: &'a [AssetInfo],
}

impl<'a> AssetCatalog<'a> {
    pub fn new(entries: &'a [AssetInfo]) -> Self {
        Self { entries }
    }

    pub fn get(&self, symbol: &str) -> Option<&'a AssetInfo> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Description of `symbol`, or [`UNKNOWN_ASSET`].
    pub fn describe(&self, symbol: &str) -> &'a str {
        self.get(symbol)
            .map(|e| e.description.as_str())
            .unwrap_or(UNKNOWN_ASSET)
    }

    pub fn category(&self, symbol: &str) -> Option<&'a str> {
        self.get(symbol).and_then(|e| e.category.as_deref())
    }

    /// Display label, e.g. `SPY (S&P 500 ETF)`.
    pub fn label(&self, symbol: &str) -> String {
        format!("{} ({})", symbol, self.describe(symbol))
    }

    /// Catalog symbols, in catalog order.
    pub fn symbols(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.iter().map(|e| e.symbol.as_str())
    }
}

/// Symbol part of a display label; a bare symbol is returned unchanged.
pub fn symbol_from_label(label: &str) -> &str {
    label.split(" (").next().unwrap_or(label).trim()
}

/// The default basket of ETFs plus bitcoin, grouped by category.
pub fn default_assets() -> Vec<AssetInfo> {
    const BASKET: &[(&str, &[(&str, &str)])] = &[
        (
            "Major Market ETFs",
            &[
                ("SPY", "S&P 500 ETF"),
                ("QQQ", "Nasdaq 100 ETF"),
                ("IWM", "Russell 2000 ETF"),
                ("IJR", "S&P Small-Cap ETF"),
                ("IJH", "S&P Mid-Cap ETF"),
                ("IWF", "Russell 1000 Growth ETF"),
                ("IWD", "Russell 1000 Value ETF"),
            ],
        ),
        (
            "International Developed",
            &[
                ("EFA", "Developed Markets ETF"),
                ("EWJ", "Japan ETF"),
                ("FXI", "China ETF"),
                ("EWG", "Germany ETF"),
            ],
        ),
        (
            "Emerging Markets",
            &[
                ("EEM", "Emerging Markets ETF"),
                ("EWZ", "Brazil ETF"),
                ("INDA", "India ETF"),
                ("EWT", "Taiwan ETF"),
                ("EWY", "South Korea ETF"),
                ("EWW", "Mexico ETF"),
            ],
        ),
        (
            "Fixed Income",
            &[
                ("TLT", "20+ Year Treasury ETF"),
                ("IEF", "7-10 Year Treasury ETF"),
                ("LQD", "Investment Grade Bond ETF"),
                ("HYG", "High Yield Bond ETF"),
                ("BND", "Total Bond Market ETF"),
                ("TIP", "TIPS Bond ETF"),
            ],
        ),
        (
            "Currencies",
            &[("UUP", "US Dollar ETF"), ("FXE", "Euro ETF")],
        ),
        (
            "Sectors",
            &[
                ("XLF", "Financial Select Sector SPDR Fund"),
                ("XLK", "Technology Select Sector SPDR Fund"),
                ("XLE", "Energy Select Sector SPDR Fund"),
                ("XLV", "Health Care Select Sector SPDR Fund"),
                ("XLI", "Industrial Select Sector SPDR Fund"),
                ("XLP", "Consumer Staples Select Sector SPDR Fund"),
                ("XLY", "Consumer Discretionary Select Sector SPDR Fund"),
                ("XLB", "Materials Select Sector SPDR Fund"),
                ("XLC", "Communication Services Select Sector SPDR Fund"),
                ("XLU", "Utilities Select Sector SPDR Fund"),
            ],
        ),
        ("Real Estate", &[("VNQ", "Real Estate ETF")]),
        (
            "Commodities",
            &[
                ("GLD", "Gold ETF"),
                ("SLV", "Silver ETF"),
                ("USO", "Oil ETF"),
                ("UNG", "Natural Gas ETF"),
                ("DBC", "Commodity Index ETF"),
            ],
        ),
        ("Crypto", &[("BTC", "Bitcoin")]),
    ];

    BASKET
        .iter()
        .flat_map(|(category, assets)| {
            assets
                .iter()
                .map(move |(symbol, description)| AssetInfo::new(symbol, description, category))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_basket() {
        let assets = default_assets();
        assert_eq!(assets.len(), 42);
        assert_eq!(assets[0].symbol, "SPY");
        assert_eq!(assets.last().unwrap().symbol, "BTC");
    }

    #[test]
    fn test_describe_and_label() {
        let assets = default_assets();
        let catalog = AssetCatalog::new(&assets);
        assert_eq!(catalog.describe("TLT"), "20+ Year Treasury ETF");
        assert_eq!(catalog.label("SPY"), "SPY (S&P 500 ETF)");
        assert_eq!(catalog.category("XLK"), Some("Sectors"));
    }

    #[test]
    fn test_unknown_asset_fallback() {
        let assets = default_assets();
        let catalog = AssetCatalog::new(&assets);
        assert_eq!(catalog.describe("DOGE"), UNKNOWN_ASSET);
        assert_eq!(catalog.label("DOGE"), "DOGE (Unknown Asset)");
        assert_eq!(catalog.category("DOGE"), None);
    }

    #[test]
    fn test_symbol_from_label() {
        assert_eq!(symbol_from_label("BTC (Bitcoin)"), "BTC");
        assert_eq!(symbol_from_label("GLD"), "GLD");
        assert_eq!(symbol_from_label("TLT (20+ Year Treasury ETF)"), "TLT");
    }
}
