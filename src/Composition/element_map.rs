//! Insertion-ordered map from element symbol to a number.
//!
//! Used both for parsed stoichiometric ratios and for computed element masses.
//! Iteration follows the order in which a symbol was first inserted; inserting an
//! existing symbol again replaces its value but keeps its position.
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMap {
    symbols: Vec<String>,
    values: Vec<f64>,
}

/// element -> stoichiometric coefficient
pub type Ratios = ElementMap;
/// element -> mass in grams
pub type MassResult = ElementMap;

impl ElementMap {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            values: Vec::new(),
        }
    }

    fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// inserts a value; an existing symbol is overwritten in place
    pub fn insert(&mut self, symbol: &str, value: f64) {
        match self.position(symbol) {
            Some(i) => self.values[i] = value,
            None => {
                self.symbols.push(symbol.to_string());
                self.values.push(value);
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.position(symbol).map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.symbols
            .iter()
            .map(|s| s.as_str())
            .zip(self.values.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for ElementMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = ElementMap::new();
        for (symbol, value) in iter {
            map.insert(symbol.as_ref(), value);
        }
        map
    }
}

// serialized as a JSON object whose keys keep insertion order
impl Serialize for ElementMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (symbol, value) in self.iter() {
            map.serialize_entry(symbol, &value)?;
        }
        map.end()
    }
}
