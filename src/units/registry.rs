//! Unit registry
//!
//! Holds the known unit symbols, their physical dimension and the factor that
//! relates each unit to its dimension's base unit. Built once at startup and
//! shared by reference afterwards.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Errors raised while loading unit definitions
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to read unit definitions from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: malformed definition: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Line {line}: unknown reference unit '{unit}'")]
    UnknownUnit { line: usize, unit: String },

    #[error("Line {line}: invalid factor '{factor}'")]
    InvalidFactor { line: usize, factor: String },
}

/// Result type for definition loading
pub type DefinitionResult<T> = Result<T, DefinitionError>;

// ============================================================================
// Dimension Names
// ============================================================================

/// Mass dimension
pub const MASS: &str = "mass";
/// Volume dimension
pub const VOLUME: &str = "volume";
/// Energy dimension (kcal, kJ)
pub const ENERGY: &str = "energy";

/// Canonical mass unit name
pub const HECTOGRAM: &str = "hectogram";
/// Canonical volume unit name
pub const DECILITER: &str = "deciliter";

/// Physical dimension of a unit, e.g. `[mass]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension(String);

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// A single unit definition
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    /// Canonical long name (e.g. "hectogram")
    pub name: String,
    /// Dimension this unit measures
    pub dimension: Dimension,
    /// Multiplier to the dimension's base unit (gram, milliliter, kilocalorie)
    pub factor: f64,
}

// ============================================================================
// Built-in Definitions
// ============================================================================

/// (name, dimension, factor to base, aliases)
const BUILTIN_UNITS: &[(&str, &str, f64, &[&str])] = &[
    // Mass, base = gram
    ("gram", MASS, 1.0, &["g", "grams"]),
    ("milligram", MASS, 1e-3, &["mg", "milligrams"]),
    ("microgram", MASS, 1e-6, &["ug", "micrograms"]),
    ("kilogram", MASS, 1000.0, &["kg", "kilograms"]),
    (HECTOGRAM, MASS, 100.0, &["hg", "hectograms"]),
    // Volume, base = milliliter
    ("milliliter", VOLUME, 1.0, &["ml", "millilitre", "milliliters", "millilitres"]),
    (DECILITER, VOLUME, 100.0, &["dl", "decilitre", "deciliters", "decilitres"]),
    ("liter", VOLUME, 1000.0, &["l", "L", "litre", "liters", "litres"]),
    // Energy, base = kilocalorie
    ("kilocalorie", ENERGY, 1.0, &["kcal", "Cal", "kilocalories"]),
    ("kilojoule", ENERGY, 1.0 / 4.184, &["kJ", "kilojoules"]),
];

/// Registry of known units, keyed by every accepted symbol
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: Vec<UnitDef>,
    symbols: HashMap<String, usize>,
    // Canonical targets are pinned so loaded definitions cannot rebind them
    hectogram: usize,
    deciliter: usize,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Create a registry holding only the built-in mass, volume and energy units
    pub fn new() -> Self {
        let mut registry = Self {
            units: Vec::new(),
            symbols: HashMap::new(),
            hectogram: 0,
            deciliter: 0,
        };

        for (name, dimension, factor, aliases) in BUILTIN_UNITS {
            let index = registry.insert(
                UnitDef {
                    name: name.to_string(),
                    dimension: Dimension::new(*dimension),
                    factor: *factor,
                },
                aliases.iter().map(|a| a.to_string()).collect(),
            );

            match *name {
                HECTOGRAM => registry.hectogram = index,
                DECILITER => registry.deciliter = index,
                _ => {}
            }
        }

        registry
    }

    /// Create a registry from the built-ins plus a definitions file
    pub fn from_file<P: AsRef<Path>>(path: P) -> DefinitionResult<Self> {
        let mut registry = Self::new();
        registry.load_definitions(path)?;
        Ok(registry)
    }

    /// Load additional definitions from a file
    pub fn load_definitions<P: AsRef<Path>>(&mut self, path: P) -> DefinitionResult<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let count = self.load_definitions_str(&text)?;
        tracing::debug!("Loaded {} unit definitions from {}", count, path.display());
        Ok(count)
    }

    /// Load additional definitions from text, returning how many were added
    ///
    /// Grammar, one definition per line:
    /// - `name = [dimension] = alias ...` defines a base unit
    /// - `name = 1e-6 * gram = alias ...` defines a scaled unit
    /// - `name = gram = alias ...` defines a synonym with factor 1
    ///
    /// Either every line is applied or, on error, none are.
    pub fn load_definitions_str(&mut self, text: &str) -> DefinitionResult<usize> {
        // Later lines may reference earlier ones, so stage on a copy
        let mut staged = self.clone();
        let mut count = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            }
            .trim();

            if content.is_empty() {
                continue;
            }

            let (def, aliases) = staged.parse_definition(line, content)?;
            staged.insert(def, aliases);
            count += 1;
        }

        *self = staged;
        Ok(count)
    }

    fn parse_definition(
        &self,
        line: usize,
        content: &str,
    ) -> DefinitionResult<(UnitDef, Vec<String>)> {
        let parts: Vec<&str> = content.split('=').map(str::trim).collect();
        if parts.len() < 2 {
            return Err(DefinitionError::Malformed {
                line,
                reason: "expected 'name = definition'".to_string(),
            });
        }

        let name = parts[0];
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(DefinitionError::Malformed {
                line,
                reason: format!("invalid unit name '{}'", name),
            });
        }

        let body = parts[1];
        let (dimension, factor) = if let Some(dim) = body.strip_prefix('[') {
            let dim = dim.strip_suffix(']').ok_or_else(|| DefinitionError::Malformed {
                line,
                reason: format!("unterminated dimension '{}'", body),
            })?;
            if dim.trim().is_empty() {
                return Err(DefinitionError::Malformed {
                    line,
                    reason: "empty dimension".to_string(),
                });
            }
            (Dimension::new(dim.trim()), 1.0)
        } else {
            let (factor, reference) = match body.split_once('*') {
                Some((factor, reference)) => {
                    let factor = factor.trim();
                    let value = factor.parse::<f64>().map_err(|_| DefinitionError::InvalidFactor {
                        line,
                        factor: factor.to_string(),
                    })?;
                    (value, reference.trim())
                }
                None => (1.0, body),
            };

            if !factor.is_finite() || factor <= 0.0 {
                return Err(DefinitionError::InvalidFactor {
                    line,
                    factor: factor.to_string(),
                });
            }

            let base = self.lookup(reference).ok_or_else(|| DefinitionError::UnknownUnit {
                line,
                unit: reference.to_string(),
            })?;
            (base.dimension.clone(), factor * base.factor)
        };

        let aliases = parts[2..]
            .iter()
            .filter(|a| !a.is_empty())
            .map(|a| a.to_string())
            .collect();

        Ok((
            UnitDef {
                name: name.to_string(),
                dimension,
                factor,
            },
            aliases,
        ))
    }

    fn insert(&mut self, def: UnitDef, aliases: Vec<String>) -> usize {
        let index = self.units.len();
        let symbols = std::iter::once(def.name.clone()).chain(aliases);

        for symbol in symbols {
            match self.symbols.insert(symbol.clone(), index) {
                // Listed twice on the same definition
                Some(previous) if previous == index => {}
                Some(previous) => tracing::warn!(
                    "Unit symbol '{}' redefined: '{}' replaces '{}'",
                    symbol,
                    def.name,
                    self.units[previous].name
                ),
                None => {}
            }
        }

        self.units.push(def);
        index
    }

    /// The canonical mass unit
    pub fn hectogram(&self) -> &UnitDef {
        &self.units[self.hectogram]
    }

    /// The canonical volume unit
    pub fn deciliter(&self) -> &UnitDef {
        &self.units[self.deciliter]
    }

    /// Look up a unit by name or alias (case-sensitive)
    pub fn lookup(&self, symbol: &str) -> Option<&UnitDef> {
        self.symbols.get(symbol.trim()).map(|&idx| &self.units[idx])
    }

    /// Whether the symbol is known to the registry
    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }

    /// Number of distinct unit definitions
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
