//! Descriptions of callables.

use serde::{Serialize, Serializer};

/// Where a native callable lives, as reported by the platform loader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolInfo {
    /// Load address of the containing image.
    pub base: Option<usize>,
    /// Path of the containing image.
    pub file: Option<String>,
}

/// Native-symbol lookup.
pub trait SymbolResolver {
    fn resolve(&self, address: usize) -> SymbolInfo;
}

/// Resolver for platforms without a loader query.
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn resolve(&self, _address: usize) -> SymbolInfo {
        SymbolInfo::default()
    }
}

impl<F> SymbolResolver for F
where
    F: Fn(usize) -> SymbolInfo,
{
    fn resolve(&self, address: usize) -> SymbolInfo {
        self(address)
    }
}

/// What a value is as a callable.
///
/// Serializes to a flat object (or a bare status number) with the field
/// names host tools expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CallableInfo {
    Native {
        #[serde(serialize_with = "hex")]
        pointer_address: usize,
        #[serde(skip_serializing_if = "Option::is_none", serialize_with = "hex_opt")]
        symbol_base: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        symbol_file: Option<String>,
    },
    Script {
        source: String,
        linedefined: i64,
        lastlinedefined: i64,
    },
    /// Not callable: the execution status of the target instead.
    Status(i32),
}

fn hex<S: Serializer>(address: &usize, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{address:#x}"))
}

fn hex_opt<S: Serializer>(address: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
    match address {
        Some(address) => hex(address, serializer),
        None => serializer.serialize_none(),
    }
}
