//! Constants for file extensions used during parsing and resolution.
//!
//! ## Supported Extensions
//!
//! - **TypeScript**: `.ts`, `.tsx`, `.mts` (ES module), `.cts` (CommonJS)
//! - **JavaScript**: `.js`, `.jsx`, `.mjs` (ES module), `.cjs` (CommonJS)
//!
//! Resolution only ever tries the configured extensions; this list is used to
//! pick a parser source type and to flag configurations that point outside the
//! JS/TS family.

/// File extensions for JavaScript/TypeScript files the extractor understands
pub const JS_TS_EXTENSIONS: &[&str] = &[
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];

/// Extensions tried when resolving a specifier if none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js"];

/// Name of the CommonJS loader function whose literal argument is a dependency
pub const REQUIRE_IDENT: &str = "require";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_ts_extensions_includes_all_variants() {
        for ext in ["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"] {
            assert!(JS_TS_EXTENSIONS.contains(&ext), "missing '{}'", ext);
        }
        assert_eq!(JS_TS_EXTENSIONS.len(), 8);
    }

    #[test]
    fn test_default_extensions_are_known_source_types() {
        assert_eq!(DEFAULT_EXTENSIONS, &[".js"]);
        for ext in DEFAULT_EXTENSIONS {
            assert!(JS_TS_EXTENSIONS.contains(&ext.trim_start_matches('.')));
        }
    }
}
