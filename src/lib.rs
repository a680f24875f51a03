//! # grimoire
//!
//! Lexical highlighting rules for the grimoire language.
//!
//! File Layout
//!
//! The crate is small and flat. Everything lives under [highlight](highlight):
//!
//! src/highlight
//!   ├── category     The token categories (the stable names renderers key on)
//!   ├── rule         Rule specs, compiled rules and their match probes
//!   ├── table        Ordered rule tables and their builder
//!   ├── classify     The scanning driver: text + table -> classified spans
//!   ├── grimoire     The grimoire tables themselves (both language variants)
//!   ├── formats      Serializers for classified spans (json, yaml, html, treeviz)
//!   ├── config       Layered configuration with embedded defaults
//!   └── testing      Helpers shared by unit and integration tests
//!
//! The binary in `src/bin/grimoire.rs` is a thin front end over these modules.

pub mod highlight;

pub use highlight::{classify, ClassifiedSpan, LanguageVariant, RuleTable, TokenCategory};
