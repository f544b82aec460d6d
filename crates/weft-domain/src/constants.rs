//! Domain layer constants
//!
//! Naming conventions shared by the contract macro, the descriptor model and
//! the aspect executor. Infrastructure-specific constants live in
//! `weft_infrastructure::constants`.

// ============================================================================
// MEMBER NAMING CONVENTIONS
// ============================================================================

/// Lookup name shared by every indexer accessor
pub const INDEXER_MEMBER_NAME: &str = "index";

/// Parameter bag name of the implicit value passed to property and indexer setters
pub const SETTER_VALUE_PARAMETER: &str = "value";

/// Prefix of the parameter bag entries describing generic type arguments (`T1..Tn`)
pub const GENERIC_ARGUMENT_PREFIX: &str = "T";

/// Prefix stripped from property and indexer setter functions (`set_title` -> `title`)
pub const SETTER_FUNCTION_PREFIX: &str = "set_";

// ============================================================================
// MARKER CONVENTIONS
// ============================================================================

/// Order used when a marker declaration does not specify one
pub const DEFAULT_MARKER_ORDER: i32 = 0;

/// Key identifying a type-valued marker argument in raw JSON (`{"$type": "path::Type"}`)
pub const MARKER_TYPE_ARGUMENT_KEY: &str = "$type";
