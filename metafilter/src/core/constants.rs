// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "metafilter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name (looked up in the working directory)
pub const CONFIG_FILE_NAME: &str = "metafilter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "METAFILTER_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "METAFILTER_LOG";

// =============================================================================
// Environment Variables - Compiler
// =============================================================================

/// Environment variable for the target SQL backend (hana or duckdb)
pub const ENV_BACKEND: &str = "METAFILTER_BACKEND";

/// Environment variable for the JSON metadata column name
pub const ENV_METADATA_COLUMN: &str = "METAFILTER_METADATA_COLUMN";

/// Environment variable for dedicated columns (comma separated)
pub const ENV_SPECIFIC_COLUMNS: &str = "METAFILTER_SPECIFIC_COLUMNS";

// =============================================================================
// Compiler Defaults
// =============================================================================

/// Default JSON-valued column holding generic metadata
pub const DEFAULT_METADATA_COLUMN: &str = "VEC_META";

/// Default log filter for the binary
pub const DEFAULT_LOG_FILTER: &str = "warn";

// =============================================================================
// Filter Limits
// =============================================================================

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum nesting depth of logical connectives
pub const MAX_FILTER_DEPTH: usize = 32;

// =============================================================================
// Operator Symbols
// =============================================================================

/// Prefix shared by every operator and connective key
pub const OPERATOR_SIGIL: char = '$';

pub const OP_AND: &str = "$and";
pub const OP_OR: &str = "$or";

pub const OP_EQ: &str = "$eq";
pub const OP_NE: &str = "$ne";
pub const OP_LT: &str = "$lt";
pub const OP_LTE: &str = "$lte";
pub const OP_GT: &str = "$gt";
pub const OP_GTE: &str = "$gte";
pub const OP_IN: &str = "$in";
pub const OP_NIN: &str = "$nin";
pub const OP_BETWEEN: &str = "$between";
pub const OP_LIKE: &str = "$like";
pub const OP_CONTAINS: &str = "$contains";

/// Discriminator value marking a tagged date literal (`{"type": "date", "date": ...}`)
pub const DATE_TYPE_TAG: &str = "date";
