/// Institution id used for the internal ledger when none is configured
pub const DEFAULT_HOME_INSTITUTION: &str = "HOME_BANK";

/// Currency reported for summaries over an empty record set
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Decimal precision for summary metric values
pub const METRIC_DECIMAL_PRECISION: u32 = 2;
