//! Column names of the NSE insider trading disclosure export and of the
//! derived summary tables.
//!
//! Header spellings (`DISPLOSED`, `INITMATION`, `BROADCASTE`, the double space
//! in the sell lot-size column) are the exchange's own and must match verbatim.

pub const SYMBOL: &str = "SYMBOL";
pub const COMPANY: &str = "COMPANY";
pub const REGULATION: &str = "REGULATION";
pub const ACQUIRER_NAME: &str = "NAME OF THE ACQUIRER/DISPOSER";
pub const CATEGORY_OF_PERSON: &str = "CATEGORY OF PERSON";
pub const SECURITY_TYPE_PRIOR: &str = "TYPE OF SECURITY (PRIOR)";
pub const SECURITY_COUNT_PRIOR: &str = "NO. OF SECURITY (PRIOR)";
pub const SHAREHOLDING_PRIOR: &str = "% SHAREHOLDING (PRIOR)";
pub const SECURITY_TYPE_ACQUIRED: &str = "TYPE OF SECURITY (ACQUIRED/DISPLOSED)";
pub const SECURITIES_ACQUIRED: &str = "NO. OF SECURITIES (ACQUIRED/DISPLOSED)";
pub const VALUE_ACQUIRED: &str = "VALUE OF SECURITY (ACQUIRED/DISPLOSED)";
pub const TRANSACTION_TYPE: &str = "ACQUISITION/DISPOSAL TRANSACTION TYPE";
pub const SECURITY_TYPE_POST: &str = "TYPE OF SECURITY (POST)";
pub const SECURITY_COUNT_POST: &str = "NO. OF SECURITY (POST)";
pub const SHAREHOLDING_POST: &str = "% POST";
pub const ACQUISITION_FROM: &str = "DATE OF ALLOTMENT/ACQUISITION FROM";
pub const ACQUISITION_TO: &str = "DATE OF ALLOTMENT/ACQUISITION TO";
pub const INTIMATION_DATE: &str = "DATE OF INITMATION TO COMPANY";
pub const MODE_OF_ACQUISITION: &str = "MODE OF ACQUISITION";
pub const DERIVATIVE_TYPE: &str = "DERIVATIVE TYPE SECURITY";
pub const DERIVATIVE_SPEC: &str = "DERIVATIVE CONTRACT SPECIFICATION";
pub const NOTIONAL_BUY: &str = "NOTIONAL VALUE(BUY)";
pub const LOT_SIZE_BUY: &str = "NUMBER OF UNITS/CONTRACT LOT SIZE (BUY)";
pub const NOTIONAL_SELL: &str = "NOTIONAL VALUE(SELL)";
pub const LOT_SIZE_SELL: &str = "NUMBER OF UNITS/CONTRACT LOT SIZE  (SELL)";
pub const EXCHANGE: &str = "EXCHANGE";
pub const REMARK: &str = "REMARK";
pub const BROADCAST_TIME: &str = "BROADCASTE DATE AND TIME";
pub const XBRL: &str = "XBRL";

/// Canonical layout of a disclosure export.
pub const REQUIRED_COLUMNS: [&str; 29] = [
    SYMBOL,
    COMPANY,
    REGULATION,
    ACQUIRER_NAME,
    CATEGORY_OF_PERSON,
    SECURITY_TYPE_PRIOR,
    SECURITY_COUNT_PRIOR,
    SHAREHOLDING_PRIOR,
    SECURITY_TYPE_ACQUIRED,
    SECURITIES_ACQUIRED,
    VALUE_ACQUIRED,
    TRANSACTION_TYPE,
    SECURITY_TYPE_POST,
    SECURITY_COUNT_POST,
    SHAREHOLDING_POST,
    ACQUISITION_FROM,
    ACQUISITION_TO,
    INTIMATION_DATE,
    MODE_OF_ACQUISITION,
    DERIVATIVE_TYPE,
    DERIVATIVE_SPEC,
    NOTIONAL_BUY,
    LOT_SIZE_BUY,
    NOTIONAL_SELL,
    LOT_SIZE_SELL,
    EXCHANGE,
    REMARK,
    BROADCAST_TIME,
    XBRL,
];

/// Columns with no bearing on the promoter transaction analysis.
pub const PRUNED_COLUMNS: [&str; 10] = [
    DERIVATIVE_TYPE,
    DERIVATIVE_SPEC,
    NOTIONAL_BUY,
    LOT_SIZE_BUY,
    NOTIONAL_SELL,
    LOT_SIZE_SELL,
    REMARK,
    BROADCAST_TIME,
    XBRL,
    SECURITY_TYPE_ACQUIRED,
];

// Transactions summary
pub const TOTAL_SHARE_BUYS: &str = "Total Share Buys";
pub const TOTAL_VALUE_BUY: &str = "Total Value of Share Buy";
pub const DELTA_BUY: &str = "Delta Shareholding Buy";
pub const TOTAL_SHARE_SELLS: &str = "Total Share Sells";
pub const TOTAL_VALUE_SELL: &str = "Total Value of Share Sell";
pub const DELTA_SELL: &str = "Delta Shareholding Sell";

// Max transactions summary
pub const MAX_BUY_VALUE: &str = "Max Buy Value";
pub const MAX_BUY_VALUE_DATE: &str = "Max Buy Value Date";
pub const MAX_BUY_SHARES: &str = "Number of Max Buy Shares";
pub const MAX_BUY_DATE: &str = "Max Buy Date";
pub const MAX_SELL_VALUE: &str = "Max Sell Value";
pub const MAX_SELL_VALUE_DATE: &str = "Max Sell Value Date";
pub const MAX_SELL_SHARES: &str = "Number of Max Sell Shares";
pub const MAX_SELL_DATE: &str = "Max Sell Date";

// Combined summary
pub const MAX_AVG_BUY: &str = "Max Avg Buy";
pub const MAX_AVG_SELL: &str = "Max Avg Sell";

/// Placeholder shown for a max-transaction date that does not exist.
pub const NOT_AVAILABLE: &str = "N/A";
