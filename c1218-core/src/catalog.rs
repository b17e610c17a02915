//! Table and procedure numbering conventions
//!
//! Standard tables and procedures start at 0. Manufacturer tables start at
//! 2040 and manufacturer procedures at 2048. The boundaries are meter
//! conventions, nothing at the protocol level enforces them.

/// First standard table
pub const STD_TABLE_BASE: u16 = 0;
/// Number of standard tables usually probed
pub const STD_TABLE_COUNT: u16 = 170;
/// First manufacturer table
pub const MFG_TABLE_BASE: u16 = 2040;
/// Number of manufacturer tables usually probed
pub const MFG_TABLE_COUNT: u16 = 120;

/// First standard procedure
pub const STD_PROC_BASE: u16 = 0;
/// Number of standard procedures
pub const STD_PROC_COUNT: u16 = 33;
/// First manufacturer procedure
pub const MFG_PROC_BASE: u16 = 2048;
/// Number of manufacturer procedures usually probed
pub const MFG_PROC_COUNT: u16 = 150;

/// Procedures are invoked by writing to this table
pub const PROCEDURE_TABLE: u16 = 7;
/// Procedure results are read back from this table
pub const PROCEDURE_RESPONSE_TABLE: u16 = 8;

/// General configuration table (Table 00)
pub const GENERAL_CONFIG_TABLE: u16 = 0;

/// General manufacturer identification table (Table 01)
pub const MANUFACTURER_IDENT_TABLE: u16 = 1;

/// Restricted table read to confirm a security code on meters that report
/// success for any code
pub const SECURITY_CHECK_TABLE: u16 = 45;

/// Every standard table usually probed (0..170)
pub fn standard_tables() -> std::ops::Range<u16> {
    STD_TABLE_BASE..STD_TABLE_BASE + STD_TABLE_COUNT
}

/// Every manufacturer table usually probed (2040..2160)
pub fn manufacturer_tables() -> std::ops::Range<u16> {
    MFG_TABLE_BASE..MFG_TABLE_BASE + MFG_TABLE_COUNT
}

pub fn is_manufacturer_table(table: u16) -> bool {
    table >= MFG_TABLE_BASE
}

pub fn is_manufacturer_procedure(procedure: u16) -> bool {
    procedure >= MFG_PROC_BASE
}

/// Tables of the decade starting at `first` (ten consecutive IDs)
pub fn decade(first: u16) -> std::ops::Range<u16> {
    first..first.saturating_add(10)
}
