//! Table 00: general configuration
//!
//! Besides the format and dimension fields, Table 00 carries bitmaps of the
//! standard and manufacturer tables and procedures the meter implements and
//! of the tables it accepts writes to. Bit 0 of the first byte is the lowest
//! ID of each range.

use c1218_core::catalog::{MFG_PROC_BASE, MFG_TABLE_BASE, STD_PROC_BASE, STD_TABLE_BASE};
use c1218_core::error::{C1218Error, C1218Result};

/// Offset of the first bitmap
const FIXED_FIELDS_LENGTH: usize = 19;

/// Decoded Table 00
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralConfig {
    pub format_control: [u8; 3],
    pub device_class: [u8; 4],
    pub nameplate_type: u8,
    pub default_set_used: u8,
    pub max_proc_parm_length: u8,
    pub max_resp_data_length: u8,
    pub std_version: u8,
    pub std_revision: u8,
    pub dim_std_tables_used: u8,
    pub dim_mfg_tables_used: u8,
    pub dim_std_procs_used: u8,
    pub dim_mfg_procs_used: u8,
    pub dim_mfg_status_used: u8,
    pub nbr_pending: u8,
    pub std_tables_used: Vec<u16>,
    pub mfg_tables_used: Vec<u16>,
    pub std_procs_used: Vec<u16>,
    pub mfg_procs_used: Vec<u16>,
    pub std_tables_write: Vec<u16>,
    pub mfg_tables_write: Vec<u16>,
}

impl GeneralConfig {
    /// Parse the table data of a Table 00 read (without count and checksum)
    pub fn parse(data: &[u8]) -> C1218Result<Self> {
        if data.len() < FIXED_FIELDS_LENGTH {
            return Err(C1218Error::InvalidData(format!(
                "Table 00 too short: {} bytes",
                data.len()
            )));
        }

        let dim_std_tables_used = data[13];
        let dim_mfg_tables_used = data[14];
        let dim_std_procs_used = data[15];
        let dim_mfg_procs_used = data[16];

        let required = FIXED_FIELDS_LENGTH
            + 2 * dim_std_tables_used as usize
            + 2 * dim_mfg_tables_used as usize
            + dim_std_procs_used as usize
            + dim_mfg_procs_used as usize;
        if data.len() < required {
            return Err(C1218Error::InvalidData(format!(
                "Table 00 declares {} bytes of bitmaps, only {} bytes present",
                required - FIXED_FIELDS_LENGTH,
                data.len() - FIXED_FIELDS_LENGTH
            )));
        }

        let mut pos = FIXED_FIELDS_LENGTH;
        let std_tables_used = unpack_ids(take(data, &mut pos, dim_std_tables_used), STD_TABLE_BASE);
        let mfg_tables_used = unpack_ids(take(data, &mut pos, dim_mfg_tables_used), MFG_TABLE_BASE);
        let std_procs_used = unpack_ids(take(data, &mut pos, dim_std_procs_used), STD_PROC_BASE);
        let mfg_procs_used = unpack_ids(take(data, &mut pos, dim_mfg_procs_used), MFG_PROC_BASE);
        let std_tables_write = unpack_ids(take(data, &mut pos, dim_std_tables_used), STD_TABLE_BASE);
        let mfg_tables_write = unpack_ids(take(data, &mut pos, dim_mfg_tables_used), MFG_TABLE_BASE);

        Ok(Self {
            format_control: [data[0], data[1], data[2]],
            device_class: [data[3], data[4], data[5], data[6]],
            nameplate_type: data[7],
            default_set_used: data[8],
            max_proc_parm_length: data[9],
            max_resp_data_length: data[10],
            std_version: data[11],
            std_revision: data[12],
            dim_std_tables_used,
            dim_mfg_tables_used,
            dim_std_procs_used,
            dim_mfg_procs_used,
            dim_mfg_status_used: data[17],
            nbr_pending: data[18],
            std_tables_used,
            mfg_tables_used,
            std_procs_used,
            mfg_procs_used,
            std_tables_write,
            mfg_tables_write,
        })
    }

    /// Whether the meter reports `table` as implemented
    pub fn has_table(&self, table: u16) -> bool {
        self.std_tables_used.contains(&table) || self.mfg_tables_used.contains(&table)
    }

    pub fn is_writable(&self, table: u16) -> bool {
        self.std_tables_write.contains(&table) || self.mfg_tables_write.contains(&table)
    }

    pub fn has_procedure(&self, procedure: u16) -> bool {
        self.std_procs_used.contains(&procedure) || self.mfg_procs_used.contains(&procedure)
    }
}

fn take<'a>(data: &'a [u8], pos: &mut usize, len: u8) -> &'a [u8] {
    let slice = &data[*pos..*pos + len as usize];
    *pos += len as usize;
    slice
}

/// IDs of the set bits, least significant bit first
fn unpack_ids(bitmap: &[u8], base: u16) -> Vec<u16> {
    bitmap
        .iter()
        .enumerate()
        .flat_map(|(index, &byte)| {
            (0..8u16)
                .filter(move |&bit| byte & (1u8 << bit) != 0)
                .map(move |bit| base + (index as u16) * 8 + bit)
        })
        .collect()
}
