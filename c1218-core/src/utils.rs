//! Formatting helpers

/// Format bytes as lowercase space-separated hex (`ee 00 20`)
pub fn to_hex_string(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
