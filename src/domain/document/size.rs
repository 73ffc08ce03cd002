//! Human-readable byte sizes

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Format a byte count for display: whole bytes and kilobytes, one decimal
/// place from megabytes up (`"512 B"`, `"456 KB"`, `"2.4 MB"`).
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.0} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

/// Bytes expressed in MiB, as used by validation messages
pub fn to_mib(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}
