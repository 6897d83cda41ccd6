/// Format a seconds offset as zero-padded `HH:MM:SS`.
///
/// Fractional seconds are truncated, never rounded up, so a hit at 59.9s
/// reads `00:00:59`. Hours are not wrapped at 24. Callers must not pass
/// negative offsets.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
