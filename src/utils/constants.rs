//! Constants Module - Single Source of Truth
//!
//! Semua konstanta (env keys, endpoint paths, label pilihan) didefinisikan
//! di sini. Tidak ada hardcoded values di modul lain.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "TenderSetting";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = concat!("TenderSetting/", env!("CARGO_PKG_VERSION"));

// ============================================
// ENVIRONMENT
// ============================================

/// Base URL of the Config Store API
pub const ENV_API_BASE: &str = "API_BASE";

/// Alias kept for deployments that still export the dashboard's variable name
pub const ENV_API_BASE_ALIAS: &str = "NEXT_PUBLIC_API_URL";

/// Optional request timeout override (seconds)
pub const ENV_HTTP_TIMEOUT_SECS: &str = "TENDER_HTTP_TIMEOUT_SECS";

/// Default timeout for Config Store requests (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// ============================================
// ENDPOINTS
// ============================================

/// `GET`/`PUT {API_BASE}/user/config/{userId}`
pub const USER_CONFIG_PATH: &str = "user/config";

/// `GET {API_BASE}/scrape/instansi`
pub const INSTANSI_PATH: &str = "scrape/instansi";

// ============================================
// NOTIFICATION TEXT
// ============================================

pub const MSG_SAVE_PENDING: &str = "Memperbarui config...";
pub const MSG_SAVE_SUCCESS: &str = "Config berhasil diperbarui";
pub const MSG_SAVE_FAILURE: &str = "Gagal memperbarui config";

/// Buffered notifications per subscriber before lagging ones are dropped
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;

// ============================================
// JENIS PROYEK - closed option set
// ============================================

/// Category labels offered by the `jenis_proyek` selector, in display order
pub const JENIS_PROYEK_OPTIONS: [&str; 8] = [
    "Pengadaan Barang",
    "Jasa Konsultansi Badan Usaha Non Konstruksi",
    "Pekerjaan Konstruksi",
    "Jasa Konsultansi Perorangan Non Konstruksi",
    "Jasa Konsultansi Badan Usaha Konstruksi",
    "Jasa Konsultansi Perorangan Konstruksi",
    "Pekerjaan Konstruksi Terintegrasi",
    "Jasa Lainnya",
];

/// Check whether a label belongs to the `jenis_proyek` option set
#[inline]
pub fn is_known_jenis_proyek(label: &str) -> bool {
    JENIS_PROYEK_OPTIONS.contains(&label)
}

/// Join `base` and a relative `path` with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_slashes() {
        assert_eq!(join_url("http://api", "user/config"), "http://api/user/config");
        assert_eq!(join_url("http://api/", "/user/config"), "http://api/user/config");
        assert_eq!(join_url("http://api/v1//", "scrape/instansi"), "http://api/v1/scrape/instansi");
    }

    #[test]
    fn test_jenis_proyek_options() {
        assert_eq!(JENIS_PROYEK_OPTIONS.len(), 8);
        assert!(is_known_jenis_proyek("Jasa Lainnya"));
        assert!(!is_known_jenis_proyek("jasa lainnya"));
    }
}
