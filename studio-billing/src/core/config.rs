/// 帳務核心配置
///
/// # 環境變數
///
/// 所有配置項都可以通過環境變數覆蓋：
///
/// | 環境變數 | 默認值 | 說明 |
/// |----------|--------|------|
/// | STUDIO_DB | studio.db | SQLite 資料庫路徑 |
/// | ENVIRONMENT | development | 運行環境 |
/// | LOG_LEVEL | info | 日誌級別 |
/// | LOG_DIR | (未設) | 設置後輸出滾動日誌文件 |
///
/// # 示例
///
/// ```ignore
/// STUDIO_DB=/data/studio/studio.db LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path (also the descriptor the batch guard inspects)
    pub database_path: String,
    /// 運行環境: development | staging | production
    pub environment: String,
    /// Log level filter
    pub log_level: String,
    /// Daily rolling log file directory (stdout only when unset)
    pub log_dir: Option<String>,
}

impl Config {
    /// 從環境變數加載配置
    ///
    /// 如果環境變數未設置，使用默認值
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("STUDIO_DB").unwrap_or_else(|_| "studio.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// 是否生產環境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否開發環境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
