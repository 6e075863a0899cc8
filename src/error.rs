use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
    #[error("ReportError: {0}")]
    Report(#[from] ReportError),
    #[error("ExportError: {0}")]
    Export(#[from] ExportError),
    #[error("UtilsError: {0}")]
    Utils(#[from] UtilsError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Interactive mode requires a terminal")]
    NotATerminal,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration directory not found: {path}")]
    FileNotFound { path: String, hint: String },
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration save failed: {message}")]
    ConfigSaveFailed { message: String },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Terminal output error: {0}")]
    TerminalOutput(String),
    #[error("Pagination error: {0}")]
    Pagination(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to parse report {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Tab '{id}' not found")]
    TabNotFound { id: String },
    #[error("Section '{id}' not found")]
    SectionNotFound { id: String },
    #[error("Column {column} is out of range (table has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
    #[error("Invalid chart data for {label}: {message}")]
    InvalidChartData { label: String, message: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Export file error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("Logger initialization failed: {message}")]
    Logging { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(StorageError::ConfigDirNotFound) => ErrorSeverity::Critical,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Display(_) => ErrorSeverity::Low,
            AppError::Report(report_error) => match report_error {
                ReportError::Parse { .. } => ErrorSeverity::High,
                ReportError::TabNotFound { .. } | ReportError::SectionNotFound { .. } => {
                    ErrorSeverity::Medium
                }
                ReportError::ColumnOutOfRange { .. } | ReportError::InvalidChartData { .. } => {
                    ErrorSeverity::Low
                }
            },
            AppError::Export(_) => ErrorSeverity::Medium,
            AppError::Utils(_) => ErrorSeverity::Low,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Report(ReportError::Parse { path, .. }) => {
                format!("Report file {} could not be read", path)
            }
            AppError::Report(ReportError::TabNotFound { id }) => format!("Tab '{}' not found", id),
            AppError::Report(ReportError::SectionNotFound { id }) => {
                format!("Section '{}' not found", id)
            }
            AppError::Config(ConfigError::FileNotFound { path, .. }) => {
                format!("Configuration directory {} does not exist", path)
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Report(ReportError::Parse { .. }) => {
                Some("Check that the file is a KubeBuddy JSON report".to_string())
            }
            AppError::Report(ReportError::TabNotFound { .. }) => {
                Some("'kubebuddy-report show <report>' lists the available tabs".to_string())
            }
            AppError::Report(ReportError::SectionNotFound { .. }) => {
                Some("Section ids are shown in brackets next to each section title".to_string())
            }
            AppError::Config(ConfigError::FileNotFound { hint, .. }) => Some(hint.clone()),
            AppError::Config(ConfigError::UnknownKey { .. }) => {
                Some("'kubebuddy-report config show' lists the supported keys".to_string())
            }
            AppError::Cli(CliError::NotATerminal) => {
                Some("Use 'show' or 'print' when output is piped".to_string())
            }
            _ => None,
        }
    }
}
