use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}
