use thiserror::Error;

pub type HxResult<T> = Result<T, HxError>;

#[derive(Error, Debug)]
pub enum HxError {
    #[error("Duplicate metric name in registry: {name}")]
    DuplicateMetric { name: String },

    #[error("Derived metric {derived} references unregistered KPI {operand}")]
    UnknownOperand { derived: String, operand: String },

    #[error("Summary column {column} is not a registered metric")]
    UnknownColumn { column: String },

    #[error("Metric {name} is missing from the summary column order")]
    MissingColumn { name: String },
}
