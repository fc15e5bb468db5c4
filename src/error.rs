use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarvestError {
    #[error("invalid taxonomic id: {0}")]
    InvalidTaxonId(String),

    #[error("invalid sequence id: {0}")]
    InvalidSequenceId(String),

    #[error("no organism found for taxid {0}")]
    TaxonNotFound(String),

    #[error("Entrez request failed: {0}")]
    EntrezHttp(String),

    #[error("Entrez returned status {status}: {message}")]
    EntrezStatus { status: u16, message: String },

    #[error("malformed Entrez response: {0}")]
    MalformedResponse(String),

    #[error("invalid retrieval session: {0}")]
    InvalidSession(String),

    #[error("failed to parse GenBank records: {0}")]
    GenBankParse(String),

    #[error("failed to write CSV report: {0}")]
    Report(String),

    #[error("failed to render length chart: {0}")]
    Chart(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
