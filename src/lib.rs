pub mod app;
pub mod chart;
pub mod domain;
pub mod entrez;
pub mod error;
pub mod fasta;
pub mod genbank;
pub mod output;
pub mod query;
pub mod report;
pub mod retriever;
