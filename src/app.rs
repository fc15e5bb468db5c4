use std::fs;

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::warn;

use crate::chart;
use crate::domain::{LengthFilter, SearchOutcome, TaxonId};
use crate::entrez::EntrezGateway;
use crate::error::HarvestError;
use crate::report;
use crate::retriever::Retriever;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub taxid: TaxonId,
    pub filter: LengthFilter,
    pub start: u64,
    pub max_records: u64,
    pub outdir: Utf8PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub taxid: String,
    pub organism: Option<String>,
    pub total_count: u64,
    pub fetched: usize,
    pub action: String,
    pub report_path: Option<String>,
    pub plot_path: Option<String>,
    pub finished_at: String,
}

#[derive(Clone)]
pub struct App<G: EntrezGateway> {
    retriever: Retriever<G>,
}

impl<G: EntrezGateway> App<G> {
    pub fn new(retriever: Retriever<G>) -> Self {
        Self { retriever }
    }

    /// Runs resolve -> search -> fetch -> render. Search-stage failures
    /// bubble up; a failed fetch degrades to an empty batch, and each
    /// artifact write failure downgrades its summary field without blocking
    /// the other write.
    pub fn run(&self, options: &RunOptions) -> Result<RunSummary, HarvestError> {
        let outcome = self
            .retriever
            .search(&options.taxid, &options.filter)?;

        let (organism, session) = match outcome {
            SearchOutcome::NoMatches { organism } => {
                return Ok(RunSummary {
                    taxid: options.taxid.to_string(),
                    organism: Some(organism.scientific_name),
                    total_count: 0,
                    fetched: 0,
                    action: "no-matches".to_string(),
                    report_path: None,
                    plot_path: None,
                    finished_at: chrono::Utc::now().to_rfc3339(),
                });
            }
            SearchOutcome::Found { organism, session } => (organism, session),
        };

        let records = match self
            .retriever
            .fetch_batch(&session, options.start, options.max_records)
        {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "batch fetch failed; continuing with an empty batch");
                Vec::new()
            }
        };

        if records.is_empty() {
            return Ok(RunSummary {
                taxid: options.taxid.to_string(),
                organism: Some(organism.scientific_name),
                total_count: session.total_count,
                fetched: 0,
                action: "no-records-fetched".to_string(),
                report_path: None,
                plot_path: None,
                finished_at: chrono::Utc::now().to_rfc3339(),
            });
        }

        if let Err(err) = fs::create_dir_all(options.outdir.as_std_path()) {
            warn!(outdir = %options.outdir, error = %err, "could not create output directory");
        }

        let csv_path = options
            .outdir
            .join(format!("taxid_{}_report.csv", options.taxid));
        let report_path = match report::write_csv(&records, &csv_path) {
            Ok(()) => Some(csv_path.to_string()),
            Err(err) => {
                warn!(error = %err, "CSV report was not written");
                None
            }
        };

        let png_path = options
            .outdir
            .join(format!("taxid_{}_plot.png", options.taxid));
        let plot_path = match chart::render_length_chart(&records, &png_path) {
            Ok(()) => Some(png_path.to_string()),
            Err(err) => {
                warn!(error = %err, "length chart was not written");
                None
            }
        };

        Ok(RunSummary {
            taxid: options.taxid.to_string(),
            organism: Some(organism.scientific_name),
            total_count: session.total_count,
            fetched: records.len(),
            action: "completed".to_string(),
            report_path,
            plot_path,
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
