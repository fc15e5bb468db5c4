use tracing::info;

use crate::domain::{LengthFilter, RetrievalSession, SearchOutcome, SequenceRecord, TaxonId};
use crate::entrez::EntrezGateway;
use crate::error::HarvestError;
use crate::genbank;
use crate::query;

/// Hard ceiling on a single efetch request, independent of caller intent.
pub const MAX_BATCH_SIZE: u64 = 500;

#[derive(Clone)]
pub struct Retriever<G: EntrezGateway> {
    gateway: G,
}

impl<G: EntrezGateway> Retriever<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Resolve the taxon, run the filtered search and store a history
    /// session on the server side. A zero-count result is not an error:
    /// it yields `SearchOutcome::NoMatches` and no session.
    pub fn search(
        &self,
        taxid: &TaxonId,
        filter: &LengthFilter,
    ) -> Result<SearchOutcome, HarvestError> {
        let organism = self.gateway.resolve_taxon(taxid)?;
        info!(
            taxid = %taxid,
            organism = %organism.scientific_name,
            "resolved taxon"
        );

        let term = query::build_search_term(taxid, filter);
        let handle = self.gateway.search(&term)?;
        if handle.count == 0 {
            return Ok(SearchOutcome::NoMatches { organism });
        }

        let (web_env, query_key) = match (handle.web_env, handle.query_key) {
            (Some(web_env), Some(query_key)) => (web_env, query_key),
            _ => {
                return Err(HarvestError::MalformedResponse(
                    "esearch response is missing its WebEnv/QueryKey history handles".to_string(),
                ));
            }
        };
        let session = RetrievalSession {
            web_env,
            query_key,
            total_count: handle.count,
        };
        info!(count = session.total_count, "search stored a history session");
        Ok(SearchOutcome::Found { organism, session })
    }

    /// Fetch one bounded batch from a previously stored session. Does not
    /// auto-paginate; callers pass a different `start` for further pages.
    pub fn fetch_batch(
        &self,
        session: &RetrievalSession,
        start: u64,
        max_records: u64,
    ) -> Result<Vec<SequenceRecord>, HarvestError> {
        if !session.is_usable() {
            return Err(HarvestError::InvalidSession(
                "session is missing its WebEnv/QueryKey handles; run a search first".to_string(),
            ));
        }

        let batch_size = max_records.min(MAX_BATCH_SIZE);
        let block = self.gateway.fetch_batch(session, start, batch_size)?;
        let records = genbank::parse_records(&block)?;
        info!(
            start,
            requested = batch_size,
            parsed = records.len(),
            "fetched batch"
        );
        Ok(records)
    }
}
