use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::domain::{OrganismInfo, RetrievalSession, TaxonId};
use crate::error::HarvestError;

pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_TOOL: &str = "gb-harvest";

/// Entrez etiquette parameters, passed explicitly into gateway construction
/// instead of living in process-wide mutable state.
#[derive(Debug, Clone)]
pub struct EntrezCredentials {
    pub email: String,
    pub api_key: Option<String>,
    pub tool: String,
}

impl EntrezCredentials {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: None,
            tool: DEFAULT_TOOL.to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn from_env(email: impl Into<String>) -> Self {
        let mut credentials = Self::new(email);
        if let Ok(api_key) = std::env::var("NCBI_API_KEY") {
            if !api_key.trim().is_empty() {
                credentials.api_key = Some(api_key.trim().to_string());
            }
        }
        credentials
    }
}

/// Raw result of an esearch call with history enabled. The history handles
/// are optional here; `Retriever::search` decides whether their absence is
/// acceptable (count 0) or malformed (count > 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryHandle {
    pub count: u64,
    pub web_env: Option<String>,
    pub query_key: Option<String>,
}

pub trait EntrezGateway: Send + Sync {
    fn resolve_taxon(&self, taxid: &TaxonId) -> Result<OrganismInfo, HarvestError>;
    fn search(&self, term: &str) -> Result<HistoryHandle, HarvestError>;
    fn fetch_batch(
        &self,
        session: &RetrievalSession,
        start: u64,
        count: u64,
    ) -> Result<String, HarvestError>;
}

#[derive(Clone)]
pub struct EntrezHttpClient {
    client: Client,
    base_url: String,
    credentials: EntrezCredentials,
}

impl EntrezHttpClient {
    pub fn new(credentials: EntrezCredentials) -> Result<Self, HarvestError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("gb-harvest/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| HarvestError::EntrezHttp(err.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| HarvestError::EntrezHttp(err.to_string()))?;

        Ok(Self {
            client,
            base_url: EUTILS_BASE_URL.to_string(),
            credentials,
        })
    }

    fn get_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String, HarvestError> {
        let url = format!("{}/{path}", self.base_url);
        let mut request = self.client.get(&url);
        for (key, value) in params {
            request = request.query(&[(*key, *value)]);
        }
        request = request.query(&[
            ("tool", self.credentials.tool.as_str()),
            ("email", self.credentials.email.as_str()),
        ]);
        if let Some(api_key) = &self.credentials.api_key {
            request = request.query(&[("api_key", api_key.as_str())]);
        }

        let response = request
            .send()
            .map_err(|err| HarvestError::EntrezHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        response
            .text()
            .map_err(|err| HarvestError::EntrezHttp(err.to_string()))
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, HarvestError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "Entrez request failed".to_string());
        Err(HarvestError::EntrezStatus { status, message })
    }
}

impl EntrezGateway for EntrezHttpClient {
    fn resolve_taxon(&self, taxid: &TaxonId) -> Result<OrganismInfo, HarvestError> {
        let body = self.get_text(
            "efetch.fcgi",
            &[("db", "taxonomy"), ("id", taxid.as_str()), ("retmode", "xml")],
        )?;
        parse_organism_xml(&body, taxid)
    }

    fn search(&self, term: &str) -> Result<HistoryHandle, HarvestError> {
        let body = self.get_text(
            "esearch.fcgi",
            &[
                ("db", "nucleotide"),
                ("term", term),
                ("usehistory", "y"),
                ("retmode", "json"),
            ],
        )?;
        parse_search_response(&body)
    }

    fn fetch_batch(
        &self,
        session: &RetrievalSession,
        start: u64,
        count: u64,
    ) -> Result<String, HarvestError> {
        let retstart = start.to_string();
        let retmax = count.to_string();
        self.get_text(
            "efetch.fcgi",
            &[
                ("db", "nucleotide"),
                ("rettype", "gb"),
                ("retmode", "text"),
                ("retstart", retstart.as_str()),
                ("retmax", retmax.as_str()),
                ("WebEnv", session.web_env.as_str()),
                ("query_key", session.query_key.as_str()),
            ],
        )
    }
}

#[derive(Debug, Deserialize)]
struct TaxaSetXml {
    #[serde(rename = "Taxon", default)]
    taxa: Vec<TaxonXml>,
}

#[derive(Debug, Deserialize)]
struct TaxonXml {
    #[serde(rename = "TaxId")]
    tax_id: Option<String>,
    #[serde(rename = "ScientificName")]
    scientific_name: Option<String>,
}

pub fn parse_organism_xml(xml: &str, requested: &TaxonId) -> Result<OrganismInfo, HarvestError> {
    let parsed: TaxaSetXml = quick_xml::de::from_str(xml)
        .map_err(|err| HarvestError::MalformedResponse(format!("taxonomy response: {err}")))?;
    let taxon = parsed
        .taxa
        .into_iter()
        .next()
        .ok_or_else(|| HarvestError::TaxonNotFound(requested.as_str().to_string()))?;
    let scientific_name = taxon.scientific_name.ok_or_else(|| {
        HarvestError::MalformedResponse("taxonomy record without ScientificName".to_string())
    })?;
    Ok(OrganismInfo {
        taxid: taxon
            .tax_id
            .unwrap_or_else(|| requested.as_str().to_string()),
        scientific_name,
    })
}

#[derive(Debug, Deserialize)]
struct EsearchEnvelope {
    esearchresult: EsearchResultJson,
}

#[derive(Debug, Deserialize)]
struct EsearchResultJson {
    count: String,
    #[serde(default)]
    webenv: Option<String>,
    #[serde(default)]
    querykey: Option<String>,
}

pub fn parse_search_response(body: &str) -> Result<HistoryHandle, HarvestError> {
    let envelope: EsearchEnvelope = serde_json::from_str(body)
        .map_err(|err| HarvestError::MalformedResponse(format!("esearch response: {err}")))?;
    let result = envelope.esearchresult;
    let count = result.count.parse::<u64>().map_err(|_| {
        HarvestError::MalformedResponse(format!("esearch count {:?} is not a number", result.count))
    })?;
    Ok(HistoryHandle {
        count,
        web_env: result.webenv,
        query_key: result.querykey,
    })
}
