use assert_matches::assert_matches;

use genbank_harvester::domain::{LengthFilter, RetrievalSession, TaxonId};
use genbank_harvester::error::HarvestError;

#[test]
fn parse_taxon_id_trims_whitespace() {
    let taxid: TaxonId = "  562\n".parse().unwrap();
    assert_eq!(taxid.as_str(), "562");
}

#[test]
fn parse_taxon_id_rejects_non_digits() {
    for value in ["", "   ", "txid9606", "96-06", "9606.1"] {
        let err = value.parse::<TaxonId>().unwrap_err();
        assert_matches!(err, HarvestError::InvalidTaxonId(_));
    }
}

#[test]
fn length_filter_defaults_to_unbounded() {
    let filter = LengthFilter::default();
    assert!(filter.is_unbounded());
    assert_eq!(filter, LengthFilter::unbounded());

    let bounded = LengthFilter {
        min: Some(1),
        max: None,
    };
    assert!(!bounded.is_unbounded());
}

#[test]
fn blank_session_handles_are_unusable() {
    let session = RetrievalSession {
        web_env: "  ".to_string(),
        query_key: "1".to_string(),
        total_count: 10,
    };
    assert!(!session.is_usable());
}
