use crate::domain::{LengthFilter, TaxonId};

/// Upper end substituted into a min-only length clause. The Entrez range
/// grammar has no open-ended form, so this fixed value approximates
/// "unbounded"; sequences longer than it fall outside a min-only filter.
pub const SLEN_UPPER_SENTINEL: u64 = 1_000_000;

pub fn build_search_term(taxid: &TaxonId, filter: &LengthFilter) -> String {
    let mut term = format!("txid{}[Organism]", taxid.as_str());
    if let Some(min) = filter.min {
        term.push_str(&format!(" AND {min}:{SLEN_UPPER_SENTINEL}[SLEN]"));
    }
    if let Some(max) = filter.max {
        term.push_str(&format!(" AND 0:{max}[SLEN]"));
    }
    term
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxid() -> TaxonId {
        "9606".parse().unwrap()
    }

    #[test]
    fn unbounded_filter_emits_taxon_clause_only() {
        let term = build_search_term(&taxid(), &LengthFilter::unbounded());
        assert_eq!(term, "txid9606[Organism]");
    }

    #[test]
    fn min_only_filter_emits_two_clauses_with_sentinel() {
        let filter = LengthFilter {
            min: Some(500),
            max: None,
        };
        let term = build_search_term(&taxid(), &filter);
        assert_eq!(term, "txid9606[Organism] AND 500:1000000[SLEN]");
    }

    #[test]
    fn max_only_filter_emits_zero_lower_bound() {
        let filter = LengthFilter {
            min: None,
            max: Some(2000),
        };
        let term = build_search_term(&taxid(), &filter);
        assert_eq!(term, "txid9606[Organism] AND 0:2000[SLEN]");
    }

    #[test]
    fn both_bounds_emit_three_clauses_in_fixed_order() {
        let filter = LengthFilter {
            min: Some(500),
            max: Some(2000),
        };
        let term = build_search_term(&taxid(), &filter);
        assert_eq!(
            term,
            "txid9606[Organism] AND 500:1000000[SLEN] AND 0:2000[SLEN]"
        );
    }
}
