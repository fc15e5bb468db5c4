use gb_io::reader::SeqReader;
use gb_io::seq::Seq;

use crate::domain::SequenceRecord;
use crate::error::HarvestError;

/// Parses an efetch `rettype=gb` text block into sequence records. The
/// reported length is always the residue count of the parsed sequence; the
/// LOCUS header length is ignored.
pub fn parse_records(block: &str) -> Result<Vec<SequenceRecord>, HarvestError> {
    let mut records = Vec::new();
    for parsed in SeqReader::new(block.as_bytes()) {
        let seq = parsed.map_err(|err| HarvestError::GenBankParse(err.to_string()))?;
        records.push(to_record(seq));
    }
    Ok(records)
}

fn to_record(seq: Seq) -> SequenceRecord {
    let length = seq.seq.len() as u64;
    let accession = seq
        .version
        .or(seq.accession)
        .or(seq.name)
        .unwrap_or_else(|| "unknown".to_string());
    let description = seq.definition.unwrap_or_default();
    SequenceRecord {
        accession,
        length,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "\
LOCUS       TEST0001                 120 bp    DNA     linear   SYN 01-JAN-2024
DEFINITION  Synthetic test construct number one.
ACCESSION   TEST0001
VERSION     TEST0001.1
KEYWORDS    .
SOURCE      synthetic DNA construct
  ORGANISM  synthetic DNA construct
            other sequences; artificial sequences.
FEATURES             Location/Qualifiers
     source          1..120
                     /organism=\"synthetic DNA construct\"
ORIGIN
        1 acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt
       61 acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt
//
LOCUS       TEST0002                  30 bp    DNA     linear   SYN 01-JAN-2024
DEFINITION  Synthetic test construct number two.
ACCESSION   TEST0002
VERSION     TEST0002.1
KEYWORDS    .
SOURCE      synthetic DNA construct
  ORGANISM  synthetic DNA construct
            other sequences; artificial sequences.
FEATURES             Location/Qualifiers
     source          1..30
                     /organism=\"synthetic DNA construct\"
ORIGIN
        1 acgtacgtac gtacgtacgt acgtacgtac
//
";

    #[test]
    fn parse_flatfile_block() {
        let records = parse_records(BLOCK).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].accession, "TEST0001.1");
        assert_eq!(records[0].length, 120);
        assert_eq!(
            records[0].description,
            "Synthetic test construct number one."
        );

        assert_eq!(records[1].accession, "TEST0002.1");
        assert_eq!(records[1].length, 30);
    }

    #[test]
    fn empty_block_parses_to_no_records() {
        let records = parse_records("").unwrap();
        assert!(records.is_empty());
    }
}
