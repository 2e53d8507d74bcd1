// Reader for the results by candidate published by Elections Canada.

use std::fs::File;
use std::io::Read;

use permanence_ratios::builder::{Builder, Candidacy};
use serde::Deserialize;

use crate::proj::{
    io_common::{classify_party, classify_region, short_province},
    *,
};

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct CandidateRow {
    #[serde(rename = "Province")]
    province: String,
    #[serde(rename = "Electoral District Name/Nom de circonscription")]
    district_name: String,
    #[serde(rename = "Electoral District Number/Numéro de circonscription")]
    district_number: u32,
    #[serde(rename = "Candidate/Candidat")]
    candidate: String,
    #[serde(rename = "Votes Obtained/Votes obtenus")]
    votes: u64,
    #[serde(rename = "Percentage of Votes Obtained /Pourcentage des votes obtenus")]
    percentage: f64,
}

/// Reads the results from a file, or from the standard input if the path is `-`.
pub fn read_results_path(path: &str) -> PrResult<Builder> {
    info!("Attempting to read results file {:?}", path);
    if path == "-" {
        read_results(std::io::stdin())
    } else {
        let f = File::open(path).context(OpeningFileSnafu { path })?;
        read_results(f)
    }
}

pub fn read_results<R: Read>(rdr: R) -> PrResult<Builder> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut builder = Builder::new();
    let mut skipped: usize = 0;
    for (idx, row_r) in reader.deserialize::<CandidateRow>().enumerate() {
        // The header is on the first line.
        let lineno = idx + 2;
        let row = row_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_results: lineno: {:?} row: {:?}", lineno, row);

        let region = match classify_region(&row.province) {
            Some(r) => r,
            None => {
                warn!(
                    "read_results: line {}: province {:?} is not in any region, skipping",
                    lineno, row.province
                );
                skipped += 1;
                continue;
            }
        };
        let candidacy = Candidacy {
            region,
            province: short_province(&row.province),
            district_number: row.district_number,
            district_name: row.district_name,
            party: classify_party(&row.candidate),
            votes: row.votes,
            percentage: row.percentage,
        };
        builder
            .add_candidacy(&candidacy)
            .context(InvalidSharesSnafu {
                what: format!("line {}", lineno),
            })?;
    }
    info!(
        "read_results: {} candidacies read, {} skipped",
        builder.len(),
        skipped
    );
    Ok(builder)
}
