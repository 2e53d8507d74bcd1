/*!
Riding-level election projections with the permanence of ratios swing model.

The historical results of a riding are moved by the same odds ratio as the
polls moved against a baseline (the national or the regional historical results).
See [`update`] for the formula and [`run_projection`] for a complete pass over the ridings.

```
use permanence_ratios::*;

let baseline = ShareVector::new([31.9, 39.5, 19.7, 3.5, 4.7])?;
let riding = ShareVector::new([40.0, 30.0, 15.0, 5.0, 10.0])?;
// No change in the polls: no change in the riding.
let projected = update(&baseline, &riding, &baseline)?;
assert!((projected.get(Party::Conservative) - 40.0).abs() < 1e-9);
# Ok::<(), ProjectionErrors>(())
```
*/
pub mod builder;
mod config;
pub mod manual;

use log::{debug, info};

pub use crate::config::*;

/// Updates the results of a riding with the swing between a baseline and a poll.
///
/// For each party, the odds `x / (100 - x)` of the riding share are multiplied by the ratio
/// between the odds of the poll and the odds of the baseline. The projected share is then
/// recovered from the projected odds. The parties are updated independently and the output is
/// not normalized.
///
/// A party that had no votes in the riding stays at zero.
///
/// Arguments:
/// * `poll` the current polling, at the same granularity as `baseline`
/// * `riding` the historical results of the riding
/// * `baseline` the historical results against which the poll is compared
pub fn update(
    poll: &ShareVector,
    riding: &ShareVector,
    baseline: &ShareVector,
) -> Result<ShareVector, ProjectionErrors> {
    let mut out = [0.0; NUM_PARTIES];
    for party in Party::ALL {
        out[party.index()] =
            update_share(poll.get(party), riding.get(party), baseline.get(party))
                .map_err(|cause| ProjectionErrors::Degenerate { party, cause })?;
    }
    ShareVector::new(out)
}

fn update_share(poll: f64, riding: f64, baseline: f64) -> Result<f64, Degeneracy> {
    if riding == 0.0 {
        return Ok(0.0);
    }
    if baseline == 100.0 {
        return Err(Degeneracy::FullBaseline);
    }
    if poll == 0.0 {
        return Err(Degeneracy::ZeroPoll);
    }
    let inv_odds =
        (100.0 - poll) / poll * (100.0 - riding) / riding * baseline / (100.0 - baseline);
    let share = 100.0 / (1.0 + inv_odds);
    if !share.is_finite() {
        return Err(Degeneracy::NotFinite);
    }
    Ok(share)
}

/// Projects every riding with the baselines and polls given by `source`, and counts the winners.
///
/// The pass stops at the first riding that cannot be projected. The error names the riding and the
/// party at fault.
///
/// Arguments:
/// * `ridings` the ridings with their historical results
/// * `source` the baseline and the poll to apply to each riding
pub fn run_projection(
    ridings: &[Riding],
    source: &BaselineSource,
) -> Result<Projection, ProjectionErrors> {
    info!(
        "run_projection: {} pass over {} ridings",
        source.name(),
        ridings.len()
    );
    if ridings.is_empty() {
        return Err(ProjectionErrors::EmptyElection);
    }

    let mut results: Vec<ProjectionResult> = Vec::with_capacity(ridings.len());
    for riding in ridings.iter() {
        let (baseline, poll) = select_vectors(riding, source)?;
        let shares = update(poll, &riding.shares, baseline).map_err(|e| match e {
            ProjectionErrors::Degenerate { party, cause } => ProjectionErrors::RidingFailed {
                district_number: riding.district_number,
                district_name: riding.district_name.clone(),
                party,
                cause,
            },
            e => e,
        })?;
        let winner = shares.leader();
        debug!(
            "run_projection: riding {} {}: {:?} -> {:?} winner: {}",
            riding.district_number,
            riding.district_name,
            riding.shares.as_array(),
            shares.as_array(),
            winner
        );
        results.push(ProjectionResult {
            district_number: riding.district_number,
            district_name: riding.district_name.clone(),
            shares,
            winner,
        });
    }

    let tally = SeatTally::from_winners(results.iter().map(|r| r.winner));
    assert_eq!(tally.total() as usize, ridings.len());
    for (party, seats) in tally.iter() {
        info!("run_projection: {} pass: {:>4} {}", source.name(), seats, party);
    }
    Ok(Projection { results, tally })
}

// Returns (baseline, poll) for this riding.
fn select_vectors<'a>(
    riding: &Riding,
    source: &'a BaselineSource,
) -> Result<(&'a ShareVector, &'a ShareVector), ProjectionErrors> {
    match source {
        BaselineSource::National { baseline, poll } => Ok((baseline, poll)),
        BaselineSource::Regional(regions) => regions
            .get(&riding.region)
            .map(|agg| (&agg.historical, &agg.poll))
            .ok_or(ProjectionErrors::MissingRegion {
                region: riding.region,
            }),
    }
}
