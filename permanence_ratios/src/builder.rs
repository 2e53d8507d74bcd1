use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

pub use crate::config::*;

/// One candidate's result in one riding, as reported in the official results.
#[derive(PartialEq, Debug, Clone)]
pub struct Candidacy {
    pub region: Region,
    pub province: String,
    pub district_number: u32,
    pub district_name: String,
    /// `None` for the candidates who do not belong to a tracked party.
    pub party: Option<Party>,
    pub votes: u64,
    /// The percentage of the votes obtained in the riding.
    pub percentage: f64,
}

/// The tables derived from the historical results.
#[derive(PartialEq, Debug, Clone)]
pub struct Tables {
    /// All the ridings, sorted by region name, province, district number and district name.
    pub ridings: Vec<Riding>,
    /// The historical results of each region, in region order.
    pub historical: Vec<(Region, ShareVector)>,
}

impl Tables {
    /// Pairs the historical results of each region with its current poll.
    ///
    /// A region without a poll keeps its historical results as the poll, which means no swing.
    pub fn region_aggregates(&self, polls: &HashMap<Region, ShareVector>) -> Vec<RegionAggregate> {
        self.historical
            .iter()
            .map(|(region, historical)| {
                let poll = match polls.get(region) {
                    Some(p) => *p,
                    None => {
                        warn!(
                            "region_aggregates: no poll for region {}, using historical results",
                            region
                        );
                        *historical
                    }
                };
                RegionAggregate {
                    region: *region,
                    historical: *historical,
                    poll,
                }
            })
            .collect()
    }
}

/// A builder for the riding and region tables.
///
/// Candidacies are added one at a time, in any order. The riding shares are the sums of the
/// percentages of each party, the regional shares are computed from the raw vote counts.
///
/// ```
/// use permanence_ratios::builder::{Builder, Candidacy};
/// use permanence_ratios::{Party, Region};
/// # use permanence_ratios::ProjectionErrors;
///
/// let mut builder = Builder::new();
/// builder.add_candidacy(&Candidacy {
///     region: Region::Territories,
///     province: "Yukon".to_string(),
///     district_number: 60001,
///     district_name: "Yukon".to_string(),
///     party: Some(Party::Liberal),
///     votes: 10887,
///     percentage: 53.7,
/// })?;
/// let tables = builder.build()?;
/// assert_eq!(tables.ridings.len(), 1);
/// # Ok::<(), ProjectionErrors>(())
/// ```
#[derive(Default)]
pub struct Builder {
    pub(crate) _candidacies: Vec<Candidacy>,
}

type RidingKey = (&'static str, String, u32, String);

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _candidacies: Vec::new(),
        }
    }

    pub fn add_candidacy(&mut self, candidacy: &Candidacy) -> Result<(), ProjectionErrors> {
        if !(0.0..=100.0).contains(&candidacy.percentage) {
            return Err(ProjectionErrors::InvalidCandidacy {
                district_number: candidacy.district_number,
                value: candidacy.percentage,
            });
        }
        self._candidacies.push(candidacy.clone());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self._candidacies.len()
    }

    pub fn is_empty(&self) -> bool {
        self._candidacies.is_empty()
    }

    pub fn build(&self) -> Result<Tables, ProjectionErrors> {
        if self._candidacies.is_empty() {
            return Err(ProjectionErrors::EmptyElection);
        }

        let mut by_riding: BTreeMap<RidingKey, (Region, [f64; NUM_PARTIES])> = BTreeMap::new();
        // Votes per party, then the total including the untracked candidates.
        let mut by_region: BTreeMap<Region, ([u64; NUM_PARTIES], u64)> = BTreeMap::new();

        for c in self._candidacies.iter() {
            let key: RidingKey = (
                c.region.name(),
                c.province.clone(),
                c.district_number,
                c.district_name.clone(),
            );
            let (_, shares) = by_riding
                .entry(key)
                .or_insert((c.region, [0.0; NUM_PARTIES]));
            let (votes, total) = by_region
                .entry(c.region)
                .or_insert(([0; NUM_PARTIES], 0));
            *total += c.votes;
            if let Some(party) = c.party {
                shares[party.index()] += c.percentage;
                votes[party.index()] += c.votes;
            }
        }

        let mut ridings: Vec<Riding> = Vec::with_capacity(by_riding.len());
        for ((_, province, district_number, district_name), (region, shares)) in by_riding {
            ridings.push(Riding {
                region,
                province,
                district_number,
                district_name,
                shares: ShareVector::new(shares)?,
            });
        }

        let mut historical: Vec<(Region, ShareVector)> = Vec::new();
        for (region, (votes, total)) in by_region {
            let shares = if total == 0 {
                warn!("build: no votes in region {}", region);
                ShareVector::ZERO
            } else {
                let mut shares = [0.0; NUM_PARTIES];
                for party in Party::ALL {
                    shares[party.index()] = votes[party.index()] as f64 / total as f64 * 100.0;
                }
                ShareVector::new(shares)?
            };
            debug!("build: region {}: {:?}", region, shares.as_array());
            historical.push((region, shares));
        }

        debug!(
            "build: {} candidacies, {} ridings, {} regions",
            self._candidacies.len(),
            ridings.len(),
            historical.len()
        );
        Ok(Tables { ridings, historical })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(
        region: Region,
        province: &str,
        number: u32,
        party: Option<Party>,
        votes: u64,
        percentage: f64,
    ) -> Candidacy {
        Candidacy {
            region,
            province: province.to_string(),
            district_number: number,
            district_name: format!("District {}", number),
            party,
            votes,
            percentage,
        }
    }

    fn sample() -> Builder {
        let mut b = Builder::new();
        let rows = vec![
            cand(Region::Ontario, "Ontario", 35002, Some(Party::Liberal), 600, 60.0),
            cand(Region::Ontario, "Ontario", 35002, Some(Party::Conservative), 300, 30.0),
            cand(Region::Ontario, "Ontario", 35002, None, 100, 10.0),
            cand(Region::Ontario, "Ontario", 35001, Some(Party::NDP), 1000, 50.0),
            cand(Region::Ontario, "Ontario", 35001, Some(Party::Green), 1000, 50.0),
            cand(Region::Alberta, "Alberta", 48001, Some(Party::Conservative), 700, 70.0),
            cand(Region::Alberta, "Alberta", 48001, None, 150, 15.0),
            cand(Region::Alberta, "Alberta", 48001, None, 150, 15.0),
        ];
        for r in rows.iter() {
            b.add_candidacy(r).unwrap();
        }
        b
    }

    #[test]
    fn pivots_ridings_in_sorted_order() {
        let tables = sample().build().unwrap();
        let numbers: Vec<u32> = tables.ridings.iter().map(|r| r.district_number).collect();
        assert_eq!(numbers, vec![48001, 35001, 35002]);

        let r = &tables.ridings[2];
        assert_eq!(r.region, Region::Ontario);
        assert_eq!(r.shares.as_array(), &[30.0, 60.0, 0.0, 0.0, 0.0]);
        // Untracked candidates are not part of the vector.
        assert_eq!(tables.ridings[0].shares.as_array(), &[70.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn same_party_candidacies_are_summed() {
        let mut b = Builder::new();
        b.add_candidacy(&cand(Region::Quebec, "Quebec", 24001, Some(Party::Bloc), 10, 10.0))
            .unwrap();
        b.add_candidacy(&cand(Region::Quebec, "Quebec", 24001, Some(Party::Bloc), 15, 15.0))
            .unwrap();
        let tables = b.build().unwrap();
        assert_eq!(tables.ridings.len(), 1);
        assert_eq!(tables.ridings[0].shares.get(Party::Bloc), 25.0);
    }

    #[test]
    fn regional_shares_are_vote_weighted() {
        let tables = sample().build().unwrap();
        assert_eq!(tables.historical.len(), 2);
        let (region, ontario) = tables.historical[1];
        assert_eq!(region, Region::Ontario);
        // 3000 votes in Ontario, including 100 for other candidates.
        assert!((ontario.get(Party::Liberal) - 20.0).abs() < 1e-9);
        assert!((ontario.get(Party::Conservative) - 10.0).abs() < 1e-9);
        assert!((ontario.get(Party::NDP) - 100.0 / 3.0).abs() < 1e-9);
        let (region, alberta) = tables.historical[0];
        assert_eq!(region, Region::Alberta);
        assert!((alberta.get(Party::Conservative) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn missing_polls_keep_historical_results() {
        let tables = sample().build().unwrap();
        let mut polls = HashMap::new();
        let poll = ShareVector::new([20.0, 40.0, 30.0, 5.0, 0.0]).unwrap();
        polls.insert(Region::Ontario, poll);
        let aggs = tables.region_aggregates(&polls);
        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].region, Region::Alberta);
        assert_eq!(aggs[0].poll, aggs[0].historical);
        assert_eq!(aggs[1].poll, poll);
    }

    #[test]
    fn invalid_candidacies_are_rejected() {
        let mut b = Builder::new();
        assert!(b.build().is_err());
        assert!(b
            .add_candidacy(&cand(Region::BC, "BC", 59001, Some(Party::Green), 5, 120.0))
            .is_err());
        assert!(b.is_empty());
    }
}
