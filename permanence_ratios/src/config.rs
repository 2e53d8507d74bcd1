// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The parties tracked by the projection.
///
/// The declaration order is the fixed party order used everywhere: in share vectors,
/// in tallies and for breaking ties between equal shares.
/// Any other candidacy is folded into "Other" and does not appear in a share vector.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Party {
    Conservative,
    Liberal,
    NDP,
    Green,
    Bloc,
}

impl Party {
    pub const ALL: [Party; NUM_PARTIES] = [
        Party::Conservative,
        Party::Liberal,
        Party::NDP,
        Party::Green,
        Party::Bloc,
    ];

    /// The position of this party in a share vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Party::Conservative => "Conservative",
            Party::Liberal => "Liberal",
            Party::NDP => "NDP",
            Party::Green => "Green",
            Party::Bloc => "Bloc",
        }
    }

}

impl Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub const NUM_PARTIES: usize = 5;

/// The polling regions. Polls are only published at this granularity.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Region {
    BC,
    Alberta,
    Prairies,
    Ontario,
    Quebec,
    Atlantic,
    Territories,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::BC,
        Region::Alberta,
        Region::Prairies,
        Region::Ontario,
        Region::Quebec,
        Region::Atlantic,
        Region::Territories,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::BC => "BC",
            Region::Alberta => "Alberta",
            Region::Prairies => "Prairies",
            Region::Ontario => "Ontario",
            Region::Quebec => "Quebec",
            Region::Atlantic => "Atlantic",
            Region::Territories => "Territories",
        }
    }

    pub fn from_name(name: &str) -> Option<Region> {
        Region::ALL.iter().cloned().find(|r| r.name() == name)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Percentages of the vote for each tracked party, in the fixed party order.
///
/// Every component is in [0, 100]. The components do not need to sum to 100: the
/// remainder belongs to the untracked candidates.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ShareVector([f64; NUM_PARTIES]);

impl ShareVector {
    pub const ZERO: ShareVector = ShareVector([0.0; NUM_PARTIES]);

    pub fn new(shares: [f64; NUM_PARTIES]) -> Result<ShareVector, ProjectionErrors> {
        for party in Party::ALL {
            let value = shares[party.index()];
            // Written so that NaN is rejected as well.
            if !(0.0..=100.0).contains(&value) {
                return Err(ProjectionErrors::ShareOutOfRange { party, value });
            }
        }
        Ok(ShareVector(shares))
    }

    /// Builds a share vector from a slice, as found in configuration files.
    pub fn from_slice(shares: &[f64]) -> Result<ShareVector, ProjectionErrors> {
        let arr: [f64; NUM_PARTIES] = shares
            .try_into()
            .map_err(|_| ProjectionErrors::WrongLength { len: shares.len() })?;
        ShareVector::new(arr)
    }

    pub fn get(&self, party: Party) -> f64 {
        self.0[party.index()]
    }

    pub fn as_array(&self) -> &[f64; NUM_PARTIES] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Party, f64)> + '_ {
        Party::ALL.iter().map(move |p| (*p, self.0[p.index()]))
    }

    /// The party with the largest share.
    ///
    /// Equal shares are resolved in favour of the party that comes first in the party order.
    pub fn leader(&self) -> Party {
        let mut best = Party::Conservative;
        for (party, share) in self.iter().skip(1) {
            if share > self.get(best) {
                best = party;
            }
        }
        best
    }
}

/// A single electoral district.
#[derive(PartialEq, Debug, Clone)]
pub struct Riding {
    pub region: Region,
    pub province: String,
    pub district_number: u32,
    pub district_name: String,
    /// The results of the base election in this riding.
    pub shares: ShareVector,
}

/// Historical results and current polling for one region.
#[derive(PartialEq, Debug, Clone)]
pub struct RegionAggregate {
    pub region: Region,
    pub historical: ShareVector,
    pub poll: ShareVector,
}

/// Where a projection pass takes the baseline and the poll for each riding.
#[derive(PartialEq, Debug, Clone)]
pub enum BaselineSource {
    /// A single baseline and a single poll, applied to every riding regardless of its region.
    National {
        baseline: ShareVector,
        poll: ShareVector,
    },
    /// The historical results and the poll of the region of each riding.
    Regional(HashMap<Region, RegionAggregate>),
}

impl BaselineSource {
    /// Collects per-region aggregates into a regional source.
    pub fn regional(aggregates: &[RegionAggregate]) -> BaselineSource {
        BaselineSource::Regional(aggregates.iter().map(|a| (a.region, a.clone())).collect())
    }

    pub fn name(&self) -> &'static str {
        match self {
            BaselineSource::National { .. } => "national",
            BaselineSource::Regional(_) => "regional",
        }
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct ProjectionResult {
    pub district_number: u32,
    pub district_name: String,
    pub shares: ShareVector,
    pub winner: Party,
}

/// The number of ridings won by each party, in party order.
///
/// All the parties are present, including the ones without any riding.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SeatTally(Vec<(Party, u32)>);

impl SeatTally {
    pub fn from_winners<I: Iterator<Item = Party>>(winners: I) -> SeatTally {
        let mut counts = [0u32; NUM_PARTIES];
        for p in winners {
            counts[p.index()] += 1;
        }
        SeatTally(Party::ALL.iter().map(|p| (*p, counts[p.index()])).collect())
    }

    pub fn seats(&self, party: Party) -> u32 {
        self.0[party.index()].1
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|(_, c)| c).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Party, u32)> {
        self.0.iter()
    }
}

/// The outcome of one projection pass.
#[derive(PartialEq, Debug, Clone)]
pub struct Projection {
    /// One result per riding, in the order of the input ridings.
    pub results: Vec<ProjectionResult>,
    pub tally: SeatTally,
}

/// Why the update formula is undefined for a party.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Degeneracy {
    /// The party is absent from the poll but present in the riding.
    ZeroPoll,
    /// The party took all the votes in the baseline.
    FullBaseline,
    /// The arithmetic over- or underflowed.
    NotFinite,
}

impl Display for Degeneracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degeneracy::ZeroPoll => write!(f, "poll share is zero while riding share is not"),
            Degeneracy::FullBaseline => write!(f, "baseline share is 100"),
            Degeneracy::NotFinite => write!(f, "projected share is not a finite number"),
        }
    }
}

/// Errors that prevent a projection from completing.
#[derive(PartialEq, Debug, Clone)]
pub enum ProjectionErrors {
    ShareOutOfRange {
        party: Party,
        value: f64,
    },
    WrongLength {
        len: usize,
    },
    InvalidCandidacy {
        district_number: u32,
        value: f64,
    },
    Degenerate {
        party: Party,
        cause: Degeneracy,
    },
    RidingFailed {
        district_number: u32,
        district_name: String,
        party: Party,
        cause: Degeneracy,
    },
    MissingRegion {
        region: Region,
    },
    EmptyElection,
}

impl Error for ProjectionErrors {}

impl Display for ProjectionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionErrors::ShareOutOfRange { party, value } => {
                write!(f, "share {} for {} is outside [0, 100]", value, party)
            }
            ProjectionErrors::WrongLength { len } => write!(
                f,
                "expected {} shares, one per party, got {}",
                NUM_PARTIES, len
            ),
            ProjectionErrors::InvalidCandidacy {
                district_number,
                value,
            } => write!(
                f,
                "candidate percentage {} in riding {} is outside [0, 100]",
                value, district_number
            ),
            ProjectionErrors::Degenerate { party, cause } => {
                write!(f, "cannot project {}: {}", party, cause)
            }
            ProjectionErrors::RidingFailed {
                district_number,
                district_name,
                party,
                cause,
            } => write!(
                f,
                "projection failed in riding {} ({}) for {} (party index {}): {}",
                district_number,
                district_name,
                party,
                party.index(),
                cause
            ),
            ProjectionErrors::MissingRegion { region } => {
                write!(f, "no baseline or poll for region {}", region)
            }
            ProjectionErrors::EmptyElection => write!(f, "no ridings in the election"),
        }
    }
}
