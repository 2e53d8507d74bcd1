use crate::proj::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::{BTreeMap, HashMap};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "pollDate")]
    pub poll_date: Option<String>,
    #[serde(rename = "pollSource")]
    pub poll_source: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    #[serde(rename = "pollDate")]
    pub poll_date: Option<String>,
    #[serde(rename = "pollSource")]
    pub poll_source: Option<String>,
    pub ridings: usize,
}

/// The baselines and the polls of a projection.
///
/// All the share arrays are in party order: Conservative, Liberal, NDP, Green, Bloc.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "nationalBaseline")]
    pub national_baseline: Vec<f64>,
    #[serde(rename = "nationalPoll")]
    pub national_poll: Vec<f64>,
    /// Polls by region name. The regions that are not listed are not swung.
    #[serde(rename = "regionalPolls", default)]
    pub regional_polls: BTreeMap<String, Vec<f64>>,
}

impl ProjectionConfig {
    /// The 2019 federal election, projected from the 2015 results.
    ///
    /// The regional polls are the CBC poll tracker averages of October 21, 2019. Polling in the
    /// territories is scant, the national averages are used there.
    pub fn elxn43() -> ProjectionConfig {
        let regional_polls: BTreeMap<String, Vec<f64>> = [
            ("Alberta", vec![60.7, 15.4, 15.1, 4.2, 0.0]),
            ("Atlantic", vec![26.8, 37.1, 20.0, 12.1, 0.0]),
            ("BC", vec![30.6, 26.5, 26.0, 13.0, 0.0]),
            ("Ontario", vec![31.8, 38.8, 18.8, 7.2, 0.0]),
            ("Prairies", vec![45.5, 22.3, 22.7, 5.6, 0.0]),
            ("Quebec", vec![14.2, 33.2, 13.5, 6.0, 30.2]),
            ("Territories", vec![31.6, 32.0, 18.4, 7.5, 0.0]),
        ]
        .iter()
        .map(|(name, shares)| (name.to_string(), shares.clone()))
        .collect();
        ProjectionConfig {
            output_settings: OutputSettings {
                contest_name: "43rd Canadian general election".to_string(),
                poll_date: Some("2019-10-21".to_string()),
                poll_source: Some(
                    "https://newsinteractives.cbc.ca/elections/poll-tracker/canada/".to_string(),
                ),
            },
            national_baseline: vec![31.9, 39.5, 19.7, 3.5, 4.7],
            national_poll: vec![31.6, 32.0, 18.4, 7.5, 7.0],
            regional_polls,
        }
    }

    pub fn national_source(&self) -> PrResult<BaselineSource> {
        let baseline =
            ShareVector::from_slice(&self.national_baseline).context(InvalidSharesSnafu {
                what: "nationalBaseline",
            })?;
        let poll = ShareVector::from_slice(&self.national_poll).context(InvalidSharesSnafu {
            what: "nationalPoll",
        })?;
        Ok(BaselineSource::National { baseline, poll })
    }

    pub fn regional_polls(&self) -> PrResult<HashMap<Region, ShareVector>> {
        let mut res: HashMap<Region, ShareVector> = HashMap::new();
        for (name, shares) in self.regional_polls.iter() {
            let region = Region::from_name(name).context(UnknownRegionSnafu { name })?;
            let poll = ShareVector::from_slice(shares).context(InvalidSharesSnafu {
                what: format!("regionalPolls.{}", name),
            })?;
            res.insert(region, poll);
        }
        Ok(res)
    }
}

pub fn read_config(path: &str) -> PrResult<ProjectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ProjectionConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    // Fail early on bad shares or regions.
    config.national_source()?;
    config.regional_polls()?;
    Ok(config)
}

pub fn read_summary(path: &str) -> PrResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
