pub mod config_reader;
mod io_common;
pub mod io_elections_ca;

use log::{debug, info, warn};

use permanence_ratios::builder::Tables;
use permanence_ratios::*;
use snafu::prelude::*;

use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::proj::config_reader::*;

#[derive(Debug, Snafu)]
pub enum PrError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing line {lineno} of the results: {source}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown region {name:?}"))]
    UnknownRegion { name: String },
    #[snafu(display("Invalid shares in {what}: {source}"))]
    InvalidShares {
        source: ProjectionErrors,
        what: String,
    },
    #[snafu(display("Projection failed in the {pass} pass: {source}"))]
    Projection {
        source: ProjectionErrors,
        pass: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PrResult<T> = Result<T, PrError>;

/// The projection passes that can be run over the ridings.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PassKind {
    National,
    Regional,
}

impl PassKind {
    pub fn name(&self) -> &'static str {
        match self {
            PassKind::National => "national",
            PassKind::Regional => "regional",
        }
    }
}

fn parse_passes(pass: &Option<String>) -> PrResult<Vec<PassKind>> {
    match pass.as_deref() {
        None | Some("both") => Ok(vec![PassKind::National, PassKind::Regional]),
        Some("national") => Ok(vec![PassKind::National]),
        Some("regional") => Ok(vec![PassKind::Regional]),
        Some(x) => whatever!(
            "Unknown pass {:?}: expected national, regional or both",
            x
        ),
    }
}

/// Runs the requested passes over all the ridings.
pub fn project(
    tables: &Tables,
    config: &ProjectionConfig,
    passes: &[PassKind],
) -> PrResult<Vec<(PassKind, Projection)>> {
    let mut res: Vec<(PassKind, Projection)> = Vec::new();
    for pass in passes.iter() {
        let source = match pass {
            PassKind::National => config.national_source()?,
            PassKind::Regional => {
                let polls = config.regional_polls()?;
                BaselineSource::regional(&tables.region_aggregates(&polls))
            }
        };
        debug!("project: {} source: {:?}", pass.name(), source);
        let projection = run_projection(&tables.ridings, &source).context(ProjectionSnafu {
            pass: pass.name(),
        })?;
        res.push((*pass, projection));
    }
    Ok(res)
}

fn shares_to_json(shares: &ShareVector) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (party, share) in shares.iter() {
        m.insert(party.name().to_string(), json!(share));
    }
    JSValue::Object(m)
}

fn projection_to_json(
    pass: PassKind,
    projection: &Projection,
    ridings: &[Riding],
    with_ridings: bool,
) -> JSValue {
    let mut seats: JSMap<String, JSValue> = JSMap::new();
    for (party, count) in projection.tally.iter() {
        seats.insert(party.name().to_string(), json!(count));
    }
    let mut js = json!({"pass": pass.name(), "seats": seats});
    if with_ridings {
        let l: Vec<JSValue> = ridings
            .iter()
            .zip(projection.results.iter())
            .map(|(riding, res)| {
                json!({
                    "region": riding.region.name(),
                    "province": riding.province,
                    "districtNumber": res.district_number,
                    "districtName": res.district_name,
                    "shares": shares_to_json(&res.shares),
                    "winner": res.winner.name(),
                })
            })
            .collect();
        js["ridings"] = JSValue::Array(l);
    }
    js
}

pub fn build_summary_js(
    config: &ProjectionConfig,
    tables: &Tables,
    projections: &[(PassKind, Projection)],
    with_ridings: bool,
) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        poll_date: config.output_settings.poll_date.clone(),
        poll_source: config.output_settings.poll_source.clone(),
        ridings: tables.ridings.len(),
    };
    let results: Vec<JSValue> = projections
        .iter()
        .map(|(pass, p)| projection_to_json(*pass, p, &tables.ridings, with_ridings))
        .collect();
    json!({
        "config": c,
        "results": results })
}

/// The seat counts of a pass, by decreasing number of seats.
pub fn format_tally(pass: PassKind, tally: &SeatTally) -> String {
    let mut counts: Vec<&(Party, u32)> = tally.iter().collect();
    // Stable: equal counts stay in party order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let mut s = format!("{} pass:\n", pass.name());
    for (party, count) in counts {
        s.push_str(&format!("{:<14}{:>4}\n", party.name(), count));
    }
    s
}

/// Compares a computed summary to a reference summary stored in a file.
pub fn check_reference(pretty_js_stats: &str, reference_path: &str) -> PrResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("check_reference: summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("check_reference: summary matches {}", reference_path);
    Ok(())
}

pub fn run_election(args: &Args) -> PrResult<()> {
    let config = match args.config.as_deref() {
        Some(path) => read_config(path)?,
        None => ProjectionConfig::elxn43(),
    };
    info!("config: {:?}", config);
    let passes = parse_passes(&args.pass)?;

    let builder = io_elections_ca::read_results_path(&args.input)?;
    let tables = builder.build().context(InvalidSharesSnafu {
        what: args.input.clone(),
    })?;
    info!(
        "{} ridings in {} regions",
        tables.ridings.len(),
        tables.historical.len()
    );

    let projections = project(&tables, &config, &passes)?;
    for (pass, p) in projections.iter() {
        println!("{}", format_tally(*pass, &p.tally));
        if args.ridings {
            for (riding, res) in tables.ridings.iter().zip(p.results.iter()) {
                info!(
                    "{} {:>6} {:<40} {:?} -> {}",
                    pass.name(),
                    res.district_number,
                    res.district_name,
                    res.shares.as_array(),
                    res.winner
                );
                debug!("{} historical: {:?}", riding.province, riding.shares.as_array());
            }
        }
    }

    let result_js = build_summary_js(&config, &tables, &projections, args.ridings);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) if !path.is_empty() => {
            fs::write(path, &pretty_js_stats).context(WritingSummarySnafu { path })?;
            info!("Summary written to {}", path);
        }
        _ => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = args.reference.as_deref() {
        check_reference(&pretty_js_stats, reference_path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const DATA: &str = "Province,Electoral District Name/Nom de circonscription,\
Electoral District Number/Numéro de circonscription,Candidate/Candidat,\
Votes Obtained/Votes obtenus,Percentage of Votes Obtained /Pourcentage des votes obtenus
Ontario,Ottawa Centre,35001,Jane Doe Conservative/Conservateur,3000,30.0
Ontario,Ottawa Centre,35001,John Roe Liberal/Libéral,4500,45.0
Ontario,Ottawa Centre,35001,Ann Poe NDP-New Democratic Party/NPD-Nouveau Parti démocratique,2000,20.0
Ontario,Ottawa Centre,35001,Bob Moe Green Party/Parti Vert,500,5.0
Alberta,Calgary Centre,48001,Jim Fox Conservative/Conservateur,6000,60.0
Alberta,Calgary Centre,48001,Kim Hay Liberal/Libéral,3000,30.0
Alberta,Calgary Centre,48001,Lou Kay NDP-New Democratic Party/NPD-Nouveau Parti démocratique,800,8.0
Alberta,Calgary Centre,48001,Mo Ray Green Party/Parti Vert,200,2.0
Quebec/Québec,Abitibi,24001,Ned Coy Conservative/Conservateur,1000,10.0
Quebec/Québec,Abitibi,24001,Ola Dee Liberal/Libéral,3000,30.0
Quebec/Québec,Abitibi,24001,Pat Ely NDP-New Democratic Party/NPD-Nouveau Parti démocratique,2500,25.0
Quebec/Québec,Abitibi,24001,Quinn Fay Green Party/Parti Vert,500,5.0
Quebec/Québec,Abitibi,24001,Luc Tremblay Bloc Québécois/Bloc Québécois,2800,28.0
Quebec/Québec,Abitibi,24001,Zed Roy Libertarian/Libertarien,200,2.0
Yukon,Yukon,60001,Rae Gil Conservative/Conservateur,2400,24.0
Yukon,Yukon,60001,Sam Hux Liberal/Libéral,5400,54.0
Yukon,Yukon,60001,Tom Ivy NDP-New Democratic Party/NPD-Nouveau Parti démocratique,1900,19.0
Yukon,Yukon,60001,Uma Jay Green Party/Parti Vert,300,3.0
";

    fn tables() -> Tables {
        io_elections_ca::read_results(DATA.as_bytes())
            .unwrap()
            .build()
            .unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("ridingproj-{}-{}", std::process::id(), name));
        p
    }

    #[test]
    fn national_and_regional_passes() {
        let tables = tables();
        assert_eq!(tables.ridings.len(), 4);
        let config = ProjectionConfig::elxn43();
        let projections =
            project(&tables, &config, &[PassKind::National, PassKind::Regional]).unwrap();
        assert_eq!(projections.len(), 2);

        let (pass, national) = &projections[0];
        assert_eq!(*pass, PassKind::National);
        assert_eq!(national.tally.total(), 4);
        assert_eq!(national.tally.seats(Party::Liberal), 2);
        assert_eq!(national.tally.seats(Party::Conservative), 1);
        assert_eq!(national.tally.seats(Party::Bloc), 1);

        // Every riding is alone in its region: the projection gives back the regional poll.
        let (pass, regional) = &projections[1];
        assert_eq!(*pass, PassKind::Regional);
        assert_eq!(regional.tally.seats(Party::Liberal), 3);
        assert_eq!(regional.tally.seats(Party::Conservative), 1);
        let quebec = regional
            .results
            .iter()
            .find(|r| r.district_number == 24001)
            .unwrap();
        assert!((quebec.shares.get(Party::Bloc) - 30.2).abs() < 1e-9);
    }

    #[test]
    fn missing_quebec_poll_has_no_swing() {
        let tables = tables();
        let mut config = ProjectionConfig::elxn43();
        config.regional_polls.remove("Quebec");
        let projections = project(&tables, &config, &[PassKind::Regional]).unwrap();
        let quebec = projections[0]
            .1
            .results
            .iter()
            .find(|r| r.district_number == 24001)
            .unwrap();
        assert_eq!(quebec.winner, Party::Liberal);
        assert!((quebec.shares.get(Party::Bloc) - 28.0).abs() < 1e-9);
    }

    #[test]
    fn zero_poll_aborts_the_pass() {
        let tables = tables();
        let mut config = ProjectionConfig::elxn43();
        config.national_poll = vec![31.6, 32.0, 18.4, 7.5, 0.0];
        match project(&tables, &config, &[PassKind::National]) {
            Err(PrError::Projection { source, pass }) => {
                assert_eq!(pass, "national");
                assert!(matches!(
                    source,
                    ProjectionErrors::RidingFailed {
                        district_number: 24001,
                        party: Party::Bloc,
                        ..
                    }
                ));
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn summary_and_reference() {
        let tables = tables();
        let config = ProjectionConfig::elxn43();
        let projections = project(&tables, &config, &[PassKind::National]).unwrap();
        let js = build_summary_js(&config, &tables, &projections, true);
        assert_eq!(js["config"]["ridings"], json!(4));
        assert_eq!(js["results"][0]["pass"], json!("national"));
        assert_eq!(js["results"][0]["seats"]["Bloc"], json!(1));
        assert_eq!(js["results"][0]["seats"]["Green"], json!(0));
        assert_eq!(js["results"][0]["ridings"][0]["districtNumber"], json!(48001));
        assert_eq!(js["results"][0]["ridings"][0]["winner"], json!("Conservative"));

        let pretty = serde_json::to_string_pretty(&js).unwrap();
        let path = temp_path("summary.json");
        fs::write(&path, &pretty).unwrap();
        let path_s = path.to_str().unwrap();
        assert!(check_reference(&pretty, path_s).is_ok());

        let other = build_summary_js(&config, &tables, &projections, false);
        let other_pretty = serde_json::to_string_pretty(&other).unwrap();
        assert!(matches!(
            check_reference(&other_pretty, path_s),
            Err(PrError::ReferenceMismatch {})
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn tally_is_printed_by_decreasing_seats() {
        let tally = SeatTally::from_winners(
            vec![Party::NDP, Party::Liberal, Party::NDP, Party::Conservative].into_iter(),
        );
        let s = format_tally(PassKind::Regional, &tally);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "regional pass:");
        assert!(lines[1].starts_with("NDP"));
        assert!(lines[1].ends_with("   2"));
        assert!(lines[2].starts_with("Conservative"));
        assert!(lines[3].starts_with("Liberal"));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn run_from_files() {
        let input = temp_path("results.csv");
        fs::write(&input, DATA).unwrap();
        let out = temp_path("out.json");
        let args = Args {
            input: input.to_str().unwrap().to_string(),
            config: None,
            out: Some(out.to_str().unwrap().to_string()),
            reference: None,
            pass: Some("regional".to_string()),
            ridings: false,
            verbose: false,
        };
        run_election(&args).unwrap();
        let js = read_summary(out.to_str().unwrap()).unwrap();
        assert_eq!(js["results"].as_array().unwrap().len(), 1);
        assert_eq!(js["results"][0]["seats"]["Liberal"], json!(3));

        let args = Args {
            pass: Some("provincial".to_string()),
            ..args
        };
        assert!(run_election(&args).is_err());
        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&out);
    }
}
