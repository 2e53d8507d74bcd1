use clap::Parser;

/// Projects the seats of an election riding by riding, from the previous results and the latest polls.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path or '-') The official results by candidate of the base election, in CSV format
    /// (table_tableau12.csv from Elections Canada). Use '-' to read from the standard input.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path, optional) A JSON file with the baselines and the polls to use.
    /// If not provided, the 2019 polls are projected from the 2015 results.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the projection will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a projection summary in JSON format. If provided,
    /// ridingproj will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (national, regional or both; default both) Which projection passes to run.
    #[clap(long, value_parser)]
    pub pass: Option<String>,

    /// If passed as an argument, the projected shares of every riding are included in the summary.
    #[clap(long, takes_value = false)]
    pub ridings: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
