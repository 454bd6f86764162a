//! Test command: replay recorded fixtures and compare responses.

use std::path::PathBuf;

use clap::Args;

use apivet_core::logging::{self, Profile};
use apivet_core::version::VersionConstraint;
use apivet_engine::{run, FixtureOutcome, HostConf, RunConfig, RunReport};

use crate::conf::load_path_conf;

#[derive(Debug, Args)]
pub struct TestArgs {
    /// Directory containing the recorded test versions
    #[arg(long, default_value = "apivet-tests")]
    pub dir: PathBuf,

    /// Semver range selecting the versions to run
    #[arg(long, default_value = "*")]
    pub constraint: String,

    /// Host (host[:port]) receiving the replayed requests
    #[arg(long, default_value = "localhost")]
    pub target_host: String,

    /// Use https for requests to the target host
    #[arg(long)]
    pub target_https: bool,

    /// Command the stored request is piped through before hitting the target
    #[arg(long)]
    pub target_preprocess: Option<String>,

    /// Host for the base to compare with (leave empty to replay recorded responses)
    #[arg(long, default_value = "")]
    pub base_host: String,

    /// Use https for requests to the base host
    #[arg(long)]
    pub base_https: bool,

    /// Command the stored request is piped through before hitting the base
    #[arg(long)]
    pub base_preprocess: Option<String>,

    /// Record target responses under this version directory
    #[arg(long)]
    pub save: Option<String>,

    /// Configuration file holding override rules
    #[arg(long, default_value = "apivet.conf.json")]
    pub conf: PathBuf,

    /// Only run the given request filenames (repeatable)
    #[arg(long = "file")]
    pub files: Vec<String>,

    /// Reduce standard output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print progress and skip reasons
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Run the command and return the process exit code.
pub async fn execute(args: TestArgs) -> i32 {
    logging::init(if args.verbose {
        Profile::Development
    } else {
        Profile::Production
    });

    let config = match build_config(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return 2;
        }
    };

    // Exit 2 is for argument/configuration-file problems caught above;
    // anything the run itself reports (an unreadable root, no matching
    // versions) is a runtime failure.
    match run(&config).await {
        Ok(report) => print_report(&report, config.quiet),
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}

fn build_config(args: TestArgs) -> apivet_core::errors::Result<RunConfig> {
    let constraint = VersionConstraint::parse(&args.constraint)?;
    let rules = load_path_conf(&args.conf)?;

    Ok(RunConfig {
        dir: args.dir,
        constraint,
        target: HostConf {
            host: args.target_host,
            use_https: args.target_https,
            pre_process: args.target_preprocess,
        },
        base: HostConf {
            host: args.base_host,
            use_https: args.base_https,
            pre_process: args.base_preprocess,
        },
        save: args.save,
        test_files: args.files,
        quiet: args.quiet,
        verbose: args.verbose,
        rules,
    })
}

fn print_report(report: &RunReport, quiet: bool) -> i32 {
    for version in &report.versions {
        for fixture in &version.fixtures {
            match &fixture.outcome {
                FixtureOutcome::Passed => {}
                FixtureOutcome::Failed { lines } => {
                    println!("\n{}:", fixture.name);
                    for line in lines {
                        println!("{line}");
                    }
                }
                FixtureOutcome::Errored { error } => {
                    eprintln!("Error: {}: {error}", fixture.name);
                }
            }
            print_pass(fixture.passed(), quiet, &fixture.name);
        }
        print_pass(version.passed(), quiet, &version.version);
    }
    i32::from(!report.passed())
}

fn print_pass(pass: bool, quiet: bool, name: &str) {
    if pass && !quiet {
        println!("OK   {name}");
    }
    if !pass {
        println!("FAIL {name}");
    }
}
