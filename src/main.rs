use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use log::debug;

use interval_analyzer::equations::EquationBuilder;
use interval_analyzer::parser;
use interval_analyzer::report;
use interval_analyzer::solver::Solver;

/// Interval-union abstract interpreter for a mini imperative language.
#[derive(Parser)]
#[clap(version, about)]
struct Cli {
    /// Source file to analyze.
    file: PathBuf,

    /// Enable debug logging (equation emission and solver steps).
    #[clap(long)]
    debug: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        if cli.debug {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let source = std::fs::read_to_string(&cli.file)
        .wrap_err_with(|| format!("cannot open the input file `{}`", cli.file.display()))?;

    let ast = parser::parse(&source).map_err(|e| eyre!(e))?;
    debug!("parsed program:\n{}", ast.dump());

    let program = EquationBuilder::build(&ast);
    debug!("{} actions, {} control points", program.actions.len(), program.control_points);

    let analysis = Solver::new(program).solve();
    debug!("solver finished after {} iterations", analysis.iterations);

    print!("{}", report::render(&analysis));

    Ok(())
}
