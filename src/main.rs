use std::process::ExitCode;

use epigrid::runner::run_with_args;

fn main() -> ExitCode {
    match run_with_args() {
        Ok(summary) => {
            println!(
                "Infections: {}\nDeaths: {}\nRemoved: {}",
                summary.final_statistics.infections,
                summary.final_statistics.deaths,
                summary.final_statistics.removed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("epigrid: {e}");
            ExitCode::FAILURE
        }
    }
}
