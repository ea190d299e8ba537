use std::process::ExitCode;

use data_seeder::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let cli = data_seeder::cli::parse();
    match app::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
