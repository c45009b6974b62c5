use std::process::ExitCode;

use clap::Parser;
use xray_backend::cli::{self, Args};

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args = Args::parse();
    cli::execute(&args)
}
