use crate::cli::run;

pub mod cli;
pub mod config;
pub mod domain;
pub mod game;
pub mod http;
pub mod storage;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
