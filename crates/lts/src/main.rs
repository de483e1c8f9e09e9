//! `lts` binary.

fn main() {
    let args: Vec<String> = std::env::args().collect();
    std::process::exit(lts_cli::run_cli(args));
}
