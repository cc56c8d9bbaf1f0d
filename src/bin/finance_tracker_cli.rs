use finance_tracker::cli::run_cli;

fn main() {
    finance_tracker::init();
    if let Err(err) = run_cli() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
