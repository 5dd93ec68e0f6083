fn main() {
    if let Err(e) = algo_tx_review::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
