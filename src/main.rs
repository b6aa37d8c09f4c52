fn main() {
    if let Err(err) = csv_audit::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
