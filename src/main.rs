fn main() {
    if let Err(e) = passkeep::app::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
