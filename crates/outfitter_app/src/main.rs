fn main() {
    if let Err(error) = outfitter_app::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
