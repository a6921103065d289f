fn main() {
    if let Err(err) = pipeline_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
