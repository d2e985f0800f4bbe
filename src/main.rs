fn main() {
    if let Err(err) = thinkmap::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
