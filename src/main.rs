fn main() {
    if let Err(e) = aerobulk_rs::adapters::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
