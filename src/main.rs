fn main() {
    resident_reports::run()
}
