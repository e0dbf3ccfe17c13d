fn main() {
    zakkro::cli::run();
}
