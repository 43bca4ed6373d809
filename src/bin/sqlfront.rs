fn main() {
    sqlfront::cli::run();
}
