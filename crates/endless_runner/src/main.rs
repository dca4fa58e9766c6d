fn main() {
    endless_runner::run();
}
