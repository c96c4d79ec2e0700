fn main() {
    kreg_cmd::cmd::run();
}
