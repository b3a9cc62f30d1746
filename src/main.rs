fn main() {
    raktsetu_lib::run()
}
