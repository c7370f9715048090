fn main() -> std::process::ExitCode {
    quizgen_lib::run()
}
