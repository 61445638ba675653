use std::process;

fn main() {
    if let Err(e) = chore::cli::run() {
        chore::ui::print_fatal(&e.to_string());
        process::exit(e.exit_code());
    }
}
