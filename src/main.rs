use kaleido_lib as kaleido;

fn main() {
    let options = kaleido::options::get();
    kaleido::logger::init(options.level_filter()).expect("Logger initialization failed");

    if let Err(error) = kaleido::driver::drive(options) {
        let _ = kaleido::error!("kaleido", "{}", error);
        std::process::exit(1);
    }
}
