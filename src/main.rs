use std::env;

fn main() {
    #[cfg(feature = "tracing_debug")]
    {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    // Non UTF-8 input is replaced lossily, and so will fail to match or convert like any other bad token.
    let tokens: Vec<String> = env::args_os()
        .skip(1)
        .map(|token| token.to_string_lossy().into_owned())
        .collect();
    let exit_code = parse_arg::run(
        tokens
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .as_slice(),
    );
    std::process::exit(exit_code);
}
