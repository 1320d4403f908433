use rovisig::{Credentials, LookupParameters, ResponseFormat, RoviClient};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let track = std::env::args().nth(1).unwrap_or_else(|| "Imagine".to_string());

    let profile = Credentials::from_env().expect("can't read rovi credentials");
    let client = RoviClient::new(&profile);
    let url = client
        .song_info_url(
            &LookupParameters::default()
                .track(track)
                .includes(["appearances", "moods"]),
            &ResponseFormat::default(),
        )
        .expect("can't compose song info url");

    println!("{}", url);
}
