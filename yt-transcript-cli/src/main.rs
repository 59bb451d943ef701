use clap::Parser;
use serde_json::json;

#[derive(Parser)]
#[command(
    name = "yt-transcript",
    about = "Fetch a YouTube video's transcript as JSON"
)]
struct Cli {
    /// Video identifier (the `v=` parameter of a watch URL).
    video_id: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays a single JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("yt_transcript=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    match yt_transcript::fetch_transcript(&cli.video_id).await {
        Ok(transcript) => {
            println!("{}", json!({ "segments": transcript.segments }));
        }
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}
