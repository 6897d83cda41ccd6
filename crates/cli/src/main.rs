use std::path::PathBuf;
use std::process;
use std::process::Command;

use clap::Parser;
use serde::Serialize;

use clipseek_core::acquisition::infrastructure::ytdlp_fetcher::YtDlpFetcher;
use clipseek_core::audio::infrastructure::ffmpeg_extractor::FfmpegExtractor;
use clipseek_core::pipeline::analyze_video_use_case::{AnalyzeVideoUseCase, PipelineError};
use clipseek_core::pipeline::transcriber_provider::{
    PerRequestProvider, PreloadedProvider, TranscriberProvider,
};
use clipseek_core::pipeline::video_transcriber::{TranscribeVideoError, VideoTranscriber};
use clipseek_core::transcript::domain::keyword_matcher::KeywordMatch;
use clipseek_core::transcript::infrastructure::whisper_recognizer::{
    ModelTier, WhisperRecognizer,
};

/// Locate keywords in a video's speech, with timestamps.
#[derive(Parser)]
#[command(name = "clipseek")]
struct Cli {
    /// Video URL (youtube.com / youtu.be).
    url: Option<String>,

    /// Comma-separated keywords to search for.
    #[arg(short, long, value_delimiter = ',')]
    keywords: Vec<String>,

    /// Whisper model tier: tiny or base.
    #[arg(long, default_value = "tiny")]
    model_tier: String,

    /// Directory for scratch files (downloaded video, extracted audio).
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Load the model once up front instead of per request.
    #[arg(long)]
    preload: bool,

    /// Emit JSON instead of human-readable output.
    #[arg(long)]
    json: bool,

    /// Verify the downloader is available and exit.
    #[arg(long)]
    check: bool,
}

#[derive(Serialize)]
struct AnalysisResponse {
    message: String,
    matches: Vec<KeywordMatch>,
    keywords_searched: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

const EXIT_PIPELINE: i32 = 1;
const EXIT_INPUT: i32 = 2;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.check {
        match run_check() {
            Ok(version) => {
                println!("healthy: yt-dlp {version}");
                return;
            }
            Err(e) => fail(&cli, &format!("downloader unavailable: {e}"), EXIT_PIPELINE),
        }
    }

    let (url, keywords, tier) = match validate(&cli) {
        Ok(v) => v,
        Err(e) => fail(&cli, &e, EXIT_INPUT),
    };

    match run(&cli, &url, &keywords, tier) {
        Ok(matches) => render(&cli, matches, keywords),
        Err(e) => fail(&cli, &format!("{e} (stage: {})", e.stage()), EXIT_PIPELINE),
    }
}

fn run(
    cli: &Cli,
    url: &str,
    keywords: &[String],
    tier: ModelTier,
) -> Result<Vec<KeywordMatch>, PipelineError> {
    let scratch_dir = cli
        .scratch_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(format!("clipseek-{}", process::id())));
    if let Err(e) = std::fs::create_dir_all(&scratch_dir) {
        log::warn!(
            "could not create scratch dir {}: {e}",
            scratch_dir.display()
        );
    }

    let provider = build_provider(tier, scratch_dir.clone(), cli.preload)?;
    let mut use_case =
        AnalyzeVideoUseCase::new(Box::new(YtDlpFetcher::new()), provider, scratch_dir);
    use_case.run(url, keywords)
}

fn build_provider(
    tier: ModelTier,
    scratch_dir: PathBuf,
    preload: bool,
) -> Result<Box<dyn TranscriberProvider>, PipelineError> {
    let build = move || -> Result<VideoTranscriber, TranscribeVideoError> {
        let recognizer = WhisperRecognizer::for_tier(tier, Some(Box::new(download_progress)))
            .map_err(|e| TranscribeVideoError::Construction {
                reason: e.to_string(),
            })?;
        Ok(VideoTranscriber::new(
            Box::new(FfmpegExtractor),
            Box::new(recognizer),
            scratch_dir.clone(),
        ))
    };

    if preload {
        let mut build = build;
        Ok(Box::new(PreloadedProvider::new(build()?)))
    } else {
        Ok(Box::new(PerRequestProvider::new(build)))
    }
}

fn run_check() -> Result<String, std::io::Error> {
    let output = Command::new("yt-dlp").arg("--version").output()?;
    if !output.status.success() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "yt-dlp exited with a failure status",
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn validate(cli: &Cli) -> Result<(String, Vec<String>, ModelTier), String> {
    let url = cli
        .url
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if url.is_empty() {
        return Err("missing video URL".to_string());
    }
    if !url.contains("youtube.com") && !url.contains("youtu.be") {
        return Err("invalid video URL: must be a youtube.com or youtu.be link".to_string());
    }

    let keywords: Vec<String> = cli
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    let tier = match cli.model_tier.as_str() {
        "tiny" => ModelTier::Tiny,
        "base" => ModelTier::Base,
        other => return Err(format!("model tier must be 'tiny' or 'base', got '{other}'")),
    };

    Ok((url, keywords, tier))
}

fn render(cli: &Cli, matches: Vec<KeywordMatch>, keywords_searched: Vec<String>) {
    let message = format!("Analysis complete. Found {} matches.", matches.len());

    if cli.json {
        let response = AnalysisResponse {
            message,
            matches,
            keywords_searched,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_default()
        );
        return;
    }

    println!("{message}");
    for m in &matches {
        println!("  {} at {}", m.keyword, m.timestamp);
        println!("    {}", m.text);
    }
    if matches.is_empty() && !keywords_searched.is_empty() {
        println!("  no matches for: {}", keywords_searched.join(", "));
    }
}

fn fail(cli: &Cli, message: &str, code: i32) -> ! {
    if cli.json {
        let response = ErrorResponse {
            error: message.to_string(),
        };
        println!(
            "{}",
            serde_json::to_string(&response).unwrap_or_default()
        );
    } else {
        eprintln!("Error: {message}");
    }
    process::exit(code);
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech model... {pct}%");
    } else {
        eprint!("\rDownloading speech model... {downloaded} bytes");
    }
}
