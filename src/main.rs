use anyhow::{anyhow, Result};
use clap::{Arg, Command};
use tracing::{info, warn};

use tedgrab::{slug_from_url, Config, Downloader, TalkExtractor};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("tedgrab")
        .version("0.1.0")
        .about("Download TED talk videos and subtitles")
        .arg(
            Arg::new("talk")
                .value_name("TITLE_OR_URL")
                .help("Talk title, topic tag, or https://www.ted.com/talks/... URL")
                .required(true),
        )
        .arg(
            Arg::new("quality")
                .short('q')
                .long("quality")
                .value_name("QUALITY")
                .help("Video quality (720p, 1080p)")
                .default_value("720p"),
        )
        .arg(
            Arg::new("subtitle")
                .short('s')
                .long("subtitle")
                .value_name("LANG")
                .help("Subtitle language code (e.g. en, zh-cn); omit to skip subtitles"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory")
                .default_value("."),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List matching talks instead of downloading")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("limit")
                .value_name("NUM")
                .help("Maximum number of talks to list")
                .default_value("5"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging and raw response capture")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let debug = matches.get_flag("debug");

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(if debug { "tedgrab=debug,warn" } else { "tedgrab=info,warn" })
        .init();

    let identifier = matches
        .get_one::<String>("talk")
        .ok_or_else(|| anyhow!("please provide a talk title or URL"))?;
    let quality = matches.get_one::<String>("quality").map(String::as_str).unwrap_or("720p");
    let output = matches.get_one::<String>("output").map(String::as_str).unwrap_or(".");
    let limit: usize = matches
        .get_one::<String>("limit")
        .map(String::as_str)
        .unwrap_or("5")
        .parse()?;

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    config.debug = debug;

    let mut extractor = TalkExtractor::with_config(config);

    if matches.get_flag("list") {
        let talks = extractor.resolve_query(identifier, limit).await?;
        if talks.is_empty() {
            return Err(anyhow!("no talks found for: {}", identifier));
        }
        for (i, talk) in talks.iter().enumerate() {
            let mut qualities: Vec<&str> = talk.video_urls.keys().map(String::as_str).collect();
            qualities.sort_unstable();
            println!("{}. {} by {}", i + 1, talk.title, talk.speaker);
            println!("   {}", talk.url);
            println!(
                "   qualities: [{}], subtitles: {}",
                qualities.join(", "),
                talk.subtitle_urls.len()
            );
        }
        return Ok(());
    }

    // Resolve the talk
    let talk = if identifier.starts_with("http") {
        extractor.resolve_url(identifier).await?
    } else {
        extractor.resolve_title(identifier).await?
    };
    let slug = slug_from_url(&talk.url)?;

    let video_url = talk
        .video_urls
        .get(quality)
        .ok_or_else(|| anyhow!("video quality {} not available", quality))?;

    let downloader = Downloader::new(output).await?;

    info!("⬇️  Downloading video ({})...", quality);
    let video_path = downloader.download_path(&slug, &format!("{}.mp4", quality));
    downloader.download_video(video_url, &video_path).await?;

    if let Some(lang) = matches.get_one::<String>("subtitle") {
        let subtitle_url = talk
            .subtitle_urls
            .get(lang)
            .ok_or_else(|| anyhow!("subtitle language {} not available", lang))?;

        info!("⬇️  Downloading subtitle ({})...", lang);
        let subtitle_path = downloader.download_path(&slug, &format!("{}.srt", lang));
        downloader.download_subtitle(subtitle_url, &subtitle_path).await?;
        info!("📝 Subtitle: {}", subtitle_path.display());
    }

    info!("🎉 Download completed!");
    info!("📼 Video: {}", video_path.display());

    Ok(())
}
