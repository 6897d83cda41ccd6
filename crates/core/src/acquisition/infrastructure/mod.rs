pub mod ytdlp_fetcher;
