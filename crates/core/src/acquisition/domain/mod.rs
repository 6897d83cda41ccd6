pub mod video_fetcher;
