pub mod debcontrol;
pub mod downloader;
