mod config_files;
mod snapshots;
mod units;
