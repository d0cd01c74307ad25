pub mod paths;

pub use paths::{executable_dir, file_url, join_under_root, url_to_file_path, working_dir_candidates};
