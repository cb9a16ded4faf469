//! Pure helpers for presenting archive data
//!
//! Nothing here touches the network. `file::save_download` is the only
//! function that writes to disk.

pub mod address;
pub mod file;
pub mod format;
pub mod html;
pub mod tree;

pub use address::{
    DEFAULT_MAX_RECIPIENTS, extract_email, format_recipients, get_email_display_name,
    is_valid_email,
};
pub use file::{
    FileValidation, get_file_extension, is_zip_file, save_download, validate_file_size,
    validate_upload,
};
pub use format::{
    DEFAULT_DATE_TIME_FORMAT, PLACEHOLDER, calculate_success_rate, format_date_time,
    format_duration, format_file_size, truncate_text,
};
pub use html::{highlight_keyword, sanitize_html};
pub use tree::{
    EmailTreeNode, PathTreeNode, build_email_path_tree, email_path_tree, generate_tree_node_id,
    parse_paths_to_tree,
};
