//! Service adapters: OS specific implementations (filesystem IO).

pub mod settings;

pub use settings::{
    ensure_log_dir, ensure_settings_file, ensure_settings_file_at, get_log_dir,
    get_settings_path, load_settings, load_settings_from,
};
