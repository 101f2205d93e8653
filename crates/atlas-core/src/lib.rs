//! Foundational low-level utilities shared across Atlas crates.
//!
//! Provides the atomic file-write helper used by user-snapshot persistence
//! and the time utilities used for snapshot temp-file naming.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use time_utils::{current_unix_timestamp, current_unix_timestamp_ms};

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use super::*;

    #[test]
    fn time_utils_second_and_millisecond_clocks_agree() {
        let now_s = current_unix_timestamp();
        let now_ms = current_unix_timestamp_ms();
        let now_ms_s = now_ms / 1_000;
        assert!(now_ms_s >= now_s);
        assert!(now_ms_s <= now_s.saturating_add(1));
    }

    #[test]
    fn write_text_atomic_writes_content() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("users.json");
        write_text_atomic(&path, "{\"Users\":[]}").expect("write");
        let contents = read_to_string(&path).expect("read");
        assert_eq!(contents, "{\"Users\":[]}");
    }

    #[test]
    fn write_text_atomic_replaces_existing_file() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("users.json");
        write_text_atomic(&path, "first").expect("write");
        write_text_atomic(&path, "second").expect("rewrite");
        assert_eq!(read_to_string(&path).expect("read"), "second");
    }

    #[test]
    fn write_text_atomic_rejects_directory_target() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        assert!(write_text_atomic(tempdir.path(), "oops").is_err());
    }
}
