//! Raw-batch snapshot artifact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use edupulse_reddit::RawPost;

/// Write a timestamped JSON Lines snapshot of the raw collected batch.
///
/// The file is advisory only — the pipeline never reads it back. Returns the
/// path of the written file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub(crate) fn write_snapshot(dir: &Path, posts: &[RawPost]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let filename = format!("raw_posts_{}.jsonl", Utc::now().format("%Y%m%dT%H%M%SZ"));
    let path = dir.join(filename);

    let mut out = String::new();
    for post in posts {
        out.push_str(&serde_json::to_string(post)?);
        out.push('\n');
    }
    fs::write(&path, out)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("edupulse-backup-{tag}-{}", std::process::id()))
    }

    fn raw(id: &str) -> RawPost {
        RawPost {
            id: id.to_string(),
            text: format!("text for {id}"),
            created_utc: 1_686_787_200,
            url: format!("https://reddit.com/{id}"),
            collection: "Philippines".to_string(),
        }
    }

    #[test]
    fn writes_one_json_line_per_post() {
        let dir = scratch_dir("lines");
        let posts = vec![raw("p1"), raw("p2")];

        let path = write_snapshot(&dir, &posts).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for (line, expected_id) in lines.iter().zip(["p1", "p2"]) {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["id"], expected_id);
            assert_eq!(value["collection"], "Philippines");
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn filename_carries_run_timestamp() {
        let dir = scratch_dir("name");
        let path = write_snapshot(&dir, &[raw("p1")]).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("raw_posts_"), "unexpected name: {name}");
        assert!(name.ends_with("Z.jsonl"), "unexpected name: {name}");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn creates_missing_directories() {
        let dir = scratch_dir("nested").join("deeper");
        let path = write_snapshot(&dir, &[raw("p1")]).unwrap();
        assert!(path.exists());

        fs::remove_dir_all(dir.parent().unwrap()).ok();
    }
}
