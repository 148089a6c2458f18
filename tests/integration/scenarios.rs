use std::fs;
use std::time::{Duration, SystemTime};

use treesync::PassOutcome;

use crate::integration::support::{tree, write, Fixture};

#[tokio::test]
async fn new_file_is_copied_into_empty_replica() {
    let fx = Fixture::new();
    write(&fx.source, "a.txt", b"hello");
    fs::create_dir(&fx.replica).unwrap();

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert_eq!(fs::read(fx.replica.join("a.txt")).unwrap(), b"hello");
    assert_eq!(fx.count_logged("Copied file: "), 1);
    assert_eq!(fx.count_logged("Created directory: "), 0);
}

#[tokio::test]
async fn empty_source_empties_replica() {
    let fx = Fixture::new();
    write(&fx.replica, "b.txt", b"stale");
    write(&fx.replica, "old/inner.txt", b"stale too");

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert!(tree(&fx.replica).is_empty());
    assert_eq!(report.summary.files_deleted, 1);
    assert_eq!(report.summary.dirs_deleted, 1);
    assert_eq!(fx.count_logged("Deleted file: "), 1);
    assert_eq!(fx.count_logged("Deleted directory: "), 1);
}

#[tokio::test]
async fn changed_file_is_overwritten() {
    let fx = Fixture::new();
    write(&fx.source, "c.txt", b"new contents");
    write(&fx.replica, "c.txt", b"old");

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert_eq!(fs::read(fx.replica.join("c.txt")).unwrap(), b"new contents");
    assert_eq!(fx.count_logged("Copied file: "), 1);
}

#[tokio::test]
async fn same_length_different_content_is_detected() {
    let fx = Fixture::new();
    write(&fx.source, "c.txt", b"abcd");
    write(&fx.replica, "c.txt", b"abce");

    let report = fx.pass().await;

    assert_eq!(report.summary.files_copied, 1);
    assert_eq!(fs::read(fx.replica.join("c.txt")).unwrap(), b"abcd");
}

#[tokio::test]
async fn missing_replica_root_is_created() {
    let fx = Fixture::new();
    write(&fx.source, "deep/er/file.bin", &[0u8, 1, 2, 3]);

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert_eq!(tree(&fx.source), tree(&fx.replica));
    assert_eq!(fx.count_logged("Created directory: "), 3);
}

#[tokio::test]
async fn second_pass_is_a_no_op() {
    let fx = Fixture::new();
    write(&fx.source, "a.txt", b"alpha");
    write(&fx.source, "nested/b.txt", b"beta");
    write(&fx.source, "nested/empty/.keep", b"");

    fx.pass().await;
    let before = fx.log_messages().len();

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert_eq!(report.summary.mutations(), 0);
    assert_eq!(report.summary.files_unchanged, 3);
    assert_eq!(fx.log_messages().len(), before);
}

#[tokio::test]
async fn identical_files_are_not_rewritten() {
    let fx = Fixture::new();
    write(&fx.source, "same.txt", b"identical");
    write(&fx.replica, "same.txt", b"identical");

    let old = SystemTime::now() - Duration::from_secs(3 * 24 * 3600);
    let file = fs::OpenOptions::new()
        .write(true)
        .open(fx.replica.join("same.txt"))
        .unwrap();
    file.set_modified(old).unwrap();
    drop(file);

    let report = fx.pass().await;

    assert_eq!(report.summary.files_copied, 0);
    assert_eq!(report.summary.files_unchanged, 1);
    let modified = fs::metadata(fx.replica.join("same.txt"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(modified, old);
}

#[tokio::test]
async fn type_conflicts_follow_the_source() {
    let fx = Fixture::new();
    write(&fx.source, "was_dir", b"now a file");
    write(&fx.source, "was_file/child.txt", b"child");
    write(&fx.replica, "was_dir/junk.txt", b"junk");
    write(&fx.replica, "was_file", b"plain file");

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert_eq!(tree(&fx.source), tree(&fx.replica));
}

#[cfg(unix)]
#[tokio::test]
async fn replica_symlinks_are_removed_and_source_symlinks_ignored() {
    use std::os::unix::fs::symlink;

    let fx = Fixture::new();
    write(&fx.source, "real.txt", b"real");
    symlink(fx.source.join("real.txt"), fx.source.join("link.txt")).unwrap();
    fs::create_dir(&fx.replica).unwrap();
    symlink("/nonexistent", fx.replica.join("dangling")).unwrap();

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert!(fs::symlink_metadata(fx.replica.join("dangling")).is_err());
    assert!(fs::symlink_metadata(fx.replica.join("link.txt")).is_err());
    assert_eq!(fs::read(fx.replica.join("real.txt")).unwrap(), b"real");
}

#[cfg(unix)]
#[tokio::test]
async fn non_utf8_names_are_copied_and_deleted() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = Fixture::new();
    let kept = OsStr::from_bytes(b"a\xff.bin");
    let sibling = OsStr::from_bytes(b"a\xfe.bin");
    let stale = OsStr::from_bytes(b"stale\xfe");
    fs::write(fx.source.join(kept), b"kept").unwrap();
    fs::write(fx.source.join(sibling), b"sibling").unwrap();
    fs::create_dir(&fx.replica).unwrap();
    fs::write(fx.replica.join(stale), b"old").unwrap();

    let report = fx.pass().await;

    assert_eq!(report.outcome(), PassOutcome::Success);
    assert_eq!(report.summary.files_copied, 2);
    assert_eq!(report.summary.files_deleted, 1);
    assert_eq!(fs::read(fx.replica.join(kept)).unwrap(), b"kept");
    assert_eq!(fs::read(fx.replica.join(sibling)).unwrap(), b"sibling");
    assert!(!fx.replica.join(stale).exists());

    let report = fx.pass().await;
    assert_eq!(report.summary.mutations(), 0);
    assert_eq!(report.summary.files_unchanged, 2);
}
