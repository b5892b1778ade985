//! Patch application against on-disk fixtures, the way the patch stage
//! drives it: read the patch, read the clean decompiled source, write the
//! patched file into a separate source tree.

use pipewright::patch;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(path).unwrap()
}

#[test]
fn explosion_patch_applies_cleanly() {
    let diff = patch::parse(&fixture("Explosion.patch")).unwrap();
    assert_eq!(diff.old_path, "net/minecraft/server/Explosion.java");
    assert_eq!(diff.hunks.len(), 2);

    let patched = patch::apply(&fixture("Explosion.java"), &diff).unwrap();

    assert!(patched.contains("import org.bukkit.event.entity.EntityDamageEvent;"));
    assert!(patched.contains("if (!event.isCancelled()) {"));
    assert!(!patched.contains("entity.damage(this.size);"));
    // Surrounding code is untouched
    assert!(patched.contains("public void doExplosionB(boolean flag) {"));
    assert!(patched.ends_with("}\n"));
}

#[test]
fn patched_line_count_matches_hunk_headers() {
    let diff = patch::parse(&fixture("Explosion.patch")).unwrap();
    let original = fixture("Explosion.java");
    let patched = patch::apply(&original, &diff).unwrap();

    let delta: i64 = diff
        .hunks
        .iter()
        .map(|h| {
            let (adds, removes) = h.stats();
            adds as i64 - removes as i64
        })
        .sum();

    assert_eq!(
        patched.lines().count() as i64,
        original.lines().count() as i64 + delta
    );
}

#[test]
fn apply_to_file_writes_into_fresh_source_tree() {
    let dir = TempDir::new().unwrap();

    let clean = dir.path().join("decompile/net/minecraft/server/Explosion.java");
    fs::create_dir_all(clean.parent().unwrap()).unwrap();
    fs::write(&clean, fixture("Explosion.java")).unwrap();

    let target = dir
        .path()
        .join("CraftBukkit/src/main/java/net/minecraft/server/Explosion.java");

    let diff = patch::parse(&fixture("Explosion.patch")).unwrap();
    patch::apply_to_file(&clean, &target, &diff).unwrap();

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("// CraftBukkit start"));
    // The clean source stays clean for the next resume
    let clean_content = fs::read_to_string(&clean).unwrap();
    assert!(!clean_content.contains("CraftBukkit"));
}

#[test]
fn drifted_source_is_rejected_with_line_number() {
    let diff = patch::parse(&fixture("Explosion.patch")).unwrap();
    let drifted = fixture("Explosion.java").replace(
        "entity.damage(this.size);",
        "entity.hurt(this.size);",
    );

    match patch::apply(&drifted, &diff) {
        Err(pipewright::PatchError::ContextMismatch { line, .. }) => assert_eq!(line, 26),
        other => panic!("expected ContextMismatch, got {:?}", other),
    }
}
