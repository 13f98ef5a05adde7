use specforge_document::{DocumentStore, FileDocumentStore, InitOutcome, DEFAULT_DOCUMENT};
use tempfile::TempDir;

#[tokio::test]
async fn init_seeds_skeleton_once() {
    let dir = TempDir::new().unwrap();
    let store = FileDocumentStore::open(dir.path()).unwrap();

    let first = store.init_document("game", false).await.unwrap();
    assert_eq!(first, InitOutcome::Initialized { reset: false });

    store.save_document("game", "# Edited").await.unwrap();
    let second = store.init_document("game", false).await.unwrap();
    assert_eq!(second, InitOutcome::Loaded);
    assert_eq!(store.get_document("game").await.unwrap(), "# Edited");

    let reset = store.init_document("game", true).await.unwrap();
    assert_eq!(reset, InitOutcome::Initialized { reset: true });
    assert_eq!(store.get_document("game").await.unwrap(), DEFAULT_DOCUMENT);
}

#[tokio::test]
async fn skeleton_structure_matches_template() {
    let dir = TempDir::new().unwrap();
    let store = FileDocumentStore::open(dir.path()).unwrap();
    store.init_document("spec", false).await.unwrap();

    let structure = store.get_structure("spec").await.unwrap();
    let top: Vec<_> = structure
        .iter()
        .filter(|s| s.level == 2)
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(
        top,
        vec!["Lexicon", "Context, Aim & Integration", "Features", "Roadmap"]
    );
    assert!(structure.iter().any(|s| s.title == "Milestone 1" && s.level == 3));
}

#[tokio::test]
async fn unknown_document_reads_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileDocumentStore::open(dir.path()).unwrap();
    assert_eq!(store.get_document("missing").await.unwrap(), "");
}

#[tokio::test]
async fn names_are_sanitized_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = FileDocumentStore::open(dir.path()).unwrap();
    store.save_document("../escape", "# Safe").await.unwrap();
    assert!(dir.path().join("escape.md").exists());
    assert_eq!(store.get_document("escape").await.unwrap(), "# Safe");
}
