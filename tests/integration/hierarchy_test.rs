//! Integration tests for folder hierarchy mutations.

mod helpers;

use docvault_core::ErrorKind;
use docvault_entity::node::NodeKind;
use docvault_service::MoveFolderRequest;

fn move_to(
    target: docvault_core::types::FolderId,
    place_after: Option<docvault_core::types::FolderId>,
) -> MoveFolderRequest {
    MoveFolderRequest {
        move_to: target,
        place_after,
    }
}

#[tokio::test]
async fn test_reports_scenario() {
    let vault = helpers::TestVault::new().await;
    let folders = &vault.services.folders;
    let documents = &vault.services.documents;

    let reports = vault.folder("Reports", vault.root.id).await;
    let q1 = vault.upload(reports.id, "Q1", "pdf").await;
    assert_eq!(
        vault.services.tree.resolve_path(q1.id.into()).await.unwrap(),
        "Reports/Q1.pdf"
    );
    assert!(vault.tree_path("Reports/Q1.pdf").is_file());

    let annual = folders
        .rename_folder(&vault.ctx, reports.id, "Annual")
        .await
        .unwrap();
    assert_eq!(annual.id, reports.id);
    assert_eq!(
        vault.services.tree.resolve_path(q1.id.into()).await.unwrap(),
        "Annual/Q1.pdf"
    );
    assert!(vault.tree_path("Annual/Q1.pdf").is_file());
    assert!(!vault.tree_path("Reports").exists());

    let err = folders.delete_folder(&vault.ctx, annual.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    documents.delete_document(&vault.ctx, q1.id).await.unwrap();
    folders.delete_folder(&vault.ctx, annual.id).await.unwrap();

    assert!(vault.subfolders_of(vault.root.id).await.is_empty());
    assert!(!vault.tree_path("Annual").exists());
    let err = folders.get_folder(annual.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_sibling_names_are_unique_per_parent() {
    let vault = helpers::TestVault::new().await;
    let a = vault.folder("a", vault.root.id).await;
    let b = vault.folder("b", vault.root.id).await;
    vault.folder("shared", a.id).await;
    vault.folder("shared", b.id).await;

    let err = vault
        .services
        .folders
        .create_folder(
            &vault.ctx,
            docvault_service::CreateFolderRequest {
                name: "shared".to_string(),
                parent_folder: a.id,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = vault
        .services
        .folders
        .rename_folder(&vault.ctx, b.id, "a")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_move_into_own_subtree_leaves_tree_unchanged() {
    let vault = helpers::TestVault::new().await;
    let a = vault.folder("a", vault.root.id).await;
    let b = vault.folder("b", a.id).await;
    let c = vault.folder("c", b.id).await;

    let before = vault.services.tree.get_all_folders().await.unwrap();
    let err = vault
        .services
        .folders
        .move_folder(&vault.ctx, a.id, move_to(c.id, None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let after = vault.services.tree.get_all_folders().await.unwrap();
    assert_eq!(
        serde_json::to_value(&before).unwrap(),
        serde_json::to_value(&after).unwrap()
    );
    assert!(vault.tree_path("a/b/c").is_dir());
}

#[tokio::test]
async fn test_move_across_parents_updates_lists_and_mirror() {
    let vault = helpers::TestVault::new().await;
    let src = vault.folder("src", vault.root.id).await;
    let dst = vault.folder("dst", vault.root.id).await;
    let first = vault.folder("first", dst.id).await;
    let second = vault.folder("second", dst.id).await;
    let moving = vault.folder("moving", src.id).await;
    vault.upload(moving.id, "inside", "pdf").await;

    let moved = vault
        .services
        .folders
        .move_folder(&vault.ctx, moving.id, move_to(dst.id, Some(first.id)))
        .await
        .unwrap();

    assert_eq!(moved.parent_folder, Some(dst.id));
    assert!(vault.subfolders_of(src.id).await.is_empty());
    assert_eq!(
        vault.subfolders_of(dst.id).await,
        vec![first.id, moving.id, second.id]
    );
    assert!(vault.tree_path("dst/moving/inside.pdf").is_file());
    assert!(!vault.tree_path("src/moving").exists());
}

#[tokio::test]
async fn test_move_into_folder_with_same_name_is_conflict() {
    let vault = helpers::TestVault::new().await;
    let a = vault.folder("a", vault.root.id).await;
    let b = vault.folder("b", vault.root.id).await;
    vault.folder("dup", a.id).await;
    let dup = vault.folder("dup", b.id).await;

    let err = vault
        .services
        .folders
        .move_folder(&vault.ctx, dup.id, move_to(a.id, None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(vault.subfolders_of(b.id).await, vec![dup.id]);
}

#[tokio::test]
async fn test_place_after_defaults_to_front() {
    let vault = helpers::TestVault::new().await;
    let a = vault.folder("a", vault.root.id).await;
    let b = vault.folder("b", vault.root.id).await;
    let c = vault.folder("c", vault.root.id).await;

    vault
        .services
        .folders
        .move_folder(&vault.ctx, c.id, move_to(vault.root.id, None))
        .await
        .unwrap();
    assert_eq!(vault.subfolders_of(vault.root.id).await, vec![c.id, a.id, b.id]);
}

/// Within one parent the anchor index is used as-is when the node sat
/// before it, because removing the node shifts the anchor left.
#[tokio::test]
async fn test_same_parent_reorder_shift() {
    let vault = helpers::TestVault::new().await;
    let folders = &vault.services.folders;
    let a = vault.folder("a", vault.root.id).await;
    let b = vault.folder("b", vault.root.id).await;
    let c = vault.folder("c", vault.root.id).await;

    folders
        .move_folder(&vault.ctx, a.id, move_to(vault.root.id, Some(b.id)))
        .await
        .unwrap();
    assert_eq!(vault.subfolders_of(vault.root.id).await, vec![b.id, a.id, c.id]);

    folders
        .move_folder(&vault.ctx, c.id, move_to(vault.root.id, Some(b.id)))
        .await
        .unwrap();
    assert_eq!(vault.subfolders_of(vault.root.id).await, vec![b.id, c.id, a.id]);

    // Already directly after b: no-op.
    folders
        .move_folder(&vault.ctx, c.id, move_to(vault.root.id, Some(b.id)))
        .await
        .unwrap();
    assert_eq!(vault.subfolders_of(vault.root.id).await, vec![b.id, c.id, a.id]);
    assert!(vault.tree_path("c").is_dir());
}

#[tokio::test]
async fn test_place_after_outside_target_is_rejected() {
    let vault = helpers::TestVault::new().await;
    let a = vault.folder("a", vault.root.id).await;
    let b = vault.folder("b", vault.root.id).await;
    let nested = vault.folder("nested", a.id).await;

    let err = vault
        .services
        .folders
        .move_folder(&vault.ctx, b.id, move_to(vault.root.id, Some(nested.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_root_folder_is_protected() {
    let vault = helpers::TestVault::new().await;
    let a = vault.folder("a", vault.root.id).await;
    let folders = &vault.services.folders;

    let errors = [
        folders.rename_folder(&vault.ctx, vault.root.id, "top").await.unwrap_err(),
        folders
            .move_folder(&vault.ctx, vault.root.id, move_to(a.id, None))
            .await
            .unwrap_err(),
        folders.delete_folder(&vault.ctx, vault.root.id).await.unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind, ErrorKind::Validation);
    }
    assert_eq!(
        vault.services.tree.resolve_path(NodeKind::Folder(vault.root.id)).await.unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_paths_compose_with_parent_path() {
    let vault = helpers::TestVault::new().await;
    let tree = &vault.services.tree;
    let a = vault.folder("a", vault.root.id).await;
    let b = vault.folder("b", a.id).await;
    let doc = vault.upload(b.id, "notes", "docx").await;

    let parent_path = tree.resolve_path(b.id.into()).await.unwrap();
    assert_eq!(parent_path, "a/b");
    assert_eq!(
        tree.resolve_path(doc.id.into()).await.unwrap(),
        format!("{parent_path}/notes.docx")
    );
}

#[tokio::test]
async fn test_folder_contents_in_list_order() {
    let vault = helpers::TestVault::new().await;
    let parent = vault.folder("parent", vault.root.id).await;
    vault.folder("z", parent.id).await;
    vault.folder("y", parent.id).await;
    vault.upload(parent.id, "second", "pdf").await;
    vault.upload(parent.id, "first", "pdf").await;

    let contents = vault
        .services
        .folders
        .get_folder_contents(parent.id)
        .await
        .unwrap();
    let folders: Vec<_> = contents.subfolders.iter().map(|f| f.name.as_str()).collect();
    let docs: Vec<_> = contents.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(folders, vec!["z", "y"]);
    assert_eq!(docs, vec!["second", "first"]);
}

#[tokio::test]
async fn test_full_tree_counts() {
    let vault = helpers::TestVault::new().await;
    let a = vault.folder("a", vault.root.id).await;
    vault.folder("b", a.id).await;
    vault.upload(a.id, "one", "pdf").await;
    vault.upload(vault.root.id, "two", "pdf").await;

    let tree = vault.services.tree.get_all_folders().await.unwrap();
    assert_eq!(tree.root.id, vault.root.id);
    assert_eq!(tree.total_folders, 3);
    assert_eq!(tree.total_documents, 2);
    assert_eq!(tree.root.subfolders[0].documents[0].name, "one");
}
