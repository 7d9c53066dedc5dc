//! Integration tests for document operations.

mod helpers;

use docvault_core::ErrorKind;
use docvault_core::types::DocumentId;
use docvault_service::MoveDocumentRequest;

#[tokio::test]
async fn test_duplicate_name_and_extension_is_conflict() {
    let vault = helpers::TestVault::new().await;
    vault.upload(vault.root.id, "Q1", "pdf").await;
    vault.upload(vault.root.id, "Q1", "docx").await;

    let err = vault
        .try_upload(vault.root.id, "Q1", "pdf", b"%PDF-other")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(vault.staging_count(), 0);

    let root = vault.services.folders.get_folder(vault.root.id).await.unwrap();
    assert_eq!(root.documents.len(), 2);
}

#[tokio::test]
async fn test_blank_name_is_missing_fields_and_clears_staging() {
    let vault = helpers::TestVault::new().await;
    let staged = vault
        .staging
        .stage("upload.pdf", bytes::Bytes::from_static(b"%PDF"))
        .await
        .unwrap();
    assert_eq!(vault.staging_count(), 1);

    let err = vault
        .services
        .documents
        .create_document(
            &vault.ctx,
            docvault_service::CreateDocumentRequest {
                parent_folder: vault.root.id,
                name: "  ".to_string(),
                extension: "pdf".to_string(),
                description: String::new(),
            },
            staged,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingFields);
    assert_eq!(vault.staging_count(), 0);
}

#[tokio::test]
async fn test_created_document_is_appended_with_content() {
    let vault = helpers::TestVault::new().await;
    let first = vault.upload(vault.root.id, "first", "pdf").await;
    let second = vault
        .try_upload(vault.root.id, "second", "pdf", b"%PDF-second")
        .await
        .unwrap();

    let root = vault.services.folders.get_folder(vault.root.id).await.unwrap();
    assert_eq!(root.documents, vec![first.id, second.id]);
    assert_eq!(second.format.as_str(), "file");
    assert_eq!(second.description, "");

    let loaded = vault.services.documents.get_document(second.id).await.unwrap();
    assert_eq!(loaded.path, "second.pdf");
    assert_eq!(&loaded.content[..], b"%PDF-second");
}

#[tokio::test]
async fn test_rename_keeps_extension_and_moves_file() {
    let vault = helpers::TestVault::new().await;
    let docs = &vault.services.documents;
    let folder = vault.folder("Reports", vault.root.id).await;
    let doc = vault.upload(folder.id, "draft", "pdf").await;
    vault.upload(folder.id, "final", "pdf").await;

    let err = docs.rename_document(&vault.ctx, doc.id, "final").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let renamed = docs.rename_document(&vault.ctx, doc.id, "summary").await.unwrap();
    assert_eq!(renamed.extension, "pdf");
    assert!(vault.tree_path("Reports/summary.pdf").is_file());
    assert!(!vault.tree_path("Reports/draft.pdf").exists());

    let same = docs.rename_document(&vault.ctx, doc.id, "summary").await.unwrap();
    assert_eq!(same, renamed);
}

#[tokio::test]
async fn test_move_between_folders() {
    let vault = helpers::TestVault::new().await;
    let src = vault.folder("src", vault.root.id).await;
    let dst = vault.folder("dst", vault.root.id).await;
    let anchor = vault.upload(dst.id, "anchor", "pdf").await;
    let tail = vault.upload(dst.id, "tail", "pdf").await;
    let doc = vault.upload(src.id, "travel", "pdf").await;

    let moved = vault
        .services
        .documents
        .move_document(
            &vault.ctx,
            doc.id,
            MoveDocumentRequest {
                move_to: dst.id,
                place_after: Some(anchor.id),
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.parent_folder, dst.id);
    let dst_folder = vault.services.folders.get_folder(dst.id).await.unwrap();
    assert_eq!(dst_folder.documents, vec![anchor.id, doc.id, tail.id]);
    let src_folder = vault.services.folders.get_folder(src.id).await.unwrap();
    assert!(src_folder.documents.is_empty());
    assert!(vault.tree_path("dst/travel.pdf").is_file());
    assert!(!vault.tree_path("src/travel.pdf").exists());
}

#[tokio::test]
async fn test_move_onto_existing_name_is_conflict() {
    let vault = helpers::TestVault::new().await;
    let other = vault.folder("other", vault.root.id).await;
    vault.upload(other.id, "same", "pdf").await;
    let doc = vault.upload(vault.root.id, "same", "pdf").await;

    let err = vault
        .services
        .documents
        .move_document(
            &vault.ctx,
            doc.id,
            MoveDocumentRequest {
                move_to: other.id,
                place_after: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(vault.tree_path("same.pdf").is_file());
}

#[tokio::test]
async fn test_delete_removes_record_list_entry_and_file() {
    let vault = helpers::TestVault::new().await;
    let doc = vault.upload(vault.root.id, "gone", "pdf").await;

    vault.services.documents.delete_document(&vault.ctx, doc.id).await.unwrap();

    let root = vault.services.folders.get_folder(vault.root.id).await.unwrap();
    assert!(root.documents.is_empty());
    assert!(!vault.tree_path("gone.pdf").exists());
    let err = vault.services.documents.get_document_record(doc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_listing_includes_parent_names() {
    let vault = helpers::TestVault::new().await;
    let reports = vault.folder("Reports", vault.root.id).await;
    vault.upload(reports.id, "Q1", "pdf").await;
    vault.upload(vault.root.id, "readme", "docx").await;

    let listing = vault.services.documents.get_all_documents().await.unwrap();
    let pairs: Vec<_> = listing
        .iter()
        .map(|l| (l.parent_name.as_str(), l.document.name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Reports", "Q1"), ("root", "readme")]);
}

#[tokio::test]
async fn test_missing_document_is_not_found() {
    let vault = helpers::TestVault::new().await;
    let err = vault
        .services
        .documents
        .get_document(DocumentId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
