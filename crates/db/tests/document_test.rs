//! Integration tests for documents.

mod common;

use common::{create_user, setup_db};
use kakeibo_core::documents::{DEFAULT_EMOJI, DEFAULT_TITLE, DocumentUpdate, NewDocument};
use kakeibo_db::{DocumentError, DocumentOrder, DocumentRepository};

#[tokio::test]
async fn test_create_applies_defaults() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = DocumentRepository::new(db.clone());

    let doc = repo
        .create(user.id, NewDocument::new(None, None, None, false))
        .await
        .unwrap();

    assert_eq!(doc.title, DEFAULT_TITLE);
    assert_eq!(doc.emoji, DEFAULT_EMOJI);
    assert_eq!(doc.content, "");
    assert_eq!(doc.sort_order, 0);
}

#[tokio::test]
async fn test_other_users_document_is_invisible() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let bob = create_user(&db, "bob@example.com").await;
    let repo = DocumentRepository::new(db.clone());

    let doc = repo
        .create(alice.id, NewDocument::new(Some("Taxes".into()), None, None, false))
        .await
        .unwrap();

    assert!(repo.find(bob.id, doc.id).await.unwrap().is_none());
    assert!(repo.list(bob.id, DocumentOrder::CreatedDesc).await.unwrap().is_empty());
    assert!(matches!(
        repo.update(bob.id, doc.id, DocumentUpdate::default()).await,
        Err(DocumentError::NotFound(_))
    ));

    // Deleting someone else's document succeeds but changes nothing.
    repo.delete(bob.id, doc.id).await.unwrap();
    assert!(repo.find(alice.id, doc.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_replaces_every_field() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = DocumentRepository::new(db.clone());

    let doc = repo
        .create(user.id, NewDocument::new(Some("Plan".into()), Some("📝".into()), None, false))
        .await
        .unwrap();

    let updated = repo
        .update(
            user.id,
            doc.id,
            DocumentUpdate {
                content: "# 2024".into(),
                ..DocumentUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "");
    assert_eq!(updated.emoji, "");
    assert_eq!(updated.content, "# 2024");
    assert_eq!(repo.find(user.id, doc.id).await.unwrap().unwrap().title, "");
    assert!(updated.updated_at >= doc.updated_at);
}

#[tokio::test]
async fn test_parent_must_be_owned() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let bob = create_user(&db, "bob@example.com").await;
    let repo = DocumentRepository::new(db.clone());

    let folder = repo
        .create(alice.id, NewDocument::new(Some("Folder".into()), None, None, true))
        .await
        .unwrap();

    let result = repo
        .create(bob.id, NewDocument::new(None, None, Some(folder.id), false))
        .await;
    assert!(matches!(result, Err(DocumentError::ParentNotFound(id)) if id == folder.id));

    let child = repo
        .create(alice.id, NewDocument::new(None, None, Some(folder.id), false))
        .await
        .unwrap();
    assert_eq!(child.parent_id, Some(folder.id));
}

#[tokio::test]
async fn test_deleting_folder_removes_children() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = DocumentRepository::new(db.clone());

    let folder = repo
        .create(user.id, NewDocument::new(Some("Folder".into()), None, None, true))
        .await
        .unwrap();
    let child = repo
        .create(user.id, NewDocument::new(None, None, Some(folder.id), false))
        .await
        .unwrap();

    repo.delete(user.id, folder.id).await.unwrap();
    assert!(repo.find(user.id, child.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = DocumentRepository::new(db.clone());

    let first = repo
        .create(user.id, NewDocument::new(Some("First".into()), None, None, false))
        .await
        .unwrap();
    let second = repo
        .create(user.id, NewDocument::new(Some("Second".into()), None, None, false))
        .await
        .unwrap();

    let created: Vec<_> = repo
        .list(user.id, DocumentOrder::CreatedDesc)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(created, vec![second.id, first.id]);

    repo.update(
        user.id,
        first.id,
        DocumentUpdate {
            title: "First, edited".into(),
            ..DocumentUpdate::default()
        },
    )
    .await
    .unwrap();

    let edited = repo.list(user.id, DocumentOrder::UpdatedDesc).await.unwrap();
    assert_eq!(edited[0].id, first.id);
    assert_eq!(edited[0].title, "First, edited");
}
