//! Dry-run adapter: reads pass through, writes never reach the store.

use crate::common::{ScriptedIdentityStore, capture, quiet_policy, raw_group, raw_user};
use directory_sync::classifier::SdkError;
use directory_sync::directory::{
    CreateGroupMembershipRequest, CreateGroupRequest, DeleteGroupMembershipRequest,
    DeleteGroupRequest, DeleteUserRequest, DirectoryAdapter, DirectoryReader, DirectoryWriter,
    DryRunAdapter, InMemoryIdentityStore, MemberId,
};
use directory_sync::{DirectoryError, ErrorKind};
use log::Level;

const STORE: &str = "d-1234";

fn seeded_store() -> InMemoryIdentityStore {
    let store = InMemoryIdentityStore::new(STORE);
    store.insert_user(raw_user("u-1", Some("ann")));
    store.insert_group(raw_group("g-1", Some("admins")));
    store
}

fn dry_run(store: &InMemoryIdentityStore) -> DryRunAdapter<DirectoryAdapter<InMemoryIdentityStore>> {
    DryRunAdapter::new(DirectoryAdapter::with_policy(
        store.clone(),
        STORE,
        quiet_policy(),
    ))
}

#[tokio::test]
async fn test_reads_delegate_to_wrapped_reader() {
    let store = seeded_store();
    let adapter = dry_run(&store);

    assert_eq!(adapter.identity_store_id(), STORE);
    assert_eq!(adapter.list_users().await.unwrap().len(), 1);
    assert_eq!(adapter.list_groups().await.unwrap()[0].display_name, "admins");
    assert!(adapter.list_group_memberships("g-1").await.unwrap().is_empty());
    assert!(
        !adapter
            .check_membership(&["g-1".to_string()], "u-1")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_read_failures_pass_through_classified() {
    let adapter = DryRunAdapter::new(DirectoryAdapter::with_policy(
        ScriptedIdentityStore::new()
            .with_group_pages(vec![vec![raw_group("g-1", Some("admins"))]])
            .failing_page_at(0, SdkError::new("InternalServerException", "boom")),
        STORE,
        quiet_policy(),
    ));

    let error = adapter.list_groups().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ServerError);
}

#[tokio::test]
async fn test_writes_leave_store_untouched() {
    let store = seeded_store();
    let adapter = dry_run(&store);

    adapter
        .create_group(CreateGroupRequest::new(STORE, "engineering"))
        .await
        .unwrap();
    adapter
        .create_group_membership(CreateGroupMembershipRequest::new(
            STORE,
            "g-1",
            MemberId::user("u-1"),
        ))
        .await
        .unwrap();
    adapter
        .delete_group_membership(DeleteGroupMembershipRequest::new(STORE, "m-1"))
        .await
        .unwrap();
    adapter
        .delete_group(DeleteGroupRequest::new(STORE, "g-1"))
        .await
        .unwrap();
    adapter
        .delete_user(DeleteUserRequest::new(STORE, "u-1"))
        .await
        .unwrap();

    assert_eq!(store.group_count(), 1);
    assert_eq!(store.user_count(), 1);
    assert_eq!(store.membership_count(), 0);
}

#[tokio::test]
async fn test_writes_never_call_the_client() {
    let adapter = DryRunAdapter::new(DirectoryAdapter::with_policy(
        ScriptedIdentityStore::new(),
        STORE,
        quiet_policy(),
    ));

    adapter
        .create_group(CreateGroupRequest::new(STORE, "engineering"))
        .await
        .unwrap();
    adapter
        .delete_user(DeleteUserRequest::new(STORE, "u-1"))
        .await
        .unwrap();

    assert_eq!(adapter.reader().client().calls(), 0);
}

#[tokio::test]
async fn test_synthesized_ids_are_deterministic() {
    let store = seeded_store();
    let adapter = dry_run(&store);
    let request = CreateGroupRequest::new(STORE, "engineering");

    let first = adapter.create_group(request.clone()).await.unwrap();
    let second = adapter.create_group(request).await.unwrap();
    let other = adapter
        .create_group(CreateGroupRequest::new(STORE, "marketing"))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.identity_store_id, STORE);
    assert_ne!(first.group_id, other.group_id);
    assert!(uuid::Uuid::parse_str(&first.group_id).is_ok());
}

#[tokio::test]
async fn test_membership_echoes_store_and_derives_id() {
    let store = seeded_store();
    let adapter = dry_run(&store);

    let a = adapter
        .create_group_membership(CreateGroupMembershipRequest::new(
            STORE,
            "g-1",
            MemberId::user("u-1"),
        ))
        .await
        .unwrap();
    let b = adapter
        .create_group_membership(CreateGroupMembershipRequest::new(
            STORE,
            "g-1",
            MemberId::user("u-2"),
        ))
        .await
        .unwrap();

    assert_eq!(a.identity_store_id, STORE);
    assert_ne!(a.membership_id, b.membership_id);
}

#[tokio::test]
async fn test_unrecognized_member_fails_like_a_real_run() {
    let store = seeded_store();
    let adapter = dry_run(&store);

    let error = adapter
        .create_group_membership(CreateGroupMembershipRequest::new(
            STORE,
            "g-1",
            MemberId::Unrecognized,
        ))
        .await
        .unwrap_err();

    assert!(error.is_contract_violation());
}

#[tokio::test]
async fn test_empty_required_fields_are_rejected() {
    let store = seeded_store();
    let adapter = dry_run(&store);

    let error = adapter
        .create_group(CreateGroupRequest::new(STORE, ""))
        .await
        .unwrap_err();
    assert!(matches!(error, DirectoryError::ContractViolation(_)));
    assert!(error.to_string().contains("display_name"));

    let error = adapter
        .delete_user(DeleteUserRequest::new(STORE, ""))
        .await
        .unwrap_err();
    assert!(error.to_string().contains("user_id"));
}

#[tokio::test]
async fn test_writes_are_announced() {
    capture::start();
    let store = seeded_store();
    let adapter = dry_run(&store);

    adapter
        .delete_group(DeleteGroupRequest::new(STORE, "g-1"))
        .await
        .unwrap();

    assert_eq!(
        capture::take_at(Level::Info),
        vec!["[dry-run] DeleteGroup: g-1".to_string()]
    );
}

#[tokio::test]
async fn test_rejections_match_live_adapter() {
    let live = DirectoryAdapter::with_policy(ScriptedIdentityStore::new(), STORE, quiet_policy());
    let preview = DryRunAdapter::new(DirectoryAdapter::with_policy(
        ScriptedIdentityStore::new(),
        STORE,
        quiet_policy(),
    ));

    let live_error = live
        .create_group(CreateGroupRequest::new(STORE, ""))
        .await
        .unwrap_err();
    let preview_error = preview
        .create_group(CreateGroupRequest::new(STORE, ""))
        .await
        .unwrap_err();
    assert_eq!(live_error.kind(), preview_error.kind());
    assert_eq!(live_error.to_string(), preview_error.to_string());

    let membership = CreateGroupMembershipRequest::new(STORE, "g-1", MemberId::Unrecognized);
    let live_error = live
        .create_group_membership(membership.clone())
        .await
        .unwrap_err();
    let preview_error = preview
        .create_group_membership(membership)
        .await
        .unwrap_err();
    assert_eq!(live_error.kind(), preview_error.kind());

    for (live_result, preview_result) in [
        (
            live.delete_group(DeleteGroupRequest::new(STORE, "")).await,
            preview.delete_group(DeleteGroupRequest::new(STORE, "")).await,
        ),
        (
            live.delete_group_membership(DeleteGroupMembershipRequest::new(STORE, ""))
                .await,
            preview
                .delete_group_membership(DeleteGroupMembershipRequest::new(STORE, ""))
                .await,
        ),
        (
            live.delete_user(DeleteUserRequest::new(STORE, "")).await,
            preview.delete_user(DeleteUserRequest::new(STORE, "")).await,
        ),
    ] {
        let live_error = live_result.unwrap_err();
        let preview_error = preview_result.unwrap_err();
        assert_eq!(live_error.kind(), ErrorKind::ContractViolation);
        assert_eq!(live_error.kind(), preview_error.kind());
    }

    assert_eq!(live.client().calls(), 0);
    assert_eq!(preview.reader().client().calls(), 0);
}
