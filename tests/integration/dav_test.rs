//! End-to-end DAV interception scenarios.

use http::{Method, StatusCode};

use pathguard_dav::interceptor::{HEADER_ACTION, HEADER_PROTECTED, HEADER_REASON};

use crate::helpers::TestEnv;

#[tokio::test]
async fn test_dav_delete_denied_then_allowed_after_unprotect() {
    let env = TestEnv::new();
    let interceptor = env.interceptor();

    env.protect("/Projects/Alpha", Some("Legal hold")).await;

    let response = interceptor
        .intercept(&Method::DELETE, "/dav/files/alice/Projects/Alpha", None)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::LOCKED);
    assert!(response.headers.contains(&(HEADER_PROTECTED, "true".to_string())));
    assert!(response.headers.contains(&(HEADER_ACTION, "delete".to_string())));
    assert!(response.headers.contains(&(HEADER_REASON, "Legal hold".to_string())));
    assert!(response.body.contains("<pg:message>Legal hold</pg:message>"));

    env.checker.unprotect_by_path("/Projects/Alpha").await.unwrap();

    let response = interceptor
        .intercept(&Method::DELETE, "/dav/files/alice/Projects/Alpha", None)
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_dav_move_onto_protected_basename_is_denied() {
    let env = TestEnv::new();
    let interceptor = env.interceptor();

    env.protect("/dept/Finance", None).await;

    let response = interceptor
        .intercept(
            &Method::from_bytes(b"MOVE").unwrap(),
            "/dav/files/alice/scratch",
            Some("/dav/files/alice/other/Finance"),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::LOCKED);
    assert!(response.headers.contains(&(HEADER_ACTION, "move".to_string())));
}

#[tokio::test]
async fn test_dav_put_inside_protected_hierarchy_is_denied() {
    let env = TestEnv::new();
    let interceptor = env.interceptor();

    env.protect("/Shared", None).await;

    let response = interceptor
        .intercept(&Method::PUT, "/dav/files/alice/Shared/sub/new.txt", None)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::LOCKED);

    let response = interceptor
        .intercept(&Method::PUT, "/dav/files/alice/Elsewhere/new.txt", None)
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_dav_group_mount_alias_is_checked() {
    // The admin protects the internal mount path; clients address the
    // folder by its visible name.
    let env = TestEnv::new();
    env.mounts.register("/Team Folder", 7);
    let interceptor = env.interceptor();

    env.protect("/__groupmounts/7", None).await;

    let response = interceptor
        .intercept(&Method::DELETE, "/dav/files/alice/Team%20Folder", None)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::LOCKED);
}

#[tokio::test]
async fn test_dav_exclusive_lock_denied_shared_allowed() {
    let env = TestEnv::new();
    let interceptor = env.interceptor();

    env.protect("/Projects", None).await;

    let denied = interceptor
        .intercept_lock("/dav/files/alice/Projects", true)
        .await;
    assert!(denied.is_some());

    let allowed = interceptor
        .intercept_lock("/dav/files/alice/Projects", false)
        .await;
    assert!(allowed.is_none());
}
