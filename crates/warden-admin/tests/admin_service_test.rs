//! Integration tests for the admin service using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use warden_admin::AdminService;
use warden_auth::authz::{self, RequestContext};
use warden_auth::config::AuthConfig;
use warden_auth::service::{AuthService, LoginInput};
use warden_core::error::WardenError;
use warden_core::models::role::ADMIN_ROLE;
use warden_core::models::user::{CreateUser, User};
use warden_core::repository::{Pagination, RoleRepository, UserRepository};
use warden_core::validation::RegistrationForm;
use warden_db::repository::{
    SurrealRoleRepository, SurrealSessionRepository, SurrealUserRepository,
};

type Db = surrealdb::engine::local::Db;

struct Fixture {
    users: SurrealUserRepository<Db>,
    roles: SurrealRoleRepository<Db>,
    sessions: SurrealSessionRepository<Db>,
    admin: AdminService<SurrealUserRepository<Db>, SurrealRoleRepository<Db>>,
    admin_ctx: RequestContext,
    member_ctx: RequestContext,
}

/// Spin up in-memory DB, run migrations, seed roles, and create one
/// admin ("root") plus one regular user ("member").
async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    warden_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let roles = SurrealRoleRepository::new(db.clone());
    let sessions = SurrealSessionRepository::new(db.clone());

    warden_db::seed::seed_default_roles(&roles).await.unwrap();

    let root = create_user(&users, "root@example.com", "root").await;
    let admin_role = roles.get_by_name(ADMIN_ROLE).await.unwrap();
    roles.grant_to_user(root.id, admin_role.id).await.unwrap();

    let member = create_user(&users, "member@example.com", "member").await;
    let user_role = roles.get_by_name("user").await.unwrap();
    roles.grant_to_user(member.id, user_role.id).await.unwrap();

    let admin = AdminService::new(users.clone(), roles.clone());

    Fixture {
        users,
        roles,
        sessions,
        admin,
        admin_ctx: ctx(root),
        member_ctx: ctx(member),
    }
}

async fn create_user(users: &SurrealUserRepository<Db>, email: &str, username: &str) -> User {
    users
        .create(CreateUser {
            email: email.into(),
            username: username.into(),
            password: "SuperSecret123!".into(),
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap()
}

fn ctx(user: User) -> RequestContext {
    RequestContext {
        user,
        session_id: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn non_admin_is_denied_at_every_operation_boundary() {
    let f = setup().await;
    let target = f.admin_ctx.user.id;

    let err = f
        .admin
        .list_users(&f.member_ctx, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::Forbidden { .. }));

    let err = f
        .admin
        .grant_role(&f.member_ctx, target, "user")
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::Forbidden { .. }));

    let err = f
        .admin
        .toggle_active(&f.member_ctx, target)
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::Forbidden { .. }));

    let err = f
        .admin
        .create_role(&f.member_ctx, "sneaky")
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::Forbidden { .. }));

    let err = f.admin.stats(&f.member_ctx).await.unwrap_err();
    assert!(matches!(err, WardenError::Forbidden { .. }));
}

#[tokio::test]
async fn list_users_includes_roles() {
    let f = setup().await;

    let page = f
        .admin
        .list_users(&f.admin_ctx, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let member = page
        .items
        .iter()
        .find(|u| u.user.username == "member")
        .unwrap();
    let names: Vec<_> = member.roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["user"]);
}

#[tokio::test]
async fn grant_role_is_idempotent() {
    let f = setup().await;
    let member = f.member_ctx.user.id;

    f.admin
        .grant_role(&f.admin_ctx, member, ADMIN_ROLE)
        .await
        .unwrap();
    f.admin
        .grant_role(&f.admin_ctx, member, ADMIN_ROLE)
        .await
        .unwrap();

    let roles = f.roles.roles_of_user(member).await.unwrap();
    let admin_count = roles.iter().filter(|r| r.name == ADMIN_ROLE).count();
    assert_eq!(admin_count, 1);
}

#[tokio::test]
async fn grant_unknown_role_is_not_found() {
    let f = setup().await;

    let err = f
        .admin
        .grant_role(&f.admin_ctx, f.member_ctx.user.id, "no-such-role")
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::NotFound { .. }));
}

#[tokio::test]
async fn revoke_role_is_idempotent() {
    let f = setup().await;
    let member = f.member_ctx.user.id;

    // Revoking a role the user does not hold is a no-op.
    f.admin
        .revoke_role(&f.admin_ctx, member, ADMIN_ROLE)
        .await
        .unwrap();

    // So is revoking a role name that does not exist.
    f.admin
        .revoke_role(&f.admin_ctx, member, "no-such-role")
        .await
        .unwrap();

    f.admin
        .revoke_role(&f.admin_ctx, member, "user")
        .await
        .unwrap();
    assert!(f.roles.roles_of_user(member).await.unwrap().is_empty());
}

#[tokio::test]
async fn revoke_from_unknown_user_is_not_found() {
    let f = setup().await;

    let err = f
        .admin
        .revoke_role(&f.admin_ctx, Uuid::new_v4(), "user")
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::NotFound { .. }));
}

#[tokio::test]
async fn toggle_active_flips_the_flag() {
    let f = setup().await;
    let member = f.member_ctx.user.id;

    let now_active = f.admin.toggle_active(&f.admin_ctx, member).await.unwrap();
    assert!(!now_active);
    assert!(!f.users.get_by_id(member).await.unwrap().is_active);

    let now_active = f.admin.toggle_active(&f.admin_ctx, member).await.unwrap();
    assert!(now_active);
}

#[tokio::test]
async fn deactivated_admin_can_be_reactivated_by_another_admin() {
    let f = setup().await;

    let second = create_user(&f.users, "second@example.com", "second").await;
    let admin_role = f.roles.get_by_name(ADMIN_ROLE).await.unwrap();
    f.roles.grant_to_user(second.id, admin_role.id).await.unwrap();
    let second_ctx = ctx(second);

    // First admin deactivates the second.
    f.admin
        .toggle_active(&f.admin_ctx, second_ctx.user.id)
        .await
        .unwrap();
    assert!(!f.users.get_by_id(second_ctx.user.id).await.unwrap().is_active);

    // And can bring them back.
    f.admin
        .toggle_active(&f.admin_ctx, second_ctx.user.id)
        .await
        .unwrap();
    assert!(f.users.get_by_id(second_ctx.user.id).await.unwrap().is_active);
}

#[tokio::test]
async fn self_deactivation_is_not_prevented() {
    let f = setup().await;

    // The lockout risk is documented, not guarded against.
    let now_active = f
        .admin
        .toggle_active(&f.admin_ctx, f.admin_ctx.user.id)
        .await
        .unwrap();
    assert!(!now_active);
}

#[tokio::test]
async fn create_role_validates_and_rejects_duplicates() {
    let f = setup().await;

    let role = f.admin.create_role(&f.admin_ctx, "Moderator").await.unwrap();
    assert_eq!(role.name, "moderator");

    let err = f
        .admin
        .create_role(&f.admin_ctx, "moderator")
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::DuplicateRoleName { .. }));

    let err = f
        .admin
        .create_role(&f.admin_ctx, "has spaces")
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::Validation { .. }));
}

#[tokio::test]
async fn delete_role_cascades_memberships() {
    let f = setup().await;
    let member = f.member_ctx.user.id;

    f.admin.create_role(&f.admin_ctx, "temp").await.unwrap();
    f.admin
        .grant_role(&f.admin_ctx, member, "temp")
        .await
        .unwrap();

    f.admin.delete_role(&f.admin_ctx, "temp").await.unwrap();

    let names: Vec<_> = f
        .roles
        .roles_of_user(member)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert!(!names.contains(&"temp".to_string()));
    assert!(f.roles.get_by_name("temp").await.is_err());
}

#[tokio::test]
async fn delete_user_cascades_and_refuses_self() {
    let f = setup().await;
    let member = f.member_ctx.user.id;

    let err = f
        .admin
        .delete_user(&f.admin_ctx, f.admin_ctx.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::Forbidden { .. }));

    f.admin.delete_user(&f.admin_ctx, member).await.unwrap();
    assert!(f.users.get_by_id(member).await.is_err());
    assert!(f.roles.roles_of_user(member).await.unwrap().is_empty());
}

#[tokio::test]
async fn stats_counts_users_and_admins() {
    let f = setup().await;

    let stats = f.admin.stats(&f.admin_ctx).await.unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.admin_users, 1);
    assert_eq!(stats.recent_users.len(), 2);
    // Newest registration first.
    assert_eq!(stats.recent_users[0].username, "member");
}

/// Full flow: register → login → wrong password → grant admin →
/// authorization check passes.
#[tokio::test]
async fn end_to_end_registration_to_admin_access() {
    let f = setup().await;
    let auth = AuthService::new(
        f.users.clone(),
        f.sessions.clone(),
        AuthConfig::default(),
    );

    let user = auth
        .register(RegistrationForm {
            email: "a@example.com".into(),
            username: "anna".into(),
            password: "Secret123!".into(),
            confirm_password: "Secret123!".into(),
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap();

    // Login succeeds with the right password.
    let login = auth
        .login(LoginInput {
            identifier: "a@example.com".into(),
            password: "Secret123!".into(),
            ip_address: None,
            user_agent: None,
        })
        .await
        .unwrap();

    // And fails with the wrong one.
    let err = auth
        .login(LoginInput {
            identifier: "a@example.com".into(),
            password: "WrongSecret".into(),
            ip_address: None,
            user_agent: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::InvalidCredentials));

    // Not an admin yet.
    let user_ctx = auth.authenticate(&login.session_token).await.unwrap();
    assert!(!authz::has_role(&f.roles, &user_ctx, ADMIN_ROLE).await.unwrap());

    // An existing admin grants the admin role.
    f.admin
        .grant_role(&f.admin_ctx, user.id, ADMIN_ROLE)
        .await
        .unwrap();

    // The authorization check now passes for the same context.
    authz::require_role(&f.roles, &user_ctx, ADMIN_ROLE)
        .await
        .unwrap();
}
