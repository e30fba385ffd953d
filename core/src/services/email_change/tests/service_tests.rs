//! Behavioral tests for `EmailChangeService`

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::account::{Account, TOKEN_LENGTH};
use crate::errors::{AccountError, DomainError};
use crate::repositories::account::AccountRepository;
use crate::repositories::MockAccountRepository;
use crate::services::email_change::{
    EmailChangeService, EmailChangeServiceConfig, RequestOutcome,
};

use super::mocks::MockMailer;

fn confirmed_account(email: &str) -> Account {
    let mut account = Account::new(email.to_string(), "$2b$10$hash".to_string());
    account.confirm_email();
    account
}

fn test_config() -> EmailChangeServiceConfig {
    EmailChangeServiceConfig {
        rate_limit_window_seconds: 300,
        confirmation_ttl_minutes: 30,
        site_domain: "credence.test".to_string(),
    }
}

async fn service_with(
    account: Account,
) -> (
    EmailChangeService<MockAccountRepository, MockMailer>,
    Arc<MockAccountRepository>,
    Arc<MockMailer>,
) {
    let repo = Arc::new(MockAccountRepository::with_account(account).await);
    let mailer = Arc::new(MockMailer::new());
    let service = EmailChangeService::new(repo.clone(), mailer.clone(), test_config());
    (service, repo, mailer)
}

#[tokio::test]
async fn test_request_sends_confirmation_and_stores_token() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let (service, repo, mailer) = service_with(account).await;

    let outcome = service
        .request_email_change(id, "new@x.com")
        .await
        .unwrap();
    assert!(matches!(outcome, RequestOutcome::ConfirmationSent { .. }));

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    let token = stored.confirmation_token.expect("token stored");
    assert_eq!(token.len(), TOKEN_LENGTH);
    assert!(stored.token_sent_at.is_some());
    // Current address untouched until confirmation
    assert_eq!(stored.email, "old@x.com");

    let sent = mailer.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "new@x.com");
    assert_eq!(sent[0].subject, "credence.test: Verify your email-address");
    assert!(sent[0].body.contains(&format!(
        "https://credence.test/user/settings/email/{}?email=new%40x.com",
        token
    )));
}

#[tokio::test]
async fn test_request_rejects_invalid_format() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let (service, _repo, mailer) = service_with(account).await;

    let err = service
        .request_email_change(id, "not-an-email")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::InvalidEmailFormat)
    ));
    assert!(mailer.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_request_rejects_address_held_by_other_account() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let repo = Arc::new(MockAccountRepository::with_account(account).await);
    repo.create(confirmed_account("taken@x.com")).await.unwrap();
    let mailer = Arc::new(MockMailer::new());
    let service = EmailChangeService::new(repo.clone(), mailer.clone(), test_config());

    let err = service
        .request_email_change(id, "taken@x.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::EmailAlreadyInUse)
    ));
    assert!(mailer.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_request_own_address_is_silent_noop() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let (service, repo, mailer) = service_with(account).await;

    let outcome = service
        .request_email_change(id, "old@x.com")
        .await
        .unwrap();
    assert_eq!(outcome, RequestOutcome::AlreadyCurrent);
    assert!(mailer.sent_messages().await.is_empty());

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert!(stored.confirmation_token.is_none());
    assert!(stored.token_sent_at.is_none());
}

#[tokio::test]
async fn test_request_unknown_account() {
    let (service, _repo, _mailer) = service_with(confirmed_account("old@x.com")).await;

    let err = service
        .request_email_change(uuid::Uuid::new_v4(), "new@x.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::AccountNotFound)
    ));
}

#[tokio::test]
async fn test_second_request_inside_window_is_rate_limited() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let (service, _repo, mailer) = service_with(account).await;

    service
        .request_email_change(id, "new@x.com")
        .await
        .unwrap();

    let err = service
        .request_email_change(id, "other@x.com")
        .await
        .unwrap_err();
    match err {
        DomainError::Account(AccountError::RateLimited { retry_after_secs }) => {
            assert!(retry_after_secs > 0 && retry_after_secs <= 300);
        }
        other => panic!("expected rate limit, got {:?}", other),
    }
    // Only the first confirmation went out
    assert_eq!(mailer.sent_messages().await.len(), 1);
}

#[tokio::test]
async fn test_rate_limit_wait_is_rounded_to_whole_seconds() {
    let mut account = confirmed_account("old@x.com");
    // 10.3s into the 300s window leaves 289.7s, which reads as 290
    account.mark_token_sent(Utc::now() - Duration::milliseconds(10_300));
    let id = account.id;
    let (service, _repo, _mailer) = service_with(account).await;

    let err = service
        .request_email_change(id, "new@x.com")
        .await
        .unwrap_err();
    match err {
        DomainError::Account(AccountError::RateLimited { retry_after_secs }) => {
            assert_eq!(retry_after_secs, 290);
        }
        other => panic!("expected rate limit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_failure_leaves_rate_limit_clock_unstarted() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let (service, repo, mailer) = service_with(account).await;

    mailer.fail_sends();
    let err = service
        .request_email_change(id, "new@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Notification { .. }));

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert!(stored.token_sent_at.is_none());

    // An immediate retry is not rate limited
    let repo2 = Arc::new(MockAccountRepository::with_account(stored).await);
    let mailer2 = Arc::new(MockMailer::new());
    let service2 = EmailChangeService::new(repo2, mailer2, test_config());
    let outcome = service2
        .request_email_change(id, "new@x.com")
        .await
        .unwrap();
    assert!(matches!(outcome, RequestOutcome::ConfirmationSent { .. }));
}

#[tokio::test]
async fn test_confirm_swaps_email_and_requires_session_invalidation() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let (service, repo, _mailer) = service_with(account).await;

    service
        .request_email_change(id, "new@x.com")
        .await
        .unwrap();
    let token = repo
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .confirmation_token
        .unwrap();

    let confirmed = service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap();
    assert_eq!(confirmed.account_id, id);
    assert_eq!(confirmed.email, "new@x.com");
    assert!(confirmed.invalidate_session);

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "new@x.com");
}

#[tokio::test]
async fn test_confirm_rejects_unknown_token() {
    let (service, _repo, _mailer) = service_with(confirmed_account("old@x.com")).await;

    let err = service
        .confirm_email_change("no-such-token", "new@x.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_confirm_rejects_unconfirmed_account() {
    let mut account = Account::new("old@x.com".to_string(), "$2b$10$hash".to_string());
    account.set_confirmation_token("t".repeat(TOKEN_LENGTH));
    account.mark_token_sent(Utc::now());
    let token = account.confirmation_token.clone().unwrap();
    let (service, _repo, _mailer) = service_with(account).await;

    let err = service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::AccountNotEligible)
    ));
}

#[tokio::test]
async fn test_confirm_rejects_expired_token() {
    let mut account = confirmed_account("old@x.com");
    account.set_confirmation_token("t".repeat(TOKEN_LENGTH));
    account.mark_token_sent(Utc::now() - Duration::minutes(31));
    let token = account.confirmation_token.clone().unwrap();
    let id = account.id;
    let (service, repo, _mailer) = service_with(account).await;

    let err = service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::TokenExpired)
    ));

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "old@x.com");
}

#[tokio::test]
async fn test_confirm_rejects_token_with_no_send_time() {
    let mut account = confirmed_account("old@x.com");
    account.set_confirmation_token("t".repeat(TOKEN_LENGTH));
    let token = account.confirmation_token.clone().unwrap();
    let (service, _repo, _mailer) = service_with(account).await;

    let err = service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::TokenExpired)
    ));
}

#[tokio::test]
async fn test_confirm_recheck_catches_address_taken_since_request() {
    let mut account = confirmed_account("old@x.com");
    account.set_confirmation_token("t".repeat(TOKEN_LENGTH));
    account.mark_token_sent(Utc::now());
    let token = account.confirmation_token.clone().unwrap();
    let id = account.id;
    let repo = Arc::new(MockAccountRepository::with_account(account).await);
    // Someone else grabbed the address between request and confirm
    repo.create(confirmed_account("new@x.com")).await.unwrap();
    let mailer = Arc::new(MockMailer::new());
    let service = EmailChangeService::new(repo.clone(), mailer, test_config());

    let err = service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Account(AccountError::EmailAlreadyInUse)
    ));

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "old@x.com");
}

#[tokio::test]
async fn test_confirm_replay_is_benign() {
    let account = confirmed_account("old@x.com");
    let id = account.id;
    let (service, repo, _mailer) = service_with(account).await;

    service
        .request_email_change(id, "new@x.com")
        .await
        .unwrap();
    let token = repo
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .confirmation_token
        .unwrap();

    service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap();

    // Replaying the same link succeeds and changes nothing
    let replay = service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap();
    assert_eq!(replay.email, "new@x.com");

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "new@x.com");
}
