//! End-to-end tests of the email-change protocol against the in-memory
//! repository, including concurrent request behavior.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use credence_core::domain::entities::account::Account;
use credence_core::errors::{AccountError, DomainError};
use credence_core::repositories::{AccountRepository, MockAccountRepository};
use credence_core::services::email_change::{
    EmailChangeService, EmailChangeServiceConfig, Mailer, RequestOutcome,
};

struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_message(&self, to: &str, _subject: &str, body: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().await;
        sent.push((to.to_string(), body.to_string()));
        Ok(format!("msg-{}", sent.len()))
    }
}

fn config() -> EmailChangeServiceConfig {
    EmailChangeServiceConfig {
        rate_limit_window_seconds: 300,
        confirmation_ttl_minutes: 30,
        site_domain: "credence.test".to_string(),
    }
}

async fn seeded_service(
    email: &str,
) -> (
    EmailChangeService<MockAccountRepository, RecordingMailer>,
    Arc<MockAccountRepository>,
    Uuid,
) {
    let mut account = Account::new(email.to_string(), "$2b$10$hash".to_string());
    account.confirm_email();
    let id = account.id;
    let repo = Arc::new(MockAccountRepository::with_account(account).await);
    let mailer = Arc::new(RecordingMailer::new());
    let service = EmailChangeService::new(repo.clone(), mailer, config());
    (service, repo, id)
}

#[tokio::test]
async fn test_request_then_confirm_full_flow() {
    let (service, repo, id) = seeded_service("old@x.com").await;

    let outcome = service
        .request_email_change(id, "new@x.com")
        .await
        .expect("request should succeed");
    assert!(matches!(outcome, RequestOutcome::ConfirmationSent { .. }));

    let token = repo
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .confirmation_token
        .expect("token stored after request");

    let confirmed = service
        .confirm_email_change(&token, "new@x.com")
        .await
        .expect("confirm should succeed");
    assert_eq!(confirmed.account_id, id);
    assert!(confirmed.invalidate_session);

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "new@x.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_requests_after_success_are_all_rate_limited() {
    let (service, _repo, id) = seeded_service("old@x.com").await;
    let service = Arc::new(service);

    service
        .request_email_change(id, "new@x.com")
        .await
        .expect("first request should succeed");

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .request_email_change(id, &format!("burst{}@x.com", i))
                .await
        }));
    }

    for handle in handles {
        let result = handle.await.expect("task should not panic");
        match result {
            Err(DomainError::Account(AccountError::RateLimited { retry_after_secs })) => {
                assert!(retry_after_secs > 0);
            }
            other => panic!("expected rate limit, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_confirm_with_foreign_token_does_not_cross_accounts() {
    let (service, repo, id) = seeded_service("old@x.com").await;

    let mut other = Account::new("bystander@x.com".to_string(), "$2b$10$hash".to_string());
    other.confirm_email();
    let other_id = other.id;
    repo.create(other).await.unwrap();

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

    // The token resolves to the requesting account only
    service
        .confirm_email_change(&token, "new@x.com")
        .await
        .unwrap();

    let bystander = repo.find_by_id(other_id).await.unwrap().unwrap();
    assert_eq!(bystander.email, "bystander@x.com");
}
