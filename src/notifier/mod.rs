use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Booking, BookingView, Event, Member, NotificationKind};
use crate::error::{AppError, Result};
use crate::repository::NotificationRepository;

pub mod email;
pub mod templates;

pub use email::SmtpNotifier;

/// Lifecycle and capacity events the dispatcher knows how to announce.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    BookingReceived(BookingView),
    BookingAccepted { event: Event, booking: Booking },
    BookingRejected { event: Event, booking: Booking },
    RoleInvite { event: Event, member: Member },
    MemberJoined { event: Event, member: Member },
    EventFull(Event),
    MemberStatusChanged(Member),
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationEvent::BookingReceived(_) => NotificationKind::BookingReceived,
            NotificationEvent::BookingAccepted { .. } => NotificationKind::BookingAccepted,
            NotificationEvent::BookingRejected { .. } => NotificationKind::BookingRejected,
            NotificationEvent::RoleInvite { .. } => NotificationKind::RoleInvite,
            NotificationEvent::MemberJoined { .. } => NotificationKind::MemberJoined,
            NotificationEvent::EventFull(_) => NotificationKind::EventFull,
            NotificationEvent::MemberStatusChanged(_) => NotificationKind::MemberStatusChanged,
        }
    }
}

/// Outbound email boundary. Implementations must not block the caller's
/// transaction on delivery problems.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;
    fn is_enabled(&self) -> bool;
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

/// Best-effort fan-out to email and the in-app notification log. A failed
/// send or a failed log write is traced and swallowed; the mutation that
/// triggered the notification already happened and stays happened.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    notification_repo: Arc<dyn NotificationRepository>,
}

impl Dispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        notification_repo: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            notifier,
            notification_repo,
        }
    }

    pub async fn dispatch(&self, event: NotificationEvent) {
        let kind = event.kind();
        let rendered = templates::render(&event);

        // The in-app row goes first; a slow or failed send must not lose
        // the record of the notification.
        if let Err(e) = self
            .notification_repo
            .record(
                rendered.event_id,
                rendered.member_id,
                kind,
                &rendered.in_app,
            )
            .await
        {
            tracing::error!("Failed to record {:?} notification: {}", kind, e);
        }

        let Some(recipient) = rendered.email_recipient else {
            return;
        };

        if !self.notifier.is_enabled() {
            tracing::debug!(
                "Notifier {} disabled, skipping {:?} email",
                self.notifier.name(),
                kind
            );
            return;
        }

        if let Err(e) = self
            .notifier
            .send(&recipient, &rendered.subject, &rendered.body)
            .await
        {
            tracing::error!(
                "Notifier {} failed to send {:?} to {}: {}",
                self.notifier.name(),
                kind,
                recipient,
                e
            );
        }
    }

    /// One-shot variant keyed by the event. The in-app insert is the
    /// serialization point: across any number of overlapping callers the
    /// marker row lands once, and only the caller that landed it gets
    /// `true` and sends the email.
    pub async fn dispatch_once(&self, event: NotificationEvent) -> Result<bool> {
        let kind = event.kind();
        let rendered = templates::render(&event);
        let event_id = rendered.event_id.ok_or_else(|| {
            AppError::Internal(format!("{:?} notification has no event to key on", kind))
        })?;

        if !self
            .notification_repo
            .record_once(event_id, kind, &rendered.in_app)
            .await?
        {
            return Ok(false);
        }

        if let Some(recipient) = rendered.email_recipient {
            if self.notifier.is_enabled() {
                if let Err(e) = self
                    .notifier
                    .send(&recipient, &rendered.subject, &rendered.body)
                    .await
                {
                    tracing::error!(
                        "Notifier {} failed to send {:?} to {}: {}",
                        self.notifier.name(),
                        kind,
                        recipient,
                        e
                    );
                }
            }
        }

        Ok(true)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Captures sends instead of delivering them. Used by integration
    /// tests to assert on notification behavior.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn sent_count(&self) -> usize {
            self.sent.lock().await.len()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        fn is_enabled(&self) -> bool {
            true
        }

        async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
            self.sent.lock().await.push((
                recipient.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }
    }
}
